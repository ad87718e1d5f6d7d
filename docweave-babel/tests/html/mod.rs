//! HTML format tests
//!
//! Exported and fetched HTML through the cleaner and the Markdown writer.

mod google_export;
mod web_page;
