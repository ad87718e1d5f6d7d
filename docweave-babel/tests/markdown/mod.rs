//! Markdown format tests
//!
//! Rendering for import and cleanup of converted Markdown.

mod cleanup;
mod render;
