//! Diagram block extraction and replacement.

mod replace;
