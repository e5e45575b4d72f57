//! Utility functions for common operations.
//!
//! Currently this is URL handling: canonicalization for deduplication keys
//! and host classification for the output's source-type field.

mod url;

pub use url::{canonicalize_url, is_youtube_url};
