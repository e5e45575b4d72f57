//! Feed retrieval and parsing.
//!
//! This module covers the per-endpoint half of the pipeline:
//!
//! - [`fetcher`] - HTTP retrieval with bounded retry, timeout, and a size cap
//! - [`parser`] - dual-dialect (RSS channel/item, Atom feed/entry) parsing
//!   into the unified [`RawEntry`] shape
//!
//! Both halves fail with endpoint-scoped errors ([`FetchError`],
//! [`ParseError`]) that the aggregation driver contains — a single bad feed
//! never aborts a run.

mod fetcher;
mod parser;

pub use fetcher::{fetch_text, FetchError};
pub use parser::{parse_feed, resolve_link, ParseError, RawEntry};
