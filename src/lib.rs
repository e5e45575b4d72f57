//! Batch aggregator for cosmetics-brand promo feeds.
//!
//! One invocation ingests the configured brands' RSS/Atom feeds, normalizes
//! every entry into a canonical record, deduplicates by canonical URL,
//! restricts the result to a recent time window, and writes a
//! deterministically ordered JSON snapshot for the display layer.
//!
//! The pipeline, leaf-first:
//!
//! - [`util`] - canonical URL normalization (the dedup key)
//! - [`normalize`] - title/category/summary heuristics
//! - [`feed`] - resilient fetching and dual-dialect parsing
//! - [`pipeline`] - the sequential aggregation driver and output policy
//! - [`config`] / [`output`] - the external collaborators: source list in,
//!   JSON artifact out; both fatal on failure

pub mod config;
pub mod feed;
pub mod model;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod util;
