//! Aggregation driver.
//!
//! Iterates sources × feed endpoints strictly sequentially, runs the
//! fetch → parse → normalize cycle per endpoint, and applies the
//! time-window / dedup / sort / fallback policy over the accumulated
//! collection. Per-endpoint failures are ordinary values consumed here:
//! logged, counted, and contained — no single feed failure aborts a run.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::config::Source;
use crate::feed::{fetch_text, parse_feed, resolve_link, FetchError, ParseError};
use crate::model::CanonicalItem;
use crate::normalize::normalize_entry;

/// Channel-feed URL template applied to configured YouTube channel IDs.
const YOUTUBE_FEED_BASE: &str = "https://www.youtube.com/feeds/videos.xml";

/// Search-feed endpoint synthesized for sources with no configured feeds.
const SEARCH_FEED_BASE: &str = "https://news.google.com/rss/search";

/// Items older than this are stale and dropped.
const LOOKBACK_DAYS: i64 = 90;

/// Future-dated tolerance for minor clock skew.
const LOOKAHEAD_DAYS: i64 = 1;

/// What went wrong with one endpoint. Never escapes the driver loop.
#[derive(Debug, Error)]
pub enum EndpointError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Outcome of one full aggregation run.
pub struct RunReport {
    /// The final ordered record set, never empty (fallback substitution).
    pub items: Vec<CanonicalItem>,
    pub feeds_succeeded: usize,
    pub feeds_attempted: usize,
}

/// Builds the ordered endpoint list for one source: explicit feed URLs,
/// then YouTube channels mapped onto the channel-feed template. When that
/// list is empty and the source's fallback flag is on, exactly one search
/// feed is synthesized instead.
pub fn feed_endpoints(source: &Source) -> Vec<String> {
    let mut endpoints = source.rss_urls.clone();
    endpoints.extend(
        source
            .youtube_channels
            .iter()
            .map(|id| format!("{YOUTUBE_FEED_BASE}?channel_id={id}")),
    );

    if endpoints.is_empty() && source.search_fallback {
        endpoints.push(search_endpoint(source));
    }

    endpoints
}

fn search_endpoint(source: &Source) -> String {
    let query = source
        .search_query
        .clone()
        .unwrap_or_else(|| format!("{} 新作 OR 新商品 OR コスメ", source.name));

    let params = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("q", &query)
        .append_pair("hl", "ja")
        .append_pair("gl", "JP")
        .append_pair("ceid", "JP:ja")
        .finish();

    format!("{SEARCH_FEED_BASE}?{params}")
}

/// Runs one endpoint through the fetch → parse → normalize cycle.
/// Entries without a resolvable link are discarded here.
async fn process_endpoint(
    client: &reqwest::Client,
    source: &Source,
    endpoint: &str,
) -> Result<Vec<CanonicalItem>, EndpointError> {
    let body = fetch_text(client, endpoint).await?;
    let entries = parse_feed(&body)?;
    let fetched_at = Utc::now();

    Ok(entries
        .iter()
        .filter_map(|entry| {
            let link = resolve_link(entry)?;
            Some(normalize_entry(source, entry, &link, fetched_at))
        })
        .collect())
}

/// Runs the full aggregation: every source, every endpoint, sequentially.
///
/// The accumulating collection is owned here and nowhere else. Endpoint
/// failures are logged with brand and endpoint context and processing
/// continues with the next endpoint.
pub async fn run(client: &reqwest::Client, sources: &[Source]) -> RunReport {
    let mut collected = Vec::new();
    let mut feeds_succeeded = 0;
    let mut feeds_attempted = 0;

    for source in sources {
        for endpoint in feed_endpoints(source) {
            feeds_attempted += 1;
            match process_endpoint(client, source, &endpoint).await {
                Ok(items) => {
                    feeds_succeeded += 1;
                    tracing::debug!(
                        brand = %source.name,
                        endpoint = %endpoint,
                        entries = items.len(),
                        "Feed processed"
                    );
                    collected.extend(items);
                }
                Err(err) => {
                    tracing::warn!(
                        brand = %source.name,
                        endpoint = %endpoint,
                        error = %err,
                        "Feed failed, continuing with next endpoint"
                    );
                }
            }
        }
    }

    let items = finalize(collected, Utc::now());
    RunReport {
        items,
        feeds_succeeded,
        feeds_attempted,
    }
}

/// Applies the output policy to the accumulated collection:
///
/// 1. keep items whose `publishedAt` lies in [now − 90d, now + 1d] inclusive
/// 2. deduplicate by canonical URL, first-seen wins
/// 3. sort descending by `publishedAt` (stable — ties keep first-seen order)
/// 4. substitute the synthetic diagnostic record if nothing survived
pub fn finalize(collected: Vec<CanonicalItem>, now: DateTime<Utc>) -> Vec<CanonicalItem> {
    let window_start = now - Duration::days(LOOKBACK_DAYS);
    let window_end = now + Duration::days(LOOKAHEAD_DAYS);

    let mut seen = HashSet::new();
    let mut items: Vec<CanonicalItem> = collected
        .into_iter()
        .filter(|item| item.published_at >= window_start && item.published_at <= window_end)
        .filter(|item| seen.insert(item.url.clone()))
        .collect();

    items.sort_by(|a, b| b.published_at.cmp(&a.published_at));

    if items.is_empty() {
        items.push(CanonicalItem::fallback(now));
    }

    items
}
