//! Brand/source configuration.
//!
//! The source list is a JSON document shared with the downstream display
//! layer, so field names are camelCase. Unlike an optional preferences
//! file, this input is load-bearing: a missing or malformed file is fatal
//! and the run never starts fetching.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON in config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// One configured brand and its feed endpoints. Immutable for the duration
/// of a run.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    /// Brand name, used as the display prefix. Must be non-empty.
    pub name: String,

    /// Category hints consulted before the fixed vocabulary.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Explicit feed endpoints, in priority order.
    #[serde(default)]
    pub rss_urls: Vec<String>,

    /// YouTube channel IDs, each mapped onto the channel-feed URL template.
    #[serde(default)]
    pub youtube_channels: Vec<String>,

    /// Search query used only when no endpoints are configured.
    #[serde(default)]
    pub search_query: Option<String>,

    /// Whether to synthesize a search feed when the endpoint list is empty.
    #[serde(default = "default_search_fallback")]
    pub search_fallback: bool,
}

fn default_search_fallback() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct ConfigDocument {
    brands: Vec<Source>,
}

/// Loads the source list from a JSON config file.
///
/// # Errors
///
/// - [`ConfigError::Io`] - file missing or unreadable
/// - [`ConfigError::Parse`] - not valid JSON, or wrong shape
/// - [`ConfigError::Invalid`] - a brand with an empty name
///
/// All of these abort the run with a non-zero exit before any fetching.
/// An empty `brands` array is legal — the run degenerates to the fallback
/// record.
pub fn load_sources(path: &Path) -> Result<Vec<Source>, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let document: ConfigDocument = serde_json::from_str(&content)?;

    for (index, source) in document.brands.iter().enumerate() {
        if source.name.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "brand at index {index} has an empty name"
            )));
        }
    }

    tracing::info!(
        path = %path.display(),
        brands = document.brands.len(),
        "Loaded source configuration"
    );
    Ok(document.brands)
}
