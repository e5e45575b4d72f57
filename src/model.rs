//! Output record types shared by the pipeline and the artifact writer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::util::is_youtube_url;

/// Brand label used for the synthetic diagnostic record when a run produces
/// no items at all.
pub const FALLBACK_BRAND: &str = "テスト（feed未取得）";

const FALLBACK_URL: &str = "https://example.com/no-feed";

/// Where an item's URL points, derived from the URL host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Youtube,
    Website,
}

impl SourceKind {
    /// Classifies a URL: YouTube hosts map to [`SourceKind::Youtube`],
    /// everything else (including unparseable strings) to
    /// [`SourceKind::Website`].
    pub fn from_url(url: &str) -> Self {
        if is_youtube_url(url) {
            SourceKind::Youtube
        } else {
            SourceKind::Website
        }
    }
}

/// A normalized, deduplicated content record — one element of the output
/// artifact.
///
/// Field names are serialized in camelCase because the artifact is consumed
/// by a JavaScript display layer.
///
/// Invariants held by the pipeline:
/// - `title` and `summary` are never empty
/// - `category` is always assigned
/// - `url` is canonicalized and pairwise distinct within one run's output
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalItem {
    /// Opaque unique token. Not the deduplication key — that is `url`.
    pub id: String,
    pub brand: String,
    pub title: String,
    pub summary: String,
    pub published_at: DateTime<Utc>,
    pub category: String,
    pub source_type: SourceKind,
    pub url: String,
    /// Reserved for the display layer; this pipeline never sets it.
    pub thumbnail_url: Option<String>,
}

impl CanonicalItem {
    /// Builds the synthetic diagnostic record substituted when the final
    /// sequence would otherwise be empty, so the artifact never is.
    pub fn fallback(now: DateTime<Utc>) -> Self {
        CanonicalItem {
            id: uuid::Uuid::new_v4().to_string(),
            brand: FALLBACK_BRAND.to_string(),
            title: "フィードを取得できませんでした".to_string(),
            summary: "全フィードの取得に失敗しました。ネットワーク状況と設定ファイルのフィードURLを確認してください。"
                .to_string(),
            published_at: now,
            category: "スキンケア".to_string(),
            source_type: SourceKind::Website,
            url: FALLBACK_URL.to_string(),
            thumbnail_url: None,
        }
    }
}
