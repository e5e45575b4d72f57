//! Text heuristics and entry normalization.
//!
//! Everything in this module is a pure function over strings plus a fixed
//! vocabulary; [`normalize_entry`] composes them to turn one parsed feed
//! entry into one [`CanonicalItem`].

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::config::Source;
use crate::feed::RawEntry;
use crate::model::{CanonicalItem, SourceKind};
use crate::util::canonicalize_url;

/// The closed category vocabulary. Order matters: the classifier walks it
/// front to back after the per-brand hints.
pub const CATEGORY_VOCABULARY: [&str; 7] = [
    "リップ",
    "チーク",
    "アイメイク",
    "スキンケア",
    "ベースメイク",
    "ネイル",
    "ヘアケア",
];

/// Summary substituted when an entry carries no description at all.
const GENERIC_SUMMARY: &str = "最新の商品・キャンペーン情報をお届けします。";

/// Hard cap on summary length, in characters.
const SUMMARY_MAX_CHARS: usize = 120;

/// A sentence boundary only counts once at least this many characters
/// precede it; shorter "sentences" are usually labels, not prose.
const SUMMARY_MIN_SENTENCE_CHARS: usize = 20;

fn regex_of(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("hard-coded pattern"))
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex_of(&RE, r"\s+")
}

/// Promotional markers wrapped in brackets, anywhere in the title.
fn wrapped_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex_of(&RE, r"[【\[(（]\s*(?i:PR|広告|お知らせ|NEWS)\s*[】\])）]")
}

/// Bare promotional markers at the head of the title, followed by a
/// separator. Anchored so words merely containing "pr"/"news" survive.
fn leading_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex_of(&RE, r"^(?i:PR|広告|お知らせ|NEWS)\s*[:：・\-]\s*")
}

fn limited_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex_of(&RE, r"限定|先行|数量")
}

fn new_product_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex_of(&RE, r"(?i)新作|新商品|\bnew\b")
}

// 登場 is deliberately not a release marker: new-product phrasing like
// 「新作コスメ登場」 must tag as 【新作】, not 【発売】.
fn release_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex_of(&RE, r"発売|リリース|発表")
}

fn lip_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex_of(&RE, r"(?i)リップ|口紅|ルージュ|グロス|lip")
}

fn cheek_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex_of(&RE, r"(?i)チーク|ブラッシュ|blush|cheek")
}

fn skincare_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex_of(&RE, r"(?i)スキンケア|化粧水|美容液|乳液|保湿|skincare")
}

fn eye_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex_of(&RE, r"(?i)アイシャドウ|マスカラ|アイライナー|まつげ|eye")
}

fn collapse_whitespace(s: &str) -> String {
    whitespace_re().replace_all(s.trim(), " ").into_owned()
}

/// Normalizes a raw entry title for display.
///
/// An absent or empty title becomes `"{brand}の最新情報"`. Otherwise the
/// title is whitespace-collapsed, stripped of promotional markers
/// (`【PR】`, `[広告]`, leading `お知らせ：`, …), prefixed with
/// `"{brand}："` unless it already starts with the brand, and finally the
/// matching subset of tag brackets is prepended — `【限定】`, `【新作】`,
/// `【発売】`, checked independently in that order and laid out left to
/// right. A tag already present in the title is never duplicated.
pub fn normalize_title(brand: &str, raw: Option<&str>) -> String {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return format!("{brand}の最新情報");
    }

    let collapsed = collapse_whitespace(raw);
    let stripped = wrapped_marker_re().replace_all(&collapsed, "");
    let stripped = leading_marker_re().replace(&stripped, "");
    let body = collapse_whitespace(&stripped);
    if body.is_empty() {
        // The title was nothing but markers
        return format!("{brand}の最新情報");
    }

    let mut tags = String::new();
    if limited_re().is_match(&body) && !body.contains("【限定】") {
        tags.push_str("【限定】");
    }
    if new_product_re().is_match(&body) && !body.contains("【新作】") {
        tags.push_str("【新作】");
    }
    if release_re().is_match(&body) && !body.contains("【発売】") {
        tags.push_str("【発売】");
    }

    let titled = if body.starts_with(brand) {
        body
    } else {
        format!("{brand}：{body}")
    };

    format!("{tags}{titled}")
}

/// Assigns a category to an entry.
///
/// Walks the union of per-brand hints and [`CATEGORY_VOCABULARY`] in
/// insertion order (hints first), returning the first candidate that occurs
/// in `text` as a case-insensitive substring. When nothing matches, four
/// broader keyword patterns are tried in fixed order (lip, cheek, skincare,
/// eye); the final fallback is `スキンケア`. A category is always assigned.
pub fn classify_category(hints: &[String], text: &str) -> String {
    let haystack = text.to_lowercase();

    for candidate in hints.iter().map(String::as_str).chain(CATEGORY_VOCABULARY) {
        let candidate = candidate.trim();
        if candidate.is_empty() {
            continue;
        }
        if haystack.contains(&candidate.to_lowercase()) {
            return candidate.to_string();
        }
    }

    let fallbacks: [(&str, &Regex); 4] = [
        ("リップ", lip_re()),
        ("チーク", cheek_re()),
        ("スキンケア", skincare_re()),
        ("アイメイク", eye_re()),
    ];
    for (category, pattern) in fallbacks {
        if pattern.is_match(text) {
            return category.to_string();
        }
    }

    "スキンケア".to_string()
}

/// Produces a short display summary from a description.
///
/// Absent or empty input yields a fixed generic sentence. Otherwise the text
/// is whitespace-collapsed; if the first sentence terminator (。．！？!?)
/// sits at character index 20 or later the prefix up to and including it is
/// returned, else the first 120 characters.
pub fn summarize(text: Option<&str>) -> String {
    let raw = text.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return GENERIC_SUMMARY.to_string();
    }

    let collapsed = collapse_whitespace(raw);
    if let Some((idx, _)) = collapsed
        .chars()
        .enumerate()
        .find(|(_, c)| is_full_stop(*c))
    {
        if idx >= SUMMARY_MIN_SENTENCE_CHARS {
            return collapsed.chars().take(idx + 1).collect();
        }
    }

    collapsed.chars().take(SUMMARY_MAX_CHARS).collect()
}

// ASCII '.' is excluded: descriptions routinely carry URLs and decimals.
fn is_full_stop(c: char) -> bool {
    matches!(c, '。' | '．' | '！' | '？' | '!' | '?')
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    None
}

/// Converts one raw feed entry into a canonical record.
///
/// `link` must already be resolved and non-empty — the driver discards
/// linkless entries before calling this. Date candidates that fail to parse
/// as RFC 2822 or RFC 3339 silently become `fetched_at`; that is a
/// substitution, never an error. The classifier sees the raw title and raw
/// description so the brand prefix and injected tags cannot influence the
/// category.
pub fn normalize_entry(
    source: &Source,
    entry: &RawEntry,
    link: &str,
    fetched_at: DateTime<Utc>,
) -> CanonicalItem {
    let raw_title = entry.title_text();
    let raw_description = entry.description_text();

    let classifier_input = match (raw_title, raw_description) {
        (Some(t), Some(d)) => format!("{t} {d}"),
        (Some(t), None) => t.to_string(),
        (None, Some(d)) => d.to_string(),
        (None, None) => String::new(),
    };

    let published_at = entry
        .published_hint()
        .and_then(parse_date)
        .unwrap_or(fetched_at);

    let url = canonicalize_url(link);

    CanonicalItem {
        id: uuid::Uuid::new_v4().to_string(),
        brand: source.name.clone(),
        title: normalize_title(&source.name, raw_title),
        summary: summarize(raw_description),
        published_at,
        category: classify_category(&source.tags, &classifier_input),
        source_type: SourceKind::from_url(&url),
        url,
        thumbnail_url: None,
    }
}
