//! Dual-dialect feed parsing.
//!
//! Feed endpoints serve one of two incompatible document shapes: an RSS 2.0
//! "channel containing items" document or an Atom "feed containing entries"
//! document. Both deserialize into the same [`RawEntry`] shape; the
//! heterogeneous link, date, and text fields are modeled as explicit structs
//! resolved by extraction functions with a fixed precedence order.

use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while parsing a feed document.
///
/// Both variants are non-fatal to the run: the driver catches them per
/// endpoint and moves on.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The document is not well-formed XML, or a dialect's required
    /// structure is missing.
    #[error("XML parse error: {0}")]
    Xml(String),

    /// Well-formed XML that is neither an RSS channel nor an Atom feed.
    #[error("unrecognized feed shape: root element <{0}>")]
    Unrecognized(String),
}

/// An unnormalized entry extracted from a feed document.
///
/// Every field is optional — feeds are messy. An entry without a resolvable
/// link is discarded downstream; everything else has a normalization
/// fallback.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEntry {
    #[serde(default)]
    pub title: Option<Text>,
    /// All `<link>` elements in document order. RSS uses text content, Atom
    /// uses `href`/`rel` attributes; one struct models the whole union.
    #[serde(default, rename = "link")]
    pub links: Vec<Link>,
    #[serde(default)]
    pub description: Option<Text>,
    #[serde(default)]
    pub summary: Option<Text>,
    #[serde(default, rename = "content", alias = "content:encoded")]
    pub content: Option<Text>,
    #[serde(default, rename = "pubDate")]
    pub pub_date: Option<String>,
    #[serde(default)]
    pub published: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
    #[serde(default)]
    pub enclosure: Option<Enclosure>,
}

/// An element whose text content is the payload, tolerating `type=`
/// attributes and CDATA wrapping.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Text {
    #[serde(default, rename = "$text")]
    pub value: Option<String>,
}

impl Text {
    fn get(&self) -> Option<&str> {
        non_empty(&self.value)
    }
}

/// One `<link>` element in either dialect.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Link {
    #[serde(default, rename = "@href")]
    pub href: Option<String>,
    #[serde(default, rename = "@rel")]
    pub rel: Option<String>,
    #[serde(default, rename = "$text")]
    pub text: Option<String>,
}

/// An RSS `<enclosure>` element; only the URL matters here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Enclosure {
    #[serde(default, rename = "@url")]
    pub url: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl RawEntry {
    /// The entry title, unwrapped from its text wrapper; `None` when absent
    /// or blank.
    pub fn title_text(&self) -> Option<&str> {
        self.title.as_ref().and_then(Text::get)
    }

    /// The entry description: `description`, then `summary`, then the
    /// wrapped `content` field — first non-empty wins.
    pub fn description_text(&self) -> Option<&str> {
        self.description
            .as_ref()
            .and_then(Text::get)
            .or_else(|| self.summary.as_ref().and_then(Text::get))
            .or_else(|| self.content.as_ref().and_then(Text::get))
    }

    /// The raw publication-date candidate: `pubDate`, then `published`,
    /// then `updated`. All absent is not a failure — the normalizer
    /// substitutes the fetch instant.
    pub fn published_hint(&self) -> Option<&str> {
        non_empty(&self.pub_date)
            .or_else(|| non_empty(&self.published))
            .or_else(|| non_empty(&self.updated))
    }
}

/// Resolves an entry's link with a fixed precedence order:
///
/// 1. the `rel="alternate"` link's `href`
/// 2. the first link carrying any `href`
/// 3. the first link with non-empty text content (the RSS plain-string form)
/// 4. the enclosure URL
///
/// `None` signals "no usable link"; the driver discards such entries.
pub fn resolve_link(entry: &RawEntry) -> Option<String> {
    entry
        .links
        .iter()
        .filter(|l| l.rel.as_deref() == Some("alternate"))
        .find_map(|l| non_empty(&l.href))
        .or_else(|| entry.links.iter().find_map(|l| non_empty(&l.href)))
        .or_else(|| entry.links.iter().find_map(|l| non_empty(&l.text)))
        .or_else(|| entry.enclosure.as_ref().and_then(|e| non_empty(&e.url)))
        .map(str::to_string)
}

#[derive(Debug, Deserialize)]
struct RssDocument {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(default, rename = "item")]
    items: Vec<RawEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomDocument {
    #[serde(default, rename = "entry")]
    entries: Vec<RawEntry>,
}

/// Parses a feed document into raw entries.
///
/// The root element decides the dialect: `<rss>` (channel/item) is
/// consulted first, `<feed>` (entry/link) otherwise — the two are mutually
/// exclusive in practice and channel wins when in doubt. A document with a
/// single entry yields a one-element sequence; repeated-element collection
/// normalizes the bare-object case.
///
/// # Errors
///
/// [`ParseError::Xml`] for malformed markup, [`ParseError::Unrecognized`]
/// for well-formed documents in neither dialect. Callers contain both at
/// the endpoint boundary — a bad feed never aborts the run.
pub fn parse_feed(text: &str) -> Result<Vec<RawEntry>, ParseError> {
    match root_element(text)? {
        Some(root) if root == "rss" => {
            let doc: RssDocument =
                quick_xml::de::from_str(text).map_err(|e| ParseError::Xml(e.to_string()))?;
            Ok(doc.channel.items)
        }
        Some(root) if root == "feed" => {
            let doc: AtomDocument =
                quick_xml::de::from_str(text).map_err(|e| ParseError::Xml(e.to_string()))?;
            Ok(doc.entries)
        }
        Some(root) => Err(ParseError::Unrecognized(root)),
        None => Err(ParseError::Unrecognized("(no root element)".to_string())),
    }
}

/// Reads events up to the first start element and returns its name.
/// Prolog, comments, and DOCTYPE are skipped.
fn root_element(text: &str) -> Result<Option<String>, ParseError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                return Ok(Some(
                    String::from_utf8_lossy(e.name().as_ref()).into_owned(),
                ));
            }
            Ok(Event::Eof) => return Ok(None),
            Ok(_) => {}
            Err(e) => return Err(ParseError::Xml(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS_TWO_ITEMS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>ブランドニュース</title>
    <item>
      <title>新作リップ発売</title>
      <link>https://brand.example.com/news/1</link>
      <description>春の新色が登場します。</description>
      <pubDate>Tue, 01 Jul 2025 10:00:00 +0900</pubDate>
    </item>
    <item>
      <title><![CDATA[【PR】限定チーク]]></title>
      <link>https://brand.example.com/news/2</link>
      <description>数量限定で発売。</description>
    </item>
  </channel>
</rss>"#;

    const ATOM_SINGLE_ENTRY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Brand Channel</title>
  <entry>
    <title type="text">夏コスメ特集</title>
    <link rel="alternate" href="https://www.youtube.com/watch?v=abc123"/>
    <link rel="self" href="https://www.youtube.com/feeds/videos.xml?channel_id=x"/>
    <summary>新作アイテムを紹介します。</summary>
    <published>2025-07-01T10:00:00+09:00</published>
    <updated>2025-07-02T10:00:00+09:00</updated>
  </entry>
</feed>"#;

    #[test]
    fn test_rss_channel_yields_items() {
        let entries = parse_feed(RSS_TWO_ITEMS).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title_text(), Some("新作リップ発売"));
        assert_eq!(
            resolve_link(&entries[0]).as_deref(),
            Some("https://brand.example.com/news/1")
        );
        assert_eq!(entries[0].description_text(), Some("春の新色が登場します。"));
        assert_eq!(
            entries[0].published_hint(),
            Some("Tue, 01 Jul 2025 10:00:00 +0900")
        );
    }

    #[test]
    fn test_rss_cdata_title() {
        let entries = parse_feed(RSS_TWO_ITEMS).unwrap();
        assert_eq!(entries[1].title_text(), Some("【PR】限定チーク"));
    }

    #[test]
    fn test_atom_single_entry_is_one_element_sequence() {
        let entries = parse_feed(ATOM_SINGLE_ENTRY).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title_text(), Some("夏コスメ特集"));
    }

    #[test]
    fn test_atom_alternate_link_preferred() {
        let entries = parse_feed(ATOM_SINGLE_ENTRY).unwrap();
        // rel="self" comes second in the document but must lose to alternate
        assert_eq!(
            resolve_link(&entries[0]).as_deref(),
            Some("https://www.youtube.com/watch?v=abc123")
        );
    }

    #[test]
    fn test_atom_date_precedence_published_over_updated() {
        let entries = parse_feed(ATOM_SINGLE_ENTRY).unwrap();
        assert_eq!(entries[0].published_hint(), Some("2025-07-01T10:00:00+09:00"));
    }

    #[test]
    fn test_link_first_href_when_no_alternate() {
        let xml = r#"<feed>
  <entry>
    <link rel="self"/>
    <link rel="enclosure" href="https://example.com/a"/>
    <link href="https://example.com/b"/>
  </entry>
</feed>"#;
        let entries = parse_feed(xml).unwrap();
        // The rel="self" link has no href; the first link carrying one wins
        assert_eq!(
            resolve_link(&entries[0]).as_deref(),
            Some("https://example.com/a")
        );
    }

    #[test]
    fn test_link_enclosure_fallback() {
        let xml = r#"<rss><channel>
  <item>
    <title>音声コンテンツ</title>
    <enclosure url="https://example.com/ep1.mp3" type="audio/mpeg"/>
  </item>
</channel></rss>"#;
        let entries = parse_feed(xml).unwrap();
        assert_eq!(
            resolve_link(&entries[0]).as_deref(),
            Some("https://example.com/ep1.mp3")
        );
    }

    #[test]
    fn test_link_absent_resolves_none() {
        let xml = "<rss><channel><item><title>リンクなし</title></item></channel></rss>";
        let entries = parse_feed(xml).unwrap();
        assert_eq!(resolve_link(&entries[0]), None);
    }

    #[test]
    fn test_link_whitespace_wrapped_text() {
        let xml = r#"<rss><channel><item>
  <link>
    https://example.com/padded
  </link>
</item></channel></rss>"#;
        let entries = parse_feed(xml).unwrap();
        assert_eq!(
            resolve_link(&entries[0]).as_deref(),
            Some("https://example.com/padded")
        );
    }

    #[test]
    fn test_description_fallback_chain() {
        let xml = r#"<feed>
  <entry><summary>要約テキスト</summary></entry>
  <entry><content type="html">本文テキスト</content></entry>
  <entry><title>説明なし</title></entry>
</feed>"#;
        let entries = parse_feed(xml).unwrap();
        assert_eq!(entries[0].description_text(), Some("要約テキスト"));
        assert_eq!(entries[1].description_text(), Some("本文テキスト"));
        assert_eq!(entries[2].description_text(), None);
    }

    #[test]
    fn test_empty_channel_yields_empty_sequence() {
        let entries = parse_feed("<rss><channel><title>空</title></channel></rss>").unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_malformed_xml_is_parse_error() {
        let err = parse_feed("<rss><channel><item>").unwrap_err();
        assert!(matches!(err, ParseError::Xml(_)), "got {err:?}");
    }

    #[test]
    fn test_unrecognized_shape_is_parse_error() {
        let err = parse_feed("<html><body>not a feed</body></html>").unwrap_err();
        assert!(matches!(err, ParseError::Unrecognized(_)), "got {err:?}");
    }

    #[test]
    fn test_missing_dates_not_a_failure() {
        let entries =
            parse_feed("<rss><channel><item><title>日付なし</title></item></channel></rss>")
                .unwrap();
        assert_eq!(entries[0].published_hint(), None);
    }
}
