use url::Url;

/// Canonicalizes a URL for storage and deduplication.
///
/// Two feed entries pointing at the same page frequently differ only in a
/// fragment or a trailing slash. Canonicalization collapses those variants
/// onto a single key:
///
/// - the fragment is cleared
/// - trailing slashes are stripped from any non-root path
///
/// # Arguments
///
/// * `raw` - The URL string as it appeared in the feed
///
/// # Returns
///
/// The reconstructed URL string. Input that does not parse as a URL is
/// returned unchanged — this function never fails.
///
/// # Examples
///
/// ```
/// use cosmewatch::util::canonicalize_url;
///
/// assert_eq!(
///     canonicalize_url("https://example.com/item/#section"),
///     "https://example.com/item"
/// );
/// assert_eq!(canonicalize_url("not a url"), "not a url");
/// ```
pub fn canonicalize_url(raw: &str) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        return raw.to_string();
    };

    url.set_fragment(None);

    let path = url.path();
    if path != "/" && path.ends_with('/') {
        let trimmed = path.trim_end_matches('/').to_string();
        if trimmed.is_empty() {
            url.set_path("/");
        } else {
            url.set_path(&trimmed);
        }
    }

    url.to_string()
}

/// Returns true if the URL points at a YouTube host.
///
/// Matches `youtube.com` (with any subdomain) and the `youtu.be` short host.
/// Unparseable URLs are classified as non-YouTube.
pub fn is_youtube_url(raw: &str) -> bool {
    let Ok(url) = Url::parse(raw) else {
        return false;
    };
    match url.host_str() {
        Some(host) => {
            host == "youtube.com" || host.ends_with(".youtube.com") || host == "youtu.be"
        }
        None => false,
    }
}
