//! HTTP retrieval of feed documents with bounded retry.

use futures::StreamExt;
use std::time::Duration;
use thiserror::Error;

/// Total attempts per endpoint. Exhausting them surfaces the last error.
const MAX_ATTEMPTS: u32 = 2;

/// Linear backoff base: the wait before attempt N+1 is this times N.
const RETRY_BASE_DELAY: Duration = Duration::from_millis(800);

/// Per-attempt request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Response bodies beyond this are abandoned to bound memory use.
const MAX_FEED_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Errors that can occur while fetching one feed document.
///
/// All of these are non-fatal to the run: the driver catches them per
/// endpoint. The fetcher itself does not distinguish error classes for
/// retry eligibility — any failure is retried identically until the
/// attempt budget runs out.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, body read)
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the 30-second timeout
    #[error("request timed out")]
    Timeout,
    /// Response body exceeded the 10MB size limit
    #[error("response too large")]
    ResponseTooLarge,
}

/// Fetches a feed document and returns its body as text.
///
/// Makes up to 2 attempts with a linear backoff between them (800 ms ×
/// attempt number). Any failure — network error, timeout, or non-success
/// status — counts against the budget and is retried the same way. The
/// body is streamed with a 10 MB cap and decoded lossily; the parser only
/// needs markup structure, and a stray invalid byte should not cost the
/// whole endpoint.
///
/// No caching, no cookies; the network call is the only side effect.
pub async fn fetch_text(client: &reqwest::Client, url: &str) -> Result<String, FetchError> {
    let mut attempt = 1;
    loop {
        match fetch_once(client, url).await {
            Ok(body) => return Ok(body),
            Err(err) if attempt < MAX_ATTEMPTS => {
                tracing::debug!(url, attempt, error = %err, "Feed fetch failed, retrying");
                tokio::time::sleep(RETRY_BASE_DELAY * attempt).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

async fn fetch_once(client: &reqwest::Client, url: &str) -> Result<String, FetchError> {
    let response = tokio::time::timeout(REQUEST_TIMEOUT, client.get(url).send())
        .await
        .map_err(|_| FetchError::Timeout)?
        .map_err(FetchError::Network)?;

    if !response.status().is_success() {
        return Err(FetchError::HttpStatus(response.status().as_u16()));
    }

    let bytes = read_limited_bytes(response, MAX_FEED_SIZE).await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    // Fast path: trust Content-Length when the server sends one
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
