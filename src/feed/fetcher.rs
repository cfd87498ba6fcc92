use futures::StreamExt;
use thiserror::Error;

use super::assemble::assemble;
use super::model::WordsResponse;

const MAX_FEED_SIZE: usize = 2 * 1024 * 1024; // 2MB

/// Errors that can occur while fetching the upstream feed.
///
/// All of them surface to HTTP clients as the same generic failure; the
/// variants exist so the cause can be logged.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, timeout)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Response body exceeded the size limit
    #[error("Response too large")]
    ResponseTooLarge,
}

/// Fetches the feed document as text.
///
/// One GET, no retry. Non-2xx responses are errors.
pub async fn fetch_feed(client: &reqwest::Client, url: &str) -> Result<String, FetchError> {
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Err(FetchError::HttpStatus(response.status().as_u16()));
    }

    let bytes = read_limited_bytes(response, MAX_FEED_SIZE).await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Fetches the feed and scrapes every word in it.
pub async fn fetch_words(
    client: &reqwest::Client,
    url: &str,
) -> Result<WordsResponse, FetchError> {
    let document = fetch_feed(client, url).await?;
    let response = assemble(&document);
    tracing::info!(url = %url, words = response.words.len(), "Fetched words of the day");
    Ok(response)
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
