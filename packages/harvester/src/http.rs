//! HTTP client wrapper shared by the OAI transport and the PURL fetcher.

use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use thiserror::Error;

use crate::config::HttpOptions;
use crate::error::Result;

/// User agent string identifying this harvester.
const USER_AGENT: &str = concat!("dor-harvester/", env!("CARGO_PKG_VERSION"));

/// Maximum number of attempts for transient failures.
pub const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (milliseconds).
const RETRY_BASE_DELAY_MS: u64 = 500;

/// Failure of a single download after retries.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Server answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// No usable response: connection or read timeouts on every attempt.
    #[error("no response from {url} after {attempts} attempts: {message}")]
    Timeout {
        url: String,
        attempts: u32,
        message: String,
    },

    /// Request could not be sent or the body could not be read.
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// 4xx response.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Status { status, .. } if (400..500).contains(status))
    }

    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Create a configured HTTP client.
///
/// # Arguments
/// * `options` - Timeouts from the client configuration
///
/// # Returns
/// A `reqwest::blocking::Client` configured with timeouts and user agent.
pub fn create_client(options: &HttpOptions) -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(options.timeout_secs))
        .connect_timeout(Duration::from_secs(options.connect_timeout_secs))
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Download content from a URL with retry logic.
///
/// Uses exponential backoff for transient failures (network errors, 5xx
/// responses, bodies that stall past the timeout). Client errors (4xx) are
/// returned on the first attempt.
///
/// # Arguments
/// * `client` - HTTP client to use
/// * `url` - URL to download from
///
/// # Returns
/// Raw bytes of the response body
pub fn download_bytes(client: &Client, url: &str) -> std::result::Result<Vec<u8>, FetchError> {
    let mut last_status: Option<u16> = None;
    let mut last_error = String::new();

    for attempt in 0..MAX_RETRIES {
        if attempt > 0 {
            // Exponential backoff: 500ms, 1000ms
            let delay = RETRY_BASE_DELAY_MS * (1 << (attempt - 1));
            tracing::debug!(attempt, delay_ms = delay, url, "Retrying after delay");
            thread::sleep(Duration::from_millis(delay));
        }

        match client.get(url).send() {
            Ok(response) => {
                let status = response.status();

                if status.is_server_error() {
                    tracing::warn!(
                        status = %status,
                        attempt = attempt + 1,
                        max_retries = MAX_RETRIES,
                        url,
                        "Server error, will retry"
                    );
                    last_status = Some(status.as_u16());
                    continue;
                }

                if !status.is_success() {
                    return Err(FetchError::Status {
                        url: url.to_string(),
                        status: status.as_u16(),
                    });
                }

                match response.bytes() {
                    Ok(bytes) => return Ok(bytes.to_vec()),
                    Err(e) if e.is_timeout() => {
                        tracing::warn!(
                            error = %e,
                            attempt = attempt + 1,
                            max_retries = MAX_RETRIES,
                            url,
                            "Timed out reading body, will retry"
                        );
                        last_status = None;
                        last_error = e.to_string();
                        continue;
                    }
                    Err(source) => {
                        return Err(FetchError::Request {
                            url: url.to_string(),
                            source,
                        });
                    }
                }
            }
            Err(e) => {
                if e.is_connect() || e.is_timeout() {
                    tracing::warn!(
                        error = %e,
                        attempt = attempt + 1,
                        max_retries = MAX_RETRIES,
                        url,
                        "Connection error, will retry"
                    );
                    last_status = None;
                    last_error = e.to_string();
                    continue;
                }
                return Err(FetchError::Request {
                    url: url.to_string(),
                    source: e,
                });
            }
        }
    }

    // All retries exhausted
    Err(match last_status {
        Some(status) => FetchError::Status {
            url: url.to_string(),
            status,
        },
        None => FetchError::Timeout {
            url: url.to_string(),
            attempts: MAX_RETRIES,
            message: last_error,
        },
    })
}

/// Decode a response body as UTF-8.
///
/// Invalid sequences are replaced rather than rejected; a leading byte order
/// mark is dropped.
pub fn bytes_to_string(bytes: &[u8], context: &str) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(e) => {
            tracing::warn!(error = %e, context, "Response is not valid UTF-8, decoding lossily");
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}
