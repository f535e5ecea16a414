use async_trait::async_trait;
use futures::{Stream, StreamExt};
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::error::FetchError;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.114 Safari/537.36";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_DOCUMENT_BYTES: usize = 1 << 20;

/// Retrieves a document by URL.
///
/// `Ok(None)` means the document is unavailable (transport failure, non-2xx
/// status). `Err` is reserved for conditions that must stop the caller from
/// trying again, see [`FetchError::is_fatal`].
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Option<String>, FetchError>;
}

#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    max_bytes: usize,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration, max_bytes: usize) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client, max_bytes })
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Option<String>, FetchError> {
        debug!("GET {}", url);
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Request to {} failed: {}", url, e);
                return Ok(None);
            }
        };

        let status = response.status();
        if !status.is_success() {
            debug!("{} returned {}", url, status);
            return Ok(None);
        }

        match read_capped(Box::pin(response.bytes_stream()), self.max_bytes).await {
            Ok(Some(body)) => Ok(Some(String::from_utf8_lossy(&body).into_owned())),
            Ok(None) => {
                error!("File '{}' too large!", url);
                Err(FetchError::TooLarge {
                    url: url.to_string(),
                    limit: self.max_bytes,
                })
            }
            Err(e) => {
                warn!("Reading {} failed: {}", url, e);
                Ok(None)
            }
        }
    }
}

/// Collects `stream` until it ends.
///
/// Returns `Ok(None)` as soon as the total would exceed `max_bytes`; the
/// partial body is dropped, as it is when the stream yields an error.
pub async fn read_capped<S, B, E>(mut stream: S, max_bytes: usize) -> Result<Option<Vec<u8>>, E>
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
{
    let mut body = Vec::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        let chunk = chunk.as_ref();
        if body.len() + chunk.len() > max_bytes {
            return Ok(None);
        }
        body.extend_from_slice(chunk);
    }
    Ok(Some(body))
}
