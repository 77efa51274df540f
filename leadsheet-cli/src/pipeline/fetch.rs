//! Raw text retrieval

use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

use super::source::SheetSource;

/// Error retrieving raw text for a source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Server answered with a non-success status
    Status { code: u16 },
    /// Connection, timeout or body read failure
    Transport(String),
    /// Got something other than delimited text (usually a sign-in page)
    UnexpectedContent(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Status { code } => write!(f, "Server returned HTTP {}", code),
            FetchError::Transport(msg) => write!(f, "Request failed: {}", msg),
            FetchError::UnexpectedContent(content_type) => write!(
                f,
                "Expected CSV but got '{}'; is the sheet published or shared publicly?",
                content_type
            ),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => FetchError::Status {
                code: status.as_u16(),
            },
            None => FetchError::Transport(err.to_string()),
        }
    }
}

/// Retrieves the raw delimited text behind a source
///
/// Called exactly once per ingestion pass; implementations must not retry.
#[async_trait]
pub trait RawTextFetcher: Send + Sync {
    async fn fetch_raw_text(&self, source: &SheetSource) -> Result<String, FetchError>;
}

/// Default timeout for a single fetch
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches the CSV export of a sheet over HTTPS
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("leadsheet/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl RawTextFetcher for HttpFetcher {
    async fn fetch_raw_text(&self, source: &SheetSource) -> Result<String, FetchError> {
        let url = source.export_url();
        log::debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            log::warn!("Fetching {} failed with HTTP {}", url, status);
            return Err(FetchError::Status {
                code: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if content_type.starts_with("text/html") {
            return Err(FetchError::UnexpectedContent(content_type));
        }

        let text = response.text().await?;
        log::info!("Fetched {} bytes from {}", text.len(), source.document_id());
        Ok(text)
    }
}
