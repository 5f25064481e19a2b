//! Outbound fetch-by-URL capability used by tools.

use std::time::Duration;

/// Errors from an outbound fetch.
#[derive(Debug)]
pub enum FetchError {
    /// The URL could not be built or parsed.
    InvalidUrl(String),
    /// The endpoint answered with a non-2xx status.
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },
    /// Connection, timeout or body read failure.
    Transport(reqwest::Error),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::InvalidUrl(msg) => write!(f, "Invalid URL: {msg}"),
            FetchError::Status { url, status } => write!(f, "HTTP {status} from {url}"),
            FetchError::Transport(_) => f.write_str("Transport error"),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Transport(e) => Some(e),
            FetchError::InvalidUrl(_) | FetchError::Status { .. } => None,
        }
    }
}

/// Fetches the body of a URL.
///
/// Non-2xx answers and network failures are errors; callers only log them.
pub trait Fetch: Send + Sync {
    /// Performs one GET request and returns the response body.
    fn fetch(&self, url: &str, timeout: Duration) -> Result<String, FetchError>;
}

/// Blocking HTTP implementation of [`Fetch`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a shared connection pool.
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("wxmcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Transport)?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str, timeout: Duration) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .map_err(FetchError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().map_err(FetchError::Transport)
    }
}
