//! Client for thenewsapi.com search endpoints.

use std::str::FromStr;
use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;

use crate::fetch::{Fetch, FetchError};

/// Default API host.
pub const DEFAULT_NEWS_BASE_URL: &str = "https://api.thenewsapi.com";

/// Which search endpoint to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsEndpoint {
    /// `/v1/news/top`, restricted to the US locale.
    #[default]
    Top,
    /// `/v1/news/all`.
    All,
}

impl FromStr for NewsEndpoint {
    type Err = NewsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "top" => Ok(NewsEndpoint::Top),
            "all" => Ok(NewsEndpoint::All),
            other => Err(NewsError::Url(format!("unknown news endpoint: {other}"))),
        }
    }
}

/// Errors from a news search.
#[derive(Debug)]
pub enum NewsError {
    /// The request URL could not be built.
    Url(String),
    /// The fetch failed.
    Fetch(FetchError),
    /// The response body was not JSON.
    Decode(serde_json::Error),
}

impl std::fmt::Display for NewsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NewsError::Url(msg) => write!(f, "Invalid news URL: {msg}"),
            NewsError::Fetch(_) => f.write_str("News fetch failed"),
            NewsError::Decode(_) => f.write_str("News response was not JSON"),
        }
    }
}

impl std::error::Error for NewsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NewsError::Url(_) => None,
            NewsError::Fetch(e) => Some(e),
            NewsError::Decode(e) => Some(e),
        }
    }
}

impl From<FetchError> for NewsError {
    fn from(err: FetchError) -> Self {
        NewsError::Fetch(err)
    }
}

/// URL builder and search client for the news API.
#[derive(Debug, Clone)]
pub struct NewsApi {
    api_token: String,
    base_url: String,
}

impl NewsApi {
    /// Creates a client for the default host.
    #[must_use]
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            base_url: DEFAULT_NEWS_BASE_URL.to_string(),
        }
    }

    /// Points the client at another host.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// URL of the top-stories search for `query`.
    pub fn top_stories_url(&self, query: &str) -> Result<Url, NewsError> {
        self.endpoint_url(NewsEndpoint::Top, query)
    }

    /// URL of the all-news search for `query`.
    pub fn all_news_url(&self, query: &str) -> Result<Url, NewsError> {
        self.endpoint_url(NewsEndpoint::All, query)
    }

    /// URL of `endpoint` searched for `query`. The query is percent-encoded.
    pub fn endpoint_url(&self, endpoint: NewsEndpoint, query: &str) -> Result<Url, NewsError> {
        let base = self.base_url.trim_end_matches('/');
        let token = self.api_token.as_str();
        let parsed = match endpoint {
            NewsEndpoint::Top => Url::parse_with_params(
                &format!("{base}/v1/news/top"),
                &[("api_token", token), ("locale", "us"), ("search", query)],
            ),
            NewsEndpoint::All => Url::parse_with_params(
                &format!("{base}/v1/news/all"),
                &[("api_token", token), ("search", query)],
            ),
        };
        parsed.map_err(|e| NewsError::Url(e.to_string()))
    }

    /// Searches `endpoint` for `query` and returns the decoded JSON body.
    pub fn search_news(
        &self,
        fetcher: &dyn Fetch,
        endpoint: NewsEndpoint,
        query: &str,
        timeout: Duration,
    ) -> Result<serde_json::Value, NewsError> {
        let url = self.endpoint_url(endpoint, query)?;
        let body = fetcher.fetch(url.as_str(), timeout)?;
        serde_json::from_str(&body).map_err(NewsError::Decode)
    }
}
