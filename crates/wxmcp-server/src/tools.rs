//! Weather and news tools.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;
use wxmcp_logging::{Logger, exception, info};

use crate::fetch::{Fetch, FetchError};
use crate::handler::{ToolDefinition, ToolError, ToolHandler, parse_arguments};
use crate::news::{NewsApi, NewsEndpoint};

/// Result returned when the weather fetch fails.
pub const WEATHER_ERROR: &str = "Error fetching weather data";

/// Result returned when the news fetch fails.
pub const NEWS_ERROR: &str = "Error fetching news data";

/// Default weather host.
pub const DEFAULT_WEATHER_BASE_URL: &str = "https://wttr.in";

/// Builds `<base>/<city>` with the city as a single encoded path segment.
pub fn weather_url(base_url: &str, city: &str) -> Result<Url, FetchError> {
    let mut url = Url::parse(base_url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| FetchError::InvalidUrl(format!("{base_url} cannot be a base")))?
        .pop_if_empty()
        .push(city);
    Ok(url)
}

#[derive(Debug, Deserialize)]
struct WeatherArgs {
    city: String,
}

/// `get_current_weather(city)` backed by wttr.in.
pub struct WeatherTool {
    logger: Logger,
    fetcher: Arc<dyn Fetch>,
    base_url: String,
    timeout: Duration,
}

impl WeatherTool {
    /// Creates the tool.
    pub fn new(logger: Logger, fetcher: Arc<dyn Fetch>) -> Self {
        Self {
            logger,
            fetcher,
            base_url: DEFAULT_WEATHER_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Points the tool at another host.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the fetch timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl ToolHandler for WeatherTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "get_current_weather".to_string(),
            description: "Get current weather for a city".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "city": { "type": "string", "description": "City name" }
                },
                "required": ["city"]
            }),
        }
    }

    fn call(&self, arguments: &serde_json::Value) -> Result<String, ToolError> {
        let WeatherArgs { city } = parse_arguments("get_current_weather", arguments)?;
        info!(self.logger, "Tool called: get_current_weather(city={})", city);

        let result = weather_url(&self.base_url, &city)
            .and_then(|url| self.fetcher.fetch(url.as_str(), self.timeout));
        match result {
            Ok(body) => Ok(body),
            Err(err) => {
                exception!(self.logger, &err, "{}", WEATHER_ERROR);
                Ok(WEATHER_ERROR.to_string())
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct NewsArgs {
    query: String,
    #[serde(default)]
    scope: NewsEndpoint,
}

/// `search_news(query, scope)` backed by thenewsapi.com.
pub struct NewsTool {
    logger: Logger,
    fetcher: Arc<dyn Fetch>,
    api: NewsApi,
    timeout: Duration,
}

impl NewsTool {
    /// Creates the tool.
    pub fn new(logger: Logger, fetcher: Arc<dyn Fetch>, api: NewsApi) -> Self {
        Self {
            logger,
            fetcher,
            api,
            timeout: Duration::from_secs(10),
        }
    }

    /// Sets the fetch timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl ToolHandler for NewsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "search_news".to_string(),
            description: "Search news articles".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string", "description": "Search terms" },
                    "scope": {
                        "type": "string",
                        "enum": ["top", "all"],
                        "default": "top"
                    }
                },
                "required": ["query"]
            }),
        }
    }

    fn call(&self, arguments: &serde_json::Value) -> Result<String, ToolError> {
        let NewsArgs { query, scope } = parse_arguments("search_news", arguments)?;
        info!(self.logger, "Tool called: search_news(query={}, scope={:?})", query, scope);

        match self
            .api
            .search_news(self.fetcher.as_ref(), scope, &query, self.timeout)
        {
            Ok(value) => Ok(serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())),
            Err(err) => {
                exception!(self.logger, &err, "{}", NEWS_ERROR);
                Ok(NEWS_ERROR.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::stub::StubFetcher;
    use wxmcp_logging::testing::CaptureBuffer;
    use wxmcp_logging::{ConsoleStream, LogFacility};

    fn test_logger(dir: &tempfile::TempDir) -> (Logger, CaptureBuffer) {
        let console = CaptureBuffer::new();
        let facility = LogFacility::with_console(ConsoleStream::Capture(console.clone()));
        let logger = facility
            .get("tools_test", dir.path().join("tools.log"), "DEBUG")
            .unwrap();
        (logger, console)
    }

    #[test]
    fn weather_url_encodes_city() {
        let url = weather_url("https://wttr.in", "New York").unwrap();
        assert_eq!(url.as_str(), "https://wttr.in/New%20York");

        let url = weather_url("http://localhost:8080/", "a/b").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/a%2Fb");
    }

    #[test]
    fn weather_returns_body_and_logs_entry() {
        let dir = tempfile::tempdir().unwrap();
        let (logger, console) = test_logger(&dir);
        let fetcher = Arc::new(StubFetcher::default().ok("https://wttr.in/London", "Rain, 12°C"));
        let tool = WeatherTool::new(logger, fetcher.clone());

        let out = tool.call(&serde_json::json!({"city": "London"})).unwrap();
        assert_eq!(out, "Rain, 12°C");
        console.assert_contains("INFO - Tool called: get_current_weather(city=London)");

        let requests = fetcher.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].1, Duration::from_secs(10));
    }

    #[test]
    fn weather_failure_returns_fixed_message() {
        let dir = tempfile::tempdir().unwrap();
        let (logger, console) = test_logger(&dir);
        let fetcher = Arc::new(StubFetcher::default().status("https://wttr.in/Atlantis", 500));
        let tool = WeatherTool::new(logger.clone(), fetcher);

        let out = tool.call(&serde_json::json!({"city": "Atlantis"})).unwrap();
        assert_eq!(out, WEATHER_ERROR);
        console.assert_contains("ERROR - Error fetching weather data: HTTP 500 from https://wttr.in/Atlantis");

        logger.flush();
        let contents = std::fs::read_to_string(logger.file_path().unwrap()).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            assert!(line.contains(" - wxmcp_server::tools:"), "{line}");
            assert!(!line.contains(".rs:"), "{line}");
        }
    }

    #[test]
    fn weather_rejects_missing_city() {
        let dir = tempfile::tempdir().unwrap();
        let (logger, _console) = test_logger(&dir);
        let tool = WeatherTool::new(logger, Arc::new(StubFetcher::default()));

        let err = tool.call(&serde_json::json!({"town": "Oslo"})).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
    }

    #[test]
    fn news_uses_scope_and_pretty_prints() {
        let dir = tempfile::tempdir().unwrap();
        let (logger, _console) = test_logger(&dir);
        let api = NewsApi::new("tok");
        let url = api.all_news_url("rust").unwrap();
        let fetcher = Arc::new(StubFetcher::default().ok(url.as_str(), r#"{"meta":{"found":1}}"#));
        let tool = NewsTool::new(logger, fetcher.clone(), api);

        let out = tool
            .call(&serde_json::json!({"query": "rust", "scope": "all"}))
            .unwrap();
        assert!(out.contains("\"found\": 1"));
        assert_eq!(fetcher.requested(), vec![url.to_string()]);
    }

    #[test]
    fn news_failure_returns_fixed_message() {
        let dir = tempfile::tempdir().unwrap();
        let (logger, console) = test_logger(&dir);
        let tool = NewsTool::new(logger, Arc::new(StubFetcher::default()), NewsApi::new("tok"));

        let out = tool.call(&serde_json::json!({"query": "rust"})).unwrap();
        assert_eq!(out, NEWS_ERROR);
        console.assert_contains(
            "ERROR - Error fetching news data: News fetch failed (caused by: HTTP 404 from ",
        );
        assert_eq!(console.output_string().matches("HTTP 404").count(), 1);
    }
}
