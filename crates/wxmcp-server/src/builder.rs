//! Server builder and the assembled server.

use std::sync::Arc;

use serde::Serialize;
use wxmcp_logging::{Logger, info};

use crate::config::ServerConfig;
use crate::fetch::Fetch;
use crate::handler::{ToolDefinition, ToolError, ToolHandler};
use crate::news::NewsApi;
use crate::router::Router;
use crate::tools::{NewsTool, WeatherTool};

/// Default port reported by the server.
const DEFAULT_PORT: u16 = 8000;

/// Server name and version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerInfo {
    /// Server name.
    pub name: String,
    /// Server version.
    pub version: String,
}

/// Builder for configuring a server.
pub struct ServerBuilder {
    info: ServerInfo,
    router: Router,
    port: u16,
}

impl ServerBuilder {
    /// Creates a new server builder.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            info: ServerInfo {
                name: name.into(),
                version: version.into(),
            },
            router: Router::new(),
            port: DEFAULT_PORT,
        }
    }

    /// Sets the port.
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Registers a tool handler.
    #[must_use]
    pub fn tool<H: ToolHandler + 'static>(mut self, handler: H) -> Self {
        self.router.add_tool(handler);
        self
    }

    /// Builds the server.
    #[must_use]
    pub fn build(self) -> Server {
        Server {
            info: self.info,
            router: self.router,
            port: self.port,
        }
    }
}

/// A server with its registered tools.
#[derive(Debug)]
pub struct Server {
    info: ServerInfo,
    router: Router,
    port: u16,
}

impl Server {
    /// Creates a builder.
    #[must_use]
    pub fn builder(name: impl Into<String>, version: impl Into<String>) -> ServerBuilder {
        ServerBuilder::new(name, version)
    }

    /// Builds the server described by `config`.
    ///
    /// `get_current_weather` is always registered; `search_news` only when a
    /// news API key is configured.
    pub fn from_config(config: &ServerConfig, logger: &Logger, fetcher: Arc<dyn Fetch>) -> Server {
        info!(logger, "Initializing MCP Server (port={})", config.port);

        let weather = WeatherTool::new(logger.clone(), Arc::clone(&fetcher))
            .with_base_url(config.weather_base_url.clone())
            .with_timeout(config.fetch_timeout());
        let mut builder = Server::builder("wxmcp", env!("CARGO_PKG_VERSION"))
            .port(config.port)
            .tool(weather);

        if let Some(key) = &config.news_api_key {
            let api = NewsApi::new(key.clone()).with_base_url(config.news_base_url.clone());
            builder = builder
                .tool(NewsTool::new(logger.clone(), fetcher, api).with_timeout(config.fetch_timeout()));
        }

        builder.build()
    }

    /// Server name and version.
    pub fn info(&self) -> &ServerInfo {
        &self.info
    }

    /// Configured port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Definitions of all registered tools.
    pub fn tools(&self) -> Vec<ToolDefinition> {
        self.router.tools()
    }

    /// Calls a tool by name.
    pub fn call_tool(&self, name: &str, arguments: &serde_json::Value) -> Result<String, ToolError> {
        self.router.call_tool(name, arguments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::stub::StubFetcher;
    use wxmcp_logging::testing::CaptureBuffer;
    use wxmcp_logging::{ConsoleStream, LogFacility};

    fn logger(dir: &tempfile::TempDir) -> (Logger, CaptureBuffer) {
        let console = CaptureBuffer::new();
        let facility = LogFacility::with_console(ConsoleStream::Capture(console.clone()));
        let logger = facility
            .get("server_test", dir.path().join("server.log"), "INFO")
            .unwrap();
        (logger, console)
    }

    #[test]
    fn builder_defaults() {
        let server = Server::builder("demo", "1.0").build();
        assert_eq!(server.info().name, "demo");
        assert_eq!(server.port(), 8000);
        assert!(server.tools().is_empty());
    }

    #[test]
    fn from_config_without_news_key_registers_weather_only() {
        let dir = tempfile::tempdir().unwrap();
        let (logger, console) = logger(&dir);
        let config = ServerConfig {
            port: 8123,
            ..ServerConfig::default()
        };

        let server = Server::from_config(&config, &logger, Arc::new(StubFetcher::default()));
        let names: Vec<_> = server.tools().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["get_current_weather"]);
        assert_eq!(server.port(), 8123);
        console.assert_contains("Initializing MCP Server (port=8123)");
    }

    #[test]
    fn from_config_with_news_key_registers_both() {
        let dir = tempfile::tempdir().unwrap();
        let (logger, _console) = logger(&dir);
        let config = ServerConfig {
            news_api_key: Some("tok".into()),
            weather_base_url: "http://weather.test".into(),
            ..ServerConfig::default()
        };
        let fetcher = Arc::new(StubFetcher::default().ok("http://weather.test/Oslo", "Snow"));

        let server = Server::from_config(&config, &logger, fetcher);
        let names: Vec<_> = server.tools().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["get_current_weather", "search_news"]);

        let out = server
            .call_tool("get_current_weather", &serde_json::json!({"city": "Oslo"}))
            .unwrap();
        assert_eq!(out, "Snow");
    }
}
