//! Weather and news tool server.
//!
//! - [`Server`] holds the registered tools and dispatches calls by name
//! - [`tools`] implements `get_current_weather` and `search_news`
//! - [`fetch`] is the outbound HTTP boundary, mockable through [`Fetch`]
//! - [`config`] layers defaults, a TOML file and the environment
//!
//! Every tool receives a [`wxmcp_logging::Logger`] handle at construction
//! and logs entry and failures through it.

#![forbid(unsafe_code)]

mod builder;
pub mod config;
pub mod fetch;
pub mod handler;
pub mod news;
mod router;
pub mod tools;

pub use builder::{Server, ServerBuilder, ServerInfo};
pub use config::{ConfigError, ServerConfig};
pub use fetch::{Fetch, FetchError, HttpFetcher};
pub use handler::{ToolDefinition, ToolError, ToolHandler};
pub use news::{NewsApi, NewsEndpoint, NewsError};
pub use router::Router;
