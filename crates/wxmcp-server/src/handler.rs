//! Tool handler trait and argument helpers.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Description of a callable tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// JSON schema of the arguments object.
    pub input_schema: serde_json::Value,
}

/// Errors raised while dispatching a tool call.
#[derive(Debug)]
pub enum ToolError {
    /// No tool registered under this name.
    NotFound(String),
    /// Arguments did not match the tool's schema.
    InvalidArguments {
        /// Tool name.
        tool: String,
        /// Deserialization failure.
        source: serde_json::Error,
    },
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolError::NotFound(name) => write!(f, "Tool not found: {name}"),
            ToolError::InvalidArguments { tool, source } => {
                write!(f, "Invalid arguments for {tool}: {source}")
            }
        }
    }
}

impl std::error::Error for ToolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ToolError::NotFound(_) => None,
            ToolError::InvalidArguments { source, .. } => Some(source),
        }
    }
}

/// Handler for a tool.
///
/// Downstream failures (a failed fetch) are not errors: the handler logs
/// them and returns a plain-text error message as its result.
pub trait ToolHandler: Send + Sync {
    /// Returns the tool definition.
    fn definition(&self) -> ToolDefinition;

    /// Runs the tool with structured arguments.
    fn call(&self, arguments: &serde_json::Value) -> Result<String, ToolError>;
}

/// Boxed tool handler.
pub type BoxedToolHandler = Box<dyn ToolHandler>;

/// Deserializes tool arguments into `T`.
pub fn parse_arguments<T: DeserializeOwned>(
    tool: &str,
    arguments: &serde_json::Value,
) -> Result<T, ToolError> {
    T::deserialize(arguments).map_err(|source| ToolError::InvalidArguments {
        tool: tool.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct CityArgs {
        city: String,
    }

    #[test]
    fn parse_arguments_reports_tool_name() {
        let ok: CityArgs = parse_arguments("weather", &serde_json::json!({"city": "Oslo"})).unwrap();
        assert_eq!(ok.city, "Oslo");

        let err = parse_arguments::<CityArgs>("weather", &serde_json::json!({})).unwrap_err();
        assert!(err.to_string().starts_with("Invalid arguments for weather:"));
    }

    #[test]
    fn definition_serializes_camel_case() {
        let def = ToolDefinition {
            name: "t".into(),
            description: "d".into(),
            input_schema: serde_json::json!({"type": "object"}),
        };
        let value = serde_json::to_value(&def).unwrap();
        assert_eq!(value["inputSchema"]["type"], "object");
    }
}
