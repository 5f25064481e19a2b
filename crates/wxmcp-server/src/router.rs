//! Tool call router.

use std::collections::HashMap;

use log::debug;

use crate::handler::{BoxedToolHandler, ToolDefinition, ToolError, ToolHandler};

/// Routes tool calls to registered handlers by name.
#[derive(Default)]
pub struct Router {
    tools: HashMap<String, BoxedToolHandler>,
}

impl Router {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a tool handler, replacing any tool with the same name.
    pub fn add_tool<H: ToolHandler + 'static>(&mut self, handler: H) {
        let def = handler.definition();
        self.tools.insert(def.name, Box::new(handler));
    }

    /// Definitions of all tools, sorted by name.
    pub fn tools(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<_> = self.tools.values().map(|h| h.definition()).collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    /// Number of registered tools.
    pub fn tools_count(&self) -> usize {
        self.tools.len()
    }

    /// Calls the tool named `name`.
    pub fn call_tool(&self, name: &str, arguments: &serde_json::Value) -> Result<String, ToolError> {
        debug!(target: "wxmcp::router", "Calling tool: {}", name);
        let handler = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        handler.call(arguments)
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.tools.keys().collect();
        names.sort();
        f.debug_struct("Router").field("tools", &names).finish()
    }
}
