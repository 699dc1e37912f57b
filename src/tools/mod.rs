//! Tools the research agent can call.
//!
//! Every tool takes a single string and returns a string. Failures never
//! escape a tool: they come back as descriptive text so the model can read
//! them and adjust. The [`ToolRegistry`] dispatches by name, so adding a tool
//! means registering another [`Tool`] implementation.

mod save;
mod search;
mod wikipedia;

pub use save::SaveTool;
pub use search::SearchTool;
pub use wikipedia::WikipediaTool;

use crate::config::ToolSettings;
use crate::error::{Result, ScoutError};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// A function definition advertised to the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Capability interface implemented by every tool.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name the model uses to call this tool.
    fn name(&self) -> &str;

    /// What the tool does, shown to the model.
    fn description(&self) -> &str;

    /// JSON schema for the tool's arguments.
    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "input": {
                    "type": "string",
                    "description": "The input for this tool"
                }
            },
            "required": ["input"]
        })
    }

    /// Run the tool. Errors are reported in the returned text.
    async fn invoke(&self, input: &str) -> String;
}

/// Fixed set of tools, looked up by name.
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    by_name: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn empty() -> Self {
        Self {
            tools: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create the default registry: web search, Wikipedia, and file save.
    pub fn from_settings(settings: &ToolSettings, output_file: PathBuf) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|e| ScoutError::Config(format!("Failed to create HTTP client: {}", e)))?;

        let registry = Self::empty()
            .with_tool(Arc::new(SearchTool::new(http.clone())))
            .with_tool(Arc::new(WikipediaTool::new(
                http,
                settings.wikipedia_top_k,
                settings.wikipedia_chars_max,
            )))
            .with_tool(Arc::new(SaveTool::new(output_file)));

        Ok(registry)
    }

    /// Register a tool. A later tool with the same name replaces the earlier one.
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        let name = tool.name().to_string();
        match self.by_name.get(&name) {
            Some(&index) => self.tools[index] = tool,
            None => {
                self.by_name.insert(name, self.tools.len());
                self.tools.push(tool);
            }
        }
        self
    }

    /// Names of the registered tools, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Definitions of all registered tools, in registration order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|t| ToolDefinition {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: t.parameters_schema(),
            })
            .collect()
    }

    /// Dispatch a call by name. Unknown names come back as a tool error string.
    pub async fn invoke(&self, name: &str, arguments: &str) -> String {
        let Some(&index) = self.by_name.get(name) else {
            info!("Model requested unknown tool: {}", name);
            return format!(
                "Unknown tool: {}. Available tools: {}",
                name,
                self.names().join(", ")
            );
        };

        let input = tool_input(arguments);
        debug!("Invoking {} with input: {}", name, input);
        self.tools[index].invoke(&input).await
    }
}

/// Extract the single string argument from the model's JSON arguments.
///
/// Reads `input`, then the first string property, then the raw text when the
/// arguments are not a JSON object.
pub fn tool_input(arguments: &str) -> String {
    match serde_json::from_str::<Value>(arguments) {
        Ok(Value::Object(map)) => map
            .get("input")
            .and_then(Value::as_str)
            .or_else(|| map.values().find_map(Value::as_str))
            .unwrap_or_default()
            .to_string(),
        Ok(Value::String(s)) => s,
        _ => arguments.to_string(),
    }
}
