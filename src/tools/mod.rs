//! Tools the agent may call.
//!
//! Every tool declares its arguments as a static [`ToolParam`] slice. The JSON
//! schema sent to the model is derived from that slice, so what the model sees
//! and what `execute` accepts come from one place.

mod user;
mod web;

pub use user::{GetUserInfo, UserContext};
pub use web::WebSearch;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::llm::ToolDefinition;
use crate::search::SearchProvider;

/// JSON type of a tool argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    String,
    Integer,
}

impl ParamType {
    fn as_json_type(self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Integer => "integer",
        }
    }
}

/// Default value of an optional argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamDefault {
    Integer(i64),
}

/// Static description of one tool argument.
#[derive(Debug, Clone, Copy)]
pub struct ToolParam {
    pub name: &'static str,
    pub param_type: ParamType,
    pub description: &'static str,
    pub required: bool,
    pub default: Option<ParamDefault>,
}

/// Build a JSON schema object from a parameter list.
pub fn params_to_schema(params: &[ToolParam]) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for p in params {
        let mut prop = json!({
            "type": p.param_type.as_json_type(),
            "description": p.description,
        });
        if let Some(ParamDefault::Integer(n)) = p.default {
            prop["default"] = json!(n);
        }
        properties.insert(p.name.to_string(), prop);
        if p.required {
            required.push(p.name);
        }
    }

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

/// A callable exposed to the model.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn params(&self) -> &'static [ToolParam];

    fn parameters_schema(&self) -> Value {
        params_to_schema(self.params())
    }

    /// Run the tool with model-supplied arguments and the session context.
    async fn execute(&self, args: Value, ctx: &UserContext) -> anyhow::Result<String>;
}

/// Name and description of a registered tool.
#[derive(Debug, Clone)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
}

/// Registered tools, looked up by name.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    order: Vec<String>,
}

impl ToolRegistry {
    pub fn empty() -> Self {
        Self {
            tools: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// The research toolset: web search plus the user-context tool.
    pub fn with_defaults(search: Arc<dyn SearchProvider>) -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(WebSearch::new(search)));
        registry.register(Arc::new(GetUserInfo));
        registry
    }

    /// Add a tool, replacing any tool with the same name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        if self.tools.insert(name.clone(), tool).is_none() {
            self.order.push(name);
        }
    }

    /// Tools in registration order.
    pub fn list_tools(&self) -> Vec<ToolInfo> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|t| ToolInfo {
                name: t.name().to_string(),
                description: t.description().to_string(),
            })
            .collect()
    }

    pub fn get_tool_schemas(&self) -> Vec<ToolDefinition> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|t| {
                if t.params().is_empty() {
                    ToolDefinition::function_without_parameters(t.name(), t.description())
                } else {
                    ToolDefinition::function(t.name(), t.description(), t.parameters_schema())
                }
            })
            .collect()
    }

    pub async fn execute(
        &self,
        name: &str,
        args: Value,
        ctx: &UserContext,
    ) -> anyhow::Result<String> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown tool: {}", name))?;
        tool.execute(args, ctx).await
    }
}
