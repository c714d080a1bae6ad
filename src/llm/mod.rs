//! LLM access over the OpenAI-compatible chat-completions protocol.
//!
//! The agent only talks to the model through [`LlmClient`], so the runner can
//! be driven by a scripted client in tests.

mod client;

pub use client::ChatCompletionsClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// A single chat message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: Role,

    #[serde(default)]
    pub content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self::text(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::text(Role::User, content)
    }

    /// Reply to a tool call.
    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.into()),
        }
    }

    fn text(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCall {
    /// Some OpenAI-compatible providers leave this out.
    #[serde(default)]
    pub id: String,

    #[serde(rename = "type", default = "function_type")]
    pub call_type: String,

    pub function: FunctionCall,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionCall {
    pub name: String,

    /// JSON-encoded arguments, exactly as produced by the model.
    #[serde(default)]
    pub arguments: String,
}

fn function_type() -> String {
    "function".to_string()
}

/// Tool declaration sent with each request.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ToolDefinition {
    #[serde(rename = "type")]
    pub tool_type: &'static str,
    pub function: FunctionDefinition,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
}

impl ToolDefinition {
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
    ) -> Self {
        Self {
            tool_type: "function",
            function: FunctionDefinition {
                name: name.into(),
                description: description.into(),
                parameters: Some(parameters),
            },
        }
    }

    /// Declaration for a function that takes no arguments.
    pub fn function_without_parameters(
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            tool_type: "function",
            function: FunctionDefinition {
                name: name.into(),
                description: description.into(),
                parameters: None,
            },
        }
    }
}

/// Generation parameters for a model call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelSettings {
    pub temperature: f32,
    pub max_tokens: u32,
}

/// The assistant's reply to one chat-completions call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatResponse {
    pub content: Option<String>,
    pub tool_calls: Option<Vec<ToolCall>>,
    pub finish_reason: Option<String>,
}

/// Anything that can answer a chat-completions request.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn chat_completion(
        &self,
        model: &str,
        messages: &[ChatMessage],
        tools: Option<&[ToolDefinition]>,
        settings: &ModelSettings,
    ) -> anyhow::Result<ChatResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tool_reply_serializes_with_call_id() {
        let msg = ChatMessage::tool("call_1", "No search results found.");
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({
                "role": "tool",
                "content": "No search results found.",
                "tool_call_id": "call_1"
            })
        );
    }

    #[test]
    fn user_message_omits_tool_fields() {
        let value = serde_json::to_value(ChatMessage::user("hi")).unwrap();
        assert_eq!(value, json!({ "role": "user", "content": "hi" }));
    }

    #[test]
    fn tool_call_defaults_type_when_missing() {
        let call: ToolCall = serde_json::from_value(json!({
            "id": "abc",
            "function": { "name": "web_search", "arguments": "{\"query\":\"rust\"}" }
        }))
        .unwrap();

        assert_eq!(call.call_type, "function");
        assert_eq!(call.function.name, "web_search");
    }

    #[test]
    fn tool_call_without_id_still_decodes() {
        let call: ToolCall = serde_json::from_value(json!({
            "type": "function",
            "function": { "name": "get_user_info", "arguments": "{}" }
        }))
        .unwrap();

        assert_eq!(call.id, "");
        assert_eq!(call.function.name, "get_user_info");
    }

    #[test]
    fn argumentless_tool_omits_parameters() {
        let def = ToolDefinition::function_without_parameters("get_user_info", "who is asking");
        assert_eq!(
            serde_json::to_value(&def).unwrap(),
            json!({
                "type": "function",
                "function": { "name": "get_user_info", "description": "who is asking" }
            })
        );
    }
}
