//! Chat-completions client for OpenAI-compatible providers.

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{ChatMessage, ChatResponse, LlmClient, ModelSettings, ToolCall, ToolDefinition};

/// Client for any provider exposing `POST {base}/chat/completions`.
pub struct ChatCompletionsClient {
    http: reqwest::Client,
    api_key: String,
    completions_url: String,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [ToolDefinition]>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatCompletionBody {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: AssistantMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ToolCall>>,
}

impl ChatCompletionsClient {
    pub fn new(api_key: String, base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            completions_url: completions_url(base_url),
        }
    }
}

/// Join a base URL and the completions path, tolerating a trailing slash.
fn completions_url(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

#[async_trait]
impl LlmClient for ChatCompletionsClient {
    async fn chat_completion(
        &self,
        model: &str,
        messages: &[ChatMessage],
        tools: Option<&[ToolDefinition]>,
        settings: &ModelSettings,
    ) -> anyhow::Result<ChatResponse> {
        let request = ChatCompletionRequest {
            model,
            messages,
            tools: tools.filter(|t| !t.is_empty()),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        };

        tracing::debug!(
            "chat completion: model={} messages={}",
            model,
            messages.len()
        );

        let response = self
            .http
            .post(&self.completions_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("chat completion request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("LLM provider error {}: {}", status, body));
        }

        let body: ChatCompletionBody = response
            .json()
            .await
            .context("failed to decode chat completion response")?;

        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("LLM provider returned no choices"))?;

        Ok(ChatResponse {
            content: choice.message.content,
            tool_calls: choice.message.tool_calls,
            finish_reason: choice.finish_reason,
        })
    }
}
