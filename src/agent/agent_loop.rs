//! Core agent loop implementation.

use std::sync::Arc;

use serde::Serialize;

use crate::llm::{ChatMessage, LlmClient, ModelSettings, Role, ToolCall};
use crate::tools::{ToolRegistry, UserContext};

use super::prompt::{build_system_prompt, RESEARCH_INSTRUCTIONS};

/// A named persona with fixed instructions, settings and tools.
pub struct AgentDefinition {
    pub name: String,
    pub instructions: String,
    pub model: String,
    pub settings: ModelSettings,
    pub tools: ToolRegistry,
}

impl AgentDefinition {
    /// The deep search research agent.
    pub fn deep_search(model: impl Into<String>, tools: ToolRegistry) -> Self {
        Self {
            name: "Deep Search Agent".to_string(),
            instructions: RESEARCH_INSTRUCTIONS.to_string(),
            model: model.into(),
            settings: ModelSettings {
                temperature: 0.3,
                max_tokens: 5000,
            },
            tools,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogEntryType {
    ToolCall,
    ToolResult,
    Response,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunLogEntry {
    pub timestamp: String,
    pub entry_type: LogEntryType,
    pub content: String,
}

/// Outcome of one agent run.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub final_output: String,
    pub log: Vec<RunLogEntry>,
}

impl RunResult {
    /// Number of tool calls made during the run.
    pub fn tool_calls(&self) -> usize {
        self.log
            .iter()
            .filter(|e| e.entry_type == LogEntryType::ToolCall)
            .count()
    }
}

/// Drives an agent: model call, tool calls, repeat until a text answer.
pub struct Runner {
    llm: Arc<dyn LlmClient>,
    max_turns: usize,
}

impl Runner {
    pub fn new(llm: Arc<dyn LlmClient>, max_turns: usize) -> Self {
        Self { llm, max_turns }
    }

    /// Run one question through the agent and return its final answer.
    ///
    /// Model errors propagate. Tool errors are reported back to the model as
    /// `Error: ...` tool messages.
    pub async fn run(
        &self,
        agent: &AgentDefinition,
        input: &str,
        ctx: &UserContext,
    ) -> anyhow::Result<RunResult> {
        let mut log = Vec::new();

        let system_prompt = build_system_prompt(&agent.instructions, &agent.tools);
        let mut messages = vec![ChatMessage::system(system_prompt), ChatMessage::user(input)];

        let tool_schemas = agent.tools.get_tool_schemas();

        for iteration in 0..self.max_turns {
            tracing::debug!("{} iteration {}", agent.name, iteration + 1);

            let response = self
                .llm
                .chat_completion(
                    &agent.model,
                    &messages,
                    Some(tool_schemas.as_slice()),
                    &agent.settings,
                )
                .await?;

            if let Some(tool_calls) = response.tool_calls.filter(|c| !c.is_empty()) {
                messages.push(ChatMessage {
                    role: Role::Assistant,
                    content: response.content.clone(),
                    tool_calls: Some(tool_calls.clone()),
                    tool_call_id: None,
                });

                for tool_call in &tool_calls {
                    log.push(RunLogEntry {
                        timestamp: now(),
                        entry_type: LogEntryType::ToolCall,
                        content: format!(
                            "Calling tool: {} with args: {}",
                            tool_call.function.name, tool_call.function.arguments
                        ),
                    });

                    let result_str = match self.execute_tool_call(agent, tool_call, ctx).await {
                        Ok(output) => output,
                        Err(e) => {
                            tracing::warn!("tool {} failed: {}", tool_call.function.name, e);
                            format!("Error: {}", e)
                        }
                    };

                    log.push(RunLogEntry {
                        timestamp: now(),
                        entry_type: LogEntryType::ToolResult,
                        content: truncate_for_log(&result_str, 1000),
                    });

                    messages.push(ChatMessage::tool(tool_call.id.clone(), result_str));
                }

                continue;
            }

            if let Some(content) = response.content {
                log.push(RunLogEntry {
                    timestamp: now(),
                    entry_type: LogEntryType::Response,
                    content: truncate_for_log(&content, 2000),
                });
                return Ok(RunResult {
                    final_output: content,
                    log,
                });
            }

            return Err(anyhow::anyhow!("LLM returned empty response"));
        }

        Err(anyhow::anyhow!(
            "Max turns ({}) reached without a final answer",
            self.max_turns
        ))
    }

    async fn execute_tool_call(
        &self,
        agent: &AgentDefinition,
        tool_call: &ToolCall,
        ctx: &UserContext,
    ) -> anyhow::Result<String> {
        tracing::info!("tool call: {}", tool_call.function.name);

        let args: serde_json::Value = serde_json::from_str(&tool_call.function.arguments)
            .unwrap_or(serde_json::Value::Null);

        agent.tools.execute(&tool_call.function.name, args, ctx).await
    }
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Truncate a string for logging purposes.
fn truncate_for_log(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... [truncated]", &s[..end])
}
