//! Agent module - the research agent and the loop that drives it.
//!
//! The agent follows a "tools in a loop" pattern:
//! 1. Build context with the system prompt and the user's question
//! 2. Call the LLM with the available tools
//! 3. If the LLM requests tool calls, execute them and feed the results back
//! 4. Repeat until the LLM produces a final answer or max turns is reached

mod agent_loop;
mod prompt;

pub use agent_loop::{AgentDefinition, LogEntryType, RunLogEntry, RunResult, Runner};
pub use prompt::{build_system_prompt, RESEARCH_INSTRUCTIONS};
