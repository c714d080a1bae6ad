//! # Deep Search
//!
//! A command-line research assistant. A question is handed to an LLM agent
//! that splits it into sub-queries, searches the web for each one through
//! Tavily, and writes a cited answer.
//!
//! ## Architecture
//!
//! The agent follows the "tools in a loop" pattern:
//! 1. Read a question from the interactive loop
//! 2. Build context with the research instructions and available tools
//! 3. Call the LLM, execute any tool calls it requests
//! 4. Feed results back to the LLM, repeat until it answers in plain text
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use deep_search::{agent::{AgentDefinition, Runner}, llm::ChatCompletionsClient,
//!     search::TavilyClient, tools::ToolRegistry, Config};
//!
//! let config = Config::from_env()?;
//! let llm = Arc::new(ChatCompletionsClient::new(config.llm_api_key.clone(), &config.llm_base_url));
//! let search = Arc::new(TavilyClient::new(config.tavily_api_key.clone(), &config.tavily_base_url));
//! let agent = AgentDefinition::deep_search(&config.model, ToolRegistry::with_defaults(search));
//! let result = Runner::new(llm, config.max_turns)
//!     .run(&agent, "How do tokio and async-std differ?", &config.user)
//!     .await?;
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod llm;
pub mod search;
pub mod tools;

pub use config::Config;
