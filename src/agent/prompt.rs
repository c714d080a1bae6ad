//! System prompt templates for the research agent.

use crate::tools::ToolRegistry;

/// Persona instructions for the deep search agent.
pub const RESEARCH_INSTRUCTIONS: &str = r#"You are a careful research assistant that answers questions through several targeted web searches.

1. **Break the question down** - Turn the user's question into 2-3 specific sub-questions or search queries.

2. **Search for each one** - Call the `web_search` tool once per sub-question. Never settle for a single search.

3. **Synthesize** - Merge what the searches returned into one complete, well-structured and accurate answer.

4. **Cite sources** - List the URLs you relied on, preferring the most relevant and reliable ones."#;

/// Build the system prompt from the agent instructions and registered tools.
pub fn build_system_prompt(instructions: &str, tools: &ToolRegistry) -> String {
    let tool_descriptions = tools
        .list_tools()
        .iter()
        .map(|t| format!("- **{}**: {}", t.name, t.description))
        .collect::<Vec<_>>()
        .join("\n");

    if tool_descriptions.is_empty() {
        return instructions.to_string();
    }

    format!(
        "{instructions}\n\n## Available Tools\n{tool_descriptions}",
        instructions = instructions,
        tool_descriptions = tool_descriptions
    )
}
