//! Deep Search - interactive entry point.
//!
//! Loads configuration, wires the LLM and search clients into the research
//! agent, and runs the question/answer loop on stdin/stdout.

use std::path::Path;
use std::sync::Arc;

use deep_search::{
    agent::{AgentDefinition, Runner},
    cli::{self, ResearchSession},
    config::Config,
    llm::ChatCompletionsClient,
    search::TavilyClient,
    tools::ToolRegistry,
};
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so the rendered answer on stdout stays clean.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "deep_search=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env_and_file(Path::new(".env"))?;
    info!("Loaded configuration: model={}", config.model);

    let llm = Arc::new(ChatCompletionsClient::new(
        config.llm_api_key.clone(),
        &config.llm_base_url,
    ));
    let search = Arc::new(TavilyClient::new(
        config.tavily_api_key.clone(),
        &config.tavily_base_url,
    ));

    let agent = AgentDefinition::deep_search(&config.model, ToolRegistry::with_defaults(search));
    let session = ResearchSession::new(
        Runner::new(llm, config.max_turns),
        agent,
        config.user.clone(),
    );

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    cli::run_loop(stdin, &mut stdout, &session, config.stream_delay).await
}
