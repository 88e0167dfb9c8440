pub mod agent;
pub mod cli;
pub mod config;
pub mod history;
pub mod llm;
pub mod models;
pub mod rag;
pub mod server;
pub mod topic;

use agent::ChatAgent;
use cli::Args;
use config::settings::ServiceConfig;
use llm::fallback::ModelFallbackRunner;
use llm::gemini::GeminiChatClient;
use log::info;
use server::Server;
use std::error::Error;
use std::sync::Arc;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    let config = ServiceConfig::from_args(&args)?;

    info!("--- Core Configuration ---");
    info!("Server Address: {}", config.server_addr);
    info!("Chat Base URL: {}", config.base_url);
    info!("Chat Models (fallback order): {}", config.models.join(" → "));
    info!("Max Output Tokens: {}", config.generation.max_output_tokens);
    info!("Temperature: {}", config.generation.temperature);
    info!(
        "CORS Origins: {}",
        config.cors_origins
            .iter()
            .filter_map(|o| o.to_str().ok())
            .collect::<Vec<_>>()
            .join(", ")
    );
    info!("Rate Limit: {} req/s", config.rate_limit_per_second);
    info!("TLS Enabled: {}", config.tls.is_some());
    info!("-------------------------");

    let client = Arc::new(GeminiChatClient::new(&config.api_key, &config.base_url)?);
    let runner = ModelFallbackRunner::new(client, config.models.clone(), config.generation);
    let agent = Arc::new(ChatAgent::new(runner));

    let server = Server::new(agent, config);
    server.run().await?;

    Ok(())
}
