//! Sends one question to the research agent and prints the answer.
//!
//! Uses the same environment configuration as the API server.

use anyhow::{Context, bail};
use clap::Parser;
use mind_search_api::config::Config;
use mind_search_core::{AgentClient, GatewayAgent};
use tracing::info;

#[derive(Parser, Debug)]
#[command(version, about = "Ask the Mind Search research agent a single question")]
struct Args {
    /// The question; multiple words are joined with spaces.
    #[arg(required = true)]
    query: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let query = args.query.join(" ");
    if query.trim().is_empty() {
        bail!("The question must not be empty");
    }

    let agent = GatewayAgent::new(&config.gateway_settings())
        .context("Failed to construct the research agent")?;
    info!(model = %agent.model(), "Running agent");

    let answer = agent
        .invoke(&query)
        .await
        .context("The research agent failed")?;
    println!("{}", answer.into_text());
    Ok(())
}
