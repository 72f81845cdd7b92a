use clap::Parser;
use sentiment_server::logging::init_logging;
use sentiment_server::{server, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real deployments use the environment.
    let _ = dotenvy::dotenv();
    let config = ServerConfig::parse();

    init_logging();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting sentiment_server");

    server::run(config).await
}
