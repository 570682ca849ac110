use anyhow::Result;
use fpico_web::{config::Config, server};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fpico_web=info".parse()?),
        )
        .init();

    info!("Server executing from: {}", std::env::current_dir()?.display());

    let config = Config::from_env()?;
    server::run(config).await
}
