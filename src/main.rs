use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use docsmith::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    docsmith::run(cli).await
}
