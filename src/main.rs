use clap::Parser;
use tracing::info;

use db_drain::config::{Cli, Config};
use db_drain::drain_client::DrainClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if it exists so DRAIN_* variables can stand in for flags
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn,db_drain=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Exits with 0 on --help, 2 on bad arguments, before any connection exists
    let config = Config::from(Cli::parse());
    info!("Draining service at {}", config.target());

    let client = DrainClient::new(&config)?;
    let reports = client.drain_all().await?;
    client.close();

    for report in &reports {
        info!(
            collection = %report.collection,
            deleted = report.deleted,
            passes = report.passes,
            failed_deletes = report.failed_deletes,
            "collection drained"
        );
    }

    println!("{}", config.completion_message());

    Ok(())
}
