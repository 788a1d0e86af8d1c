//! Payletter payment gateway command-line tool.
//!
//! # Usage
//!
//! ```bash
//! # List today's transactions with payletter.toml in the current directory
//! payletter history --date 20240101
//!
//! # Run against the test gateway with a custom config path
//! PAYLETTER_ENV=test CONFIG=/path/to/payletter.toml payletter methods --user-id 12345
//!
//! # Configure logging level
//! RUST_LOG=debug payletter cancel --pgcode creditcard --user-id 12345 --tid TX0001
//! ```
//!
//! # Environment Variables
//!
//! - `CONFIG` — Path to TOML configuration file (default: `payletter.toml`)
//! - `PAYLETTER_ENV` — Override the gateway environment (`production`, `test`)
//! - `RUST_LOG` — Log level filter (default: `info`)
//!
//! Results are printed to stdout as JSON; logs go to stderr.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use payletter_cli::{Cli, CliConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::load_from(&cli.config)?;
    tracing::info!(
        environment = ?config.environment,
        client_id = %config.client_id,
        command = cli.command.name(),
        "Loaded configuration"
    );

    let client = config.client()?;
    let output = cli.command.execute(&client, client.credentials()).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
