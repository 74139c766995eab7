//!
//! bourse server binary
//! --------------------
//! Command-line entry point for the securities directory HTTP server. Configuration comes
//! from flags and environment variables; flags win.

use anyhow::Result;
use std::env;

use bourse::config::{has_flag, ServerConfig, USAGE};

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if has_flag(&args, "--help") || has_flag(&args, "-h") {
        println!("{USAGE}");
        return Ok(());
    }

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();

    let config = ServerConfig::from_env_and_args(&args);
    println!("bourse starting on http://{}", config.bind_addr());
    tracing::info!(target: "startup", "config: {:?}", config);

    bourse::server::run_with_config(config).await
}
