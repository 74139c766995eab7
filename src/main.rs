use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use bourse::config::{ServerConfig, ENV_BIND_HOST, ENV_HTTP_PORT};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    // Startup banner at info level so something always prints at default verbosity
    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "<unset>".to_string());
    let config = ServerConfig::from_env();
    info!(
        target: "bourse",
        "bourse starting: RUST_LOG='{}', {}={:?}, {}={:?}, addr={}",
        rust_log,
        ENV_HTTP_PORT,
        std::env::var(ENV_HTTP_PORT).ok(),
        ENV_BIND_HOST,
        std::env::var(ENV_BIND_HOST).ok(),
        config.bind_addr()
    );

    bourse::server::run_with_config(config).await
}
