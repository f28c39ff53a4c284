use anyhow::{Context, Result};
use block_query::{api, config::Config, schema};
use std::env;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

#[tokio::main]
async fn main() -> Result<()> {
    install_tracing();

    let config = Config::load().context("failed to load configuration")?;
    let blocks = schema::load_blocks(&config.schema_path)
        .with_context(|| format!("failed to load {}", config.schema_path.display()))?;
    if blocks.is_empty() {
        warn!(path = %config.schema_path.display(), "schema declares no blocks");
    }

    let app = api::create_router(Arc::new(blocks));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}

/// INFO unless `directives` (the RUST_LOG value) say otherwise.
fn log_filter(directives: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(directives)
}

fn install_tracing() {
    let directives = env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter(&directives))
        .with_target(false)
        .compact()
        .try_init();
}
