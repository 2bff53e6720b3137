//! Auth API binary

use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

use sentra_auth_api::{app, build_state, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting Sentra Auth API");

    let config = Config::from_env()?;
    let http_port = config.http_port;

    let state = build_state(config)?;
    let router = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], http_port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
