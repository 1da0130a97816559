use analytics_service::MemoryEventSink;
use anyhow::{Context, Result};
use clap::Parser;
use provider::{BackendKind, DataProvider, ProviderConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use views::SessionStore;

mod routes;

#[derive(Parser, Debug)]
struct CliArgs {
    /// The address to listen on.
    #[clap(long, env = "SERVER_ADDR", default_value = "127.0.0.1:3000")]
    pub addr: SocketAddr,

    /// Backend serving the data (mock or api). Takes precedence over DATA_PROVIDER.
    #[clap(long)]
    pub provider: Option<BackendKind>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let mut config = ProviderConfig::from_env()?;
    if let Some(backend) = cli_args.provider {
        config.backend = backend;
    }
    info!(
        backend = %config.backend,
        latency_scale = config.latency_scale,
        failure_rate = config.failure_rate,
        "Loaded provider configuration"
    );

    let sink = Arc::new(MemoryEventSink::new());
    let provider = DataProvider::from_config(&config, sink);

    let session = Arc::new(SessionStore::new());
    match session.refresh(provider.auth()).await {
        Ok(Some(current)) => info!(user = %current.user.username, "Signed in"),
        Ok(None) => info!("No active session"),
        Err(err) => warn!(error = %err, "Session lookup failed, continuing signed out"),
    }

    let app = routes::create_router(routes::AppState::new(provider, session));
    let listener = tokio::net::TcpListener::bind(cli_args.addr)
        .await
        .with_context(|| format!("Failed to bind {}", cli_args.addr))?;
    info!("Server listening on {}", cli_args.addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
