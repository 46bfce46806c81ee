//! airrank-engine - airline on-time reliability rankings
//!
//! Loads airline records from the rankings backend (or generated demo data),
//! keeps filter and sort state, and serves the ranked view, summary and
//! destination cascade over HTTP.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use airrank_common::config::{load_config, resolve_config_path, TomlConfig};
use airrank_engine::controller::{ControllerOptions, RankingController, DEFAULT_EVENT_CAPACITY};
use airrank_engine::projector::FilterMode;
use airrank_engine::refresh::spawn_refresh_task;
use airrank_engine::source::http::HttpEndpoints;
use airrank_engine::source::{HttpRankingSource, MockRankingSource, RankingSource};
use airrank_engine::{build_router, AppState};
use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for airrank-engine
#[derive(Parser, Debug)]
#[command(name = "airrank-engine")]
#[command(about = "Airline on-time reliability ranking engine")]
#[command(version)]
struct Args {
    /// Config file (overrides AIRRANK_CONFIG and the default location)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Rankings endpoint URL
    #[arg(short, long, env = "AIRRANK_ENDPOINT")]
    endpoint: Option<String>,

    /// Serve generated demo data instead of calling the backend
    #[arg(long)]
    mock: bool,

    /// HTTP listen address
    #[arg(short, long, env = "AIRRANK_BIND")]
    bind: Option<String>,

    /// Auto-refresh interval in seconds
    #[arg(long)]
    refresh_secs: Option<u64>,
}

impl Args {
    /// Command-line values take priority over the config file
    fn apply_to(&self, config: &mut TomlConfig) {
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if self.mock {
            config.mock_data = true;
        }
        if let Some(bind) = &self.bind {
            config.bind_address = bind.clone();
        }
        if let Some(secs) = self.refresh_secs {
            config.refresh_interval_secs = secs;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Tracing is configured from the file's log level, so the file is read first
    let loaded = load_config(args.config.as_deref());
    let log_level = loaded
        .as_ref()
        .map(|c| c.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{},tower_http=info", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Build identification is always the first line
    info!(
        "Starting airrank-engine v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let mut config = loaded.context("Failed to load configuration")?;
    match resolve_config_path(args.config.as_deref()) {
        Some(path) => info!("Config file: {}", path.display()),
        None => info!("No config file found, using defaults"),
    }
    args.apply_to(&mut config);
    config.validate().context("Invalid configuration")?;

    let source: Arc<dyn RankingSource> = if config.mock_data {
        warn!(
            latency_ms = config.mock_latency_ms,
            "Demo mode: serving generated data, backend is not contacted"
        );
        Arc::new(MockRankingSource::new(Duration::from_millis(config.mock_latency_ms)))
    } else {
        let endpoints = HttpEndpoints::parse(
            &config.endpoint,
            &config.destinations_endpoint,
            &config.airlines_endpoint,
        )?;
        info!("Rankings endpoint: {}", endpoints.rankings);
        Arc::new(HttpRankingSource::new(endpoints)?)
    };

    let filter_mode = if config.effective_client_side_filtering() {
        FilterMode::Client
    } else {
        FilterMode::Backend
    };
    info!(?filter_mode, source = source.source_id(), "Ranking controller configured");

    let controller = Arc::new(RankingController::new(
        source,
        ControllerOptions {
            filter_mode,
            filter_defaults: config.filters.clone(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        },
    ));

    // Initial load runs in the background so the server answers immediately
    let initial = Arc::clone(&controller);
    tokio::spawn(async move {
        initial.initialize().await;
    });

    let cancel = CancellationToken::new();
    let refresh = spawn_refresh_task(
        Arc::clone(&controller),
        Duration::from_secs(config.refresh_interval_secs),
        cancel.clone(),
    );

    let app = build_router(AppState::new(controller));

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_address))?;
    info!("airrank-engine listening on http://{}", config.bind_address);
    info!("Health check: http://{}/health", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    cancel.cancel();
    if let Err(e) = refresh.await {
        error!("Refresh task ended abnormally: {}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
