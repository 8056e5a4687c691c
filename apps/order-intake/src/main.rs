//! Order Intake Service
//!
//! Entry point for the storefront order intake service.
//!
//! # Usage
//!
//! ```text
//! order-intake [CONFIG_PATH]
//! ```
//!
//! `CONFIG_PATH` defaults to `config.yaml`. Values in the file may reference
//! environment variables as `${VAR}` or `${VAR:-default}`; a `.env` file in
//! the working directory or any ancestor is loaded first.
//!
//! # Endpoints
//!
//! - `GET  /health` - Liveness and version
//! - `POST /api/order/create` - Place an order from the caller's cart
//! - `GET  /metrics` - Prometheus metrics (separate port)

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;

use order_intake::application::use_cases::DispatchMode;
use order_intake::config::{Config, load_config};
use order_intake::infrastructure::config::Container;
use order_intake::infrastructure::http::create_router;
use order_intake::infrastructure::persistence::{InMemoryAccountStore, InMemoryCatalog};
use order_intake::observability::{
    MetricsConfig, TracingConfig, TracingGuard, init_metrics, init_tracing,
};

/// Time allowed for the outbox relay to stop after shutdown is signalled.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    let config_path = std::env::args().nth(1);
    let config = load_config(config_path.as_deref()).context("failed to load configuration")?;

    let tracing_guard = init_observability(&config)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        mode = ?config.dispatcher.mode,
        fee_rate = %config.pricing.fee_rate,
        "Starting order intake"
    );

    let container = Container::<InMemoryCatalog, InMemoryAccountStore>::from_config(&config)
        .context("failed to build application container")?;

    let shutdown_token = CancellationToken::new();

    let relay_handle = (container.mode() == DispatchMode::Outbox).then(|| {
        let relay = Arc::new(container.outbox_relay());
        let token = shutdown_token.clone();
        tokio::spawn(async move { relay.run(token).await })
    });

    let app = create_router(container.app_state(env!("CARGO_PKG_VERSION")));

    let http_addr: SocketAddr = format!(
        "{}:{}",
        config.server.bind_address, config.server.http_port
    )
    .parse()
    .context("invalid server bind address")?;

    let listener = TcpListener::bind(http_addr)
        .await
        .with_context(|| format!("failed to bind {http_addr}"))?;

    tracing::info!(%http_addr, "HTTP server listening");
    tracing::info!("  GET  /health");
    tracing::info!("  POST /api/order/create");

    let server_token = shutdown_token.clone();
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            server_token.cancel();
        })
        .await;

    if let Err(e) = served {
        tracing::error!(error = %e, "HTTP server error");
    }

    // Stop background tasks even when the server exited on its own
    shutdown_token.cancel();

    if let Some(handle) = relay_handle {
        match tokio::time::timeout(SHUTDOWN_TIMEOUT, handle).await {
            Ok(Ok(())) => tracing::info!("Outbox relay stopped"),
            Ok(Err(e)) => tracing::error!(error = %e, "Outbox relay task failed"),
            Err(_) => tracing::warn!(
                timeout_secs = SHUTDOWN_TIMEOUT.as_secs(),
                "Outbox relay did not stop in time"
            ),
        }
    }

    tracing::info!("Order intake stopped");
    tracing_guard.shutdown();
    Ok(())
}

/// Install the tracing subscriber and, when enabled, the metrics exporter.
fn init_observability(config: &Config) -> anyhow::Result<TracingGuard> {
    let settings = &config.observability;

    let mut tracing_config = TracingConfig {
        level: settings.logging.level.clone(),
        ..TracingConfig::default()
    }
    .format(settings.logging.format);
    if settings.otel.enabled {
        tracing_config = tracing_config.with_endpoint(&settings.otel.endpoint);
    }
    let guard = init_tracing(&tracing_config).context("failed to initialize tracing")?;

    if settings.metrics.enabled {
        let metrics_addr: SocketAddr =
            format!("{}:{}", config.server.bind_address, settings.metrics.port)
                .parse()
                .context("invalid metrics bind address")?;
        init_metrics(&MetricsConfig::with_addr(metrics_addr))
            .context("failed to initialize metrics")?;
    }

    Ok(guard)
}

/// Load .env from the current directory or the nearest ancestor that has one.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        for dir in cwd.ancestors().skip(1) {
            let env_path = dir.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
        }
    }
}

/// Wait for SIGINT or SIGTERM.
///
/// If a handler cannot be installed, that branch never completes and the
/// other signal still triggers shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }

    tracing::info!(
        timeout_secs = SHUTDOWN_TIMEOUT.as_secs(),
        "Graceful shutdown started"
    );
}
