use std::net::SocketAddr;

use anyhow::Context;
use dotenvy::dotenv;
use dvdrental::logging::{init_tracing, shutdown_tracer};
use dvdrental::metrics::{init_metrics, metrics_app};
use dvdrental::router::init_router;
use dvdrental::state::init_app_state;
use dvdrental_config::AppConfig;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::var("ENV").as_deref() != Ok("production") {
        dotenv().ok();
    }

    let app_config = AppConfig::from_env();
    init_tracing(&app_config.env)?;

    let addr = app_config.addr.clone();
    let state = init_app_state(app_config).await?;

    if state.rate_limit_config.enabled {
        state.rate_limiter.spawn_sweeper();
    }

    if let Some(handle) = init_metrics()? {
        let metrics_addr =
            std::env::var("METRICS_ADDR").unwrap_or_else(|_| "0.0.0.0:9090".to_string());
        let listener = tokio::net::TcpListener::bind(&metrics_addr)
            .await
            .with_context(|| format!("failed to bind metrics listener on {metrics_addr}"))?;
        info!(addr = %metrics_addr, "metrics server listening");
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, metrics_app(handle)).await {
                error!(error = %e, "metrics server stopped");
            }
        });
    }

    let app = init_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(addr = %addr, "server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("server stopped");
    shutdown_tracer().await;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
