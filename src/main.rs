use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use seatmap::assistant::Assistant;
use seatmap::config::Args;
use seatmap::engine::Engine;
use seatmap::http::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    seatmap::observability::init_tracing();
    seatmap::observability::init(args.metrics_port)?;

    let engine = Arc::new(Engine::new().with_latency(args.simulated_latency()));
    let assistant = Arc::new(Assistant::from_config(&args.assistant())?);
    let app = http::router(AppState::new(engine.clone(), assistant.clone()));

    let addr = args.addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("seatmap listening on {addr}");
    info!("  seats: {} on {} floors", engine.store().seats().len(), engine.store().floors().len());
    info!("  simulated latency: {:?}", engine.latency());
    info!(
        "  assistant: {}",
        if assistant.is_configured() { assistant.model() } else { "offline (no API key)" }
    );
    let metrics_url = args
        .metrics_port
        .map_or("disabled".to_string(), |p| format!("http://0.0.0.0:{p}/metrics"));
    info!("  metrics: {metrics_url}");

    // Graceful shutdown: stop accepting on SIGTERM/ctrl-c, let in-flight requests finish
    let shutdown = async {
        let ctrl_c = tokio::signal::ctrl_c();
        #[cfg(unix)]
        {
            let mut sigterm =
                tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                    .expect("failed to register SIGTERM handler");
            tokio::select! {
                _ = ctrl_c => {}
                _ = sigterm.recv() => {}
            }
        }
        #[cfg(not(unix))]
        {
            ctrl_c.await.ok();
        }
        info!("shutdown signal received, draining requests");
    };

    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;

    info!("seatmap stopped");
    Ok(())
}
