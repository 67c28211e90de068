//! cellpulse
//!
//! - `GET /`        : fixed JSON message
//! - `GET /metrics` : Prometheus text format
//! - Background simulator flipping app status every interval

use std::process::ExitCode;
use std::sync::Arc;

use cellpulse_core::error::Result;
use cellpulse_core::{Simulator, StatusStore, WeightedSampler};

use cellpulse_server::obs::Telemetry;
use cellpulse_server::{app_state, config, router, sim_task};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, code = e.code(), "cellpulse failed");
            eprintln!("cellpulse: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let cfg = config::load(|k| std::env::var(k).ok())?;
    let telemetry = Telemetry::init(&cfg.telemetry)?;
    let listen = cfg.listen_addr()?;

    let metrics = app_state::metrics_sink(&cfg.telemetry);
    let state = app_state::AppState::new(Arc::clone(&metrics), telemetry.tracer());

    let sim = Simulator::new(
        StatusStore::new(cfg.simulation.apps.iter().cloned()),
        Box::new(WeightedSampler::new()),
        metrics,
    );
    let sim_task = sim_task::spawn(sim, cfg.simulation.interval());

    let app = router::build_router(state);

    tracing::info!(%listen, "cellpulse starting");
    let listener = tokio::net::TcpListener::bind(listen).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let sim = sim_task.shutdown().await?;
    tracing::info!(cycles = sim.cycles(), "shutdown complete");
    telemetry.shutdown();
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
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
    tracing::info!("signal received, starting graceful shutdown");
}
