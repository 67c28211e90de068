#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use cellpulse_core::{Simulator, StatusStore, WeightedSampler};
use cellpulse_server::obs::CellMetrics;
use cellpulse_server::sim_task;

fn simulator(metrics: Arc<CellMetrics>) -> Simulator {
    Simulator::new(
        StatusStore::new(["WhatsApp", "Instagram", "Gmail"]),
        Box::new(WeightedSampler::with_seed(99)),
        metrics,
    )
}

#[tokio::test(start_paused = true)]
async fn runs_once_per_interval_until_stopped() {
    let metrics = Arc::new(CellMetrics::new());
    let handle = sim_task::spawn(simulator(metrics.clone()), Duration::from_secs(5));

    // Cycles at t=0s, 5s, 10s.
    tokio::time::sleep(Duration::from_secs(12)).await;
    let sim = handle.shutdown().await.unwrap();
    assert_eq!(sim.cycles(), 3);

    for app in sim.snapshot() {
        let status = metrics.app_status.get(&[("app", app.name.as_str())]);
        assert_eq!(status, Some(if app.up { 1 } else { 0 }));

        assert!(app.error_count <= 3);
        let errors = metrics.app_errors.get(&[("app", app.name.as_str())]);
        if app.error_count == 0 {
            assert_eq!(errors, None);
        } else {
            assert_eq!(errors, Some(app.error_count as i64));
        }
    }
}

#[tokio::test(start_paused = true)]
async fn stops_promptly_while_waiting() {
    let metrics = Arc::new(CellMetrics::new());
    let handle = sim_task::spawn(simulator(metrics), Duration::from_secs(3600));

    tokio::time::sleep(Duration::from_millis(10)).await;
    let sim = tokio::time::timeout(Duration::from_secs(1), handle.shutdown())
        .await
        .expect("shutdown must not wait for the interval")
        .unwrap();
    assert_eq!(sim.cycles(), 1);
}
