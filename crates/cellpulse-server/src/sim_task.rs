//! Background task driving the simulator on a fixed interval.
//!
//! One cycle runs immediately, then one per interval until the shutdown
//! signal fires. The signal is only observed while the task is suspended,
//! so a cycle in progress always completes.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use cellpulse_core::error::{CellPulseError, Result};
use cellpulse_core::Simulator;

pub struct SimulatorHandle {
    shutdown: watch::Sender<bool>,
    join: JoinHandle<Simulator>,
}

impl SimulatorHandle {
    /// Signal the task and wait for it. Returns the simulator with its final
    /// state.
    pub async fn shutdown(self) -> Result<Simulator> {
        let _ = self.shutdown.send(true);
        self.join
            .await
            .map_err(|e| CellPulseError::Internal(format!("simulator task failed: {e}")))
    }
}

pub fn spawn(sim: Simulator, interval: Duration) -> SimulatorHandle {
    let (tx, rx) = watch::channel(false);
    let join = tokio::spawn(run(sim, interval, rx));
    SimulatorHandle { shutdown: tx, join }
}

pub async fn run(mut sim: Simulator, interval: Duration, mut shutdown: watch::Receiver<bool>) -> Simulator {
    tracing::info!(
        apps = sim.store().len(),
        interval_ms = interval.as_millis() as u64,
        "simulator started"
    );

    loop {
        sim.run_cycle();
        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            // Fires on signal and on a dropped sender.
            _ = shutdown.changed() => break,
        }
    }

    tracing::info!(cycles = sim.cycles(), "simulator stopped");
    sim
}
