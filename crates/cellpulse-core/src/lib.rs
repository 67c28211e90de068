//! cellpulse core: the simulated application status model and the metrics
//! capability it publishes into.
//!
//! This crate owns the state the simulator mutates (`StatusStore`), the
//! per-cycle evaluation (`Simulator`), and the `MetricsSink` seam the HTTP
//! server plugs a registry into. It carries no HTTP or async runtime
//! dependencies so the model can be driven synchronously from tests.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. All fallible paths
//! surface as `CellPulseError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod sampler;
pub mod simulator;
pub mod sink;
pub mod status;

/// Shared result type.
pub use error::{CellPulseError, Result};
pub use sampler::{StatusSampler, WeightedSampler};
pub use simulator::Simulator;
pub use sink::{MetricsSink, NoopMetrics};
pub use status::{AppStatus, StatusStore};
