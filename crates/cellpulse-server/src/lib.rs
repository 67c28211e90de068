//! cellpulse server library entry.
//!
//! Wires the config, metrics registry, span capability, simulator task and
//! HTTP endpoints together. Consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod app_state;
pub mod config;
pub mod middleware;
pub mod obs;
pub mod ops;
pub mod router;
pub mod sim_task;
