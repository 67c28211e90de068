//! One evaluation pass over every simulated application.
//!
//! The timer loop around `run_cycle` lives in the server crate; this type is
//! synchronous so cycles can be driven directly from tests.

use std::sync::Arc;

use crate::sampler::StatusSampler;
use crate::sink::MetricsSink;
use crate::status::{AppStatus, StatusStore};

pub struct Simulator {
    store: StatusStore,
    sampler: Box<dyn StatusSampler>,
    sink: Arc<dyn MetricsSink>,
    cycles: u64,
}

impl Simulator {
    pub fn new(store: StatusStore, sampler: Box<dyn StatusSampler>, sink: Arc<dyn MetricsSink>) -> Self {
        Self {
            store,
            sampler,
            sink,
            cycles: 0,
        }
    }

    /// Sample each app in store order, update it, and publish its gauges.
    ///
    /// `app_status` is published on every evaluation. `app_errors` is only
    /// republished when the app was observed down.
    pub fn run_cycle(&mut self) {
        for app in self.store.iter_mut() {
            let up = self.sampler.sample(&app.name);
            app.observe(up);

            self.sink.set_app_status(&app.name, up);
            if !up {
                self.sink.set_app_errors(&app.name, app.error_count);
                tracing::debug!(app = %app.name, errors = app.error_count, "app observed down");
            }
        }
        self.cycles += 1;
    }

    /// Completed cycles since construction.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn store(&self) -> &StatusStore {
        &self.store
    }

    /// Copy of the current per-app state.
    pub fn snapshot(&self) -> Vec<AppStatus> {
        self.store.iter().cloned().collect()
    }
}
