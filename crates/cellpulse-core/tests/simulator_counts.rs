//! Error counting and gauge publishing of the simulator.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cellpulse_core::{MetricsSink, Result, Simulator, StatusSampler, StatusStore, WeightedSampler};

/// Replays a fixed script of evaluations and records what it handed out.
struct Scripted {
    script: VecDeque<bool>,
    log: Arc<Mutex<Vec<(String, bool)>>>,
}

impl StatusSampler for Scripted {
    fn sample(&mut self, app: &str) -> bool {
        let up = self.script.pop_front().unwrap_or(true);
        self.log.lock().unwrap().push((app.to_string(), up));
        up
    }
}

/// Keeps the last value of each gauge, plus how often `app_errors` was set.
#[derive(Default)]
struct Recording {
    status: Mutex<HashMap<String, bool>>,
    errors: Mutex<HashMap<String, u64>>,
    error_sets: Mutex<usize>,
}

impl MetricsSink for Recording {
    fn inc_request(&self, _method: &str, _endpoint: &str) {}
    fn inc_request_error(&self, _method: &str, _endpoint: &str) {}
    fn observe_latency(&self, _endpoint: &str, _latency: Duration) {}

    fn set_app_status(&self, app: &str, up: bool) {
        self.status.lock().unwrap().insert(app.to_string(), up);
    }

    fn set_app_errors(&self, app: &str, errors: u64) {
        self.errors.lock().unwrap().insert(app.to_string(), errors);
        *self.error_sets.lock().unwrap() += 1;
    }

    fn render(&self) -> Result<String> {
        Ok(String::new())
    }
}

const APPS: [&str; 3] = ["WhatsApp", "Instagram", "Gmail"];

fn scripted(script: &[bool]) -> (Box<Scripted>, Arc<Mutex<Vec<(String, bool)>>>) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let s = Scripted {
        script: script.iter().copied().collect(),
        log: Arc::clone(&log),
    };
    (Box::new(s), log)
}

#[test]
fn evaluates_every_app_once_per_cycle_in_order() {
    let (sampler, log) = scripted(&[]);
    let sink = Arc::new(Recording::default());
    let mut sim = Simulator::new(StatusStore::new(APPS), sampler, sink);

    sim.run_cycle();
    sim.run_cycle();

    let names: Vec<String> = log.lock().unwrap().iter().map(|(n, _)| n.clone()).collect();
    assert_eq!(names, ["WhatsApp", "Instagram", "Gmail", "WhatsApp", "Instagram", "Gmail"]);
    assert_eq!(sim.cycles(), 2);
}

#[test]
fn consecutive_down_cycles_each_count() {
    // WhatsApp: down, down, up, down. Instagram: always up. Gmail: up, down, up, up.
    let script = [
        false, true, true, //
        false, true, false, //
        true, true, true, //
        false, true, true,
    ];
    let (sampler, _log) = scripted(&script);
    let sink = Arc::new(Recording::default());
    let mut sim = Simulator::new(StatusStore::new(APPS), sampler, sink.clone());

    for _ in 0..4 {
        sim.run_cycle();
    }

    let store = sim.store();
    assert_eq!(store.get("WhatsApp").unwrap().error_count, 3);
    assert!(!store.get("WhatsApp").unwrap().up);
    assert_eq!(store.get("Instagram").unwrap().error_count, 0);
    assert_eq!(store.get("Gmail").unwrap().error_count, 1);
    assert!(store.get("Gmail").unwrap().up);

    let errors = sink.errors.lock().unwrap();
    assert_eq!(errors.get("WhatsApp"), Some(&3));
    assert_eq!(errors.get("Gmail"), Some(&1));
    // Never observed down, so never published.
    assert_eq!(errors.get("Instagram"), None);
    assert_eq!(*sink.error_sets.lock().unwrap(), 4);

    let status = sink.status.lock().unwrap();
    assert_eq!(status.get("WhatsApp"), Some(&false));
    assert_eq!(status.get("Instagram"), Some(&true));
    assert_eq!(status.get("Gmail"), Some(&true));
}

#[test]
fn error_count_matches_down_samples_and_never_exceeds_cycles() {
    let log = Arc::new(Mutex::new(Vec::new()));

    struct Logged {
        inner: WeightedSampler,
        log: Arc<Mutex<Vec<(String, bool)>>>,
    }
    impl StatusSampler for Logged {
        fn sample(&mut self, app: &str) -> bool {
            let up = self.inner.sample(app);
            self.log.lock().unwrap().push((app.to_string(), up));
            up
        }
    }

    let sampler = Box::new(Logged {
        inner: WeightedSampler::with_seed(1234),
        log: Arc::clone(&log),
    });
    let sink = Arc::new(Recording::default());
    let mut sim = Simulator::new(StatusStore::new(APPS), sampler, sink);

    let cycles = 200u64;
    let mut previous: HashMap<String, u64> = HashMap::new();
    for _ in 0..cycles {
        sim.run_cycle();
        for app in sim.snapshot() {
            let before = previous.insert(app.name.clone(), app.error_count).unwrap_or(0);
            assert!(app.error_count >= before, "error_count decreased for {}", app.name);
            assert!(app.error_count - before <= 1);
        }
    }

    let log = log.lock().unwrap();
    for app in sim.snapshot() {
        let downs = log.iter().filter(|(n, up)| *n == app.name && !*up).count() as u64;
        assert_eq!(app.error_count, downs, "app={}", app.name);
        assert!(app.error_count <= cycles);
    }
}
