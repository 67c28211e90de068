//! In-memory status of the simulated applications.

/// One simulated application.
///
/// `error_count` is level-triggered: it grows by one for every evaluation
/// that observes the app down, including consecutive down evaluations. It is
/// a count of down observations, not of outages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppStatus {
    pub name: String,
    pub up: bool,
    pub error_count: u64,
}

impl AppStatus {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            up: true,
            error_count: 0,
        }
    }

    /// Apply one evaluation result.
    pub fn observe(&mut self, up: bool) {
        self.up = up;
        if !up {
            self.error_count += 1;
        }
    }
}

/// name -> status and name -> cumulative error count, in a fixed order.
///
/// Owned by the simulator; nothing else mutates it.
#[derive(Debug, Clone, Default)]
pub struct StatusStore {
    apps: Vec<AppStatus>,
}

impl StatusStore {
    /// All apps start up with zero errors. Duplicate names are collapsed to
    /// the first occurrence.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut apps: Vec<AppStatus> = Vec::new();
        for n in names {
            let n = n.into();
            if apps.iter().any(|a| a.name == n) {
                continue;
            }
            apps.push(AppStatus::new(n));
        }
        Self { apps }
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&AppStatus> {
        self.apps.iter().find(|a| a.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AppStatus> {
        self.apps.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut AppStatus> {
        self.apps.iter_mut()
    }
}
