use std::sync::Arc;

use tracing::{debug, warn};

use ticketbridge_core::health::HealthReport;
use ticketbridge_db::LinkStore;
use ticketbridge_providers::IssueTracker;

/// Small file every repository is expected to carry.
pub const DEFAULT_PROBE_PATH: &str = "README.md";

/// Liveness check over the link store and the tracker.
#[derive(Clone)]
pub struct HealthProbe {
    store: Arc<dyn LinkStore>,
    tracker: Arc<dyn IssueTracker>,
    probe_path: String,
}

impl HealthProbe {
    pub fn new(store: Arc<dyn LinkStore>, tracker: Arc<dyn IssueTracker>) -> Self {
        Self {
            store,
            tracker,
            probe_path: DEFAULT_PROBE_PATH.to_string(),
        }
    }

    pub fn with_probe_path(mut self, path: impl Into<String>) -> Self {
        self.probe_path = path.into();
        self
    }

    /// Probe both components concurrently. A failing probe reports `false`;
    /// this never errors.
    pub async fn check(&self) -> HealthReport {
        let (store, tracker) = tokio::join!(self.store.ping(), async {
            match self.tracker.get_resource(&self.probe_path).await {
                Ok(_) => true,
                Err(e) => {
                    warn!("{} probe failed: {e}", self.tracker.name());
                    false
                }
            }
        });

        let report = HealthReport { store, tracker };
        debug!("health: store={store} tracker={tracker}");
        report
    }
}
