//! Periodic invariant audit.
//!
//! Reads every color's barns through the placement service and logs any
//! partition whose barn count, loads or assignments have drifted. The audit
//! never writes.

use std::time::Duration;

use farm_balance::{FarmResult, PartitionService, PartitionStore};
use tokio::sync::watch;
use tracing::{error, info, instrument, warn};

/// Totals from one audit pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AuditStats {
    pub colors_checked: usize,
    pub colors_unbalanced: usize,
    pub animals: usize,
    pub barns: usize,
}

/// Runs [`PartitionService::inspect_all`] on an interval.
pub struct AuditWorker<S> {
    service: PartitionService<S>,
    interval: Duration,
}

impl<S: PartitionStore> AuditWorker<S> {
    pub fn new(service: PartitionService<S>, interval: Duration) -> Self {
        Self { service, interval }
    }

    /// Run the audit until shutdown is signaled. The first pass runs
    /// immediately.
    #[instrument(skip(self, shutdown))]
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            interval_secs = self.interval.as_secs(),
            capacity = %self.service.capacity(),
            "Starting audit worker"
        );

        let mut interval = tokio::time::interval(self.interval);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = self.audit_once().await {
                        error!(error = %e, "Audit pass failed");
                    }
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("Audit worker shutting down");
                        break;
                    }
                }
            }
        }
    }

    /// Run a single audit pass.
    pub async fn audit_once(&self) -> FarmResult<AuditStats> {
        let mut stats = AuditStats::default();

        for report in self.service.inspect_all().await? {
            stats.colors_checked += 1;
            stats.animals += report.animals;
            stats.barns += report.loads.len();

            if !report.is_balanced() {
                stats.colors_unbalanced += 1;
                let violations = serde_json::to_string(&report.violations)
                    .unwrap_or_else(|e| format!("<unserializable: {e}>"));
                warn!(
                    color = %report.color,
                    animals = report.animals,
                    barns = report.loads.len(),
                    expected_barns = report.expected_barns,
                    spread = report.spread(),
                    violations = %violations,
                    "Partition out of balance"
                );
            }
        }

        info!(
            colors_checked = stats.colors_checked,
            colors_unbalanced = stats.colors_unbalanced,
            animals = stats.animals,
            barns = stats.barns,
            "Audit pass complete"
        );

        Ok(stats)
    }
}
