//! Emits events for deployments that appear in the store.
//!
//! When running standalone there is no host to publish completion events,
//! so the watcher scans the deployment store and emits one
//! [`DeploymentCompleted`] per deployment that reaches `finished` or
//! `failed`.

use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

use deploy_notify_events::{DeploymentCompleted, EventBus};
use deploy_notify_models::{Deployment, SiteId};
use deploy_notify_persistence::{DeploymentStore, SiteStore};
use tokio::time::interval;
use tracing::{debug, warn};

use crate::error::Result;

/// Default scan interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// How far the watcher has read one site's deployments.
#[derive(Debug, Default)]
struct Cursor {
    /// Highest deployment id looked at.
    high: u64,
    /// Ids at or below `high` that had not completed yet.
    pending: BTreeSet<u64>,
}

/// Polls the store for newly completed deployments.
///
/// Each scan only parses deployments newer than the site's cursor plus the
/// ones still running at the previous scan.
pub struct StoreWatcher {
    sites: SiteStore,
    deployments: DeploymentStore,
    bus: EventBus,
    cursors: HashMap<SiteId, Cursor>,
}

impl StoreWatcher {
    /// Creates a watcher. Call [`StoreWatcher::prime`] to ignore history.
    pub fn new(sites: SiteStore, deployments: DeploymentStore, bus: EventBus) -> Self {
        Self {
            sites,
            deployments,
            bus,
            cursors: HashMap::new(),
        }
    }

    /// Marks every deployment already completed as seen without emitting.
    pub fn prime(&mut self) -> Result<usize> {
        let count = self.advance()?.len();
        debug!(count, "Watcher primed with existing deployments");
        Ok(count)
    }

    /// Emits events for completed deployments not seen before.
    pub fn scan(&mut self) -> Result<usize> {
        let completed = self.advance()?;
        let emitted = completed.len();
        for deployment in completed {
            self.bus.emit(DeploymentCompleted::new(deployment))?;
        }
        Ok(emitted)
    }

    /// Scans forever at `every`. Scan errors are logged and retried.
    pub async fn run(mut self, every: Duration) {
        let mut ticker = interval(every);
        loop {
            ticker.tick().await;
            match self.scan() {
                Ok(0) => {}
                Ok(emitted) => debug!(emitted, "New deployments found"),
                Err(e) => warn!(error = %e, "Deployment scan failed"),
            }
        }
    }

    /// Number of deployments still waiting to complete, across all sites.
    pub fn pending(&self) -> usize {
        self.cursors.values().map(|c| c.pending.len()).sum()
    }

    /// Moves every site's cursor forward and returns the deployments that
    /// completed since the last call, oldest first per site.
    fn advance(&mut self) -> Result<Vec<Deployment>> {
        let sites = self.sites.list_sites()?;
        self.cursors
            .retain(|id, _| sites.iter().any(|site| &site.id == id));

        let mut completed = Vec::new();
        for site in sites {
            let ids = self.deployments.deployment_ids(&site.id)?;
            let cursor = self.cursors.entry(site.id.clone()).or_default();

            let fresh = ids.iter().copied().filter(|id| *id > cursor.high);
            let candidates: BTreeSet<u64> = cursor.pending.iter().copied().chain(fresh).collect();

            for id in candidates {
                cursor.high = cursor.high.max(id);
                match self.deployments.load_deployment(&site.id, id) {
                    Ok(d) if d.status.is_success() || d.status.is_failure() => {
                        cursor.pending.remove(&id);
                        completed.push(d);
                    }
                    Ok(_) => {
                        cursor.pending.insert(id);
                    }
                    Err(e) if e.is_not_found() => {
                        cursor.pending.remove(&id);
                    }
                    Err(e) => {
                        warn!(site_id = %site.id, deployment_id = id, error = %e, "Skipping unreadable deployment");
                        cursor.pending.insert(id);
                    }
                }
            }
        }
        Ok(completed)
    }
}
