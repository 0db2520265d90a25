//! Deployment lifecycle events.

use chrono::{DateTime, Utc};
use deploy_notify_models::{Deployment, SiteId};
use serde::{Deserialize, Serialize};

/// Name under which the host publishes completed deployments.
pub const DEPLOYMENT_COMPLETED: &str = "deployment.completed";

/// A deployment reached a final state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentCompleted {
    /// Snapshot of the deployment at completion time.
    pub deployment: Deployment,
    /// When the event was emitted.
    pub emitted_at: DateTime<Utc>,
}

impl DeploymentCompleted {
    /// Wraps a finished deployment in an event stamped with the current time.
    pub fn new(deployment: Deployment) -> Self {
        Self {
            deployment,
            emitted_at: Utc::now(),
        }
    }

    /// Site the deployment belongs to.
    pub fn site_id(&self) -> &SiteId {
        &self.deployment.site_id
    }

    /// Event name, for logging.
    pub fn name(&self) -> &'static str {
        DEPLOYMENT_COMPLETED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_carries_site() {
        let event = DeploymentCompleted::new(Deployment::builder(5, "site-9", "failed").build());
        assert_eq!(event.site_id().as_str(), "site-9");
        assert_eq!(event.name(), "deployment.completed");
    }

    #[test]
    fn test_event_serializes() {
        let event = DeploymentCompleted::new(Deployment::builder(5, "site-9", "failed").build());
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["deployment"]["status"], "failed");
        assert_eq!(value["deployment"]["id"], 5);
    }
}
