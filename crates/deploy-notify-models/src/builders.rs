//! Builder patterns for complex types.

use chrono::{DateTime, Utc};

use crate::deployment::{CommitData, Deployment, DeploymentLog, DeploymentStatus};
use crate::ids::SiteId;

/// Builder for creating Deployment instances with a fluent API.
#[derive(Debug, Clone)]
pub struct DeploymentBuilder {
    id: u64,
    site_id: SiteId,
    status: DeploymentStatus,
    commit_id: Option<String>,
    commit_data: Option<CommitData>,
    release: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    log: Option<DeploymentLog>,
}

impl DeploymentBuilder {
    /// Creates a new DeploymentBuilder with required fields.
    pub fn new(id: u64, site_id: impl Into<SiteId>, status: impl Into<DeploymentStatus>) -> Self {
        Self {
            id,
            site_id: site_id.into(),
            status: status.into(),
            commit_id: None,
            commit_data: None,
            release: None,
            created_at: None,
            updated_at: None,
            log: None,
        }
    }

    /// Sets the commit hash.
    pub fn commit(mut self, commit_id: impl Into<String>) -> Self {
        self.commit_id = Some(commit_id.into());
        self
    }

    /// Sets the commit author.
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.commit_data.get_or_insert_with(CommitData::default).author = Some(author.into());
        self
    }

    /// Sets the commit message.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.commit_data.get_or_insert_with(CommitData::default).message = Some(message.into());
        self
    }

    /// Sets the release identifier.
    pub fn release(mut self, release: impl Into<String>) -> Self {
        self.release = Some(release.into());
        self
    }

    /// Sets start and end timestamps.
    pub fn timing(mut self, started: DateTime<Utc>, finished: DateTime<Utc>) -> Self {
        self.created_at = Some(started);
        self.updated_at = Some(finished);
        self
    }

    /// Sets the log.
    pub fn log(mut self, log: DeploymentLog) -> Self {
        self.log = Some(log);
        self
    }

    /// Builds the Deployment.
    pub fn build(self) -> Deployment {
        Deployment {
            id: self.id,
            site_id: self.site_id,
            status: self.status,
            commit_id: self.commit_id,
            commit_data: self.commit_data,
            release: self.release,
            created_at: self.created_at,
            updated_at: self.updated_at,
            log: self.log,
        }
    }
}

/// Convenience methods on Deployment for creating builders.
impl Deployment {
    /// Creates a builder for a new deployment.
    pub fn builder(
        id: u64,
        site_id: impl Into<SiteId>,
        status: impl Into<DeploymentStatus>,
    ) -> DeploymentBuilder {
        DeploymentBuilder::new(id, site_id, status)
    }
}
