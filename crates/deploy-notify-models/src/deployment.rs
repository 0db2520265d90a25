//! Deployment types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;

use crate::ids::SiteId;

/// Outcome of a deployment.
///
/// The host only guarantees `finished` and `failed`; anything else is kept
/// verbatim so it can still be shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeploymentStatus {
    Finished,
    Failed,
    Other(String),
}

impl DeploymentStatus {
    /// Returns the wire name of the status.
    pub fn as_str(&self) -> &str {
        match self {
            DeploymentStatus::Finished => "finished",
            DeploymentStatus::Failed => "failed",
            DeploymentStatus::Other(s) => s,
        }
    }

    /// True only for `finished`.
    pub fn is_success(&self) -> bool {
        matches!(self, DeploymentStatus::Finished)
    }

    /// True only for `failed`.
    pub fn is_failure(&self) -> bool {
        matches!(self, DeploymentStatus::Failed)
    }
}

impl From<String> for DeploymentStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "finished" => DeploymentStatus::Finished,
            "failed" => DeploymentStatus::Failed,
            _ => DeploymentStatus::Other(s),
        }
    }
}

impl From<&str> for DeploymentStatus {
    fn from(s: &str) -> Self {
        DeploymentStatus::from(s.to_string())
    }
}

impl From<DeploymentStatus> for String {
    fn from(status: DeploymentStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Commit metadata captured by the host at deploy time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Where the output of a deployment script can be found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentLog {
    /// Log text kept alongside the deployment record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Log file on disk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl DeploymentLog {
    /// Log with inline content.
    pub fn inline(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            path: None,
        }
    }

    /// Log stored in a file.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            content: None,
            path: Some(path.into()),
        }
    }

    /// Reads the full log text. Inline content wins over the file.
    pub fn read_content(&self) -> io::Result<String> {
        if let Some(content) = &self.content {
            return Ok(content.clone());
        }
        match &self.path {
            Some(path) => fs::read_to_string(path),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                "deployment log has no content",
            )),
        }
    }
}

/// A single deployment of a site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deployment {
    /// Numeric identifier assigned by the host.
    pub id: u64,

    /// Site this deployment belongs to.
    pub site_id: SiteId,

    /// Final status.
    pub status: DeploymentStatus,

    /// Full commit hash.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_id: Option<String>,

    /// Author and message of the commit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_data: Option<CommitData>,

    /// Release directory name for release-based deployments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release: Option<String>,

    /// When the deployment started.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// When the deployment record was last touched (i.e. when it ended).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Script output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log: Option<DeploymentLog>,
}

impl Deployment {
    /// Elapsed time between start and end, if both are known.
    pub fn elapsed(&self) -> Option<chrono::Duration> {
        match (self.created_at, self.updated_at) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }
}
