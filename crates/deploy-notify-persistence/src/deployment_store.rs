//! Deployment store for deployment record persistence.

use std::fs;
use std::path::PathBuf;

use deploy_notify_models::{Deployment, SiteId};
use tracing::warn;

use crate::atomic::{atomic_write_json, ensure_dir, read_json, read_json_optional};
use crate::error::{PersistenceError, Result};

/// Manages persistence of deployments.
///
/// Deployments are grouped by site:
/// ```text
/// base_path/
/// └── deployments/
///     └── {site_id}/
///         ├── 41.json
///         └── 42.json
/// ```
#[derive(Debug, Clone)]
pub struct DeploymentStore {
    base_path: PathBuf,
}

impl DeploymentStore {
    /// Creates a new DeploymentStore with the given base path.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn site_dir(&self, site_id: &SiteId) -> PathBuf {
        self.base_path.join("deployments").join(site_id.as_str())
    }

    fn deployment_path(&self, site_id: &SiteId, id: u64) -> PathBuf {
        self.site_dir(site_id).join(format!("{}.json", id))
    }

    /// Saves a deployment.
    pub fn save_deployment(&self, deployment: &Deployment) -> Result<()> {
        ensure_dir(&self.site_dir(&deployment.site_id))?;
        let path = self.deployment_path(&deployment.site_id, deployment.id);
        atomic_write_json(&path, deployment)
    }

    /// Loads a deployment by site and numeric ID.
    pub fn load_deployment(&self, site_id: &SiteId, id: u64) -> Result<Deployment> {
        read_json_optional(&self.deployment_path(site_id, id))?.ok_or_else(|| {
            PersistenceError::NotFound {
                kind: "deployment",
                id: format!("{}#{}", site_id, id),
            }
        })
    }

    /// Lists a site's deployments, newest (highest ID) first.
    pub fn list_deployments(&self, site_id: &SiteId) -> Result<Vec<Deployment>> {
        let dir = self.site_dir(site_id);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&dir).map_err(|source| PersistenceError::ReadError {
            path: dir.clone(),
            source,
        })?;

        let mut deployments = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| PersistenceError::ReadError {
                path: dir.clone(),
                source,
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                match read_json::<Deployment>(&path) {
                    Ok(deployment) => deployments.push(deployment),
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "Skipping unreadable deployment")
                    }
                }
            }
        }

        deployments.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(deployments)
    }

    /// IDs of a site's stored deployments, ascending, read from file names
    /// without parsing the records.
    pub fn deployment_ids(&self, site_id: &SiteId) -> Result<Vec<u64>> {
        let dir = self.site_dir(site_id);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&dir).map_err(|source| PersistenceError::ReadError {
            path: dir.clone(),
            source,
        })?;

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| PersistenceError::ReadError {
                path: dir.clone(),
                source,
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(id) = path
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .and_then(|stem| stem.parse().ok())
                {
                    ids.push(id);
                }
            }
        }

        ids.sort_unstable();
        Ok(ids)
    }

    /// Returns the most recent deployment of a site, if any.
    pub fn latest(&self, site_id: &SiteId) -> Result<Option<Deployment>> {
        Ok(self.list_deployments(site_id)?.into_iter().next())
    }

    /// Deletes every deployment of a site.
    pub fn delete_site_deployments(&self, site_id: &SiteId) -> Result<()> {
        let dir = self.site_dir(site_id);
        if dir.exists() {
            fs::remove_dir_all(&dir)
                .map_err(|source| PersistenceError::WriteError { path: dir, source })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use deploy_notify_models::{DeploymentLog, DeploymentStatus};
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load_deployment() {
        let dir = tempdir().unwrap();
        let store = DeploymentStore::new(dir.path());

        let start = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 1, 9, 2, 5).unwrap();
        let deployment = Deployment::builder(42, "site-1", "failed")
            .commit("0123456789abcdef")
            .author("Ana")
            .timing(start, end)
            .log(DeploymentLog::inline("boom"))
            .build();
        store.save_deployment(&deployment).unwrap();

        let loaded = store.load_deployment(&SiteId::from("site-1"), 42).unwrap();
        assert_eq!(loaded.status, DeploymentStatus::Failed);
        assert_eq!(loaded.commit_id.as_deref(), Some("0123456789abcdef"));
        assert_eq!(loaded.created_at, Some(start));
        assert_eq!(loaded.log, Some(DeploymentLog::inline("boom")));
    }

    #[test]
    fn test_load_deployment_not_found() {
        let dir = tempdir().unwrap();
        let store = DeploymentStore::new(dir.path());

        let err = store
            .load_deployment(&SiteId::from("site-1"), 9)
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "deployment not found: site-1#9");
    }

    #[test]
    fn test_list_newest_first() {
        let dir = tempdir().unwrap();
        let store = DeploymentStore::new(dir.path());
        let site_id = SiteId::from("site-1");

        for id in [3, 11, 7] {
            store
                .save_deployment(&Deployment::builder(id, site_id.clone(), "finished").build())
                .unwrap();
        }

        let ids: Vec<u64> = store
            .list_deployments(&site_id)
            .unwrap()
            .iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, vec![11, 7, 3]);
        assert_eq!(store.latest(&site_id).unwrap().unwrap().id, 11);
    }

    #[test]
    fn test_delete_site_deployments() {
        let dir = tempdir().unwrap();
        let store = DeploymentStore::new(dir.path());
        let site_id = SiteId::from("site-1");

        store
            .save_deployment(&Deployment::builder(1, site_id.clone(), "finished").build())
            .unwrap();
        store.delete_site_deployments(&site_id).unwrap();

        assert!(store.latest(&site_id).unwrap().is_none());
    }

    #[test]
    fn test_deployment_ids_ignore_stray_files() {
        let dir = tempdir().unwrap();
        let store = DeploymentStore::new(dir.path());
        let site_id = SiteId::from("site-1");
        assert!(store.deployment_ids(&site_id).unwrap().is_empty());

        for id in [12, 2, 5] {
            store
                .save_deployment(&Deployment::builder(id, site_id.clone(), "deploying").build())
                .unwrap();
        }
        let site_dir = dir.path().join("deployments").join("site-1");
        fs::write(site_dir.join("notes.json"), "{}").unwrap();
        fs::write(site_dir.join("7.txt"), "").unwrap();

        assert_eq!(store.deployment_ids(&site_id).unwrap(), vec![2, 5, 12]);
    }
}
