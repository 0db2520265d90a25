//! Site store for site record persistence.

use std::fs;
use std::path::PathBuf;

use deploy_notify_models::{Site, SiteId};
use tracing::warn;

use crate::atomic::{atomic_write_json, ensure_dir, read_json, read_json_optional};
use crate::error::{PersistenceError, Result};

/// Manages persistence of sites.
///
/// Sites are stored as individual JSON files:
/// ```text
/// base_path/
/// └── sites/
///     ├── site-abc123.json
///     └── site-def456.json
/// ```
#[derive(Debug, Clone)]
pub struct SiteStore {
    base_path: PathBuf,
}

impl SiteStore {
    /// Creates a new SiteStore with the given base path.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn sites_dir(&self) -> PathBuf {
        self.base_path.join("sites")
    }

    fn site_path(&self, id: &SiteId) -> PathBuf {
        self.sites_dir().join(format!("{}.json", id))
    }

    /// Saves a site, replacing any previous version.
    pub fn save_site(&self, site: &Site) -> Result<()> {
        ensure_dir(&self.sites_dir())?;
        atomic_write_json(&self.site_path(&site.id), site)
    }

    /// Loads a site by ID.
    pub fn load_site(&self, id: &SiteId) -> Result<Site> {
        self.load_site_optional(id)?
            .ok_or_else(|| PersistenceError::NotFound {
                kind: "site",
                id: id.to_string(),
            })
    }

    /// Loads a site by ID, returning None if it doesn't exist.
    pub fn load_site_optional(&self, id: &SiteId) -> Result<Option<Site>> {
        read_json_optional(&self.site_path(id))
    }

    /// Lists all stored sites, sorted by domain.
    ///
    /// Files that fail to parse are skipped with a warning.
    pub fn list_sites(&self) -> Result<Vec<Site>> {
        let dir = self.sites_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&dir).map_err(|source| PersistenceError::ReadError {
            path: dir.clone(),
            source,
        })?;

        let mut sites = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| PersistenceError::ReadError {
                path: dir.clone(),
                source,
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                match read_json::<Site>(&path) {
                    Ok(site) => sites.push(site),
                    Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable site"),
                }
            }
        }

        sites.sort_by(|a, b| a.domain.cmp(&b.domain));
        Ok(sites)
    }

    /// Deletes a site. Missing sites are not an error.
    pub fn delete_site(&self, id: &SiteId) -> Result<()> {
        let path = self.site_path(id);
        if path.exists() {
            fs::remove_file(&path).map_err(|source| PersistenceError::WriteError { path, source })?;
        }
        Ok(())
    }
}
