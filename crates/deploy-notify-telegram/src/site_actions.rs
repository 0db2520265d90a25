//! Enable/disable actions backed by the site store.

use deploy_notify_core::{disable, enable, ActionOutcome, EnableRequest};
use deploy_notify_models::SiteId;
use deploy_notify_persistence::SiteStore;

use crate::error::Result;

/// Runs the settings actions against stored sites.
///
/// Each call is a read-modify-write of one site record; concurrent calls on
/// the same site are last-writer-wins.
#[derive(Debug, Clone)]
pub struct SiteActions {
    store: SiteStore,
}

impl SiteActions {
    /// Creates the actions over a site store.
    pub fn new(store: SiteStore) -> Self {
        Self { store }
    }

    /// Enables enhanced notifications for a site.
    pub fn enable(&self, site_id: &SiteId, request: EnableRequest) -> Result<ActionOutcome> {
        let mut site = self.store.load_site(site_id)?;
        let outcome = enable(&mut site, request)?;
        if outcome.changed {
            self.store.save_site(&site)?;
        }
        Ok(outcome)
    }

    /// Disables enhanced notifications for a site.
    pub fn disable(&self, site_id: &SiteId) -> Result<ActionOutcome> {
        let mut site = self.store.load_site(site_id)?;
        let outcome = disable(&mut site);
        if outcome.changed {
            self.store.save_site(&site)?;
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotifyError;
    use deploy_notify_models::{NotificationConfig, Site, SiteType};
    use tempfile::tempdir;

    #[test]
    fn test_enable_then_disable_persists() {
        let dir = tempdir().unwrap();
        let store = SiteStore::new(dir.path());
        let site = Site::new(SiteType::Laravel, "example.com", "main");
        store.save_site(&site).unwrap();

        let actions = SiteActions::new(store.clone());
        let request = EnableRequest {
            include_server_info: Some(true),
            success_emoji: Some("🟢".to_string()),
            ..EnableRequest::default()
        };
        actions.enable(&site.id, request).unwrap();

        let enabled = store.load_site(&site.id).unwrap().type_data.notifications.unwrap();
        assert!(enabled.enabled);

        actions.disable(&site.id).unwrap();
        let disabled = store.load_site(&site.id).unwrap().type_data.notifications.unwrap();
        assert_eq!(
            disabled,
            NotificationConfig {
                enabled: false,
                ..enabled
            }
        );
    }

    #[test]
    fn test_unknown_site() {
        let dir = tempdir().unwrap();
        let actions = SiteActions::new(SiteStore::new(dir.path()));

        let err = actions.disable(&SiteId::from("site-missing")).unwrap_err();
        assert!(matches!(err, NotifyError::Persistence(e) if e.is_not_found()));
    }

    #[test]
    fn test_invalid_request_leaves_site_untouched() {
        let dir = tempdir().unwrap();
        let store = SiteStore::new(dir.path());
        let site = Site::new(SiteType::Php, "example.com", "main");
        store.save_site(&site).unwrap();

        let actions = SiteActions::new(store.clone());
        let request = EnableRequest {
            failure_emoji: Some("x".repeat(11)),
            ..EnableRequest::default()
        };

        assert!(matches!(
            actions.enable(&site.id, request),
            Err(NotifyError::Settings(_))
        ));
        assert!(store.load_site(&site.id).unwrap().type_data.notifications.is_none());
    }
}
