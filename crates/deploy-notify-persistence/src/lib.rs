//! Persistence layer for sites and deployments.
//!
//! Records are stored as individual JSON files and written atomically
//! (write to temp file, then rename), so a crash never leaves a half-written
//! site settings blob behind.
//!
//! # Example
//!
//! ```no_run
//! use deploy_notify_models::{Site, SiteType};
//! use deploy_notify_persistence::SiteStore;
//!
//! let store = SiteStore::new("/var/lib/deploy-notify");
//!
//! let site = Site::new(SiteType::Laravel, "example.com", "main");
//! store.save_site(&site).unwrap();
//!
//! let loaded = store.load_site(&site.id).unwrap();
//! assert_eq!(loaded.domain, "example.com");
//! ```

pub mod atomic;
pub mod deployment_store;
pub mod error;
pub mod site_store;

pub use deployment_store::DeploymentStore;
pub use error::{PersistenceError, Result};
pub use site_store::SiteStore;
