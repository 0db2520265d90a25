//! Core data models for deployment notifications.
//!
//! This crate provides the types shared by every other crate in the
//! workspace: sites and their servers, deployments and their logs, and the
//! per-site notification settings stored in a site's `type_data` blob.

pub mod builders;
pub mod deployment;
pub mod ids;
pub mod settings;
pub mod site;

// Re-export main types
pub use builders::DeploymentBuilder;
pub use deployment::{CommitData, Deployment, DeploymentLog, DeploymentStatus};
pub use ids::SiteId;
pub use settings::{
    NotificationConfig, TypeData, DEFAULT_FAILURE_EMOJI, DEFAULT_SUCCESS_EMOJI,
    SETTINGS_KEY,
};
pub use site::{Server, Site, SiteType};
