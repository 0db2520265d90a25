//! Site feature registry.
//!
//! Describes which features and actions the plugin offers for each site
//! type, along with the form each action shows. The host renders the forms;
//! this module only carries their schema.

use deploy_notify_models::{SiteType, DEFAULT_FAILURE_EMOJI, DEFAULT_SUCCESS_EMOJI};
use serde::Serialize;

/// Key of the enhanced notification feature.
pub const FEATURE_KEY: &str = "enhanced-telegram-notifications";

/// Input widget of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Alert,
    Checkbox,
    Text,
}

/// Default value of a form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldDefault {
    Bool(bool),
    Text(String),
}

/// One field of an action form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    pub name: String,
    pub kind: FieldKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<FieldDefault>,
}

impl FormField {
    fn alert(name: &str, level: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Alert,
            label: None,
            description: description.to_string(),
            alert_level: Some(level.to_string()),
            default: None,
        }
    }

    fn checkbox(name: &str, label: &str, description: &str, default: bool) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Checkbox,
            label: Some(label.to_string()),
            description: description.to_string(),
            alert_level: None,
            default: Some(FieldDefault::Bool(default)),
        }
    }

    fn text(name: &str, label: &str, description: &str, default: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Text,
            label: Some(label.to_string()),
            description: description.to_string(),
            alert_level: None,
            default: Some(FieldDefault::Text(default.to_string())),
        }
    }
}

/// Actions offered by the feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Enable,
    Disable,
}

/// An action with its form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureAction {
    pub kind: ActionKind,
    pub label: String,
    pub form: Vec<FormField>,
}

/// A feature registered for one site type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteFeature {
    pub site_type: SiteType,
    pub key: String,
    pub label: String,
    pub description: String,
    pub actions: Vec<FeatureAction>,
}

impl SiteFeature {
    /// The enhanced notification feature for `site_type`.
    pub fn enhanced_notifications(site_type: SiteType) -> Self {
        Self {
            site_type,
            key: FEATURE_KEY.to_string(),
            label: "Enhanced Telegram Notifications".to_string(),
            description:
                "Send detailed deployment notifications to Telegram with commit info and statistics"
                    .to_string(),
            actions: vec![enable_action(), disable_action()],
        }
    }

    /// Looks up an action by kind.
    pub fn action(&self, kind: ActionKind) -> Option<&FeatureAction> {
        self.actions.iter().find(|a| a.kind == kind)
    }
}

fn enable_action() -> FeatureAction {
    FeatureAction {
        kind: ActionKind::Enable,
        label: "Enable".to_string(),
        form: vec![
            FormField::alert(
                "info_alert",
                "info",
                "Configure enhanced Telegram notifications with detailed deployment information. \
                 Make sure a Telegram notification channel is configured.",
            ),
            FormField::checkbox(
                "include_commit_info",
                "Include Commit Information",
                "Show commit hash, message, and author in notifications",
                true,
            ),
            FormField::checkbox(
                "include_duration",
                "Include Deployment Duration",
                "Show how long the deployment took",
                true,
            ),
            FormField::checkbox(
                "include_server_info",
                "Include Server Information",
                "Show server name and IP address",
                false,
            ),
            FormField::checkbox(
                "include_log_snippet",
                "Include Log Snippet",
                "Include last 10 lines of deployment log on failure",
                false,
            ),
            FormField::text(
                "custom_success_emoji",
                "Success Emoji",
                "Emoji to use for successful deployments",
                DEFAULT_SUCCESS_EMOJI,
            ),
            FormField::text(
                "custom_failure_emoji",
                "Failure Emoji",
                "Emoji to use for failed deployments",
                DEFAULT_FAILURE_EMOJI,
            ),
        ],
    }
}

fn disable_action() -> FeatureAction {
    FeatureAction {
        kind: ActionKind::Disable,
        label: "Disable".to_string(),
        form: vec![FormField::alert(
            "warning_alert",
            "warning",
            "This will disable enhanced Telegram notifications and revert to standard notifications.",
        )],
    }
}

/// Features registered by the plugin.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FeatureRegistry {
    features: Vec<SiteFeature>,
}

impl FeatureRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a feature, replacing one with the same site type and key.
    pub fn register(&mut self, feature: SiteFeature) {
        match self
            .features
            .iter_mut()
            .find(|f| f.site_type == feature.site_type && f.key == feature.key)
        {
            Some(existing) => *existing = feature,
            None => self.features.push(feature),
        }
    }

    /// Looks up a feature.
    pub fn feature(&self, site_type: SiteType, key: &str) -> Option<&SiteFeature> {
        self.features
            .iter()
            .find(|f| f.site_type == site_type && f.key == key)
    }

    /// Number of registered features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
