//! Per-site notification settings.
//!
//! Sites carry a loosely structured `type_data` blob owned by the
//! orchestration host. The enhanced notification settings live under
//! [`SETTINGS_KEY`] inside that blob; every other key is preserved untouched
//! across read-modify-write cycles.

use serde::{Deserialize, Serialize};

/// Key of the notification block inside a site's `type_data`.
pub const SETTINGS_KEY: &str = "enhanced_telegram_notifications";

/// Emoji used in the header of successful deployments.
pub const DEFAULT_SUCCESS_EMOJI: &str = "✅";

/// Emoji used in the header of failed deployments.
pub const DEFAULT_FAILURE_EMOJI: &str = "❌";

fn default_true() -> bool {
    true
}

fn default_success_emoji() -> String {
    DEFAULT_SUCCESS_EMOJI.to_string()
}

fn default_failure_emoji() -> String {
    DEFAULT_FAILURE_EMOJI.to_string()
}

/// Enhanced notification settings for one site.
///
/// Field names on the wire match the keys written by earlier releases, so
/// existing blobs keep loading. Missing keys fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Whether enhanced notifications are sent for this site.
    #[serde(default)]
    pub enabled: bool,

    /// Include the commit hash, author and message.
    #[serde(default = "default_true")]
    pub include_commit_info: bool,

    /// Include how long the deployment took.
    #[serde(default = "default_true")]
    pub include_duration: bool,

    /// Include the server name and IP.
    #[serde(default)]
    pub include_server_info: bool,

    /// Include the tail of the deployment log on failure.
    #[serde(default)]
    pub include_log_snippet: bool,

    /// Header emoji for successful deployments.
    #[serde(rename = "custom_success_emoji", default = "default_success_emoji")]
    pub success_emoji: String,

    /// Header emoji for failed deployments.
    #[serde(rename = "custom_failure_emoji", default = "default_failure_emoji")]
    pub failure_emoji: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            include_commit_info: true,
            include_duration: true,
            include_server_info: false,
            include_log_snippet: false,
            success_emoji: default_success_emoji(),
            failure_emoji: default_failure_emoji(),
        }
    }
}

impl NotificationConfig {
    /// Default settings with the feature switched on.
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }
}

/// Typed view over a site's `type_data` blob.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeData {
    /// Enhanced notification settings, absent until first enabled.
    #[serde(
        rename = "enhanced_telegram_notifications",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub notifications: Option<NotificationConfig>,

    /// Keys owned by other features.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TypeData {
    /// Returns the notification settings only if they are switched on.
    pub fn active_notifications(&self) -> Option<&NotificationConfig> {
        self.notifications.as_ref().filter(|c| c.enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = NotificationConfig::default();
        assert!(!config.enabled);
        assert!(config.include_commit_info);
        assert!(config.include_duration);
        assert!(!config.include_server_info);
        assert!(!config.include_log_snippet);
        assert_eq!(config.success_emoji, "✅");
        assert_eq!(config.failure_emoji, "❌");
    }

    #[test]
    fn test_wire_keys() {
        let value = serde_json::to_value(NotificationConfig::enabled()).unwrap();
        assert_eq!(value["enabled"], json!(true));
        assert_eq!(value["custom_success_emoji"], json!("✅"));
        assert_eq!(value["custom_failure_emoji"], json!("❌"));
        assert!(value.get("success_emoji").is_none());
    }

    #[test]
    fn test_partial_block_gets_defaults() {
        let config: NotificationConfig =
            serde_json::from_value(json!({ "enabled": true, "include_server_info": true }))
                .unwrap();
        assert!(config.enabled);
        assert!(config.include_server_info);
        assert!(config.include_commit_info);
        assert_eq!(config.failure_emoji, "❌");
    }

    #[test]
    fn test_type_data_preserves_foreign_keys() {
        let raw = json!({
            "composer": "2",
            "enhanced_telegram_notifications": { "enabled": false },
            "web_directory": "public"
        });

        let data: TypeData = serde_json::from_value(raw).unwrap();
        assert_eq!(data.extra.len(), 2);
        assert!(data.notifications.is_some());
        assert!(data.active_notifications().is_none());

        let back = serde_json::to_value(&data).unwrap();
        assert_eq!(back["composer"], json!("2"));
        assert_eq!(back["web_directory"], json!("public"));
    }

    #[test]
    fn test_type_data_without_block() {
        let data: TypeData = serde_json::from_value(json!({})).unwrap();
        assert!(data.notifications.is_none());

        let back = serde_json::to_value(&data).unwrap();
        assert!(back.get(SETTINGS_KEY).is_none());
    }
}
