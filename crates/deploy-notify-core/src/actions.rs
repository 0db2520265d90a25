//! Enable/disable enhanced notifications on a site.
//!
//! Both actions edit `site.type_data` in place; saving the site is up to the
//! caller. Settings are validated once, here, so readers never need to
//! re-check or re-default them.

use deploy_notify_models::{NotificationConfig, Site};
use tracing::{debug, info};

use crate::error::{CoreError, Result};

/// Maximum length of a custom emoji, in characters.
const MAX_EMOJI_CHARS: usize = 10;

/// Settings submitted with the enable action. Unset fields take defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnableRequest {
    pub include_commit_info: Option<bool>,
    pub include_duration: Option<bool>,
    pub include_server_info: Option<bool>,
    pub include_log_snippet: Option<bool>,
    pub success_emoji: Option<String>,
    pub failure_emoji: Option<String>,
}

impl EnableRequest {
    /// Checks field constraints and builds the full settings block.
    pub fn into_config(self) -> Result<NotificationConfig> {
        let defaults = NotificationConfig::enabled();

        Ok(NotificationConfig {
            enabled: true,
            include_commit_info: self.include_commit_info.unwrap_or(defaults.include_commit_info),
            include_duration: self.include_duration.unwrap_or(defaults.include_duration),
            include_server_info: self.include_server_info.unwrap_or(defaults.include_server_info),
            include_log_snippet: self.include_log_snippet.unwrap_or(defaults.include_log_snippet),
            success_emoji: emoji_or_default(
                "success emoji",
                self.success_emoji,
                defaults.success_emoji,
            )?,
            failure_emoji: emoji_or_default(
                "failure emoji",
                self.failure_emoji,
                defaults.failure_emoji,
            )?,
        })
    }
}

/// Blank values count as unset. Other values are stored as submitted.
fn emoji_or_default(
    field: &'static str,
    value: Option<String>,
    default: String,
) -> Result<String> {
    let value = match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => return Ok(default),
    };

    let chars = value.chars().count();
    if chars > MAX_EMOJI_CHARS {
        return Err(CoreError::InvalidEmoji {
            field,
            reason: format!("{} characters, at most {} allowed", chars, MAX_EMOJI_CHARS),
        });
    }
    Ok(value)
}

/// Result of a settings action, with the messages shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    /// Whether the site's settings changed.
    pub changed: bool,
    /// Confirmation message.
    pub success: String,
    /// Follow-up hint.
    pub info: String,
}

/// Switches enhanced notifications on, replacing any previous settings.
pub fn enable(site: &mut Site, request: EnableRequest) -> Result<ActionOutcome> {
    let config = request.into_config()?;
    let changed = site.type_data.notifications.as_ref() != Some(&config);

    info!(
        site_id = %site.id,
        domain = %site.domain,
        commit = config.include_commit_info,
        duration = config.include_duration,
        server = config.include_server_info,
        log_snippet = config.include_log_snippet,
        "Enabling enhanced notifications"
    );
    site.type_data.notifications = Some(config);

    Ok(ActionOutcome {
        changed,
        success: "Enhanced Telegram notifications enabled for this site".to_string(),
        info: "Notifications will include additional deployment details based on your configuration"
            .to_string(),
    })
}

/// Switches enhanced notifications off, keeping the rest of the settings.
///
/// Sites that never enabled the feature are left untouched.
pub fn disable(site: &mut Site) -> ActionOutcome {
    let changed = match site.type_data.notifications.as_mut() {
        Some(config) => std::mem::replace(&mut config.enabled, false),
        None => {
            debug!(site_id = %site.id, "No notification settings to disable");
            false
        }
    };

    if changed {
        info!(site_id = %site.id, domain = %site.domain, "Disabled enhanced notifications");
    }

    ActionOutcome {
        changed,
        success: "Enhanced Telegram notifications disabled for this site".to_string(),
        info: "Standard notifications will be used for future deployments".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deploy_notify_models::SiteType;

    fn site() -> Site {
        Site::new(SiteType::Wordpress, "blog.example.com", "main")
    }

    #[test]
    fn test_enable_applies_defaults() {
        let mut site = site();
        let outcome = enable(&mut site, EnableRequest::default()).unwrap();

        assert!(outcome.changed);
        assert_eq!(site.type_data.notifications, Some(NotificationConfig::enabled()));
    }

    #[test]
    fn test_enable_uses_request_values() {
        let mut site = site();
        let request = EnableRequest {
            include_commit_info: Some(false),
            include_server_info: Some(true),
            include_log_snippet: Some(true),
            success_emoji: Some("🚀".to_string()),
            ..EnableRequest::default()
        };
        enable(&mut site, request).unwrap();

        let config = site.type_data.notifications.unwrap();
        assert!(config.enabled);
        assert!(!config.include_commit_info);
        assert!(config.include_duration);
        assert!(config.include_server_info);
        assert!(config.include_log_snippet);
        assert_eq!(config.success_emoji, "🚀");
        assert_eq!(config.failure_emoji, "❌");
    }

    #[test]
    fn test_enable_blank_emoji_falls_back() {
        let mut site = site();
        let request = EnableRequest {
            failure_emoji: Some("  ".to_string()),
            ..EnableRequest::default()
        };
        enable(&mut site, request).unwrap();
        assert_eq!(site.type_data.notifications.unwrap().failure_emoji, "❌");
    }

    #[test]
    fn test_enable_stores_emoji_as_submitted() {
        let mut site = site();
        let request = EnableRequest {
            success_emoji: Some(" 🎉 ".to_string()),
            ..EnableRequest::default()
        };
        enable(&mut site, request).unwrap();
        assert_eq!(site.type_data.notifications.unwrap().success_emoji, " 🎉 ");
    }

    #[test]
    fn test_enable_rejects_long_emoji() {
        let mut site = site();
        let request = EnableRequest {
            success_emoji: Some("deployed!!!".to_string()),
            ..EnableRequest::default()
        };

        let err = enable(&mut site, request).unwrap_err();
        assert!(matches!(err, CoreError::InvalidEmoji { field: "success emoji", .. }));
        assert!(site.type_data.notifications.is_none());
    }

    #[test]
    fn test_enable_is_idempotent() {
        let mut site = site();
        assert!(enable(&mut site, EnableRequest::default()).unwrap().changed);
        assert!(!enable(&mut site, EnableRequest::default()).unwrap().changed);
    }

    #[test]
    fn test_enable_keeps_foreign_keys() {
        let mut site = site();
        site.type_data
            .extra
            .insert("php_version".to_string(), serde_json::json!("8.3"));

        enable(&mut site, EnableRequest::default()).unwrap();
        assert_eq!(site.type_data.extra["php_version"], serde_json::json!("8.3"));
    }

    #[test]
    fn test_disable_without_settings_is_noop() {
        let mut site = site();
        let outcome = disable(&mut site);

        assert!(!outcome.changed);
        assert!(site.type_data.notifications.is_none());
    }

    #[test]
    fn test_enable_then_disable_preserves_fields() {
        let mut site = site();
        let request = EnableRequest {
            include_duration: Some(false),
            include_log_snippet: Some(true),
            failure_emoji: Some("🛑".to_string()),
            ..EnableRequest::default()
        };
        enable(&mut site, request).unwrap();
        let enabled = site.type_data.notifications.clone().unwrap();

        assert!(disable(&mut site).changed);
        assert!(!disable(&mut site).changed);

        let disabled = site.type_data.notifications.unwrap();
        assert!(!disabled.enabled);
        assert_eq!(
            disabled,
            NotificationConfig {
                enabled: false,
                ..enabled
            }
        );
        assert_eq!(disabled.failure_emoji, "🛑");
    }
}
