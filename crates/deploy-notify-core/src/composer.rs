//! Deployment notification messages.
//!
//! Two renderings exist for every finished deployment:
//!
//! - the **rich** message sent to chat channels (Telegram), using the legacy
//!   Markdown markers `*bold*`, `` `code` `` and `_italic_`, with optional
//!   sections driven by the site's [`NotificationConfig`]
//! - the **plain** one-line summary used by channels that render text as-is
//!   (email, Slack, Discord)
//!
//! Section order and spacing are part of the output contract.

use std::fmt;

use chrono::{DateTime, Local, TimeZone, Utc};
use chrono_tz::Tz;
use deploy_notify_models::{Deployment, NotificationConfig, Site};
use tracing::debug;

/// Commit messages longer than this are cut and end in `...`.
pub const COMMIT_MESSAGE_LIMIT: usize = 200;

/// Number of trailing log lines shown for failed deployments.
pub const LOG_SNIPPET_LINES: usize = 10;

/// Characters of the commit hash shown.
const SHORT_HASH_LEN: usize = 7;

const ELLIPSIS: &str = "...";

/// How a channel renders messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    Telegram,
    Email,
    Slack,
    Discord,
}

impl ChannelKind {
    /// True if the channel understands Markdown emphasis.
    pub fn is_rich(&self) -> bool {
        matches!(self, ChannelKind::Telegram)
    }

    /// Lowercase channel name, for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelKind::Telegram => "telegram",
            ChannelKind::Email => "email",
            ChannelKind::Slack => "slack",
            ChannelKind::Discord => "discord",
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders the message a channel of the given kind should receive.
pub fn render(
    kind: ChannelKind,
    deployment: &Deployment,
    site: &Site,
    config: &NotificationConfig,
) -> String {
    if kind.is_rich() {
        compose(deployment, site, config)
    } else {
        compose_plain(deployment, site)
    }
}

/// Composes the rich message stamped with the local time.
///
/// The stamp carries the zone abbreviation (`UTC`, `CET`) when the local
/// zone can be named, and the numeric offset otherwise.
///
/// Does not look at `config.enabled`; callers decide whether to send at all.
pub fn compose(deployment: &Deployment, site: &Site, config: &NotificationConfig) -> String {
    match local_zone() {
        Some(tz) => compose_at(deployment, site, config, &Utc::now().with_timezone(&tz)),
        None => compose_at(deployment, site, config, &Local::now()),
    }
}

/// The local time zone, from `TZ` or the system setting.
pub fn local_zone() -> Option<Tz> {
    let from_env = std::env::var("TZ").ok();
    zone_named(from_env.as_deref()).or_else(|| {
        let system = iana_time_zone::get_timezone()
            .map_err(|e| debug!(error = %e, "System time zone unavailable"))
            .ok()?;
        zone_named(Some(&system))
    })
}

/// Parses an IANA zone name; `TZ` values may carry a leading `:`.
fn zone_named(name: Option<&str>) -> Option<Tz> {
    name?.trim_start_matches(':').parse().ok()
}

/// Composes the rich message stamped with `now`.
pub fn compose_at<Tz>(
    deployment: &Deployment,
    site: &Site,
    config: &NotificationConfig,
    now: &DateTime<Tz>,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let emoji = if deployment.status.is_success() {
        &config.success_emoji
    } else {
        &config.failure_emoji
    };
    let status = deployment.status.as_str().to_uppercase();

    let mut message = format!("{} *Deployment {}*\n\n", emoji, status);
    message.push_str(&format!("🌐 *Site:* `{}`\n", site.domain));
    message.push_str(&format!("🌿 *Branch:* `{}`\n", site.branch));

    if config.include_server_info {
        if let Some(server) = &site.server {
            message.push_str(&format!("🖥️ *Server:* {} ({})\n", server.name, server.ip));
        }
    }

    if config.include_commit_info {
        if let Some(commit_id) = &deployment.commit_id {
            message.push_str("\n📝 *Commit Details:*\n");
            message.push_str(&format!("• *Hash:* `{}`\n", short_hash(commit_id)));

            if let Some(data) = &deployment.commit_data {
                if let Some(author) = &data.author {
                    message.push_str(&format!("• *Author:* {}\n", author));
                }
                if let Some(text) = &data.message {
                    message.push_str(&format!(
                        "• *Message:* _{}_\n",
                        truncate(text, COMMIT_MESSAGE_LIMIT)
                    ));
                }
            }
        }
    }

    if config.include_duration {
        if let Some(elapsed) = deployment.elapsed() {
            message.push_str(&format!("\n⏱️ *Duration:* {}\n", format_duration(elapsed)));
        }
    }

    match &deployment.release {
        Some(release) => {
            message.push_str(&format!("📦 *Release:* `{}`\n", release));
            message.push_str("🚀 *Type:* Modern Deployment\n");
        }
        None => message.push_str("🚀 *Type:* Classic Deployment\n"),
    }

    if deployment.status.is_failure() && config.include_log_snippet {
        if let Some(snippet) = log_snippet(deployment) {
            message.push_str(&format!("\n📋 *Last Log Lines:*\n```\n{}\n```\n", snippet));
        }
    }

    message.push_str(&format!("\n🕐 *Time:* {}", now.format("%Y-%m-%d %H:%M:%S %Z")));
    message.push_str(&format!("\n🔗 *Deployment ID:* #{}", deployment.id));

    message
}

/// One-line summary for channels without rich formatting.
///
/// Commit and duration are added whenever the data exists, independent of
/// the site's settings.
pub fn compose_plain(deployment: &Deployment, site: &Site) -> String {
    let outcome = if deployment.status.is_success() {
        "completed successfully"
    } else {
        "failed"
    };
    let mut message = format!("Deployment for site [{}] has {}", site.domain, outcome);

    if let Some(commit_id) = &deployment.commit_id {
        message.push_str(&format!(" (commit: {})", short_hash(commit_id)));
    }

    if let Some(elapsed) = deployment.elapsed() {
        message.push_str(&format!(" - Duration: {}", format_duration(elapsed)));
    }

    message
}

/// Subject line for email delivery.
pub fn email_subject(site: &Site) -> String {
    format!("Deployment Completed - {}", site.domain)
}

/// Formats an elapsed time as `1h 2m 3s`, `2m 3s` or `3s`.
///
/// Hours are not wrapped into days. Negative spans are shown by magnitude.
pub fn format_duration(elapsed: chrono::Duration) -> String {
    let total = elapsed.num_seconds().unsigned_abs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// Cuts `text` to at most `limit` characters, ending in `...` when cut.
pub fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let keep = limit.saturating_sub(ELLIPSIS.len());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

fn short_hash(commit_id: &str) -> String {
    commit_id.chars().take(SHORT_HASH_LEN).collect()
}

/// Last lines of the deployment log, or None when there is nothing to show.
fn log_snippet(deployment: &Deployment) -> Option<String> {
    let log = deployment.log.as_ref()?;

    let content = match log.read_content() {
        Ok(content) => content,
        Err(e) => {
            debug!(deployment_id = deployment.id, error = %e, "Deployment log unreadable, omitting snippet");
            return None;
        }
    };

    let content = content.trim_end_matches(['\r', '\n']);
    if content.is_empty() {
        return None;
    }

    let lines: Vec<&str> = content.split('\n').collect();
    let start = lines.len().saturating_sub(LOG_SNIPPET_LINES);
    Some(lines[start..].join("\n"))
}
