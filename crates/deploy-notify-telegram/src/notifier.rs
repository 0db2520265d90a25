//! Turns completed deployments into delivered notifications.

use std::sync::Arc;

use deploy_notify_core::{email_subject, render};
use deploy_notify_events::DeploymentCompleted;
use deploy_notify_persistence::SiteStore;
use tracing::{debug, info, warn};

use crate::channel::{NotificationChannel, OutgoingMessage};
use crate::error::Result;

/// Why an event produced no messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The deployment's site is not in the store.
    UnknownSite,
    /// The site never enabled enhanced notifications, or disabled them.
    Disabled,
    /// No channels are configured.
    NoChannels,
}

/// Outcome of handling one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchReport {
    /// Nothing was sent.
    Skipped(SkipReason),
    /// Messages were handed to channels.
    Delivered {
        /// Channels that accepted the message.
        sent: usize,
        /// Channels that failed; their errors were logged.
        failed: usize,
    },
}

/// Delivers enhanced notifications for completed deployments.
///
/// Settings are read from the site store on every event, so changes made by
/// the enable/disable actions apply to the very next deployment.
pub struct DeploymentNotifier {
    sites: SiteStore,
    channels: Vec<Arc<dyn NotificationChannel>>,
}

impl DeploymentNotifier {
    /// Creates a notifier without channels.
    pub fn new(sites: SiteStore) -> Self {
        Self {
            sites,
            channels: Vec::new(),
        }
    }

    /// Adds a delivery channel.
    pub fn with_channel(mut self, channel: Arc<dyn NotificationChannel>) -> Self {
        self.channels.push(channel);
        self
    }

    /// Number of configured channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Handles one completed deployment.
    ///
    /// Channel failures are logged and counted, never returned; only a
    /// failure to read the site's settings is an error.
    pub async fn handle(&self, event: &DeploymentCompleted) -> Result<DispatchReport> {
        let deployment = &event.deployment;

        let Some(site) = self.sites.load_site_optional(event.site_id())? else {
            warn!(site_id = %event.site_id(), deployment_id = deployment.id, "Deployment for unknown site");
            return Ok(DispatchReport::Skipped(SkipReason::UnknownSite));
        };

        let Some(config) = site.type_data.active_notifications() else {
            debug!(site_id = %site.id, "Enhanced notifications not enabled, skipping");
            return Ok(DispatchReport::Skipped(SkipReason::Disabled));
        };

        if self.channels.is_empty() {
            warn!(site_id = %site.id, "No notification channels configured");
            return Ok(DispatchReport::Skipped(SkipReason::NoChannels));
        }

        let subject = email_subject(&site);
        let mut sent = 0;
        let mut failed = 0;

        for channel in &self.channels {
            let message = OutgoingMessage {
                subject: subject.clone(),
                body: render(channel.kind(), deployment, &site, config),
            };

            match channel.send(&message).await {
                Ok(()) => sent += 1,
                Err(e) => {
                    warn!(channel = channel.name(), site_id = %site.id, error = %e, "Failed to deliver notification");
                    failed += 1;
                }
            }
        }

        info!(
            site_id = %site.id,
            deployment_id = deployment.id,
            status = %deployment.status,
            sent,
            failed,
            "Deployment notification dispatched"
        );
        Ok(DispatchReport::Delivered { sent, failed })
    }
}
