//! Plugin bootstrap.
//!
//! `boot` registers the site features for every supported site type and
//! subscribes a single listener to the deployment event bus. Booting again
//! refreshes the registry but never adds a second listener.

use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex, RwLock};
use std::thread::{self, JoinHandle};

use deploy_notify_events::{DeploymentCompleted, EventBus};
use deploy_notify_models::SiteType;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use crate::error::{NotifyError, Result};
use crate::notifier::DeploymentNotifier;
use crate::registry::{FeatureRegistry, SiteFeature};

/// Display name of the plugin.
pub const PLUGIN_NAME: &str = "Enhanced Telegram Deployment Notifications";

/// One-line description of the plugin.
pub const PLUGIN_DESCRIPTION: &str = "Provides detailed Telegram notifications for deployments \
     with commit info, duration tracking, and custom templates";

/// The enhanced notification plugin.
pub struct Plugin {
    bus: EventBus,
    notifier: Arc<DeploymentNotifier>,
    registry: RwLock<FeatureRegistry>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl Plugin {
    /// Creates an unbooted plugin.
    pub fn new(bus: EventBus, notifier: DeploymentNotifier) -> Self {
        Self {
            bus,
            notifier: Arc::new(notifier),
            registry: RwLock::new(FeatureRegistry::new()),
            listener: Mutex::new(None),
        }
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    /// Description.
    pub fn description(&self) -> &'static str {
        PLUGIN_DESCRIPTION
    }

    /// Registers features and the deployment listener.
    ///
    /// Returns `true` if this call started the listener, `false` if it was
    /// already running. Notifications are delivered on `runtime`.
    pub fn boot(&self, runtime: Handle) -> Result<bool> {
        {
            let mut registry = self
                .registry
                .write()
                .map_err(|e| NotifyError::Listener(e.to_string()))?;
            for site_type in SiteType::ALL {
                registry.register(SiteFeature::enhanced_notifications(site_type));
            }
            debug!(features = registry.len(), "Site features registered");
        }

        let mut listener = self
            .listener
            .lock()
            .map_err(|e| NotifyError::Listener(e.to_string()))?;
        if listener.is_some() {
            debug!("Deployment listener already registered");
            return Ok(false);
        }

        let receiver = self.bus.subscribe();
        let notifier = Arc::clone(&self.notifier);
        let handle = thread::Builder::new()
            .name("deploy-notify-listener".to_string())
            .spawn(move || listen(receiver, notifier, runtime))?;
        *listener = Some(handle);

        info!(plugin = PLUGIN_NAME, channels = self.notifier.channel_count(), "Plugin booted");
        Ok(true)
    }

    /// True once the listener has been registered.
    pub fn is_booted(&self) -> bool {
        self.listener.lock().map(|l| l.is_some()).unwrap_or(false)
    }

    /// Snapshot of the registered features.
    pub fn registry(&self) -> FeatureRegistry {
        self.registry.read().map(|r| r.clone()).unwrap_or_default()
    }

    /// The bus the plugin listens on.
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }
}

/// Listener loop; ends when every handle to the bus is dropped.
fn listen(
    receiver: Receiver<DeploymentCompleted>,
    notifier: Arc<DeploymentNotifier>,
    runtime: Handle,
) {
    while let Ok(event) = receiver.recv() {
        debug!(event = event.name(), site_id = %event.site_id(), "Received event");
        match runtime.block_on(notifier.handle(&event)) {
            Ok(report) => debug!(?report, "Event handled"),
            Err(e) => warn!(site_id = %event.site_id(), error = %e, "Failed to handle deployment event"),
        }
    }
    info!("Deployment listener stopped");
}
