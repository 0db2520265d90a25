//! Enhanced Telegram deployment notifications.
//!
//! When a deployment finishes, sites that enabled the feature receive a
//! detailed message (commit, duration, server, log tail) instead of the
//! terse default one.
//!
//! # Environment Variables
//!
//! Required for Telegram delivery:
//! - `TELEGRAM_BOT_TOKEN`: Bot token from @BotFather
//! - `TELEGRAM_CHAT_ID`: Chat that receives notifications
//!
//! Optional:
//! - `DEPLOY_NOTIFY_STATE_DIR`: Where sites and deployments are stored
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use deploy_notify_events::EventBus;
//! use deploy_notify_persistence::SiteStore;
//! use deploy_notify_telegram::{DeploymentNotifier, Plugin, TelegramChannel};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let notifier = DeploymentNotifier::new(SiteStore::new("/var/lib/deploy-notify"))
//!         .with_channel(Arc::new(TelegramChannel::from_env()?));
//!
//!     let plugin = Plugin::new(EventBus::new(), notifier);
//!     plugin.boot(tokio::runtime::Handle::current())?;
//!
//!     // Emit deployment events on plugin.bus() from here on.
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod error;
pub mod notifier;
pub mod plugin;
pub mod registry;
pub mod site_actions;
pub mod telegram;
pub mod watcher;

pub use channel::{MemoryChannel, NotificationChannel, OutgoingMessage, StdoutChannel};
pub use error::{NotifyError, Result};
pub use notifier::{DeploymentNotifier, DispatchReport, SkipReason};
pub use plugin::{Plugin, PLUGIN_DESCRIPTION, PLUGIN_NAME};
pub use registry::{ActionKind, FeatureRegistry, SiteFeature, FEATURE_KEY};
pub use site_actions::SiteActions;
pub use telegram::TelegramChannel;
pub use watcher::{StoreWatcher, DEFAULT_POLL_INTERVAL};
