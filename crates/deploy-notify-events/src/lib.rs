//! Thread-safe deployment event bus with pub/sub.
//!
//! The host emits a [`DeploymentCompleted`] event whenever a deployment
//! reaches a final state. Listeners subscribe once and receive a clone of
//! every event on their own `mpsc` channel.
//!
//! # Example
//!
//! ```no_run
//! use deploy_notify_events::{DeploymentCompleted, EventBus};
//! use deploy_notify_models::Deployment;
//!
//! let bus = EventBus::new();
//! let receiver = bus.subscribe();
//!
//! let deployment = Deployment::builder(1, "site-1", "finished").build();
//! bus.emit(DeploymentCompleted::new(deployment)).unwrap();
//!
//! let event = receiver.recv().unwrap();
//! assert_eq!(event.deployment.id, 1);
//! ```

pub mod bus;
pub mod error;
pub mod event;

pub use bus::EventBus;
pub use error::{EventError, Result};
pub use event::{DeploymentCompleted, DEPLOYMENT_COMPLETED};
