//! EventBus - thread-safe deployment event fan-out.
//!
//! - `Arc<RwLock<VecDeque>>` keeps a bounded history of recent events
//! - `mpsc` channels deliver each event to every subscriber

use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, RwLock};

use deploy_notify_models::SiteId;
use tracing::debug;

use crate::error::{EventError, Result};
use crate::event::DeploymentCompleted;

/// Number of events kept for inspection.
const HISTORY_LIMIT: usize = 100;

/// Thread-safe event bus with pub/sub support.
///
/// Cloning the bus is cheap and every clone shares the same subscribers and
/// history.
#[derive(Clone, Default)]
pub struct EventBus {
    /// Recent events, oldest first.
    history: Arc<RwLock<VecDeque<DeploymentCompleted>>>,
    /// List of subscriber channels.
    subscribers: Arc<RwLock<Vec<Sender<DeploymentCompleted>>>>,
}

impl EventBus {
    /// Creates an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to deployment events.
    ///
    /// The receiver gets a clone of every event emitted after this call and
    /// disconnects once every clone of the bus is dropped.
    pub fn subscribe(&self) -> Receiver<DeploymentCompleted> {
        let (tx, rx) = mpsc::channel();

        if let Ok(mut subs) = self.subscribers.write() {
            subs.push(tx);
        }

        rx
    }

    /// Emits an event to all subscribers.
    ///
    /// Returns the number of subscribers that received it. Subscribers whose
    /// receiver was dropped are removed.
    pub fn emit(&self, event: DeploymentCompleted) -> Result<usize> {
        {
            let mut history = self
                .history
                .write()
                .map_err(|e| EventError::LockPoisoned(e.to_string()))?;
            while history.len() >= HISTORY_LIMIT {
                history.pop_front();
            }
            history.push_back(event.clone());
        }

        let mut subs = self
            .subscribers
            .write()
            .map_err(|e| EventError::LockPoisoned(e.to_string()))?;
        subs.retain(|tx| tx.send(event.clone()).is_ok());

        debug!(
            event = event.name(),
            site_id = %event.site_id(),
            deployment_id = event.deployment.id,
            delivered = subs.len(),
            "Event emitted"
        );
        Ok(subs.len())
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().map(|s| s.len()).unwrap_or(0)
    }

    /// Most recent events, newest first.
    pub fn recent(&self, limit: usize) -> Vec<DeploymentCompleted> {
        match self.history.read() {
            Ok(history) => history.iter().rev().take(limit).cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Recent events for one site, newest first.
    pub fn recent_for_site(&self, site_id: &SiteId) -> Vec<DeploymentCompleted> {
        match self.history.read() {
            Ok(history) => history
                .iter()
                .rev()
                .filter(|e| e.site_id() == site_id)
                .cloned()
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Returns the number of events in the history.
    pub fn len(&self) -> usize {
        self.history.read().map(|h| h.len()).unwrap_or(0)
    }

    /// Returns true if nothing has been emitted yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deploy_notify_models::Deployment;
    use std::thread;
    use std::time::Duration;

    fn make_event(site: &str, id: u64) -> DeploymentCompleted {
        DeploymentCompleted::new(Deployment::builder(id, site, "finished").build())
    }

    #[test]
    fn test_subscribe_receives_events() {
        let bus = EventBus::new();
        let rx = bus.subscribe();

        assert_eq!(bus.emit(make_event("site-1", 1)).unwrap(), 1);

        let received = rx.recv_timeout(Duration::from_secs(1)).unwrap();
        assert_eq!(received.deployment.id, 1);
    }

    #[test]
    fn test_multiple_subscribers() {
        let bus = EventBus::new();
        let rx1 = bus.subscribe();
        let rx2 = bus.subscribe();

        assert_eq!(bus.emit(make_event("site-1", 2)).unwrap(), 2);

        assert_eq!(rx1.recv_timeout(Duration::from_secs(1)).unwrap().deployment.id, 2);
        assert_eq!(rx2.recv_timeout(Duration::from_secs(1)).unwrap().deployment.id, 2);
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let bus = EventBus::new();
        let rx = bus.subscribe();
        drop(rx);

        assert_eq!(bus.emit(make_event("site-1", 1)).unwrap(), 0);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_emit_without_subscribers_keeps_history() {
        let bus = EventBus::new();
        assert!(bus.is_empty());

        bus.emit(make_event("site-1", 1)).unwrap();
        bus.emit(make_event("site-2", 2)).unwrap();
        bus.emit(make_event("site-1", 3)).unwrap();

        assert_eq!(bus.len(), 3);
        let ids: Vec<u64> = bus.recent(2).iter().map(|e| e.deployment.id).collect();
        assert_eq!(ids, vec![3, 2]);

        let site_ids: Vec<u64> = bus
            .recent_for_site(&SiteId::from("site-1"))
            .iter()
            .map(|e| e.deployment.id)
            .collect();
        assert_eq!(site_ids, vec![3, 1]);
    }

    #[test]
    fn test_history_is_bounded() {
        let bus = EventBus::new();
        for id in 0..(HISTORY_LIMIT as u64 + 5) {
            bus.emit(make_event("site-1", id)).unwrap();
        }
        assert_eq!(bus.len(), HISTORY_LIMIT);
        assert_eq!(bus.recent(1)[0].deployment.id, HISTORY_LIMIT as u64 + 4);
    }

    #[test]
    fn test_emit_from_other_thread() {
        let bus = EventBus::new();
        let rx = bus.subscribe();

        let producer = bus.clone();
        let handle = thread::spawn(move || {
            producer.emit(make_event("site-1", 77)).unwrap();
        });
        handle.join().unwrap();

        assert_eq!(rx.recv_timeout(Duration::from_secs(1)).unwrap().deployment.id, 77);
    }
}
