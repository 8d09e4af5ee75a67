//! Registry of live reload subscribers
//!
//! The watch loop broadcasts through the registry while connection tasks
//! register and unregister concurrently. Subscribers that fail a delivery are
//! evicted on the spot; the browser script reconnects on its own.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::events::ReloadMessage;

/// Delivery to a subscriber failed; its connection is gone
#[derive(Debug, Error)]
#[error("subscriber connection closed")]
pub struct SendError;

/// A connection that can receive reload notifications.
///
/// `send` must not block: slow transports fail according to their own
/// semantics rather than stalling the broadcast.
pub trait Subscriber: Send + Sync {
    fn send(&self, message: &ReloadMessage) -> Result<(), SendError>;
}

/// Identity of a registration, never reused within one registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

/// Subscriber backed by a channel drained by the connection's writer task.
///
/// Once the writer stops (socket closed) the receiver is dropped and every
/// further send fails.
pub struct ChannelSubscriber {
    tx: mpsc::UnboundedSender<ReloadMessage>,
}

impl ChannelSubscriber {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ReloadMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Subscriber for ChannelSubscriber {
    fn send(&self, message: &ReloadMessage) -> Result<(), SendError> {
        self.tx.send(*message).map_err(|_| SendError)
    }
}

/// Result of one broadcast
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: usize,
    pub evicted: usize,
}

/// Set of live subscribers, keyed by identity
#[derive(Default)]
pub struct Registry {
    subscribers: Mutex<HashMap<SubscriberId, Arc<dyn Subscriber>>>,

    /// Source of registration ids
    next_id: AtomicU64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a subscriber. Registering a handle that is already live returns
    /// its existing id.
    pub fn register(&self, subscriber: Arc<dyn Subscriber>) -> SubscriberId {
        let mut subscribers = self.subscribers.lock();
        if let Some((id, _)) = subscribers
            .iter()
            .find(|(_, live)| Arc::ptr_eq(live, &subscriber))
        {
            return *id;
        }

        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::SeqCst));
        subscribers.insert(id, subscriber);
        debug!(subscribers = subscribers.len(), "subscriber registered");
        id
    }

    /// Drop a subscriber whose connection is known to be closed
    pub fn unregister(&self, id: SubscriberId) -> bool {
        let removed = self.subscribers.lock().remove(&id).is_some();
        if removed {
            debug!("subscriber unregistered");
        }
        removed
    }

    /// Deliver `message` to every subscriber, evicting those that fail.
    ///
    /// The lock is held for the whole pass, so a concurrent registration lands
    /// either before (and receives this message) or after.
    pub fn broadcast(&self, message: &ReloadMessage) -> BroadcastReport {
        let mut report = BroadcastReport::default();
        self.subscribers.lock().retain(|_, subscriber| match subscriber.send(message) {
            Ok(()) => {
                report.delivered += 1;
                true
            }
            Err(e) => {
                warn!(error = %e, "removing subscriber");
                report.evicted += 1;
                false
            }
        });
        debug!(
            delivered = report.delivered,
            evicted = report.evicted,
            "broadcast"
        );
        report
    }

    pub fn len(&self) -> usize {
        self.subscribers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
