//! Resource subscription sinks.
//!
//! A `Subscribe(uri)` call hands the caller a channel-like sink the
//! provider pushes update signals into (spec §4.2 "Resource subscriptions")
//! plus a cleanup handle. Modeled on `clawde-io-apps`'s broadcast fan-out in
//! `daemon/src/ipc/mod.rs`, but translated from one broadcast stream shared
//! by many subscribers to one `mpsc` sink per `Subscribe` call, since here
//! each subscription is its own edge-triggered consumer rather than a shared
//! topic. Sends never block the provider: a full mailbox means the consumer
//! is behind, so the newest signal is dropped rather than stalling whichever
//! task holds the write side.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, Notify};

/// Depth of a subscription's update mailbox. Updates coalesce under
/// backpressure, so a shallow buffer is deliberate.
const MAILBOX_CAPACITY: usize = 8;

/// A single update signal delivered to a subscriber: the resource changed.
#[derive(Debug, Clone)]
pub struct ResourceUpdate {
    /// URI of the resource that changed
    pub uri: String,
}

/// The receiving half of a subscription, returned to whatever forwards
/// updates onward (the dispatcher, ultimately a transport).
pub struct SubscriptionSink {
    receiver: mpsc::Receiver<ResourceUpdate>,
    closed: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl SubscriptionSink {
    /// Wait for the next update. Resolves to `None` once the subscription
    /// has been cancelled or the provider has dropped its source.
    pub async fn recv(&mut self) -> Option<ResourceUpdate> {
        if self.closed.load(Ordering::SeqCst) {
            return None;
        }
        tokio::select! {
            biased;
            () = self.notify.notified() => None,
            msg = self.receiver.recv() => msg,
        }
    }

    /// Drain one pending update without waiting. `true` if one was taken.
    pub fn try_recv(&mut self) -> bool {
        self.receiver.try_recv().is_ok()
    }
}

/// The sending half a provider holds to publish resource-changed signals.
#[derive(Clone)]
pub struct SubscriptionSource {
    sender: mpsc::Sender<ResourceUpdate>,
    closed: Arc<AtomicBool>,
}

impl SubscriptionSource {
    /// Publish an update. Non-blocking: if the subscriber's mailbox is full,
    /// or the subscription has been cancelled, the update is silently
    /// dropped rather than stalling the publisher.
    pub fn publish(&self, uri: impl Into<String>) {
        if self.closed.load(Ordering::SeqCst) {
            return;
        }
        let _ = self.sender.try_send(ResourceUpdate { uri: uri.into() });
    }
}

/// A cleanup handle returned alongside a [`SubscriptionSink`].
///
/// `resources/unsubscribe` calls [`Self::cancel`] explicitly; dropping every
/// clone without cancelling leaves the subscription live until the
/// provider-side [`SubscriptionSource`] is itself dropped. Cancellation is
/// idempotent.
#[derive(Clone)]
pub struct SubscriptionHandle {
    closed: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl SubscriptionHandle {
    /// Close the subscription, exactly once.
    pub fn cancel(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.notify.notify_waiters();
    }

    /// Whether `cancel` has already run.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// Create a fresh subscription: a source to publish into, a sink to read
/// from, and a cleanup handle.
#[must_use]
pub fn subscription() -> (SubscriptionSource, SubscriptionSink, SubscriptionHandle) {
    let (sender, receiver) = mpsc::channel(MAILBOX_CAPACITY);
    let closed = Arc::new(AtomicBool::new(false));
    let notify = Arc::new(Notify::new());

    let source = SubscriptionSource {
        sender,
        closed: Arc::clone(&closed),
    };
    let sink = SubscriptionSink {
        receiver,
        closed: Arc::clone(&closed),
        notify: Arc::clone(&notify),
    };
    let handle = SubscriptionHandle { closed, notify };

    (source, sink, handle)
}
