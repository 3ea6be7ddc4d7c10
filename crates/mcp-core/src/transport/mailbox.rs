//! Per-session outbound mailbox shared by the SSE and streamable HTTP
//! transports (spec §4.4, §5).
//!
//! Generalizes `registry::subscription`'s `Notify`-guarded sink shape, but
//! with spec §5's overflow policy: a full mailbox drops the *oldest* queued
//! frame to make room for the new one, rather than silently dropping the
//! new one the way a `try_send` over a bounded `mpsc` channel would.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use tokio::sync::Notify;
use tracing::warn;

/// Maximum undelivered frames a mailbox holds before it starts dropping the
/// oldest (spec §5 "Outbound mailbox: bounded, drop-oldest").
pub const MAILBOX_CAPACITY: usize = 100;

/// A bounded, drop-oldest queue of encoded JSON-RPC frames bound for one
/// session's outbound stream (an SSE `event: message`, or a streamable-HTTP
/// websocket send).
#[derive(Default)]
pub struct Mailbox {
    queue: Mutex<VecDeque<String>>,
    notify: Notify,
    closed: AtomicBool,
}

impl Mailbox {
    /// Create a new, empty mailbox.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an encoded frame, evicting the oldest queued frame if full.
    /// A no-op once the mailbox is closed.
    pub fn push(&self, frame: String) {
        if self.closed.load(Ordering::Acquire) {
            return;
        }
        {
            let mut queue = self.queue.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            if queue.len() >= MAILBOX_CAPACITY {
                queue.pop_front();
                warn!(capacity = MAILBOX_CAPACITY, "outbound mailbox full, dropping oldest frame");
            }
            queue.push_back(frame);
        }
        self.notify.notify_one();
    }

    /// Wait for and remove the next frame, or `None` once the mailbox is
    /// closed and drained.
    pub async fn recv(&self) -> Option<String> {
        loop {
            {
                let mut queue = self.queue.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
                if let Some(frame) = queue.pop_front() {
                    return Some(frame);
                }
                if self.closed.load(Ordering::Acquire) {
                    return None;
                }
            }
            self.notify.notified().await;
        }
    }

    /// Close the mailbox, waking any pending `recv` so it observes EOF.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.notify.notify_waiters();
    }

    /// Whether the mailbox has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn push_then_recv_round_trips_in_order() {
        let mailbox = Mailbox::new();
        mailbox.push("a".to_string());
        mailbox.push("b".to_string());
        assert_eq!(mailbox.recv().await, Some("a".to_string()));
        assert_eq!(mailbox.recv().await, Some("b".to_string()));
    }

    #[tokio::test]
    async fn overflow_drops_the_oldest_frame() {
        let mailbox = Mailbox::new();
        for i in 0..MAILBOX_CAPACITY + 1 {
            mailbox.push(i.to_string());
        }
        assert_eq!(mailbox.recv().await, Some("1".to_string()));
    }

    #[tokio::test]
    async fn close_wakes_a_pending_recv() {
        let mailbox = Arc::new(Mailbox::new());
        let waiter = tokio::spawn({
            let mailbox = Arc::clone(&mailbox);
            async move { mailbox.recv().await }
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        mailbox.close();
        assert_eq!(waiter.await.unwrap(), None);
    }

    #[tokio::test]
    async fn push_after_close_is_a_no_op() {
        let mailbox = Mailbox::new();
        mailbox.close();
        mailbox.push("late".to_string());
        assert_eq!(mailbox.recv().await, None);
    }
}
