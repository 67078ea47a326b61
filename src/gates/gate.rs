//! # Gate: a boolean condition with async wait.
//!
//! Backed by [`tokio::sync::watch`]: the value change and the wake-up of all
//! waiters happen under the channel's lock, so a waiter can never miss an edge
//! that happened between its check and its wait.
//!
//! ```text
//! writer: set(true) ──► watch::Sender::send_if_modified ──► wake all receivers
//! reader: wait_until(true) ──► subscribe() ──► wait_for(|v| v == true)
//!                                  └─ returns immediately if already true
//! ```

use std::sync::Arc;

use tokio::sync::watch;

/// Single-writer/multi-reader boolean gate.
///
/// Cheap to clone; clones observe and mutate the same value.
#[derive(Clone, Debug)]
pub struct Gate {
    tx: Arc<watch::Sender<bool>>,
}

impl Gate {
    /// Creates a gate holding `initial`.
    pub fn new(initial: bool) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Sets the value and wakes all waiters.
    ///
    /// Returns `true` if the value changed (an edge), `false` if it already held `value`.
    /// Waiters are only woken on an edge.
    pub fn set(&self, value: bool) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        })
    }

    /// Returns the current value without blocking.
    #[inline]
    pub fn get(&self) -> bool {
        *self.tx.borrow()
    }

    /// Waits until the gate holds `value`.
    ///
    /// Returns immediately if it already does.
    pub async fn wait_until(&self, value: bool) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as `self`, so the channel cannot close under us.
        let _ = rx.wait_for(|v| *v == value).await;
    }
}
