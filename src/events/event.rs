//! # Runtime events emitted by the coordinator and its publication worker.
//!
//! The [`EventKind`] enum classifies event types across four categories:
//! - **Registration events**: the middleware attached/detached the application,
//!   consumer service availability and responses
//! - **Offer events**: the availability gate opened/closed
//! - **Publication events**: worker loop entered/left, one event per publish
//! - **Shutdown events**: teardown requested, worker joined/detached
//!
//! The [`Event`] struct carries optional metadata such as the service
//! instance, cycle number, payload length and a reason.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use servicevisor::{Event, EventKind, ServiceInstance};
//!
//! let ev = Event::new(EventKind::Published)
//!     .with_service(ServiceInstance::new(0x4321, 0x1111))
//!     .with_cycle(3)
//!     .with_payload_len(4);
//!
//! assert_eq!(ev.kind, EventKind::Published);
//! assert_eq!(ev.cycle, Some(3));
//! assert_eq!(ev.payload_len, Some(4));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

use crate::middleware::ServiceInstance;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `reason`: subscriber name and panic message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `reason`: subscriber name and drop reason ("full", "closed")
    SubscriberOverflow,

    // === Registration events ===
    /// Registration edge `false → true`.
    Registered,

    /// Registration edge `true → false`.
    Deregistered,

    /// Consumer asked the middleware for its service.
    ///
    /// Sets:
    /// - `service`
    ServiceRequested,

    /// Consumer observed its service becoming available (gate opened).
    ///
    /// Sets:
    /// - `service`
    ServiceAvailable,

    /// Consumer observed its service disappearing (gate closed).
    ///
    /// Sets:
    /// - `service`
    ServiceUnavailable,

    /// Consumer received a response to its request method.
    ///
    /// Sets:
    /// - `service`
    /// - `payload_len`
    ResponseReceived,

    // === Offer events ===
    /// Provider offered its service (gate opened).
    ///
    /// Sets:
    /// - `service`
    Offered,

    /// Provider stopped offering its service (gate closed).
    ///
    /// Sets:
    /// - `service`
    /// - `reason`: why ("deregistered", "requested", "shutdown")
    OfferStopped,

    // === Publication events ===
    /// Worker entered the publish loop.
    ///
    /// Sets:
    /// - `service`
    /// - `cycle`: cycles completed so far
    PublicationResumed,

    /// Worker left the publish loop because the gate closed.
    ///
    /// Sets:
    /// - `service`
    /// - `cycle`: cycles completed so far
    PublicationPaused,

    /// One payload was handed to the middleware.
    ///
    /// Sets:
    /// - `service`
    /// - `cycle`: 0-based cycle number (absent for a manual publish)
    /// - `payload_len`
    /// - `reason`: `"manual"` for [`notify_now`](crate::Coordinator::notify_now)
    Published,

    // === Shutdown events ===
    /// `stop()` began teardown.
    ShutdownRequested,

    /// The worker was joined.
    ///
    /// Sets:
    /// - `cycle`: total cycles published
    WorkerExited,

    /// `stop()` ran on the worker task; the handle was released without joining.
    WorkerDetached,

    /// The worker task panicked.
    ///
    /// Sets:
    /// - `reason`: join error
    WorkerPanicked,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Service instance the event refers to.
    pub service: Option<ServiceInstance>,
    /// Publication cycle number.
    pub cycle: Option<u32>,
    /// Length of the published payload in bytes.
    pub payload_len: Option<u32>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            service: None,
            cycle: None,
            payload_len: None,
            reason: None,
        }
    }

    #[inline]
    pub fn with_service(mut self, service: ServiceInstance) -> Self {
        self.service = Some(service);
        self
    }

    #[inline]
    pub fn with_cycle(mut self, cycle: u32) -> Self {
        self.cycle = Some(cycle);
        self
    }

    /// Attaches a payload length (saturating at `u32::MAX`).
    #[inline]
    pub fn with_payload_len(mut self, len: usize) -> Self {
        self.payload_len = Some(u32::try_from(len).unwrap_or(u32::MAX));
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_reason(format!("subscriber={subscriber} panic={info}"))
    }

    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }
}
