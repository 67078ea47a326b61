//! # Middleware seam.
//!
//! The coordinator never talks SOME/IP itself. Everything protocol-related
//! (routing, discovery, serialization) lives behind the [`Middleware`] trait,
//! which mirrors the application object of the external middleware runtime.
//!
//! ## Contract
//! - All calls are **synchronous** and **fire-and-forget**; only
//!   [`Middleware::init`] reports failure.
//! - [`Middleware::notify`] and [`Middleware::send`] must not sleep; the worker
//!   calls them once per cycle.
//! - Handlers may be invoked from any thread, at any time between `start` and
//!   `clear_all_handlers`.
//! - Any call may re-enter the coordinator's `stop()` synchronously.
//! - `offer_service` and `stop_offer_service` must not re-enter `offer()` or
//!   `stop_offer()`; `notify` and `send` must not re-enter `notify_now()`.
//!
//! ```text
//!  Coordinator                                 Middleware
//!  ───────────                                 ──────────
//!  init()      ── init, register_*_handler ──►
//!              ── offer_event (provider)    ──►
//!  start()     ── start                     ──►
//!              ◄── state handler(Registered) ──
//!              ── offer_service / request_service ──►
//!  worker      ── notify / send (per cycle) ──►
//!              ◄── message handler(Response) ── (consumer)
//!  stop()      ── clear_all_handlers, stop_offer_service / release_service, stop ──►
//! ```

mod ids;
mod loopback;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;

use crate::error::MiddlewareError;

pub use ids::{EventId, EventgroupId, InstanceId, MethodId, ServiceId, ServiceInstance};
pub use loopback::{Call, LoopbackMiddleware};

/// Registration state reported by the middleware's state handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistrationState {
    /// The application is attached to the routing layer.
    Registered,
    /// The application lost (or never had) its routing attachment.
    Deregistered,
}

impl RegistrationState {
    #[inline]
    pub fn is_registered(self) -> bool {
        matches!(self, RegistrationState::Registered)
    }
}

/// Callback invoked by the middleware on registration changes.
pub type StateHandler = Arc<dyn Fn(RegistrationState) + Send + Sync + 'static>;

/// Callback invoked by the middleware when a requested service appears or disappears.
pub type AvailabilityHandler = Arc<dyn Fn(ServiceInstance, bool) + Send + Sync + 'static>;

/// Callback invoked by the middleware for every response to a sent request.
pub type MessageHandler = Arc<dyn Fn(Response) + Send + Sync + 'static>;

/// Kind of notifier being offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventType {
    /// Plain event, sent on every notify.
    #[default]
    Event,
    /// Event delivered only to selected subscribers.
    SelectiveEvent,
    /// Field: has a current value, sent on change.
    Field,
}

/// Transport reliability requested for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reliability {
    /// Let the middleware configuration decide.
    #[default]
    Unknown,
    /// TCP.
    Reliable,
    /// UDP.
    Unreliable,
}

impl Reliability {
    /// Maps the `use_reliable_transport` flag onto a reliability type.
    #[inline]
    pub fn from_flag(reliable: bool) -> Self {
        if reliable {
            Reliability::Reliable
        } else {
            Reliability::Unreliable
        }
    }
}

/// Predicate deciding whether a new payload differs enough from the previous one to be sent.
#[derive(Clone)]
pub struct EpsilonFn(Arc<dyn Fn(&Bytes, &Bytes) -> bool + Send + Sync + 'static>);

impl EpsilonFn {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Bytes, &Bytes) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Returns `true` if `new` should be published given `old`.
    #[inline]
    pub fn changed(&self, old: &Bytes, new: &Bytes) -> bool {
        (self.0)(old, new)
    }
}

impl fmt::Debug for EpsilonFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EpsilonFn(..)")
    }
}

/// Arguments of the one-time `offer_event` setup call.
#[derive(Debug, Clone)]
pub struct EventOffer {
    pub service: ServiceInstance,
    pub event: EventId,
    pub eventgroups: Vec<EventgroupId>,
    pub event_type: EventType,
    /// Middleware-side resend cycle (`Duration::ZERO` = none).
    pub cycle: Duration,
    pub change_resets_cycle: bool,
    pub update_on_change: bool,
    pub epsilon: Option<EpsilonFn>,
    pub reliability: Reliability,
}

/// A request message sent once per cycle by a consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub service: ServiceInstance,
    pub method: MethodId,
    pub payload: Bytes,
    /// Send over TCP instead of UDP.
    pub reliable: bool,
}

/// A response message received for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub service: ServiceInstance,
    pub method: MethodId,
    pub payload: Bytes,
}

/// Application object of the external SOME/IP middleware.
///
/// Implementations wrap the real runtime (FFI binding, pure-Rust stack, ...)
/// or simulate it, see [`LoopbackMiddleware`].
pub trait Middleware: Send + Sync + 'static {
    /// Application name, used in logs.
    fn name(&self) -> &str;

    /// Initializes the application (configuration, routing connection).
    fn init(&self) -> Result<(), MiddlewareError>;

    /// Starts message dispatch. Must not block the caller.
    fn start(&self);

    /// Stops message dispatch.
    fn stop(&self);

    fn register_state_handler(&self, handler: StateHandler);

    fn register_availability_handler(
        &self,
        service: ServiceInstance,
        handler: AvailabilityHandler,
    );

    /// Registers `handler` for responses to `method` of `service`.
    fn register_message_handler(
        &self,
        service: ServiceInstance,
        method: MethodId,
        handler: MessageHandler,
    );

    /// Drops every handler registered so far; no callback fires afterwards.
    fn clear_all_handlers(&self);

    fn request_service(&self, service: ServiceInstance);

    fn release_service(&self, service: ServiceInstance);

    fn offer_service(&self, service: ServiceInstance);

    fn stop_offer_service(&self, service: ServiceInstance);

    fn offer_event(&self, offer: &EventOffer);

    /// Publishes `payload` on `event` to current subscribers.
    fn notify(&self, service: ServiceInstance, event: EventId, payload: &Bytes);

    /// Sends a request message.
    fn send(&self, request: &Request);
}
