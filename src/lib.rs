//! # servicevisor
//!
//! **Servicevisor** coordinates the lifecycle of a service-oriented
//! middleware application: initialize, wait for registration, offer or
//! request a service, publish on a fixed cycle while offered, and shut down
//! exactly once.
//!
//! The middleware itself (routing, discovery, serialization) sits behind the
//! [`Middleware`] trait. [`LoopbackMiddleware`] is an in-process
//! implementation for tests and demos.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!            ┌────────────────────────────────────────────────┐
//!            │  Middleware (external)                         │
//!            │  state / availability / message handlers       │
//!            └──────┬──────────────────▲──────────────────────┘
//!                   │ Transition       │ offer / request / notify / send
//!                   ▼                  │
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  Coordinator                                                     │
//! │  - inbox (callbacks applied in order on the start() task)        │
//! │  - RegistrationGate ("registered")                               │
//! │  - AvailabilityGate ("offered" / "service available")            │
//! │  - Bus (broadcast events)                                        │
//! └──────┬──────────────────────────────┬────────────────────────────┘
//!        ▼                              ▼
//! ┌──────────────────────┐    ┌────────────────────────┐
//! │  PublicationWorker   │    │  subscriber listener   │
//! │  waits on the gate,  │    └───────────┬────────────┘
//! │  source.next() and   │                ▼
//! │  publish every cycle │          SubscriberSet
//! └──────────────────────┘       ┌────────┼────────┐
//!                                ▼        ▼        ▼
//!                              sub1     sub2     subN
//! ```
//!
//! ### Lifecycle
//! ```text
//! builder().build() ──► init() ──► start() ─────────────────────────────► returns after stop()
//!                        │          │
//!                        │          ├─ Registered   → offer() (auto) / request_service
//!                        │          ├─ Available    → gate opens (consumer)
//!                        │          └─ Deregistered → gate kept (or retracted)
//!                        │
//!                        └─ worker: while offered { publish; sleep(cycle) }
//!
//! stop(): cancel → clear handlers → stop offer / release → middleware.stop → join worker
//! ```
//!
//! ## Features
//! | Area              | Description                                              | Key types / traits                          |
//! |-------------------|----------------------------------------------------------|---------------------------------------------|
//! | **Coordination**  | Registration, offer, periodic publication, teardown.     | [`Coordinator`], [`LifecycleState`]         |
//! | **Binding**       | Provider (notify an event) or consumer (send a request). | [`Binding`], [`EventSpec`], [`RequestSpec`] |
//! | **Payloads**      | What is published each cycle.                            | [`NotificationSource`], [`SizeRamp`], [`ToggleEvery`] |
//! | **Middleware**    | The seam to the routing layer.                           | [`Middleware`], [`LoopbackMiddleware`]      |
//! | **Subscriber API**| Hook into lifecycle events (logging, metrics).           | [`Subscribe`]                               |
//! | **Errors**        | Typed errors for init and runtime operations.            | [`InitError`], [`CoordinatorError`]         |
//! | **Configuration** | Cycle interval, transport, offer policy.                 | [`CoordinatorConfig`]                       |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use servicevisor::{
//!     Binding, Coordinator, CoordinatorConfig, EventId, EventSpec, EventgroupId,
//!     LoopbackMiddleware, ServiceInstance,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = CoordinatorConfig {
//!         cycle_interval: Duration::from_millis(10),
//!         ..CoordinatorConfig::default()
//!     };
//!     let middleware = Arc::new(LoopbackMiddleware::new("publisher"));
//!     let binding = Binding::provider(
//!         ServiceInstance::new(0x4321, 0x1111),
//!         EventSpec::event(EventId(0x8888)).in_group(EventgroupId(0x2222)),
//!     );
//!
//!     let coord = Coordinator::builder(cfg, middleware.clone(), binding).build();
//!     coord.init()?;
//!
//!     let runner = Arc::clone(&coord);
//!     let events = tokio::spawn(async move { runner.start().await });
//!
//!     tokio::time::sleep(Duration::from_millis(35)).await;
//!     coord.stop().await;
//!     events.await??;
//!
//!     assert!(!middleware.notifications().is_empty());
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod gates;
mod middleware;
mod policies;
mod subscribers;

// ---- Public re-exports ----

pub use core::{
    Binding, Coordinator, CoordinatorBuilder, CoordinatorConfig, EventSpec, LifecycleState,
    RequestSpec, Transition,
};
pub use error::{CoordinatorError, InitError, MiddlewareError};
pub use events::{Bus, Event, EventKind};
pub use gates::{AvailabilityGate, Gate, RegistrationGate};
pub use middleware::{
    AvailabilityHandler, Call, EpsilonFn, EventId, EventOffer, EventType, EventgroupId, InstanceId,
    LoopbackMiddleware, MessageHandler, MethodId, Middleware, RegistrationState, Reliability,
    Request, Response, ServiceId, ServiceInstance, StateHandler,
};
pub use policies::{FixedPayload, NotificationSource, Pattern, SizeRamp, SourceFn, ToggleEvery};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
