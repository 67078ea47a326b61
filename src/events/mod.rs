//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to events emitted by the coordinator, the publication
//! worker and the subscriber workers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Coordinator` (registration, offer, shutdown),
//!   `PublicationWorker` (resume/pause/published), `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the subscriber listener spawned by the builder (fans out to
//!   `SubscriberSet`), and any receiver from `Coordinator::subscribe()`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
