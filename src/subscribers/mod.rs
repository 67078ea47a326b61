//! # Event subscribers for the coordinator.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out
//! and the optional built-in [`LogWriter`].
//!
//! ## Architecture
//! ```text
//! Coordinator / Worker ── publish(Event) ──► Bus ──► subscriber listener
//!                                                        │
//!                                                        ▼
//!                                                  SubscriberSet::emit
//!                                              ┌─────────┼─────────┐
//!                                              ▼         ▼         ▼
//!                                          LogWriter  Metrics   Custom
//! ```

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
