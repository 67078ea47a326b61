//! Payload policies.
//!
//! This module groups the knobs that decide **what** the publication worker
//! sends each cycle. The alternation rule is a policy, not part of the
//! coordinator contract.
//!
//! ## Contents
//! - [`NotificationSource`] the trait the worker calls once per cycle
//! - [`SizeRamp`]    payload length `1..=max_len`, wrapping (publisher)
//! - [`ToggleEvery`] two patterns switching every `period` calls (field server)
//! - [`FixedPayload`] same payload every call (request client)
//! - [`SourceFn`]    closure over the call index
//!
//! ## Quick wiring
//! ```text
//! Coordinator::builder(cfg, middleware, binding).with_source(src)
//!      └─► PublicationWorker owns src:
//!           - src.next() once per cycle while offered
//!           - never called while the gate is closed
//! ```
//!
//! ## Defaults
//! - Provider binding → `SizeRamp::default()` (max 9 bytes).
//! - Consumer binding → `FixedPayload::default()` (`[0..10)`).

mod fixed;
mod ramp;
mod source;
mod toggle;

pub use fixed::FixedPayload;
pub use ramp::SizeRamp;
pub use source::{NotificationSource, SourceFn};
pub use toggle::{Pattern, ToggleEvery};
