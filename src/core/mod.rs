//! Runtime core: lifecycle coordination and periodic publication.
//!
//! The public API from this module is [`Coordinator`] with its builder,
//! configuration, binding and state types.
//!
//! Internal modules:
//! - [`coordinator`]: applies middleware transitions, offers, tears down;
//! - [`worker`]: the periodic publication loop gated on availability;
//! - [`binding`]: provider/consumer role and the publish primitive it implies;
//! - [`state`]: observable lifecycle state;
//! - [`config`]: timing and policy knobs.

mod binding;
mod builder;
mod config;
mod coordinator;
mod state;
mod worker;

pub use binding::{Binding, EventSpec, RequestSpec};
pub use builder::CoordinatorBuilder;
pub use config::CoordinatorConfig;
pub use coordinator::{Coordinator, Transition};
pub use state::LifecycleState;
