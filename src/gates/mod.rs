//! Synchronization gates.
//!
//! The coordinator's only shared mutable state. Each gate has its own lock,
//! there is no global one.
//!
//! ## Contents
//! - [`Gate`] generic boolean condition with async wait
//! - [`RegistrationGate`] `registered`: process attached to the middleware's routing layer
//! - [`AvailabilityGate`] `offered`: periodic publication may run
//!
//! The named gates are distinct types so a registration flag can never be
//! passed where the availability flag is expected.

mod gate;

pub use gate::Gate;

/// `registered` flag, written by the coordinator while it applies registration transitions.
#[derive(Clone, Debug)]
pub struct RegistrationGate(Gate);

impl RegistrationGate {
    pub fn new() -> Self {
        Self(Gate::new(false))
    }

    /// Sets the flag; returns `true` on an edge.
    pub fn set(&self, registered: bool) -> bool {
        self.0.set(registered)
    }

    #[inline]
    pub fn get(&self) -> bool {
        self.0.get()
    }

    pub async fn wait_until(&self, registered: bool) {
        self.0.wait_until(registered).await
    }
}

impl Default for RegistrationGate {
    fn default() -> Self {
        Self::new()
    }
}

/// `offered` flag, written by `offer()` / `stop_offer()`; the publication worker waits on it.
#[derive(Clone, Debug)]
pub struct AvailabilityGate(Gate);

impl AvailabilityGate {
    pub fn new() -> Self {
        Self(Gate::new(false))
    }

    /// Sets the flag; returns `true` on an edge.
    pub fn set(&self, offered: bool) -> bool {
        self.0.set(offered)
    }

    #[inline]
    pub fn get(&self) -> bool {
        self.0.get()
    }

    pub async fn wait_until(&self, offered: bool) {
        self.0.wait_until(offered).await
    }
}

impl Default for AvailabilityGate {
    fn default() -> Self {
        Self::new()
    }
}
