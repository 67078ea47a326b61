//! # Coordinator configuration.
//!
//! Provides [`CoordinatorConfig`], the knobs of one coordinator instance.
//! What is coordinated (service, event or request) is the
//! [`Binding`](crate::Binding); how often and under which policy lives here.
//!
//! ## Sentinel values
//! - `cycle_interval = 0` → clamped to 1ms (a zero cycle would spin)
//! - `bus_capacity = 0` → clamped to 1

use std::time::Duration;

use crate::middleware::Reliability;

/// Configuration for a [`Coordinator`](crate::Coordinator).
///
/// ## Field semantics
/// - `cycle_interval`: time between two publications while offered
/// - `use_reliable_transport`: TCP vs UDP; only affects the offer/request calls
/// - `auto_offer`: offer as soon as registration is confirmed (provider)
/// - `retract_on_deregister`: stop offering when registration is lost
/// - `bus_capacity`: event bus ring buffer size
#[derive(Clone, Debug)]
pub struct CoordinatorConfig {
    /// Publication period.
    pub cycle_interval: Duration,

    /// Reliable (TCP) transport for the event offer / request messages.
    ///
    /// An [`EventSpec`](crate::EventSpec) with an explicit reliability overrides this.
    pub use_reliable_transport: bool,

    /// Offer on the registration edge without waiting for an explicit `offer()`.
    pub auto_offer: bool,

    /// Retract the offer (close the gate) when the middleware reports deregistration.
    ///
    /// With `false` the service stays offered across a transient deregistration
    /// and the worker keeps publishing.
    pub retract_on_deregister: bool,

    /// Capacity of the event bus broadcast channel ring buffer.
    pub bus_capacity: usize,
}

impl CoordinatorConfig {
    /// Returns the publication period, never zero.
    #[inline]
    pub fn cycle_interval_clamped(&self) -> Duration {
        self.cycle_interval.max(Duration::from_millis(1))
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Reliability used when the binding does not pin one.
    #[inline]
    pub fn reliability(&self) -> Reliability {
        Reliability::from_flag(self.use_reliable_transport)
    }
}

impl Default for CoordinatorConfig {
    /// Default configuration:
    ///
    /// - `cycle_interval = 1000ms`
    /// - `use_reliable_transport = false`
    /// - `auto_offer = true`
    /// - `retract_on_deregister = false`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            cycle_interval: Duration::from_millis(1000),
            use_reliable_transport: false,
            auto_offer: true,
            retract_on_deregister: false,
            bus_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_observed_examples() {
        let cfg = CoordinatorConfig::default();
        assert_eq!(cfg.cycle_interval, Duration::from_secs(1));
        assert!(cfg.auto_offer);
        assert!(!cfg.retract_on_deregister);
        assert_eq!(cfg.reliability(), Reliability::Unreliable);
    }

    #[test]
    fn zero_values_are_clamped() {
        let cfg = CoordinatorConfig {
            cycle_interval: Duration::ZERO,
            bus_capacity: 0,
            ..CoordinatorConfig::default()
        };
        assert_eq!(cfg.cycle_interval_clamped(), Duration::from_millis(1));
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }
}
