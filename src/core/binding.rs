//! # Binding: what the coordinator offers or requests.
//!
//! ```text
//! Binding::Provider { service, event }   publisher / field server
//!   init      → offer_event(event)
//!   registered→ offer_service          (auto_offer)
//!   per cycle → notify(service, event, payload)
//!   stop      → stop_offer_service
//!
//! Binding::Consumer { service, request } request client
//!   init      → register_availability_handler(service)
//!   registered→ request_service
//!   available → gate opens
//!   per cycle → send(request with payload)
//!   stop      → release_service
//! ```

use std::time::Duration;

use bytes::Bytes;

use crate::middleware::{
    EpsilonFn, EventId, EventOffer, EventType, EventgroupId, Middleware, MethodId, Reliability,
    Request, ServiceInstance,
};

/// Event a provider offers and notifies.
#[derive(Debug, Clone)]
pub struct EventSpec {
    pub event: EventId,
    pub eventgroups: Vec<EventgroupId>,
    pub event_type: EventType,
    /// Middleware-side resend cycle (`Duration::ZERO` = none).
    pub cycle: Duration,
    pub change_resets_cycle: bool,
    pub update_on_change: bool,
    pub epsilon: Option<EpsilonFn>,
    /// `None` = derived from [`CoordinatorConfig::use_reliable_transport`](crate::CoordinatorConfig).
    pub reliability: Option<Reliability>,
}

impl EventSpec {
    /// Plain event with middleware defaults (no resend cycle, update on change).
    pub fn event(event: EventId) -> Self {
        Self {
            event,
            eventgroups: Vec::new(),
            event_type: EventType::Event,
            cycle: Duration::ZERO,
            change_resets_cycle: false,
            update_on_change: true,
            epsilon: None,
            reliability: None,
        }
    }

    /// Field (event with a current value).
    pub fn field(event: EventId) -> Self {
        Self {
            event_type: EventType::Field,
            ..Self::event(event)
        }
    }

    /// Adds the event to `group`.
    #[must_use]
    pub fn in_group(mut self, group: EventgroupId) -> Self {
        if !self.eventgroups.contains(&group) {
            self.eventgroups.push(group);
        }
        self
    }

    #[must_use]
    pub fn with_reliability(mut self, reliability: Reliability) -> Self {
        self.reliability = Some(reliability);
        self
    }

    #[must_use]
    pub fn with_epsilon(mut self, epsilon: EpsilonFn) -> Self {
        self.epsilon = Some(epsilon);
        self
    }

    pub(crate) fn to_offer(&self, service: ServiceInstance, fallback: Reliability) -> EventOffer {
        EventOffer {
            service,
            event: self.event,
            eventgroups: self.eventgroups.clone(),
            event_type: self.event_type,
            cycle: self.cycle,
            change_resets_cycle: self.change_resets_cycle,
            update_on_change: self.update_on_change,
            epsilon: self.epsilon.clone(),
            reliability: self.reliability.unwrap_or(fallback),
        }
    }
}

/// Request a consumer sends each cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestSpec {
    pub method: MethodId,
}

impl RequestSpec {
    pub fn new(method: MethodId) -> Self {
        Self { method }
    }
}

/// Role of a coordinator and the service it is bound to.
#[derive(Debug, Clone)]
pub enum Binding {
    Provider {
        service: ServiceInstance,
        event: EventSpec,
    },
    Consumer {
        service: ServiceInstance,
        request: RequestSpec,
    },
}

impl Binding {
    pub fn provider(service: ServiceInstance, event: EventSpec) -> Self {
        Binding::Provider { service, event }
    }

    pub fn consumer(service: ServiceInstance, method: MethodId) -> Self {
        Binding::Consumer {
            service,
            request: RequestSpec::new(method),
        }
    }

    /// Service instance this binding offers or requests.
    pub fn service(&self) -> ServiceInstance {
        match self {
            Binding::Provider { service, .. } | Binding::Consumer { service, .. } => *service,
        }
    }

    #[inline]
    pub fn is_provider(&self) -> bool {
        matches!(self, Binding::Provider { .. })
    }

    /// `"provider"` or `"consumer"`.
    pub fn role(&self) -> &'static str {
        match self {
            Binding::Provider { .. } => "provider",
            Binding::Consumer { .. } => "consumer",
        }
    }
}

/// The publish primitive resolved from a binding.
#[derive(Debug, Clone)]
pub(crate) enum Emit {
    Notify {
        service: ServiceInstance,
        event: EventId,
    },
    Send {
        service: ServiceInstance,
        method: MethodId,
        reliable: bool,
    },
}

impl Emit {
    pub(crate) fn new(binding: &Binding, reliable: bool) -> Self {
        match binding {
            Binding::Provider { service, event } => Emit::Notify {
                service: *service,
                event: event.event,
            },
            Binding::Consumer { service, request } => Emit::Send {
                service: *service,
                method: request.method,
                reliable,
            },
        }
    }

    /// Hands `payload` to the middleware: one `notify` or one `send`.
    pub(crate) fn publish(&self, middleware: &dyn Middleware, payload: &Bytes) {
        match self {
            Emit::Notify { service, event } => middleware.notify(*service, *event, payload),
            Emit::Send {
                service,
                method,
                reliable,
            } => middleware.send(&Request {
                service: *service,
                method: *method,
                payload: payload.clone(),
                reliable: *reliable,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offer_falls_back_to_config_reliability() {
        let svc = ServiceInstance::new(0x5678, 0x1234);
        let spec = EventSpec::field(EventId(0x9999)).in_group(EventgroupId(0x0022));
        let offer = spec.to_offer(svc, Reliability::Reliable);
        assert_eq!(offer.event_type, EventType::Field);
        assert_eq!(offer.reliability, Reliability::Reliable);
        assert_eq!(offer.eventgroups, vec![EventgroupId(0x0022)]);

        let pinned = EventSpec::event(EventId(0x8888)).with_reliability(Reliability::Unknown);
        assert_eq!(
            pinned.to_offer(svc, Reliability::Reliable).reliability,
            Reliability::Unknown
        );
    }

    #[test]
    fn groups_are_deduplicated() {
        let spec = EventSpec::event(EventId(0x8888))
            .in_group(EventgroupId(0x2222))
            .in_group(EventgroupId(0x2222));
        assert_eq!(spec.eventgroups.len(), 1);
    }

    #[test]
    fn binding_role_and_service() {
        let svc = ServiceInstance::new(0x1234, 0x5678);
        let b = Binding::consumer(svc, MethodId(0x0421));
        assert_eq!(b.role(), "consumer");
        assert!(!b.is_provider());
        assert_eq!(b.service(), svc);
    }
}
