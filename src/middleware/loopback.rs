//! # LoopbackMiddleware: in-process middleware simulation.
//!
//! Records every call made by the coordinator and lets the caller drive the
//! callbacks a real routing manager would fire:
//!
//! - [`LoopbackMiddleware::set_registered`] → state handler
//! - [`LoopbackMiddleware::set_available`] → availability handler of a service
//! - [`LoopbackMiddleware::respond`] → message handler of a method
//! - [`LoopbackMiddleware::fail_init`] → next `init()` fails
//!
//! By default `start()` immediately reports [`RegistrationState::Registered`],
//! which is what a local routing manager does once the application connects.
//! With [`LoopbackMiddleware::echo_responses`], every `send` is answered with
//! a response carrying the request payload.
//!
//! Handlers are invoked **outside** the internal lock, so a handler may call
//! back into the middleware.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use bytes::Bytes;

use super::{
    AvailabilityHandler, EventId, EventOffer, EventType, MessageHandler, Middleware, MethodId,
    Reliability, RegistrationState, Request, Response, ServiceInstance, StateHandler,
};
use crate::error::MiddlewareError;

/// One recorded middleware call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Init,
    Start,
    Stop,
    RegisterStateHandler,
    RegisterAvailabilityHandler(ServiceInstance),
    RegisterMessageHandler {
        service: ServiceInstance,
        method: MethodId,
    },
    ClearAllHandlers,
    RequestService(ServiceInstance),
    ReleaseService(ServiceInstance),
    OfferService(ServiceInstance),
    StopOfferService(ServiceInstance),
    OfferEvent {
        service: ServiceInstance,
        event: EventId,
        event_type: EventType,
        reliability: Reliability,
    },
    Notify {
        service: ServiceInstance,
        event: EventId,
        payload: Bytes,
    },
    Send {
        service: ServiceInstance,
        method: MethodId,
        payload: Bytes,
        reliable: bool,
    },
}

#[derive(Default)]
struct State {
    calls: Vec<Call>,
    state_handler: Option<StateHandler>,
    availability: HashMap<ServiceInstance, AvailabilityHandler>,
    messages: HashMap<(ServiceInstance, MethodId), MessageHandler>,
    init_failure: Option<String>,
    manual_registration: bool,
    echo: bool,
}

/// In-process [`Middleware`] for tests and demos.
pub struct LoopbackMiddleware {
    name: String,
    state: Mutex<State>,
}

impl LoopbackMiddleware {
    /// Creates a loopback application named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Mutex::new(State::default()),
        }
    }

    /// Makes the next `init()` fail with `reason`.
    #[must_use]
    pub fn fail_init(self, reason: impl Into<String>) -> Self {
        self.lock().init_failure = Some(reason.into());
        self
    }

    /// Disables the automatic registration on `start()`.
    ///
    /// Registration then only happens through [`set_registered`](Self::set_registered).
    #[must_use]
    pub fn manual_registration(self) -> Self {
        self.lock().manual_registration = true;
        self
    }

    /// Answers every `send` with a response echoing the request payload.
    #[must_use]
    pub fn echo_responses(self) -> Self {
        self.lock().echo = true;
        self
    }

    /// Fires the state handler, if one is registered.
    pub fn set_registered(&self, registered: bool) {
        let handler = self.lock().state_handler.clone();
        if let Some(handler) = handler {
            let state = if registered {
                RegistrationState::Registered
            } else {
                RegistrationState::Deregistered
            };
            handler(state);
        }
    }

    /// Fires the availability handler registered for `service`, if any.
    pub fn set_available(&self, service: ServiceInstance, available: bool) {
        let handler = self.lock().availability.get(&service).cloned();
        if let Some(handler) = handler {
            handler(service, available);
        }
    }

    /// Delivers a response to the message handler of `method`, if any.
    pub fn respond(&self, service: ServiceInstance, method: MethodId, payload: impl Into<Bytes>) {
        let handler = self.lock().messages.get(&(service, method)).cloned();
        if let Some(handler) = handler {
            handler(Response {
                service,
                method,
                payload: payload.into(),
            });
        }
    }

    /// Snapshot of all calls so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// Payloads passed to `notify`, in order.
    pub fn notifications(&self) -> Vec<Bytes> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::Notify { payload, .. } => Some(payload.clone()),
                _ => None,
            })
            .collect()
    }

    /// Requests passed to `send`, in order.
    pub fn sent(&self) -> Vec<Bytes> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::Send { payload, .. } => Some(payload.clone()),
                _ => None,
            })
            .collect()
    }

    /// Position of the first call equal to `call`.
    pub fn position(&self, call: &Call) -> Option<usize> {
        self.lock().calls.iter().position(|c| c == call)
    }

    fn record(&self, call: Call) {
        self.lock().calls.push(call);
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Middleware for LoopbackMiddleware {
    fn name(&self) -> &str {
        &self.name
    }

    fn init(&self) -> Result<(), MiddlewareError> {
        let mut st = self.lock();
        st.calls.push(Call::Init);
        match st.init_failure.take() {
            Some(reason) => Err(MiddlewareError::new(reason)),
            None => Ok(()),
        }
    }

    fn start(&self) {
        let manual = {
            let mut st = self.lock();
            st.calls.push(Call::Start);
            st.manual_registration
        };
        if !manual {
            self.set_registered(true);
        }
    }

    fn stop(&self) {
        self.record(Call::Stop);
    }

    fn register_state_handler(&self, handler: StateHandler) {
        let mut st = self.lock();
        st.calls.push(Call::RegisterStateHandler);
        st.state_handler = Some(handler);
    }

    fn register_availability_handler(
        &self,
        service: ServiceInstance,
        handler: AvailabilityHandler,
    ) {
        let mut st = self.lock();
        st.calls.push(Call::RegisterAvailabilityHandler(service));
        st.availability.insert(service, handler);
    }

    fn register_message_handler(
        &self,
        service: ServiceInstance,
        method: MethodId,
        handler: MessageHandler,
    ) {
        let mut st = self.lock();
        st.calls.push(Call::RegisterMessageHandler { service, method });
        st.messages.insert((service, method), handler);
    }

    fn clear_all_handlers(&self) {
        let mut st = self.lock();
        st.calls.push(Call::ClearAllHandlers);
        st.state_handler = None;
        st.availability.clear();
        st.messages.clear();
    }

    fn request_service(&self, service: ServiceInstance) {
        self.record(Call::RequestService(service));
    }

    fn release_service(&self, service: ServiceInstance) {
        self.record(Call::ReleaseService(service));
    }

    fn offer_service(&self, service: ServiceInstance) {
        self.record(Call::OfferService(service));
    }

    fn stop_offer_service(&self, service: ServiceInstance) {
        self.record(Call::StopOfferService(service));
    }

    fn offer_event(&self, offer: &EventOffer) {
        self.record(Call::OfferEvent {
            service: offer.service,
            event: offer.event,
            event_type: offer.event_type,
            reliability: offer.reliability,
        });
    }

    fn notify(&self, service: ServiceInstance, event: EventId, payload: &Bytes) {
        self.record(Call::Notify {
            service,
            event,
            payload: payload.clone(),
        });
    }

    fn send(&self, request: &Request) {
        let echo = {
            let mut st = self.lock();
            st.calls.push(Call::Send {
                service: request.service,
                method: request.method,
                payload: request.payload.clone(),
                reliable: request.reliable,
            });
            st.echo
        };
        if echo {
            self.respond(request.service, request.method, request.payload.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn start_reports_registration_unless_manual() {
        let seen = Arc::new(AtomicUsize::new(0));

        let mw = LoopbackMiddleware::new("auto");
        let s = seen.clone();
        mw.register_state_handler(Arc::new(move |st| {
            assert_eq!(st, RegistrationState::Registered);
            s.fetch_add(1, Ordering::SeqCst);
        }));
        mw.start();
        assert_eq!(seen.load(Ordering::SeqCst), 1);

        let manual = LoopbackMiddleware::new("manual").manual_registration();
        let s = seen.clone();
        manual.register_state_handler(Arc::new(move |_| {
            s.fetch_add(1, Ordering::SeqCst);
        }));
        manual.start();
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn cleared_handlers_are_not_invoked() {
        let mw = LoopbackMiddleware::new("clear");
        let svc = ServiceInstance::new(0x1234, 0x5678);
        mw.register_availability_handler(svc, Arc::new(|_, _| panic!("must not fire")));
        mw.register_state_handler(Arc::new(|_| panic!("must not fire")));
        mw.clear_all_handlers();

        mw.set_available(svc, true);
        mw.set_registered(true);
        assert_eq!(mw.calls().last(), Some(&Call::ClearAllHandlers));
    }

    #[test]
    fn echo_answers_each_request() {
        let mw = LoopbackMiddleware::new("echo").echo_responses();
        let svc = ServiceInstance::new(0x1234, 0x5678);
        let got = Arc::new(Mutex::new(Vec::new()));
        let sink = got.clone();
        mw.register_message_handler(
            svc,
            MethodId(0x0421),
            Arc::new(move |resp| sink.lock().unwrap().push(resp.payload)),
        );

        mw.send(&Request {
            service: svc,
            method: MethodId(0x0421),
            payload: Bytes::from_static(&[7, 8]),
            reliable: true,
        });
        mw.respond(svc, MethodId(0x0999), vec![1]);
        assert_eq!(*got.lock().unwrap(), vec![Bytes::from_static(&[7, 8])]);

        mw.clear_all_handlers();
        mw.respond(svc, MethodId(0x0421), vec![1]);
        assert_eq!(got.lock().unwrap().len(), 1);
    }

    #[test]
    fn init_failure_is_one_shot() {
        let mw = LoopbackMiddleware::new("broken").fail_init("no routing manager");
        assert_eq!(
            mw.init(),
            Err(MiddlewareError::new("no routing manager"))
        );
        assert_eq!(mw.init(), Ok(()));
    }
}
