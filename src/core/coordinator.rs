//! # Lifecycle coordinator for one service binding.
//!
//! [`Coordinator`] drives an application through the middleware lifecycle:
//! initialize, wait for registration, offer (or request), publish periodically
//! while offered, and tear everything down exactly once.
//!
//! ## Architecture
//! ```text
//! middleware callbacks ──► Transition ──► inbox (mpsc) ──► start(): apply()
//!   state handler                                           │
//!   availability handler                                    ├─► RegistrationGate
//!   message handler                                         ├─► ResponseReceived
//!                                                           ├─► AvailabilityGate ──► PublicationWorker
//!                                                           └─► Bus (events)             │
//!                                                                                        ▼
//!                                                                    notify / send (middleware)
//! ```
//!
//! Callbacks only enqueue; all transitions are applied on the task running
//! [`Coordinator::start`], so a middleware may fire them from any thread.
//!
//! ## Teardown
//! ```text
//! stop():
//!   first call only (later calls return immediately)
//!   cancel worker token          (under the payload lock unless called from the worker)
//!   ShutdownRequested
//!   clear_all_handlers
//!   gate=false (under the payload lock unless called from the worker)
//!   provider: stop_offer_service   consumer: release_service
//!   middleware.stop
//!   join worker → WorkerExited   | called from worker → detach → WorkerDetached
//!   state = Stopped
//! ```
//!
//! Every gate close takes the payload lock, so once `stop_offer()` or `stop()`
//! has closed the gate no further `notify`/`send` reaches the middleware.
//! No lock is held across `offer_service` or `stop_offer_service` except the
//! offer lock, which `stop()` never takes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use bytes::Bytes;
use tokio::runtime::Handle;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::{self, JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::{
    error::{CoordinatorError, InitError},
    events::{Bus, Event, EventKind},
    gates::{AvailabilityGate, RegistrationGate},
    middleware::{MethodId, Middleware, RegistrationState, ServiceInstance},
    policies::NotificationSource,
    subscribers::{Subscribe, SubscriberSet},
};

use super::{
    binding::{Binding, Emit},
    builder::CoordinatorBuilder,
    config::CoordinatorConfig,
    state::LifecycleState,
    worker::PublicationWorker,
};

/// A middleware callback, queued for the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Registration(RegistrationState),
    Availability {
        service: ServiceInstance,
        available: bool,
    },
    Response {
        service: ServiceInstance,
        method: MethodId,
        payload: Bytes,
    },
}

/// Coordinates one application's registration, offer and periodic publication.
///
/// Build with [`Coordinator::builder`]; share as `Arc<Coordinator>`.
pub struct Coordinator {
    cfg: CoordinatorConfig,
    binding: Binding,
    emit: Emit,
    middleware: Arc<dyn Middleware>,
    bus: Bus,

    registration: RegistrationGate,
    availability: AvailabilityGate,
    ever_registered: AtomicBool,
    initialized: AtomicBool,
    stopped: AtomicBool,
    state: watch::Sender<LifecycleState>,

    /// Cancelled by `stop()`; the worker and the inbox loop watch it.
    running: CancellationToken,
    /// Cancelled once teardown is complete; the subscriber listener drains and exits.
    finished: CancellationToken,

    inbox_tx: mpsc::UnboundedSender<Transition>,
    inbox_rx: Mutex<Option<mpsc::UnboundedReceiver<Transition>>>,

    /// Last published payload; also serializes publishing against `stop()`.
    payload: Arc<Mutex<Bytes>>,
    /// Serializes offer / stop_offer against each other; never taken by `stop()`.
    offer_lock: Mutex<()>,

    source: Mutex<Option<Box<dyn NotificationSource>>>,
    subscribers: Mutex<Vec<Arc<dyn Subscribe>>>,
    worker: Mutex<Option<JoinHandle<u32>>>,
    worker_id: OnceLock<task::Id>,
}

impl Coordinator {
    /// Starts building a coordinator.
    pub fn builder(
        cfg: CoordinatorConfig,
        middleware: Arc<dyn Middleware>,
        binding: Binding,
    ) -> CoordinatorBuilder {
        CoordinatorBuilder::new(cfg, middleware, binding)
    }

    pub(super) fn new_internal(
        cfg: CoordinatorConfig,
        middleware: Arc<dyn Middleware>,
        binding: Binding,
        source: Box<dyn NotificationSource>,
        subscribers: Vec<Arc<dyn Subscribe>>,
    ) -> Self {
        let bus = Bus::new(cfg.bus_capacity_clamped());
        let emit = Emit::new(&binding, cfg.use_reliable_transport);
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        let (state, _) = watch::channel(LifecycleState::Created);

        Self {
            cfg,
            binding,
            emit,
            middleware,
            bus,
            registration: RegistrationGate::new(),
            availability: AvailabilityGate::new(),
            ever_registered: AtomicBool::new(false),
            initialized: AtomicBool::new(false),
            stopped: AtomicBool::new(false),
            state,
            running: CancellationToken::new(),
            finished: CancellationToken::new(),
            inbox_tx,
            inbox_rx: Mutex::new(Some(inbox_rx)),
            payload: Arc::new(Mutex::new(Bytes::new())),
            offer_lock: Mutex::new(()),
            source: Mutex::new(Some(source)),
            subscribers: Mutex::new(subscribers),
            worker: Mutex::new(None),
            worker_id: OnceLock::new(),
        }
    }

    /// Initializes the middleware, registers callbacks and spawns the publication worker.
    ///
    /// Must be called from within a tokio runtime. On error nothing was
    /// spawned and no callback was registered.
    pub fn init(&self) -> Result<(), InitError> {
        let mut source_slot = lock(&self.source);
        if self.stopped.load(Ordering::Acquire) {
            return Err(InitError::Stopped);
        }
        if source_slot.is_none() {
            return Err(InitError::AlreadyInitialized);
        }
        let runtime = Handle::try_current().map_err(|_| InitError::NoRuntime)?;

        self.middleware.init().map_err(|source| InitError::Middleware {
            app: self.middleware.name().to_string(),
            source,
        })?;

        let tx = self.inbox_tx.clone();
        self.middleware.register_state_handler(Arc::new(move |state| {
            let _ = tx.send(Transition::Registration(state));
        }));

        match &self.binding {
            Binding::Provider { service, event } => {
                self.middleware
                    .offer_event(&event.to_offer(*service, self.cfg.reliability()));
            }
            Binding::Consumer { service, request } => {
                let tx = self.inbox_tx.clone();
                self.middleware.register_availability_handler(
                    *service,
                    Arc::new(move |service, available| {
                        let _ = tx.send(Transition::Availability { service, available });
                    }),
                );
                let tx = self.inbox_tx.clone();
                self.middleware.register_message_handler(
                    *service,
                    request.method,
                    Arc::new(move |resp| {
                        let _ = tx.send(Transition::Response {
                            service: resp.service,
                            method: resp.method,
                            payload: resp.payload,
                        });
                    }),
                );
            }
        }

        let Some(source) = source_slot.take() else {
            return Err(InitError::AlreadyInitialized);
        };
        drop(source_slot);

        self.spawn_subscriber_listener(&runtime);

        let worker = PublicationWorker {
            service: self.binding.service(),
            emit: self.emit.clone(),
            middleware: Arc::clone(&self.middleware),
            availability: self.availability.clone(),
            payload: Arc::clone(&self.payload),
            source,
            interval: self.cfg.cycle_interval_clamped(),
            bus: self.bus.clone(),
        };
        let join = runtime.spawn(worker.run(self.running.clone()));
        let _ = self.worker_id.set(join.id());
        *lock(&self.worker) = Some(join);

        self.initialized.store(true, Ordering::Release);
        self.settle_state();
        tracing::debug!(
            app = self.middleware.name(),
            role = self.binding.role(),
            service = %self.binding.service(),
            "initialized"
        );
        Ok(())
    }

    /// Starts the middleware and applies its callbacks until [`stop`](Self::stop).
    ///
    /// Returns `Ok(())` once stopped. Callbacks fired before `start()` are
    /// queued and applied when it begins.
    pub async fn start(&self) -> Result<(), CoordinatorError> {
        if self.stopped.load(Ordering::Acquire) {
            return Err(CoordinatorError::Stopped);
        }
        if !self.initialized.load(Ordering::Acquire) {
            return Err(CoordinatorError::NotInitialized);
        }
        let mut inbox = lock(&self.inbox_rx)
            .take()
            .ok_or(CoordinatorError::AlreadyStarted)?;

        self.middleware.start();

        loop {
            tokio::select! {
                biased;
                _ = self.running.cancelled() => break,
                msg = inbox.recv() => match msg {
                    Some(transition) => self.apply(transition),
                    None => break,
                },
            }
        }
        Ok(())
    }

    /// Applies one middleware transition.
    ///
    /// Called by [`start`](Self::start) for every queued callback. Calling it
    /// directly is only useful when driving the coordinator without a
    /// middleware event loop. Ignored once stopped.
    pub fn apply(&self, transition: Transition) {
        if self.stopped.load(Ordering::Acquire) {
            return;
        }
        match transition {
            Transition::Registration(state) if state.is_registered() => self.on_registered(),
            Transition::Registration(_) => self.on_deregistered(),
            Transition::Availability { service, available } => {
                self.on_availability(service, available)
            }
            Transition::Response {
                service,
                method,
                payload,
            } => self.on_response(service, method, &payload),
        }
    }

    fn on_registered(&self) {
        if !self.registration.set(true) {
            return;
        }
        self.ever_registered.store(true, Ordering::Release);
        self.bus.publish(Event::new(EventKind::Registered));
        self.settle_state();

        match &self.binding {
            Binding::Provider { .. } => {
                if self.cfg.auto_offer {
                    if let Err(e) = self.offer() {
                        tracing::warn!(error = %e, "automatic offer failed");
                    }
                }
            }
            Binding::Consumer { service, .. } => {
                self.middleware.request_service(*service);
                self.bus
                    .publish(Event::new(EventKind::ServiceRequested).with_service(*service));
            }
        }
    }

    fn on_deregistered(&self) {
        if !self.registration.set(false) {
            return;
        }
        self.bus.publish(Event::new(EventKind::Deregistered));

        if self.cfg.retract_on_deregister {
            match &self.binding {
                Binding::Provider { .. } => self.retract("deregistered"),
                Binding::Consumer { service, .. } => {
                    if self.close_gate() {
                        self.bus.publish(
                            Event::new(EventKind::ServiceUnavailable)
                                .with_service(*service)
                                .with_reason("deregistered"),
                        );
                    }
                }
            }
        }
        self.settle_state();
    }

    fn on_availability(&self, service: ServiceInstance, available: bool) {
        if self.binding.is_provider() || service != self.binding.service() {
            tracing::debug!(%service, available, "ignoring availability of unbound service");
            return;
        }
        if available {
            if !self.ever_registered.load(Ordering::Acquire) {
                tracing::warn!(%service, "service available before registration, ignored");
                return;
            }
            if self.availability.set(true) {
                self.bus
                    .publish(Event::new(EventKind::ServiceAvailable).with_service(service));
            }
        } else if self.close_gate() {
            self.bus
                .publish(Event::new(EventKind::ServiceUnavailable).with_service(service));
        }
        self.settle_state();
    }

    fn on_response(&self, service: ServiceInstance, method: MethodId, payload: &Bytes) {
        let Binding::Consumer { request, .. } = &self.binding else {
            tracing::debug!(%service, %method, "ignoring response on a provider");
            return;
        };
        if service != self.binding.service() || method != request.method {
            tracing::debug!(%service, %method, "ignoring response of unbound method");
            return;
        }
        tracing::debug!(%service, %method, len = payload.len(), "response received");
        self.bus.publish(
            Event::new(EventKind::ResponseReceived)
                .with_service(service)
                .with_payload_len(payload.len()),
        );
    }

    /// Offers the bound service and opens the availability gate.
    ///
    /// Idempotent while offered. Requires a provider binding and a confirmed
    /// registration.
    pub fn offer(&self) -> Result<(), CoordinatorError> {
        let Binding::Provider { service, .. } = &self.binding else {
            return Err(CoordinatorError::WrongRole {
                expected: "provider",
            });
        };
        let _guard = lock(&self.offer_lock);
        self.check_live()?;
        if !self.ever_registered.load(Ordering::Acquire) {
            return Err(CoordinatorError::NotRegistered);
        }
        if self.availability.get() {
            return Ok(());
        }

        self.middleware.offer_service(*service);
        tracing::debug!(%service, "offer_service");

        // stop() may have run meanwhile, even from inside offer_service
        let opened = {
            let _guard = (!self.on_worker()).then(|| lock(&self.payload));
            if self.running.is_cancelled() {
                None
            } else {
                Some(self.availability.set(true))
            }
        };
        match opened {
            None => {
                self.middleware.stop_offer_service(*service);
                Err(CoordinatorError::Stopped)
            }
            Some(edge) => {
                if edge {
                    self.bus
                        .publish(Event::new(EventKind::Offered).with_service(*service));
                }
                self.settle_state();
                Ok(())
            }
        }
    }

    /// Withdraws the offer and closes the availability gate.
    ///
    /// Idempotent while not offered. The worker pauses within one cycle and
    /// publishes nothing more until the next [`offer`](Self::offer).
    pub fn stop_offer(&self) -> Result<(), CoordinatorError> {
        if !self.binding.is_provider() {
            return Err(CoordinatorError::WrongRole {
                expected: "provider",
            });
        }
        self.check_live()?;
        self.retract("requested");
        Ok(())
    }

    fn retract(&self, reason: &'static str) {
        let service = self.binding.service();
        {
            let _guard = lock(&self.offer_lock);
            if !self.close_gate() {
                return;
            }
            self.middleware.stop_offer_service(service);
        }
        self.bus.publish(
            Event::new(EventKind::OfferStopped)
                .with_service(service)
                .with_reason(reason),
        );
        self.settle_state();
    }

    /// Publishes `payload` now, outside the cycle, and makes it the current payload.
    ///
    /// Fails with [`CoordinatorError::NotOffered`] while the gate is closed.
    /// Must not be called from inside the middleware's `notify` or `send`.
    pub fn notify_now(&self, payload: impl Into<Bytes>) -> Result<(), CoordinatorError> {
        if !self.initialized.load(Ordering::Acquire) {
            return Err(CoordinatorError::NotInitialized);
        }
        let mut slot = lock(&self.payload);
        if self.running.is_cancelled() {
            return Err(CoordinatorError::Stopped);
        }
        if !self.availability.get() {
            return Err(CoordinatorError::NotOffered);
        }
        *slot = payload.into();
        self.emit.publish(self.middleware.as_ref(), &slot);
        let len = slot.len();
        drop(slot);

        self.bus.publish(
            Event::new(EventKind::Published)
                .with_service(self.binding.service())
                .with_payload_len(len)
                .with_reason("manual"),
        );
        Ok(())
    }

    /// Last payload handed to the middleware (empty before the first publication).
    pub fn current_payload(&self) -> Bytes {
        lock(&self.payload).clone()
    }

    /// Tears the coordinator down. Safe to call repeatedly and from any task,
    /// including from a middleware call made by the worker itself.
    ///
    /// Once this returns (first call), no further publication reaches the middleware.
    pub async fn stop(&self) {
        if self.stopped.swap(true, Ordering::AcqRel) {
            return;
        }
        let worker = lock(&self.worker).take();
        let on_worker = self.on_worker();

        {
            // the worker holds this lock while publishing
            let _guard = (!on_worker).then(|| lock(&self.payload));
            self.running.cancel();
        }
        self.bus.publish(Event::new(EventKind::ShutdownRequested));

        if self.initialized.load(Ordering::Acquire) {
            self.teardown_middleware();
        }

        if let Some(join) = worker {
            if on_worker {
                drop(join);
                self.bus.publish(Event::new(EventKind::WorkerDetached));
            } else {
                match join.await {
                    Ok(cycles) => self
                        .bus
                        .publish(Event::new(EventKind::WorkerExited).with_cycle(cycles)),
                    Err(e) => self.bus.publish(
                        Event::new(EventKind::WorkerPanicked).with_reason(e.to_string()),
                    ),
                }
            }
        }

        self.state.send_replace(LifecycleState::Stopped);
        self.finished.cancel();
        tracing::debug!(app = self.middleware.name(), "stopped");
    }

    fn teardown_middleware(&self) {
        let service = self.binding.service();
        tracing::debug!(%service, role = self.binding.role(), "tearing down middleware");
        self.middleware.clear_all_handlers();
        let was_open = self.close_gate();
        match &self.binding {
            Binding::Provider { .. } => {
                self.middleware.stop_offer_service(service);
                if was_open {
                    self.bus.publish(
                        Event::new(EventKind::OfferStopped)
                            .with_service(service)
                            .with_reason("shutdown"),
                    );
                }
            }
            Binding::Consumer { .. } => self.middleware.release_service(service),
        }
        self.middleware.stop();
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        *self.state.borrow()
    }

    /// Receiver that observes every lifecycle state change.
    pub fn watch_state(&self) -> watch::Receiver<LifecycleState> {
        self.state.subscribe()
    }

    /// Subscribes to the coordinator's event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    pub fn registration(&self) -> &RegistrationGate {
        &self.registration
    }

    pub fn availability(&self) -> &AvailabilityGate {
        &self.availability
    }

    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.cfg
    }

    /// Name of the application as reported by the middleware.
    pub fn app_name(&self) -> &str {
        self.middleware.name()
    }

    /// `true` once [`stop`](Self::stop) has been called.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// `true` when called from the publication worker, which already holds the payload lock.
    fn on_worker(&self) -> bool {
        self.worker_id
            .get()
            .is_some_and(|id| task::try_id() == Some(*id))
    }

    /// Closes the availability gate; returns whether it was open.
    fn close_gate(&self) -> bool {
        let _guard = (!self.on_worker()).then(|| lock(&self.payload));
        self.availability.set(false)
    }

    fn check_live(&self) -> Result<(), CoordinatorError> {
        if self.stopped.load(Ordering::Acquire) {
            return Err(CoordinatorError::Stopped);
        }
        if !self.initialized.load(Ordering::Acquire) {
            return Err(CoordinatorError::NotInitialized);
        }
        Ok(())
    }

    fn settle_state(&self) {
        let next = LifecycleState::derive(
            self.initialized.load(Ordering::Acquire),
            self.ever_registered.load(Ordering::Acquire),
            self.registration.get(),
            self.availability.get(),
        );
        self.state.send_if_modified(|current| {
            if current.is_terminal() || *current == next {
                return false;
            }
            *current = next;
            true
        });
    }

    /// Forwards bus events to the subscriber set until teardown completes.
    fn spawn_subscriber_listener(&self, runtime: &Handle) {
        let subs = std::mem::take(&mut *lock(&self.subscribers));
        if subs.is_empty() {
            return;
        }
        let set = SubscriberSet::new(subs, self.bus.clone());
        let mut rx = self.bus.subscribe();
        let finished = self.finished.clone();

        runtime.spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    msg = rx.recv() => match msg {
                        Ok(ev) => set.emit(&ev),
                        Err(broadcast::error::RecvError::Lagged(_)) => continue,
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                    _ = finished.cancelled() => break,
                }
            }
            set.shutdown().await;
        });
    }
}

fn lock<T: ?Sized>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::core::EventSpec;
    use crate::middleware::{EventId, LoopbackMiddleware, MethodId};

    fn provider(mw: Arc<LoopbackMiddleware>) -> Arc<Coordinator> {
        Coordinator::builder(
            CoordinatorConfig {
                auto_offer: false,
                ..CoordinatorConfig::default()
            },
            mw,
            Binding::provider(
                ServiceInstance::new(0x4321, 0x1111),
                EventSpec::event(EventId(0x8888)),
            ),
        )
        .build()
    }

    #[tokio::test]
    async fn offer_before_init_is_rejected() {
        let c = provider(Arc::new(LoopbackMiddleware::new("app")));
        assert!(matches!(c.offer(), Err(CoordinatorError::NotInitialized)));
        assert!(matches!(
            c.start().await,
            Err(CoordinatorError::NotInitialized)
        ));
    }

    #[tokio::test]
    async fn offer_requires_registration() {
        let mw = Arc::new(LoopbackMiddleware::new("app"));
        let c = provider(Arc::clone(&mw));
        c.init().unwrap();
        assert!(matches!(c.offer(), Err(CoordinatorError::NotRegistered)));
        assert!(!c.availability().get());

        c.apply(Transition::Registration(RegistrationState::Registered));
        c.offer().unwrap();
        c.offer().unwrap();
        assert_eq!(c.state(), LifecycleState::Offering);
        let offers = mw
            .calls()
            .iter()
            .filter(|call| matches!(call, crate::middleware::Call::OfferService(_)))
            .count();
        assert_eq!(offers, 1);
        c.stop().await;
    }

    #[tokio::test]
    async fn consumer_rejects_provider_operations() {
        let c = Coordinator::builder(
            CoordinatorConfig::default(),
            Arc::new(LoopbackMiddleware::new("client")),
            Binding::consumer(ServiceInstance::new(0x1234, 0x5678), MethodId(0x0421)),
        )
        .build();
        c.init().unwrap();
        assert!(matches!(
            c.offer(),
            Err(CoordinatorError::WrongRole { expected: "provider" })
        ));
        assert!(matches!(
            c.stop_offer(),
            Err(CoordinatorError::WrongRole { .. })
        ));
        c.stop().await;
    }

    #[tokio::test]
    async fn duplicate_registration_is_not_an_edge() {
        let c = provider(Arc::new(LoopbackMiddleware::new("app")));
        c.init().unwrap();
        let mut rx = c.subscribe();

        c.apply(Transition::Registration(RegistrationState::Registered));
        c.apply(Transition::Registration(RegistrationState::Registered));
        assert_eq!(rx.recv().await.unwrap().kind, EventKind::Registered);
        assert!(rx.try_recv().is_err());
        c.stop().await;
    }

    #[tokio::test]
    async fn accessors_reflect_the_binding() {
        let c = provider(Arc::new(LoopbackMiddleware::new("app")));
        assert_eq!(c.app_name(), "app");
        assert_eq!(c.binding().role(), "provider");
        assert!(!c.config().auto_offer);
        assert_eq!(c.config().cycle_interval, Duration::from_millis(1000));
        assert!(!c.is_stopped());

        c.stop().await;
        assert!(c.is_stopped());
    }

    #[tokio::test]
    async fn responses_of_the_bound_method_are_reported() {
        let svc = ServiceInstance::new(0x1234, 0x5678);
        let c = Coordinator::builder(
            CoordinatorConfig::default(),
            Arc::new(LoopbackMiddleware::new("client")),
            Binding::consumer(svc, MethodId(0x0421)),
        )
        .build();
        c.init().unwrap();
        let mut rx = c.subscribe();

        c.apply(Transition::Response {
            service: svc,
            method: MethodId(0x0999),
            payload: Bytes::from_static(&[1]),
        });
        c.apply(Transition::Response {
            service: ServiceInstance::new(0x1234, 0x0001),
            method: MethodId(0x0421),
            payload: Bytes::from_static(&[1]),
        });
        c.apply(Transition::Response {
            service: svc,
            method: MethodId(0x0421),
            payload: Bytes::from_static(&[1, 2, 3]),
        });

        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::ResponseReceived);
        assert_eq!(ev.service, Some(svc));
        assert_eq!(ev.payload_len, Some(3));
        assert!(rx.try_recv().is_err());
        c.stop().await;
    }

    #[tokio::test]
    async fn providers_ignore_responses() {
        let c = provider(Arc::new(LoopbackMiddleware::new("app")));
        c.init().unwrap();
        let mut rx = c.subscribe();
        c.apply(Transition::Response {
            service: ServiceInstance::new(0x4321, 0x1111),
            method: MethodId(0x0421),
            payload: Bytes::new(),
        });
        assert!(rx.try_recv().is_err());
        c.stop().await;
    }

    #[test]
    fn init_outside_runtime_fails() {
        let c = provider(Arc::new(LoopbackMiddleware::new("app")));
        assert!(matches!(c.init(), Err(InitError::NoRuntime)));
        assert_eq!(c.state(), LifecycleState::Created);
    }
}
