//! # Periodic publication loop.
//!
//! The worker owns the [`NotificationSource`] and the cycle counter. It is
//! spawned by `init()` and parked on the availability gate until the service
//! is offered (provider) or available (consumer).
//!
//! ```text
//! loop {
//!   wait: cancelled ─────────────────────────────► exit
//!         gate open  ──► PublicationResumed
//!   while gate open {
//!       lock(payload); cancelled? ──yes──────────► exit
//!                      gate closed? ──yes────────► break
//!       payload = source.next(); publish; unlock
//!       Published
//!       wait: cancelled ─────────────────────────► exit
//!             gate closed ──► break
//!             cycle_interval elapsed ──► continue
//!   }
//!   PublicationPaused
//! }
//! ```
//!
//! ## Rules
//! - The cancellation check, the gate check and the middleware call happen
//!   under the payload lock. `stop()` cancels and `stop_offer()` closes the
//!   gate while holding the same lock, so no publish starts after either.
//! - The source is never advanced while the gate is closed.
//! - A gate that closes mid-sleep wakes the worker immediately.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use bytes::Bytes;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::{
    events::{Bus, Event, EventKind},
    gates::AvailabilityGate,
    middleware::{Middleware, ServiceInstance},
    policies::NotificationSource,
};

use super::binding::Emit;

enum Outcome {
    Published,
    GateClosed,
    Cancelled,
}

pub(crate) struct PublicationWorker {
    pub(crate) service: ServiceInstance,
    pub(crate) emit: Emit,
    pub(crate) middleware: Arc<dyn Middleware>,
    pub(crate) availability: AvailabilityGate,
    pub(crate) payload: Arc<Mutex<Bytes>>,
    pub(crate) source: Box<dyn NotificationSource>,
    pub(crate) interval: Duration,
    pub(crate) bus: Bus,
}

impl PublicationWorker {
    /// Runs until `running` is cancelled; returns the number of completed cycles.
    pub(crate) async fn run(mut self, running: CancellationToken) -> u32 {
        let mut cycles: u32 = 0;

        'outer: loop {
            tokio::select! {
                biased;
                _ = running.cancelled() => break,
                _ = self.availability.wait_until(true) => {}
            }
            self.bus.publish(
                Event::new(EventKind::PublicationResumed)
                    .with_service(self.service)
                    .with_cycle(cycles),
            );

            while self.availability.get() {
                match self.publish_once(&running, cycles) {
                    Outcome::Cancelled => break 'outer,
                    Outcome::GateClosed => break,
                    Outcome::Published => cycles = cycles.wrapping_add(1),
                }

                tokio::select! {
                    biased;
                    _ = running.cancelled() => break 'outer,
                    _ = self.availability.wait_until(false) => {}
                    _ = time::sleep(self.interval) => {}
                }
            }

            self.bus.publish(
                Event::new(EventKind::PublicationPaused)
                    .with_service(self.service)
                    .with_cycle(cycles),
            );
        }
        cycles
    }

    /// Publishes the next payload unless cancelled or the gate closed meanwhile.
    fn publish_once(&mut self, running: &CancellationToken, cycle: u32) -> Outcome {
        let mut slot = self.payload.lock().unwrap_or_else(PoisonError::into_inner);
        if running.is_cancelled() {
            return Outcome::Cancelled;
        }
        if !self.availability.get() {
            return Outcome::GateClosed;
        }
        *slot = self.source.next();
        self.emit.publish(self.middleware.as_ref(), &slot);
        let len = slot.len();
        drop(slot);

        self.bus.publish(
            Event::new(EventKind::Published)
                .with_service(self.service)
                .with_cycle(cycle)
                .with_payload_len(len),
        );
        Outcome::Published
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Binding;
    use crate::middleware::{EventId, LoopbackMiddleware};
    use crate::policies::SizeRamp;
    use crate::EventSpec;

    fn worker(
        mw: Arc<LoopbackMiddleware>,
        gate: AvailabilityGate,
    ) -> (PublicationWorker, Arc<Mutex<Bytes>>) {
        let service = ServiceInstance::new(0x4321, 0x1111);
        let binding = Binding::provider(service, EventSpec::event(EventId(0x8888)));
        let payload = Arc::new(Mutex::new(Bytes::new()));
        let w = PublicationWorker {
            service,
            emit: Emit::new(&binding, false),
            middleware: mw,
            availability: gate,
            payload: Arc::clone(&payload),
            source: Box::new(SizeRamp::default()),
            interval: Duration::from_millis(100),
            bus: Bus::new(64),
        };
        (w, payload)
    }

    #[tokio::test(start_paused = true)]
    async fn test_parked_worker_never_publishes() {
        let mw = Arc::new(LoopbackMiddleware::new("worker"));
        let (w, _) = worker(Arc::clone(&mw), AvailabilityGate::new());
        let token = CancellationToken::new();
        let h = tokio::spawn(w.run(token.clone()));

        time::sleep(Duration::from_secs(5)).await;
        token.cancel();
        assert_eq!(h.await.unwrap(), 0);
        assert!(mw.notifications().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_publishes_once_per_cycle_and_pauses() {
        let mw = Arc::new(LoopbackMiddleware::new("worker"));
        let gate = AvailabilityGate::new();
        let (w, payload) = worker(Arc::clone(&mw), gate.clone());
        let token = CancellationToken::new();
        let h = tokio::spawn(w.run(token.clone()));

        gate.set(true);
        // publishes at t=0, 100, 200
        time::sleep(Duration::from_millis(250)).await;
        gate.set(false);
        time::sleep(Duration::from_secs(1)).await;

        let sent = mw.notifications();
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[2].len(), 3);
        assert_eq!(*payload.lock().unwrap(), sent[2]);

        token.cancel();
        assert_eq!(h.await.unwrap(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gate_closed_under_the_lock_skips_the_publish() {
        let mw = Arc::new(LoopbackMiddleware::new("worker"));
        let gate = AvailabilityGate::new();
        let (mut w, payload) = worker(Arc::clone(&mw), gate.clone());
        let token = CancellationToken::new();
        gate.set(true);

        assert!(matches!(w.publish_once(&token, 0), Outcome::Published));
        {
            let _held = payload.lock().unwrap();
            gate.set(false);
        }
        assert!(matches!(w.publish_once(&token, 1), Outcome::GateClosed));
        token.cancel();
        assert!(matches!(w.publish_once(&token, 1), Outcome::Cancelled));
        assert_eq!(mw.notifications().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resumes_without_skipping_source_values() {
        let mw = Arc::new(LoopbackMiddleware::new("worker"));
        let gate = AvailabilityGate::new();
        let (w, _) = worker(Arc::clone(&mw), gate.clone());
        let token = CancellationToken::new();
        let h = tokio::spawn(w.run(token.clone()));

        gate.set(true);
        time::sleep(Duration::from_millis(50)).await;
        gate.set(false);
        time::sleep(Duration::from_secs(3)).await;
        gate.set(true);
        time::sleep(Duration::from_millis(50)).await;
        token.cancel();
        h.await.unwrap();

        let lens: Vec<usize> = mw.notifications().iter().map(Bytes::len).collect();
        assert_eq!(lens, vec![1, 2]);
    }
}
