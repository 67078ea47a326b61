//! # LogWriter: tracing event writer
//!
//! A minimal subscriber that writes incoming [`Event`]s through `tracing`.
//! Use it for demos, or as a template for a real log/metrics sink.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! INFO servicevisor: registered
//! INFO servicevisor: offered service=[4321.1111]
//! INFO servicevisor: publication resumed service=[4321.1111] cycle=0
//! DEBUG servicevisor: published service=[4321.1111] cycle=0 len=1
//! INFO servicevisor: shutdown requested
//! INFO servicevisor: worker exited cycles=12
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let service = e.service.map(|s| s.to_string()).unwrap_or_default();
        match e.kind {
            EventKind::Registered => tracing::info!(target: "servicevisor", "registered"),
            EventKind::Deregistered => tracing::info!(target: "servicevisor", "deregistered"),
            EventKind::ServiceRequested => {
                tracing::info!(target: "servicevisor", service = %service, "service requested")
            }
            EventKind::ServiceAvailable => {
                tracing::info!(target: "servicevisor", service = %service, "service available")
            }
            EventKind::ServiceUnavailable => {
                tracing::info!(target: "servicevisor", service = %service, "service NOT available")
            }
            EventKind::ResponseReceived => tracing::info!(
                target: "servicevisor",
                service = %service,
                len = ?e.payload_len,
                "response received"
            ),
            EventKind::Offered => {
                tracing::info!(target: "servicevisor", service = %service, "offered")
            }
            EventKind::OfferStopped => tracing::info!(
                target: "servicevisor",
                service = %service,
                reason = e.reason.as_deref().unwrap_or(""),
                "offer stopped"
            ),
            EventKind::PublicationResumed => tracing::info!(
                target: "servicevisor",
                service = %service,
                cycle = ?e.cycle,
                "publication resumed"
            ),
            EventKind::PublicationPaused => tracing::info!(
                target: "servicevisor",
                service = %service,
                cycle = ?e.cycle,
                "publication paused"
            ),
            EventKind::Published => tracing::debug!(
                target: "servicevisor",
                service = %service,
                cycle = ?e.cycle,
                len = ?e.payload_len,
                manual = e.reason.is_some(),
                "published"
            ),
            EventKind::ShutdownRequested => {
                tracing::info!(target: "servicevisor", "shutdown requested")
            }
            EventKind::WorkerExited => {
                tracing::info!(target: "servicevisor", cycles = ?e.cycle, "worker exited")
            }
            EventKind::WorkerDetached => {
                tracing::info!(target: "servicevisor", "worker detached (stopped from worker task)")
            }
            EventKind::WorkerPanicked => tracing::error!(
                target: "servicevisor",
                reason = e.reason.as_deref().unwrap_or("unknown"),
                "worker panicked"
            ),
            EventKind::SubscriberOverflow => tracing::warn!(
                target: "servicevisor",
                reason = e.reason.as_deref().unwrap_or("unknown"),
                "subscriber overflow"
            ),
            EventKind::SubscriberPanicked => tracing::warn!(
                target: "servicevisor",
                reason = e.reason.as_deref().unwrap_or("unknown"),
                "subscriber panicked"
            ),
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
