use std::sync::Arc;

use crate::{
    middleware::Middleware,
    policies::{FixedPayload, NotificationSource, SizeRamp},
    subscribers::Subscribe,
};

use super::{binding::Binding, config::CoordinatorConfig, coordinator::Coordinator};

/// Builder for constructing a [`Coordinator`] with optional features.
pub struct CoordinatorBuilder {
    cfg: CoordinatorConfig,
    middleware: Arc<dyn Middleware>,
    binding: Binding,
    source: Option<Box<dyn NotificationSource>>,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl CoordinatorBuilder {
    pub fn new(cfg: CoordinatorConfig, middleware: Arc<dyn Middleware>, binding: Binding) -> Self {
        Self {
            cfg,
            middleware,
            binding,
            source: None,
            subscribers: Vec::new(),
        }
    }

    /// Sets the payload source of the publication worker.
    ///
    /// Without one, providers publish a [`SizeRamp`] and consumers send a
    /// [`FixedPayload`].
    pub fn with_source(mut self, source: impl NotificationSource) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive coordinator events (registration, offer,
    /// publications, teardown) through dedicated workers with bounded queues.
    /// Their workers are spawned by `init()`.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the coordinator. Nothing is spawned until `init()`.
    pub fn build(self) -> Arc<Coordinator> {
        let source: Box<dyn NotificationSource> = match (self.source, &self.binding) {
            (Some(source), _) => source,
            (None, Binding::Provider { .. }) => Box::new(SizeRamp::default()),
            (None, Binding::Consumer { .. }) => Box::new(FixedPayload::default()),
        };
        Arc::new(Coordinator::new_internal(
            self.cfg,
            self.middleware,
            self.binding,
            source,
            self.subscribers,
        ))
    }
}
