//! Error types used by the coordinator and its middleware seam.
//!
//! This module defines three error types:
//!
//! - [`InitError`]: raised by [`Coordinator::init`](crate::Coordinator::init); fatal to the process.
//! - [`CoordinatorError`]: raised by runtime operations (`start`, `offer`, `notify_now`, ...).
//! - [`MiddlewareError`]: reported by a [`Middleware`](crate::Middleware) that failed to initialize.
//!
//! Middleware calls other than `init` are fire-and-forget and never produce errors here.
//! Both enums provide `as_label` for logging.

use thiserror::Error;

/// Failure reported by the external middleware during initialization.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct MiddlewareError {
    /// Human-readable cause as reported by the middleware.
    pub reason: String,
}

impl MiddlewareError {
    /// Creates a new middleware error with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// # Errors produced by [`Coordinator::init`](crate::Coordinator::init).
///
/// Initialization is never retried; the process is expected to exit non-zero.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum InitError {
    /// The middleware application could not be initialized.
    #[error("couldn't initialize application `{app}`: {source}")]
    Middleware {
        /// Middleware application name.
        app: String,
        /// Underlying middleware failure.
        #[source]
        source: MiddlewareError,
    },

    /// `init()` was already called on this coordinator.
    #[error("coordinator already initialized")]
    AlreadyInitialized,

    /// `stop()` ran before `init()`.
    #[error("coordinator was stopped before initialization")]
    Stopped,

    /// `init()` was called outside of a tokio runtime, the worker cannot be spawned.
    #[error("no tokio runtime available to spawn the publication worker")]
    NoRuntime,
}

impl InitError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use servicevisor::InitError;
    ///
    /// assert_eq!(InitError::NoRuntime.as_label(), "init_no_runtime");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            InitError::Middleware { .. } => "init_middleware_failed",
            InitError::AlreadyInitialized => "init_already_initialized",
            InitError::Stopped => "init_after_stop",
            InitError::NoRuntime => "init_no_runtime",
        }
    }
}

/// # Errors produced by coordinator operations after initialization.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorError {
    /// Operation requires a successful `init()` first.
    #[error("coordinator is not initialized")]
    NotInitialized,

    /// `start()` is already driving (or has driven) the inbox.
    #[error("coordinator already started")]
    AlreadyStarted,

    /// The process has never been registered with the middleware.
    #[error("application is not registered")]
    NotRegistered,

    /// The service is not currently offered (or not available, for a consumer).
    #[error("service is not offered")]
    NotOffered,

    /// Operation is not supported by this coordinator's binding.
    #[error("operation requires a {expected} binding")]
    WrongRole {
        /// Role the operation needs (`"provider"` or `"consumer"`).
        expected: &'static str,
    },

    /// The coordinator has been stopped.
    #[error("coordinator stopped")]
    Stopped,
}

impl CoordinatorError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use servicevisor::CoordinatorError;
    ///
    /// assert_eq!(CoordinatorError::NotRegistered.as_label(), "not_registered");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            CoordinatorError::NotInitialized => "not_initialized",
            CoordinatorError::AlreadyStarted => "already_started",
            CoordinatorError::NotRegistered => "not_registered",
            CoordinatorError::NotOffered => "not_offered",
            CoordinatorError::WrongRole { .. } => "wrong_role",
            CoordinatorError::Stopped => "stopped",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_error_keeps_middleware_source() {
        let err = InitError::Middleware {
            app: "publisher_example".into(),
            source: MiddlewareError::new("configuration not found"),
        };
        assert_eq!(err.as_label(), "init_middleware_failed");
        assert_eq!(
            err.to_string(),
            "couldn't initialize application `publisher_example`: configuration not found"
        );
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("configuration not found"));
    }

    #[test]
    fn wrong_role_names_expected_binding() {
        let err = CoordinatorError::WrongRole {
            expected: "provider",
        };
        assert_eq!(err.to_string(), "operation requires a provider binding");
        assert_eq!(err.as_label(), "wrong_role");
    }
}
