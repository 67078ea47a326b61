//! # Lifecycle state of a coordinator.
//!
//! ```text
//! Created ──init()──► Initialized ──registered──► Registered ──offer()──► Offering
//!                                                     ▲   │                 │
//!                                       registered    │   │ deregistered    │ deregistered
//!                                                     │   ▼                 ▼
//!                                                   Deregistered ◄──────────┘
//!
//! any state ──stop()──► Stopped   (terminal)
//! ```
//!
//! `Deregistered` keeps the availability gate as it was unless
//! `retract_on_deregister` is set, so a deregistered provider may still be
//! publishing.

use std::fmt;

/// Observable lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    Created,
    Initialized,
    Registered,
    Offering,
    Deregistered,
    Stopped,
}

impl LifecycleState {
    /// Derives the state from the gates.
    pub(crate) fn derive(
        initialized: bool,
        ever_registered: bool,
        registered: bool,
        offered: bool,
    ) -> Self {
        match (initialized, ever_registered, registered, offered) {
            (false, ..) => LifecycleState::Created,
            (true, false, _, _) => LifecycleState::Initialized,
            (true, true, false, _) => LifecycleState::Deregistered,
            (true, true, true, true) => LifecycleState::Offering,
            (true, true, true, false) => LifecycleState::Registered,
        }
    }

    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, LifecycleState::Stopped)
    }

    /// Short stable label for logs.
    pub fn as_label(self) -> &'static str {
        match self {
            LifecycleState::Created => "created",
            LifecycleState::Initialized => "initialized",
            LifecycleState::Registered => "registered",
            LifecycleState::Offering => "offering",
            LifecycleState::Deregistered => "deregistered",
            LifecycleState::Stopped => "stopped",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}
