//! # SOME/IP identifiers.
//!
//! Opaque `u16` newtypes for the identifiers the coordinator hands to the
//! middleware. The coordinator never interprets them; range checks are the
//! middleware's business.

use std::fmt;

macro_rules! someip_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u16);

        impl $name {
            /// Returns the raw value.
            #[inline]
            pub const fn value(&self) -> u16 {
                self.0
            }
        }

        impl From<u16> for $name {
            fn from(v: u16) -> Self {
                Self(v)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:04x}", self.0)
            }
        }
    };
}

someip_id!(
    /// Service identifier.
    ServiceId
);
someip_id!(
    /// Service instance identifier.
    InstanceId
);
someip_id!(
    /// Event (notifier) identifier.
    EventId
);
someip_id!(
    /// Eventgroup identifier.
    EventgroupId
);
someip_id!(
    /// Method identifier.
    MethodId
);

/// A service/instance pair, the unit that is offered, requested and released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceInstance {
    pub service: ServiceId,
    pub instance: InstanceId,
}

impl ServiceInstance {
    pub const fn new(service: u16, instance: u16) -> Self {
        Self {
            service: ServiceId(service),
            instance: InstanceId(instance),
        }
    }
}

impl fmt::Display for ServiceInstance {
    /// Formats as `[ssss.iiii]`, the way middleware logs print service instances.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}.{}]", self.service, self.instance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_instance_display_is_zero_padded_hex() {
        let si = ServiceInstance::new(0x1234, 0x5678);
        assert_eq!(si.to_string(), "[1234.5678]");
        assert_eq!(EventId(0x8888).to_string(), "8888");
        assert_eq!(EventgroupId(0x22).to_string(), "0022");
    }
}
