//! # NotificationSource: what the worker publishes each cycle.
//!
//! A source is a pure, deterministic function of its own call counter. It is
//! owned by the publication worker and never shared.
//!
//! [`SourceFn`] adapts a closure receiving the call index, so ad-hoc sources
//! need no new type.

use bytes::Bytes;

/// Produces the payload of the next publication cycle.
pub trait NotificationSource: Send + 'static {
    /// Returns the payload for the next cycle and advances the internal counter.
    fn next(&mut self) -> Bytes;
}

impl NotificationSource for Box<dyn NotificationSource> {
    fn next(&mut self) -> Bytes {
        (**self).next()
    }
}

/// Function-backed [`NotificationSource`].
///
/// The closure receives the 0-based call index.
///
/// # Example
/// ```
/// use bytes::Bytes;
/// use servicevisor::{NotificationSource, SourceFn};
///
/// let mut src = SourceFn::new(|n| Bytes::from(n.to_be_bytes().to_vec()));
/// assert_eq!(src.next(), Bytes::from_static(&[0, 0, 0, 0]));
/// assert_eq!(src.next(), Bytes::from_static(&[0, 0, 0, 1]));
/// ```
pub struct SourceFn<F> {
    f: F,
    calls: u32,
}

impl<F> SourceFn<F>
where
    F: FnMut(u32) -> Bytes + Send + 'static,
{
    pub fn new(f: F) -> Self {
        Self { f, calls: 0 }
    }
}

impl<F> NotificationSource for SourceFn<F>
where
    F: FnMut(u32) -> Bytes + Send + 'static,
{
    fn next(&mut self) -> Bytes {
        let out = (self.f)(self.calls);
        self.calls = self.calls.wrapping_add(1);
        out
    }
}
