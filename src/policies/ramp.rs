//! # Size ramp: growing payloads with wrap-around.
//!
//! Call `n` emits `[0, 1, .., len-1]` where `len` runs `1, 2, .., max_len`
//! and then wraps back to `1`.
//!
//! # Example
//! ```rust
//! use servicevisor::{NotificationSource, SizeRamp};
//!
//! let mut ramp = SizeRamp::new(3);
//! assert_eq!(&ramp.next()[..], &[0]);
//! assert_eq!(&ramp.next()[..], &[0, 1]);
//! assert_eq!(&ramp.next()[..], &[0, 1, 2]);
//! assert_eq!(&ramp.next()[..], &[0]);
//! ```

use bytes::Bytes;

use super::source::NotificationSource;

/// Publisher-style source: payload length increments every cycle and wraps.
#[derive(Clone, Debug)]
pub struct SizeRamp {
    max_len: usize,
    len: usize,
}

impl SizeRamp {
    /// Creates a ramp whose longest payload is `max_len` bytes (min 1).
    pub fn new(max_len: usize) -> Self {
        Self {
            max_len: max_len.max(1),
            len: 1,
        }
    }

    /// Length of the payload the next call will emit.
    #[inline]
    pub fn next_len(&self) -> usize {
        self.len
    }
}

impl Default for SizeRamp {
    /// `max_len = 9`: a 10-byte buffer whose size resets when it reaches 10.
    fn default() -> Self {
        Self::new(9)
    }
}

impl NotificationSource for SizeRamp {
    fn next(&mut self) -> Bytes {
        let data: Vec<u8> = (0..self.len).map(|i| i as u8).collect();
        self.len = if self.len >= self.max_len { 1 } else { self.len + 1 };
        Bytes::from(data)
    }
}
