//! # Fixed payload.
//!
//! Emits the same payload on every call, the request-client pattern where one
//! prepared request is re-sent each cycle.

use bytes::Bytes;

use super::source::NotificationSource;

/// Source that always yields the same payload.
#[derive(Clone, Debug)]
pub struct FixedPayload {
    payload: Bytes,
}

impl FixedPayload {
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    /// `[0, 1, .., len-1]` (each byte `i % 256`).
    pub fn counting(len: usize) -> Self {
        let data: Vec<u8> = (0..len).map(|i| (i % 256) as u8).collect();
        Self::new(data)
    }
}

impl Default for FixedPayload {
    fn default() -> Self {
        Self::counting(10)
    }
}

impl NotificationSource for FixedPayload {
    fn next(&mut self) -> Bytes {
        self.payload.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counting_payload_repeats() {
        let mut src = FixedPayload::default();
        let first = src.next();
        assert_eq!(&first[..], &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(src.next(), first);
    }

    #[test]
    fn test_counting_wraps_bytes() {
        let mut src = FixedPayload::counting(300);
        let p = src.next();
        assert_eq!(p[255], 255);
        assert_eq!(p[256], 0);
    }
}
