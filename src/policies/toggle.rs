//! # Two-pattern toggle.
//!
//! Alternates between two payload patterns every `period` calls:
//! call `n` emits pattern A when `(n / period) % 2 == 0`, pattern B otherwise.
//!
//! ```text
//! period = 5
//! call:    0 1 2 3 4 | 5 6 7 8 9 | 10 11 ..
//! pattern: A A A A A | B B B B B | A  A  ..
//! ```
//!
//! The default patterns are the field-server values: A = 10 × `0x00`,
//! B = 5 × `0x11`.

use bytes::Bytes;

use super::source::NotificationSource;

/// Which of the two patterns a call emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    A,
    B,
}

/// Field-server-style source: switches buffers every `period` calls.
#[derive(Clone, Debug)]
pub struct ToggleEvery {
    a: Bytes,
    b: Bytes,
    period: u32,
    calls: u32,
}

impl ToggleEvery {
    /// Creates a toggle between `a` and `b`, switching every `period` calls (min 1).
    pub fn new(period: u32, a: impl Into<Bytes>, b: impl Into<Bytes>) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
            period: period.max(1),
            calls: 0,
        }
    }

    /// Pattern used by call index `n`.
    #[inline]
    pub fn pattern_at(&self, n: u32) -> Pattern {
        if (n / self.period) % 2 == 0 {
            Pattern::A
        } else {
            Pattern::B
        }
    }
}

impl Default for ToggleEvery {
    fn default() -> Self {
        Self::new(5, vec![0x00; 10], vec![0x11; 5])
    }
}

impl NotificationSource for ToggleEvery {
    fn next(&mut self) -> Bytes {
        let out = match self.pattern_at(self.calls) {
            Pattern::A => self.a.clone(),
            Pattern::B => self.b.clone(),
        };
        self.calls = self.calls.wrapping_add(1);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mod_five_toggle_over_twelve_calls() {
        let mut src = ToggleEvery::default();
        let a = Bytes::from(vec![0x00; 10]);
        let b = Bytes::from(vec![0x11; 5]);

        let got: Vec<Bytes> = (0..12).map(|_| src.next()).collect();
        let mut expected = vec![a.clone(); 5];
        expected.extend(vec![b; 5]);
        expected.extend(vec![a; 2]);
        assert_eq!(got, expected);
    }

    #[test]
    fn test_pattern_at_matches_emitted_sequence() {
        let mut src = ToggleEvery::new(3, &b"a"[..], &b"b"[..]);
        for n in 0..20 {
            let expected = match src.pattern_at(n) {
                Pattern::A => &b"a"[..],
                Pattern::B => &b"b"[..],
            };
            assert_eq!(&src.next()[..], expected, "call {n}");
        }
    }

    #[test]
    fn test_period_one_alternates_every_call() {
        let src = ToggleEvery::new(0, &b"a"[..], &b"b"[..]);
        assert_eq!(src.pattern_at(0), Pattern::A);
        assert_eq!(src.pattern_at(1), Pattern::B);
        assert_eq!(src.pattern_at(2), Pattern::A);
    }
}
