#![forbid(unsafe_code)]

//! Binding id generation.
//!
//! Every compile that emits the event binding asks for a fresh id, so the
//! generators only have to guarantee uniqueness per call, never stability.

use crate::error::{EngineError, Result};

/// Source of event-binding ids.
pub trait IdGenerator {
    fn next_id(&mut self) -> Result<String>;
}

/// Base-36 rendering (`0-9a-z`) of `n`.
#[must_use]
pub fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_owned();
    }
    let mut buf = Vec::with_capacity(13);
    while n > 0 {
        buf.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    buf.reverse();
    String::from_utf8_lossy(&buf).into_owned()
}

/// 64 random bits from the OS entropy source, base-36 encoded.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&mut self) -> Result<String> {
        let mut bytes = [0u8; 8];
        getrandom::fill(&mut bytes).map_err(EngineError::Entropy)?;
        Ok(to_base36(u64::from_le_bytes(bytes)))
    }
}

/// Deterministic `prefix` + base-36 counter, starting at 1.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> Result<String> {
        let id = format!("{}{}", self.prefix, to_base36(self.next));
        self.next += 1;
        Ok(id)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn base36_digits() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(u64::MAX), "3w5e11264sgsf");
    }

    #[test]
    fn sequential_ids_count_up() {
        let mut ids = SequentialIds::new("ra");
        let got: Vec<String> = (0..3).map(|_| ids.next_id().expect("id")).collect();
        assert_eq!(got, vec!["ra1", "ra2", "ra3"]);
    }

    #[test]
    fn random_ids_are_base36_and_distinct() {
        let mut ids = RandomIds;
        let got: HashSet<String> = (0..64).map(|_| ids.next_id().expect("id")).collect();
        assert_eq!(got.len(), 64);
        assert!(got.iter().all(|id| id.bytes().all(|b| b.is_ascii_digit() || b.is_ascii_lowercase())));
    }
}
