//! Canonicalization of raw source identifiers.
//!
//! Fingerprinting and encryption must both see the exact same bytes for a
//! given real-world identifier, however callers formatted it. Canonical form
//! is: trimmed, lower-cased, with internal whitespace runs collapsed to a
//! single space.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// A source identifier in canonical form.
///
/// The newtype guarantees downstream APIs (fingerprint, envelope sealing)
/// can only be fed normalized input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanonicalSource(String);

impl CanonicalSource {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for CanonicalSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalize a raw identifier.
///
/// Accepts national IDs, phone numbers, or composites like
/// "registration-number + organization name". Fails with
/// [`CoreError::InvalidInput`] when nothing remains after trimming.
pub fn canonicalize(raw: &str) -> Result<CanonicalSource, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidInput);
    }

    let mut out = String::with_capacity(trimmed.len());
    let mut in_whitespace = false;
    for ch in trimmed.chars() {
        if ch.is_whitespace() {
            in_whitespace = true;
            continue;
        }
        if in_whitespace && !out.is_empty() {
            out.push(' ');
        }
        in_whitespace = false;
        for lower in ch.to_lowercase() {
            out.push(lower);
        }
    }

    Ok(CanonicalSource(out))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_and_lowercases() {
        let c = canonicalize("  ID-1234-XY  ").unwrap();
        assert_eq!(c.as_str(), "id-1234-xy");
    }

    #[test]
    fn test_collapses_internal_whitespace() {
        let c = canonicalize("Buffr   Host\t\tResort").unwrap();
        assert_eq!(c.as_str(), "buffr host resort");
    }

    #[test]
    fn test_empty_after_trim_is_invalid() {
        assert_eq!(canonicalize("   \t\n "), Err(CoreError::InvalidInput));
        assert_eq!(canonicalize(""), Err(CoreError::InvalidInput));
    }

    #[test]
    fn test_idempotent() {
        let once = canonicalize(" CC/2023/ 04567  Buffr Host  ").unwrap();
        let twice = canonicalize(once.as_str()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_equivalent_inputs_converge() {
        let a = canonicalize("BUFFR HOST RESORT").unwrap();
        let b = canonicalize("  buffr   host resort ").unwrap();
        assert_eq!(a, b);
    }
}
