//! Truncated one-way fingerprints of canonical source identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::canonical::CanonicalSource;
use crate::error::ParseError;

/// The first 4 bytes of Blake3(canonical source), rendered as 8 lowercase
/// hex characters on the wire.
///
/// This is a lossy, one-way value used only for equality lookups. Equality
/// of two fingerprints is a candidate match, never proof of identity: 32
/// bits collide, and callers must confirm the full
/// (entity type, project, country, bound entity) tuple.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(pub [u8; 4]);

impl Fingerprint {
    /// Hex length on the wire.
    pub const HEX_LEN: usize = 8;

    /// Derive the fingerprint of a canonical source.
    pub fn derive(source: &CanonicalSource) -> Self {
        let hash = blake3::hash(source.as_bytes());
        let mut prefix = [0u8; 4];
        prefix.copy_from_slice(&hash.as_bytes()[..4]);
        Self(prefix)
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Convert to the 8-char lowercase hex wire form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from the wire form. Rejects wrong length, non-hex, and
    /// uppercase input (the grammar is case-sensitive).
    pub fn from_hex(s: &str) -> Result<Self, ParseError> {
        if s.len() != Self::HEX_LEN || s.bytes().any(|b| b.is_ascii_uppercase()) {
            return Err(ParseError::MalformedHash(s.to_string()));
        }
        let bytes = hex::decode(s).map_err(|_| ParseError::MalformedHash(s.to_string()))?;
        let mut arr = [0u8; 4];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.to_hex())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Fingerprint {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl AsRef<[u8]> for Fingerprint {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::canonicalize;

    #[test]
    fn test_deterministic() {
        let c = canonicalize("83121500123").unwrap();
        assert_eq!(Fingerprint::derive(&c), Fingerprint::derive(&c));
    }

    #[test]
    fn test_different_sources_differ() {
        let a = Fingerprint::derive(&canonicalize("83121500123").unwrap());
        let b = Fingerprint::derive(&canonicalize("83121500124").unwrap());
        assert_ne!(a, b);
    }

    #[test]
    fn test_equivalent_raw_forms_share_fingerprint() {
        let a = Fingerprint::derive(&canonicalize("  Buffr Host Resort ").unwrap());
        let b = Fingerprint::derive(&canonicalize("BUFFR  HOST RESORT").unwrap());
        assert_eq!(a, b);
    }

    #[test]
    fn test_hex_roundtrip() {
        let fp = Fingerprint::from_bytes([0xa1, 0xb2, 0xc3, 0xd4]);
        assert_eq!(fp.to_hex(), "a1b2c3d4");
        assert_eq!(Fingerprint::from_hex("a1b2c3d4").unwrap(), fp);
    }

    #[test]
    fn test_from_hex_rejects_bad_input() {
        assert!(Fingerprint::from_hex("a1b2c3").is_err()); // too short
        assert!(Fingerprint::from_hex("a1b2c3d4e5").is_err()); // too long
        assert!(Fingerprint::from_hex("a1b2c3zz").is_err()); // non-hex
        assert!(Fingerprint::from_hex("A1B2C3D4").is_err()); // uppercase
    }
}
