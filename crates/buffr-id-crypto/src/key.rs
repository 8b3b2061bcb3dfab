//! Scoped symmetric encryption of canonical source identifiers.
//!
//! ChaCha20-Poly1305 under a key owned by one (project, country) tenant.
//! The fingerprint is the lookup value; the envelope exists only for
//! regulatory retrieval and is never opened on the hot path.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use rand::RngCore;

use buffr_id_core::{CanonicalSource, KeyScope, SourceEnvelope};

use crate::error::{CryptoError, Result};

/// A 256-bit symmetric key for ChaCha20-Poly1305.
#[derive(Clone)]
pub struct EncryptionKey([u8; 32]);

impl EncryptionKey {
    /// Generate a new random key.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Seal a canonical source under this key with a fresh random nonce.
    pub fn seal(&self, scope: KeyScope, source: &CanonicalSource) -> Result<SourceEnvelope> {
        let cipher = ChaCha20Poly1305::new_from_slice(&self.0)
            .map_err(|e| CryptoError::EncryptionError(e.to_string()))?;

        let mut nonce_bytes = [0u8; 12];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, source.as_bytes())
            .map_err(|e| CryptoError::EncryptionError(e.to_string()))?;

        Ok(SourceEnvelope {
            scope,
            nonce: nonce_bytes,
            ciphertext,
        })
    }

    /// Open an envelope sealed under this key, recovering the canonical
    /// source string.
    pub fn open(&self, envelope: &SourceEnvelope) -> Result<String> {
        let cipher = ChaCha20Poly1305::new_from_slice(&self.0)
            .map_err(|e| CryptoError::DecryptionError(e.to_string()))?;

        let nonce = Nonce::from_slice(&envelope.nonce);
        let plaintext = cipher
            .decrypt(nonce, envelope.ciphertext.as_ref())
            .map_err(|e| CryptoError::DecryptionError(e.to_string()))?;

        String::from_utf8(plaintext).map_err(|_| CryptoError::InvalidPlaintext)
    }
}

impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material.
        write!(f, "EncryptionKey(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buffr_id_core::{canonicalize, CountryCode, Project};

    fn scope() -> KeyScope {
        KeyScope::new(Project::Host, CountryCode::Na)
    }

    #[test]
    fn test_seal_open_roundtrip() {
        let key = EncryptionKey::generate();
        let source = canonicalize("  Buffr Host Resort / CC-2023-04567 ").unwrap();

        let envelope = key.seal(scope(), &source).unwrap();
        assert_ne!(envelope.ciphertext.as_slice(), source.as_bytes());
        assert_eq!(envelope.scope, scope());

        let recovered = key.open(&envelope).unwrap();
        assert_eq!(recovered, source.as_str());
    }

    #[test]
    fn test_open_wrong_key_fails() {
        let key1 = EncryptionKey::generate();
        let key2 = EncryptionKey::generate();
        let source = canonicalize("83121500123").unwrap();

        let envelope = key1.seal(scope(), &source).unwrap();
        assert!(matches!(
            key2.open(&envelope),
            Err(CryptoError::DecryptionError(_))
        ));
    }

    #[test]
    fn test_open_tampered_ciphertext_fails() {
        let key = EncryptionKey::generate();
        let source = canonicalize("83121500123").unwrap();

        let mut envelope = key.seal(scope(), &source).unwrap();
        envelope.ciphertext[0] ^= 0x01;
        assert!(key.open(&envelope).is_err());
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn seal_open_roundtrips_arbitrary_sources(raw in "[ -~]{1,64}") {
                prop_assume!(!raw.trim().is_empty());
                let source = canonicalize(&raw).unwrap();
                let key = EncryptionKey::from_bytes([9u8; 32]);
                let envelope = key.seal(scope(), &source).unwrap();
                prop_assert_eq!(key.open(&envelope).unwrap(), source.as_str());
            }
        }
    }

    #[test]
    fn test_fresh_nonce_per_seal() {
        let key = EncryptionKey::generate();
        let source = canonicalize("83121500123").unwrap();

        let a = key.seal(scope(), &source).unwrap();
        let b = key.seal(scope(), &source).unwrap();
        assert_ne!(a.nonce, b.nonce);
        assert_ne!(a.ciphertext, b.ciphertext);
    }
}
