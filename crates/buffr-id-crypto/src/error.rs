//! Error types for the crypto module.

use buffr_id_core::KeyScope;
use thiserror::Error;

/// Errors that can occur during key lookup, sealing, and opening.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// No key is configured for the scope. Not retryable; identifier
    /// issuance must be blocked, never continued without encryption.
    #[error("no encryption key configured for scope {scope}")]
    EncryptionUnavailable { scope: KeyScope },

    /// The key exists but the key-management dependency is down.
    /// Retryable; callers should apply bounded retry with backoff.
    #[error("key for scope {scope} temporarily unavailable")]
    KeyUnavailable { scope: KeyScope },

    /// AEAD sealing failed.
    #[error("encryption error: {0}")]
    EncryptionError(String),

    /// AEAD opening failed (wrong key, tampered ciphertext, or bad nonce).
    #[error("decryption error: {0}")]
    DecryptionError(String),

    /// Decrypted plaintext was not valid UTF-8. Canonical sources are
    /// always UTF-8, so this indicates corrupted key material or storage.
    #[error("decrypted source is not valid UTF-8")]
    InvalidPlaintext,
}

impl CryptoError {
    /// Whether the caller may retry the operation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::KeyUnavailable { .. })
    }
}

/// Result type for crypto operations.
pub type Result<T> = std::result::Result<T, CryptoError>;
