//! Error types for the identity registry.

use buffr_id_core::{CoreError, EntityRef, Fingerprint, KeyScope, ParseError};
use buffr_id_crypto::CryptoError;
use buffr_id_store::StoreError;
use thiserror::Error;

/// Errors that can occur during registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Canonicalization error (empty raw identifier).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Malformed identifier string, with the failing grammar segment.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Key management error. `EncryptionUnavailable` blocks issuance;
    /// `KeyUnavailable` is retryable with backoff.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// The fingerprint tuple is already bound to a different local entity.
    /// Never auto-resolved: this is either a 32-bit hash collision or
    /// reused personal data, and either needs manual review.
    #[error(
        "fingerprint {fingerprint} already bound to entity {bound} (requested {requested}) \
         under identifier {identifier}"
    )]
    EntityMismatch {
        identifier: String,
        fingerprint: Fingerprint,
        bound: EntityRef,
        requested: EntityRef,
    },

    /// Decrypt requested under a scope that does not own the record.
    #[error("scope {requested} cannot decrypt a record owned by scope {owner}")]
    ScopeMismatch { owner: KeyScope, requested: KeyScope },

    /// No record exists for the identifier.
    #[error("identifier not registered: {0}")]
    NotFound(String),

    /// Conditional insert kept losing races past the retry budget.
    /// Transient; callers may retry the whole registration.
    #[error("registration contention: gave up after {attempts} attempts")]
    Contention { attempts: u32 },
}

impl RegistryError {
    /// Whether the caller may retry the whole operation.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Crypto(e) => e.is_retryable(),
            Self::Contention { .. } => true,
            _ => false,
        }
    }
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
