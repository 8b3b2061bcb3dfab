//! # Buffr ID Crypto
//!
//! Scoped symmetric keys and authenticated encryption of canonical source
//! identifiers (ChaCha20-Poly1305).
//!
//! The privacy model: the raw identifier never persists in the clear. At
//! registration time the canonical form is sealed into a
//! [`SourceEnvelope`](buffr_id_core::SourceEnvelope) under the key of the
//! owning (project, country) scope; only holders of that key can recover
//! it, and only through the registry's audited decrypt path.

pub mod error;
pub mod key;
pub mod keyring;

pub use error::{CryptoError, Result};
pub use key::EncryptionKey;
pub use keyring::{KeyProvider, StaticKeyring};
