//! # Buffr ID
//!
//! Unified cross-project identity encoding: derive a stable, pseudonymous
//! identifier from a sensitive real-world identifier, keep the original
//! encrypted at rest, and make it discoverable only through a truncated
//! one-way fingerprint.
//!
//! ## Overview
//!
//! - **Identifier**: `BFR-<ENTITY>-<PROJECT>-<COUNTRY>-<HASH8>-<TS14>`,
//!   e.g. `BFR-PROP-HOST-NA-a1b2c3d4-20250115143000`. Anyone can parse one
//!   without registry access.
//! - **Fingerprint**: first 8 hex chars of Blake3(canonical source). Lossy;
//!   a candidate match, never proof of identity.
//! - **Registry**: binds one identifier to exactly one local entity, with
//!   at most one Active record per (entity type, project, country,
//!   fingerprint) tuple. Registration is idempotent; a tuple bound to a
//!   different entity surfaces as `EntityMismatch`.
//! - **Revocation**: terminal, releases the uniqueness slot, keeps the
//!   record for audit.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use buffr_id::{IdentityRegistry, RegistryConfig};
//! use buffr_id::core::{CountryCode, EntityBinding, EntityRef, Project};
//! use buffr_id::crypto::StaticKeyring;
//! use buffr_id::store::SqliteStore;
//!
//! async fn example() {
//!     let store = SqliteStore::open("identity.db").unwrap();
//!     let keys = StaticKeyring::with_all_scopes();
//!     let registry = IdentityRegistry::new(store, keys, RegistryConfig::default());
//!
//!     let registered = registry
//!         .register_or_fetch(
//!             EntityBinding::Property(EntityRef::new("prop-001")),
//!             Project::Host,
//!             CountryCode::Na,
//!             "Buffr Host Resort / CC-2023-04567",
//!         )
//!         .await
//!         .unwrap();
//!
//!     println!("issued {}", registered.identifier);
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `buffr_id::core` - grammar, fingerprints, records
//! - `buffr_id::crypto` - scoped keys and source envelopes
//! - `buffr_id::store` - storage backends

pub mod error;
pub mod registry;

// Re-export component crates
pub use buffr_id_core as core;
pub use buffr_id_crypto as crypto;
pub use buffr_id_store as store;

// Re-export main types for convenience
pub use error::{RegistryError, Result};
pub use registry::{IdentityRegistry, RegisteredId, RegistryConfig};

pub use buffr_id_core::{
    canonicalize, parse, BuffrId, CanonicalSource, CountryCode, EntityBinding, EntityRef,
    EntityType, Fingerprint, IdStatus, IdentityRecord, KeyScope, ParseError, Project,
};
pub use buffr_id_crypto::{EncryptionKey, KeyProvider, StaticKeyring};
pub use buffr_id_store::{IdentityStore, MemoryStore, SqliteStore};
