//! # Buffr ID Core
//!
//! Pure primitives for the Buffr unified cross-project identity encoding:
//! canonicalization, fingerprints, and the identifier grammar.
//!
//! This crate contains no I/O, no storage, no key material. It is pure
//! computation over identifier strings and typed components.
//!
//! ## Key Types
//!
//! - [`BuffrId`] - A typed identifier (`BFR-<ENTITY>-<PROJECT>-<COUNTRY>-<HASH8>-<TS14>`)
//! - [`Fingerprint`] - Truncated one-way hash of a canonical source, lookup only
//! - [`CanonicalSource`] - A normalized raw identifier
//! - [`IdentityRecord`] - The persistent binding between an identifier and a local entity
//!
//! ## Grammar
//!
//! Identifiers are ASCII and case-sensitive. See [`parse`] for the
//! segment-by-segment validator.

pub mod canonical;
pub mod error;
pub mod fingerprint;
pub mod identifier;
pub mod parse;
pub mod types;

pub use canonical::{canonicalize, CanonicalSource};
pub use error::{CoreError, ParseError};
pub use fingerprint::Fingerprint;
pub use identifier::{BuffrId, PREFIX, TS14_FORMAT};
pub use parse::parse;
pub use types::{
    CountryCode, EntityBinding, EntityRef, EntityType, IdStatus, IdentityRecord, KeyScope,
    Project, SourceEnvelope,
};
