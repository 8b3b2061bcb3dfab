//! Error types for Buffr ID core.

use thiserror::Error;

/// Core errors for canonicalization and identifier assembly.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid input: raw identifier is empty after trimming")]
    InvalidInput,
}

/// Parse errors for identifier strings.
///
/// Identifiers cross process and organization boundaries, so every grammar
/// segment reports its own failure instead of one opaque error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected 6 segments separated by '-', got {0}")]
    SegmentCount(usize),

    #[error("bad prefix: expected 'BFR', got {0:?}")]
    BadPrefix(String),

    #[error("unknown entity type code: {0:?}")]
    UnknownEntity(String),

    #[error("unknown project code: {0:?}")]
    UnknownProject(String),

    #[error("unknown country code: {0:?}")]
    UnknownCountry(String),

    #[error("malformed hash segment {0:?}: expected exactly 8 lowercase hex characters")]
    MalformedHash(String),

    #[error("malformed timestamp segment {0:?}: expected 14 digits, YYYYMMDDHHMMSS")]
    MalformedTimestamp(String),
}
