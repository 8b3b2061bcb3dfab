//! Strong type definitions for Buffr ID.
//!
//! All vocabulary values are closed enums with fixed wire codes, and all
//! references are newtypes to prevent misuse at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;
use crate::fingerprint::Fingerprint;

/// The category of real-world thing an identifier represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Individual,
    Property,
    Organization,
}

impl EntityType {
    /// The wire code embedded in identifiers.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Individual => "IND",
            Self::Property => "PROP",
            Self::Organization => "ORG",
        }
    }

    /// Parse a wire code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "IND" => Some(Self::Individual),
            "PROP" => Some(Self::Property),
            "ORG" => Some(Self::Organization),
            _ => None,
        }
    }

    /// All entity types, in wire-code order.
    pub const ALL: [Self; 3] = [Self::Individual, Self::Property, Self::Organization];
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for EntityType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| ParseError::UnknownEntity(s.to_string()))
    }
}

/// The consuming subsystem namespace embedded in the identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Project {
    Pay,
    Sign,
    Lend,
    Host,
}

impl Project {
    /// The wire code embedded in identifiers.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Pay => "PAY",
            Self::Sign => "SIGN",
            Self::Lend => "LEND",
            Self::Host => "HOST",
        }
    }

    /// Parse a wire code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "PAY" => Some(Self::Pay),
            "SIGN" => Some(Self::Sign),
            "LEND" => Some(Self::Lend),
            "HOST" => Some(Self::Host),
            _ => None,
        }
    }

    /// All projects, in wire-code order.
    pub const ALL: [Self; 4] = [Self::Pay, Self::Sign, Self::Lend, Self::Host];
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Project {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| ParseError::UnknownProject(s.to_string()))
    }
}

/// Supported jurisdictions. A closed allow-list: extending it is a code
/// change, matching the grammar's closed-set rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CountryCode {
    Na,
    Za,
    Bw,
    Zm,
    Ke,
    Ng,
}

impl CountryCode {
    /// The two-letter wire code embedded in identifiers.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Na => "NA",
            Self::Za => "ZA",
            Self::Bw => "BW",
            Self::Zm => "ZM",
            Self::Ke => "KE",
            Self::Ng => "NG",
        }
    }

    /// Parse a wire code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "NA" => Some(Self::Na),
            "ZA" => Some(Self::Za),
            "BW" => Some(Self::Bw),
            "ZM" => Some(Self::Zm),
            "KE" => Some(Self::Ke),
            "NG" => Some(Self::Ng),
            _ => None,
        }
    }

    /// All supported countries, in wire-code order.
    pub const ALL: [Self; 6] = [
        Self::Na,
        Self::Za,
        Self::Bw,
        Self::Zm,
        Self::Ke,
        Self::Ng,
    ];
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CountryCode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| ParseError::UnknownCountry(s.to_string()))
    }
}

/// An opaque reference to a local entity (user, property, or organization).
///
/// The registry stores and compares this value but never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef(String);

impl EntityRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityRef {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EntityRef {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// The one local entity an identifier is bound to.
///
/// Exactly one binding exists and it always agrees with the entity type;
/// the enum makes both invariants unrepresentable to violate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityBinding {
    Individual(EntityRef),
    Property(EntityRef),
    Organization(EntityRef),
}

impl EntityBinding {
    /// The entity type this binding implies.
    pub const fn entity_type(&self) -> EntityType {
        match self {
            Self::Individual(_) => EntityType::Individual,
            Self::Property(_) => EntityType::Property,
            Self::Organization(_) => EntityType::Organization,
        }
    }

    /// The bound local reference.
    pub fn entity_ref(&self) -> &EntityRef {
        match self {
            Self::Individual(r) | Self::Property(r) | Self::Organization(r) => r,
        }
    }
}

/// Lifecycle status of an identity record.
///
/// The only transition is `Active -> Revoked`. Records are never deleted;
/// revocation supersedes deletion and releases the uniqueness slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdStatus {
    Active,
    Revoked,
}

impl IdStatus {
    /// Storage code used by the SQLite backend.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Revoked => "revoked",
        }
    }

    /// Parse a storage code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "active" => Some(Self::Active),
            "revoked" => Some(Self::Revoked),
            _ => None,
        }
    }
}

impl fmt::Display for IdStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The key scope an encrypted source is sealed under: one symmetric key per
/// (project, country) tenant. Always passed explicitly, never taken from
/// ambient context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyScope {
    pub project: Project,
    pub country: CountryCode,
}

impl KeyScope {
    pub const fn new(project: Project, country: CountryCode) -> Self {
        Self { project, country }
    }
}

impl fmt::Display for KeyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.project, self.country)
    }
}

/// Ciphertext of a canonical source identifier plus the metadata needed to
/// decrypt it under the owning scope's key.
///
/// Sealing and opening live in `buffr-id-crypto`; this is pure data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEnvelope {
    /// The (project, country) scope whose key sealed this envelope.
    pub scope: KeyScope,
    /// 96-bit ChaCha20-Poly1305 nonce.
    pub nonce: [u8; 12],
    /// Ciphertext including the Poly1305 tag.
    pub ciphertext: Vec<u8>,
}

/// The one persistent entity of the core: a binding between an issued
/// identifier and a local entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    /// The canonical encoded identifier. Globally unique, immutable.
    pub identifier: crate::identifier::BuffrId,
    /// The bound local entity. Its type always matches the identifier's.
    pub binding: EntityBinding,
    /// Truncated one-way hash of the canonical source.
    pub fingerprint: Fingerprint,
    /// Encrypted canonical source, recoverable only under the scope key.
    pub encrypted_source: SourceEnvelope,
    /// Active or Revoked. Revocation is the only status change.
    pub status: IdStatus,
    /// Whether a separate verification step confirmed the underlying
    /// identifier.
    pub verified: bool,
    /// Unix milliseconds.
    pub created_at: i64,
    /// Unix milliseconds.
    pub updated_at: i64,
}

impl IdentityRecord {
    /// The entity type, as carried by both the identifier and the binding.
    pub fn entity_type(&self) -> EntityType {
        self.binding.entity_type()
    }

    pub fn project(&self) -> Project {
        self.identifier.project
    }

    pub fn country(&self) -> CountryCode {
        self.identifier.country
    }

    /// The scope whose key can open `encrypted_source`.
    pub fn key_scope(&self) -> KeyScope {
        KeyScope::new(self.project(), self.country())
    }

    pub fn is_active(&self) -> bool {
        self.status == IdStatus::Active
    }
}
