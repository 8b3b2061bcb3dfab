//! The Buffr ID value type and assembler.
//!
//! Wire form: `BFR-<ENTITY>-<PROJECT>-<COUNTRY>-<HASH8>-<TS14>`, e.g.
//! `BFR-PROP-HOST-NA-a1b2c3d4-20250115143000`. Assembly is pure formatting
//! over typed components; it performs no I/O and cannot fail.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;
use crate::fingerprint::Fingerprint;
use crate::parse::parse;
use crate::types::{CountryCode, EntityType, Project};

/// The fixed literal every identifier starts with.
pub const PREFIX: &str = "BFR";

/// Issuance-timestamp wire format, 14 digits UTC.
pub const TS14_FORMAT: &str = "%Y%m%d%H%M%S";

/// A parsed or freshly assembled identifier.
///
/// Equality includes the timestamp: two issuances for the same tuple are
/// distinct identifiers. Tuple-level questions go through the registry's
/// fingerprint lookup instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BuffrId {
    pub entity_type: EntityType,
    pub project: Project,
    pub country: CountryCode,
    pub fingerprint: Fingerprint,
    /// Issuance time, UTC, second precision.
    pub issued_at: NaiveDateTime,
}

impl BuffrId {
    /// Assemble an identifier from typed components and an issuance time.
    pub fn assemble(
        entity_type: EntityType,
        project: Project,
        country: CountryCode,
        fingerprint: Fingerprint,
        at: DateTime<Utc>,
    ) -> Self {
        use chrono::Timelike;
        // The grammar only carries seconds; sub-second precision must not
        // survive assembly or round-trips would fail.
        let naive = at.naive_utc();
        Self {
            entity_type,
            project,
            country,
            fingerprint,
            issued_at: naive.with_nanosecond(0).unwrap_or(naive),
        }
    }

    /// The canonical wire string.
    pub fn encode(&self) -> String {
        format!(
            "{}-{}-{}-{}-{}-{}",
            PREFIX,
            self.entity_type,
            self.project,
            self.country,
            self.fingerprint,
            self.issued_at.format(TS14_FORMAT),
        )
    }

    /// The 14-digit timestamp segment.
    pub fn ts14(&self) -> String {
        self.issued_at.format(TS14_FORMAT).to_string()
    }
}

impl fmt::Display for BuffrId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for BuffrId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

impl From<BuffrId> for String {
    fn from(id: BuffrId) -> Self {
        id.encode()
    }
}

impl TryFrom<String> for BuffrId {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        parse(&s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> BuffrId {
        BuffrId::assemble(
            EntityType::Property,
            Project::Host,
            CountryCode::Na,
            Fingerprint::from_bytes([0xa1, 0xb2, 0xc3, 0xd4]),
            Utc.with_ymd_and_hms(2025, 1, 15, 14, 30, 0).unwrap(),
        )
    }

    #[test]
    fn test_encode_matches_grammar() {
        assert_eq!(sample().encode(), "BFR-PROP-HOST-NA-a1b2c3d4-20250115143000");
    }

    #[test]
    fn test_display_equals_encode() {
        let id = sample();
        assert_eq!(format!("{}", id), id.encode());
    }

    #[test]
    fn test_subsecond_precision_dropped() {
        let at = Utc.with_ymd_and_hms(2025, 1, 15, 14, 30, 0).unwrap()
            + chrono::Duration::milliseconds(987);
        let id = BuffrId::assemble(
            EntityType::Individual,
            Project::Pay,
            CountryCode::Za,
            Fingerprint::from_bytes([0; 4]),
            at,
        );
        let reparsed: BuffrId = id.encode().parse().unwrap();
        assert_eq!(reparsed, id);
    }

    #[test]
    fn test_serde_as_string() {
        let id = sample();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.encode()));
        let back: BuffrId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
