//! Identifier validation and parsing.
//!
//! Checks run segment by segment so a caller holding a malformed identifier
//! learns exactly which part failed. Parsing is a pure function over the
//! grammar; it never touches the registry.

use chrono::NaiveDateTime;

use crate::error::ParseError;
use crate::fingerprint::Fingerprint;
use crate::identifier::{BuffrId, PREFIX, TS14_FORMAT};
use crate::types::{CountryCode, EntityType, Project};

/// Number of `-`-separated segments in a well-formed identifier.
const SEGMENTS: usize = 6;

/// Parse an arbitrary string claiming to be a Buffr ID.
pub fn parse(input: &str) -> Result<BuffrId, ParseError> {
    let segments: Vec<&str> = input.split('-').collect();
    if segments.len() != SEGMENTS {
        return Err(ParseError::SegmentCount(segments.len()));
    }

    if segments[0] != PREFIX {
        return Err(ParseError::BadPrefix(segments[0].to_string()));
    }

    let entity_type = EntityType::from_code(segments[1])
        .ok_or_else(|| ParseError::UnknownEntity(segments[1].to_string()))?;

    let project = Project::from_code(segments[2])
        .ok_or_else(|| ParseError::UnknownProject(segments[2].to_string()))?;

    let country = CountryCode::from_code(segments[3])
        .ok_or_else(|| ParseError::UnknownCountry(segments[3].to_string()))?;

    let fingerprint = Fingerprint::from_hex(segments[4])?;

    let issued_at = parse_ts14(segments[5])?;

    Ok(BuffrId {
        entity_type,
        project,
        country,
        fingerprint,
        issued_at,
    })
}

/// Parse the 14-digit timestamp segment.
///
/// Length and digit checks come first so "wrong shape" and "not a real
/// datetime" both land on the timestamp variant with the offending text.
fn parse_ts14(segment: &str) -> Result<NaiveDateTime, ParseError> {
    if segment.len() != 14 || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::MalformedTimestamp(segment.to_string()));
    }
    NaiveDateTime::parse_from_str(segment, TS14_FORMAT)
        .map_err(|_| ParseError::MalformedTimestamp(segment.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "BFR-PROP-HOST-NA-a1b2c3d4-20250115143000";

    #[test]
    fn test_parse_valid() {
        let id = parse(VALID).unwrap();
        assert_eq!(id.entity_type, EntityType::Property);
        assert_eq!(id.project, Project::Host);
        assert_eq!(id.country, CountryCode::Na);
        assert_eq!(id.fingerprint.to_hex(), "a1b2c3d4");
        assert_eq!(id.ts14(), "20250115143000");
    }

    #[test]
    fn test_roundtrip() {
        let id = parse(VALID).unwrap();
        assert_eq!(id.encode(), VALID);
    }

    #[test]
    fn test_segment_count() {
        assert_eq!(
            parse("BFR-PROP-HOST-NA-a1b2c3d4"),
            Err(ParseError::SegmentCount(5))
        );
        assert_eq!(
            parse("BFR-PROP-HOST-NA-a1b2c3d4-20250115143000-extra"),
            Err(ParseError::SegmentCount(7))
        );
        assert_eq!(parse(""), Err(ParseError::SegmentCount(1)));
    }

    #[test]
    fn test_bad_prefix() {
        assert_eq!(
            parse("XYZ-PROP-HOST-NA-a1b2c3d4-20250115143000"),
            Err(ParseError::BadPrefix("XYZ".to_string()))
        );
        // Prefix is case-sensitive.
        assert_eq!(
            parse("bfr-PROP-HOST-NA-a1b2c3d4-20250115143000"),
            Err(ParseError::BadPrefix("bfr".to_string()))
        );
    }

    #[test]
    fn test_unknown_entity() {
        assert_eq!(
            parse("BFR-USER-HOST-NA-a1b2c3d4-20250115143000"),
            Err(ParseError::UnknownEntity("USER".to_string()))
        );
    }

    #[test]
    fn test_unknown_project() {
        assert_eq!(
            parse("BFR-PROP-BOOK-NA-a1b2c3d4-20250115143000"),
            Err(ParseError::UnknownProject("BOOK".to_string()))
        );
    }

    #[test]
    fn test_unknown_country() {
        assert_eq!(
            parse("BFR-PROP-HOST-XX-a1b2c3d4-20250115143000"),
            Err(ParseError::UnknownCountry("XX".to_string()))
        );
    }

    #[test]
    fn test_malformed_hash() {
        // Wrong length.
        assert_eq!(
            parse("BFR-PROP-HOST-NA-a1b2c3-20250115143000"),
            Err(ParseError::MalformedHash("a1b2c3".to_string()))
        );
        // Non-hex.
        assert_eq!(
            parse("BFR-PROP-HOST-NA-a1b2c3zz-20250115143000"),
            Err(ParseError::MalformedHash("a1b2c3zz".to_string()))
        );
        // Uppercase hex is not canonical.
        assert_eq!(
            parse("BFR-PROP-HOST-NA-A1B2C3D4-20250115143000"),
            Err(ParseError::MalformedHash("A1B2C3D4".to_string()))
        );
    }

    #[test]
    fn test_malformed_timestamp() {
        // Wrong length.
        assert_eq!(
            parse("BFR-PROP-HOST-NA-a1b2c3d4-202501151430"),
            Err(ParseError::MalformedTimestamp("202501151430".to_string()))
        );
        // Non-digit.
        assert_eq!(
            parse("BFR-PROP-HOST-NA-a1b2c3d4-2025011514300x"),
            Err(ParseError::MalformedTimestamp("2025011514300x".to_string()))
        );
        // Right shape, impossible date.
        assert_eq!(
            parse("BFR-PROP-HOST-NA-a1b2c3d4-20251315143000"),
            Err(ParseError::MalformedTimestamp("20251315143000".to_string()))
        );
    }

    #[test]
    fn test_first_failing_segment_reported() {
        // Both entity and hash are bad; entity is reported.
        assert_eq!(
            parse("BFR-USER-HOST-NA-zz-20250115143000"),
            Err(ParseError::UnknownEntity("USER".to_string()))
        );
    }

    mod props {
        use super::*;
        use chrono::{TimeZone, Utc};
        use proptest::prelude::*;

        proptest! {
            // No valid identifier is ever rejected.
            #[test]
            fn assembled_ids_always_parse(
                entity_idx in 0usize..3,
                project_idx in 0usize..4,
                country_idx in 0usize..6,
                fp_bytes in any::<[u8; 4]>(),
                secs in 0i64..=4_102_444_799, // through 2099-12-31
            ) {
                let id = BuffrId::assemble(
                    EntityType::ALL[entity_idx],
                    Project::ALL[project_idx],
                    CountryCode::ALL[country_idx],
                    Fingerprint::from_bytes(fp_bytes),
                    Utc.timestamp_opt(secs, 0).unwrap(),
                );
                let reparsed = parse(&id.encode()).unwrap();
                prop_assert_eq!(reparsed, id);
            }
        }
    }
}
