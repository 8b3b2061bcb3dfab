//! Golden identifier vectors.
//!
//! Each vector fixes the full input set (raw identifier, entity type,
//! project, country, issuance time) and derives the canonical form,
//! fingerprint, and encoded identifier. Any implementation of the encoding
//! must reproduce these derivations byte for byte; `verify_all_vectors`
//! re-derives everything and cross-checks the parser.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use buffr_id_core::{
    canonicalize, parse, BuffrId, CountryCode, EntityType, Fingerprint, Project,
};

/// A single golden vector.
#[derive(Debug, Serialize, Deserialize)]
pub struct GoldenVector {
    pub name: String,
    pub description: String,

    // Inputs
    pub raw: String,
    pub entity_type: EntityType,
    pub project: Project,
    pub country: CountryCode,
    pub issued_at: String, // TS14

    // Derived outputs
    pub canonical: String,
    pub fingerprint: String, // 8 lowercase hex chars
    pub identifier: String,
}

fn generate_vector(
    name: &str,
    description: &str,
    raw: &str,
    entity_type: EntityType,
    project: Project,
    country: CountryCode,
    issued_at: DateTime<Utc>,
) -> GoldenVector {
    let canonical = canonicalize(raw).expect("vector raw identifiers are non-empty");
    let fingerprint = Fingerprint::derive(&canonical);
    let id = BuffrId::assemble(entity_type, project, country, fingerprint, issued_at);

    GoldenVector {
        name: name.to_string(),
        description: description.to_string(),
        raw: raw.to_string(),
        entity_type,
        project,
        country,
        issued_at: id.ts14(),
        canonical: canonical.as_str().to_string(),
        fingerprint: fingerprint.to_hex(),
        identifier: id.encode(),
    }
}

/// All golden vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    let at = |y, mo, d, h, mi, s| Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap();

    vec![
        generate_vector(
            "property-onboarding",
            "Property name, mixed case and noisy whitespace",
            "  Buffr   Host Resort ",
            EntityType::Property,
            Project::Host,
            CountryCode::Na,
            at(2025, 1, 15, 14, 30, 0),
        ),
        generate_vector(
            "individual-national-id",
            "Plain numeric national ID",
            "83121500123",
            EntityType::Individual,
            Project::Pay,
            CountryCode::Na,
            at(2025, 3, 2, 9, 0, 5),
        ),
        generate_vector(
            "organization-registration",
            "Business registration number plus organization name",
            "CC/2023/04567 Buffr Lend Services",
            EntityType::Organization,
            Project::Lend,
            CountryCode::Za,
            at(2024, 11, 30, 23, 59, 59),
        ),
        generate_vector(
            "individual-phone",
            "Phone number in international format",
            "+264 81 234 5678",
            EntityType::Individual,
            Project::Sign,
            CountryCode::Na,
            at(2025, 6, 1, 0, 0, 0),
        ),
    ]
}

/// Re-derive every vector and check all invariants hold.
pub fn verify_all_vectors() -> Result<(), String> {
    for v in all_vectors() {
        let canonical =
            canonicalize(&v.raw).map_err(|e| format!("{}: canonicalize: {}", v.name, e))?;
        if canonical.as_str() != v.canonical {
            return Err(format!(
                "{}: canonical mismatch: {} != {}",
                v.name,
                canonical.as_str(),
                v.canonical
            ));
        }

        let fp = Fingerprint::derive(&canonical);
        if fp.to_hex() != v.fingerprint {
            return Err(format!("{}: fingerprint mismatch", v.name));
        }

        let parsed = parse(&v.identifier).map_err(|e| format!("{}: parse: {}", v.name, e))?;
        if parsed.entity_type != v.entity_type
            || parsed.project != v.project
            || parsed.country != v.country
            || parsed.fingerprint != fp
            || parsed.ts14() != v.issued_at
        {
            return Err(format!("{}: parsed components mismatch", v.name));
        }
        if parsed.encode() != v.identifier {
            return Err(format!("{}: re-encode mismatch", v.name));
        }
    }
    Ok(())
}
