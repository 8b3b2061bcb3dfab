//! Proptest generators for property-based testing.

use proptest::prelude::*;

use buffr_id_core::{
    CountryCode, EntityBinding, EntityRef, EntityType, Fingerprint, Project,
};

/// Generate an entity type.
pub fn entity_type() -> impl Strategy<Value = EntityType> {
    prop_oneof![
        Just(EntityType::Individual),
        Just(EntityType::Property),
        Just(EntityType::Organization),
    ]
}

/// Generate a project.
pub fn project() -> impl Strategy<Value = Project> {
    prop_oneof![
        Just(Project::Pay),
        Just(Project::Sign),
        Just(Project::Lend),
        Just(Project::Host),
    ]
}

/// Generate a country code.
pub fn country() -> impl Strategy<Value = CountryCode> {
    prop_oneof![
        Just(CountryCode::Na),
        Just(CountryCode::Za),
        Just(CountryCode::Bw),
        Just(CountryCode::Zm),
        Just(CountryCode::Ke),
        Just(CountryCode::Ng),
    ]
}

/// Generate a random fingerprint.
pub fn fingerprint() -> impl Strategy<Value = Fingerprint> {
    any::<[u8; 4]>().prop_map(Fingerprint::from_bytes)
}

/// Generate a local entity reference.
pub fn entity_ref() -> impl Strategy<Value = EntityRef> {
    "[a-z]{3,8}-[0-9]{3}".prop_map(EntityRef::new)
}

/// Generate a binding of the given entity type.
pub fn binding_of(et: EntityType) -> impl Strategy<Value = EntityBinding> {
    entity_ref().prop_map(move |r| match et {
        EntityType::Individual => EntityBinding::Individual(r),
        EntityType::Property => EntityBinding::Property(r),
        EntityType::Organization => EntityBinding::Organization(r),
    })
}

/// Generate a raw source identifier that survives canonicalization:
/// national-ID digits, registration numbers, or name composites, with
/// noisy surrounding and internal whitespace.
pub fn raw_identifier() -> impl Strategy<Value = String> {
    let core = prop_oneof![
        // national ID
        "[0-9]{11}",
        // business registration number
        "CC/20[0-9]{2}/[0-9]{5}",
        // name + registration composite
        "[A-Za-z]{3,10}( [A-Za-z]{3,10}){1,3} / CC-20[0-9]{2}-[0-9]{4,5}",
    ];
    (core, " {0,3}", " {0,3}").prop_map(|(core, pre, post)| format!("{pre}{core}{post}"))
}

/// Generate a syntactically valid issuance timestamp segment.
pub fn ts14() -> impl Strategy<Value = String> {
    (2000u32..=2099, 1u32..=12, 1u32..=28, 0u32..24, 0u32..60, 0u32..60)
        .prop_map(|(y, mo, d, h, mi, s)| format!("{y:04}{mo:02}{d:02}{h:02}{mi:02}{s:02}"))
}

/// Generate a fully valid identifier string segment by segment.
pub fn valid_identifier_string() -> impl Strategy<Value = String> {
    (entity_type(), project(), country(), fingerprint(), ts14()).prop_map(
        |(et, p, c, fp, ts)| format!("BFR-{}-{}-{}-{}-{}", et, p, c, fp.to_hex(), ts),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use buffr_id_core::{canonicalize, parse};

    proptest! {
        #[test]
        fn generated_identifiers_parse(s in valid_identifier_string()) {
            let id = parse(&s).unwrap();
            prop_assert_eq!(id.encode(), s);
        }

        #[test]
        fn generated_raw_identifiers_canonicalize(raw in raw_identifier()) {
            let c = canonicalize(&raw).unwrap();
            prop_assert!(!c.as_str().is_empty());
            // Canonicalization is idempotent.
            prop_assert_eq!(canonicalize(c.as_str()).unwrap(), c);
        }

        #[test]
        fn corrupting_any_segment_is_rejected(
            s in valid_identifier_string(),
            segment in 0usize..6,
        ) {
            let mut parts: Vec<String> =
                s.split('-').map(String::from).collect();
            parts[segment] = match segment {
                0 => "XBF".to_string(),
                1 => "USR".to_string(),
                2 => "BOOK".to_string(),
                3 => "XX".to_string(),
                4 => "nothex!!".to_string(),
                _ => "9999".to_string(),
            };
            prop_assert!(parse(&parts.join("-")).is_err());
        }
    }
}
