// Property-based tests for the aligned catalog format.
// CI: 128 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use proptest::prelude::*;
use radarsite_io::catalog::{parse_catalog, render_aligned, render_catalog, CatalogFormat};
use radarsite_recon::Catalog;
use serde_json::{Map, Number, Value};

fn config_128() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(128),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Scalar values seen in real catalogs, plus awkward strings.
fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        3 => (-180.0..180.0f64).prop_map(|f| Value::Number(Number::from_f64(f).unwrap())),
        2 => (-5000i64..20000).prop_map(Value::from),
        2 => r#"[a-zA-Z ,.'"\\é-]{0,12}"#.prop_map(Value::from),
        1 => Just(Value::Null),
        1 => any::<bool>().prop_map(Value::from),
    ]
}

fn arb_record(extra_keys: usize) -> impl Strategy<Value = Map<String, Value>> {
    (
        "[A-Z]{4}",
        prop::sample::select(vec!["wsr88d", "tdwr", "?"]),
        arb_scalar(),
        arb_scalar(),
        prop::collection::vec(arb_scalar(), extra_keys),
    )
        .prop_map(|(id, ty, lat, lon, extras)| {
            let mut m = Map::new();
            m.insert("type".into(), Value::from(ty));
            m.insert("id".into(), Value::from(id));
            m.insert("lat".into(), lat);
            m.insert("lon".into(), lon);
            for (i, v) in extras.into_iter().enumerate() {
                m.insert(format!("field_{i}"), v);
            }
            m
        })
}

fn arb_catalog() -> impl Strategy<Value = Catalog> {
    (0usize..4).prop_flat_map(|extra| {
        prop::collection::vec(arb_record(extra), 0..12)
            .prop_map(|records| Catalog::from_fields(records).unwrap())
    })
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_128())]

    #[test]
    fn aligned_round_trip(catalog in arb_catalog()) {
        let text = render_aligned(&catalog).unwrap();
        let parsed = parse_catalog(&text).unwrap();
        prop_assert_eq!(parsed.len(), catalog.len());
        for (a, b) in parsed.iter().zip(catalog.iter()) {
            prop_assert!(a.same_layout(b));
        }
    }

    #[test]
    fn plain_round_trip(catalog in arb_catalog()) {
        let text = render_catalog(&catalog, CatalogFormat::Plain).unwrap();
        prop_assert_eq!(parse_catalog(&text).unwrap(), catalog);
    }

    #[test]
    fn rendering_is_deterministic(catalog in arb_catalog()) {
        let first = render_aligned(&catalog).unwrap();
        let again = render_aligned(&parse_catalog(&first).unwrap()).unwrap();
        prop_assert_eq!(first, again);
    }

    #[test]
    fn one_line_per_record(catalog in arb_catalog()) {
        let text = render_aligned(&catalog).unwrap();
        let record_lines = text.lines().filter(|l| l.starts_with("\t{ ")).count();
        prop_assert_eq!(record_lines, catalog.len());
    }

    #[test]
    fn key_set_mismatch_rejected(catalog in arb_catalog()) {
        prop_assume!(!catalog.is_empty());
        let mut objects: Vec<Map<String, Value>> =
            catalog.iter().map(|r| r.fields().clone()).collect();
        objects[0].insert("extra".into(), Value::Null);
        let broken = Catalog::from_fields(objects).unwrap();
        if broken.len() > 1 {
            prop_assert!(render_aligned(&broken).unwrap_err().is_inconsistent_schema());
        } else {
            prop_assert!(render_aligned(&broken).is_ok());
        }
    }
}
