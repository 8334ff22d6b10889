//! Randomized checks of schema classification and reconciliation.

use listing_price::engine::pipeline::{Transformer, TransformerEntry};
use listing_price::engine::reconcile::reconcile;
use listing_price::engine::schema::{classify_schema, FeatureRole, FeatureSchema};
use listing_price::engine::{FeatureRecord, FeatureValue};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

const POOL: &[&str] = &[
    "city", "room_type", "max_guests", "num_bedrooms", "neighborhood", "day_type",
    "distance_city_center", "cleanliness_score", "host_is_superhost", "listing_id",
    "guest_satisfaction", "attraction_index",
];

fn random_columns(rng: &mut StdRng) -> Vec<String> {
    let n = rng.gen_range(1..=4);
    (0..n).map(|_| POOL[rng.gen_range(0..POOL.len())].to_string()).collect()
}

fn random_transformers(rng: &mut StdRng) -> Vec<TransformerEntry> {
    let n = rng.gen_range(1..=5);
    (0..n)
        .map(|i| {
            let columns = random_columns(rng);
            let transformer = match rng.gen_range(0..5) {
                0 => Transformer::Drop,
                1 => Transformer::Passthrough,
                2 => Transformer::Unrecognized,
                3 => Transformer::StandardScaler {
                    mean: vec![0.0; columns.len()],
                    scale: vec![1.0; columns.len()],
                },
                _ => Transformer::OneHotEncoder {
                    categories: vec![vec!["a".to_string(), "b".to_string()]; columns.len()],
                    handle_unknown: Default::default(),
                },
            };
            TransformerEntry {
                name: format!("t{i}"),
                transformer,
                columns,
            }
        })
        .collect()
}

fn random_record(rng: &mut StdRng) -> FeatureRecord {
    let mut record = FeatureRecord::new();
    for name in POOL {
        if rng.gen_bool(0.4) {
            if rng.gen_bool(0.5) {
                record.insert(*name, rng.gen_range(0.0..100.0_f64));
            } else {
                record.insert(*name, "Paris");
            }
        }
    }
    record
}

fn random_case(seed: u64) -> (FeatureSchema, FeatureRecord, Vec<TransformerEntry>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let transformers = random_transformers(&mut rng);
    let role = if rng.gen_bool(0.5) { FeatureRole::Numerical } else { FeatureRole::Categorical };
    let schema = classify_schema(&transformers, role);
    (schema, random_record(&mut rng), transformers)
}

#[test]
fn test_every_schema_column_appears_exactly_once() {
    for seed in 0..500 {
        let (schema, input, _) = random_case(seed);
        let row = reconcile(&input, &schema);
        for column in schema.columns() {
            let count = row.names().filter(|n| *n == column.name).count();
            assert_eq!(count, 1, "seed {seed}: column {} appears {count} times", column.name);
        }
        let unique: HashSet<&str> = row.names().collect();
        assert_eq!(unique.len(), row.len(), "seed {seed}: duplicate names in row");
    }
}

#[test]
fn test_missing_columns_get_role_defaults() {
    for seed in 0..500 {
        let (schema, input, _) = random_case(seed);
        let row = reconcile(&input, &schema);
        for column in schema.columns() {
            let value = row.get(&column.name).unwrap();
            match (input.get(&column.name), column.role) {
                (Some(given), _) => assert_eq!(value, given, "seed {seed}"),
                (None, FeatureRole::Categorical) => {
                    assert_eq!(value, &FeatureValue::Text("Unknown".into()), "seed {seed}")
                }
                (None, FeatureRole::Numerical) => {
                    assert_eq!(value, &FeatureValue::Number(0.0), "seed {seed}")
                }
                (None, FeatureRole::Dropped) => panic!("seed {seed}: dropped column in schema"),
            }
        }
    }
}

#[test]
fn test_reconcile_is_idempotent() {
    for seed in 0..500 {
        let (schema, input, _) = random_case(seed);
        let once = reconcile(&input, &schema);
        let twice = reconcile(&once, &schema);
        assert_eq!(once, twice, "seed {seed}");
    }
}

#[test]
fn test_input_values_are_preserved() {
    for seed in 0..200 {
        let (schema, input, _) = random_case(seed);
        let row = reconcile(&input, &schema);
        for (name, value) in input.iter() {
            assert_eq!(row.get(name), Some(value), "seed {seed}: {name} changed");
        }
    }
}

#[test]
fn test_classification_excludes_drop_only_columns_and_never_duplicates() {
    for seed in 0..500 {
        let (schema, _, transformers) = random_case(seed);

        let kept: HashSet<&str> = transformers
            .iter()
            .filter(|t| !t.transformer.is_drop())
            .flat_map(|t| t.columns.iter().map(String::as_str))
            .collect();
        for t in transformers.iter().filter(|t| t.transformer.is_drop()) {
            for c in &t.columns {
                if !kept.contains(c.as_str()) {
                    assert_eq!(schema.role_of(c), None, "seed {seed}: dropped {c} in schema");
                }
            }
        }

        let categorical: HashSet<&str> = schema.categorical().collect();
        let numerical: HashSet<&str> = schema.numerical().collect();
        assert!(categorical.is_disjoint(&numerical), "seed {seed}");
        assert_eq!(categorical.len() + numerical.len(), schema.len(), "seed {seed}");
    }
}
