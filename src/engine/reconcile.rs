use super::schema::FeatureSchema;
use super::value::FeatureRecord;

/// Extend `input` so every schema column is present.
///
/// Schema columns come first, in schema order, followed by any extra input
/// columns in their original order. Missing columns get the column's fill
/// value. Values already present are passed through untouched, even when
/// their type does not match the column's role.
pub fn reconcile(input: &FeatureRecord, schema: &FeatureSchema) -> FeatureRecord {
    let mut row = FeatureRecord::new();
    let mut filled = 0usize;

    for column in schema.columns() {
        match input.get(&column.name) {
            Some(value) => row.insert(column.name.clone(), value.clone()),
            None => {
                if let Some(value) = column.fill_value() {
                    tracing::debug!(column = %column.name, value = %value, "back-filled missing column");
                    row.insert(column.name.clone(), value);
                    filled += 1;
                }
            }
        }
    }

    for (name, value) in input.iter() {
        if !row.contains(name) {
            row.insert(name, value.clone());
        }
    }

    if filled > 0 {
        tracing::debug!(filled, total = row.len(), "reconciled input row");
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::schema::{FeatureColumn, FeatureRole};
    use crate::engine::value::FeatureValue;

    fn schema() -> FeatureSchema {
        FeatureSchema::from_columns(vec![
            FeatureColumn::new("room_type", FeatureRole::Categorical),
            FeatureColumn::new("neighborhood", FeatureRole::Categorical),
            FeatureColumn::new("max_guests", FeatureRole::Numerical),
            FeatureColumn::new("review_count", FeatureRole::Numerical),
        ])
    }

    #[test]
    fn test_fills_missing_by_role() {
        let input = FeatureRecord::new().with("room_type", "Private room").with("max_guests", 2.0);
        let row = reconcile(&input, &schema());
        assert_eq!(row.get("neighborhood"), Some(&FeatureValue::Text("Unknown".into())));
        assert_eq!(row.get("review_count"), Some(&FeatureValue::Number(0.0)));
        assert_eq!(row.get("room_type"), Some(&FeatureValue::Text("Private room".into())));
    }

    #[test]
    fn test_schema_order_then_extras() {
        let input = FeatureRecord::new().with("city", "Paris").with("max_guests", 2.0);
        let row = reconcile(&input, &schema());
        assert_eq!(
            row.names().collect::<Vec<_>>(),
            vec!["room_type", "neighborhood", "max_guests", "review_count", "city"]
        );
    }

    #[test]
    fn test_present_values_not_coerced() {
        let input = FeatureRecord::new().with("max_guests", "two");
        let row = reconcile(&input, &schema());
        assert_eq!(row.get("max_guests"), Some(&FeatureValue::Text("two".into())));
    }

    #[test]
    fn test_complete_input_unchanged() {
        let input = FeatureRecord::new()
            .with("room_type", "Shared room")
            .with("neighborhood", "Soho")
            .with("max_guests", 3.0)
            .with("review_count", 12.0);
        assert_eq!(reconcile(&input, &schema()), input);
    }

    #[test]
    fn test_explicit_default_wins() {
        let schema = FeatureSchema::from_columns(vec![
            FeatureColumn::new("Monthly_Basic_Utilities", FeatureRole::Numerical).with_default(250.0),
        ]);
        let row = reconcile(&FeatureRecord::new(), &schema);
        assert_eq!(row.get("Monthly_Basic_Utilities"), Some(&FeatureValue::Number(250.0)));
    }

    #[test]
    fn test_empty_schema_passes_input_through() {
        let input = FeatureRecord::new().with("city", "Paris");
        assert_eq!(reconcile(&input, &FeatureSchema::default()), input);
    }
}
