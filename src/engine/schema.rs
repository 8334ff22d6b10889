//! Feature schema: the ordered columns a pipeline expects, with their roles.
//!
//! A schema either comes straight from the artifact (`feature_schema`) or is
//! inferred from the transformer list: one-hot encoded columns are
//! categorical, `drop` columns are excluded, scaled and passthrough columns
//! are numerical, and columns of unrecognized transformers get the configured
//! fallback role.

use super::pipeline::{Pipeline, TransformerEntry};
use super::value::FeatureValue;
use serde::{Deserialize, Serialize};

/// Placeholder for categorical columns the caller did not supply.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureRole {
    Categorical,
    #[default]
    Numerical,
    Dropped,
}

impl FeatureRole {
    /// Value used to back-fill a missing column of this role.
    pub fn default_value(self) -> Option<FeatureValue> {
        match self {
            FeatureRole::Categorical => Some(FeatureValue::Text(UNKNOWN_CATEGORY.to_string())),
            FeatureRole::Numerical => Some(FeatureValue::Number(0.0)),
            FeatureRole::Dropped => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureColumn {
    pub name: String,
    pub role: FeatureRole,
    /// Overrides the role default during reconciliation.
    #[serde(default)]
    pub default: Option<FeatureValue>,
}

impl FeatureColumn {
    pub fn new(name: impl Into<String>, role: FeatureRole) -> Self {
        Self {
            name: name.into(),
            role,
            default: None,
        }
    }

    pub fn with_default(mut self, value: impl Into<FeatureValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn fill_value(&self) -> Option<FeatureValue> {
        self.default.clone().or_else(|| self.role.default_value())
    }
}

/// Ordered, duplicate-free list of the columns a pipeline consumes.
/// Never contains `Dropped` columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureSchema {
    columns: Vec<FeatureColumn>,
}

impl FeatureSchema {
    /// Build a schema, discarding dropped columns. When a name repeats, the
    /// first occurrence wins.
    pub fn from_columns(columns: impl IntoIterator<Item = FeatureColumn>) -> Self {
        let mut out: Vec<FeatureColumn> = Vec::new();
        for column in columns {
            if column.role == FeatureRole::Dropped {
                continue;
            }
            if out.iter().any(|c| c.name == column.name) {
                tracing::debug!(column = %column.name, "duplicate schema column ignored");
                continue;
            }
            out.push(column);
        }
        Self { columns: out }
    }

    pub fn columns(&self) -> &[FeatureColumn] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn role_of(&self, name: &str) -> Option<FeatureRole> {
        self.columns.iter().find(|c| c.name == name).map(|c| c.role)
    }

    fn names_with(&self, role: FeatureRole) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter(move |c| c.role == role)
            .map(|c| c.name.as_str())
    }

    pub fn categorical(&self) -> impl Iterator<Item = &str> {
        self.names_with(FeatureRole::Categorical)
    }

    pub fn numerical(&self) -> impl Iterator<Item = &str> {
        self.names_with(FeatureRole::Numerical)
    }
}

/// Infer column roles from a transformer list.
///
/// `unrecognized_role` applies to transformers that are neither `drop` nor
/// one of the kinds this crate knows.
pub fn classify_schema(transformers: &[TransformerEntry], unrecognized_role: FeatureRole) -> FeatureSchema {
    let columns = transformers.iter().flat_map(|entry| {
        let role = if entry.transformer.is_drop() {
            FeatureRole::Dropped
        } else if entry.transformer.categories().is_some() {
            FeatureRole::Categorical
        } else if entry.transformer.is_recognized() {
            FeatureRole::Numerical
        } else {
            tracing::debug!(
                transformer = %entry.name,
                role = ?unrecognized_role,
                "unrecognized transformer, using fallback role"
            );
            unrecognized_role
        };
        entry.columns.iter().map(move |name| FeatureColumn::new(name.clone(), role))
    });
    FeatureSchema::from_columns(columns)
}

/// The schema a pipeline expects: its declared schema if it ships one,
/// otherwise the one inferred from its transformers.
pub fn schema_for(pipeline: &dyn Pipeline, unrecognized_role: FeatureRole) -> FeatureSchema {
    match pipeline.declared_schema() {
        Some(declared) => FeatureSchema::from_columns(declared.iter().cloned()),
        None => classify_schema(pipeline.transformers(), unrecognized_role),
    }
}
