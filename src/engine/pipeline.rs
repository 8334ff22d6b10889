//! Serialized preprocessing + linear regression pipeline.
//!
//! The artifact is a JSON document holding an ordered transformer list (one
//! entry per column group, applied in order) followed by a linear regressor
//! over the concatenated encoded features. Predictions are made in the
//! target's transformed space; `target_transform` names the forward transform
//! used at training time so the caller can invert it.

use super::schema::FeatureColumn;
use super::value::{FeatureRecord, FeatureValue};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Something that can score one reconciled row.
pub trait Pipeline: Send + Sync {
    /// Ordered transformer list, used to infer the feature schema.
    fn transformers(&self) -> &[TransformerEntry];

    /// Statically declared schema, if the artifact ships one.
    fn declared_schema(&self) -> Option<&[FeatureColumn]> {
        None
    }

    fn target_transform(&self) -> TargetTransform {
        TargetTransform::Log1p
    }

    /// Run inference on a single row, returning the raw (transformed-space) value.
    fn predict_raw(&self, row: &FeatureRecord) -> Result<f64>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetTransform {
    #[default]
    Log1p,
    Identity,
}

impl TargetTransform {
    pub fn inverse(self, value: f64) -> f64 {
        match self {
            TargetTransform::Log1p => value.exp_m1(),
            TargetTransform::Identity => value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleUnknown {
    #[default]
    Ignore,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transformer {
    Drop,
    Passthrough,
    StandardScaler {
        mean: Vec<f64>,
        scale: Vec<f64>,
    },
    MinMaxScaler {
        min: Vec<f64>,
        scale: Vec<f64>,
    },
    OneHotEncoder {
        categories: Vec<Vec<String>>,
        #[serde(default)]
        handle_unknown: HandleUnknown,
    },
    /// Any kind this crate does not know how to fit; its columns are fed
    /// through as plain numbers.
    #[serde(other)]
    Unrecognized,
}

impl Transformer {
    pub fn is_drop(&self) -> bool {
        matches!(self, Transformer::Drop)
    }

    /// Category lists, for transformers that encode categorical columns.
    pub fn categories(&self) -> Option<&[Vec<String>]> {
        match self {
            Transformer::OneHotEncoder { categories, .. } => Some(categories.as_slice()),
            _ => None,
        }
    }

    /// Whether this is a transformer kind the crate recognizes.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Transformer::Unrecognized)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformerEntry {
    pub name: String,
    #[serde(flatten)]
    pub transformer: Transformer,
    pub columns: Vec<String>,
}

impl TransformerEntry {
    /// Number of encoded features this entry emits.
    pub fn width(&self) -> usize {
        match &self.transformer {
            Transformer::Drop => 0,
            Transformer::OneHotEncoder { categories, .. } => categories.iter().map(Vec::len).sum(),
            _ => self.columns.len(),
        }
    }

    fn validate(&self) -> Result<()> {
        let n = self.columns.len();
        let check = |what: &str, len: usize| -> Result<()> {
            if len != n {
                anyhow::bail!(
                    "transformer '{}': {} has {} entries for {} columns",
                    self.name, what, len, n
                );
            }
            Ok(())
        };
        match &self.transformer {
            Transformer::StandardScaler { mean, scale } => {
                check("mean", mean.len())?;
                check("scale", scale.len())
            }
            Transformer::MinMaxScaler { min, scale } => {
                check("min", min.len())?;
                check("scale", scale.len())
            }
            Transformer::OneHotEncoder { categories, .. } => check("categories", categories.len()),
            _ => Ok(()),
        }
    }

    fn encode_into(&self, row: &FeatureRecord, out: &mut Vec<f64>) -> Result<()> {
        if self.transformer.is_drop() {
            return Ok(());
        }
        for (i, column) in self.columns.iter().enumerate() {
            let value = row
                .get(column)
                .with_context(|| format!("column '{}' not found in input row", column))?;

            match &self.transformer {
                Transformer::Drop => {}
                Transformer::OneHotEncoder { categories, handle_unknown } => {
                    let text = value.as_text().with_context(|| {
                        format!("column '{}' expects a category, got {}", column, value)
                    })?;
                    let cats = param(categories, i, "categories", column)?;
                    let hit = cats.iter().position(|c| c == text);
                    if hit.is_none() && *handle_unknown == HandleUnknown::Error {
                        anyhow::bail!("unknown category {:?} for column '{}'", text, column);
                    }
                    out.extend((0..cats.len()).map(|j| if Some(j) == hit { 1.0 } else { 0.0 }));
                }
                Transformer::StandardScaler { mean, scale } => {
                    let x = expect_number(column, value)?;
                    let m = *param(mean, i, "mean", column)?;
                    let s = match *param(scale, i, "scale", column)? {
                        s if s == 0.0 => 1.0,
                        s => s,
                    };
                    out.push((x - m) / s);
                }
                Transformer::MinMaxScaler { min, scale } => {
                    let x = expect_number(column, value)?;
                    let lo = *param(min, i, "min", column)?;
                    let factor = *param(scale, i, "scale", column)?;
                    out.push((x - lo) * factor);
                }
                Transformer::Passthrough | Transformer::Unrecognized => {
                    out.push(expect_number(column, value)?);
                }
            }
        }
        Ok(())
    }
}

/// Per-column fitted parameter. Missing entries mean the artifact skipped
/// `validate`.
fn param<'a, T>(values: &'a [T], i: usize, what: &str, column: &str) -> Result<&'a T> {
    values
        .get(i)
        .with_context(|| format!("{} has no entry for column '{}'", what, column))
}

fn expect_number(column: &str, value: &FeatureValue) -> Result<f64> {
    value
        .as_number()
        .with_context(|| format!("column '{}' expects a number, got {}", column, value))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preprocessor {
    pub transformers: Vec<TransformerEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegressor {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearRegressor {
    pub fn predict(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.coefficients.len() {
            anyhow::bail!(
                "regressor expects {} features, got {}",
                self.coefficients.len(),
                features.len()
            );
        }
        let dot: f64 = self.coefficients.iter().zip(features).map(|(c, x)| c * x).sum();
        Ok(self.intercept + dot)
    }
}

/// Trained pipeline as loaded from disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineArtifact {
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub target_transform: TargetTransform,
    pub preprocessor: Preprocessor,
    pub regressor: LinearRegressor,
    #[serde(default)]
    pub feature_schema: Option<Vec<FeatureColumn>>,
}

impl PipelineArtifact {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read model artifact: {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Invalid model artifact: {}", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let artifact: PipelineArtifact =
            serde_json::from_str(content).context("Failed to parse model artifact JSON")?;
        artifact.validate()?;
        Ok(artifact)
    }

    pub fn encoded_width(&self) -> usize {
        self.preprocessor.transformers.iter().map(TransformerEntry::width).sum()
    }

    fn validate(&self) -> Result<()> {
        for entry in &self.preprocessor.transformers {
            entry.validate()?;
        }
        let width = self.encoded_width();
        if width != self.regressor.coefficients.len() {
            anyhow::bail!(
                "preprocessor emits {} features but regressor has {} coefficients",
                width,
                self.regressor.coefficients.len()
            );
        }
        Ok(())
    }

    /// Apply the preprocessor to a row, producing the regressor's input vector.
    pub fn encode(&self, row: &FeatureRecord) -> Result<Vec<f64>> {
        let mut features = Vec::with_capacity(self.encoded_width());
        for entry in &self.preprocessor.transformers {
            entry
                .encode_into(row, &mut features)
                .with_context(|| format!("transformer '{}' failed", entry.name))?;
        }
        Ok(features)
    }
}

impl Pipeline for PipelineArtifact {
    fn transformers(&self) -> &[TransformerEntry] {
        &self.preprocessor.transformers
    }

    fn declared_schema(&self) -> Option<&[FeatureColumn]> {
        self.feature_schema.as_deref()
    }

    fn target_transform(&self) -> TargetTransform {
        self.target_transform
    }

    fn predict_raw(&self, row: &FeatureRecord) -> Result<f64> {
        let features = self.encode(row)?;
        self.regressor.predict(&features)
    }
}
