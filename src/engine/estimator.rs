use super::listing::ListingInput;
use super::pipeline::{Pipeline, PipelineArtifact};
use super::predict::{predict, Prediction};
use super::reconcile::reconcile;
use super::schema::{schema_for, FeatureRole, FeatureSchema};
use super::value::FeatureRecord;
use crate::config::{ConstantsConfig, ModelConfig};
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

/// Result of one estimate: the prediction and the columns that were
/// back-filled with defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    pub prediction: Prediction,
    pub backfilled: Vec<String>,
}

/// Read-only handle over a loaded pipeline and its schema. Cheap to clone;
/// shared by every submission.
#[derive(Clone)]
pub struct PriceEstimator {
    pipeline: Arc<dyn Pipeline>,
    schema: FeatureSchema,
    constants: ConstantsConfig,
    label: String,
}

impl PriceEstimator {
    pub fn new(
        pipeline: Arc<dyn Pipeline>,
        unrecognized_role: FeatureRole,
        constants: ConstantsConfig,
        label: impl Into<String>,
    ) -> Self {
        let schema = schema_for(pipeline.as_ref(), unrecognized_role);
        Self {
            pipeline,
            schema,
            constants,
            label: label.into(),
        }
    }

    /// Load the artifact named in config. Any failure here is fatal to startup.
    pub fn load(model: &ModelConfig, constants: ConstantsConfig) -> Result<Self> {
        let artifact = PipelineArtifact::load(Path::new(&model.path))
            .context("Failed to load pricing model")?;
        let label = if artifact.version.is_empty() {
            artifact.name.clone()
        } else {
            format!("{} v{}", artifact.name, artifact.version)
        };
        let estimator = Self::new(Arc::new(artifact), model.unrecognized_role, constants, label);
        tracing::info!(
            model = %estimator.label,
            path = %model.path,
            categorical = estimator.schema.categorical().count(),
            numerical = estimator.schema.numerical().count(),
            "model loaded"
        );
        Ok(estimator)
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn estimate(&self, input: &ListingInput) -> Result<Estimate> {
        self.estimate_record(&input.to_record(&self.constants))
    }

    pub fn estimate_record(&self, record: &FeatureRecord) -> Result<Estimate> {
        let backfilled = self
            .schema
            .columns()
            .iter()
            .filter(|c| !record.contains(&c.name))
            .map(|c| c.name.clone())
            .collect();
        let row = reconcile(record, &self.schema);
        let prediction = predict(self.pipeline.as_ref(), &row)?;
        Ok(Estimate { prediction, backfilled })
    }
}
