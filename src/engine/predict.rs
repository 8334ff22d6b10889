use super::pipeline::Pipeline;
use super::value::FeatureRecord;
use anyhow::Result;

/// One model output, in both the model's space and currency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Raw pipeline output (log space for a `log1p` target).
    pub raw: f64,
    pub price: f64,
}

impl Prediction {
    /// `$X.XX`
    pub fn price_string(&self) -> String {
        format!("${:.2}", self.price)
    }

    /// `Predicted Price: $X.XX`
    pub fn display(&self) -> String {
        format!("Predicted Price: {}", self.price_string())
    }
}

/// Run one inference and undo the target transform.
///
/// Inference errors are returned as-is.
pub fn predict(pipeline: &dyn Pipeline, row: &FeatureRecord) -> Result<Prediction> {
    let raw = pipeline.predict_raw(row)?;
    let price = pipeline.target_transform().inverse(raw);
    if !price.is_finite() {
        anyhow::bail!("model produced a non-finite price (raw output {})", raw);
    }
    Ok(Prediction { raw, price })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::pipeline::{TargetTransform, TransformerEntry};

    struct Fixed(f64, TargetTransform);

    impl Pipeline for Fixed {
        fn transformers(&self) -> &[TransformerEntry] {
            &[]
        }
        fn target_transform(&self) -> TargetTransform {
            self.1
        }
        fn predict_raw(&self, _row: &FeatureRecord) -> Result<f64> {
            Ok(self.0)
        }
    }

    struct Failing;

    impl Pipeline for Failing {
        fn transformers(&self) -> &[TransformerEntry] {
            &[]
        }
        fn predict_raw(&self, _row: &FeatureRecord) -> Result<f64> {
            anyhow::bail!("could not convert string to float: 'two'")
        }
    }

    #[test]
    fn test_log_100_displays_99() {
        let p = predict(&Fixed(100f64.ln(), TargetTransform::Log1p), &FeatureRecord::new()).unwrap();
        assert_eq!(p.price_string(), "$99.00");
        assert_eq!(p.display(), "Predicted Price: $99.00");
    }

    #[test]
    fn test_identity_target() {
        let p = predict(&Fixed(42.5, TargetTransform::Identity), &FeatureRecord::new()).unwrap();
        assert_eq!(p.display(), "Predicted Price: $42.50");
    }

    #[test]
    fn test_inference_error_propagates_unchanged() {
        let err = predict(&Failing, &FeatureRecord::new()).unwrap_err();
        assert_eq!(err.to_string(), "could not convert string to float: 'two'");
    }

    #[test]
    fn test_overflow_rejected() {
        assert!(predict(&Fixed(1e6, TargetTransform::Log1p), &FeatureRecord::new()).is_err());
    }
}
