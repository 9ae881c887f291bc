//! ONNX classifier executed with tract
//!
//! The exported graph takes one `float32[1, n]` input. Its feature order is
//! stored in the model metadata under [`FEATURE_NAMES_KEY`] as a JSON array
//! of strings.

use crate::error::{PredictError, PredictResult};
use crate::models::classifier::Classifier;
use anyhow::{anyhow, bail, Context, Result};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use tract_onnx::prelude::*;

/// Metadata key holding the ordered feature names
pub const FEATURE_NAMES_KEY: &str = "feature_names";

type OnnxPlan = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Optimized ONNX graph plus the feature order it was exported with
pub struct OnnxModel {
    plan: OnnxPlan,
    feature_names: Vec<String>,
}

impl OnnxModel {
    /// Parse, type and optimize the model at `path`
    pub fn load(path: &Path) -> Result<Self> {
        let onnx = tract_onnx::onnx();
        let proto = onnx
            .proto_model_for_path(path)
            .context("Failed to parse ONNX model")?;

        let declared = proto
            .metadata_props
            .iter()
            .find(|entry| entry.key == FEATURE_NAMES_KEY)
            .map(|entry| entry.value.as_str())
            .ok_or_else(|| anyhow!("model metadata has no {} entry", FEATURE_NAMES_KEY))?;
        let feature_names = parse_feature_names(declared)?;

        let plan = onnx
            .model_for_proto_model(&proto)
            .context("Failed to build ONNX graph")?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(f32::datum_type(), tvec!(1, feature_names.len())),
            )?
            .into_optimized()
            .context("Failed to optimize ONNX graph")?
            .into_runnable()?;

        Ok(Self {
            plan,
            feature_names,
        })
    }

    /// Positive-class score: the last value of the first `float32` output.
    ///
    /// Covers both a single probability and a `[p(negative), p(positive)]`
    /// pair.
    fn score(&self, row: &[f64]) -> Result<f32> {
        let values: Vec<f32> = row.iter().map(|v| *v as f32).collect();
        let input = Tensor::from_shape(&[1, values.len()], &values)?;
        let outputs = self.plan.run(tvec!(input.into()))?;

        let output = outputs
            .iter()
            .find(|output| output.datum_type() == f32::datum_type())
            .ok_or_else(|| anyhow!("model has no float32 output"))?;

        output
            .as_slice::<f32>()?
            .last()
            .copied()
            .ok_or_else(|| anyhow!("model output is empty"))
    }
}

impl Classifier for OnnxModel {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, row: &[f64]) -> PredictResult<f64> {
        let expected = self.feature_names.len();
        if row.len() != expected {
            return Err(PredictError::Inference(format!(
                "row has {} values, model expects {}",
                row.len(),
                expected
            )));
        }

        let score = self
            .score(row)
            .map_err(|e| PredictError::Inference(format!("{:#}", e)))?;

        if !score.is_finite() {
            return Err(PredictError::Inference(format!(
                "model produced a non-finite score ({})",
                score
            )));
        }

        Ok(f64::from(score))
    }
}

impl fmt::Debug for OnnxModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnnxModel")
            .field("feature_names", &self.feature_names)
            .finish()
    }
}

/// Decode and check the declared feature order
fn parse_feature_names(raw: &str) -> Result<Vec<String>> {
    let names: Vec<String> = serde_json::from_str(raw)
        .with_context(|| format!("{} metadata is not a JSON string array", FEATURE_NAMES_KEY))?;

    if names.is_empty() {
        bail!("model declares no features");
    }

    let mut seen = HashSet::with_capacity(names.len());
    for name in &names {
        if name.is_empty() {
            bail!("model declares an empty feature name");
        }
        if !seen.insert(name.as_str()) {
            bail!("duplicate feature name: {}", name);
        }
    }

    Ok(names)
}
