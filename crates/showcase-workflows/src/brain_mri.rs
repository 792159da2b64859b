//! Brain MRI FLAIR abnormality workflow.
//!
//! Two-stage pipeline: a classification model scores the scan for
//! abnormality; when the score crosses the threshold, a segmentation
//! model produces a pixel mask that is attached to the result.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use image::DynamicImage;
use showcase_core::artifacts::ArtifactStore;
use showcase_core::error::CoreError;
use showcase_core::result::ResultDocument;
use showcase_core::types::SubmissionId;
use showcase_inference::InferenceClient;

use crate::{finalize, preprocess, Workflow, WorkflowError};

/// Registry name of this variant.
pub const NAME: &str = "brain_mri_abnormality";

/// Served model names on the prediction backend.
const CLASSIFICATION_MODEL: &str = "bms_flair_abnormality_classification";
const SEGMENTATION_MODEL: &str = "bms_flair_abnormality_segmentation";

/// Model input edge length.
const INPUT_SIZE: u32 = 256;

/// Classification score at or above which the scan is labelled abnormal
/// and segmentation runs.
const ABNORMALITY_THRESHOLD: f32 = 0.5;

/// Detects FLAIR abnormality in a brain MRI scan and segments it.
pub struct BrainMriAbnormality {
    inference: Arc<InferenceClient>,
    artifacts: Arc<ArtifactStore>,
    version: String,
}

impl BrainMriAbnormality {
    pub fn new(
        inference: Arc<InferenceClient>,
        artifacts: Arc<ArtifactStore>,
        version: String,
    ) -> Self {
        Self {
            inference,
            artifacts,
            version,
        }
    }

    async fn classify(&self, tensor: &[Vec<Vec<f32>>]) -> Result<f32, WorkflowError> {
        let predictions = self
            .inference
            .predict(
                CLASSIFICATION_MODEL,
                &self.version,
                serde_json::json!([tensor]),
            )
            .await?;

        probability_from(&predictions[0]).ok_or_else(|| {
            WorkflowError::MalformedPrediction(
                "expected a single abnormality probability".into(),
            )
        })
    }

    async fn segment(
        &self,
        tensor: &[Vec<Vec<f32>>],
    ) -> Result<serde_json::Value, WorkflowError> {
        let predictions = self
            .inference
            .predict(
                SEGMENTATION_MODEL,
                &self.version,
                serde_json::json!([tensor]),
            )
            .await?;

        // The mask is passed through as produced; the client renders it
        // by scaling values to pixel intensities.
        Ok(predictions[0].clone())
    }

    async fn run(
        &self,
        id: SubmissionId,
        artifact_path: &Path,
    ) -> Result<ResultDocument, WorkflowError> {
        let bytes = tokio::fs::read(artifact_path)
            .await
            .map_err(CoreError::Storage)?;
        let image: DynamicImage = image::load_from_memory(&bytes)?;

        let tensor = preprocess::rgb_tensor(&image, INPUT_SIZE, INPUT_SIZE);
        let score = self.classify(&tensor).await?;

        let prediction = if score >= ABNORMALITY_THRESHOLD {
            let mask = self.segment(&tensor).await?;
            serde_json::json!({
                "label": "abnormality",
                "score": score,
                "image": mask,
            })
        } else {
            serde_json::json!({
                "label": "no_abnormality",
                "score": 1.0 - score,
                "image": null,
            })
        };

        tracing::info!(
            submission_id = %id,
            abnormality_score = score,
            "Brain MRI scan processed",
        );

        Ok(ResultDocument::success(id, NAME, &self.version, prediction))
    }
}

#[async_trait]
impl Workflow for BrainMriAbnormality {
    fn name(&self) -> &'static str {
        NAME
    }

    fn configuration_version(&self) -> &str {
        &self.version
    }

    async fn process(&self, id: SubmissionId, artifact_path: &Path) -> Result<(), WorkflowError> {
        let outcome = self.run(id, artifact_path).await;
        finalize(&self.artifacts, id, NAME, &self.version, outcome).await
    }
}

/// Extract a probability from a classification prediction, accepting
/// either a bare number or a one-element array.
fn probability_from(value: &serde_json::Value) -> Option<f32> {
    match value {
        serde_json::Value::Number(n) => n.as_f64().map(|f| f as f32),
        serde_json::Value::Array(items) if items.len() == 1 => {
            probability_from(&items[0])
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probability_accepts_scalar_and_singleton_array() {
        assert_eq!(probability_from(&serde_json::json!(0.8)), Some(0.8));
        assert_eq!(probability_from(&serde_json::json!([0.3])), Some(0.3));
        assert_eq!(probability_from(&serde_json::json!([[0.3]])), Some(0.3));
        assert_eq!(probability_from(&serde_json::json!([0.1, 0.9])), None);
        assert_eq!(probability_from(&serde_json::json!("0.5")), None);
    }
}
