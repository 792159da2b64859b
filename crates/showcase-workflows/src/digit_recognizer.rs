//! Digit recognition workflow.
//!
//! Preprocesses the input to the 28×28 grayscale tensor the served
//! model expects, runs one predict call, and records the argmax digit
//! with its score.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use showcase_core::artifacts::ArtifactStore;
use showcase_core::error::CoreError;
use showcase_core::result::ResultDocument;
use showcase_core::types::SubmissionId;
use showcase_inference::InferenceClient;

use crate::{finalize, preprocess, Workflow, WorkflowError};

/// Registry name of this variant.
pub const NAME: &str = "digit_recognizer";

/// Served model name on the prediction backend.
const MODEL: &str = "digit_recognizer";

/// Model input edge length.
const INPUT_SIZE: u32 = 28;

/// Recognizes a handwritten digit in an image.
pub struct DigitRecognizer {
    inference: Arc<InferenceClient>,
    artifacts: Arc<ArtifactStore>,
    version: String,
}

impl DigitRecognizer {
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

    async fn run(
        &self,
        id: SubmissionId,
        artifact_path: &Path,
    ) -> Result<ResultDocument, WorkflowError> {
        let bytes = tokio::fs::read(artifact_path)
            .await
            .map_err(CoreError::Storage)?;
        let image = image::load_from_memory(&bytes)?;

        let tensor = preprocess::grayscale_tensor(&image, INPUT_SIZE, INPUT_SIZE);
        let predictions = self
            .inference
            .predict(MODEL, &self.version, serde_json::json!([tensor]))
            .await?;

        let scores = preprocess::scores_from(&predictions[0]).ok_or_else(|| {
            WorkflowError::MalformedPrediction("expected a flat array of class scores".into())
        })?;
        let (digit, score) = preprocess::argmax(&scores).ok_or_else(|| {
            WorkflowError::MalformedPrediction("empty class score array".into())
        })?;

        tracing::info!(submission_id = %id, digit, score, "Digit recognized");

        Ok(ResultDocument::success(
            id,
            NAME,
            &self.version,
            serde_json::json!({ "digit": digit, "score": score }),
        ))
    }
}

#[async_trait]
impl Workflow for DigitRecognizer {
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
