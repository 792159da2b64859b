//! Named processing pipelines ("workflows") and their registry.
//!
//! Each workflow variant takes a raw input artifact, runs its own
//! preprocessing and inference against the external prediction service,
//! and writes exactly one id-keyed result document to the artifact
//! store. The dispatch worker treats a variant as a black box behind
//! the [`Workflow`] trait.

pub mod brain_mri;
pub mod digit_recognizer;
pub mod preprocess;
pub mod registry;

use std::path::Path;

use async_trait::async_trait;
use showcase_core::artifacts::ArtifactStore;
use showcase_core::error::CoreError;
use showcase_core::result::ResultDocument;
use showcase_core::types::SubmissionId;
use showcase_inference::InferenceError;

pub use registry::WorkflowRegistry;

/// Errors produced inside a workflow invocation.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// The stored input artifact could not be decoded as an image.
    #[error("Artifact decode error: {0}")]
    Artifact(#[from] image::ImageError),

    /// Storage or serialization failure from the core layer.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The prediction backend call failed.
    #[error(transparent)]
    Inference(#[from] InferenceError),

    /// The backend answered, but not in the shape this variant expects.
    #[error("Malformed prediction: {0}")]
    MalformedPrediction(String),
}

/// A named processing pipeline variant.
///
/// `process` must write exactly one result document keyed by `id` (or
/// fail after attempting to record the failure as a document). Invoking
/// it again for the same `id` overwrites the document, which is what
/// makes at-least-once reprocessing safe.
#[async_trait]
pub trait Workflow: Send + Sync {
    /// Registry name, referenced by submissions.
    fn name(&self) -> &'static str;

    /// Configuration version recorded in result documents.
    fn configuration_version(&self) -> &str;

    /// Process one submission's input artifact.
    async fn process(&self, id: SubmissionId, artifact_path: &Path) -> Result<(), WorkflowError>;
}

/// Persist the outcome of a workflow run as a result document.
///
/// On success the document is written as-is. On failure a `Failure`
/// document is written in its place (best effort) so the client sees a
/// clean failure payload instead of a missing artifact, and the error
/// is still returned for the worker to log.
pub(crate) async fn finalize(
    artifacts: &ArtifactStore,
    id: SubmissionId,
    name: &'static str,
    version: &str,
    outcome: Result<ResultDocument, WorkflowError>,
) -> Result<(), WorkflowError> {
    match outcome {
        Ok(document) => {
            artifacts.write_result(&document).await?;
            Ok(())
        }
        Err(error) => {
            let document = ResultDocument::failure(id, name, version, error.to_string());
            if let Err(write_error) = artifacts.write_result(&document).await {
                tracing::error!(
                    submission_id = %id,
                    workflow = name,
                    error = %write_error,
                    "Failed to record workflow failure",
                );
            }
            Err(error)
        }
    }
}
