//! Submission ingestor.
//!
//! Validates an upload, persists the canonical input artifact, and
//! inserts the pending-queue row. The artifact write happens before the
//! row insert; the two are not transactional, so a crash between them
//! orphans a file but never queues a submission whose artifact is
//! missing. A failed insert removes the file again, leaving only the
//! crash window.

use std::io::Cursor;
use std::path::Path;

use showcase_core::artifacts::{is_supported_extension, CANONICAL_EXTENSION};
use showcase_core::error::CoreError;
use showcase_core::types::SubmissionId;
use showcase_db::models::submission::Submission;
use showcase_db::repositories::SubmissionRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Outcome of a successful ingest.
#[derive(Debug)]
pub struct AcceptedSubmission {
    pub id: SubmissionId,
    /// Extension the artifact was stored under (always the canonical kind).
    pub artifact_extension: String,
}

/// Validate and accept one upload.
///
/// Rejections (unknown workflow, unsupported extension, undecodable
/// bytes) surface as the corresponding [`CoreError`] variant and leave
/// no trace in the store.
pub async fn ingest_submission(
    state: &AppState,
    bytes: &[u8],
    declared_name: &str,
    workflow_name: &str,
) -> AppResult<AcceptedSubmission> {
    if !state.registry.contains(workflow_name) {
        return Err(CoreError::UnknownWorkflow(workflow_name.to_string()).into());
    }

    let extension = declared_extension(declared_name)
        .ok_or_else(|| CoreError::UnsupportedArtifactKind(declared_name.to_string()))?;
    if !is_supported_extension(&extension) {
        return Err(CoreError::UnsupportedArtifactKind(extension).into());
    }

    let decoded = image::load_from_memory(bytes)
        .map_err(|e| CoreError::MalformedArtifact(e.to_string()))?;

    // Re-encode to the canonical kind so downstream components never
    // deal with more than one format.
    let mut png = Vec::new();
    decoded
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| AppError::Internal(format!("Failed to re-encode artifact: {e}")))?;

    let id = SubmissionId::new_v4();
    state
        .artifacts
        .save_input(id, CANONICAL_EXTENSION, &png)
        .await?;

    let submission = Submission::accept_now(id, workflow_name, CANONICAL_EXTENSION);
    if let Err(insert_error) = SubmissionRepo::insert(&state.pool, &submission).await {
        // The submission was never queued, so the input must not
        // outlive the failed accept.
        if let Err(cleanup_error) = state.artifacts.remove_input(id, CANONICAL_EXTENSION).await {
            tracing::warn!(
                submission_id = %id,
                error = %cleanup_error,
                "Failed to remove input after rejected queue insert",
            );
        }
        return Err(insert_error.into());
    }

    tracing::info!(
        submission_id = %id,
        workflow = workflow_name,
        declared_name,
        "Submission accepted",
    );

    Ok(AcceptedSubmission {
        id,
        artifact_extension: CANONICAL_EXTENSION.to_string(),
    })
}

/// Lowercased extension of the declared upload filename.
fn declared_extension(declared_name: &str) -> Option<String> {
    Path::new(declared_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(|e| e.to_ascii_lowercase())
}
