//! Result gateway: poll for and consume a submission's result.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use showcase_core::artifacts::CANONICAL_EXTENSION;
use showcase_core::error::CoreError;
use showcase_core::types::SubmissionId;
use showcase_db::repositories::{CompletionRepo, SubmissionRepo};

use crate::error::AppResult;
use crate::response::PendingResponse;
use crate::state::AppState;

/// GET /api/v1/fetch_result/{id}
///
/// * Completed: returns the result document with `200` and consumes
///   it. Result artifact, raw input artifact, and the ledger row are
///   all removed, so a repeat fetch observes `404`.
/// * Pending (queued or in flight): `202`, no side effect.
/// * Unknown id (never existed, or already consumed): `404`.
/// * Storage failure: `500` with the `STORAGE_ERROR` code.
pub async fn fetch_result(
    State(state): State<AppState>,
    Path(id): Path<SubmissionId>,
) -> AppResult<Response> {
    if let Some(response) = try_consume(&state, id).await? {
        return Ok(response);
    }

    if SubmissionRepo::find_by_id(&state.pool, id).await?.is_some() {
        return Ok(pending_response(id));
    }

    // The worker may have moved the row from the queue to the ledger
    // between the two lookups above. The ledger row is durable until
    // consumed, so a second look settles it.
    if let Some(response) = try_consume(&state, id).await? {
        return Ok(response);
    }

    Err(CoreError::NotFound(id).into())
}

/// Consume the completed result for `id`, if one exists.
///
/// The document is loaded before anything is deleted, so a storage
/// failure leaves the completion intact and the fetch retryable.
async fn try_consume(state: &AppState, id: SubmissionId) -> AppResult<Option<Response>> {
    let Some(record) = CompletionRepo::find_by_id(&state.pool, id).await? else {
        return Ok(None);
    };

    let document = state.artifacts.read_result(id).await?;

    state.artifacts.remove_result(id).await?;
    if let Err(e) = state.artifacts.remove_input(id, CANONICAL_EXTENSION).await {
        tracing::warn!(submission_id = %id, error = %e, "Failed to remove input artifact");
    }
    CompletionRepo::remove(&state.pool, id).await?;

    tracing::info!(
        submission_id = %id,
        workflow = %record.workflow_name,
        "Result consumed",
    );

    Ok(Some((StatusCode::OK, Json(document)).into_response()))
}

fn pending_response(id: SubmissionId) -> Response {
    (
        StatusCode::ACCEPTED,
        Json(PendingResponse {
            status: "Pending",
            submission_id: id,
            message: "Submission accepted, processing not finished.",
        }),
    )
        .into_response()
}
