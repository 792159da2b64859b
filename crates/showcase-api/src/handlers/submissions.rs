//! Handler for the upload endpoint.

use axum::extract::{Multipart, State};
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::ingest;
use crate::response::SubmitResponse;
use crate::state::AppState;

/// POST /api/v1/submit_image
///
/// Multipart form with an `image` file part (the declared filename
/// drives extension validation) and a `workflow_name` text part.
/// Returns the generated submission id on acceptance.
pub async fn submit_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<SubmitResponse>> {
    let mut upload: Option<(String, axum::body::Bytes)> = None;
    let mut workflow_name: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart payload: {e}")))?
    {
        match field.name() {
            Some("image") => {
                let declared_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read image: {e}")))?;
                upload = Some((declared_name, bytes));
            }
            Some("workflow_name") => {
                let name = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read field: {e}")))?;
                workflow_name = Some(name);
            }
            _ => {}
        }
    }

    let (declared_name, bytes) =
        upload.ok_or_else(|| AppError::BadRequest("No image file in request".to_string()))?;
    let workflow_name = workflow_name
        .ok_or_else(|| AppError::BadRequest("No workflow name in request".to_string()))?;

    let accepted =
        ingest::ingest_submission(&state, &bytes, &declared_name, &workflow_name).await?;

    Ok(Json(SubmitResponse {
        status: "Success",
        submission_id: accepted.id,
        artifact_extension: accepted.artifact_extension,
        message: "Image submitted for processing.",
    }))
}
