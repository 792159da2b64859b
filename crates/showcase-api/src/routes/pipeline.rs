//! Route definitions for the submission pipeline.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{results, submissions, workflows};
use crate::state::AppState;

/// Routes mounted at `/api/v1`.
///
/// ```text
/// POST   /submit_image        -> submit_image
/// GET    /fetch_result/{id}   -> fetch_result
/// GET    /workflows           -> list_workflows
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/submit_image", post(submissions::submit_image))
        .route("/fetch_result/{id}", get(results::fetch_result))
        .route("/workflows", get(workflows::list_workflows))
}
