//! Handler listing the loaded workflow variants.

use axum::extract::State;
use axum::Json;

use crate::response::WorkflowInfo;
use crate::state::AppState;

/// GET /api/v1/workflows
///
/// Names and configuration versions of every loaded variant, sorted by
/// name. A submission is accepted only for names in this list.
pub async fn list_workflows(State(state): State<AppState>) -> Json<Vec<WorkflowInfo>> {
    let workflows = state
        .registry
        .entries()
        .into_iter()
        .map(|(name, version)| WorkflowInfo { name, version })
        .collect();
    Json(workflows)
}
