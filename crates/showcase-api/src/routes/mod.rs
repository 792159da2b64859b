pub mod health;
pub mod pipeline;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /submit_image            POST  accept an upload for a workflow
/// /fetch_result/{id}       GET   poll for / consume a result
/// /workflows               GET   list loaded workflow variants
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(pipeline::router())
}
