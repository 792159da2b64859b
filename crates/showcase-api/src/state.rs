use std::sync::Arc;

use showcase_core::artifacts::ArtifactStore;
use showcase_workflows::WorkflowRegistry;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already
/// `Clone`). The same pool, artifact store, and registry are handed to
/// the dispatch worker, so request handling and background processing
/// observe one durable store.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: showcase_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Filesystem store for input and result artifacts.
    pub artifacts: Arc<ArtifactStore>,
    /// Loaded workflow variants, validated against at ingest time.
    pub registry: Arc<WorkflowRegistry>,
}
