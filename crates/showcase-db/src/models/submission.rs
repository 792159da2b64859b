//! Pending-queue row model.

use chrono::Timelike;
use serde::Serialize;
use showcase_core::types::{SubmissionId, Timestamp};
use sqlx::FromRow;

/// A row from the `pending_submissions` table.
///
/// Created by the ingestor, removed by the dispatch worker once
/// processing completes. Never mutated in place.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Submission {
    pub id: SubmissionId,
    pub workflow_name: String,
    /// Encoding of the stored raw artifact. Always the canonical kind
    /// after ingest re-encoding, but persisted so the worker can locate
    /// the file without guessing.
    pub artifact_extension: String,
    /// Acceptance time, the ordering key for processing. Wall clock,
    /// second resolution.
    pub submitted_at: Timestamp,
}

impl Submission {
    /// Build a new submission accepted now.
    pub fn accept_now(
        id: SubmissionId,
        workflow_name: &str,
        artifact_extension: &str,
    ) -> Self {
        let now = chrono::Utc::now();
        // Second resolution keeps the ordering key stable across the
        // TEXT round-trip.
        let submitted_at = now.with_nanosecond(0).unwrap_or(now);
        Self {
            id,
            workflow_name: workflow_name.to_string(),
            artifact_extension: artifact_extension.to_string(),
            submitted_at,
        }
    }
}
