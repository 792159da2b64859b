//! Completion-ledger row model.

use serde::Serialize;
use showcase_core::types::{SubmissionId, Timestamp};
use sqlx::FromRow;

/// A row from the `completed_submissions` table.
///
/// Produced at most once per submission, in the same transaction that
/// removes the pending row. Removed when the gateway hands the result
/// to a client.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CompletionRecord {
    pub id: SubmissionId,
    pub workflow_name: String,
    pub submitted_at: Timestamp,
    pub completed_at: Timestamp,
}
