//! Repository for the `completed_submissions` table.

use showcase_core::types::SubmissionId;

use crate::models::completion::CompletionRecord;
use crate::DbPool;

/// Column list for `completed_submissions` queries.
const COLUMNS: &str = "id, workflow_name, submitted_at, completed_at";

/// Provides access to the completion ledger.
pub struct CompletionRepo;

impl CompletionRepo {
    /// Find a completion record by submission id.
    pub async fn find_by_id(
        pool: &DbPool,
        id: SubmissionId,
    ) -> Result<Option<CompletionRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM completed_submissions WHERE id = $1");
        sqlx::query_as::<_, CompletionRecord>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Remove a completion record once its result has been handed to a
    /// client. Returns `false` when the record was already gone.
    pub async fn remove(pool: &DbPool, id: SubmissionId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM completed_submissions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of completions awaiting consumption.
    pub async fn count(pool: &DbPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM completed_submissions")
            .fetch_one(pool)
            .await
    }
}
