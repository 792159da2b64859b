//! Repository for the `pending_submissions` table.
//!
//! The worker's claim is oldest-first with a deterministic id tie
//! break. Completion is a single transaction that removes the pending
//! row and inserts the ledger row, so a submission id is never in both
//! tables and never in neither between acceptance and consumption.

use showcase_core::types::{SubmissionId, Timestamp};

use crate::models::submission::Submission;
use crate::DbPool;

/// Column list for `pending_submissions` queries.
const COLUMNS: &str = "id, workflow_name, artifact_extension, submitted_at";

/// Provides access to queued submissions.
pub struct SubmissionRepo;

impl SubmissionRepo {
    /// Insert a newly accepted submission into the pending queue.
    pub async fn insert(pool: &DbPool, submission: &Submission) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO pending_submissions \
                 (id, workflow_name, artifact_extension, submitted_at) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(submission.id)
        .bind(&submission.workflow_name)
        .bind(&submission.artifact_extension)
        .bind(submission.submitted_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Find a pending submission by its id.
    pub async fn find_by_id(
        pool: &DbPool,
        id: SubmissionId,
    ) -> Result<Option<Submission>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pending_submissions WHERE id = $1");
        sqlx::query_as::<_, Submission>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The next submission to process: smallest `submitted_at`, ties
    /// broken by id so the order is deterministic.
    pub async fn oldest_pending(pool: &DbPool) -> Result<Option<Submission>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM pending_submissions \
             ORDER BY submitted_at ASC, id ASC \
             LIMIT 1"
        );
        sqlx::query_as::<_, Submission>(&query)
            .fetch_optional(pool)
            .await
    }

    /// Atomically move a submission from the pending queue to the
    /// completion ledger.
    ///
    /// Returns `false` without writing the ledger when the pending row
    /// was already gone, so a duplicate completion attempt cannot
    /// double-record.
    pub async fn complete(
        pool: &DbPool,
        submission: &Submission,
        completed_at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM pending_submissions WHERE id = $1")
            .bind(submission.id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query(
            "INSERT INTO completed_submissions \
                 (id, workflow_name, submitted_at, completed_at) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(submission.id)
        .bind(&submission.workflow_name)
        .bind(submission.submitted_at)
        .bind(completed_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Number of submissions currently queued.
    pub async fn count(pool: &DbPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM pending_submissions")
            .fetch_one(pool)
            .await
    }
}
