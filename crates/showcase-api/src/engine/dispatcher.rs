//! Background dispatch worker.
//!
//! A single long-lived Tokio task that claims the oldest pending
//! submission, invokes its workflow variant, and atomically moves the
//! row from the pending queue to the completion ledger. Polling is the
//! scheduling primitive: an idle tick every `poll_interval`, and no
//! delay between consecutive claims while work is queued.
//!
//! Exactly one worker is spawned per process. Because the worker fully
//! finishes one submission before claiming the next, completion order
//! equals arrival order. Processing is at-least-once: a crash between
//! dispatch and completion leaves the pending row to be reclaimed on
//! restart, which is safe because a rerun overwrites the same id-keyed
//! result artifact.

use std::sync::Arc;
use std::time::Duration;

use showcase_core::artifacts::ArtifactStore;
use showcase_core::result::ResultDocument;
use showcase_db::models::submission::Submission;
use showcase_db::repositories::SubmissionRepo;
use showcase_db::DbPool;
use showcase_workflows::WorkflowRegistry;
use tokio_util::sync::CancellationToken;

/// Default idle polling interval for the dispatcher loop.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// The single background task moving submissions from Pending to
/// Completed.
pub struct DispatchWorker {
    pool: DbPool,
    registry: Arc<WorkflowRegistry>,
    artifacts: Arc<ArtifactStore>,
    poll_interval: Duration,
}

impl DispatchWorker {
    /// Create a new worker with the default 2-second idle poll interval.
    pub fn new(
        pool: DbPool,
        registry: Arc<WorkflowRegistry>,
        artifacts: Arc<ArtifactStore>,
    ) -> Self {
        Self {
            pool,
            registry,
            artifacts,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override the idle poll interval.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Run the dispatch loop until the cancellation token is triggered.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.poll_interval);
        tracing::info!(
            poll_interval_ms = self.poll_interval.as_millis() as u64,
            "Dispatch worker started",
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Dispatch worker shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.drain_queue().await {
                        // A failed claim attempt is indistinguishable in
                        // effect from an empty queue; retried next tick.
                        tracing::error!(error = %e, "Dispatch cycle failed");
                    }
                }
            }
        }
    }

    /// Process queued submissions oldest-first until the queue is empty.
    async fn drain_queue(&self) -> Result<(), sqlx::Error> {
        while let Some(submission) = SubmissionRepo::oldest_pending(&self.pool).await? {
            self.process_one(&submission).await?;
        }
        Ok(())
    }

    /// Dispatch one submission and record its completion.
    ///
    /// The dispatch outcome does not branch the worker: a failed
    /// workflow has already recorded its failure as a result document,
    /// so the submission completes either way.
    async fn process_one(&self, submission: &Submission) -> Result<(), sqlx::Error> {
        let artifact_path = self
            .artifacts
            .input_path(submission.id, &submission.artifact_extension);

        match self.registry.get(&submission.workflow_name) {
            Some(workflow) => {
                if let Err(e) = workflow.process(submission.id, &artifact_path).await {
                    tracing::error!(
                        submission_id = %submission.id,
                        workflow = %submission.workflow_name,
                        error = %e,
                        "Workflow dispatch failed",
                    );
                }
            }
            None => {
                // Ingest validates names against the registry, so this
                // only happens when the loaded variant set changed
                // between runs. Record a failure document so the
                // completion is still consumable.
                tracing::error!(
                    submission_id = %submission.id,
                    workflow = %submission.workflow_name,
                    "No loaded variant for queued submission",
                );
                let document = ResultDocument::failure(
                    submission.id,
                    &submission.workflow_name,
                    "unloaded",
                    format!(
                        "No loaded workflow variant named {}",
                        submission.workflow_name
                    ),
                );
                if let Err(e) = self.artifacts.write_result(&document).await {
                    tracing::error!(
                        submission_id = %submission.id,
                        error = %e,
                        "Failed to record missing-variant failure",
                    );
                }
            }
        }

        let moved =
            SubmissionRepo::complete(&self.pool, submission, chrono::Utc::now()).await?;

        if moved {
            tracing::info!(
                submission_id = %submission.id,
                workflow = %submission.workflow_name,
                "Submission completed",
            );
        } else {
            tracing::warn!(
                submission_id = %submission.id,
                "Pending row vanished before completion; ledger not written",
            );
        }

        Ok(())
    }
}
