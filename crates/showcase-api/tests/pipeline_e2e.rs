mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use chrono::TimeZone;
use showcase_core::result::ResultDocument;
use showcase_core::types::SubmissionId;
use showcase_db::models::submission::Submission;
use showcase_db::repositories::SubmissionRepo;
use showcase_db::DbPool;
use showcase_workflows::{Workflow, WorkflowError, WorkflowRegistry};
use tower::ServiceExt;
use uuid::Uuid;

use common::{body_json, get, png_bytes, setup, spawn_worker, submit_request};

/// Poll `fetch_result` until the worker has produced a terminal
/// response, up to a few seconds.
async fn poll_until_done(ctx: &common::TestCtx, id: SubmissionId) -> (StatusCode, serde_json::Value) {
    for _ in 0..200 {
        let response = get(ctx.app.clone(), &format!("/api/v1/fetch_result/{id}")).await;
        let status = response.status();
        if status != StatusCode::ACCEPTED {
            return (status, body_json(response).await);
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    panic!("submission {id} never completed");
}

#[sqlx::test(migrations = "../showcase-db/migrations")]
async fn full_roundtrip_submit_process_fetch(pool: DbPool) {
    let ctx = setup(pool.clone());
    let (cancel, handle) = spawn_worker(&ctx);

    let png = png_bytes();
    let response = ctx
        .app
        .clone()
        .oneshot(submit_request(
            Some(("seven.png", &png)),
            Some("digit_recognizer"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let id: Uuid = body["submission_id"].as_str().unwrap().parse().unwrap();

    let (status, body) = poll_until_done(&ctx, id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Success");
    assert_eq!(body["prediction"]["digit"], 7);
    assert_eq!(body["workflow_name"], "digit_recognizer");

    // Consumption removed both artifacts.
    assert!(!ctx.artifacts.input_path(id, "png").exists());
    assert!(!ctx.artifacts.result_path(id).exists());

    // A repeat fetch observes a clean miss.
    let repeat = get(ctx.app.clone(), &format!("/api/v1/fetch_result/{id}")).await;
    assert_eq!(repeat.status(), StatusCode::NOT_FOUND);

    cancel.cancel();
    handle.await.unwrap();
}

fn submission_at(id: Uuid, offset_secs: i64) -> Submission {
    let base = chrono::Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
    Submission {
        id,
        workflow_name: "digit_recognizer".to_string(),
        artifact_extension: "png".to_string(),
        submitted_at: base + chrono::Duration::seconds(offset_secs),
    }
}

#[sqlx::test(migrations = "../showcase-db/migrations")]
async fn worker_processes_in_arrival_order(pool: DbPool) {
    let ctx = setup(pool.clone());

    // Queue three submissions in reverse arrival order before the
    // worker starts, so the drain order is purely the store's doing.
    let first = submission_at(Uuid::new_v4(), 0);
    let second = submission_at(Uuid::new_v4(), 1);
    let third = submission_at(Uuid::new_v4(), 2);
    for submission in [&third, &first, &second] {
        SubmissionRepo::insert(&pool, submission).await.unwrap();
    }

    let (cancel, handle) = spawn_worker(&ctx);

    for _ in 0..200 {
        if SubmissionRepo::count(&pool).await.unwrap() == 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    assert_eq!(SubmissionRepo::count(&pool).await.unwrap(), 0);

    let order = ctx.invocations.lock().unwrap().clone();
    assert_eq!(order, vec![first.id, second.id, third.id]);

    cancel.cancel();
    handle.await.unwrap();
}

#[sqlx::test(migrations = "../showcase-db/migrations")]
async fn queued_submission_for_an_unloaded_variant_fails_cleanly(pool: DbPool) {
    let ctx = setup(pool.clone());

    // A row left over from a run whose variant set included a workflow
    // this process never loaded.
    let submission = Submission::accept_now(Uuid::new_v4(), "retired_workflow", "png");
    SubmissionRepo::insert(&pool, &submission).await.unwrap();

    let (cancel, handle) = spawn_worker(&ctx);

    let (status, body) = poll_until_done(&ctx, submission.id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Failure");
    assert!(body["prediction"].is_null());
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("retired_workflow"));

    // The consume removed the ledger row like any other result.
    let repeat = get(ctx.app.clone(), &format!("/api/v1/fetch_result/{}", submission.id)).await;
    assert_eq!(repeat.status(), StatusCode::NOT_FOUND);

    cancel.cancel();
    handle.await.unwrap();
}

/// A workflow that writes a failure document and reports the error,
/// standing in for an unreachable prediction backend.
struct FailingWorkflow {
    artifacts: Arc<showcase_core::artifacts::ArtifactStore>,
}

#[async_trait]
impl Workflow for FailingWorkflow {
    fn name(&self) -> &'static str {
        "digit_recognizer"
    }

    fn configuration_version(&self) -> &str {
        "test"
    }

    async fn process(
        &self,
        id: SubmissionId,
        _artifact_path: &std::path::Path,
    ) -> Result<(), WorkflowError> {
        let document = ResultDocument::failure(
            id,
            "digit_recognizer",
            "test",
            "prediction backend unreachable".to_string(),
        );
        self.artifacts.write_result(&document).await?;
        Err(WorkflowError::MalformedPrediction(
            "prediction backend unreachable".to_string(),
        ))
    }
}

#[sqlx::test(migrations = "../showcase-db/migrations")]
async fn failed_workflow_still_yields_a_failure_result(pool: DbPool) {
    let mut ctx = setup(pool.clone());

    // Swap in a registry whose only workflow fails every submission.
    let mut registry = WorkflowRegistry::new();
    registry.register(Arc::new(FailingWorkflow {
        artifacts: Arc::clone(&ctx.artifacts),
    }));
    ctx.state.registry = Arc::new(registry);
    ctx.app = showcase_api::router::build_app_router(ctx.state.clone(), &ctx.state.config);

    let (cancel, handle) = spawn_worker(&ctx);

    let png = png_bytes();
    let response = ctx
        .app
        .clone()
        .oneshot(submit_request(
            Some(("seven.png", &png)),
            Some("digit_recognizer"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let id: Uuid = body["submission_id"].as_str().unwrap().parse().unwrap();

    let (status, body) = poll_until_done(&ctx, id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Failure");
    assert!(body["prediction"].is_null());
    assert_eq!(body["message"], "prediction backend unreachable");

    cancel.cancel();
    handle.await.unwrap();
}
