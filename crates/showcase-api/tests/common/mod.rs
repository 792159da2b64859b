#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use showcase_core::artifacts::ArtifactStore;
use showcase_core::result::ResultDocument;
use showcase_core::types::SubmissionId;
use showcase_db::DbPool;
use showcase_workflows::{Workflow, WorkflowError, WorkflowRegistry};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use showcase_api::config::{ServerConfig, WorkflowVersions};
use showcase_api::engine::DispatchWorker;
use showcase_api::router::build_app_router;
use showcase_api::state::AppState;

/// Multipart boundary used by [`submit_request`].
pub const BOUNDARY: &str = "test-boundary";

/// Build a test `ServerConfig` with safe defaults and artifact
/// directories under `artifacts_dir`.
pub fn test_config(artifacts_dir: &std::path::Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3001".to_string()],
        request_timeout_secs: 30,
        database_url: "sqlite::memory:".to_string(),
        artifacts_dir: artifacts_dir.to_path_buf(),
        models_base_url: "http://localhost:8500".to_string(),
        worker_poll_interval_secs: 2,
        workflow_versions: WorkflowVersions {
            digit_recognizer: "test".to_string(),
            brain_mri: "test".to_string(),
        },
    }
}

/// Workflow stub registered under the real `digit_recognizer` name.
///
/// Records each invocation and writes a canned result document, so
/// pipeline tests exercise the full dispatch path without a prediction
/// backend.
pub struct StubWorkflow {
    pub artifacts: Arc<ArtifactStore>,
    pub invocations: Arc<Mutex<Vec<SubmissionId>>>,
}

#[async_trait]
impl Workflow for StubWorkflow {
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
        self.invocations.lock().unwrap().push(id);
        let document = ResultDocument::success(
            id,
            "digit_recognizer",
            "test",
            serde_json::json!({"digit": 7, "score": 0.99}),
        );
        self.artifacts.write_result(&document).await?;
        Ok(())
    }
}

/// Everything a pipeline test needs: state, router, artifact store,
/// the stub workflow's invocation log, and the tempdir keeping the
/// artifact directories alive.
pub struct TestCtx {
    pub state: AppState,
    pub app: Router,
    pub artifacts: Arc<ArtifactStore>,
    pub invocations: Arc<Mutex<Vec<SubmissionId>>>,
    pub dir: tempfile::TempDir,
}

/// Build the full application with the real middleware stack, the
/// given pool, and a stub workflow registry.
pub fn setup(pool: DbPool) -> TestCtx {
    let dir = tempfile::tempdir().expect("create tempdir");
    let config = test_config(dir.path());

    let artifacts = Arc::new(ArtifactStore::new(config.input_dir(), config.output_dir()));
    let invocations = Arc::new(Mutex::new(Vec::new()));

    let mut registry = WorkflowRegistry::new();
    registry.register(Arc::new(StubWorkflow {
        artifacts: Arc::clone(&artifacts),
        invocations: Arc::clone(&invocations),
    }));
    let registry = Arc::new(registry);

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        artifacts: Arc::clone(&artifacts),
        registry,
    };
    let app = build_app_router(state.clone(), &config);

    TestCtx {
        state,
        app,
        artifacts,
        invocations,
        dir,
    }
}

/// Spawn the dispatch worker with a fast poll interval. Returns the
/// cancellation token and join handle for teardown.
pub fn spawn_worker(ctx: &TestCtx) -> (CancellationToken, tokio::task::JoinHandle<()>) {
    let worker = DispatchWorker::new(
        ctx.state.pool.clone(),
        Arc::clone(&ctx.state.registry),
        Arc::clone(&ctx.artifacts),
    )
    .with_poll_interval(Duration::from_millis(20));

    let cancel = CancellationToken::new();
    let handle = tokio::spawn({
        let cancel = cancel.clone();
        async move { worker.run(cancel).await }
    });
    (cancel, handle)
}

/// Issue a GET request against the app.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("build request"),
    )
    .await
    .expect("request failed")
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body is not JSON")
}

/// Build a multipart `POST /api/v1/submit_image` request. Either part
/// can be omitted to exercise the missing-part rejections.
pub fn submit_request(
    file: Option<(&str, &[u8])>,
    workflow_name: Option<&str>,
) -> Request<Body> {
    let mut body: Vec<u8> = Vec::new();

    if let Some((file_name, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }

    if let Some(name) = workflow_name {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"workflow_name\"\r\n\r\n\
                 {name}\r\n"
            )
            .as_bytes(),
        );
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri("/api/v1/submit_image")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("build request")
}

/// A valid 28×28 PNG for upload tests.
pub fn png_bytes() -> Vec<u8> {
    let img = image::GrayImage::from_pixel(28, 28, image::Luma([128u8]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageLuma8(img)
        .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
        .expect("encode png");
    buf
}
