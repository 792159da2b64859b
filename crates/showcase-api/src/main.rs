use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use showcase_core::artifacts::ArtifactStore;
use showcase_inference::InferenceClient;
use showcase_workflows::brain_mri::BrainMriAbnormality;
use showcase_workflows::digit_recognizer::DigitRecognizer;
use showcase_workflows::WorkflowRegistry;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use showcase_api::config::ServerConfig;
use showcase_api::engine::DispatchWorker;
use showcase_api::router::build_app_router;
use showcase_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "showcase_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let pool = showcase_db::create_pool(&config.database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    showcase_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    showcase_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    // --- Artifact store ---
    let artifacts = Arc::new(ArtifactStore::new(config.input_dir(), config.output_dir()));

    // --- Workflow registry ---
    let inference = Arc::new(InferenceClient::new(config.models_base_url.clone()));
    let mut registry = WorkflowRegistry::new();
    registry.register(Arc::new(DigitRecognizer::new(
        Arc::clone(&inference),
        Arc::clone(&artifacts),
        config.workflow_versions.digit_recognizer.clone(),
    )));
    registry.register(Arc::new(BrainMriAbnormality::new(
        Arc::clone(&inference),
        Arc::clone(&artifacts),
        config.workflow_versions.brain_mri.clone(),
    )));
    let registry = Arc::new(registry);
    tracing::info!(workflows = ?registry.entries(), "Workflow registry loaded");

    // --- Dispatch worker ---
    let worker = DispatchWorker::new(
        pool.clone(),
        Arc::clone(&registry),
        Arc::clone(&artifacts),
    )
    .with_poll_interval(Duration::from_secs(config.worker_poll_interval_secs));

    let worker_cancel = tokio_util::sync::CancellationToken::new();
    let worker_handle = tokio::spawn({
        let cancel = worker_cancel.clone();
        async move { worker.run(cancel).await }
    });
    tracing::info!("Dispatch worker started");

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        artifacts,
        registry,
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    // Let the worker finish its current submission before exiting.
    worker_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(30), worker_handle).await;
    tracing::info!("Dispatch worker stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
