use std::path::PathBuf;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8100`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// SQLite database URL.
    pub database_url: String,
    /// Root directory for input and result artifacts.
    pub artifacts_dir: PathBuf,
    /// Base URL of the prediction backend serving the workflow models.
    pub models_base_url: String,
    /// Dispatch worker idle polling interval in seconds (default: `2`).
    pub worker_poll_interval_secs: u64,
    /// Configuration versions for the loaded workflow variants.
    pub workflow_versions: WorkflowVersions,
}

/// Per-workflow configuration versions, also used as the served model
/// versions on the prediction backend.
#[derive(Debug, Clone)]
pub struct WorkflowVersions {
    pub digit_recognizer: String,
    pub brain_mri: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                    |
    /// |-----------------------------|----------------------------|
    /// | `HOST`                      | `0.0.0.0`                  |
    /// | `PORT`                      | `8100`                     |
    /// | `CORS_ORIGINS`              | `http://localhost:3001`    |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                       |
    /// | `DATABASE_URL`              | `sqlite://showcase.db`     |
    /// | `ARTIFACTS_DIR`             | `artifacts`                |
    /// | `MODELS_BASE_URL`           | `http://localhost:8500`    |
    /// | `WORKER_POLL_INTERVAL_SECS` | `2`                        |
    /// | `DIGIT_RECOGNIZER_VERSION`  | `1.0.0`                    |
    /// | `BRAIN_MRI_VERSION`         | `1.0.0`                    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8100".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3001".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://showcase.db".into());

        let artifacts_dir: PathBuf = std::env::var("ARTIFACTS_DIR")
            .unwrap_or_else(|_| "artifacts".into())
            .into();

        let models_base_url =
            std::env::var("MODELS_BASE_URL").unwrap_or_else(|_| "http://localhost:8500".into());

        let worker_poll_interval_secs: u64 = std::env::var("WORKER_POLL_INTERVAL_SECS")
            .unwrap_or_else(|_| "2".into())
            .parse()
            .expect("WORKER_POLL_INTERVAL_SECS must be a valid u64");

        let workflow_versions = WorkflowVersions {
            digit_recognizer: std::env::var("DIGIT_RECOGNIZER_VERSION")
                .unwrap_or_else(|_| "1.0.0".into()),
            brain_mri: std::env::var("BRAIN_MRI_VERSION").unwrap_or_else(|_| "1.0.0".into()),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            database_url,
            artifacts_dir,
            models_base_url,
            worker_poll_interval_secs,
            workflow_versions,
        }
    }

    /// Directory holding raw input artifacts.
    pub fn input_dir(&self) -> PathBuf {
        self.artifacts_dir.join("inputs")
    }

    /// Directory holding result documents.
    pub fn output_dir(&self) -> PathBuf {
        self.artifacts_dir.join("results")
    }
}
