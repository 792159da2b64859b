use crate::types::SubmissionId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Unknown workflow: {0}")]
    UnknownWorkflow(String),

    #[error("Unsupported artifact kind: {0}")]
    UnsupportedArtifactKind(String),

    #[error("Malformed artifact: {0}")]
    MalformedArtifact(String),

    #[error("Submission not found: {0}")]
    NotFound(SubmissionId),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}
