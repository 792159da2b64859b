//! Result documents written by workflow variants and consumed by the
//! result gateway.
//!
//! One document exists per submission, keyed by submission id, stored
//! as JSON in the output artifact directory. Reprocessing the same
//! submission overwrites the document in place.

use serde::{Deserialize, Serialize};

use crate::types::SubmissionId;

/// Terminal outcome of a workflow invocation, as reported to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultStatus {
    /// The workflow produced a prediction.
    Success,
    /// The workflow failed; `message` carries the reason.
    Failure,
}

/// The output document produced by one workflow invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultDocument {
    pub submission_id: SubmissionId,
    pub workflow_name: String,
    /// Configuration version of the workflow that produced this result.
    pub workflow_version: String,
    pub status: ResultStatus,
    /// Workflow-specific prediction payload. `None` on failure.
    pub prediction: Option<serde_json::Value>,
    /// Human-readable failure reason. `None` on success.
    pub message: Option<String>,
}

impl ResultDocument {
    /// Build a successful result carrying a prediction payload.
    pub fn success(
        submission_id: SubmissionId,
        workflow_name: &str,
        workflow_version: &str,
        prediction: serde_json::Value,
    ) -> Self {
        Self {
            submission_id,
            workflow_name: workflow_name.to_string(),
            workflow_version: workflow_version.to_string(),
            status: ResultStatus::Success,
            prediction: Some(prediction),
            message: None,
        }
    }

    /// Build a failure result carrying an error message.
    pub fn failure(
        submission_id: SubmissionId,
        workflow_name: &str,
        workflow_version: &str,
        message: String,
    ) -> Self {
        Self {
            submission_id,
            workflow_name: workflow_name.to_string(),
            workflow_version: workflow_version.to_string(),
            status: ResultStatus::Failure,
            prediction: None,
            message: Some(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_as_pascal_case() {
        let json = serde_json::to_value(ResultStatus::Success).unwrap();
        assert_eq!(json, serde_json::json!("Success"));
        let json = serde_json::to_value(ResultStatus::Failure).unwrap();
        assert_eq!(json, serde_json::json!("Failure"));
    }

    #[test]
    fn success_document_has_prediction_and_no_message() {
        let id = uuid::Uuid::new_v4();
        let doc = ResultDocument::success(
            id,
            "digit_recognizer",
            "1.0.0",
            serde_json::json!({"digit": 7, "score": 0.99}),
        );
        assert_eq!(doc.status, ResultStatus::Success);
        assert_eq!(doc.prediction.unwrap()["digit"], 7);
        assert!(doc.message.is_none());
    }

    #[test]
    fn failure_document_has_message_and_no_prediction() {
        let id = uuid::Uuid::new_v4();
        let doc =
            ResultDocument::failure(id, "digit_recognizer", "1.0.0", "backend down".into());
        assert_eq!(doc.status, ResultStatus::Failure);
        assert!(doc.prediction.is_none());
        assert_eq!(doc.message.as_deref(), Some("backend down"));
    }
}
