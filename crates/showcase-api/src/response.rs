//! Response payload types for the pipeline endpoints.
//!
//! The submission and polling endpoints use a flat `status` field
//! (`Success` / `Pending`) that clients branch on; completed results
//! return the workflow's own result document, whose `status` is
//! `Success` or `Failure` as written by the variant.

use serde::Serialize;
use showcase_core::types::SubmissionId;

/// Body of a `200` response to `POST /api/v1/submit_image`.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub status: &'static str,
    pub submission_id: SubmissionId,
    /// Canonical encoding of the stored artifact.
    pub artifact_extension: String,
    pub message: &'static str,
}

/// Body of a `202` response to `GET /api/v1/fetch_result/{id}`.
#[derive(Debug, Serialize)]
pub struct PendingResponse {
    pub status: &'static str,
    pub submission_id: SubmissionId,
    pub message: &'static str,
}

/// One registered workflow variant, as listed by `GET /api/v1/workflows`.
#[derive(Debug, Serialize)]
pub struct WorkflowInfo {
    pub name: &'static str,
    pub version: String,
}
