/// Submissions are keyed by a random UUID generated at acceptance time.
pub type SubmissionId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
