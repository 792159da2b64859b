pub mod completion_repo;
pub mod submission_repo;

pub use completion_repo::CompletionRepo;
pub use submission_repo::SubmissionRepo;
