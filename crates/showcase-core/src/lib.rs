//! Shared domain types for the showcase pipeline.
//!
//! Error taxonomy, submission identifiers, the result-document model,
//! and the filesystem artifact store used by the ingestor, the dispatch
//! worker, and the result gateway.

pub mod artifacts;
pub mod error;
pub mod result;
pub mod types;
