//! HTTP front end and background dispatch for the showcase pipeline.
//!
//! Hosts the submission ingestor and result gateway as axum handlers,
//! and the single dispatch worker that drains the pending queue.

pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod ingest;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
