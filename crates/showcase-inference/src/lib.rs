//! REST client for the external prediction service.
//!
//! Wraps the model server's versioned `:predict` endpoint using
//! [`reqwest`]. The payload is tensor-shaped JSON: a batch of instances
//! in, a batch of predictions out.

pub mod client;

pub use client::{InferenceClient, InferenceError};
