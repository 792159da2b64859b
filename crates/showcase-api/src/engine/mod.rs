//! Background execution engine for the submission pipeline.

pub mod dispatcher;

pub use dispatcher::DispatchWorker;
