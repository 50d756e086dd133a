//! Error types for reactive pipelines

use std::time::Duration;
use thiserror::Error;

/// Result type alias for reactive-examples operations
pub type Result<T> = std::result::Result<T, ReactiveError>;

/// Errors surfaced by the terminal operations of a pipeline
#[derive(Error, Debug)]
pub enum ReactiveError {
    /// A blocking resolve found no value, e.g. after `filter` rejected it
    #[error("Absent value: Mono `{origin}` completed without emitting a value")]
    AbsentValue { origin: String },

    /// `block_timeout` gave up before the pipeline completed
    #[error("Timeout after {0:?} waiting for a value")]
    Timeout(Duration),

    /// Blocking was requested from a thread that is driving an async runtime
    #[error("block() is blocking, which is not supported in thread {thread}")]
    BlockingInAsyncContext { thread: String },

    /// The pipeline task stopped before sending any signal
    #[error("Pipeline terminated without signalling a result")]
    Terminated,

    /// A dedicated scheduler runtime could not be started
    #[error("Scheduler error: {0}")]
    Scheduler(#[from] std::io::Error),
}

impl ReactiveError {
    /// True for the empty-pipeline condition
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::AbsentValue { .. })
    }
}
