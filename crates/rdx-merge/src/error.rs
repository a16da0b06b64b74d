//! Error types for the merge engine.

use rdx_core::RecordError;
use thiserror::Error;

/// Errors that end a merge.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    #[error("input {input}: {source}")]
    Record {
        input: usize,
        #[source]
        source: RecordError,
    },

    #[error("{count} non-empty inputs exceed the fan-in capacity of {max}")]
    TooManyInputs { count: usize, max: usize },

    #[error("input {input} is not sorted by the merge comparator")]
    OutOfOrder { input: usize },

    #[error("conflict resolver failed: {0}")]
    Resolver(String),
}

impl MergeError {
    /// The cursor error behind this failure, if there is one.
    pub fn record_error(&self) -> Option<RecordError> {
        match self {
            MergeError::Record { source, .. } => Some(*source),
            _ => None,
        }
    }
}

/// A failed merge together with the output completed before the failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("merge aborted after {} bytes: {error}", .output.len())]
pub struct PartialMerge {
    pub output: Vec<u8>,
    #[source]
    pub error: MergeError,
}

pub type Result<T> = std::result::Result<T, MergeError>;
