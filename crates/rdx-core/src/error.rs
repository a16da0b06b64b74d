//! Error types for the record codec and identifier text form.

use thiserror::Error;

/// Why a cursor stopped decoding, or why a record could not be written.
///
/// Clean exhaustion of a buffer is not an error; see
/// [`CursorState::Exhausted`](crate::cursor::CursorState::Exhausted).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordError {
    /// The buffer ends in the middle of a record. More bytes may fix it.
    #[error("incomplete input: buffer ends mid-record")]
    Incomplete,

    /// The header is structurally invalid.
    #[error("bad record: malformed header")]
    BadRecord,

    /// Reserved for cursors backed by something other than memory.
    #[error("I/O failed")]
    Io,

    /// The writer was asked for a body of 2^30 bytes or more.
    #[error("record body of {0} bytes exceeds the format limit")]
    Oversized(usize),
}

/// Strict identifier text parsing failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdParseError {
    #[error("empty identifier")]
    Empty,

    #[error("unexpected trailing input: {0:?}")]
    TrailingInput(String),
}

pub type Result<T> = std::result::Result<T, RecordError>;
