//! # rdx-core
//!
//! Identifiers and the binary record format for RDX replicated data.
//!
//! This crate provides:
//! - [`Id`]: a replica-scoped logical timestamp ordered by sequence, then source
//! - A radix-64 text form for identifiers ([`ron64`])
//! - Compact numeric codecs ([`zip`])
//! - The record writer ([`append_record`] and friends)
//! - [`Cursor`]: a forward-only, zero-copy record decoder
//!
//! ## Record format
//!
//! Each record is a header (3 bytes in the short form, 6 in the long
//! form), the packed identifier, then the payload. The short form is
//! selected by the high bit of the tag byte and declares its body length
//! in one byte; the long form uses a 4-byte little-endian length.
//!
//! ## Example
//!
//! ```rust
//! use rdx_core::{append_integer, Cursor, Id};
//!
//! let mut buf = Vec::new();
//! append_integer(&mut buf, Id::new(3, 10), 42).unwrap();
//!
//! let mut cursor = Cursor::new(&buf);
//! while cursor.advance() {
//!     assert_eq!(cursor.to_display_string(), "42");
//! }
//! assert!(!cursor.has_failed());
//! ```

pub mod cursor;
pub mod error;
pub mod id;
pub mod record;
pub mod ron64;
pub mod zip;

pub use cursor::{Cursor, CursorState, Records};
pub use error::{IdParseError, RecordError, Result};
pub use id::Id;
pub use record::{
    append_float, append_integer, append_record, append_reference, append_string, append_term,
    append_tombstone, Record, Tag,
};
