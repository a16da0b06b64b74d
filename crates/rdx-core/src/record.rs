//! Record layout, type tags and the record writer.
//!
//! ```text
//! short form: [tag|0x80] [body: u8]        [idlen] [id bytes] [payload]
//! long form:  [tag]      [body: u32 LE]    [idlen] [id bytes] [payload]
//! ```
//!
//! `body = 1 + idlen + payload.len()`: the idlen byte, the packed
//! identifier, then the payload. The low bit of the first identifier
//! byte is the tombstone flag.

use crate::error::{RecordError, Result};
use crate::id::Id;
use crate::zip;
use serde::{Deserialize, Serialize};

/// Set on the tag byte of short-form records.
pub const SHORT_FORM_BIT: u8 = 0x80;

/// Header length of a short-form record.
pub const SHORT_HEADER_LEN: usize = 3;

/// Header length of a long-form record.
pub const LONG_HEADER_LEN: usize = 6;

/// Largest body a short-form header can declare.
pub const MAX_SHORT_BODY: usize = u8::MAX as usize;

/// Long-form bodies must be strictly below this.
pub const MAX_BODY: usize = 1 << 30;

/// Payload interpretation. Used for display and debugging only; the
/// merge engine never looks at it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Tag {
    None = 0,
    Float = b'F',
    Integer = b'I',
    Reference = b'R',
    String = b'S',
    Term = b'T',
    /// Tuple container.
    Tuple = b'P',
    /// Ordered list container.
    Linear = b'L',
    /// Map container.
    Euler = b'E',
    /// Multiplexed set container.
    Multix = b'X',
}

impl Tag {
    /// Decode a tag byte with the short-form bit already stripped.
    pub fn from_byte(byte: u8) -> Option<Tag> {
        Some(match byte {
            0 => Tag::None,
            b'F' => Tag::Float,
            b'I' => Tag::Integer,
            b'R' => Tag::Reference,
            b'S' => Tag::String,
            b'T' => Tag::Term,
            b'P' => Tag::Tuple,
            b'L' => Tag::Linear,
            b'E' => Tag::Euler,
            b'X' => Tag::Multix,
            _ => return None,
        })
    }

    pub fn as_byte(self) -> u8 {
        self as u8
    }

    pub fn is_container(self) -> bool {
        matches!(self, Tag::Tuple | Tag::Linear | Tag::Euler | Tag::Multix)
    }
}

/// A decoded record borrowing from its buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Record<'a> {
    /// Tag byte, short-form bit stripped.
    pub lit: u8,
    pub id: Id,
    pub tombstone: bool,
    pub payload: &'a [u8],
    /// The whole record, header included.
    pub raw: &'a [u8],
}

impl<'a> Record<'a> {
    pub fn tag(&self) -> Option<Tag> {
        Tag::from_byte(self.lit)
    }

    pub fn is_live(&self) -> bool {
        !self.tombstone
    }
}

/// Append one record to `out`.
///
/// The short form is used whenever the body fits in a byte. `lit` must
/// not carry [`SHORT_FORM_BIT`].
pub fn append_record(out: &mut Vec<u8>, lit: u8, id: Id, payload: &[u8]) -> Result<()> {
    debug_assert_eq!(lit & SHORT_FORM_BIT, 0, "tag byte overlaps the short-form bit");
    let idlen = id.packed_len();
    let body = 1 + idlen + payload.len();
    if body >= MAX_BODY {
        return Err(RecordError::Oversized(body));
    }
    out.reserve(LONG_HEADER_LEN + body);
    if body <= MAX_SHORT_BODY {
        out.push(lit | SHORT_FORM_BIT);
        out.push(body as u8);
    } else {
        out.push(lit);
        out.extend_from_slice(&(body as u32).to_le_bytes());
    }
    out.push(idlen as u8);
    id.append_packed(out);
    out.extend_from_slice(payload);
    Ok(())
}

/// Append a record whose identifier carries the tombstone bit.
///
/// Tombstones are identifiers with an odd `sequence`; this rounds an
/// even sequence up to the next odd one.
pub fn append_tombstone(out: &mut Vec<u8>, lit: u8, id: Id, payload: &[u8]) -> Result<()> {
    let id = Id::new(id.source, id.sequence | 1);
    append_record(out, lit, id, payload)
}

pub fn append_float(out: &mut Vec<u8>, id: Id, value: f64) -> Result<()> {
    append_record(out, Tag::Float.as_byte(), id, &zip::zip_f64(value))
}

pub fn append_integer(out: &mut Vec<u8>, id: Id, value: i64) -> Result<()> {
    append_record(out, Tag::Integer.as_byte(), id, &zip::zip_i64(value))
}

pub fn append_reference(out: &mut Vec<u8>, id: Id, target: Id) -> Result<()> {
    append_record(out, Tag::Reference.as_byte(), id, &target.pack())
}

pub fn append_string(out: &mut Vec<u8>, id: Id, value: &str) -> Result<()> {
    append_record(out, Tag::String.as_byte(), id, value.as_bytes())
}

pub fn append_term(out: &mut Vec<u8>, id: Id, value: &str) -> Result<()> {
    append_record(out, Tag::Term.as_byte(), id, value.as_bytes())
}
