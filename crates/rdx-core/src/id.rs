//! Replica-scoped logical timestamps.
//!
//! An [`Id`] pairs the replica that produced a record (`source`) with a
//! counter local to that replica (`sequence`). Identifiers order by
//! `sequence` first and `source` second, which is what makes concurrent
//! streams converge once merged.

use crate::error::IdParseError;
use crate::ron64;
use crate::zip;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A two-component logical timestamp.
///
/// `source == 0` means "no explicit source". The all-zero and all-ones
/// values serve as open and closed range bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Id {
    /// The replica this identifier belongs to.
    pub source: u64,
    /// Counter local to `source`.
    pub sequence: u64,
}

impl Id {
    pub const ZERO: Id = Id {
        source: 0,
        sequence: 0,
    };

    pub const MAX: Id = Id {
        source: u64::MAX,
        sequence: u64::MAX,
    };

    pub const fn new(source: u64, sequence: u64) -> Self {
        Id { source, sequence }
    }

    pub fn is_zero(&self) -> bool {
        self.source == 0 && self.sequence == 0
    }

    /// Whether a record stamped with this identifier is a tombstone.
    ///
    /// The tombstone flag is the low bit of the first packed byte, which
    /// is the low bit of `sequence`.
    pub fn is_tombstone_seq(&self) -> bool {
        self.sequence & 1 == 1
    }

    /// Packed binary form, `sequence` before `source`.
    pub fn pack(&self) -> Vec<u8> {
        zip::zip_u64_pair(self.sequence, self.source)
    }

    /// Append the packed form to `out`.
    pub fn append_packed(&self, out: &mut Vec<u8>) {
        zip::append_u64_pair(out, self.sequence, self.source);
    }

    /// Length of [`Id::pack`] without allocating.
    pub fn packed_len(&self) -> usize {
        zip::pair_len(self.sequence, self.source)
    }

    /// Inverse of [`Id::pack`].
    pub fn unpack(bytes: &[u8]) -> Self {
        let (sequence, source) = zip::unzip_u64_pair(bytes);
        Id { source, sequence }
    }

    /// Append the radix-64 text form to `out`.
    pub fn write_text(&self, out: &mut Vec<u8>) {
        if self.source != 0 {
            ron64::write_u64(out, self.source);
            out.push(b'-');
        }
        ron64::write_u64(out, self.sequence);
    }

    /// Radix-64 text form: `source-sequence`, or a bare `sequence` when
    /// the source is zero.
    pub fn to_text(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(23);
        self.write_text(&mut out);
        out
    }

    /// Parse a text identifier off the front of `input`.
    ///
    /// Lenient: malformed text yields a zero or partial value and the
    /// unconsumed remainder. A lone number is a `sequence`.
    pub fn parse(input: &[u8]) -> (Id, &[u8]) {
        let (first, rest) = ron64::parse_u64(input);
        match rest.split_first() {
            Some((b'-', tail)) => {
                let (sequence, rest) = ron64::parse_u64(tail);
                (
                    Id {
                        source: first,
                        sequence,
                    },
                    rest,
                )
            }
            _ => (
                Id {
                    source: 0,
                    sequence: first,
                },
                rest,
            ),
        }
    }
}

impl Ord for Id {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sequence
            .cmp(&other.sequence)
            .then_with(|| self.source.cmp(&other.source))
    }
}

impl PartialOrd for Id {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.source != 0 {
            write!(f, "{}-", ron64::encode_u64(self.source))?;
        }
        f.write_str(&ron64::encode_u64(self.sequence))
    }
}

impl FromStr for Id {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(IdParseError::Empty);
        }
        let (id, rest) = Id::parse(s.as_bytes());
        if !rest.is_empty() {
            return Err(IdParseError::TrailingInput(
                String::from_utf8_lossy(rest).into_owned(),
            ));
        }
        Ok(id)
    }
}
