//! Forward-only, zero-copy record cursor.
//!
//! A [`Cursor`] walks a caller-owned buffer one record at a time. Every
//! span it hands out borrows from that buffer, never from the cursor, so
//! spans stay valid after the cursor advances but can not outlive the
//! buffer.
//!
//! ```rust
//! use rdx_core::{append_string, Cursor, Id};
//!
//! let mut buf = Vec::new();
//! append_string(&mut buf, Id::new(1, 2), "hello").unwrap();
//!
//! let mut cursor = Cursor::new(&buf);
//! assert!(cursor.advance());
//! assert_eq!(cursor.id(), Id::new(1, 2));
//! assert_eq!(cursor.value(), b"hello");
//! assert!(!cursor.advance());
//! assert!(!cursor.has_failed());
//! ```

use crate::error::RecordError;
use crate::id::Id;
use crate::record::{Record, Tag, LONG_HEADER_LEN, MAX_BODY, SHORT_FORM_BIT, SHORT_HEADER_LEN};
use crate::zip;
use std::fmt;

/// Where a cursor is in its buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorState {
    /// Nothing decoded yet.
    Unread,
    /// A record is decoded and its accessors are valid.
    Positioned,
    /// The buffer was consumed cleanly.
    Exhausted,
    /// Decoding failed. Sticky: the cursor never reads again.
    Failed(RecordError),
}

/// Decoding state over one buffer.
#[derive(Clone, Debug)]
pub struct Cursor<'a> {
    data: &'a [u8],
    /// Offset of the current record's tag byte.
    pos: usize,
    header_len: usize,
    id_len: usize,
    value_len: usize,
    lit: u8,
    state: CursorState,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Cursor {
            data,
            pos: 0,
            header_len: 0,
            id_len: 0,
            value_len: 0,
            lit: 0,
            state: CursorState::Unread,
        }
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    pub fn is_positioned(&self) -> bool {
        self.state == CursorState::Positioned
    }

    pub fn is_exhausted(&self) -> bool {
        self.state == CursorState::Exhausted
    }

    /// Whether decoding failed. `advance` returning `false` alone does not
    /// tell exhaustion from failure; this does.
    pub fn has_failed(&self) -> bool {
        matches!(self.state, CursorState::Failed(_))
    }

    pub fn error(&self) -> Option<RecordError> {
        match self.state {
            CursorState::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// The whole underlying buffer.
    pub fn buffer(&self) -> &'a [u8] {
        self.data
    }

    fn record_len(&self) -> usize {
        self.header_len + self.id_len + self.value_len
    }

    /// Move to the next record.
    ///
    /// Returns `true` when positioned on a record. Returns `false` on clean
    /// exhaustion and on failure; use [`Cursor::has_failed`] to tell which.
    pub fn advance(&mut self) -> bool {
        match self.state {
            CursorState::Exhausted | CursorState::Failed(_) => return false,
            CursorState::Positioned => self.pos += self.record_len(),
            CursorState::Unread => {}
        }
        self.header_len = 0;
        self.id_len = 0;
        self.value_len = 0;
        self.lit = 0;
        if self.pos >= self.data.len() {
            self.state = CursorState::Exhausted;
            return false;
        }
        match self.decode_header() {
            Ok(()) => {
                self.state = CursorState::Positioned;
                true
            }
            Err(err) => {
                self.state = CursorState::Failed(err);
                false
            }
        }
    }

    fn decode_header(&mut self) -> Result<(), RecordError> {
        let buf = &self.data[self.pos..];
        let tag = buf[0];
        let (lit, header_len, body_len) = if tag & SHORT_FORM_BIT != 0 {
            if buf.len() < SHORT_HEADER_LEN {
                return Err(RecordError::Incomplete);
            }
            (tag & !SHORT_FORM_BIT, SHORT_HEADER_LEN, buf[1] as usize)
        } else {
            if buf.len() < LONG_HEADER_LEN {
                return Err(RecordError::Incomplete);
            }
            let body = u32::from_le_bytes([buf[1], buf[2], buf[3], buf[4]]) as usize;
            if body >= MAX_BODY {
                return Err(RecordError::BadRecord);
            }
            (tag, LONG_HEADER_LEN, body)
        };
        // the idlen byte closes the header and is also the body's first byte
        if buf.len() < header_len + body_len.saturating_sub(1) {
            return Err(RecordError::Incomplete);
        }
        let id_len = buf[header_len - 1] as usize;
        if id_len >= body_len {
            return Err(RecordError::BadRecord);
        }
        self.lit = lit;
        self.header_len = header_len;
        self.id_len = id_len;
        self.value_len = body_len - id_len - 1;
        Ok(())
    }

    /// Advance until positioned on a live record.
    pub fn next_live(&mut self) -> bool {
        let mut ok = self.advance();
        while ok && !self.is_live() {
            ok = self.advance();
        }
        ok
    }

    /// Linear scan to the first record whose identifier is not less than
    /// `target`. Returns `false` if the buffer runs out or fails first.
    pub fn seek(&mut self, target: &Id) -> bool {
        if self.state == CursorState::Unread && !self.advance() {
            return false;
        }
        while self.is_positioned() && self.id() < *target {
            if !self.advance() {
                return false;
            }
        }
        self.is_positioned()
    }

    /// Tag byte with the short-form bit stripped, 0 when not positioned.
    pub fn lit(&self) -> u8 {
        self.lit
    }

    pub fn tag(&self) -> Option<Tag> {
        Tag::from_byte(self.lit)
    }

    fn id_bytes(&self) -> &'a [u8] {
        let start = self.pos + self.header_len;
        &self.data[start..start + self.id_len]
    }

    /// Identifier of the current record; [`Id::ZERO`] if it carries none.
    pub fn id(&self) -> Id {
        if !self.is_positioned() {
            return Id::ZERO;
        }
        Id::unpack(self.id_bytes())
    }

    /// Payload of the current record.
    pub fn value(&self) -> &'a [u8] {
        if !self.is_positioned() {
            return &[];
        }
        let start = self.pos + self.header_len + self.id_len;
        &self.data[start..start + self.value_len]
    }

    /// The current record's full span, header included.
    pub fn record(&self) -> &'a [u8] {
        if !self.is_positioned() {
            return &[];
        }
        &self.data[self.pos..self.pos + self.record_len()]
    }

    /// Bytes not yet consumed.
    ///
    /// When positioned this is everything after the current record. After
    /// a failure it is the undecodable tail, which a streaming caller may
    /// complete and decode again.
    pub fn rest(&self) -> &'a [u8] {
        match self.state {
            CursorState::Unread => self.data,
            CursorState::Positioned => &self.data[self.pos + self.record_len()..],
            CursorState::Exhausted => &[],
            CursorState::Failed(_) => &self.data[self.pos..],
        }
    }

    /// A record with no identifier is always live; otherwise the low bit of
    /// the first identifier byte marks a tombstone.
    pub fn is_live(&self) -> bool {
        self.id_len == 0 || self.id_bytes()[0] & 1 == 0
    }

    pub fn parsed(&self) -> Option<(u8, Id, &'a [u8])> {
        self.is_positioned()
            .then(|| (self.lit, self.id(), self.value()))
    }

    pub fn record_view(&self) -> Option<Record<'a>> {
        self.is_positioned().then(|| Record {
            lit: self.lit,
            id: self.id(),
            tombstone: !self.is_live(),
            payload: self.value(),
            raw: self.record(),
        })
    }

    /// Release the buffer view. The cursor reads as exhausted afterwards.
    pub fn reset(&mut self) {
        *self = Cursor::new(&[]);
        self.state = CursorState::Exhausted;
    }

    /// Human-readable rendering of the current payload, for diagnostics.
    pub fn to_display_string(&self) -> String {
        self.to_string()
    }
}

/// Six-digit scientific notation with a signed, two-digit exponent, as
/// in `1.500000e+00`.
fn write_scientific(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    let text = format!("{:.6e}", value);
    let Some((mantissa, exponent)) = text.split_once('e') else {
        // inf and NaN carry no exponent
        return f.write_str(&text);
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    write!(f, "{}e{}{:0>2}", mantissa, sign, digits)
}

impl fmt::Display for Cursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(tag) = self.tag() else {
            return Ok(());
        };
        let value = self.value();
        match tag {
            Tag::None => Ok(()),
            Tag::Float => write_scientific(f, zip::unzip_f64(value)),
            Tag::Integer => write!(f, "{}", zip::unzip_i64(value)),
            Tag::Reference => write!(f, "{}", Id::unpack(value)),
            Tag::String | Tag::Term => f.write_str(&String::from_utf8_lossy(value)),
            Tag::Tuple => f.write_str("()"),
            Tag::Linear => f.write_str("[]"),
            Tag::Euler => f.write_str("{}"),
            Tag::Multix => f.write_str("<>"),
        }
    }
}

/// Iterator over the records of a buffer. Yields one error and stops if
/// the buffer is malformed.
#[derive(Clone, Debug)]
pub struct Records<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Records<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Records {
            cursor: Cursor::new(data),
        }
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = Result<Record<'a>, RecordError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor.advance() {
            return self.cursor.record_view().map(Ok);
        }
        match self.cursor.error() {
            Some(err) => {
                // report once, then read as exhausted
                self.cursor.reset();
                Some(Err(err))
            }
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{append_float, append_integer, append_record, append_reference, append_string, append_tombstone};

    fn sample() -> Vec<u8> {
        let mut buf = Vec::new();
        append_string(&mut buf, Id::new(1, 2), "a").unwrap();
        append_integer(&mut buf, Id::new(1, 4), -7).unwrap();
        append_tombstone(&mut buf, b'S', Id::new(2, 4), b"gone").unwrap();
        append_float(&mut buf, Id::new(1, 6), 1.5).unwrap();
        buf
    }

    #[test]
    fn test_cursor_walks_all_records() {
        let buf = sample();
        let mut cursor = Cursor::new(&buf);
        assert_eq!(cursor.state(), CursorState::Unread);

        assert!(cursor.advance());
        assert_eq!(cursor.tag(), Some(Tag::String));
        assert_eq!(cursor.id(), Id::new(1, 2));
        assert_eq!(cursor.value(), b"a");

        assert!(cursor.advance());
        assert_eq!(cursor.tag(), Some(Tag::Integer));
        assert_eq!(cursor.to_display_string(), "-7");

        assert!(cursor.advance());
        assert!(!cursor.is_live());
        assert_eq!(cursor.id(), Id::new(2, 5));

        assert!(cursor.advance());
        assert_eq!(cursor.to_display_string(), "1.500000e+00");

        assert!(!cursor.advance());
        assert!(cursor.is_exhausted());
        assert!(!cursor.has_failed());
        assert_eq!(cursor.error(), None);
        assert!(!cursor.advance());
    }

    #[test]
    fn test_empty_buffer_is_exhausted() {
        let mut cursor = Cursor::new(&[]);
        assert!(!cursor.advance());
        assert!(cursor.is_exhausted());
        assert!(!cursor.has_failed());
    }

    #[test]
    fn test_record_span_and_rest() {
        let buf = sample();
        let mut cursor = Cursor::new(&buf);
        assert_eq!(cursor.rest(), &buf[..]);
        cursor.advance();
        let first = cursor.record();
        assert_eq!(first.len(), 3 + 2 + 1);
        assert_eq!(cursor.rest(), &buf[first.len()..]);
    }

    #[test]
    fn test_spans_outlive_advance() {
        let buf = sample();
        let mut cursor = Cursor::new(&buf);
        cursor.advance();
        let value = cursor.value();
        cursor.advance();
        assert_eq!(value, b"a");
    }

    #[test]
    fn test_truncated_header_is_incomplete() {
        let buf = sample();
        let cut = &buf[..7];
        let mut cursor = Cursor::new(cut);
        assert!(cursor.advance());
        assert!(!cursor.advance());
        assert!(cursor.has_failed());
        assert_eq!(cursor.error(), Some(RecordError::Incomplete));
        assert_eq!(cursor.rest(), &buf[6..7]);
        // sticky
        assert!(!cursor.advance());
        assert_eq!(cursor.error(), Some(RecordError::Incomplete));
    }

    #[test]
    fn test_truncated_body_is_incomplete() {
        let mut buf = Vec::new();
        append_string(&mut buf, Id::new(1, 2), "hello").unwrap();
        buf.pop();
        let mut cursor = Cursor::new(&buf);
        assert!(!cursor.advance());
        assert_eq!(cursor.error(), Some(RecordError::Incomplete));
    }

    #[test]
    fn test_long_header_needs_six_bytes() {
        let mut cursor = Cursor::new(&[b'S', 3, 0, 0]);
        assert!(!cursor.advance());
        assert_eq!(cursor.error(), Some(RecordError::Incomplete));
    }

    #[test]
    fn test_huge_length_is_bad_record() {
        let buf = [b'S', 0, 0, 0, 0x40, 0];
        let mut cursor = Cursor::new(&buf);
        assert!(!cursor.advance());
        assert_eq!(cursor.error(), Some(RecordError::BadRecord));
    }

    #[test]
    fn test_idlen_beyond_body_is_bad_record() {
        // body 2, idlen 5
        let buf = [b'S' | SHORT_FORM_BIT, 2, 5, 0];
        let mut cursor = Cursor::new(&buf);
        assert!(!cursor.advance());
        assert_eq!(cursor.error(), Some(RecordError::BadRecord));
    }

    #[test]
    fn test_zero_body_is_bad_record() {
        let buf = [b'S' | SHORT_FORM_BIT, 0, 0];
        let mut cursor = Cursor::new(&buf);
        assert!(!cursor.advance());
        assert_eq!(cursor.error(), Some(RecordError::BadRecord));
    }

    #[test]
    fn test_long_form_decodes() {
        let payload = vec![b'z'; 400];
        let mut buf = Vec::new();
        append_record(&mut buf, b'S', Id::new(3, 8), &payload).unwrap();
        let mut cursor = Cursor::new(&buf);
        assert!(cursor.advance());
        assert_eq!(cursor.id(), Id::new(3, 8));
        assert_eq!(cursor.value().len(), 400);
        assert_eq!(cursor.record(), &buf[..]);
    }

    #[test]
    fn test_anonymous_record_is_live() {
        let mut buf = Vec::new();
        append_string(&mut buf, Id::ZERO, "x").unwrap();
        let mut cursor = Cursor::new(&buf);
        assert!(cursor.advance());
        assert!(cursor.is_live());
        assert_eq!(cursor.id(), Id::ZERO);
    }

    #[test]
    fn test_next_live_skips_tombstones() {
        let mut buf = Vec::new();
        append_tombstone(&mut buf, b'S', Id::new(1, 1), b"").unwrap();
        append_tombstone(&mut buf, b'S', Id::new(1, 3), b"").unwrap();
        append_string(&mut buf, Id::new(1, 4), "live").unwrap();
        let mut cursor = Cursor::new(&buf);
        assert!(cursor.next_live());
        assert_eq!(cursor.value(), b"live");
        assert!(!cursor.next_live());
    }

    #[test]
    fn test_seek() {
        let buf = sample();
        let mut cursor = Cursor::new(&buf);
        assert!(cursor.seek(&Id::new(0, 4)));
        assert_eq!(cursor.id(), Id::new(1, 4));
        // already past: stays put
        assert!(cursor.seek(&Id::new(0, 1)));
        assert_eq!(cursor.id(), Id::new(1, 4));
        assert!(cursor.seek(&Id::new(9, 5)));
        assert_eq!(cursor.id(), Id::new(1, 6));
        assert!(!cursor.seek(&Id::MAX));
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn test_display_by_tag() {
        let mut buf = Vec::new();
        append_reference(&mut buf, Id::new(1, 2), Id::new(7, 5)).unwrap();
        append_record(&mut buf, b'E', Id::new(1, 4), b"").unwrap();
        append_record(&mut buf, b'X', Id::new(1, 6), b"").unwrap();
        append_record(&mut buf, b'Q', Id::new(1, 8), b"?").unwrap();
        let mut cursor = Cursor::new(&buf);
        let mut seen = Vec::new();
        while cursor.advance() {
            seen.push(cursor.to_display_string());
        }
        assert_eq!(seen, vec!["7-5", "{}", "<>", ""]);
    }

    #[test]
    fn test_float_display_matches_printf() {
        let mut buf = Vec::new();
        for (i, value) in [1.5, -0.000123, 1e300, 0.0, f64::INFINITY].into_iter().enumerate() {
            append_float(&mut buf, Id::new(1, 2 * i as u64), value).unwrap();
        }
        let mut cursor = Cursor::new(&buf);
        let mut seen = Vec::new();
        while cursor.advance() {
            seen.push(cursor.to_display_string());
        }
        assert_eq!(
            seen,
            vec!["1.500000e+00", "-1.230000e-04", "1.000000e+300", "0.000000e+00", "inf"]
        );
    }

    #[test]
    fn test_reset_releases_view() {
        let buf = sample();
        let mut cursor = Cursor::new(&buf);
        cursor.advance();
        cursor.reset();
        assert!(cursor.record().is_empty());
        assert!(!cursor.advance());
        assert!(!cursor.has_failed());
    }

    #[test]
    fn test_records_iterator() {
        let buf = sample();
        let records: Vec<_> = Records::new(&buf).collect::<Result<_, _>>().unwrap();
        assert_eq!(records.len(), 4);
        assert!(records[2].tombstone);
        assert_eq!(records[0].raw, &buf[..6]);

        let mut broken = buf.clone();
        broken.push(b'S');
        let items: Vec<_> = Records::new(&broken).collect();
        assert_eq!(items.len(), 5);
        assert_eq!(items[4], Err(RecordError::Incomplete));
    }
}
