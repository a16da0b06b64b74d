//! Comparators over positioned cursors.
//!
//! A merge only converges if every input was sorted with the same
//! comparator it is merged with.

use rdx_core::Cursor;
use std::cmp::Ordering;

/// Three-way comparison of two positioned cursors.
pub trait Comparator {
    fn compare(&self, a: &Cursor<'_>, b: &Cursor<'_>) -> Ordering;
}

impl<F> Comparator for F
where
    F: Fn(&Cursor<'_>, &Cursor<'_>) -> Ordering,
{
    fn compare(&self, a: &Cursor<'_>, b: &Cursor<'_>) -> Ordering {
        self(a, b)
    }
}

/// Identifier order: sequence, then source.
pub fn by_id(a: &Cursor<'_>, b: &Cursor<'_>) -> Ordering {
    a.id().cmp(&b.id())
}

/// Identifier order, then payload bytes, then tag. Records that differ
/// only in value are kept apart instead of grouped.
pub fn by_id_then_payload(a: &Cursor<'_>, b: &Cursor<'_>) -> Ordering {
    a.id()
        .cmp(&b.id())
        .then_with(|| a.value().cmp(b.value()))
        .then_with(|| a.lit().cmp(&b.lit()))
}
