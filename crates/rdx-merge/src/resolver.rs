//! Conflict resolution for records that share a merge key.
//!
//! The merge engine only groups; what a group of same-keyed records
//! becomes is up to a [`ConflictResolver`]. Resolvers must not depend on
//! the order of the group if the merge is to be independent of input
//! order.

use crate::error::Result;
use crate::merge::Input;

/// Turns a group of two or more same-keyed inputs into output bytes.
///
/// Writing nothing drops the group. Returning an error aborts the merge
/// and discards whatever the resolver appended for this group.
pub trait ConflictResolver {
    fn resolve(&mut self, out: &mut Vec<u8>, group: &[Input<'_>]) -> Result<()>;
}

impl<F> ConflictResolver for F
where
    F: FnMut(&mut Vec<u8>, &[Input<'_>]) -> Result<()>,
{
    fn resolve(&mut self, out: &mut Vec<u8>, group: &[Input<'_>]) -> Result<()> {
        self(out, group)
    }
}

/// Keeps the byte-greatest record of each group.
///
/// A last-writer-wins policy: deterministic, commutative and idempotent,
/// whatever the payloads mean.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeepMax;

impl ConflictResolver for KeepMax {
    fn resolve(&mut self, out: &mut Vec<u8>, group: &[Input<'_>]) -> Result<()> {
        if let Some(winner) = group.iter().map(|input| input.cursor.record()).max() {
            out.extend_from_slice(winner);
        }
        Ok(())
    }
}

/// Keeps every distinct record of each group once, in byte order.
///
/// A multi-value policy. The output holds several records with the same
/// identifier, which stays sorted under
/// [`by_id`](crate::compare::by_id).
#[derive(Clone, Copy, Debug, Default)]
pub struct Union;

impl ConflictResolver for Union {
    fn resolve(&mut self, out: &mut Vec<u8>, group: &[Input<'_>]) -> Result<()> {
        let mut records: Vec<&[u8]> = group.iter().map(|input| input.cursor.record()).collect();
        records.sort_unstable();
        records.dedup();
        for record in records {
            out.extend_from_slice(record);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MergeError;
    use rdx_core::{append_string, Cursor, Id};

    fn input(index: usize, buf: &[u8]) -> Input<'_> {
        let mut cursor = Cursor::new(buf);
        assert!(cursor.advance());
        Input { index, cursor }
    }

    fn record(value: &str) -> Vec<u8> {
        let mut buf = Vec::new();
        append_string(&mut buf, Id::new(1, 2), value).unwrap();
        buf
    }

    #[test]
    fn test_keep_max_is_order_independent() {
        let (a, b) = (record("pear"), record("plum"));
        let mut out1 = Vec::new();
        KeepMax.resolve(&mut out1, &[input(0, &a), input(1, &b)]).unwrap();
        let mut out2 = Vec::new();
        KeepMax.resolve(&mut out2, &[input(0, &b), input(1, &a)]).unwrap();
        assert_eq!(out1, out2);
        assert_eq!(out1, b);
    }

    #[test]
    fn test_union_dedups() {
        let (a, b) = (record("x"), record("y"));
        let mut out = Vec::new();
        Union
            .resolve(&mut out, &[input(0, &b), input(1, &a), input(2, &b)])
            .unwrap();
        assert_eq!(out, [a.clone(), b.clone()].concat());
    }

    #[test]
    fn test_closure_resolver() {
        let a = record("x");
        let mut seen = 0;
        let mut count = |_out: &mut Vec<u8>, group: &[Input<'_>]| -> Result<()> {
            seen += group.len();
            Ok(())
        };
        let mut out = Vec::new();
        count.resolve(&mut out, &[input(0, &a), input(1, &a)]).unwrap();
        assert!(out.is_empty());
        assert_eq!(seen, 2);
    }

    #[test]
    fn test_failing_resolver() {
        let a = record("x");
        let mut fail = |_out: &mut Vec<u8>, _group: &[Input<'_>]| -> Result<()> {
            Err(MergeError::Resolver("no policy".into()))
        };
        let err = fail.resolve(&mut Vec::new(), &[input(0, &a), input(1, &a)]);
        assert_eq!(err, Err(MergeError::Resolver("no policy".into())));
    }
}
