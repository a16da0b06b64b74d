//! K-way merge of sorted record streams.
//!
//! One cursor per input sits in a [`Heap`]. Each step takes every cursor
//! tied for the smallest key, writes either the lone record or whatever
//! the [`ConflictResolver`] makes of the group, then advances those
//! cursors. Given inputs sorted by the comparator, the output is sorted
//! too and does not depend on the order the inputs were passed in.
//!
//! ```rust
//! use rdx_core::{append_string, Id};
//! use rdx_merge::{by_id, merge_all, KeepMax};
//!
//! let mut a = Vec::new();
//! append_string(&mut a, Id::new(1, 2), "left").unwrap();
//! let mut b = Vec::new();
//! append_string(&mut b, Id::new(2, 1), "right").unwrap();
//!
//! let merged = merge_all(&[a.clone(), b.clone()], by_id, KeepMax).unwrap();
//! assert_eq!(merged, [b, a].concat());
//! ```

use crate::compare::Comparator;
use crate::config::MergeConfig;
use crate::error::{MergeError, PartialMerge, Result};
use crate::heap::{Heap, HeapOrder};
use crate::resolver::ConflictResolver;
use rdx_core::Cursor;
use std::cmp::Ordering;
use tracing::{debug, trace, warn};

/// A cursor and the position of its buffer in the merge's input list.
#[derive(Clone, Debug)]
pub struct Input<'a> {
    pub index: usize,
    pub cursor: Cursor<'a>,
}

/// Orders heap entries by their cursors.
#[derive(Clone, Debug)]
pub struct InputOrder<C>(pub C);

impl<'a, C: Comparator> HeapOrder<Input<'a>> for InputOrder<C> {
    fn order(&self, a: &Input<'a>, b: &Input<'a>) -> Ordering {
        self.0.compare(&a.cursor, &b.cursor)
    }
}

/// Counters for one merge.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Non-empty inputs admitted to the heap.
    pub inputs: usize,
    pub steps: u64,
    /// Steps that went through the conflict resolver.
    pub groups_resolved: u64,
    pub records_consumed: u64,
    pub bytes_written: u64,
}

/// A merge in progress.
pub struct MergeEngine<'a, C> {
    heap: Heap<Input<'a>, InputOrder<C>>,
    config: MergeConfig,
    stats: MergeStats,
    failed: Option<MergeError>,
}

impl<'a, C: Comparator> MergeEngine<'a, C> {
    /// Open a cursor on every non-empty input and heap it.
    ///
    /// Empty inputs contribute nothing and are skipped. An input whose
    /// first record does not decode fails the whole merge.
    pub fn seed<B: AsRef<[u8]>>(inputs: &'a [B], cmp: C, config: MergeConfig) -> Result<Self> {
        let count = inputs.iter().filter(|b| !b.as_ref().is_empty()).count();
        if count > config.max_inputs {
            warn!(count, max = config.max_inputs, "too many merge inputs");
            return Err(MergeError::TooManyInputs {
                count,
                max: config.max_inputs,
            });
        }
        let mut heap = Heap::with_capacity(config.max_inputs, InputOrder(cmp));
        heap.reserve(count);
        for (index, data) in inputs.iter().map(AsRef::as_ref).enumerate() {
            if data.is_empty() {
                continue;
            }
            let mut cursor = Cursor::new(data);
            if cursor.advance() {
                heap.push(Input { index, cursor });
            } else if let Some(source) = cursor.error() {
                warn!(input = index, error = %source, "merge input failed to decode");
                return Err(MergeError::Record {
                    input: index,
                    source,
                });
            }
        }
        debug!(
            inputs = inputs.len(),
            skipped = inputs.len() - count,
            admitted = heap.len(),
            "merge seeded"
        );
        let stats = MergeStats {
            inputs: heap.len(),
            ..MergeStats::default()
        };
        Ok(MergeEngine {
            heap,
            config,
            stats,
            failed: None,
        })
    }

    /// Whether the merge has nothing left to do, either because every
    /// input is consumed or because it failed.
    pub fn is_done(&self) -> bool {
        self.heap.is_empty() || self.failed.is_some()
    }

    pub fn stats(&self) -> &MergeStats {
        &self.stats
    }

    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// The error that ended this merge, if any.
    pub fn error(&self) -> Option<&MergeError> {
        self.failed.as_ref()
    }

    /// Cursors still in play, in heap order.
    pub fn pending(&self) -> &[Input<'a>] {
        self.heap.as_slice()
    }

    /// Resolve the group of smallest-keyed cursors into `out` and move
    /// past it.
    ///
    /// On error nothing from this step stays in `out`, and every later
    /// call returns the same error.
    pub fn merge_step<R>(&mut self, out: &mut Vec<u8>, resolver: &mut R) -> Result<()>
    where
        R: ConflictResolver + ?Sized,
    {
        if let Some(err) = &self.failed {
            return Err(err.clone());
        }
        if self.heap.is_empty() {
            return Ok(());
        }
        let mark = out.len();
        match self.step(out, resolver) {
            Ok(k) => {
                self.stats.steps += 1;
                self.stats.records_consumed += k as u64;
                self.stats.bytes_written += (out.len() - mark) as u64;
                Ok(())
            }
            Err(err) => {
                out.truncate(mark);
                warn!(error = %err, steps = self.stats.steps, "merge aborted");
                self.failed = Some(err.clone());
                Err(err)
            }
        }
    }

    fn step<R>(&mut self, out: &mut Vec<u8>, resolver: &mut R) -> Result<usize>
    where
        R: ConflictResolver + ?Sized,
    {
        let k = self.heap.group_equal_to_root();
        let group = &self.heap.as_slice()[..k];
        if k == 1 {
            out.extend_from_slice(group[0].cursor.record());
        } else {
            trace!(
                size = k,
                id = %group[0].cursor.id(),
                inputs = ?group.iter().map(|input| input.index).collect::<Vec<_>>(),
                "resolving same-key group"
            );
            resolver.resolve(out, group)?;
            self.stats.groups_resolved += 1;
        }
        let verify = self.config.verify_order;
        self.heap.advance_first_k(k, |input, order| {
            let previous = verify.then(|| input.cursor.clone());
            if input.cursor.advance() {
                if let Some(previous) = previous {
                    if order.0.compare(&previous, &input.cursor) == Ordering::Greater {
                        return Err(MergeError::OutOfOrder { input: input.index });
                    }
                }
                Ok(true)
            } else if let Some(source) = input.cursor.error() {
                Err(MergeError::Record {
                    input: input.index,
                    source,
                })
            } else {
                Ok(false)
            }
        })?;
        Ok(k)
    }
}

/// Merge `inputs` into `out`.
///
/// On failure `out` keeps the output of every step that completed before
/// the error.
pub fn merge_into<B, C, R>(
    out: &mut Vec<u8>,
    inputs: &[B],
    cmp: C,
    resolver: &mut R,
    config: MergeConfig,
) -> Result<MergeStats>
where
    B: AsRef<[u8]>,
    C: Comparator,
    R: ConflictResolver + ?Sized,
{
    let mut engine = MergeEngine::seed(inputs, cmp, config)?;
    while !engine.is_done() {
        engine.merge_step(out, resolver)?;
    }
    let stats = engine.stats().clone();
    debug!(
        steps = stats.steps,
        groups = stats.groups_resolved,
        bytes = stats.bytes_written,
        "merge complete"
    );
    Ok(stats)
}

/// Merge `inputs` into a fresh buffer with the default configuration.
pub fn merge_all<B, C, R>(
    inputs: &[B],
    cmp: C,
    resolver: R,
) -> std::result::Result<Vec<u8>, PartialMerge>
where
    B: AsRef<[u8]>,
    C: Comparator,
    R: ConflictResolver,
{
    merge_all_with(inputs, cmp, resolver, MergeConfig::default())
}

/// [`merge_all`] with an explicit configuration.
pub fn merge_all_with<B, C, R>(
    inputs: &[B],
    cmp: C,
    mut resolver: R,
    config: MergeConfig,
) -> std::result::Result<Vec<u8>, PartialMerge>
where
    B: AsRef<[u8]>,
    C: Comparator,
    R: ConflictResolver,
{
    let capacity = inputs.iter().map(|b| b.as_ref().len()).sum();
    let mut output = Vec::with_capacity(capacity);
    match merge_into(&mut output, inputs, cmp, &mut resolver, config) {
        Ok(_) => Ok(output),
        Err(error) => Err(PartialMerge { output, error }),
    }
}
