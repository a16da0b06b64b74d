//! RDX Merge - K-way merging of sorted record streams
//!
//! This crate implements the merge side of RDX replication:
//! - An array-backed min-heap with injected ordering ([`heap`])
//! - Comparators over positioned cursors
//! - Conflict resolvers for records that share a key
//! - The merge engine and one-shot merge functions
//!
//! # Merge Loop
//!
//! ```text
//! seed:  open a cursor per non-empty input, advance once, push
//!
//! step:  k  = group of cursors equal to the root
//!        k == 1 ? copy the record : resolver(group)
//!        advance the k cursors, deepest first:
//!            still positioned -> sift down
//!            exhausted        -> remove
//!            failed           -> abort, rolling back this step
//! ```
//!
//! With a commutative, idempotent resolver the result is a join: merging
//! the same inputs in any order yields the same bytes, and merging a
//! stream with itself yields that stream.
//!
//! # Example
//!
//! ```rust
//! use rdx_core::{append_integer, Cursor, Id};
//! use rdx_merge::{by_id, merge_all, KeepMax};
//!
//! let mut replica_a = Vec::new();
//! append_integer(&mut replica_a, Id::new(1, 2), 10).unwrap();
//! append_integer(&mut replica_a, Id::new(1, 6), 30).unwrap();
//!
//! let mut replica_b = Vec::new();
//! append_integer(&mut replica_b, Id::new(2, 4), 20).unwrap();
//!
//! let merged = merge_all(&[replica_a, replica_b], by_id, KeepMax).unwrap();
//!
//! let mut cursor = Cursor::new(&merged);
//! let mut values = Vec::new();
//! while cursor.advance() {
//!     values.push(cursor.to_display_string());
//! }
//! assert_eq!(values, ["10", "20", "30"]);
//! ```

pub mod compare;
pub mod config;
pub mod error;
pub mod heap;
pub mod merge;
pub mod resolver;

pub use compare::{by_id, by_id_then_payload, Comparator};
pub use config::{MergeConfig, MAX_INPUTS};
pub use error::{MergeError, PartialMerge, Result};
pub use heap::{Heap, HeapOrder};
pub use merge::{merge_all, merge_all_with, merge_into, Input, InputOrder, MergeEngine, MergeStats};
pub use resolver::{ConflictResolver, KeepMax, Union};
