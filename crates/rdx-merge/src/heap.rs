//! Array-backed binary min-heap with an injected ordering.
//!
//! The heap never looks at its elements itself: every comparison goes
//! through a [`HeapOrder`]. Elements are expected to change their keys in
//! place (a cursor advancing to its next record), after which the caller
//! restores order with [`Heap::down`] or removes the element.
//!
//! Ties are allowed: the invariant is that no element is strictly less
//! than its parent.

use std::cmp::Ordering;
use std::collections::VecDeque;

/// Three-way ordering over heap elements.
pub trait HeapOrder<T> {
    fn order(&self, a: &T, b: &T) -> Ordering;
}

impl<T, F> HeapOrder<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    fn order(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// A min-heap over `T` ordered by `O`, holding at most `capacity` elements.
#[derive(Clone, Debug)]
pub struct Heap<T, O> {
    items: Vec<T>,
    order: O,
    capacity: usize,
}

impl<T, O: HeapOrder<T>> Heap<T, O> {
    /// Create an empty heap. `capacity` is a hard limit, not a hint:
    /// nothing is allocated for it up front.
    pub fn with_capacity(capacity: usize, order: O) -> Self {
        Heap {
            items: Vec::new(),
            order,
            capacity,
        }
    }

    /// Reserve room for `additional` more elements, never past the limit.
    pub fn reserve(&mut self, additional: usize) {
        let room = self.capacity.saturating_sub(self.items.len());
        self.items.reserve(additional.min(room));
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ordering(&self) -> &O {
        &self.order
    }

    pub fn peek(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    #[inline]
    fn less(&self, a: usize, b: usize) -> bool {
        self.order.order(&self.items[a], &self.items[b]) == Ordering::Less
    }

    /// Insert an element.
    ///
    /// # Panics
    ///
    /// If the heap is already at capacity.
    pub fn push(&mut self, item: T) {
        assert!(
            self.items.len() < self.capacity,
            "heap capacity of {} exceeded",
            self.capacity
        );
        self.items.push(item);
        self.up(self.items.len() - 1);
    }

    /// Sift the element at `i` towards the root.
    pub fn up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if !self.less(i, parent) {
                break;
            }
            self.items.swap(i, parent);
            i = parent;
        }
    }

    /// Sift the element at `i0` towards the leaves. Returns whether it
    /// moved.
    ///
    /// The right child is taken over the left one only when it is strictly
    /// smaller, so ties resolve towards the left.
    pub fn down(&mut self, i0: usize) -> bool {
        let n = self.items.len();
        let mut i = i0;
        loop {
            let left = 2 * i + 1;
            if left >= n {
                break;
            }
            let mut child = left;
            let right = left + 1;
            if right < n && self.less(right, left) {
                child = right;
            }
            if !self.less(child, i) {
                break;
            }
            self.items.swap(i, child);
            i = child;
        }
        i > i0
    }

    /// Remove and return the element at `i`.
    ///
    /// The last element takes its place and is sifted to where it belongs.
    pub fn remove(&mut self, i: usize) -> T {
        let item = self.items.swap_remove(i);
        if i < self.items.len() && !self.down(i) {
            self.up(i);
        }
        item
    }

    /// Move every element equal to the root to the front of the array.
    ///
    /// Equal elements may sit anywhere in the tree, but each of them only
    /// has equal ancestors, so a breadth-first probe that expands equal
    /// nodes finds them all. Returns how many there are: after the call
    /// `as_slice()[..k]` is the group and the rest is still heap-ordered
    /// relative to it.
    pub fn group_equal_to_root(&mut self) -> usize {
        let n = self.items.len();
        if n < 2 {
            return n;
        }
        let mut queue: VecDeque<usize> = VecDeque::with_capacity(n);
        let mut found = vec![0usize];
        queue.extend((1..3).filter(|&c| c < n));
        while let Some(i) = queue.pop_front() {
            if self.order.order(&self.items[0], &self.items[i]) != Ordering::Equal {
                continue;
            }
            found.push(i);
            queue.extend((2 * i + 1..2 * i + 3).filter(|&c| c < n));
            assert!(
                queue.len() <= self.capacity,
                "equal-key probe exceeded the fan-in capacity of {}",
                self.capacity
            );
        }
        // level order visits indices in increasing order
        debug_assert!(found.windows(2).all(|w| w[0] < w[1]));

        let k = found.len();
        for (slot, &at) in found.iter().enumerate() {
            if slot != at {
                self.items.swap(slot, at);
            }
        }
        // Elements displaced from the front now sit where equal ones were.
        // Sifting them bottom-up restores order below the group.
        for &at in found.iter().rev().take_while(|&&at| at >= k) {
            self.down(at);
        }
        k
    }

    /// Advance the first `k` elements, deepest slot first.
    ///
    /// `step` moves one element to its next key and reports `Ok(true)` if
    /// it is still live or `Ok(false)` if it should leave the heap. The
    /// first error stops the walk and is returned.
    pub fn advance_first_k<E, F>(&mut self, k: usize, mut step: F) -> Result<(), E>
    where
        F: FnMut(&mut T, &O) -> Result<bool, E>,
    {
        assert!(k <= self.items.len(), "group of {} in a heap of {}", k, self.items.len());
        for i in (0..k).rev() {
            if step(&mut self.items[i], &self.order)? {
                self.down(i);
            } else {
                self.remove(i);
            }
        }
        Ok(())
    }

    /// Whether no element is strictly less than its parent.
    pub fn is_heap(&self) -> bool {
        (1..self.items.len()).all(|i| !self.less(i, (i - 1) / 2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type KeyOrder = fn(&(u32, char), &(u32, char)) -> Ordering;

    fn by_key(a: &(u32, char), b: &(u32, char)) -> Ordering {
        a.0.cmp(&b.0)
    }

    fn heap_of(keys: &[u32]) -> Heap<(u32, char), KeyOrder> {
        let mut heap = Heap::with_capacity(64, by_key as KeyOrder);
        for (i, &k) in keys.iter().enumerate() {
            heap.push((k, (b'a' + i as u8) as char));
        }
        heap
    }

    #[test]
    fn test_push_keeps_min_at_root() {
        let heap = heap_of(&[5, 3, 8, 1, 9, 2]);
        assert!(heap.is_heap());
        assert_eq!(heap.peek().unwrap().0, 1);
    }

    #[test]
    fn test_remove_root_repeatedly_sorts() {
        let mut heap = heap_of(&[5, 3, 8, 1, 9, 2, 7, 7]);
        let mut drained = Vec::new();
        while !heap.is_empty() {
            drained.push(heap.remove(0).0);
            assert!(heap.is_heap());
        }
        assert_eq!(drained, vec![1, 2, 3, 5, 7, 7, 8, 9]);
    }

    #[test]
    fn test_remove_middle_restores_order() {
        let mut heap = heap_of(&[1, 10, 2, 11, 12, 3, 4]);
        heap.remove(1);
        assert!(heap.is_heap());
        assert_eq!(heap.len(), 6);
    }

    #[test]
    fn test_down_reports_movement() {
        let mut heap = heap_of(&[1, 2, 3]);
        heap.items[0].0 = 10;
        assert!(heap.down(0));
        assert!(heap.is_heap());
        assert!(!heap.down(0));
    }

    #[test]
    fn test_down_prefers_left_on_tie() {
        let mut heap = heap_of(&[1, 2, 2]);
        heap.items[0].0 = 5;
        heap.down(0);
        assert_eq!(heap.items[0].1, 'b');
    }

    #[test]
    fn test_group_single() {
        let mut heap = heap_of(&[1, 2, 3]);
        assert_eq!(heap.group_equal_to_root(), 1);
        let mut heap = heap_of(&[]);
        assert_eq!(heap.group_equal_to_root(), 0);
    }

    #[test]
    fn test_group_finds_deep_equal_keys() {
        // root 1; its right subtree holds more ones below a one
        let mut heap = heap_of(&[1]);
        heap.items = vec![(1, 'a'), (5, 'b'), (1, 'c'), (6, 'd'), (7, 'e'), (1, 'f'), (2, 'g')];
        assert!(heap.is_heap());
        let k = heap.group_equal_to_root();
        assert_eq!(k, 3);
        assert!(heap.as_slice()[..k].iter().all(|e| e.0 == 1));
        assert!(heap.as_slice()[k..].iter().all(|e| e.0 > 1));
    }

    #[test]
    fn test_group_repairs_displaced_elements() {
        // Compaction swaps 5 down under the 1 at index 2, whose children
        // are 2 and 3. The probe has to re-sift it.
        let mut heap = heap_of(&[1]);
        heap.items = vec![(1, 'a'), (5, 'b'), (1, 'c'), (6, 'd'), (7, 'e'), (2, 'f'), (3, 'g')];
        assert!(heap.is_heap());
        let k = heap.group_equal_to_root();
        assert_eq!(k, 2);
        assert!(heap.as_slice()[..k].iter().all(|e| e.0 == 1));

        // consume the group: the rest must come out sorted
        heap.advance_first_k(k, |_, _| Ok::<bool, ()>(false)).unwrap();
        assert!(heap.is_heap());
        let mut drained = Vec::new();
        while !heap.is_empty() {
            drained.push(heap.remove(0).0);
        }
        assert_eq!(drained, vec![2, 3, 5, 6, 7]);
    }

    #[test]
    fn test_advance_first_k_resifts_and_removes() {
        let mut heap = heap_of(&[1, 1, 1, 4, 5]);
        let k = heap.group_equal_to_root();
        assert_eq!(k, 3);
        let mut calls = 0;
        heap.advance_first_k(k, |item, _| {
            calls += 1;
            if item.1 == 'b' {
                return Ok::<bool, ()>(false);
            }
            item.0 += 10;
            Ok(true)
        })
        .unwrap();
        assert_eq!(calls, 3);
        assert_eq!(heap.len(), 4);
        assert!(heap.is_heap());
        assert_eq!(heap.peek().unwrap().0, 4);
    }

    #[test]
    fn test_advance_first_k_stops_on_error() {
        let mut heap = heap_of(&[1, 1, 2]);
        let k = heap.group_equal_to_root();
        let err = heap.advance_first_k(k, |_, _| Err::<bool, &str>("boom"));
        assert_eq!(err, Err("boom"));
    }

    #[test]
    fn test_huge_limit_allocates_lazily() {
        let mut heap = Heap::with_capacity(usize::MAX, by_key as KeyOrder);
        heap.reserve(3);
        for (i, k) in [3, 1, 1].into_iter().enumerate() {
            heap.push((k, (b'a' + i as u8) as char));
        }
        assert_eq!(heap.capacity(), usize::MAX);
        assert_eq!(heap.group_equal_to_root(), 2);
        assert!(heap.is_heap());
    }

    #[test]
    #[should_panic(expected = "capacity")]
    fn test_push_beyond_capacity_panics() {
        let mut heap = Heap::with_capacity(2, |a: &u32, b: &u32| a.cmp(b));
        heap.push(1);
        heap.push(2);
        heap.push(3);
    }
}
