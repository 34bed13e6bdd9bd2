//! Binary-heap priority queue over a dense `Vec`.
//!
//! Element `i` has children `2i + 1` and `2i + 2`. Every parent compares
//! `<=` both children under the queue's comparator, so the minimum sits at
//! index 0. Use [`Reverse`](crate::compare::Reverse) for a max-heap.
//!
//! # Ordering of equal elements
//!
//! Dequeue order among elements that compare equal is **not** specified and
//! is not stable: two equal-priority items may come out in either order.
//! Fold a sequence number into the priority if FIFO tie-breaking matters.
//!
//! # Example
//!
//! ```
//! use cairn_collections::PriorityQueue;
//!
//! let mut pq = PriorityQueue::new();
//! for p in [5, 1, 4, 2, 3] {
//!     pq.enqueue(p);
//! }
//!
//! assert_eq!(pq.peek(), Ok(&1));
//! assert_eq!(pq.dequeue(), Ok(1));
//! assert_eq!(pq.dequeue(), Ok(2));
//! assert_eq!(pq.len(), 3);
//! ```

use core::fmt;
use core::mem;

use crate::compare::{Comparator, Natural};
use crate::error::Empty;

/// A binary min-heap ordered by a [`Comparator`].
#[derive(Clone)]
pub struct PriorityQueue<T, C = Natural> {
    /// Heap-ordered elements.
    data: Vec<T>,
    cmp: C,
}

impl<T: Ord> PriorityQueue<T> {
    /// Creates an empty min-heap ordered by `T`'s `Ord`.
    #[inline]
    pub const fn new() -> Self {
        Self {
            data: Vec::new(),
            cmp: Natural,
        }
    }

    /// Creates an empty min-heap with pre-allocated capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparator(capacity, Natural)
    }
}

impl<T, C> PriorityQueue<T, C> {
    /// Creates an empty heap ordered by `cmp`.
    #[inline]
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            data: Vec::new(),
            cmp,
        }
    }

    /// Creates an empty heap ordered by `cmp` with pre-allocated capacity.
    #[inline]
    pub fn with_capacity_and_comparator(capacity: usize, cmp: C) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            cmp,
        }
    }

    /// Returns the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the heap is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the capacity of the backing array.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Returns the minimum element.
    ///
    /// # Errors
    ///
    /// Returns [`Empty`] if the heap has no elements.
    #[inline]
    pub fn peek(&self) -> Result<&T, Empty> {
        self.try_peek().ok_or(Empty)
    }

    /// Returns the minimum element, or `None` if the heap is empty.
    #[inline]
    pub fn try_peek(&self) -> Option<&T> {
        self.data.first()
    }

    /// Iterates over the elements in heap (not sorted) order.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        #[cfg(feature = "tracing")]
        tracing::trace!(dropped = self.data.len(), "priority queue cleared");

        self.data.clear();
    }

    /// Consumes the heap, returning the backing array in heap order.
    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T, C: Comparator<T>> PriorityQueue<T, C> {
    /// Builds a heap from `data` in O(n) by sifting down every parent,
    /// last parent first.
    pub fn from_vec(data: Vec<T>, cmp: C) -> Self {
        let mut heap = Self { data, cmp };
        for pos in (0..heap.data.len() / 2).rev() {
            heap.sift_down(pos);
        }
        heap
    }

    /// Adds an element. O(log n).
    pub fn enqueue(&mut self, item: T) {
        self.data.push(item);
        let last = self.data.len() - 1;
        self.sift_up(last);
    }

    /// Removes and returns the minimum element. O(log n).
    ///
    /// # Errors
    ///
    /// Returns [`Empty`] if the heap has no elements.
    #[inline]
    pub fn dequeue(&mut self) -> Result<T, Empty> {
        self.try_dequeue().ok_or(Empty)
    }

    /// Removes and returns the minimum element, or `None` if empty.
    pub fn try_dequeue(&mut self) -> Option<T> {
        let last = self.data.pop()?;
        if self.data.is_empty() {
            return Some(last);
        }
        let top = mem::replace(&mut self.data[0], last);
        self.sift_down(0);
        Some(top)
    }

    /// Removes elements in priority order while the predicate holds.
    ///
    /// The predicate sees the current minimum; draining stops at the first
    /// element it rejects, which stays in the heap.
    ///
    /// # Example
    ///
    /// ```
    /// use cairn_collections::PriorityQueue;
    ///
    /// // Timers keyed by deadline tick.
    /// let mut timers: PriorityQueue<u64> = [40, 10, 70, 25].into_iter().collect();
    ///
    /// let fired: Vec<_> = timers.drain_while(|&deadline| deadline <= 30).collect();
    /// assert_eq!(fired, [10, 25]);
    /// assert_eq!(timers.try_peek(), Some(&40));
    /// ```
    #[inline]
    pub fn drain_while<F>(&mut self, pred: F) -> DrainWhile<'_, T, C, F>
    where
        F: FnMut(&T) -> bool,
    {
        DrainWhile { heap: self, pred }
    }

    /// Consumes the heap, returning its elements in ascending order.
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut sorted = Vec::with_capacity(self.data.len());
        while let Some(item) = self.try_dequeue() {
            sorted.push(item);
        }
        sorted
    }

    /// Moves the element at `pos` toward the root while it compares before
    /// its parent.
    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if self.cmp.compare(&self.data[pos], &self.data[parent]).is_lt() {
                self.data.swap(pos, parent);
                pos = parent;
            } else {
                break;
            }
        }
    }

    /// Moves the element at `pos` toward the leaves, always swapping with
    /// the child that compares first, until neither child compares before it.
    fn sift_down(&mut self, mut pos: usize) {
        let len = self.data.len();
        loop {
            let left = 2 * pos + 1;
            if left >= len {
                break;
            }
            let right = left + 1;

            let first = if right < len
                && self.cmp.compare(&self.data[right], &self.data[left]).is_lt()
            {
                right
            } else {
                left
            };

            if self.cmp.compare(&self.data[first], &self.data[pos]).is_lt() {
                self.data.swap(pos, first);
                pos = first;
            } else {
                break;
            }
        }
    }
}

impl<T: Ord> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug, C> fmt::Debug for PriorityQueue<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.data.iter()).finish()
    }
}

impl<T, C: Comparator<T>> Extend<T> for PriorityQueue<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.data.reserve(iter.size_hint().0);
        for item in iter {
            self.enqueue(item);
        }
    }
}

impl<T: Ord> FromIterator<T> for PriorityQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect(), Natural)
    }
}

impl<'a, T, C> IntoIterator for &'a PriorityQueue<T, C> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

/// An iterator that dequeues elements while a predicate holds.
///
/// Created by [`PriorityQueue::drain_while`].
pub struct DrainWhile<'a, T, C, F>
where
    C: Comparator<T>,
    F: FnMut(&T) -> bool,
{
    heap: &'a mut PriorityQueue<T, C>,
    pred: F,
}

impl<T, C, F> Iterator for DrainWhile<'_, T, C, F>
where
    C: Comparator<T>,
    F: FnMut(&T) -> bool,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let min = self.heap.try_peek()?;
        if (self.pred)(min) {
            self.heap.try_dequeue()
        } else {
            None
        }
    }
}
