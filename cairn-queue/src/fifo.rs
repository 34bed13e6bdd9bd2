//! Growable FIFO queue over a circular array.
//!
//! Live elements occupy slots `(head + i) % capacity` for `i` in `0..len`.
//! When the array is full the queue grows to
//! `max(capacity * 2, capacity + 4)` and re-lays its contents starting at
//! slot 0, so growth makes progress even from capacity 0 or 1.
//!
//! ```text
//!  capacity 8, head 6, len 4:
//!
//!  slot:  0   1   2   3   4   5   6   7
//!        [ c | d | _ | _ | _ | _ | a | b ]
//!                  ^tail           ^head
//! ```
//!
//! # Version guard
//!
//! Every mutation bumps a version counter. A [`Cursor`] is a detached
//! position that does not borrow the queue; it captures the version when
//! created and every [`Cursor::step`] fails with
//! [`ConcurrentModification`] once the queue has changed underneath it.
//! The borrowing [`Iter`] needs no such check: the borrow checker already
//! forbids mutation while it is alive.
//!
//! # Example
//!
//! ```
//! use cairn_queue::FifoQueue;
//!
//! let mut events = FifoQueue::with_capacity(4);
//! events.enqueue("login");
//! events.enqueue("move");
//! events.enqueue("attack");
//!
//! assert_eq!(events.peek(), Ok(&"login"));
//! assert_eq!(events.dequeue(), Ok("login"));
//! assert_eq!(events.len(), 2);
//!
//! let mut cursor = events.cursor();
//! assert_eq!(cursor.step(&events), Ok(Some(&"move")));
//!
//! events.enqueue("loot");
//! assert!(cursor.step(&events).is_err());
//! ```

use core::fmt;
use core::iter::FusedIterator;
use core::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{ConcurrentModification, Empty};

/// Minimum number of slots added by a single growth step.
const MIN_GROW: usize = 4;

/// Source of per-queue identities checked by [`Cursor::step`].
static NEXT_QUEUE_ID: AtomicU64 = AtomicU64::new(0);

#[inline]
fn next_queue_id() -> u64 {
    NEXT_QUEUE_ID.fetch_add(1, Ordering::Relaxed)
}

/// A growable first-in first-out queue.
pub struct FifoQueue<T> {
    /// Circular slot array. `None` marks a free slot.
    buf: Box<[Option<T>]>,
    /// Slot of the oldest element.
    head: usize,
    /// Number of live elements.
    len: usize,
    /// Bumped on every mutation.
    version: u64,
    /// Process-unique identity, fresh for every clone.
    id: u64,
}

fn empty_slots<T>(capacity: usize) -> Box<[Option<T>]> {
    (0..capacity).map(|_| None).collect()
}

impl<T> FifoQueue<T> {
    /// Creates an empty queue without allocating.
    #[inline]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty queue with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: empty_slots(capacity),
            head: 0,
            len: 0,
            version: 0,
            id: next_queue_id(),
        }
    }

    /// Returns the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the queue is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of slots in the backing array.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Returns the current mutation version.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    #[inline]
    fn slot(&self, offset: usize) -> usize {
        (self.head + offset) % self.buf.len()
    }

    #[inline]
    fn bump(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    /// Appends an element at the tail, growing the array if it is full.
    pub fn enqueue(&mut self, item: T) {
        if self.len == self.buf.len() {
            let capacity = self.buf.len();
            let grown = capacity
                .checked_mul(2)
                .expect("capacity overflow")
                .max(capacity + MIN_GROW);
            self.set_capacity(grown);
        }

        let tail = self.slot(self.len);
        self.buf[tail] = Some(item);
        self.len += 1;
        self.bump();
    }

    /// Removes and returns the oldest element.
    ///
    /// # Errors
    ///
    /// Returns [`Empty`] if the queue has no elements.
    #[inline]
    pub fn dequeue(&mut self) -> Result<T, Empty> {
        self.try_dequeue().ok_or(Empty)
    }

    /// Removes and returns the oldest element, or `None` if empty.
    ///
    /// The vacated slot is cleared so the queue no longer holds the value.
    pub fn try_dequeue(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let item = self.buf[self.head].take();
        self.head = (self.head + 1) % self.buf.len();
        self.len -= 1;
        self.bump();
        item
    }

    /// Returns the oldest element.
    ///
    /// # Errors
    ///
    /// Returns [`Empty`] if the queue has no elements.
    #[inline]
    pub fn peek(&self) -> Result<&T, Empty> {
        self.try_peek().ok_or(Empty)
    }

    /// Returns the oldest element, or `None` if empty.
    #[inline]
    pub fn try_peek(&self) -> Option<&T> {
        self.get(0)
    }

    /// Returns the element `offset` places behind the head.
    #[inline]
    pub fn get(&self, offset: usize) -> Option<&T> {
        if offset >= self.len {
            return None;
        }
        self.buf[self.slot(offset)].as_ref()
    }

    /// Returns `true` if any element equals `item`.
    pub fn contains(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter().any(|x| x == item)
    }

    /// Copies the elements, oldest first, into a new `Vec`.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Shrinks the array to exactly `len` slots if less than 90% of it is
    /// in use. The contents are re-laid starting at slot 0.
    pub fn trim_excess(&mut self) {
        let capacity = self.buf.len();
        let threshold = capacity / 10 * 9 + capacity % 10 * 9 / 10;
        if self.len < threshold {
            self.set_capacity(self.len);
        }
    }

    /// Drops every element. The array keeps its capacity.
    pub fn clear(&mut self) {
        for offset in 0..self.len {
            let slot = self.slot(offset);
            self.buf[slot] = None;
        }
        self.head = 0;
        self.len = 0;
        self.bump();
    }

    /// Iterates over the elements, oldest first.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            buf: &self.buf,
            head: self.head,
            front: 0,
            back: self.len,
        }
    }

    /// Creates a detached, version-guarded cursor at the head.
    #[inline]
    pub fn cursor(&self) -> Cursor<T> {
        Cursor {
            queue_id: self.id,
            version: self.version,
            offset: 0,
            _marker: PhantomData,
        }
    }

    /// Moves the live elements into a fresh array of `capacity` slots,
    /// head first at slot 0.
    fn set_capacity(&mut self, capacity: usize) {
        debug_assert!(capacity >= self.len);

        #[cfg(feature = "tracing")]
        tracing::trace!(
            from = self.buf.len(),
            to = capacity,
            len = self.len,
            "fifo queue resized"
        );

        let mut fresh = empty_slots(capacity);
        for (offset, dst) in fresh.iter_mut().enumerate().take(self.len) {
            let src = self.slot(offset);
            *dst = self.buf[src].take();
        }
        self.buf = fresh;
        self.head = 0;
        self.bump();
    }
}

impl<T: Clone> Clone for FifoQueue<T> {
    /// The clone is a distinct queue: cursors of the original do not
    /// step over it.
    fn clone(&self) -> Self {
        Self {
            buf: self.buf.clone(),
            head: self.head,
            len: self.len,
            version: self.version,
            id: next_queue_id(),
        }
    }
}

impl<T> Default for FifoQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for FifoQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Queues are equal when they hold equal elements in the same order,
/// regardless of capacity, head position or version.
impl<T: PartialEq> PartialEq for FifoQueue<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for FifoQueue<T> {}

impl<T> Extend<T> for FifoQueue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.enqueue(item);
        }
    }
}

impl<T> FromIterator<T> for FifoQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut queue = Self::with_capacity(iter.size_hint().0);
        queue.extend(iter);
        queue
    }
}

impl<'a, T> IntoIterator for &'a FifoQueue<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> IntoIterator for FifoQueue<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { queue: self }
    }
}

// ============================================================================
// Iterators
// ============================================================================

/// A borrowing iterator over the queue, oldest first.
#[derive(Clone)]
pub struct Iter<'a, T> {
    buf: &'a [Option<T>],
    head: usize,
    front: usize,
    back: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let slot = (self.head + self.front) % self.buf.len();
        self.front += 1;
        self.buf[slot].as_ref()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.back - self.front;
        (n, Some(n))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        let slot = (self.head + self.back) % self.buf.len();
        self.buf[slot].as_ref()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

/// An owning iterator that dequeues elements, oldest first.
pub struct IntoIter<T> {
    queue: FifoQueue<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.queue.try_dequeue()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.queue.len, Some(self.queue.len))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}

/// A detached enumerator over a [`FifoQueue`] that detects mutation.
///
/// Unlike [`Iter`], a cursor holds no borrow, so the queue may be mutated
/// while the cursor exists. The first [`step`](Self::step) after any
/// mutation fails, and keeps failing: a stale cursor cannot be restarted.
///
/// A cursor remembers which queue created it. Stepping it against any other
/// queue, a clone included, panics.
///
/// ```
/// use cairn_queue::FifoQueue;
///
/// let mut queue: FifoQueue<u32> = (1..=3).collect();
/// let mut cursor = queue.cursor();
///
/// assert_eq!(cursor.step(&queue), Ok(Some(&1)));
/// assert_eq!(cursor.step(&queue), Ok(Some(&2)));
///
/// queue.enqueue(4);
/// let err = cursor.step(&queue).unwrap_err();
/// assert_ne!(err.expected, err.found);
/// assert_eq!(err.found, queue.version());
/// ```
pub struct Cursor<T> {
    queue_id: u64,
    version: u64,
    offset: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Cursor<T> {
    /// Yields the next element, `Ok(None)` once all elements were seen.
    ///
    /// # Errors
    ///
    /// Returns [`ConcurrentModification`] if `queue` was mutated after this
    /// cursor was created.
    ///
    /// # Panics
    ///
    /// Panics if `queue` is not the queue this cursor was created from.
    pub fn step<'a>(
        &mut self,
        queue: &'a FifoQueue<T>,
    ) -> Result<Option<&'a T>, ConcurrentModification> {
        assert_eq!(
            self.queue_id, queue.id,
            "cursor stepped against a different queue"
        );
        if queue.version != self.version {
            return Err(ConcurrentModification {
                expected: self.version,
                found: queue.version,
            });
        }
        let item = queue.get(self.offset);
        if item.is_some() {
            self.offset += 1;
        }
        Ok(item)
    }

    /// Returns `true` if `queue` was mutated after this cursor was created,
    /// or is not the queue that created it.
    #[inline]
    pub fn is_stale(&self, queue: &FifoQueue<T>) -> bool {
        queue.id != self.queue_id || queue.version != self.version
    }

    /// Returns the number of elements already yielded.
    #[inline]
    pub fn position(&self) -> usize {
        self.offset
    }
}

impl<T> Clone for Cursor<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<T> {}

impl<T> fmt::Debug for Cursor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("queue_id", &self.queue_id)
            .field("version", &self.version)
            .field("offset", &self.offset)
            .finish()
    }
}
