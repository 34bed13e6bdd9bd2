//! Fixed-capacity ring buffer that overwrites its oldest element when full.
//!
//! This variant never grows and never rejects an enqueue. Once `capacity`
//! elements are held, each new element evicts the oldest one, which is
//! handed back to the caller.
//!
//! # Use Cases
//!
//! - Recent-event history (chat log, combat log, damage numbers)
//! - Rolling samples for frame-time or ping graphs
//! - Input buffers where only the last few inputs matter
//!
//! # Example
//!
//! ```
//! use cairn_queue::RingBuffer;
//!
//! let mut frames = RingBuffer::new(3).unwrap();
//!
//! assert!(frames.enqueue(16).is_none());
//! assert!(frames.enqueue(17).is_none());
//! assert!(frames.enqueue(15).is_none());
//!
//! // Full - the oldest sample is evicted
//! assert_eq!(frames.enqueue(33), Some(16));
//!
//! assert_eq!(frames.to_vec(), [17, 15, 33]);
//! ```

use core::fmt;
use core::iter::FusedIterator;

use crate::error::{Empty, InvalidCapacity};

/// A fixed-capacity FIFO buffer that overwrites the oldest element when
/// full.
#[derive(Clone)]
pub struct RingBuffer<T> {
    buf: Box<[Option<T>]>,
    head: usize,
    len: usize,
}

impl<T> RingBuffer<T> {
    /// Creates an empty ring buffer holding at most `capacity` elements.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCapacity`] if `capacity` is 0.
    pub fn new(capacity: usize) -> Result<Self, InvalidCapacity> {
        if capacity == 0 {
            return Err(InvalidCapacity);
        }
        Ok(Self {
            buf: (0..capacity).map(|_| None).collect(),
            head: 0,
            len: 0,
        })
    }

    /// Creates an empty ring buffer holding at most `capacity` elements.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn with_capacity(capacity: usize) -> Self {
        match Self::new(capacity) {
            Ok(ring) => ring,
            Err(e) => panic!("{e}"),
        }
    }

    /// Returns the fixed capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Returns the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if the next enqueue will evict an element.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.buf.len()
    }

    #[inline]
    fn slot(&self, offset: usize) -> usize {
        (self.head + offset) % self.buf.len()
    }

    /// Appends an element at the tail.
    ///
    /// Returns `None` if there was room, or `Some(oldest)` if the buffer was
    /// full and the oldest element was evicted to make room.
    pub fn enqueue(&mut self, item: T) -> Option<T> {
        let evicted = if self.is_full() {
            let oldest = self.buf[self.head].take();
            self.head = (self.head + 1) % self.buf.len();

            #[cfg(feature = "tracing")]
            tracing::trace!(capacity = self.buf.len(), "ring buffer evicted oldest element");

            oldest
        } else {
            self.len += 1;
            None
        };

        let tail = self.slot(self.len - 1);
        self.buf[tail] = Some(item);
        evicted
    }

    /// Removes and returns the oldest element.
    ///
    /// # Errors
    ///
    /// Returns [`Empty`] if the buffer has no elements.
    #[inline]
    pub fn dequeue(&mut self) -> Result<T, Empty> {
        self.try_dequeue().ok_or(Empty)
    }

    /// Removes and returns the oldest element, or `None` if empty.
    pub fn try_dequeue(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let item = self.buf[self.head].take();
        self.head = (self.head + 1) % self.buf.len();
        self.len -= 1;
        item
    }

    /// Returns the oldest element.
    ///
    /// # Errors
    ///
    /// Returns [`Empty`] if the buffer has no elements.
    #[inline]
    pub fn peek(&self) -> Result<&T, Empty> {
        self.try_peek().ok_or(Empty)
    }

    /// Returns the oldest element, or `None` if empty.
    #[inline]
    pub fn try_peek(&self) -> Option<&T> {
        self.get(0)
    }

    /// Returns the newest element, or `None` if empty.
    #[inline]
    pub fn try_peek_back(&self) -> Option<&T> {
        self.len.checked_sub(1).and_then(|last| self.get(last))
    }

    /// Returns the element `offset` places behind the oldest.
    #[inline]
    pub fn get(&self, offset: usize) -> Option<&T> {
        if offset >= self.len {
            return None;
        }
        self.buf[self.slot(offset)].as_ref()
    }

    /// Copies the elements, oldest first, into a new `Vec`.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Drops every element. Capacity is unchanged.
    pub fn clear(&mut self) {
        for offset in 0..self.len {
            let slot = self.slot(offset);
            self.buf[slot] = None;
        }
        self.head = 0;
        self.len = 0;
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
}

impl<T: fmt::Debug> fmt::Debug for RingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("capacity", &self.buf.len())
            .field("items", &DebugItems(self))
            .finish()
    }
}

struct DebugItems<'a, T>(&'a RingBuffer<T>);

impl<T: fmt::Debug> fmt::Debug for DebugItems<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl<T> Extend<T> for RingBuffer<T> {
    /// Enqueues every item, discarding anything evicted along the way.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.enqueue(item);
        }
    }
}

impl<'a, T> IntoIterator for &'a RingBuffer<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A borrowing iterator over the ring buffer, oldest first.
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
