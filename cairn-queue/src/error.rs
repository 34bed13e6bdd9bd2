//! Error types for the FIFO queue and ring buffer.

use core::fmt;

/// The queue holds no elements.
///
/// Returned by `dequeue` and `peek`. Use the `try_*` variants to get an
/// `Option` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Empty;

impl fmt::Display for Empty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("queue is empty")
    }
}

impl std::error::Error for Empty {}

/// A ring buffer was requested with zero capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InvalidCapacity;

impl fmt::Display for InvalidCapacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("capacity must be non-zero")
    }
}

impl std::error::Error for InvalidCapacity {}

/// The queue was mutated after a [`Cursor`](crate::fifo::Cursor) was created.
///
/// The cursor stays stale; create a new one to walk the current contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConcurrentModification {
    /// Queue version captured when the cursor was created.
    pub expected: u64,
    /// Queue version observed on this step.
    pub found: u64,
}

impl fmt::Display for ConcurrentModification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "queue modified during enumeration (version {} -> {})",
            self.expected, self.found
        )
    }
}

impl std::error::Error for ConcurrentModification {}
