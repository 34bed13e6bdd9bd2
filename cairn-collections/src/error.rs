//! Error types for the map and priority queue.

use core::fmt;

/// The container holds no elements.
///
/// Returned by the throwing-style accessors such as
/// [`PriorityQueue::dequeue`](crate::PriorityQueue::dequeue). Use the
/// `try_*` variants to get an `Option` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Empty;

impl fmt::Display for Empty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("collection is empty")
    }
}

impl std::error::Error for Empty {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(Empty.to_string(), "collection is empty");
    }

    #[test]
    fn is_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(Empty);
        assert_eq!(err.to_string(), "collection is empty");
    }
}
