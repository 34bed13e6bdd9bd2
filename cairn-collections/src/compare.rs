//! Three-way comparators used to order map keys and heap elements.
//!
//! Containers are generic over a [`Comparator`] rather than requiring `Ord`
//! directly, so the same element type can be ordered several ways (e.g. a
//! min-heap and a max-heap of the same scores).
//!
//! ```
//! use cairn_collections::compare::{self, Comparator, Natural, Reverse};
//! use std::cmp::Ordering;
//!
//! assert_eq!(Natural.compare(&1, &2), Ordering::Less);
//! assert_eq!(Reverse::<Natural>::default().compare(&1, &2), Ordering::Greater);
//!
//! let by_len = compare::by(|a: &&str, b: &&str| a.len().cmp(&b.len()));
//! assert_eq!(by_len.compare(&"ogre", &"imp"), Ordering::Greater);
//! ```

use core::cmp::Ordering;
use core::fmt;

/// A consistent three-way comparison over `T`.
///
/// Implementations must be consistent: `compare(a, b)` must always return
/// the same answer for the same pair, and `Less`/`Greater` must be mirror
/// images of each other. Containers never assume anything else.
pub trait Comparator<T: ?Sized> {
    /// Compares `a` with `b`.
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// Orders by the type's own [`Ord`] implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Natural;

impl<T: Ord + ?Sized> Comparator<T> for Natural {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// Inverts another comparator.
///
/// `Reverse<Natural>` turns the min-heap [`PriorityQueue`](crate::PriorityQueue)
/// into a max-heap and makes a map iterate in descending key order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Reverse<C = Natural>(pub C);

impl<T: ?Sized, C: Comparator<T>> Comparator<T> for Reverse<C> {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.0.compare(b, a)
    }
}

/// Adapts a closure into a [`Comparator`].
///
/// Built with [`by`].
#[derive(Clone, Copy)]
pub struct FnComparator<F>(F);

impl<T: ?Sized, F> Comparator<T> for FnComparator<F>
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        (self.0)(a, b)
    }
}

impl<F> fmt::Debug for FnComparator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnComparator")
    }
}

/// Wraps a comparison closure.
///
/// The closure's argument types pin down `T`, so annotate them when the
/// compiler cannot infer it from the container.
#[inline]
pub fn by<T: ?Sized, F>(f: F) -> FnComparator<F>
where
    F: Fn(&T, &T) -> Ordering,
{
    FnComparator(f)
}
