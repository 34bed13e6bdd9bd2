//! Sentinel-based index trait for arena node links.
//!
//! Tree nodes refer to each other by position in the node arena. A reserved
//! sentinel value (e.g. `u32::MAX`) stands in for "no node", which keeps
//! every link the size of the index type instead of `Option<Idx>`.

/// A copyable arena index with a sentinel "none" value.
///
/// The sentinel itself is never a valid position, so a map using index type
/// `Idx` holds at most `Idx::NONE.as_usize()` entries.
///
/// # Example
///
/// ```
/// use cairn_collections::Index;
///
/// let idx: u32 = 5;
/// let none: u32 = u32::NONE;
///
/// assert!(idx.is_some());
/// assert!(none.is_none());
/// assert_eq!(u16::max_entries(), u16::MAX as usize);
/// ```
pub trait Index: Copy + Eq + core::fmt::Debug {
    /// Sentinel value representing "no node".
    const NONE: Self;

    /// Returns `true` if this is the sentinel value.
    #[inline]
    fn is_none(self) -> bool {
        self == Self::NONE
    }

    /// Returns `true` if this is not the sentinel value.
    #[inline]
    fn is_some(self) -> bool {
        !self.is_none()
    }

    /// Returns the index as an arena position.
    fn as_usize(self) -> usize;

    /// Creates an index from an arena position.
    ///
    /// `val` must be below [`max_entries`](Self::max_entries).
    fn from_usize(val: usize) -> Self;

    /// Largest number of entries addressable without touching the sentinel.
    #[inline]
    fn max_entries() -> usize {
        Self::NONE.as_usize()
    }
}

macro_rules! impl_index_for_unsigned {
    ($($ty:ty),*) => {
        $(
            impl Index for $ty {
                const NONE: Self = <$ty>::MAX;

                #[inline]
                fn as_usize(self) -> usize {
                    self as usize
                }

                #[inline]
                fn from_usize(val: usize) -> Self {
                    debug_assert!(val < <$ty>::MAX as usize, "index collides with sentinel");
                    val as Self
                }
            }
        )*
    };
}

impl_index_for_unsigned!(u8, u16, u32, usize);
