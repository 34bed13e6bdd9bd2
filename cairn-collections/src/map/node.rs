//! Arena node for the red-black tree.

use crate::Index;

/// Node color. Absent children count as black.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// A tree node living in the map's arena.
///
/// `parent` is a plain back-reference; ownership of every node belongs to
/// the arena, never to another node.
#[derive(Debug, Clone)]
pub(crate) struct Node<K, V, Idx: Index> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) parent: Idx,
    pub(crate) left: Idx,
    pub(crate) right: Idx,
    pub(crate) color: Color,
}

impl<K, V, Idx: Index> Node<K, V, Idx> {
    /// Creates a detached red leaf hanging off `parent`.
    #[inline]
    pub(crate) fn leaf(key: K, value: V, parent: Idx) -> Self {
        Self {
            key,
            value,
            parent,
            left: Idx::NONE,
            right: Idx::NONE,
            color: Color::Red,
        }
    }
}
