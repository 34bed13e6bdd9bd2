//! Ordered map backed by a red-black tree in a node arena.
//!
//! Nodes live in a dense `Vec` and link to each other by [`Index`] instead of
//! pointers, so parent back-references never imply ownership. Removing a
//! node moves the last arena slot into the hole, keeping the arena compact.
//!
//! ```text
//!              arena: [ 5B | 3R | 8B | 1B | 4B ]
//!                        0    1    2    3    4
//!
//!                 5(0)
//!                /    \
//!             3(1)    8(2)
//!             /  \
//!          1(3)  4(4)
//! ```
//!
//! # Example
//!
//! ```
//! use cairn_collections::RbMap;
//!
//! let mut spells: RbMap<u32, &str> = RbMap::new();
//! spells.insert(30, "fireball");
//! spells.insert(10, "spark");
//! spells.insert(20, "frost");
//!
//! // Existing keys are overwritten in place.
//! assert_eq!(spells.insert(20, "ice lance"), Some("frost"));
//! assert_eq!(spells.len(), 3);
//!
//! let keys: Vec<_> = spells.keys().copied().collect();
//! assert_eq!(keys, [10, 20, 30]);
//!
//! assert_eq!(spells.remove(&10), Some("spark"));
//! assert_eq!(spells.get(&10), None);
//! ```
//!
//! # Iteration and mutation
//!
//! Iterators borrow the map, so the map cannot be mutated while any
//! iterator is alive. The borrow checker rejects what a runtime
//! modification check would otherwise have to catch.

mod node;
mod tree;

use core::cmp::Ordering;
use core::fmt;
use core::iter::FusedIterator;
use core::mem;

use crate::compare::{Comparator, Natural};
use crate::Index;

use node::Node;

/// An ordered map implemented as a red-black tree.
///
/// # Type Parameters
///
/// - `K`: Key type, ordered by `C`
/// - `V`: Value type
/// - `C`: [`Comparator`] over `K`, defaults to [`Natural`]
/// - `Idx`: Arena index type, defaults to `u32`. The map holds at most
///   `Idx::max_entries()` entries.
///
/// All operations are O(log n) except iteration steps (amortized O(1)) and
/// `len`/`is_empty`/`clear`.
pub struct RbMap<K, V, C = Natural, Idx: Index = u32> {
    nodes: Vec<Node<K, V, Idx>>,
    root: Idx,
    cmp: C,
}

impl<K: Ord, V> RbMap<K, V> {
    /// Creates an empty map ordered by `K`'s `Ord`.
    #[inline]
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }

    /// Creates an empty map with room for `capacity` entries before the
    /// arena reallocates.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparator(capacity, Natural)
    }
}

impl<K, V, C> RbMap<K, V, C> {
    /// Creates an empty map ordered by `cmp`.
    #[inline]
    pub fn with_comparator(cmp: C) -> Self {
        Self::with_capacity_and_comparator(0, cmp)
    }
}

impl<K, V, C, Idx: Index> RbMap<K, V, C, Idx> {
    /// Creates an empty map ordered by `cmp` with pre-allocated arena space.
    ///
    /// This is also the constructor for maps with a non-default index type.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` exceeds the index type's maximum.
    pub fn with_capacity_and_comparator(capacity: usize, cmp: C) -> Self {
        assert!(
            capacity <= Idx::max_entries(),
            "capacity exceeds index type maximum"
        );
        Self {
            nodes: Vec::with_capacity(capacity),
            root: Idx::NONE,
            cmp,
        }
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the map holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the number of entries the arena holds without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Returns the comparator ordering this map.
    #[inline]
    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Removes every entry, dropping keys and values.
    ///
    /// The arena keeps its allocation.
    pub fn clear(&mut self) {
        #[cfg(feature = "tracing")]
        tracing::trace!(dropped = self.nodes.len(), "rb map cleared");

        self.nodes.clear();
        self.root = Idx::NONE;
    }

    /// Returns the entry with the smallest key.
    pub fn first(&self) -> Option<(&K, &V)> {
        let idx = self.min_from(self.root);
        if idx.is_none() {
            return None;
        }
        let node = self.node(idx);
        Some((&node.key, &node.value))
    }

    /// Returns the entry with the largest key.
    pub fn last(&self) -> Option<(&K, &V)> {
        let idx = self.max_from(self.root);
        if idx.is_none() {
            return None;
        }
        let node = self.node(idx);
        Some((&node.key, &node.value))
    }

    /// Removes and returns the entry with the smallest key.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let idx = self.min_from(self.root);
        if idx.is_none() {
            return None;
        }
        Some(self.remove_at(idx))
    }

    /// Removes and returns the entry with the largest key.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let idx = self.max_from(self.root);
        if idx.is_none() {
            return None;
        }
        Some(self.remove_at(idx))
    }

    /// Iterates over entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V, C, Idx> {
        Iter {
            map: self,
            front: self.min_from(self.root),
            back: self.max_from(self.root),
            remaining: self.nodes.len(),
        }
    }

    /// Iterates over entries in ascending key order with mutable values.
    ///
    /// Unlike [`iter`](Self::iter), which follows successor links lazily,
    /// this computes the in-order arena positions up front and hands out
    /// each node once. Creating the iterator allocates two `len`-sized
    /// buffers; use [`get_mut`](Self::get_mut) to update a single entry.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V, Idx> {
        let order = self.in_order_positions();
        let slots = self.nodes.iter_mut().map(Some).collect();
        IterMut {
            slots,
            order: order.into_iter(),
        }
    }

    /// Iterates over keys in ascending order.
    pub fn keys(&self) -> Keys<'_, K, V, C, Idx> {
        Keys { inner: self.iter() }
    }

    /// Iterates over values in ascending key order.
    pub fn values(&self) -> Values<'_, K, V, C, Idx> {
        Values { inner: self.iter() }
    }

    /// Iterates over mutable values in ascending key order.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V, Idx> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }
}

impl<K, V, C, Idx> RbMap<K, V, C, Idx>
where
    C: Comparator<K>,
    Idx: Index,
{
    /// Inserts `value` under `key`.
    ///
    /// A new key becomes a red leaf and the tree is rebalanced. An existing
    /// key keeps its node and only the value is replaced; the old value is
    /// returned and the map's length is unchanged.
    ///
    /// # Panics
    ///
    /// Panics if the map is already at `Idx::max_entries()` entries.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let mut parent = Idx::NONE;
        let mut cur = self.root;
        let mut went_left = false;

        while cur.is_some() {
            let node = self.node(cur);
            match self.cmp.compare(&key, &node.key) {
                Ordering::Less => {
                    parent = cur;
                    went_left = true;
                    cur = node.left;
                }
                Ordering::Greater => {
                    parent = cur;
                    went_left = false;
                    cur = node.right;
                }
                Ordering::Equal => {
                    return Some(mem::replace(&mut self.node_mut(cur).value, value));
                }
            }
        }

        let idx = self.alloc(Node::leaf(key, value, parent));
        if parent.is_none() {
            self.root = idx;
        } else if went_left {
            self.node_mut(parent).left = idx;
        } else {
            self.node_mut(parent).right = idx;
        }

        self.insert_fixup(idx);
        None
    }

    /// Removes `key`, returning its value if it was present.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes `key`, returning the stored key and value if present.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let idx = self.find(key);
        if idx.is_none() {
            return None;
        }
        Some(self.remove_at(idx))
    }

    /// Returns the value stored under `key`.
    #[inline]
    pub fn get(&self, key: &K) -> Option<&V> {
        let idx = self.find(key);
        if idx.is_none() {
            return None;
        }
        Some(&self.node(idx).value)
    }

    /// Returns the stored key and value for `key`.
    #[inline]
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        let idx = self.find(key);
        if idx.is_none() {
            return None;
        }
        let node = self.node(idx);
        Some((&node.key, &node.value))
    }

    /// Returns a mutable reference to the value stored under `key`.
    #[inline]
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let idx = self.find(key);
        if idx.is_none() {
            return None;
        }
        Some(&mut self.node_mut(idx).value)
    }

    /// Returns `true` if `key` is present.
    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Binary search descent; `NONE` when absent.
    fn find(&self, key: &K) -> Idx {
        let mut cur = self.root;
        while cur.is_some() {
            let node = self.node(cur);
            cur = match self.cmp.compare(key, &node.key) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return cur,
            };
        }
        Idx::NONE
    }
}

impl<K: Ord, V> Default for RbMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V: Clone, C: Clone, Idx: Index> Clone for RbMap<K, V, C, Idx> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            root: self.root,
            cmp: self.cmp.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C, Idx: Index> fmt::Debug for RbMap<K, V, C, Idx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C, Idx> Extend<(K, V)> for RbMap<K, V, C, Idx>
where
    C: Comparator<K>,
    Idx: Index,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for RbMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<'a, K, V, C, Idx: Index> IntoIterator for &'a RbMap<K, V, C, Idx> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, C, Idx>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, C, Idx: Index> IntoIterator for &'a mut RbMap<K, V, C, Idx> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V, Idx>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V, C, Idx: Index> IntoIterator for RbMap<K, V, C, Idx> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        let order = self.in_order_positions();
        let slots = self
            .nodes
            .into_iter()
            .map(|node| Some((node.key, node.value)))
            .collect();
        IntoIter {
            slots,
            order: order.into_iter(),
        }
    }
}

// ============================================================================
// Iterators
// ============================================================================

/// An iterator over entries in ascending key order.
pub struct Iter<'a, K, V, C, Idx: Index> {
    map: &'a RbMap<K, V, C, Idx>,
    front: Idx,
    back: Idx,
    remaining: usize,
}

impl<'a, K, V, C, Idx: Index> Iterator for Iter<'a, K, V, C, Idx> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let map = self.map;
        let node = map.node(self.front);
        self.front = map.successor(self.front);
        Some((&node.key, &node.value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, C, Idx: Index> DoubleEndedIterator for Iter<'_, K, V, C, Idx> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let map = self.map;
        let node = map.node(self.back);
        self.back = map.predecessor(self.back);
        Some((&node.key, &node.value))
    }
}

impl<K, V, C, Idx: Index> ExactSizeIterator for Iter<'_, K, V, C, Idx> {}
impl<K, V, C, Idx: Index> FusedIterator for Iter<'_, K, V, C, Idx> {}

impl<K, V, C, Idx: Index> Clone for Iter<'_, K, V, C, Idx> {
    fn clone(&self) -> Self {
        Self {
            map: self.map,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

/// A mutable iterator over entries in ascending key order.
///
/// Each arena slot is handed out at most once, in the order computed when
/// the iterator was created.
pub struct IterMut<'a, K, V, Idx: Index> {
    slots: Vec<Option<&'a mut Node<K, V, Idx>>>,
    order: std::vec::IntoIter<usize>,
}

impl<'a, K, V, Idx: Index> Iterator for IterMut<'a, K, V, Idx> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        let pos = self.order.next()?;
        let node = self.slots[pos].take()?;
        Some((&node.key, &mut node.value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<K, V, Idx: Index> DoubleEndedIterator for IterMut<'_, K, V, Idx> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let pos = self.order.next_back()?;
        let node = self.slots[pos].take()?;
        Some((&node.key, &mut node.value))
    }
}

impl<K, V, Idx: Index> ExactSizeIterator for IterMut<'_, K, V, Idx> {}
impl<K, V, Idx: Index> FusedIterator for IterMut<'_, K, V, Idx> {}

/// An owning iterator over entries in ascending key order.
pub struct IntoIter<K, V> {
    slots: Vec<Option<(K, V)>>,
    order: std::vec::IntoIter<usize>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let pos = self.order.next()?;
        self.slots[pos].take()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let pos = self.order.next_back()?;
        self.slots[pos].take()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
impl<K, V> FusedIterator for IntoIter<K, V> {}

/// An iterator over keys in ascending order.
pub struct Keys<'a, K, V, C, Idx: Index> {
    inner: Iter<'a, K, V, C, Idx>,
}

impl<'a, K, V, C, Idx: Index> Iterator for Keys<'a, K, V, C, Idx> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, C, Idx: Index> DoubleEndedIterator for Keys<'_, K, V, C, Idx> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V, C, Idx: Index> ExactSizeIterator for Keys<'_, K, V, C, Idx> {}

/// An iterator over values in ascending key order.
pub struct Values<'a, K, V, C, Idx: Index> {
    inner: Iter<'a, K, V, C, Idx>,
}

impl<'a, K, V, C, Idx: Index> Iterator for Values<'a, K, V, C, Idx> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, C, Idx: Index> DoubleEndedIterator for Values<'_, K, V, C, Idx> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V, C, Idx: Index> ExactSizeIterator for Values<'_, K, V, C, Idx> {}

/// A mutable iterator over values in ascending key order.
pub struct ValuesMut<'a, K, V, Idx: Index> {
    inner: IterMut<'a, K, V, Idx>,
}

impl<'a, K, V, Idx: Index> Iterator for ValuesMut<'a, K, V, Idx> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, Idx: Index> ExactSizeIterator for ValuesMut<'_, K, V, Idx> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::{self, Reverse};
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};
    use std::collections::BTreeMap;

    fn keys_of<C: Comparator<u32>>(map: &RbMap<u32, u32, C>) -> Vec<u32> {
        map.keys().copied().collect()
    }

    // ========================================================================
    // Basic operations
    // ========================================================================

    #[test]
    fn new_is_empty() {
        let map: RbMap<u32, u32> = RbMap::new();
        assert!(map.is_empty());
        assert_eq!(map.len(), 0);
        assert_eq!(map.first(), None);
        assert_eq!(map.last(), None);
        assert_eq!(map.iter().next(), None);
        assert_eq!(map.validate(), 0);
    }

    #[test]
    fn insert_single() {
        let mut map = RbMap::new();
        assert_eq!(map.insert(7, "seven"), None);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&7), Some(&"seven"));
        assert!(map.contains_key(&7));
        assert!(!map.contains_key(&8));
        assert_eq!(map.validate(), 1);
    }

    #[test]
    fn insert_yields_sorted_traversal() {
        let mut map = RbMap::new();
        for k in [5, 3, 8, 1, 4, 7, 9] {
            map.insert(k, k * 10);
            map.validate();
        }
        assert_eq!(keys_of(&map), [1, 3, 4, 5, 7, 8, 9]);
        assert_eq!(map.len(), 7);
    }

    #[test]
    fn insert_existing_replaces_value() {
        let mut map = RbMap::new();
        map.insert(1, 100);
        map.insert(2, 200);

        assert_eq!(map.insert(1, 111), Some(100));
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&1), Some(&111));
        map.validate();
    }

    #[test]
    fn get_mut_modifies_in_place() {
        let mut map = RbMap::new();
        map.insert("goblin", 3);
        *map.get_mut(&"goblin").unwrap() += 4;
        assert_eq!(map.get(&"goblin"), Some(&7));
        assert_eq!(map.get_mut(&"orc"), None);
    }

    #[test]
    fn get_key_value() {
        let mut map = RbMap::new();
        map.insert(4, 'd');
        assert_eq!(map.get_key_value(&4), Some((&4, &'d')));
        assert_eq!(map.get_key_value(&5), None);
    }

    // ========================================================================
    // Removal
    // ========================================================================

    #[test]
    fn remove_missing_returns_none() {
        let mut map: RbMap<u32, u32> = RbMap::new();
        assert_eq!(map.remove(&1), None);

        map.insert(1, 1);
        assert_eq!(map.remove(&2), None);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn remove_leaf_single_child_and_two_children() {
        let mut map = RbMap::new();
        for k in [50, 30, 70, 20, 40, 60, 80, 35] {
            map.insert(k, k);
        }
        map.validate();

        // Leaf
        assert_eq!(map.remove(&80), Some(80));
        map.validate();
        // Node with one child
        assert_eq!(map.remove(&40), Some(40));
        map.validate();
        // Node with two children
        assert_eq!(map.remove(&30), Some(30));
        map.validate();
        // Root
        assert_eq!(map.remove(&50), Some(50));
        map.validate();

        assert_eq!(keys_of(&map), [20, 35, 60, 70]);
    }

    #[test]
    fn remove_entry_returns_stored_key() {
        let mut map = RbMap::new();
        map.insert(3, "c");
        assert_eq!(map.remove_entry(&3), Some((3, "c")));
        assert!(map.is_empty());
        assert_eq!(map.validate(), 0);
    }

    #[test]
    fn remove_all_ascending_and_descending() {
        let mut map = RbMap::new();
        for k in 0..128u32 {
            map.insert(k, k);
        }
        for k in 0..64u32 {
            assert_eq!(map.remove(&k), Some(k));
            map.validate();
        }
        for k in (64..128u32).rev() {
            assert_eq!(map.remove(&k), Some(k));
            map.validate();
        }
        assert!(map.is_empty());
    }

    #[test]
    fn arena_compacts_on_remove() {
        let mut map = RbMap::new();
        for k in 0..10u32 {
            map.insert(k, k);
        }
        // Removing an early-inserted key moves the last arena node.
        map.remove(&0);
        map.remove(&5);
        assert_eq!(map.nodes.len(), 8);
        map.validate();
        for k in [1, 2, 3, 4, 6, 7, 8, 9] {
            assert_eq!(map.get(&k), Some(&k));
        }
    }

    // ========================================================================
    // First / last
    // ========================================================================

    #[test]
    fn first_last() {
        let mut map = RbMap::new();
        for k in [40, 10, 30, 20] {
            map.insert(k, ());
        }
        assert_eq!(map.first(), Some((&10, &())));
        assert_eq!(map.last(), Some((&40, &())));
    }

    #[test]
    fn pop_first_drains_ascending() {
        let mut map = RbMap::new();
        for k in [9, 2, 7, 4, 5] {
            map.insert(k, k);
        }
        let mut drained = Vec::new();
        while let Some((k, _)) = map.pop_first() {
            map.validate();
            drained.push(k);
        }
        assert_eq!(drained, [2, 4, 5, 7, 9]);
    }

    #[test]
    fn pop_last_drains_descending() {
        let mut map = RbMap::new();
        for k in [9, 2, 7, 4, 5] {
            map.insert(k, k);
        }
        let mut drained = Vec::new();
        while let Some((k, _)) = map.pop_last() {
            map.validate();
            drained.push(k);
        }
        assert_eq!(drained, [9, 7, 5, 4, 2]);
    }

    // ========================================================================
    // Iteration
    // ========================================================================

    #[test]
    fn iter_double_ended() {
        let map: RbMap<u32, u32> = (1..=5).map(|k| (k, k)).collect();
        let mut iter = map.iter();
        assert_eq!(iter.len(), 5);
        assert_eq!(iter.next().map(|(k, _)| *k), Some(1));
        assert_eq!(iter.next_back().map(|(k, _)| *k), Some(5));
        assert_eq!(iter.next().map(|(k, _)| *k), Some(2));
        assert_eq!(iter.next_back().map(|(k, _)| *k), Some(4));
        assert_eq!(iter.next().map(|(k, _)| *k), Some(3));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn iter_mut_follows_key_order_after_compaction() {
        let mut map: RbMap<u32, u32> = (0..50).map(|k| (k, 0)).collect();
        for k in (0..50).step_by(3) {
            map.remove(&k);
        }

        let mut iter = map.iter_mut();
        assert_eq!(iter.len(), 33);
        let (last, v) = iter.next_back().unwrap();
        assert_eq!(*last, 49);
        *v = 1;
        for (k, v) in iter {
            *v = *k;
        }

        assert_eq!(map.get(&49), Some(&1));
        assert_eq!(map.get(&47), Some(&47));
        assert!(map.iter().take(32).all(|(k, v)| k == v));
    }

    #[test]
    fn iter_mut_and_values_mut() {
        let mut map: RbMap<u32, u32> = [(3, 30), (1, 10), (2, 20)].into_iter().collect();

        for (k, v) in map.iter_mut() {
            *v += *k;
        }
        assert_eq!(map.values().copied().collect::<Vec<_>>(), [11, 22, 33]);

        for v in map.values_mut() {
            *v = 0;
        }
        assert!(map.values().all(|&v| v == 0));
    }

    #[test]
    fn into_iter_ascending() {
        let map: RbMap<u32, char> = [(2, 'b'), (3, 'c'), (1, 'a')].into_iter().collect();
        let entries: Vec<_> = map.into_iter().collect();
        assert_eq!(entries, [(1, 'a'), (2, 'b'), (3, 'c')]);
    }

    #[test]
    fn into_iter_rev() {
        let map: RbMap<u32, ()> = (0..6).map(|k| (k, ())).collect();
        let keys: Vec<_> = map.into_iter().rev().map(|(k, _)| k).collect();
        assert_eq!(keys, [5, 4, 3, 2, 1, 0]);
    }

    #[test]
    fn debug_format() {
        let map: RbMap<u32, &str> = [(2, "b"), (1, "a")].into_iter().collect();
        assert_eq!(format!("{:?}", map), r#"{1: "a", 2: "b"}"#);
    }

    // ========================================================================
    // Comparators
    // ========================================================================

    #[test]
    fn reverse_comparator_descends() {
        let mut map: RbMap<u32, u32, Reverse> = RbMap::with_comparator(Reverse::default());
        for k in [5, 3, 8, 1] {
            map.insert(k, k);
        }
        map.validate();
        assert_eq!(keys_of(&map), [8, 5, 3, 1]);
        assert_eq!(map.first().map(|(k, _)| *k), Some(8));
    }

    #[test]
    fn closure_comparator_case_insensitive() {
        let mut map = RbMap::with_comparator(compare::by(|a: &String, b: &String| {
            a.to_lowercase().cmp(&b.to_lowercase())
        }));
        map.insert("Dragon".to_string(), 1);
        assert_eq!(map.insert("dragon".to_string(), 2), Some(1));
        assert_eq!(map.len(), 1);
        // The original key is kept; only the value is replaced.
        assert_eq!(map.first(), Some((&"Dragon".to_string(), &2)));
    }

    #[test]
    fn narrow_index_type() {
        // u8::MAX is the "no node" link, leaving 255 usable positions.
        assert!(u8::NONE.is_none());
        assert!((u8::MAX - 1).is_some());
        assert_eq!(u8::max_entries(), 255);

        let mut map: RbMap<u16, u16, Natural, u8> =
            RbMap::with_capacity_and_comparator(255, Natural);
        for k in 0..255u16 {
            map.insert(k, k);
        }
        assert_eq!(map.len(), 255);
        map.validate();

        // Removal compacts the arena, so freed positions are reused.
        for k in (0..255u16).step_by(2) {
            assert_eq!(map.remove(&k), Some(k));
        }
        for k in (0..255u16).step_by(2) {
            map.insert(k, k + 1);
        }
        assert_eq!(map.len(), 255);
        assert_eq!(map.get(&254), Some(&255));
        map.validate();
    }

    #[test]
    fn wide_index_type() {
        assert_eq!(u16::max_entries(), u16::MAX as usize);
        assert_eq!(usize::max_entries(), usize::MAX);

        let mut map: RbMap<u32, (), Natural, usize> =
            RbMap::with_capacity_and_comparator(0, Natural);
        map.extend((0..1000).map(|k| (k, ())));
        assert_eq!(map.len(), 1000);
        assert_eq!(map.first(), Some((&0, &())));
        map.validate();
    }

    #[test]
    #[should_panic(expected = "map length exceeds index type maximum")]
    fn narrow_index_type_overflow_panics() {
        let mut map: RbMap<u16, u16, Natural, u8> =
            RbMap::with_capacity_and_comparator(0, Natural);
        for k in 0..256u16 {
            map.insert(k, k);
        }
    }

    // ========================================================================
    // Clear / clone
    // ========================================================================

    #[test]
    fn clear_then_reuse() {
        let mut map = RbMap::with_capacity(16);
        for k in 0..16u32 {
            map.insert(k, k);
        }
        map.clear();
        assert!(map.is_empty());
        assert!(map.capacity() >= 16);
        assert_eq!(map.get(&3), None);

        map.insert(42, 42);
        assert_eq!(keys_of(&map), [42]);
        map.validate();
    }

    #[test]
    fn clone_is_independent() {
        let mut a: RbMap<u32, u32> = (0..10).map(|k| (k, k)).collect();
        let b = a.clone();
        a.remove(&3);
        assert_eq!(b.len(), 10);
        assert_eq!(b.get(&3), Some(&3));
        b.validate();
    }

    // ========================================================================
    // Stress
    // ========================================================================

    #[test]
    fn stress_random_operations() {
        let mut map: RbMap<u32, u32> = RbMap::new();
        let mut reference = BTreeMap::new();
        let mut rng = SmallRng::seed_from_u64(0xC0FFEE);

        for _ in 0..5_000 {
            let op = rng.random_range(0..100);
            let key = rng.random_range(0..300);

            if op < 55 {
                assert_eq!(map.insert(key, op), reference.insert(key, op));
            } else if op < 90 {
                assert_eq!(map.remove(&key), reference.remove(&key));
            } else {
                assert_eq!(map.get(&key), reference.get(&key));
            }
            map.validate();
        }

        assert_eq!(map.len(), reference.len());
        let ours: Vec<_> = map.iter().map(|(k, v)| (*k, *v)).collect();
        let theirs: Vec<_> = reference.into_iter().collect();
        assert_eq!(ours, theirs);
    }

    #[test]
    fn black_height_stays_logarithmic() {
        let mut map = RbMap::new();
        for k in 0..4096u32 {
            map.insert(k, ());
        }
        // A tree with black-height h holds at least 2^h - 1 nodes.
        let bh = map.validate();
        assert!(bh <= 12, "black-height {} too large", bh);
    }

    #[test]
    fn black_height_counts_black_nodes_only() {
        let mut map = RbMap::new();
        assert_eq!(map.validate(), 0);

        map.insert(2, ());
        assert_eq!(map.validate(), 1);

        // Red children leave the black-height unchanged.
        map.insert(1, ());
        map.insert(3, ());
        assert_eq!(map.validate(), 1);

        // Red uncle: both children turn black, root stays black.
        map.insert(4, ());
        assert_eq!(map.validate(), 2);

        // Red leaf: no fixup needed.
        map.remove(&4);
        assert_eq!(map.validate(), 2);

        // Black leaf: its sibling is recolored red and the tree shrinks.
        map.remove(&3);
        assert_eq!(map.validate(), 1);

        map.remove(&1);
        map.remove(&2);
        assert_eq!(map.validate(), 0);
    }
}
