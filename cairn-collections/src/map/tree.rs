//! Red-black structure maintenance: rotations, fixup walks and arena upkeep.
//!
//! Everything here works purely on arena indices. Rotations are the only
//! operations that change the shape of a subtree; both fixup walks are
//! expressed as rotations plus recoloring.
//!
//! Invariants restored after every public mutation:
//!
//! 1. The root is black (or the tree is empty).
//! 2. No red node has a red child.
//! 3. Every path from a node down to an absent child passes the same number
//!    of black nodes.
//! 4. In-order traversal is strictly ascending under the map's comparator.

use core::cmp::Ordering;
use core::mem;

use super::node::{Color, Node};
use super::RbMap;
use crate::compare::Comparator;
use crate::Index;

impl<K, V, C, Idx: Index> RbMap<K, V, C, Idx> {
    // ========================================================================
    // Arena access
    // ========================================================================

    #[inline]
    pub(super) fn node(&self, idx: Idx) -> &Node<K, V, Idx> {
        &self.nodes[idx.as_usize()]
    }

    #[inline]
    pub(super) fn node_mut(&mut self, idx: Idx) -> &mut Node<K, V, Idx> {
        &mut self.nodes[idx.as_usize()]
    }

    /// Absent nodes are black.
    #[inline]
    fn is_red(&self, idx: Idx) -> bool {
        idx.is_some() && self.node(idx).color == Color::Red
    }

    #[inline]
    fn parent_of(&self, idx: Idx) -> Idx {
        self.node(idx).parent
    }

    #[inline]
    fn set_color(&mut self, idx: Idx, color: Color) {
        self.node_mut(idx).color = color;
    }

    /// Appends a node to the arena and returns its index.
    ///
    /// # Panics
    ///
    /// Panics if the arena would reach the index type's sentinel.
    pub(super) fn alloc(&mut self, node: Node<K, V, Idx>) -> Idx {
        let pos = self.nodes.len();
        assert!(
            pos < Idx::max_entries(),
            "map length exceeds index type maximum"
        );
        self.nodes.push(node);
        Idx::from_usize(pos)
    }

    /// Removes an already unlinked node from the arena.
    ///
    /// The last arena node is moved into the vacated slot and every link
    /// that pointed at its old position is redirected.
    fn release(&mut self, idx: Idx) -> (K, V) {
        let pos = idx.as_usize();
        let last = self.nodes.len() - 1;
        let node = self.nodes.swap_remove(pos);

        if pos != last {
            let moved_from = Idx::from_usize(last);
            let (parent, left, right) = {
                let moved = &self.nodes[pos];
                (moved.parent, moved.left, moved.right)
            };

            if parent.is_none() {
                self.root = idx;
            } else {
                let p = self.node_mut(parent);
                if p.left == moved_from {
                    p.left = idx;
                } else {
                    p.right = idx;
                }
            }
            if left.is_some() {
                self.node_mut(left).parent = idx;
            }
            if right.is_some() {
                self.node_mut(right).parent = idx;
            }
        }

        (node.key, node.value)
    }

    /// Swaps key and value between two distinct nodes, leaving links and
    /// colors in place.
    fn swap_payload(&mut self, a: Idx, b: Idx) {
        let (a, b) = (a.as_usize(), b.as_usize());
        debug_assert_ne!(a, b);

        let (first, second) = if a < b {
            let (lo, hi) = self.nodes.split_at_mut(b);
            (&mut lo[a], &mut hi[0])
        } else {
            let (lo, hi) = self.nodes.split_at_mut(a);
            (&mut hi[0], &mut lo[b])
        };
        mem::swap(&mut first.key, &mut second.key);
        mem::swap(&mut first.value, &mut second.value);
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    pub(super) fn min_from(&self, mut idx: Idx) -> Idx {
        if idx.is_none() {
            return idx;
        }
        while self.node(idx).left.is_some() {
            idx = self.node(idx).left;
        }
        idx
    }

    pub(super) fn max_from(&self, mut idx: Idx) -> Idx {
        if idx.is_none() {
            return idx;
        }
        while self.node(idx).right.is_some() {
            idx = self.node(idx).right;
        }
        idx
    }

    /// In-order successor, or `NONE` past the largest key.
    pub(super) fn successor(&self, idx: Idx) -> Idx {
        let right = self.node(idx).right;
        if right.is_some() {
            return self.min_from(right);
        }
        let mut child = idx;
        let mut parent = self.parent_of(idx);
        while parent.is_some() && self.node(parent).right == child {
            child = parent;
            parent = self.parent_of(parent);
        }
        parent
    }

    /// In-order predecessor, or `NONE` before the smallest key.
    pub(super) fn predecessor(&self, idx: Idx) -> Idx {
        let left = self.node(idx).left;
        if left.is_some() {
            return self.max_from(left);
        }
        let mut child = idx;
        let mut parent = self.parent_of(idx);
        while parent.is_some() && self.node(parent).left == child {
            child = parent;
            parent = self.parent_of(parent);
        }
        parent
    }

    /// Arena positions in ascending key order.
    pub(super) fn in_order_positions(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut cur = self.min_from(self.root);
        while cur.is_some() {
            order.push(cur.as_usize());
            cur = self.successor(cur);
        }
        order
    }

    // ========================================================================
    // Rotations
    // ========================================================================

    /// Lifts `x`'s right child into `x`'s position.
    ///
    /// ```text
    ///     x                y
    ///    / \              / \
    ///   a   y     =>     x   c
    ///      / \          / \
    ///     b   c        a   b
    /// ```
    fn rotate_left(&mut self, x: Idx) {
        let y = self.node(x).right;
        debug_assert!(y.is_some(), "rotate_left without right child");

        let b = self.node(y).left;
        self.node_mut(x).right = b;
        if b.is_some() {
            self.node_mut(b).parent = x;
        }

        let xp = self.parent_of(x);
        self.node_mut(y).parent = xp;
        if xp.is_none() {
            self.root = y;
        } else if self.node(xp).left == x {
            self.node_mut(xp).left = y;
        } else {
            self.node_mut(xp).right = y;
        }

        self.node_mut(y).left = x;
        self.node_mut(x).parent = y;
    }

    /// Lifts `x`'s left child into `x`'s position. Mirror of
    /// [`rotate_left`](Self::rotate_left).
    fn rotate_right(&mut self, x: Idx) {
        let y = self.node(x).left;
        debug_assert!(y.is_some(), "rotate_right without left child");

        let b = self.node(y).right;
        self.node_mut(x).left = b;
        if b.is_some() {
            self.node_mut(b).parent = x;
        }

        let xp = self.parent_of(x);
        self.node_mut(y).parent = xp;
        if xp.is_none() {
            self.root = y;
        } else if self.node(xp).right == x {
            self.node_mut(xp).right = y;
        } else {
            self.node_mut(xp).left = y;
        }

        self.node_mut(y).right = x;
        self.node_mut(x).parent = y;
    }

    // ========================================================================
    // Insertion
    // ========================================================================

    /// Restores the invariants after `z` was linked in as a red leaf.
    pub(super) fn insert_fixup(&mut self, mut z: Idx) {
        while self.is_red(self.parent_of(z)) {
            let parent = self.parent_of(z);
            // A red parent is never the root, so the grandparent exists.
            let grand = self.parent_of(parent);

            if self.node(grand).left == parent {
                let uncle = self.node(grand).right;
                if self.is_red(uncle) {
                    self.set_color(parent, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(grand, Color::Red);
                    z = grand;
                } else {
                    if self.node(parent).right == z {
                        // zig-zag: straighten into zig-zig first
                        z = parent;
                        self.rotate_left(z);
                    }
                    let parent = self.parent_of(z);
                    let grand = self.parent_of(parent);
                    self.set_color(parent, Color::Black);
                    self.set_color(grand, Color::Red);
                    self.rotate_right(grand);
                }
            } else {
                let uncle = self.node(grand).left;
                if self.is_red(uncle) {
                    self.set_color(parent, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(grand, Color::Red);
                    z = grand;
                } else {
                    if self.node(parent).left == z {
                        z = parent;
                        self.rotate_right(z);
                    }
                    let parent = self.parent_of(z);
                    let grand = self.parent_of(parent);
                    self.set_color(parent, Color::Black);
                    self.set_color(grand, Color::Red);
                    self.rotate_left(grand);
                }
            }
        }

        let root = self.root;
        self.set_color(root, Color::Black);
    }

    // ========================================================================
    // Removal
    // ========================================================================

    /// Unlinks the node at `z` and returns its entry.
    ///
    /// A node with two children trades its payload with its in-order
    /// successor, and the successor (which has at most one child) is the
    /// node actually unlinked.
    pub(super) fn remove_at(&mut self, z: Idx) -> (K, V) {
        let mut target = z;
        let (left, right) = {
            let node = self.node(z);
            (node.left, node.right)
        };
        if left.is_some() && right.is_some() {
            let succ = self.min_from(right);
            self.swap_payload(z, succ);
            target = succ;
        }

        let (child, parent, color) = {
            let node = self.node(target);
            let child = if node.left.is_some() {
                node.left
            } else {
                node.right
            };
            (child, node.parent, node.color)
        };

        if child.is_some() {
            self.node_mut(child).parent = parent;
        }
        if parent.is_none() {
            self.root = child;
        } else if self.node(parent).left == target {
            self.node_mut(parent).left = child;
        } else {
            self.node_mut(parent).right = child;
        }

        if color == Color::Black {
            self.remove_fixup(child, parent);
        }

        self.release(target)
    }

    /// Pushes a black deficiency at `x` up the tree until it is absorbed.
    ///
    /// `x` may be `NONE` (the unlinked node had no children), so its parent
    /// is tracked separately. While `x` carries a deficiency its sibling
    /// subtree has black-height at least one, so the sibling always exists.
    fn remove_fixup(&mut self, mut x: Idx, mut parent: Idx) {
        while x != self.root && !self.is_red(x) {
            if self.node(parent).left == x {
                let mut sibling = self.node(parent).right;
                debug_assert!(sibling.is_some(), "deficient node without sibling");

                if self.is_red(sibling) {
                    self.set_color(sibling, Color::Black);
                    self.set_color(parent, Color::Red);
                    self.rotate_left(parent);
                    sibling = self.node(parent).right;
                }

                let (near, far) = {
                    let s = self.node(sibling);
                    (s.left, s.right)
                };
                if !self.is_red(near) && !self.is_red(far) {
                    self.set_color(sibling, Color::Red);
                    x = parent;
                    parent = self.parent_of(x);
                } else {
                    if !self.is_red(far) {
                        self.set_color(near, Color::Black);
                        self.set_color(sibling, Color::Red);
                        self.rotate_right(sibling);
                        sibling = self.node(parent).right;
                    }
                    let parent_color = self.node(parent).color;
                    self.set_color(sibling, parent_color);
                    self.set_color(parent, Color::Black);
                    let far = self.node(sibling).right;
                    self.set_color(far, Color::Black);
                    self.rotate_left(parent);
                    x = self.root;
                }
            } else {
                let mut sibling = self.node(parent).left;
                debug_assert!(sibling.is_some(), "deficient node without sibling");

                if self.is_red(sibling) {
                    self.set_color(sibling, Color::Black);
                    self.set_color(parent, Color::Red);
                    self.rotate_right(parent);
                    sibling = self.node(parent).left;
                }

                let (near, far) = {
                    let s = self.node(sibling);
                    (s.right, s.left)
                };
                if !self.is_red(near) && !self.is_red(far) {
                    self.set_color(sibling, Color::Red);
                    x = parent;
                    parent = self.parent_of(x);
                } else {
                    if !self.is_red(far) {
                        self.set_color(near, Color::Black);
                        self.set_color(sibling, Color::Red);
                        self.rotate_left(sibling);
                        sibling = self.node(parent).left;
                    }
                    let parent_color = self.node(parent).color;
                    self.set_color(sibling, parent_color);
                    self.set_color(parent, Color::Black);
                    let far = self.node(sibling).left;
                    self.set_color(far, Color::Black);
                    self.rotate_right(parent);
                    x = self.root;
                }
            }
        }

        if x.is_some() {
            self.set_color(x, Color::Black);
        }
    }
}

// ============================================================================
// Validation
// ============================================================================

impl<K, V, C, Idx> RbMap<K, V, C, Idx>
where
    C: Comparator<K>,
    Idx: Index,
{
    /// Checks every structural invariant and returns the tree's black-height:
    /// the number of black nodes on any root-to-leaf path. An empty tree has
    /// black-height 0 and a lone root has 1.
    ///
    /// Intended for tests; walks the whole tree.
    ///
    /// # Panics
    ///
    /// Panics with a description of the first violated invariant.
    #[doc(hidden)]
    pub fn validate(&self) -> usize {
        if self.root.is_none() {
            assert!(self.nodes.is_empty(), "empty tree with live nodes");
            return 0;
        }

        let root = self.node(self.root);
        assert!(root.parent.is_none(), "root has a parent");
        assert_eq!(root.color, Color::Black, "root is red");

        let mut reached = 0;
        let height = self.validate_subtree(self.root, &mut reached);
        assert_eq!(reached, self.nodes.len(), "unreachable nodes in arena");

        let mut prev: Option<&K> = None;
        for (key, _) in self.iter() {
            if let Some(prev) = prev {
                assert_eq!(
                    self.cmp.compare(prev, key),
                    Ordering::Less,
                    "in-order keys not strictly ascending"
                );
            }
            prev = Some(key);
        }

        height
    }

    /// Black nodes on every path from `idx` down to an absent child, counting
    /// `idx` itself. Absent children contribute 0.
    fn validate_subtree(&self, idx: Idx, reached: &mut usize) -> usize {
        if idx.is_none() {
            return 0;
        }
        *reached += 1;

        let node = self.node(idx);
        for child in [node.left, node.right] {
            if child.is_some() {
                assert_eq!(self.node(child).parent, idx, "broken parent link");
                if node.color == Color::Red {
                    assert_eq!(
                        self.node(child).color,
                        Color::Black,
                        "red node with red child"
                    );
                }
            }
        }

        let left = self.validate_subtree(node.left, reached);
        let right = self.validate_subtree(node.right, reached);
        assert_eq!(left, right, "black-height mismatch");

        left + usize::from(node.color == Color::Black)
    }
}
