//! Ordered map and priority queue for game-client lookup tables and
//! scheduling.
//!
//! Both containers own their elements outright and are ordered by a
//! pluggable [`Comparator`], defaulting to the element type's [`Ord`].
//!
//! | Structure | Use Case | Key Operations |
//! |-----------|----------|----------------|
//! | [`RbMap`] | Sorted lookup tables (item ids, zone ids) | O(log n) insert/remove/get, ascending iteration |
//! | [`PriorityQueue`] | Timers, spawn schedules, pathfinding frontiers | O(log n) enqueue/dequeue, O(1) peek |
//!
//! # Design
//!
//! [`RbMap`] is a red-black tree whose nodes live in a flat arena and link
//! to each other by integer [`Index`] rather than pointers:
//!
//! ```text
//! Vec<Node>   - owns every key and value, dense, compacted on removal
//! Node links  - parent/left/right as u32 indices, u32::MAX = none
//! ```
//!
//! Parent links are plain indices, so there are no ownership cycles and no
//! reference counting. Rotations and fixups become index reassignments.
//!
//! [`PriorityQueue`] is an implicit binary heap over a `Vec`.
//!
//! # Errors
//!
//! Throwing-style accessors (`dequeue`, `peek`) return `Result<_, Empty>`;
//! the `try_*` variants return `Option`. Keys cannot be null in Rust, so no
//! operation validates its key argument at runtime.
//!
//! # Threading
//!
//! These are plain single-owner containers with no internal locking. Every
//! mutating method takes `&mut self`, so sharing one across threads requires
//! the caller's own synchronisation (a `Mutex`, a channel, or a single owning
//! thread).
//!
//! # Feature Flags
//!
//! - `tracing` - emit `trace!` events on `clear`

#![warn(missing_docs)]

pub mod compare;
pub mod error;
pub mod heap;
pub mod index;
pub mod map;

pub use compare::{Comparator, FnComparator, Natural, Reverse};
pub use error::Empty;
pub use heap::PriorityQueue;
pub use index::Index;
pub use map::RbMap;
