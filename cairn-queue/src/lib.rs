//! # cairn-queue
//!
//! Single-owner FIFO containers for game-client event and history buffers.
//!
//! | Structure | Use Case | Full Behaviour |
//! |-----------|----------|----------------|
//! | [`FifoQueue`] | Network message backlog, input and command queues | Grows the backing array |
//! | [`RingBuffer`] | Chat/combat logs, rolling frame-time samples | Evicts and returns the oldest element |
//!
//! ## Design
//!
//! Both are circular arrays of `Option<T>` slots addressed by a head index
//! and a length. Vacated slots are set back to `None` so dropped values do
//! not linger in the buffer.
//!
//! [`FifoQueue`] also carries a mutation version. A detached
//! [`Cursor`](fifo::Cursor) reports [`ConcurrentModification`] if the queue
//! changes while it is walking.
//!
//! ## Example
//!
//! ```
//! use cairn_queue::{FifoQueue, RingBuffer};
//!
//! let mut inbox = FifoQueue::new();
//! inbox.enqueue("hello");
//! inbox.enqueue("world");
//! assert_eq!(inbox.dequeue(), Ok("hello"));
//!
//! let mut recent = RingBuffer::new(2).unwrap();
//! recent.enqueue(1);
//! recent.enqueue(2);
//! assert_eq!(recent.enqueue(3), Some(1));
//! ```
//!
//! ## Threading
//!
//! No internal synchronisation. Mutation takes `&mut self`; wrap in a lock or
//! keep on one thread to share.
//!
//! ## Feature Flags
//!
//! - `tracing` - emit `trace!` events when a [`FifoQueue`] resizes and when a
//!   [`RingBuffer`] evicts

#![warn(missing_docs)]

pub mod error;
pub mod fifo;
pub mod ring;

pub use error::{ConcurrentModification, Empty, InvalidCapacity};
pub use fifo::FifoQueue;
pub use ring::RingBuffer;
