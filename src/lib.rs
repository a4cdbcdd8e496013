//! Addressable Binary Heap for Rust
//!
//! This crate provides a binary min-heap whose elements are addressed by stable,
//! opaque handles. A handle returned by `insert` keeps identifying its element
//! while the element moves around the array, which makes `decrease_key` and
//! `delete` of arbitrary elements O(log n) without any search.
//!
//! # Features
//!
//! - **AddressableHeap**: O(log n) insert, delete-min, decrease-key and delete; O(1) find-min
//! - **Pluggable handle tables**: hash map (default), dense vector, or generational
//!   slot map (`arena-storage` feature)
//! - **Custom orderings**: natural order, reversed order, or any comparator closure
//! - **Pathfinding**: Dijkstra and A* built on `decrease_key`
//!
//! # Example
//!
//! ```rust
//! use addressable_heap::{AddressableHeap, HeapError};
//!
//! let mut heap = AddressableHeap::new();
//! let h0 = heap.insert(5);
//! let _h1 = heap.insert(3);
//! let h2 = heap.insert(8);
//!
//! heap.decrease_key(&h2, 0).unwrap();
//! assert_eq!(heap.find_min(), Ok(&0));
//! assert_eq!(heap.delete_min(), Ok(0));
//!
//! assert_eq!(heap.delete(&h0), Ok(5));
//! assert_eq!(heap.delete(&h0), Err(HeapError::UnknownHandle));
//! ```

pub mod addressable;
pub mod compare;
pub mod pathfinding;
pub mod storage;
pub mod traits;

// Re-export the main types for convenience
pub use addressable::AddressableHeap;
pub use compare::{Compare, MaxOrder, MinOrder};
#[cfg(feature = "arena-storage")]
pub use storage::{SlotMapHandle, SlotMapIndexStorage};
pub use storage::{DenseIndexStorage, HashIndexStorage, HeapHandle, IndexStorage};
pub use traits::{DecreaseKeyHeap, Handle, Heap, HeapError};
