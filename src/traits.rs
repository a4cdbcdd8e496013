//! Common traits for addressable heaps
//!
//! This module provides a two-tier trait hierarchy:
//!
//! - [`Heap`]: Base trait with a `BinaryHeap`-like push/peek/pop surface
//! - [`DecreaseKeyHeap`]: Extended trait adding handle-based operations
//!   (`insert`, `decrease_key`, `delete`)
//!
//! Algorithms such as Dijkstra's shortest path are written against
//! [`DecreaseKeyHeap`] so that any handle storage backend can be plugged in.

use std::fmt;

/// Error type for heap operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeapError {
    /// The heap has no elements
    EmptyHeap,
    /// The handle does not refer to an element currently in the heap
    /// (never issued by this heap, or already removed)
    UnknownHandle,
    /// The new key compares greater than the element's current key
    InvalidKeyOrder,
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapError::EmptyHeap => write!(f, "heap is empty"),
            HeapError::UnknownHandle => {
                write!(f, "handle does not refer to an element in the heap")
            }
            HeapError::InvalidKeyOrder => {
                write!(f, "new key is greater than the current key")
            }
        }
    }
}

impl std::error::Error for HeapError {}

/// A handle to an element in the heap
///
/// Handles are opaque tokens returned by [`DecreaseKeyHeap::insert`]. They stay
/// valid while the element moves around inside the heap and become unknown once
/// the element is removed.
pub trait Handle: Clone + PartialEq + Eq + fmt::Debug {}

/// Base trait for min-heaps
///
/// The API mirrors `std::collections::BinaryHeap`, except that these heaps
/// return the *minimum* key under their ordering first.
///
/// # Example
///
/// ```rust
/// use addressable_heap::{AddressableHeap, Heap};
///
/// let mut heap: AddressableHeap<i32> = Heap::new();
/// heap.push(3);
/// heap.push(1);
/// heap.push(2);
///
/// assert_eq!(heap.peek(), Some(&1));
/// assert_eq!(heap.pop(), Some(1));
/// assert_eq!(heap.len(), 2);
/// ```
pub trait Heap<K> {
    /// Creates a new empty heap
    fn new() -> Self;

    /// Returns true if the heap is empty
    fn is_empty(&self) -> bool;

    /// Returns the number of elements in the heap
    fn len(&self) -> usize;

    /// Inserts a key, discarding its handle
    ///
    /// # Time Complexity
    /// O(log n)
    fn push(&mut self, key: K);

    /// Returns the minimum key without removing it
    ///
    /// # Time Complexity
    /// O(1)
    fn peek(&self) -> Option<&K>;

    /// Removes and returns the minimum key
    ///
    /// # Time Complexity
    /// O(log n)
    fn pop(&mut self) -> Option<K>;
}

/// Extended heap trait with handle-based operations
///
/// `insert` returns a handle that identifies the element for its whole
/// lifetime in the heap, regardless of how often it is relocated. The handle
/// is then used to lower the element's key or to remove it.
///
/// # Example
///
/// ```rust
/// use addressable_heap::{AddressableHeap, DecreaseKeyHeap, HeapError};
///
/// fn exercise<H: DecreaseKeyHeap<i32>>() {
///     let mut heap = H::new();
///     let a = heap.insert(10);
///     let _b = heap.insert(7);
///
///     heap.decrease_key(&a, 5).unwrap();
///     assert_eq!(heap.find_min(), Ok(&5));
///     assert_eq!(heap.decrease_key(&a, 6), Err(HeapError::InvalidKeyOrder));
///
///     assert_eq!(heap.delete(&a), Ok(5));
///     assert_eq!(heap.delete(&a), Err(HeapError::UnknownHandle));
/// }
///
/// exercise::<AddressableHeap<i32>>();
/// ```
pub trait DecreaseKeyHeap<K>: Heap<K> {
    /// The handle type for this heap
    type Handle: Handle;

    /// Inserts a key, returning a handle for later `decrease_key`/`delete` calls
    ///
    /// # Time Complexity
    /// O(log n)
    fn insert(&mut self, key: K) -> Self::Handle;

    /// Returns the minimum key
    ///
    /// # Errors
    /// Returns `HeapError::EmptyHeap` if the heap has no elements.
    fn find_min(&self) -> Result<&K, HeapError>;

    /// Removes and returns the minimum key
    ///
    /// # Errors
    /// Returns `HeapError::EmptyHeap` if the heap has no elements.
    fn delete_min(&mut self) -> Result<K, HeapError>;

    /// Lowers the key of the element identified by `handle`
    ///
    /// A key equal to the current one is accepted and leaves the heap unchanged.
    ///
    /// # Errors
    /// - `HeapError::UnknownHandle` if the handle is not in the heap.
    /// - `HeapError::InvalidKeyOrder` if `new_key` is greater than the current key.
    ///
    /// Both errors leave the heap untouched.
    fn decrease_key(&mut self, handle: &Self::Handle, new_key: K) -> Result<(), HeapError>;

    /// Removes the element identified by `handle`, returning its key
    ///
    /// # Errors
    /// Returns `HeapError::UnknownHandle` if the handle is not in the heap.
    fn delete(&mut self, handle: &Self::Handle) -> Result<K, HeapError>;
}
