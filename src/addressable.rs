//! Addressable binary min-heap
//!
//! A binary heap stored in a dense array, augmented with a side table from
//! handles to array positions. The side table turns `decrease_key` and
//! `delete` of arbitrary elements into O(log n) operations with no linear
//! search, while callers only ever see opaque handles.
//!
//! # Time Complexity
//!
//! | Operation      | Complexity |
//! |----------------|------------|
//! | `insert`       | O(log n)   |
//! | `find_min`     | O(1)       |
//! | `delete_min`   | O(log n)   |
//! | `decrease_key` | O(log n)   |
//! | `delete`       | O(log n)   |
//!
//! # Algorithm Overview
//!
//! Entries `(key, handle)` live in a `Vec` in heap order: for every non-root
//! position `i`, the key at `(i - 1) / 2` is not greater than the key at `i`.
//! Every swap performed while restoring heap order also rewrites the side-table
//! positions of both swapped handles, so after each operation every live handle
//! maps to the slot that actually holds it.
//!
//! Removal of an arbitrary slot moves the last entry into the hole. The moved
//! entry may be smaller than its new parent (it came from another subtree), so
//! it is bubbled up in that case and bubbled down otherwise.
//!
//! # Example
//!
//! ```rust
//! use addressable_heap::AddressableHeap;
//!
//! let mut heap = AddressableHeap::new();
//! let five = heap.insert(5);
//! let _three = heap.insert(3);
//! let eight = heap.insert(8);
//!
//! heap.decrease_key(&eight, 1).unwrap();
//! assert_eq!(heap.find_min(), Ok(&1));
//!
//! assert_eq!(heap.delete(&five), Ok(5));
//! assert_eq!(heap.into_sorted_vec(), vec![1, 3]);
//! ```

use std::cmp::Ordering;
use std::fmt;

use tracing::trace;

use crate::compare::{Compare, MinOrder};
use crate::storage::{HashIndexStorage, IndexStorage};
use crate::traits::{DecreaseKeyHeap, Heap, HeapError};

/// A heap slot: the key and the handle that addresses it
#[derive(Clone)]
struct Entry<K, H> {
    key: K,
    handle: H,
}

/// Binary min-heap with stable handles
///
/// # Type Parameters
/// - `K`: The key type
/// - `C`: The key ordering, [`MinOrder`] by default
/// - `S`: The handle -> position side table, [`HashIndexStorage`] by default
///
/// The heap owns its array and side table exclusively and performs no
/// internal synchronization.
#[derive(Clone)]
pub struct AddressableHeap<K, C = MinOrder, S: IndexStorage = HashIndexStorage> {
    /// Entries in heap order
    entries: Vec<Entry<K, S::Handle>>,
    /// Current position of every live handle
    positions: S,
    compare: C,
}

impl<K: Ord> AddressableHeap<K> {
    /// Creates an empty heap ordered by `K`'s natural order
    pub fn new() -> Self {
        Self::with_comparator(MinOrder)
    }

    /// Creates an empty heap with room for `capacity` elements
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparator(capacity, MinOrder)
    }
}

impl<K, C: Compare<K>> AddressableHeap<K, C> {
    /// Creates an empty heap ordered by `compare`
    pub fn with_comparator(compare: C) -> Self {
        Self::with_capacity_and_comparator(0, compare)
    }
}

impl<K, C: Compare<K>, S: IndexStorage> AddressableHeap<K, C, S> {
    /// Creates an empty heap with the given capacity and ordering
    ///
    /// This is the constructor to use for non-default storage backends:
    ///
    /// ```rust
    /// use addressable_heap::{AddressableHeap, DenseIndexStorage, MaxOrder};
    ///
    /// let mut heap: AddressableHeap<u32, MaxOrder, DenseIndexStorage> =
    ///     AddressableHeap::with_capacity_and_comparator(16, MaxOrder);
    /// heap.insert(1);
    /// heap.insert(9);
    /// assert_eq!(heap.find_min(), Ok(&9));
    /// ```
    pub fn with_capacity_and_comparator(capacity: usize, compare: C) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            positions: S::with_capacity(capacity),
            compare,
        }
    }

    /// Returns the number of elements in the heap
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the heap is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts a key and returns the handle that identifies it
    pub fn insert(&mut self, key: K) -> S::Handle {
        let index = self.entries.len();
        let handle = self.positions.allocate(index);
        self.entries.push(Entry { key, handle });
        self.bubble_up(index);
        handle
    }

    /// Returns the minimum key
    ///
    /// # Errors
    /// `HeapError::EmptyHeap` if there are no elements.
    #[inline]
    pub fn find_min(&self) -> Result<&K, HeapError> {
        self.entries
            .first()
            .map(|entry| &entry.key)
            .ok_or(HeapError::EmptyHeap)
    }

    /// Removes and returns the minimum key
    ///
    /// # Errors
    /// `HeapError::EmptyHeap` if there are no elements.
    pub fn delete_min(&mut self) -> Result<K, HeapError> {
        if self.entries.is_empty() {
            return Err(HeapError::EmptyHeap);
        }
        Ok(self.remove_at(0))
    }

    /// Lowers the key of the element identified by `handle`
    ///
    /// A key equal to the current key is accepted.
    ///
    /// # Errors
    /// - `HeapError::UnknownHandle` if `handle` is not in the heap.
    /// - `HeapError::InvalidKeyOrder` if `new_key` is greater than the current key.
    pub fn decrease_key(&mut self, handle: &S::Handle, new_key: K) -> Result<(), HeapError> {
        let index = match self.positions.position(handle) {
            Some(index) => index,
            None => {
                trace!(?handle, "decrease_key: unknown handle");
                return Err(HeapError::UnknownHandle);
            }
        };

        if self.compare.compare(&new_key, &self.entries[index].key) == Ordering::Greater {
            trace!(?handle, index, "decrease_key: new key is greater");
            return Err(HeapError::InvalidKeyOrder);
        }

        self.entries[index].key = new_key;
        self.bubble_up(index);
        Ok(())
    }

    /// Removes the element identified by `handle`, returning its key
    ///
    /// # Errors
    /// `HeapError::UnknownHandle` if `handle` is not in the heap.
    pub fn delete(&mut self, handle: &S::Handle) -> Result<K, HeapError> {
        match self.positions.position(handle) {
            Some(index) => Ok(self.remove_at(index)),
            None => {
                trace!(?handle, "delete: unknown handle");
                Err(HeapError::UnknownHandle)
            }
        }
    }

    /// Returns true if `handle` refers to an element in the heap
    #[inline]
    pub fn contains(&self, handle: &S::Handle) -> bool {
        self.positions.position(handle).is_some()
    }

    /// Returns the current key of the element identified by `handle`
    pub fn get(&self, handle: &S::Handle) -> Option<&K> {
        self.positions
            .position(handle)
            .map(|index| &self.entries[index].key)
    }

    /// Removes every element; all outstanding handles become unknown
    pub fn clear(&mut self) {
        self.entries.clear();
        self.positions.clear();
    }

    /// Iterates over `(handle, key)` pairs in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (S::Handle, &K)> + '_ {
        self.entries.iter().map(|entry| (entry.handle, &entry.key))
    }

    /// Consumes the heap, returning its keys in ascending order
    pub fn into_sorted_vec(mut self) -> Vec<K> {
        let mut sorted = Vec::with_capacity(self.entries.len());
        while let Ok(key) = self.delete_min() {
            sorted.push(key);
        }
        sorted
    }

    /// Checks the heap-order, index-map and size invariants
    ///
    /// Runs in O(n); meant for tests and debugging.
    pub fn verify_invariants(&self) -> bool {
        if self.entries.len() != self.positions.len() {
            return false;
        }

        let mapped = self
            .entries
            .iter()
            .enumerate()
            .all(|(index, entry)| self.positions.position(&entry.handle) == Some(index));

        let ordered = (1..self.entries.len()).all(|index| {
            let parent = (index - 1) / 2;
            self.compare
                .compare(&self.entries[parent].key, &self.entries[index].key)
                != Ordering::Greater
        });

        mapped && ordered
    }

    /// Removes the entry at `index`, refilling the hole with the last entry
    fn remove_at(&mut self, index: usize) -> K {
        let removed = self.entries.swap_remove(index);
        let released = self.positions.release(&removed.handle);
        debug_assert_eq!(released, Some(index));

        if index < self.entries.len() {
            let moved = self.entries[index].handle;
            self.positions.set_position(&moved, index);
            if index > 0 && self.less(index, (index - 1) / 2) {
                self.bubble_up(index);
            } else {
                self.bubble_down(index);
            }
        }

        removed.key
    }

    #[inline]
    fn less(&self, a: usize, b: usize) -> bool {
        self.compare.compare(&self.entries[a].key, &self.entries[b].key) == Ordering::Less
    }

    /// Swaps two slots and records both new positions
    #[inline]
    fn swap_entries(&mut self, a: usize, b: usize) {
        self.entries.swap(a, b);
        let (handle_a, handle_b) = (self.entries[a].handle, self.entries[b].handle);
        self.positions.set_position(&handle_a, a);
        self.positions.set_position(&handle_b, b);
    }

    /// Move entry at index up while it is smaller than its parent
    fn bubble_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.less(index, parent) {
                self.swap_entries(index, parent);
                index = parent;
            } else {
                break;
            }
        }
    }

    /// Move entry at index down while one of its children is smaller
    fn bubble_down(&mut self, mut index: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * index + 1;
            if left >= len {
                break;
            }
            let right = left + 1;

            let mut smallest = left;
            if right < len && self.less(right, left) {
                smallest = right;
            }

            if self.less(smallest, index) {
                self.swap_entries(index, smallest);
                index = smallest;
            } else {
                break;
            }
        }
    }
}

impl<K, C, S> Heap<K> for AddressableHeap<K, C, S>
where
    C: Compare<K> + Default,
    S: IndexStorage,
{
    fn new() -> Self {
        Self::with_capacity_and_comparator(0, C::default())
    }

    fn is_empty(&self) -> bool {
        AddressableHeap::is_empty(self)
    }

    fn len(&self) -> usize {
        AddressableHeap::len(self)
    }

    fn push(&mut self, key: K) {
        self.insert(key);
    }

    fn peek(&self) -> Option<&K> {
        self.find_min().ok()
    }

    fn pop(&mut self) -> Option<K> {
        self.delete_min().ok()
    }
}

impl<K, C, S> DecreaseKeyHeap<K> for AddressableHeap<K, C, S>
where
    C: Compare<K> + Default,
    S: IndexStorage,
{
    type Handle = S::Handle;

    fn insert(&mut self, key: K) -> S::Handle {
        AddressableHeap::insert(self, key)
    }

    fn find_min(&self) -> Result<&K, HeapError> {
        AddressableHeap::find_min(self)
    }

    fn delete_min(&mut self) -> Result<K, HeapError> {
        AddressableHeap::delete_min(self)
    }

    fn decrease_key(&mut self, handle: &S::Handle, new_key: K) -> Result<(), HeapError> {
        AddressableHeap::decrease_key(self, handle, new_key)
    }

    fn delete(&mut self, handle: &S::Handle) -> Result<K, HeapError> {
        AddressableHeap::delete(self, handle)
    }
}

impl<K, C, S> Default for AddressableHeap<K, C, S>
where
    C: Compare<K> + Default,
    S: IndexStorage,
{
    fn default() -> Self {
        Self::with_capacity_and_comparator(0, C::default())
    }
}

impl<K, C: Compare<K>, S: IndexStorage> Extend<K> for AddressableHeap<K, C, S> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.entries.reserve(iter.size_hint().0);
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: Ord> FromIterator<K> for AddressableHeap<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut heap = Self::new();
        heap.extend(iter);
        heap
    }
}

impl<K: fmt::Debug, C, S: IndexStorage> fmt::Debug for AddressableHeap<K, C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddressableHeap")
            .field("len", &self.entries.len())
            .field("min", &self.entries.first().map(|entry| &entry.key))
            .finish()
    }
}
