//! Pluggable side tables mapping handles to array positions
//!
//! An [`AddressableHeap`](crate::AddressableHeap) keeps its entries in a dense
//! array and never exposes array positions. Instead every entry carries a
//! handle, and an [`IndexStorage`] maps each live handle to the entry's current
//! position. This module provides the backends:
//!
//! - [`HashIndexStorage`]: Default. `FxHashMap` keyed by counter-issued handles.
//! - [`DenseIndexStorage`]: A `Vec` indexed directly by handle id. Fastest
//!   lookups, but memory grows with the total number of inserts.
//! - [`SlotMapIndexStorage`]: Generational arena from `slotmap` (requires the
//!   `arena-storage` feature).
//!
//! # Design
//!
//! Each backend is responsible for minting handles, so the handle type is an
//! associated type. Handles issued by one storage instance are never reissued
//! by it, which is what makes a stale handle detectable: lookups for a removed
//! handle simply find nothing.

use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;

#[cfg(feature = "arena-storage")]
use slotmap::{new_key_type, SlotMap};

use crate::traits::Handle;

/// Trait for handle -> position side tables
///
/// Implementations must keep exactly one position per live handle. The heap
/// calls [`set_position`](IndexStorage::set_position) on every relocation, so
/// implementations should make it O(1).
pub trait IndexStorage: Default {
    /// Handle type minted by this storage
    type Handle: Handle + Copy + Hash;

    /// Creates storage with room for `capacity` live handles
    fn with_capacity(capacity: usize) -> Self;

    /// Mints a fresh handle positioned at `index`
    fn allocate(&mut self, index: usize) -> Self::Handle;

    /// Returns the current position of a live handle
    fn position(&self, handle: &Self::Handle) -> Option<usize>;

    /// Moves a live handle to `index`
    ///
    /// The handle must be live; this is an internal invariant of the heap.
    fn set_position(&mut self, handle: &Self::Handle, index: usize);

    /// Forgets a handle, returning its last position if it was live
    fn release(&mut self, handle: &Self::Handle) -> Option<usize>;

    /// Number of live handles
    fn len(&self) -> usize;

    /// Returns true if no handles are live
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forgets every handle. Handles minted afterwards are still fresh.
    fn clear(&mut self);
}

// ============================================================================
// HeapHandle - counter-issued handle shared by the hash and dense backends
// ============================================================================

/// Counter-issued handle
///
/// Ids are assigned in insertion order starting from zero and are never
/// reused by the storage that issued them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HeapHandle(usize);

impl HeapHandle {
    /// The numeric id of this handle
    #[inline]
    pub fn id(&self) -> usize {
        self.0
    }
}

impl fmt::Debug for HeapHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HeapHandle").field(&self.0).finish()
    }
}

impl Handle for HeapHandle {}

// ============================================================================
// HashIndexStorage - Default implementation
// ============================================================================

/// Hash-map side table (default)
///
/// # Characteristics
/// - Memory proportional to the number of live elements
/// - O(1) expected lookups through `FxHashMap`
#[derive(Debug, Clone, Default)]
pub struct HashIndexStorage {
    positions: FxHashMap<HeapHandle, usize>,
    next_id: usize,
}

impl IndexStorage for HashIndexStorage {
    type Handle = HeapHandle;

    fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            next_id: 0,
        }
    }

    fn allocate(&mut self, index: usize) -> HeapHandle {
        let handle = HeapHandle(self.next_id);
        self.next_id += 1;
        self.positions.insert(handle, index);
        handle
    }

    #[inline]
    fn position(&self, handle: &HeapHandle) -> Option<usize> {
        self.positions.get(handle).copied()
    }

    #[inline]
    fn set_position(&mut self, handle: &HeapHandle, index: usize) {
        let slot = self.positions.get_mut(handle);
        debug_assert!(slot.is_some(), "relocating dead handle {:?}", handle);
        if let Some(slot) = slot {
            *slot = index;
        }
    }

    fn release(&mut self, handle: &HeapHandle) -> Option<usize> {
        self.positions.remove(handle)
    }

    fn len(&self) -> usize {
        self.positions.len()
    }

    fn clear(&mut self) {
        self.positions.clear();
    }
}

// ============================================================================
// DenseIndexStorage - Vec indexed by handle id
// ============================================================================

/// Dense side table indexed by handle id
///
/// One slot is kept for every handle ever minted, so this suits workloads
/// with a bounded number of total inserts (e.g. one per graph vertex).
///
/// # Characteristics
/// - O(1) worst-case lookups with no hashing
/// - Memory proportional to the total number of inserts, not live elements
#[derive(Debug, Clone, Default)]
pub struct DenseIndexStorage {
    positions: Vec<usize>,
    live: usize,
}

impl DenseIndexStorage {
    const UNSET: usize = usize::MAX;
}

impl IndexStorage for DenseIndexStorage {
    type Handle = HeapHandle;

    fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
            live: 0,
        }
    }

    fn allocate(&mut self, index: usize) -> HeapHandle {
        let handle = HeapHandle(self.positions.len());
        self.positions.push(index);
        self.live += 1;
        handle
    }

    #[inline]
    fn position(&self, handle: &HeapHandle) -> Option<usize> {
        match self.positions.get(handle.0) {
            Some(&index) if index != Self::UNSET => Some(index),
            _ => None,
        }
    }

    #[inline]
    fn set_position(&mut self, handle: &HeapHandle, index: usize) {
        debug_assert!(
            self.position(handle).is_some(),
            "relocating dead handle {:?}",
            handle
        );
        if let Some(slot) = self.positions.get_mut(handle.0) {
            *slot = index;
        }
    }

    fn release(&mut self, handle: &HeapHandle) -> Option<usize> {
        let slot = self.positions.get_mut(handle.0)?;
        if *slot == Self::UNSET {
            return None;
        }
        self.live -= 1;
        Some(std::mem::replace(slot, Self::UNSET))
    }

    fn len(&self) -> usize {
        self.live
    }

    fn clear(&mut self) {
        // Slots stay allocated so that ids are not reissued
        self.positions.fill(Self::UNSET);
        self.live = 0;
    }
}

// ============================================================================
// SlotMapIndexStorage - Generational arena
// ============================================================================

#[cfg(feature = "arena-storage")]
new_key_type! {
    /// Generational handle minted by [`SlotMapIndexStorage`]
    pub struct SlotMapHandle;
}

#[cfg(feature = "arena-storage")]
impl Handle for SlotMapHandle {}

/// Slot-map side table
///
/// Freed slots are recycled, but with a bumped generation, so a stale handle
/// never aliases a newer element.
///
/// # Characteristics
/// - Memory proportional to the peak number of live elements
/// - O(1) worst-case lookups with no hashing
///
/// # Feature Flag
/// Requires the `arena-storage` feature to be enabled.
#[cfg(feature = "arena-storage")]
#[derive(Debug, Clone)]
pub struct SlotMapIndexStorage {
    positions: SlotMap<SlotMapHandle, usize>,
}

#[cfg(feature = "arena-storage")]
impl Default for SlotMapIndexStorage {
    fn default() -> Self {
        Self {
            positions: SlotMap::with_key(),
        }
    }
}

#[cfg(feature = "arena-storage")]
impl IndexStorage for SlotMapIndexStorage {
    type Handle = SlotMapHandle;

    fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: SlotMap::with_capacity_and_key(capacity),
        }
    }

    fn allocate(&mut self, index: usize) -> SlotMapHandle {
        self.positions.insert(index)
    }

    #[inline]
    fn position(&self, handle: &SlotMapHandle) -> Option<usize> {
        self.positions.get(*handle).copied()
    }

    #[inline]
    fn set_position(&mut self, handle: &SlotMapHandle, index: usize) {
        let slot = self.positions.get_mut(*handle);
        debug_assert!(slot.is_some(), "relocating dead handle {:?}", handle);
        if let Some(slot) = slot {
            *slot = index;
        }
    }

    fn release(&mut self, handle: &SlotMapHandle) -> Option<usize> {
        self.positions.remove(*handle)
    }

    fn len(&self) -> usize {
        self.positions.len()
    }

    fn clear(&mut self) {
        // `clear` bumps every occupied slot's version, so old keys stay dead
        self.positions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_lifecycle<S: IndexStorage>() {
        let mut storage = S::default();

        let a = storage.allocate(0);
        let b = storage.allocate(1);
        assert_ne!(a, b);
        assert_eq!(storage.len(), 2);
        assert_eq!(storage.position(&a), Some(0));
        assert_eq!(storage.position(&b), Some(1));

        storage.set_position(&a, 1);
        storage.set_position(&b, 0);
        assert_eq!(storage.position(&a), Some(1));
        assert_eq!(storage.position(&b), Some(0));

        assert_eq!(storage.release(&a), Some(1));
        assert_eq!(storage.release(&a), None);
        assert_eq!(storage.position(&a), None);
        assert_eq!(storage.len(), 1);

        let c = storage.allocate(1);
        assert_ne!(c, a);
        assert_eq!(storage.position(&a), None);
        assert_eq!(storage.position(&c), Some(1));

        storage.clear();
        assert!(storage.is_empty());
        assert_eq!(storage.position(&b), None);
        assert_eq!(storage.position(&c), None);

        let d = storage.allocate(0);
        assert!(d != a && d != b && d != c);
        assert_eq!(storage.position(&d), Some(0));
    }

    #[test]
    fn test_hash_storage_lifecycle() {
        check_lifecycle::<HashIndexStorage>();
    }

    #[test]
    fn test_dense_storage_lifecycle() {
        check_lifecycle::<DenseIndexStorage>();
    }

    #[cfg(feature = "arena-storage")]
    #[test]
    fn test_slotmap_storage_lifecycle() {
        check_lifecycle::<SlotMapIndexStorage>();
    }

    #[test]
    fn test_counter_handles_are_sequential() {
        let mut storage = HashIndexStorage::with_capacity(4);
        let ids: Vec<usize> = (0..4).map(|i| storage.allocate(i).id()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_dense_storage_rejects_foreign_handle() {
        let mut storage = DenseIndexStorage::default();
        storage.allocate(0);

        let mut other = HashIndexStorage::default();
        for i in 0..5 {
            other.allocate(i);
        }
        let foreign = other.allocate(5);

        assert_eq!(storage.position(&foreign), None);
        assert_eq!(storage.release(&foreign), None);
        assert_eq!(storage.len(), 1);
    }
}
