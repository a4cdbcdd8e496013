//! Key ordering for heaps
//!
//! The ordering is the only thing a caller configures on an
//! [`AddressableHeap`](crate::AddressableHeap). It is a type parameter rather
//! than a stored trait object, so the comparison is resolved at compile time.
//!
//! - [`MinOrder`]: natural `Ord` ordering (smallest key first). The default.
//! - [`MaxOrder`]: reversed natural ordering (largest key first).
//! - Any `Fn(&K, &K) -> Ordering` closure or function.
//!
//! # Example
//!
//! ```rust
//! use addressable_heap::AddressableHeap;
//!
//! // f64 is not `Ord`, so order it with `total_cmp`
//! let mut heap: AddressableHeap<f64, _> =
//!     AddressableHeap::with_comparator(|a: &f64, b: &f64| a.total_cmp(b));
//! heap.insert(2.5);
//! heap.insert(-1.0);
//! assert_eq!(heap.find_min(), Ok(&-1.0));
//! ```

use std::cmp::Ordering;

/// A total order over keys of type `K`
pub trait Compare<K: ?Sized> {
    /// Compares two keys; `Less` means `a` leaves the heap before `b`
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// Natural ordering: smallest key first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MinOrder;

impl<K: Ord + ?Sized> Compare<K> for MinOrder {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// Reversed natural ordering: largest key first
///
/// Equivalent to wrapping every key in `std::cmp::Reverse`, without the wrapper.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MaxOrder;

impl<K: Ord + ?Sized> Compare<K> for MaxOrder {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        b.cmp(a)
    }
}

impl<K: ?Sized, F> Compare<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}
