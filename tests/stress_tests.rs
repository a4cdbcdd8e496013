//! Stress tests that push the heap through large operation counts
//!
//! These tests perform large numbers of operations in various patterns
//! to catch edge cases in handle bookkeeping under load.

use addressable_heap::{
    AddressableHeap, DecreaseKeyHeap, DenseIndexStorage, HashIndexStorage, MinOrder,
};

/// Small deterministic generator so the tests need no extra dependencies
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn below(&mut self, bound: usize) -> usize {
        (self.next() % bound as u64) as usize
    }
}

/// Massive numbers of inserts and pops
fn test_massive_operations<H: DecreaseKeyHeap<i32>>() {
    let mut heap = H::new();

    for i in (0..10_000).rev() {
        heap.push(i);
    }
    assert_eq!(heap.len(), 10_000);

    for i in 0..10_000 {
        assert_eq!(heap.pop(), Some(i));
    }
    assert!(heap.is_empty());
}

/// Many decrease_key operations, each moving an element to the root
fn test_many_decrease_keys<H: DecreaseKeyHeap<i32>>() {
    let mut heap = H::new();
    let handles: Vec<H::Handle> = (0..2_000).map(|i| heap.insert(100_000 + i)).collect();

    for (i, handle) in handles.iter().enumerate().rev() {
        assert!(heap.decrease_key(handle, i as i32).is_ok());
        assert_eq!(heap.find_min(), Ok(&(i as i32)));
    }

    for i in 0..2_000 {
        assert_eq!(heap.pop(), Some(i));
    }
}

/// Alternating insert and pop
fn test_alternating_ops<H: DecreaseKeyHeap<i32>>() {
    let mut heap = H::new();

    for i in 0..1_000 {
        heap.push(i * 2 + 1);
        heap.push(i * 2);
        assert_eq!(heap.pop(), Some(i));
    }

    let mut last = i32::MIN;
    while let Some(key) = heap.pop() {
        assert!(key >= last);
        last = key;
    }
}

/// Random deletes by handle interleaved with inserts
fn test_random_deletes<H: DecreaseKeyHeap<i32>>() {
    let mut rng = Lcg(0x5eed);
    let mut heap = H::new();
    let mut live: Vec<(H::Handle, i32)> = Vec::new();

    for round in 0..5_000 {
        let key = rng.below(10_000) as i32;
        live.push((heap.insert(key), key));

        if round % 3 == 0 {
            let (handle, key) = live.swap_remove(rng.below(live.len()));
            assert_eq!(heap.delete(&handle), Ok(key));
        }
    }

    assert_eq!(heap.len(), live.len());
    let mut expected: Vec<i32> = live.iter().map(|(_, k)| *k).collect();
    expected.sort_unstable();

    let mut drained = Vec::new();
    while let Ok(key) = heap.delete_min() {
        drained.push(key);
    }
    assert_eq!(drained, expected);
}

/// Simulates a discrete-event queue: events are rescheduled earlier or cancelled
///
/// Keys pack `(time, event id)` so that every pending key is unique and the
/// model can tell exactly which event `delete_min` fired.
fn test_event_queue_simulation<H: DecreaseKeyHeap<i64>>() {
    const ID_BITS: u32 = 16;
    let mut rng = Lcg(42);
    let mut heap = H::new();
    let mut pending: Vec<(H::Handle, i64)> = Vec::new();
    let mut now = 0i64;

    for id in 0..3_000i64 {
        match rng.below(4) {
            0 | 1 => {
                let at = now + 1 + rng.below(500) as i64;
                let key = (at << ID_BITS) | id;
                pending.push((heap.insert(key), key));
            }
            2 if !pending.is_empty() => {
                let i = rng.below(pending.len());
                let (time, event) = (pending[i].1 >> ID_BITS, pending[i].1 & 0xffff);
                let earlier = now.max(time - rng.below(50) as i64);
                let key = (earlier << ID_BITS) | event;
                assert!(heap.decrease_key(&pending[i].0, key).is_ok());
                pending[i].1 = key;
            }
            _ => {
                if let Ok(key) = heap.delete_min() {
                    let at = key >> ID_BITS;
                    assert!(at >= now);
                    now = at;
                    let pos = pending.iter().position(|(_, k)| *k == key).unwrap();
                    pending.swap_remove(pos);
                }
            }
        }
        assert_eq!(heap.len(), pending.len());
    }

    // Every remaining handle is still live and addressable
    for (handle, key) in &pending {
        assert!(heap.decrease_key(handle, *key).is_ok());
    }
}

macro_rules! stress_suite {
    ($storage:ty, $mod_name:ident) => {
        mod $mod_name {
            use super::*;

            type H = AddressableHeap<i32, MinOrder, $storage>;

            #[test]
            fn massive_operations() {
                test_massive_operations::<H>();
            }

            #[test]
            fn many_decrease_keys() {
                test_many_decrease_keys::<H>();
            }

            #[test]
            fn alternating_ops() {
                test_alternating_ops::<H>();
            }

            #[test]
            fn random_deletes() {
                test_random_deletes::<H>();
            }

            #[test]
            fn event_queue_simulation() {
                test_event_queue_simulation::<AddressableHeap<i64, MinOrder, $storage>>();
            }
        }
    };
}

stress_suite!(HashIndexStorage, hash_storage);
stress_suite!(DenseIndexStorage, dense_storage);
#[cfg(feature = "arena-storage")]
stress_suite!(addressable_heap::SlotMapIndexStorage, slotmap_storage);

#[test]
fn test_large_heap_keeps_invariants() {
    let mut rng = Lcg(7);
    let mut heap = AddressableHeap::with_capacity(20_000);
    let mut handles = Vec::new();

    for _ in 0..20_000 {
        handles.push(heap.insert(rng.below(1_000_000) as i64));
    }
    for handle in handles.iter().step_by(7) {
        let current = *heap.get(handle).unwrap();
        heap.decrease_key(handle, current - 1_000_000).unwrap();
    }
    for handle in handles.iter().skip(3).step_by(11) {
        let _ = heap.delete(handle);
    }
    assert!(heap.verify_invariants());
}
