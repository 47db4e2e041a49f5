//! Integration tests for thread-safe persistent vectors.
//!
//! These tests verify that vectors work correctly with the `arc` feature
//! enabled: versions are shared across threads without synchronization and
//! builders run one per thread.

#![cfg(feature = "arc")]

use radix_vector::persistent::{PersistentVector, TransientVector};
use rstest::rstest;
use static_assertions::{assert_impl_all, assert_not_impl_any};
use std::cell::Cell;
use std::sync::Arc;
use std::thread;

assert_impl_all!(PersistentVector<String>: Send, Sync);
assert_impl_all!(TransientVector<String>: Send);
assert_not_impl_any!(PersistentVector<Cell<i32>>: Sync);

// =============================================================================
// Shared Readers
// =============================================================================

#[rstest]
fn test_vector_cross_thread_structural_sharing() {
    let original: Arc<PersistentVector<usize>> = Arc::new((0..1000).collect());

    let handles: Vec<_> = (0..4)
        .map(|thread_id| {
            let shared = Arc::clone(&original);
            thread::spawn(move || {
                let extended = shared.push_back(thread_id);
                assert_eq!(extended.len(), 1001);
                assert_eq!(extended.last(), Some(&thread_id));
                assert_eq!(shared.len(), 1000);
                extended
            })
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().expect("Thread panicked"))
        .collect();

    for (thread_id, vector) in results.iter().enumerate() {
        assert_eq!(vector.last(), Some(&thread_id));
    }
    assert_eq!(original.last(), Some(&999));
}

#[rstest]
fn test_vector_concurrent_random_access() {
    let vector: PersistentVector<usize> = (0..10_000).collect();

    let total: usize = (0..4)
        .map(|thread_id| {
            let vector_clone = vector.clone();
            thread::spawn(move || {
                let start = thread_id * 2500;
                (start..start + 2500)
                    .map(|index| *vector_clone.get(index).expect("index in range"))
                    .sum::<usize>()
            })
        })
        .map(|handle| handle.join().expect("Thread panicked"))
        .sum();

    assert_eq!(total, (0..10_000).sum::<usize>());
}

// =============================================================================
// One Builder per Thread
// =============================================================================

#[rstest]
fn test_builders_per_thread_do_not_interfere() {
    let source: PersistentVector<usize, 8> = (0..500).collect();

    let handles: Vec<_> = (0..4)
        .map(|thread_id| {
            let mut builder = source.builder();
            thread::spawn(move || {
                for index in 0..builder.len() {
                    builder
                        .set(index, index * 10 + thread_id)
                        .expect("index in range");
                }
                builder.remove(0).expect("non-empty builder");
                builder.persistent()
            })
        })
        .collect();

    for (thread_id, handle) in handles.into_iter().enumerate() {
        let edited = handle.join().expect("Thread panicked");
        assert_eq!(edited.len(), 499);
        assert_eq!(edited.get(0), Ok(&(10 + thread_id)));
    }
    assert_eq!(source.iter().copied().sum::<usize>(), (0..500).sum());
}
