//! Integration tests for TransientVector.
//!
//! The builder must never write through to a buffer that a published
//! vector can still see, neither the vector it was created from nor any
//! vector it published earlier.

use radix_vector::persistent::{IndexOutOfRange, PersistentVector, TransientVector};
use rstest::rstest;

type Narrow<T> = PersistentVector<T, 8>;

fn elements<T: Clone, const W: usize>(vector: &PersistentVector<T, W>) -> Vec<T> {
    vector.iter().cloned().collect()
}

// =============================================================================
// Builder Aliasing
// =============================================================================

#[rstest]
#[case(5)]
#[case(20)]
#[case(100)]
#[case(600)]
fn test_builder_edits_do_not_leak_into_source(#[case] count: usize) {
    let source: Narrow<usize> = (0..count).collect();

    let mut builder = source.builder();
    for index in (0..count).step_by(3) {
        assert_eq!(builder.set(index, index + 10_000), Ok(index));
    }
    builder.push_back(count);
    builder.insert(0, usize::MAX).unwrap();
    builder.remove(count / 2).unwrap();
    let edited = builder.build();

    assert_eq!(elements(&source), (0..count).collect::<Vec<_>>());
    assert_eq!(edited.len(), count + 1);
    assert_eq!(edited.get(0), Ok(&usize::MAX));
    assert_eq!(edited.get(1), Ok(&10_000));
}

#[rstest]
fn test_builder_after_build_does_not_alias_published_vector() {
    let mut builder: TransientVector<usize, 8> = (0..100).collect();
    let first = builder.build();

    for index in 0..100 {
        builder.set(index, 0).unwrap();
    }
    while builder.len() > 30 {
        builder.pop_back().unwrap();
    }
    let second = builder.build();

    assert_eq!(elements(&first), (0..100).collect::<Vec<_>>());
    assert_eq!(elements(&second), vec![0; 30]);
}

#[rstest]
fn test_two_builders_from_one_vector_are_independent() {
    let source: Narrow<i32> = (0..50).collect();
    let mut left = source.builder();
    let mut right = source.builder();

    left.set(10, -1).unwrap();
    right.set(10, -2).unwrap();
    left.remove(0).unwrap();

    let left = left.persistent();
    let right = right.persistent();
    assert_eq!(left.get(9), Ok(&-1));
    assert_eq!(right.get(10), Ok(&-2));
    assert_eq!(source.get(10), Ok(&10));
}

// =============================================================================
// Idempotent Build
// =============================================================================

#[rstest]
#[case(0)]
#[case(8)]
#[case(9)]
#[case(73)]
fn test_build_without_edits_is_identity(#[case] count: usize) {
    let source: Narrow<usize> = (0..count).collect();
    let mut builder = source.builder();
    let rebuilt = builder.build();
    assert_eq!(rebuilt, source);
    assert_eq!(builder.build(), source);
}

// =============================================================================
// Builder Operations
// =============================================================================

#[rstest]
fn test_builder_results_match_returned_values() {
    let mut builder: TransientVector<&str> = ["a", "b", "c"].into_iter().collect();
    assert_eq!(builder.set(1, "B"), Ok("b"));
    assert_eq!(builder.remove(0), Ok("a"));
    assert_eq!(builder.pop_back(), Ok("c"));
    assert_eq!(builder.len(), 1);
    assert_eq!(builder.get(0), Ok(&"B"));
}

#[rstest]
fn test_builder_errors() {
    let mut builder: TransientVector<i32> = TransientVector::new();
    assert!(builder.is_empty());
    assert_eq!(
        builder.get(0),
        Err(IndexOutOfRange {
            index: 0,
            length: 0
        })
    );
    assert!(builder.set(0, 1).is_err());
    assert!(builder.remove(0).is_err());
    assert!(builder.pop_back().is_err());
    assert!(builder.list_iter(1).is_err());
    assert_eq!(builder.insert(0, 1), Ok(()));
}

#[rstest]
fn test_extend_and_iterate() {
    let mut builder: TransientVector<usize, 4> = TransientVector::default();
    builder.extend(0..50);
    assert_eq!(builder.iter().len(), 50);
    assert_eq!(
        builder.list_iter(50).unwrap().backward().next(),
        Some(&49)
    );
    assert!(builder.height() >= 2);
}

#[rstest]
fn test_builder_remove_all_keeps_prefix() {
    let mut builder: TransientVector<usize, 4> = (0..30).collect();
    assert!(builder.remove_all(|x| *x >= 20));
    assert_eq!(builder.iter().copied().collect::<Vec<_>>(), (0..20).collect::<Vec<_>>());
}
