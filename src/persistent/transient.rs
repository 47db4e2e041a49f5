//! Transient (mutable) builder for [`PersistentVector`].
//!
//! A [`TransientVector`] runs the same trie algorithms as the persistent
//! vector but writes in place to every buffer stamped with its ownership
//! token. Buffers it does not own (shared with the vector it came from, or
//! published by an earlier [`build`](TransientVector::build)) are copied
//! and stamped on first write, so a batch of `k` edits pays for each copied
//! buffer once instead of once per edit.
//!
//! # Examples
//!
//! ```rust
//! use radix_vector::persistent::{PersistentVector, TransientVector};
//!
//! let mut builder: TransientVector<i32> = TransientVector::new();
//! for element in 0..1000 {
//!     builder.push_back(element);
//! }
//! let vector: PersistentVector<i32> = builder.persistent();
//! assert_eq!(vector.len(), 1000);
//! ```

use std::fmt;

use super::DEFAULT_WIDTH;
use super::buffer::{Edit, OwnerToken, fresh_owner};
use super::error::IndexOutOfRange;
use super::iterator::ListIter;
use super::trie::Trie;
use super::vector::PersistentVector;

/// A mutable vector that publishes [`PersistentVector`] snapshots.
///
/// Obtain one from [`PersistentVector::builder`] or [`TransientVector::new`].
/// A builder is a single-writer value: `&mut self` on every mutator makes
/// concurrent writes impossible without external synchronization.
///
/// # Examples
///
/// ```rust
/// use radix_vector::persistent::PersistentVector;
///
/// let vector: PersistentVector<i32> = (0..10).collect();
/// let mut builder = vector.builder();
/// assert_eq!(builder.set(0, 100), Ok(0));
/// assert_eq!(builder.remove(9), Ok(9));
///
/// let edited = builder.build();
/// assert_eq!(vector.get(0), Ok(&0));
/// assert_eq!(edited.get(0), Ok(&100));
/// assert_eq!(edited.len(), 9);
/// ```
pub struct TransientVector<T, const WIDTH: usize = DEFAULT_WIDTH> {
    trie: Trie<T, WIDTH>,
    owner: OwnerToken,
}

impl<T, const WIDTH: usize> TransientVector<T, WIDTH> {
    /// Wraps `trie` with a fresh owner, so none of its buffers are writable
    /// in place yet.
    pub(crate) fn from_trie(trie: Trie<T, WIDTH>) -> Self {
        Self {
            trie,
            owner: fresh_owner(),
        }
    }

    /// Creates a new empty builder.
    #[must_use]
    pub fn new() -> Self {
        let owner = fresh_owner();
        Self {
            trie: Trie::empty(Edit::Transient(&owner)),
            owner,
        }
    }

    /// Returns the number of elements in the builder.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.trie.length
    }

    /// Returns `true` if the builder contains no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.trie.length == 0
    }

    /// Returns the number of branch levels above the leaves.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.trie.height()
    }

    /// Returns a reference to the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfRange`] if `index >= len()`.
    pub fn get(&self, index: usize) -> Result<&T, IndexOutOfRange> {
        self.trie.get(index).ok_or(IndexOutOfRange {
            index,
            length: self.len(),
        })
    }

    /// Returns a cursor over the current contents.
    pub fn iter(&self) -> ListIter<'_, T, WIDTH> {
        ListIter::new(&self.trie, 0)
    }

    /// Returns a bidirectional cursor positioned before the element at
    /// `start`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfRange`] if `start > len()`.
    pub fn list_iter(&self, start: usize) -> Result<ListIter<'_, T, WIDTH>, IndexOutOfRange> {
        IndexOutOfRange::check_position(start, self.len())?;
        Ok(ListIter::new(&self.trie, start))
    }

    /// Publishes the current contents as a [`PersistentVector`] and keeps
    /// the builder usable.
    ///
    /// The builder switches to a fresh ownership token first, so its next
    /// write to any buffer the returned vector can see copies that buffer.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use radix_vector::persistent::TransientVector;
    ///
    /// let mut builder: TransientVector<i32> = (0..3).collect();
    /// let first = builder.build();
    /// builder.push_back(3);
    /// let second = builder.build();
    ///
    /// assert_eq!(first.len(), 3);
    /// assert_eq!(second.len(), 4);
    /// ```
    pub fn build(&mut self) -> PersistentVector<T, WIDTH> {
        tracing::trace!(length = self.trie.length, "transient vector published");
        self.owner = fresh_owner();
        PersistentVector::from_trie(self.trie.clone())
    }

    /// Consumes the builder and returns its contents as a
    /// [`PersistentVector`].
    #[must_use]
    pub fn persistent(self) -> PersistentVector<T, WIDTH> {
        tracing::trace!(length = self.trie.length, "transient vector published");
        PersistentVector::from_trie(self.trie)
    }
}

impl<T: Clone, const WIDTH: usize> TransientVector<T, WIDTH> {
    /// Appends an element.
    pub fn push_back(&mut self, element: T) {
        self.trie.push_back(Edit::Transient(&self.owner), element);
    }

    /// Inserts `element` at `index`, shifting later elements to the right.
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfRange`] if `index > len()`; the builder is left
    /// unchanged.
    pub fn insert(&mut self, index: usize, element: T) -> Result<(), IndexOutOfRange> {
        IndexOutOfRange::check_position(index, self.len())?;
        self.trie.insert(Edit::Transient(&self.owner), index, element);
        Ok(())
    }

    /// Inserts every element of `elements` at `index`, in order.
    ///
    /// The suffix after `index` is popped off, the new elements appended and
    /// the suffix pushed back, so the cost is linear in the suffix plus the
    /// number of inserted elements.
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfRange`] if `index > len()`; the builder is left
    /// unchanged.
    pub fn insert_all<I>(&mut self, index: usize, elements: I) -> Result<(), IndexOutOfRange>
    where
        I: IntoIterator<Item = T>,
    {
        IndexOutOfRange::check_position(index, self.len())?;
        let suffix = self.split_off(index);
        self.extend(elements);
        self.extend(suffix.into_iter().rev());
        Ok(())
    }

    /// Replaces the element at `index` and returns the previous one.
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfRange`] if `index >= len()`.
    pub fn set(&mut self, index: usize, element: T) -> Result<T, IndexOutOfRange> {
        IndexOutOfRange::check_element(index, self.len())?;
        Ok(self.trie.set(Edit::Transient(&self.owner), index, element))
    }

    /// Removes and returns the element at `index`, shifting later elements
    /// to the left.
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfRange`] if `index >= len()`.
    pub fn remove(&mut self, index: usize) -> Result<T, IndexOutOfRange> {
        IndexOutOfRange::check_element(index, self.len())?;
        Ok(self.trie.remove(Edit::Transient(&self.owner), index))
    }

    /// Removes and returns the last element.
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfRange`] (with `index` and `length` both `0`) if the
    /// builder is empty.
    pub fn pop_back(&mut self) -> Result<T, IndexOutOfRange> {
        let index = self
            .len()
            .checked_sub(1)
            .ok_or(IndexOutOfRange { index: 0, length: 0 })?;
        Ok(self.trie.remove(Edit::Transient(&self.owner), index))
    }

    /// Removes every element matching `predicate` and returns whether any
    /// element was removed.
    ///
    /// Elements before the first match are not touched. `predicate` is
    /// called exactly once per element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use radix_vector::persistent::TransientVector;
    ///
    /// let mut builder: TransientVector<i32> = (0..6).collect();
    /// assert!(builder.remove_all(|x| x % 2 == 1));
    /// assert!(!builder.remove_all(|x| *x > 10));
    /// assert_eq!(builder.iter().copied().collect::<Vec<_>>(), vec![0, 2, 4]);
    /// ```
    pub fn remove_all<P>(&mut self, mut predicate: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        let Some(first) = self.iter().position(&mut predicate) else {
            return false;
        };
        let mut suffix = self.split_off(first);
        suffix.pop();
        while let Some(element) = suffix.pop() {
            if !predicate(&element) {
                self.push_back(element);
            }
        }
        true
    }

    /// Pops every element from `index` on, returning them last-first.
    fn split_off(&mut self, index: usize) -> Vec<T> {
        let mut suffix = Vec::with_capacity(self.trie.length - index);
        while self.trie.length > index {
            let last = self.trie.length - 1;
            suffix.push(self.trie.remove(Edit::Transient(&self.owner), last));
        }
        suffix
    }
}

impl<T, const WIDTH: usize> Default for TransientVector<T, WIDTH> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, const WIDTH: usize> Extend<T> for TransientVector<T, WIDTH> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for element in iter {
            self.push_back(element);
        }
    }
}

impl<T: Clone, const WIDTH: usize> FromIterator<T> for TransientVector<T, WIDTH> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut builder = Self::new();
        builder.extend(iter);
        builder
    }
}

impl<T: fmt::Debug, const WIDTH: usize> fmt::Debug for TransientVector<T, WIDTH> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistent::ReferenceCounter;
    use crate::persistent::trie::tests::assert_well_formed;
    use rstest::rstest;

    fn elements<T: Clone, const WIDTH: usize>(builder: &TransientVector<T, WIDTH>) -> Vec<T> {
        builder.iter().cloned().collect()
    }

    #[rstest]
    fn test_owned_tail_is_written_in_place() {
        let mut builder: TransientVector<i32, 8> = (0..3).collect();
        let tail = ReferenceCounter::as_ptr(&builder.trie.tail);
        builder.push_back(3);
        builder.set(0, 10).unwrap();
        assert_eq!(ReferenceCounter::as_ptr(&builder.trie.tail), tail);
    }

    #[rstest]
    fn test_first_write_copies_shared_buffer_once() {
        let vector: PersistentVector<i32, 8> = (0..3).collect();
        let mut builder = vector.builder();

        builder.push_back(3);
        let copied = ReferenceCounter::as_ptr(&builder.trie.tail);
        builder.push_back(4);

        assert_eq!(ReferenceCounter::as_ptr(&builder.trie.tail), copied);
        assert_eq!(vector.len(), 3);
        assert_eq!(vector.iter().copied().collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[rstest]
    fn test_build_installs_fresh_owner() {
        let mut builder: TransientVector<i32, 8> = (0..3).collect();
        let published = builder.build();

        builder.set(0, 100).unwrap();

        assert_eq!(published.get(0), Ok(&0));
        assert_eq!(builder.get(0), Ok(&100));
    }

    #[rstest]
    fn test_mirrors_vec_model() {
        let mut builder: TransientVector<usize, 4> = TransientVector::new();
        let mut model = Vec::new();
        for element in 0..60 {
            builder.push_back(element);
            model.push(element);
        }
        for (index, element) in [(0, 100), (31, 101), (60, 102), (17, 103)] {
            builder.insert(index, element).unwrap();
            model.insert(index, element);
            assert_well_formed(&builder.trie);
        }
        for index in [63, 0, 20, 40] {
            assert_eq!(builder.remove(index), Ok(model.remove(index)));
            assert_well_formed(&builder.trie);
        }
        assert_eq!(builder.set(5, 500), Ok(std::mem::replace(&mut model[5], 500)));
        assert_eq!(builder.pop_back().ok(), model.pop());
        assert_eq!(elements(&builder), model);
    }

    #[rstest]
    fn test_out_of_range_leaves_builder_untouched() {
        let mut builder: TransientVector<i32> = (0..3).collect();
        assert_eq!(
            builder.set(3, 0),
            Err(IndexOutOfRange {
                index: 3,
                length: 3
            })
        );
        assert!(builder.insert(4, 0).is_err());
        assert!(builder.insert_all(4, [0]).is_err());
        assert!(builder.remove(3).is_err());
        assert_eq!(elements(&builder), vec![0, 1, 2]);

        let mut empty: TransientVector<i32> = TransientVector::new();
        assert!(empty.pop_back().is_err());
    }

    #[rstest]
    fn test_remove_all_calls_predicate_once_per_element() {
        let mut builder: TransientVector<usize, 4> = (0..40).collect();
        let mut calls = 0;
        let removed = builder.remove_all(|x| {
            calls += 1;
            *x >= 10 && x % 2 == 0
        });
        assert!(removed);
        assert_eq!(calls, 40);
        assert_eq!(
            elements(&builder),
            (0..40)
                .filter(|x| *x < 10 || x % 2 == 1)
                .collect::<Vec<_>>()
        );
        assert_well_formed(&builder.trie);
    }

    #[rstest]
    fn test_insert_all_at_end_and_front() {
        let mut builder: TransientVector<usize, 4> = (0..10).collect();
        builder.insert_all(10, [10, 11]).unwrap();
        builder.insert_all(0, [100, 101]).unwrap();
        let mut expected = vec![100, 101];
        expected.extend(0..12);
        assert_eq!(elements(&builder), expected);
    }

    #[rstest]
    fn test_debug() {
        let builder: TransientVector<i32> = (1..=2).collect();
        assert_eq!(format!("{builder:?}"), "[1, 2]");
    }
}
