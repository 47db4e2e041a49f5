//! Persistent (immutable) vector based on a bit-partitioned trie.
//!
//! This module provides [`PersistentVector`], an immutable dynamic array
//! that uses structural sharing for efficient operations.
//!
//! # Overview
//!
//! `PersistentVector` is a `WIDTH`-way branching trie (32 by default) in the
//! style of Bagwell's and Clojure's vectors. It provides:
//!
//! - O(log_WIDTH N) random access and update
//! - amortized O(1) `push_back` and `pop_back` thanks to the tail buffer
//! - O(N) `insert` and `remove` at arbitrary positions, touching only the
//!   buffers at or after the edit point
//! - O(1) `len`, `is_empty` and `builder`
//!
//! All operations return new vectors without modifying the original,
//! and structural sharing ensures memory efficiency.
//!
//! # Internal Structure
//!
//! The vector consists of:
//! - An optional root node (absent while the vector fits in one buffer)
//! - A tail buffer (1 to `WIDTH` elements, empty only for the empty vector)
//!
//! # Examples
//!
//! ```rust
//! use radix_vector::persistent::PersistentVector;
//!
//! let vector: PersistentVector<i32> = PersistentVector::new()
//!     .push_back(1)
//!     .push_back(2)
//!     .push_back(3);
//!
//! assert_eq!(vector.get(0), Ok(&1));
//! assert_eq!(vector.get(2), Ok(&3));
//!
//! // Structural sharing: the original vector is preserved
//! let extended = vector.push_back(4);
//! assert_eq!(vector.len(), 3);     // Original unchanged
//! assert_eq!(extended.len(), 4);   // New vector
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Index;

use super::DEFAULT_WIDTH;
use super::buffer::Edit;
use super::error::IndexOutOfRange;
use super::iterator::{IntoIter, ListIter};
use super::transient::TransientVector;
use super::trie::Trie;

// =============================================================================
// PersistentVector Definition
// =============================================================================

/// A persistent (immutable) vector based on a bit-partitioned trie.
///
/// `PersistentVector` is an immutable data structure that provides efficient
/// random access, append and update through structural sharing. Every
/// operation leaves the receiver untouched and returns a new vector that
/// shares every buffer off the edited path with it.
///
/// `WIDTH` is the branching factor. It must be a power of two and at least
/// 2; other values fail to compile.
///
/// # Time Complexity
///
/// | Operation     | Complexity                 |
/// |---------------|----------------------------|
/// | `new`         | O(1)                       |
/// | `get`         | O(log_WIDTH N)             |
/// | `set`         | O(log_WIDTH N)             |
/// | `push_back`   | O(log_WIDTH N), amortized O(1) |
/// | `pop_back`    | O(log_WIDTH N), amortized O(1) |
/// | `insert`      | O(N)                       |
/// | `remove`      | O(N)                       |
/// | `len`         | O(1)                       |
/// | `builder`     | O(1)                       |
///
/// # Examples
///
/// ```rust
/// use radix_vector::persistent::PersistentVector;
///
/// let vector: PersistentVector<i32> = (0..100).collect();
/// assert_eq!(vector.len(), 100);
/// assert_eq!(vector.get(50), Ok(&50));
/// ```
pub struct PersistentVector<T, const WIDTH: usize = DEFAULT_WIDTH> {
    trie: Trie<T, WIDTH>,
}

impl<T, const WIDTH: usize> PersistentVector<T, WIDTH> {
    pub(crate) const fn from_trie(trie: Trie<T, WIDTH>) -> Self {
        Self { trie }
    }

    /// Creates a new empty vector.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use radix_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = PersistentVector::new();
    /// assert!(vector.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::from_trie(Trie::empty(Edit::Persistent))
    }

    /// Returns the number of elements in the vector.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.trie.length
    }

    /// Returns `true` if the vector contains no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.trie.length == 0
    }

    /// Returns the number of branch levels above the leaves.
    ///
    /// A vector of at most `2 * WIDTH` elements has height 0: either no trie
    /// at all (everything in the tail) or a single leaf plus the tail.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use radix_vector::persistent::PersistentVector;
    ///
    /// let small: PersistentVector<i32, 8> = (0..16).collect();
    /// assert_eq!(small.height(), 0);
    ///
    /// let grown = small.push_back(16);
    /// assert_eq!(grown.height(), 1);
    /// ```
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.trie.height()
    }

    /// Returns a reference to the element at the given index.
    ///
    /// # Arguments
    ///
    /// * `index` - The zero-based index of the element
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfRange`] if `index >= len()`.
    ///
    /// # Complexity
    ///
    /// O(log_WIDTH N); O(1) for elements held by the tail.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use radix_vector::persistent::{IndexOutOfRange, PersistentVector};
    ///
    /// let vector: PersistentVector<i32> = (1..=5).collect();
    /// assert_eq!(vector.get(0), Ok(&1));
    /// assert_eq!(vector.get(4), Ok(&5));
    /// assert_eq!(vector.get(5), Err(IndexOutOfRange { index: 5, length: 5 }));
    /// ```
    pub fn get(&self, index: usize) -> Result<&T, IndexOutOfRange> {
        self.trie.get(index).ok_or(IndexOutOfRange {
            index,
            length: self.len(),
        })
    }

    /// Returns the first element, or `None` if the vector is empty.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.trie.get(0)
    }

    /// Returns the last element, or `None` if the vector is empty.
    ///
    /// # Complexity
    ///
    /// O(1): the last element always lives in the tail.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.trie.tail.slots.last()
    }

    /// Returns a cursor positioned before the first element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use radix_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=3).collect();
    /// let doubled: Vec<i32> = vector.iter().map(|x| x * 2).collect();
    /// assert_eq!(doubled, vec![2, 4, 6]);
    /// ```
    pub fn iter(&self) -> ListIter<'_, T, WIDTH> {
        ListIter::new(&self.trie, 0)
    }

    /// Returns a bidirectional cursor positioned before the element at
    /// `start`.
    ///
    /// `start == len()` positions the cursor after the last element, ready
    /// for a backward walk.
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfRange`] if `start > len()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use radix_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<&str> = ["a", "b", "c"].into_iter().collect();
    /// let mut cursor = vector.list_iter(1).unwrap();
    /// assert_eq!(cursor.previous(), Some(&"a"));
    /// assert_eq!(cursor.next(), Some(&"a"));
    /// assert_eq!(cursor.next(), Some(&"b"));
    /// ```
    pub fn list_iter(&self, start: usize) -> Result<ListIter<'_, T, WIDTH>, IndexOutOfRange> {
        IndexOutOfRange::check_position(start, self.len())?;
        Ok(ListIter::new(&self.trie, start))
    }

    /// Returns the index of the first element equal to `element`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use radix_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<char> = "abcabc".chars().collect();
    /// assert_eq!(vector.index_of(&'b'), Some(1));
    /// assert_eq!(vector.index_of(&'z'), None);
    /// ```
    pub fn index_of(&self, element: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.iter().position(|candidate| candidate == element)
    }

    /// Returns the index of the last element equal to `element`, scanning
    /// backward from the end.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use radix_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<char> = "abcabc".chars().collect();
    /// assert_eq!(vector.last_index_of(&'b'), Some(4));
    /// ```
    pub fn last_index_of(&self, element: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        let mut cursor = ListIter::new(&self.trie, self.len());
        while let Some(candidate) = cursor.previous() {
            if candidate == element {
                return Some(cursor.next_index());
            }
        }
        None
    }

    /// Returns `true` if the vector contains an element equal to `element`.
    pub fn contains(&self, element: &T) -> bool
    where
        T: PartialEq,
    {
        self.index_of(element).is_some()
    }

    /// Returns a builder holding this vector's contents.
    ///
    /// No buffer is copied until the builder first writes to it, and the
    /// builder never writes to a buffer this vector can see.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use radix_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (0..5).collect();
    /// let mut builder = vector.builder();
    /// builder.push_back(5);
    /// builder.set(0, 100).unwrap();
    ///
    /// let edited = builder.persistent();
    /// assert_eq!(vector.get(0), Ok(&0));
    /// assert_eq!(edited.get(0), Ok(&100));
    /// assert_eq!(edited.len(), 6);
    /// ```
    #[must_use]
    pub fn builder(&self) -> TransientVector<T, WIDTH> {
        TransientVector::from_trie(self.trie.clone())
    }
}

impl<T: Clone, const WIDTH: usize> PersistentVector<T, WIDTH> {
    /// Creates a vector containing a single element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use radix_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = PersistentVector::singleton(42);
    /// assert_eq!(vector.len(), 1);
    /// assert_eq!(vector.get(0), Ok(&42));
    /// ```
    #[must_use]
    pub fn singleton(element: T) -> Self {
        Self::new().push_back(element)
    }

    fn edited<R>(&self, edit: impl FnOnce(&mut Trie<T, WIDTH>) -> R) -> Self {
        let mut trie = self.trie.clone();
        edit(&mut trie);
        Self::from_trie(trie)
    }

    /// Appends an element to the back of the vector.
    ///
    /// Returns a new vector with the element at the end.
    ///
    /// # Arguments
    ///
    /// * `element` - The element to append
    ///
    /// # Complexity
    ///
    /// O(log_WIDTH N), amortized O(1): only every `WIDTH`-th append copies a
    /// path of the trie.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use radix_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = PersistentVector::new()
    ///     .push_back(1)
    ///     .push_back(2)
    ///     .push_back(3);
    ///
    /// assert_eq!(vector.len(), 3);
    /// assert_eq!(vector.get(2), Ok(&3));
    /// ```
    #[must_use]
    pub fn push_back(&self, element: T) -> Self {
        self.edited(|trie| trie.push_back(Edit::Persistent, element))
    }

    /// Appends every element of `elements` through a single builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use radix_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (0..3).collect();
    /// let extended = vector.push_back_many(3..6);
    /// assert_eq!(extended.iter().copied().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4, 5]);
    /// ```
    #[must_use]
    pub fn push_back_many<I>(&self, elements: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        self.mutate(|builder| builder.extend(elements))
    }

    /// Replaces the element at `index`.
    ///
    /// Only the buffers on the path from the root to the target leaf are
    /// copied; every other buffer is shared with `self`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfRange`] if `index >= len()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use radix_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (0..100).collect();
    /// let updated = vector.set(50, 999).unwrap();
    /// assert_eq!(vector.get(50), Ok(&50));
    /// assert_eq!(updated.get(50), Ok(&999));
    /// assert!(vector.set(100, 0).is_err());
    /// ```
    pub fn set(&self, index: usize, element: T) -> Result<Self, IndexOutOfRange> {
        IndexOutOfRange::check_element(index, self.len())?;
        Ok(self.edited(|trie| trie.set(Edit::Persistent, index, element)))
    }

    /// Inserts `element` at `index`, shifting every later element one
    /// position to the right.
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfRange`] if `index > len()`.
    ///
    /// # Complexity
    ///
    /// O(N - index): leaves entirely before `index` stay shared.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use radix_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = [1, 3].into_iter().collect();
    /// let inserted = vector.insert(1, 2).unwrap();
    /// assert_eq!(inserted.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    /// ```
    pub fn insert(&self, index: usize, element: T) -> Result<Self, IndexOutOfRange> {
        IndexOutOfRange::check_position(index, self.len())?;
        Ok(self.edited(|trie| trie.insert(Edit::Persistent, index, element)))
    }

    /// Inserts every element of `elements` at `index`, in order.
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfRange`] if `index > len()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use radix_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = [0, 4].into_iter().collect();
    /// let filled = vector.insert_all(1, [1, 2, 3]).unwrap();
    /// assert_eq!(filled.iter().copied().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
    /// ```
    pub fn insert_all<I>(&self, index: usize, elements: I) -> Result<Self, IndexOutOfRange>
    where
        I: IntoIterator<Item = T>,
    {
        let mut builder = self.builder();
        builder.insert_all(index, elements)?;
        Ok(builder.persistent())
    }

    /// Removes the element at `index`, shifting every later element one
    /// position to the left.
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfRange`] if `index >= len()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use radix_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (0..5).collect();
    /// let removed = vector.remove(1).unwrap();
    /// assert_eq!(removed.iter().copied().collect::<Vec<_>>(), vec![0, 2, 3, 4]);
    /// ```
    pub fn remove(&self, index: usize) -> Result<Self, IndexOutOfRange> {
        IndexOutOfRange::check_element(index, self.len())?;
        Ok(self.edited(|trie| trie.remove(Edit::Persistent, index)))
    }

    /// Removes the last element.
    ///
    /// When the tail runs empty, the rightmost leaf of the trie becomes the
    /// new tail and the trie loses a level if its root is left with a single
    /// child.
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfRange`] (with `index` and `length` both `0`) if the
    /// vector is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use radix_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (0..3).collect();
    /// let shorter = vector.pop_back().unwrap();
    /// assert_eq!(shorter.last(), Some(&1));
    /// assert!(PersistentVector::<i32>::new().pop_back().is_err());
    /// ```
    pub fn pop_back(&self) -> Result<Self, IndexOutOfRange> {
        let index = self
            .len()
            .checked_sub(1)
            .ok_or(IndexOutOfRange { index: 0, length: 0 })?;
        Ok(self.edited(|trie| trie.remove(Edit::Persistent, index)))
    }

    /// Removes every element matching `predicate`.
    ///
    /// Returns a clone of `self` sharing all buffers when nothing matched.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use radix_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (0..10).collect();
    /// let odd = vector.remove_all(|x| x % 2 == 0);
    /// assert_eq!(odd.iter().copied().collect::<Vec<_>>(), vec![1, 3, 5, 7, 9]);
    /// ```
    #[must_use]
    pub fn remove_all<P>(&self, predicate: P) -> Self
    where
        P: FnMut(&T) -> bool,
    {
        let mut builder = self.builder();
        if builder.remove_all(predicate) {
            builder.persistent()
        } else {
            self.clone()
        }
    }

    /// Runs `mutation` against a builder of this vector and returns the
    /// result.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use radix_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (0..3).collect();
    /// let edited = vector.mutate(|builder| {
    ///     builder.push_back(3);
    ///     builder.remove(0).unwrap();
    /// });
    /// assert_eq!(edited.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    /// ```
    #[must_use]
    pub fn mutate<F>(&self, mutation: F) -> Self
    where
        F: FnOnce(&mut TransientVector<T, WIDTH>),
    {
        let mut builder = self.builder();
        mutation(&mut builder);
        builder.persistent()
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T, const WIDTH: usize> Clone for PersistentVector<T, WIDTH> {
    fn clone(&self) -> Self {
        Self::from_trie(self.trie.clone())
    }
}

impl<T, const WIDTH: usize> Default for PersistentVector<T, WIDTH> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, const WIDTH: usize> FromIterator<T> for PersistentVector<T, WIDTH> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        iter.into_iter()
            .collect::<TransientVector<T, WIDTH>>()
            .persistent()
    }
}

impl<'a, T, const WIDTH: usize> IntoIterator for &'a PersistentVector<T, WIDTH> {
    type Item = &'a T;
    type IntoIter = ListIter<'a, T, WIDTH>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Clone, const WIDTH: usize> IntoIterator for PersistentVector<T, WIDTH> {
    type Item = T;
    type IntoIter = IntoIter<T, WIDTH>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.trie)
    }
}

impl<T: PartialEq, const WIDTH: usize> PartialEq for PersistentVector<T, WIDTH> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq, const WIDTH: usize> Eq for PersistentVector<T, WIDTH> {}

/// Computes a hash value for this vector.
///
/// The hash is computed by first hashing the length, then hashing each
/// element in order, so equal vectors produce equal hash values.
///
/// # Examples
///
/// ```rust
/// use radix_vector::persistent::PersistentVector;
/// use std::collections::HashMap;
///
/// let mut map: HashMap<PersistentVector<i32>, &str> = HashMap::new();
/// let key: PersistentVector<i32> = (1..=3).collect();
/// map.insert(key.clone(), "value");
/// assert_eq!(map.get(&key), Some(&"value"));
/// ```
impl<T: Hash, const WIDTH: usize> Hash for PersistentVector<T, WIDTH> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for element in self {
            element.hash(state);
        }
    }
}

impl<T: fmt::Debug, const WIDTH: usize> fmt::Debug for PersistentVector<T, WIDTH> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display, const WIDTH: usize> fmt::Display for PersistentVector<T, WIDTH> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "[")?;
        let mut first = true;
        for element in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{element}")?;
        }
        write!(formatter, "]")
    }
}

/// Panicking element access.
///
/// # Panics
///
/// Panics with the [`IndexOutOfRange`] message if `index >= len()`. Use
/// [`PersistentVector::get`] for a checked read.
impl<T, const WIDTH: usize> Index<usize> for PersistentVector<T, WIDTH> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        match self.get(index) {
            Ok(element) => element,
            Err(error) => panic!("{error}"),
        }
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<T: serde::Serialize, const WIDTH: usize> serde::Serialize for PersistentVector<T, WIDTH> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for element in self {
            seq.serialize_element(element)?;
        }
        seq.end()
    }
}

#[cfg(feature = "serde")]
struct PersistentVectorVisitor<T, const WIDTH: usize> {
    marker: std::marker::PhantomData<T>,
}

#[cfg(feature = "serde")]
impl<T, const WIDTH: usize> PersistentVectorVisitor<T, WIDTH> {
    const fn new() -> Self {
        Self {
            marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, T, const WIDTH: usize> serde::de::Visitor<'de> for PersistentVectorVisitor<T, WIDTH>
where
    T: serde::Deserialize<'de> + Clone,
{
    type Value = PersistentVector<T, WIDTH>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut builder = TransientVector::new();
        while let Some(element) = seq.next_element()? {
            builder.push_back(element);
        }
        Ok(builder.persistent())
    }
}

#[cfg(feature = "serde")]
impl<'de, T, const WIDTH: usize> serde::Deserialize<'de> for PersistentVector<T, WIDTH>
where
    T: serde::Deserialize<'de> + Clone,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(PersistentVectorVisitor::new())
    }
}

// =============================================================================
// Tests
// =============================================================================


// =============================================================================
// Thread Safety Tests (arc feature only)
// =============================================================================


#[cfg(all(test, feature = "arc"))]
mod multithread_tests {
    use super::*;
    use rstest::rstest;
    use std::thread;

    #[rstest]
    fn test_vector_shared_across_threads() {
        let vector: PersistentVector<i32> = (0..10000).collect();

        let vector1 = vector.clone();
        let vector2 = vector;

        let handle1 = thread::spawn(move || vector1.iter().sum::<i32>());
        let handle2 = thread::spawn(move || vector2.iter().sum::<i32>());

        let sum1 = handle1.join().unwrap();
        let sum2 = handle2.join().unwrap();

        assert_eq!(sum1, sum2);
        assert_eq!(sum1, (0..10000).sum::<i32>());
    }

    #[rstest]
    fn test_divergent_edits_in_parallel() {
        let vector: PersistentVector<usize> = (0..5000).collect();

        let handles: Vec<_> = (0..4)
            .map(|thread_id| {
                let source = vector.clone();
                thread::spawn(move || {
                    let mut edited = source;
                    for index in (thread_id..5000).step_by(4) {
                        edited = edited.set(index, index * 10).unwrap();
                    }
                    edited
                })
            })
            .collect();

        for (thread_id, handle) in handles.into_iter().enumerate() {
            let edited = handle.join().unwrap();
            assert_eq!(edited.get(thread_id), Ok(&(thread_id * 10)));
            assert_eq!(edited.get(thread_id + 1), Ok(&(thread_id + 1)));
        }
        assert_eq!(vector.iter().copied().sum::<usize>(), (0..5000).sum::<usize>());
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_serialize_as_sequence() {
        let vector: PersistentVector<i32> = (1..=3).collect();
        let json = serde_json::to_string(&vector).unwrap();
        assert_eq!(json, "[1,2,3]");
    }

    #[rstest]
    fn test_deserialize_spanning_trie_and_tail() {
        let json = serde_json::to_string(&(0..40).collect::<Vec<i32>>()).unwrap();
        let vector: PersistentVector<i32, 8> = serde_json::from_str(&json).unwrap();
        assert_eq!(vector.len(), 40);
        assert_eq!(vector.get(39), Ok(&39));
    }

    #[rstest]
    fn test_deserialize_rejects_non_sequence() {
        let result: Result<PersistentVector<i32>, _> = serde_json::from_str("{\"a\": 1}");
        assert!(result.is_err());
    }
}
