//! Iterators over the vector family.
//!
//! [`ListIter`] is a bidirectional cursor positioned between elements. It
//! caches the leaf it is reading together with the branch path leading to
//! it, so stepping across a leaf boundary only climbs as far as the nearest
//! ancestor with a sibling in the direction of travel. Runs of `next` or
//! `previous` therefore cost O(1) amortized per element instead of a full
//! root-to-leaf descent.

use std::iter::FusedIterator;

use smallvec::SmallVec;

use super::ReferenceCounter;
use super::buffer::{Buffer, Node};
use super::trie::Trie;

/// Which edge of a subtree a descent lands on.
#[derive(Clone, Copy)]
enum Edge {
    First,
    Last,
}

// =============================================================================
// ListIter
// =============================================================================

/// A bidirectional cursor over a [`PersistentVector`](super::PersistentVector)
/// or a [`TransientVector`](super::TransientVector).
///
/// The cursor sits at a position `0..=len`. [`next`](Iterator::next) returns
/// the element after the position and advances; [`previous`](Self::previous)
/// steps back and returns the element it stepped over.
///
/// # Examples
///
/// ```rust
/// use radix_vector::persistent::PersistentVector;
///
/// let vector: PersistentVector<&str> = ["a", "b", "c"].into_iter().collect();
///
/// let forward: Vec<&str> = vector.iter().copied().collect();
/// assert_eq!(forward, vec!["a", "b", "c"]);
///
/// let mut cursor = vector.list_iter(vector.len()).unwrap();
/// assert_eq!(cursor.previous(), Some(&"c"));
/// assert_eq!(cursor.previous(), Some(&"b"));
/// assert_eq!(cursor.next(), Some(&"b"));
/// ```
pub struct ListIter<'a, T, const WIDTH: usize> {
    trie: &'a Trie<T, WIDTH>,
    /// Position of the cursor.
    index: usize,
    /// First index held by the tail.
    tail_offset: usize,
    /// Branches from the root down to the cached leaf, with the child taken.
    path: SmallVec<[(&'a [Node<T, WIDTH>], usize); 8]>,
    /// Cached trie leaf; empty until the trie is first touched.
    leaf: &'a [T],
    /// Index of `leaf[0]`.
    leaf_start: usize,
}

impl<'a, T, const WIDTH: usize> ListIter<'a, T, WIDTH> {
    /// Positions a cursor at `index`, which must be at most `trie.length`.
    pub(crate) fn new(trie: &'a Trie<T, WIDTH>, index: usize) -> Self {
        Self {
            trie,
            index,
            tail_offset: trie.tail_offset(),
            path: SmallVec::new(),
            leaf: &[],
            leaf_start: 0,
        }
    }

    /// Index of the element the next call to `next` returns.
    #[inline]
    #[must_use]
    pub const fn next_index(&self) -> usize {
        self.index
    }

    /// Index of the element the next call to `previous` returns, if any.
    #[inline]
    #[must_use]
    pub const fn previous_index(&self) -> Option<usize> {
        self.index.checked_sub(1)
    }

    /// Returns `true` if `next` would yield an element.
    #[inline]
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.index < self.trie.length
    }

    /// Returns `true` if `previous` would yield an element.
    #[inline]
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.index > 0
    }

    /// Steps the cursor back by one and returns the element stepped over.
    ///
    /// Returns `None`, leaving the cursor in place, at position `0`.
    pub fn previous(&mut self) -> Option<&'a T> {
        let index = self.index.checked_sub(1)?;
        let element = self.element(index)?;
        self.index = index;
        Some(element)
    }

    /// Turns the cursor into an iterator that walks towards the front.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use radix_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<char> = "abc".chars().collect();
    /// let backward: String = vector
    ///     .list_iter(vector.len())
    ///     .unwrap()
    ///     .backward()
    ///     .collect();
    /// assert_eq!(backward, "cba");
    /// ```
    #[must_use]
    pub const fn backward(self) -> Backward<'a, T, WIDTH> {
        Backward { cursor: self }
    }

    fn element(&mut self, index: usize) -> Option<&'a T> {
        let trie = self.trie;
        if index >= self.tail_offset {
            return trie.tail.slots.get(index - self.tail_offset);
        }
        let offset = index.wrapping_sub(self.leaf_start);
        if offset >= self.leaf.len() {
            if self.leaf.is_empty() {
                self.seek(index);
            } else if offset == self.leaf.len() {
                self.step(Edge::First);
            } else if index + 1 == self.leaf_start {
                self.step(Edge::Last);
            } else {
                self.seek(index);
            }
        }
        self.leaf.get(index.wrapping_sub(self.leaf_start))
    }

    /// Descends from the root to the leaf holding `index`.
    fn seek(&mut self, index: usize) {
        let trie = self.trie;
        self.path.clear();
        self.leaf = &[];
        let Some(mut node) = trie.root.as_ref() else {
            return;
        };
        let mut shift = trie.shift;
        loop {
            match node {
                Node::Leaf(leaf) => {
                    self.leaf = leaf.slots.as_slice();
                    self.leaf_start = index & !Trie::<T, WIDTH>::MASK;
                    return;
                }
                Node::Branch(branch) => {
                    let children = branch.slots.as_slice();
                    let slot = (index >> shift) & Trie::<T, WIDTH>::MASK;
                    let Some(child) = children.get(slot) else {
                        return;
                    };
                    self.path.push((children, slot));
                    node = child;
                    shift = shift.saturating_sub(Trie::<T, WIDTH>::BITS);
                }
            }
        }
    }

    /// Moves the cached leaf to its neighbour on the `edge` side of travel:
    /// `First` moves right, `Last` moves left.
    fn step(&mut self, edge: Edge) {
        while let Some((children, slot)) = self.path.pop() {
            let sibling = match edge {
                Edge::First => slot + 1,
                Edge::Last => match slot.checked_sub(1) {
                    Some(sibling) => sibling,
                    None => continue,
                },
            };
            if let Some(node) = children.get(sibling) {
                self.path.push((children, sibling));
                self.descend(node, edge);
                self.leaf_start = match edge {
                    Edge::First => self.leaf_start + WIDTH,
                    Edge::Last => self.leaf_start - WIDTH,
                };
                return;
            }
        }
        self.leaf = &[];
    }

    fn descend(&mut self, mut node: &'a Node<T, WIDTH>, edge: Edge) {
        loop {
            match node {
                Node::Leaf(leaf) => {
                    self.leaf = leaf.slots.as_slice();
                    return;
                }
                Node::Branch(branch) => {
                    let children = branch.slots.as_slice();
                    let slot = match edge {
                        Edge::First => 0,
                        Edge::Last => children.len().saturating_sub(1),
                    };
                    let Some(child) = children.get(slot) else {
                        self.leaf = &[];
                        return;
                    };
                    self.path.push((children, slot));
                    node = child;
                }
            }
        }
    }
}

impl<'a, T, const WIDTH: usize> Iterator for ListIter<'a, T, WIDTH> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.trie.length {
            return None;
        }
        let element = self.element(self.index)?;
        self.index += 1;
        Some(element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.trie.length - self.index;
        (remaining, Some(remaining))
    }
}

impl<T, const WIDTH: usize> ExactSizeIterator for ListIter<'_, T, WIDTH> {}

impl<T, const WIDTH: usize> FusedIterator for ListIter<'_, T, WIDTH> {}

// =============================================================================
// Backward
// =============================================================================

/// An iterator calling [`ListIter::previous`] until the front is reached.
pub struct Backward<'a, T, const WIDTH: usize> {
    cursor: ListIter<'a, T, WIDTH>,
}

impl<'a, T, const WIDTH: usize> Backward<'a, T, WIDTH> {
    /// Returns the underlying cursor at its current position.
    #[must_use]
    pub fn into_cursor(self) -> ListIter<'a, T, WIDTH> {
        self.cursor
    }
}

impl<'a, T, const WIDTH: usize> Iterator for Backward<'a, T, WIDTH> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.previous()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.cursor.index, Some(self.cursor.index))
    }
}

impl<T, const WIDTH: usize> ExactSizeIterator for Backward<'_, T, WIDTH> {}

impl<T, const WIDTH: usize> FusedIterator for Backward<'_, T, WIDTH> {}

// =============================================================================
// IntoIter
// =============================================================================

/// An owning iterator over a [`PersistentVector`](super::PersistentVector).
///
/// Buffers may still be shared with other vectors, so elements are cloned
/// out of them. The leaf being read is held by reference count and replaced
/// only at leaf boundaries.
pub struct IntoIter<T, const WIDTH: usize> {
    trie: Trie<T, WIDTH>,
    index: usize,
    leaf: Option<ReferenceCounter<Buffer<T, WIDTH>>>,
    leaf_start: usize,
}

impl<T, const WIDTH: usize> IntoIter<T, WIDTH> {
    pub(crate) const fn new(trie: Trie<T, WIDTH>) -> Self {
        Self {
            trie,
            index: 0,
            leaf: None,
            leaf_start: 0,
        }
    }
}

impl<T: Clone, const WIDTH: usize> Iterator for IntoIter<T, WIDTH> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.trie.length {
            return None;
        }
        let offset = self.index - self.leaf_start;
        if self
            .leaf
            .as_ref()
            .is_none_or(|leaf| offset >= leaf.slots.len())
        {
            self.leaf_start = self.index & !Trie::<T, WIDTH>::MASK;
            self.leaf = Some(self.trie.leaf_buffer(self.index).clone());
        }
        let element = self
            .leaf
            .as_ref()
            .and_then(|leaf| leaf.slots.get(self.index - self.leaf_start))
            .cloned();
        self.index += 1;
        element
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.trie.length - self.index;
        (remaining, Some(remaining))
    }
}

impl<T: Clone, const WIDTH: usize> ExactSizeIterator for IntoIter<T, WIDTH> {}

impl<T: Clone, const WIDTH: usize> FusedIterator for IntoIter<T, WIDTH> {}
