//! The bit-partitioned trie shared by the persistent and transient vectors.
//!
//! A [`Trie`] is the four-field state of a vector: an optional root node,
//! the tail buffer, the element count and the shift of the root level. All
//! structural algorithms live here and take an [`Edit`] that decides how a
//! buffer becomes writable, so the immutable vector (path copying) and the
//! transient vector (in-place mutation of owned buffers) run the same code.
//!
//! # Shape
//!
//! - `length <= WIDTH`: no root, every element lives in the tail (flat form).
//! - otherwise the root covers `tail_offset()` elements, a multiple of
//!   `WIDTH`, in full leaves packed to the left; the tail holds the rest
//!   (between 1 and `WIDTH` elements).
//! - `shift` is `BITS * height`. A root at shift `0` is a single leaf; a root
//!   branch always has at least two children.

use std::mem;

use super::ReferenceCounter;
use super::buffer::{Buffer, Edit, Node, Width};

/// Vector state shared by [`PersistentVector`](super::PersistentVector) and
/// [`TransientVector`](super::TransientVector).
pub(crate) struct Trie<T, const WIDTH: usize> {
    pub(crate) root: Option<Node<T, WIDTH>>,
    pub(crate) tail: ReferenceCounter<Buffer<T, WIDTH>>,
    pub(crate) length: usize,
    pub(crate) shift: usize,
}

impl<T, const WIDTH: usize> Clone for Trie<T, WIDTH> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            tail: self.tail.clone(),
            length: self.length,
            shift: self.shift,
        }
    }
}

impl<T, const WIDTH: usize> Trie<T, WIDTH> {
    pub(crate) const BITS: usize = Width::<WIDTH>::BITS;
    pub(crate) const MASK: usize = Width::<WIDTH>::MASK;

    pub(crate) fn empty(edit: Edit<'_>) -> Self {
        Self {
            root: None,
            tail: ReferenceCounter::new(edit.new_buffer()),
            length: 0,
            shift: 0,
        }
    }

    /// Number of elements stored under the root; the tail starts here.
    #[inline]
    pub(crate) const fn tail_offset(&self) -> usize {
        if self.length == 0 {
            0
        } else {
            ((self.length - 1) >> Self::BITS) << Self::BITS
        }
    }

    /// Levels of branches above the leaves.
    #[inline]
    pub(crate) const fn height(&self) -> usize {
        self.shift / Self::BITS
    }

    /// The buffer holding `index`, which must be below `length`.
    pub(crate) fn leaf_buffer(&self, index: usize) -> &ReferenceCounter<Buffer<T, WIDTH>> {
        let Some(mut node) = self.root.as_ref().filter(|_| index < self.tail_offset()) else {
            return &self.tail;
        };
        let mut shift = self.shift;
        loop {
            match node {
                Node::Leaf(leaf) => return leaf,
                Node::Branch(branch) => match branch.slots.get((index >> shift) & Self::MASK) {
                    Some(child) => {
                        node = child;
                        shift = shift.saturating_sub(Self::BITS);
                    }
                    None => return &self.tail,
                },
            }
        }
    }

    #[inline]
    pub(crate) fn get(&self, index: usize) -> Option<&T> {
        if index >= self.length {
            return None;
        }
        self.leaf_buffer(index).slots.get(index & Self::MASK)
    }
}

impl<T: Clone, const WIDTH: usize> Trie<T, WIDTH> {
    // =========================================================================
    // Append
    // =========================================================================

    pub(crate) fn push_back(&mut self, edit: Edit<'_>, element: T) {
        if self.tail.slots.len() < WIDTH {
            edit.buffer_mut(&mut self.tail).slots.push(element);
        } else {
            let full = mem::replace(
                &mut self.tail,
                ReferenceCounter::new(edit.singleton(element)),
            );
            self.push_full_tail(edit, full);
        }
        self.length += 1;
    }

    /// Attaches a full leaf at the right edge of the root.
    ///
    /// Must run before `length` is incremented: the leaf's first index is
    /// `length - WIDTH`.
    fn push_full_tail(&mut self, edit: Edit<'_>, leaf: ReferenceCounter<Buffer<T, WIDTH>>) {
        let covered = self.length - WIDTH;
        self.root = Some(match self.root.take() {
            None => {
                tracing::trace!(length = self.length, "flat vector promoted to trie");
                self.shift = 0;
                Node::Leaf(leaf)
            }
            Some(Node::Branch(mut branch)) if (covered >> self.shift) < WIDTH => {
                Self::push_leaf(edit, &mut branch, self.shift, covered, leaf);
                Node::Branch(branch)
            }
            Some(root) => {
                self.shift += Self::BITS;
                tracing::trace!(
                    length = self.length,
                    height = self.height(),
                    "trie height grew"
                );
                let mut grown = ReferenceCounter::new(edit.singleton(root));
                Self::push_leaf(edit, &mut grown, self.shift, covered, leaf);
                Node::Branch(grown)
            }
        });
    }

    fn push_leaf(
        edit: Edit<'_>,
        branch: &mut ReferenceCounter<Buffer<Node<T, WIDTH>, WIDTH>>,
        shift: usize,
        index: usize,
        leaf: ReferenceCounter<Buffer<T, WIDTH>>,
    ) {
        let children = &mut edit.buffer_mut(branch).slots;
        if shift == Self::BITS {
            children.push(Node::Leaf(leaf));
            return;
        }
        let slot = (index >> shift) & Self::MASK;
        if slot < children.len() {
            if let Node::Branch(child) = &mut children[slot] {
                Self::push_leaf(edit, child, shift - Self::BITS, index, leaf);
            }
        } else {
            children.push(Self::new_path(edit, shift - Self::BITS, leaf));
        }
    }

    /// Wraps `leaf` in single-child branches up to `shift`.
    fn new_path(
        edit: Edit<'_>,
        shift: usize,
        leaf: ReferenceCounter<Buffer<T, WIDTH>>,
    ) -> Node<T, WIDTH> {
        let mut node = Node::Leaf(leaf);
        let mut level = 0;
        while level < shift {
            node = Node::Branch(ReferenceCounter::new(edit.singleton(node)));
            level += Self::BITS;
        }
        node
    }

    // =========================================================================
    // Update
    // =========================================================================

    /// Replaces the element at `index` (below `length`) and returns the old one.
    pub(crate) fn set(&mut self, edit: Edit<'_>, index: usize, element: T) -> T {
        let tail_offset = self.tail_offset();
        match self.root.as_mut() {
            Some(root) if index < tail_offset => {
                Self::set_in_node(edit, root, self.shift, index, element)
            }
            _ => {
                let tail = edit.buffer_mut(&mut self.tail);
                mem::replace(&mut tail.slots[index & Self::MASK], element)
            }
        }
    }

    fn set_in_node(
        edit: Edit<'_>,
        node: &mut Node<T, WIDTH>,
        shift: usize,
        index: usize,
        element: T,
    ) -> T {
        match node {
            Node::Leaf(leaf) => {
                let slots = &mut edit.buffer_mut(leaf).slots;
                mem::replace(&mut slots[index & Self::MASK], element)
            }
            Node::Branch(branch) => {
                let child = &mut edit.buffer_mut(branch).slots[(index >> shift) & Self::MASK];
                Self::set_in_node(edit, child, shift - Self::BITS, index, element)
            }
        }
    }

    // =========================================================================
    // Insert
    // =========================================================================

    /// Inserts `element` at `index` (at most `length`), shifting later
    /// elements one slot to the right.
    pub(crate) fn insert(&mut self, edit: Edit<'_>, index: usize, element: T) {
        if index == self.length {
            self.push_back(edit, element);
            return;
        }
        let tail_offset = self.tail_offset();
        let (position, element) = match self.root.as_mut() {
            Some(root) if index < tail_offset => (
                0,
                Self::insert_in_node(edit, root, self.shift, index, element),
            ),
            _ => (index - tail_offset, element),
        };
        self.insert_into_tail(edit, position, element);
    }

    fn insert_into_tail(&mut self, edit: Edit<'_>, position: usize, element: T) {
        if self.tail.slots.len() < WIDTH {
            edit.buffer_mut(&mut self.tail)
                .slots
                .insert(position, element);
        } else {
            let slots = &mut edit.buffer_mut(&mut self.tail).slots[position..];
            slots.rotate_right(1);
            let overflow = mem::replace(&mut slots[0], element);
            let full = mem::replace(
                &mut self.tail,
                ReferenceCounter::new(edit.singleton(overflow)),
            );
            self.push_full_tail(edit, full);
        }
        self.length += 1;
    }

    /// Inserts into a full subtree and returns the element pushed out of its
    /// last leaf.
    fn insert_in_node(
        edit: Edit<'_>,
        node: &mut Node<T, WIDTH>,
        shift: usize,
        index: usize,
        element: T,
    ) -> T {
        match node {
            Node::Leaf(leaf) => {
                let slots = &mut edit.buffer_mut(leaf).slots[index & Self::MASK..];
                slots.rotate_right(1);
                mem::replace(&mut slots[0], element)
            }
            Node::Branch(branch) => {
                let children = &mut edit.buffer_mut(branch).slots;
                let slot = (index >> shift) & Self::MASK;
                let mut carry = Self::insert_in_node(
                    edit,
                    &mut children[slot],
                    shift - Self::BITS,
                    index,
                    element,
                );
                for child in &mut children[slot + 1..] {
                    carry = Self::insert_in_node(edit, child, shift - Self::BITS, 0, carry);
                }
                carry
            }
        }
    }

    // =========================================================================
    // Remove
    // =========================================================================

    /// Removes and returns the element at `index` (below `length`), shifting
    /// later elements one slot to the left.
    pub(crate) fn remove(&mut self, edit: Edit<'_>, index: usize) -> T {
        let tail_offset = self.tail_offset();
        let removed = match self.root.as_mut() {
            Some(root) if index < tail_offset => {
                let carry = edit.buffer_mut(&mut self.tail).slots.remove(0);
                Self::remove_in_node(edit, root, self.shift, index, carry)
            }
            _ => edit
                .buffer_mut(&mut self.tail)
                .slots
                .remove(index - tail_offset),
        };
        self.length -= 1;
        if self.tail.slots.is_empty() {
            self.pull_last_leaf(edit);
        }
        removed
    }

    /// Removes from a full subtree, appending `carry` to its last leaf, and
    /// returns the removed element.
    fn remove_in_node(
        edit: Edit<'_>,
        node: &mut Node<T, WIDTH>,
        shift: usize,
        index: usize,
        carry: T,
    ) -> T {
        match node {
            Node::Leaf(leaf) => {
                let slots = &mut edit.buffer_mut(leaf).slots[index & Self::MASK..];
                let removed = mem::replace(&mut slots[0], carry);
                slots.rotate_left(1);
                removed
            }
            Node::Branch(branch) => {
                let children = &mut edit.buffer_mut(branch).slots;
                let slot = (index >> shift) & Self::MASK;
                let mut carry = carry;
                for child in children[slot + 1..].iter_mut().rev() {
                    carry = Self::remove_in_node(edit, child, shift - Self::BITS, 0, carry);
                }
                Self::remove_in_node(edit, &mut children[slot], shift - Self::BITS, index, carry)
            }
        }
    }

    /// Refills an empty tail with the rightmost leaf of the root, pruning the
    /// emptied path and dropping root levels left with a single child.
    fn pull_last_leaf(&mut self, edit: Edit<'_>) {
        match self.root.take() {
            None => self.shift = 0,
            Some(Node::Leaf(leaf)) => {
                tracing::trace!(length = self.length, "trie demoted to flat vector");
                self.tail = leaf;
                self.shift = 0;
            }
            Some(Node::Branch(mut branch)) => {
                if let Some(leaf) = Self::pop_last_leaf(edit, &mut branch) {
                    self.tail = leaf;
                }
                let mut root = Node::Branch(branch);
                while let Node::Branch(only) = &root
                    && only.slots.len() == 1
                {
                    root = only.slots[0].clone();
                    self.shift -= Self::BITS;
                    tracing::trace!(
                        length = self.length,
                        height = self.height(),
                        "trie height contracted"
                    );
                }
                self.root = Some(root);
            }
        }
    }

    fn pop_last_leaf(
        edit: Edit<'_>,
        branch: &mut ReferenceCounter<Buffer<Node<T, WIDTH>, WIDTH>>,
    ) -> Option<ReferenceCounter<Buffer<T, WIDTH>>> {
        let children = &mut edit.buffer_mut(branch).slots;
        if let Some(Node::Branch(child)) = children.last_mut() {
            let leaf = Self::pop_last_leaf(edit, child);
            if child.slots.is_empty() {
                children.pop();
            }
            return leaf;
        }
        match children.pop() {
            Some(Node::Leaf(leaf)) => Some(leaf),
            _ => None,
        }
    }
}
