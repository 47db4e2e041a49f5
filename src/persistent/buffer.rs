//! Fixed-width buffers and the trie nodes built from them.
//!
//! A [`Buffer`] is the allocation unit of the vector: at most `WIDTH` slots,
//! left-packed, plus an optional ownership marker. Leaves hold elements;
//! branches hold child [`Node`]s. Buffers are shared between vector versions
//! through [`ReferenceCounter`] and are only ever written through an
//! [`Edit`], which decides whether the buffer may be mutated in place or must
//! be copied first.

use arrayvec::ArrayVec;

use super::ReferenceCounter;

// =============================================================================
// Width Arithmetic
// =============================================================================

/// Index arithmetic for buffers of `WIDTH` slots.
pub(crate) struct Width<const WIDTH: usize>;

impl<const WIDTH: usize> Width<WIDTH> {
    /// Bits consumed per trie level (`log2(WIDTH)`).
    ///
    /// Evaluating this constant rejects widths that are not powers of two.
    pub(crate) const BITS: usize = {
        assert!(
            WIDTH >= 2 && WIDTH.is_power_of_two(),
            "WIDTH must be a power of two and at least 2"
        );
        WIDTH.trailing_zeros() as usize
    };

    /// Mask selecting the slot index within one buffer.
    pub(crate) const MASK: usize = WIDTH - 1;
}

// =============================================================================
// Ownership Marker
// =============================================================================

/// Identity of one transient generation.
///
/// Only the address matters: two tokens are the same owner iff they point at
/// the same allocation. Buffers keep their token alive, so an address cannot
/// be recycled while any buffer stamped with it exists.
#[derive(Debug)]
pub(crate) struct Owner;

/// Shared handle to an [`Owner`], compared by pointer identity.
pub(crate) type OwnerToken = ReferenceCounter<Owner>;

/// Allocates a token distinct from every live token.
#[inline]
pub(crate) fn fresh_owner() -> OwnerToken {
    ReferenceCounter::new(Owner)
}

// =============================================================================
// Buffer
// =============================================================================

/// A left-packed array of at most `WIDTH` slots.
pub(crate) struct Buffer<S, const WIDTH: usize> {
    pub(crate) slots: ArrayVec<S, WIDTH>,
    owner: Option<OwnerToken>,
}

impl<S, const WIDTH: usize> Buffer<S, WIDTH> {
    #[inline]
    pub(crate) const fn new(owner: Option<OwnerToken>) -> Self {
        Self {
            slots: ArrayVec::new_const(),
            owner,
        }
    }

    /// Returns `true` if `owner` stamped this buffer.
    #[inline]
    pub(crate) fn is_owned_by(&self, owner: &OwnerToken) -> bool {
        self.owner
            .as_ref()
            .is_some_and(|stamp| ReferenceCounter::ptr_eq(stamp, owner))
    }
}

/// Cloning copies the slots but never the stamp: a copy belongs to nobody
/// until an [`Edit`] adopts it.
impl<S: Clone, const WIDTH: usize> Clone for Buffer<S, WIDTH> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            owner: None,
        }
    }
}

// =============================================================================
// Node
// =============================================================================

/// One level of the trie.
///
/// The variant is determined by depth: nodes at shift `0` are leaves, every
/// node above is a branch.
pub(crate) enum Node<T, const WIDTH: usize> {
    /// Children of the next level down.
    Branch(ReferenceCounter<Buffer<Self, WIDTH>>),
    /// Elements.
    Leaf(ReferenceCounter<Buffer<T, WIDTH>>),
}

impl<T, const WIDTH: usize> Clone for Node<T, WIDTH> {
    #[inline]
    fn clone(&self) -> Self {
        match self {
            Self::Branch(branch) => Self::Branch(branch.clone()),
            Self::Leaf(leaf) => Self::Leaf(leaf.clone()),
        }
    }
}

// =============================================================================
// Edit Mode
// =============================================================================

/// How a trie operation obtains a writable buffer.
#[derive(Clone, Copy)]
pub(crate) enum Edit<'a> {
    /// Clone-on-write: any buffer another holder can still see is copied.
    ///
    /// Used by the immutable vector, whose receiver keeps its own references
    /// alive for the whole call, so every buffer on the edited path is copied
    /// and every sibling stays shared.
    Persistent,
    /// Mutate buffers stamped with this token in place; copy and stamp
    /// everything else.
    Transient(&'a OwnerToken),
}

impl Edit<'_> {
    #[inline]
    fn stamp(self) -> Option<OwnerToken> {
        match self {
            Self::Persistent => None,
            Self::Transient(owner) => Some(owner.clone()),
        }
    }

    /// A new empty buffer, already owned by this edit.
    #[inline]
    pub(crate) fn new_buffer<S, const WIDTH: usize>(self) -> Buffer<S, WIDTH> {
        Buffer::new(self.stamp())
    }

    /// A new buffer holding `slot` at index 0.
    #[inline]
    pub(crate) fn singleton<S, const WIDTH: usize>(self, slot: S) -> Buffer<S, WIDTH> {
        let mut buffer = self.new_buffer();
        buffer.slots.push(slot);
        buffer
    }

    /// Makes `buffer` writable and returns it.
    ///
    /// The reference is replaced by a fresh copy when this edit may not write
    /// to the buffer it currently points at.
    pub(crate) fn buffer_mut<S: Clone, const WIDTH: usize>(
        self,
        buffer: &mut ReferenceCounter<Buffer<S, WIDTH>>,
    ) -> &mut Buffer<S, WIDTH> {
        if let Self::Transient(owner) = self
            && !buffer.is_owned_by(owner)
        {
            *buffer = ReferenceCounter::new(Buffer {
                slots: buffer.slots.clone(),
                owner: Some(owner.clone()),
            });
        }
        ReferenceCounter::make_mut(buffer)
    }
}
