//! Persistent (immutable) vector and its transient builder.
//!
//! This module provides a bit-partitioned trie vector that uses structural
//! sharing to minimize copying:
//!
//! - [`PersistentVector`]: immutable vector; every edit returns a new version
//! - [`TransientVector`]: mutable builder that edits owned buffers in place
//!   and publishes [`PersistentVector`] snapshots
//! - [`ListIter`]: bidirectional cursor over either of them
//! - [`IndexOutOfRange`]: the error every index-taking operation reports
//!
//! # Structural Sharing
//!
//! A vector is a tail buffer plus, once it outgrows a single buffer, a trie
//! of `WIDTH`-slot buffers. An edit copies only the buffers on the path to
//! the edited slot; every other buffer is shared by reference count with the
//! version it came from.
//!
//! # Examples
//!
//! ## `PersistentVector`
//!
//! ```rust
//! use radix_vector::persistent::PersistentVector;
//!
//! let vector: PersistentVector<i32> = (0..100).collect();
//! assert_eq!(vector.get(50), Ok(&50));
//!
//! // Structural sharing: the original vector is preserved
//! let updated = vector.set(50, 999).unwrap();
//! assert_eq!(vector.get(50), Ok(&50));     // Original unchanged
//! assert_eq!(updated.get(50), Ok(&999));   // New version
//! ```
//!
//! ## `TransientVector`
//!
//! ```rust
//! use radix_vector::persistent::PersistentVector;
//!
//! let vector: PersistentVector<i32> = (0..100).collect();
//!
//! let mut builder = vector.builder();
//! for index in 0..10 {
//!     builder.set(index, -1).unwrap();
//! }
//! builder.push_back(100);
//! let edited = builder.build();
//!
//! assert_eq!(vector.get(0), Ok(&0));      // Original unchanged
//! assert_eq!(edited.get(0), Ok(&-1));
//! assert_eq!(edited.len(), 101);
//! ```
//!
//! ## Branching factor
//!
//! ```rust
//! use radix_vector::persistent::PersistentVector;
//!
//! let narrow: PersistentVector<u8, 8> = (0..=200).collect();
//! assert_eq!(narrow.height(), 2);
//! assert_eq!(narrow.get(200), Ok(&200));
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled, this is `std::sync::Arc`,
/// which is thread-safe but has slightly higher overhead.
///
/// When the `arc` feature is disabled (default), this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

/// Branching factor used when none is given: 32 slots per buffer.
pub const DEFAULT_WIDTH: usize = 32;

mod buffer;
mod error;
mod iterator;
mod transient;
mod trie;
mod vector;

pub use error::IndexOutOfRange;
pub use iterator::Backward;
pub use iterator::IntoIter;
pub use iterator::ListIter;
pub use transient::TransientVector;
pub use vector::PersistentVector;

// =============================================================================
// Tests
// =============================================================================
