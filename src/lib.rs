//! # radix-vector
//!
//! A persistent vector for Rust built on a bit-partitioned trie with a tail
//! buffer, plus a transient builder for batched edits.
//!
//! ## Overview
//!
//! - **Persistent Vector**: immutable, structurally shared vector with
//!   O(log_WIDTH N) access and update and amortized O(1) append
//! - **Transient Vector**: single-writer builder that edits the buffers it
//!   owns in place and publishes persistent snapshots in O(1)
//! - **List Iterator**: bidirectional cursor with leaf caching
//!
//! ## Feature Flags
//!
//! - `arc`: share buffers through `Arc` so vectors are `Send + Sync`
//! - `serde`: serialize vectors as sequences
//!
//! ## Example
//!
//! ```rust
//! use radix_vector::prelude::*;
//!
//! let vector: PersistentVector<&str> = ["a", "b", "c"].into_iter().collect();
//! let forward: Vec<&str> = vector.iter().copied().collect();
//! assert_eq!(forward, vec!["a", "b", "c"]);
//!
//! let backward: Vec<&str> = vector
//!     .list_iter(vector.len())
//!     .unwrap()
//!     .backward()
//!     .copied()
//!     .collect();
//! assert_eq!(backward, vec!["c", "b", "a"]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Note: Disabling redundant_closure_for_method_calls due to clippy 0.1.92 panic bug
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types.
///
/// # Usage
///
/// ```rust
/// use radix_vector::prelude::*;
/// ```
pub mod prelude {
    pub use crate::persistent::*;
}

pub mod persistent;
