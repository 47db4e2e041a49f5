//! Error types for the persistent vector family.
//!
//! Every fallible operation on [`PersistentVector`](super::PersistentVector),
//! [`TransientVector`](super::TransientVector) and their cursors fails for
//! exactly one reason: an index outside the range the operation accepts.

use thiserror::Error;

/// An index argument fell outside the valid range of the receiver.
///
/// Reads, updates and removals accept `0..length`; insertions and cursor
/// positioning accept `0..=length`. The receiver is left untouched when this
/// error is returned.
///
/// # Examples
///
/// ```rust
/// use radix_vector::persistent::{IndexOutOfRange, PersistentVector};
///
/// let vector: PersistentVector<i32> = (0..3).collect();
/// assert_eq!(vector.get(3), Err(IndexOutOfRange { index: 3, length: 3 }));
/// assert_eq!(
///     format!("{}", IndexOutOfRange { index: 3, length: 3 }),
///     "index 3 out of range for length 3"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("index {index} out of range for length {length}")]
pub struct IndexOutOfRange {
    /// The rejected index.
    pub index: usize,
    /// The length of the receiver at the time of the call.
    pub length: usize,
}

impl IndexOutOfRange {
    /// Checks `index < length`.
    #[inline]
    pub(crate) const fn check_element(index: usize, length: usize) -> Result<(), Self> {
        if index < length {
            Ok(())
        } else {
            Err(Self { index, length })
        }
    }

    /// Checks `index <= length`, the range accepted by insertion and cursors.
    #[inline]
    pub(crate) const fn check_position(index: usize, length: usize) -> Result<(), Self> {
        if index <= length {
            Ok(())
        } else {
            Err(Self { index, length })
        }
    }
}
