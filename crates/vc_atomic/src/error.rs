use thiserror::Error;

use crate::Ordering;

/// An [`Ordering`] that does not fit the operation kind it was converted for.
///
/// Only produced by the fallible conversions into
/// [`LoadOrdering`](crate::LoadOrdering) and
/// [`StoreOrdering`](crate::StoreOrdering). Atomic operations themselves
/// never fail with this error; they take the restricted types directly.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderingError {
    /// `Release` or `AcqRel` was given where only a load ordering fits.
    #[error("{0:?} ordering has a release side and cannot be used for a load")]
    NotLoad(Ordering),
    /// `Consume`, `Acquire` or `AcqRel` was given where only a store ordering fits.
    #[error("{0:?} ordering has an acquire side and cannot be used for a store")]
    NotStore(Ordering),
}
