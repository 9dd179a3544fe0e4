//! Memory orderings.
//!
//! [`Ordering`] is the full six-level vocabulary. Operations that can only
//! read take a [`LoadOrdering`], operations that can only write take a
//! [`StoreOrdering`], so `store(v, Acquire)` is rejected by the compiler
//! instead of being reinterpreted at runtime.
//!
//! The platform memory model has no dedicated consume level: `Consume` is
//! lowered to `Acquire` when an operation is issued. Nothing else is ever
//! strengthened or weakened.

use core::cmp;
use core::sync::atomic::Ordering as CoreOrdering;

use crate::OrderingError;

// -----------------------------------------------------------------------------
// Ordering

/// Memory ordering of an atomic operation.
///
/// Strength forms a partial order:
/// `Relaxed < Consume < Acquire, Release < AcqRel < SeqCst`,
/// where `Acquire` and `Release` are not comparable with each other.
///
/// ```
/// use vc_atomic::Ordering;
///
/// assert!(Ordering::Relaxed < Ordering::Acquire);
/// assert!(Ordering::AcqRel < Ordering::SeqCst);
/// assert_eq!(Ordering::Acquire.partial_cmp(&Ordering::Release), None);
/// assert_eq!(Ordering::default(), Ordering::SeqCst);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Ordering {
    /// No ordering constraint, only atomicity.
    Relaxed,
    /// Orders later operations that carry a data dependency on the loaded value.
    Consume,
    /// Later accesses cannot move before this load.
    Acquire,
    /// Earlier accesses cannot move after this store.
    Release,
    /// Both `Acquire` and `Release`, for read-modify-write operations.
    AcqRel,
    /// `AcqRel` plus a single total order over all `SeqCst` operations.
    #[default]
    SeqCst,
}

impl Ordering {
    /// Every ordering, weakest first.
    pub const ALL: [Ordering; 6] = [
        Ordering::Relaxed,
        Ordering::Consume,
        Ordering::Acquire,
        Ordering::Release,
        Ordering::AcqRel,
        Ordering::SeqCst,
    ];

    #[inline]
    const fn rank(self) -> u8 {
        match self {
            Ordering::Relaxed => 0,
            Ordering::Consume => 1,
            Ordering::Acquire | Ordering::Release => 2,
            Ordering::AcqRel => 3,
            Ordering::SeqCst => 4,
        }
    }

    /// Returns `true` if this ordering synchronizes on the read side.
    #[inline]
    pub const fn is_acquire(self) -> bool {
        !matches!(self.load_part(), LoadOrdering::Relaxed)
    }

    /// Returns `true` if this ordering synchronizes on the write side.
    #[inline]
    pub const fn is_release(self) -> bool {
        !matches!(self.store_part(), StoreOrdering::Relaxed)
    }

    /// The read-side component of this ordering.
    ///
    /// ```
    /// use vc_atomic::{LoadOrdering, Ordering};
    ///
    /// assert_eq!(Ordering::AcqRel.load_part(), LoadOrdering::Acquire);
    /// assert_eq!(Ordering::Release.load_part(), LoadOrdering::Relaxed);
    /// ```
    #[inline]
    pub const fn load_part(self) -> LoadOrdering {
        match self {
            Ordering::Relaxed | Ordering::Release => LoadOrdering::Relaxed,
            Ordering::Consume => LoadOrdering::Consume,
            Ordering::Acquire | Ordering::AcqRel => LoadOrdering::Acquire,
            Ordering::SeqCst => LoadOrdering::SeqCst,
        }
    }

    /// The write-side component of this ordering.
    #[inline]
    pub const fn store_part(self) -> StoreOrdering {
        match self {
            Ordering::Relaxed | Ordering::Consume | Ordering::Acquire => StoreOrdering::Relaxed,
            Ordering::Release | Ordering::AcqRel => StoreOrdering::Release,
            Ordering::SeqCst => StoreOrdering::SeqCst,
        }
    }

    /// Returns `true` if `failure` is a valid failure ordering for a
    /// compare-exchange whose success ordering is `self`.
    ///
    /// A failed comparison is a plain read, so its ordering may not be
    /// stronger than the read side of the success ordering.
    ///
    /// ```
    /// use vc_atomic::{LoadOrdering, Ordering};
    ///
    /// assert!(Ordering::AcqRel.permits_failure(LoadOrdering::Acquire));
    /// assert!(!Ordering::Release.permits_failure(LoadOrdering::Acquire));
    /// assert!(!Ordering::Acquire.permits_failure(LoadOrdering::SeqCst));
    /// ```
    #[inline]
    pub const fn permits_failure(self, failure: LoadOrdering) -> bool {
        failure.rank() <= self.load_part().rank()
    }

    #[inline]
    pub(crate) const fn to_core(self) -> CoreOrdering {
        match self {
            Ordering::Relaxed => CoreOrdering::Relaxed,
            Ordering::Consume | Ordering::Acquire => CoreOrdering::Acquire,
            Ordering::Release => CoreOrdering::Release,
            Ordering::AcqRel => CoreOrdering::AcqRel,
            Ordering::SeqCst => CoreOrdering::SeqCst,
        }
    }
}

impl PartialOrd for Ordering {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        match (self, other) {
            (Ordering::Acquire, Ordering::Release) | (Ordering::Release, Ordering::Acquire) => None,
            _ => Some(self.rank().cmp(&other.rank())),
        }
    }
}

// -----------------------------------------------------------------------------
// LoadOrdering

/// Orderings valid for operations that only read.
///
/// Used by loads, by [`Flag::test`](crate::Flag::test) and as the failure
/// ordering of compare-exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum LoadOrdering {
    /// See [`Ordering::Relaxed`].
    Relaxed,
    /// See [`Ordering::Consume`].
    Consume,
    /// See [`Ordering::Acquire`].
    Acquire,
    /// See [`Ordering::SeqCst`].
    #[default]
    SeqCst,
}

impl LoadOrdering {
    #[inline]
    const fn rank(self) -> u8 {
        self.widen().rank()
    }

    /// Converts to the general [`Ordering`].
    #[inline]
    pub const fn widen(self) -> Ordering {
        match self {
            LoadOrdering::Relaxed => Ordering::Relaxed,
            LoadOrdering::Consume => Ordering::Consume,
            LoadOrdering::Acquire => Ordering::Acquire,
            LoadOrdering::SeqCst => Ordering::SeqCst,
        }
    }

    #[inline]
    pub(crate) const fn to_core(self) -> CoreOrdering {
        self.widen().to_core()
    }
}

impl From<LoadOrdering> for Ordering {
    #[inline]
    fn from(order: LoadOrdering) -> Self {
        order.widen()
    }
}

impl TryFrom<Ordering> for LoadOrdering {
    type Error = OrderingError;

    /// Fails for `Release` and `AcqRel`, which have a write side.
    fn try_from(order: Ordering) -> Result<Self, Self::Error> {
        match order {
            Ordering::Relaxed => Ok(LoadOrdering::Relaxed),
            Ordering::Consume => Ok(LoadOrdering::Consume),
            Ordering::Acquire => Ok(LoadOrdering::Acquire),
            Ordering::SeqCst => Ok(LoadOrdering::SeqCst),
            Ordering::Release | Ordering::AcqRel => Err(OrderingError::NotLoad(order)),
        }
    }
}

// -----------------------------------------------------------------------------
// StoreOrdering

/// Orderings valid for operations that only write.
///
/// Used by stores and by [`Flag::clear`](crate::Flag::clear).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum StoreOrdering {
    /// See [`Ordering::Relaxed`].
    Relaxed,
    /// See [`Ordering::Release`].
    Release,
    /// See [`Ordering::SeqCst`].
    #[default]
    SeqCst,
}

impl StoreOrdering {
    /// Converts to the general [`Ordering`].
    #[inline]
    pub const fn widen(self) -> Ordering {
        match self {
            StoreOrdering::Relaxed => Ordering::Relaxed,
            StoreOrdering::Release => Ordering::Release,
            StoreOrdering::SeqCst => Ordering::SeqCst,
        }
    }

    #[inline]
    pub(crate) const fn to_core(self) -> CoreOrdering {
        self.widen().to_core()
    }
}

impl From<StoreOrdering> for Ordering {
    #[inline]
    fn from(order: StoreOrdering) -> Self {
        order.widen()
    }
}

impl TryFrom<Ordering> for StoreOrdering {
    type Error = OrderingError;

    /// Fails for `Consume`, `Acquire` and `AcqRel`, which have a read side.
    fn try_from(order: Ordering) -> Result<Self, Self::Error> {
        match order {
            Ordering::Relaxed => Ok(StoreOrdering::Relaxed),
            Ordering::Release => Ok(StoreOrdering::Release),
            Ordering::SeqCst => Ok(StoreOrdering::SeqCst),
            Ordering::Consume | Ordering::Acquire | Ordering::AcqRel => {
                Err(OrderingError::NotStore(order))
            }
        }
    }
}

// -----------------------------------------------------------------------------
// kill_dependency

/// Ends a `Consume` dependency chain.
///
/// The returned value no longer carries a dependency on the load it came
/// from. Since `Consume` is issued as `Acquire`, this is the identity.
#[inline(always)]
#[must_use]
pub const fn kill_dependency<T: Copy>(value: T) -> T {
    value
}

// -----------------------------------------------------------------------------
// Tests
