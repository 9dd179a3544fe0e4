//! The two implementations behind [`Atomic`](crate::Atomic).
//!
//! Every [`Scalar`](crate::Scalar) names one backend at compile time:
//!
//! - [`Native`]: the operation is a single hardware atomic instruction (or an
//!   instruction sequence the platform guarantees to be atomic). Selected for
//!   each width the target reports through `cfg(target_has_atomic = "N")`.
//! - [`Locked`]: the operation runs under one of a fixed set of spin locks,
//!   chosen by the address of the cell. Used for widths without native
//!   support, and always for 128-bit integers.
//!
//! The backends expose the same raw interface, so [`Atomic`](crate::Atomic)
//! contains no per-arm code. [`BackendKind`] is the tag that
//! [`is_lock_free`](crate::is_lock_free) reports.
//!
//! # Safety
//!
//! All functions take a raw pointer to the storage of a live cell. Callers
//! guarantee that the pointer is aligned to `size_of::<T>()`, valid for reads
//! and writes, and that every concurrent access to it goes through the same
//! backend.

#![expect(unsafe_code, reason = "Backends operate on raw cell storage.")]

use core::fmt;

use crate::{LoadOrdering, Ordering, StoreOrdering};

// -----------------------------------------------------------------------------
// Modules

mod locked;
mod native;

// -----------------------------------------------------------------------------
// Exports

pub use locked::Locked;
pub use native::Native;

mod sealed {
    pub trait Sealed {}
}

// -----------------------------------------------------------------------------
// BackendKind

/// Which implementation serves a cell type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Native atomic instructions, lock-free.
    Native,
    /// Internal lock table, not lock-free.
    Locked,
}

impl BackendKind {
    /// Returns `true` for [`BackendKind::Native`].
    #[inline]
    pub const fn is_lock_free(self) -> bool {
        matches!(self, BackendKind::Native)
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BackendKind::Native => "native",
            BackendKind::Locked => "locked",
        })
    }
}

// -----------------------------------------------------------------------------
// Backend traits

/// Load, store, swap and compare-exchange on raw storage.
///
/// # Safety
///
/// Implementations must perform each operation atomically with respect to
/// every other operation of the same backend on the same address, and honour
/// the requested ordering.
pub unsafe trait Backend<T: Copy>: sealed::Sealed {
    /// The tag of this implementation.
    const KIND: BackendKind;

    /// # Safety
    ///
    /// See the [module documentation](self).
    unsafe fn load(src: *mut T, order: LoadOrdering) -> T;

    /// # Safety
    ///
    /// See the [module documentation](self).
    unsafe fn store(dst: *mut T, val: T, order: StoreOrdering);

    /// # Safety
    ///
    /// See the [module documentation](self).
    unsafe fn swap(dst: *mut T, val: T, order: Ordering) -> T;

    /// Never fails when the stored value equals `current`.
    ///
    /// # Safety
    ///
    /// See the [module documentation](self).
    unsafe fn compare_exchange(
        dst: *mut T,
        current: T,
        new: T,
        success: Ordering,
        failure: LoadOrdering,
    ) -> Result<T, T>;

    /// May fail even when the stored value equals `current`.
    ///
    /// # Safety
    ///
    /// See the [module documentation](self).
    unsafe fn compare_exchange_weak(
        dst: *mut T,
        current: T,
        new: T,
        success: Ordering,
        failure: LoadOrdering,
    ) -> Result<T, T>;
}

/// Bitwise fetch-and-modify operations, for integers and `bool`.
///
/// # Safety
///
/// Same requirements as [`Backend`].
pub unsafe trait BitwiseBackend<T: Copy>: Backend<T> {
    /// # Safety
    ///
    /// See the [module documentation](self).
    unsafe fn fetch_and(dst: *mut T, val: T, order: Ordering) -> T;

    /// # Safety
    ///
    /// See the [module documentation](self).
    unsafe fn fetch_or(dst: *mut T, val: T, order: Ordering) -> T;

    /// # Safety
    ///
    /// See the [module documentation](self).
    unsafe fn fetch_xor(dst: *mut T, val: T, order: Ordering) -> T;
}

/// Wrapping arithmetic fetch-and-modify operations, for integers.
///
/// # Safety
///
/// Same requirements as [`Backend`].
pub unsafe trait ArithmeticBackend<T: Copy>: BitwiseBackend<T> {
    /// # Safety
    ///
    /// See the [module documentation](self).
    unsafe fn fetch_add(dst: *mut T, val: T, order: Ordering) -> T;

    /// # Safety
    ///
    /// See the [module documentation](self).
    unsafe fn fetch_sub(dst: *mut T, val: T, order: Ordering) -> T;
}

/// Pointer offset fetch operations, in units of the pointee.
///
/// # Safety
///
/// Same requirements as [`Backend`].
pub unsafe trait PointerBackend<U>: Backend<*mut U> {
    /// Offsets by `count` elements with wrapping arithmetic; returns the old pointer.
    ///
    /// # Safety
    ///
    /// See the [module documentation](self).
    unsafe fn fetch_ptr_add(dst: *mut *mut U, count: usize, order: Ordering) -> *mut U;

    /// Offsets back by `count` elements with wrapping arithmetic; returns the old pointer.
    ///
    /// # Safety
    ///
    /// See the [module documentation](self).
    unsafe fn fetch_ptr_sub(dst: *mut *mut U, count: usize, order: Ordering) -> *mut U;
}

// -----------------------------------------------------------------------------
// Tests
