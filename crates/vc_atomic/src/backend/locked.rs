#![expect(unsafe_code, reason = "Locked operations access raw cell storage.")]

use core::ops::{BitAnd, BitOr, BitXor};
use core::sync::atomic::{Ordering as CoreOrdering, fence};

use super::{ArithmeticBackend, Backend, BackendKind, BitwiseBackend, PointerBackend, sealed};
use crate::scalar::Integer;
use crate::utils::{CachePadded, RawSpinGuard, RawSpinLock};
use crate::{LoadOrdering, Ordering, StoreOrdering};

/// Number of locks in the table. Prime, so that cells with a common
/// alignment still spread over every stripe.
const STRIPES: usize = 67;

static LOCKS: [CachePadded<RawSpinLock>; STRIPES] =
    [const { CachePadded::new(RawSpinLock::new()) }; STRIPES];

/// Backend serializing every operation through a table of spin locks.
///
/// The lock protecting a cell is picked from its address, so unrelated cells
/// rarely contend. Taking the lock is an acquire operation and releasing it a
/// release operation, which covers every ordering except the single total
/// order of `SeqCst`: those operations are additionally bracketed by
/// `SeqCst` fences.
///
/// A weak compare-exchange on this backend never fails spuriously.
#[derive(Debug)]
pub struct Locked;

impl sealed::Sealed for Locked {}

/// Holds the stripe lock of `addr` for the duration of one operation.
struct Section {
    _guard: RawSpinGuard<'static>,
    seq_cst: bool,
}

impl Section {
    #[inline]
    fn enter<T>(addr: *mut T, order: Ordering) -> Self {
        crate::once_expr!(log::debug!(
            "atomic operation served by the locked backend ({} stripes)",
            STRIPES
        ));

        let seq_cst = matches!(order, Ordering::SeqCst);
        if seq_cst {
            fence(CoreOrdering::SeqCst);
        }

        let lock = &LOCKS[addr.addr() % STRIPES];
        lock.lock();

        Section {
            _guard: RawSpinGuard::new(lock),
            seq_cst,
        }
    }
}

impl Drop for Section {
    #[inline]
    fn drop(&mut self) {
        if self.seq_cst {
            // `_guard` is dropped after this body, so the fence is issued
            // while the lock is still held.
            fence(CoreOrdering::SeqCst);
        }
    }
}

unsafe impl<T: Copy + PartialEq> Backend<T> for Locked {
    const KIND: BackendKind = BackendKind::Locked;

    #[inline]
    unsafe fn load(src: *mut T, order: LoadOrdering) -> T {
        let _section = Section::enter(src, order.widen());
        unsafe { src.read() }
    }

    #[inline]
    unsafe fn store(dst: *mut T, val: T, order: StoreOrdering) {
        let _section = Section::enter(dst, order.widen());
        unsafe { dst.write(val) }
    }

    #[inline]
    unsafe fn swap(dst: *mut T, val: T, order: Ordering) -> T {
        let _section = Section::enter(dst, order);
        unsafe { dst.replace(val) }
    }

    #[inline]
    unsafe fn compare_exchange(
        dst: *mut T,
        current: T,
        new: T,
        success: Ordering,
        failure: LoadOrdering,
    ) -> Result<T, T> {
        let order = if matches!(failure, LoadOrdering::SeqCst) {
            Ordering::SeqCst
        } else {
            success
        };
        let _section = Section::enter(dst, order);

        let old = unsafe { dst.read() };
        if old == current {
            unsafe { dst.write(new) };
            Ok(old)
        } else {
            Err(old)
        }
    }

    #[inline]
    unsafe fn compare_exchange_weak(
        dst: *mut T,
        current: T,
        new: T,
        success: Ordering,
        failure: LoadOrdering,
    ) -> Result<T, T> {
        unsafe { <Self as Backend<T>>::compare_exchange(dst, current, new, success, failure) }
    }
}

/// Runs `f` on the stored value under the stripe lock, returning the old value.
#[inline]
unsafe fn fetch_update<T: Copy>(dst: *mut T, order: Ordering, f: impl FnOnce(T) -> T) -> T {
    let _section = Section::enter(dst, order);
    let old = unsafe { dst.read() };
    unsafe { dst.write(f(old)) };
    old
}

unsafe impl<T> BitwiseBackend<T> for Locked
where
    T: Copy + PartialEq + BitAnd<Output = T> + BitOr<Output = T> + BitXor<Output = T>,
{
    #[inline]
    unsafe fn fetch_and(dst: *mut T, val: T, order: Ordering) -> T {
        unsafe { fetch_update(dst, order, |old| old & val) }
    }

    #[inline]
    unsafe fn fetch_or(dst: *mut T, val: T, order: Ordering) -> T {
        unsafe { fetch_update(dst, order, |old| old | val) }
    }

    #[inline]
    unsafe fn fetch_xor(dst: *mut T, val: T, order: Ordering) -> T {
        unsafe { fetch_update(dst, order, |old| old ^ val) }
    }
}

unsafe impl<T: Integer> ArithmeticBackend<T> for Locked {
    #[inline]
    unsafe fn fetch_add(dst: *mut T, val: T, order: Ordering) -> T {
        unsafe { fetch_update(dst, order, |old| old.wrapping_add(val)) }
    }

    #[inline]
    unsafe fn fetch_sub(dst: *mut T, val: T, order: Ordering) -> T {
        unsafe { fetch_update(dst, order, |old| old.wrapping_sub(val)) }
    }
}

unsafe impl<U> PointerBackend<U> for Locked {
    #[inline]
    unsafe fn fetch_ptr_add(dst: *mut *mut U, count: usize, order: Ordering) -> *mut U {
        unsafe { fetch_update(dst, order, |old| old.wrapping_add(count)) }
    }

    #[inline]
    unsafe fn fetch_ptr_sub(dst: *mut *mut U, count: usize, order: Ordering) -> *mut U {
        unsafe { fetch_update(dst, order, |old| old.wrapping_sub(count)) }
    }
}

// -----------------------------------------------------------------------------
// Tests
