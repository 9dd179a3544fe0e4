use core::sync::atomic;

use crate::Ordering;

/// An ordering point between threads that is not tied to any cell.
///
/// - `Relaxed` does nothing.
/// - `Acquire` (and `Consume`) makes writes observed by earlier loads
///   happen before later reads and writes.
/// - `Release` makes earlier reads and writes happen before writes
///   performed by later stores.
/// - `AcqRel` does both.
/// - `SeqCst` additionally takes part in the single total order.
///
/// # Examples
///
/// ```
/// use vc_atomic::{Atomic, LoadOrdering, Ordering, StoreOrdering, fence};
///
/// let ready = Atomic::new(false);
/// ready.store(true, StoreOrdering::Relaxed);
///
/// if ready.load(LoadOrdering::Relaxed) {
///     fence(Ordering::Acquire);
/// }
/// ```
#[inline]
pub fn fence(order: Ordering) {
    if order != Ordering::Relaxed {
        atomic::fence(order.to_core());
    }
}

/// Like [`fence`], but only restricts compiler reordering.
///
/// Useful to synchronize with a signal handler running on the same thread.
#[inline]
pub fn signal_fence(order: Ordering) {
    if order != Ordering::Relaxed {
        atomic::compiler_fence(order.to_core());
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(all(test, feature = "std"))]
#[expect(unsafe_code, reason = "Tests share plain data behind the fences.")]
mod tests {
    use core::cell::UnsafeCell;
    use std::thread;

    use super::{fence, signal_fence};
    use crate::{Atomic, LoadOrdering, Ordering, StoreOrdering};

    #[test]
    fn every_ordering_is_accepted() {
        for order in Ordering::ALL {
            fence(order);
            signal_fence(order);
        }
    }

    #[test]
    fn fences_pair_relaxed_accesses() {
        struct Shared(UnsafeCell<u32>);
        unsafe impl Sync for Shared {}

        for round in 0..200_u32 {
            let data = &Shared(UnsafeCell::new(0));
            let ready = Atomic::new(false);

            thread::scope(|s| {
                s.spawn(|| {
                    unsafe { *data.0.get() = round ^ 0x5A5A };
                    fence(Ordering::Release);
                    ready.store(true, StoreOrdering::Relaxed);
                });
                s.spawn(|| {
                    while !ready.load(LoadOrdering::Relaxed) {
                        core::hint::spin_loop();
                    }
                    fence(Ordering::Acquire);
                    assert_eq!(unsafe { *data.0.get() }, round ^ 0x5A5A);
                });
            });
        }
    }
}
