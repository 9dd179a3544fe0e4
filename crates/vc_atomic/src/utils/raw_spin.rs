use crate::utils::Backoff;
use crate::{Flag, LoadOrdering, Ordering, StoreOrdering};

// -----------------------------------------------------------------------------
// RawSpinLock

/// A spin lock that protects no data of its own.
///
/// Test-and-test-and-set over a [`Flag`]: waiters spin on a relaxed read and
/// only retry the exchange once the lock looks free. Locking is an acquire
/// operation and unlocking a release operation.
///
/// ```
/// use core::cell::Cell;
/// use vc_atomic::utils::{RawSpinGuard, RawSpinLock};
///
/// struct Counter {
///     lock: RawSpinLock,
///     value: Cell<u32>,
/// }
///
/// impl Counter {
///     fn bump(&self) -> u32 {
///         self.lock.lock();
///         let _guard = RawSpinGuard::new(&self.lock);
///         self.value.set(self.value.get() + 1);
///         self.value.get()
///     }
/// }
///
/// let counter = Counter { lock: RawSpinLock::new(), value: Cell::new(0) };
/// assert_eq!(counter.bump(), 1);
/// assert!(!counter.lock.is_locked());
/// ```
#[derive(Debug, Default)]
pub struct RawSpinLock {
    flag: Flag,
}

impl RawSpinLock {
    /// Creates an unlocked lock.
    #[inline(always)]
    pub const fn new() -> Self {
        Self { flag: Flag::new() }
    }

    /// Returns `true` if some thread holds the lock.
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.flag.test(LoadOrdering::Relaxed)
    }

    /// Takes the lock if it is free; never waits.
    #[inline]
    pub fn try_lock(&self) -> bool {
        !self.flag.test_and_set(Ordering::Acquire)
    }

    /// Takes the lock, spinning with [`Backoff`] while it is held.
    #[inline]
    pub fn lock(&self) {
        let backoff = Backoff::new();
        while !self.try_lock() {
            while self.is_locked() {
                backoff.snooze();
            }
        }
    }

    /// Releases the lock.
    ///
    /// Releasing a lock held by another thread is not undefined behavior, but
    /// it breaks the exclusion of whoever holds it.
    #[inline(always)]
    pub fn unlock(&self) {
        self.flag.clear(StoreOrdering::Release);
    }
}

// -----------------------------------------------------------------------------
// RawSpinGuard

/// Unlocks a [`RawSpinLock`] when dropped.
///
/// The guard does not lock; create it right after a successful
/// [`lock`](RawSpinLock::lock) or [`try_lock`](RawSpinLock::try_lock).
#[must_use = "dropping the guard unlocks immediately"]
pub struct RawSpinGuard<'a> {
    lock: &'a RawSpinLock,
}

impl<'a> RawSpinGuard<'a> {
    /// Adopts an already taken `lock`, which is released on drop.
    #[inline(always)]
    pub const fn new(lock: &'a RawSpinLock) -> Self {
        Self { lock }
    }
}

impl Drop for RawSpinGuard<'_> {
    #[inline]
    fn drop(&mut self) {
        self.lock.unlock();
    }
}

// -----------------------------------------------------------------------------
// Tests
