#![expect(unsafe_code, reason = "SpinLock hands out references to its cell.")]

use core::cell::UnsafeCell;
use core::fmt;
use core::ops::{Deref, DerefMut};
use core::panic::{RefUnwindSafe, UnwindSafe};

use crate::utils::{RawSpinGuard, RawSpinLock};

// -----------------------------------------------------------------------------
// SpinLock

/// A [`RawSpinLock`] owning the data it protects.
///
/// Waiting threads busy-wait. There is no poisoning: a panic while the guard
/// is alive simply releases the lock.
///
/// ```
/// use std::thread;
/// use vc_atomic::utils::SpinLock;
///
/// let log = SpinLock::new(Vec::new());
///
/// thread::scope(|s| {
///     for i in 0..10 {
///         let log = &log;
///         s.spawn(move || log.lock().push(i));
///     }
/// });
///
/// assert_eq!(log.lock().len(), 10);
/// ```
pub struct SpinLock<T: ?Sized> {
    raw: RawSpinLock,
    data: UnsafeCell<T>,
}

unsafe impl<T: ?Sized + Send> Send for SpinLock<T> {}
unsafe impl<T: ?Sized + Send> Sync for SpinLock<T> {}
impl<T: ?Sized> UnwindSafe for SpinLock<T> {}
impl<T: ?Sized> RefUnwindSafe for SpinLock<T> {}

impl<T> SpinLock<T> {
    /// Creates an unlocked spin lock holding `value`.
    #[inline]
    pub const fn new(value: T) -> Self {
        Self {
            raw: RawSpinLock::new(),
            data: UnsafeCell::new(value),
        }
    }

    /// Consumes the lock and returns the data.
    #[inline]
    pub fn into_inner(self) -> T {
        self.data.into_inner()
    }
}

impl<T: ?Sized> SpinLock<T> {
    /// Spins until the lock is taken.
    #[inline]
    pub fn lock(&self) -> SpinLockGuard<'_, T> {
        self.raw.lock();
        SpinLockGuard::new(self)
    }

    /// Takes the lock only if it is free right now.
    #[inline]
    pub fn try_lock(&self) -> Option<SpinLockGuard<'_, T>> {
        self.raw.try_lock().then(|| SpinLockGuard::new(self))
    }

    /// Returns `true` if a guard is currently alive.
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.raw.is_locked()
    }

    /// The exclusive borrow proves no guard is alive.
    #[inline]
    pub fn get_mut(&mut self) -> &mut T {
        self.data.get_mut()
    }
}

impl<T> From<T> for SpinLock<T> {
    #[inline]
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: Default> Default for SpinLock<T> {
    #[inline]
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for SpinLock<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("SpinLock");
        match self.try_lock() {
            Some(guard) => d.field("data", &&*guard),
            None => d.field("data", &format_args!("<locked>")),
        };
        d.finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// SpinLockGuard

/// Access to the data of a locked [`SpinLock`]; unlocks on drop.
#[must_use = "dropping the guard unlocks immediately"]
pub struct SpinLockGuard<'a, T: ?Sized + 'a> {
    lock: &'a SpinLock<T>,
    _raw: RawSpinGuard<'a>,
}

unsafe impl<T: ?Sized + Sync> Sync for SpinLockGuard<'_, T> {}

impl<'a, T: ?Sized> SpinLockGuard<'a, T> {
    #[inline(always)]
    fn new(lock: &'a SpinLock<T>) -> Self {
        Self {
            lock,
            _raw: RawSpinGuard::new(&lock.raw),
        }
    }
}

impl<T: ?Sized> Deref for SpinLockGuard<'_, T> {
    type Target = T;

    #[inline(always)]
    fn deref(&self) -> &T {
        unsafe { &*self.lock.data.get() }
    }
}

impl<T: ?Sized> DerefMut for SpinLockGuard<'_, T> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut T {
        unsafe { &mut *self.lock.data.get() }
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for SpinLockGuard<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

impl<T: ?Sized + fmt::Display> fmt::Display for SpinLockGuard<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&**self, f)
    }
}

// -----------------------------------------------------------------------------
// Tests
