use core::fmt;
use core::sync::atomic::AtomicBool;

use crate::{LoadOrdering, Ordering, StoreOrdering};

// -----------------------------------------------------------------------------
// Flag

/// A boolean with test-and-set and clear, lock-free on every supported target.
///
/// This is the primitive the rest of the crate builds its locks on, so it
/// never goes through the locked backend. A `Flag` can be initialized in a
/// `static` and starts clear.
///
/// # Examples
///
/// ```
/// use vc_atomic::{Flag, Ordering, StoreOrdering};
///
/// static BUSY: Flag = Flag::new();
///
/// assert!(!BUSY.test_and_set(Ordering::Acquire));
/// assert!(BUSY.test_and_set(Ordering::Acquire));
/// BUSY.clear(StoreOrdering::Release);
/// assert!(!BUSY.test_and_set(Ordering::Acquire));
/// ```
#[repr(transparent)]
pub struct Flag {
    state: AtomicBool,
}

impl Flag {
    /// A clear flag, for `static` initializers.
    pub const INIT: Self = Self::new();

    /// Creates a clear flag.
    #[inline(always)]
    pub const fn new() -> Self {
        Self::with_state(false)
    }

    /// Creates a flag with the given state.
    #[inline(always)]
    pub const fn with_state(set: bool) -> Self {
        Self {
            state: AtomicBool::new(set),
        }
    }

    /// Sets the flag and returns whether it was already set.
    #[inline]
    pub fn test_and_set(&self, order: Ordering) -> bool {
        self.state.swap(true, order.to_core())
    }

    /// Clears the flag.
    #[inline]
    pub fn clear(&self, order: StoreOrdering) {
        self.state.store(false, order.to_core());
    }

    /// Reads the flag without modifying it.
    #[inline]
    pub fn test(&self, order: LoadOrdering) -> bool {
        self.state.load(order.to_core())
    }

    /// Always `true`.
    #[inline(always)]
    pub const fn is_lock_free(&self) -> bool {
        true
    }
}

impl Default for Flag {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Flag")
            .field(&self.test(LoadOrdering::Relaxed))
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(all(test, feature = "std"))]
mod tests {
    use core::sync::atomic::{AtomicUsize, Ordering as CoreOrdering};
    use std::{format, thread};

    use super::Flag;
    use crate::{LoadOrdering, Ordering, StoreOrdering};

    static STATIC_FLAG: Flag = Flag::INIT;

    #[test]
    fn static_starts_clear() {
        assert!(!STATIC_FLAG.test(LoadOrdering::SeqCst));
        assert!(STATIC_FLAG.is_lock_free());
    }

    #[test]
    fn set_and_clear() {
        let flag = Flag::with_state(true);
        assert!(flag.test_and_set(Ordering::Relaxed));
        flag.clear(StoreOrdering::SeqCst);
        assert!(!flag.test(LoadOrdering::Acquire));
        assert!(!flag.test_and_set(Ordering::AcqRel));
        assert_eq!(format!("{flag:?}"), "Flag(true)");
    }

    #[test]
    fn mutual_exclusion() {
        const THREADS: usize = 8;
        const ROUNDS: usize = 2000;

        let flag = Flag::new();
        let inside = AtomicUsize::new(0);
        let entered = AtomicUsize::new(0);

        thread::scope(|s| {
            for _ in 0..THREADS {
                s.spawn(|| {
                    for _ in 0..ROUNDS {
                        while flag.test_and_set(Ordering::Acquire) {
                            core::hint::spin_loop();
                        }
                        assert_eq!(inside.fetch_add(1, CoreOrdering::Relaxed), 0);
                        entered.fetch_add(1, CoreOrdering::Relaxed);
                        inside.fetch_sub(1, CoreOrdering::Relaxed);
                        flag.clear(StoreOrdering::Release);
                    }
                });
            }
        });

        assert_eq!(entered.into_inner(), THREADS * ROUNDS);
    }
}
