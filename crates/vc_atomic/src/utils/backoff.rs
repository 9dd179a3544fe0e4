use core::cell::Cell;
use core::fmt;

/// Largest exponent used by [`Backoff::spin`].
const SPIN_LIMIT: u32 = 6;
/// Past this exponent [`Backoff::snooze`] yields to the scheduler.
const YIELD_LIMIT: u32 = 10;

/// Exponential backoff for spin loops.
///
/// Each call waits roughly twice as long as the previous one, up to a limit.
/// Once [`is_completed`](Backoff::is_completed) reports `true`, a waiter
/// should consider blocking through some other mechanism.
///
/// ```
/// use vc_atomic::{Flag, Ordering};
/// use vc_atomic::utils::Backoff;
///
/// let flag = Flag::new();
/// let backoff = Backoff::new();
/// while flag.test_and_set(Ordering::Acquire) {
///     backoff.snooze();
/// }
/// ```
pub struct Backoff {
    step: Cell<u32>,
}

impl Backoff {
    /// Creates a backoff at its shortest wait.
    #[inline(always)]
    pub const fn new() -> Self {
        Self { step: Cell::new(0) }
    }

    /// Starts over from the shortest wait.
    #[inline]
    pub fn reset(&self) {
        self.step.set(0);
    }

    /// Waits after a failed attempt that lost against another thread's
    /// progress, e.g. a compare-exchange in a retry loop.
    #[inline]
    pub fn spin(&self) {
        let step = self.step.get().min(SPIN_LIMIT);
        for _ in 0..(1_u32 << step) {
            core::hint::spin_loop();
        }

        if self.step.get() <= SPIN_LIMIT {
            self.step.set(self.step.get() + 1);
        }
    }

    /// Waits for another thread to make progress, e.g. to release a lock.
    ///
    /// Without the `std` feature this never yields and only spins.
    #[inline]
    pub fn snooze(&self) {
        if self.step.get() <= SPIN_LIMIT {
            for _ in 0..(1_u32 << self.step.get()) {
                core::hint::spin_loop();
            }
        } else {
            crate::cfg::switch! {
                crate::cfg::std => {
                    ::std::thread::yield_now();
                }
                _ => {
                    for _ in 0..(1_u32 << SPIN_LIMIT) {
                        core::hint::spin_loop();
                    }
                }
            }
        }

        if self.step.get() <= YIELD_LIMIT {
            self.step.set(self.step.get() + 1);
        }
    }

    /// `true` once snoozing has reached its longest wait.
    #[inline]
    pub fn is_completed(&self) -> bool {
        self.step.get() > YIELD_LIMIT
    }
}

impl fmt::Debug for Backoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backoff")
            .field("step", &self.step.get())
            .field("is_completed", &self.is_completed())
            .finish()
    }
}

impl Default for Backoff {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

// -----------------------------------------------------------------------------
// Tests
