use crate::{Flag, LoadOrdering, Ordering};

// -----------------------------------------------------------------------------
// OnceFlag

/// Fires exactly once across all threads.
///
/// Only the firing itself is exclusive: a thread that loses the race does not
/// wait for the winner to finish whatever it does next.
///
/// ```
/// use vc_atomic::utils::OnceFlag;
///
/// let flag = OnceFlag::new();
/// let fired = (0..5).filter(|_| flag.fire()).count();
/// assert_eq!(fired, 1);
/// assert!(flag.has_fired());
/// ```
#[derive(Debug, Default)]
#[repr(transparent)]
pub struct OnceFlag(Flag);

impl OnceFlag {
    /// Creates a flag that has not fired yet.
    #[inline]
    pub const fn new() -> Self {
        Self(Flag::new())
    }

    /// Returns `true` for the first call only.
    #[inline]
    pub fn fire(&self) -> bool {
        // Once fired, a plain read is enough and keeps the line shared.
        !self.has_fired() && !self.0.test_and_set(Ordering::Relaxed)
    }

    /// Returns `true` once some call to [`fire`](OnceFlag::fire) succeeded.
    #[inline]
    pub fn has_fired(&self) -> bool {
        self.0.test(LoadOrdering::Relaxed)
    }
}

// -----------------------------------------------------------------------------
// once_expr

/// Evaluates an expression the first time this call site is reached.
///
/// Later evaluations, including concurrent ones, are skipped. Used for
/// one-time diagnostics.
///
/// ```
/// let mut count = 0;
///
/// for _ in 0..5 {
///     vc_atomic::once_expr!(count += 1);
/// }
///
/// assert_eq!(count, 1);
/// ```
#[macro_export]
macro_rules! once_expr {
    ($expression:expr) => {{
        static FIRED: $crate::utils::OnceFlag = $crate::utils::OnceFlag::new();
        if FIRED.fire() {
            $expression;
        }
    }};
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(all(test, feature = "std"))]
mod tests {
    use core::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    use super::OnceFlag;

    #[test]
    fn fires_once_across_threads() {
        let flag = OnceFlag::new();
        let fired = AtomicUsize::new(0);

        thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for _ in 0..100 {
                        if flag.fire() {
                            fired.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                });
            }
        });

        assert_eq!(fired.into_inner(), 1);
    }

    #[test]
    fn once_per_call_site() {
        let mut first = 0;
        let mut second = 0;
        for _ in 0..3 {
            crate::once_expr!(first += 1);
            crate::once_expr!(second += 1);
        }
        assert_eq!((first, second), (1, 1));
    }
}
