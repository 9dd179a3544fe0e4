//! Which cell types are served by native instructions on this target.
//!
//! The answer is fixed at compile time per type; it never depends on the
//! value or address of a particular cell.
//!
//! ```
//! use vc_atomic::{backend::BackendKind, backend_kind, is_lock_free};
//!
//! assert!(!is_lock_free::<u128>());
//! assert_eq!(backend_kind::<i128>(), BackendKind::Locked);
//! ```

use core::fmt;

use crate::backend::{Backend, BackendKind};
use crate::{Atomic, Scalar};

/// Returns whether [`Atomic<T>`] is lock-free on this target.
#[inline]
pub const fn is_lock_free<T: Scalar>() -> bool {
    Atomic::<T>::IS_ALWAYS_LOCK_FREE
}

/// Returns the backend serving [`Atomic<T>`] on this target.
#[inline]
pub const fn backend_kind<T: Scalar>() -> BackendKind {
    <T::Backend as Backend<T>>::KIND
}

// -----------------------------------------------------------------------------
// LockFreeSummary

/// Lock-freedom of every supported width, as one report.
///
/// The [`Display`](fmt::Display) form is one `name: kind` line per width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LockFreeSummary {
    /// Backend of `Atomic<bool>`.
    pub bool: BackendKind,
    /// Backend of `Atomic<u8>`.
    pub u8: BackendKind,
    /// Backend of `Atomic<u16>`.
    pub u16: BackendKind,
    /// Backend of `Atomic<u32>`.
    pub u32: BackendKind,
    /// Backend of `Atomic<u64>`.
    pub u64: BackendKind,
    /// Backend of `Atomic<u128>`.
    pub u128: BackendKind,
    /// Backend of `Atomic<usize>`.
    pub usize: BackendKind,
    /// Backend of `Atomic<*mut U>`.
    pub ptr: BackendKind,
}

impl LockFreeSummary {
    /// The summary for the current target.
    pub const fn current() -> Self {
        Self {
            bool: backend_kind::<bool>(),
            u8: backend_kind::<u8>(),
            u16: backend_kind::<u16>(),
            u32: backend_kind::<u32>(),
            u64: backend_kind::<u64>(),
            u128: backend_kind::<u128>(),
            usize: backend_kind::<usize>(),
            ptr: backend_kind::<*mut ()>(),
        }
    }

    /// `true` if every width except 128 bits is native.
    pub const fn all_native_up_to_ptr(&self) -> bool {
        self.bool.is_lock_free()
            && self.u8.is_lock_free()
            && self.u16.is_lock_free()
            && self.u32.is_lock_free()
            && self.u64.is_lock_free()
            && self.usize.is_lock_free()
            && self.ptr.is_lock_free()
    }

    fn rows(&self) -> [(&'static str, BackendKind); 8] {
        [
            ("bool", self.bool),
            ("u8", self.u8),
            ("u16", self.u16),
            ("u32", self.u32),
            ("u64", self.u64),
            ("u128", self.u128),
            ("usize", self.usize),
            ("ptr", self.ptr),
        ]
    }
}

impl fmt::Display for LockFreeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, kind) in self.rows() {
            writeln!(f, "{name:>5}: {kind}")?;
        }
        Ok(())
    }
}

/// Shorthand for [`LockFreeSummary::current`].
#[inline]
pub const fn summary() -> LockFreeSummary {
    LockFreeSummary::current()
}

/// Logs the summary at `info` level, one record per width.
pub fn log_summary() {
    let summary = summary();
    for (name, kind) in summary.rows() {
        log::info!("atomic {name}: {kind}");
    }
    if !summary.all_native_up_to_ptr() {
        log::warn!("some atomic widths fall back to the locked backend on this target");
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(all(test, feature = "std"))]
mod tests {
    use std::string::ToString;

    use super::{LockFreeSummary, backend_kind, is_lock_free, log_summary, summary};
    use crate::backend::BackendKind;
    use crate::{Atomic, Flag};

    #[test]
    fn queries_agree() {
        assert_eq!(is_lock_free::<u128>(), Atomic::<u128>::IS_ALWAYS_LOCK_FREE);
        assert_eq!(is_lock_free::<u8>(), Atomic::new(0_u8).is_lock_free());
        assert_eq!(backend_kind::<i128>(), BackendKind::Locked);
        assert!(Flag::new().is_lock_free());

        #[cfg(target_has_atomic = "ptr")]
        {
            assert!(is_lock_free::<usize>());
            assert!(is_lock_free::<*mut u8>());
        }
    }

    #[test]
    fn summary_display() {
        let s = summary();
        assert_eq!(s, LockFreeSummary::current());
        assert_eq!(s.u128, BackendKind::Locked);

        let text = s.to_string();
        assert_eq!(text.lines().count(), 8);
        assert!(text.contains(" u128: locked"));

        #[cfg(all(
            target_has_atomic = "8",
            target_has_atomic = "16",
            target_has_atomic = "32",
            target_has_atomic = "64",
            target_has_atomic = "ptr"
        ))]
        {
            assert!(s.all_native_up_to_ptr());
            assert!(text.contains("  u64: native"));
        }

        log_summary();
    }
}
