//! Spin-based building blocks, all layered on [`Flag`](crate::Flag).
//!
//! - [`Backoff`]: exponential backoff for spin loops.
//! - [`CachePadded`]: keeps a value on its own cache line.
//! - [`RawSpinLock`] and [`RawSpinGuard`]: a data-less test-and-test-and-set lock.
//!   The locked backend stripes its table over these.
//! - [`SpinLock`]: a lock owning the data it protects.
//! - [`OnceFlag`] and [`once_expr!`](crate::once_expr): one-time firing.

// -----------------------------------------------------------------------------
// Modules

mod backoff;
mod cache_padded;
mod once_flag;
mod raw_spin;
mod spin_lock;

// -----------------------------------------------------------------------------
// Exports

pub use backoff::Backoff;
pub use cache_padded::CachePadded;
pub use once_flag::OnceFlag;
pub use raw_spin::{RawSpinGuard, RawSpinLock};
pub use spin_lock::{SpinLock, SpinLockGuard};

// -----------------------------------------------------------------------------
// Utils for test
