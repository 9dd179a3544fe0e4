#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// Compilation config

/// Some macros used for compilation control.
pub mod cfg {
    pub(crate) use vc_cfg::switch;

    vc_cfg::define_alias! {
        #[cfg(feature = "std")] => std,
        #[cfg(all(debug_assertions, feature = "debug"))] => debug,
    }
}

// -----------------------------------------------------------------------------
// no_std support

cfg::std! { extern crate std; }

#[cfg(not(target_has_atomic = "8"))]
compile_error!("Platforms without 8-bit atomics are currently not supported.");

// -----------------------------------------------------------------------------
// Modules

mod cell;
mod error;
mod fence;
mod flag;
mod ordering;

pub mod backend;
pub mod lock_free;
pub mod scalar;
pub mod utils;

// -----------------------------------------------------------------------------
// Exports

pub use cell::Atomic;
pub use error::OrderingError;
pub use fence::{fence, signal_fence};
pub use flag::Flag;
pub use lock_free::{backend_kind, is_lock_free};
pub use ordering::{LoadOrdering, Ordering, StoreOrdering, kill_dependency};
pub use scalar::Scalar;
