#![expect(unsafe_code, reason = "Native atomics are created from raw storage.")]

use core::sync::atomic as core_atomic;

use super::{ArithmeticBackend, Backend, BackendKind, BitwiseBackend, PointerBackend, sealed};
use crate::{LoadOrdering, Ordering, StoreOrdering};

/// Backend using the target's atomic instructions.
///
/// Each operation views the cell storage as the matching
/// `core::sync::atomic` type, so it compiles to the same instructions as the
/// standard library atomics.
#[derive(Debug)]
pub struct Native;

impl sealed::Sealed for Native {}

macro_rules! impl_native {
    ($( #[$cfg:meta] $ty:ty => $atomic:ident; )*) => {$(
        #[$cfg]
        unsafe impl Backend<$ty> for Native {
            const KIND: BackendKind = BackendKind::Native;

            #[inline]
            unsafe fn load(src: *mut $ty, order: LoadOrdering) -> $ty {
                // SAFETY: the caller guarantees alignment and validity.
                unsafe { core_atomic::$atomic::from_ptr(src) }.load(order.to_core())
            }

            #[inline]
            unsafe fn store(dst: *mut $ty, val: $ty, order: StoreOrdering) {
                unsafe { core_atomic::$atomic::from_ptr(dst) }.store(val, order.to_core());
            }

            #[inline]
            unsafe fn swap(dst: *mut $ty, val: $ty, order: Ordering) -> $ty {
                unsafe { core_atomic::$atomic::from_ptr(dst) }.swap(val, order.to_core())
            }

            #[inline]
            unsafe fn compare_exchange(
                dst: *mut $ty,
                current: $ty,
                new: $ty,
                success: Ordering,
                failure: LoadOrdering,
            ) -> Result<$ty, $ty> {
                unsafe { core_atomic::$atomic::from_ptr(dst) }.compare_exchange(
                    current,
                    new,
                    success.to_core(),
                    failure.to_core(),
                )
            }

            #[inline]
            unsafe fn compare_exchange_weak(
                dst: *mut $ty,
                current: $ty,
                new: $ty,
                success: Ordering,
                failure: LoadOrdering,
            ) -> Result<$ty, $ty> {
                unsafe { core_atomic::$atomic::from_ptr(dst) }.compare_exchange_weak(
                    current,
                    new,
                    success.to_core(),
                    failure.to_core(),
                )
            }
        }

        #[$cfg]
        unsafe impl BitwiseBackend<$ty> for Native {
            #[inline]
            unsafe fn fetch_and(dst: *mut $ty, val: $ty, order: Ordering) -> $ty {
                unsafe { core_atomic::$atomic::from_ptr(dst) }.fetch_and(val, order.to_core())
            }

            #[inline]
            unsafe fn fetch_or(dst: *mut $ty, val: $ty, order: Ordering) -> $ty {
                unsafe { core_atomic::$atomic::from_ptr(dst) }.fetch_or(val, order.to_core())
            }

            #[inline]
            unsafe fn fetch_xor(dst: *mut $ty, val: $ty, order: Ordering) -> $ty {
                unsafe { core_atomic::$atomic::from_ptr(dst) }.fetch_xor(val, order.to_core())
            }
        }
    )*};
}

macro_rules! impl_native_arithmetic {
    ($( #[$cfg:meta] $ty:ty => $atomic:ident; )*) => {
        impl_native! { $( #[$cfg] $ty => $atomic; )* }

        $(
            #[$cfg]
            unsafe impl ArithmeticBackend<$ty> for Native {
                #[inline]
                unsafe fn fetch_add(dst: *mut $ty, val: $ty, order: Ordering) -> $ty {
                    unsafe { core_atomic::$atomic::from_ptr(dst) }.fetch_add(val, order.to_core())
                }

                #[inline]
                unsafe fn fetch_sub(dst: *mut $ty, val: $ty, order: Ordering) -> $ty {
                    unsafe { core_atomic::$atomic::from_ptr(dst) }.fetch_sub(val, order.to_core())
                }
            }
        )*
    };
}

impl_native! {
    #[cfg(target_has_atomic = "8")] bool => AtomicBool;
}

impl_native_arithmetic! {
    #[cfg(target_has_atomic = "8")] u8 => AtomicU8;
    #[cfg(target_has_atomic = "8")] i8 => AtomicI8;
    #[cfg(target_has_atomic = "16")] u16 => AtomicU16;
    #[cfg(target_has_atomic = "16")] i16 => AtomicI16;
    #[cfg(target_has_atomic = "32")] u32 => AtomicU32;
    #[cfg(target_has_atomic = "32")] i32 => AtomicI32;
    #[cfg(target_has_atomic = "64")] u64 => AtomicU64;
    #[cfg(target_has_atomic = "64")] i64 => AtomicI64;
    #[cfg(target_has_atomic = "ptr")] usize => AtomicUsize;
    #[cfg(target_has_atomic = "ptr")] isize => AtomicIsize;
}

#[cfg(target_has_atomic = "ptr")]
unsafe impl<U> Backend<*mut U> for Native {
    const KIND: BackendKind = BackendKind::Native;

    #[inline]
    unsafe fn load(src: *mut *mut U, order: LoadOrdering) -> *mut U {
        unsafe { core_atomic::AtomicPtr::from_ptr(src) }.load(order.to_core())
    }

    #[inline]
    unsafe fn store(dst: *mut *mut U, val: *mut U, order: StoreOrdering) {
        unsafe { core_atomic::AtomicPtr::from_ptr(dst) }.store(val, order.to_core());
    }

    #[inline]
    unsafe fn swap(dst: *mut *mut U, val: *mut U, order: Ordering) -> *mut U {
        unsafe { core_atomic::AtomicPtr::from_ptr(dst) }.swap(val, order.to_core())
    }

    #[inline]
    unsafe fn compare_exchange(
        dst: *mut *mut U,
        current: *mut U,
        new: *mut U,
        success: Ordering,
        failure: LoadOrdering,
    ) -> Result<*mut U, *mut U> {
        unsafe { core_atomic::AtomicPtr::from_ptr(dst) }.compare_exchange(
            current,
            new,
            success.to_core(),
            failure.to_core(),
        )
    }

    #[inline]
    unsafe fn compare_exchange_weak(
        dst: *mut *mut U,
        current: *mut U,
        new: *mut U,
        success: Ordering,
        failure: LoadOrdering,
    ) -> Result<*mut U, *mut U> {
        unsafe { core_atomic::AtomicPtr::from_ptr(dst) }.compare_exchange_weak(
            current,
            new,
            success.to_core(),
            failure.to_core(),
        )
    }
}

#[cfg(target_has_atomic = "ptr")]
unsafe impl<U> PointerBackend<U> for Native {
    #[inline]
    unsafe fn fetch_ptr_add(dst: *mut *mut U, count: usize, order: Ordering) -> *mut U {
        unsafe { core_atomic::AtomicPtr::from_ptr(dst) }.fetch_ptr_add(count, order.to_core())
    }

    #[inline]
    unsafe fn fetch_ptr_sub(dst: *mut *mut U, count: usize, order: Ordering) -> *mut U {
        unsafe { core_atomic::AtomicPtr::from_ptr(dst) }.fetch_ptr_sub(count, order.to_core())
    }
}
