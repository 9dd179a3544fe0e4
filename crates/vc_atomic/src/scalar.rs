//! The closed set of types an [`Atomic`](crate::Atomic) can hold.
//!
//! | type | width | backend |
//! |------|-------|---------|
//! | `bool`, `u8`, `i8` | 8 | native when `target_has_atomic = "8"` |
//! | `u16`, `i16` | 16 | native when `target_has_atomic = "16"` |
//! | `u32`, `i32` | 32 | native when `target_has_atomic = "32"` |
//! | `u64`, `i64` | 64 | native when `target_has_atomic = "64"` |
//! | `usize`, `isize`, `*mut U` | pointer | native when `target_has_atomic = "ptr"` |
//! | `u128`, `i128` | 128 | always locked |
//!
//! Widths without native support fall back to [`Locked`].

use core::ops::{BitAnd, BitOr, BitXor};

use crate::backend::{Backend, Locked, Native};

mod sealed {
    pub trait Sealed {}
}

// -----------------------------------------------------------------------------
// Alignment markers

macro_rules! align_markers {
    ($($name:ident = $align:literal;)*) => {$(
        #[doc(hidden)]
        #[derive(Clone, Copy, Debug)]
        #[repr(align($align))]
        pub struct $name;
    )*};
}

align_markers! {
    Align1 = 1;
    Align2 = 2;
    Align4 = 4;
    Align8 = 8;
    Align16 = 16;
}

#[cfg(target_pointer_width = "16")]
type AlignPtr = Align2;
#[cfg(target_pointer_width = "32")]
type AlignPtr = Align4;
#[cfg(target_pointer_width = "64")]
type AlignPtr = Align8;

// -----------------------------------------------------------------------------
// Scalar

/// A type that can be stored in an [`Atomic`](crate::Atomic).
///
/// Sealed: implemented for `bool`, the fixed-width integers up to 128 bits,
/// `usize`, `isize` and `*mut U`.
pub trait Scalar: Copy + PartialEq + sealed::Sealed {
    /// Zero-sized marker whose alignment equals `size_of::<Self>()`.
    #[doc(hidden)]
    type Align: Copy;

    /// The implementation serving this type on the current target.
    type Backend: Backend<Self>;

    /// Width of the stored value in bits.
    const BITS: u32 = (size_of::<Self>() * 8) as u32;
}

/// Integer scalars, which support the arithmetic fetch operations.
pub trait Integer:
    Scalar + BitAnd<Output = Self> + BitOr<Output = Self> + BitXor<Output = Self>
{
    /// `self + rhs`, wrapping around at the type boundary.
    fn wrapping_add(self, rhs: Self) -> Self;
    /// `self - rhs`, wrapping around at the type boundary.
    fn wrapping_sub(self, rhs: Self) -> Self;
}

macro_rules! impl_scalar {
    ($( #[cfg($cfg:meta)] $ty:ty => $align:ty; )*) => {$(
        impl sealed::Sealed for $ty {}

        impl Scalar for $ty {
            type Align = $align;

            #[cfg($cfg)]
            type Backend = Native;
            #[cfg(not($cfg))]
            type Backend = Locked;
        }
    )*};
}

macro_rules! impl_integer {
    ($( #[cfg($cfg:meta)] $ty:ty => $align:ty; )*) => {
        impl_scalar! { $( #[cfg($cfg)] $ty => $align; )* }

        $(
            impl Integer for $ty {
                #[inline(always)]
                fn wrapping_add(self, rhs: Self) -> Self {
                    <$ty>::wrapping_add(self, rhs)
                }

                #[inline(always)]
                fn wrapping_sub(self, rhs: Self) -> Self {
                    <$ty>::wrapping_sub(self, rhs)
                }
            }
        )*
    };
}

impl_scalar! {
    #[cfg(target_has_atomic = "8")] bool => Align1;
}

impl_integer! {
    #[cfg(target_has_atomic = "8")] u8 => Align1;
    #[cfg(target_has_atomic = "8")] i8 => Align1;
    #[cfg(target_has_atomic = "16")] u16 => Align2;
    #[cfg(target_has_atomic = "16")] i16 => Align2;
    #[cfg(target_has_atomic = "32")] u32 => Align4;
    #[cfg(target_has_atomic = "32")] i32 => Align4;
    #[cfg(target_has_atomic = "64")] u64 => Align8;
    #[cfg(target_has_atomic = "64")] i64 => Align8;
    #[cfg(target_has_atomic = "ptr")] usize => AlignPtr;
    #[cfg(target_has_atomic = "ptr")] isize => AlignPtr;
    // No stable 128-bit atomics: `any()` is always false.
    #[cfg(any())] u128 => Align16;
    #[cfg(any())] i128 => Align16;
}

impl<U> sealed::Sealed for *mut U {}

impl<U> Scalar for *mut U {
    type Align = AlignPtr;

    #[cfg(target_has_atomic = "ptr")]
    type Backend = Native;
    #[cfg(not(target_has_atomic = "ptr"))]
    type Backend = Locked;
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::{Align1, Align2, Align4, Align8, Align16, AlignPtr, Integer, Scalar};
    use crate::backend::Backend;

    #[test]
    fn markers_are_zero_sized() {
        assert_eq!(size_of::<Align1>(), 0);
        assert_eq!(size_of::<[Align16; 0]>(), 0);
        assert_eq!(align_of::<[Align2; 0]>(), 2);
        assert_eq!(align_of::<[Align4; 0]>(), 4);
        assert_eq!(align_of::<[Align8; 0]>(), 8);
        assert_eq!(align_of::<[Align16; 0]>(), 16);
        assert_eq!(align_of::<AlignPtr>(), size_of::<usize>());
    }

    #[test]
    fn alignment_matches_width() {
        fn check<T: Scalar>() {
            assert_eq!(align_of::<T::Align>(), size_of::<T>());
            assert_eq!(T::BITS as usize, size_of::<T>() * 8);
        }

        check::<bool>();
        check::<u8>();
        check::<i16>();
        check::<u32>();
        check::<i64>();
        check::<u128>();
        check::<usize>();
        check::<*mut [u8; 3]>();
    }

    #[test]
    fn backend_follows_width() {
        use crate::backend::BackendKind;

        fn kind<T: Scalar>() -> BackendKind {
            <T::Backend as Backend<T>>::KIND
        }

        assert_eq!(kind::<u128>(), BackendKind::Locked);
        assert_eq!(kind::<i128>(), BackendKind::Locked);
        #[cfg(target_has_atomic = "8")]
        assert_eq!(kind::<bool>(), BackendKind::Native);
        #[cfg(target_has_atomic = "32")]
        assert_eq!(kind::<i32>(), BackendKind::Native);
        #[cfg(not(target_has_atomic = "64"))]
        assert_eq!(kind::<u64>(), BackendKind::Locked);
        #[cfg(target_has_atomic = "ptr")]
        assert_eq!(kind::<*mut u8>(), BackendKind::Native);
    }

    #[test]
    fn wrapping() {
        assert_eq!(Integer::wrapping_add(u8::MAX, 1), 0);
        assert_eq!(Integer::wrapping_sub(0_i32, 1), -1);
        assert_eq!(Integer::wrapping_sub(i64::MIN, 1), i64::MAX);
    }
}
