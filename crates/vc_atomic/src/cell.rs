#![expect(unsafe_code, reason = "Atomic hands its storage to the backend.")]

use core::cell::UnsafeCell;
use core::fmt;
use core::panic::RefUnwindSafe;

use crate::backend::{ArithmeticBackend, Backend, BackendKind, BitwiseBackend, PointerBackend};
use crate::{LoadOrdering, Ordering, Scalar, StoreOrdering};

// -----------------------------------------------------------------------------
// Atomic

/// A scalar value that can be shared between threads.
///
/// The value is only ever read or written through the operations below, each
/// of which is indivisible: no thread observes a partially written value.
/// Every operation takes an explicit ordering; the `SeqCst` shorthands
/// [`get`](Atomic::get), [`set`](Atomic::set) and
/// [`replace`](Atomic::replace) exist for call sites that do not care.
///
/// # Layout
///
/// `Atomic<T>` occupies exactly `size_of::<T>()` bytes and is aligned to at
/// least `size_of::<T>()`, even on targets where `T` itself is aligned less
/// (e.g. `u64` on 32-bit x86).
///
/// # Lock-freedom
///
/// Whether operations compile to native instructions or go through the
/// internal lock table is fixed per type and target, see
/// [`IS_ALWAYS_LOCK_FREE`](Atomic::IS_ALWAYS_LOCK_FREE).
///
/// # Examples
///
/// ```
/// use vc_atomic::{Atomic, LoadOrdering, Ordering, StoreOrdering};
///
/// let value = Atomic::new(5_i32);
/// value.store(10, StoreOrdering::Release);
/// assert_eq!(value.swap(3, Ordering::AcqRel), 10);
/// assert_eq!(value.fetch_add(2, Ordering::Relaxed), 3);
/// assert_eq!(value.load(LoadOrdering::Acquire), 5);
/// ```
#[repr(C)]
pub struct Atomic<T: Scalar> {
    _align: [T::Align; 0],
    value: UnsafeCell<T>,
}

// SAFETY: all shared access goes through the backend, which is atomic.
unsafe impl<T: Scalar> Send for Atomic<T> {}
unsafe impl<T: Scalar> Sync for Atomic<T> {}
impl<T: Scalar> RefUnwindSafe for Atomic<T> {}

impl<T: Scalar> Atomic<T> {
    /// `true` if every operation on this type uses native atomic instructions.
    ///
    /// ```
    /// use vc_atomic::Atomic;
    ///
    /// assert!(!Atomic::<u128>::IS_ALWAYS_LOCK_FREE);
    /// # #[cfg(target_has_atomic = "32")]
    /// assert!(Atomic::<u32>::IS_ALWAYS_LOCK_FREE);
    /// ```
    pub const IS_ALWAYS_LOCK_FREE: bool = Self::BACKEND.is_lock_free();

    /// The backend serving this type on the current target.
    pub const BACKEND: BackendKind = <T::Backend as Backend<T>>::KIND;

    /// Creates a new atomic holding `value`.
    ///
    /// Usable in `static` items.
    ///
    /// ```
    /// use vc_atomic::{Atomic, Ordering};
    ///
    /// static COUNTER: Atomic<usize> = Atomic::new(0);
    ///
    /// assert_eq!(COUNTER.fetch_add(1, Ordering::Relaxed), 0);
    /// ```
    #[inline]
    pub const fn new(value: T) -> Self {
        Self {
            _align: [],
            value: UnsafeCell::new(value),
        }
    }

    /// Returns whether operations on this cell are lock-free.
    ///
    /// Advisory only: correctness never depends on the answer.
    #[inline]
    pub const fn is_lock_free(&self) -> bool {
        Self::IS_ALWAYS_LOCK_FREE
    }

    /// Returns a mutable reference to the value.
    ///
    /// The exclusive borrow guarantees that no other thread accesses the cell.
    #[inline]
    pub fn get_mut(&mut self) -> &mut T {
        self.value.get_mut()
    }

    /// Consumes the cell and returns the value.
    #[inline]
    pub fn into_inner(self) -> T {
        self.value.into_inner()
    }

    /// Returns a raw pointer to the storage.
    ///
    /// Writing through this pointer while the cell is shared bypasses the
    /// atomic operations and is undefined behavior.
    #[inline]
    pub const fn as_ptr(&self) -> *mut T {
        self.value.get()
    }

    /// Loads the value.
    ///
    /// With [`LoadOrdering::Acquire`], every write that happened before the
    /// release store this load reads from is visible after it.
    #[inline]
    pub fn load(&self, order: LoadOrdering) -> T {
        unsafe { T::Backend::load(self.as_ptr(), order) }
    }

    /// Stores `value`.
    ///
    /// With [`StoreOrdering::Release`], every write before this store is
    /// visible to a thread whose acquire load reads this value (or a later one).
    #[inline]
    pub fn store(&self, value: T, order: StoreOrdering) {
        unsafe { T::Backend::store(self.as_ptr(), value, order) }
    }

    /// Stores `value` and returns the previous value, in one step.
    #[doc(alias = "exchange")]
    #[inline]
    pub fn swap(&self, value: T, order: Ordering) -> T {
        unsafe { T::Backend::swap(self.as_ptr(), value, order) }
    }

    /// Stores `new` if the current value equals `current`.
    ///
    /// Returns `Ok(previous)` when the value was replaced, otherwise
    /// `Err(observed)` with the value seen at the moment of the comparison.
    /// Never fails when the values were equal.
    ///
    /// `failure` must not be stronger than the read side of `success`, see
    /// [`Ordering::permits_failure`]. With the `debug` feature in a debug
    /// build this is asserted.
    ///
    /// ```
    /// use vc_atomic::{Atomic, LoadOrdering, Ordering};
    ///
    /// let value = Atomic::new(1_u8);
    /// assert_eq!(value.compare_exchange(1, 2, Ordering::AcqRel, LoadOrdering::Acquire), Ok(1));
    /// assert_eq!(value.compare_exchange(1, 3, Ordering::AcqRel, LoadOrdering::Acquire), Err(2));
    /// ```
    #[inline]
    pub fn compare_exchange(
        &self,
        current: T,
        new: T,
        success: Ordering,
        failure: LoadOrdering,
    ) -> Result<T, T> {
        check_orderings(success, failure);
        unsafe { T::Backend::compare_exchange(self.as_ptr(), current, new, success, failure) }
    }

    /// Like [`compare_exchange`](Atomic::compare_exchange), but may fail even
    /// when the values are equal.
    ///
    /// Only meant for retry loops, where it can be cheaper on platforms
    /// using load-link/store-conditional. No bound on the number of spurious
    /// failures is given, and the library never retries by itself.
    ///
    /// ```
    /// use vc_atomic::{Atomic, LoadOrdering, Ordering};
    ///
    /// let value = Atomic::new(4_u32);
    /// let mut current = value.load(LoadOrdering::Relaxed);
    /// loop {
    ///     match value.compare_exchange_weak(current, current * 2, Ordering::AcqRel, LoadOrdering::Relaxed) {
    ///         Ok(_) => break,
    ///         Err(observed) => current = observed,
    ///     }
    /// }
    /// assert_eq!(value.load(LoadOrdering::Relaxed), 8);
    /// ```
    #[inline]
    pub fn compare_exchange_weak(
        &self,
        current: T,
        new: T,
        success: Ordering,
        failure: LoadOrdering,
    ) -> Result<T, T> {
        check_orderings(success, failure);
        unsafe { T::Backend::compare_exchange_weak(self.as_ptr(), current, new, success, failure) }
    }

    /// Compare-exchange against a caller-owned expected slot.
    ///
    /// Returns `true` if `desired` was stored. On failure, `expected` is
    /// overwritten with the observed value, ready for the next attempt.
    ///
    /// ```
    /// use vc_atomic::{Atomic, LoadOrdering, Ordering};
    ///
    /// let value = Atomic::new(7_i64);
    /// let mut expected = 0;
    /// assert!(!value.compare_exchange_in_place(&mut expected, 1, Ordering::SeqCst, LoadOrdering::SeqCst));
    /// assert_eq!(expected, 7);
    /// assert!(value.compare_exchange_in_place(&mut expected, 1, Ordering::SeqCst, LoadOrdering::SeqCst));
    /// ```
    #[inline]
    pub fn compare_exchange_in_place(
        &self,
        expected: &mut T,
        desired: T,
        success: Ordering,
        failure: LoadOrdering,
    ) -> bool {
        write_back(expected, self.compare_exchange(*expected, desired, success, failure))
    }

    /// Weak form of [`compare_exchange_in_place`](Atomic::compare_exchange_in_place).
    ///
    /// On a spurious failure `expected` still receives the observed value,
    /// which then equals what it held before.
    #[inline]
    pub fn compare_exchange_weak_in_place(
        &self,
        expected: &mut T,
        desired: T,
        success: Ordering,
        failure: LoadOrdering,
    ) -> bool {
        write_back(expected, self.compare_exchange_weak(*expected, desired, success, failure))
    }

    /// `SeqCst` load.
    #[inline]
    pub fn get(&self) -> T {
        self.load(LoadOrdering::SeqCst)
    }

    /// `SeqCst` store.
    #[inline]
    pub fn set(&self, value: T) {
        self.store(value, StoreOrdering::SeqCst);
    }

    /// `SeqCst` swap.
    #[inline]
    pub fn replace(&self, value: T) -> T {
        self.swap(value, Ordering::SeqCst)
    }
}

#[inline(always)]
fn check_orderings(success: Ordering, failure: LoadOrdering) {
    if crate::cfg::debug!() {
        assert!(
            success.permits_failure(failure),
            "compare-exchange failure ordering {failure:?} is stronger than the read side of {success:?}",
        );
    }
}

#[inline(always)]
fn write_back<T: Copy>(expected: &mut T, result: Result<T, T>) -> bool {
    match result {
        Ok(_) => true,
        Err(observed) => {
            *expected = observed;
            false
        }
    }
}

// -----------------------------------------------------------------------------
// Fetch-and-modify

impl<T: Scalar> Atomic<T>
where
    T::Backend: BitwiseBackend<T>,
{
    /// Bitwise (or logical, for `bool`) "and"; returns the previous value.
    #[inline]
    pub fn fetch_and(&self, value: T, order: Ordering) -> T {
        unsafe { T::Backend::fetch_and(self.as_ptr(), value, order) }
    }

    /// Bitwise (or logical, for `bool`) "or"; returns the previous value.
    #[inline]
    pub fn fetch_or(&self, value: T, order: Ordering) -> T {
        unsafe { T::Backend::fetch_or(self.as_ptr(), value, order) }
    }

    /// Bitwise (or logical, for `bool`) "xor"; returns the previous value.
    #[inline]
    pub fn fetch_xor(&self, value: T, order: Ordering) -> T {
        unsafe { T::Backend::fetch_xor(self.as_ptr(), value, order) }
    }
}

impl<T: Scalar> Atomic<T>
where
    T::Backend: ArithmeticBackend<T>,
{
    /// Wrapping addition; returns the previous value.
    ///
    /// ```
    /// use vc_atomic::{Atomic, Ordering};
    ///
    /// let value = Atomic::new(u8::MAX);
    /// assert_eq!(value.fetch_add(2, Ordering::Relaxed), u8::MAX);
    /// assert_eq!(value.get(), 1);
    /// ```
    #[inline]
    pub fn fetch_add(&self, value: T, order: Ordering) -> T {
        unsafe { T::Backend::fetch_add(self.as_ptr(), value, order) }
    }

    /// Wrapping subtraction; returns the previous value.
    #[inline]
    pub fn fetch_sub(&self, value: T, order: Ordering) -> T {
        unsafe { T::Backend::fetch_sub(self.as_ptr(), value, order) }
    }
}

impl<U> Atomic<*mut U>
where
    <*mut U as Scalar>::Backend: PointerBackend<U>,
{
    /// Offsets the pointer by `count` elements of `U`; returns the previous
    /// pointer.
    ///
    /// The offset wraps and is never dereferenced here.
    ///
    /// ```
    /// use vc_atomic::{Atomic, Ordering};
    ///
    /// let mut array = [1_u16, 2, 3];
    /// let cursor = Atomic::new(array.as_mut_ptr());
    /// let first = cursor.fetch_ptr_add(2, Ordering::Relaxed);
    /// assert_eq!(unsafe { first.add(2) }, cursor.get());
    /// ```
    #[inline]
    pub fn fetch_ptr_add(&self, count: usize, order: Ordering) -> *mut U {
        unsafe { <*mut U as Scalar>::Backend::fetch_ptr_add(self.as_ptr(), count, order) }
    }

    /// Offsets the pointer backwards by `count` elements of `U`; returns the
    /// previous pointer.
    #[inline]
    pub fn fetch_ptr_sub(&self, count: usize, order: Ordering) -> *mut U {
        unsafe { <*mut U as Scalar>::Backend::fetch_ptr_sub(self.as_ptr(), count, order) }
    }
}

// -----------------------------------------------------------------------------
// Traits

impl<T: Scalar + Default> Default for Atomic<T> {
    #[inline]
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Scalar> From<T> for Atomic<T> {
    #[inline]
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: Scalar + fmt::Debug> fmt::Debug for Atomic<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Atomic")
            .field(&self.load(LoadOrdering::Relaxed))
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(all(test, feature = "std"))]
mod tests {
    use core::cell::UnsafeCell;
    use core::ptr;
    use std::{format, thread, vec::Vec};

    use super::Atomic;
    use crate::backend::{ArithmeticBackend, BackendKind};
    use crate::scalar::Integer;
    use crate::{LoadOrdering, Ordering, StoreOrdering};

    macro_rules! for_both_backends {
        ($name:ident => $body:item) => {
            mod $name {
                use super::*;

                $body

                #[test]
                fn native() {
                    run::<u64>();
                }

                #[test]
                fn locked() {
                    run::<u128>();
                }
            }
        };
    }

    trait Value:
        Integer<Backend: ArithmeticBackend<Self>> + From<u8> + Into<u128> + core::fmt::Debug
    {
    }
    impl Value for u64 {}
    impl Value for u128 {}

    fn n<T: Value>(v: u8) -> T {
        T::from(v)
    }

    #[test]
    fn backends() {
        #[cfg(target_has_atomic = "64")]
        assert_eq!(Atomic::<u64>::BACKEND, BackendKind::Native);
        assert_eq!(Atomic::<u128>::BACKEND, BackendKind::Locked);
        assert_eq!(Atomic::<i128>::BACKEND, BackendKind::Locked);
        assert!(!Atomic::new(0_u128).is_lock_free());
        #[cfg(target_has_atomic = "8")]
        assert!(Atomic::new(false).is_lock_free());
    }

    #[test]
    fn layout() {
        fn check<T: crate::Scalar>() {
            assert_eq!(size_of::<Atomic<T>>(), size_of::<T>());
            assert!(align_of::<Atomic<T>>() >= size_of::<T>());
        }

        check::<bool>();
        check::<u8>();
        check::<i16>();
        check::<u32>();
        check::<u64>();
        check::<i64>();
        check::<u128>();
        check::<isize>();
        check::<*mut ()>();
    }

    for_both_backends!(store_then_load => fn run<T: Value>() {
        let cell = Atomic::new(n::<T>(0));
        for v in [1_u8, 42, 255] {
            cell.store(n(v), StoreOrdering::SeqCst);
            assert_eq!(cell.load(LoadOrdering::SeqCst), n(v));
        }
    });

    for_both_backends!(swap_returns_previous => fn run<T: Value>() {
        let cell = Atomic::new(n::<T>(3));
        for order in Ordering::ALL {
            let before = cell.load(LoadOrdering::Relaxed);
            assert_eq!(cell.swap(n(9), order), before);
            assert_eq!(cell.load(LoadOrdering::Relaxed), n(9));
            cell.store(n(3), StoreOrdering::Relaxed);
        }
    });

    for_both_backends!(strong_cas_is_deterministic => fn run<T: Value>() {
        let cell = Atomic::new(n::<T>(0));
        for i in 0..200_u8 {
            assert_eq!(
                cell.compare_exchange(n(i), n(i + 1), Ordering::AcqRel, LoadOrdering::Acquire),
                Ok(n(i))
            );
        }
        assert_eq!(
            cell.compare_exchange(n(0), n(1), Ordering::SeqCst, LoadOrdering::SeqCst),
            Err(n(200))
        );
        assert_eq!(cell.get(), n(200));
    });

    for_both_backends!(fetch_returns_previous => fn run<T: Value>() {
        let cell = Atomic::new(n::<T>(10));
        assert_eq!(cell.fetch_add(n(5), Ordering::Relaxed), n(10));
        assert_eq!(cell.get(), n(15));
        assert_eq!(cell.fetch_sub(n(3), Ordering::Release), n(15));
        assert_eq!(cell.fetch_and(n(0b1010), Ordering::Acquire), n(12));
        assert_eq!(cell.fetch_or(n(0b0101), Ordering::AcqRel), n(0b1000));
        assert_eq!(cell.fetch_xor(n(0b1111), Ordering::SeqCst), n(0b1101));
        assert_eq!(cell.get(), n(0b0010));
    });

    for_both_backends!(in_place_reports_observed => fn run<T: Value>() {
        let cell = Atomic::new(n::<T>(7));
        let mut expected = n::<T>(1);
        assert!(!cell.compare_exchange_in_place(&mut expected, n(2), Ordering::SeqCst, LoadOrdering::SeqCst));
        assert_eq!(expected, n(7));
        assert!(cell.compare_exchange_in_place(&mut expected, n(2), Ordering::SeqCst, LoadOrdering::SeqCst));
        assert_eq!(expected, n(7));
        assert_eq!(cell.get(), n(2));
    });

    for_both_backends!(concurrent_counter => fn run<T: Value>() {
        const THREADS: usize = 8;
        const ROUNDS: usize = 5000;

        let cell = Atomic::new(n::<T>(0));
        thread::scope(|s| {
            for _ in 0..THREADS {
                s.spawn(|| {
                    for _ in 0..ROUNDS {
                        cell.fetch_add(n(1), Ordering::Relaxed);
                    }
                });
            }
        });

        let total: u128 = cell.get().into();
        assert_eq!(total, (THREADS * ROUNDS) as u128);
    });

    for_both_backends!(weak_cas_retry_loop => fn run<T: Value>() {
        const THREADS: usize = 4;
        const ROUNDS: usize = 2000;

        let cell = Atomic::new(n::<T>(0));
        thread::scope(|s| {
            for _ in 0..THREADS {
                s.spawn(|| {
                    for _ in 0..ROUNDS {
                        let mut expected = cell.load(LoadOrdering::Relaxed);
                        loop {
                            let desired = Integer::wrapping_add(expected, n(1));
                            let before = expected;
                            if cell.compare_exchange_weak_in_place(
                                &mut expected,
                                desired,
                                Ordering::AcqRel,
                                LoadOrdering::Relaxed,
                            ) {
                                break;
                            }
                            // On failure the slot holds a value the cell really had;
                            // since the counter only grows it is never behind `before`.
                            assert!(Into::<u128>::into(expected) >= before.into());
                        }
                    }
                });
            }
        });

        let total: u128 = cell.get().into();
        assert_eq!(total, (THREADS * ROUNDS) as u128);
    });

    for_both_backends!(message_passing => fn run<T: Value>() {
        struct Shared {
            data: UnsafeCell<u64>,
        }
        unsafe impl Sync for Shared {}

        for round in 0..200_u64 {
            let shared = &Shared { data: UnsafeCell::new(0) };
            let ready = Atomic::new(n::<T>(0));

            thread::scope(|s| {
                s.spawn(|| {
                    unsafe { *shared.data.get() = round + 1 };
                    ready.store(n(1), StoreOrdering::Release);
                });
                s.spawn(|| {
                    while ready.load(LoadOrdering::Acquire) != n(1) {
                        core::hint::spin_loop();
                    }
                    assert_eq!(unsafe { *shared.data.get() }, round + 1);
                });
            });
        }
    });

    #[test]
    fn bool_cell() {
        let flag = Atomic::new(false);
        assert!(!flag.fetch_or(true, Ordering::AcqRel));
        assert!(flag.fetch_and(false, Ordering::AcqRel));
        assert!(!flag.fetch_xor(true, Ordering::AcqRel));
        assert!(flag.get());
        assert_eq!(format!("{flag:?}"), "Atomic(true)");
    }

    #[test]
    fn signed_wrapping() {
        let value = Atomic::new(i8::MIN);
        assert_eq!(value.fetch_sub(1, Ordering::Relaxed), i8::MIN);
        assert_eq!(value.get(), i8::MAX);

        let wide = Atomic::new(i128::MAX);
        assert_eq!(wide.fetch_add(1, Ordering::SeqCst), i128::MAX);
        assert_eq!(wide.get(), i128::MIN);
    }

    #[test]
    fn pointer_cell() {
        let mut values = [10_u32, 20, 30, 40];
        let base = values.as_mut_ptr();
        let cursor = Atomic::new(base);

        assert_eq!(cursor.fetch_ptr_add(3, Ordering::AcqRel), base);
        assert_eq!(cursor.fetch_ptr_sub(1, Ordering::AcqRel), base.wrapping_add(3));
        assert_eq!(unsafe { *cursor.get() }, 30);

        assert_eq!(cursor.swap(ptr::null_mut(), Ordering::SeqCst), base.wrapping_add(2));
        assert!(cursor.get().is_null());
    }

    #[test]
    fn pointer_cursor_under_contention() {
        let mut slots = [0_u8; 4096];
        let base = slots.as_mut_ptr();
        let cursor = Atomic::new(base);

        let mut claimed: Vec<usize> = thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    s.spawn(|| {
                        (0..1024)
                            .map(|_| cursor.fetch_ptr_add(1, Ordering::Relaxed).addr())
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap())
                .collect()
        });

        claimed.sort_unstable();
        claimed.dedup();
        assert_eq!(claimed.len(), 4096);
        assert_eq!(cursor.get(), base.wrapping_add(4096));
    }

    #[test]
    fn exclusive_access() {
        let mut cell = Atomic::<u16>::default();
        *cell.get_mut() = 12;
        assert_eq!(cell.replace(13), 12);
        cell.set(14);
        assert_eq!(cell.into_inner(), 14);
        assert_eq!(Atomic::from(3_u32).into_inner(), 3);
    }

    #[cfg(all(debug_assertions, feature = "debug"))]
    #[test]
    #[should_panic(expected = "stronger than the read side")]
    fn failure_stronger_than_success_is_rejected() {
        let cell = Atomic::new(0_u32);
        let _ = cell.compare_exchange(0, 1, Ordering::Release, LoadOrdering::Acquire);
    }
}
