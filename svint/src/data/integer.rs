//! The public integer type.

use core::mem;

use svint_core::{pool, prim, Mpz, MpzView};
use svint_internals::{Error, Limb};

use crate::data::{static_int::StaticInt, storage::Storage};

/// An arbitrary-precision signed integer with a small-value optimization.
///
/// A value stores its limbs either inline in a fixed buffer of `SSIZE` limbs
/// (the static storage class, no heap traffic) or through a heap-allocated
/// descriptor (the dynamic storage class). All arithmetic first tries a
/// size-specialised static kernel; when the result cannot fit inline, the
/// destination is promoted and the operation is redone through the
/// multiprecision backend. Promotion is never revoked within an operation;
/// [Integer::demote] shrinks a value back explicitly.
///
/// `SSIZE` must be in the range `1..=64`; `1` and `2` get hand-written
/// double-limb kernels and are the sweet spot for most uses (see the
/// [Integer1] and [Integer2](crate::Integer2) aliases).
///
/// ```
/// use svint::{add, Integer2};
///
/// let a = Integer2::from(u128::MAX);
/// let b = Integer2::from(1u8);
/// let mut r = Integer2::new();
/// add(&mut r, &a, &b);
/// // 2^128 needs three 64-bit limbs, so the result was promoted
/// assert!(r.is_dynamic());
/// assert_eq!(r.to_string(), "340282366920938463463374607431768211456");
/// ```
///
/// [Integer1]: crate::Integer1
pub struct Integer<const SSIZE: usize> {
    pub(crate) storage: Storage<SSIZE>,
}

impl<const SSIZE: usize> Integer<SSIZE> {
    /// Static zero.
    #[inline]
    pub fn new() -> Self {
        Integer {
            storage: Storage::new_static_zero(),
        }
    }

    /// Whether the value currently lives in the inline buffer.
    #[inline]
    pub fn is_static(&self) -> bool {
        self.storage.is_static()
    }

    /// Whether the value currently lives behind a heap descriptor.
    #[inline]
    pub fn is_dynamic(&self) -> bool {
        !self.storage.is_static()
    }

    /// The sign of the value: `-1`, `0` or `1`.
    #[inline]
    pub fn sign(&self) -> isize {
        self.storage.view().sign()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.sign() == 0
    }

    /// Number of active limbs of the value.
    #[inline]
    pub fn size(&self) -> usize {
        self.storage.view().asize()
    }

    /// Bit length of the absolute value; 1 for zero.
    #[inline]
    pub fn nbits(&self) -> usize {
        self.storage.view().nbits()
    }

    /// Flips the sign in place.
    pub fn negate(&mut self) {
        match &mut self.storage {
            Storage::Static(s) => s.size = -s.size,
            Storage::Dynamic(m) => m.neg(),
        }
    }

    /// Absolute-value-assigns the value.
    pub fn abs_assign(&mut self) {
        if self.sign() < 0 {
            self.negate();
        }
    }

    /// Forces the value into dynamic storage, preallocating exactly the limbs
    /// it needs. Errors if the value is already dynamic.
    pub fn promote(&mut self) -> Result<(), Error> {
        if self.is_dynamic() {
            return Err(Error::AlreadyDynamic);
        }
        self.storage.promote(0);
        Ok(())
    }

    /// Tries to shrink a dynamic value back into the inline buffer. Returns
    /// `false`, leaving the value untouched, if it is already static or its
    /// limb count exceeds `SSIZE`.
    pub fn demote(&mut self) -> bool {
        if self.is_static() {
            return false;
        }
        self.storage.demote()
    }

    /// A backend-shaped read-only view of the value.
    #[inline]
    pub(crate) fn view(&self) -> MpzView<'_> {
        self.storage.view()
    }

    /// Builds a value from a sign and a magnitude, choosing the storage class
    /// by the number of limbs required.
    fn from_sign_magnitude(negative: bool, magnitude: u128) -> Self {
        let count = prim::u128_limb_count(magnitude);
        if count <= SSIZE {
            let mut s = StaticInt::new();
            prim::u128_write_limbs(magnitude, &mut s.limbs);
            s.size = count as isize * if negative { -1 } else { 1 };
            Integer {
                storage: Storage::Static(s),
            }
        } else {
            // 128 bits never need more than four limbs
            let mut buf = [0 as Limb; 4];
            let n = prim::u128_write_limbs(magnitude, &mut buf);
            let mut m = pool::acquire(n);
            m.set_limbs(&buf[..n], negative);
            Integer {
                storage: Storage::from_mpz(m),
            }
        }
    }

    /// Wraps a parsed descriptor, shrinking it into static storage when it
    /// fits.
    pub(crate) fn from_mpz_fitting(m: Mpz) -> Self {
        let asize = m.asize();
        if asize <= SSIZE {
            let mut s = StaticInt::new();
            s.size = m.size();
            s.limbs[..asize].copy_from_slice(m.limbs());
            pool::release(m);
            Integer {
                storage: Storage::Static(s),
            }
        } else {
            Integer {
                storage: Storage::from_mpz(m),
            }
        }
    }

    /// Converts to the nearest representable `f64`, overflowing to infinity.
    pub fn to_f64(&self) -> f64 {
        prim::f64_from_view(self.view())
    }

    /// Converts to the nearest representable `f32`, overflowing to infinity.
    pub fn to_f32(&self) -> f32 {
        self.to_f64() as f32
    }
}

impl<const SSIZE: usize> Default for Integer<SSIZE> {
    /// Same as [Integer::new]: a static zero.
    fn default() -> Self {
        Self::new()
    }
}

/// Deep copy preserving the storage class of the source.
impl<const SSIZE: usize> Clone for Integer<SSIZE> {
    fn clone(&self) -> Self {
        Integer {
            storage: self.storage.clone(),
        }
    }
}

impl<const SSIZE: usize> From<bool> for Integer<SSIZE> {
    fn from(x: bool) -> Self {
        Self::from_sign_magnitude(false, x as u128)
    }
}

macro_rules! integer_from_unsigned {
    ($($ty:ident)*) => {
        $(
            impl<const SSIZE: usize> From<$ty> for Integer<SSIZE> {
                fn from(x: $ty) -> Self {
                    Self::from_sign_magnitude(false, x as u128)
                }
            }
        )*
    };
}

macro_rules! integer_from_signed {
    ($($ty:ident)*) => {
        $(
            impl<const SSIZE: usize> From<$ty> for Integer<SSIZE> {
                fn from(x: $ty) -> Self {
                    Self::from_sign_magnitude(x < 0, x.unsigned_abs() as u128)
                }
            }
        )*
    };
}

integer_from_unsigned!(u8 u16 u32 u64 u128 usize);
integer_from_signed!(i8 i16 i32 i64 i128 isize);

/// Truncates toward zero; non-finite values are rejected.
impl<const SSIZE: usize> TryFrom<f64> for Integer<SSIZE> {
    type Error = Error;

    fn try_from(x: f64) -> Result<Self, Error> {
        let (negative, mantissa, shift) = prim::f64_to_int_parts(x)?;
        let mut out = Self::from(mantissa);
        if shift > 0 {
            let tmp = mem::take(&mut out);
            crate::logic::shift::mul_2exp(&mut out, &tmp, shift);
        }
        if negative {
            out.negate();
        }
        Ok(out)
    }
}

/// Truncates toward zero; non-finite values are rejected.
impl<const SSIZE: usize> TryFrom<f32> for Integer<SSIZE> {
    type Error = Error;

    fn try_from(x: f32) -> Result<Self, Error> {
        Self::try_from(x as f64)
    }
}

/// Fails with [Error::Overflow] on negative values and on magnitudes beyond
/// 128 bits.
impl<'a, const SSIZE: usize> TryFrom<&'a Integer<SSIZE>> for u128 {
    type Error = Error;

    fn try_from(n: &Integer<SSIZE>) -> Result<Self, Error> {
        if n.sign() < 0 {
            return Err(Error::Overflow);
        }
        prim::limbs_to_u128(n.view().limbs())
    }
}

/// Fails with [Error::Overflow] when the value does not fit.
impl<'a, const SSIZE: usize> TryFrom<&'a Integer<SSIZE>> for i128 {
    type Error = Error;

    fn try_from(n: &Integer<SSIZE>) -> Result<Self, Error> {
        let magnitude = prim::limbs_to_u128(n.view().limbs())?;
        if n.sign() >= 0 {
            if magnitude > i128::MAX as u128 {
                return Err(Error::Overflow);
            }
            Ok(magnitude as i128)
        } else if magnitude > i128::MAX as u128 + 1 {
            Err(Error::Overflow)
        } else if magnitude == i128::MAX as u128 + 1 {
            Ok(i128::MIN)
        } else {
            Ok(-(magnitude as i128))
        }
    }
}

macro_rules! try_from_integer {
    ($($ty:ident via $wide:ident);*;) => {
        $(
            /// Fails with [Error::Overflow] when the value does not fit.
            impl<'a, const SSIZE: usize> TryFrom<&'a Integer<SSIZE>> for $ty {
                type Error = Error;

                fn try_from(n: &Integer<SSIZE>) -> Result<Self, Error> {
                    let wide = $wide::try_from(n)?;
                    $ty::try_from(wide).map_err(|_| Error::Overflow)
                }
            }
        )*
    };
}

try_from_integer!(
    u8 via u128;
    u16 via u128;
    u32 via u128;
    u64 via u128;
    usize via u128;
    i8 via i128;
    i16 via i128;
    i32 via i128;
    i64 via i128;
    isize via i128;
);

#[cfg(feature = "zeroize_support")]
impl<const SSIZE: usize> zeroize::Zeroize for Integer<SSIZE> {
    /// Zeroes the value in place. Dynamic storage keeps its allocation, but
    /// every allocated limb is wiped.
    fn zeroize(&mut self) {
        match &mut self.storage {
            Storage::Static(s) => {
                s.size = 0;
                s.limbs = [0; SSIZE];
            }
            Storage::Dynamic(m) => {
                for l in m.buf_mut() {
                    *l = 0;
                }
                m.set_size(0);
            }
        }
    }
}

#[cfg(feature = "rand_support")]
impl<const SSIZE: usize> Integer<SSIZE> {
    /// Assigns a uniformly random value in `[0, 2^bits)` using a
    /// `rand_core::RngCore` random number generator, choosing the storage
    /// class by the number of limbs needed.
    ///
    /// ```
    /// use rand_xoshiro::{rand_core::SeedableRng, Xoshiro128StarStar};
    /// use svint::Integer2;
    ///
    /// let mut rng = Xoshiro128StarStar::seed_from_u64(0);
    /// let x = Integer2::random_bits(&mut rng, 100);
    /// assert!(x.nbits() <= 100);
    /// ```
    pub fn random_bits<R: rand_core::RngCore + ?Sized>(rng: &mut R, bits: usize) -> Self {
        use svint_internals::{NUMB_BITS, NUMB_MASK};
        if bits == 0 {
            return Self::new();
        }
        let nlimbs = (bits + NUMB_BITS - 1) / NUMB_BITS;
        let top_bits = bits - (nlimbs - 1) * NUMB_BITS;
        let mut next = || {
            let l = if NUMB_BITS > 32 {
                rng.next_u64() as Limb
            } else {
                rng.next_u32() as Limb
            };
            l & NUMB_MASK
        };
        if nlimbs <= SSIZE {
            let mut s = StaticInt::new();
            for i in 0..nlimbs {
                s.limbs[i] = next();
            }
            s.limbs[nlimbs - 1] &= NUMB_MASK >> (NUMB_BITS - top_bits);
            s.size = svint_core::mpn::normalized_size(&s.limbs[..nlimbs]) as isize;
            s.zero_unused_limbs();
            Integer {
                storage: Storage::Static(s),
            }
        } else {
            let mut m = pool::acquire(nlimbs);
            let buf = m.buf_mut();
            for l in buf[..nlimbs].iter_mut() {
                *l = next();
            }
            buf[nlimbs - 1] &= NUMB_MASK >> (NUMB_BITS - top_bits);
            let asize = svint_core::mpn::normalized_size(&m.buf_mut()[..nlimbs]);
            m.set_size(asize as isize);
            Integer {
                storage: Storage::from_mpz(m),
            }
        }
    }
}
