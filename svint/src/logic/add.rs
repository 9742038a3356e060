//! Addition and subtraction: the size-specialised static kernels and the
//! dispatch drivers.

use svint_core::{mpn, mpz};
use svint_internals::{add_overflow, Limb, NAIL_BITS, NUMB_BITS, NUMB_MASK, OPT_SIZE};

use crate::data::{integer::Integer, static_int::StaticInt, storage::Storage};

/// Size after a magnitude subtraction: scan down from `s` for the first
/// nonzero limb.
pub(crate) fn sub_compute_size(limbs: &[Limb], s: usize) -> usize {
    debug_assert!(s <= limbs.len());
    let mut n = s;
    while n > 0 && (limbs[n - 1] & NUMB_MASK) == 0 {
        n -= 1;
    }
    n
}

/// Generic implementation over the backend's limb functions, used when no
/// specialisation applies. Also the addition half of the generic fused
/// multiply-add.
#[allow(clippy::too_many_arguments)]
pub(crate) fn add_impl_mpn<const SSIZE: usize>(
    rop: &mut StaticInt<SSIZE>,
    op1: &StaticInt<SSIZE>,
    op2: &StaticInt<SSIZE>,
    asize1: usize,
    asize2: usize,
    size1: isize,
    size2: isize,
    sign1: isize,
    sign2: isize,
) -> bool {
    // The limb functions require nonzero arguments.
    if sign2 == 0 {
        rop.size = size1;
        rop.limbs[..asize1].copy_from_slice(&op1.limbs[..asize1]);
        return true;
    }
    if sign1 == 0 {
        rop.size = size2;
        rop.limbs[..asize2].copy_from_slice(&op2.limbs[..asize2]);
        return true;
    }
    // If either operand fills the buffer and has its top bit set, the
    // computation might need an extra limb; fail conservatively before
    // anything is written so the caller can promote and retry.
    let c1 = asize1 == SSIZE && ((op1.limbs[asize1 - 1] & NUMB_MASK) >> (NUMB_BITS - 1)) != 0;
    let c2 = asize2 == SSIZE && ((op2.limbs[asize2 - 1] & NUMB_MASK) >> (NUMB_BITS - 1)) != 0;
    if c1 || c2 {
        return false;
    }
    if sign1 == sign2 {
        // Same sign: add the smaller magnitude into the larger.
        let (big, small, bsize, ssize, bsign) = if asize1 >= asize2 {
            (op1, op2, asize1, asize2, sign1)
        } else {
            (op2, op1, asize2, asize1, sign2)
        };
        let cy = if ssize == 1 {
            mpn::add_1(&mut rop.limbs[..bsize], &big.limbs[..bsize], small.limbs[0])
        } else if bsize == ssize {
            mpn::add_n(&mut rop.limbs[..bsize], &big.limbs[..bsize], &small.limbs[..ssize])
        } else {
            mpn::add(&mut rop.limbs[..bsize], &big.limbs[..bsize], &small.limbs[..ssize])
        };
        if cy != 0 {
            debug_assert!(bsize < SSIZE);
            rop.limbs[bsize] = 1;
            rop.size = (bsize as isize + 1) * bsign;
        } else {
            rop.size = bsize as isize * bsign;
        }
    } else {
        // Opposite signs: subtract the smaller magnitude from the larger;
        // the sign of the larger-magnitude operand wins.
        let op1_ge = asize1 > asize2
            || (asize1 == asize2
                && mpn::cmp(&op1.limbs[..asize1], &op2.limbs[..asize2]) != core::cmp::Ordering::Less);
        let (big, small, bsize, ssize, bsign) = if op1_ge {
            (op1, op2, asize1, asize2, sign1)
        } else {
            (op2, op1, asize2, asize1, sign2)
        };
        let br = if ssize == 1 {
            mpn::sub_1(&mut rop.limbs[..bsize], &big.limbs[..bsize], small.limbs[0])
        } else if bsize == ssize {
            mpn::sub_n(&mut rop.limbs[..bsize], &big.limbs[..bsize], &small.limbs[..ssize])
        } else {
            mpn::sub(&mut rop.limbs[..bsize], &big.limbs[..bsize], &small.limbs[..ssize])
        };
        debug_assert_eq!(br, 0);
        rop.size = sub_compute_size(&rop.limbs, bsize) as isize * bsign;
    }
    true
}

/// Single-limb specialisation, active without nail bits.
fn add_impl_1<const SSIZE: usize>(
    rop: &mut StaticInt<SSIZE>,
    op1: &StaticInt<SSIZE>,
    op2: &StaticInt<SSIZE>,
    sign1: isize,
    sign2: isize,
) -> bool {
    let l1 = op1.limbs[0];
    let l2 = op2.limbs[0];
    if sign1 == sign2 {
        // Identical signs make the addition a true addition.
        let (tmp, cy) = add_overflow(l1, l2);
        if cy != 0 {
            return false;
        }
        // asize can be zero (sign1 == sign2 == 0) or one.
        rop.size = sign1;
        rop.limbs[0] = tmp;
    } else {
        // Differing signs make the addition a subtraction.
        if l1 >= l2 {
            let tmp = l1 - l2;
            // asize is one, or zero iff the magnitudes are equal
            rop.size = if tmp == 0 { 0 } else { sign1 };
            rop.limbs[0] = tmp;
        } else {
            // this has to be the sign of op2, as the magnitudes differ
            rop.size = sign2;
            rop.limbs[0] = l2 - l1;
        }
    }
    true
}

/// Two-limb specialisation, active without nail bits. Both limbs are always
/// processed regardless of the active sizes; the zero-tail invariant makes
/// that correct and avoids branching on the sizes.
fn add_impl_2<const SSIZE: usize>(
    rop: &mut StaticInt<SSIZE>,
    op1: &StaticInt<SSIZE>,
    op2: &StaticInt<SSIZE>,
    asize1: usize,
    asize2: usize,
    sign1: isize,
    sign2: isize,
) -> bool {
    let a = op1.limbs[0];
    let b = op2.limbs[0];
    let c = op1.limbs[1];
    let d = op2.limbs[1];
    if sign1 == sign2 {
        // The high limb can spill over either from the addition of the high
        // limbs or from the carry of the low ones.
        let (lo, cy_lo) = add_overflow(a, b);
        let (hi1, cy_hi1) = add_overflow(c, d);
        let (hi2, cy_hi2) = add_overflow(hi1, cy_lo);
        if cy_hi1 != 0 || cy_hi2 != 0 {
            return false;
        }
        rop.size = if hi2 != 0 { sign1 + sign1 } else { sign1 };
        rop.limbs[0] = lo;
        rop.limbs[1] = hi2;
    } else if asize1 > asize2 || (asize1 == asize2 && (c, a) >= (d, b)) {
        // |op1| >= |op2|
        let lo = a.wrapping_sub(b);
        // A low-limb borrow implies c > d, as the result is nonnegative.
        debug_assert!(a >= b || c > d);
        // This cannot wrap, at most it reaches zero.
        let hi = c - d - ((a < b) as Limb);
        rop.size = if hi != 0 {
            sign1 + sign1
        } else if lo != 0 {
            sign1
        } else {
            0
        };
        rop.limbs[0] = lo;
        rop.limbs[1] = hi;
    } else {
        // |op2| > |op1|, so the result cannot be zero
        let lo = b.wrapping_sub(a);
        debug_assert!(b >= a || d > c);
        let hi = d - c - ((b < a) as Limb);
        rop.size = if hi != 0 { sign2 + sign2 } else { sign2 };
        rop.limbs[0] = lo;
        rop.limbs[1] = hi;
    }
    true
}

/// Static addition, or subtraction when `subtract` is set (implemented by
/// negating `op2`'s sign). Returns `true` if the result fit; on `false` the
/// destination is untouched and the caller must promote and retry.
pub(crate) fn static_addsub<const SSIZE: usize>(
    rop: &mut StaticInt<SSIZE>,
    op1: &StaticInt<SSIZE>,
    op2: &StaticInt<SSIZE>,
    subtract: bool,
) -> bool {
    let size1 = op1.size;
    let size2 = if subtract { -op2.size } else { op2.size };
    let asize1 = size1.unsigned_abs();
    let asize2 = size2.unsigned_abs();
    let sign1 = size1.signum();
    let sign2 = size2.signum();
    // The path choice is a compile-time decision: `SSIZE` is a const
    // parameter and the nail width is a build constant.
    let fit = if NAIL_BITS == 0 && SSIZE == 1 {
        add_impl_1(rop, op1, op2, sign1, sign2)
    } else if NAIL_BITS == 0 && SSIZE == 2 {
        add_impl_2(rop, op1, op2, asize1, asize2, sign1, sign2)
    } else {
        add_impl_mpn(rop, op1, op2, asize1, asize2, size1, size2, sign1, sign2)
    };
    if !(NAIL_BITS == 0 && SSIZE <= OPT_SIZE) && fit {
        // The limb functions do not touch unused limbs; re-establish the
        // zero-tail invariant.
        rop.zero_unused_limbs();
    }
    debug_assert!(!fit || rop.invariants_ok());
    fit
}

fn addsub_driver<const SSIZE: usize>(
    rop: &mut Integer<SSIZE>,
    op1: &Integer<SSIZE>,
    op2: &Integer<SSIZE>,
    subtract: bool,
) {
    if let (Storage::Static(r), Storage::Static(a), Storage::Static(b)) =
        (&mut rop.storage, &op1.storage, &op2.storage)
    {
        if static_addsub(r, a, b, subtract) {
            return;
        }
    }
    if rop.storage.is_static() {
        // The sum of two `SSIZE`-limb values needs at most one extra limb.
        rop.storage.promote(SSIZE + 1);
    }
    let (a, b) = (op1.view(), op2.view());
    let d = rop.storage.dynamic_mut();
    if subtract {
        mpz::sub(d, a, b);
    } else {
        mpz::add(d, a, b);
    }
}

/// `rop = op1 + op2`. Stays inside static storage whenever the result fits;
/// otherwise the destination is promoted.
pub fn add<const SSIZE: usize>(
    rop: &mut Integer<SSIZE>,
    op1: &Integer<SSIZE>,
    op2: &Integer<SSIZE>,
) {
    addsub_driver(rop, op1, op2, false)
}

/// `rop = op1 - op2`.
pub fn sub<const SSIZE: usize>(
    rop: &mut Integer<SSIZE>,
    op1: &Integer<SSIZE>,
    op2: &Integer<SSIZE>,
) {
    addsub_driver(rop, op1, op2, true)
}
