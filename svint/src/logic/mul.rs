//! Multiplication and fused multiply-add: static kernels and dispatch
//! drivers. Kernels return `0` on success; any positive value is an upper
//! bound on the result's limb count, used to size the promoted descriptor in
//! one allocation.

use svint_core::{mpn, mpz};
use svint_internals::{
    add_overflow, mul_2x1, Limb, HAS_DLIMB_MUL, MAX_SSIZE, NAIL_BITS, OPT_SIZE,
};

use crate::data::{integer::Integer, static_int::StaticInt, storage::Storage};
use crate::logic::add::add_impl_mpn;

/// Schoolbook product of the active limbs, dispatched over the backend's
/// limb functions. `res` must hold `asize1 + asize2` limbs; returns the top
/// limb of the product (which may be zero).
fn mul_raw(res: &mut [Limb], data1: &[Limb], data2: &[Limb]) -> Limb {
    let asize1 = data1.len();
    let asize2 = data2.len();
    if asize2 == 1 {
        // the single-limb version does not write the high limb itself
        let hi = mpn::mul_1(&mut res[..asize1], data1, data2[0]);
        res[asize1] = hi;
        hi
    } else if asize1 == 1 {
        let hi = mpn::mul_1(&mut res[..asize2], data2, data1[0]);
        res[asize2] = hi;
        hi
    } else if asize1 >= asize2 {
        mpn::mul(res, data1, data2)
    } else {
        mpn::mul(res, data2, data1)
    }
}

/// Generic implementation. The product is computed directly into the
/// destination when it surely fits, otherwise into a scratch buffer so the
/// exact size can be checked before committing.
fn mul_impl_mpn<const SSIZE: usize>(
    rop: &mut StaticInt<SSIZE>,
    op1: &StaticInt<SSIZE>,
    op2: &StaticInt<SSIZE>,
    asize1: usize,
    asize2: usize,
    sign1: isize,
    sign2: isize,
) -> usize {
    if sign1 == 0 || sign2 == 0 {
        rop.size = 0;
        return 0;
    }
    let max_asize = asize1 + asize2;
    let data1 = &op1.limbs[..asize1];
    let data2 = &op2.limbs[..asize2];
    if max_asize <= SSIZE {
        let hi = mul_raw(&mut rop.limbs[..max_asize], data1, data2);
        let asize = max_asize - (hi == 0) as usize;
        rop.size = asize as isize * sign1 * sign2;
        return 0;
    }
    // The product may exceed the static capacity: compute into scratch and
    // check the exact size (the top limb can be zero, making an
    // `SSIZE + 1`-limb bound actually fit).
    let mut res = [0 as Limb; MAX_SSIZE * 2];
    let hi = mul_raw(&mut res[..max_asize], data1, data2);
    let asize = max_asize - (hi == 0) as usize;
    if asize > SSIZE {
        return asize;
    }
    rop.limbs[..asize].copy_from_slice(&res[..asize]);
    rop.size = asize as isize * sign1 * sign2;
    0
}

/// Single-limb specialisation over the double-limb multiply.
fn mul_impl_1<const SSIZE: usize>(
    rop: &mut StaticInt<SSIZE>,
    op1: &StaticInt<SSIZE>,
    op2: &StaticInt<SSIZE>,
    sign1: isize,
    sign2: isize,
) -> usize {
    let (lo, hi) = mul_2x1(op1.limbs[0], op2.limbs[0]);
    if hi != 0 {
        return 2;
    }
    rop.size = (lo != 0) as isize * sign1 * sign2;
    rop.limbs[0] = lo;
    0
}

/// Two-limb specialisation over the double-limb multiply.
fn mul_impl_2<const SSIZE: usize>(
    rop: &mut StaticInt<SSIZE>,
    op1: &StaticInt<SSIZE>,
    op2: &StaticInt<SSIZE>,
    asize1: usize,
    asize2: usize,
    sign1: isize,
    sign2: isize,
) -> usize {
    if asize1 == 0 || asize2 == 0 {
        rop.size = 0;
        rop.limbs[0] = 0;
        rop.limbs[1] = 0;
        return 0;
    }
    if asize1 == 1 && asize2 == 1 {
        let (lo, hi) = mul_2x1(op1.limbs[0], op2.limbs[0]);
        rop.limbs[0] = lo;
        rop.limbs[1] = hi;
        rop.size = (2 - (hi == 0) as isize) * sign1 * sign2;
        return 0;
    }
    if asize1 != asize2 {
        // The only chance of fitting is two limbs by one:
        //
        //             b      a X
        //                    c
        // --------------------
        // tmp2   tmp1   tmp0
        //
        let (a, b, c) = if asize1 > asize2 {
            (op1.limbs[0], op1.limbs[1], op2.limbs[0])
        } else {
            (op2.limbs[0], op2.limbs[1], op1.limbs[0])
        };
        let (ca_lo, ca_hi) = mul_2x1(c, a);
        let (cb_lo, cb_hi) = mul_2x1(c, b);
        let tmp0 = ca_lo;
        let (tmp1, cy) = add_overflow(cb_lo, ca_hi);
        let tmp2 = cb_hi + cy;
        if tmp2 == 0 {
            rop.size = 2 * sign1 * sign2;
            rop.limbs[0] = tmp0;
            rop.limbs[1] = tmp1;
            return 0;
        }
    }
    // The real size could be 3, but the promoted descriptor needs 4 limbs of
    // working space for the operation anyway.
    4
}

/// Static multiplication; `0` on success, else a size hint.
pub(crate) fn static_mul<const SSIZE: usize>(
    rop: &mut StaticInt<SSIZE>,
    op1: &StaticInt<SSIZE>,
    op2: &StaticInt<SSIZE>,
) -> usize {
    let asize1 = op1.size.unsigned_abs();
    let asize2 = op2.size.unsigned_abs();
    let sign1 = op1.size.signum();
    let sign2 = op2.size.signum();
    let hint = if NAIL_BITS == 0 && SSIZE == 1 && HAS_DLIMB_MUL {
        mul_impl_1(rop, op1, op2, sign1, sign2)
    } else if NAIL_BITS == 0 && SSIZE == 2 && HAS_DLIMB_MUL {
        mul_impl_2(rop, op1, op2, asize1, asize2, sign1, sign2)
    } else {
        mul_impl_mpn(rop, op1, op2, asize1, asize2, sign1, sign2)
    };
    if !(NAIL_BITS == 0 && SSIZE <= OPT_SIZE && HAS_DLIMB_MUL) && hint == 0 {
        rop.zero_unused_limbs();
    }
    debug_assert!(hint != 0 || rop.invariants_ok());
    hint
}

/// `rop = op1 * op2`.
pub fn mul<const SSIZE: usize>(
    rop: &mut Integer<SSIZE>,
    op1: &Integer<SSIZE>,
    op2: &Integer<SSIZE>,
) {
    let mut size_hint = 0;
    if let (Storage::Static(r), Storage::Static(a), Storage::Static(b)) =
        (&mut rop.storage, &op1.storage, &op2.storage)
    {
        size_hint = static_mul(r, a, b);
        if size_hint == 0 {
            return;
        }
    }
    if rop.storage.is_static() {
        rop.storage.promote(size_hint);
    }
    let (a, b) = (op1.view(), op2.view());
    mpz::mul(rop.storage.dynamic_mut(), a, b);
}

/// Generic fused kernel: a static product into scratch, then the static
/// addition logic against the previous destination value.
fn addmul_impl_mpn<const SSIZE: usize>(
    rop: &mut StaticInt<SSIZE>,
    op1: &StaticInt<SSIZE>,
    op2: &StaticInt<SSIZE>,
) -> usize {
    let asize1 = op1.size.unsigned_abs();
    let asize2 = op2.size.unsigned_abs();
    let mut prod = StaticInt::<SSIZE>::new();
    if mul_impl_mpn(
        &mut prod,
        op1,
        op2,
        asize1,
        asize2,
        op1.size.signum(),
        op2.size.signum(),
    ) != 0
    {
        // the largest a static addmul result can be
        return SSIZE * 2 + 1;
    }
    // The destination is both the addend and the result; the static buffer
    // is a cheap bit-copy, which keeps the addition kernel overlap-free.
    let addend = *rop;
    let asizer = addend.size.unsigned_abs();
    let asize_prod = prod.size.unsigned_abs();
    if !add_impl_mpn(
        rop,
        &addend,
        &prod,
        asizer,
        asize_prod,
        addend.size,
        prod.size,
        addend.size.signum(),
        prod.size.signum(),
    ) {
        return SSIZE + 1;
    }
    0
}

/// Single-limb fused kernel.
fn addmul_impl_1<const SSIZE: usize>(
    rop: &mut StaticInt<SSIZE>,
    op1: &StaticInt<SSIZE>,
    op2: &StaticInt<SSIZE>,
    sign1: isize,
    sign2: isize,
) -> usize {
    let signr = rop.size.signum();
    let (prod, hi) = mul_2x1(op1.limbs[0], op2.limbs[0]);
    if hi != 0 {
        return 3;
    }
    let mut sign_prod = (prod != 0) as isize;
    if sign1 != sign2 {
        sign_prod = -sign_prod;
    }
    if signr == sign_prod {
        let (tmp, cy) = add_overflow(rop.limbs[0], prod);
        if cy != 0 {
            return 2;
        }
        rop.size = signr;
        rop.limbs[0] = tmp;
    } else if rop.limbs[0] >= prod {
        let tmp = rop.limbs[0] - prod;
        rop.size = if tmp == 0 { 0 } else { signr };
        rop.limbs[0] = tmp;
    } else {
        // cannot be zero, as the magnitudes differ
        rop.size = sign_prod;
        rop.limbs[0] = prod - rop.limbs[0];
    }
    0
}

/// Two-limb fused kernel: the product into a limb pair, then the two-limb
/// addition logic against the destination.
fn addmul_impl_2<const SSIZE: usize>(
    rop: &mut StaticInt<SSIZE>,
    op1: &StaticInt<SSIZE>,
    op2: &StaticInt<SSIZE>,
    asize1: usize,
    asize2: usize,
    sign1: isize,
    sign2: isize,
) -> usize {
    if asize1 == 0 || asize2 == 0 {
        // a zero product leaves the destination unchanged
        return 0;
    }
    let signr = rop.size.signum();
    let asizer = rop.size.unsigned_abs();
    let sign_prod = if sign1 != sign2 { -1 } else { 1 };
    let mut prod = [0 as Limb; 2];
    let asize_prod;
    if asize1 == 1 && asize2 == 1 {
        let (lo, hi) = mul_2x1(op1.limbs[0], op2.limbs[0]);
        prod[0] = lo;
        prod[1] = hi;
        asize_prod = 2 - (hi == 0) as usize;
    } else {
        if asize1 == asize2 {
            // both operands have two limbs; the product cannot fit
            return 5;
        }
        let (a, b, c) = if asize1 > asize2 {
            (op1.limbs[0], op1.limbs[1], op2.limbs[0])
        } else {
            (op2.limbs[0], op2.limbs[1], op1.limbs[0])
        };
        let (p0, ca_hi) = mul_2x1(c, a);
        let (p1_raw, cb_hi) = mul_2x1(c, b);
        let (p1, cy) = add_overflow(p1_raw, ca_hi);
        if cb_hi != 0 || cy != 0 {
            return 4;
        }
        prod[0] = p0;
        prod[1] = p1;
        asize_prod = 2;
    }
    if signr == sign_prod {
        let (lo, cy_lo) = add_overflow(rop.limbs[0], prod[0]);
        let (hi1, cy_hi1) = add_overflow(rop.limbs[1], prod[1]);
        let (hi2, cy_hi2) = add_overflow(hi1, cy_lo);
        if cy_hi1 != 0 || cy_hi2 != 0 {
            return 3;
        }
        // the result cannot be zero here, as the product is nonzero
        rop.size = if hi2 != 0 { signr + signr } else { signr };
        rop.limbs[0] = lo;
        rop.limbs[1] = hi2;
    } else if asizer > asize_prod
        || (asizer == asize_prod && (rop.limbs[1], rop.limbs[0]) >= (prod[1], prod[0]))
    {
        // |rop| >= |product|
        let lo = rop.limbs[0].wrapping_sub(prod[0]);
        debug_assert!(rop.limbs[0] >= prod[0] || rop.limbs[1] > prod[1]);
        let hi = rop.limbs[1] - prod[1] - ((rop.limbs[0] < prod[0]) as Limb);
        rop.size = if hi != 0 {
            signr + signr
        } else if lo != 0 {
            signr
        } else {
            0
        };
        rop.limbs[0] = lo;
        rop.limbs[1] = hi;
    } else {
        // |product| > |rop|, so the result cannot be zero
        let lo = prod[0].wrapping_sub(rop.limbs[0]);
        debug_assert!(prod[0] >= rop.limbs[0] || prod[1] > rop.limbs[1]);
        let hi = prod[1] - rop.limbs[1] - ((prod[0] < rop.limbs[0]) as Limb);
        rop.size = if hi != 0 { sign_prod + sign_prod } else { sign_prod };
        rop.limbs[0] = lo;
        rop.limbs[1] = hi;
    }
    0
}

/// Static fused multiply-add; `0` on success, else a size hint.
pub(crate) fn static_addmul<const SSIZE: usize>(
    rop: &mut StaticInt<SSIZE>,
    op1: &StaticInt<SSIZE>,
    op2: &StaticInt<SSIZE>,
) -> usize {
    let asize1 = op1.size.unsigned_abs();
    let asize2 = op2.size.unsigned_abs();
    let sign1 = op1.size.signum();
    let sign2 = op2.size.signum();
    // The dedicated fused kernels exist exactly when both the addition and
    // multiplication specialisations of the same width exist.
    let hint = if NAIL_BITS == 0 && SSIZE == 1 && HAS_DLIMB_MUL {
        addmul_impl_1(rop, op1, op2, sign1, sign2)
    } else if NAIL_BITS == 0 && SSIZE == 2 && HAS_DLIMB_MUL {
        addmul_impl_2(rop, op1, op2, asize1, asize2, sign1, sign2)
    } else {
        addmul_impl_mpn(rop, op1, op2)
    };
    if !(NAIL_BITS == 0 && SSIZE <= OPT_SIZE && HAS_DLIMB_MUL) && hint == 0 {
        rop.zero_unused_limbs();
    }
    debug_assert!(hint != 0 || rop.invariants_ok());
    hint
}

/// `rop += op1 * op2`.
pub fn addmul<const SSIZE: usize>(
    rop: &mut Integer<SSIZE>,
    op1: &Integer<SSIZE>,
    op2: &Integer<SSIZE>,
) {
    let mut size_hint = 0;
    if let (Storage::Static(r), Storage::Static(a), Storage::Static(b)) =
        (&mut rop.storage, &op1.storage, &op2.storage)
    {
        size_hint = static_addmul(r, a, b);
        if size_hint == 0 {
            return;
        }
    }
    if rop.storage.is_static() {
        // promotion preserves the accumulated value
        rop.storage.promote(size_hint);
    }
    let (a, b) = (op1.view(), op2.view());
    mpz::addmul(rop.storage.dynamic_mut(), a, b);
}
