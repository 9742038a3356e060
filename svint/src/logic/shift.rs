//! Left shift by a bit count (`mul_2exp`): static kernels and the dispatch
//! driver.

use svint_core::{mpn, mpz};
use svint_internals::{Limb, NAIL_BITS, NUMB_BITS, NUMB_MASK, OPT_SIZE};

use crate::data::{integer::Integer, static_int::StaticInt, storage::Storage};

/// Generic implementation over the backend's limb shift.
fn mul_2exp_impl_mpn<const SSIZE: usize>(
    rop: &mut StaticInt<SSIZE>,
    n: &StaticInt<SSIZE>,
    s: usize,
) -> bool {
    let size = n.size;
    if s == 0 || size == 0 {
        *rop = *n;
        return true;
    }
    let asize = size.unsigned_abs();
    let sign = size.signum();
    // ls: whole limbs shifted; rs: the remaining bit shift.
    let ls = s / NUMB_BITS;
    let rs = s % NUMB_BITS;
    // At the very minimum, the new asize is the old one plus ls.
    let new_asize = asize + ls;
    if new_asize < SSIZE {
        // The operation always succeeds and can go directly into rop.
        let mut spill = 0;
        if rs > 0 {
            spill = mpn::lshift(&mut rop.limbs[ls..ls + asize], &n.limbs[..asize], rs);
            rop.limbs[new_asize] = spill;
        } else {
            rop.limbs[ls..ls + asize].copy_from_slice(&n.limbs[..asize]);
        }
        for l in rop.limbs[..ls].iter_mut() {
            *l = 0;
        }
        rop.size = (new_asize + (spill != 0) as usize) as isize * sign;
        return true;
    }
    if new_asize == SSIZE {
        if rs > 0 {
            // The shift may overflow: stage into scratch to detect it before
            // touching rop.
            let mut tmp = [0 as Limb; SSIZE];
            if mpn::lshift(&mut tmp[..asize], &n.limbs[..asize], rs) != 0 {
                return false;
            }
            rop.limbs[ls..ls + asize].copy_from_slice(&tmp[..asize]);
        } else {
            rop.limbs[ls..ls + asize].copy_from_slice(&n.limbs[..asize]);
        }
        for l in rop.limbs[..ls].iter_mut() {
            *l = 0;
        }
        rop.size = new_asize as isize * sign;
        return true;
    }
    // The shift pushes the size past the static limit.
    false
}

/// Single-limb specialisation.
fn mul_2exp_impl_1<const SSIZE: usize>(
    rop: &mut StaticInt<SSIZE>,
    n: &StaticInt<SSIZE>,
    s: usize,
) -> bool {
    let l = n.limbs[0] & NUMB_MASK;
    if s == 0 || l == 0 {
        *rop = *n;
        return true;
    }
    // A shift of a whole limb or more cannot fit a nonzero value, and
    // neither can one that pushes bits off the top. s is at least 1, so the
    // right shift below cannot be the full width.
    if s >= NUMB_BITS || (l >> (NUMB_BITS - s)) != 0 {
        return false;
    }
    rop.limbs[0] = l << s;
    rop.size = n.size;
    true
}

/// Two-limb specialisation.
fn mul_2exp_impl_2<const SSIZE: usize>(
    rop: &mut StaticInt<SSIZE>,
    n: &StaticInt<SSIZE>,
    s: usize,
) -> bool {
    let size = n.size;
    if s == 0 || size == 0 {
        *rop = *n;
        return true;
    }
    let asize = size.unsigned_abs();
    let sign = size.signum();
    if s >= 2 * NUMB_BITS {
        // the operand is nonzero, this can never fit
        return false;
    }
    if s == NUMB_BITS {
        // A pure limb move, possible only for a single active limb.
        if asize == 2 {
            return false;
        }
        rop.limbs[1] = n.limbs[0];
        rop.limbs[0] = 0;
        rop.size = 2 * sign;
        return true;
    }
    let mut s = s;
    let mut lo = n.limbs[0];
    let mut hi = n.limbs[1];
    if s > NUMB_BITS {
        if asize == 2 {
            return false;
        }
        // Move lo into hi and shift by the remainder.
        hi = n.limbs[0];
        lo = 0;
        s -= NUMB_BITS;
    }
    // 0 < s < NUMB_BITS from here on.
    if ((hi & NUMB_MASK) >> (NUMB_BITS - s)) != 0 {
        return false;
    }
    hi = ((hi & NUMB_MASK) << s) + ((lo & NUMB_MASK) >> (NUMB_BITS - s));
    // the low result has to be masked, as the shift can move bits into the
    // nail region
    lo = ((lo & NUMB_MASK) << s) & NUMB_MASK;
    rop.limbs[0] = lo;
    rop.limbs[1] = hi;
    // asize is at least 1
    rop.size = (1 + (hi != 0) as isize) * sign;
    true
}

/// Static left shift. Returns `true` if the result fit; on `false` the
/// destination is untouched and the caller must promote and retry.
pub(crate) fn static_mul_2exp<const SSIZE: usize>(
    rop: &mut StaticInt<SSIZE>,
    n: &StaticInt<SSIZE>,
    s: usize,
) -> bool {
    let fit = if NAIL_BITS == 0 && SSIZE == 1 {
        mul_2exp_impl_1(rop, n, s)
    } else if NAIL_BITS == 0 && SSIZE == 2 {
        mul_2exp_impl_2(rop, n, s)
    } else {
        mul_2exp_impl_mpn(rop, n, s)
    };
    if !(NAIL_BITS == 0 && SSIZE <= OPT_SIZE) && fit {
        rop.zero_unused_limbs();
    }
    debug_assert!(!fit || rop.invariants_ok());
    fit
}

/// `rop = n * 2^s`.
pub fn mul_2exp<const SSIZE: usize>(rop: &mut Integer<SSIZE>, n: &Integer<SSIZE>, s: usize) {
    if let (Storage::Static(r), Storage::Static(a)) = (&mut rop.storage, &n.storage) {
        if static_mul_2exp(r, a, s) {
            return;
        }
    }
    if rop.storage.is_static() {
        // enough room for every whole-limb move plus the bit spill
        rop.storage.promote(n.size() + s / NUMB_BITS + 1);
    }
    let v = n.view();
    mpz::mul_2exp(rop.storage.dynamic_mut(), v, s);
}
