//! Truncated division with remainder: static kernels and the dispatch
//! driver. Division always fits when every operand is static (the quotient
//! and remainder are bounded by the dividend), so the kernels are
//! infallible.

use svint_core::{mpn, mpz};
use svint_internals::{div_2by2, Error, HAS_DLIMB_DIV, NAIL_BITS, NUMB_MASK};

use crate::data::{integer::Integer, static_int::StaticInt, storage::Storage};
use crate::logic::add::sub_compute_size;

/// Generic implementation over the backend's limb division.
#[allow(clippy::too_many_arguments)]
fn div_impl_mpn<const SSIZE: usize>(
    q: &mut StaticInt<SSIZE>,
    r: &mut StaticInt<SSIZE>,
    op1: &StaticInt<SSIZE>,
    op2: &StaticInt<SSIZE>,
    asize1: usize,
    asize2: usize,
    sign1: isize,
    sign2: isize,
) {
    // The limb division requires asize1 >= asize2; a larger divisor means a
    // zero quotient and the dividend as remainder.
    if asize2 > asize1 {
        *r = *op1;
        q.size = 0;
        return;
    }
    if asize2 == 1 {
        let rem = mpn::divrem_1(&mut q.limbs[..asize1], &op1.limbs[..asize1], op2.limbs[0]);
        r.limbs[0] = rem;
    } else {
        mpn::tdiv_qr(
            &mut q.limbs[..asize1 - asize2 + 1],
            &mut r.limbs[..asize2],
            &op1.limbs[..asize1],
            &op2.limbs[..asize2],
        );
    }
    // Complete the quotient: scan down for the true size, apply the sign.
    let q_asize = sub_compute_size(&q.limbs, asize1 - asize2 + 1);
    q.size = q_asize as isize * sign1 * sign2;
    // Complete the remainder, whose sign follows the dividend.
    let r_asize = sub_compute_size(&r.limbs, asize2);
    r.size = if sign1 == -1 {
        -(r_asize as isize)
    } else {
        r_asize as isize
    };
}

/// Single-limb implementation via native division. This one is always used
/// for `SSIZE == 1`, nails or not, hence the masking.
fn div_impl_1<const SSIZE: usize>(
    q: &mut StaticInt<SSIZE>,
    r: &mut StaticInt<SSIZE>,
    op1: &StaticInt<SSIZE>,
    op2: &StaticInt<SSIZE>,
    sign1: isize,
    sign2: isize,
) {
    let n1 = op1.limbs[0] & NUMB_MASK;
    let n2 = op2.limbs[0] & NUMB_MASK;
    let q_ = n1 / n2;
    let r_ = n1 % n2;
    q.size = (q_ != 0) as isize * sign1 * sign2;
    q.limbs[0] = q_;
    // truncated division: the sign of the remainder is the sign of the
    // dividend
    r.size = if sign1 == -1 {
        -((r_ != 0) as isize)
    } else {
        (r_ != 0) as isize
    };
    r.limbs[0] = r_;
}

/// Two-limb implementation over the double-limb divide.
#[allow(clippy::too_many_arguments)]
fn div_impl_2<const SSIZE: usize>(
    q: &mut StaticInt<SSIZE>,
    r: &mut StaticInt<SSIZE>,
    op1: &StaticInt<SSIZE>,
    op2: &StaticInt<SSIZE>,
    asize1: usize,
    asize2: usize,
    sign1: isize,
    sign2: isize,
) {
    if asize1 < 2 && asize2 < 2 {
        // Degenerate single-limb case, no masking needed without nails.
        let n1 = op1.limbs[0];
        let n2 = op2.limbs[0];
        let q_ = n1 / n2;
        let r_ = n1 % n2;
        q.size = (q_ != 0) as isize * sign1 * sign2;
        q.limbs[0] = q_;
        q.limbs[1] = 0;
        r.size = if sign1 == -1 {
            -((r_ != 0) as isize)
        } else {
            (r_ != 0) as isize
        };
        r.limbs[0] = r_;
        r.limbs[1] = 0;
        return;
    }
    let ((q0, q1), (r0, r1)) = div_2by2(
        (op1.limbs[0], op1.limbs[1]),
        (op2.limbs[0], op2.limbs[1]),
    );
    let q_asize: isize = if q1 != 0 { 2 } else { (q0 != 0) as isize };
    q.size = q_asize * sign1 * sign2;
    q.limbs[0] = q0;
    q.limbs[1] = q1;
    let r_asize: isize = if r1 != 0 { 2 } else { (r0 != 0) as isize };
    r.size = if sign1 == -1 { -r_asize } else { r_asize };
    r.limbs[0] = r0;
    r.limbs[1] = r1;
}

/// Static division into distinct quotient and remainder buffers.
pub(crate) fn static_div<const SSIZE: usize>(
    q: &mut StaticInt<SSIZE>,
    r: &mut StaticInt<SSIZE>,
    op1: &StaticInt<SSIZE>,
    op2: &StaticInt<SSIZE>,
) {
    let asize1 = op1.size.unsigned_abs();
    let asize2 = op2.size.unsigned_abs();
    let sign1 = op1.size.signum();
    let sign2 = op2.size.signum();
    debug_assert!(sign2 != 0);
    if SSIZE == 1 {
        div_impl_1(q, r, op1, op2, sign1, sign2);
    } else if NAIL_BITS == 0 && SSIZE == 2 && HAS_DLIMB_DIV {
        div_impl_2(q, r, op1, op2, asize1, asize2, sign1, sign2);
    } else {
        div_impl_mpn(q, r, op1, op2, asize1, asize2, sign1, sign2);
        q.zero_unused_limbs();
        r.zero_unused_limbs();
    }
    debug_assert!(q.invariants_ok() && r.invariants_ok());
}

/// Truncated division with remainder: `q = trunc(op1 / op2)` and
/// `r = op1 - q * op2`, so that `r` is zero or has the sign of `op1` and
/// `|r| < |op2|`. The quotient and remainder are necessarily distinct
/// objects, which the `&mut` arguments already guarantee.
///
/// # Errors
///
/// [Error::DivisionByZero] if `op2` is zero; `q` and `r` are left untouched.
pub fn div<const SSIZE: usize>(
    q: &mut Integer<SSIZE>,
    r: &mut Integer<SSIZE>,
    op1: &Integer<SSIZE>,
    op2: &Integer<SSIZE>,
) -> Result<(), Error> {
    if op2.sign() == 0 {
        return Err(Error::DivisionByZero);
    }
    if let (Storage::Static(qs), Storage::Static(rs), Storage::Static(a), Storage::Static(b)) = (
        &mut q.storage,
        &mut r.storage,
        &op1.storage,
        &op2.storage,
    ) {
        // Division can never fail to fit.
        static_div(qs, rs, a, b);
        return Ok(());
    }
    if q.storage.is_static() {
        q.storage.promote(0);
    }
    if r.storage.is_static() {
        r.storage.promote(0);
    }
    let (n, d) = (op1.view(), op2.view());
    // Two distinct `&mut` receivers: the storages of `q` and `r`.
    let q_dyn = q.storage.dynamic_mut();
    let r_dyn = r.storage.dynamic_mut();
    mpz::tdiv_qr(q_dyn, r_dyn, n, d);
    Ok(())
}
