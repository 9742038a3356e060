//! Direct checks of the backend surface the facade dispatches to: the limb
//! primitives and constants, the `mpn` slice engine, descriptor-level
//! operations, and the pool contract. Where possible the backend results are
//! cross-checked against the facade.

use rand_xoshiro::{
    rand_core::{RngCore, SeedableRng},
    Xoshiro128StarStar,
};
use svint::Integer;
use svint_core::{mpn, mpz, pool, prim, radix, Mpz};
use svint_internals::{
    add_overflow, div_2by1, div_2by2, mul_2x1, sub_borrow, Error, BITS, MAX, NAIL_BITS, NUMB_BITS,
    NUMB_MASK,
};

#[test]
fn limb_constants_and_primitives() {
    assert_eq!(NUMB_BITS, BITS - NAIL_BITS);
    assert_eq!(NUMB_MASK, MAX >> NAIL_BITS);
    assert_eq!(add_overflow(MAX, 2), (1, 1));
    assert_eq!(sub_borrow(1, 2), (MAX, 1));
    let (lo, hi) = mul_2x1(MAX, 2);
    assert_eq!((lo, hi), (MAX - 1, 1));
    // (2*B - 2) / (B - 1) == 2 rem 0
    assert_eq!(div_2by1(lo, hi, MAX), (2, 0));
    // B / 2 == 2^(BITS - 1)
    assert_eq!(div_2by2((0, 1), (2, 0)), (((MAX >> 1) + 1, 0), (0, 0)));
}

/// The slice engine and the facade must agree on full products.
#[test]
fn mpn_mul_matches_facade() {
    let mut rng = Xoshiro128StarStar::seed_from_u64(11);
    for _ in 0..100 {
        let x = (((rng.next_u64() as u128) << 64) | rng.next_u64() as u128) | 1;
        let y = (((rng.next_u64() as u128) << 64) | rng.next_u64() as u128) | 1;
        let expected = (Integer::<2>::from(x) * Integer::<2>::from(y)).to_string();

        let mut xl = [0; 4];
        let mut yl = [0; 4];
        let xn = prim::u128_write_limbs(x, &mut xl);
        let yn = prim::u128_write_limbs(y, &mut yl);
        let mut rp = vec![0; xn + yn];
        if xn >= yn {
            mpn::mul(&mut rp, &xl[..xn], &yl[..yn]);
        } else {
            mpn::mul(&mut rp, &yl[..yn], &xl[..xn]);
        }
        let mut m = Mpz::with_capacity(xn + yn);
        m.set_limbs(&rp, false);
        assert_eq!(radix::to_string_radix(m.view(), 10).unwrap(), expected);
        assert_eq!(prim::limbs_to_u128(&xl[..xn]).unwrap(), x);
    }
}

/// Descriptor-level arithmetic agrees with the facade, including the fused
/// multiply-add and shifts.
#[test]
fn mpz_ops_match_facade() {
    let mut rng = Xoshiro128StarStar::seed_from_u64(12);
    for _ in 0..100 {
        let x = rng.next_u64() as i64;
        let y = rng.next_u64() as i64;
        let z = rng.next_u64() as i64;
        let s = (rng.next_u32() as usize) % (3 * NUMB_BITS);

        let mut xd = Mpz::with_capacity(1);
        let mut xl = [0; 2];
        let xn = prim::u128_write_limbs(x.unsigned_abs() as u128, &mut xl);
        xd.set_limbs(&xl[..xn], x < 0);
        let mut yd = Mpz::with_capacity(1);
        let yn = prim::u128_write_limbs(y.unsigned_abs() as u128, &mut xl);
        yd.set_limbs(&xl[..yn], y < 0);
        let mut zd = Mpz::with_capacity(1);
        let zn = prim::u128_write_limbs(z.unsigned_abs() as u128, &mut xl);
        zd.set_limbs(&xl[..zn], z < 0);

        // z + x * y through the descriptor api
        mpz::addmul(&mut zd, xd.view(), yd.view());
        let mut expected = Integer::<2>::from(z);
        svint::addmul(&mut expected, &Integer::<2>::from(x), &Integer::<2>::from(y));
        assert_eq!(
            radix::to_string_radix(zd.view(), 10).unwrap(),
            expected.to_string()
        );

        // x << s
        let mut shifted = Mpz::with_capacity(1);
        mpz::mul_2exp(&mut shifted, xd.view(), s);
        assert_eq!(
            radix::to_string_radix(shifted.view(), 10).unwrap(),
            (Integer::<2>::from(x) << s).to_string()
        );

        // truncated division signs follow the dividend
        if y != 0 {
            let mut q = Mpz::with_capacity(1);
            let mut r = Mpz::with_capacity(1);
            mpz::tdiv_qr(&mut q, &mut r, xd.view(), yd.view());
            assert_eq!(
                radix::to_string_radix(q.view(), 10).unwrap(),
                (x / y).to_string()
            );
            assert_eq!(
                radix::to_string_radix(r.view(), 10).unwrap(),
                (x % y).to_string()
            );
        }
    }
}

#[test]
fn pool_contract() {
    let m = Mpz::with_capacity(3);
    let cap = m.alloc();
    pool::release(m);
    // the parked descriptor comes back with its capacity and a zero size
    let again = pool::acquire(3);
    assert_eq!(again.alloc(), cap);
    assert_eq!(again.size(), 0);
    // capacities outside the cached range always allocate
    let big = pool::acquire(pool::MAX_SIZE + 5);
    assert!(big.alloc() >= pool::MAX_SIZE + 5);
    pool::release(big);
}

#[test]
fn error_display() {
    assert_eq!(Error::DivisionByZero.to_string(), "integer division by zero");
    assert!(Error::InvalidRadix.to_string().contains("2..=62"));
    assert!(Error::Overflow.to_string().contains("overflow"));
}
