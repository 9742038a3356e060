//! Concrete scenarios, boundary behaviours, storage transitions, and the
//! error taxonomy.

use core::cmp::Ordering;

use svint::{add, addmul, div, mul, mul_2exp, sub, Error, Integer, Integer1, Integer2};
use testcrate::BITS;

fn pow2<const SSIZE: usize>(s: usize) -> Integer<SSIZE> {
    Integer::<SSIZE>::from(1u8) << s
}

#[cfg(target_pointer_width = "64")]
#[test]
fn two_limb_scenarios() {
    // 2^127 + 5 plus 2^127 + 7 overflows two limbs and must promote
    let a = pow2::<2>(127) + 5u32;
    let b = pow2::<2>(127) + 7u32;
    assert!(a.is_static() && b.is_static());
    let mut r = Integer2::new();
    add(&mut r, &a, &b);
    assert!(r.is_dynamic());
    assert_eq!(r, pow2::<2>(128) + 12u32);

    // (2^127 - 1) + (-2^127) stays static
    let a = pow2::<2>(127) - 1u32;
    let b = -pow2::<2>(127);
    let mut r = Integer2::new();
    add(&mut r, &a, &b);
    assert!(r.is_static());
    assert_eq!(r, Integer2::from(-1i32));

    // 2^64 * 3 stays static
    let a = pow2::<2>(64);
    let b = Integer2::from(3u8);
    let mut r = Integer2::new();
    mul(&mut r, &a, &b);
    assert!(r.is_static());
    assert_eq!(r, pow2::<2>(64) * 3u32);

    // 2^63 * 2^63 == 2^126 stays static
    let a = pow2::<2>(63);
    let mut r = Integer2::new();
    mul(&mut r, &a, &a);
    assert!(r.is_static());
    assert_eq!(r, pow2::<2>(126));

    // shifting -5 by 130 bits cannot fit two limbs: fail, promote, redo
    let n = Integer2::from(-5i32);
    let mut r = Integer2::new();
    mul_2exp(&mut r, &n, 130);
    assert!(r.is_dynamic());
    assert_eq!(r, -(pow2::<2>(130) * 5u32));
}

#[test]
fn division_truncation() {
    let mut q = Integer2::new();
    let mut r = Integer2::new();
    div(&mut q, &mut r, &Integer2::from(7i32), &Integer2::from(-2i32)).unwrap();
    assert_eq!(q, Integer2::from(-3i32));
    assert_eq!(r, Integer2::from(1i32));

    div(&mut q, &mut r, &Integer2::from(-7i32), &Integer2::from(2i32)).unwrap();
    assert_eq!(q, Integer2::from(-3i32));
    assert_eq!(r, Integer2::from(-1i32));

    let e = div(&mut q, &mut r, &Integer2::from(7i32), &Integer2::new());
    assert_eq!(e, Err(Error::DivisionByZero));
}

#[test]
fn shift_boundaries() {
    // shifts at the limb-width boundaries of a two-limb buffer
    let one = Integer2::from(1u8);
    let mut r = Integer2::new();
    mul_2exp(&mut r, &one, BITS);
    assert!(r.is_static());
    assert_eq!(r.size(), 2);
    mul_2exp(&mut r, &one, 2 * BITS - 1);
    assert!(r.is_static());
    assert_eq!(r.nbits(), 2 * BITS);
    // one more bit cannot fit statically
    mul_2exp(&mut r, &one, 2 * BITS);
    assert!(r.is_dynamic());
    assert_eq!(r.nbits(), 2 * BITS + 1);
    // a zero operand never promotes, whatever the shift
    let mut r = Integer2::new();
    mul_2exp(&mut r, &Integer2::new(), 10 * BITS);
    assert!(r.is_static() && r.is_zero());
}

fn full_static_opposite_signs_check<const SSIZE: usize>() {
    // both operands exactly fill the buffer with the top bit set; the
    // opposite-sign addition must still produce the right value
    let mut top = pow2::<SSIZE>(SSIZE * BITS) - 1u32;
    // shrink back so the static kernels are the ones being exercised
    assert!(top.demote());
    let mut neg = top.clone();
    neg.negate();
    let mut r = Integer::<SSIZE>::new();
    add(&mut r, &top, &neg);
    assert!(r.is_zero());
    let mut almost = pow2::<SSIZE>(SSIZE * BITS) - 2u32;
    assert!(almost.demote());
    let mut r = Integer::<SSIZE>::new();
    sub(&mut r, &top, &almost);
    assert_eq!(r, Integer::<SSIZE>::from(1u8));
}

#[test]
fn full_static_opposite_signs() {
    full_static_opposite_signs_check::<1>();
    full_static_opposite_signs_check::<2>();
    // the same through the generic kernel
    full_static_opposite_signs_check::<3>();
}

#[test]
fn most_negative_conversions() {
    macro_rules! check_min {
        ($($ty:ident)*) => {
            $(
                let n = Integer2::from($ty::MIN);
                assert_eq!($ty::try_from(&n).unwrap(), $ty::MIN);
                // one below the most negative value no longer fits
                let mut smaller = n.clone();
                smaller -= 1u8;
                assert_eq!($ty::try_from(&smaller), Err(Error::Overflow));
            )*
        };
    }
    check_min!(i8 i16 i32 i64 i128 isize);
    let n = Integer2::from(-1i8);
    assert_eq!(u64::try_from(&n), Err(Error::Overflow));
    assert_eq!(u128::try_from(&Integer2::from(u128::MAX)).unwrap(), u128::MAX);
}

#[test]
fn storage_transitions() {
    let mut n = Integer2::from(42u8);
    assert!(n.is_static());
    assert!(!n.demote());
    n.promote().unwrap();
    assert!(n.is_dynamic());
    assert_eq!(n.promote(), Err(Error::AlreadyDynamic));
    assert_eq!(n, Integer2::from(42u8));
    assert!(n.demote());
    assert!(n.is_static());

    // clone preserves the storage class of the source
    let mut big = pow2::<2>(4 * BITS);
    assert!(big.is_dynamic());
    let copy = big.clone();
    assert!(copy.is_dynamic());
    assert_eq!(copy, big);
    assert!(!big.demote());

    // a moved-from-by-take value is a static zero
    let taken = core::mem::take(&mut big);
    assert!(taken.is_dynamic());
    assert!(big.is_static() && big.is_zero());
}

#[test]
fn sign_size_nbits() {
    let mut n = Integer2::new();
    assert_eq!((n.sign(), n.size(), n.nbits()), (0, 0, 1));
    n = Integer2::from(1u8);
    assert_eq!((n.sign(), n.size(), n.nbits()), (1, 1, 1));
    n = Integer2::from(-(1i64 << 40));
    assert_eq!((n.sign(), n.size(), n.nbits()), (-1, 1, 41));
    n.negate();
    assert_eq!(n.sign(), 1);
    n.abs_assign();
    assert_eq!(n.sign(), 1);
    let n = pow2::<2>(5 * BITS);
    assert_eq!((n.size(), n.nbits()), (6, 5 * BITS + 1));
}

#[test]
fn ordering_and_equality() {
    let mut values = vec![
        Integer2::from(-7i32),
        Integer2::new(),
        Integer2::from(1u8),
        pow2::<2>(2 * BITS) - 1u32,
        pow2::<2>(2 * BITS),
        pow2::<2>(3 * BITS),
    ];
    for w in values.windows(2) {
        assert_eq!(w[0].cmp(&w[1]), Ordering::Less);
    }
    // equality across storage classes
    let a = pow2::<2>(BITS);
    let mut b = a.clone();
    b.promote().unwrap();
    assert_eq!(a, b);
    assert_eq!(a.cmp(&b), Ordering::Equal);
    // hashes agree too
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    let mut h1 = DefaultHasher::new();
    let mut h2 = DefaultHasher::new();
    a.hash(&mut h1);
    b.hash(&mut h2);
    assert_eq!(h1.finish(), h2.finish());
    values.sort();
    assert!(values.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn float_conversions() {
    assert_eq!(Integer2::try_from(0.75f64).unwrap(), Integer2::new());
    assert_eq!(Integer2::try_from(-2.5f64).unwrap(), Integer2::from(-2i32));
    assert_eq!(Integer2::try_from(2f64.powi(90)).unwrap(), pow2::<2>(90));
    assert_eq!(Integer2::try_from(f64::NAN), Err(Error::NonFinite));
    assert_eq!(Integer2::try_from(f64::INFINITY), Err(Error::NonFinite));
    assert_eq!(Integer2::try_from(-0.0f32).unwrap(), Integer2::new());
    assert_eq!(Integer2::from(1u64 << 40).to_f64(), 2f64.powi(40));
    assert_eq!(pow2::<2>(200).to_f64(), 2f64.powi(200));
    assert_eq!(Integer2::from(-3i32).to_f32(), -3f32);
}

#[test]
fn addmul_accumulates() {
    // a small dot-product loop stays static throughout
    let xs = [3i64, -4, 5, -6];
    let ys = [7i64, 8, -9, 10];
    let mut acc = Integer1::new();
    for (&x, &y) in xs.iter().zip(ys.iter()) {
        addmul(&mut acc, &Integer1::from(x), &Integer1::from(y));
    }
    let expect: i64 = xs.iter().zip(ys.iter()).map(|(x, y)| x * y).sum();
    assert_eq!(acc, Integer1::from(expect));
    assert!(acc.is_static());

    // accumulating past the static range promotes and keeps the total
    let big = pow2::<1>(BITS - 1);
    let mut acc = Integer1::from(1u8);
    addmul(&mut acc, &big, &Integer1::from(4u8));
    assert!(acc.is_dynamic());
    assert_eq!(acc, pow2::<1>(BITS + 1) + 1u32);
}

#[test]
fn pool_reuse_smoke() {
    // repeatedly promote and drop; the thread-local pool keeps this cheap
    // and, more importantly here, correct
    for i in 0..1000u32 {
        let mut n = Integer2::from(i);
        n.promote().unwrap();
        let m = n.clone();
        drop(n);
        assert_eq!(m, Integer2::from(i));
    }
}

#[test]
fn random_bits_bounds() {
    use rand_xoshiro::{rand_core::SeedableRng, Xoshiro128StarStar};
    let mut rng = Xoshiro128StarStar::seed_from_u64(9);
    for bits in [0usize, 1, BITS - 1, BITS, 2 * BITS, 5 * BITS + 3] {
        for _ in 0..20 {
            let x = Integer2::random_bits(&mut rng, bits);
            assert!(x.sign() >= 0);
            assert!(x.nbits() <= bits.max(1));
        }
    }
}
