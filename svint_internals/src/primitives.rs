//! Pure limb-level arithmetic primitives. These are free functions without
//! any external state; everything else in the `svint` system is built on top
//! of them.

use crate::{Limb, BITS};

/// Computes `x + y` and returns the wrapped sum together with the carry bit
/// (`0` or `1`).
#[inline]
pub const fn add_overflow(x: Limb, y: Limb) -> (Limb, Limb) {
    let (sum, carry) = x.overflowing_add(y);
    (sum, carry as Limb)
}

/// Computes `x - y` and returns the wrapped difference together with the
/// borrow bit (`0` or `1`).
#[inline]
pub const fn sub_borrow(x: Limb, y: Limb) -> (Limb, Limb) {
    let (diff, borrow) = x.overflowing_sub(y);
    (diff, borrow as Limb)
}

/// Computes `x + y + z` and returns the widened result as a tuple. The carry
/// part is at most 2, which makes this usable for fusing a carry-in and a
/// carry-out in ripple loops.
#[inline]
pub const fn widen_add(x: Limb, y: Limb, z: Limb) -> (Limb, Limb) {
    let (sum, carry0) = x.overflowing_add(y);
    let (sum, carry1) = sum.overflowing_add(z);
    (sum, (carry0 as Limb) + (carry1 as Limb))
}

macro_rules! widen_mul_add_internal {
    ($x:ident, $y:ident, $z:ident; $($bits:expr, $uD:ident);*;) => {
        match BITS {
            $(
                $bits => {
                    let tmp = ($x as $uD).wrapping_mul($y as $uD).wrapping_add($z as $uD);
                    (tmp as Limb, tmp.wrapping_shr($bits) as Limb)
                }
            )*
            _ => panic!("Unsupported limb size"),
        }
    };
}

/// Computes `(x * y) + z`. This cannot overflow, because it returns the value
/// widened into a tuple, where the first element is the least significant
/// part of the integer and the second is the most significant.
#[inline]
pub const fn widen_mul_add(x: Limb, y: Limb, z: Limb) -> (Limb, Limb) {
    widen_mul_add_internal!(
        x, y, z;
        32, u64;
        64, u128;
    )
}

/// Full double-limb product of `x` and `y`, returned as `(lo, hi)`.
#[inline]
pub const fn mul_2x1(x: Limb, y: Limb) -> (Limb, Limb) {
    widen_mul_add(x, y, 0)
}

macro_rules! div_2by1_internal {
    ($lo:ident, $hi:ident, $div:ident; $($bits:expr, $uD:ident);*;) => {
        match BITS {
            $(
                $bits => {
                    let duo = $lo as $uD | (($hi as $uD) << $bits);
                    let div = $div as $uD;
                    ((duo / div) as Limb, (duo % div) as Limb)
                }
            )*
            _ => panic!("Unsupported limb size"),
        }
    };
}

/// Divides the double limb `(lo, hi)` by the single limb `div` and returns
/// the quotient and remainder.
///
/// # Panics
///
/// If `div == 0` this function will panic. The quotient only fits in a
/// single limb when `hi < div`, which callers must ensure.
#[inline]
pub const fn div_2by1(lo: Limb, hi: Limb, div: Limb) -> (Limb, Limb) {
    div_2by1_internal!(
        lo, hi, div;
        32, u64;
        64, u128;
    )
}

macro_rules! div_2by2_internal {
    ($duo:ident, $div:ident; $($bits:expr, $uD:ident);*;) => {
        match BITS {
            $(
                $bits => {
                    let duo = $duo.0 as $uD | (($duo.1 as $uD) << $bits);
                    let div = $div.0 as $uD | (($div.1 as $uD) << $bits);
                    let quo = duo.wrapping_div(div);
                    let rem = duo.wrapping_rem(div);
                    (
                        (quo as Limb, (quo >> $bits) as Limb),
                        (rem as Limb, (rem >> $bits) as Limb),
                    )
                }
            )*
            _ => panic!("Unsupported limb size"),
        }
    };
}

/// Truncated division of the double limb `duo` by the double limb `div`,
/// returning the quotient and remainder as `(lo, hi)` pairs. Only available
/// when a natively wider unsigned type exists (see
/// [HAS_DLIMB_DIV](crate::HAS_DLIMB_DIV)).
///
/// # Panics
///
/// If `div == (0, 0)` this function will panic.
#[inline]
pub const fn div_2by2(duo: (Limb, Limb), div: (Limb, Limb)) -> ((Limb, Limb), (Limb, Limb)) {
    div_2by2_internal!(
        duo, div;
        32, u64;
        64, u128;
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAX;

    #[test]
    fn add_sub_carries() {
        assert_eq!(add_overflow(MAX, 1), (0, 1));
        assert_eq!(add_overflow(MAX - 1, 1), (MAX, 0));
        assert_eq!(sub_borrow(0, 1), (MAX, 1));
        assert_eq!(widen_add(MAX, MAX, 1), (MAX, 1));
    }

    #[test]
    fn widening_mul() {
        assert_eq!(mul_2x1(MAX, MAX), (1, MAX - 1));
        assert_eq!(widen_mul_add(MAX, MAX, MAX), (0, MAX));
        assert_eq!(mul_2x1(0, MAX), (0, 0));
    }

    #[test]
    fn double_division() {
        // (MAX*B + MAX) / (1*B + 0) == (MAX, remainder MAX)
        assert_eq!(div_2by2((MAX, MAX), (0, 1)), ((MAX, 0), (MAX, 0)));
        assert_eq!(div_2by1(7, 0, 2), (3, 1));
        let (q, r) = div_2by1(MAX, 1, 2);
        assert_eq!(q, MAX);
        assert_eq!(r, 1);
    }
}
