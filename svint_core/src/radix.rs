//! Radix string conversion for bases 2..=62, working on descriptor views.
//!
//! Output digits follow the usual multiprecision convention: `0-9a-z` for
//! bases up to 36, and the case-sensitive `0-9A-Za-z` alphabet above that.

use alloc::{string::String, vec::Vec};

use svint_internals::{
    big_base, bits_upper_bound, chars_upper_bound, digit_char, digit_value, div_2by1,
    widen_mul_add, Error, Limb, NUMB_BITS,
};

use crate::{Mpz, MpzView};

/// Writes the canonical base-`radix` representation of `v`: a leading `-`
/// for negatives, no leading zeros for nonzero values, and a single `0` for
/// zero.
pub fn to_string_radix(v: MpzView<'_>, radix: u32) -> Result<String, Error> {
    if radix < 2 || radix > 62 {
        return Err(Error::InvalidRadix);
    }
    if v.is_zero() {
        return Ok(String::from("0"));
    }
    let (bb, chunk) = big_base(radix);
    let radix = radix as Limb;
    // The magnitude is destroyed by repeated division, so work on a copy.
    let mut scratch: Vec<Limb> = v.limbs().to_vec();
    let mut n = scratch.len();
    let mut out: Vec<u8> = Vec::with_capacity(chars_upper_bound(v.nbits(), radix as u32)? + 1);
    while n > 0 {
        // Divide out one limb-sized chunk of digits.
        let mut rem: Limb = 0;
        for i in (0..n).rev() {
            let (q, r) = div_2by1(scratch[i], rem, bb);
            scratch[i] = q;
            rem = r;
        }
        while n > 0 && scratch[n - 1] == 0 {
            n -= 1;
        }
        let mut c = rem;
        if n == 0 {
            // Most significant chunk: no leading zeros.
            while c != 0 {
                out.push(digit_char((c % radix) as u32, radix as u32));
                c /= radix;
            }
        } else {
            for _ in 0..chunk {
                out.push(digit_char((c % radix) as u32, radix as u32));
                c /= radix;
            }
        }
    }
    if v.sign() < 0 {
        out.push(b'-');
    }
    out.reverse();
    // This cannot panic: every byte pushed above is an ASCII digit or `-`.
    Ok(String::from_utf8(out).unwrap())
}

/// Parses `src` (digits only, no sign) in base `radix` into `out` as a
/// nonnegative magnitude. The caller applies the sign afterwards.
pub fn parse_radix(src: &[u8], radix: u32, out: &mut Mpz) -> Result<(), Error> {
    if radix < 2 || radix > 62 {
        return Err(Error::InvalidRadix);
    }
    if src.is_empty() {
        return Err(Error::Empty);
    }
    let (bb, chunk) = big_base(radix);
    let mut limbs: Vec<Limb> =
        Vec::with_capacity(bits_upper_bound(src.len(), radix)? / NUMB_BITS + 1);
    let mut i = 0;
    while i < src.len() {
        // Accumulate up to one limb's worth of digits, then fold the chunk
        // in with a single multiply-add pass.
        let take = chunk.min(src.len() - i);
        let mut c: Limb = 0;
        for &ch in &src[i..i + take] {
            c = c * radix as Limb + digit_value(ch, radix)? as Limb;
        }
        let factor = if take == chunk {
            bb
        } else {
            (radix as Limb).pow(take as u32)
        };
        let mut carry = c;
        for l in limbs.iter_mut() {
            let (lo, hi) = widen_mul_add(*l, factor, carry);
            *l = lo;
            carry = hi;
        }
        if carry != 0 {
            limbs.push(carry);
        }
        i += take;
    }
    out.set_limbs(&limbs, false);
    Ok(())
}
