//! Test support for the `svint` workspace; the actual tests live in
//! `tests/` and the benchmarks in `benches/`.

use rand_xoshiro::{rand_core::RngCore, Xoshiro128StarStar};
use svint::Integer;

/// Bitwidth of a limb under the default configuration.
pub const BITS: usize = svint::Limb::BITS as usize;

/// A random value whose magnitude spans `0..=max_limbs` limbs, with a random
/// sign. Small magnitudes are common on purpose, so that the static kernels
/// and the promotion boundary both get exercised.
pub fn rand_int<const SSIZE: usize>(
    rng: &mut Xoshiro128StarStar,
    max_limbs: usize,
) -> Integer<SSIZE> {
    let bits = (rng.next_u32() as usize) % (max_limbs * BITS + 1);
    let mut x = Integer::<SSIZE>::random_bits(rng, bits);
    if rng.next_u32() & 1 != 0 {
        x.negate();
    }
    x
}
