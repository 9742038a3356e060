//! This crate contains common developer utilities for crates within the
//! `svint` system: the limb type configuration, the double-limb arithmetic
//! primitives, the shared error type, and the radix tables used by string
//! conversion. Most users should never have to interact with this directly;
//! the public interface lives in the `svint` crate.

#![no_std]
#![allow(clippy::manual_range_contains)]

mod primitives;
mod radix_common;

use core::fmt;

pub use primitives::{
    add_overflow, div_2by1, div_2by2, mul_2x1, sub_borrow, widen_add, widen_mul_add,
};
pub use radix_common::*;

/// The machine word forming one digit of the multiprecision representation.
/// This should be a type alias of the unsigned integer of the architecture's
/// registers; on most architectures this is simply `usize`. It can be pinned
/// to a specific width with the `u32_limbs`/`u64_limbs` features.
#[cfg(not(any(feature = "u32_limbs", feature = "u64_limbs")))]
pub type Limb = usize;
#[cfg(feature = "u32_limbs")]
pub type Limb = u32;
#[cfg(feature = "u64_limbs")]
pub type Limb = u64;

// If more than one flag is active it will cause an error because two `Limb`s
// are defined

/// Signed version of `Limb`, used for sign-magnitude sizes
#[cfg(not(any(feature = "u32_limbs", feature = "u64_limbs")))]
pub type SLimb = isize;
#[cfg(feature = "u32_limbs")]
pub type SLimb = i32;
#[cfg(feature = "u64_limbs")]
pub type SLimb = i64;

/// Bitwidth of a `Limb`
pub const BITS: usize = Limb::BITS as usize;

/// Maximum value of a `Limb`
pub const MAX: Limb = Limb::MAX;

/// Number of high "nail" bits of a limb that do not participate in the
/// numeric value. Zero on all mainstream targets, but the masking plumbing is
/// kept so that kernels can state their invariants in terms of the usable
/// portion of a limb.
pub const NAIL_BITS: usize = 0;

/// Bitwidth of the usable portion of a limb
pub const NUMB_BITS: usize = BITS - NAIL_BITS;

/// Mask of the usable bits of a limb
pub const NUMB_MASK: Limb = MAX >> NAIL_BITS;

/// Hard cap on the inline limb capacity of the static storage
pub const MAX_SSIZE: usize = 64;

/// The largest static size for which the specialised few-limb kernels are
/// active. Those kernels rely on the unused limbs of a static buffer being
/// zero.
pub const OPT_SIZE: usize = 2;

/// Whether a double-limb multiply primitive is available. The specialised
/// 1- and 2-limb multiplication kernels require it.
pub const HAS_DLIMB_MUL: bool = (BITS == 32 || BITS == 64) && NAIL_BITS == 0;

/// Whether a double-limb divide primitive is available. The specialised
/// 2-limb division kernel requires it.
pub const HAS_DLIMB_DIV: bool = (BITS == 32 || BITS == 64) && NAIL_BITS == 0;

/// Error type shared by the fallible operations of the `svint` crates.
///
/// The distinct-quotient-and-remainder precondition of division is enforced
/// by `&mut` aliasing rules and therefore has no variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Error {
    /// Integer division by zero
    DivisionByZero,
    /// A non-finite floating-point value was used to construct an integer
    NonFinite,
    /// A radix is not in the range `2..=62`
    InvalidRadix,
    /// There is a character that is not valid for the radix in use
    InvalidChar,
    /// The input string is empty, or consists only of a sign
    Empty,
    /// Explicit promotion was requested on a value that is already dynamic
    AlreadyDynamic,
    /// The value cannot be represented by the requested type
    Overflow,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::DivisionByZero => f.write_str("integer division by zero"),
            Error::NonFinite => {
                f.write_str("cannot construct an integer from a non-finite floating-point value")
            }
            Error::InvalidRadix => f.write_str("the radix must be in the range 2..=62"),
            Error::InvalidChar => f.write_str("invalid character for the radix in use"),
            Error::Empty => f.write_str("the input string is empty"),
            Error::AlreadyDynamic => f.write_str("the value is already using dynamic storage"),
            Error::Overflow => f.write_str("the value overflows the requested type"),
        }
    }
}
