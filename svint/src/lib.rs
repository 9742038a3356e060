//! Arbitrary-precision signed integers with a small-value optimization.
//!
//! An [Integer] stores its limbs either inline in a fixed-capacity buffer
//! (the static storage class) or behind a heap-allocated descriptor managed
//! by the multiprecision backend in `svint_core` (the dynamic storage
//! class). Arithmetic on small operands runs entirely within the inline
//! buffer through hand-written kernels for the one- and two-limb capacities;
//! only when a result cannot fit is the destination promoted, with a
//! thread-local descriptor pool amortising the heap traffic.
//!
//! ```
//! use svint::{div, Integer2};
//!
//! // 2^64 * 3 still fits two 64-bit limbs: no allocation anywhere here
//! let a = Integer2::from(1u8) << 64;
//! let b = &a * 3u32;
//! assert!(b.is_static());
//!
//! let mut q = Integer2::new();
//! let mut r = Integer2::new();
//! div(&mut q, &mut r, &b, &a).unwrap();
//! assert_eq!(q, Integer2::from(3u8));
//! assert!(r.is_zero());
//!
//! // squaring it overflows the static capacity and promotes
//! let c = &b * &b;
//! assert!(c.is_dynamic());
//! assert_eq!(c, Integer2::from(9u8) << 128);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![allow(clippy::manual_range_contains)]

extern crate alloc;

mod data;
mod logic;
#[cfg(feature = "serde_support")]
mod serde;
mod strings;

pub use data::{Integer, Integer1, Integer2};
pub use logic::add::{add, sub};
pub use logic::div::div;
pub use logic::mul::{addmul, mul};
pub use logic::shift::mul_2exp;
pub use svint_internals::{Error, Limb, SLimb};
