//! The multiprecision backend engine of the `svint` system.
//!
//! This crate provides the dynamic-storage side of the small-value
//! optimization: limb-slice arithmetic in [mpn], the heap-allocated [Mpz]
//! descriptor with its value-level operations in [mpz], the thread-local
//! descriptor [pool], and radix string conversion in [radix]. The storage
//! dispatch and the specialised few-limb kernels live in the `svint` crate;
//! everything here works on descriptors and read-only [MpzView]s of them.
//!
//! There is a hidden reexport of this crate in `svint`.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod mpn;
pub mod mpz;
pub mod pool;
pub mod prim;
pub mod radix;

pub use mpz::{Mpz, MpzView};

// Make the shared internals reachable for the facade through this crate.
#[doc(hidden)]
pub use svint_internals;
