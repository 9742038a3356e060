pub(crate) mod integer;
pub(crate) mod static_int;
pub(crate) mod storage;

pub use integer::Integer;

/// A single-limb static capacity, the fastest choice for values that usually
/// fit one machine word.
pub type Integer1 = Integer<1>;

/// A two-limb static capacity, the widest size with fully specialised
/// kernels.
pub type Integer2 = Integer<2>;
