//! The inline small-value storage.

use svint_core::MpzView;
use svint_internals::{Limb, MAX_SSIZE, NUMB_MASK, OPT_SIZE};

/// The static storage class: a sign-magnitude size and `SSIZE` inline limbs,
/// index 0 least significant.
///
/// # Invariants
///
/// - `size.unsigned_abs() <= SSIZE`;
/// - the top active limb of a nonzero value is nonzero once masked;
/// - for `SSIZE <= OPT_SIZE`, every limb with index `>= size.unsigned_abs()`
///   is zero. The few-limb kernels process whole limb pairs regardless of the
///   active size and depend on this.
#[derive(Clone, Copy, Debug)]
pub(crate) struct StaticInt<const SSIZE: usize> {
    pub(crate) size: isize,
    pub(crate) limbs: [Limb; SSIZE],
}

impl<const SSIZE: usize> StaticInt<SSIZE> {
    pub(crate) const ASSERT_SSIZE_IN_RANGE: () = assert!(
        SSIZE >= 1 && SSIZE <= MAX_SSIZE,
        "the static size of an `Integer` must be in the range 1..=64"
    );

    /// Static zero. Limbs are zero-initialized: the few-limb kernels operate
    /// on the whole limb array regardless of the active size, so fresh
    /// storage must not contain stray values.
    #[inline]
    pub(crate) fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let _ = Self::ASSERT_SSIZE_IN_RANGE;
        StaticInt {
            size: 0,
            limbs: [0; SSIZE],
        }
    }

    /// Number of active limbs.
    #[inline]
    pub(crate) fn abs_size(&self) -> usize {
        self.size.unsigned_abs()
    }

    /// Zeroes the limbs that do not participate in the value. Needed after
    /// the generic kernels have written into the buffer through the backend's
    /// limb functions, which do not touch trailing limbs.
    #[inline]
    pub(crate) fn zero_unused_limbs(&mut self) {
        if SSIZE <= OPT_SIZE {
            for i in self.abs_size()..SSIZE {
                self.limbs[i] = 0;
            }
        }
    }

    /// A backend-shaped read-only view of the active limbs.
    #[inline]
    pub(crate) fn view(&self) -> MpzView<'_> {
        MpzView::new(self.size, &self.limbs[..self.abs_size()])
    }

    /// Invariant check used by debug assertions.
    #[allow(dead_code)]
    pub(crate) fn invariants_ok(&self) -> bool {
        let asize = self.abs_size();
        if asize > SSIZE {
            return false;
        }
        if SSIZE <= OPT_SIZE {
            for i in asize..SSIZE {
                if self.limbs[i] != 0 {
                    return false;
                }
            }
        }
        if asize > 0 && (self.limbs[asize - 1] & NUMB_MASK) == 0 {
            return false;
        }
        true
    }
}

impl<const SSIZE: usize> Default for StaticInt<SSIZE> {
    fn default() -> Self {
        Self::new()
    }
}
