//! The storage variant: every integer value is either a [StaticInt] or a
//! heap-backed [Mpz] descriptor. The discriminant takes the place of the
//! C-style sentinel-in-shared-prefix trick; kernels dispatch over the enum
//! without any indirection.

use core::mem::{self, ManuallyDrop};

use svint_core::{pool, Mpz, MpzView};

use crate::data::static_int::StaticInt;

pub(crate) enum Storage<const SSIZE: usize> {
    Static(StaticInt<SSIZE>),
    // `ManuallyDrop` so that the `Drop` impl below can hand the descriptor
    // back to the pool instead of freeing it.
    Dynamic(ManuallyDrop<Mpz>),
}

impl<const SSIZE: usize> Storage<SSIZE> {
    #[inline]
    pub(crate) fn new_static_zero() -> Self {
        Storage::Static(StaticInt::new())
    }

    #[inline]
    pub(crate) fn from_mpz(m: Mpz) -> Self {
        Storage::Dynamic(ManuallyDrop::new(m))
    }

    #[inline]
    pub(crate) fn is_static(&self) -> bool {
        matches!(self, Storage::Static(_))
    }

    /// A read-only view of the value, regardless of the storage class.
    #[inline]
    pub(crate) fn view(&self) -> MpzView<'_> {
        match self {
            Storage::Static(s) => s.view(),
            Storage::Dynamic(m) => m.view(),
        }
    }

    /// The dynamic descriptor of a value known to be dynamic.
    #[inline]
    pub(crate) fn dynamic_mut(&mut self) -> &mut Mpz {
        match self {
            Storage::Dynamic(m) => &mut **m,
            Storage::Static(_) => unreachable!("storage must be dynamic here"),
        }
    }

    /// Static → dynamic transition. A `nlimbs` of zero sizes the descriptor
    /// exactly to the current value; otherwise at least `nlimbs` limbs are
    /// allocated. The transition is never revoked within an operation.
    pub(crate) fn promote(&mut self, nlimbs: usize) {
        debug_assert!(self.is_static());
        if let Storage::Static(s) = self {
            let need = s.abs_size();
            let mut m = pool::acquire(if nlimbs == 0 { need } else { nlimbs.max(need) });
            m.assign(s.view());
            *self = Storage::from_mpz(m);
        }
    }

    /// Dynamic → static shrink. Fails without touching the value if the
    /// dynamic limb count exceeds the inline capacity.
    pub(crate) fn demote(&mut self) -> bool {
        debug_assert!(!self.is_static());
        let fresh = match self {
            Storage::Dynamic(m) => {
                let asize = m.asize();
                if asize > SSIZE {
                    return false;
                }
                let mut s = StaticInt::new();
                s.size = m.size();
                s.limbs[..asize].copy_from_slice(m.limbs());
                Storage::Static(s)
            }
            Storage::Static(_) => return false,
        };
        // The replaced dynamic storage is handed back to the pool by `Drop`.
        let prev = mem::replace(self, fresh);
        drop(prev);
        true
    }
}

impl<const SSIZE: usize> Drop for Storage<SSIZE> {
    fn drop(&mut self) {
        if let Storage::Dynamic(m) = self {
            // Safety: the descriptor is taken exactly once; the drop glue
            // that runs afterwards sees only the inert `ManuallyDrop` shell.
            pool::release(unsafe { ManuallyDrop::take(m) });
        }
    }
}

/// Deep copy that preserves the storage class of the source.
impl<const SSIZE: usize> Clone for Storage<SSIZE> {
    fn clone(&self) -> Self {
        match self {
            Storage::Static(s) => Storage::Static(*s),
            Storage::Dynamic(m) => {
                let mut fresh = pool::acquire(m.asize());
                fresh.assign(m.view());
                Storage::from_mpz(fresh)
            }
        }
    }
}

impl<const SSIZE: usize> Default for Storage<SSIZE> {
    fn default() -> Self {
        Self::new_static_zero()
    }
}
