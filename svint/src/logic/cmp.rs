//! Equality, ordering and hashing.

use core::cmp::Ordering;
use core::hash::{Hash, Hasher};

use svint_core::mpz;
use svint_internals::NUMB_MASK;

use crate::data::{integer::Integer, storage::Storage};

/// Two integers are equal iff their sign-magnitude sizes match and their
/// active limbs match pairwise once masked to the usable bits; the storage
/// class does not participate. Mixed-storage comparison goes through the
/// backend views.
impl<const SSIZE: usize> PartialEq for Integer<SSIZE> {
    fn eq(&self, other: &Self) -> bool {
        match (&self.storage, &other.storage) {
            (Storage::Static(a), Storage::Static(b)) => {
                a.size == b.size
                    && a.limbs[..a.abs_size()]
                        .iter()
                        .zip(b.limbs[..b.abs_size()].iter())
                        .all(|(l1, l2)| (l1 & NUMB_MASK) == (l2 & NUMB_MASK))
            }
            _ => mpz::cmp(self.view(), other.view()) == Ordering::Equal,
        }
    }
}

impl<const SSIZE: usize> Eq for Integer<SSIZE> {}

impl<const SSIZE: usize> PartialOrd for Integer<SSIZE> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Sign first, then magnitude.
impl<const SSIZE: usize> Ord for Integer<SSIZE> {
    fn cmp(&self, other: &Self) -> Ordering {
        mpz::cmp(self.view(), other.view())
    }
}

/// Hashes the sign-magnitude size and the active masked limbs, so that equal
/// values hash equally regardless of storage class.
impl<const SSIZE: usize> Hash for Integer<SSIZE> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let v = self.view();
        v.size().hash(state);
        for l in v.limbs() {
            (l & NUMB_MASK).hash(state);
        }
    }
}
