//! A per-thread cache of dynamic descriptors, bucketed by allocated limb
//! count, so that frequent promotion/destruction cycles do not hit the
//! system allocator each time.

use alloc::vec::Vec;

use crate::Mpz;

/// Largest descriptor capacity (in limbs) that is cached.
pub const MAX_SIZE: usize = 10;

/// Maximum number of cached descriptors per capacity bucket.
pub const MAX_ENTRIES: usize = 100;

struct Pool {
    // bucket `k` holds descriptors with `alloc == k + 1`
    buckets: [Vec<Mpz>; MAX_SIZE],
}

impl Pool {
    fn new() -> Self {
        Pool {
            buckets: [(); MAX_SIZE].map(|_| Vec::new()),
        }
    }

    fn pop(&mut self, nlimbs: usize) -> Mpz {
        if nlimbs >= 1 && nlimbs <= MAX_SIZE {
            if let Some(mut m) = self.buckets[nlimbs - 1].pop() {
                // Cached limbs hold stale values; callers overwrite them
                // before the value is observed.
                m.set_size(0);
                return m;
            }
        }
        Mpz::with_capacity(nlimbs)
    }

    fn push(&mut self, m: Mpz) {
        let cap = m.alloc();
        if cap >= 1 && cap <= MAX_SIZE && self.buckets[cap - 1].len() < MAX_ENTRIES {
            self.buckets[cap - 1].push(m);
        }
        // otherwise `m` drops here and the buffer is freed
    }
}

// All parked descriptors are freed on thread exit by the thread-local's
// destructor dropping the bucket vectors.

#[cfg(feature = "std")]
std::thread_local! {
    static POOL: core::cell::RefCell<Pool> = core::cell::RefCell::new(Pool::new());
}

/// Returns a descriptor with a capacity of at least `nlimbs`. The limb
/// contents are arbitrary and the size is zero; the caller must overwrite
/// the value before it is observed.
#[cfg(feature = "std")]
pub fn acquire(nlimbs: usize) -> Mpz {
    POOL.try_with(|p| p.borrow_mut().pop(nlimbs))
        .unwrap_or_else(|_| Mpz::with_capacity(nlimbs))
}

/// Parks `m` in the current thread's pool, or frees it if its bucket is full
/// or its capacity is outside the cached range.
#[cfg(feature = "std")]
pub fn release(m: Mpz) {
    // If the thread-local has already been torn down, `m` is simply dropped.
    let _ = POOL.try_with(|p| p.borrow_mut().push(m));
}

/// Without thread-local storage the pool degenerates to direct allocation;
/// correctness is unchanged.
#[cfg(not(feature = "std"))]
pub fn acquire(nlimbs: usize) -> Mpz {
    Mpz::with_capacity(nlimbs)
}

#[cfg(not(feature = "std"))]
pub fn release(m: Mpz) {
    drop(m);
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn reuse_and_eviction() {
        let m = Mpz::with_capacity(3);
        release(m);
        let m = acquire(3);
        assert!(m.alloc() >= 3);
        assert_eq!(m.size(), 0);
        // Oversized descriptors are never parked.
        let big = Mpz::with_capacity(MAX_SIZE + 1);
        release(big);
        let again = acquire(MAX_SIZE + 1);
        assert!(again.alloc() >= MAX_SIZE + 1);
    }
}
