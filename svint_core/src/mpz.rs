//! The heap-allocated descriptor used by the dynamic storage class, plus the
//! value-level operations on it that the storage dispatch delegates to.

use alloc::alloc::{alloc_zeroed, dealloc, handle_alloc_error, Layout};
use core::{cmp::Ordering, mem, ptr::NonNull, slice};

use svint_internals::{Limb, NUMB_BITS, NUMB_MASK};

use crate::{mpn, pool};

#[inline]
fn layout(nlimbs: usize) -> Layout {
    match Layout::array::<Limb>(nlimbs) {
        Ok(l) => l,
        Err(_) => panic!("descriptor capacity overflows the address space"),
    }
}

/// A heap-backed multiprecision integer descriptor: an allocated limb buffer,
/// a sign-magnitude size, and the allocated capacity in limbs. Ownership of
/// the buffer is unique. The capacity is always at least one limb, and is
/// never the static storage sentinel.
pub struct Mpz {
    alloc: usize,
    size: isize,
    d: NonNull<Limb>,
}

/// `Mpz` is safe to send between threads since it does not own aliasing
/// memory and has no reference counting mechanism like `Rc`.
unsafe impl Send for Mpz {}

/// `Mpz` is safe to share between threads since it does not own aliasing
/// memory and has no mutable internal state like `Cell` or `RefCell`.
unsafe impl Sync for Mpz {}

impl Mpz {
    /// Zero-valued descriptor with at least `nlimbs` limbs of capacity.
    pub fn with_capacity(nlimbs: usize) -> Self {
        let cap = nlimbs.max(1);
        // Safety: the layout is nonzero-sized, and the zeroed buffer means
        // every limb is initialized from the start.
        let d = unsafe {
            let p: *mut Limb = alloc_zeroed(layout(cap)).cast();
            match NonNull::new(p) {
                Some(p) => p,
                None => handle_alloc_error(layout(cap)),
            }
        };
        Mpz { alloc: cap, size: 0, d }
    }

    /// Allocated capacity in limbs.
    #[inline]
    pub fn alloc(&self) -> usize {
        self.alloc
    }

    /// Sign-magnitude size in limbs.
    #[inline]
    pub fn size(&self) -> isize {
        self.size
    }

    /// Number of active limbs.
    #[inline]
    pub fn asize(&self) -> usize {
        self.size.unsigned_abs()
    }

    #[inline]
    pub fn set_size(&mut self, size: isize) {
        debug_assert!(size.unsigned_abs() <= self.alloc);
        self.size = size;
    }

    /// Flips the sign of the value.
    #[inline]
    pub fn neg(&mut self) {
        self.size = -self.size;
    }

    /// The active limbs of the value.
    #[inline]
    pub fn limbs(&self) -> &[Limb] {
        // Safety: the buffer is fully initialized and `asize <= alloc`.
        unsafe { slice::from_raw_parts(self.d.as_ptr(), self.asize()) }
    }

    /// The whole allocated buffer. All limbs are initialized (though limbs at
    /// index `>= asize` hold arbitrary stale values).
    #[inline]
    pub fn buf_mut(&mut self) -> &mut [Limb] {
        // Safety: the buffer is fully initialized and uniquely owned.
        unsafe { slice::from_raw_parts_mut(self.d.as_ptr(), self.alloc) }
    }

    /// Grows the capacity to at least `nlimbs`, preserving the value.
    pub fn ensure_capacity(&mut self, nlimbs: usize) {
        if nlimbs <= self.alloc {
            return;
        }
        let mut grown = Mpz::with_capacity(nlimbs);
        let asize = self.asize();
        grown.buf_mut()[..asize].copy_from_slice(self.limbs());
        grown.size = self.size;
        mem::swap(self, &mut grown);
        // the old buffer is freed when `grown` drops
    }

    /// A read-only view of the value.
    #[inline]
    pub fn view(&self) -> MpzView<'_> {
        MpzView {
            size: self.size,
            limbs: self.limbs(),
        }
    }

    /// Copies the value of `v` into `self`, growing as needed.
    pub fn assign(&mut self, v: MpzView<'_>) {
        let asize = v.asize();
        self.ensure_capacity(asize);
        self.buf_mut()[..asize].copy_from_slice(v.limbs);
        self.size = v.size;
    }

    /// Sets the value from a little-endian limb slice and a sign, trimming
    /// leading zero limbs.
    pub fn set_limbs(&mut self, limbs: &[Limb], negative: bool) {
        let n = mpn::normalized_size(limbs);
        self.ensure_capacity(n);
        self.buf_mut()[..n].copy_from_slice(&limbs[..n]);
        self.size = if negative { -(n as isize) } else { n as isize };
    }
}

impl Drop for Mpz {
    fn drop(&mut self) {
        // Safety: the buffer was allocated with the same layout.
        unsafe {
            dealloc(self.d.as_ptr().cast(), layout(self.alloc));
        }
    }
}

/// A read-only descriptor bridging any limb storage (inline or dynamic) to
/// the backend's shape. The aliased limbs must not be mutated while the view
/// is alive, which the borrow checker enforces.
#[derive(Clone, Copy)]
pub struct MpzView<'a> {
    size: isize,
    limbs: &'a [Limb],
}

impl<'a> MpzView<'a> {
    /// Creates a view from a sign-magnitude size and the matching active
    /// limbs.
    #[inline]
    pub fn new(size: isize, limbs: &'a [Limb]) -> Self {
        debug_assert_eq!(size.unsigned_abs(), limbs.len());
        MpzView { size, limbs }
    }

    #[inline]
    pub fn size(&self) -> isize {
        self.size
    }

    #[inline]
    pub fn asize(&self) -> usize {
        self.size.unsigned_abs()
    }

    #[inline]
    pub fn sign(&self) -> isize {
        self.size.signum()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.size == 0
    }

    #[inline]
    pub fn limbs(&self) -> &'a [Limb] {
        self.limbs
    }

    /// The same view with the sign of the value flipped.
    #[inline]
    pub fn negated(self) -> Self {
        MpzView {
            size: -self.size,
            limbs: self.limbs,
        }
    }

    /// Bit length of the absolute value; 1 for zero, following the usual
    /// `sizeinbase` convention.
    pub fn nbits(&self) -> usize {
        match self.limbs.last() {
            None => 1,
            Some(&top) => {
                let top_bits = NUMB_BITS - (top & NUMB_MASK).leading_zeros() as usize;
                (self.asize() - 1) * NUMB_BITS + top_bits
            }
        }
    }
}

/// Compares the magnitudes of two values.
pub fn cmp_abs(a: MpzView<'_>, b: MpzView<'_>) -> Ordering {
    match a.asize().cmp(&b.asize()) {
        Ordering::Equal => mpn::cmp(a.limbs(), b.limbs()),
        ord => ord,
    }
}

/// Three-way value comparison.
pub fn cmp(a: MpzView<'_>, b: MpzView<'_>) -> Ordering {
    match a.sign().cmp(&b.sign()) {
        Ordering::Equal => {
            if a.sign() >= 0 {
                cmp_abs(a, b)
            } else {
                cmp_abs(b, a)
            }
        }
        ord => ord,
    }
}

/// `rop = op1 + op2`.
pub fn add(rop: &mut Mpz, op1: MpzView<'_>, op2: MpzView<'_>) {
    addsub(rop, op1, op2, false)
}

/// `rop = op1 - op2`.
pub fn sub(rop: &mut Mpz, op1: MpzView<'_>, op2: MpzView<'_>) {
    addsub(rop, op1, op2, true)
}

fn addsub(rop: &mut Mpz, op1: MpzView<'_>, op2: MpzView<'_>, subtract: bool) {
    let op2 = if subtract { op2.negated() } else { op2 };
    if op2.is_zero() {
        rop.assign(op1);
        return;
    }
    if op1.is_zero() {
        rop.assign(op2);
        return;
    }
    if op1.sign() == op2.sign() {
        // Magnitude addition; the result may grow by one limb.
        let (big, small) = if op1.asize() >= op2.asize() {
            (op1, op2)
        } else {
            (op2, op1)
        };
        let n = big.asize();
        rop.ensure_capacity(n + 1);
        let buf = rop.buf_mut();
        let cy = mpn::add(&mut buf[..n], big.limbs(), small.limbs());
        buf[n] = cy;
        let asize = n + (cy != 0) as usize;
        rop.set_size(asize as isize * op1.sign());
    } else {
        // Magnitude subtraction of the smaller from the larger; the sign of
        // the larger-magnitude operand wins.
        let (big, small) = match cmp_abs(op1, op2) {
            Ordering::Equal => {
                rop.set_size(0);
                return;
            }
            Ordering::Greater => (op1, op2),
            Ordering::Less => (op2, op1),
        };
        let n = big.asize();
        rop.ensure_capacity(n);
        let buf = rop.buf_mut();
        let br = mpn::sub(&mut buf[..n], big.limbs(), small.limbs());
        debug_assert_eq!(br, 0);
        let asize = mpn::normalized_size(&buf[..n]);
        rop.set_size(asize as isize * big.sign());
    }
}

/// `rop = op1 * op2`.
pub fn mul(rop: &mut Mpz, op1: MpzView<'_>, op2: MpzView<'_>) {
    if op1.is_zero() || op2.is_zero() {
        rop.set_size(0);
        return;
    }
    let (big, small) = if op1.asize() >= op2.asize() {
        (op1, op2)
    } else {
        (op2, op1)
    };
    let n = big.asize() + small.asize();
    rop.ensure_capacity(n);
    let buf = rop.buf_mut();
    let hi = mpn::mul(&mut buf[..n], big.limbs(), small.limbs());
    let asize = n - (hi == 0) as usize;
    let sign = op1.sign() * op2.sign();
    rop.set_size(asize as isize * sign);
}

/// `rop += op1 * op2`.
pub fn addmul(rop: &mut Mpz, op1: MpzView<'_>, op2: MpzView<'_>) {
    if op1.is_zero() || op2.is_zero() {
        return;
    }
    let mut prod = pool::acquire(op1.asize() + op2.asize());
    mul(&mut prod, op1, op2);
    let mut sum = pool::acquire(rop.asize().max(prod.asize()) + 1);
    add(&mut sum, rop.view(), prod.view());
    mem::swap(rop, &mut sum);
    pool::release(prod);
    pool::release(sum);
}

/// Truncated division with remainder: `q = trunc(num / den)`, `r = num - q *
/// den`. The sign of the remainder follows the dividend.
pub fn tdiv_qr(q: &mut Mpz, r: &mut Mpz, num: MpzView<'_>, den: MpzView<'_>) {
    debug_assert!(!den.is_zero());
    let nn = num.asize();
    let dn = den.asize();
    if dn > nn {
        q.set_size(0);
        r.assign(num);
        return;
    }
    let qn = nn - dn + 1;
    q.ensure_capacity(qn);
    r.ensure_capacity(dn);
    mpn::tdiv_qr(
        &mut q.buf_mut()[..qn],
        &mut r.buf_mut()[..dn],
        num.limbs(),
        den.limbs(),
    );
    let q_asize = mpn::normalized_size(&q.buf_mut()[..qn]);
    q.set_size(q_asize as isize * num.sign() * den.sign());
    let r_asize = mpn::normalized_size(&r.buf_mut()[..dn]);
    r.set_size(r_asize as isize * num.sign());
}

/// `rop = op << s` for an arbitrary bit count.
pub fn mul_2exp(rop: &mut Mpz, op: MpzView<'_>, s: usize) {
    if op.is_zero() || s == 0 {
        rop.assign(op);
        return;
    }
    let ls = s / NUMB_BITS;
    let rs = s % NUMB_BITS;
    let asize = op.asize();
    rop.ensure_capacity(asize + ls + 1);
    let buf = rop.buf_mut();
    let mut new_asize = asize + ls;
    if rs > 0 {
        let cy = mpn::lshift(&mut buf[ls..ls + asize], op.limbs(), rs);
        buf[ls + asize] = cy;
        new_asize += (cy != 0) as usize;
    } else {
        buf[ls..ls + asize].copy_from_slice(op.limbs());
    }
    for l in buf[..ls].iter_mut() {
        *l = 0;
    }
    rop.set_size(new_asize as isize * op.sign());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mpz_from(limbs: &[Limb], negative: bool) -> Mpz {
        let mut m = Mpz::with_capacity(limbs.len());
        m.set_limbs(limbs, negative);
        m
    }

    #[test]
    fn addsub_signs() {
        let a = mpz_from(&[5], false);
        let b = mpz_from(&[7], true);
        let mut r = Mpz::with_capacity(1);
        add(&mut r, a.view(), b.view());
        assert_eq!(r.size(), -1);
        assert_eq!(r.limbs(), &[2]);
        sub(&mut r, a.view(), b.view());
        assert_eq!(r.size(), 1);
        assert_eq!(r.limbs(), &[12]);
        sub(&mut r, a.view(), a.view());
        assert_eq!(r.size(), 0);
    }

    #[test]
    fn mul_and_shift() {
        let a = mpz_from(&[0, 1], false);
        let mut r = Mpz::with_capacity(1);
        mul(&mut r, a.view(), a.view());
        assert_eq!(r.limbs(), &[0, 0, 1]);
        let mut sh = Mpz::with_capacity(1);
        mul_2exp(&mut sh, a.view(), NUMB_BITS + 1);
        assert_eq!(sh.limbs(), &[0, 0, 2]);
    }

    #[test]
    fn division_signs() {
        // 7 / -2 truncates toward zero: q == -3, r == 1
        let a = mpz_from(&[7], false);
        let b = mpz_from(&[2], true);
        let mut q = Mpz::with_capacity(1);
        let mut r = Mpz::with_capacity(1);
        tdiv_qr(&mut q, &mut r, a.view(), b.view());
        assert_eq!(q.size(), -1);
        assert_eq!(q.limbs(), &[3]);
        assert_eq!(r.size(), 1);
        assert_eq!(r.limbs(), &[1]);
    }
}
