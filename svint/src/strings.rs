//! String conversion and the formatting trait family.

use alloc::string::String;
use core::fmt;
use core::str::FromStr;

use svint_core::{pool, radix};
use svint_internals::{bits_upper_bound, Error, NUMB_BITS};

use crate::data::integer::Integer;

impl<const SSIZE: usize> Integer<SSIZE> {
    /// Parses `s` in the given base, `2..=62`. A single leading `-` or `+`
    /// is accepted; digits above 9 are case-insensitive up to base 36 and
    /// use the `0-9A-Za-z` alphabet above that.
    ///
    /// # Errors
    ///
    /// [Error::InvalidRadix] for a base outside `2..=62`, [Error::Empty] for
    /// an empty or sign-only string, [Error::InvalidChar] for a character
    /// that is not a digit of the base.
    pub fn from_str_radix(s: &str, base: u32) -> Result<Self, Error> {
        if base < 2 || base > 62 {
            return Err(Error::InvalidRadix);
        }
        let bytes = s.as_bytes();
        let (negative, digits) = match bytes.first() {
            None => return Err(Error::Empty),
            Some(b'-') => (true, &bytes[1..]),
            Some(b'+') => (false, &bytes[1..]),
            Some(_) => (false, bytes),
        };
        if digits.is_empty() {
            return Err(Error::Empty);
        }
        // Parse into a pooled descriptor first, then shrink into static
        // storage if the value fits.
        let mut m = pool::acquire(bits_upper_bound(digits.len(), base)? / NUMB_BITS + 1);
        match radix::parse_radix(digits, base, &mut m) {
            Ok(()) => {
                if negative {
                    m.neg();
                }
                Ok(Self::from_mpz_fitting(m))
            }
            Err(e) => {
                // nothing partially constructed escapes
                pool::release(m);
                Err(e)
            }
        }
    }

    /// The canonical base-`base` representation: a leading `-` for
    /// negatives, no leading zeros for nonzero values, `"0"` for zero.
    ///
    /// # Errors
    ///
    /// [Error::InvalidRadix] for a base outside `2..=62`.
    pub fn to_string_radix(&self, base: u32) -> Result<String, Error> {
        radix::to_string_radix(self.view(), base)
    }
}

impl<const SSIZE: usize> FromStr for Integer<SSIZE> {
    type Err = Error;

    /// Parses a base-10 string, as accepted by
    /// [from_str_radix](Integer::from_str_radix).
    fn from_str(s: &str) -> Result<Self, Error> {
        Self::from_str_radix(s, 10)
    }
}

impl<const SSIZE: usize> fmt::Display for Integer<SSIZE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // base 10 is always a valid radix
        f.write_str(&self.to_string_radix(10).unwrap())
    }
}

impl<const SSIZE: usize> fmt::Debug for Integer<SSIZE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl<const SSIZE: usize> fmt::LowerHex for Integer<SSIZE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_radix(16).unwrap())
    }
}

impl<const SSIZE: usize> fmt::UpperHex for Integer<SSIZE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_radix(16).unwrap().to_ascii_uppercase())
    }
}

impl<const SSIZE: usize> fmt::Octal for Integer<SSIZE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_radix(8).unwrap())
    }
}

impl<const SSIZE: usize> fmt::Binary for Integer<SSIZE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_radix(2).unwrap())
    }
}
