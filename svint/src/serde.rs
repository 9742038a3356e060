//! `serde_support` impls. Values serialize as their canonical decimal
//! string, which is platform and limb-width independent.

use core::fmt;
use core::marker::PhantomData;

use serde::{
    de::{self, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};

use crate::data::integer::Integer;

/// A `serde_support` impl
impl<const SSIZE: usize> Serialize for Integer<SSIZE> {
    /// Serializes as the canonical decimal string, e.g. `"-123"`.
    ///
    /// ```
    /// use ron::to_string;
    /// use svint::Integer2;
    ///
    /// let x = Integer2::from(-123i32);
    /// assert_eq!(to_string(&x).unwrap(), "\"-123\"");
    /// ```
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // base 10 is always a valid radix
        serializer.serialize_str(&self.to_string_radix(10).unwrap())
    }
}

struct IntegerVisitor<const SSIZE: usize>(PhantomData<[(); SSIZE]>);

impl<'de, const SSIZE: usize> Visitor<'de> for IntegerVisitor<SSIZE> {
    type Value = Integer<SSIZE>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a decimal integer string")
    }

    fn visit_str<E>(self, value: &str) -> Result<Integer<SSIZE>, E>
    where
        E: de::Error,
    {
        Integer::from_str_radix(value, 10).map_err(de::Error::custom)
    }
}

/// A `serde_support` impl
impl<'de, const SSIZE: usize> Deserialize<'de> for Integer<SSIZE> {
    /// Deserializes from the canonical decimal string.
    ///
    /// ```
    /// use ron::from_str;
    /// use svint::Integer2;
    ///
    /// let x: Integer2 = from_str("\"340282366920938463463374607431768211456\"").unwrap();
    /// assert_eq!(x, Integer2::from(1u8) << 128);
    /// ```
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(IntegerVisitor(PhantomData))
    }
}
