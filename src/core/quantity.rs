//! Exact non-negative integers for doublable quantities.
//!
//! Counters, token counts and effect amounts can all be doubled by
//! replacement effects, and a handful of doublers compounding over a few
//! turns pushes them far past `u64`. `Quantity` is the one type used for all
//! of them.
//!
//! ## Representation
//!
//! Values that fit in a `u64` are stored inline; anything larger is a
//! `BigUint`. The representation is normalized (a `Big` value is always
//! greater than `u64::MAX`), so the derived equality and hashing are numeric
//! and callers never observe which path produced a value.
//!
//! ```
//! use battlefield_rules::core::Quantity;
//!
//! let tokens = Quantity::from(3u64).mul_pow(2, 70);
//! assert_eq!(tokens.to_string(), "3541774862152233910272");
//! assert!(tokens.to_u64().is_none());
//!
//! let small = Quantity::from(3u64).mul_pow(2, 3);
//! assert_eq!(small, Quantity::from(24u64));
//! ```

use std::cmp::Ordering;
use std::str::FromStr;

use num_bigint::BigUint;
use num_traits::ToPrimitive;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::EngineError;

/// An arbitrary-precision non-negative integer with an inline `u64` fast path.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Quantity(Repr);

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum Repr {
    Small(u64),
    /// Invariant: always greater than `u64::MAX`.
    Big(BigUint),
}

impl Quantity {
    /// Zero.
    #[must_use]
    pub const fn zero() -> Self {
        Self(Repr::Small(0))
    }

    /// One.
    #[must_use]
    pub const fn one() -> Self {
        Self(Repr::Small(1))
    }

    /// Build from a big integer, normalizing small values inline.
    #[must_use]
    pub fn from_big(value: BigUint) -> Self {
        match value.to_u64() {
            Some(v) => Self(Repr::Small(v)),
            None => Self(Repr::Big(value)),
        }
    }

    /// Clamp a signed value at zero.
    #[must_use]
    pub fn from_i64_floor(value: i64) -> Self {
        Self(Repr::Small(value.max(0) as u64))
    }

    /// Check if this is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        matches!(self.0, Repr::Small(0))
    }

    /// The value as `u64`, if it fits.
    #[must_use]
    pub fn to_u64(&self) -> Option<u64> {
        match &self.0 {
            Repr::Small(v) => Some(*v),
            Repr::Big(_) => None,
        }
    }

    /// The value as `usize`, if it fits.
    #[must_use]
    pub fn to_usize(&self) -> Option<usize> {
        self.to_u64().and_then(|v| usize::try_from(v).ok())
    }

    /// The value as `i64`, saturating at `i64::MAX`.
    #[must_use]
    pub fn to_i64_saturating(&self) -> i64 {
        self.to_u64()
            .and_then(|v| i64::try_from(v).ok())
            .unwrap_or(i64::MAX)
    }

    /// The value as a big integer.
    #[must_use]
    pub fn to_big(&self) -> BigUint {
        match &self.0 {
            Repr::Small(v) => BigUint::from(*v),
            Repr::Big(v) => v.clone(),
        }
    }

    /// Sum of two quantities.
    #[must_use]
    pub fn add(&self, other: &Quantity) -> Quantity {
        match (&self.0, &other.0) {
            (Repr::Small(a), Repr::Small(b)) => match a.checked_add(*b) {
                Some(sum) => Self(Repr::Small(sum)),
                None => Self::from_big(BigUint::from(*a) + BigUint::from(*b)),
            },
            _ => Self::from_big(self.to_big() + other.to_big()),
        }
    }

    /// Difference, floored at zero.
    #[must_use]
    pub fn saturating_sub(&self, other: &Quantity) -> Quantity {
        if self <= other {
            return Quantity::zero();
        }
        match (&self.0, &other.0) {
            (Repr::Small(a), Repr::Small(b)) => Self(Repr::Small(a - b)),
            _ => Self::from_big(self.to_big() - other.to_big()),
        }
    }

    /// Product of two quantities.
    #[must_use]
    pub fn mul(&self, other: &Quantity) -> Quantity {
        match (&self.0, &other.0) {
            (Repr::Small(a), Repr::Small(b)) => match a.checked_mul(*b) {
                Some(product) => Self(Repr::Small(product)),
                None => Self::from_big(BigUint::from(*a) * BigUint::from(*b)),
            },
            _ => Self::from_big(self.to_big() * other.to_big()),
        }
    }

    /// `self × multiplier^exponent`.
    ///
    /// Tries the `u64` path first and falls back to exact arithmetic on
    /// overflow, so the result is always exact.
    #[must_use]
    pub fn mul_pow(&self, multiplier: u32, exponent: u32) -> Quantity {
        if let Repr::Small(base) = self.0 {
            let factor = u64::from(multiplier).checked_pow(exponent);
            if let Some(product) = factor.and_then(|f| base.checked_mul(f)) {
                return Self(Repr::Small(product));
            }
        }
        self.mul_pow_exact(multiplier, exponent)
    }

    /// `self × multiplier^exponent`, always computed with big integers.
    #[must_use]
    pub fn mul_pow_exact(&self, multiplier: u32, exponent: u32) -> Quantity {
        if self.is_zero() {
            return Quantity::zero();
        }
        let factor = BigUint::from(multiplier).pow(exponent);
        Self::from_big(self.to_big() * factor)
    }

    /// Twice this value.
    #[must_use]
    pub fn doubled(&self) -> Quantity {
        self.mul_pow(2, 1)
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<u64> for Quantity {
    fn from(value: u64) -> Self {
        Self(Repr::Small(value))
    }
}

impl From<u32> for Quantity {
    fn from(value: u32) -> Self {
        Self(Repr::Small(u64::from(value)))
    }
}

impl From<usize> for Quantity {
    fn from(value: usize) -> Self {
        Self(Repr::Small(value as u64))
    }
}

impl From<BigUint> for Quantity {
    fn from(value: BigUint) -> Self {
        Self::from_big(value)
    }
}

impl Ord for Quantity {
    fn cmp(&self, other: &Self) -> Ordering {
        match (&self.0, &other.0) {
            (Repr::Small(a), Repr::Small(b)) => a.cmp(b),
            (Repr::Small(_), Repr::Big(_)) => Ordering::Less,
            (Repr::Big(_), Repr::Small(_)) => Ordering::Greater,
            (Repr::Big(a), Repr::Big(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Quantity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::iter::Sum for Quantity {
    fn sum<I: Iterator<Item = Quantity>>(iter: I) -> Self {
        iter.fold(Quantity::zero(), |acc, q| acc.add(&q))
    }
}

impl<'a> std::iter::Sum<&'a Quantity> for Quantity {
    fn sum<I: Iterator<Item = &'a Quantity>>(iter: I) -> Self {
        iter.fold(Quantity::zero(), |acc, q| acc.add(q))
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Repr::Small(v) => write!(f, "{}", v),
            Repr::Big(v) => write!(f, "{}", v),
        }
    }
}

impl FromStr for Quantity {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(v) = trimmed.parse::<u64>() {
            return Ok(Self(Repr::Small(v)));
        }
        BigUint::from_str(trimmed)
            .map(Self::from_big)
            .map_err(|_| EngineError::InvalidQuantity(s.to_string()))
    }
}

// Serialized as a decimal string so no consumer loses precision. Plain JSON
// integers are accepted on input.
impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(QuantityVisitor)
    }
}

struct QuantityVisitor;

impl<'de> Visitor<'de> for QuantityVisitor {
    type Value = Quantity;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("a non-negative integer or a decimal string")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Quantity, E> {
        Ok(Quantity::from(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Quantity, E> {
        u64::try_from(value)
            .map(Quantity::from)
            .map_err(|_| E::invalid_value(de::Unexpected::Signed(value), &self))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Quantity, E> {
        value.parse().map_err(E::custom)
    }
}
