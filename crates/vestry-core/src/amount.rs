//! Multi-asset amounts with arbitrary-precision, never-negative balances.
//!
//! An [`Amount`] maps asset identifiers to [`BigUint`] values. The map is kept
//! normalized: zero entries are never stored, so two amounts describing the
//! same balances always compare equal. Iteration follows `BTreeMap` key order,
//! which keeps every derived computation deterministic across nodes.
//!
//! Subtraction comes in two flavours: [`Amount::checked_sub`] fails on any
//! negative component, [`Amount::saturating_sub`] clamps each component at zero.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, AddAssign};

use num_bigint::BigUint;
use num_traits::Zero;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AmountError;

/// Balances of one or more assets.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Amount(BTreeMap<String, BigUint>);

impl Amount {
    /// The empty (zero) amount.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// A single-asset amount. A zero value yields the empty amount.
    pub fn coin(asset: impl Into<String>, value: impl Into<BigUint>) -> Self {
        let mut amount = Self::new();
        amount.add_coin(asset, value);
        amount
    }

    /// Balance of `asset`, zero when absent.
    pub fn amount_of(&self, asset: &str) -> BigUint {
        self.0.get(asset).cloned().unwrap_or_default()
    }

    /// Whether every component is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate `(asset, value)` pairs in asset order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BigUint)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Asset identifiers with a non-zero balance.
    pub fn assets(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Restrict to a single asset.
    pub fn only(&self, asset: &str) -> Self {
        Self::coin(asset, self.amount_of(asset))
    }

    /// Add `value` of `asset` in place.
    pub fn add_coin(&mut self, asset: impl Into<String>, value: impl Into<BigUint>) {
        let value = value.into();
        if value.is_zero() {
            return;
        }
        *self.0.entry(asset.into()).or_default() += value;
    }

    /// Subtract `value` of `asset` in place, failing if the result would be negative.
    pub fn sub_coin(&mut self, asset: &str, value: &BigUint) -> Result<(), AmountError> {
        if value.is_zero() {
            return Ok(());
        }
        let have = self.amount_of(asset);
        if have < *value {
            return Err(AmountError::Underflow {
                asset: asset.to_string(),
                have,
                need: value.clone(),
            });
        }
        let rest = have - value;
        if rest.is_zero() {
            self.0.remove(asset);
        } else {
            self.0.insert(asset.to_string(), rest);
        }
        Ok(())
    }

    /// `self - other`, failing if any component would go negative.
    pub fn checked_sub(&self, other: &Amount) -> Result<Amount, AmountError> {
        let mut result = self.clone();
        for (asset, value) in other.iter() {
            result.sub_coin(asset, value)?;
        }
        Ok(result)
    }

    /// `self - other` with every component clamped at zero.
    pub fn saturating_sub(&self, other: &Amount) -> Amount {
        let mut result = Amount::new();
        for (asset, value) in self.iter() {
            let sub = other.amount_of(asset);
            if *value > sub {
                result.add_coin(asset, value - sub);
            }
        }
        result
    }

    /// Component-wise minimum.
    pub fn min(&self, other: &Amount) -> Amount {
        let mut result = Amount::new();
        for (asset, value) in self.iter() {
            let theirs = other.amount_of(asset);
            result.add_coin(asset, value.min(&theirs).clone());
        }
        result
    }

    /// Whether every component of `self` is `<=` the same component of `other`.
    pub fn is_all_lte(&self, other: &Amount) -> bool {
        self.iter().all(|(asset, value)| *value <= other.amount_of(asset))
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(mut self, rhs: Amount) -> Amount {
        self += &rhs;
        self
    }
}

impl Add<&Amount> for &Amount {
    type Output = Amount;

    fn add(self, rhs: &Amount) -> Amount {
        let mut result = self.clone();
        result += rhs;
        result
    }
}

impl AddAssign<&Amount> for Amount {
    fn add_assign(&mut self, rhs: &Amount) {
        for (asset, value) in rhs.iter() {
            self.add_coin(asset, value.clone());
        }
    }
}

impl<'a> std::iter::Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Amount {
        iter.fold(Amount::new(), |mut acc, a| {
            acc += a;
            acc
        })
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        for (i, (asset, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{value}{asset}")?;
        }
        Ok(())
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let encoded: BTreeMap<&str, String> =
            self.iter().map(|(k, v)| (k, v.to_str_radix(10))).collect();
        encoded.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = BTreeMap::<String, String>::deserialize(deserializer)?;
        let mut amount = Amount::new();
        for (asset, value) in encoded {
            amount.add_coin(asset, parse_decimal(&value).map_err(D::Error::custom)?);
        }
        Ok(amount)
    }
}

/// Parse a base-10 unsigned integer.
pub fn parse_decimal(s: &str) -> Result<BigUint, AmountError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AmountError::InvalidDecimal(s.to_string()));
    }
    BigUint::parse_bytes(s.as_bytes(), 10).ok_or_else(|| AmountError::InvalidDecimal(s.to_string()))
}

/// Serde adapter encoding a [`BigUint`] field as a base-10 string.
pub mod decimal {
    use num_bigint::BigUint;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_str_radix(10))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_decimal(&s).map_err(D::Error::custom)
    }
}
