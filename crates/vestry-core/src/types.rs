//! Account addressing and time primitives.
//!
//! All timestamps are Unix seconds supplied by the caller; the engine never
//! reads a clock.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in time, in Unix seconds.
pub type Timestamp = u64;

/// A 20-byte account address.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The zero address.
    pub const ZERO: Self = Self([0u8; 20]);

    /// Deterministic address of a module account, derived from its name.
    pub fn module(name: &str) -> Self {
        let hash = blake3::hash(name.as_bytes());
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&hash.as_bytes()[..20]);
        Self(bytes)
    }

    /// Return the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_address_is_stable() {
        assert_eq!(Address::module("liquidvesting"), Address::module("liquidvesting"));
        assert_ne!(Address::module("liquidvesting"), Address::module("vesting"));
        assert_ne!(Address::module("liquidvesting"), Address::ZERO);
    }

    #[test]
    fn display_is_prefixed_hex() {
        let addr = Address([0xAB; 20]);
        assert_eq!(addr.to_string(), format!("0x{}", "ab".repeat(20)));
    }
}
