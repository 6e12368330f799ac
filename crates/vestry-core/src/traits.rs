//! Trait interfaces for the engine's external collaborators.
//!
//! - [`AssetLedger`]: fungible balances with mint, burn and transfer
//! - [`DelegationLedger`]: read-only staking view used by grant merges
//!
//! Protocols check balances through these traits before calling any mutating
//! method, so a well-behaved implementation never sees a request it must
//! reject halfway through a protocol.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::error::LedgerError;
use crate::types::Address;

/// One unit of a token's denomination ladder.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct DenomUnit {
    pub denom: String,
    pub exponent: u32,
}

/// Metadata registered when a new fungible token is bound.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TokenMetadata {
    pub description: String,
    pub denom_units: Vec<DenomUnit>,
    /// Smallest unit; the identifier balances are kept in.
    pub base: String,
    pub display: String,
    pub name: String,
    pub symbol: String,
}

/// Fungible asset balances.
///
/// Every mutating method must either apply fully or fail without effect.
pub trait AssetLedger {
    /// Balance of `asset` held by `address`. Zero when unknown.
    fn balance(&self, address: &Address, asset: &str) -> BigUint;

    /// Full multi-asset balance of `address`.
    fn balances(&self, address: &Address) -> Amount;

    /// Move `amount` from `from` to `to`.
    ///
    /// # Errors
    ///
    /// [`LedgerError::InsufficientFunds`] if `from` holds less than `amount`
    /// of any asset.
    fn transfer(&mut self, from: &Address, to: &Address, amount: &Amount) -> Result<(), LedgerError>;

    /// Create `amount` and credit it to `to`.
    fn mint(&mut self, to: &Address, amount: &Amount) -> Result<(), LedgerError>;

    /// Destroy `amount` held by `from`.
    fn burn(&mut self, from: &Address, amount: &Amount) -> Result<(), LedgerError>;

    /// Register token metadata for a newly created asset.
    fn bind_fungible_token(&mut self, metadata: &TokenMetadata) -> Result<(), LedgerError>;

    /// Metadata registered for `asset`, if any.
    fn token_metadata(&self, asset: &str) -> Option<TokenMetadata>;

    /// Check that `address` can pay `amount` without mutating anything.
    ///
    /// Default implementation compares per-asset [`balance`](Self::balance)s.
    fn ensure_funds(&self, address: &Address, amount: &Amount) -> Result<(), LedgerError> {
        for (asset, need) in amount.iter() {
            let have = self.balance(address, asset);
            if have < *need {
                return Err(LedgerError::InsufficientFunds {
                    address: address.to_string(),
                    asset: asset.to_string(),
                    have,
                    need: need.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Staking view of an account, used to recompute delegation bookkeeping.
pub trait DelegationLedger {
    /// Asset that staking bonds.
    fn bond_asset(&self) -> String;

    /// Amount currently bonded to validators by `address`.
    fn bonded(&self, address: &Address) -> Amount;

    /// Amount currently unbonding for `address`.
    fn unbonding(&self, address: &Address) -> Amount;

    /// `bonded + unbonding`.
    fn delegated(&self, address: &Address) -> Amount {
        &self.bonded(address) + &self.unbonding(address)
    }
}
