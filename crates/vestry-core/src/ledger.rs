//! In-memory collaborator implementations.
//!
//! [`MemoryAssetLedger`] and [`MemoryDelegationLedger`] keep everything in maps
//! with no persistence. They back the unit and scenario tests; a chain
//! embeds the engine against its own bank and staking modules instead.

use std::collections::{BTreeMap, HashMap};

use num_bigint::BigUint;
use num_traits::Zero;

use crate::amount::Amount;
use crate::error::LedgerError;
use crate::traits::{AssetLedger, DelegationLedger, TokenMetadata};
use crate::types::Address;

/// In-memory fungible balances, total supply and token metadata.
#[derive(Clone, Debug, Default)]
pub struct MemoryAssetLedger {
    balances: HashMap<Address, Amount>,
    supply: Amount,
    metadata: BTreeMap<String, TokenMetadata>,
}

impl MemoryAssetLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total minted supply of `asset`.
    pub fn supply_of(&self, asset: &str) -> BigUint {
        self.supply.amount_of(asset)
    }

    fn debit(&mut self, address: &Address, amount: &Amount) -> Result<(), LedgerError> {
        self.ensure_funds(address, amount)?;
        let current = self.balances.remove(address).unwrap_or_default();
        let rest = current.checked_sub(amount)?;
        if !rest.is_zero() {
            self.balances.insert(*address, rest);
        }
        Ok(())
    }

    fn credit(&mut self, address: &Address, amount: &Amount) {
        if amount.is_zero() {
            return;
        }
        *self.balances.entry(*address).or_default() += amount;
    }
}

impl AssetLedger for MemoryAssetLedger {
    fn balance(&self, address: &Address, asset: &str) -> BigUint {
        self.balances
            .get(address)
            .map(|b| b.amount_of(asset))
            .unwrap_or_default()
    }

    fn balances(&self, address: &Address) -> Amount {
        self.balances.get(address).cloned().unwrap_or_default()
    }

    fn transfer(&mut self, from: &Address, to: &Address, amount: &Amount) -> Result<(), LedgerError> {
        self.debit(from, amount)?;
        self.credit(to, amount);
        Ok(())
    }

    fn mint(&mut self, to: &Address, amount: &Amount) -> Result<(), LedgerError> {
        self.supply += amount;
        self.credit(to, amount);
        Ok(())
    }

    fn burn(&mut self, from: &Address, amount: &Amount) -> Result<(), LedgerError> {
        if let Some(asset) = amount.assets().find(|a| self.supply.amount_of(a).is_zero()) {
            return Err(LedgerError::UnknownAsset(asset.to_string()));
        }
        self.debit(from, amount)?;
        self.supply = self.supply.checked_sub(amount)?;
        Ok(())
    }

    fn bind_fungible_token(&mut self, metadata: &TokenMetadata) -> Result<(), LedgerError> {
        self.metadata.insert(metadata.base.clone(), metadata.clone());
        Ok(())
    }

    fn token_metadata(&self, asset: &str) -> Option<TokenMetadata> {
        self.metadata.get(asset).cloned()
    }
}

/// In-memory staking view with explicitly set bonded and unbonding amounts.
#[derive(Clone, Debug)]
pub struct MemoryDelegationLedger {
    bond_asset: String,
    bonded: HashMap<Address, Amount>,
    unbonding: HashMap<Address, Amount>,
}

impl MemoryDelegationLedger {
    pub fn new(bond_asset: impl Into<String>) -> Self {
        Self {
            bond_asset: bond_asset.into(),
            bonded: HashMap::new(),
            unbonding: HashMap::new(),
        }
    }

    pub fn set_bonded(&mut self, address: Address, amount: Amount) {
        self.bonded.insert(address, amount);
    }

    pub fn set_unbonding(&mut self, address: Address, amount: Amount) {
        self.unbonding.insert(address, amount);
    }
}

impl DelegationLedger for MemoryDelegationLedger {
    fn bond_asset(&self) -> String {
        self.bond_asset.clone()
    }

    fn bonded(&self, address: &Address) -> Amount {
        self.bonded.get(address).cloned().unwrap_or_default()
    }

    fn unbonding(&self, address: &Address) -> Amount {
        self.unbonding.get(address).cloned().unwrap_or_default()
    }
}
