//! Liquid vesting keeper: liquidation and redemption against live state.
//!
//! Both protocols plan the complete outcome first, check every balance they
//! will draw on, and only then touch the ledgers and stores.

use num_bigint::BigUint;
use tracing::{debug, info};

use vestry_core::error::{LiquidError, ScheduleError, VestingError};
use vestry_core::traits::{AssetLedger, DelegationLedger};
use vestry_core::types::{Address, Timestamp};
use vestry_vesting::account::Account;
use vestry_vesting::grant::GrantOutcome;
use vestry_vesting::keeper::VestingKeeper;
use vestry_vesting::migrate::StretchParams;
use vestry_vesting::store::AccountStore;

use crate::asset::LiquidAsset;
use crate::genesis::{self, GenesisState};
use crate::liquidate::plan_liquidation;
use crate::migrate::stretch_asset;
use crate::params::Params;
use crate::redeem::{plan_redemption, Redemption};
use crate::store::LiquidAssetStore;

/// Result of [`LiquidVesting::redeem`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedeemOutcome {
    pub redemption: Redemption,
    /// How the redeemed shares were relocked on the destination, if any were.
    pub grant: Option<GrantOutcome>,
}

/// Liquid vesting over a [`VestingKeeper`] and a liquid asset store.
pub struct LiquidVesting<S, L, D, A> {
    vesting: VestingKeeper<S, L, D>,
    assets: A,
    params: Params,
}

impl<S, L, D, A> LiquidVesting<S, L, D, A>
where
    S: AccountStore,
    L: AssetLedger,
    D: DelegationLedger,
    A: LiquidAssetStore,
{
    pub fn new(vesting: VestingKeeper<S, L, D>, assets: A, params: Params) -> Result<Self, LiquidError> {
        params.validate()?;
        Ok(Self {
            vesting,
            assets,
            params,
        })
    }

    /// Build a keeper whose registry and params come from `state`.
    pub fn from_genesis(
        vesting: VestingKeeper<S, L, D>,
        mut assets: A,
        state: &GenesisState,
    ) -> Result<Self, LiquidError> {
        let params = genesis::init_genesis(&mut assets, state)?;
        info!(assets = state.assets.len(), counter = state.asset_counter, "liquid vesting genesis loaded");
        Ok(Self {
            vesting,
            assets,
            params,
        })
    }

    pub fn export_genesis(&self) -> GenesisState {
        genesis::export_genesis(&self.assets, &self.params)
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn set_params(&mut self, params: Params) -> Result<(), LiquidError> {
        params.validate()?;
        info!(enabled = params.enabled, underlying = %params.underlying_asset, "liquid vesting params updated");
        self.params = params;
        Ok(())
    }

    pub fn vesting(&self) -> &VestingKeeper<S, L, D> {
        &self.vesting
    }

    pub fn vesting_mut(&mut self) -> &mut VestingKeeper<S, L, D> {
        &mut self.vesting
    }

    pub fn assets(&self) -> &A {
        &self.assets
    }

    pub fn liquid_asset(&self, base_id: &str) -> Result<LiquidAsset, LiquidError> {
        self.assets
            .get(base_id)
            .ok_or_else(|| LiquidError::AssetNotFound(base_id.to_string()))
    }

    /// Liquidate `amount` of `asset` locked in `from` into a new liquid asset
    /// minted to `to`.
    pub fn liquidate(
        &mut self,
        from: &Address,
        to: &Address,
        asset: &str,
        amount: &BigUint,
        now: Timestamp,
    ) -> Result<LiquidAsset, LiquidError> {
        if !self.params.enabled {
            return Err(LiquidError::ModuleDisabled);
        }
        let account = match self.vesting.accounts().get(from) {
            Some(Account::Locked(locked)) => locked,
            Some(Account::Plain(_)) => return Err(LiquidError::NotLocked(from.to_string())),
            None => return Err(VestingError::AccountNotFound(from.to_string()).into()),
        };
        let id = self.assets.counter();
        let plan = plan_liquidation(&account, &self.params, id, asset, amount, now)?;
        let next = id
            .checked_add(1)
            .ok_or(ScheduleError::ArithmeticOverflow)?;

        let escrow = self.params.escrow;
        let ledger = self.vesting.ledger_mut();
        ledger.ensure_funds(from, &plan.underlying)?;
        ledger.transfer(from, &escrow, &plan.underlying)?;
        ledger.mint(to, &plan.minted)?;
        ledger.bind_fungible_token(&plan.asset.metadata())?;

        info!(
            %from,
            %to,
            asset = %plan.asset.base_id,
            %amount,
            start = plan.asset.start_time,
            end = plan.asset.end_time,
            "liquidated locked funds"
        );
        self.assets.put(plan.asset.clone());
        self.assets.set_counter(next);
        self.vesting.store_locked(plan.account);
        Ok(plan.asset)
    }

    /// Redeem `amount` units of liquid asset `base_id` held by `from`,
    /// releasing the underlying to `to` and locking whatever has not yet
    /// unlocked.
    pub fn redeem(
        &mut self,
        from: &Address,
        to: &Address,
        base_id: &str,
        amount: &BigUint,
        now: Timestamp,
    ) -> Result<RedeemOutcome, LiquidError> {
        if !self.params.enabled {
            return Err(LiquidError::ModuleDisabled);
        }
        let asset = self.liquid_asset(base_id)?;
        let held = self.vesting.ledger().balance(from, base_id);
        if held < *amount {
            return Err(LiquidError::InsufficientBalance {
                have: held,
                need: amount.clone(),
            });
        }

        let redemption = plan_redemption(&asset, &self.params, amount, now)?;
        let funder = match self.vesting.accounts().get(to) {
            Some(Account::Locked(locked)) => locked.funder,
            _ => self.params.escrow,
        };
        let planned = match redemption.grant(funder) {
            Some(grant) => Some(self.vesting.plan_grant(*to, grant, true, now)?),
            None => None,
        };

        let escrow = self.params.escrow;
        let ledger = self.vesting.ledger_mut();
        ledger.ensure_funds(&escrow, &redemption.underlying)?;
        ledger.burn(from, &redemption.burned)?;
        ledger.transfer(&escrow, to, &redemption.underlying)?;

        if redemption.exhausts_asset() {
            debug!(asset = %base_id, "liquid asset fully redeemed");
            self.assets.remove(base_id);
        } else {
            self.assets.put(redemption.asset.clone());
        }
        let grant = planned.map(|(account, outcome)| {
            self.vesting.store_locked(account);
            outcome
        });
        info!(%from, %to, asset = %base_id, %amount, ?grant, "redeemed liquid asset");
        Ok(RedeemOutcome { redemption, grant })
    }

    /// Stretch the schedule of liquid asset `base_id`. Returns whether it
    /// changed.
    pub fn stretch_asset(
        &mut self,
        base_id: &str,
        now: Timestamp,
        params: &StretchParams,
    ) -> Result<bool, LiquidError> {
        let asset = self.liquid_asset(base_id)?;
        match stretch_asset(&asset, now, params)? {
            Some(updated) => {
                self.assets.put(updated);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
