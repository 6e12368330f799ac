//! Liquidation: spinning part of a locked unlock schedule off into a new
//! liquid asset.

use num_bigint::BigUint;

use vestry_core::amount::Amount;
use vestry_core::error::{LiquidError, ScheduleError};
use vestry_core::period;
use vestry_core::subtract::subtract_amount;
use vestry_core::types::Timestamp;
use vestry_vesting::account::LockedAccount;

use crate::asset::LiquidAsset;
use crate::params::Params;

/// Everything a liquidation changes, computed before anything is written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Liquidation {
    /// The source account with the liquidated amount removed.
    pub account: LockedAccount,
    /// The new liquid asset.
    pub asset: LiquidAsset,
    /// Underlying funds moving from the account into escrow.
    pub underlying: Amount,
    /// Liquid units minted to the destination.
    pub minted: Amount,
}

/// Plan liquidating `amount` of `asset` out of `account` at `now` into liquid
/// asset number `id`.
///
/// The account's upcoming unlock periods give up `amount` proportionally and
/// the removed shares become the liquid asset's schedule, starting at `now`.
/// Its first period is shortened by the time already spent in the active
/// period, so every share unlocks when it would have in the account.
///
/// # Errors
///
/// - [`LiquidError::ModuleDisabled`], [`LiquidError::InvalidAsset`] and
///   [`LiquidError::BelowMinimum`] from `params`
/// - [`LiquidError::StartInFuture`] if the account has not started
/// - [`LiquidError::UnvestedPeriods`] if ownership periods remain
/// - [`ScheduleError::InsufficientLockedFunds`] if less than `amount` is locked
pub fn plan_liquidation(
    account: &LockedAccount,
    params: &Params,
    id: u64,
    asset: &str,
    amount: &BigUint,
    now: Timestamp,
) -> Result<Liquidation, LiquidError> {
    if !params.enabled {
        return Err(LiquidError::ModuleDisabled);
    }
    if asset != params.underlying_asset {
        return Err(LiquidError::InvalidAsset(asset.to_string()));
    }
    if *amount < params.minimum_liquidation_amount {
        return Err(LiquidError::BelowMinimum {
            minimum: params.minimum_liquidation_amount.clone(),
            got: amount.clone(),
        });
    }
    if now < account.start_time {
        return Err(LiquidError::StartInFuture);
    }
    if !account.ownership_schedule().upcoming_periods(now).is_empty() {
        return Err(LiquidError::UnvestedPeriods(account.address.to_string()));
    }
    let locked = account.locked_only(now).amount_of(asset);
    if locked < *amount {
        return Err(ScheduleError::InsufficientLockedFunds {
            asset: asset.to_string(),
            have: locked,
            need: amount.clone(),
        }
        .into());
    }

    let upcoming = account.unlock_schedule().upcoming_periods(now);
    let unlock = subtract_amount(&upcoming, asset, amount)?;
    let ownership = subtract_amount(&account.ownership_periods, asset, amount)?;

    let mut updated = account.clone();
    updated.unlock_periods = period::replace_tail(&account.unlock_periods, &unlock.decreased);
    updated.ownership_periods = ownership.decreased;
    updated.original_total.sub_coin(asset, amount).map_err(ScheduleError::from)?;

    let shift = account.unlock_schedule().current_period_shift(now);
    let mut diff = unlock.diff;
    if let Some(first) = diff.first_mut() {
        first.length = first.length.checked_sub(shift).ok_or_else(|| {
            ScheduleError::InvalidPeriod("shift exceeds the active period".into())
        })?;
    }
    let liquid = LiquidAsset::new(id, asset, now, diff)?;

    Ok(Liquidation {
        account: updated,
        underlying: Amount::coin(asset, amount.clone()),
        minted: Amount::coin(liquid.base_id.clone(), amount.clone()),
        asset: liquid,
    })
}
