//! Redemption: turning liquid units back into the underlying asset, locked
//! for whatever is left of their schedule.

use num_bigint::BigUint;
use num_traits::Zero;

use vestry_core::amount::Amount;
use vestry_core::error::{LiquidError, ScheduleError};
use vestry_core::period::{self, Period};
use vestry_core::schedule::Schedule;
use vestry_core::subtract::subtract_amount;
use vestry_core::types::{Address, Timestamp};
use vestry_vesting::grant::Grant;

use crate::asset::LiquidAsset;
use crate::params::Params;

/// Everything a redemption changes, computed before anything is written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Redemption {
    /// The asset after the redeemed shares leave its schedule.
    pub asset: LiquidAsset,
    /// Liquid units burned.
    pub burned: Amount,
    /// Underlying funds released from escrow to the destination.
    pub underlying: Amount,
    /// The redeemed shares on the asset's clock, to be relocked on the
    /// destination. `None` when every redeemed share has already unlocked.
    pub relock: Option<Schedule>,
}

impl Redemption {
    /// Whether the asset has nothing left and should be removed.
    pub fn exhausts_asset(&self) -> bool {
        self.asset.total().is_zero()
    }

    /// Grant placing the redeemed shares on the destination, owned from the
    /// grant's start.
    pub fn grant(&self, funder: Address) -> Option<Grant> {
        self.relock.as_ref().map(|relock| {
            Grant::new(
                funder,
                relock.start_time,
                relock.periods.clone(),
                vec![Period::new(0, relock.total_amount())],
            )
        })
    }
}

/// Plan redeeming `amount` units of `asset` at `now`.
///
/// The asset's periods give up `amount` of the underlying proportionally. The
/// removed shares are relocked on the asset's own clock, so those whose period
/// has elapsed read as unlocked and the rest unlock when the asset would have.
pub fn plan_redemption(
    asset: &LiquidAsset,
    params: &Params,
    amount: &BigUint,
    now: Timestamp,
) -> Result<Redemption, LiquidError> {
    if !params.enabled {
        return Err(LiquidError::ModuleDisabled);
    }
    let underlying = &asset.underlying_asset_id;
    let split = subtract_amount(&asset.unlock_periods, underlying, amount)?;
    let updated = asset.with_periods(split.decreased)?;

    let upcoming = period::upcoming_periods(asset.start_time, &split.diff, now);
    let relock = if period::total_amount(&upcoming).is_zero() {
        None
    } else {
        Some(relock_schedule(asset.start_time, split.diff, now)?)
    };

    Ok(Redemption {
        burned: Amount::coin(asset.base_id.clone(), amount.clone()),
        underlying: Amount::coin(underlying.clone(), amount.clone()),
        asset: updated,
        relock,
    })
}

/// Anchor `periods` strictly before `now` so instant ownership has matured by
/// `now`. An anchor at or after `now` moves back to `now - 1` and the first
/// period grows by the same amount, leaving every unlock instant in place.
fn relock_schedule(start: Timestamp, mut periods: Vec<Period>, now: Timestamp) -> Result<Schedule, ScheduleError> {
    if start < now {
        return Ok(Schedule::new(start, periods));
    }
    let anchor = now.checked_sub(1).ok_or(ScheduleError::ArithmeticOverflow)?;
    if let Some(first) = periods.first_mut() {
        first.length = first
            .length
            .checked_add(start - anchor)
            .ok_or(ScheduleError::ArithmeticOverflow)?;
    }
    Ok(Schedule::new(anchor, periods))
}
