//! Proportional subtraction of one asset from a period sequence.
//!
//! Every period gives up `amount * period_amount / total` (truncated). The
//! truncation residue is then taken back-to-front, each period giving up at
//! most what it still holds, so the removed amounts sum to exactly `amount`.
//! This is the single primitive behind liquidation and redemption.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::amount::Amount;
use crate::error::ScheduleError;
use crate::period::Period;

/// Result of [`subtract_amount`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subtraction {
    /// The input periods with the subtracted shares removed.
    pub decreased: Vec<Period>,
    /// Same lengths as the input; amounts are exactly what was removed, in the
    /// subtracted asset only.
    pub diff: Vec<Period>,
}

/// Remove `amount` of `asset` from `periods`, proportionally to each period's
/// share of that asset.
///
/// For every `i`: `decreased[i].amount + diff[i].amount == periods[i].amount`,
/// and the diff amounts sum to `amount`. Other assets stay in `decreased`.
///
/// # Errors
///
/// [`ScheduleError::InsufficientLockedFunds`] if `periods` is empty or holds
/// less than `amount` of `asset`.
pub fn subtract_amount(
    periods: &[Period],
    asset: &str,
    amount: &BigUint,
) -> Result<Subtraction, ScheduleError> {
    let total: BigUint = periods.iter().map(|p| p.amount.amount_of(asset)).sum();
    if periods.is_empty() || total < *amount {
        return Err(ScheduleError::InsufficientLockedFunds {
            asset: asset.to_string(),
            have: total,
            need: amount.clone(),
        });
    }

    let mut decreased = Vec::with_capacity(periods.len());
    let mut shares = Vec::with_capacity(periods.len());
    let mut subtracted = BigUint::zero();

    for period in periods {
        let held = period.amount.amount_of(asset);
        let share = if total.is_zero() {
            BigUint::zero()
        } else {
            &held * amount / &total
        };
        let mut rest = period.amount.clone();
        rest.sub_coin(asset, &share)?;
        subtracted += &share;
        decreased.push(Period::new(period.length, rest));
        shares.push(share);
    }

    // Walk the residue from the last period backwards.
    let mut residue = amount - &subtracted;
    for (period, share) in decreased.iter_mut().zip(shares.iter_mut()).rev() {
        if residue.is_zero() {
            break;
        }
        let available = period.amount.amount_of(asset);
        let take = residue.clone().min(available);
        period.amount.sub_coin(asset, &take)?;
        *share += &take;
        residue -= take;
    }

    let diff = periods
        .iter()
        .zip(shares)
        .map(|(p, share)| Period::new(p.length, Amount::coin(asset, share)))
        .collect();

    Ok(Subtraction { decreased, diff })
}
