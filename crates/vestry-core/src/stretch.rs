//! Re-scheduling a period sequence over a longer horizon.
//!
//! Stretching keeps every asset's total and spreads it at a constant rate over
//! `D = total_length + extra_units * unit_length` seconds: an existing period
//! keeps `total * length / D`, each appended `unit_length` period receives
//! `total * unit_length / D`, and the truncation residue lands on the final
//! appended period.

use num_bigint::BigUint;

use crate::amount::Amount;
use crate::error::ScheduleError;
use crate::period::{self, Period};
use crate::schedule::Schedule;
use crate::types::Timestamp;

/// Stretch `periods` by `extra_units` periods of `unit_length` seconds.
///
/// An empty input or zero `extra_units` is returned unchanged.
///
/// # Errors
///
/// - [`ScheduleError::InvalidPeriod`] if `unit_length` is zero
/// - [`ScheduleError::ArithmeticOverflow`] if the new duration overflows
pub fn stretch_periods(
    periods: &[Period],
    extra_units: u64,
    unit_length: u64,
) -> Result<Vec<Period>, ScheduleError> {
    if unit_length == 0 {
        return Err(ScheduleError::InvalidPeriod("stretch unit length must be positive".into()));
    }
    if periods.is_empty() || extra_units == 0 {
        return Ok(periods.to_vec());
    }

    let extra_length = extra_units
        .checked_mul(unit_length)
        .ok_or(ScheduleError::ArithmeticOverflow)?;
    let duration = BigUint::from(
        period::total_length(periods)?
            .checked_add(extra_length)
            .ok_or(ScheduleError::ArithmeticOverflow)?,
    );
    let totals = period::total_amount(periods);

    let rescaled = |length: u64| -> Amount {
        let mut amount = Amount::new();
        for (asset, total) in totals.iter() {
            amount.add_coin(asset, total * BigUint::from(length) / &duration);
        }
        amount
    };

    let mut stretched: Vec<Period> = periods
        .iter()
        .map(|p| Period::new(p.length, rescaled(p.length)))
        .collect();
    let unit_amount = rescaled(unit_length);
    let appended = usize::try_from(extra_units).map_err(|_| ScheduleError::ArithmeticOverflow)?;
    stretched.extend(std::iter::repeat_n(Period::new(unit_length, unit_amount), appended));

    let residue = totals.checked_sub(&period::total_amount(&stretched))?;
    if let Some(last) = stretched.last_mut() {
        last.amount += &residue;
    }

    Ok(stretched)
}

/// Stretch only the part of `schedule` still upcoming at `now`; elapsed
/// periods are kept as they are. The end time moves out by
/// `extra_units * unit_length` whenever anything is upcoming.
pub fn stretch_schedule(
    schedule: &Schedule,
    now: Timestamp,
    extra_units: u64,
    unit_length: u64,
) -> Result<Schedule, ScheduleError> {
    let mut periods = schedule.past_periods(now);
    let upcoming = schedule.upcoming_periods(now);
    periods.extend(stretch_periods(&upcoming, extra_units, unit_length)?);
    Ok(Schedule::new(schedule.start_time, periods))
}
