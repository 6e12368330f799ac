//! One-shot unlock-schedule stretch for locked accounts.
//!
//! Running a stretch twice stretches twice; callers guard it with their own
//! one-time upgrade flag.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use vestry_core::constants::{DAY_SECONDS, DEFAULT_STRETCH_THRESHOLD, DEFAULT_STRETCH_UNITS};
use vestry_core::error::{ScheduleError, VestingError};
use vestry_core::stretch::stretch_schedule;
use vestry_core::types::Timestamp;

use crate::account::LockedAccount;

/// Parameters of a stretch migration.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct StretchParams {
    /// Number of `unit_length` periods appended to every stretched schedule.
    pub extra_units: u64,
    /// Seconds per appended period.
    pub unit_length: u64,
    /// Only accounts and assets ending strictly after this time are stretched.
    pub end_threshold: Timestamp,
}

impl Default for StretchParams {
    fn default() -> Self {
        Self {
            extra_units: DEFAULT_STRETCH_UNITS,
            unit_length: DAY_SECONDS,
            end_threshold: DEFAULT_STRETCH_THRESHOLD,
        }
    }
}

impl StretchParams {
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.unit_length == 0 {
            return Err(ScheduleError::InvalidPeriod("stretch unit length must be positive".into()));
        }
        self.extra_units
            .checked_mul(self.unit_length)
            .map(|_| ())
            .ok_or(ScheduleError::ArithmeticOverflow)
    }

    /// Whether a schedule ending at `end` qualifies.
    pub fn applies_to(&self, end: Timestamp) -> bool {
        end > self.end_threshold
    }
}

/// Stretch the upcoming part of `account`'s unlock schedule.
///
/// Returns `None` when the account ends (the later of its two schedules) at
/// or before the threshold, or when its unlock schedule has nothing upcoming
/// at `now`. Totals and the ownership schedule are untouched.
pub fn stretch_account(
    account: &LockedAccount,
    now: Timestamp,
    params: &StretchParams,
) -> Result<Option<LockedAccount>, VestingError> {
    params.validate()?;
    let unlock = account.unlock_schedule();
    let end = account.end_time()?;
    if !params.applies_to(end) || unlock.upcoming_periods(now).is_empty() {
        debug!(address = %account.address, end, "unlock schedule not stretched");
        return Ok(None);
    }

    let stretched = stretch_schedule(&unlock, now, params.extra_units, params.unit_length)?;
    let mut updated = account.clone();
    updated.unlock_periods = stretched.periods;
    info!(
        address = %account.address,
        old_end = unlock.end_time()?,
        new_end = updated.unlock_schedule().end_time()?,
        "stretched unlock schedule"
    );
    Ok(Some(updated))
}
