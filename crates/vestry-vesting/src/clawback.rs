//! Clawback: truncating a locked account to what it owns at a cutoff.

use vestry_core::amount::Amount;
use vestry_core::error::VestingError;
use vestry_core::merge::conjunct_periods;
use vestry_core::period::{self, Period};
use vestry_core::types::Timestamp;

use crate::account::LockedAccount;

/// Result of [`compute_clawback`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Clawback {
    /// The account as it should be stored after the clawback.
    pub account: LockedAccount,
    /// Unvested amount to move out of the account.
    pub amount: Amount,
}

impl Clawback {
    pub fn is_noop(&self) -> bool {
        self.amount.is_zero()
    }
}

/// Truncate `account` to what is vested at `cutoff`.
///
/// Upcoming ownership periods are dropped and `original_total` becomes the
/// vested amount. The unlock schedule is capped at the vested amount, so
/// funds already unlocked stay unlocked and nothing unvested remains in it.
/// When nothing is unvested the account is returned unchanged with a zero
/// amount.
///
/// # Errors
///
/// [`VestingError::ClawbackBeforeStart`] if `cutoff` precedes the start.
pub fn compute_clawback(account: &LockedAccount, cutoff: Timestamp) -> Result<Clawback, VestingError> {
    if cutoff < account.start_time {
        return Err(VestingError::ClawbackBeforeStart {
            start: account.start_time,
            now: cutoff,
        });
    }

    let unvested = account.unvested_only(cutoff);
    if unvested.is_zero() {
        return Ok(Clawback {
            account: account.clone(),
            amount: Amount::new(),
        });
    }

    let vested = account.vested_only(cutoff);
    let cap = [Period::new(0, vested.clone())];
    let unlock = conjunct_periods(
        account.start_time,
        account.start_time,
        &account.unlock_periods,
        &cap,
    )?;

    let mut truncated = account.clone();
    truncated.ownership_periods =
        period::past_periods(account.start_time, &account.ownership_periods, cutoff);
    truncated.unlock_periods = unlock.periods;
    truncated.original_total = vested;

    Ok(Clawback {
        account: truncated,
        amount: unvested,
    })
}
