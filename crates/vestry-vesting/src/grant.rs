//! Grants: creating a locked account or merging into an existing one.

use serde::{Deserialize, Serialize};

use vestry_core::amount::Amount;
use vestry_core::error::{ScheduleError, VestingError};
use vestry_core::merge::disjunct_periods;
use vestry_core::period::{self, Period};
use vestry_core::types::{Address, Timestamp};

use crate::account::{Account, LockedAccount};

/// A funder's request to place funds under unlock and ownership schedules.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Grant {
    pub funder: Address,
    pub start_time: Timestamp,
    pub unlock_periods: Vec<Period>,
    pub ownership_periods: Vec<Period>,
}

impl Grant {
    pub fn new(
        funder: Address,
        start_time: Timestamp,
        unlock_periods: Vec<Period>,
        ownership_periods: Vec<Period>,
    ) -> Self {
        Self {
            funder,
            start_time,
            unlock_periods,
            ownership_periods,
        }
    }

    /// Fill in a missing schedule as an instant one and check both totals.
    ///
    /// # Errors
    ///
    /// - [`VestingError::ScheduleMismatch`] if the totals differ
    /// - [`ScheduleError::InvalidPeriod`] if the grant carries nothing
    pub fn normalized(mut self) -> Result<Self, VestingError> {
        let unlock = period::total_amount(&self.unlock_periods);
        let ownership = period::total_amount(&self.ownership_periods);

        if self.unlock_periods.is_empty() && !ownership.is_zero() {
            self.unlock_periods = vec![Period::new(0, ownership.clone())];
        } else if self.ownership_periods.is_empty() && !unlock.is_zero() {
            self.ownership_periods = vec![Period::new(0, unlock.clone())];
        } else if unlock != ownership {
            return Err(VestingError::ScheduleMismatch {
                unlock: unlock.to_string(),
                ownership: ownership.to_string(),
            });
        }

        if self.total().is_zero() {
            return Err(ScheduleError::InvalidPeriod("grant carries no amount".into()).into());
        }
        Ok(self)
    }

    /// Total granted, read from the unlock schedule.
    pub fn total(&self) -> Amount {
        period::total_amount(&self.unlock_periods)
    }
}

/// How [`apply_grant`] placed a grant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrantOutcome {
    /// No account existed; a locked account was created.
    Created,
    /// A plain account was turned into a locked account.
    Converted,
    /// The grant was merged into an existing locked account.
    Merged,
}

/// Merge `grant` into `account`. Both schedules are combined with
/// [`disjunct_periods`], and delegation bookkeeping is recomputed from
/// `delegated` (bonded plus unbonding) against the merged account at `now`.
///
/// # Errors
///
/// [`VestingError::FunderMismatch`] if the grant does not come from the
/// account's funder.
pub fn merge_grant(
    account: &LockedAccount,
    grant: &Grant,
    now: Timestamp,
    delegated: &Amount,
) -> Result<LockedAccount, VestingError> {
    if grant.funder != account.funder {
        return Err(VestingError::FunderMismatch {
            expected: account.funder.to_string(),
            got: grant.funder.to_string(),
        });
    }
    let grant = grant.clone().normalized()?;

    let unlock = disjunct_periods(
        account.start_time,
        grant.start_time,
        &account.unlock_periods,
        &grant.unlock_periods,
    )?;
    let ownership = disjunct_periods(
        account.start_time,
        grant.start_time,
        &account.ownership_periods,
        &grant.ownership_periods,
    )?;

    let mut merged = LockedAccount {
        address: account.address,
        funder: account.funder,
        start_time: unlock.start_time,
        unlock_periods: unlock.periods,
        ownership_periods: ownership.periods,
        original_total: &account.original_total + &grant.total(),
        delegated_committed: Amount::new(),
        delegated_free: Amount::new(),
    };
    merged.end_time()?;
    merged.reset_delegation(now, delegated);
    Ok(merged)
}

/// Place `grant` on `target`, given the account currently stored there.
///
/// - nothing stored: a new locked account
/// - plain account with `merge`: converted, existing delegations count as free
/// - locked account with `merge`: [`merge_grant`]
/// - anything stored without `merge`: [`VestingError::AccountExists`]
pub fn apply_grant(
    existing: Option<Account>,
    target: Address,
    grant: Grant,
    merge: bool,
    now: Timestamp,
    delegated: &Amount,
) -> Result<(LockedAccount, GrantOutcome), VestingError> {
    let grant = grant.normalized()?;
    match existing {
        None => {
            let account = LockedAccount::new(
                target,
                grant.funder,
                grant.start_time,
                grant.unlock_periods,
                grant.ownership_periods,
            )?;
            Ok((account, GrantOutcome::Created))
        }
        Some(_) if !merge => Err(VestingError::AccountExists(target.to_string())),
        Some(Account::Plain(_)) => {
            let mut account = LockedAccount::new(
                target,
                grant.funder,
                grant.start_time,
                grant.unlock_periods,
                grant.ownership_periods,
            )?;
            account.delegated_free = delegated.clone();
            Ok((account, GrantOutcome::Converted))
        }
        Some(Account::Locked(locked)) => {
            let merged = merge_grant(&locked, &grant, now, delegated)?;
            Ok((merged, GrantOutcome::Merged))
        }
    }
}
