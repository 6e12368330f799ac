//! Account variants and the locked account model.
//!
//! A [`LockedAccount`] pairs an unlock schedule (when funds become
//! transferable) with an ownership schedule (when funds stop being
//! clawbackable). Both schedules share one start time and, at creation,
//! describe the same total.
//!
//! Query vocabulary at time `t`:
//! - `unlocked_only`: unlock schedule matured by `t`
//! - `locked_only`: `original_total - unlocked_only`
//! - `vested_only`: ownership schedule matured by `t`
//! - `unvested_only`: `original_total - vested_only`
//! - `spendable_floor`: amount that may not leave the account, i.e. the
//!   larger of locked and unvested per asset
//!
//! Differences clamp at zero.

use num_traits::CheckedSub;
use serde::{Deserialize, Serialize};

use vestry_core::amount::Amount;
use vestry_core::error::{ScheduleError, VestingError};
use vestry_core::period::Period;
use vestry_core::schedule::Schedule;
use vestry_core::types::{Address, Timestamp};

/// An ordinary account with no schedule attached.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct BaseAccount {
    pub address: Address,
}

impl BaseAccount {
    pub fn new(address: Address) -> Self {
        Self { address }
    }
}

/// Every account the store can hold.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum Account {
    Plain(BaseAccount),
    Locked(LockedAccount),
}

impl Account {
    pub fn address(&self) -> Address {
        match self {
            Account::Plain(base) => base.address,
            Account::Locked(locked) => locked.address,
        }
    }

    pub fn as_locked(&self) -> Option<&LockedAccount> {
        match self {
            Account::Locked(locked) => Some(locked),
            Account::Plain(_) => None,
        }
    }

    pub fn into_locked(self) -> Option<LockedAccount> {
        match self {
            Account::Locked(locked) => Some(locked),
            Account::Plain(_) => None,
        }
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, Account::Locked(_))
    }
}

impl From<BaseAccount> for Account {
    fn from(base: BaseAccount) -> Self {
        Account::Plain(base)
    }
}

impl From<LockedAccount> for Account {
    fn from(locked: LockedAccount) -> Self {
        Account::Locked(locked)
    }
}

/// An account whose balance unlocks and vests over time.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LockedAccount {
    pub address: Address,
    /// The only address allowed to claw back or to merge further grants.
    pub funder: Address,
    pub start_time: Timestamp,
    pub unlock_periods: Vec<Period>,
    pub ownership_periods: Vec<Period>,
    pub original_total: Amount,
    /// Delegated out of funds that are still locked or unvested.
    pub delegated_committed: Amount,
    /// Delegated out of freely spendable funds.
    pub delegated_free: Amount,
}

impl LockedAccount {
    /// Create a locked account holding both schedules from `start_time`.
    ///
    /// # Errors
    ///
    /// [`VestingError::ScheduleMismatch`] if the two schedules' totals differ.
    pub fn new(
        address: Address,
        funder: Address,
        start_time: Timestamp,
        unlock_periods: Vec<Period>,
        ownership_periods: Vec<Period>,
    ) -> Result<Self, VestingError> {
        let unlock = vestry_core::period::total_amount(&unlock_periods);
        let ownership = vestry_core::period::total_amount(&ownership_periods);
        if unlock != ownership {
            return Err(VestingError::ScheduleMismatch {
                unlock: unlock.to_string(),
                ownership: ownership.to_string(),
            });
        }
        let account = Self {
            address,
            funder,
            start_time,
            unlock_periods,
            ownership_periods,
            original_total: unlock,
            delegated_committed: Amount::new(),
            delegated_free: Amount::new(),
        };
        account.end_time()?;
        Ok(account)
    }

    pub fn unlock_schedule(&self) -> Schedule {
        Schedule::new(self.start_time, self.unlock_periods.clone())
    }

    pub fn ownership_schedule(&self) -> Schedule {
        Schedule::new(self.start_time, self.ownership_periods.clone())
    }

    /// Latest end of the two schedules.
    pub fn end_time(&self) -> Result<Timestamp, ScheduleError> {
        let unlock = self.start_time_plus(&self.unlock_periods)?;
        let ownership = self.start_time_plus(&self.ownership_periods)?;
        Ok(unlock.max(ownership))
    }

    fn start_time_plus(&self, periods: &[Period]) -> Result<Timestamp, ScheduleError> {
        self.start_time
            .checked_add(vestry_core::period::total_length(periods)?)
            .ok_or(ScheduleError::ArithmeticOverflow)
    }

    pub fn unlocked_only(&self, t: Timestamp) -> Amount {
        vestry_core::period::read_periods(self.start_time, &self.unlock_periods, t)
    }

    pub fn locked_only(&self, t: Timestamp) -> Amount {
        self.original_total.saturating_sub(&self.unlocked_only(t))
    }

    pub fn vested_only(&self, t: Timestamp) -> Amount {
        vestry_core::period::read_periods(self.start_time, &self.ownership_periods, t)
    }

    pub fn unvested_only(&self, t: Timestamp) -> Amount {
        self.original_total.saturating_sub(&self.vested_only(t))
    }

    /// Amount both unlocked and vested at `t`.
    pub fn vested_and_unlocked(&self, t: Timestamp) -> Amount {
        self.unlocked_only(t).min(&self.vested_only(t))
    }

    /// Per asset, the larger of the locked and the unvested amount at `t`.
    pub fn spendable_floor(&self, t: Timestamp) -> Amount {
        self.original_total.saturating_sub(&self.vested_and_unlocked(t))
    }

    /// Floor not already covered by committed delegations.
    pub fn locked_coins(&self, t: Timestamp) -> Amount {
        self.spendable_floor(t).saturating_sub(&self.delegated_committed)
    }

    /// Part of `balance` that may be transferred at `t`.
    pub fn spendable(&self, t: Timestamp, balance: &Amount) -> Amount {
        balance.saturating_sub(&self.locked_coins(t))
    }

    /// Whether nothing is locked or unvested at `t`.
    pub fn is_fully_released(&self, t: Timestamp) -> bool {
        self.spendable_floor(t).is_zero()
    }

    /// Record a delegation of `amount` out of `balance` at `t`.
    ///
    /// Funds still under the floor are delegated first and tracked as
    /// committed; the rest is tracked as free.
    pub fn track_delegation(
        &mut self,
        t: Timestamp,
        balance: &Amount,
        amount: &Amount,
    ) -> Result<(), VestingError> {
        if amount.is_zero() || !amount.is_all_lte(balance) {
            return Err(VestingError::InvalidDelegation(format!(
                "delegation of {amount} exceeds balance {balance}"
            )));
        }
        let floor = self.spendable_floor(t);
        for (asset, value) in amount.iter() {
            let floor_left = floor
                .amount_of(asset)
                .checked_sub(&self.delegated_committed.amount_of(asset))
                .unwrap_or_default();
            let committed = floor_left.min(value.clone());
            let free = value - &committed;
            self.delegated_committed.add_coin(asset, committed);
            self.delegated_free.add_coin(asset, free);
        }
        Ok(())
    }

    /// Record an undelegation of `amount`. Free delegations are released
    /// first, then committed ones; anything beyond both is ignored.
    pub fn track_undelegation(&mut self, amount: &Amount) -> Result<(), VestingError> {
        if amount.is_zero() {
            return Err(VestingError::InvalidDelegation("empty undelegation".into()));
        }
        for (asset, value) in amount.iter() {
            let free = self.delegated_free.amount_of(asset).min(value.clone());
            let rest = value - &free;
            let committed = self.delegated_committed.amount_of(asset).min(rest);
            self.delegated_free
                .sub_coin(asset, &free)
                .map_err(ScheduleError::from)?;
            self.delegated_committed
                .sub_coin(asset, &committed)
                .map_err(ScheduleError::from)?;
        }
        Ok(())
    }

    /// Split `delegated` into committed (capped by what is unvested at `t`)
    /// and free.
    pub fn reset_delegation(&mut self, t: Timestamp, delegated: &Amount) {
        self.delegated_committed = delegated.min(&self.unvested_only(t));
        self.delegated_free = delegated.saturating_sub(&self.delegated_committed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: Timestamp = 1_000;

    fn islm(v: u64) -> Amount {
        Amount::coin("aISLM", v)
    }

    fn quarters(amount: u64) -> Vec<Period> {
        (0..4).map(|_| Period::new(100, islm(amount))).collect()
    }

    /// Unlocks at 1100..1400, vests entirely at 1200.
    fn account() -> LockedAccount {
        LockedAccount::new(
            Address([1; 20]),
            Address([2; 20]),
            START,
            quarters(250),
            vec![Period::new(200, islm(1_000))],
        )
        .unwrap()
    }

    #[test]
    fn mismatched_totals_rejected() {
        let err = LockedAccount::new(
            Address([1; 20]),
            Address([2; 20]),
            START,
            quarters(250),
            vec![Period::new(0, islm(999))],
        )
        .unwrap_err();
        assert!(matches!(err, VestingError::ScheduleMismatch { .. }));
    }

    #[test]
    fn end_time_is_latest_schedule_end() {
        assert_eq!(account().end_time().unwrap(), 1_400);
    }

    #[test]
    fn queries_before_start() {
        let a = account();
        assert!(a.unlocked_only(START).is_zero());
        assert_eq!(a.locked_only(START), islm(1_000));
        assert_eq!(a.unvested_only(START), islm(1_000));
        assert_eq!(a.spendable_floor(START), islm(1_000));
    }

    #[test]
    fn queries_mid_schedule() {
        let a = account();
        // 1150: 250 unlocked, nothing vested.
        assert_eq!(a.unlocked_only(1_150), islm(250));
        assert_eq!(a.locked_only(1_150), islm(750));
        assert!(a.vested_only(1_150).is_zero());
        assert_eq!(a.spendable_floor(1_150), islm(1_000));
        // 1250: 500 unlocked, everything vested.
        assert_eq!(a.vested_only(1_250), islm(1_000));
        assert!(a.unvested_only(1_250).is_zero());
        assert_eq!(a.spendable_floor(1_250), islm(500));
    }

    #[test]
    fn fully_released_at_end() {
        let a = account();
        assert!(!a.is_fully_released(1_399));
        assert!(a.is_fully_released(1_400));
    }

    #[test]
    fn spendable_respects_floor() {
        let a = account();
        let balance = islm(1_200);
        assert_eq!(a.spendable(1_250, &balance), islm(700));
    }

    #[test]
    fn delegation_commits_locked_funds_first() {
        let mut a = account();
        a.track_delegation(1_250, &islm(1_000), &islm(600)).unwrap();
        assert_eq!(a.delegated_committed, islm(500));
        assert_eq!(a.delegated_free, islm(100));
        assert!(a.locked_coins(1_250).is_zero());

        a.track_undelegation(&islm(150)).unwrap();
        assert_eq!(a.delegated_free, Amount::new());
        assert_eq!(a.delegated_committed, islm(450));
    }

    #[test]
    fn delegation_over_balance_rejected() {
        let mut a = account();
        let err = a.track_delegation(1_250, &islm(10), &islm(11)).unwrap_err();
        assert!(matches!(err, VestingError::InvalidDelegation(_)));
        assert!(a.delegated_committed.is_zero());
    }

    #[test]
    fn undelegation_beyond_tracked_is_capped() {
        let mut a = account();
        a.track_delegation(START, &islm(1_000), &islm(100)).unwrap();
        a.track_undelegation(&islm(500)).unwrap();
        assert!(a.delegated_committed.is_zero());
        assert!(a.delegated_free.is_zero());
    }

    #[test]
    fn reset_delegation_caps_at_unvested() {
        let mut a = account();
        a.reset_delegation(START, &islm(1_500));
        assert_eq!(a.delegated_committed, islm(1_000));
        assert_eq!(a.delegated_free, islm(500));
    }

    #[test]
    fn account_variants() {
        let locked: Account = account().into();
        assert!(locked.is_locked());
        assert_eq!(locked.address(), Address([1; 20]));
        let plain: Account = BaseAccount::new(Address([3; 20])).into();
        assert!(plain.as_locked().is_none());
        assert!(plain.into_locked().is_none());
    }
}
