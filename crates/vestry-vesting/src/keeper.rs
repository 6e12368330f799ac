//! Vesting keeper: the state-changing vesting protocols.
//!
//! The [`VestingKeeper`] owns the account store and drives the asset and
//! delegation ledgers. Every method computes the complete outcome from
//! snapshots, checks ledger balances, and only then writes: a failed call
//! leaves accounts and balances exactly as they were.

use tracing::{debug, info};

use vestry_core::amount::Amount;
use vestry_core::error::VestingError;
use vestry_core::traits::{AssetLedger, DelegationLedger};
use vestry_core::types::{Address, Timestamp};

use crate::account::{Account, BaseAccount, LockedAccount};
use crate::clawback::compute_clawback;
use crate::grant::{apply_grant, Grant, GrantOutcome};
use crate::migrate::{stretch_account, StretchParams};
use crate::store::AccountStore;

/// Vesting protocols over an account store and two ledgers.
pub struct VestingKeeper<S, L, D> {
    accounts: S,
    ledger: L,
    delegation: D,
}

impl<S, L, D> VestingKeeper<S, L, D>
where
    S: AccountStore,
    L: AssetLedger,
    D: DelegationLedger,
{
    pub fn new(accounts: S, ledger: L, delegation: D) -> Self {
        Self {
            accounts,
            ledger,
            delegation,
        }
    }

    pub fn accounts(&self) -> &S {
        &self.accounts
    }

    pub fn accounts_mut(&mut self) -> &mut S {
        &mut self.accounts
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    pub fn delegation(&self) -> &D {
        &self.delegation
    }

    pub fn delegation_mut(&mut self) -> &mut D {
        &mut self.delegation
    }

    /// Bonded plus unbonding amount of the bond asset for `address`.
    pub fn delegated(&self, address: &Address) -> Amount {
        self.delegation
            .delegated(address)
            .only(&self.delegation.bond_asset())
    }

    /// The locked account at `address`.
    ///
    /// # Errors
    ///
    /// - [`VestingError::AccountNotFound`] if nothing is stored there
    /// - [`VestingError::NotSubjectToClawback`] if the account is plain
    pub fn locked_account(&self, address: &Address) -> Result<LockedAccount, VestingError> {
        self.accounts
            .get(address)
            .ok_or_else(|| VestingError::AccountNotFound(address.to_string()))?
            .into_locked()
            .ok_or_else(|| VestingError::NotSubjectToClawback(address.to_string()))
    }

    /// Part of `address`'s balance that may be transferred at `now`.
    pub fn spendable(&self, address: &Address, now: Timestamp) -> Amount {
        let balance = self.ledger.balances(address);
        match self.accounts.get(address) {
            Some(Account::Locked(locked)) => locked.spendable(now, &balance),
            _ => balance,
        }
    }

    /// Compute where `grant` would leave `target` without writing anything.
    pub fn plan_grant(
        &self,
        target: Address,
        grant: Grant,
        merge: bool,
        now: Timestamp,
    ) -> Result<(LockedAccount, GrantOutcome), VestingError> {
        let existing = self.accounts.get(&target);
        let delegated = self.delegated(&target);
        apply_grant(existing, target, grant, merge, now, &delegated)
    }

    /// Store an account computed by [`plan_grant`](Self::plan_grant).
    pub fn store_locked(&mut self, account: LockedAccount) {
        self.accounts.put(account.into());
    }

    /// Create a locked account at `target` funded by `grant.funder`, or merge
    /// into the one already there when `merge` is set. The granted total moves
    /// from the funder to `target`.
    pub fn create_locked_account(
        &mut self,
        target: Address,
        grant: Grant,
        merge: bool,
        now: Timestamp,
    ) -> Result<GrantOutcome, VestingError> {
        let grant = grant.normalized()?;
        let funder = grant.funder;
        let granted = grant.total();
        let (account, outcome) = self.plan_grant(target, grant, merge, now)?;

        self.ledger.ensure_funds(&funder, &granted)?;
        self.ledger.transfer(&funder, &target, &granted)?;
        info!(
            %funder,
            %target,
            amount = %granted,
            start = account.start_time,
            ?outcome,
            "granted locked funds"
        );
        self.accounts.put(account.into());
        Ok(outcome)
    }

    /// Claw back everything unvested at `now` from `address`, sending it to
    /// `dest` (the funder when `None`). Returns the amount moved.
    pub fn clawback(
        &mut self,
        funder: &Address,
        address: &Address,
        dest: Option<Address>,
        now: Timestamp,
    ) -> Result<Amount, VestingError> {
        let account = self.locked_account(address)?;
        if account.funder != *funder {
            return Err(VestingError::FunderMismatch {
                expected: account.funder.to_string(),
                got: funder.to_string(),
            });
        }
        let dest = dest.unwrap_or(*funder);

        let clawback = compute_clawback(&account, now)?;
        if clawback.is_noop() {
            debug!(%address, "nothing to claw back");
            return Ok(Amount::new());
        }

        self.ledger.ensure_funds(address, &clawback.amount)?;
        self.ledger.transfer(address, &dest, &clawback.amount)?;
        info!(%address, %dest, amount = %clawback.amount, "clawed back unvested funds");
        self.accounts.put(clawback.account.into());
        Ok(clawback.amount)
    }

    /// Hand the funder role of `address` from `funder` to `new_funder`.
    pub fn update_funder(
        &mut self,
        funder: &Address,
        new_funder: Address,
        address: &Address,
    ) -> Result<(), VestingError> {
        let mut account = self.locked_account(address)?;
        if account.funder != *funder {
            return Err(VestingError::FunderMismatch {
                expected: account.funder.to_string(),
                got: funder.to_string(),
            });
        }
        account.funder = new_funder;
        info!(%address, old = %funder, new = %new_funder, "updated funder");
        self.accounts.put(account.into());
        Ok(())
    }

    /// Turn a locked account with nothing left locked or unvested into a
    /// plain account.
    pub fn convert_to_plain(&mut self, address: &Address, now: Timestamp) -> Result<(), VestingError> {
        let account = self.locked_account(address)?;
        if !account.is_fully_released(now) {
            return Err(VestingError::StillVesting(address.to_string()));
        }
        info!(%address, "converted locked account to plain");
        self.accounts.put(BaseAccount::new(*address).into());
        Ok(())
    }

    /// Record a delegation of `amount` by `address` at `now`.
    pub fn track_delegation(
        &mut self,
        address: &Address,
        amount: &Amount,
        now: Timestamp,
    ) -> Result<(), VestingError> {
        let mut account = self.locked_account(address)?;
        let balance = self.ledger.balances(address);
        account.track_delegation(now, &balance, amount)?;
        debug!(%address, %amount, "tracked delegation");
        self.accounts.put(account.into());
        Ok(())
    }

    /// Record an undelegation of `amount` by `address`.
    pub fn track_undelegation(&mut self, address: &Address, amount: &Amount) -> Result<(), VestingError> {
        let mut account = self.locked_account(address)?;
        account.track_undelegation(amount)?;
        debug!(%address, %amount, "tracked undelegation");
        self.accounts.put(account.into());
        Ok(())
    }

    /// Stretch the unlock schedule of `address`. Returns whether it changed.
    pub fn stretch_account(
        &mut self,
        address: &Address,
        now: Timestamp,
        params: &StretchParams,
    ) -> Result<bool, VestingError> {
        let account = self.locked_account(address)?;
        match stretch_account(&account, now, params)? {
            Some(updated) => {
                self.accounts.put(updated.into());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
