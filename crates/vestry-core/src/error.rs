//! Error types for the Vestry engine.
use num_bigint::BigUint;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("negative result for {asset}: have {have}, need {need}")] Underflow { asset: String, have: BigUint, need: BigUint },
    #[error("invalid decimal amount: {0}")] InvalidDecimal(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("insufficient locked funds of {asset}: have {have}, need {need}")] InsufficientLockedFunds { asset: String, have: BigUint, need: BigUint },
    #[error("invalid period: {0}")] InvalidPeriod(String),
    #[error("arithmetic overflow")] ArithmeticOverflow,
    #[error(transparent)] Amount(#[from] AmountError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("insufficient funds at {address}: have {have}{asset}, need {need}{asset}")] InsufficientFunds { address: String, asset: String, have: BigUint, need: BigUint },
    #[error("unknown asset: {0}")] UnknownAsset(String),
    #[error(transparent)] Amount(#[from] AmountError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VestingError {
    #[error("lockup and vesting amounts must be equal: unlock {unlock}, ownership {ownership}")] ScheduleMismatch { unlock: String, ownership: String },
    #[error("account not subject to clawback: {0}")] NotSubjectToClawback(String),
    #[error("account not found: {0}")] AccountNotFound(String),
    #[error("account already exists: {0}")] AccountExists(String),
    #[error("funder mismatch: expected {expected}, got {got}")] FunderMismatch { expected: String, got: String },
    #[error("clawback before vesting start: start {start}, now {now}")] ClawbackBeforeStart { start: u64, now: u64 },
    #[error("funds still locked or unvested in {0}")] StillVesting(String),
    #[error("invalid delegation: {0}")] InvalidDelegation(String),
    #[error(transparent)] Schedule(#[from] ScheduleError),
    #[error(transparent)] Ledger(#[from] LedgerError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LiquidError {
    #[error("liquid vesting is disabled")] ModuleDisabled,
    #[error("asset cannot be liquidated: {0}")] InvalidAsset(String),
    #[error("amount below minimum liquidation: minimum {minimum}, got {got}")] BelowMinimum { minimum: BigUint, got: BigUint },
    #[error("liquid asset not found: {0}")] AssetNotFound(String),
    #[error("account holds no locked schedule: {0}")] NotLocked(String),
    #[error("schedule has not started yet")] StartInFuture,
    #[error("account has ongoing vesting periods: {0}")] UnvestedPeriods(String),
    #[error("insufficient liquid balance: have {have}, need {need}")] InsufficientBalance { have: BigUint, need: BigUint },
    #[error("invalid parameters: {0}")] InvalidParams(String),
    #[error("invalid genesis state: {0}")] InvalidGenesis(String),
    #[error(transparent)] Schedule(#[from] ScheduleError),
    #[error(transparent)] Vesting(#[from] VestingError),
    #[error(transparent)] Ledger(#[from] LedgerError),
}

#[derive(Error, Debug)]
pub enum VestryError {
    #[error(transparent)] Amount(#[from] AmountError),
    #[error(transparent)] Schedule(#[from] ScheduleError),
    #[error(transparent)] Ledger(#[from] LedgerError),
    #[error(transparent)] Vesting(#[from] VestingError),
    #[error(transparent)] Liquid(#[from] LiquidError),
    #[error("codec: {0}")] Codec(String),
}
