//! # vestry-vesting
//! Locked accounts: unlock and ownership schedules, grants, clawback and
//! delegation bookkeeping.
//!
//! - [`account`]: the `Plain | Locked` account model and its time queries
//! - [`grant`]: creating and merging locked accounts
//! - [`clawback`]: truncating an account to what it owns
//! - [`migrate`]: one-shot unlock-schedule stretch
//! - [`keeper`]: the protocols, applied against a store and ledgers

pub mod account;
pub mod clawback;
pub mod grant;
pub mod keeper;
pub mod migrate;
pub mod store;

pub use account::{Account, BaseAccount, LockedAccount};
pub use grant::{Grant, GrantOutcome};
pub use keeper::VestingKeeper;
pub use store::{AccountStore, MemoryAccountStore};
