//! # vestry-core
//! Foundation types, schedule arithmetic and collaborator traits for Vestry.
//!
//! All arithmetic is integer-only and deterministic: amounts are
//! arbitrary-precision, time is caller-supplied Unix seconds, and every split
//! or transformation of a schedule conserves its total to the unit.

pub mod amount;
pub mod codec;
pub mod constants;
pub mod error;
pub mod ledger;
pub mod merge;
pub mod period;
pub mod schedule;
pub mod stretch;
pub mod subtract;
pub mod traits;
pub mod types;

pub use amount::Amount;
pub use period::Period;
pub use schedule::Schedule;
pub use types::{Address, Timestamp};
