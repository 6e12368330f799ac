//! # vestry-liquid
//! Liquid vesting: spinning locked unlock schedules off into transferable
//! assets and redeeming them back.
//!
//! - [`liquidate`] / [`redeem`]: pure planning of both protocols
//! - [`keeper`]: applying them against stores and ledgers
//! - [`genesis`]: registry import and export

pub mod asset;
pub mod genesis;
pub mod keeper;
pub mod liquidate;
pub mod migrate;
pub mod params;
pub mod redeem;
pub mod store;

pub use asset::LiquidAsset;
pub use genesis::GenesisState;
pub use keeper::{LiquidVesting, RedeemOutcome};
pub use params::Params;
pub use store::{LiquidAssetStore, MemoryLiquidAssetStore};
