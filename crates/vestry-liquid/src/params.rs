//! Liquid vesting parameters.

use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use vestry_core::constants::{BASE_ASSET, DEFAULT_MIN_LIQUIDATION_EXP, LIQUID_MODULE_NAME};
use vestry_core::error::LiquidError;
use vestry_core::types::Address;

/// Module parameters for liquidation and redemption.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct Params {
    /// Module switch. Both protocols fail with `ModuleDisabled` when off.
    pub enabled: bool,
    /// The only asset that may be liquidated.
    pub underlying_asset: String,
    /// Smallest amount accepted by a single liquidation.
    #[serde(with = "vestry_core::amount::decimal")]
    pub minimum_liquidation_amount: BigUint,
    /// Holder of liquidated underlying funds until they are redeemed.
    pub escrow: Address,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            enabled: true,
            underlying_asset: BASE_ASSET.to_string(),
            minimum_liquidation_amount: BigUint::from(10u32).pow(DEFAULT_MIN_LIQUIDATION_EXP),
            escrow: Address::module(LIQUID_MODULE_NAME),
        }
    }
}

impl Params {
    pub fn validate(&self) -> Result<(), LiquidError> {
        if self.underlying_asset.is_empty() {
            return Err(LiquidError::InvalidParams("underlying asset must be set".into()));
        }
        if self.minimum_liquidation_amount.is_zero() {
            return Err(LiquidError::InvalidParams(
                "minimum liquidation amount must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Parse and validate parameters from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, LiquidError> {
        let params: Self =
            serde_json::from_str(json).map_err(|e| LiquidError::InvalidParams(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    pub fn to_json(&self) -> Result<String, LiquidError> {
        serde_json::to_string_pretty(self).map_err(|e| LiquidError::InvalidParams(e.to_string()))
    }
}
