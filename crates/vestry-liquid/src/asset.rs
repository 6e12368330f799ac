//! Liquid assets: spun-off parts of locked unlock schedules.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use vestry_core::constants::{LIQUID_BASE_PREFIX, LIQUID_DISPLAY_EXPONENT, LIQUID_DISPLAY_PREFIX};
use vestry_core::error::{LiquidError, ScheduleError};
use vestry_core::period::{self, Period};
use vestry_core::schedule::Schedule;
use vestry_core::traits::{DenomUnit, TokenMetadata};
use vestry_core::types::Timestamp;

/// Base (smallest unit) identifier of liquid asset number `id`.
pub fn base_id(id: u64) -> String {
    format!("{LIQUID_BASE_PREFIX}{id}")
}

/// Display identifier of liquid asset number `id`.
pub fn display_id(id: u64) -> String {
    format!("{LIQUID_DISPLAY_PREFIX}{id}")
}

/// Number of the liquid asset whose base identifier is `base`.
pub fn parse_base_id(base: &str) -> Option<u64> {
    let digits = base.strip_prefix(LIQUID_BASE_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// A liquid asset and the underlying unlock schedule it stands for.
///
/// One unit of `base_id` redeems one unit of `underlying_asset_id`; the
/// schedule total is the circulating supply of `base_id`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LiquidAsset {
    pub base_id: String,
    pub display_id: String,
    pub underlying_asset_id: String,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub unlock_periods: Vec<Period>,
}

impl LiquidAsset {
    /// Liquid asset number `id`, unlocking `periods` from `start_time`.
    pub fn new(
        id: u64,
        underlying_asset_id: impl Into<String>,
        start_time: Timestamp,
        unlock_periods: Vec<Period>,
    ) -> Result<Self, ScheduleError> {
        let end_time = start_time
            .checked_add(period::total_length(&unlock_periods)?)
            .ok_or(ScheduleError::ArithmeticOverflow)?;
        Ok(Self {
            base_id: base_id(id),
            display_id: display_id(id),
            underlying_asset_id: underlying_asset_id.into(),
            start_time,
            end_time,
            unlock_periods,
        })
    }

    pub fn id(&self) -> Option<u64> {
        parse_base_id(&self.base_id)
    }

    pub fn unlock_schedule(&self) -> Schedule {
        Schedule::new(self.start_time, self.unlock_periods.clone())
    }

    /// Underlying amount still represented by this asset.
    pub fn total(&self) -> BigUint {
        period::total_amount(&self.unlock_periods).amount_of(&self.underlying_asset_id)
    }

    /// Replace the unlock periods, keeping `end_time` in step.
    pub fn with_periods(&self, unlock_periods: Vec<Period>) -> Result<Self, ScheduleError> {
        let end_time = self
            .start_time
            .checked_add(period::total_length(&unlock_periods)?)
            .ok_or(ScheduleError::ArithmeticOverflow)?;
        Ok(Self {
            end_time,
            unlock_periods,
            ..self.clone()
        })
    }

    /// Token metadata bound when the asset is first minted.
    pub fn metadata(&self) -> TokenMetadata {
        TokenMetadata {
            description: "Liquid vesting token".to_string(),
            denom_units: vec![
                DenomUnit {
                    denom: self.base_id.clone(),
                    exponent: 0,
                },
                DenomUnit {
                    denom: self.display_id.clone(),
                    exponent: LIQUID_DISPLAY_EXPONENT,
                },
            ],
            base: self.base_id.clone(),
            display: self.display_id.clone(),
            name: self.display_id.clone(),
            symbol: self.display_id.clone(),
        }
    }

    /// Check identifiers and that `end_time` matches the periods.
    pub fn validate(&self) -> Result<(), LiquidError> {
        let id = self
            .id()
            .ok_or_else(|| LiquidError::InvalidGenesis(format!("bad liquid id {}", self.base_id)))?;
        if self.display_id != display_id(id) {
            return Err(LiquidError::InvalidGenesis(format!(
                "display id {} does not match {}",
                self.display_id, self.base_id
            )));
        }
        if self.underlying_asset_id.is_empty() {
            return Err(LiquidError::InvalidGenesis(format!(
                "{} has no underlying asset",
                self.base_id
            )));
        }
        if self.unlock_schedule().end_time()? != self.end_time {
            return Err(LiquidError::InvalidGenesis(format!(
                "{} end time does not match its periods",
                self.base_id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vestry_core::amount::Amount;

    fn islm(v: u64) -> Amount {
        Amount::coin("aISLM", v)
    }

    #[test]
    fn ids_follow_counter() {
        assert_eq!(base_id(0), "aLIQUID0");
        assert_eq!(display_id(17), "LIQUID17");
        assert_eq!(parse_base_id("aLIQUID42"), Some(42));
    }

    #[test]
    fn foreign_ids_do_not_parse() {
        assert_eq!(parse_base_id("aISLM"), None);
        assert_eq!(parse_base_id("aLIQUID"), None);
        assert_eq!(parse_base_id("aLIQUID-1"), None);
        assert_eq!(parse_base_id("LIQUID3"), None);
    }

    #[test]
    fn new_sets_end_time() {
        let a = LiquidAsset::new(3, "aISLM", 1_000, vec![Period::new(50, islm(5)), Period::new(70, islm(5))])
            .unwrap();
        assert_eq!(a.base_id, "aLIQUID3");
        assert_eq!(a.end_time, 1_120);
        assert_eq!(a.total(), BigUint::from(10u32));
        assert_eq!(a.id(), Some(3));
        a.validate().unwrap();
    }

    #[test]
    fn metadata_has_two_units() {
        let m = LiquidAsset::new(1, "aISLM", 0, vec![]).unwrap().metadata();
        assert_eq!(m.description, "Liquid vesting token");
        assert_eq!(m.base, "aLIQUID1");
        assert_eq!(m.display, "LIQUID1");
        assert_eq!(m.symbol, "LIQUID1");
        assert_eq!(m.denom_units[0].exponent, 0);
        assert_eq!(m.denom_units[1].exponent, 18);
    }

    #[test]
    fn tampered_end_time_fails_validation() {
        let mut a = LiquidAsset::new(1, "aISLM", 0, vec![Period::new(10, islm(1))]).unwrap();
        a.end_time = 11;
        assert!(matches!(a.validate(), Err(LiquidError::InvalidGenesis(_))));
    }

    #[test]
    fn mismatched_display_fails_validation() {
        let mut a = LiquidAsset::new(1, "aISLM", 0, vec![]).unwrap();
        a.display_id = display_id(2);
        assert!(a.validate().is_err());
    }
}
