//! Protocol constants. Times are Unix seconds, amounts are in base units.

/// Seconds in one day, the unit used by schedule stretching.
pub const DAY_SECONDS: u64 = 86_400;

/// The staking and vesting asset in base units (1 ISLM = 10^18 aISLM).
pub const BASE_ASSET: &str = "aISLM";

/// Decimal exponent between base and display units of every liquid asset.
pub const LIQUID_DISPLAY_EXPONENT: u32 = 18;

/// Prefix of a liquid asset's base identifier (exponent 0).
pub const LIQUID_BASE_PREFIX: &str = "aLIQUID";

/// Prefix of a liquid asset's display identifier (exponent 18).
pub const LIQUID_DISPLAY_PREFIX: &str = "LIQUID";

/// Module name of the liquid vesting escrow account.
pub const LIQUID_MODULE_NAME: &str = "liquidvesting";

/// Default minimum liquidation: 10^6 ISLM expressed as 10^24 aISLM.
pub const DEFAULT_MIN_LIQUIDATION_EXP: u32 = 24;

/// Default extra units added by a one-time schedule stretch (three years of days).
pub const DEFAULT_STRETCH_UNITS: u64 = 1_095;

/// Default stretch threshold: schedules ending after 2026-01-01T00:00:00Z.
pub const DEFAULT_STRETCH_THRESHOLD: u64 = 1_767_225_600;
