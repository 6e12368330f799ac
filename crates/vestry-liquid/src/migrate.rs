//! Stretch migration for liquid assets.

use tracing::{debug, info};

use vestry_core::error::LiquidError;
use vestry_core::stretch::stretch_schedule;
use vestry_core::types::Timestamp;
use vestry_vesting::migrate::StretchParams;

use crate::asset::LiquidAsset;

/// Stretch the upcoming part of `asset`'s unlock schedule.
///
/// Returns `None` when the asset ends at or before the threshold or has
/// nothing upcoming at `now`.
pub fn stretch_asset(
    asset: &LiquidAsset,
    now: Timestamp,
    params: &StretchParams,
) -> Result<Option<LiquidAsset>, LiquidError> {
    params.validate()?;
    let schedule = asset.unlock_schedule();
    if !params.applies_to(asset.end_time) || schedule.upcoming_periods(now).is_empty() {
        debug!(asset = %asset.base_id, end = asset.end_time, "liquid asset not stretched");
        return Ok(None);
    }

    let stretched = stretch_schedule(&schedule, now, params.extra_units, params.unit_length)?;
    let updated = asset.with_periods(stretched.periods)?;
    info!(
        asset = %asset.base_id,
        old_end = asset.end_time,
        new_end = updated.end_time,
        "stretched liquid asset"
    );
    Ok(Some(updated))
}
