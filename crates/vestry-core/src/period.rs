//! Periods and the read-side arithmetic over period sequences.
//!
//! A period sequence is anchored at a start time. Period `i` matures at
//! `start + length[0] + ... + length[i]`; its amount becomes available at that
//! instant. Order is significant and is never changed by any function here.
//!
//! Cumulative ends are computed with saturating addition: an end beyond
//! `u64::MAX` can never be reached by a real timestamp, so saturation keeps the
//! read functions total without changing their results.

use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::error::ScheduleError;
use crate::types::Timestamp;

/// One tranche of a schedule.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Period {
    /// Seconds since the previous period's end (or the start, for the first).
    pub length: u64,
    /// Amount maturing at the end of this period.
    pub amount: Amount,
}

impl Period {
    pub fn new(length: u64, amount: Amount) -> Self {
        Self { length, amount }
    }
}

/// Sum of all period lengths.
pub fn total_length(periods: &[Period]) -> Result<u64, ScheduleError> {
    periods.iter().try_fold(0u64, |acc, p| {
        acc.checked_add(p.length).ok_or(ScheduleError::ArithmeticOverflow)
    })
}

/// Sum of all period amounts.
pub fn total_amount(periods: &[Period]) -> Amount {
    periods.iter().map(|p| &p.amount).sum()
}

/// Number of periods whose absolute end is `<= read_time`.
///
/// Returns 0 when `read_time <= start` (even for zero-length periods) and
/// `periods.len()` once `read_time` reaches the schedule's end.
pub fn elapsed_period_count(start: Timestamp, periods: &[Period], read_time: Timestamp) -> usize {
    if read_time <= start {
        return 0;
    }
    let mut time = start;
    let mut count = 0;
    for period in periods {
        time = time.saturating_add(period.length);
        if time > read_time {
            break;
        }
        count += 1;
    }
    count
}

/// Periods fully elapsed at `read_time`.
pub fn past_periods(start: Timestamp, periods: &[Period], read_time: Timestamp) -> Vec<Period> {
    let n = elapsed_period_count(start, periods, read_time);
    periods[..n].to_vec()
}

/// Periods not yet elapsed at `read_time`.
pub fn upcoming_periods(start: Timestamp, periods: &[Period], read_time: Timestamp) -> Vec<Period> {
    let n = elapsed_period_count(start, periods, read_time);
    periods[n..].to_vec()
}

/// Amount matured by `read_time`.
pub fn read_periods(start: Timestamp, periods: &[Period], read_time: Timestamp) -> Amount {
    let n = elapsed_period_count(start, periods, read_time);
    total_amount(&periods[..n])
}

/// Replace the last `replacement.len()` periods of `periods` with `replacement`.
///
/// When the replacement is at least as long as `periods`, it is returned whole.
pub fn replace_tail(periods: &[Period], replacement: &[Period]) -> Vec<Period> {
    if replacement.len() >= periods.len() {
        return replacement.to_vec();
    }
    let keep = periods.len() - replacement.len();
    let mut replaced = Vec::with_capacity(periods.len());
    replaced.extend_from_slice(&periods[..keep]);
    replaced.extend_from_slice(replacement);
    replaced
}

/// Time already spent inside the period active at `current`.
///
/// The active period is the first one ending strictly after `current`. Returns 0
/// when `current <= start`, at an exact period boundary, or once the schedule
/// has ended.
pub fn current_period_shift(start: Timestamp, current: Timestamp, periods: &[Period]) -> u64 {
    if current <= start {
        return 0;
    }
    let mut elapsed = start;
    for period in periods {
        let end = elapsed.saturating_add(period.length);
        if end > current {
            return current - elapsed;
        }
        elapsed = end;
    }
    0
}
