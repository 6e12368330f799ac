//! A start time plus ordered periods: one unlock or ownership schedule.

use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::error::ScheduleError;
use crate::period::{self, Period};
use crate::types::Timestamp;

/// Ordered periods anchored at `start_time`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Schedule {
    pub start_time: Timestamp,
    pub periods: Vec<Period>,
}

impl Schedule {
    pub fn new(start_time: Timestamp, periods: Vec<Period>) -> Self {
        Self { start_time, periods }
    }

    /// `start_time + sum(length)`.
    pub fn end_time(&self) -> Result<Timestamp, ScheduleError> {
        self.start_time
            .checked_add(period::total_length(&self.periods)?)
            .ok_or(ScheduleError::ArithmeticOverflow)
    }

    pub fn total_amount(&self) -> Amount {
        period::total_amount(&self.periods)
    }

    pub fn past_periods(&self, read_time: Timestamp) -> Vec<Period> {
        period::past_periods(self.start_time, &self.periods, read_time)
    }

    pub fn upcoming_periods(&self, read_time: Timestamp) -> Vec<Period> {
        period::upcoming_periods(self.start_time, &self.periods, read_time)
    }

    /// Amount matured by `read_time`.
    pub fn read(&self, read_time: Timestamp) -> Amount {
        period::read_periods(self.start_time, &self.periods, read_time)
    }

    /// Time already spent inside the period active at `current`.
    pub fn current_period_shift(&self, current: Timestamp) -> u64 {
        period::current_period_shift(self.start_time, current, &self.periods)
    }
}
