//! Merging two schedules anchored at different start times.
//!
//! Both merges walk the two inputs' period ends in absolute time, always
//! consuming whichever period ends first (both when they end together), and
//! emit output periods describing a combined cumulative curve:
//! - [`disjunct_periods`]: the sum of the two curves (a grant merged into an
//!   existing schedule).
//! - [`conjunct_periods`]: the pointwise minimum of the two curves (capping an
//!   unlock schedule at what is vested).

use crate::amount::Amount;
use crate::error::ScheduleError;
use crate::period::Period;
use crate::schedule::Schedule;
use crate::types::Timestamp;

/// Walks one period sequence in absolute time.
struct Cursor<'a> {
    periods: &'a [Period],
    index: usize,
    time: Timestamp,
    cumulative: Amount,
}

impl<'a> Cursor<'a> {
    fn new(start: Timestamp, periods: &'a [Period]) -> Self {
        Self {
            periods,
            index: 0,
            time: start,
            cumulative: Amount::new(),
        }
    }

    fn next_end(&self) -> Result<Option<Timestamp>, ScheduleError> {
        match self.periods.get(self.index) {
            Some(p) => self
                .time
                .checked_add(p.length)
                .map(Some)
                .ok_or(ScheduleError::ArithmeticOverflow),
            None => Ok(None),
        }
    }

    fn consume(&mut self, end: Timestamp) {
        self.cumulative += &self.periods[self.index].amount;
        self.time = end;
        self.index += 1;
    }
}

/// Advance whichever cursor matures first. Returns the new time, or `None`
/// once both inputs are exhausted.
fn step(p: &mut Cursor<'_>, q: &mut Cursor<'_>) -> Result<Option<Timestamp>, ScheduleError> {
    let next = match (p.next_end()?, q.next_end()?) {
        (Some(np), Some(nq)) if np < nq => {
            p.consume(np);
            np
        }
        (Some(np), Some(nq)) if nq < np => {
            q.consume(nq);
            nq
        }
        (Some(np), Some(_)) => {
            p.consume(np);
            q.consume(np);
            np
        }
        (Some(np), None) => {
            p.consume(np);
            np
        }
        (None, Some(nq)) => {
            q.consume(nq);
            nq
        }
        (None, None) => return Ok(None),
    };
    Ok(Some(next))
}

/// Accumulates emitted output periods.
struct Emitter {
    time: Timestamp,
    emitted: Amount,
    periods: Vec<Period>,
}

impl Emitter {
    fn emit(&mut self, at: Timestamp, cumulative: Amount) -> Result<(), ScheduleError> {
        let length = at
            .checked_sub(self.time)
            .ok_or_else(|| ScheduleError::InvalidPeriod(format!("period ends at {at} before {}", self.time)))?;
        let amount = cumulative.checked_sub(&self.emitted)?;
        self.periods.push(Period::new(length, amount));
        self.time = at;
        self.emitted = cumulative;
        Ok(())
    }
}

/// Merge two schedules so that the result matures, at every instant, the sum
/// of what both inputs mature. Anchored at `min(start_a, start_b)`.
///
/// Commutative in its two inputs. With equal starts and equal period lengths
/// this reduces to element-wise addition of amounts.
pub fn disjunct_periods(
    start_a: Timestamp,
    start_b: Timestamp,
    a: &[Period],
    b: &[Period],
) -> Result<Schedule, ScheduleError> {
    let start = start_a.min(start_b);
    let mut p = Cursor::new(start_a, a);
    let mut q = Cursor::new(start_b, b);
    let mut out = Emitter {
        time: start,
        emitted: Amount::new(),
        periods: Vec::with_capacity(a.len() + b.len()),
    };

    while let Some(next) = step(&mut p, &mut q)? {
        out.emit(next, &p.cumulative + &q.cumulative)?;
    }

    Ok(Schedule::new(start, out.periods))
}

/// Merge two schedules so that the result matures, at every instant, the
/// minimum of what the two inputs mature. Periods are only emitted when the
/// minimum grows.
pub fn conjunct_periods(
    start_a: Timestamp,
    start_b: Timestamp,
    a: &[Period],
    b: &[Period],
) -> Result<Schedule, ScheduleError> {
    let start = start_a.min(start_b);
    let mut p = Cursor::new(start_a, a);
    let mut q = Cursor::new(start_b, b);
    let mut out = Emitter {
        time: start,
        emitted: Amount::new(),
        periods: Vec::new(),
    };

    while let Some(next) = step(&mut p, &mut q)? {
        let floor = p.cumulative.min(&q.cumulative);
        if floor != out.emitted {
            out.emit(next, floor)?;
        }
    }

    Ok(Schedule::new(start, out.periods))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn periods(spec: &[(u64, u64)]) -> Vec<Period> {
        spec.iter()
            .map(|&(l, a)| Period::new(l, Amount::coin("aISLM", a)))
            .collect()
    }

    // --- disjunct_periods ---

    #[test]
    fn disjunct_equal_starts_equal_lengths_adds_elementwise() {
        let a = periods(&[(100, 10), (100, 20)]);
        let b = periods(&[(100, 1), (100, 2)]);
        let merged = disjunct_periods(1_000, 1_000, &a, &b).unwrap();
        assert_eq!(merged.start_time, 1_000);
        assert_eq!(merged.periods, periods(&[(100, 11), (100, 22)]));
        assert_eq!(merged.end_time().unwrap(), 1_200);
    }

    #[test]
    fn disjunct_offset_starts_interleave() {
        let a = periods(&[(100, 10), (100, 10)]);
        let b = periods(&[(100, 5)]);
        let merged = disjunct_periods(1_000, 1_050, &a, &b).unwrap();
        assert_eq!(merged.start_time, 1_000);
        assert_eq!(merged.periods, periods(&[(100, 10), (50, 5), (50, 10)]));
    }

    #[test]
    fn disjunct_unequal_lengths_split_at_boundaries() {
        let a = periods(&[(300, 30)]);
        let b = periods(&[(100, 1), (100, 1), (100, 1)]);
        let merged = disjunct_periods(0, 0, &a, &b).unwrap();
        assert_eq!(merged.periods, periods(&[(100, 1), (100, 1), (100, 31)]));
    }

    #[test]
    fn disjunct_with_empty_side() {
        let a = periods(&[(100, 10)]);
        let merged = disjunct_periods(500, 200, &a, &[]).unwrap();
        assert_eq!(merged.start_time, 200);
        assert_eq!(merged.periods, periods(&[(400, 10)]));
        assert_eq!(merged.end_time().unwrap(), 600);
    }

    #[test]
    fn disjunct_is_commutative() {
        let a = periods(&[(10, 3), (40, 7), (5, 1)]);
        let b = periods(&[(25, 9), (25, 2)]);
        let ab = disjunct_periods(100, 120, &a, &b).unwrap();
        let ba = disjunct_periods(120, 100, &b, &a).unwrap();
        assert_eq!(ab, ba);
    }

    // --- conjunct_periods ---

    #[test]
    fn conjunct_caps_at_flat_amount() {
        let unlock = periods(&[(100, 40), (100, 40), (100, 20)]);
        let cap = periods(&[(0, 50)]);
        let capped = conjunct_periods(1_000, 1_000, &unlock, &cap).unwrap();
        assert_eq!(capped.periods, periods(&[(100, 40), (100, 10)]));
        assert_eq!(capped.total_amount(), Amount::coin("aISLM", 50u64));
    }

    #[test]
    fn conjunct_with_zero_cap_is_empty() {
        let unlock = periods(&[(100, 40), (100, 60)]);
        let capped = conjunct_periods(1_000, 1_000, &unlock, &[]).unwrap();
        assert!(capped.periods.is_empty());
        assert!(capped.total_amount().is_zero());
    }

    #[test]
    fn conjunct_cap_above_total_is_identity_on_amounts() {
        let unlock = periods(&[(100, 40), (100, 60)]);
        let cap = periods(&[(0, 1_000)]);
        let capped = conjunct_periods(1_000, 1_000, &unlock, &cap).unwrap();
        assert_eq!(capped.periods, unlock);
    }

    fn curve() -> impl Strategy<Value = Vec<(u64, u64)>> {
        proptest::collection::vec((1u64..200, 0u64..1_000), 0..8)
    }

    proptest! {
        #[test]
        fn disjunct_reads_as_sum(
            a in curve(), b in curve(),
            sa in 0u64..500, sb in 0u64..500,
            offset in 1u64..3_000,
        ) {
            let (a, b) = (periods(&a), periods(&b));
            let merged = disjunct_periods(sa, sb, &a, &b).unwrap();
            let t = sa.max(sb) + offset;
            let expected = &Schedule::new(sa, a.clone()).read(t) + &Schedule::new(sb, b.clone()).read(t);
            prop_assert_eq!(merged.read(t), expected);
            prop_assert_eq!(merged.total_amount(), &crate::period::total_amount(&a) + &crate::period::total_amount(&b));
        }

        #[test]
        fn disjunct_commutes(a in curve(), b in curve(), sa in 0u64..500, sb in 0u64..500) {
            let (a, b) = (periods(&a), periods(&b));
            prop_assert_eq!(
                disjunct_periods(sa, sb, &a, &b).unwrap(),
                disjunct_periods(sb, sa, &b, &a).unwrap()
            );
        }

        #[test]
        fn conjunct_reads_as_min(
            a in curve(), b in curve(),
            sa in 0u64..500, sb in 0u64..500,
            offset in 1u64..3_000,
        ) {
            let (a, b) = (periods(&a), periods(&b));
            let capped = conjunct_periods(sa, sb, &a, &b).unwrap();
            let t = sa.max(sb) + offset;
            let ra = Schedule::new(sa, a).read(t);
            let rb = Schedule::new(sb, b).read(t);
            prop_assert_eq!(capped.read(t), ra.min(&rb));
        }
    }
}
