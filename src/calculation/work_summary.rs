//! Duty work-summary accumulation.
//!
//! This module buckets one person's duty intervals into pre-event, event,
//! post-event and "other" totals. Counted intervals are split at the event
//! boundaries into disjoint half-open pieces, so no second is counted twice
//! and none is lost.

use chrono::{NaiveDateTime, SubsecRound};

use crate::error::EngineResult;
use crate::models::{
    DutyInterval, EventPhase, EventWindow, PositionId, WorkSummary, ensure_ordered,
};

use super::credits::CreditRate;

/// Decimal places kept on credit totals in a finished summary.
pub const CREDIT_DECIMAL_PLACES: u32 = 2;

/// Accumulates duty intervals into a [`WorkSummary`].
///
/// An accumulator is bound to one event window (or none, in which case every
/// counted second is in-event) and one credit source for its whole life.
///
/// # Example
///
/// ```
/// use duty_engine::calculation::{NoCredits, WorkSummaryAccumulator};
/// use duty_engine::models::EventWindow;
/// use chrono::{NaiveDate, NaiveDateTime};
///
/// let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
/// let window = EventWindow::from_dates(
///     NaiveDate::from_ymd_opt(2024, 8, 20).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 9, 2).unwrap(),
/// ).unwrap();
///
/// let mut accumulator = WorkSummaryAccumulator::new(Some(window), &NoCredits);
/// accumulator.accrue(1, at("2024-08-19 22:00:00"), at("2024-08-20 02:00:00"), true).unwrap();
///
/// let summary = accumulator.finish();
/// assert_eq!(summary.pre_event_duration, 2 * 3600);
/// assert_eq!(summary.event_duration, 2 * 3600);
/// ```
pub struct WorkSummaryAccumulator<'a> {
    event_window: Option<EventWindow>,
    credits: &'a dyn CreditRate,
    summary: WorkSummary,
}

impl<'a> WorkSummaryAccumulator<'a> {
    /// Creates an empty accumulator.
    pub fn new(event_window: Option<EventWindow>, credits: &'a dyn CreditRate) -> Self {
        Self {
            event_window,
            credits,
            summary: WorkSummary::default(),
        }
    }

    /// Adds one interval and returns what it contributed.
    ///
    /// Non-counted intervals go entirely to `other_duration` and earn no
    /// credits. Counted intervals are split at the event boundaries.
    /// Sub-second parts of `start` and `end` are dropped first, so the pieces
    /// always add up to the whole-second length of the interval.
    ///
    /// # Errors
    ///
    /// [`crate::error::EngineError::InvalidInterval`] when `end < start`;
    /// nothing is recorded in that case.
    pub fn accrue(
        &mut self,
        position_id: PositionId,
        start: NaiveDateTime,
        end: NaiveDateTime,
        counts_toward_hours: bool,
    ) -> EngineResult<WorkSummary> {
        ensure_ordered(position_id, start, end)?;
        let start = start.trunc_subsecs(0);
        let end = end.trunc_subsecs(0);

        let mut delta = WorkSummary::default();
        if !counts_toward_hours {
            delta.other_duration = (end - start).num_seconds();
        } else {
            for (phase, piece_start, piece_end) in self.split_by_phase(start, end) {
                let seconds = (piece_end - piece_start).num_seconds();
                let credits = self.credits.credits_between(position_id, piece_start, piece_end);
                match phase {
                    EventPhase::PreEvent => {
                        delta.pre_event_duration += seconds;
                        delta.pre_event_credits += credits;
                    }
                    EventPhase::Event => {
                        delta.event_duration += seconds;
                        delta.event_credits += credits;
                    }
                    EventPhase::PostEvent => {
                        delta.post_event_duration += seconds;
                        delta.post_event_credits += credits;
                    }
                }
            }
        }

        self.summary.merge(&delta);
        Ok(delta)
    }

    /// Adds a duty interval, closing an open one at `now`.
    pub fn accrue_interval(
        &mut self,
        interval: &DutyInterval,
        now: NaiveDateTime,
    ) -> EngineResult<WorkSummary> {
        let window = interval.resolve(now)?;
        self.accrue(
            interval.position_id,
            window.start,
            window.end,
            interval.counts_toward_hours,
        )
    }

    /// Totals so far, credits unrounded.
    pub fn summary(&self) -> &WorkSummary {
        &self.summary
    }

    /// Consumes the accumulator, rounding credit totals to
    /// [`CREDIT_DECIMAL_PLACES`].
    pub fn finish(self) -> WorkSummary {
        let mut summary = self.summary;
        summary.pre_event_credits = summary.pre_event_credits.round_dp(CREDIT_DECIMAL_PLACES);
        summary.event_credits = summary.event_credits.round_dp(CREDIT_DECIMAL_PLACES);
        summary.post_event_credits = summary.post_event_credits.round_dp(CREDIT_DECIMAL_PLACES);
        summary
    }

    fn split_by_phase(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Vec<(EventPhase, NaiveDateTime, NaiveDateTime)> {
        let Some(window) = self.event_window else {
            return vec![(EventPhase::Event, start, end)];
        };

        let pieces = [
            (EventPhase::PreEvent, start, end.min(window.event_start)),
            (
                EventPhase::Event,
                start.max(window.event_start),
                end.min(window.event_end),
            ),
            (EventPhase::PostEvent, start.max(window.event_end), end),
        ];

        let mut kept: Vec<_> = pieces.into_iter().filter(|(_, s, e)| s < e).collect();
        if kept.is_empty() {
            // Zero-length interval: attribute the instant to its phase.
            kept.push((window.phase_of(start), start, end));
        }
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::credits::{NoCredits, PositionCredit, PositionCreditSchedule};
    use crate::error::EngineError;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn make_datetime(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn event_2024() -> EventWindow {
        EventWindow::from_dates(
            NaiveDate::from_ymd_opt(2024, 8, 20).unwrap(),
            NaiveDate::from_ymd_opt(2024, 9, 2).unwrap(),
        )
        .unwrap()
    }

    fn flat_schedule(rate: &str) -> PositionCreditSchedule {
        PositionCreditSchedule::from_rows(vec![PositionCredit {
            position_id: 1,
            start: make_datetime("2024-01-01 00:00:00"),
            end: make_datetime("2025-01-01 00:00:00"),
            credits_per_hour: dec(rate),
            description: "Dirt".to_string(),
        }])
        .unwrap()
    }

    #[test]
    fn test_interval_inside_event_is_all_event() {
        let mut acc = WorkSummaryAccumulator::new(Some(event_2024()), &NoCredits);
        acc.accrue(
            1,
            make_datetime("2024-08-25 10:00:00"),
            make_datetime("2024-08-25 14:00:00"),
            true,
        )
        .unwrap();
        let summary = acc.finish();
        assert_eq!(summary.event_duration, 4 * 3600);
        assert_eq!(summary.pre_event_duration, 0);
        assert_eq!(summary.post_event_duration, 0);
    }

    #[test]
    fn test_interval_spanning_event_start() {
        let mut acc = WorkSummaryAccumulator::new(Some(event_2024()), &NoCredits);
        acc.accrue(
            1,
            make_datetime("2024-08-19 22:00:00"),
            make_datetime("2024-08-20 02:00:00"),
            true,
        )
        .unwrap();
        let summary = acc.finish();
        assert_eq!(summary.pre_event_duration, 2 * 3600);
        assert_eq!(summary.event_duration, 2 * 3600);
    }

    #[test]
    fn test_interval_spanning_whole_event_splits_three_ways() {
        let mut acc = WorkSummaryAccumulator::new(Some(event_2024()), &NoCredits);
        let delta = acc
            .accrue(
                1,
                make_datetime("2024-08-19 23:00:00"),
                make_datetime("2024-09-03 01:00:00"),
                true,
            )
            .unwrap();
        assert_eq!(delta.pre_event_duration, 3600);
        assert_eq!(delta.event_duration, 14 * 24 * 3600);
        assert_eq!(delta.post_event_duration, 3600);
    }

    #[test]
    fn test_interval_after_event_is_post_event() {
        let mut acc = WorkSummaryAccumulator::new(Some(event_2024()), &NoCredits);
        acc.accrue(
            1,
            make_datetime("2024-09-05 10:00:00"),
            make_datetime("2024-09-05 12:00:00"),
            true,
        )
        .unwrap();
        assert_eq!(acc.summary().post_event_duration, 7200);
        assert_eq!(acc.summary().event_duration, 0);
    }

    #[test]
    fn test_non_counted_interval_goes_to_other() {
        let schedule = flat_schedule("2.0");
        let mut acc = WorkSummaryAccumulator::new(Some(event_2024()), &schedule);
        acc.accrue(
            1,
            make_datetime("2024-08-19 22:00:00"),
            make_datetime("2024-08-20 02:00:00"),
            false,
        )
        .unwrap();
        let summary = acc.finish();
        assert_eq!(summary.other_duration, 4 * 3600);
        assert_eq!(summary.counted_duration(), 0);
        assert!(summary.total_credits().is_zero());
    }

    #[test]
    fn test_credits_accrue_per_bucket() {
        let schedule = flat_schedule("2.0");
        let mut acc = WorkSummaryAccumulator::new(Some(event_2024()), &schedule);
        acc.accrue(
            1,
            make_datetime("2024-08-19 22:00:00"),
            make_datetime("2024-08-20 03:00:00"),
            true,
        )
        .unwrap();
        let summary = acc.finish();
        assert_eq!(summary.pre_event_credits, dec("4.00"));
        assert_eq!(summary.event_credits, dec("6.00"));
        assert!(summary.post_event_credits.is_zero());
    }

    #[test]
    fn test_missing_event_window_treats_everything_as_event() {
        let mut acc = WorkSummaryAccumulator::new(None, &NoCredits);
        acc.accrue(
            1,
            make_datetime("2019-01-01 10:00:00"),
            make_datetime("2019-01-01 11:00:00"),
            true,
        )
        .unwrap();
        assert_eq!(acc.finish().event_duration, 3600);
    }

    #[test]
    fn test_end_before_start_fails_without_recording() {
        let mut acc = WorkSummaryAccumulator::new(Some(event_2024()), &NoCredits);
        let result = acc.accrue(
            4,
            make_datetime("2024-08-25 14:00:00"),
            make_datetime("2024-08-25 10:00:00"),
            true,
        );
        assert!(matches!(
            result,
            Err(EngineError::InvalidInterval { position_id: 4, .. })
        ));
        assert_eq!(acc.finish(), WorkSummary::default());
    }

    #[test]
    fn test_no_intervals_is_all_zero() {
        let acc = WorkSummaryAccumulator::new(Some(event_2024()), &NoCredits);
        assert_eq!(acc.finish(), WorkSummary::default());
    }

    #[test]
    fn test_zero_length_interval_adds_nothing() {
        let mut acc = WorkSummaryAccumulator::new(Some(event_2024()), &NoCredits);
        let at = make_datetime("2024-08-20 00:00:00");
        let delta = acc.accrue(1, at, at, true).unwrap();
        assert_eq!(delta, WorkSummary::default());
    }

    #[test]
    fn test_fractional_seconds_across_event_start_keep_exact_total() {
        let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").unwrap();
        let start = at("2024-08-19 23:59:58.600");
        let end = at("2024-08-20 00:00:01.600");

        let mut acc = WorkSummaryAccumulator::new(Some(event_2024()), &NoCredits);
        let delta = acc.accrue(1, start, end, true).unwrap();

        assert_eq!(delta.pre_event_duration, 2);
        assert_eq!(delta.event_duration, 1);
        assert_eq!(delta.counted_duration(), (end - start).num_seconds());
    }

    #[test]
    fn test_open_interval_uses_now() {
        let mut acc = WorkSummaryAccumulator::new(Some(event_2024()), &NoCredits);
        let on_duty = make_datetime("2024-08-25 10:00:00");
        let interval = DutyInterval::open(1, on_duty);
        acc.accrue_interval(&interval, on_duty + chrono::Duration::hours(3))
            .unwrap();
        assert_eq!(acc.finish().event_duration, 3 * 3600);
    }

    #[test]
    fn test_advancing_now_never_decreases_totals() {
        let schedule = flat_schedule("1.5");
        let closed = DutyInterval::closed(
            1,
            make_datetime("2024-08-18 08:00:00"),
            make_datetime("2024-08-18 12:00:00"),
        )
        .unwrap();
        let open = DutyInterval::open(1, make_datetime("2024-09-02 20:00:00"));

        let run = |now: NaiveDateTime| {
            let mut acc = WorkSummaryAccumulator::new(Some(event_2024()), &schedule);
            acc.accrue_interval(&closed, now).unwrap();
            acc.accrue_interval(&open, now).unwrap();
            acc.finish()
        };

        let earlier = run(make_datetime("2024-09-02 23:00:00"));
        let later = run(make_datetime("2024-09-03 02:00:00"));

        assert!(later.pre_event_duration >= earlier.pre_event_duration);
        assert!(later.event_duration >= earlier.event_duration);
        assert!(later.post_event_duration >= earlier.post_event_duration);
        assert!(later.event_credits >= earlier.event_credits);
        assert_eq!(later.post_event_duration, 2 * 3600);
    }

    proptest! {
        #[test]
        fn prop_counted_partition_is_exact(offset in -20_000i64..40_000, len in 0i64..40_000) {
            let start = make_datetime("2024-08-15 00:00:00") + chrono::Duration::minutes(offset);
            let end = start + chrono::Duration::minutes(len);
            let mut acc = WorkSummaryAccumulator::new(Some(event_2024()), &NoCredits);
            let delta = acc.accrue(1, start, end, true).unwrap();
            prop_assert_eq!(
                delta.pre_event_duration + delta.event_duration + delta.post_event_duration,
                (end - start).num_seconds()
            );
            prop_assert_eq!(delta.other_duration, 0);
        }

        #[test]
        fn prop_non_counted_only_touches_other(offset in -20_000i64..40_000, len in 0i64..40_000) {
            let start = make_datetime("2024-08-15 00:00:00") + chrono::Duration::minutes(offset);
            let end = start + chrono::Duration::minutes(len);
            let schedule = flat_schedule("1.0");
            let mut acc = WorkSummaryAccumulator::new(Some(event_2024()), &schedule);
            acc.accrue(1, make_datetime("2024-08-25 10:00:00"), make_datetime("2024-08-25 12:00:00"), true).unwrap();
            let before = acc.summary().clone();
            acc.accrue(1, start, end, false).unwrap();
            let after = acc.summary();
            prop_assert_eq!(after.pre_event_duration, before.pre_event_duration);
            prop_assert_eq!(after.event_duration, before.event_duration);
            prop_assert_eq!(after.post_event_duration, before.post_event_duration);
            prop_assert_eq!(after.total_credits(), before.total_credits());
            prop_assert_eq!(after.other_duration, before.other_duration + (end - start).num_seconds());
        }
    }
}
