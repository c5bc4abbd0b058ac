//! Position credit lookup.
//!
//! Credits are a position- and time-dependent point value. The accumulator
//! only needs the [`CreditRate`] capability; [`PositionCreditSchedule`] is the
//! table-backed implementation built from configuration.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{PositionId, seconds_to_hours};

/// Source of credits-per-hour for a position at an instant.
///
/// Implementors describe a piecewise-constant rate: `rate_at` is constant from
/// `instant` until `next_change_after(instant)`.
pub trait CreditRate {
    /// Credits per hour for `position_id` at `instant`, `None` when unscheduled.
    fn rate_at(&self, position_id: PositionId, instant: NaiveDateTime) -> Option<Decimal>;

    /// The next instant strictly after `instant` at which the rate may change.
    fn next_change_after(
        &self,
        position_id: PositionId,
        instant: NaiveDateTime,
    ) -> Option<NaiveDateTime>;

    /// Credits earned in `[start, end)`, integrating the rate piecewise.
    ///
    /// Unscheduled stretches earn nothing.
    fn credits_between(
        &self,
        position_id: PositionId,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Decimal {
        let mut total = Decimal::ZERO;
        let mut cursor = start;
        while cursor < end {
            let segment_end = self
                .next_change_after(position_id, cursor)
                .filter(|&t| t > cursor && t < end)
                .unwrap_or(end);
            if let Some(rate) = self.rate_at(position_id, cursor) {
                total += seconds_to_hours((segment_end - cursor).num_seconds()) * rate;
            }
            cursor = segment_end;
        }
        total
    }
}

/// A credit source that never awards credits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCredits;

impl CreditRate for NoCredits {
    fn rate_at(&self, _position_id: PositionId, _instant: NaiveDateTime) -> Option<Decimal> {
        None
    }

    fn next_change_after(
        &self,
        _position_id: PositionId,
        _instant: NaiveDateTime,
    ) -> Option<NaiveDateTime> {
        None
    }
}

/// One row of the credit schedule: `credits_per_hour` for `position_id`
/// during `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionCredit {
    /// The position the rate applies to.
    pub position_id: PositionId,
    /// First instant the rate applies.
    pub start: NaiveDateTime,
    /// First instant the rate no longer applies.
    pub end: NaiveDateTime,
    /// Credits earned per hour worked.
    pub credits_per_hour: Decimal,
    /// Label shown on the schedule, e.g. "Dirt - Night".
    #[serde(default)]
    pub description: String,
}

/// Credit schedule indexed by position.
///
/// # Example
///
/// ```
/// use duty_engine::calculation::{CreditRate, PositionCredit, PositionCreditSchedule};
/// use chrono::NaiveDateTime;
/// use rust_decimal::Decimal;
///
/// let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
/// let schedule = PositionCreditSchedule::from_rows(vec![PositionCredit {
///     position_id: 1,
///     start: at("2024-08-20 00:00:00"),
///     end: at("2024-09-03 00:00:00"),
///     credits_per_hour: Decimal::new(2, 0),
///     description: "Dirt".to_string(),
/// }]).unwrap();
///
/// let credits = schedule.credits_between(1, at("2024-08-25 10:00:00"), at("2024-08-25 13:00:00"));
/// assert_eq!(credits, Decimal::new(6, 0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PositionCreditSchedule {
    by_position: HashMap<PositionId, Vec<PositionCredit>>,
}

impl PositionCreditSchedule {
    /// Builds a schedule from configuration rows.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidConfiguration`] when a row does not end after it
    /// starts or has a negative rate.
    pub fn from_rows(rows: Vec<PositionCredit>) -> EngineResult<Self> {
        let mut by_position: HashMap<PositionId, Vec<PositionCredit>> = HashMap::new();
        for row in rows {
            if row.end <= row.start {
                return Err(EngineError::InvalidConfiguration {
                    message: format!(
                        "credit row '{}' for position {} ends at {} before it starts at {}",
                        row.description, row.position_id, row.end, row.start
                    ),
                });
            }
            if row.credits_per_hour.is_sign_negative() {
                return Err(EngineError::InvalidConfiguration {
                    message: format!(
                        "credit row '{}' for position {} has a negative rate",
                        row.description, row.position_id
                    ),
                });
            }
            by_position.entry(row.position_id).or_default().push(row);
        }
        for rows in by_position.values_mut() {
            rows.sort_by_key(|r| r.start);
        }
        Ok(Self { by_position })
    }

    /// Number of rows in the schedule.
    pub fn len(&self) -> usize {
        self.by_position.values().map(Vec::len).sum()
    }

    /// Returns `true` when the schedule has no rows.
    pub fn is_empty(&self) -> bool {
        self.by_position.is_empty()
    }

    fn rows_for(&self, position_id: PositionId) -> &[PositionCredit] {
        self.by_position
            .get(&position_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl CreditRate for PositionCreditSchedule {
    fn rate_at(&self, position_id: PositionId, instant: NaiveDateTime) -> Option<Decimal> {
        self.rows_for(position_id)
            .iter()
            .find(|r| r.start <= instant && instant < r.end)
            .map(|r| r.credits_per_hour)
    }

    fn next_change_after(
        &self,
        position_id: PositionId,
        instant: NaiveDateTime,
    ) -> Option<NaiveDateTime> {
        self.rows_for(position_id)
            .iter()
            .flat_map(|r| [r.start, r.end])
            .filter(|&t| t > instant)
            .min()
    }
}
