//! Duty interval, time window and timesheet entry models.
//!
//! A [`DutyInterval`] is one worked or scheduled period in a single position.
//! Its end may be missing while the person is still on duty; the engine never
//! reads the wall clock, so callers resolve an open end with an explicit `now`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Identifier of a position (e.g. "Dirt", "Green Dot") in the reference data.
pub type PositionId = i64;

/// Identifier of a person in the reference data.
pub type PersonId = i64;

fn default_counts_toward_hours() -> bool {
    true
}

/// A closed window of time `[start, end]`.
///
/// # Example
///
/// ```
/// use duty_engine::models::TimeWindow;
/// use chrono::NaiveDateTime;
///
/// let window = TimeWindow {
///     start: NaiveDateTime::parse_from_str("2024-08-25 10:00:00", "%Y-%m-%d %H:%M:%S").unwrap(),
///     end: NaiveDateTime::parse_from_str("2024-08-25 14:00:00", "%Y-%m-%d %H:%M:%S").unwrap(),
/// };
/// assert_eq!(window.duration_seconds(), 4 * 3600);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    /// The first instant of the window.
    pub start: NaiveDateTime,
    /// The last instant of the window.
    pub end: NaiveDateTime,
}

impl TimeWindow {
    /// A zero-length window at a single instant.
    pub fn at(instant: NaiveDateTime) -> Self {
        Self {
            start: instant,
            end: instant,
        }
    }

    /// Returns `true` when `instant` falls inside the window, boundaries included.
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        instant >= self.start && instant <= self.end
    }

    /// The length of the window in seconds.
    pub fn duration_seconds(&self) -> i64 {
        (self.end - self.start).num_seconds()
    }
}

/// One clocked or scheduled period for a person in one position.
///
/// # Example
///
/// ```
/// use duty_engine::models::DutyInterval;
/// use chrono::NaiveDateTime;
///
/// let on = NaiveDateTime::parse_from_str("2024-08-25 10:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// let now = NaiveDateTime::parse_from_str("2024-08-25 13:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
///
/// let interval = DutyInterval::open(1, on);
/// assert!(interval.is_open());
/// assert_eq!(interval.duration_seconds(now).unwrap(), 3 * 3600);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyInterval {
    /// The position worked.
    pub position_id: PositionId,
    /// Clock-in instant.
    pub start: NaiveDateTime,
    /// Clock-out instant, `None` while still on duty.
    #[serde(default)]
    pub end: Option<NaiveDateTime>,
    /// Whether the interval counts toward hours and credits.
    #[serde(default = "default_counts_toward_hours")]
    pub counts_toward_hours: bool,
}

impl DutyInterval {
    /// Creates a closed interval, rejecting one that ends before it starts.
    pub fn closed(
        position_id: PositionId,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> EngineResult<Self> {
        ensure_ordered(position_id, start, end)?;
        Ok(Self {
            position_id,
            start,
            end: Some(end),
            counts_toward_hours: true,
        })
    }

    /// Creates an interval that is still on duty.
    pub fn open(position_id: PositionId, start: NaiveDateTime) -> Self {
        Self {
            position_id,
            start,
            end: None,
            counts_toward_hours: true,
        }
    }

    /// Marks whether the interval counts toward hours.
    pub fn with_counts_toward_hours(mut self, counts: bool) -> Self {
        self.counts_toward_hours = counts;
        self
    }

    /// Returns `true` when there is no clock-out yet.
    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// The clock-out instant, or `now` for an open interval.
    pub fn end_or(&self, now: NaiveDateTime) -> NaiveDateTime {
        self.end.unwrap_or(now)
    }

    /// Resolves the interval to a closed window, substituting `now` for a
    /// missing end.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidInterval`] when the resolved end precedes the start.
    pub fn resolve(&self, now: NaiveDateTime) -> EngineResult<TimeWindow> {
        let end = self.end_or(now);
        ensure_ordered(self.position_id, self.start, end)?;
        Ok(TimeWindow {
            start: self.start,
            end,
        })
    }

    /// Duration in seconds, resolving an open end with `now`.
    pub fn duration_seconds(&self, now: NaiveDateTime) -> EngineResult<i64> {
        self.resolve(now).map(|w| w.duration_seconds())
    }
}

pub(crate) fn ensure_ordered(
    position_id: PositionId,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> EngineResult<()> {
    if end < start {
        return Err(EngineError::InvalidInterval {
            position_id,
            message: format!("end {} is before start {}", end, start),
        });
    }
    Ok(())
}

/// A timesheet row as supplied by the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimesheetEntry {
    /// Timesheet row identifier.
    pub entry_id: i64,
    /// The person who worked the entry.
    pub person_id: PersonId,
    /// The person's callsign, used for display and ordering.
    pub callsign: String,
    /// The position worked.
    pub position_id: PositionId,
    /// Clock-in instant.
    pub on_duty: NaiveDateTime,
    /// Clock-out instant, `None` while still on duty.
    #[serde(default)]
    pub off_duty: Option<NaiveDateTime>,
    /// Whether the position counts toward hours and credits.
    #[serde(default = "default_counts_toward_hours")]
    pub counts_toward_hours: bool,
}

impl TimesheetEntry {
    /// Converts the row into the engine's interval type.
    pub fn to_interval(&self) -> DutyInterval {
        DutyInterval {
            position_id: self.position_id,
            start: self.on_duty,
            end: self.off_duty,
            counts_toward_hours: self.counts_toward_hours,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_datetime(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_closed_interval_rejects_end_before_start() {
        let result = DutyInterval::closed(
            7,
            make_datetime("2024-08-25 10:00:00"),
            make_datetime("2024-08-25 09:00:00"),
        );
        assert!(matches!(
            result,
            Err(EngineError::InvalidInterval { position_id: 7, .. })
        ));
    }

    #[test]
    fn test_zero_length_interval_is_valid() {
        let at = make_datetime("2024-08-25 10:00:00");
        let interval = DutyInterval::closed(1, at, at).unwrap();
        assert_eq!(interval.duration_seconds(at).unwrap(), 0);
    }

    #[test]
    fn test_closed_interval_ignores_now() {
        let interval = DutyInterval::closed(
            1,
            make_datetime("2024-08-25 10:00:00"),
            make_datetime("2024-08-25 12:00:00"),
        )
        .unwrap();
        let now = make_datetime("2024-08-30 00:00:00");
        assert_eq!(interval.duration_seconds(now).unwrap(), 7200);
    }

    #[test]
    fn test_open_interval_uses_now() {
        let interval = DutyInterval::open(1, make_datetime("2024-08-25 10:00:00"));
        let window = interval.resolve(make_datetime("2024-08-25 10:30:00")).unwrap();
        assert_eq!(window.end, make_datetime("2024-08-25 10:30:00"));
        assert_eq!(window.duration_seconds(), 1800);
    }

    #[test]
    fn test_open_interval_with_now_before_start_is_invalid() {
        let interval = DutyInterval::open(3, make_datetime("2024-08-25 10:00:00"));
        assert!(interval.resolve(make_datetime("2024-08-25 09:00:00")).is_err());
    }

    #[test]
    fn test_time_window_contains_boundaries() {
        let window = TimeWindow {
            start: make_datetime("2024-08-25 10:00:00"),
            end: make_datetime("2024-08-25 12:00:00"),
        };
        assert!(window.contains(window.start));
        assert!(window.contains(window.end));
        assert!(!window.contains(make_datetime("2024-08-25 12:00:01")));
    }

    #[test]
    fn test_timesheet_entry_to_interval() {
        let entry = TimesheetEntry {
            entry_id: 10,
            person_id: 42,
            callsign: "Hubcap".to_string(),
            position_id: 1,
            on_duty: make_datetime("2024-08-25 10:00:00"),
            off_duty: None,
            counts_toward_hours: false,
        };
        let interval = entry.to_interval();
        assert_eq!(interval.position_id, 1);
        assert!(interval.is_open());
        assert!(!interval.counts_toward_hours);
    }

    #[test]
    fn test_interval_deserialization_defaults() {
        let json = r#"{
            "position_id": 1,
            "start": "2024-08-25T10:00:00"
        }"#;
        let interval: DutyInterval = serde_json::from_str(json).unwrap();
        assert!(interval.is_open());
        assert!(interval.counts_toward_hours);
    }
}
