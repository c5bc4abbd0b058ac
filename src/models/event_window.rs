//! Event window model.
//!
//! The event window partitions time into pre-event, event and post-event
//! phases for one year. It is half-open: `event_start` belongs to the event,
//! `event_end` belongs to post-event.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The phase of the annual timeline an instant falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventPhase {
    /// Before the event begins.
    PreEvent,
    /// During the event.
    Event,
    /// After the event ends.
    PostEvent,
}

/// The official event boundary for one year.
///
/// # Example
///
/// ```
/// use duty_engine::models::{EventPhase, EventWindow};
/// use chrono::{NaiveDate, NaiveDateTime};
///
/// let window = EventWindow::from_dates(
///     NaiveDate::from_ymd_opt(2024, 8, 20).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 9, 2).unwrap(),
/// ).unwrap();
///
/// let labor_day = NaiveDateTime::parse_from_str("2024-09-02 18:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// assert_eq!(window.phase_of(labor_day), EventPhase::Event);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventWindow {
    /// The year this window belongs to.
    pub year: i32,
    /// First instant of the event.
    pub event_start: NaiveDateTime,
    /// First instant after the event.
    pub event_end: NaiveDateTime,
}

impl EventWindow {
    /// Builds a window covering whole calendar days, `first_day` through
    /// `last_day` inclusive.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidConfiguration`] when `last_day` precedes `first_day`.
    pub fn from_dates(first_day: NaiveDate, last_day: NaiveDate) -> EngineResult<Self> {
        if last_day < first_day {
            return Err(EngineError::InvalidConfiguration {
                message: format!(
                    "event window ends on {} before it starts on {}",
                    last_day, first_day
                ),
            });
        }
        let after_last = last_day
            .succ_opt()
            .ok_or_else(|| EngineError::InvalidConfiguration {
                message: format!("event window end {} is out of range", last_day),
            })?;
        Ok(Self {
            year: first_day.year(),
            event_start: first_day.and_time(chrono::NaiveTime::MIN),
            event_end: after_last.and_time(chrono::NaiveTime::MIN),
        })
    }

    /// Returns the phase `instant` belongs to.
    pub fn phase_of(&self, instant: NaiveDateTime) -> EventPhase {
        if instant < self.event_start {
            EventPhase::PreEvent
        } else if instant < self.event_end {
            EventPhase::Event
        } else {
            EventPhase::PostEvent
        }
    }
}
