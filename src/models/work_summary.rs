//! Work summary result model.
//!
//! A [`WorkSummary`] holds one person's totals per event phase. Durations are
//! whole seconds; credits are decimal points.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::EventPhase;

/// Totals of duration and credits per event phase.
///
/// `other_duration` holds time worked in positions that do not count toward
/// hours; it never earns credits.
///
/// # Example
///
/// ```
/// use duty_engine::models::WorkSummary;
///
/// let summary = WorkSummary::default();
/// assert_eq!(summary.counted_duration(), 0);
/// assert!(summary.total_credits().is_zero());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkSummary {
    /// Seconds worked before the event.
    pub pre_event_duration: i64,
    /// Credits earned before the event.
    pub pre_event_credits: Decimal,
    /// Seconds worked during the event.
    pub event_duration: i64,
    /// Credits earned during the event.
    pub event_credits: Decimal,
    /// Seconds worked after the event.
    pub post_event_duration: i64,
    /// Credits earned after the event.
    pub post_event_credits: Decimal,
    /// Seconds worked in positions that do not count toward hours.
    pub other_duration: i64,
}

impl WorkSummary {
    /// Seconds across the pre-event, event and post-event buckets.
    pub fn counted_duration(&self) -> i64 {
        self.pre_event_duration + self.event_duration + self.post_event_duration
    }

    /// Credits across all buckets.
    pub fn total_credits(&self) -> Decimal {
        self.pre_event_credits + self.event_credits + self.post_event_credits
    }

    /// Seconds recorded for one phase.
    pub fn duration_for(&self, phase: EventPhase) -> i64 {
        match phase {
            EventPhase::PreEvent => self.pre_event_duration,
            EventPhase::Event => self.event_duration,
            EventPhase::PostEvent => self.post_event_duration,
        }
    }

    /// Credits recorded for one phase.
    pub fn credits_for(&self, phase: EventPhase) -> Decimal {
        match phase {
            EventPhase::PreEvent => self.pre_event_credits,
            EventPhase::Event => self.event_credits,
            EventPhase::PostEvent => self.post_event_credits,
        }
    }

    /// Adds another summary's totals into this one.
    pub fn merge(&mut self, other: &WorkSummary) {
        self.pre_event_duration += other.pre_event_duration;
        self.pre_event_credits += other.pre_event_credits;
        self.event_duration += other.event_duration;
        self.event_credits += other.event_credits;
        self.post_event_duration += other.post_event_duration;
        self.post_event_credits += other.post_event_credits;
        self.other_duration += other.other_duration;
    }
}

/// Converts seconds to hours.
///
/// ```
/// use duty_engine::models::seconds_to_hours;
/// use rust_decimal::Decimal;
///
/// assert_eq!(seconds_to_hours(5400), Decimal::new(15, 1));
/// ```
pub fn seconds_to_hours(seconds: i64) -> Decimal {
    Decimal::new(seconds, 0) / Decimal::new(3600, 0)
}
