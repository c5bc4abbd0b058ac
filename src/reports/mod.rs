//! Reports built on the calculation components.
//!
//! Each report takes flat rows from the persistence layer plus explicit
//! configuration and `now`, and returns a serializable result. Reports never
//! read the clock or the configuration files themselves.
//!
//! # Example
//!
//! ```
//! use duty_engine::calculation::NoCredits;
//! use duty_engine::models::TimesheetEntry;
//! use duty_engine::reports::hours_credits_report;
//! use chrono::NaiveDateTime;
//!
//! let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
//! let entries = vec![TimesheetEntry {
//!     entry_id: 1,
//!     person_id: 10,
//!     callsign: "Hubcap".to_string(),
//!     position_id: 1,
//!     on_duty: at("2024-08-25 10:00:00"),
//!     off_duty: Some(at("2024-08-25 14:00:00")),
//!     counts_toward_hours: true,
//! }];
//!
//! let report = hours_credits_report(&entries, 2024, None, &NoCredits, at("2024-09-10 00:00:00"));
//! assert_eq!(report.people[0].summary.event_duration, 4 * 3600);
//! ```

mod early_late;
mod grouping;
mod hours_credits;
mod no_show;
mod on_duty;
mod payroll;

use chrono::NaiveDateTime;
use serde::Serialize;
use uuid::Uuid;

pub use early_late::{CheckInIrregularity, EarlyLateReport, PersonCheckIns, early_late_report};
pub use grouping::{compare_callsigns, group_by};
pub use hours_credits::{HoursCreditsReport, PersonWorkSummary, hours_credits_report};
pub use no_show::{NoShowReport, PersonNoShows, no_show_report};
pub use on_duty::{OnDutyPerson, OnDutyReport, PositionOnDuty, on_duty_report};
pub use payroll::{PayrollReport, PersonPayroll, payroll_report};

/// Identifies one run of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportMeta {
    /// Unique identifier for this run.
    pub report_id: Uuid,
    /// The `now` the report was generated for.
    pub generated_at: NaiveDateTime,
}

impl ReportMeta {
    pub(crate) fn new(generated_at: NaiveDateTime) -> Self {
        Self {
            report_id: Uuid::new_v4(),
            generated_at,
        }
    }
}
