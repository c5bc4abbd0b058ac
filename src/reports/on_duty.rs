//! Who is on duty at a given instant.

use std::time::Instant;

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::info;

use crate::calculation::{OpenEnd, classify_overlap};
use crate::models::{PersonId, PositionId, TimeWindow, TimesheetEntry};

use super::ReportMeta;
use super::grouping::{compare_callsigns, group_by};

/// A person on duty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OnDutyPerson {
    /// The person.
    pub person_id: PersonId,
    /// The person's callsign.
    pub callsign: String,
    /// The timesheet row they are on.
    pub entry_id: i64,
    /// When they clocked in.
    pub on_duty: NaiveDateTime,
}

/// Everyone on duty in one position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionOnDuty {
    /// The position.
    pub position_id: PositionId,
    /// Number of people on duty in it.
    pub count: usize,
    /// The people, ordered by callsign.
    pub people: Vec<OnDutyPerson>,
}

/// Headcount by position at an instant.
#[derive(Debug, Clone, Serialize)]
pub struct OnDutyReport {
    /// Run identification.
    #[serde(flatten)]
    pub meta: ReportMeta,
    /// The instant reported on.
    pub at: NaiveDateTime,
    /// Positions ordered by descending headcount, then id.
    pub positions: Vec<PositionOnDuty>,
    /// Total people on duty.
    pub total: usize,
}

/// Builds the on-duty report for the instant `at`.
///
/// An entry counts when it overlaps `at`, boundaries included. Entries still
/// open are treated as running indefinitely.
pub fn on_duty_report(
    entries: &[TimesheetEntry],
    at: NaiveDateTime,
    now: NaiveDateTime,
) -> OnDutyReport {
    let started = Instant::now();
    let meta = ReportMeta::new(now);
    let instant = TimeWindow::at(at);

    let on_duty = entries.iter().filter(|e| {
        classify_overlap(&instant, e.on_duty, e.off_duty, OpenEnd::Unbounded).is_overlap()
    });

    let mut positions: Vec<PositionOnDuty> = group_by(on_duty, |e| e.position_id)
        .into_iter()
        .map(|(position_id, rows)| {
            let mut people: Vec<OnDutyPerson> = rows
                .into_iter()
                .map(|e| OnDutyPerson {
                    person_id: e.person_id,
                    callsign: e.callsign.clone(),
                    entry_id: e.entry_id,
                    on_duty: e.on_duty,
                })
                .collect();
            people.sort_by(|a, b| compare_callsigns(&a.callsign, &b.callsign));
            PositionOnDuty {
                position_id,
                count: people.len(),
                people,
            }
        })
        .collect();
    positions.sort_by(|a, b| b.count.cmp(&a.count).then(a.position_id.cmp(&b.position_id)));

    let total = positions.iter().map(|p| p.count).sum();

    info!(
        report_id = %meta.report_id,
        at = %at,
        positions = positions.len(),
        total,
        duration_us = started.elapsed().as_micros(),
        "On duty report generated"
    );

    OnDutyReport {
        meta,
        at,
        positions,
        total,
    }
}
