//! Per-person hours and credits for one event year.

use std::time::Instant;

use chrono::{Datelike, NaiveDateTime};
use serde::Serialize;
use tracing::{info, warn};

use crate::calculation::{CreditRate, WorkSummaryAccumulator};
use crate::models::{EventWindow, PersonId, TimesheetEntry, WorkSummary};

use super::ReportMeta;
use super::grouping::{compare_callsigns, group_by};

/// One person's totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonWorkSummary {
    /// The person.
    pub person_id: PersonId,
    /// The person's callsign.
    pub callsign: String,
    /// Hours and credits split by event phase.
    pub summary: WorkSummary,
}

/// Hours and credits for everyone who worked in a year.
#[derive(Debug, Clone, Serialize)]
pub struct HoursCreditsReport {
    /// Run identification.
    #[serde(flatten)]
    pub meta: ReportMeta,
    /// The year reported on.
    pub year: i32,
    /// The event window used to split phases, if the year has one.
    pub event_window: Option<EventWindow>,
    /// One row per person, ordered by callsign.
    pub people: Vec<PersonWorkSummary>,
    /// Rows left out because they end before they start.
    pub skipped_entries: usize,
}

/// Builds the hours and credits report for `year`.
///
/// Only entries clocked in during `year` are considered; open entries close at
/// `now`. Without an event window every counted second is event time.
pub fn hours_credits_report(
    entries: &[TimesheetEntry],
    year: i32,
    event_window: Option<EventWindow>,
    credits: &dyn CreditRate,
    now: NaiveDateTime,
) -> HoursCreditsReport {
    let started = Instant::now();
    let meta = ReportMeta::new(now);

    let by_person = group_by(
        entries.iter().filter(|e| e.on_duty.year() == year),
        |e| e.person_id,
    );

    let mut skipped_entries = 0;
    let mut people = Vec::with_capacity(by_person.len());
    for (person_id, rows) in by_person {
        let mut accumulator = WorkSummaryAccumulator::new(event_window, credits);
        let mut accrued = 0;
        for entry in &rows {
            match accumulator.accrue_interval(&entry.to_interval(), now) {
                Ok(_) => accrued += 1,
                Err(err) => {
                    warn!(
                        report_id = %meta.report_id,
                        entry_id = entry.entry_id,
                        person_id,
                        error = %err,
                        "Skipping timesheet entry"
                    );
                    skipped_entries += 1;
                }
            }
        }
        if accrued == 0 {
            continue;
        }
        people.push(PersonWorkSummary {
            person_id,
            callsign: rows[0].callsign.clone(),
            summary: accumulator.finish(),
        });
    }
    people.sort_by(|a, b| compare_callsigns(&a.callsign, &b.callsign));

    info!(
        report_id = %meta.report_id,
        year,
        people = people.len(),
        skipped_entries,
        has_event_window = event_window.is_some(),
        duration_us = started.elapsed().as_micros(),
        "Hours and credits report generated"
    );

    HoursCreditsReport {
        meta,
        year,
        event_window,
        people,
        skipped_entries,
    }
}
