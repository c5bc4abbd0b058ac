//! Sign-ups nobody turned up for.

use std::collections::HashMap;
use std::time::Instant;

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::info;

use crate::calculation::{OpenEnd, classify_overlap};
use crate::models::{PersonId, PositionId, SignUp, Slot, TimesheetEntry};

use super::ReportMeta;
use super::grouping::{compare_callsigns, group_by};

/// One person's missed slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonNoShows {
    /// The person.
    pub person_id: PersonId,
    /// The person's callsign.
    pub callsign: String,
    /// Missed slots ordered by start.
    pub slots: Vec<Slot>,
}

/// Everyone who missed a slot they signed up for.
#[derive(Debug, Clone, Serialize)]
pub struct NoShowReport {
    /// Run identification.
    #[serde(flatten)]
    pub meta: ReportMeta,
    /// One row per person, ordered by callsign.
    pub people: Vec<PersonNoShows>,
    /// Total missed slots.
    pub total: usize,
}

/// Builds the no-show report.
///
/// A sign-up is a no-show once its slot has begun by `now` and the person
/// has no timesheet entry in the slot's position overlapping the slot.
/// Entries still open are treated as ending at `now`.
pub fn no_show_report(
    sign_ups: &[SignUp],
    entries: &[TimesheetEntry],
    now: NaiveDateTime,
) -> NoShowReport {
    let started = Instant::now();
    let meta = ReportMeta::new(now);

    let mut worked: HashMap<(PersonId, PositionId), Vec<&TimesheetEntry>> = HashMap::new();
    for entry in entries {
        worked
            .entry((entry.person_id, entry.position_id))
            .or_default()
            .push(entry);
    }

    let missed = sign_ups.iter().filter(|s| s.slot.begins <= now).filter(|s| {
        let slot = s.slot.window();
        !worked
            .get(&(s.person_id, s.slot.position_id))
            .is_some_and(|rows| {
                rows.iter().any(|e| {
                    classify_overlap(&slot, e.on_duty, e.off_duty, OpenEnd::Now(now))
                        .is_overlap()
                })
            })
    });

    let mut people: Vec<PersonNoShows> = group_by(missed, |s| s.person_id)
        .into_iter()
        .map(|(person_id, rows)| {
            let callsign = rows[0].callsign.clone();
            let mut slots: Vec<Slot> = rows.into_iter().map(|s| s.slot.clone()).collect();
            slots.sort_by_key(|s| (s.begins, s.slot_id));
            PersonNoShows {
                person_id,
                callsign,
                slots,
            }
        })
        .collect();
    people.sort_by(|a, b| compare_callsigns(&a.callsign, &b.callsign));

    let total = people.iter().map(|p| p.slots.len()).sum();

    info!(
        report_id = %meta.report_id,
        sign_ups = sign_ups.len(),
        people = people.len(),
        total,
        duration_us = started.elapsed().as_micros(),
        "No-show report generated"
    );

    NoShowReport {
        meta,
        people,
        total,
    }
}
