//! Early and late sign-ins.

use std::time::Instant;

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::info;

use crate::calculation::{CheckInFinding, CheckInPolicy, evaluate_check_in};
use crate::models::{PersonId, PositionId, Slot, TimesheetEntry};

use super::ReportMeta;
use super::grouping::{compare_callsigns, group_by};

/// One sign-in outside tolerance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckInIrregularity {
    /// The timesheet row.
    pub entry_id: i64,
    /// The position signed into.
    pub position_id: PositionId,
    /// When they signed in.
    pub on_duty: NaiveDateTime,
    /// How the sign-in compared with the matched slot.
    pub finding: CheckInFinding,
}

/// One person's irregular sign-ins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonCheckIns {
    /// The person.
    pub person_id: PersonId,
    /// The person's callsign.
    pub callsign: String,
    /// Findings, largest variance first.
    pub irregularities: Vec<CheckInIrregularity>,
}

/// Everyone who signed in early or late.
#[derive(Debug, Clone, Serialize)]
pub struct EarlyLateReport {
    /// Run identification.
    #[serde(flatten)]
    pub meta: ReportMeta,
    /// One row per person, ordered by callsign.
    pub people: Vec<PersonCheckIns>,
    /// Number of entries evaluated.
    pub evaluated: usize,
}

/// Builds the early/late report.
///
/// Each entry is matched against `slots` using the person's most recent
/// clock-out before it, in any position, for the back-to-back tie-break.
pub fn early_late_report(
    entries: &[TimesheetEntry],
    slots: &[Slot],
    policy: &CheckInPolicy,
    now: NaiveDateTime,
) -> EarlyLateReport {
    let started = Instant::now();
    let meta = ReportMeta::new(now);

    let mut people = Vec::new();
    for (person_id, rows) in group_by(entries, |e| e.person_id) {
        let mut irregularities: Vec<CheckInIrregularity> = rows
            .iter()
            .filter_map(|entry| {
                let previous_off_duty = rows
                    .iter()
                    .filter(|other| other.entry_id != entry.entry_id)
                    .filter_map(|other| other.off_duty)
                    .filter(|&off| off <= entry.on_duty)
                    .max();
                let finding = evaluate_check_in(
                    entry.on_duty,
                    entry.position_id,
                    slots,
                    previous_off_duty,
                    policy,
                );
                finding.is_irregular().then(|| CheckInIrregularity {
                    entry_id: entry.entry_id,
                    position_id: entry.position_id,
                    on_duty: entry.on_duty,
                    finding,
                })
            })
            .collect();
        if irregularities.is_empty() {
            continue;
        }
        irregularities.sort_by(|a, b| {
            b.finding
                .variance_minutes()
                .cmp(&a.finding.variance_minutes())
                .then(a.on_duty.cmp(&b.on_duty))
        });
        people.push(PersonCheckIns {
            person_id,
            callsign: rows[0].callsign.clone(),
            irregularities,
        });
    }
    people.sort_by(|a, b| compare_callsigns(&a.callsign, &b.callsign));

    info!(
        report_id = %meta.report_id,
        evaluated = entries.len(),
        people = people.len(),
        duration_us = started.elapsed().as_micros(),
        "Early/late report generated"
    );

    EarlyLateReport {
        meta,
        people,
        evaluated: entries.len(),
    }
}
