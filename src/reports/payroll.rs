//! Payroll export for one pay period.

use std::time::Instant;

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::calculation::split_shift;
use crate::error::{EngineError, EngineResult};
use crate::models::{PayPeriod, PayrollShift, PersonId, TimesheetEntry};

use super::ReportMeta;
use super::grouping::{compare_callsigns, group_by};

/// One timesheet entry after payroll splitting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayrollEntry {
    /// The timesheet row the shift came from.
    pub entry_id: i64,
    /// The reportable shift.
    #[serde(flatten)]
    pub shift: PayrollShift,
}

/// One person's payroll lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonPayroll {
    /// The person.
    pub person_id: PersonId,
    /// The person's callsign.
    pub callsign: String,
    /// Split shifts in clock-in order.
    pub entries: Vec<PayrollEntry>,
    /// Paid seconds across all entries.
    pub total_duration: i64,
}

/// Payroll lines for everyone who worked inside a pay period.
#[derive(Debug, Clone, Serialize)]
pub struct PayrollReport {
    /// Run identification.
    #[serde(flatten)]
    pub meta: ReportMeta,
    /// First instant of the period.
    pub period_start: NaiveDateTime,
    /// Last instant of the period.
    pub period_end: NaiveDateTime,
    /// One row per person, ordered by callsign.
    pub people: Vec<PersonPayroll>,
    /// Rows left out because they end before they start.
    pub skipped_entries: usize,
}

/// Builds the payroll report for `pay_period`.
///
/// Entries sharing no time with the period are omitted, as are people left
/// with nothing to pay.
///
/// # Errors
///
/// [`EngineError::InvalidConfiguration`] when the pay period itself is invalid.
pub fn payroll_report(
    entries: &[TimesheetEntry],
    pay_period: &PayPeriod,
    now: NaiveDateTime,
) -> EngineResult<PayrollReport> {
    pay_period.validate()?;
    let started = Instant::now();
    let meta = ReportMeta::new(now);

    let mut sorted: Vec<&TimesheetEntry> = entries.iter().collect();
    sorted.sort_by_key(|e| (e.on_duty, e.entry_id));
    let by_person = group_by(sorted, |e| e.person_id);

    let mut skipped_entries = 0;
    let mut people = Vec::with_capacity(by_person.len());
    for (person_id, rows) in by_person {
        let mut lines = Vec::new();
        for entry in &rows {
            let shift = match split_shift(&entry.to_interval(), pay_period, now) {
                Ok(shift) => shift,
                Err(err @ EngineError::InvalidInterval { .. }) => {
                    warn!(
                        report_id = %meta.report_id,
                        entry_id = entry.entry_id,
                        person_id,
                        error = %err,
                        "Skipping timesheet entry"
                    );
                    skipped_entries += 1;
                    continue;
                }
                Err(err) => return Err(err),
            };
            if shift.is_empty() {
                debug!(entry_id = entry.entry_id, notes = %shift.notes_text(), "Entry not paid");
                continue;
            }
            lines.push(PayrollEntry {
                entry_id: entry.entry_id,
                shift,
            });
        }
        if lines.is_empty() {
            continue;
        }
        let total_duration = lines.iter().map(|l| l.shift.duration).sum();
        people.push(PersonPayroll {
            person_id,
            callsign: rows[0].callsign.clone(),
            entries: lines,
            total_duration,
        });
    }
    people.sort_by(|a, b| compare_callsigns(&a.callsign, &b.callsign));

    info!(
        report_id = %meta.report_id,
        period_start = %pay_period.start,
        period_end = %pay_period.end,
        people = people.len(),
        skipped_entries,
        duration_us = started.elapsed().as_micros(),
        "Payroll report generated"
    );

    Ok(PayrollReport {
        meta,
        period_start: pay_period.start,
        period_end: pay_period.end,
        people,
        skipped_entries,
    })
}
