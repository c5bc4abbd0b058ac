//! Payroll shift splitting.
//!
//! This module turns one duty interval into payroll-reportable sub-shifts:
//!
//! 1. clip the interval to the pay period,
//! 2. split long shifts that clock in during a meal window around the meal
//!    break, pushing the remainder of the shift later by the break length,
//! 3. cap the paid length unless the position is exempt.
//!
//! Every adjustment leaves a note; notes are returned most recent first.

use chrono::{Duration, NaiveDateTime, SubsecRound, Timelike};

use crate::error::EngineResult;
use crate::models::{DutyInterval, PayPeriod, PayrollShift, SubShift, SubShiftLabel, TimeWindow};

use super::overlap::intersection;

/// Minimum clipped length, in hours, before a meal break is inserted.
pub const MEAL_BREAK_MIN_SHIFT_HOURS: i64 = 6;

/// Splits `interval` for payroll within `pay_period`.
///
/// An open interval is closed at `now`. An interval that shares no time with
/// the period produces an empty [`PayrollShift`] rather than an error.
///
/// # Errors
///
/// - [`crate::error::EngineError::InvalidConfiguration`] when the pay period
///   ends before it starts or has a zero hour cap.
/// - [`crate::error::EngineError::InvalidInterval`] when the interval ends
///   before it starts.
///
/// # Example
///
/// ```
/// use duty_engine::calculation::split_shift;
/// use duty_engine::models::{DutyInterval, PayPeriod, SubShiftLabel};
/// use chrono::NaiveDateTime;
///
/// let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
/// let period = PayPeriod::new(at("2024-08-18 00:00:00"), at("2024-08-31 23:59:59"));
/// let interval = DutyInterval::closed(1, at("2024-08-25 08:00:00"), at("2024-08-25 18:00:00")).unwrap();
///
/// let shift = split_shift(&interval, &period, at("2024-09-10 00:00:00")).unwrap();
/// assert_eq!(shift.sub_shifts.len(), 2);
/// assert_eq!(shift.sub_shifts[0].off_duty, at("2024-08-25 12:00:00"));
/// assert_eq!(shift.sub_shifts[1].on_duty, at("2024-08-25 12:30:00"));
/// assert_eq!(shift.sub_shifts[1].off_duty, at("2024-08-25 18:30:00"));
/// assert_eq!(shift.sub_shifts[1].label, SubShiftLabel::SecondHalf);
/// ```
pub fn split_shift(
    interval: &DutyInterval,
    pay_period: &PayPeriod,
    now: NaiveDateTime,
) -> EngineResult<PayrollShift> {
    pay_period.validate()?;
    let resolved = interval.resolve(now)?;
    // Whole seconds only, so sub-shift durations sum to the clipped length.
    let worked = TimeWindow {
        start: resolved.start.trunc_subsecs(0),
        end: resolved.end.trunc_subsecs(0),
    };

    let mut notes = Vec::new();
    let Some(clipped) = intersection(&pay_period.window(), &worked) else {
        notes.push("entry outside pay period".to_string());
        return Ok(PayrollShift::empty(interval.position_id, notes));
    };

    if worked.start < pay_period.start {
        notes.push(format!("split start time - original was {}", worked.start));
    }
    if worked.end > pay_period.end {
        notes.push(format!("split end time - original was {}", worked.end));
    }

    if clipped.duration_seconds() == 0 {
        notes.push("no time worked inside pay period".to_string());
        notes.reverse();
        return Ok(PayrollShift::empty(interval.position_id, notes));
    }

    let mut sub_shifts = split_for_meal(clipped, pay_period, &mut notes);

    let cap_seconds = i64::from(pay_period.hour_cap) * 3600;
    let paid: i64 = sub_shifts.iter().map(|s| s.duration).sum();
    if !pay_period.is_exempt_from_cap(interval.position_id) && paid > cap_seconds {
        apply_cap(&mut sub_shifts, cap_seconds);
        notes.push(format!("entry capped at {} hours", pay_period.hour_cap));
    }

    notes.reverse();
    let duration = sub_shifts.iter().map(|s| s.duration).sum();
    Ok(PayrollShift {
        position_id: interval.position_id,
        sub_shifts,
        duration,
        notes,
    })
}

fn split_for_meal(
    clipped: TimeWindow,
    pay_period: &PayPeriod,
    notes: &mut Vec<String>,
) -> Vec<SubShift> {
    let whole = vec![SubShift::new(SubShiftLabel::Whole, clipped.start, clipped.end)];
    let duration = clipped.duration_seconds();

    if duration < MEAL_BREAK_MIN_SHIFT_HOURS * 3600 {
        notes.push(format!(
            "no meal break - shift under {} hours",
            MEAL_BREAK_MIN_SHIFT_HOURS
        ));
        return whole;
    }
    if pay_period.meal_break_minutes == 0 {
        notes.push("no meal break - break length is zero".to_string());
        return whole;
    }

    let hour = clipped.start.hour();
    let Some(meal) = pay_period.meal_window_for(hour) else {
        notes.push(format!(
            "no meal break - start hour {:02}:00 outside meal windows",
            hour
        ));
        return whole;
    };

    let meal_at = clipped.start.date().and_time(meal.meal_time);
    if meal_at <= clipped.start || meal_at >= clipped.end {
        notes.push(format!(
            "no meal break - {} at {} falls outside shift",
            meal.name, meal_at
        ));
        return whole;
    }

    let first_half = SubShift::new(SubShiftLabel::FirstHalf, clipped.start, meal_at);
    let resume = meal_at + Duration::minutes(i64::from(pay_period.meal_break_minutes));
    let remaining = duration - first_half.duration;
    let second_half = SubShift::new(
        SubShiftLabel::SecondHalf,
        resume,
        resume + Duration::seconds(remaining),
    );

    notes.push(format!(
        "{} break of {} minutes at {}",
        meal.name, pay_period.meal_break_minutes, meal_at
    ));
    vec![first_half, second_half]
}

// Trims from the tail until the paid total equals `cap_seconds`.
fn apply_cap(sub_shifts: &mut Vec<SubShift>, cap_seconds: i64) {
    let mut remaining = cap_seconds;
    sub_shifts.retain_mut(|sub| {
        if remaining <= 0 {
            return false;
        }
        if sub.duration > remaining {
            sub.off_duty = sub.on_duty + Duration::seconds(remaining);
            sub.duration = remaining;
        }
        remaining -= sub.duration;
        true
    });
    if let [only] = sub_shifts.as_mut_slice() {
        only.label = SubShiftLabel::Whole;
    }
}
