//! Payroll shift result models.
//!
//! A [`PayrollShift`] is what the payroll splitter derives from one duty
//! interval: zero, one or two reportable sub-shifts plus the notes that explain
//! every adjustment.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::PositionId;

/// Which part of a shift a sub-shift represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubShiftLabel {
    /// The shift was not split.
    Whole,
    /// The part before the meal break.
    FirstHalf,
    /// The part after the meal break.
    SecondHalf,
}

/// One reportable piece of a payroll shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubShift {
    /// Which part of the shift this is.
    pub label: SubShiftLabel,
    /// Reported clock-in.
    pub on_duty: NaiveDateTime,
    /// Reported clock-out.
    pub off_duty: NaiveDateTime,
    /// Paid seconds.
    pub duration: i64,
}

impl SubShift {
    pub(crate) fn new(label: SubShiftLabel, on_duty: NaiveDateTime, off_duty: NaiveDateTime) -> Self {
        Self {
            label,
            on_duty,
            off_duty,
            duration: (off_duty - on_duty).num_seconds(),
        }
    }
}

/// A duty interval reshaped for payroll.
///
/// # Example
///
/// ```
/// use duty_engine::models::PayrollShift;
///
/// let shift = PayrollShift::empty(1, vec!["outside pay period".to_string()]);
/// assert!(shift.is_empty());
/// assert_eq!(shift.duration, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollShift {
    /// The position worked.
    pub position_id: PositionId,
    /// Reportable pieces, in chronological order.
    pub sub_shifts: Vec<SubShift>,
    /// Total paid seconds across all sub-shifts.
    pub duration: i64,
    /// Adjustments applied, most recent first.
    pub notes: Vec<String>,
}

impl PayrollShift {
    /// A shift with nothing to report.
    pub fn empty(position_id: PositionId, notes: Vec<String>) -> Self {
        Self {
            position_id,
            sub_shifts: Vec::new(),
            duration: 0,
            notes,
        }
    }

    /// Returns `true` when there is nothing to report.
    pub fn is_empty(&self) -> bool {
        self.sub_shifts.is_empty()
    }

    /// Returns `true` when the shift was split around a meal break.
    pub fn has_meal_break(&self) -> bool {
        self.sub_shifts
            .iter()
            .any(|s| s.label == SubShiftLabel::SecondHalf)
    }

    /// The notes joined for display.
    pub fn notes_text(&self) -> String {
        self.notes.join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_datetime(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_sub_shift_duration() {
        let sub = SubShift::new(
            SubShiftLabel::Whole,
            make_datetime("2024-08-25 08:00:00"),
            make_datetime("2024-08-25 12:30:00"),
        );
        assert_eq!(sub.duration, 16200);
    }

    #[test]
    fn test_has_meal_break() {
        let shift = PayrollShift {
            position_id: 1,
            sub_shifts: vec![
                SubShift::new(
                    SubShiftLabel::FirstHalf,
                    make_datetime("2024-08-25 08:00:00"),
                    make_datetime("2024-08-25 12:00:00"),
                ),
                SubShift::new(
                    SubShiftLabel::SecondHalf,
                    make_datetime("2024-08-25 12:30:00"),
                    make_datetime("2024-08-25 18:30:00"),
                ),
            ],
            duration: 36000,
            notes: vec![],
        };
        assert!(shift.has_meal_break());
        assert!(!shift.is_empty());
    }

    #[test]
    fn test_notes_text() {
        let shift = PayrollShift::empty(
            1,
            vec![
                "entry capped at 12 hours".to_string(),
                "split start time - original was 2024-08-17 20:00:00".to_string(),
            ],
        );
        assert_eq!(
            shift.notes_text(),
            "entry capped at 12 hours; split start time - original was 2024-08-17 20:00:00"
        );
    }

    #[test]
    fn test_label_serialization() {
        let json = serde_json::to_string(&SubShiftLabel::SecondHalf).unwrap();
        assert_eq!(json, "\"second_half\"");
    }
}
