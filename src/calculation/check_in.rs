//! Early and late check-in evaluation.
//!
//! A sign-in is matched to a scheduled slot in the same position whose start
//! lies within the grace window. When the sign-in sits between two such slots
//! the organization's tie-break applies: if the person's previous shift ended
//! within the look-back window they are early for the next slot, otherwise
//! they are late for the one already under way.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::{PositionId, Slot};

/// Tolerances used to judge a check-in.
///
/// # Example
///
/// ```
/// use duty_engine::calculation::CheckInPolicy;
///
/// let policy = CheckInPolicy::default();
/// assert_eq!(policy.grace_window_minutes, 120);
/// assert_eq!(policy.previous_shift_lookback_minutes, 60);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInPolicy {
    /// Minutes before a slot begins that still count as on time.
    pub early_minutes: u32,
    /// Minutes after a slot begins that still count as on time.
    pub late_minutes: u32,
    /// How far either side of a sign-in to look for a slot.
    pub grace_window_minutes: u32,
    /// How recently the previous shift must have ended for an ambiguous
    /// sign-in to count toward the next slot.
    pub previous_shift_lookback_minutes: u32,
}

impl Default for CheckInPolicy {
    fn default() -> Self {
        Self {
            early_minutes: 15,
            late_minutes: 15,
            grace_window_minutes: 120,
            previous_shift_lookback_minutes: 60,
        }
    }
}

/// The outcome of matching a sign-in to the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckInFinding {
    /// Within tolerance of the slot start.
    OnTime {
        /// The matched slot.
        slot_id: i64,
        /// When the slot began.
        slot_begins: NaiveDateTime,
    },
    /// Signed in more than `early_minutes` before the slot.
    Early {
        /// The matched slot.
        slot_id: i64,
        /// When the slot began.
        slot_begins: NaiveDateTime,
        /// Minutes before the slot start.
        minutes: i64,
    },
    /// Signed in more than `late_minutes` after the slot.
    Late {
        /// The matched slot.
        slot_id: i64,
        /// When the slot began.
        slot_begins: NaiveDateTime,
        /// Minutes after the slot start.
        minutes: i64,
    },
    /// No slot in the position began within the grace window.
    NoMatchingSlot,
}

impl CheckInFinding {
    /// Returns `true` for early and late findings.
    pub fn is_irregular(&self) -> bool {
        matches!(self, Self::Early { .. } | Self::Late { .. })
    }

    /// Minutes away from the slot start, zero when on time or unmatched.
    pub fn variance_minutes(&self) -> i64 {
        match self {
            Self::Early { minutes, .. } | Self::Late { minutes, .. } => *minutes,
            _ => 0,
        }
    }
}

/// Matches a sign-in at `on_duty` against `slots` and judges its timing.
///
/// `previous_off_duty` is when the person last clocked out before this
/// sign-in, if ever; it only matters when two slots are candidates.
///
/// # Example
///
/// ```
/// use duty_engine::calculation::{CheckInFinding, CheckInPolicy, evaluate_check_in};
/// use duty_engine::models::Slot;
/// use chrono::NaiveDateTime;
///
/// let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
/// let slots = vec![Slot {
///     slot_id: 7,
///     position_id: 1,
///     begins: at("2024-08-25 10:00:00"),
///     ends: at("2024-08-25 16:00:00"),
///     description: "Dirt - Day".to_string(),
/// }];
///
/// let finding = evaluate_check_in(at("2024-08-25 10:40:00"), 1, &slots, None, &CheckInPolicy::default());
/// assert_eq!(finding.variance_minutes(), 40);
/// assert!(matches!(finding, CheckInFinding::Late { slot_id: 7, .. }));
/// ```
pub fn evaluate_check_in(
    on_duty: NaiveDateTime,
    position_id: PositionId,
    slots: &[Slot],
    previous_off_duty: Option<NaiveDateTime>,
    policy: &CheckInPolicy,
) -> CheckInFinding {
    let grace = Duration::minutes(i64::from(policy.grace_window_minutes));
    let candidates = slots
        .iter()
        .filter(|s| s.position_id == position_id)
        .filter(|s| s.begins >= on_duty - grace && s.begins <= on_duty + grace);

    let mut current: Option<&Slot> = None;
    let mut next: Option<&Slot> = None;
    for slot in candidates {
        if slot.begins <= on_duty {
            if current.is_none_or(|c| slot.begins > c.begins) {
                current = Some(slot);
            }
        } else if next.is_none_or(|n| slot.begins < n.begins) {
            next = Some(slot);
        }
    }

    let chosen = match (current, next) {
        (Some(current), Some(next)) => {
            if worked_previous_shift(on_duty, previous_off_duty, policy) {
                next
            } else {
                current
            }
        }
        (Some(only), None) | (None, Some(only)) => only,
        (None, None) => return CheckInFinding::NoMatchingSlot,
    };

    judge(on_duty, chosen, policy)
}

fn worked_previous_shift(
    on_duty: NaiveDateTime,
    previous_off_duty: Option<NaiveDateTime>,
    policy: &CheckInPolicy,
) -> bool {
    let lookback = Duration::minutes(i64::from(policy.previous_shift_lookback_minutes));
    previous_off_duty.is_some_and(|off| off <= on_duty && off >= on_duty - lookback)
}

// Tolerances compare the exact offset; `minutes` is reported truncated.
fn judge(on_duty: NaiveDateTime, slot: &Slot, policy: &CheckInPolicy) -> CheckInFinding {
    let delta = on_duty - slot.begins;
    if delta < -Duration::minutes(i64::from(policy.early_minutes)) {
        CheckInFinding::Early {
            slot_id: slot.slot_id,
            slot_begins: slot.begins,
            minutes: -delta.num_minutes(),
        }
    } else if delta > Duration::minutes(i64::from(policy.late_minutes)) {
        CheckInFinding::Late {
            slot_id: slot.slot_id,
            slot_begins: slot.begins,
            minutes: delta.num_minutes(),
        }
    } else {
        CheckInFinding::OnTime {
            slot_id: slot.slot_id,
            slot_begins: slot.begins,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_datetime(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn slot(slot_id: i64, position_id: PositionId, begins: &str, ends: &str) -> Slot {
        Slot {
            slot_id,
            position_id,
            begins: make_datetime(begins),
            ends: make_datetime(ends),
            description: format!("slot {}", slot_id),
        }
    }

    fn back_to_back_slots() -> Vec<Slot> {
        vec![
            slot(1, 1, "2024-08-25 10:00:00", "2024-08-25 12:00:00"),
            slot(2, 1, "2024-08-25 12:00:00", "2024-08-25 18:00:00"),
        ]
    }

    #[test]
    fn test_on_time_within_tolerance() {
        let finding = evaluate_check_in(
            make_datetime("2024-08-25 09:50:00"),
            1,
            &back_to_back_slots(),
            None,
            &CheckInPolicy::default(),
        );
        assert_eq!(
            finding,
            CheckInFinding::OnTime {
                slot_id: 1,
                slot_begins: make_datetime("2024-08-25 10:00:00"),
            }
        );
        assert!(!finding.is_irregular());
    }

    #[test]
    fn test_tolerance_boundary_is_on_time() {
        let policy = CheckInPolicy::default();
        let early_edge = evaluate_check_in(
            make_datetime("2024-08-25 09:45:00"),
            1,
            &back_to_back_slots(),
            None,
            &policy,
        );
        let late_edge = evaluate_check_in(
            make_datetime("2024-08-25 10:15:00"),
            1,
            &back_to_back_slots()[..1],
            None,
            &policy,
        );
        assert!(matches!(early_edge, CheckInFinding::OnTime { .. }));
        assert!(matches!(late_edge, CheckInFinding::OnTime { .. }));
    }

    #[test]
    fn test_just_past_tolerance_is_irregular() {
        let policy = CheckInPolicy::default();
        let early = evaluate_check_in(
            make_datetime("2024-08-25 09:44:01"),
            1,
            &back_to_back_slots(),
            None,
            &policy,
        );
        let late = evaluate_check_in(
            make_datetime("2024-08-25 10:15:01"),
            1,
            &back_to_back_slots()[..1],
            None,
            &policy,
        );
        assert!(matches!(early, CheckInFinding::Early { slot_id: 1, minutes: 15, .. }));
        assert!(matches!(late, CheckInFinding::Late { slot_id: 1, minutes: 15, .. }));
    }

    #[test]
    fn test_early_for_only_candidate() {
        let finding = evaluate_check_in(
            make_datetime("2024-08-25 08:30:00"),
            1,
            &back_to_back_slots(),
            None,
            &CheckInPolicy::default(),
        );
        assert!(matches!(finding, CheckInFinding::Early { slot_id: 1, minutes: 90, .. }));
    }

    #[test]
    fn test_ambiguous_sign_in_is_late_without_previous_shift() {
        let finding = evaluate_check_in(
            make_datetime("2024-08-25 11:00:00"),
            1,
            &back_to_back_slots(),
            None,
            &CheckInPolicy::default(),
        );
        assert!(matches!(finding, CheckInFinding::Late { slot_id: 1, minutes: 60, .. }));
    }

    #[test]
    fn test_ambiguous_sign_in_is_early_after_recent_shift() {
        let finding = evaluate_check_in(
            make_datetime("2024-08-25 11:00:00"),
            1,
            &back_to_back_slots(),
            Some(make_datetime("2024-08-25 10:30:00")),
            &CheckInPolicy::default(),
        );
        assert!(matches!(finding, CheckInFinding::Early { slot_id: 2, minutes: 60, .. }));
    }

    #[test]
    fn test_previous_shift_outside_lookback_is_ignored() {
        let finding = evaluate_check_in(
            make_datetime("2024-08-25 11:00:00"),
            1,
            &back_to_back_slots(),
            Some(make_datetime("2024-08-25 09:59:00")),
            &CheckInPolicy::default(),
        );
        assert!(matches!(finding, CheckInFinding::Late { slot_id: 1, .. }));
    }

    #[test]
    fn test_slot_beyond_grace_window_is_not_matched() {
        let finding = evaluate_check_in(
            make_datetime("2024-08-25 07:59:00"),
            1,
            &back_to_back_slots(),
            None,
            &CheckInPolicy::default(),
        );
        assert_eq!(finding, CheckInFinding::NoMatchingSlot);
        assert_eq!(finding.variance_minutes(), 0);
    }

    #[test]
    fn test_other_positions_are_ignored() {
        let finding = evaluate_check_in(
            make_datetime("2024-08-25 10:00:00"),
            2,
            &back_to_back_slots(),
            None,
            &CheckInPolicy::default(),
        );
        assert_eq!(finding, CheckInFinding::NoMatchingSlot);
    }

    #[test]
    fn test_closest_started_slot_wins() {
        let slots = vec![
            slot(1, 1, "2024-08-25 09:00:00", "2024-08-25 12:00:00"),
            slot(3, 1, "2024-08-25 10:00:00", "2024-08-25 12:00:00"),
        ];
        let finding = evaluate_check_in(
            make_datetime("2024-08-25 10:30:00"),
            1,
            &slots,
            None,
            &CheckInPolicy::default(),
        );
        assert!(matches!(finding, CheckInFinding::Late { slot_id: 3, minutes: 30, .. }));
    }

    #[test]
    fn test_finding_serialization() {
        let finding = CheckInFinding::Late {
            slot_id: 1,
            slot_begins: make_datetime("2024-08-25 10:00:00"),
            minutes: 45,
        };
        let json = serde_json::to_value(&finding).unwrap();
        assert_eq!(json["status"], "late");
        assert_eq!(json["minutes"], 45);
    }
}
