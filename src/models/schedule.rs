//! Slot and sign-up models.
//!
//! Slots are scheduled shift opportunities; a sign-up records that a person
//! committed to work one. Neither is a worked interval.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{PersonId, PositionId, TimeWindow};

/// A scheduled shift opportunity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// Slot identifier.
    pub slot_id: i64,
    /// The position the slot is for.
    pub position_id: PositionId,
    /// Scheduled start.
    pub begins: NaiveDateTime,
    /// Scheduled end.
    pub ends: NaiveDateTime,
    /// Free-text description shown on the schedule.
    #[serde(default)]
    pub description: String,
}

impl Slot {
    /// The scheduled period as a closed window.
    pub fn window(&self) -> TimeWindow {
        TimeWindow {
            start: self.begins,
            end: self.ends,
        }
    }
}

/// A person's commitment to work a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUp {
    /// The person who signed up.
    pub person_id: PersonId,
    /// The person's callsign.
    pub callsign: String,
    /// The slot signed up for.
    pub slot: Slot,
}
