//! Pay period and meal window models.
//!
//! This module contains the [`PayPeriod`] and [`MealWindow`] types that define
//! the payroll reporting window and the policy used to split shifts around a
//! meal break and cap their paid length.

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::{PositionId, TimeWindow};

/// A clock-in window that entitles a long shift to a meal break.
///
/// A shift whose clock-in hour is in `first_start_hour..last_start_hour` gets
/// its break at `meal_time` on the clock-in day.
///
/// # Example
///
/// ```
/// use duty_engine::models::MealWindow;
///
/// let lunch = MealWindow::lunch();
/// assert!(lunch.applies_to_hour(6));
/// assert!(lunch.applies_to_hour(9));
/// assert!(!lunch.applies_to_hour(10));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealWindow {
    /// Name used in notes, e.g. "lunch".
    pub name: String,
    /// First clock-in hour covered (inclusive).
    pub first_start_hour: u32,
    /// Last clock-in hour covered (exclusive).
    pub last_start_hour: u32,
    /// Time of day the break begins.
    pub meal_time: NaiveTime,
}

impl MealWindow {
    /// Clock-in between 06:00 and 10:00, break at 12:00.
    pub fn lunch() -> Self {
        Self {
            name: "lunch".to_string(),
            first_start_hour: 6,
            last_start_hour: 10,
            meal_time: NaiveTime::from_hms_opt(12, 0, 0).expect("Valid lunch time"),
        }
    }

    /// Clock-in between 12:00 and 15:00, break at 17:00.
    pub fn dinner() -> Self {
        Self {
            name: "dinner".to_string(),
            first_start_hour: 12,
            last_start_hour: 15,
            meal_time: NaiveTime::from_hms_opt(17, 0, 0).expect("Valid dinner time"),
        }
    }

    /// Returns `true` when a clock-in at `hour` falls in this window.
    pub fn applies_to_hour(&self, hour: u32) -> bool {
        hour >= self.first_start_hour && hour < self.last_start_hour
    }
}

/// The standard lunch and dinner windows.
pub fn default_meal_windows() -> Vec<MealWindow> {
    vec![MealWindow::lunch(), MealWindow::dinner()]
}

/// A payroll reporting window together with its splitting policy.
///
/// # Example
///
/// ```
/// use duty_engine::models::PayPeriod;
/// use chrono::NaiveDateTime;
///
/// let period = PayPeriod::new(
///     NaiveDateTime::parse_from_str("2024-08-18 00:00:00", "%Y-%m-%d %H:%M:%S").unwrap(),
///     NaiveDateTime::parse_from_str("2024-08-31 23:59:59", "%Y-%m-%d %H:%M:%S").unwrap(),
/// );
/// assert_eq!(period.hour_cap, 12);
/// assert!(period.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPeriod {
    /// First instant of the period.
    pub start: NaiveDateTime,
    /// Last instant of the period.
    pub end: NaiveDateTime,
    /// Length of the unpaid meal break in minutes; zero disables breaks.
    pub meal_break_minutes: u32,
    /// Maximum paid hours per entry.
    pub hour_cap: u32,
    /// Positions whose entries are never capped.
    #[serde(default)]
    pub positions_exempt_from_cap: Vec<PositionId>,
    /// Clock-in windows that trigger a meal break.
    #[serde(default = "default_meal_windows")]
    pub meal_windows: Vec<MealWindow>,
}

impl PayPeriod {
    /// Creates a period with a 30 minute break, a 12 hour cap and the
    /// standard meal windows.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            start,
            end,
            meal_break_minutes: 30,
            hour_cap: 12,
            positions_exempt_from_cap: Vec::new(),
            meal_windows: default_meal_windows(),
        }
    }

    /// Checks that the period is usable.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidConfiguration`] when the period ends before it
    /// starts or the hour cap is zero.
    pub fn validate(&self) -> EngineResult<()> {
        if self.end < self.start {
            return Err(EngineError::InvalidConfiguration {
                message: format!(
                    "pay period ends at {} before it starts at {}",
                    self.end, self.start
                ),
            });
        }
        if self.hour_cap == 0 {
            return Err(EngineError::InvalidConfiguration {
                message: "hour cap must be at least one hour".to_string(),
            });
        }
        Ok(())
    }

    /// The period as a closed window.
    pub fn window(&self) -> TimeWindow {
        TimeWindow {
            start: self.start,
            end: self.end,
        }
    }

    /// Returns `true` when entries in `position_id` are never capped.
    pub fn is_exempt_from_cap(&self, position_id: PositionId) -> bool {
        self.positions_exempt_from_cap.contains(&position_id)
    }

    /// The first meal window covering a clock-in at `hour`.
    pub fn meal_window_for(&self, hour: u32) -> Option<&MealWindow> {
        self.meal_windows.iter().find(|w| w.applies_to_hour(hour))
    }
}
