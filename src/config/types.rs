//! Configuration types for the duty engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::calculation::{CheckInPolicy, PositionCredit, PositionCreditSchedule};
use crate::models::{EventWindow, MealWindow, PayPeriod, PositionId, default_meal_windows};

/// One year's event dates as written in `event_windows.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct EventWindowEntry {
    /// The event year.
    pub year: i32,
    /// First day of the event.
    pub start_date: NaiveDate,
    /// Last day of the event (inclusive).
    pub end_date: NaiveDate,
}

/// Structure of `event_windows.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct EventWindowsConfig {
    /// Event dates, one entry per year.
    pub event_windows: Vec<EventWindowEntry>,
}

/// Structure of `position_credits.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct PositionCreditsConfig {
    /// Credit schedule rows.
    pub position_credits: Vec<PositionCredit>,
}

/// Payroll splitting policy from `payroll.yaml`.
///
/// Combined with a start and end it yields a [`PayPeriod`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollPolicy {
    /// Unpaid meal break length in minutes.
    pub meal_break_minutes: u32,
    /// Maximum paid hours per entry.
    pub hour_cap: u32,
    /// Positions never capped.
    #[serde(default)]
    pub positions_exempt_from_cap: Vec<PositionId>,
    /// Clock-in windows that trigger a meal break.
    #[serde(default = "default_meal_windows")]
    pub meal_windows: Vec<MealWindow>,
}

impl PayrollPolicy {
    /// Builds the pay period `[start, end]` under this policy.
    pub fn pay_period(&self, start: NaiveDateTime, end: NaiveDateTime) -> PayPeriod {
        PayPeriod {
            start,
            end,
            meal_break_minutes: self.meal_break_minutes,
            hour_cap: self.hour_cap,
            positions_exempt_from_cap: self.positions_exempt_from_cap.clone(),
            meal_windows: self.meal_windows.clone(),
        }
    }
}

/// The complete duty configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct DutyConfig {
    event_windows: BTreeMap<i32, EventWindow>,
    credit_schedule: PositionCreditSchedule,
    payroll: PayrollPolicy,
    check_in: CheckInPolicy,
}

impl DutyConfig {
    /// Creates a DutyConfig from its component parts.
    pub fn new(
        event_windows: Vec<EventWindow>,
        credit_schedule: PositionCreditSchedule,
        payroll: PayrollPolicy,
        check_in: CheckInPolicy,
    ) -> Self {
        Self {
            event_windows: event_windows.into_iter().map(|w| (w.year, w)).collect(),
            credit_schedule,
            payroll,
            check_in,
        }
    }

    /// Event windows keyed by year.
    pub fn event_windows(&self) -> &BTreeMap<i32, EventWindow> {
        &self.event_windows
    }

    /// The position credit schedule.
    pub fn credit_schedule(&self) -> &PositionCreditSchedule {
        &self.credit_schedule
    }

    /// The payroll policy.
    pub fn payroll(&self) -> &PayrollPolicy {
        &self.payroll
    }

    /// The check-in tolerances.
    pub fn check_in(&self) -> &CheckInPolicy {
        &self.check_in
    }
}
