//! Core data models for the duty engine.
//!
//! This module contains the value types the calculation components consume
//! and produce. All of them are recomputed per report run and never persisted.

mod duty_interval;
mod event_window;
mod pay_period;
mod payroll_shift;
mod schedule;
mod work_summary;

pub(crate) use duty_interval::ensure_ordered;
pub use duty_interval::{DutyInterval, PersonId, PositionId, TimeWindow, TimesheetEntry};
pub use event_window::{EventPhase, EventWindow};
pub use pay_period::{MealWindow, PayPeriod, default_meal_windows};
pub use payroll_shift::{PayrollShift, SubShift, SubShiftLabel};
pub use schedule::{SignUp, Slot};
pub use work_summary::{WorkSummary, seconds_to_hours};
