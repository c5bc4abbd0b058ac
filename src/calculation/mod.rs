//! Calculation logic for the duty engine.
//!
//! This module contains the pure components every report builds on:
//! interval overlap classification, work-summary accumulation across the
//! event phases, position credit lookup, payroll shift splitting and
//! early/late check-in evaluation.

mod check_in;
mod credits;
mod overlap;
mod payroll_split;
mod work_summary;

pub use check_in::{CheckInFinding, CheckInPolicy, evaluate_check_in};
pub use credits::{CreditRate, NoCredits, PositionCredit, PositionCreditSchedule};
pub use overlap::{
    OpenEnd, Overlap, classify_interval, classify_overlap, classify_windows, intersection,
    overlaps,
};
pub use payroll_split::{MEAL_BREAK_MIN_SHIFT_HOURS, split_shift};
pub use work_summary::{CREDIT_DECIMAL_PLACES, WorkSummaryAccumulator};
