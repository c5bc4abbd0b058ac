//! Duty Engine for volunteer ranger scheduling
//!
//! This crate computes how much each person worked and what they earned from
//! clocked duty intervals: overlap classification against scheduled windows,
//! hours and credits split across the pre-event, event and post-event phases,
//! payroll-ready shift splitting with meal breaks and hour caps, and
//! early/late check-in findings. The `reports` module assembles these into
//! per-person summaries from flat timesheet and schedule rows.

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod reports;
