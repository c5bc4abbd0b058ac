//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading duty
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::calculation::{CheckInPolicy, PositionCreditSchedule};
use crate::error::{EngineError, EngineResult};
use crate::models::{EventWindow, PayPeriod};

use super::types::{DutyConfig, EventWindowsConfig, PayrollPolicy, PositionCreditsConfig};

/// Loads and provides access to duty configuration.
///
/// # Directory Structure
///
/// ```text
/// config/ranger/
/// ├── event_windows.yaml     # Event start/end dates per year
/// ├── position_credits.yaml  # Credits per hour by position and time
/// ├── payroll.yaml           # Meal break, hour cap, exempt positions
/// └── check_in.yaml          # Early/late tolerances
/// ```
///
/// # Example
///
/// ```no_run
/// use duty_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/ranger").unwrap();
/// let window = loader.event_window(2024).unwrap();
/// println!("Event starts {}", window.event_start);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: DutyConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Errors
    ///
    /// - [`EngineError::ConfigNotFound`] when a required file is missing.
    /// - [`EngineError::ConfigParseError`] when a file is not valid YAML for
    ///   its structure.
    /// - [`EngineError::InvalidConfiguration`] when the values are
    ///   inconsistent (e.g. an event that ends before it starts).
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let windows_config = Self::load_yaml::<EventWindowsConfig>(&path.join("event_windows.yaml"))?;
        let mut event_windows = Vec::with_capacity(windows_config.event_windows.len());
        for entry in windows_config.event_windows {
            let mut window = EventWindow::from_dates(entry.start_date, entry.end_date)?;
            window.year = entry.year;
            event_windows.push(window);
        }

        let credits_config =
            Self::load_yaml::<PositionCreditsConfig>(&path.join("position_credits.yaml"))?;
        let credit_schedule = PositionCreditSchedule::from_rows(credits_config.position_credits)?;

        let payroll = Self::load_yaml::<PayrollPolicy>(&path.join("payroll.yaml"))?;
        if payroll.hour_cap == 0 {
            return Err(EngineError::InvalidConfiguration {
                message: "payroll hour_cap must be at least one hour".to_string(),
            });
        }

        let check_in = Self::load_yaml::<CheckInPolicy>(&path.join("check_in.yaml"))?;

        info!(
            path = %path.display(),
            event_years = event_windows.len(),
            credit_rows = credit_schedule.len(),
            "Loaded duty configuration"
        );

        Ok(Self {
            config: DutyConfig::new(event_windows, credit_schedule, payroll, check_in),
        })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: DutyConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();
        debug!(path = %path_str, "Reading configuration file");

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &DutyConfig {
        &self.config
    }

    /// Gets the event window for a year.
    ///
    /// # Errors
    ///
    /// [`EngineError::EventWindowNotFound`] when the year is not configured.
    /// Reports that can tolerate a missing year use
    /// [`ConfigLoader::event_window_or_none`] instead.
    pub fn event_window(&self, year: i32) -> EngineResult<&EventWindow> {
        self.config
            .event_windows()
            .get(&year)
            .ok_or(EngineError::EventWindowNotFound { year })
    }

    /// Gets the event window for a year, `None` when the year has none.
    pub fn event_window_or_none(&self, year: i32) -> Option<EventWindow> {
        self.config.event_windows().get(&year).copied()
    }

    /// The position credit schedule.
    pub fn credit_schedule(&self) -> &PositionCreditSchedule {
        self.config.credit_schedule()
    }

    /// The payroll policy.
    pub fn payroll_policy(&self) -> &PayrollPolicy {
        self.config.payroll()
    }

    /// The check-in tolerances.
    pub fn check_in_policy(&self) -> &CheckInPolicy {
        self.config.check_in()
    }

    /// Builds and validates a pay period under the configured policy.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidConfiguration`] when `end` precedes `start`.
    pub fn pay_period(&self, start: NaiveDateTime, end: NaiveDateTime) -> EngineResult<PayPeriod> {
        let period = self.config.payroll().pay_period(start, end);
        period.validate()?;
        Ok(period)
    }
}
