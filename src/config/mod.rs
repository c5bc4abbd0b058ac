//! Configuration loading and management for the duty engine.
//!
//! This module loads event windows, the position credit schedule, the
//! payroll policy and check-in tolerances from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use duty_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/ranger").unwrap();
//! println!("Hour cap: {}", config.payroll_policy().hour_cap);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    DutyConfig, EventWindowEntry, EventWindowsConfig, PayrollPolicy, PositionCreditsConfig,
};
