//! Error types for the duty engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while evaluating duty intervals
//! and building reports.

use thiserror::Error;

/// The main error type for the duty engine.
///
/// Calculation components return these synchronously to their caller and
/// never log or swallow them.
///
/// # Example
///
/// ```
/// use duty_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/payroll.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/payroll.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A duty interval was malformed, e.g. it ends before it starts.
    #[error("Invalid interval for position {position_id}: {message}")]
    InvalidInterval {
        /// The position the interval was worked in.
        position_id: i64,
        /// A description of what made the interval invalid.
        message: String,
    },

    /// Caller-supplied configuration was inconsistent.
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        /// A description of the inconsistency.
        message: String,
    },

    /// No event window is configured for the requested year.
    #[error("Event window not found for year {year}")]
    EventWindowNotFound {
        /// The year that was requested.
        year: i32,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
