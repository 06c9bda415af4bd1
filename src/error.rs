//! Error types for the Calculator Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while loading the catalog or
//! running a calculator.

use thiserror::Error;

/// The main error type for the Calculator Engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use calculator_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/site.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/site.yaml");
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

    /// Configuration parsed but is semantically inconsistent.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// A description of the inconsistency.
        message: String,
    },

    /// No calculator with the given id exists in the catalog.
    #[error("Calculator not found: {id}")]
    CalculatorNotFound {
        /// The calculator id that was requested.
        id: String,
    },

    /// The requested preset does not exist for the calculator.
    #[error("Preset '{preset}' not found for calculator '{calculator}'")]
    PresetNotFound {
        /// The calculator id.
        calculator: String,
        /// The preset id that was requested.
        preset: String,
    },

    /// An input value was missing, malformed or out of range.
    #[error("Invalid input '{field}': {message}")]
    InvalidInput {
        /// The input key that was invalid.
        field: String,
        /// A description of what made the input invalid.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for building an [`EngineError::InvalidInput`].
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
