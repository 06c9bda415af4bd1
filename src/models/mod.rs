//! Core data models for the Calculator Engine.
//!
//! This module contains the locale, input and outcome types shared by the
//! catalog, the calculators and the HTTP API.

mod calculation_result;
mod inputs;
mod locale;

pub use calculation_result::{AuditStep, AuditTrace, AuditWarning, CalculationOutcome};
pub use inputs::{InputIssue, InputKind, InputValue, InputValues};
pub use locale::Locale;

pub(crate) use inputs::parse_value;
