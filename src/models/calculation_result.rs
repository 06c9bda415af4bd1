//! Calculation outcome models for the Calculator Engine.
//!
//! This module contains the [`CalculationOutcome`] type and the audit
//! structures that record every formula applied while producing it.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{InputIssue, Locale};

/// A single step in the audit trace recording a formula application.
///
/// Each step captures the input, output, and reasoning for one rule.
///
/// # Example
///
/// ```
/// use calculator_engine::models::AuditStep;
///
/// let step = AuditStep {
///     step_number: 1,
///     rule_id: "bmi_formula".to_string(),
///     rule_name: "Body Mass Index".to_string(),
///     reference: "kg / m²".to_string(),
///     input: serde_json::json!({"weight_kg": 70.0, "height_m": 1.75}),
///     output: serde_json::json!({"bmi": 22.86}),
///     reasoning: "70 / 1.75² = 22.86".to_string(),
/// };
/// assert_eq!(step.rule_id, "bmi_formula");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The published formula or table this rule follows.
    pub reference: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A note generated during calculation.
///
/// Warnings do not invalidate a result but should be shown alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "info", "low", "medium").
    pub severity: String,
}

impl AuditWarning {
    /// Creates a new warning.
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        severity: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            severity: severity.into(),
        }
    }
}

/// The complete audit trace for a calculation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

/// The result of running one calculator.
///
/// A calculator never fails on bad user input: it returns an outcome with
/// `is_valid == false`, an empty `values` object and the list of input
/// problems in `errors`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationOutcome {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// The calculator id from the catalog.
    pub calculator: String,
    /// The locale labels were resolved in.
    pub locale: Locale,
    /// Whether the inputs were valid and `values` is populated.
    pub is_valid: bool,
    /// The calculator's results, keyed by result name.
    pub values: serde_json::Value,
    /// Localised labels for the top-level result keys.
    pub labels: BTreeMap<String, String>,
    /// Localised text for string-valued results such as categories.
    pub value_labels: BTreeMap<String, String>,
    /// Input problems, populated only when `is_valid` is false.
    pub errors: Vec<InputIssue>,
    /// Audit trace of the formulas applied.
    pub audit_trace: AuditTrace,
}

impl CalculationOutcome {
    /// Builds the empty, not-valid outcome for rejected input.
    pub fn invalid(calculator: impl Into<String>, locale: Locale, errors: Vec<InputIssue>) -> Self {
        Self {
            calculation_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            calculator: calculator.into(),
            locale,
            is_valid: false,
            values: serde_json::Value::Object(serde_json::Map::new()),
            labels: BTreeMap::new(),
            value_labels: BTreeMap::new(),
            errors,
            audit_trace: AuditTrace::default(),
        }
    }
}
