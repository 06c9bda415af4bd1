//! Dispatch from a configured calculator to its calculation function.
//!
//! [`run_calculator`] works on already-validated [`InputValues`];
//! [`evaluate`] adds validation, timing and localisation on top and turns
//! bad user input into an invalid [`CalculationOutcome`].

use std::fmt;
use std::time::Instant;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use crate::config::{CalculatorDefinition, result_labels};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, CalculationOutcome, InputIssue, InputValues, Locale,
};

use super::bmi::{BmiInput, calculate_bmi_report};
use super::emergency_fund::{EmergencyFundInput, calculate_emergency_fund};
use super::gender_predictor::{GenderPredictorInput, predict_gender};
use super::ideal_weight::{IdealWeightInput, calculate_ideal_weight};
use super::ovulation::{OvulationInput, calculate_ovulation};
use super::transfer_time::{TransferInput, calculate_transfer_time};

/// The calculation function behind a calculator definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculatorKind {
    /// Body mass index with waist ratios.
    Bmi,
    /// Ideal body weight from seven formulas.
    IdealWeight,
    /// Chinese gender chart.
    GenderPredictor,
    /// Ovulation and fertile window calendar.
    Ovulation,
    /// Data transfer time.
    TransferTime,
    /// Emergency fund target.
    EmergencyFund,
}

impl CalculatorKind {
    /// Every calculator kind.
    pub const ALL: [CalculatorKind; 6] = [
        CalculatorKind::Bmi,
        CalculatorKind::IdealWeight,
        CalculatorKind::GenderPredictor,
        CalculatorKind::Ovulation,
        CalculatorKind::TransferTime,
        CalculatorKind::EmergencyFund,
    ];

    /// The snake_case name used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            CalculatorKind::Bmi => "bmi",
            CalculatorKind::IdealWeight => "ideal_weight",
            CalculatorKind::GenderPredictor => "gender_predictor",
            CalculatorKind::Ovulation => "ovulation",
            CalculatorKind::TransferTime => "transfer_time",
            CalculatorKind::EmergencyFund => "emergency_fund",
        }
    }
}

impl fmt::Display for CalculatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a calculator produced, before localisation.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorOutput {
    /// The result struct serialised to a JSON object.
    pub values: Value,
    /// Audit steps, numbered from 1.
    pub audit_steps: Vec<AuditStep>,
    /// Notes to show alongside the result.
    pub warnings: Vec<AuditWarning>,
}

impl CalculatorOutput {
    fn new<T: Serialize>(
        result: &T,
        audit_steps: Vec<AuditStep>,
        warnings: Vec<AuditWarning>,
    ) -> EngineResult<Self> {
        let values = serde_json::to_value(result).map_err(|e| EngineError::CalculationError {
            message: format!("failed to serialise result: {}", e),
        })?;
        Ok(Self {
            values,
            audit_steps,
            warnings,
        })
    }
}

/// Runs one calculator on validated inputs.
///
/// # Errors
///
/// Returns `InvalidInput` when the inputs are individually valid but
/// inconsistent (for example a luteal phase as long as the cycle).
///
/// # Example
///
/// ```
/// use calculator_engine::calculation::{run_calculator, CalculatorKind};
/// use calculator_engine::models::{InputValue, InputValues};
///
/// let values = InputValues::new()
///     .with("unit_system", InputValue::Choice("metric".to_string()))
///     .with("height_cm", InputValue::Number(175.0))
///     .with("weight_kg", InputValue::Number(70.0));
///
/// let output = run_calculator(CalculatorKind::Bmi, &values).unwrap();
/// assert_eq!(output.values["category"], "normal");
/// ```
pub fn run_calculator(kind: CalculatorKind, values: &InputValues) -> EngineResult<CalculatorOutput> {
    match kind {
        CalculatorKind::Bmi => {
            let report = calculate_bmi_report(&BmiInput::from_values(values)?, 1)?;
            CalculatorOutput::new(&report.result, report.audit_steps, report.warnings)
        }
        CalculatorKind::IdealWeight => {
            let report = calculate_ideal_weight(&IdealWeightInput::from_values(values)?, 1)?;
            CalculatorOutput::new(&report.result, report.audit_steps, report.warnings)
        }
        CalculatorKind::GenderPredictor => {
            let report = predict_gender(&GenderPredictorInput::from_values(values)?, 1)?;
            CalculatorOutput::new(&report.result, report.audit_steps, report.warnings)
        }
        CalculatorKind::Ovulation => {
            let report = calculate_ovulation(&OvulationInput::from_values(values)?, 1)?;
            CalculatorOutput::new(&report.result, report.audit_steps, report.warnings)
        }
        CalculatorKind::TransferTime => {
            let report = calculate_transfer_time(&TransferInput::from_values(values)?, 1)?;
            CalculatorOutput::new(&report.result, report.audit_steps, report.warnings)
        }
        CalculatorKind::EmergencyFund => {
            let report = calculate_emergency_fund(&EmergencyFundInput::from_values(values)?, 1)?;
            CalculatorOutput::new(&report.result, report.audit_steps, report.warnings)
        }
    }
}

/// Validates raw input, runs the calculator and localises the result.
///
/// Bad user input never produces an error: it yields an outcome with
/// `is_valid == false` listing the problems. Only configuration and
/// internal failures are returned as `Err`.
pub fn evaluate(
    definition: &CalculatorDefinition,
    raw: &Map<String, Value>,
    locale: Locale,
    default_locale: Locale,
) -> EngineResult<CalculationOutcome> {
    let start = Instant::now();

    let values = match InputValues::validate_all(&definition.inputs, raw) {
        Ok(values) => values,
        Err(issues) => {
            debug!(calculator = %definition.id, issues = issues.len(), "Input validation failed");
            return Ok(CalculationOutcome::invalid(&definition.id, locale, issues));
        }
    };

    let output = match run_calculator(definition.kind, &values) {
        Ok(output) => output,
        Err(EngineError::InvalidInput { field, message }) => {
            debug!(calculator = %definition.id, field = %field, "Calculator rejected input");
            return Ok(CalculationOutcome::invalid(
                &definition.id,
                locale,
                vec![InputIssue { field, message }],
            ));
        }
        Err(e) => return Err(e),
    };

    let (labels, value_labels) = result_labels(definition, locale, default_locale, &output.values);

    Ok(CalculationOutcome {
        calculation_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        calculator: definition.id.clone(),
        locale,
        is_valid: true,
        values: output.values,
        labels,
        value_labels,
        errors: Vec::new(),
        audit_trace: AuditTrace {
            steps: output.audit_steps,
            warnings: output.warnings,
            duration_us: start.elapsed().as_micros() as u64,
        },
    })
}
