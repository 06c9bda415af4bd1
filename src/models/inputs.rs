//! Calculator input values and their validation.
//!
//! Raw request values arrive as a JSON object. [`InputValues::validate`]
//! checks them against the calculator's input definitions and produces a
//! typed bag that the calculation functions read from.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::InputDefinition;
use crate::error::{EngineError, EngineResult};

/// The kind of value an input accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    /// A floating point measurement (height, cycle length, file size).
    Number,
    /// An exact decimal amount of money.
    Money,
    /// One value out of the declared options.
    Select,
    /// A calendar date in `YYYY-MM-DD` form.
    Date,
}

/// A single validated input value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InputValue {
    /// A numeric measurement.
    Number(f64),
    /// A money amount.
    Money(Decimal),
    /// A selected option.
    Choice(String),
    /// A calendar date.
    Date(NaiveDate),
}

/// A problem found with one input during validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputIssue {
    /// The input key.
    pub field: String,
    /// What was wrong with it.
    pub message: String,
}

impl From<InputIssue> for EngineError {
    fn from(issue: InputIssue) -> Self {
        EngineError::InvalidInput {
            field: issue.field,
            message: issue.message,
        }
    }
}

/// A validated bag of calculator inputs keyed by input key.
///
/// # Example
///
/// ```
/// use calculator_engine::models::{InputValue, InputValues};
///
/// let values = InputValues::new()
///     .with("height_cm", InputValue::Number(180.0))
///     .with("unit_system", InputValue::Choice("metric".to_string()));
///
/// assert_eq!(values.number("height_cm"), Some(180.0));
/// assert_eq!(values.choice("unit_system"), Some("metric"));
/// assert!(values.require_number("weight_kg").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InputValues {
    values: BTreeMap<String, InputValue>,
}

impl InputValues {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value, returning the bag for chaining.
    pub fn with(mut self, key: impl Into<String>, value: InputValue) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts or replaces a value.
    pub fn insert(&mut self, key: impl Into<String>, value: InputValue) {
        self.values.insert(key.into(), value);
    }

    /// Returns the raw value for a key.
    pub fn get(&self, key: &str) -> Option<&InputValue> {
        self.values.get(key)
    }

    /// Returns true when no values are present.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns a number input.
    pub fn number(&self, key: &str) -> Option<f64> {
        match self.values.get(key) {
            Some(InputValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    /// Returns a number input or an `InvalidInput` error when it is absent.
    pub fn require_number(&self, key: &str) -> EngineResult<f64> {
        self.number(key)
            .ok_or_else(|| EngineError::invalid_input(key, "is required"))
    }

    /// Returns a money input.
    pub fn money(&self, key: &str) -> Option<Decimal> {
        match self.values.get(key) {
            Some(InputValue::Money(d)) => Some(*d),
            _ => None,
        }
    }

    /// Returns a money input or an `InvalidInput` error when it is absent.
    pub fn require_money(&self, key: &str) -> EngineResult<Decimal> {
        self.money(key)
            .ok_or_else(|| EngineError::invalid_input(key, "is required"))
    }

    /// Returns a selected option.
    pub fn choice(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(InputValue::Choice(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns a selected option or an `InvalidInput` error when it is absent.
    pub fn require_choice(&self, key: &str) -> EngineResult<&str> {
        self.choice(key)
            .ok_or_else(|| EngineError::invalid_input(key, "is required"))
    }

    /// Returns a date input.
    pub fn date(&self, key: &str) -> Option<NaiveDate> {
        match self.values.get(key) {
            Some(InputValue::Date(d)) => Some(*d),
            _ => None,
        }
    }

    /// Returns a date input or an `InvalidInput` error when it is absent.
    pub fn require_date(&self, key: &str) -> EngineResult<NaiveDate> {
        self.date(key)
            .ok_or_else(|| EngineError::invalid_input(key, "is required"))
    }

    /// Validates raw values, returning the first problem as an error.
    pub fn validate(
        definitions: &[InputDefinition],
        raw: &Map<String, Value>,
    ) -> EngineResult<InputValues> {
        Self::validate_all(definitions, raw)
            .map_err(|issues| match issues.into_iter().next() {
                Some(issue) => issue.into(),
                None => EngineError::CalculationError {
                    message: "validation failed without reporting an issue".to_string(),
                },
            })
    }

    /// Validates raw values, collecting every problem.
    ///
    /// Absent inputs take their declared default; `null` counts as absent.
    /// Keys with no matching definition are ignored.
    pub fn validate_all(
        definitions: &[InputDefinition],
        raw: &Map<String, Value>,
    ) -> Result<InputValues, Vec<InputIssue>> {
        let mut values = InputValues::new();
        let mut issues = Vec::new();

        for key in raw.keys() {
            if !definitions.iter().any(|def| &def.key == key) {
                debug!(input = %key, "Ignoring unknown input");
            }
        }

        for def in definitions {
            let supplied = raw.get(&def.key).filter(|v| !v.is_null());
            let Some(value) = supplied.or(def.default.as_ref()) else {
                if def.required {
                    issues.push(InputIssue {
                        field: def.key.clone(),
                        message: "is required".to_string(),
                    });
                }
                continue;
            };

            match parse_value(def, value) {
                Ok(parsed) => values.insert(def.key.clone(), parsed),
                Err(message) => issues.push(InputIssue {
                    field: def.key.clone(),
                    message,
                }),
            }
        }

        if issues.is_empty() {
            Ok(values)
        } else {
            Err(issues)
        }
    }
}

/// Parses and range-checks one raw value against its definition.
pub(crate) fn parse_value(def: &InputDefinition, value: &Value) -> Result<InputValue, String> {
    match def.kind {
        InputKind::Number => {
            let number = match value {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            }
            .filter(|n| n.is_finite())
            .ok_or_else(|| "expected a number".to_string())?;
            check_range(def, number)?;
            Ok(InputValue::Number(number))
        }
        InputKind::Money => {
            let amount = match value {
                Value::Number(n) => Decimal::from_str(&n.to_string())
                    .or_else(|_| Decimal::from_scientific(&n.to_string()))
                    .ok(),
                Value::String(s) => Decimal::from_str(s.trim()).ok(),
                _ => None,
            }
            .ok_or_else(|| "expected a money amount".to_string())?;
            let as_float = amount
                .to_f64()
                .ok_or_else(|| "amount is out of range".to_string())?;
            check_range(def, as_float)?;
            Ok(InputValue::Money(amount))
        }
        InputKind::Select => {
            let choice = value
                .as_str()
                .ok_or_else(|| "expected one of the listed options".to_string())?;
            if def.options.iter().any(|option| option == choice) {
                Ok(InputValue::Choice(choice.to_string()))
            } else {
                Err(format!("must be one of: {}", def.options.join(", ")))
            }
        }
        InputKind::Date => {
            let text = value
                .as_str()
                .ok_or_else(|| "expected a date (YYYY-MM-DD)".to_string())?;
            NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
                .map(InputValue::Date)
                .map_err(|_| "expected a date (YYYY-MM-DD)".to_string())
        }
    }
}

fn check_range(def: &InputDefinition, value: f64) -> Result<(), String> {
    match (def.min, def.max) {
        (Some(min), Some(max)) if value < min || value > max => {
            Err(format!("must be between {} and {}", min, max))
        }
        (Some(min), None) if value < min => Err(format!("must be at least {}", min)),
        (None, Some(max)) if value > max => Err(format!("must be at most {}", max)),
        _ => Ok(()),
    }
}
