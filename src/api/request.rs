//! Request types for the Calculator Engine API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::CalculatorDefinition;
use crate::error::{EngineError, EngineResult};

/// Request body for `POST /calculators/:id/calculate`.
///
/// # Example
///
/// ```
/// use calculator_engine::api::CalculationRequest;
///
/// let request: CalculationRequest = serde_json::from_str(
///     r#"{"values": {"height_cm": 175}, "preset": "average_adult", "locale": "es"}"#,
/// ).unwrap();
/// assert_eq!(request.preset.as_deref(), Some("average_adult"));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// Raw input values keyed by input key.
    #[serde(default)]
    pub values: Map<String, Value>,
    /// Preset whose values are applied before `values`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
    /// Requested locale code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

impl CalculationRequest {
    /// Combines the preset's values with the explicit values.
    ///
    /// Explicit values override preset values with the same key.
    ///
    /// # Errors
    ///
    /// Returns `PresetNotFound` when the preset id is unknown.
    pub fn merged_values(&self, definition: &CalculatorDefinition) -> EngineResult<Map<String, Value>> {
        let mut merged = match &self.preset {
            Some(id) => definition
                .preset(id)
                .map(|preset| preset.values.clone())
                .ok_or_else(|| EngineError::PresetNotFound {
                    calculator: definition.id.clone(),
                    preset: id.clone(),
                })?,
            None => Map::new(),
        };

        for (key, value) in &self.values {
            merged.insert(key.clone(), value.clone());
        }
        Ok(merged)
    }
}

/// `?locale=` query parameter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocaleQuery {
    /// Requested locale code.
    pub locale: Option<String>,
}
