//! Unit systems and body-measurement conversions shared by the health calculators.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Centimetres per inch.
pub const CM_PER_INCH: f64 = 2.54;

/// Kilograms per avoirdupois pound.
pub const KG_PER_POUND: f64 = 0.453_592_37;

/// Measurement system a form was filled in with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitSystem {
    /// Centimetres and kilograms.
    Metric,
    /// Inches and pounds.
    Imperial,
}

impl UnitSystem {
    /// Parses the `unit_system` select value.
    pub fn parse(value: &str) -> EngineResult<Self> {
        match value {
            "metric" => Ok(UnitSystem::Metric),
            "imperial" => Ok(UnitSystem::Imperial),
            other => Err(EngineError::invalid_input(
                "unit_system",
                format!("unknown unit system '{}'", other),
            )),
        }
    }

    /// Converts a length in this system's unit to centimetres.
    pub fn length_to_cm(&self, value: f64) -> f64 {
        match self {
            UnitSystem::Metric => value,
            UnitSystem::Imperial => inches_to_cm(value),
        }
    }

    /// Converts a weight in this system's unit to kilograms.
    pub fn weight_to_kg(&self, value: f64) -> f64 {
        match self {
            UnitSystem::Metric => value,
            UnitSystem::Imperial => pounds_to_kg(value),
        }
    }
}

/// Biological sex, used by formulas with sex-specific coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    /// Male coefficients.
    Male,
    /// Female coefficients.
    Female,
}

impl Sex {
    /// Parses the `sex` select value.
    pub fn parse(value: &str) -> EngineResult<Self> {
        match value {
            "male" => Ok(Sex::Male),
            "female" => Ok(Sex::Female),
            other => Err(EngineError::invalid_input(
                "sex",
                format!("unknown sex '{}'", other),
            )),
        }
    }
}

/// Converts inches to centimetres.
pub fn inches_to_cm(inches: f64) -> f64 {
    inches * CM_PER_INCH
}

/// Converts centimetres to inches.
pub fn cm_to_inches(cm: f64) -> f64 {
    cm / CM_PER_INCH
}

/// Converts pounds to kilograms.
pub fn pounds_to_kg(pounds: f64) -> f64 {
    pounds * KG_PER_POUND
}

/// Converts kilograms to pounds.
pub fn kg_to_pounds(kg: f64) -> f64 {
    kg / KG_PER_POUND
}

/// Rounds to a fixed number of decimal places for display fields.
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_conversions() {
        assert!((inches_to_cm(70.0) - 177.8).abs() < 1e-9);
        assert!((cm_to_inches(152.4) - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_weight_conversions() {
        assert!((pounds_to_kg(220.0) - 99.790_321_4).abs() < 1e-6);
        assert!((kg_to_pounds(pounds_to_kg(150.0)) - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_unit_system_converts_to_metric() {
        assert_eq!(UnitSystem::Metric.length_to_cm(180.0), 180.0);
        assert!((UnitSystem::Imperial.length_to_cm(72.0) - 182.88).abs() < 1e-9);
        assert!((UnitSystem::Imperial.weight_to_kg(1.0) - KG_PER_POUND).abs() < 1e-12);
    }

    #[test]
    fn test_parse_rejects_unknown_values() {
        assert!(UnitSystem::parse("nautical").is_err());
        assert_eq!(Sex::parse("female").unwrap(), Sex::Female);
        assert!(Sex::parse("unknown").is_err());
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(22.857_142, 2), 22.86);
        assert_eq!(round_to(2222.222, 0), 2222.0);
    }
}
