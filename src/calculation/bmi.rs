//! Body Mass Index calculation.
//!
//! This module provides the BMI formula, the eight-band adult category
//! table, and the derived metrics shown next to it (BMI Prime, Ponderal
//! Index, healthy weight range and the optional waist ratios).

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, AuditWarning, InputValues};

use super::body_ratios::{
    WaistHeightBand, WaistHipRisk, waist_to_height_ratio, waist_to_hip_ratio,
};
use super::units::{Sex, UnitSystem, kg_to_pounds, round_to};

/// Category boundaries in ascending order. Each boundary belongs to the
/// category above it.
pub const BMI_CATEGORY_BOUNDARIES: [f64; 7] = [16.0, 17.0, 18.5, 25.0, 30.0, 35.0, 40.0];

/// Lowest BMI of the normal range.
pub const NORMAL_BMI_MIN: f64 = 18.5;

/// Highest BMI used for the healthy weight range.
pub const NORMAL_BMI_MAX: f64 = 24.9;

/// Adult BMI category.
///
/// # Example
///
/// ```
/// use calculator_engine::calculation::{bmi_category, BmiCategory};
///
/// assert_eq!(bmi_category(18.4), BmiCategory::MildThinness);
/// assert_eq!(bmi_category(18.5), BmiCategory::Normal);
/// assert_eq!(bmi_category(40.0), BmiCategory::ObeseClass3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    /// Below 16.
    SevereThinness,
    /// 16 up to 17.
    ModerateThinness,
    /// 17 up to 18.5.
    MildThinness,
    /// 18.5 up to 25.
    Normal,
    /// 25 up to 30.
    Overweight,
    /// 30 up to 35.
    #[serde(rename = "obese_class_1")]
    ObeseClass1,
    /// 35 up to 40.
    #[serde(rename = "obese_class_2")]
    ObeseClass2,
    /// 40 and above.
    #[serde(rename = "obese_class_3")]
    ObeseClass3,
}

impl BmiCategory {
    const ORDERED: [BmiCategory; 8] = [
        BmiCategory::SevereThinness,
        BmiCategory::ModerateThinness,
        BmiCategory::MildThinness,
        BmiCategory::Normal,
        BmiCategory::Overweight,
        BmiCategory::ObeseClass1,
        BmiCategory::ObeseClass2,
        BmiCategory::ObeseClass3,
    ];
}

impl std::fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BmiCategory::SevereThinness => "severe_thinness",
            BmiCategory::ModerateThinness => "moderate_thinness",
            BmiCategory::MildThinness => "mild_thinness",
            BmiCategory::Normal => "normal",
            BmiCategory::Overweight => "overweight",
            BmiCategory::ObeseClass1 => "obese_class_1",
            BmiCategory::ObeseClass2 => "obese_class_2",
            BmiCategory::ObeseClass3 => "obese_class_3",
        };
        f.write_str(name)
    }
}

/// Buckets a BMI value. Lower bounds are inclusive, upper bounds exclusive.
pub fn bmi_category(bmi: f64) -> BmiCategory {
    let index = BMI_CATEGORY_BOUNDARIES
        .iter()
        .take_while(|boundary| bmi >= **boundary)
        .count();
    BmiCategory::ORDERED[index]
}

/// Computes `weight_kg / height_m²`.
///
/// # Example
///
/// ```
/// use calculator_engine::calculation::calculate_bmi;
///
/// let bmi = calculate_bmi(70.0, 1.75).unwrap();
/// assert!((bmi - 22.857).abs() < 0.001);
/// assert!(calculate_bmi(70.0, 0.0).is_err());
/// ```
pub fn calculate_bmi(weight_kg: f64, height_m: f64) -> EngineResult<f64> {
    if !(weight_kg.is_finite() && weight_kg > 0.0) {
        return Err(EngineError::invalid_input(
            "weight",
            "must be greater than zero",
        ));
    }
    if !(height_m.is_finite() && height_m > 0.0) {
        return Err(EngineError::invalid_input(
            "height",
            "must be greater than zero",
        ));
    }
    Ok(weight_kg / (height_m * height_m))
}

/// Inputs to the BMI calculator, normalised to metric.
#[derive(Debug, Clone, PartialEq)]
pub struct BmiInput {
    /// Unit system the form was filled in with.
    pub unit_system: UnitSystem,
    /// Height in centimetres.
    pub height_cm: f64,
    /// Weight in kilograms.
    pub weight_kg: f64,
    /// Sex, needed for the waist-to-hip risk band.
    pub sex: Option<Sex>,
    /// Age in years.
    pub age: Option<f64>,
    /// Waist circumference in centimetres.
    pub waist_cm: Option<f64>,
    /// Hip circumference in centimetres.
    pub hip_cm: Option<f64>,
}

impl BmiInput {
    /// Reads the calculator inputs, converting imperial measurements.
    ///
    /// Metric forms use `height_cm` / `weight_kg`; imperial forms use
    /// `height_in` / `weight_lb`. `waist` and `hip` share the height unit.
    pub fn from_values(values: &InputValues) -> EngineResult<Self> {
        let unit_system = UnitSystem::parse(values.choice("unit_system").unwrap_or("metric"))?;
        let (height_key, weight_key) = match unit_system {
            UnitSystem::Metric => ("height_cm", "weight_kg"),
            UnitSystem::Imperial => ("height_in", "weight_lb"),
        };

        Ok(Self {
            unit_system,
            height_cm: unit_system.length_to_cm(values.require_number(height_key)?),
            weight_kg: unit_system.weight_to_kg(values.require_number(weight_key)?),
            sex: values.choice("sex").map(Sex::parse).transpose()?,
            age: values.number("age"),
            waist_cm: values.number("waist").map(|w| unit_system.length_to_cm(w)),
            hip_cm: values.number("hip").map(|h| unit_system.length_to_cm(h)),
        })
    }
}

/// Result of the BMI calculator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BmiResult {
    /// Body mass index.
    pub bmi: f64,
    /// Adult category.
    pub category: BmiCategory,
    /// BMI divided by 25.
    pub bmi_prime: f64,
    /// weight / height³.
    pub ponderal_index: f64,
    /// Lowest normal-range weight for this height.
    pub healthy_weight_min_kg: f64,
    /// Highest normal-range weight for this height.
    pub healthy_weight_max_kg: f64,
    /// Lowest normal-range weight in pounds.
    pub healthy_weight_min_lb: f64,
    /// Highest normal-range weight in pounds.
    pub healthy_weight_max_lb: f64,
    /// Kilograms to gain (positive) or lose (negative) to reach the normal range.
    pub weight_change_to_normal_kg: f64,
    /// Waist / height when a waist measurement was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waist_to_height_ratio: Option<f64>,
    /// Band for the waist-to-height ratio.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waist_to_height_band: Option<WaistHeightBand>,
    /// Waist / hip when waist, hip and sex were given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waist_to_hip_ratio: Option<f64>,
    /// Risk band for the waist-to-hip ratio.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waist_to_hip_risk: Option<WaistHipRisk>,
}

/// BMI result together with its audit trail.
#[derive(Debug, Clone)]
pub struct BmiReport {
    /// The computed values.
    pub result: BmiResult,
    /// The audit steps recording each formula.
    pub audit_steps: Vec<AuditStep>,
    /// Notes to show alongside the result.
    pub warnings: Vec<AuditWarning>,
}

/// Runs the full BMI calculator.
///
/// # Arguments
///
/// * `input` - Metric-normalised inputs
/// * `step_number` - The step number for audit trail sequencing
///
/// # Example
///
/// ```
/// use calculator_engine::calculation::{calculate_bmi_report, BmiCategory, BmiInput, UnitSystem};
///
/// let input = BmiInput {
///     unit_system: UnitSystem::Metric,
///     height_cm: 175.0,
///     weight_kg: 70.0,
///     sex: None,
///     age: None,
///     waist_cm: None,
///     hip_cm: None,
/// };
///
/// let report = calculate_bmi_report(&input, 1).unwrap();
/// assert_eq!(report.result.category, BmiCategory::Normal);
/// assert_eq!(report.result.weight_change_to_normal_kg, 0.0);
/// ```
pub fn calculate_bmi_report(input: &BmiInput, step_number: u32) -> EngineResult<BmiReport> {
    let height_m = input.height_cm / 100.0;
    let bmi = calculate_bmi(input.weight_kg, height_m)?;
    let category = bmi_category(bmi);

    let mut audit_steps = vec![
        AuditStep {
            step_number,
            rule_id: "bmi_formula".to_string(),
            rule_name: "Body Mass Index".to_string(),
            reference: "weight (kg) / height (m)²".to_string(),
            input: serde_json::json!({
                "weight_kg": input.weight_kg,
                "height_m": height_m,
            }),
            output: serde_json::json!({ "bmi": bmi }),
            reasoning: format!(
                "{:.2} kg / ({:.3} m)² = {:.2}",
                input.weight_kg, height_m, bmi
            ),
        },
        AuditStep {
            step_number: step_number + 1,
            rule_id: "bmi_category".to_string(),
            rule_name: "BMI Category".to_string(),
            reference: "WHO adult bands 16 / 17 / 18.5 / 25 / 30 / 35 / 40".to_string(),
            input: serde_json::json!({ "bmi": bmi }),
            output: serde_json::json!({ "category": category }),
            reasoning: format!("BMI {:.2} falls in the {} band", bmi, category),
        },
    ];

    let height_sq = height_m * height_m;
    let healthy_min = NORMAL_BMI_MIN * height_sq;
    let healthy_max = NORMAL_BMI_MAX * height_sq;
    let weight_change = if bmi < NORMAL_BMI_MIN {
        healthy_min - input.weight_kg
    } else if category >= BmiCategory::Overweight {
        healthy_max - input.weight_kg
    } else {
        0.0
    };
    let ponderal_index = input.weight_kg / (height_sq * height_m);
    let bmi_prime = bmi / 25.0;

    audit_steps.push(AuditStep {
        step_number: step_number + 2,
        rule_id: "bmi_derived_metrics".to_string(),
        rule_name: "Derived Metrics".to_string(),
        reference: "BMI Prime = BMI / 25; Ponderal Index = kg / m³".to_string(),
        input: serde_json::json!({ "bmi": bmi, "height_m": height_m }),
        output: serde_json::json!({
            "bmi_prime": bmi_prime,
            "ponderal_index": ponderal_index,
            "healthy_weight_min_kg": healthy_min,
            "healthy_weight_max_kg": healthy_max,
        }),
        reasoning: format!(
            "Healthy range {:.1}-{:.1} kg for {:.2} m",
            healthy_min, healthy_max, height_m
        ),
    });

    let mut result = BmiResult {
        bmi,
        category,
        bmi_prime,
        ponderal_index,
        healthy_weight_min_kg: healthy_min,
        healthy_weight_max_kg: healthy_max,
        healthy_weight_min_lb: kg_to_pounds(healthy_min),
        healthy_weight_max_lb: kg_to_pounds(healthy_max),
        weight_change_to_normal_kg: round_to(weight_change, 1),
        waist_to_height_ratio: None,
        waist_to_height_band: None,
        waist_to_hip_ratio: None,
        waist_to_hip_risk: None,
    };

    if let Some(waist) = input.waist_cm {
        let whtr = waist_to_height_ratio(waist, input.height_cm)?;
        result.waist_to_height_ratio = Some(whtr.ratio);
        result.waist_to_height_band = Some(whtr.band);

        let mut output = serde_json::json!({
            "waist_to_height_ratio": whtr.ratio,
            "waist_to_height_band": whtr.band,
        });

        if let (Some(hip), Some(sex)) = (input.hip_cm, input.sex) {
            let whr = waist_to_hip_ratio(waist, hip, sex)?;
            result.waist_to_hip_ratio = Some(whr.ratio);
            result.waist_to_hip_risk = Some(whr.risk);
            output["waist_to_hip_ratio"] = serde_json::json!(whr.ratio);
            output["waist_to_hip_risk"] = serde_json::json!(whr.risk);
        }

        audit_steps.push(AuditStep {
            step_number: step_number + 3,
            rule_id: "waist_ratios".to_string(),
            rule_name: "Waist Ratios".to_string(),
            reference: "WHtR 0.4 / 0.5 / 0.6; WHR WHO cut-offs".to_string(),
            input: serde_json::json!({
                "waist_cm": waist,
                "hip_cm": input.hip_cm,
                "height_cm": input.height_cm,
                "sex": input.sex,
            }),
            output,
            reasoning: format!(
                "{:.1} cm / {:.1} cm = {:.3}",
                waist, input.height_cm, whtr.ratio
            ),
        });
    }

    let mut warnings = Vec::new();
    if input.age.is_some_and(|age| age < 20.0) {
        warnings.push(AuditWarning::new(
            "AGE_UNDER_20",
            "Adult BMI bands are less reliable below age 20; BMI-for-age percentiles are preferred",
            "low",
        ));
    }

    Ok(BmiReport {
        result,
        audit_steps,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InputValue;
    use proptest::prelude::*;

    fn metric_input(height_cm: f64, weight_kg: f64) -> BmiInput {
        BmiInput {
            unit_system: UnitSystem::Metric,
            height_cm,
            weight_kg,
            sex: None,
            age: None,
            waist_cm: None,
            hip_cm: None,
        }
    }

    #[test]
    fn test_boundaries_belong_to_upper_category() {
        assert_eq!(bmi_category(15.99), BmiCategory::SevereThinness);
        assert_eq!(bmi_category(16.0), BmiCategory::ModerateThinness);
        assert_eq!(bmi_category(17.0), BmiCategory::MildThinness);
        assert_eq!(bmi_category(18.5), BmiCategory::Normal);
        assert_eq!(bmi_category(24.99), BmiCategory::Normal);
        assert_eq!(bmi_category(25.0), BmiCategory::Overweight);
        assert_eq!(bmi_category(30.0), BmiCategory::ObeseClass1);
        assert_eq!(bmi_category(35.0), BmiCategory::ObeseClass2);
        assert_eq!(bmi_category(39.99), BmiCategory::ObeseClass2);
        assert_eq!(bmi_category(40.0), BmiCategory::ObeseClass3);
    }

    #[test]
    fn test_bmi_formula() {
        let bmi = calculate_bmi(81.0, 1.8).unwrap();
        assert!((bmi - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_measurements_are_rejected() {
        assert!(calculate_bmi(-1.0, 1.8).is_err());
        assert!(calculate_bmi(70.0, f64::NAN).is_err());
    }

    #[test]
    fn test_report_for_overweight_adult() {
        let report = calculate_bmi_report(&metric_input(180.0, 90.0), 1).unwrap();
        let result = report.result;

        assert!((result.bmi - 27.777_777).abs() < 1e-5);
        assert_eq!(result.category, BmiCategory::Overweight);
        assert!((result.bmi_prime - 1.111_111).abs() < 1e-5);
        assert!((result.ponderal_index - 15.432_098).abs() < 1e-5);
        assert!((result.healthy_weight_min_kg - 59.94).abs() < 1e-9);
        assert!((result.healthy_weight_max_kg - 80.676).abs() < 1e-9);
        // 80.676 - 90 rounded to one decimal
        assert_eq!(result.weight_change_to_normal_kg, -9.3);
        assert_eq!(report.audit_steps.len(), 3);
        assert_eq!(report.audit_steps[0].rule_id, "bmi_formula");
        assert_eq!(report.audit_steps[2].step_number, 3);
    }

    #[test]
    fn test_underweight_needs_gain() {
        let report = calculate_bmi_report(&metric_input(170.0, 50.0), 1).unwrap();
        assert_eq!(report.result.category, BmiCategory::MildThinness);
        // 18.5 * 1.7² = 53.465
        assert_eq!(report.result.weight_change_to_normal_kg, 3.5);
    }

    #[test]
    fn test_waist_ratios_are_reported() {
        let input = BmiInput {
            waist_cm: Some(94.0),
            hip_cm: Some(100.0),
            sex: Some(Sex::Male),
            ..metric_input(175.0, 80.0)
        };
        let report = calculate_bmi_report(&input, 1).unwrap();

        assert_eq!(report.result.waist_to_hip_ratio, Some(0.94));
        assert_eq!(report.result.waist_to_hip_risk, Some(WaistHipRisk::Moderate));
        assert_eq!(
            report.result.waist_to_height_band,
            Some(WaistHeightBand::IncreasedRisk)
        );
        assert_eq!(report.audit_steps.len(), 4);
    }

    #[test]
    fn test_waist_to_hip_requires_sex() {
        let input = BmiInput {
            waist_cm: Some(94.0),
            hip_cm: Some(100.0),
            ..metric_input(175.0, 80.0)
        };
        let report = calculate_bmi_report(&input, 1).unwrap();
        assert!(report.result.waist_to_height_ratio.is_some());
        assert!(report.result.waist_to_hip_ratio.is_none());

        let json = serde_json::to_value(&report.result).unwrap();
        assert!(json.get("waist_to_hip_ratio").is_none());
    }

    #[test]
    fn test_imperial_inputs_are_converted() {
        let values = InputValues::new()
            .with("unit_system", InputValue::Choice("imperial".to_string()))
            .with("height_in", InputValue::Number(70.0))
            .with("weight_lb", InputValue::Number(154.0))
            .with("waist", InputValue::Number(32.0));

        let input = BmiInput::from_values(&values).unwrap();
        assert!((input.height_cm - 177.8).abs() < 1e-9);
        assert!((input.weight_kg - 69.853_224_98).abs() < 1e-6);
        assert!((input.waist_cm.unwrap() - 81.28).abs() < 1e-9);

        let report = calculate_bmi_report(&input, 1).unwrap();
        assert!((report.result.bmi - 22.096).abs() < 0.001);
    }

    #[test]
    fn test_missing_weight_for_unit_system_is_invalid() {
        let values = InputValues::new()
            .with("unit_system", InputValue::Choice("imperial".to_string()))
            .with("height_in", InputValue::Number(70.0))
            .with("weight_kg", InputValue::Number(70.0));

        match BmiInput::from_values(&values) {
            Err(EngineError::InvalidInput { field, .. }) => assert_eq!(field, "weight_lb"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_teen_age_adds_warning() {
        let input = BmiInput {
            age: Some(18.0),
            ..metric_input(175.0, 70.0)
        };
        let report = calculate_bmi_report(&input, 1).unwrap();
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].code, "AGE_UNDER_20");
    }

    #[test]
    fn test_category_serializes_as_snake_case() {
        assert_eq!(
            serde_json::to_value(BmiCategory::ObeseClass2).unwrap(),
            serde_json::json!("obese_class_2")
        );
        assert_eq!(BmiCategory::ObeseClass2.to_string(), "obese_class_2");
    }

    proptest! {
        #[test]
        fn prop_category_is_monotonic(a in 5.0f64..80.0, b in 5.0f64..80.0) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(bmi_category(low) <= bmi_category(high));
        }

        #[test]
        fn prop_category_matches_boundaries(bmi in 5.0f64..80.0) {
            let category = bmi_category(bmi);
            let index = BmiCategory::ORDERED.iter().position(|c| *c == category).unwrap();
            if index > 0 {
                prop_assert!(bmi >= BMI_CATEGORY_BOUNDARIES[index - 1]);
            }
            if index < BMI_CATEGORY_BOUNDARIES.len() {
                prop_assert!(bmi < BMI_CATEGORY_BOUNDARIES[index]);
            }
        }

        #[test]
        fn prop_bmi_is_pure(weight in 20.0f64..300.0, height in 1.0f64..2.5) {
            prop_assert_eq!(calculate_bmi(weight, height).unwrap(), calculate_bmi(weight, height).unwrap());
        }
    }
}
