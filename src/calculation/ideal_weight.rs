//! Ideal body weight estimation.
//!
//! Seven published formulas are evaluated and averaged. The average is then
//! scaled by body frame (exactly ±10%) and by a small activity multiplier.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, AuditWarning, InputValues};

use super::units::{Sex, UnitSystem, cm_to_inches, kg_to_pounds};

/// Height below which the inch-based formulas extrapolate (five feet).
pub const FIVE_FEET_CM: f64 = 152.4;

/// Target BMI used by the Peterson formula.
const PETERSON_TARGET_BMI: f64 = 22.0;

/// A published ideal body weight formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdealWeightFormula {
    /// Robinson (1983).
    Robinson,
    /// Miller (1983).
    Miller,
    /// Devine (1974).
    Devine,
    /// Hamwi (1964).
    Hamwi,
    /// Peterson (2016), BMI-22 based.
    Peterson,
    /// Broca index, sex-adjusted.
    Broca,
    /// Lorentz (1929).
    Lorentz,
}

impl IdealWeightFormula {
    /// All formulas in reporting order.
    pub const ALL: [IdealWeightFormula; 7] = [
        IdealWeightFormula::Peterson,
        IdealWeightFormula::Devine,
        IdealWeightFormula::Robinson,
        IdealWeightFormula::Miller,
        IdealWeightFormula::Hamwi,
        IdealWeightFormula::Broca,
        IdealWeightFormula::Lorentz,
    ];

    /// Evaluates the formula for a height in centimetres.
    ///
    /// The inch-based formulas are linear in inches over five feet and are
    /// extrapolated below that height.
    ///
    /// # Example
    ///
    /// ```
    /// use calculator_engine::calculation::{IdealWeightFormula, Sex};
    ///
    /// // Exactly five feet: the Devine base weight
    /// let kg = IdealWeightFormula::Devine.estimate_kg(152.4, Sex::Male);
    /// assert!((kg - 50.0).abs() < 1e-9);
    /// ```
    pub fn estimate_kg(&self, height_cm: f64, sex: Sex) -> f64 {
        let over_five_feet = cm_to_inches(height_cm) - 60.0;
        let height_m = height_cm / 100.0;

        match (self, sex) {
            (IdealWeightFormula::Robinson, Sex::Male) => 52.0 + 1.9 * over_five_feet,
            (IdealWeightFormula::Robinson, Sex::Female) => 49.0 + 1.7 * over_five_feet,
            (IdealWeightFormula::Miller, Sex::Male) => 56.2 + 1.41 * over_five_feet,
            (IdealWeightFormula::Miller, Sex::Female) => 53.1 + 1.36 * over_five_feet,
            (IdealWeightFormula::Devine, Sex::Male) => 50.0 + 2.3 * over_five_feet,
            (IdealWeightFormula::Devine, Sex::Female) => 45.5 + 2.3 * over_five_feet,
            (IdealWeightFormula::Hamwi, Sex::Male) => 48.0 + 2.7 * over_five_feet,
            (IdealWeightFormula::Hamwi, Sex::Female) => 45.5 + 2.2 * over_five_feet,
            (IdealWeightFormula::Peterson, _) => {
                2.2 * PETERSON_TARGET_BMI + 3.5 * PETERSON_TARGET_BMI * (height_m - 1.5)
            }
            (IdealWeightFormula::Broca, Sex::Male) => (height_cm - 100.0) * 0.9,
            (IdealWeightFormula::Broca, Sex::Female) => (height_cm - 100.0) * 0.85,
            (IdealWeightFormula::Lorentz, Sex::Male) => {
                height_cm - 100.0 - (height_cm - 150.0) / 4.0
            }
            (IdealWeightFormula::Lorentz, Sex::Female) => {
                height_cm - 100.0 - (height_cm - 150.0) / 2.0
            }
        }
    }
}

/// Body frame size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyFrame {
    /// 10% below the average.
    Small,
    /// No adjustment.
    Medium,
    /// 10% above the average.
    Large,
}

impl BodyFrame {
    /// Parses the `frame` select value.
    pub fn parse(value: &str) -> EngineResult<Self> {
        match value {
            "small" => Ok(BodyFrame::Small),
            "medium" => Ok(BodyFrame::Medium),
            "large" => Ok(BodyFrame::Large),
            other => Err(EngineError::invalid_input(
                "frame",
                format!("unknown frame size '{}'", other),
            )),
        }
    }

    /// Multiplier applied to the formula average.
    pub fn factor(&self) -> f64 {
        match self {
            BodyFrame::Small => 0.9,
            BodyFrame::Medium => 1.0,
            BodyFrame::Large => 1.1,
        }
    }
}

/// Habitual activity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise.
    Sedentary,
    /// Exercise 1-3 days a week.
    Light,
    /// Exercise 3-5 days a week.
    Moderate,
    /// Exercise 6-7 days a week.
    Active,
    /// Physical job or twice-daily training.
    VeryActive,
}

impl ActivityLevel {
    /// Parses the `activity` select value.
    pub fn parse(value: &str) -> EngineResult<Self> {
        match value {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "light" => Ok(ActivityLevel::Light),
            "moderate" => Ok(ActivityLevel::Moderate),
            "active" => Ok(ActivityLevel::Active),
            "very_active" => Ok(ActivityLevel::VeryActive),
            other => Err(EngineError::invalid_input(
                "activity",
                format!("unknown activity level '{}'", other),
            )),
        }
    }

    /// Lean-mass multiplier for this activity level.
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.00,
            ActivityLevel::Light => 1.01,
            ActivityLevel::Moderate => 1.02,
            ActivityLevel::Active => 1.03,
            ActivityLevel::VeryActive => 1.04,
        }
    }
}

/// Inputs to the ideal weight calculator.
#[derive(Debug, Clone, PartialEq)]
pub struct IdealWeightInput {
    /// Height in centimetres.
    pub height_cm: f64,
    /// Sex.
    pub sex: Sex,
    /// Body frame.
    pub frame: BodyFrame,
    /// Activity level.
    pub activity: ActivityLevel,
}

impl IdealWeightInput {
    /// Reads the calculator inputs.
    ///
    /// `frame` defaults to medium and `activity` to sedentary.
    pub fn from_values(values: &InputValues) -> EngineResult<Self> {
        let unit_system = UnitSystem::parse(values.choice("unit_system").unwrap_or("metric"))?;
        let height_key = match unit_system {
            UnitSystem::Metric => "height_cm",
            UnitSystem::Imperial => "height_in",
        };

        Ok(Self {
            height_cm: unit_system.length_to_cm(values.require_number(height_key)?),
            sex: Sex::parse(values.require_choice("sex")?)?,
            frame: BodyFrame::parse(values.choice("frame").unwrap_or("medium"))?,
            activity: ActivityLevel::parse(values.choice("activity").unwrap_or("sedentary"))?,
        })
    }
}

/// One formula's estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FormulaEstimate {
    /// The formula.
    pub formula: IdealWeightFormula,
    /// Unadjusted estimate in kilograms.
    pub kg: f64,
}

/// Result of the ideal weight calculator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdealWeightResult {
    /// Per-formula estimates before adjustment.
    pub formulas: Vec<FormulaEstimate>,
    /// Arithmetic mean of the seven formulas.
    pub average_kg: f64,
    /// Frame multiplier applied.
    pub frame_factor: f64,
    /// Activity multiplier applied.
    pub activity_multiplier: f64,
    /// Average after frame and activity adjustment.
    pub ideal_weight_kg: f64,
    /// Adjusted weight in pounds.
    pub ideal_weight_lb: f64,
    /// Lowest adjusted formula estimate.
    pub range_min_kg: f64,
    /// Highest adjusted formula estimate.
    pub range_max_kg: f64,
}

/// Ideal weight result together with its audit trail.
#[derive(Debug, Clone)]
pub struct IdealWeightReport {
    /// The computed values.
    pub result: IdealWeightResult,
    /// The audit steps recording each formula.
    pub audit_steps: Vec<AuditStep>,
    /// Notes to show alongside the result.
    pub warnings: Vec<AuditWarning>,
}

/// Runs the ideal weight calculator.
///
/// # Example
///
/// ```
/// use calculator_engine::calculation::{
///     calculate_ideal_weight, ActivityLevel, BodyFrame, IdealWeightInput, Sex,
/// };
///
/// let medium = IdealWeightInput {
///     height_cm: 175.0,
///     sex: Sex::Male,
///     frame: BodyFrame::Medium,
///     activity: ActivityLevel::Sedentary,
/// };
/// let large = IdealWeightInput { frame: BodyFrame::Large, ..medium.clone() };
///
/// let base = calculate_ideal_weight(&medium, 1).unwrap().result;
/// let adjusted = calculate_ideal_weight(&large, 1).unwrap().result;
/// assert!((adjusted.ideal_weight_kg - base.average_kg * 1.1).abs() < 1e-9);
/// ```
pub fn calculate_ideal_weight(
    input: &IdealWeightInput,
    step_number: u32,
) -> EngineResult<IdealWeightReport> {
    if !(input.height_cm.is_finite() && input.height_cm > 0.0) {
        return Err(EngineError::invalid_input(
            "height",
            "must be greater than zero",
        ));
    }

    let formulas: Vec<FormulaEstimate> = IdealWeightFormula::ALL
        .iter()
        .map(|formula| FormulaEstimate {
            formula: *formula,
            kg: formula.estimate_kg(input.height_cm, input.sex),
        })
        .collect();

    let average_kg = formulas.iter().map(|f| f.kg).sum::<f64>() / formulas.len() as f64;
    let frame_factor = input.frame.factor();
    let activity_multiplier = input.activity.multiplier();
    let adjustment = frame_factor * activity_multiplier;
    let ideal_weight_kg = average_kg * adjustment;

    let (min_kg, max_kg) = formulas
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), f| {
            (lo.min(f.kg), hi.max(f.kg))
        });

    let audit_steps = vec![
        AuditStep {
            step_number,
            rule_id: "ideal_weight_formulas".to_string(),
            rule_name: "Ideal Weight Formulas".to_string(),
            reference: "Peterson, Devine, Robinson, Miller, Hamwi, Broca, Lorentz".to_string(),
            input: serde_json::json!({
                "height_cm": input.height_cm,
                "sex": input.sex,
            }),
            output: serde_json::json!({ "formulas": formulas, "average_kg": average_kg }),
            reasoning: format!(
                "Mean of {} formulas = {:.2} kg",
                formulas.len(),
                average_kg
            ),
        },
        AuditStep {
            step_number: step_number + 1,
            rule_id: "ideal_weight_adjustment".to_string(),
            rule_name: "Frame and Activity Adjustment".to_string(),
            reference: "frame ±10%; activity multiplier table".to_string(),
            input: serde_json::json!({
                "average_kg": average_kg,
                "frame": input.frame,
                "activity": input.activity,
            }),
            output: serde_json::json!({ "ideal_weight_kg": ideal_weight_kg }),
            reasoning: format!(
                "{:.2} kg x {} x {} = {:.2} kg",
                average_kg, frame_factor, activity_multiplier, ideal_weight_kg
            ),
        },
    ];

    let mut warnings = Vec::new();
    if input.height_cm < FIVE_FEET_CM {
        warnings.push(AuditWarning::new(
            "SHORT_STATURE",
            "The inch-based formulas were derived for heights of five feet and above",
            "medium",
        ));
    }

    Ok(IdealWeightReport {
        result: IdealWeightResult {
            formulas,
            average_kg,
            frame_factor,
            activity_multiplier,
            ideal_weight_kg,
            ideal_weight_lb: kg_to_pounds(ideal_weight_kg),
            range_min_kg: min_kg * adjustment,
            range_max_kg: max_kg * adjustment,
        },
        audit_steps,
        warnings,
    })
}
