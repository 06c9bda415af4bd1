//! Chinese gender chart prediction.
//!
//! The folklore chart is indexed by the mother's lunar age at conception
//! (18-45) and the lunar month of conception (1-12).

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, AuditWarning, InputValues};

use super::lunar_calendar::{LunarDate, to_lunar};

/// Youngest lunar age on the chart.
pub const MIN_LUNAR_AGE: i32 = 18;

/// Oldest lunar age on the chart.
pub const MAX_LUNAR_AGE: i32 = 45;

/// Days from conception to the estimated due date.
pub const CONCEPTION_TO_DUE_DAYS: i64 = 266;

/// Rows are lunar ages 18..=45, columns lunar months 1..=12.
#[rustfmt::skip]
const CHART: [&str; 28] = [
    "GBGBBBBBBBBB", // 18
    "BGBGGBBBBBGG", // 19
    "GBGBBBBBBGBB", // 20
    "BGGGGGGGGGGG", // 21
    "GBBGBGGBGGGG", // 22
    "BBBGBBGGGBBG", // 23
    "BGBBGBBGGGGG", // 24
    "GBBGGBGBBBBB", // 25
    "BGBGGBGBGGGG", // 26
    "GBGBGGBBBBGB", // 27
    "BGBGGGBBBBGG", // 28
    "GBGGBBBBBGGG", // 29
    "BGGGGGGGGGBB", // 30
    "BGBGGGGGGGGB", // 31
    "BGBGGGGGGGGB", // 32
    "GBGBGGGBGGGB", // 33
    "BGBGGGGGGGBB", // 34
    "BBGBGGGBGGBB", // 35
    "BGBBBGGGBBBB", // 36
    "GGBGGGBBBBBB", // 37
    "BBGGBGGBGGBG", // 38
    "GGBGGGBGBBGB", // 39
    "BGBBGBGBGBGG", // 40
    "GBGBGGBGBGBG", // 41
    "BGBGBGBGGBGB", // 42
    "GBGBGBGBBGBG", // 43
    "BGBGBGBGBGBG", // 44
    "GBGBGBGBGBGB", // 45
];

/// The chart's prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictedGender {
    /// Boy.
    Boy,
    /// Girl.
    Girl,
}

/// Looks up the chart cell for a lunar age and lunar month.
///
/// # Errors
///
/// Returns `InvalidInput` when the age is outside 18-45 or the month is
/// outside 1-12.
///
/// # Example
///
/// ```
/// use calculator_engine::calculation::{chart_lookup, PredictedGender};
///
/// assert_eq!(chart_lookup(18, 1).unwrap(), PredictedGender::Girl);
/// assert!(chart_lookup(46, 1).is_err());
/// ```
pub fn chart_lookup(lunar_age: i32, lunar_month: u32) -> EngineResult<PredictedGender> {
    if !(MIN_LUNAR_AGE..=MAX_LUNAR_AGE).contains(&lunar_age) {
        return Err(EngineError::invalid_input(
            "mother_birth_date",
            format!(
                "lunar age at conception must be between {} and {} (got {})",
                MIN_LUNAR_AGE, MAX_LUNAR_AGE, lunar_age
            ),
        ));
    }
    if !(1..=12).contains(&lunar_month) {
        return Err(EngineError::invalid_input(
            "conception_date",
            format!("lunar month must be between 1 and 12 (got {})", lunar_month),
        ));
    }

    let row = CHART[(lunar_age - MIN_LUNAR_AGE) as usize].as_bytes();
    Ok(match row[(lunar_month - 1) as usize] {
        b'B' => PredictedGender::Boy,
        _ => PredictedGender::Girl,
    })
}

/// Computes the lunar age convention: everyone is one at birth and gains a
/// year at each lunar new year.
pub fn lunar_age(mother_birth: &LunarDate, conception: &LunarDate) -> i32 {
    conception.year - mother_birth.year + 1
}

/// How the pregnancy date was supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PregnancyDateMode {
    /// The conception date was entered directly.
    Conception,
    /// The due date was entered; conception is 266 days earlier.
    DueDate,
}

/// Inputs to the gender predictor.
#[derive(Debug, Clone, PartialEq)]
pub struct GenderPredictorInput {
    /// Mother's Gregorian date of birth.
    pub mother_birth_date: NaiveDate,
    /// Gregorian conception date.
    pub conception_date: NaiveDate,
    /// How the conception date was derived.
    pub mode: PregnancyDateMode,
}

impl GenderPredictorInput {
    /// Reads the calculator inputs.
    pub fn from_values(values: &InputValues) -> EngineResult<Self> {
        let mother_birth_date = values.require_date("mother_birth_date")?;
        let mode = match values.choice("mode").unwrap_or("conception") {
            "conception" => PregnancyDateMode::Conception,
            "due_date" => PregnancyDateMode::DueDate,
            other => {
                return Err(EngineError::invalid_input(
                    "mode",
                    format!("unknown mode '{}'", other),
                ));
            }
        };

        let conception_date = match mode {
            PregnancyDateMode::Conception => values.require_date("conception_date")?,
            PregnancyDateMode::DueDate => values
                .require_date("due_date")?
                .checked_sub_signed(Duration::days(CONCEPTION_TO_DUE_DAYS))
                .ok_or_else(|| EngineError::invalid_input("due_date", "is out of range"))?,
        };

        Ok(Self {
            mother_birth_date,
            conception_date,
            mode,
        })
    }
}

/// Result of the gender predictor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenderPredictionResult {
    /// Chart prediction.
    pub prediction: PredictedGender,
    /// Mother's lunar age at conception.
    pub lunar_age: i32,
    /// Lunar month of conception.
    pub lunar_month: u32,
    /// Gregorian conception date used.
    pub conception_date: NaiveDate,
    /// Conception date in the lunar calendar.
    pub conception_lunar: LunarDate,
    /// Mother's birth date in the lunar calendar.
    pub mother_birth_lunar: LunarDate,
}

/// Gender prediction together with its audit trail.
#[derive(Debug, Clone)]
pub struct GenderPredictionReport {
    /// The computed values.
    pub result: GenderPredictionResult,
    /// The audit steps.
    pub audit_steps: Vec<AuditStep>,
    /// Notes to show alongside the result.
    pub warnings: Vec<AuditWarning>,
}

/// Runs the gender predictor.
///
/// # Example
///
/// ```
/// use calculator_engine::calculation::{
///     predict_gender, GenderPredictorInput, PregnancyDateMode,
/// };
/// use chrono::NaiveDate;
///
/// let input = GenderPredictorInput {
///     mother_birth_date: NaiveDate::from_ymd_opt(1993, 6, 10).unwrap(),
///     conception_date: NaiveDate::from_ymd_opt(2024, 6, 20).unwrap(),
///     mode: PregnancyDateMode::Conception,
/// };
///
/// let report = predict_gender(&input, 1).unwrap();
/// assert_eq!(report.result.lunar_age, 32);
/// assert_eq!(report.result.lunar_month, 5);
/// ```
pub fn predict_gender(
    input: &GenderPredictorInput,
    step_number: u32,
) -> EngineResult<GenderPredictionReport> {
    if input.conception_date <= input.mother_birth_date {
        return Err(EngineError::invalid_input(
            "conception_date",
            "must be after the mother's date of birth",
        ));
    }

    let mother_birth_lunar = to_lunar(input.mother_birth_date).map_err(|e| match e {
        EngineError::InvalidInput { message, .. } => {
            EngineError::invalid_input("mother_birth_date", message)
        }
        other => other,
    })?;
    let conception_field = match input.mode {
        PregnancyDateMode::Conception => "conception_date",
        PregnancyDateMode::DueDate => "due_date",
    };
    let conception_lunar = to_lunar(input.conception_date).map_err(|e| match e {
        EngineError::InvalidInput { message, .. } => {
            EngineError::invalid_input(conception_field, message)
        }
        other => other,
    })?;

    let age = lunar_age(&mother_birth_lunar, &conception_lunar);
    let prediction = chart_lookup(age, conception_lunar.month)?;

    let audit_steps = vec![
        AuditStep {
            step_number,
            rule_id: "lunar_conversion".to_string(),
            rule_name: "Lunar Calendar Conversion".to_string(),
            reference: "Chinese lunisolar calendar table 1900-2049".to_string(),
            input: serde_json::json!({
                "mother_birth_date": input.mother_birth_date,
                "conception_date": input.conception_date,
                "mode": input.mode,
            }),
            output: serde_json::json!({
                "mother_birth_lunar": mother_birth_lunar,
                "conception_lunar": conception_lunar,
                "lunar_age": age,
            }),
            reasoning: format!(
                "Lunar age = {} - {} + 1 = {}",
                conception_lunar.year, mother_birth_lunar.year, age
            ),
        },
        AuditStep {
            step_number: step_number + 1,
            rule_id: "gender_chart_lookup".to_string(),
            rule_name: "Chinese Gender Chart".to_string(),
            reference: "28 x 12 chart, lunar ages 18-45".to_string(),
            input: serde_json::json!({
                "lunar_age": age,
                "lunar_month": conception_lunar.month,
            }),
            output: serde_json::json!({ "prediction": prediction }),
            reasoning: format!(
                "Row {} column {} reads {:?}",
                age, conception_lunar.month, prediction
            ),
        },
    ];

    Ok(GenderPredictionReport {
        result: GenderPredictionResult {
            prediction,
            lunar_age: age,
            lunar_month: conception_lunar.month,
            conception_date: input.conception_date,
            conception_lunar,
            mother_birth_lunar,
        },
        audit_steps,
        warnings: vec![AuditWarning::new(
            "FOLKLORE",
            "The Chinese gender chart is a tradition, not a medical test",
            "info",
        )],
    })
}
