//! Calculation logic for the Calculator Engine.
//!
//! Every calculator is a pure function from typed inputs to a result struct
//! plus the audit steps that explain it. The [`engine`](run_calculator)
//! dispatches from a configured [`CalculatorKind`] to the right function.
//!
//! Health and date calculators use `f64`; the emergency fund uses exact
//! `Decimal` money arithmetic.

mod bmi;
mod body_ratios;
mod emergency_fund;
mod engine;
mod gender_predictor;
mod ideal_weight;
mod lunar_calendar;
mod ovulation;
mod transfer_time;
mod units;

pub use bmi::{
    BMI_CATEGORY_BOUNDARIES, BmiCategory, BmiInput, BmiReport, BmiResult, NORMAL_BMI_MAX,
    NORMAL_BMI_MIN, bmi_category, calculate_bmi, calculate_bmi_report,
};
pub use body_ratios::{
    WaistHeightAssessment, WaistHeightBand, WaistHipAssessment, WaistHipRisk, waist_height_band,
    waist_hip_risk, waist_to_height_ratio, waist_to_hip_ratio,
};
pub use emergency_fund::{
    CoverageSource, EmergencyFundInput, EmergencyFundReport, EmergencyFundResult, RiskProfile,
    calculate_emergency_fund,
};
pub use engine::{CalculatorKind, CalculatorOutput, evaluate, run_calculator};
pub use gender_predictor::{
    GenderPredictionReport, GenderPredictionResult, GenderPredictorInput, PredictedGender,
    PregnancyDateMode, chart_lookup, lunar_age, predict_gender,
};
pub use ideal_weight::{
    ActivityLevel, BodyFrame, FormulaEstimate, IdealWeightFormula, IdealWeightInput,
    IdealWeightReport, IdealWeightResult, calculate_ideal_weight,
};
pub use lunar_calendar::{
    FIRST_LUNAR_YEAR, LAST_LUNAR_YEAR, LunarDate, leap_month, month_days, supported_end,
    supported_start, to_lunar, year_days,
};
pub use ovulation::{
    CycleDates, DateWindow, OvulationInput, OvulationReport, OvulationResult, calculate_ovulation,
};
pub use transfer_time::{
    DataUnit, DurationBreakdown, INTERFACES, Interface, InterfaceEstimate, Link, SpeedUnit,
    TransferInput, TransferReport, TransferResult, calculate_transfer_time, find_interface,
    transfer_seconds,
};
pub use units::{
    CM_PER_INCH, KG_PER_POUND, Sex, UnitSystem, cm_to_inches, inches_to_cm, kg_to_pounds,
    pounds_to_kg,
};
