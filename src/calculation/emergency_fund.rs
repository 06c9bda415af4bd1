//! Emergency fund target and progress.
//!
//! All money arithmetic uses `Decimal`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, AuditWarning, InputValues};

/// Smallest accepted explicit coverage, in months.
pub const MIN_COVERAGE_MONTHS: u32 = 1;

/// Largest accepted explicit coverage, in months.
pub const MAX_COVERAGE_MONTHS: u32 = 24;

/// How predictable the household income is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskProfile {
    /// Salaried, secure job (3 months).
    Stable,
    /// Typical employment (6 months).
    Moderate,
    /// Commission or seasonal income (9 months).
    Variable,
    /// Self-employed or single income with dependants (12 months).
    High,
}

impl RiskProfile {
    /// Parses a risk profile option.
    pub fn parse(value: &str) -> EngineResult<Self> {
        match value {
            "stable" => Ok(Self::Stable),
            "moderate" => Ok(Self::Moderate),
            "variable" => Ok(Self::Variable),
            "high" => Ok(Self::High),
            other => Err(EngineError::invalid_input(
                "risk_profile",
                format!("unknown risk profile '{}'", other),
            )),
        }
    }

    /// Months of expenses recommended for this profile.
    pub fn recommended_months(&self) -> u32 {
        match self {
            Self::Stable => 3,
            Self::Moderate => 6,
            Self::Variable => 9,
            Self::High => 12,
        }
    }
}

/// Inputs to the emergency fund calculator.
#[derive(Debug, Clone, PartialEq)]
pub struct EmergencyFundInput {
    /// Essential monthly spending.
    pub monthly_expenses: Decimal,
    /// Explicit coverage, overriding the risk profile.
    pub months_of_coverage: Option<u32>,
    /// Income risk profile.
    pub risk_profile: RiskProfile,
    /// Savings already set aside.
    pub current_savings: Decimal,
    /// Amount added each month.
    pub monthly_contribution: Decimal,
}

impl EmergencyFundInput {
    /// Reads the calculator inputs.
    pub fn from_values(values: &InputValues) -> EngineResult<Self> {
        let months_of_coverage = match values.number("months_of_coverage") {
            None => None,
            Some(n) if n.fract() == 0.0
                && (f64::from(MIN_COVERAGE_MONTHS)..=f64::from(MAX_COVERAGE_MONTHS)).contains(&n) =>
            {
                Some(n as u32)
            }
            Some(_) => {
                return Err(EngineError::invalid_input(
                    "months_of_coverage",
                    format!(
                        "must be a whole number between {} and {}",
                        MIN_COVERAGE_MONTHS, MAX_COVERAGE_MONTHS
                    ),
                ));
            }
        };

        Ok(Self {
            monthly_expenses: values.require_money("monthly_expenses")?,
            months_of_coverage,
            risk_profile: RiskProfile::parse(values.choice("risk_profile").unwrap_or("moderate"))?,
            current_savings: values.money("current_savings").unwrap_or(Decimal::ZERO),
            monthly_contribution: values.money("monthly_contribution").unwrap_or(Decimal::ZERO),
        })
    }
}

/// Where the number of months came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageSource {
    /// Entered explicitly.
    Custom,
    /// Recommended for the risk profile.
    RiskProfile,
}

/// Result of the emergency fund calculator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmergencyFundResult {
    /// Months of expenses the fund should cover.
    pub months: u32,
    /// Where `months` came from.
    pub months_source: CoverageSource,
    /// The risk profile considered.
    pub risk_profile: RiskProfile,
    /// Target fund size.
    pub target: Decimal,
    /// Savings already set aside.
    pub current_savings: Decimal,
    /// Amount still needed (never negative).
    pub shortfall: Decimal,
    /// Savings as a percentage of the target, capped at 100.
    pub progress_percent: Decimal,
    /// Months of contributions needed to close the shortfall.
    /// Absent when no monthly contribution is made.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub months_to_goal: Option<u32>,
    /// How many months of expenses current savings cover.
    pub months_covered: Decimal,
    /// Whether the target has been reached.
    pub is_funded: bool,
}

/// Emergency fund result together with its audit trail.
#[derive(Debug, Clone)]
pub struct EmergencyFundReport {
    /// The computed values.
    pub result: EmergencyFundResult,
    /// The audit steps.
    pub audit_steps: Vec<AuditStep>,
    /// Notes to show alongside the result.
    pub warnings: Vec<AuditWarning>,
}

fn too_large(field: &str) -> EngineError {
    EngineError::invalid_input(field, "is too large")
}

fn round_half_up(value: Decimal, places: u32) -> Decimal {
    value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
}

/// Runs the emergency fund calculator.
///
/// # Errors
///
/// Returns `InvalidInput` for non-positive expenses, negative amounts, amounts
/// whose products overflow `Decimal`, and contributions too small for the
/// months to goal to be counted.
///
/// # Example
///
/// ```
/// use calculator_engine::calculation::{
///     calculate_emergency_fund, EmergencyFundInput, RiskProfile,
/// };
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let input = EmergencyFundInput {
///     monthly_expenses: Decimal::from_str("3000").unwrap(),
///     months_of_coverage: None,
///     risk_profile: RiskProfile::Moderate,
///     current_savings: Decimal::from_str("4500").unwrap(),
///     monthly_contribution: Decimal::from_str("500").unwrap(),
/// };
///
/// let result = calculate_emergency_fund(&input, 1).unwrap().result;
/// assert_eq!(result.target, Decimal::from_str("18000").unwrap());
/// assert_eq!(result.months_to_goal, Some(27));
/// ```
pub fn calculate_emergency_fund(
    input: &EmergencyFundInput,
    step_number: u32,
) -> EngineResult<EmergencyFundReport> {
    if input.monthly_expenses <= Decimal::ZERO {
        return Err(EngineError::invalid_input(
            "monthly_expenses",
            "must be greater than zero",
        ));
    }
    if input.current_savings < Decimal::ZERO {
        return Err(EngineError::invalid_input("current_savings", "must not be negative"));
    }
    if input.monthly_contribution < Decimal::ZERO {
        return Err(EngineError::invalid_input(
            "monthly_contribution",
            "must not be negative",
        ));
    }

    let (months, months_source) = match input.months_of_coverage {
        Some(months) => (months, CoverageSource::Custom),
        None => (
            input.risk_profile.recommended_months(),
            CoverageSource::RiskProfile,
        ),
    };

    let target = input
        .monthly_expenses
        .checked_mul(Decimal::from(months))
        .ok_or_else(|| too_large("monthly_expenses"))?;
    let shortfall = (target - input.current_savings).max(Decimal::ZERO);
    let progress_percent = input
        .current_savings
        .checked_div(target)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map_or(Decimal::ONE_HUNDRED, |percent| percent.min(Decimal::ONE_HUNDRED));
    let progress_percent = round_half_up(progress_percent, 2);
    let months_covered = input
        .current_savings
        .checked_div(input.monthly_expenses)
        .ok_or_else(|| too_large("current_savings"))?;
    let months_covered = round_half_up(months_covered, 1);

    let months_to_goal = if shortfall.is_zero() {
        Some(0)
    } else if input.monthly_contribution.is_zero() {
        None
    } else {
        let months = shortfall
            .checked_div(input.monthly_contribution)
            .map(|m| m.ceil())
            .and_then(|m| m.to_u32())
            .ok_or_else(|| {
                EngineError::invalid_input(
                    "monthly_contribution",
                    "is too small to reach the target",
                )
            })?;
        Some(months)
    };

    let result = EmergencyFundResult {
        months,
        months_source,
        risk_profile: input.risk_profile,
        target,
        current_savings: input.current_savings,
        shortfall,
        progress_percent,
        months_to_goal,
        months_covered,
        is_funded: shortfall.is_zero(),
    };

    let audit_steps = vec![
        AuditStep {
            step_number,
            rule_id: "emergency_fund_target".to_string(),
            rule_name: "Emergency Fund Target".to_string(),
            reference: "target = monthly expenses x months of coverage".to_string(),
            input: serde_json::json!({
                "monthly_expenses": input.monthly_expenses.to_string(),
                "months": months,
                "months_source": months_source,
            }),
            output: serde_json::json!({ "target": target.to_string() }),
            reasoning: format!("${} x {} months = ${}", input.monthly_expenses, months, target),
        },
        AuditStep {
            step_number: step_number + 1,
            rule_id: "emergency_fund_progress".to_string(),
            rule_name: "Savings Progress".to_string(),
            reference: "shortfall = max(target - savings, 0)".to_string(),
            input: serde_json::json!({
                "current_savings": input.current_savings.to_string(),
                "monthly_contribution": input.monthly_contribution.to_string(),
            }),
            output: serde_json::json!({
                "shortfall": shortfall.to_string(),
                "progress_percent": progress_percent.to_string(),
                "months_to_goal": months_to_goal,
            }),
            reasoning: match months_to_goal {
                Some(0) => "Savings already meet the target".to_string(),
                Some(n) => format!(
                    "${} / ${} per month = {} months",
                    shortfall, input.monthly_contribution, n
                ),
                None => format!("${} short with no monthly contribution", shortfall),
            },
        },
    ];

    let mut warnings = Vec::new();
    if !shortfall.is_zero() && input.monthly_contribution.is_zero() {
        warnings.push(AuditWarning::new(
            "NO_CONTRIBUTION",
            "No monthly contribution entered; the goal date cannot be estimated",
            "low",
        ));
    }

    Ok(EmergencyFundReport {
        result,
        audit_steps,
        warnings,
    })
}
