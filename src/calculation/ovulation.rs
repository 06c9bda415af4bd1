//! Ovulation and fertile window calendar.
//!
//! Day 1 of a cycle is the first day of the last menstrual period (LMP).
//! Ovulation falls `luteal_phase` days before the next period.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, AuditWarning, InputValues};

/// Default cycle length in days.
pub const DEFAULT_CYCLE_LENGTH: u32 = 28;

/// Default luteal phase in days.
pub const DEFAULT_LUTEAL_PHASE: u32 = 14;

/// Default number of cycles in the calendar.
pub const DEFAULT_CYCLES_TO_SHOW: u32 = 3;

/// Days before ovulation that open the fertile window.
pub const FERTILE_DAYS_BEFORE: i64 = 5;

/// Days before ovulation that open the peak fertility window.
pub const PEAK_DAYS_BEFORE: i64 = 2;

/// Implantation window, in days after ovulation.
pub const IMPLANTATION_DAYS: (i64, i64) = (6, 12);

/// Naegele's rule: LMP + 280 days.
pub const GESTATION_DAYS: i64 = 280;

/// An inclusive range of dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    /// First day.
    pub start: NaiveDate,
    /// Last day (inclusive).
    pub end: NaiveDate,
}

impl DateWindow {
    fn around(anchor: NaiveDate, from: i64, to: i64) -> EngineResult<Self> {
        Ok(Self {
            start: shift(anchor, from)?,
            end: shift(anchor, to)?,
        })
    }

    /// Returns true if `date` falls within the window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Inputs to the ovulation calculator.
#[derive(Debug, Clone, PartialEq)]
pub struct OvulationInput {
    /// First day of the last menstrual period.
    pub last_period_date: NaiveDate,
    /// Cycle length in days (21-45).
    pub cycle_length: u32,
    /// Luteal phase in days (9-16).
    pub luteal_phase: u32,
    /// Number of cycles to project (1-12).
    pub cycles_to_show: u32,
}

impl OvulationInput {
    /// Reads the calculator inputs, applying the usual defaults.
    pub fn from_values(values: &InputValues) -> EngineResult<Self> {
        Ok(Self {
            last_period_date: values.require_date("last_period_date")?,
            cycle_length: whole_days(values, "cycle_length", DEFAULT_CYCLE_LENGTH)?,
            luteal_phase: whole_days(values, "luteal_phase", DEFAULT_LUTEAL_PHASE)?,
            cycles_to_show: whole_days(values, "cycles_to_show", DEFAULT_CYCLES_TO_SHOW)?,
        })
    }
}

fn whole_days(values: &InputValues, key: &str, default: u32) -> EngineResult<u32> {
    match values.number(key) {
        None => Ok(default),
        Some(n) if n >= 1.0 && n.fract() == 0.0 && n <= f64::from(u32::MAX) => Ok(n as u32),
        Some(_) => Err(EngineError::invalid_input(key, "must be a whole number of days")),
    }
}

/// Key dates for one cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleDates {
    /// 1-based cycle index; 1 is the cycle that starts at the LMP.
    pub cycle: u32,
    /// First day of this cycle's period.
    pub period_start: NaiveDate,
    /// Estimated ovulation date.
    pub ovulation_date: NaiveDate,
    /// Five days before ovulation through ovulation.
    pub fertile_window: DateWindow,
    /// Two days before ovulation through ovulation.
    pub peak_days: DateWindow,
    /// First day of the following period.
    pub next_period: NaiveDate,
}

/// Result of the ovulation calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OvulationResult {
    /// Cycle day of ovulation (LMP = day 1).
    pub ovulation_day: u32,
    /// Estimated ovulation date of the current cycle.
    pub ovulation_date: NaiveDate,
    /// Fertile window of the current cycle.
    pub fertile_window: DateWindow,
    /// Peak fertility days of the current cycle.
    pub peak_days: DateWindow,
    /// Likely implantation window if conception occurs.
    pub implantation_window: DateWindow,
    /// Expected start of the next period.
    pub next_period: NaiveDate,
    /// Earliest date a home pregnancy test is reliable.
    pub pregnancy_test_date: NaiveDate,
    /// Estimated due date if conception occurs this cycle.
    pub due_date: NaiveDate,
    /// Projected calendar for the requested number of cycles.
    pub upcoming_cycles: Vec<CycleDates>,
}

/// Ovulation result together with its audit trail.
#[derive(Debug, Clone)]
pub struct OvulationReport {
    /// The computed values.
    pub result: OvulationResult,
    /// The audit steps.
    pub audit_steps: Vec<AuditStep>,
    /// Notes to show alongside the result.
    pub warnings: Vec<AuditWarning>,
}

/// Moves a date by whole days; dates past chrono's range are rejected
/// against the input they were derived from.
fn shift(date: NaiveDate, days: i64) -> EngineResult<NaiveDate> {
    date.checked_add_signed(Duration::days(days))
        .ok_or_else(|| EngineError::invalid_input("last_period_date", "is out of range"))
}

fn cycle_dates(
    cycle: u32,
    period_start: NaiveDate,
    input: &OvulationInput,
) -> EngineResult<CycleDates> {
    let ovulation_offset = i64::from(input.cycle_length - input.luteal_phase) - 1;
    let ovulation_date = shift(period_start, ovulation_offset)?;

    Ok(CycleDates {
        cycle,
        period_start,
        ovulation_date,
        fertile_window: DateWindow::around(ovulation_date, -FERTILE_DAYS_BEFORE, 0)?,
        peak_days: DateWindow::around(ovulation_date, -PEAK_DAYS_BEFORE, 0)?,
        next_period: shift(period_start, i64::from(input.cycle_length))?,
    })
}

/// Runs the ovulation calculator.
///
/// # Errors
///
/// Returns `InvalidInput` when the luteal phase is not shorter than the cycle,
/// `cycles_to_show` is zero, or a projected date falls outside the calendar.
///
/// # Example
///
/// ```
/// use calculator_engine::calculation::{calculate_ovulation, OvulationInput};
/// use chrono::NaiveDate;
///
/// let input = OvulationInput {
///     last_period_date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
///     cycle_length: 28,
///     luteal_phase: 14,
///     cycles_to_show: 3,
/// };
///
/// let result = calculate_ovulation(&input, 1).unwrap().result;
/// assert_eq!(result.ovulation_date, NaiveDate::from_ymd_opt(2025, 2, 14).unwrap());
/// assert_eq!(result.next_period, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
/// ```
pub fn calculate_ovulation(input: &OvulationInput, step_number: u32) -> EngineResult<OvulationReport> {
    if input.luteal_phase >= input.cycle_length {
        return Err(EngineError::invalid_input(
            "luteal_phase",
            "must be shorter than the cycle length",
        ));
    }
    if input.cycles_to_show == 0 {
        return Err(EngineError::invalid_input("cycles_to_show", "must be at least 1"));
    }

    let ovulation_day = input.cycle_length - input.luteal_phase;
    let mut upcoming_cycles = Vec::with_capacity(input.cycles_to_show as usize);
    let mut period_start = input.last_period_date;
    for cycle in 1..=input.cycles_to_show {
        let dates = cycle_dates(cycle, period_start, input)?;
        period_start = dates.next_period;
        upcoming_cycles.push(dates);
    }

    let current = &upcoming_cycles[0];
    let result = OvulationResult {
        ovulation_day,
        ovulation_date: current.ovulation_date,
        fertile_window: current.fertile_window,
        peak_days: current.peak_days,
        implantation_window: DateWindow::around(
            current.ovulation_date,
            IMPLANTATION_DAYS.0,
            IMPLANTATION_DAYS.1,
        )?,
        next_period: current.next_period,
        pregnancy_test_date: current.next_period,
        due_date: shift(input.last_period_date, GESTATION_DAYS)?,
        upcoming_cycles,
    };

    let audit_steps = vec![
        AuditStep {
            step_number,
            rule_id: "ovulation_date".to_string(),
            rule_name: "Ovulation Estimate".to_string(),
            reference: "ovulation day = cycle length - luteal phase".to_string(),
            input: serde_json::json!({
                "last_period_date": input.last_period_date,
                "cycle_length": input.cycle_length,
                "luteal_phase": input.luteal_phase,
            }),
            output: serde_json::json!({
                "ovulation_day": ovulation_day,
                "ovulation_date": result.ovulation_date,
                "fertile_window": result.fertile_window,
            }),
            reasoning: format!(
                "Cycle day {} - {} = {}; LMP {} + {} days = {}",
                input.cycle_length,
                input.luteal_phase,
                ovulation_day,
                input.last_period_date,
                ovulation_day - 1,
                result.ovulation_date
            ),
        },
        AuditStep {
            step_number: step_number + 1,
            rule_id: "due_date".to_string(),
            rule_name: "Naegele's Rule".to_string(),
            reference: "LMP + 280 days".to_string(),
            input: serde_json::json!({ "last_period_date": input.last_period_date }),
            output: serde_json::json!({ "due_date": result.due_date }),
            reasoning: format!("{} + {} days = {}", input.last_period_date, GESTATION_DAYS, result.due_date),
        },
    ];

    let mut warnings = Vec::new();
    if input.cycle_length < 24 || input.cycle_length > 38 {
        warnings.push(AuditWarning::new(
            "IRREGULAR_CYCLE",
            format!(
                "A {}-day cycle is outside the typical 24-38 day range; estimates are less reliable",
                input.cycle_length
            ),
            "low",
        ));
    }

    Ok(OvulationReport {
        result,
        audit_steps,
        warnings,
    })
}
