//! Gregorian to Chinese lunisolar date conversion.
//!
//! Conversion walks a fixed table of encoded lunar years starting at the
//! 1900 new year (1900-01-31), subtracting whole years and then whole
//! months from the day offset.
//!
//! Each table entry encodes one lunar year:
//! - bits 0-3: the month followed by a leap month (0 when there is none)
//! - bits 4-15: month lengths, month 1 at bit 15 (set = 30 days, clear = 29)
//! - bit 16: leap month length (set = 30 days, clear = 29)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// First lunar year in the table.
pub const FIRST_LUNAR_YEAR: i32 = 1900;

#[rustfmt::skip]
const LUNAR_YEARS: [u32; 150] = [
    0x04bd8, 0x04ae0, 0x0a570, 0x054d5, 0x0d260, 0x0d950, 0x16554, 0x056a0, 0x09ad0, 0x055d2, // 1900
    0x04ae0, 0x0a5b6, 0x0a4d0, 0x0d250, 0x1d255, 0x0b540, 0x0d6a0, 0x0ada2, 0x095b0, 0x14977, // 1910
    0x04970, 0x0a4b0, 0x0b4b5, 0x06a50, 0x06d40, 0x1ab54, 0x02b60, 0x09570, 0x052f2, 0x04970, // 1920
    0x06566, 0x0d4a0, 0x0ea50, 0x16a95, 0x05ad0, 0x02b60, 0x186e3, 0x092e0, 0x1c8d7, 0x0c950, // 1930
    0x0d4a0, 0x1d8a6, 0x0b550, 0x056a0, 0x1a5b4, 0x025d0, 0x092d0, 0x0d2b2, 0x0a950, 0x0b557, // 1940
    0x06ca0, 0x0b550, 0x15355, 0x04da0, 0x0a5b0, 0x14573, 0x052b0, 0x0a9a8, 0x0e950, 0x06aa0, // 1950
    0x0aea6, 0x0ab50, 0x04b60, 0x0aae4, 0x0a570, 0x05260, 0x0f263, 0x0d950, 0x05b57, 0x056a0, // 1960
    0x096d0, 0x04dd5, 0x04ad0, 0x0a4d0, 0x0d4d4, 0x0d250, 0x0d558, 0x0b540, 0x0b6a0, 0x195a6, // 1970
    0x095b0, 0x049b0, 0x0a974, 0x0a4b0, 0x0b27a, 0x06a50, 0x06d40, 0x0af46, 0x0ab60, 0x09570, // 1980
    0x04af5, 0x04970, 0x064b0, 0x074a3, 0x0ea50, 0x06b58, 0x05ac0, 0x0ab60, 0x096d5, 0x092e0, // 1990
    0x0c960, 0x0d954, 0x0d4a0, 0x0da50, 0x07552, 0x056a0, 0x0abb7, 0x025d0, 0x092d0, 0x0cab5, // 2000
    0x0a950, 0x0b4a0, 0x0baa4, 0x0ad50, 0x055d9, 0x04ba0, 0x0a5b0, 0x15176, 0x052b0, 0x0a930, // 2010
    0x07954, 0x06aa0, 0x0ad50, 0x05b52, 0x04b60, 0x0a6e6, 0x0a4e0, 0x0d260, 0x0ea65, 0x0d530, // 2020
    0x05aa0, 0x076a3, 0x096d0, 0x04afb, 0x04ad0, 0x0a4d0, 0x1d0b6, 0x0d250, 0x0d520, 0x0dd45, // 2030
    0x0b5a0, 0x056d0, 0x055b2, 0x049b0, 0x0a577, 0x0a4b0, 0x0aa50, 0x1b255, 0x06d20, 0x0ada0, // 2040
];

/// Last lunar year in the table.
pub const LAST_LUNAR_YEAR: i32 = FIRST_LUNAR_YEAR + LUNAR_YEARS.len() as i32 - 1;

/// A date in the Chinese lunisolar calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LunarDate {
    /// Lunar year (the Gregorian year in which it begins).
    pub year: i32,
    /// Lunar month, 1-12. A leap month carries the number of the month it follows.
    pub month: u32,
    /// Day of the lunar month, 1-30.
    pub day: u32,
    /// Whether the date falls in the leap (intercalary) month.
    pub is_leap_month: bool,
}

fn year_info(year: i32) -> u32 {
    LUNAR_YEARS[(year - FIRST_LUNAR_YEAR) as usize]
}

/// Returns the month after which the year's leap month falls, if any.
pub fn leap_month(year: i32) -> Option<u32> {
    match year_info(year) & 0xf {
        0 => None,
        month => Some(month),
    }
}

fn leap_month_days(year: i32) -> i64 {
    match leap_month(year) {
        None => 0,
        Some(_) if year_info(year) & 0x10000 != 0 => 30,
        Some(_) => 29,
    }
}

/// Length of a regular lunar month (1-12).
pub fn month_days(year: i32, month: u32) -> i64 {
    if year_info(year) & (0x10000 >> month) != 0 {
        30
    } else {
        29
    }
}

/// Total days in a lunar year, including any leap month.
pub fn year_days(year: i32) -> i64 {
    let regular: i64 = (1..=12).map(|month| month_days(year, month)).sum();
    regular + leap_month_days(year)
}

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 31).expect("Valid lunar epoch")
}

/// First Gregorian date the table covers.
pub fn supported_start() -> NaiveDate {
    epoch()
}

/// Last Gregorian date the table covers.
pub fn supported_end() -> NaiveDate {
    let total: i64 = (FIRST_LUNAR_YEAR..=LAST_LUNAR_YEAR).map(year_days).sum();
    epoch() + chrono::Duration::days(total - 1)
}

/// Converts a Gregorian date to its Chinese lunar date.
///
/// # Errors
///
/// Returns `InvalidInput` for dates outside the table
/// ([`supported_start`] ..= [`supported_end`]).
///
/// # Example
///
/// ```
/// use calculator_engine::calculation::to_lunar;
/// use chrono::NaiveDate;
///
/// // Lunar new year 2024
/// let lunar = to_lunar(NaiveDate::from_ymd_opt(2024, 2, 10).unwrap()).unwrap();
/// assert_eq!((lunar.year, lunar.month, lunar.day), (2024, 1, 1));
///
/// // The day before still belongs to 2023
/// let lunar = to_lunar(NaiveDate::from_ymd_opt(2024, 2, 9).unwrap()).unwrap();
/// assert_eq!((lunar.year, lunar.month, lunar.day), (2023, 12, 30));
/// ```
pub fn to_lunar(date: NaiveDate) -> EngineResult<LunarDate> {
    let mut offset = (date - epoch()).num_days();
    if offset < 0 || date > supported_end() {
        return Err(EngineError::invalid_input(
            "date",
            format!(
                "must be between {} and {}",
                supported_start(),
                supported_end()
            ),
        ));
    }

    let mut year = FIRST_LUNAR_YEAR;
    while offset >= year_days(year) {
        offset -= year_days(year);
        year += 1;
    }

    let leap = leap_month(year);
    let mut month = 1;
    loop {
        let days = month_days(year, month);
        if offset < days {
            break;
        }
        offset -= days;

        if leap == Some(month) {
            let days = leap_month_days(year);
            if offset < days {
                return Ok(LunarDate {
                    year,
                    month,
                    day: offset as u32 + 1,
                    is_leap_month: true,
                });
            }
            offset -= days;
        }
        month += 1;
    }

    Ok(LunarDate {
        year,
        month,
        day: offset as u32 + 1,
        is_leap_month: false,
    })
}
