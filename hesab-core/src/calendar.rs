//! # Calendar Converter
//!
//! Civil-date conversion between the Gregorian and Jalaali (Persian solar
//! Hijri) calendars. There is no timezone handling here: only calendar
//! fields are converted.
//!
//! Both calendars are mapped onto a shared day number (days from the common
//! era as counted by [`chrono::NaiveDate::num_days_from_ce`]), which makes
//! the conversion exact in both directions.
//!
//! Leap years follow the 33-year cycle rule: year `y` is leap iff
//! `(25y + 11) mod 33 < 8`. Each 33-year cycle therefore holds exactly 8
//! leap years.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::digits::to_latin_digits;
use crate::types::{DateSystem, HesabError, Language};

/// Day number (CE) of the day before 1 Farvardin of year 1.
/// Anchored so that 1403/01/01 is 2024-03-20.
const JALAALI_EPOCH: i64 = 226_894;

const CYCLE_YEARS: i64 = 33;
const LEAPS_PER_CYCLE: i64 = 8;
const CYCLE_DAYS: i64 = CYCLE_YEARS * 365 + LEAPS_PER_CYCLE;

/// First six months of the year are 31 days long.
const FIRST_HALF_DAYS: u32 = 186;

const MONTH_NAMES_EN: [&str; 12] = [
    "Farvardin",
    "Ordibehesht",
    "Khordad",
    "Tir",
    "Mordad",
    "Shahrivar",
    "Mehr",
    "Aban",
    "Azar",
    "Dey",
    "Bahman",
    "Esfand",
];

const MONTH_NAMES_FA: [&str; 12] = [
    "فروردین",
    "اردیبهشت",
    "خرداد",
    "تیر",
    "مرداد",
    "شهریور",
    "مهر",
    "آبان",
    "آذر",
    "دی",
    "بهمن",
    "اسفند",
];

/// Leap year test under the 33-year cycle rule.
pub fn is_jalaali_leap_year(year: i32) -> bool {
    is_leap(i64::from(year))
}

fn is_leap(year: i64) -> bool {
    (25 * year + 11).rem_euclid(CYCLE_YEARS) < 8
}

/// Number of days in `month` of Jalaali `year`; 0 for an invalid month.
pub fn days_in_jalaali_month(year: i32, month: u32) -> u32 {
    match month {
        1..=6 => 31,
        7..=11 => 30,
        12 if is_jalaali_leap_year(year) => 30,
        12 => 29,
        _ => 0,
    }
}

/// Leap years in `(0, year]`, negative when `year < 0`.
fn leap_years_through(year: i64) -> i64 {
    let cycles = year.div_euclid(CYCLE_YEARS);
    let rest = year.rem_euclid(CYCLE_YEARS);
    // The rule is periodic in 33, so the partial cycle matches years 1..=rest.
    let partial = (1..=rest).filter(|y| is_leap(*y)).count() as i64;
    cycles * LEAPS_PER_CYCLE + partial
}

fn days_before_year(year: i64) -> i64 {
    365 * (year - 1) + leap_years_through(year - 1)
}

fn days_before_month(month: u32) -> u32 {
    if month <= 7 {
        31 * (month - 1)
    } else {
        FIRST_HALF_DAYS + 30 * (month - 7)
    }
}

/// A validated date in the Jalaali calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawJalaaliDate")]
pub struct JalaaliDate {
    year: i32,
    month: u32,
    day: u32,
}

#[derive(Deserialize)]
struct RawJalaaliDate {
    year: i32,
    month: u32,
    day: u32,
}

impl TryFrom<RawJalaaliDate> for JalaaliDate {
    type Error = HesabError;

    fn try_from(raw: RawJalaaliDate) -> Result<Self, Self::Error> {
        JalaaliDate::new(raw.year, raw.month, raw.day)
    }
}

impl JalaaliDate {
    /// Creates a date, rejecting days past the end of the month.
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, HesabError> {
        if !(1..=12).contains(&month) || day == 0 || day > days_in_jalaali_month(year, month) {
            return Err(HesabError::InvalidCalendarDate {
                system: DateSystem::Persian,
                year,
                month,
                day,
            });
        }
        Ok(Self { year, month, day })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn is_leap_year(&self) -> bool {
        is_jalaali_leap_year(self.year)
    }

    /// Day of the year, 1-based.
    pub fn ordinal(&self) -> u32 {
        days_before_month(self.month) + self.day
    }

    fn day_number(&self) -> i64 {
        JALAALI_EPOCH + days_before_year(i64::from(self.year)) + i64::from(self.ordinal())
    }

    /// Splits a day number into year, month and day. Always yields a valid
    /// date; only the year may exceed the `i32` range.
    fn fields_from_day_number(number: i64) -> (i64, u32, u32) {
        let days = number - JALAALI_EPOCH;
        let mut year = (days - 1).div_euclid(CYCLE_DAYS) * CYCLE_YEARS
            + ((days - 1).rem_euclid(CYCLE_DAYS) * CYCLE_YEARS) / CYCLE_DAYS
            + 1;
        while days_before_year(year + 1) < days {
            year += 1;
        }
        while days_before_year(year) >= days {
            year -= 1;
        }

        // 1..=366 after the adjustment above.
        let ordinal = (days - days_before_year(year)) as u32;
        let (month, day) = if ordinal <= FIRST_HALF_DAYS {
            ((ordinal - 1) / 31 + 1, (ordinal - 1) % 31 + 1)
        } else {
            let rest = ordinal - FIRST_HALF_DAYS - 1;
            (rest / 30 + 7, rest % 30 + 1)
        };
        (year, month, day)
    }

    fn from_day_number(number: i64) -> Result<Self, HesabError> {
        let (year, month, day) = Self::fields_from_day_number(number);
        let year = i32::try_from(year).map_err(|_| HesabError::out_of_range("jalaali year"))?;
        JalaaliDate::new(year, month, day)
    }

    /// Converts a Gregorian civil date.
    pub fn from_gregorian(date: NaiveDate) -> Self {
        let (year, month, day) = Self::fields_from_day_number(i64::from(date.num_days_from_ce()));
        // chrono years fit in i32 with a wide margin, and so do their Jalaali counterparts.
        Self {
            year: year as i32,
            month,
            day,
        }
    }

    /// The Jalaali date of a wall-clock reading, e.g. for the "Now" button.
    pub fn today(now: chrono::NaiveDateTime) -> Self {
        Self::from_gregorian(now.date())
    }

    /// Converts to the Gregorian civil date.
    pub fn to_gregorian(&self) -> Result<NaiveDate, HesabError> {
        i32::try_from(self.day_number())
            .ok()
            .and_then(NaiveDate::from_num_days_from_ce_opt)
            .ok_or_else(|| HesabError::out_of_range(format!("jalaali {self} to gregorian")))
    }

    pub fn weekday(&self) -> Result<Weekday, HesabError> {
        Ok(self.to_gregorian()?.weekday())
    }

    pub fn add_days(&self, days: i64) -> Result<Self, HesabError> {
        let number = self
            .day_number()
            .checked_add(days)
            .ok_or_else(|| HesabError::out_of_range("jalaali add_days"))?;
        Self::from_day_number(number)
    }

    pub fn first_day_of_month(&self) -> Self {
        Self { day: 1, ..*self }
    }

    pub fn last_day_of_month(&self) -> Self {
        Self {
            day: days_in_jalaali_month(self.year, self.month),
            ..*self
        }
    }

    /// Month name in the given UI language.
    pub fn month_name(&self, language: Language) -> &'static str {
        jalaali_month_name(self.month, language).unwrap_or_default()
    }
}

impl fmt::Display for JalaaliDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}/{:02}/{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for JalaaliDate {
    type Err = HesabError;

    /// Parses `YYYY/MM/DD` (or `-` separated) in any digit system.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = to_latin_digits(s.trim());
        let invalid = || HesabError::invalid_format(s, DateSystem::Persian);
        let separator = if normalized.contains('/') { '/' } else { '-' };
        let mut parts = normalized.split(separator);
        let (Some(y), Some(m), Some(d), None) = (parts.next(), parts.next(), parts.next(), parts.next()) else {
            return Err(invalid());
        };
        let year = y.parse::<i32>().map_err(|_| invalid())?;
        let month = m.parse::<u32>().map_err(|_| invalid())?;
        let day = d.parse::<u32>().map_err(|_| invalid())?;
        JalaaliDate::new(year, month, day)
    }
}

/// Gregorian civil date to Jalaali.
pub fn gregorian_to_jalaali(year: i32, month: u32, day: u32) -> Result<JalaaliDate, HesabError> {
    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or(HesabError::InvalidCalendarDate {
        system: DateSystem::Gregorian,
        year,
        month,
        day,
    })?;
    Ok(JalaaliDate::from_gregorian(date))
}

/// Jalaali civil date to Gregorian. Impossible Jalaali dates are rejected.
pub fn jalaali_to_gregorian(year: i32, month: u32, day: u32) -> Result<NaiveDate, HesabError> {
    JalaaliDate::new(year, month, day)?.to_gregorian()
}

/// Month name for `month` (1..=12).
pub fn jalaali_month_name(month: u32, language: Language) -> Option<&'static str> {
    let index = usize::try_from(month.checked_sub(1)?).ok()?;
    match language {
        Language::Fa => MONTH_NAMES_FA.get(index).copied(),
        Language::En => MONTH_NAMES_EN.get(index).copied(),
    }
}
