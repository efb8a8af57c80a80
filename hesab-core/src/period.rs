//! Reporting periods resolved in the user's calendar.
//!
//! Dashboards query by a Gregorian `[start, end]` date range, but "this
//! month" means the current Jalaali month for a Persian-calendar user and
//! their week runs Saturday to Friday.

use chrono::{Datelike, Days, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::calendar::JalaaliDate;
use crate::types::{DateSystem, HesabError};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Period {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl Period {
    /// Chart bucket for this period.
    pub fn time_unit(&self) -> &'static str {
        match self {
            Period::Daily => "hour",
            Period::Weekly | Period::Monthly => "day",
            Period::Quarterly => "week",
            Period::Yearly => "month",
        }
    }
}

/// Inclusive Gregorian date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// The range of `period` containing `today`, in `system`'s calendar.
pub fn period_date_range(period: Period, system: DateSystem, today: NaiveDate) -> Result<DateRange, HesabError> {
    match system {
        DateSystem::Gregorian => gregorian_range(period, today),
        DateSystem::Persian => persian_range(period, today),
    }
}

fn gregorian_range(period: Period, today: NaiveDate) -> Result<DateRange, HesabError> {
    let overflow = || HesabError::out_of_range(format!("{period} range for {today}"));
    let (start, end) = match period {
        Period::Daily => (today, today),
        Period::Weekly => {
            let start = today
                .checked_sub_days(Days::new(u64::from(today.weekday().num_days_from_monday())))
                .ok_or_else(overflow)?;
            (start, start.checked_add_days(Days::new(6)).ok_or_else(overflow)?)
        }
        Period::Monthly => {
            let start = today.with_day(1).ok_or_else(overflow)?;
            (start, gregorian_month_end(today.year(), today.month()).ok_or_else(overflow)?)
        }
        Period::Quarterly => {
            let first_month = (today.month() - 1) / 3 * 3 + 1;
            let start = NaiveDate::from_ymd_opt(today.year(), first_month, 1).ok_or_else(overflow)?;
            (start, gregorian_month_end(today.year(), first_month + 2).ok_or_else(overflow)?)
        }
        Period::Yearly => (
            NaiveDate::from_ymd_opt(today.year(), 1, 1).ok_or_else(overflow)?,
            NaiveDate::from_ymd_opt(today.year(), 12, 31).ok_or_else(overflow)?,
        ),
    };
    Ok(DateRange { start, end })
}

fn gregorian_month_end(year: i32, month: u32) -> Option<NaiveDate> {
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next?.pred_opt()
}

fn persian_range(period: Period, today: NaiveDate) -> Result<DateRange, HesabError> {
    let jtoday = JalaaliDate::from_gregorian(today);
    let (start, end) = match period {
        Period::Daily => return Ok(DateRange { start: today, end: today }),
        Period::Weekly => {
            // Saturday is day 0 of the Persian week.
            let since_saturday = (today.weekday().num_days_from_monday() + 2) % 7;
            let start = jtoday.add_days(-i64::from(since_saturday))?;
            (start, start.add_days(6)?)
        }
        Period::Monthly => (jtoday.first_day_of_month(), jtoday.last_day_of_month()),
        Period::Quarterly => {
            let first_month = (jtoday.month() - 1) / 3 * 3 + 1;
            let start = JalaaliDate::new(jtoday.year(), first_month, 1)?;
            let last = JalaaliDate::new(jtoday.year(), first_month + 2, 1)?.last_day_of_month();
            (start, last)
        }
        Period::Yearly => (
            JalaaliDate::new(jtoday.year(), 1, 1)?,
            JalaaliDate::new(jtoday.year(), 12, 1)?.last_day_of_month(),
        ),
    };
    Ok(DateRange {
        start: start.to_gregorian()?,
        end: end.to_gregorian()?,
    })
}
