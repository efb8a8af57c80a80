//! # Date Formatter / Parser
//!
//! The boundary UI code calls. Dates are shown and typed in the calendar the
//! policy selects, while everything handed back for storage is Gregorian
//! with Latin digits.
//!
//! ## Input contract
//!
//! | system    | date only        | with time              |
//! |-----------|------------------|------------------------|
//! | Persian   | `۱۴۰۳/۱۰/۰۸`     | `۱۴۰۳/۱۰/۰۸T۱۴:۳۰`     |
//! | Gregorian | `2024-12-28`     | `2024-12-28T14:30`     |
//!
//! The input form carries minutes, not seconds: parsing a formatted value
//! gives back the instant truncated to the minute (or to the day when no
//! time is included).

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Timelike, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calendar::JalaaliDate;
use crate::digits::{to_latin_digits, to_target_digits};
use crate::policy::{DatePolicy, ProfileSource};
use crate::types::{DateSystem, HesabError};

pub const USER_DATE_FORMAT: &str = "%Y-%m-%d";
pub const USER_TIME_FORMAT: &str = "%H:%M:%S";

/// Builds the canonical instant for a wall-clock date and time. No timezone
/// shift is applied: the naive value is taken as UTC.
pub fn instant_from_local(date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    NaiveDateTime::new(date, time).and_utc()
}

/// Result of parsing user input: the canonical instant plus the wall-clock
/// values the user picked, both Gregorian.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParsedDateTime {
    pub instant: DateTime<Utc>,
    /// `YYYY-MM-DD`, Gregorian, Latin digits.
    pub user_date: String,
    /// `HH:MM:SS`, 24-hour.
    pub user_time: String,
}

impl ParsedDateTime {
    pub fn from_local(date: NaiveDate, time: NaiveTime) -> Self {
        Self {
            instant: instant_from_local(date, time),
            user_date: date.format(USER_DATE_FORMAT).to_string(),
            user_time: time.format(USER_TIME_FORMAT).to_string(),
        }
    }

    /// The `transactionDate` wire form, e.g. `2024-12-28T14:30:00.000Z`.
    pub fn transaction_date(&self) -> String {
        self.instant.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Human-readable form.
///
/// Persian: `jYYYY/jMM/jDD[ HH:mm]` in Persian digits.
/// Gregorian: `MMM D, YYYY[ h:mm AM/PM]` in Latin digits.
pub fn format_for_display(instant: &DateTime<Utc>, include_time: bool, system: DateSystem) -> String {
    let local = instant.naive_utc();
    match system {
        DateSystem::Persian => {
            let mut text = JalaaliDate::from_gregorian(local.date()).to_string();
            if include_time {
                text.push(' ');
                text.push_str(&local.format("%H:%M").to_string());
            }
            to_target_digits(&text, system.digit_system())
        }
        DateSystem::Gregorian => {
            let pattern = if include_time { "%b %-d, %Y %-I:%M %p" } else { "%b %-d, %Y" };
            local.format(pattern).to_string()
        }
    }
}

/// Editable form, exactly re-parsable by [`parse_from_input`].
pub fn format_for_input(instant: &DateTime<Utc>, include_time: bool, system: DateSystem) -> String {
    let local = instant.naive_utc();
    let date = match system {
        DateSystem::Persian => JalaaliDate::from_gregorian(local.date()).to_string(),
        DateSystem::Gregorian => local.format(USER_DATE_FORMAT).to_string(),
    };
    let text = if include_time {
        format!("{date}T{}", local.format("%H:%M"))
    } else {
        date
    };
    to_target_digits(&text, system.digit_system())
}

/// Parses what the user typed or picked.
///
/// Digits may come in any glyph system. The date may be followed by a time
/// (`HH:mm` or `HH:mm:ss`) after `T`, a space, or both; without one the
/// time is midnight. Impossible dates are rejected, never clamped.
pub fn parse_from_input(text: &str, system: DateSystem) -> Result<ParsedDateTime, HesabError> {
    let normalized = to_latin_digits(text.trim());
    let invalid = || HesabError::invalid_format(text, system);
    if normalized.is_empty() {
        return Err(invalid());
    }

    let (date_part, time_part) = match normalized.split_once(['T', 't', ' ']) {
        Some((date, rest)) => (date, Some(rest.trim_start_matches(['T', 't', ' ']))),
        None => (normalized.as_str(), None),
    };

    let (year, month, day) = split_date_fields(date_part).ok_or_else(invalid)?;
    let date = match system {
        DateSystem::Persian => JalaaliDate::new(year, month, day)?.to_gregorian()?,
        DateSystem::Gregorian => NaiveDate::from_ymd_opt(year, month, day).ok_or(
            HesabError::InvalidCalendarDate {
                system,
                year,
                month,
                day,
            },
        )?,
    };

    let time = match time_part {
        Some(raw) if !raw.is_empty() => parse_time(raw).ok_or_else(invalid)??,
        _ => NaiveTime::MIN,
    };

    let parsed = ParsedDateTime::from_local(date, time);
    debug!(input = text, %system, user_date = %parsed.user_date, user_time = %parsed.user_time, "parsed date input");
    Ok(parsed)
}

/// Splits `Y/M/D` or `Y-M-D`. The year may carry a leading minus when the
/// separator is `/`.
fn split_date_fields(text: &str) -> Option<(i32, u32, u32)> {
    let separator = if text.contains('/') { '/' } else { '-' };
    let mut parts = text.split(separator);
    let (year, month, day) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let unsigned_year = year.strip_prefix('-').unwrap_or(year);
    if !is_digits(unsigned_year, 1, 4) || !is_digits(month, 1, 2) || !is_digits(day, 1, 2) {
        return None;
    }
    Some((year.parse().ok()?, month.parse().ok()?, day.parse().ok()?))
}

/// `None` for a malformed time, `Some(Err)` for an out-of-range one.
fn parse_time(text: &str) -> Option<Result<NaiveTime, HesabError>> {
    let fields: Vec<&str> = text.split(':').collect();
    if !(2..=3).contains(&fields.len()) || !fields.iter().all(|f| is_digits(f, 1, 2)) {
        return None;
    }
    let values: Vec<u32> = fields.iter().map(|f| f.parse().ok()).collect::<Option<_>>()?;
    let (hour, minute, second) = (values[0], values[1], values.get(2).copied().unwrap_or(0));
    Some(NaiveTime::from_hms_opt(hour, minute, second).ok_or(HesabError::InvalidTime {
        hour,
        minute,
        second,
    }))
}

fn is_digits(text: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&text.len()) && text.bytes().all(|b| b.is_ascii_digit())
}

/// Drops the precision the input format cannot carry.
pub fn truncate_to_input_precision(instant: &DateTime<Utc>, include_time: bool) -> DateTime<Utc> {
    let local = instant.naive_utc();
    let time = if include_time {
        NaiveTime::from_hms_opt(local.hour(), local.minute(), 0).unwrap_or(NaiveTime::MIN)
    } else {
        NaiveTime::MIN
    };
    instant_from_local(local.date(), time)
}

/// Formatter/parser façade bound to an injected profile source; the
/// calendar is resolved through [`DatePolicy`] on every call.
#[derive(Debug, Clone)]
pub struct DateFormatter<P> {
    policy: DatePolicy<P>,
}

impl<P: ProfileSource> DateFormatter<P> {
    pub fn new(source: P) -> Self {
        Self {
            policy: DatePolicy::new(source),
        }
    }

    pub fn policy(&self) -> &DatePolicy<P> {
        &self.policy
    }

    pub fn date_system(&self) -> DateSystem {
        self.policy.date_system()
    }

    pub fn display(&self, instant: &DateTime<Utc>, include_time: bool) -> String {
        format_for_display(instant, include_time, self.date_system())
    }

    pub fn input(&self, instant: &DateTime<Utc>, include_time: bool) -> String {
        format_for_input(instant, include_time, self.date_system())
    }

    pub fn parse(&self, text: &str) -> Result<ParsedDateTime, HesabError> {
        parse_from_input(text, self.date_system())
    }

    /// Stamps "now" for the explicit "Now" button; never used as a silent
    /// fallback for bad input.
    pub fn now_stamp(&self, now: NaiveDateTime) -> ParsedDateTime {
        let time = NaiveTime::from_hms_opt(now.hour(), now.minute(), now.second()).unwrap_or(NaiveTime::MIN);
        ParsedDateTime::from_local(now.date(), time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::UserProfile;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn test_display_formats() {
        let t = at(2024, 12, 28, 15, 5, 42);
        assert_eq!(format_for_display(&t, false, DateSystem::Persian), "۱۴۰۳/۱۰/۰۸");
        assert_eq!(format_for_display(&t, true, DateSystem::Persian), "۱۴۰۳/۱۰/۰۸ ۱۵:۰۵");
        assert_eq!(format_for_display(&t, false, DateSystem::Gregorian), "Dec 28, 2024");
        assert_eq!(format_for_display(&t, true, DateSystem::Gregorian), "Dec 28, 2024 3:05 PM");
    }

    #[test]
    fn test_input_formats() {
        let t = at(2024, 12, 28, 9, 7, 0);
        assert_eq!(format_for_input(&t, false, DateSystem::Persian), "۱۴۰۳/۱۰/۰۸");
        assert_eq!(format_for_input(&t, true, DateSystem::Persian), "۱۴۰۳/۱۰/۰۸T۰۹:۰۷");
        assert_eq!(format_for_input(&t, false, DateSystem::Gregorian), "2024-12-28");
        assert_eq!(format_for_input(&t, true, DateSystem::Gregorian), "2024-12-28T09:07");
    }

    #[test]
    fn test_parse_persian_with_time() {
        let parsed = parse_from_input("۱۴۰۳/۱۰/۰۸T۱۴:۳۰", DateSystem::Persian).unwrap();
        assert_eq!(parsed.instant, at(2024, 12, 28, 14, 30, 0));
        assert_eq!(parsed.user_date, "2024-12-28");
        assert_eq!(parsed.user_time, "14:30:00");
        assert_eq!(parsed.transaction_date(), "2024-12-28T14:30:00.000Z");
    }

    #[test]
    fn test_parse_accepts_separator_variants() {
        let expected = at(2024, 12, 28, 14, 30, 0);
        for text in ["1403/10/08T14:30", "1403/10/08 14:30", "1403/10/08T 14:30", "1403-10-08T14:30"] {
            assert_eq!(parse_from_input(text, DateSystem::Persian).unwrap().instant, expected, "{text}");
        }
        for text in ["2024-12-28T14:30", "2024/12/28 14:30", " 2024-12-28t14:30:00 "] {
            assert_eq!(parse_from_input(text, DateSystem::Gregorian).unwrap().instant, expected, "{text}");
        }
    }

    #[test]
    fn test_parse_mixed_digit_input() {
        let persian = parse_from_input("۱۴۰۳/۰۹/۰۷", DateSystem::Persian).unwrap();
        let latin = parse_from_input("1403/09/07", DateSystem::Persian).unwrap();
        assert_eq!(persian, latin);
        assert_eq!(latin.user_date, "2024-11-27");
        assert_eq!(latin.user_time, "00:00:00");
    }

    #[test]
    fn test_parse_keeps_seconds_when_given() {
        let parsed = parse_from_input("2024-12-28 08:05:09", DateSystem::Gregorian).unwrap();
        assert_eq!(parsed.user_time, "08:05:09");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for text in ["", "   ", "abc", "1403/10", "1403/10/08/01", "14033/1/1", "1403/10/08Tnoon", "1403/1a/08"] {
            assert!(
                matches!(parse_from_input(text, DateSystem::Persian), Err(HesabError::InvalidDateFormat { .. })),
                "{text:?}"
            );
        }
    }

    #[test]
    fn test_parse_rejects_impossible_dates() {
        assert!(matches!(
            parse_from_input("1402/12/30", DateSystem::Persian),
            Err(HesabError::InvalidCalendarDate { system: DateSystem::Persian, .. })
        ));
        assert!(matches!(
            parse_from_input("1403/07/31", DateSystem::Persian),
            Err(HesabError::InvalidCalendarDate { .. })
        ));
        assert!(matches!(
            parse_from_input("2023-02-29", DateSystem::Gregorian),
            Err(HesabError::InvalidCalendarDate { system: DateSystem::Gregorian, .. })
        ));
        assert!(matches!(
            parse_from_input("2024-12-28T24:10", DateSystem::Gregorian),
            Err(HesabError::InvalidTime { hour: 24, .. })
        ));
    }

    #[test]
    fn test_round_trip_truncates_to_minute() {
        let t = at(2024, 12, 28, 23, 59, 59);
        for system in [DateSystem::Persian, DateSystem::Gregorian] {
            let with_time = parse_from_input(&format_for_input(&t, true, system), system).unwrap();
            assert_eq!(with_time.instant, at(2024, 12, 28, 23, 59, 0));
            let date_only = parse_from_input(&format_for_input(&t, false, system), system).unwrap();
            assert_eq!(date_only.instant, at(2024, 12, 28, 0, 0, 0));
            assert_eq!(truncate_to_input_precision(&t, true), with_time.instant);
        }
    }

    #[test]
    fn test_formatter_follows_profile() {
        let formatter = DateFormatter::new(UserProfile::new("IRR"));
        let t = at(2025, 3, 20, 10, 0, 0);
        assert_eq!(formatter.display(&t, false), "۱۴۰۳/۱۲/۳۰");
        assert_eq!(formatter.parse(&formatter.input(&t, true)).unwrap().instant, t);

        let formatter = DateFormatter::new(UserProfile::default());
        assert_eq!(formatter.input(&t, false), "2025-03-20");
    }

    #[test]
    fn test_now_stamp_keeps_wall_clock() {
        let formatter = DateFormatter::new(UserProfile::default());
        let now = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_milli_opt(7, 8, 9, 500).unwrap();
        let stamp = formatter.now_stamp(now);
        assert_eq!(stamp.user_date, "2024-06-01");
        assert_eq!(stamp.user_time, "07:08:09");
        assert_eq!(stamp.transaction_date(), "2024-06-01T07:08:09.000Z");
    }
}
