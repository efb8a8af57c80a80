use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use thiserror::Error;

/// The calendar a user enters and reads dates in.
///
/// Persisted values are always Gregorian; `Persian` only describes the
/// input/display boundary.
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
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DateSystem {
    Persian,
    #[default]
    Gregorian,
}

impl DateSystem {
    /// The digit glyphs used when rendering dates in this system.
    pub fn digit_system(&self) -> DigitSystem {
        match self {
            DateSystem::Persian => DigitSystem::Persian,
            DateSystem::Gregorian => DigitSystem::Latin,
        }
    }
}

/// Glyph set used to render the decimal digits 0-9.
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
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DigitSystem {
    #[default]
    Latin,
    /// Extended Arabic-Indic digits (U+06F0..U+06F9) as used in Persian.
    Persian,
    /// Arabic-Indic digits (U+0660..U+0669).
    Arabic,
}

impl DigitSystem {
    /// Returns the glyph for `value` (0..=9) in this digit system.
    pub fn glyph(&self, value: u32) -> Option<char> {
        if value > 9 {
            return None;
        }
        let base = match self {
            DigitSystem::Latin => '0' as u32,
            DigitSystem::Persian => 0x06F0,
            DigitSystem::Arabic => 0x0660,
        };
        char::from_u32(base + value)
    }
}

/// UI language. Only used to seed the interface and, when chosen
/// explicitly, to override the currency-derived calendar.
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
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Language {
    Fa,
    #[default]
    En,
}

impl Language {
    /// Resolves a BCP-47-ish tag (`fa`, `fa-IR`, `en_US`) by its primary subtag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag.trim().split(['-', '_']).next().unwrap_or_default();
        if primary.eq_ignore_ascii_case("fa") {
            Some(Language::Fa)
        } else if primary.eq_ignore_ascii_case("en") {
            Some(Language::En)
        } else {
            None
        }
    }
}

/// Errors produced by the date and localization core.
///
/// All variants are local, synchronous failures. Callers treat the
/// affected field as unset and surface [`HesabError::code`] as a
/// validation message.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum HesabError {
    #[error("Invalid date format: '{input}' does not match the {system} input pattern")]
    InvalidDateFormat {
        input: String,
        system: DateSystem,
        field: Option<String>,
    },
    #[error("Invalid {system} date: {year:04}/{month:02}/{day:02}")]
    InvalidCalendarDate {
        system: DateSystem,
        year: i32,
        month: u32,
        day: u32,
    },
    #[error("Invalid time: {hour:02}:{minute:02}:{second:02}")]
    InvalidTime { hour: u32, minute: u32, second: u32 },
    #[error("Date arithmetic out of range: {operation}")]
    OutOfRange { operation: String },
    #[error("Invalid input for '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl HesabError {
    pub fn invalid_format(input: impl Into<String>, system: DateSystem) -> Self {
        HesabError::InvalidDateFormat {
            input: input.into(),
            system,
            field: None,
        }
    }

    pub fn out_of_range(operation: impl Into<String>) -> Self {
        HesabError::OutOfRange {
            operation: operation.into(),
        }
    }

    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        HesabError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Attaches the name of the form field the failing value came from.
    pub fn with_field(self, name: impl Into<String>) -> Self {
        match self {
            HesabError::InvalidDateFormat { input, system, .. } => HesabError::InvalidDateFormat {
                input,
                system,
                field: Some(name.into()),
            },
            other => other,
        }
    }

    /// Stable message key, shared with the translation bundles.
    pub fn code(&self) -> &'static str {
        match self {
            HesabError::InvalidDateFormat { .. } => "error-invalid-date-format",
            HesabError::InvalidCalendarDate { .. } => "error-invalid-calendar-date",
            HesabError::InvalidTime { .. } => "error-invalid-time",
            HesabError::OutOfRange { .. } => "error-out-of-range",
            HesabError::InvalidInput { .. } => "error-invalid-input",
            HesabError::ConfigurationError(_) => "error-configuration",
        }
    }
}
