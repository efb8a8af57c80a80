//! # hesab-i18n
//!
//! Translation bundles (Fluent) and ICU number formatting for the two UI
//! locales. The [`Translator`] is constructed explicitly and handed to the
//! UI layer; there is no global instance.

use fluent_bundle::bundle::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource};
use rust_decimal::Decimal;
use rust_embed::RustEmbed;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use tracing::warn;
use unic_langid::LanguageIdentifier;

use fixed_decimal::FixedDecimal;
use icu::decimal::{options::FixedDecimalFormatterOptions, FixedDecimalFormatter};
use icu::locid::{locale, Locale};
use serde::{Deserialize, Serialize};
use writeable::Writeable;

use hesab_core::digits::{format_amount, to_target_digits};
use hesab_core::period::Period;
use hesab_core::types::{DateSystem, DigitSystem, HesabError, Language};

#[derive(RustEmbed)]
#[folder = "assets/locales"]
struct Asset;

type ConcurrentBundle = FluentBundle<FluentResource, intl_memoizer::concurrent::IntlLangMemoizer>;

/// Supported UI locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub enum HesabLocale {
    #[default]
    EnUS,
    FaIR,
}

impl HesabLocale {
    pub const ALL: [HesabLocale; 2] = [HesabLocale::EnUS, HesabLocale::FaIR];

    pub fn as_str(&self) -> &'static str {
        match self {
            HesabLocale::EnUS => "en-US",
            HesabLocale::FaIR => "fa-IR",
        }
    }

    pub fn to_icu_locale(&self) -> Locale {
        match self {
            HesabLocale::EnUS => locale!("en-US"),
            HesabLocale::FaIR => locale!("fa-IR"),
        }
    }

    pub fn currency_code(&self) -> &'static str {
        match self {
            HesabLocale::EnUS => "USD",
            HesabLocale::FaIR => "IRR",
        }
    }

    pub fn from_language(language: Language) -> Self {
        match language {
            Language::Fa => HesabLocale::FaIR,
            Language::En => HesabLocale::EnUS,
        }
    }

    pub fn language(&self) -> Language {
        match self {
            HesabLocale::EnUS => Language::En,
            HesabLocale::FaIR => Language::Fa,
        }
    }

    /// Digits used in text rendered for this locale.
    pub fn digit_system(&self) -> DigitSystem {
        match self {
            HesabLocale::EnUS => DigitSystem::Latin,
            HesabLocale::FaIR => DigitSystem::Persian,
        }
    }
}

impl FromStr for HesabLocale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en-US" | "en" => Ok(HesabLocale::EnUS),
            "fa-IR" | "fa" => Ok(HesabLocale::FaIR),
            _ => Language::from_tag(s)
                .map(HesabLocale::from_language)
                .ok_or_else(|| format!("Unsupported locale: {}", s)),
        }
    }
}

/// Trait for formatting amounts with a currency marker.
pub trait CurrencyFormatter {
    fn format_currency(&self, amount: Decimal) -> String;
}

impl CurrencyFormatter for HesabLocale {
    fn format_currency(&self, amount: Decimal) -> String {
        let number_str = match FixedDecimalFormatter::try_new(
            &self.to_icu_locale().into(),
            FixedDecimalFormatterOptions::default(),
        ) {
            Ok(formatter) => match FixedDecimal::from_str(&amount.to_string()) {
                Ok(fixed) => formatter.format(&fixed).write_to_string().into_owned(),
                Err(e) => {
                    warn!("Could not convert {} for ICU formatting: {:?}", amount, e);
                    format_amount(amount, self.digit_system())
                }
            },
            Err(e) => {
                warn!("ICU decimal formatter unavailable for {}: {:?}", self.as_str(), e);
                format_amount(amount, self.digit_system())
            }
        };

        match self {
            HesabLocale::EnUS => format!("${}", number_str),
            HesabLocale::FaIR => format!("{} ریال", number_str),
        }
    }
}

#[derive(Clone)]
pub struct Translator {
    bundles: Arc<HashMap<HesabLocale, ConcurrentBundle>>,
}

impl std::fmt::Debug for Translator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translator")
            .field("locales", &self.bundles.keys())
            .finish()
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new()
    }
}

impl Translator {
    pub fn new() -> Self {
        let mut bundles = HashMap::new();

        for locale in HesabLocale::ALL {
            let code = locale.as_str();
            let lang_id: LanguageIdentifier = match code.parse() {
                Ok(id) => id,
                Err(e) => {
                    warn!("Skipping locale {}: {}", code, e);
                    continue;
                }
            };
            let mut bundle = FluentBundle::new_concurrent(vec![lang_id]);
            // Bidi isolation marks would leak into plain-text validation messages.
            bundle.set_use_isolating(false);

            let file_path = format!("{}/main.ftl", code);
            match Asset::get(&file_path) {
                Some(file) => match std::str::from_utf8(file.data.as_ref()) {
                    Ok(source) => match FluentResource::try_new(source.to_string()) {
                        Ok(resource) => {
                            if let Err(errors) = bundle.add_resource(resource) {
                                warn!("Conflicting messages in {}: {:?}", file_path, errors);
                            }
                        }
                        Err((_, errors)) => warn!("Failed to parse {}: {:?}", file_path, errors),
                    },
                    Err(e) => warn!("Non-utf8 ftl file {}: {}", file_path, e),
                },
                None => warn!("Translation file not found for {}", code),
            }

            bundles.insert(locale, bundle);
        }

        Translator {
            bundles: Arc::new(bundles),
        }
    }

    pub fn translate(&self, locale: HesabLocale, key: &str, args: Option<&FluentArgs>) -> String {
        if let Some(pattern) = self
            .bundles
            .get(&locale)
            .and_then(|bundle| bundle.get_message(key).and_then(|msg| msg.value()).map(|p| (bundle, p)))
        {
            let (bundle, pattern) = pattern;
            let mut errors = vec![];
            let value = bundle.format_pattern(pattern, args, &mut errors);
            if !errors.is_empty() {
                warn!("Errors formatting '{}' for {}: {:?}", key, locale.as_str(), errors);
            }
            return value.into_owned();
        }

        if locale != HesabLocale::EnUS {
            return self.translate(HesabLocale::EnUS, key, args);
        }

        format!("MISSING:{}", key)
    }

    pub fn translate_with_args(
        &self,
        locale: HesabLocale,
        key: &str,
        args: Option<&HashMap<String, String>>,
    ) -> String {
        match args {
            Some(map) => {
                let mut f_args = FluentArgs::new();
                for (k, v) in map {
                    f_args.set(k.as_str(), v.to_string());
                }
                self.translate(locale, key, Some(&f_args))
            }
            None => self.translate(locale, key, None),
        }
    }

    /// Name of a calendar system in `locale`.
    pub fn date_system_name(&self, locale: HesabLocale, system: DateSystem) -> String {
        self.translate(locale, &format!("date-system-{}", system), None)
    }

    pub fn period_label(&self, locale: HesabLocale, period: Period) -> String {
        self.translate(locale, &format!("period-{}", period), None)
    }

    /// Validation message shown next to the field that failed.
    pub fn error_message(&self, locale: HesabLocale, error: &HesabError) -> String {
        let digits = locale.digit_system();
        let mut args = FluentArgs::new();
        match error {
            HesabError::InvalidDateFormat { input, system, .. } => {
                args.set("input", input.clone());
                args.set("pattern", self.translate(locale, &format!("date-pattern-{}", system), None));
            }
            HesabError::InvalidCalendarDate { system, year, month, day } => {
                let date = format!("{:04}/{:02}/{:02}", year, month, day);
                args.set("date", to_target_digits(&date, digits));
                args.set("system", self.date_system_name(locale, *system));
            }
            HesabError::InvalidTime { hour, minute, second } => {
                let time = format!("{:02}:{:02}:{:02}", hour, minute, second);
                args.set("time", to_target_digits(&time, digits));
            }
            HesabError::OutOfRange { .. } => {}
            HesabError::InvalidInput { field, reason } => {
                args.set("field", field.clone());
                args.set("reason", reason.clone());
            }
            HesabError::ConfigurationError(reason) => {
                args.set("reason", reason.clone());
            }
        }
        self.translate(locale, error.code(), Some(&args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_currency_formatting() {
        let amount = dec!(1234.56);

        let us = HesabLocale::EnUS.format_currency(amount);
        assert!(us.starts_with('$'));
        assert!(us.contains("1,234.56"));

        let fa = HesabLocale::FaIR.format_currency(amount);
        assert!(fa.contains("ریال"));
        assert!(fa.contains('۱'));
    }

    #[test]
    fn test_locale_parsing() {
        assert_eq!(HesabLocale::from_str("fa").unwrap(), HesabLocale::FaIR);
        assert_eq!(HesabLocale::from_str("fa_IR").unwrap(), HesabLocale::FaIR);
        assert_eq!(HesabLocale::from_str("en-GB").unwrap(), HesabLocale::EnUS);
        assert!(HesabLocale::from_str("de").is_err());
        assert_eq!(HesabLocale::from_language(Language::Fa).currency_code(), "IRR");
    }

    #[test]
    fn test_translate_and_fallback() {
        let translator = Translator::new();
        assert_eq!(translator.translate(HesabLocale::EnUS, "date-input-now", None), "Now");
        assert_eq!(translator.translate(HesabLocale::FaIR, "date-input-now", None), "اکنون");
        assert_eq!(translator.translate(HesabLocale::FaIR, "no-such-key", None), "MISSING:no-such-key");
    }

    #[test]
    fn test_translate_with_args_map() {
        let translator = Translator::new();
        let mut args = HashMap::new();
        args.insert("field".to_string(), "amount".to_string());
        args.insert("reason".to_string(), "must be positive".to_string());
        assert_eq!(
            translator.translate_with_args(HesabLocale::EnUS, "error-invalid-input", Some(&args)),
            "Invalid value for amount: must be positive"
        );
    }

    #[test]
    fn test_error_messages_are_localized() {
        let translator = Translator::new();
        let err = HesabError::InvalidCalendarDate {
            system: DateSystem::Persian,
            year: 1402,
            month: 12,
            day: 30,
        };
        assert_eq!(
            translator.error_message(HesabLocale::EnUS, &err),
            "1402/12/30 does not exist in the Persian (Solar Hijri) calendar."
        );
        let fa = translator.error_message(HesabLocale::FaIR, &err);
        assert!(fa.contains("۱۴۰۲/۱۲/۳۰"));
        assert!(fa.contains("خورشیدی"));
    }

    #[test]
    fn test_period_labels() {
        let translator = Translator::new();
        assert_eq!(translator.period_label(HesabLocale::EnUS, Period::Weekly), "This week");
        assert_eq!(translator.period_label(HesabLocale::FaIR, Period::Yearly), "امسال");
    }
}
