use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use tracing::{debug, warn};

use crate::policy::{get_date_system, ProfileSource};
use crate::types::{DateSystem, HesabError, Language};

/// Client-side defaults used when no authenticated profile is available,
/// or to override it (e.g. a user switching display language).
///
/// Every field is optional so layers can be merged; `None` means "not set
/// here", not "off".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HesabConfig {
    /// ISO 4217 code, e.g. `IRR`, `USD`.
    #[serde(default)]
    pub default_currency: Option<String>,
    /// Explicit UI language tag (`fa`, `en`, `fa-IR`...).
    #[serde(default)]
    pub language: Option<String>,
    /// Whether date inputs include a time of day by default.
    #[serde(default)]
    pub include_time: Option<bool>,
}

impl std::str::FromStr for HesabConfig {
    type Err = HesabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: HesabConfig = serde_json::from_str(s)
            .map_err(|e| HesabError::ConfigurationError(format!("Failed to parse config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }
}

fn check_currency(currency: &str) -> Result<(), HesabError> {
    let code = currency.trim();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(HesabError::ConfigurationError(format!(
            "Currency must be a 3-letter ISO 4217 code, got '{}'",
            currency
        )));
    }
    Ok(())
}

fn check_language(language: &str) -> Result<(), HesabError> {
    match Language::from_tag(language) {
        Some(_) => Ok(()),
        None => Err(HesabError::ConfigurationError(format!("Unsupported language '{}'", language))),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl HesabConfig {
    pub fn builder() -> HesabConfigBuilder {
        HesabConfigBuilder::default()
    }

    /// Validates the configuration for logical consistency.
    pub fn validate(&self) -> Result<(), HesabError> {
        if let Some(currency) = &self.default_currency {
            check_currency(currency)?;
        }
        if let Some(language) = &self.language {
            check_language(language)?;
        }
        Ok(())
    }

    /// Drops blank or unsupported values instead of failing, so a bad
    /// profile source falls back to the Gregorian/English defaults.
    pub fn sanitized(self) -> Self {
        let default_currency = non_blank(self.default_currency).filter(|c| match check_currency(c) {
            Ok(()) => true,
            Err(e) => {
                warn!("Ignoring currency: {}", e);
                false
            }
        });
        let language = non_blank(self.language).filter(|l| match check_language(l) {
            Ok(()) => true,
            Err(e) => {
                warn!("Ignoring language: {}", e);
                false
            }
        });
        Self {
            default_currency,
            language,
            include_time: self.include_time,
        }
    }

    /// Loads configuration from `HESAB_CURRENCY`, `HESAB_LANGUAGE` and
    /// `HESAB_INCLUDE_TIME`. Unset, blank or unusable variables are left
    /// unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`HesabConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let include_time = non_blank(lookup("HESAB_INCLUDE_TIME")).and_then(|raw| {
            match raw.trim().parse::<bool>() {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!("Ignoring HESAB_INCLUDE_TIME value '{}': {}", raw, e);
                    None
                }
            }
        });

        let config = Self {
            default_currency: lookup("HESAB_CURRENCY"),
            language: lookup("HESAB_LANGUAGE"),
            include_time,
        }
        .sanitized();
        debug!(?config, "Loaded configuration from environment");
        config
    }

    /// Attempts to load configuration from a JSON file.
    pub fn try_from_json(path: &str) -> Result<Self, HesabError> {
        let content = fs::read_to_string(path)
            .map_err(|e| HesabError::ConfigurationError(format!("Failed to read config file: {}", e)))?;
        content.parse()
    }

    /// Values set in `other` win over `self`.
    pub fn merge(self, other: HesabConfig) -> Self {
        Self {
            default_currency: other.default_currency.or(self.default_currency),
            language: other.language.or(self.language),
            include_time: other.include_time.or(self.include_time),
        }
    }

    pub fn includes_time(&self) -> bool {
        self.include_time.unwrap_or(false)
    }

    pub fn date_system(&self) -> DateSystem {
        get_date_system(self.default_currency.as_deref(), self.language.as_deref())
    }
}

impl ProfileSource for HesabConfig {
    fn default_currency(&self) -> Option<String> {
        self.default_currency.clone()
    }

    fn explicit_language(&self) -> Option<String> {
        self.language.clone()
    }
}

#[derive(Debug, Default)]
pub struct HesabConfigBuilder {
    default_currency: Option<String>,
    language: Option<String>,
    include_time: Option<bool>,
}

impl HesabConfigBuilder {
    pub fn currency(mut self, code: impl Into<String>) -> Self {
        self.default_currency = Some(code.into());
        self
    }

    pub fn language(mut self, tag: impl Into<String>) -> Self {
        self.language = Some(tag.into());
        self
    }

    pub fn include_time(mut self, include_time: bool) -> Self {
        self.include_time = Some(include_time);
        self
    }

    pub fn build(self) -> Result<HesabConfig, HesabError> {
        let config = HesabConfig {
            default_currency: self.default_currency.map(|c| c.trim().to_ascii_uppercase()),
            language: self.language,
            include_time: self.include_time,
        };
        config.validate()?;
        Ok(config)
    }
}
