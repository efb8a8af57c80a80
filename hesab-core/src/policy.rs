//! # Date-System Policy
//!
//! Decides whether a user enters and reads dates in the Persian or the
//! Gregorian calendar. The decision is recomputed on every query because
//! the user's currency and language can change during a session.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

use crate::types::{DateSystem, Language};

/// Currency whose users keep their books in the Persian calendar.
pub const PERSIAN_CURRENCY: &str = "IRR";

fn is_persian_currency(currency: Option<&str>) -> bool {
    currency.is_some_and(|c| c.trim().eq_ignore_ascii_case(PERSIAN_CURRENCY))
}

/// `IRR` currency or an explicit `fa` language selects the Persian calendar;
/// everything else, including a missing currency, is Gregorian.
pub fn get_date_system(currency: Option<&str>, explicit_language: Option<&str>) -> DateSystem {
    let persian_language = explicit_language.and_then(Language::from_tag) == Some(Language::Fa);
    if is_persian_currency(currency) || persian_language {
        DateSystem::Persian
    } else {
        DateSystem::Gregorian
    }
}

/// Language used to seed the UI before the user picks one.
pub fn get_default_language(currency: Option<&str>) -> Language {
    if is_persian_currency(currency) {
        Language::Fa
    } else {
        Language::En
    }
}

/// Read-only view of the authenticated user's profile.
///
/// Implemented by whatever owns the session (auth client, config, tests).
/// Values are read on every call and never cached here.
pub trait ProfileSource {
    /// The profile's `defaultCurrency`, if known.
    fn default_currency(&self) -> Option<String>;

    /// A language the user picked explicitly, if any.
    fn explicit_language(&self) -> Option<String> {
        None
    }
}

/// The subset of the user profile returned by the auth service that the
/// date core reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub default_currency: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

impl UserProfile {
    pub fn new(default_currency: impl Into<String>) -> Self {
        Self {
            default_currency: Some(default_currency.into()),
            language: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

impl ProfileSource for UserProfile {
    fn default_currency(&self) -> Option<String> {
        self.default_currency.clone()
    }

    fn explicit_language(&self) -> Option<String> {
        self.language.clone()
    }
}

/// A profile shared with a session store that may update it at runtime.
impl ProfileSource for RwLock<UserProfile> {
    fn default_currency(&self) -> Option<String> {
        match self.read() {
            Ok(profile) => profile.default_currency.clone(),
            Err(_) => {
                warn!("Profile lock poisoned, falling back to Gregorian defaults");
                None
            }
        }
    }

    fn explicit_language(&self) -> Option<String> {
        match self.read() {
            Ok(profile) => profile.language.clone(),
            Err(_) => {
                warn!("Profile lock poisoned, ignoring explicit language");
                None
            }
        }
    }
}

impl<P: ProfileSource + ?Sized> ProfileSource for &P {
    fn default_currency(&self) -> Option<String> {
        (**self).default_currency()
    }

    fn explicit_language(&self) -> Option<String> {
        (**self).explicit_language()
    }
}

impl<P: ProfileSource + ?Sized> ProfileSource for Arc<P> {
    fn default_currency(&self) -> Option<String> {
        (**self).default_currency()
    }

    fn explicit_language(&self) -> Option<String> {
        (**self).explicit_language()
    }
}

/// Policy bound to an injected profile source.
#[derive(Debug, Clone)]
pub struct DatePolicy<P> {
    source: P,
}

impl<P: ProfileSource> DatePolicy<P> {
    pub fn new(source: P) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &P {
        &self.source
    }

    /// Calendar for the profile as it is right now.
    pub fn date_system(&self) -> DateSystem {
        let currency = self.source.default_currency();
        let language = self.source.explicit_language();
        let system = get_date_system(currency.as_deref(), language.as_deref());
        debug!(?currency, ?language, %system, "resolved date system");
        system
    }

    /// The explicit language when set and recognized, else the currency default.
    pub fn language(&self) -> Language {
        self.source
            .explicit_language()
            .as_deref()
            .and_then(Language::from_tag)
            .unwrap_or_else(|| get_default_language(self.source.default_currency().as_deref()))
    }
}
