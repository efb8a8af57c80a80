//! # hesab
//!
//! Dual-calendar date handling for personal finance clients.
//!
//! Users whose profile currency is IRR (or who explicitly pick Persian)
//! see and type dates in the Jalaali calendar with Persian digits; every
//! value leaving the client is a Gregorian date, a 24-hour time and an
//! RFC 3339 instant, all in Latin digits.
//!
//! ```rust
//! use hesab::prelude::*;
//!
//! let profile = UserProfile::new("IRR");
//! let formatter = DateFormatter::new(&profile);
//! let parsed = formatter.parse("۱۴۰۳/۱۰/۰۸").unwrap();
//! assert_eq!(parsed.user_date, "2024-12-28");
//! ```

pub use hesab_core::{calendar, config, digits, format, period, policy, transaction, types};

pub use hesab_core::{
    DateFormatter, DatePolicy, DateSystem, DigitSystem, HesabConfig, HesabError, JalaaliDate, Language,
    ParsedDateTime, ProfileSource, UserProfile,
};

#[cfg(feature = "i18n")]
pub use hesab_i18n as i18n;

pub mod prelude;

#[cfg(feature = "wasm")]
pub mod wasm;
