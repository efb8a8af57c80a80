//! Prelude module for hesab
//!
//! Re-exports the calendar, digit, policy and formatting API together with
//! the translator when the `i18n` feature is enabled.
//!
//! # Usage
//!
//! ```rust
//! use hesab::prelude::*;
//! ```

pub use hesab_core::prelude::*;

#[cfg(feature = "i18n")]
pub use hesab_i18n::{CurrencyFormatter, HesabLocale, Translator};
