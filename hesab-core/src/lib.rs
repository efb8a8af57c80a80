//! # hesab-core
//!
//! Dual-calendar date handling for finance clients: Gregorian/Jalaali
//! conversion, digit-system normalization, the currency/language driven
//! date-system policy, and formatting/parsing of date inputs into the
//! canonical Gregorian values sent to the backend.

pub mod calendar;
pub mod config;
pub mod digits;
pub mod format;
pub mod period;
pub mod policy;
pub mod prelude;
pub mod transaction;
pub mod types;

pub use calendar::JalaaliDate;
pub use config::HesabConfig;
pub use format::{DateFormatter, ParsedDateTime};
pub use policy::{DatePolicy, ProfileSource, UserProfile};
pub use types::{DateSystem, DigitSystem, HesabError, Language};
