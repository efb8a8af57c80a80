//! Prelude module for hesab-core.
//!
//! ```rust
//! use hesab_core::prelude::*;
//! ```

pub use crate::calendar::{
    days_in_jalaali_month, gregorian_to_jalaali, is_jalaali_leap_year, jalaali_month_name, jalaali_to_gregorian,
    JalaaliDate,
};
pub use crate::config::{HesabConfig, HesabConfigBuilder};
pub use crate::digits::{
    format_amount, format_with_thousands_separators, is_valid_numeric_input, parse_amount, to_latin_digits,
    to_target_digits,
};
pub use crate::format::{format_for_display, format_for_input, parse_from_input, DateFormatter, ParsedDateTime};
pub use crate::period::{period_date_range, DateRange, Period};
pub use crate::policy::{get_date_system, get_default_language, DatePolicy, ProfileSource, UserProfile};
pub use crate::transaction::{TransactionKind, TransactionPayload};
pub use crate::types::{DateSystem, DigitSystem, HesabError, Language};
