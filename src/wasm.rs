use chrono::{DateTime, Utc};
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

use crate::prelude::*;

/// Initialize hooks for better debugging in WASM
#[wasm_bindgen]
pub fn init_hooks() {
    console_error_panic_hook::set_once();
}

fn parse_instant(instant: &str) -> Result<DateTime<Utc>, JsError> {
    DateTime::parse_from_rfc3339(instant)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| JsError::new(&format!("Invalid instant '{}': {}", instant, e)))
}

fn parse_system(system: &str) -> Result<DateSystem, JsError> {
    system
        .parse::<DateSystem>()
        .map_err(|_| JsError::new(&format!("Unknown date system: {}", system)))
}

/// Picks the calendar for a profile.
///
/// # Arguments
/// - `currency`: profile default currency, may be absent
/// - `language`: explicit language choice, may be absent
#[wasm_bindgen(js_name = getDateSystem)]
pub fn get_date_system_wasm(currency: Option<String>, language: Option<String>) -> String {
    get_date_system(currency.as_deref(), language.as_deref()).to_string()
}

/// Same as `getDateSystem` but takes a `UserProfile` object.
#[wasm_bindgen(js_name = getDateSystemForProfile)]
pub fn get_date_system_for_profile(profile: JsValue) -> Result<String, JsError> {
    let profile: UserProfile =
        from_value(profile).map_err(|e| JsError::new(&format!("Invalid Profile JSON: {}", e)))?;
    Ok(DatePolicy::new(profile).date_system().to_string())
}

#[wasm_bindgen(js_name = formatForDisplay)]
pub fn format_for_display_wasm(instant: &str, include_time: bool, system: &str) -> Result<String, JsError> {
    Ok(format_for_display(&parse_instant(instant)?, include_time, parse_system(system)?))
}

#[wasm_bindgen(js_name = formatForInput)]
pub fn format_for_input_wasm(instant: &str, include_time: bool, system: &str) -> Result<String, JsError> {
    Ok(format_for_input(&parse_instant(instant)?, include_time, parse_system(system)?))
}

/// Parses user input into `{ instant, userDate, userTime }`.
#[wasm_bindgen(js_name = parseFromInput)]
pub fn parse_from_input_wasm(text: &str, system: &str) -> Result<JsValue, JsError> {
    let parsed = parse_from_input(text, parse_system(system)?).map_err(|e| JsError::new(&e.to_string()))?;
    to_value(&parsed).map_err(|e| JsError::new(&format!("Serialization Error: {}", e)))
}

#[wasm_bindgen(js_name = toLatinDigits)]
pub fn to_latin_digits_wasm(text: &str) -> String {
    to_latin_digits(text)
}

/// Groups the integer part with `,`; `digits` defaults to `latin`.
#[wasm_bindgen(js_name = formatWithThousandsSeparators)]
pub fn format_with_thousands_separators_wasm(value: &str, digits: Option<String>) -> Result<String, JsError> {
    let target = match digits.as_deref() {
        Some(name) => name
            .parse::<DigitSystem>()
            .map_err(|_| JsError::new(&format!("Unknown digit system: {}", name)))?,
        None => DigitSystem::Latin,
    };
    Ok(format_with_thousands_separators(value, target))
}
