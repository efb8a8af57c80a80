#![cfg(feature = "i18n")]

use hesab::prelude::*;
use rust_decimal_macros::dec;

#[test]
fn test_parse_errors_render_in_user_language() {
    let translator = Translator::new();
    let err = parse_from_input("1403/13/01", DateSystem::Persian).unwrap_err();

    let en = translator.error_message(HesabLocale::EnUS, &err);
    assert_eq!(en, "1403/13/01 does not exist in the Persian (Solar Hijri) calendar.");

    let fa = translator.error_message(HesabLocale::FaIR, &err);
    assert!(fa.contains("۱۴۰۳/۱۳/۰۱"));
}

#[test]
fn test_format_error_names_expected_pattern() {
    let translator = Translator::new();
    let err = parse_from_input("next tuesday", DateSystem::Gregorian).unwrap_err();
    assert_eq!(
        translator.error_message(HesabLocale::EnUS, &err),
        "The value next tuesday is not a valid date. Use YYYY-MM-DD."
    );
}

#[test]
fn test_locale_follows_policy_language() {
    let locale = HesabLocale::from_language(get_default_language(Some("IRR")));
    assert_eq!(locale, HesabLocale::FaIR);
    assert_eq!(locale.digit_system(), DigitSystem::Persian);
    assert!(locale.format_currency(dec!(1500000)).ends_with("ریال"));

    let locale = HesabLocale::from_language(get_default_language(None));
    assert_eq!(locale.format_currency(dec!(1500000)), "$1,500,000");
}
