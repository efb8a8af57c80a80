//! # Digit Normalizer
//!
//! Conversion between Latin, Persian and Arabic-Indic digit glyphs, plus
//! thousands grouping for amounts. Input methods can mix glyph systems in a
//! single string, so every function here accepts all three on input.

use rust_decimal::Decimal;

use crate::types::DigitSystem;

const DECIMAL_POINTS: [char; 2] = ['.', '\u{066B}'];
const GROUP_SEPARATORS: [char; 3] = [',', '\u{066C}', '\u{060C}'];

/// Numeric value of a digit glyph in any supported system.
pub fn digit_value(c: char) -> Option<u32> {
    match c {
        '0'..='9' => Some(c as u32 - '0' as u32),
        '\u{06F0}'..='\u{06F9}' => Some(c as u32 - 0x06F0),
        '\u{0660}'..='\u{0669}' => Some(c as u32 - 0x0660),
        _ => None,
    }
}

/// Replaces every digit glyph in `text` with the glyph of `target`.
/// Non-digit characters pass through unchanged.
pub fn to_target_digits(text: &str, target: DigitSystem) -> String {
    text.chars()
        .map(|c| match digit_value(c).and_then(|v| target.glyph(v)) {
            Some(glyph) => glyph,
            None => c,
        })
        .collect()
}

/// Normalizes Latin, Persian and Arabic-Indic digits to Latin `0-9`.
pub fn to_latin_digits(text: &str) -> String {
    to_target_digits(text, DigitSystem::Latin)
}

/// Groups the integer part of `numeric` in threes with `,`.
///
/// A leading sign and everything after the first decimal point are kept
/// as-is. Separators already present in the integer part are dropped
/// before regrouping, so formatting is idempotent.
pub fn format_with_thousands_separators(numeric: &str, target: DigitSystem) -> String {
    let latin = to_latin_digits(numeric.trim());
    if latin.is_empty() {
        return String::new();
    }

    let (sign, unsigned) = match latin.chars().next() {
        Some(c @ ('-' | '+')) => (Some(c), &latin[c.len_utf8()..]),
        _ => (None, latin.as_str()),
    };

    let (integer, fraction) = match unsigned.find(DECIMAL_POINTS) {
        Some(idx) => {
            let point = unsigned[idx..].chars().next().map_or(1, char::len_utf8);
            (&unsigned[..idx], Some(&unsigned[idx + point..]))
        }
        None => (unsigned, None),
    };

    let digits: Vec<char> = integer.chars().filter(|c| !GROUP_SEPARATORS.contains(c)).collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    if let Some(sign) = sign {
        grouped.push(sign);
    }
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }

    to_target_digits(&grouped, target)
}

/// Formats a decimal amount with grouping in the requested digit system.
pub fn format_amount(amount: Decimal, target: DigitSystem) -> String {
    format_with_thousands_separators(&amount.to_string(), target)
}

/// True iff every character is a digit (any system), a decimal point or a
/// grouping separator. Repeated decimal points are not rejected here.
pub fn is_valid_numeric_input(text: &str) -> bool {
    text.chars().all(|c| {
        digit_value(c).is_some() || DECIMAL_POINTS.contains(&c) || GROUP_SEPARATORS.contains(&c)
    })
}

/// Parses user-typed amount text in any digit system into a `Decimal`.
pub fn parse_amount(text: &str) -> Option<Decimal> {
    let normalized: String = to_latin_digits(text.trim())
        .chars()
        .filter(|c| !GROUP_SEPARATORS.contains(c))
        .map(|c| if c == '\u{066B}' { '.' } else { c })
        .collect();
    if normalized.is_empty() {
        return None;
    }
    normalized.parse::<Decimal>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_to_target_digits() {
        assert_eq!(to_target_digits("1403/10/07", DigitSystem::Persian), "۱۴۰۳/۱۰/۰۷");
        assert_eq!(to_target_digits("۱۲ abc", DigitSystem::Arabic), "١٢ abc");
        assert_eq!(to_target_digits("", DigitSystem::Persian), "");
    }

    #[test]
    fn test_to_latin_digits_mixed() {
        assert_eq!(to_latin_digits("۱۴0٣/۰9/٠۷"), "1403/09/07");
        assert_eq!(to_latin_digits("no digits"), "no digits");

        let once = to_latin_digits("۱۲٣x4");
        assert_eq!(to_latin_digits(&once), once);
    }

    #[test]
    fn test_thousands_separators() {
        assert_eq!(format_with_thousands_separators("1234567.89", DigitSystem::Latin), "1,234,567.89");
        assert_eq!(format_with_thousands_separators("1234567", DigitSystem::Persian), "۱,۲۳۴,۵۶۷");
        assert_eq!(format_with_thousands_separators("-1000", DigitSystem::Latin), "-1,000");
        assert_eq!(format_with_thousands_separators("999", DigitSystem::Latin), "999");
        assert_eq!(format_with_thousands_separators(".5", DigitSystem::Latin), ".5");
        assert_eq!(format_with_thousands_separators("", DigitSystem::Latin), "");
    }

    #[test]
    fn test_thousands_separators_idempotent() {
        let once = format_with_thousands_separators("۱۲۳۴۵۶۷٫۵", DigitSystem::Latin);
        assert_eq!(once, "1,234,567.5");
        assert_eq!(format_with_thousands_separators(&once, DigitSystem::Latin), once);
    }

    #[test]
    fn test_fraction_kept_verbatim() {
        // Only the first point splits; the rest is the caller's problem.
        assert_eq!(format_with_thousands_separators("12345.6.7", DigitSystem::Latin), "12,345.6.7");
    }

    #[test]
    fn test_numeric_input_validation() {
        assert!(is_valid_numeric_input("1,234.50"));
        assert!(is_valid_numeric_input("۱٬۲۳۴٫۵"));
        assert!(is_valid_numeric_input(""));
        assert!(!is_valid_numeric_input("12a"));
        assert!(!is_valid_numeric_input("-12"));
    }

    #[test]
    fn test_amounts() {
        assert_eq!(format_amount(dec!(2500000.75), DigitSystem::Latin), "2,500,000.75");
        assert_eq!(parse_amount("۲,۵۰۰٫۲۵"), Some(dec!(2500.25)));
        assert_eq!(parse_amount("  "), None);
        assert_eq!(parse_amount("12x"), None);
    }
}
