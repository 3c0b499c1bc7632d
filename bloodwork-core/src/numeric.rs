// Numeric helpers shared by the parser, the rule engine and the renderers.
//
// Lab values arrive as loose strings ("3,5", "12.0", "<0.01", "98.5 ").
// `leading_number` reads the longest numeric prefix the way report tooling
// traditionally did (so "12abc" is 12 and "<0.01" is not a number), and
// `format_number` prints the shortest text that round-trips.

use regex::Regex;
use std::sync::LazyLock;

static LEADING_NUMBER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)").unwrap()
});

/// Parse the numeric prefix of `text`, ignoring leading whitespace.
/// Returns `None` when the text does not start with a number.
pub fn leading_number(text: &str) -> Option<f64> {
    let candidate = text.trim_start();
    let matched = LEADING_NUMBER_REGEX.find(candidate)?.as_str();

    match matched.trim_start_matches(['+', '-']) {
        "Infinity" if matched.starts_with('-') => Some(f64::NEG_INFINITY),
        "Infinity" => Some(f64::INFINITY),
        _ => matched.parse::<f64>().ok(),
    }
}

/// Render a number with the shortest representation that reads back to the
/// same value: integers lose their ".0", very large or very small magnitudes
/// switch to exponent notation.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let exp = format!("{value:e}");
        return match exp.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => exp,
        };
    }

    format!("{value}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_number_plain_values() {
        assert_eq!(leading_number("5.2"), Some(5.2));
        assert_eq!(leading_number("  42"), Some(42.0));
        assert_eq!(leading_number(".5"), Some(0.5));
        assert_eq!(leading_number("7."), Some(7.0));
    }

    #[test]
    fn test_leading_number_stops_at_garbage() {
        assert_eq!(leading_number("3,5"), Some(3.0));
        assert_eq!(leading_number("12abc"), Some(12.0));
        assert_eq!(leading_number("1e3x"), Some(1000.0));
        assert_eq!(leading_number("1e"), Some(1.0));
    }

    #[test]
    fn test_leading_number_rejects_non_numbers() {
        assert_eq!(leading_number("<0.01"), None);
        assert_eq!(leading_number("Valeursde"), None);
        assert_eq!(leading_number(""), None);
        assert_eq!(leading_number("."), None);
    }

    #[test]
    fn test_leading_number_infinity() {
        assert_eq!(leading_number("Infinity"), Some(f64::INFINITY));
        assert_eq!(leading_number("-Infinity"), Some(f64::NEG_INFINITY));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(3.5), "3.5");
        assert_eq!(format_number(12.0), "12");
        assert_eq!(format_number(3500.0), "3500");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
    }

    #[test]
    fn test_format_number_exponent_ranges() {
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
    }
}
