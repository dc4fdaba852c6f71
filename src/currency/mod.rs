//! Money helpers: lenient amount parsing, display formatting and PLN-anchored
//! exchange-rate conversion.

pub mod rates;

use serde::{Deserialize, Serialize};

pub use rates::{convert, RateSnapshot, RateTable, ANCHOR_CURRENCY, RATE_CACHE_TTL_HOURS};

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new(ANCHOR_CURRENCY)
    }
}

/// Currencies offered by the settings screen, most used first.
pub const PREFERRED_CURRENCIES: [&str; 4] = ["PLN", "EUR", "USD", "GBP"];

/// Default display symbol for a currency code, falling back to the code itself.
pub fn symbol_for(code: &str) -> String {
    match code {
        "PLN" => "zł".into(),
        "EUR" => "€".into(),
        "USD" => "$".into(),
        "GBP" => "£".into(),
        _ => code.into(),
    }
}

/// Parses a user or backend supplied amount.
///
/// The first `,` is read as a decimal point and the longest numeric prefix is
/// used, so `"12,50 zł"` is `12.5`. Anything without a finite numeric prefix
/// is `0.0`; this function never fails.
pub fn parse_amount(raw: &str) -> f64 {
    let normalized = raw.replacen(',', ".", 1);
    let prefix = numeric_prefix(normalized.trim_start());
    prefix
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

fn numeric_prefix(text: &str) -> &str {
    let bytes = text.as_bytes();
    let len = bytes.len();
    let count_digits = |from: usize| {
        bytes[from..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_digits = count_digits(end);
    end += int_digits;
    let mut digits = int_digits;

    if end < len && bytes[end] == b'.' {
        let frac_digits = count_digits(end + 1);
        if digits + frac_digits > 0 {
            end += 1 + frac_digits;
            digits += frac_digits;
        }
    }
    if digits == 0 {
        return "";
    }

    if end < len && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < len && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits = count_digits(exp_end);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }
    &text[..end]
}

/// Two-decimal amount followed by the currency symbol, e.g. `12.50 zł`.
pub fn format_amount(amount: f64, symbol: &str) -> String {
    format!("{:.2} {}", amount, symbol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_and_dot() {
        assert_eq!(parse_amount("12,50"), 12.5);
        assert_eq!(parse_amount("12.50"), 12.5);
        assert_eq!(parse_amount("  7"), 7.0);
    }

    #[test]
    fn parses_numeric_prefix() {
        assert_eq!(parse_amount("43,00 zł"), 43.0);
        assert_eq!(parse_amount("-3.5abc"), -3.5);
        assert_eq!(parse_amount(".5"), 0.5);
        assert_eq!(parse_amount("1e3"), 1000.0);
        assert_eq!(parse_amount("2e"), 2.0);
    }

    #[test]
    fn unparseable_is_zero() {
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("abc"), 0.0);
        assert_eq!(parse_amount("-"), 0.0);
        assert_eq!(parse_amount("."), 0.0);
        assert_eq!(parse_amount("inf"), 0.0);
        assert_eq!(parse_amount("1e999"), 0.0);
    }

    #[test]
    fn only_first_comma_becomes_decimal_point() {
        assert_eq!(parse_amount("1,234,5"), 1.234);
    }

    #[test]
    fn formats_with_symbol() {
        assert_eq!(format_amount(12.5, "zł"), "12.50 zł");
        assert_eq!(format_amount(0.0, "€"), "0.00 €");
    }

    #[test]
    fn currency_code_normalizes() {
        assert_eq!(CurrencyCode::new(" eur ").as_str(), "EUR");
        assert_eq!(CurrencyCode::default().as_str(), "PLN");
        assert_eq!(symbol_for("GBP"), "£");
        assert_eq!(symbol_for("CHF"), "CHF");
    }
}
