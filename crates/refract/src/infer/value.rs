//! Pure value parser strategies.
//!
//! Each family (number, date, boolean) is an ordered list of pure parsers
//! tried in fixed priority; the first success wins. No locale lookup, no
//! runtime configuration: the lists themselves are the contract.

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

// Grouped thousands with dot decimals: 1,234,567.89
static GROUPED_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d{1,3}(,\d{3})+(\.\d+)?$").unwrap());

// Dot-grouped thousands with comma decimals: 1.234.567,89
static GROUPED_DOT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d{1,3}(\.\d{3})+(,\d+)?$").unwrap());

// Plain comma decimal: 1234,56
static COMMA_DECIMAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?\d+,\d+$").unwrap());

type NumberStrategy = fn(&str) -> Option<f64>;

fn parse_plain(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_grouped_comma(s: &str) -> Option<f64> {
    if GROUPED_COMMA.is_match(s) {
        s.replace(',', "").parse::<f64>().ok()
    } else {
        None
    }
}

fn parse_grouped_dot(s: &str) -> Option<f64> {
    if GROUPED_DOT.is_match(s) {
        s.replace('.', "").replace(',', ".").parse::<f64>().ok()
    } else {
        None
    }
}

fn parse_comma_decimal(s: &str) -> Option<f64> {
    if COMMA_DECIMAL.is_match(s) {
        s.replace(',', ".").parse::<f64>().ok()
    } else {
        None
    }
}

const NUMBER_STRATEGIES: &[NumberStrategy] = &[
    parse_plain,
    parse_grouped_comma,
    parse_grouped_dot,
    parse_comma_decimal,
];

/// Parse a numeric token, accounting for decimal separators, optional
/// thousands separators and negative signs.
pub fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    NUMBER_STRATEGIES.iter().find_map(|parse| parse(trimmed))
}

type DateStrategy = fn(&str) -> Option<NaiveDate>;

fn parse_iso(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDate> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .ok()
        .map(|dt| dt.date())
}

fn parse_day_first(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%d/%m/%Y").ok()
}

fn parse_month_first(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%m/%d/%Y").ok()
}

fn parse_compact(s: &str) -> Option<NaiveDate> {
    if s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit()) {
        NaiveDate::parse_from_str(s, "%Y%m%d").ok()
    } else {
        None
    }
}

fn parse_slash_alt(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y/%m/%d").ok()
}

// Day-first before month-first: ambiguous values like 03/04/2024 resolve
// the same way on every build.
const DATE_STRATEGIES: &[DateStrategy] = &[
    parse_iso,
    parse_iso_datetime,
    parse_day_first,
    parse_month_first,
    parse_compact,
    parse_slash_alt,
];

/// Parse a date token against the fixed ordered format list.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    DATE_STRATEGIES.iter().find_map(|parse| parse(trimmed))
}

/// Parse a boolean-like token from the recognized set.
pub fn parse_boolean(value: &str) -> Option<bool> {
    let lower = value.trim().to_lowercase();
    match lower.as_str() {
        "true" | "yes" | "y" | "t" | "1" | "sim" => Some(true),
        "false" | "no" | "n" | "f" | "0" | "não" | "nao" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_numbers() {
        assert_eq!(parse_number("42"), Some(42.0));
        assert_eq!(parse_number("-1.5"), Some(-1.5));
        assert_eq!(parse_number(" 3.14 "), Some(3.14));
        assert_eq!(parse_number("1e3"), Some(1000.0));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn test_parse_thousands_separators() {
        assert_eq!(parse_number("1,234"), Some(1234.0));
        assert_eq!(parse_number("1,234,567.89"), Some(1234567.89));
        assert_eq!(parse_number("-12,345"), Some(-12345.0));
        // Not valid grouping; reads as a comma decimal instead.
        assert_eq!(parse_number("12,34"), Some(12.34));
        assert_eq!(parse_number("1,2345"), Some(1.2345));
    }

    #[test]
    fn test_parse_comma_decimals() {
        assert_eq!(parse_number("1234,56"), Some(1234.56));
        assert_eq!(parse_number("1.234.567,89"), Some(1234567.89));
        assert_eq!(parse_number("-1.234,5"), Some(-1234.5));
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(
            parse_date("2024-01-15"),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
        assert_eq!(
            parse_date("2024-01-15T10:30:00"),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
    }

    #[test]
    fn test_parse_slash_dates_day_first_wins() {
        // Ambiguous: both DD/MM and MM/DD parse; day-first is tried first.
        assert_eq!(
            parse_date("03/04/2024"),
            NaiveDate::from_ymd_opt(2024, 4, 3)
        );
        // Unambiguous month-first still parses via the second strategy.
        assert_eq!(
            parse_date("12/25/2024"),
            NaiveDate::from_ymd_opt(2024, 12, 25)
        );
    }

    #[test]
    fn test_parse_compact_and_alt() {
        assert_eq!(
            parse_date("20240115"),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
        assert_eq!(
            parse_date("2024/01/15"),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
        assert_eq!(parse_date("2024015"), None);
    }

    #[test]
    fn test_parse_boolean_tokens() {
        assert_eq!(parse_boolean("true"), Some(true));
        assert_eq!(parse_boolean("NO"), Some(false));
        assert_eq!(parse_boolean("Y"), Some(true));
        assert_eq!(parse_boolean("f"), Some(false));
        assert_eq!(parse_boolean("Sim"), Some(true));
        assert_eq!(parse_boolean("não"), Some(false));
        assert_eq!(parse_boolean("nao"), Some(false));
        assert_eq!(parse_boolean("maybe"), None);
    }
}
