//! Alert data model
//!
//! Charting platforms send loosely shaped JSON. Every logical field is resolved
//! through an ordered list of aliases; numeric fields are coerced permissively
//! and end up as `NaN` when they cannot be read.

use serde::Serialize;
use serde_json::Value;

/// Aliases for the trade direction
pub const SIDE_ALIASES: &[&str] = &["side"];
/// Aliases for the instrument symbol
pub const SYMBOL_ALIASES: &[&str] = &["symbol", "ticker"];
/// Aliases for the chart timeframe
pub const TIMEFRAME_ALIASES: &[&str] = &["tf", "interval"];
/// Aliases for the last close price
pub const CLOSE_ALIASES: &[&str] = &["close"];
/// Aliases for the stop-loss price
pub const STOP_ALIASES: &[&str] = &["stop", "sl", "stopLoss"];

/// Placeholder for missing text fields
pub const NOT_AVAILABLE: &str = "NA";
/// Placeholder for numbers that are not finite
pub const UNKNOWN: &str = "?";

/// One normalized trade alert. Built per request and never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    /// Trade direction, `NA` when absent
    pub side: String,
    /// Instrument symbol, `NA` when absent
    pub symbol: String,
    /// Chart timeframe, `NA` when absent
    pub timeframe: String,
    /// Last close price, `NaN` when absent or unparsable
    pub close: f64,
    /// Stop-loss price, `NaN` when absent or unparsable
    pub stop: f64,
    /// EMA 21 as sent
    pub ema21: String,
    /// EMA 50 as sent
    pub ema50: String,
    /// EMA 200 as sent
    pub ema200: String,
    /// ADX as sent
    pub adx: String,
}

impl Alert {
    /// Normalize a raw webhook payload.
    ///
    /// Non-object payloads normalize to an alert made entirely of defaults.
    pub fn from_payload(payload: &Value) -> Self {
        Self {
            side: display_text(resolve_alias(payload, SIDE_ALIASES), NOT_AVAILABLE),
            symbol: display_text(resolve_alias(payload, SYMBOL_ALIASES), NOT_AVAILABLE),
            timeframe: display_text(resolve_alias(payload, TIMEFRAME_ALIASES), NOT_AVAILABLE),
            close: parse_number(resolve_alias(payload, CLOSE_ALIASES)),
            stop: parse_number(resolve_alias(payload, STOP_ALIASES)),
            ema21: display_text(resolve_alias(payload, &["ema21"]), ""),
            ema50: display_text(resolve_alias(payload, &["ema50"]), ""),
            ema200: display_text(resolve_alias(payload, &["ema200"]), ""),
            adx: display_text(resolve_alias(payload, &["adx"]), ""),
        }
    }

    /// One-line header used in notifications: `symbol timeframe side`
    pub fn headline(&self) -> String {
        format!("{} {} {}", self.symbol, self.timeframe, self.side)
    }
}

/// Return the value of the first alias that is present and not `null`.
pub fn resolve_alias<'a>(payload: &'a Value, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|alias| payload.get(alias))
        .find(|value| !value.is_null())
}

/// Coerce a JSON value into a number the way JavaScript's `Number()` does.
///
/// Numbers pass through, booleans map to 1 and 0, strings are trimmed and
/// parsed (empty is zero, `0x`/`0o`/`0b` prefixes are honored). Arrays go
/// through their joined text form, so `[95]` is 95 and `[]` is 0. Objects and
/// a missing value are `NaN`.
pub fn parse_number(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => parse_numeric_text(s),
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        Some(Value::Array(items)) => match items.as_slice() {
            [] => 0.0,
            [item] => array_element_number(item),
            _ => f64::NAN,
        },
        _ => f64::NAN,
    }
}

/// Number of a lone array element, read through its text form.
fn array_element_number(item: &Value) -> f64 {
    match item {
        Value::Null => 0.0,
        Value::Number(_) | Value::String(_) | Value::Array(_) => parse_number(Some(item)),
        Value::Bool(_) | Value::Object(_) => f64::NAN,
    }
}

fn parse_numeric_text(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return 0.0;
    }

    let radix = match text.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return u128::from_str_radix(&text[2..], radix).map_or(f64::NAN, |n| n as f64);
    }

    match text.trim_start_matches(|c: char| c == '+' || c == '-') {
        "Infinity" => text.parse::<f64>().unwrap_or(f64::NAN),
        // Rust also accepts "inf" and "nan", JavaScript does not
        digits if digits.starts_with(|c: char| c.is_ascii_digit() || c == '.') => {
            text.parse().unwrap_or(f64::NAN)
        }
        _ => f64::NAN,
    }
}

/// Render a JSON value as display text, or `default` when it is missing.
pub fn display_text(value: Option<&Value>, default: &str) -> String {
    match value {
        None | Some(Value::Null) => default.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) => format_number(f),
            None => n.to_string(),
        },
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Render a price: the number when finite, `?` otherwise.
pub fn format_price(value: f64) -> String {
    if value.is_finite() {
        format_number(value)
    } else {
        UNKNOWN.to_string()
    }
}

/// Shortest round-trip form with JavaScript's layout: positional between
/// 1e-7 and 1e21, exponent notation (`1.5e-8`, `1e+21`) outside.
fn format_number(value: f64) -> String {
    if value == 0.0 {
        // covers -0.0
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    // `{:e}` yields the shortest digits that round-trip, e.g. "1.2345e19"
    let scientific = format!("{:e}", value.abs());
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let exponent: i32 = exponent.parse().unwrap_or(0);

    let k = i32::try_from(digits.len()).unwrap_or(i32::MAX);
    let n = exponent + 1;
    let sign = if value < 0.0 { "-" } else { "" };

    let body = if k <= n && n <= 21 {
        format!("{digits}{}", "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        format!("{int}.{frac}")
    } else if -6 < n && n <= 0 {
        format!("0.{}{digits}", "0".repeat((-n) as usize))
    } else {
        let exp_sign = if n > 0 { '+' } else { '-' };
        let (first, rest) = digits.split_at(1);
        let point = if rest.is_empty() { "" } else { "." };
        format!("{first}{point}{rest}e{exp_sign}{}", (n - 1).abs())
    };

    format!("{sign}{body}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!({"stop": 95}))]
    #[case(json!({"sl": 95}))]
    #[case(json!({"stopLoss": 95}))]
    #[case(json!({"stop": "95"}))]
    #[case(json!({"stop": null, "sl": 95}))]
    fn test_stop_aliases_resolve_identically(#[case] payload: Value) {
        assert_eq!(Alert::from_payload(&payload).stop, 95.0);
    }

    #[test]
    fn test_first_alias_wins() {
        let payload = json!({"stopLoss": 90, "sl": 93, "stop": 95});
        assert_eq!(Alert::from_payload(&payload).stop, 95.0);

        let payload = json!({"ticker": "ETHUSD", "symbol": "BTCUSD"});
        assert_eq!(Alert::from_payload(&payload).symbol, "BTCUSD");
    }

    #[test]
    fn test_fallback_aliases() {
        let payload = json!({"ticker": "ETHUSD", "interval": "60"});
        let alert = Alert::from_payload(&payload);
        assert_eq!(alert.symbol, "ETHUSD");
        assert_eq!(alert.timeframe, "60");
    }

    #[test]
    fn test_defaults() {
        let alert = Alert::from_payload(&json!({"secret": "x"}));
        assert_eq!(alert.side, "NA");
        assert_eq!(alert.symbol, "NA");
        assert_eq!(alert.timeframe, "NA");
        assert!(alert.close.is_nan());
        assert!(alert.stop.is_nan());
        assert_eq!(alert.ema21, "");
        assert_eq!(alert.adx, "");
    }

    #[test]
    fn test_non_object_payload() {
        let alert = Alert::from_payload(&json!([1, 2, 3]));
        assert_eq!(alert.symbol, "NA");
        assert!(alert.close.is_nan());
    }

    #[rstest]
    #[case(json!(100), 100.0)]
    #[case(json!(100.5), 100.5)]
    #[case(json!(" 42.25 "), 42.25)]
    #[case(json!(""), 0.0)]
    #[case(json!(true), 1.0)]
    #[case(json!(false), 0.0)]
    #[case(json!("0x10"), 16.0)]
    #[case(json!("0b101"), 5.0)]
    #[case(json!("1e3"), 1000.0)]
    #[case(json!(".5"), 0.5)]
    #[case(json!("-Infinity"), f64::NEG_INFINITY)]
    #[case(json!([95]), 95.0)]
    #[case(json!(["95.5"]), 95.5)]
    #[case(json!([]), 0.0)]
    #[case(json!([null]), 0.0)]
    fn test_parse_number(#[case] value: Value, #[case] expected: f64) {
        assert_eq!(parse_number(Some(&value)), expected);
    }

    #[rstest]
    #[case(json!("abc"))]
    #[case(json!("inf"))]
    #[case(json!("-0x10"))]
    #[case(json!("12abc"))]
    #[case(json!([1, 2]))]
    #[case(json!([true]))]
    #[case(json!({"price": 95}))]
    #[case(json!(null))]
    fn test_parse_number_not_a_number(#[case] value: Value) {
        assert!(parse_number(Some(&value)).is_nan());
        assert!(parse_number(None).is_nan());
    }

    #[test]
    fn test_display_text_numbers() {
        assert_eq!(display_text(Some(&json!(15)), ""), "15");
        assert_eq!(display_text(Some(&json!(15.0)), ""), "15");
        assert_eq!(display_text(Some(&json!(27.31)), ""), "27.31");
        assert_eq!(display_text(Some(&json!(false)), ""), "false");
        assert_eq!(display_text(None, "NA"), "NA");
    }

    #[rstest]
    #[case(100.0, "100")]
    #[case(95.5, "95.5")]
    #[case(-3.0, "-3")]
    #[case(15.0 / 7.0, "2.142857142857143")]
    #[case(15.0 / 1e9, "1.5e-8")]
    #[case(0.000_001, "0.000001")]
    #[case(1e21, "1e+21")]
    #[case(123_456_789_012_345_678_901_234.0, "1.2345678901234568e+23")]
    #[case(1.234_567_890_123_456_7e19, "12345678901234567000")]
    fn test_format_number_matches_javascript(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(format_number(value), expected);
    }

    #[test]
    fn test_display_text_large_integer() {
        let value: Value = serde_json::from_str("12345678901234567890").unwrap();
        assert_eq!(display_text(Some(&value), ""), "12345678901234567000");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(95.0), "95");
        assert_eq!(format_price(-0.0), "0");
        assert_eq!(format_price(0.5), "0.5");
        assert_eq!(format_price(f64::NAN), "?");
        assert_eq!(format_price(f64::INFINITY), "?");
    }

    #[test]
    fn test_headline() {
        let alert = Alert::from_payload(&json!({"symbol": "BTCUSD", "tf": "15", "side": "buy"}));
        assert_eq!(alert.headline(), "BTCUSD 15 buy");
    }
}
