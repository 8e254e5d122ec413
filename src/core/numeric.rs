//! Lenient numeric coercion for exchange payload fields
//!
//! The CME volume report mixes JSON numbers with strings such as `"1,234"`.
//! A single malformed field must never abort a whole dataset, so the lenient
//! form falls back to `0.0`; the strict form reports the failure instead.

use serde_json::Value;

/// Coerce a JSON value to a finite `f64`, or `None` when it cannot be read.
///
/// Accepts numbers and strings with optional thousands separators and
/// surrounding whitespace. `null`, absent values, booleans, empty strings and
/// non-finite results are all unparsable.
pub fn coerce_number(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned: String = s.trim().chars().filter(|&c| c != ',').collect();
            cleaned.parse::<f64>().ok()
        }
        _ => None,
    };

    parsed.filter(|v| v.is_finite())
}

/// Coerce a JSON value to `f64`, substituting `0.0` when it cannot be read.
pub fn parse_float(value: Option<&Value>) -> f64 {
    coerce_number(value).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_passthrough() {
        assert_eq!(parse_float(Some(&json!(3300))), 3300.0);
        assert_eq!(parse_float(Some(&json!(-2.5))), -2.5);
    }

    #[test]
    fn test_thousands_separator() {
        assert_eq!(parse_float(Some(&json!("1,234.5"))), 1234.5);
        assert_eq!(parse_float(Some(&json!(" 12,000 "))), 12000.0);
        assert_eq!(parse_float(Some(&json!("-3"))), -3.0);
    }

    #[test]
    fn test_lenient_defaults() {
        assert_eq!(parse_float(Some(&json!(""))), 0.0);
        assert_eq!(parse_float(None), 0.0);
        assert_eq!(parse_float(Some(&Value::Null)), 0.0);
        assert_eq!(parse_float(Some(&json!("abc"))), 0.0);
        assert_eq!(parse_float(Some(&json!(true))), 0.0);
    }

    #[test]
    fn test_strict_form_distinguishes_zero() {
        assert_eq!(coerce_number(Some(&json!("0"))), Some(0.0));
        assert_eq!(coerce_number(Some(&json!("n/a"))), None);
        assert_eq!(coerce_number(Some(&json!("NaN"))), None);
        assert_eq!(coerce_number(Some(&json!("inf"))), None);
    }
}
