//! Price formatting for menu cards, cart lines and order rows

use serde_json::Value;

/// Anything a price can arrive as: a number, numeric text, or nothing
#[derive(Debug, Clone, PartialEq)]
pub enum PriceValue {
    Missing,
    Number(f64),
    Text(String),
}

impl From<f64> for PriceValue {
    fn from(value: f64) -> Self {
        PriceValue::Number(value)
    }
}

impl From<Option<f64>> for PriceValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(PriceValue::Missing, PriceValue::Number)
    }
}

impl From<&str> for PriceValue {
    fn from(value: &str) -> Self {
        PriceValue::Text(value.to_string())
    }
}

impl From<&Value> for PriceValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Number(n) => n.as_f64().into(),
            Value::String(s) => PriceValue::Text(s.clone()),
            _ => PriceValue::Missing,
        }
    }
}

/// Format a price with `,` thousands separators and at most three fraction
/// digits, trailing zeros dropped. Missing or non-numeric input gives `"0"`.
///
/// ```
/// use contracts::shared::number_format::format_price;
/// assert_eq!(format_price(1234.5), "1,234.5");
/// ```
pub fn format_price(value: impl Into<PriceValue>) -> String {
    let number = match value.into() {
        PriceValue::Missing => return "0".to_string(),
        PriceValue::Number(n) => n,
        PriceValue::Text(s) => match parse_leading_number(&s) {
            Some(n) => n,
            None => return "0".to_string(),
        },
    };
    if !number.is_finite() {
        return "0".to_string();
    }
    group_thousands(number)
}

/// Longest numeric prefix of `text`, the way a lenient text field is read
/// (`"1200 NGN"` → 1200)
fn parse_leading_number(text: &str) -> Option<f64> {
    let trimmed = text.trim_start();
    let mut end = 0;
    for (i, c) in trimmed.char_indices() {
        if c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E') {
            end = i + c.len_utf8();
        } else {
            break;
        }
    }
    (1..=end)
        .rev()
        .filter(|i| trimmed.is_char_boundary(*i))
        .find_map(|i| trimmed[..i].parse::<f64>().ok())
}

fn group_thousands(value: f64) -> String {
    let formatted = format!("{:.3}", value);
    let (integer_part, fraction_part) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), ""));
    let fraction = fraction_part.trim_end_matches('0');

    let (sign, digits) = match integer_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", integer_part),
    };

    // Insert a separator every 3 digits counting from the right
    let mut reversed = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            reversed.push(',');
        }
        reversed.push(c);
    }
    let grouped: String = reversed.chars().rev().collect();

    let is_zero = digits.chars().all(|c| c == '0') && fraction.is_empty();
    let sign = if is_zero { "" } else { sign };

    if fraction.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, fraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_price_numbers() {
        assert_eq!(format_price(1234.5), "1,234.5");
        assert_eq!(format_price(1234567.0), "1,234,567");
        assert_eq!(format_price(700.0), "700");
        assert_eq!(format_price(0.0), "0");
        assert_eq!(format_price(-1234.0), "-1,234");
        assert_eq!(format_price(1.23456), "1.235");
        assert_eq!(format_price(-0.0001), "0");
    }

    #[test]
    fn test_format_price_missing_or_bad() {
        assert_eq!(format_price(None::<f64>), "0");
        assert_eq!(format_price("abc"), "0");
        assert_eq!(format_price(&Value::Null), "0");
        assert_eq!(format_price(f64::NAN), "0");
    }

    #[test]
    fn test_format_price_text() {
        assert_eq!(format_price("2200"), "2,200");
        assert_eq!(format_price("1200 NGN"), "1,200");
        assert_eq!(format_price(&json!("99.90")), "99.9");
        assert_eq!(format_price(&json!(1500)), "1,500");
    }
}
