// Price and name normalization shared by the resolver and the recommender
use crate::model::PriceError;
use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::LazyLock;

static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?|\.\d+)\s*(k\b)?").expect("price pattern")
});

const CURRENCY_MARKERS: [&str; 8] = ["₱", "$", "€", "£", "¥", "php", "usd", "eur"];

/// Parses a raw price field. Numbers pass through, strings are cleaned up.
pub fn parse_price(value: &Value) -> Result<f64, PriceError> {
    match value {
        Value::Number(n) => {
            let v = n.as_f64().ok_or(PriceError::NotFinite)?;
            if v.is_finite() {
                Ok(v)
            } else {
                Err(PriceError::NotFinite)
            }
        }
        Value::String(s) => parse_price_str(s),
        Value::Null => Err(PriceError::Empty),
        other => Err(PriceError::UnsupportedType(type_name(other).to_string())),
    }
}

/// Strips currency markers and thousands separators, applies a trailing `k`
/// as ×1000 and takes the first numeric run found in the text.
pub fn parse_price_str(raw: &str) -> Result<f64, PriceError> {
    let mut text = raw.trim().to_lowercase();
    if text.is_empty() {
        return Err(PriceError::Empty);
    }
    for marker in CURRENCY_MARKERS {
        text = text.replace(marker, " ");
    }
    let text: String = text
        .chars()
        .filter(|c| !matches!(c, ',' | '_' | '\u{202f}' | '\u{a0}' | '\''))
        .collect();

    let caps = NUMBER_RE
        .captures(&text)
        .ok_or_else(|| PriceError::NoDigits(raw.to_string()))?;
    let mut value: f64 = caps[1]
        .parse()
        .map_err(|_| PriceError::NoDigits(raw.to_string()))?;
    if caps.get(2).is_some() {
        value *= 1000.0;
    }
    if !value.is_finite() {
        return Err(PriceError::NotFinite);
    }
    Ok(value)
}

/// Lenient variant: unparsable prices become `None`.
pub fn normalize_price(value: &Value) -> Option<f64> {
    parse_price(value).ok()
}

/// Renders an amount rounded to whole units with thousands grouping, e.g. `₱12,000`.
pub fn format_price(amount: f64, symbol: &str) -> String {
    let rounded = amount.round();
    let digits = format!("{}", rounded.abs() as u64);
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-{}{}", symbol, grouped)
    } else {
        format!("{}{}", symbol, grouped)
    }
}

/// Lower-cases, replaces anything that is not a word character or whitespace
/// with a space and collapses runs of whitespace.
pub fn normalize_name(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect::<String>()
        .to_lowercase();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Word set of an already normalized name.
pub fn tokens(normalized: &str) -> HashSet<&str> {
    normalized.split_whitespace().collect()
}

/// True when any keyword (or keyword phrase) appears as whole words of `text`.
pub fn has_keyword(text: &str, keywords: &[String]) -> bool {
    let haystack = format!(" {} ", normalize_name(text));
    keywords
        .iter()
        .map(|k| normalize_name(k))
        .filter(|k| !k.is_empty())
        .any(|k| haystack.contains(&format!(" {k} ")))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
