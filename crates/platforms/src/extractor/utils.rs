use regex::Regex;
use serde_json::Value;

use crate::extractor::error::ExtractorError;

#[inline]
pub fn capture_group_1<'a>(re: &Regex, input: &'a str) -> Option<&'a str> {
    re.captures(input)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[inline]
pub fn capture_group_1_or_invalid_url<'a>(
    re: &Regex,
    input: &'a str,
) -> Result<&'a str, ExtractorError> {
    capture_group_1(re, input).ok_or_else(|| ExtractorError::InvalidUrl(input.to_string()))
}

#[inline]
pub fn extras_get_str<'a>(extras: Option<&'a Value>, key: &str) -> Option<&'a str> {
    extras
        .and_then(|e| e.get(key))
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
}

/// Whether a JSON body carries no information: `null`, `{}`, `[]` or `""`.
pub fn is_empty_json(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
