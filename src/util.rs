// Parsing and display helpers.
//
// This module centralizes the forgiving number/timestamp handling for trip
// exports, and the display conversions used by the variance rows, so the
// engine modules can work with typed values.
use crate::types::{MetricKind, MetricValue};
use chrono::{DateTime, NaiveDateTime, Utc};
use num_format::{Locale, ToFormattedString};
use serde::de::{self, Deserializer, Visitor};
use std::fmt;

pub const NOT_AVAILABLE: &str = "N/A";

/// Parse a string-like value into `f64` while being forgiving about
/// formatting issues that are common in datastore exports.
///
/// - Trims whitespace.
/// - Rejects values that contain alphabetic characters.
/// - Strips thousands separators like `","` before parsing.
/// - Returns `None` for anything that cannot be safely parsed or is not finite.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(",", "");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a trip timestamp. RFC 3339 is the normal shape; the datastore's
/// space-separated form with or without an offset is also accepted, and
/// naive values are taken as UTC.
pub fn parse_timestamp_safe(s: Option<&str>) -> Option<DateTime<Utc>> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    None
}

/// Serde adapter for numeric fields that may arrive as numbers, numeric
/// strings, empty strings or nulls. Anything unparseable becomes `None`.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_option(LenientF64)
}

struct LenientF64;

impl<'de> Visitor<'de> for LenientF64 {
    type Value = Option<f64>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number, a numeric string or null")
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(LenientF64)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(Some(v).filter(|v| v.is_finite()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(v as f64))
    }

    fn visit_bool<E: de::Error>(self, _v: bool) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        let parsed = parse_f64_safe(Some(v));
        if parsed.is_none() && !v.trim().is_empty() {
            tracing::debug!(value = v, "discarding non-numeric field value");
        }
        Ok(parsed)
    }

    fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        while seq.next_element::<de::IgnoredAny>()?.is_some() {}
        Ok(None)
    }

    fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        while map.next_entry::<de::IgnoredAny, de::IgnoredAny>()?.is_some() {}
        Ok(None)
    }
}

/// Text form of a JSON scalar for fields that are text in the trip model.
/// Integer ids like `1017` become `"1017"`; booleans, arrays and objects
/// carry no usable text and become null.
pub fn json_scalar_text(value: serde_json::Value) -> serde_json::Value {
    use serde_json::Value;
    match value {
        Value::String(_) | Value::Null => value,
        Value::Number(n) => Value::String(n.to_string()),
        other => {
            tracing::debug!(value = %other, "discarding non-text field value");
            Value::Null
        }
    }
}

/// `totalCost / count`-style division that yields 0 instead of NaN/inf.
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Format a floating-point value with:
    // - a fixed number of decimal places, and
    // - locale-aware thousands separators (e.g., `1,234,567.89`).
    let abs_n = n.abs();
    // First, format to a plain fixed-decimal string like `1234567.89`.
    let s = format!("{:.*}", decimals, abs_n);
    // Values that round to zero never carry a sign.
    let neg = n.is_sign_negative() && s.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    // Use `num-format` to insert commas into the integer portion.
    // Magnitudes beyond i64 are printed without separators.
    let mut res = match int_part.parse::<i64>() {
        Ok(int_val) => int_val.to_formatted_string(&Locale::en),
        Err(_) => int_part.to_string(),
    };
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for counts in console messages.
    n.to_formatted_string(&Locale::en)
}

/// Render a second count as `hh:mm:ss`. Hours are not wrapped at 24.
pub fn format_duration_hms(seconds: i64) -> String {
    let sign = if seconds < 0 { "-" } else { "" };
    let total = seconds.unsigned_abs();
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    format!("{}{:02}:{:02}:{:02}", sign, h, m, s)
}

/// Render minutes as `Xh Ym`, or `Ym` below one hour, with an optional
/// direction word appended. The sign is dropped; direction belongs in
/// the suffix.
pub fn format_minutes(minutes: f64, suffix: Option<&str>) -> String {
    let total = if minutes.is_finite() { minutes.abs().round() as u64 } else { 0 };
    let (h, m) = (total / 60, total % 60);
    let base = if h > 0 { format!("{}h {}m", h, m) } else { format!("{}m", m) };
    match suffix {
        Some(word) if !word.is_empty() => format!("{} {}", base, word),
        _ => base,
    }
}

pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M").to_string()
}

pub fn format_distance(km: f64) -> String {
    format!("{} km", format_number(km, 2))
}

pub fn format_currency(amount: f64) -> String {
    format_number(amount, 2)
}

/// Display one side of a comparison the way its metric kind reads.
pub fn format_metric_value(kind: MetricKind, value: Option<&MetricValue>) -> String {
    match (kind, value) {
        (_, None) => NOT_AVAILABLE.to_string(),
        (_, Some(MetricValue::Timestamp(dt))) => format_timestamp(dt),
        (MetricKind::Duration, Some(MetricValue::Number(n))) => format_minutes(*n, None),
        (MetricKind::Distance, Some(MetricValue::Number(n))) => format_distance(*n),
        (MetricKind::Currency, Some(MetricValue::Number(n))) => format_currency(*n),
        (MetricKind::Time, Some(MetricValue::Number(n))) => format_number(*n, 2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_f64_strips_separators_and_rejects_text() {
        assert_eq!(parse_f64_safe(Some(" 1,250.50 ")), Some(1250.5));
        assert_eq!(parse_f64_safe(Some("abc")), None);
        assert_eq!(parse_f64_safe(Some("")), None);
        assert_eq!(parse_f64_safe(None), None);
    }

    #[test]
    fn format_number_drops_sign_of_rounded_zero() {
        assert_eq!(format_number(-0.001, 2), "0.00");
        assert_eq!(format_number(-1234.5, 2), "-1,234.50");
        assert_eq!(format_number(12.0, 0), "12");
    }

    #[test]
    fn format_number_keeps_digits_beyond_i64() {
        assert_eq!(format_number(1e20, 2), "100000000000000000000.00");
        assert_eq!(format_number(-1e20, 0), "-100000000000000000000");
    }

    #[test]
    fn timestamp_formats() {
        let a = parse_timestamp_safe(Some("2024-01-01T10:00:00Z")).unwrap();
        let b = parse_timestamp_safe(Some("2024-01-01 10:00:00+00")).unwrap();
        let c = parse_timestamp_safe(Some("2024-01-01 10:00:00")).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert!(parse_timestamp_safe(Some("yesterday")).is_none());
    }
}
