use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

/// Numbers above this are taken to be milliseconds rather than seconds (year ~5138 in seconds)
const MILLIS_THRESHOLD: f64 = 1e11;

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Lenient timestamp reader for export files.
///
/// Accepts Unix seconds or milliseconds (integer or float), RFC 3339 strings, naive
/// `YYYY-MM-DD[T ]HH:MM:SS[.f]` strings (read as UTC) and bare dates. Anything else,
/// including zero and empty strings, is treated as absent.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => from_unix(n.as_f64()?),
        Value::String(s) => parse_timestamp_str(s),
        _ => None,
    }
}

fn from_unix(raw: f64) -> Option<DateTime<Utc>> {
    if !raw.is_finite() || raw == 0.0 {
        return None;
    }
    let millis = if raw.abs() > MILLIS_THRESHOLD { raw } else { raw * 1000.0 };
    DateTime::from_timestamp_millis(millis.round() as i64)
}

pub fn parse_timestamp_str(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
