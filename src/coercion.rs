//! Field coercion utilities
//!
//! Total conversions from loosely-typed record fields to typed values.
//! Numbers fall back to zero, dates fall back to `None`. Nothing here fails.
//!
//! A malformed amount is indistinguishable from a missing one once coerced.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::models::FieldValue;

/// Day/month/year format used by KYC and value dates
pub const DMY_FORMAT: &str = "%d/%m/%Y";

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO-8601 datetime. An offset, when present, is dropped and the
/// wall-clock time kept. A bare `YYYY-MM-DD` resolves to midnight.
pub fn to_datetime(s: Option<&str>) -> Option<NaiveDateTime> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    if let Some(dt) = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt);
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parse a `DD/MM/YYYY` date
pub fn to_date(s: Option<&str>) -> Option<NaiveDate> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, DMY_FORMAT).ok()
}

pub fn to_float(value: Option<&FieldValue>) -> f64 {
    match value {
        Some(FieldValue::Number(n)) => *n,
        Some(FieldValue::Text(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        Some(FieldValue::Bool(b)) => f64::from(u8::from(*b)),
        _ => 0.0,
    }
}

pub fn to_int(value: Option<&FieldValue>) -> i64 {
    match value {
        Some(FieldValue::Number(n)) if n.is_finite() => n.trunc() as i64,
        Some(FieldValue::Text(s)) => s.trim().parse::<i64>().unwrap_or(0),
        Some(FieldValue::Bool(b)) => i64::from(*b),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn text(s: &str) -> FieldValue {
        FieldValue::Text(s.to_string())
    }

    #[test]
    fn test_datetime_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();

        assert_eq!(to_datetime(Some("2024-01-01T10:00:00")), Some(expected));
        assert_eq!(to_datetime(Some("2024-01-01 10:00:00")), Some(expected));
        assert_eq!(to_datetime(Some("2024-01-01T10:00:00+08:00")), Some(expected));
        assert_eq!(to_datetime(Some("2024-01-01T10:00:00Z")), Some(expected));
        assert_eq!(to_datetime(Some("2024-01-01T10:00")), Some(expected));
        assert_eq!(
            to_datetime(Some("2024-01-01")).map(|d| d.time()),
            Some(NaiveTime::MIN)
        );
    }

    #[test]
    fn test_datetime_no_value() {
        assert_eq!(to_datetime(None), None);
        assert_eq!(to_datetime(Some("")), None);
        assert_eq!(to_datetime(Some("   ")), None);
        assert_eq!(to_datetime(Some("01/01/2024")), None);
        assert_eq!(to_datetime(Some("yesterday")), None);
    }

    #[test]
    fn test_dmy_date() {
        assert_eq!(
            to_date(Some("01/02/2024")),
            NaiveDate::from_ymd_opt(2024, 2, 1)
        );
        assert_eq!(to_date(Some("2024-02-01")), None);
        assert_eq!(to_date(Some("31/02/2024")), None);
        assert_eq!(to_date(Some(" ")), None);
        assert_eq!(to_date(None), None);
    }

    #[test]
    fn test_float_is_total() {
        assert_eq!(to_float(Some(&text("20000.01"))), 20000.01);
        assert_eq!(to_float(Some(&text(" 42 "))), 42.0);
        assert_eq!(to_float(Some(&FieldValue::Number(7.5))), 7.5);
        assert_eq!(to_float(Some(&FieldValue::Bool(true))), 1.0);
        assert_eq!(to_float(Some(&text("abc"))), 0.0);
        assert_eq!(to_float(Some(&FieldValue::Null)), 0.0);
        assert_eq!(to_float(None), 0.0);
    }

    #[test]
    fn test_int_is_total() {
        assert_eq!(to_int(Some(&text("5"))), 5);
        assert_eq!(to_int(Some(&text("-200"))), -200);
        assert_eq!(to_int(Some(&text("12.5"))), 0);
        assert_eq!(to_int(Some(&FieldValue::Number(12.9))), 12);
        assert_eq!(to_int(Some(&FieldValue::Number(-3.7))), -3);
        assert_eq!(to_int(Some(&FieldValue::Bool(false))), 0);
        assert_eq!(to_int(Some(&FieldValue::Number(f64::NAN))), 0);
        assert_eq!(to_int(None), 0);
    }
}
