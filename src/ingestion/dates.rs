//! Tolerant timestamp and age coercion.
//!
//! Parsing never fails loudly: anything that does not match a known layout becomes `None`.

use chrono::{NaiveDate, NaiveDateTime};

/// How to read ambiguous `a/b/YYYY` dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateOrder {
    /// `DD/MM/YYYY` (the source system's locale).
    #[default]
    DayFirst,
    /// `MM/DD/YYYY`.
    MonthFirst,
}

const ISO_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const DAY_FIRST_DATETIME_FORMATS: &[&str] = &["%d/%m/%Y %H:%M:%S", "%d/%m/%Y %H:%M"];
const MONTH_FIRST_DATETIME_FORMATS: &[&str] = &["%m/%d/%Y %H:%M:%S", "%m/%d/%Y %H:%M"];

/// Parse a timestamp cell. Blank or unrecognized input yields `None`.
pub fn parse_timestamp(raw: &str, order: DateOrder) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if s.contains('/') {
        let (datetime_formats, date_format) = match order {
            DateOrder::DayFirst => (DAY_FIRST_DATETIME_FORMATS, "%d/%m/%Y"),
            DateOrder::MonthFirst => (MONTH_FIRST_DATETIME_FORMATS, "%m/%d/%Y"),
        };
        return parse_with(s, datetime_formats, date_format);
    }

    parse_with(s, ISO_DATETIME_FORMATS, "%Y-%m-%d")
}

fn parse_with(s: &str, datetime_formats: &[&str], date_format: &str) -> Option<NaiveDateTime> {
    datetime_formats
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, date_format)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Parse an age cell. Non-numeric, non-finite or negative input yields `None`.
pub fn parse_age(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}
