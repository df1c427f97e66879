//! Purchase date parsing
//!
//! Receipts arrive with dates in every shape imaginable. Parsing never
//! fails: anything unrecognised resolves to the supplied `now`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::PurchaseDate;

/// Numbers below this are Unix seconds, at or above it Unix milliseconds
const SECONDS_CUTOFF: f64 = 1e12;

/// Largest time value a calendar date can represent (±100,000,000 days)
const MAX_TIME_MS: f64 = 8.64e15;

static DAY_FIRST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})[/\-](\d{1,2})[/\-](\d{2,4})$").expect("day-first date pattern")
});

static MONTH_FIRST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,2}/\d{1,2}/\d{4}$").expect("month-first date pattern"));

static ISO_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}[-/]\d{1,2}[-/]\d{1,2}").expect("iso date prefix"));

const ISO_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const ISO_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

const NAMED_MONTH_FORMATS: &[&str] = &["%b %d, %Y", "%B %d, %Y", "%d %b %Y", "%d %B %Y"];

/// Resolve a raw purchase date into a point in time
pub fn parse_purchase_date(input: &PurchaseDate, now: DateTime<Utc>) -> DateTime<Utc> {
    match input {
        PurchaseDate::At(at) => *at,
        PurchaseDate::Epoch(value) => from_epoch(*value).unwrap_or(now),
        PurchaseDate::Text(text) => parse_text(text).unwrap_or(now),
    }
}

/// Render a purchase date the way it appears in draft notes: `15 Nov 2023, 10:13 pm`
pub fn format_purchase_date(at: &DateTime<Utc>) -> String {
    at.format("%-d %b %Y, %-I:%M %P").to_string()
}

fn from_epoch(value: f64) -> Option<DateTime<Utc>> {
    if !value.is_finite() {
        return None;
    }
    let ms = if value > 0.0 && value < SECONDS_CUTOFF {
        value * 1000.0
    } else {
        value
    };
    from_millis(ms)
}

fn from_millis(ms: f64) -> Option<DateTime<Utc>> {
    if !ms.is_finite() || ms.abs() > MAX_TIME_MS {
        return None;
    }
    DateTime::from_timestamp_millis(ms.trunc() as i64)
}

fn parse_text(text: &str) -> Option<DateTime<Utc>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if is_digits(trimmed, 10) {
        if let Some(at) = trimmed.parse::<f64>().ok().and_then(|s| from_millis(s * 1000.0)) {
            return Some(at);
        }
    }

    if is_digits(trimmed, 13) {
        if let Some(at) = trimmed.parse::<f64>().ok().and_then(from_millis) {
            return Some(at);
        }
    }

    parse_generic(trimmed).or_else(|| parse_day_first(trimmed))
}

fn is_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}

/// Common interchange formats. Offsets are honoured; zone-less values are UTC.
fn parse_generic(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(s) {
        return Some(at.with_timezone(&Utc));
    }
    if let Ok(at) = DateTime::parse_from_rfc2822(s) {
        return Some(at.with_timezone(&Utc));
    }

    if ISO_PREFIX_RE.is_match(s) {
        for fmt in ISO_DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(Utc.from_utc_datetime(&naive));
            }
        }
        for fmt in ISO_DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
                return Some(midnight(date));
            }
        }
    }

    if MONTH_FIRST_RE.is_match(s) {
        if let Ok(date) = NaiveDate::parse_from_str(s, "%m/%d/%Y") {
            return Some(midnight(date));
        }
    }

    NAMED_MONTH_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .map(midnight)
}

/// `D/M/Y` or `D-M-Y`; two-digit years above 70 are 19xx, the rest 20xx
fn parse_day_first(s: &str) -> Option<DateTime<Utc>> {
    let caps = DAY_FIRST_RE.captures(s)?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year_digits = &caps[3];
    let year: i32 = match year_digits.len() {
        2 => {
            let short: i32 = year_digits.parse().ok()?;
            if short > 70 {
                1900 + short
            } else {
                2000 + short
            }
        }
        _ => year_digits.parse().ok()?,
    };
    NaiveDate::from_ymd_opt(year, month, day).map(midnight)
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}
