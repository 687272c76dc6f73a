// Utility helpers for parsing and basic statistics.
//
// The per-value parsing lives here so the pipeline steps in `clean` only
// deal with moving cells around the table.
use crate::types::DurationUnit;
use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};
use once_cell::sync::Lazy;
use regex::Regex;

/// Formats seen in `date_added`, tried in order. The catalog export uses
/// the first one almost exclusively.
pub const DATE_FORMATS: &[&str] = &["%B %d, %Y", "%b %d, %Y", "%Y-%m-%d", "%d-%b-%y", "%m/%d/%Y"];

static DURATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]+)\s+([A-Za-z]+)$").expect("duration pattern is valid")
});

static NON_ALNUM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("separator pattern is valid"));

static CAMEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("camel pattern is valid"));

/// Parse an integer while being forgiving about stray whitespace and
/// float-looking exports such as `"2019.0"`.
pub fn parse_i64_safe(s: Option<&str>) -> Option<i64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(n) = s.parse::<i64>() {
        return Some(n);
    }
    let f = s.parse::<f64>().ok()?;
    if f.is_finite() && f.fract() == 0.0 {
        Some(f as i64)
    } else {
        None
    }
}

/// Try every known `date_added` format; `None` when nothing matches.
pub fn parse_date_added(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Split `"90 min"` / `"2 Seasons"` into magnitude and unit.
pub fn split_duration_str(s: &str) -> Option<(u32, DurationUnit)> {
    let caps = DURATION_RE.captures(s.trim())?;
    let value = caps[1].parse::<u32>().ok()?;
    let unit = DurationUnit::parse(&caps[2])?;
    Some((value, unit))
}

/// `"Date Added"`, `"dateAdded"` and `"date-added"` all become `"date_added"`.
/// Already snake_cased names are returned unchanged.
pub fn to_snake_case(name: &str) -> String {
    let split = CAMEL_RE.replace_all(name.trim(), "${1}_${2}");
    let lower = split.to_lowercase();
    NON_ALNUM_RE
        .replace_all(&lower, "_")
        .trim_matches('_')
        .to_string()
}

pub fn median(mut v: Vec<f64>) -> f64 {
    // We accept `Vec<f64>` by value so the function can sort in-place
    // without cloning at the call site.
    if v.is_empty() {
        return 0.0;
    }
    v.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = v.len() / 2;
    if v.len() % 2 == 1 {
        v[mid]
    } else {
        (v[mid - 1] + v[mid]) / 2.0
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Used for counts in console messages (e.g., `8,807 rows loaded`).
    n.to_formatted_string(&Locale::en)
}
