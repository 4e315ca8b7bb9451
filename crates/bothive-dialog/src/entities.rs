//! Heuristic entity extraction: phone, email, date, time, name.
//!
//! Each extractor is a pure function over the raw message; `extract_all`
//! composes them into the classifier's entity payload. Date extraction takes
//! an explicit `today` so roll-forward behavior stays testable.

use chrono::{Datelike, Duration, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::Entities;

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\+91|91|0)?[\s-]?([6-9][0-9]{9})").unwrap());

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\w.\-]+@[\w.\-]+\.\w+").unwrap());

static ISO_DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{4}-\d{2}-\d{2})\b").unwrap());
static DMY_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})[/-](\d{1,2})[/-](\d{4})\b").unwrap());
static TOMORROW_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\btomorrow\b|कल").unwrap());
static DAY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{1,2})(?:st|nd|rd|th)?\b").unwrap());

static TIME_AMPM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d{1,2})(?::(\d{2}))?\s*(am|pm)\b").unwrap());
static TIME_BARE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{1,2})(?::(\d{2}))?\b").unwrap());

static CAPITALIZED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Z][a-z]+\b").unwrap());

const MONTH_NAMES: [(&str, &str); 12] = [
    ("january", "jan"),
    ("february", "feb"),
    ("march", "mar"),
    ("april", "apr"),
    ("may", "may"),
    ("june", "jun"),
    ("july", "jul"),
    ("august", "aug"),
    ("september", "sep"),
    ("october", "oct"),
    ("november", "nov"),
    ("december", "dec"),
];

/// Words that look like names but never are.
const NAME_STOPLIST: [&str; 13] = [
    "i", "am", "my", "name", "is", "the", "a", "an", "to", "for", "on", "at", "pm",
];

/// Extract an Indian mobile number: 10 digits starting 6-9, with an optional
/// `+91`, `91`, or `0` prefix. Returns the bare 10 digits.
pub fn extract_phone(message: &str) -> Option<String> {
    for caps in PHONE_RE.captures_iter(message) {
        let whole = caps.get(0).unwrap();
        // The regex crate has no lookaround; reject matches embedded in a
        // longer digit run by hand.
        let digit_before = message[..whole.start()]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_ascii_digit());
        let digit_after = message[whole.end()..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit());
        if digit_before || digit_after {
            continue;
        }
        return Some(caps.get(2).unwrap().as_str().to_string());
    }
    None
}

/// Normalize a free-form slot answer into a valid phone: keep digits, take
/// the last ten, require a 6-9 leading digit.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < 10 {
        return None;
    }
    let last10 = &digits[digits.len() - 10..];
    if last10.starts_with(['6', '7', '8', '9']) {
        Some(last10.to_string())
    } else {
        None
    }
}

pub fn extract_email(message: &str) -> Option<String> {
    EMAIL_RE.find(message).map(|m| m.as_str().to_string())
}

/// Extract a date in ISO form, resolved against `today`.
///
/// Priority: explicit ISO, then DD/MM/YYYY or DD-MM-YYYY, then "tomorrow"
/// (or Hindi "कल"), then a bare day-of-month with an optional ordinal suffix
/// and optional month name. A monthless day that has already passed this
/// month rolls forward to the next month (and to January of next year past
/// December).
pub fn extract_date_on(message: &str, today: NaiveDate) -> Option<String> {
    if let Some(caps) = ISO_DATE_RE.captures(message) {
        return Some(caps[1].to_string());
    }

    if let Some(caps) = DMY_DATE_RE.captures(message) {
        let day: u32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let year: i32 = caps[3].parse().ok()?;
        return Some(format!("{:04}-{:02}-{:02}", year, month, day));
    }

    if TOMORROW_RE.is_match(message) {
        return Some((today + Duration::days(1)).format("%Y-%m-%d").to_string());
    }

    let caps = DAY_RE.captures(message)?;
    let day: u32 = caps[1].parse().ok()?;
    if !(1..=31).contains(&day) {
        return None;
    }

    let lower = message.to_lowercase();
    let named_month = MONTH_NAMES
        .iter()
        .position(|(full, abbr)| lower.contains(full) || lower.contains(abbr));

    let mut month = named_month.map(|i| i as u32 + 1).unwrap_or(today.month());
    let mut year = today.year();
    if named_month.is_none() && day < today.day() {
        month += 1;
        if month > 12 {
            month = 1;
            year += 1;
        }
    }

    Some(format!("{:04}-{:02}-{:02}", year, month, day))
}

/// [`extract_date_on`] resolved against the local calendar date.
pub fn extract_date(message: &str) -> Option<String> {
    extract_date_on(message, Local::now().date_naive())
}

/// Extract a time of day as `H:MM AM|PM`.
///
/// With an explicit AM/PM marker, standard 12-hour conversion applies. With
/// none, hours 13-24 are read as a 24-hour clock, and hours 7-11 are assumed
/// AM while the rest default to PM. That last rule is a documented best
/// effort, not a guarantee.
pub fn extract_time(message: &str) -> Option<String> {
    if let Some(caps) = TIME_AMPM_RE.captures(message) {
        let hour: u32 = caps[1].parse().ok()?;
        if (1..=12).contains(&hour) {
            let mins = caps.get(2).map(|m| m.as_str()).unwrap_or("00");
            let period = caps[3].to_uppercase();
            let mut hour24 = hour % 12;
            if period == "PM" {
                hour24 += 12;
            }
            return Some(format_time(hour24, mins));
        }
    }

    let caps = TIME_BARE_RE.captures(message)?;
    let hour: u32 = caps[1].parse().ok()?;
    let mins = caps.get(2).map(|m| m.as_str()).unwrap_or("00");
    match hour {
        13..=24 => Some(format_time(hour % 24, mins)),
        // No AM/PM given: assume business hours.
        7..=11 => Some(format_time(hour, mins)),
        1..=6 | 12 => Some(format_time((hour % 12) + 12, mins)),
        _ => None,
    }
}

fn format_time(hour24: u32, mins: &str) -> String {
    let display_hour = match hour24 % 12 {
        0 => 12,
        h => h,
    };
    let period = if hour24 >= 12 { "PM" } else { "AM" };
    format!("{}:{} {}", display_hour, mins, period)
}

/// Best-effort name guess: capitalized words minus a stoplist of common
/// sentence words, joined in order of appearance.
pub fn extract_name(message: &str) -> Option<String> {
    let words: Vec<&str> = CAPITALIZED_RE
        .find_iter(message)
        .map(|m| m.as_str())
        .filter(|w| !NAME_STOPLIST.contains(&w.to_lowercase().as_str()))
        .collect();
    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

/// Run every extractor over one message.
pub fn extract_all(message: &str) -> Entities {
    extract_all_on(message, Local::now().date_naive())
}

/// [`extract_all`] with an injected calendar date, for tests.
pub fn extract_all_on(message: &str, today: NaiveDate) -> Entities {
    Entities {
        phone: extract_phone(message),
        date: extract_date_on(message, today),
        time: extract_time(message),
        name: extract_name(message),
        email: extract_email(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_phone_prefix_variants() {
        for msg in [
            "9876543210",
            "+91 9876543210",
            "919876543210",
            "09876543210",
            "call me at +91-9876543210 please",
        ] {
            assert_eq!(extract_phone(msg).as_deref(), Some("9876543210"), "msg: {}", msg);
        }
    }

    #[test]
    fn test_phone_rejects_bad_leading_digit() {
        assert_eq!(extract_phone("5876543210"), None);
        assert_eq!(extract_phone("1234567890"), None);
    }

    #[test]
    fn test_phone_rejects_longer_digit_runs() {
        assert_eq!(extract_phone("id 99887766554433221100"), None);
    }

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("98765 43210").as_deref(), Some("9876543210"));
        assert_eq!(normalize_phone("+91 9876543210").as_deref(), Some("9876543210"));
        assert_eq!(normalize_phone("5876543210"), None);
        assert_eq!(normalize_phone("98765"), None);
    }

    #[test]
    fn test_email() {
        assert_eq!(
            extract_email("reach me at ravi.kumar@example.co.in thanks").as_deref(),
            Some("ravi.kumar@example.co.in")
        );
        assert_eq!(extract_email("no email here"), None);
    }

    #[test]
    fn test_date_iso_wins() {
        let today = date(2024, 3, 20);
        assert_eq!(
            extract_date_on("see you 2024-12-01 or on the 5th", today).as_deref(),
            Some("2024-12-01")
        );
    }

    #[test]
    fn test_date_dmy_converted() {
        let today = date(2024, 3, 20);
        assert_eq!(extract_date_on("26/12/2024", today).as_deref(), Some("2024-12-26"));
        assert_eq!(extract_date_on("5-1-2025 works", today).as_deref(), Some("2025-01-05"));
    }

    #[test]
    fn test_date_tomorrow() {
        let today = date(2024, 3, 31);
        assert_eq!(extract_date_on("tomorrow works", today).as_deref(), Some("2024-04-01"));
        assert_eq!(extract_date_on("कल", today).as_deref(), Some("2024-04-01"));
    }

    #[test]
    fn test_date_bare_day_rolls_forward() {
        // Day 5 already passed on March 20, so "the 5th" means April 5.
        let today = date(2024, 3, 20);
        assert_eq!(extract_date_on("the 5th", today).as_deref(), Some("2024-04-05"));
    }

    #[test]
    fn test_date_bare_day_in_future_stays() {
        let today = date(2024, 3, 20);
        assert_eq!(extract_date_on("the 28th", today).as_deref(), Some("2024-03-28"));
    }

    #[test]
    fn test_date_rolls_into_next_year() {
        let today = date(2024, 12, 20);
        assert_eq!(extract_date_on("5", today).as_deref(), Some("2025-01-05"));
    }

    #[test]
    fn test_date_named_month_never_rolls() {
        let today = date(2024, 3, 20);
        assert_eq!(
            extract_date_on("5th january please", today).as_deref(),
            Some("2024-01-05")
        );
        assert_eq!(extract_date_on("28 dec", today).as_deref(), Some("2024-12-28"));
    }

    #[test]
    fn test_time_with_period() {
        assert_eq!(extract_time("3pm").as_deref(), Some("3:00 PM"));
        assert_eq!(extract_time("10:30 PM").as_deref(), Some("10:30 PM"));
        assert_eq!(extract_time("12 am").as_deref(), Some("12:00 AM"));
        assert_eq!(extract_time("12pm sharp").as_deref(), Some("12:00 PM"));
    }

    #[test]
    fn test_time_without_period_uses_heuristic() {
        assert_eq!(extract_time("9").as_deref(), Some("9:00 AM"));
        assert_eq!(extract_time("at 3").as_deref(), Some("3:00 PM"));
        assert_eq!(extract_time("around 12:15").as_deref(), Some("12:15 PM"));
    }

    #[test]
    fn test_time_24_hour_clock() {
        assert_eq!(extract_time("15:30").as_deref(), Some("3:30 PM"));
        assert_eq!(extract_time("at 18").as_deref(), Some("6:00 PM"));
    }

    #[test]
    fn test_name_skips_stoplist() {
        assert_eq!(
            extract_name("My Name Is Ravi Kumar").as_deref(),
            Some("Ravi Kumar")
        );
        assert_eq!(extract_name("hello there"), None);
        assert_eq!(extract_name("The At On For"), None);
    }

    #[test]
    fn test_extract_all_combines() {
        let today = date(2024, 3, 20);
        let entities = extract_all_on(
            "I am Ravi Kumar, 9876543210, ravi@example.com, 28th at 3pm",
            today,
        );
        assert_eq!(entities.name.as_deref(), Some("Ravi Kumar"));
        assert_eq!(entities.phone.as_deref(), Some("9876543210"));
        assert_eq!(entities.email.as_deref(), Some("ravi@example.com"));
        assert_eq!(entities.date.as_deref(), Some("2024-03-28"));
        assert_eq!(entities.time.as_deref(), Some("3:00 PM"));
    }
}
