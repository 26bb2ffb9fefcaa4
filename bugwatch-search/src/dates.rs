//! Relative date grammar for `first_seen` / `last_seen` filters.
//!
//! Accepted forms, resolved against a caller-supplied "now" in UTC:
//!
//! - keywords: `today`, `yesterday`, `this_week` (Monday), `this_month`
//! - relative offsets matching `^\d+[hdwm]$`: hours, days, weeks or calendar months ago
//! - absolute dates: RFC 3339 (`2026-10-01T12:00:00Z`), `YYYY-MM-DDTHH:MM:SS` or `YYYY-MM-DD`

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static RELATIVE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)([hdwm])$").expect("valid relative date pattern"));

/// Resolve a date expression. Returns `None` when the value matches no form or the
/// result would fall outside years 1 through 9999.
pub fn resolve_date(value: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    resolve_unchecked(value, now).filter(|at| is_representable(*at))
}

/// Whether [`format_date`] writes the value with a plain four-digit year, the only
/// form [`resolve_date`] reads back.
pub fn is_representable(at: DateTime<Utc>) -> bool {
    (1..=9999).contains(&at.year())
}

fn resolve_unchecked(value: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "today" => return Some(start_of_day(now)),
        "yesterday" => return start_of_day(now).checked_sub_signed(Duration::days(1)),
        "this_week" => {
            let days_since_monday = i64::from(now.weekday().num_days_from_monday());
            return start_of_day(now).checked_sub_signed(Duration::days(days_since_monday));
        }
        "this_month" => {
            let first = NaiveDate::from_ymd_opt(now.year(), now.month(), 1)?;
            return Some(first.and_time(NaiveTime::MIN).and_utc());
        }
        _ => {}
    }

    if let Some(captures) = RELATIVE.captures(trimmed) {
        let amount: i64 = captures[1].parse().ok()?;
        return match &captures[2] {
            "h" => now.checked_sub_signed(Duration::try_hours(amount)?),
            "d" => now.checked_sub_signed(Duration::try_days(amount)?),
            "w" => now.checked_sub_signed(Duration::try_weeks(amount)?),
            "m" => now.checked_sub_months(Months::new(u32::try_from(amount).ok()?)),
            _ => None,
        };
    }

    parse_absolute(trimmed)
}

fn parse_absolute(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(parsed.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
}

fn start_of_day(at: DateTime<Utc>) -> DateTime<Utc> {
    at.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Wire format for date filters: RFC 3339, millisecond precision, `Z` suffix.
pub fn format_date(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        // Friday
        Utc.with_ymd_and_hms(2026, 10, 16, 15, 30, 0).single().expect("valid timestamp")
    }

    fn resolved(value: &str) -> String {
        format_date(resolve_date(value, now()).expect("date should resolve"))
    }

    #[test]
    fn keywords_resolve_to_day_boundaries() {
        assert_eq!(resolved("today"), "2026-10-16T00:00:00.000Z");
        assert_eq!(resolved("yesterday"), "2026-10-15T00:00:00.000Z");
        assert_eq!(resolved("this_week"), "2026-10-12T00:00:00.000Z");
        assert_eq!(resolved("this_month"), "2026-10-01T00:00:00.000Z");
        assert_eq!(resolved("TODAY"), "2026-10-16T00:00:00.000Z");
    }

    #[test]
    fn relative_offsets_subtract_from_now() {
        assert_eq!(resolved("2h"), "2026-10-16T13:30:00.000Z");
        assert_eq!(resolved("7d"), "2026-10-09T15:30:00.000Z");
        assert_eq!(resolved("2w"), "2026-10-02T15:30:00.000Z");
        assert_eq!(resolved("1m"), "2026-09-16T15:30:00.000Z");
    }

    #[test]
    fn absolute_dates_are_accepted() {
        assert_eq!(resolved("2026-01-05"), "2026-01-05T00:00:00.000Z");
        assert_eq!(resolved("2026-01-05T10:11:12Z"), "2026-01-05T10:11:12.000Z");
        assert_eq!(resolved("2026-01-05T10:11:12.250Z"), "2026-01-05T10:11:12.250Z");
        assert_eq!(resolved("2026-01-05T10:11:12"), "2026-01-05T10:11:12.000Z");
    }

    #[test]
    fn garbage_and_overflow_are_rejected() {
        assert!(resolve_date("soon", now()).is_none());
        assert!(resolve_date("7x", now()).is_none());
        assert!(resolve_date("-7d", now()).is_none());
        assert!(resolve_date("2026-13-40", now()).is_none());
        assert!(resolve_date("99999999999999999999d", now()).is_none());
        assert!(resolve_date("999999999999d", now()).is_none());
    }

    #[test]
    fn results_stay_within_four_digit_years() {
        assert_eq!(resolved("9999-12-31"), "9999-12-31T00:00:00.000Z");
        assert_eq!(resolved("0001-01-01"), "0001-01-01T00:00:00.000Z");
        assert!(resolve_date("0000-06-01", now()).is_none());
        assert!(resolve_date("600000w", now()).is_none());
        assert!(!is_representable(Utc.with_ymd_and_hms(10000, 1, 1, 0, 0, 0).single().expect("valid timestamp")));
    }
}
