//! Month arithmetic for search windows and post cooldowns.

use chrono::{DateTime, Datelike, Months, NaiveDate, TimeZone, Utc};

/// Midnight UTC on the first day of the month `months` before `now`.
///
/// `months = 0` is the start of the current month.
pub fn start_of_month_before(now: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    let first = NaiveDate::from_ymd_opt(now.year(), now.month(), 1)
        .and_then(|d| d.checked_sub_months(Months::new(months)))
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default();
    Utc.from_utc_datetime(&first)
}

/// Latest `last_posted` time that makes a record eligible again.
///
/// Calendar months back from `now`, clamped to the end of shorter months.
pub fn cooldown_cutoff(now: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    now.checked_sub_months(Months::new(months))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Parse a `YYYY-MM-DD` date as midnight UTC.
pub fn parse_day(value: &str) -> Result<DateTime<Utc>, String> {
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{value}' (expected YYYY-MM-DD): {e}"))?;
    date.and_hms_opt(0, 0, 0)
        .map(|dt| Utc.from_utc_datetime(&dt))
        .ok_or_else(|| format!("invalid date '{value}'"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_previous_month_start() {
        let now = at("2018-03-17T14:22:05Z");
        assert_eq!(start_of_month_before(now, 1), at("2018-02-01T00:00:00Z"));
    }

    #[test]
    fn test_previous_month_wraps_year() {
        let now = at("2018-01-05T00:00:00Z");
        assert_eq!(start_of_month_before(now, 1), at("2017-12-01T00:00:00Z"));
    }

    #[test]
    fn test_zero_months_is_current_month() {
        let now = at("2018-07-31T23:59:59Z");
        assert_eq!(start_of_month_before(now, 0), at("2018-07-01T00:00:00Z"));
    }

    #[test]
    fn test_cooldown_clamps_short_months() {
        let now = at("2018-03-31T12:00:00Z");
        assert_eq!(cooldown_cutoff(now, 1), at("2018-02-28T12:00:00Z"));
    }

    #[test]
    fn test_parse_day() {
        assert_eq!(parse_day("2018-02-01").unwrap(), at("2018-02-01T00:00:00Z"));
        assert!(parse_day("02/01/2018").is_err());
        assert!(parse_day("2018-02-30").is_err());
    }
}
