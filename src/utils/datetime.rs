/// Pure date/time utility functions (Discord-agnostic)
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone};

/// Format a time on a 12-hour clock, e.g. "03:05 PM"
pub fn timef<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    dt.format("%I:%M %p").to_string()
}

/// Name for an archived general channel, embedding the period it covers
///
/// Discord lowercases text channel names, so the name is built lowercase.
pub fn archived_channel_name(period_start: NaiveDate, period_end: NaiveDate) -> String {
    format!(
        "general-{}-to-{}",
        period_start.format("%b-%d-%Y"),
        period_end.format("%b-%d-%Y")
    )
    .to_lowercase()
}

/// The archive date following the given one
pub fn advance_archive_date(from: NaiveDateTime, freq_weeks: i64) -> NaiveDateTime {
    from + Duration::weeks(freq_weeks)
}

/// How long to sleep until a scheduled instant, zero if already past
pub fn wait_until(now: NaiveDateTime, then: NaiveDateTime) -> std::time::Duration {
    (then - now).to_std().unwrap_or(std::time::Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_timef() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 15, 15, 5, 0).unwrap();
        assert_eq!(timef(&dt), "03:05 PM");

        let dt = Utc.with_ymd_and_hms(2024, 3, 15, 0, 30, 0).unwrap();
        assert_eq!(timef(&dt), "12:30 AM");
    }

    #[test]
    fn test_archived_channel_name() {
        let name = archived_channel_name(date(2024, 3, 1), date(2024, 3, 15));
        assert_eq!(name, "general-mar-01-2024-to-mar-15-2024");
        assert_eq!(name, name.to_lowercase());
    }

    #[test]
    fn test_advance_archive_date() {
        let from = date(2024, 3, 1).and_hms_opt(8, 0, 0).unwrap();
        let next = advance_archive_date(from, 2);
        assert_eq!(next.date(), date(2024, 3, 15));
        assert_eq!(next.time(), from.time());
    }

    #[test]
    fn test_wait_until() {
        let now = date(2024, 3, 1).and_hms_opt(8, 0, 0).unwrap();
        let then = date(2024, 3, 1).and_hms_opt(8, 10, 0).unwrap();
        assert_eq!(wait_until(now, then), std::time::Duration::from_secs(600));

        // already past
        assert_eq!(wait_until(then, now), std::time::Duration::ZERO);
    }
}
