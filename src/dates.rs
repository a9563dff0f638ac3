//! Calendar helpers for browsing scores by day. The league schedule runs on
//! US Eastern time, so "today" is always computed there.

use chrono::{Datelike, Duration, NaiveDate, Utc};
use chrono_tz::America::New_York;

pub fn today_et() -> NaiveDate {
    Utc::now().with_timezone(&New_York).date_naive()
}

pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(days))
        .unwrap_or(date)
}

/// "Today", "Yesterday", "Tomorrow", otherwise e.g. "Sat, Oct 17".
pub fn friendly_date(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        -1 => "Yesterday".to_string(),
        1 => "Tomorrow".to_string(),
        _ => date.format("%a, %b %-d").to_string(),
    }
}

/// e.g. "Saturday, October 17, 2026"
pub fn long_date(date: NaiveDate) -> String {
    format!(
        "{}, {} {}, {}",
        date.format("%A"),
        date.format("%B"),
        date.day(),
        date.year()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_add_days_crosses_month_and_year() {
        assert_eq!(add_days(d(2026, 10, 31), 1), d(2026, 11, 1));
        assert_eq!(add_days(d(2027, 1, 1), -1), d(2026, 12, 31));
        assert_eq!(add_days(d(2028, 2, 28), 1), d(2028, 2, 29));
    }

    #[test]
    fn test_friendly_date() {
        let today = d(2026, 10, 17);
        assert_eq!(friendly_date(today, today), "Today");
        assert_eq!(friendly_date(d(2026, 10, 16), today), "Yesterday");
        assert_eq!(friendly_date(d(2026, 10, 18), today), "Tomorrow");
        assert_eq!(friendly_date(d(2026, 10, 20), today), "Tue, Oct 20");
        assert_eq!(friendly_date(d(2026, 11, 1), today), "Sun, Nov 1");
    }

    #[test]
    fn test_long_date() {
        assert_eq!(long_date(d(2026, 10, 17)), "Saturday, October 17, 2026");
        assert_eq!(long_date(d(2027, 1, 4)), "Monday, January 4, 2027");
    }
}
