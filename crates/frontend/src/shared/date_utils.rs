/// Utilities for default filter periods
use chrono::{Datelike, Duration, NaiveDate, Utc};

/// First and last day of the month containing `date`, as "YYYY-MM-DD"
pub fn month_bounds(date: NaiveDate) -> (String, String) {
    let year = date.year();
    let month = date.month();
    let start = date.with_day(1).unwrap_or(date);
    // Последний день месяца: первый день следующего месяца минус 1 день
    let next_month_start = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let end = next_month_start
        .map(|d| d - Duration::days(1))
        .unwrap_or(date);

    (
        start.format("%Y-%m-%d").to_string(),
        end.format("%Y-%m-%d").to_string(),
    )
}

/// Period by default: current month
pub fn current_month_bounds() -> (String, String) {
    month_bounds(Utc::now().date_naive())
}

/// Today (UTC), for report file names
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
