use chrono::{Datelike, Duration, NaiveDate};

/// Adds `count` calendar months to `date` and lands on `anchor_day`, clamped
/// to the length of the target month. A subscription anchored on the 31st
/// bills on the 30th in April and on the 28th/29th in February, never in the
/// following month.
///
/// Returns `None` only when the target falls outside chrono's date range.
pub fn step_months(date: NaiveDate, anchor_day: u32, count: u32) -> Option<NaiveDate> {
    let index = month_index(date) + i64::from(count);
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    let month = index.rem_euclid(12) as u32 + 1;
    let day = anchor_day.min(days_in_month(year, month)).max(1);
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Number of months since year zero, used for month distance arithmetic.
pub(crate) fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

pub fn month_start(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

pub fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, days_in_month(year, month))
}

/// Same calendar day `years` later, clamped for 29 February.
pub fn add_years(date: NaiveDate, years: u32) -> Option<NaiveDate> {
    step_months(date, date.day(), years.checked_mul(12)?)
}

pub fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::days(days))
}

/// Strict `YYYY-MM-DD` parser. Anything else, including a well-shaped but
/// impossible date such as `2024-02-30`, yields `None`.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let bytes = raw.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let digits_ok = bytes
        .iter()
        .enumerate()
        .all(|(idx, b)| idx == 4 || idx == 7 || b.is_ascii_digit());
    if !digits_ok {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// `YYYY-MM-DD` key used for calendar cells.
pub fn iso_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
