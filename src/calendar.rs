use chrono::{Datelike, Days, NaiveDate, Weekday};

/// UEMOA public holidays on which no bulletin is published.
const HOLIDAYS: &[(i32, u32, u32)] = &[
    (2025, 1, 1),
    (2025, 4, 21),
    (2025, 5, 1),
    (2025, 11, 1),
    (2025, 12, 25),
    (2026, 1, 1),
    (2026, 4, 6),
    (2026, 5, 1),
    (2026, 11, 1),
    (2026, 12, 25),
];

pub fn is_holiday(date: &NaiveDate) -> bool {
    HOLIDAYS
        .iter()
        .any(|&(y, m, d)| date.year() == y && date.month() == m && date.day() == d)
}

pub fn is_trading_day(date: &NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !is_holiday(date)
}

/// The trading day whose bulletin is the most recent one as of `today`.
pub fn last_trading_day(today: &NaiveDate) -> NaiveDate {
    let mut date = *today;
    while !is_trading_day(&date) {
        match date.checked_sub_days(Days::new(1)) {
            Some(prev) => date = prev,
            None => break,
        }
    }

    date
}
