use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), chrono::Weekday::Sat | chrono::Weekday::Sun)
}

/// Weekday dates in `[start, end]` inclusive, in order. No holiday calendar;
/// weekends are the only exclusion.
pub fn weekdays_in_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut out = Vec::new();
    let mut day = start;
    while day <= end {
        if !is_weekend(day) {
            out.push(day);
        }
        day += Duration::days(1);
    }
    out
}

/// Default request range: one month back through today.
pub fn default_lookback_range(now_utc: DateTime<Utc>) -> (NaiveDate, NaiveDate) {
    let end = now_utc.date_naive();
    let start = end
        .checked_sub_months(Months::new(1))
        .unwrap_or_else(|| end - Duration::days(30));
    (start, end)
}
