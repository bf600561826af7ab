//! "Date added" normalisation.
//!
//! The catalog stores the date a title was added as free text in a handful of
//! layouts. Anything that does not match one of them is treated as "no date"
//! rather than an error.

use chrono::{Datelike, Month, NaiveDate, NaiveDateTime};

/// Date-only layouts, tried in order.
const DATE_FORMATS: [&str; 6] = [
    "%B %d, %Y", // September 25, 2021 (abbreviated names parse too)
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%d-%b-%y",
    "%d %B %Y",
    "%B %d %Y",
];

/// Layouts carrying a time component; only the date is kept.
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Calendar order, used for zero-filled monthly series.
pub const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// Parse a raw "date added" value. Missing or unparsable input yields `None`.
pub fn parse_added_date(raw: Option<&str>) -> Option<NaiveDate> {
    let text = raw?.trim();
    if text.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
}

pub fn month_of(date: NaiveDate) -> Month {
    MONTHS[date.month0() as usize]
}

/// Year and month derived from an optional date; both absent when the date is.
pub fn year_and_month(date: Option<NaiveDate>) -> (Option<i32>, Option<Month>) {
    match date {
        Some(d) => (Some(d.year()), Some(month_of(d))),
        None => (None, None),
    }
}
