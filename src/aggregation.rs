//! Reductions behind the charts.
//!
//! Every function here is a pure function of the cleaned record set (or of a
//! view over it). Absent values never reach a count: titles without a rating,
//! a derived year or a list value are skipped by the reduction that needs them.

use std::collections::{BTreeMap, HashMap};

use chrono::Month;
use serde::Serialize;

use crate::dates::MONTHS;
use crate::preparer::{CleanedTitle, ExpandedView};

/// How often a value occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frequency {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCount {
    pub month: Month,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearMean {
    pub year: i32,
    pub mean: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeasonCount {
    pub seasons: u32,
    pub count: usize,
}

/// Per-year counts for one content type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeYearCounts {
    pub content_type: String,
    pub years: Vec<YearCount>,
}

/// Count the present values, most frequent first.
///
/// Ties keep the order in which the values were first encountered.
pub fn value_counts<'a, I>(values: I) -> Vec<Frequency>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    // value -> (first position, count)
    let mut seen: HashMap<&'a str, (usize, usize)> = HashMap::new();
    for value in values.into_iter().flatten() {
        let next = seen.len();
        seen.entry(value).or_insert((next, 0)).1 += 1;
    }

    let mut counts: Vec<(&str, usize, usize)> = seen
        .into_iter()
        .map(|(value, (first, count))| (value, first, count))
        .collect();
    counts.sort_by(|a, b| b.2.cmp(&a.2).then(a.1.cmp(&b.1)));

    counts
        .into_iter()
        .map(|(value, _, count)| Frequency {
            value: value.to_string(),
            count,
        })
        .collect()
}

/// [`value_counts`] truncated to the `n` most frequent values.
pub fn top_n<'a, I>(values: I, n: usize) -> Vec<Frequency>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut counts = value_counts(values);
    counts.truncate(n);
    counts
}

/// Titles per content type. Every title has a type, so the counts sum to
/// the number of titles.
pub fn type_counts(titles: &[CleanedTitle<'_>]) -> Vec<Frequency> {
    value_counts(titles.iter().map(|t| Some(t.record.content_type.label())))
}

/// The `n` most frequent values of an expanded list field.
pub fn top_list_values(view: &ExpandedView<'_>, n: usize) -> Vec<Frequency> {
    top_n(view.values(), n)
}

/// Titles per maturity rating, most frequent first.
pub fn rating_counts(titles: &[CleanedTitle<'_>]) -> Vec<Frequency> {
    value_counts(titles.iter().map(|t| t.record.rating.as_deref()))
}

/// Titles per year added, ascending, from `min_year` on.
pub fn counts_by_year(titles: &[CleanedTitle<'_>], min_year: i32) -> Vec<YearCount> {
    let mut by_year: BTreeMap<i32, usize> = BTreeMap::new();
    for year in titles.iter().filter_map(|t| t.year_added) {
        if year >= min_year {
            *by_year.entry(year).or_default() += 1;
        }
    }
    by_year
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

/// Per-year counts split by content type.
///
/// Every type gets an entry for every year that appears in any type, zero
/// when it has no titles that year. Types are ordered as in [`type_counts`].
pub fn counts_by_year_and_type(
    titles: &[CleanedTitle<'_>],
    min_year: i32,
) -> Vec<TypeYearCounts> {
    let years: Vec<i32> = counts_by_year(titles, min_year)
        .into_iter()
        .map(|yc| yc.year)
        .collect();

    type_counts(titles)
        .into_iter()
        .map(|freq| {
            let of_type: Vec<CleanedTitle<'_>> = titles
                .iter()
                .filter(|t| t.record.content_type.label() == freq.value)
                .copied()
                .collect();
            let counts: BTreeMap<i32, usize> = counts_by_year(&of_type, min_year)
                .into_iter()
                .map(|yc| (yc.year, yc.count))
                .collect();
            TypeYearCounts {
                content_type: freq.value,
                years: years
                    .iter()
                    .map(|&year| YearCount {
                        year,
                        count: counts.get(&year).copied().unwrap_or(0),
                    })
                    .collect(),
            }
        })
        .collect()
}

/// Titles per month added, always twelve entries in calendar order.
pub fn monthly_counts(titles: &[CleanedTitle<'_>]) -> Vec<MonthCount> {
    let mut counts = [0usize; 12];
    for month in titles.iter().filter_map(|t| t.month_added) {
        counts[month.number_from_month() as usize - 1] += 1;
    }
    MONTHS
        .iter()
        .zip(counts)
        .map(|(&month, count)| MonthCount { month, count })
        .collect()
}

/// Mean of (year added - release year) per year added, from `min_year` on.
///
/// Only titles with both years take part. Lags are not clamped, so a title
/// added before its release year pulls the mean down.
pub fn mean_lag_by_year(titles: &[CleanedTitle<'_>], min_year: i32) -> Vec<YearMean> {
    let mut groups: BTreeMap<i32, (i64, usize)> = BTreeMap::new();
    for title in titles {
        let (Some(year), Some(lag)) = (title.year_added, title.lag_years()) else {
            continue;
        };
        let group = groups.entry(year).or_insert((0, 0));
        group.0 += i64::from(lag);
        group.1 += 1;
    }

    groups
        .into_iter()
        .filter(|(year, _)| *year >= min_year)
        .map(|(year, (sum, n))| YearMean {
            year,
            mean: sum as f64 / n as f64,
        })
        .collect()
}

/// TV shows per season count, ascending by season count.
pub fn season_distribution(season_counts: &[u32]) -> Vec<SeasonCount> {
    let mut by_seasons: BTreeMap<u32, usize> = BTreeMap::new();
    for &seasons in season_counts {
        *by_seasons.entry(seasons).or_default() += 1;
    }
    by_seasons
        .into_iter()
        .map(|(seasons, count)| SeasonCount { seasons, count })
        .collect()
}
