//! Dataset Preparer.
//!
//! Turns the raw titles into the cleaned record set (normalised dates plus
//! derived year / month) and offers the views every chart is computed from:
//! per-value expansions of the list fields and the movie / TV show duration
//! subsets. Views borrow the records and never modify them.

use chrono::{Month, NaiveDate};
use tracing::{debug, info, warn};

use crate::dates;
use crate::duration::{self, DurationPolicy, ParseError};
use crate::error::{CatalogError, Result};
use crate::model::{ContentType, TitleRecord};
use crate::schema::{list, title};

// ── Cleaned records ─────────────────────────────────────────────────────────

/// A title with its derived date fields.
#[derive(Debug, Clone, Copy)]
pub struct CleanedTitle<'a> {
    pub record: &'a TitleRecord,
    pub added: Option<NaiveDate>,
    pub year_added: Option<i32>,
    pub month_added: Option<Month>,
}

impl CleanedTitle<'_> {
    /// Years between release and addition; negative when added before release.
    pub fn lag_years(&self) -> Option<i32> {
        Some(self.year_added? - self.record.release_year?)
    }
}

// ── Expanded views ──────────────────────────────────────────────────────────

/// The comma-separated multi-value fields of a title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListField {
    Genres,
    Countries,
    Directors,
}

impl ListField {
    pub fn column(self) -> &'static str {
        match self {
            ListField::Genres => title::LISTED_IN,
            ListField::Countries => title::COUNTRY,
            ListField::Directors => title::DIRECTOR,
        }
    }

    pub fn raw(self, record: &TitleRecord) -> Option<&str> {
        match self {
            ListField::Genres => record.listed_in.as_deref(),
            ListField::Countries => record.country.as_deref(),
            ListField::Directors => record.director.as_deref(),
        }
    }
}

/// Split a list field on `", "`, dropping empty entries.
///
/// Unlike a bare `split(", ")`, tokens are trimmed of whitespace and empty
/// tokens are dropped, so `"Cambodia, "` yields only `"Cambodia"`. Other
/// punctuation is left alone: `"Cambodia,"` stays one token as written.
pub fn split_list(raw: Option<&str>) -> Vec<&str> {
    raw.map(|text| {
        text.split(list::DELIMITER)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

/// One row of an expanded view: the original title with a single list value.
#[derive(Debug, Clone, Copy)]
pub struct ExpandedRow<'a> {
    /// Position of the title in the cleaned record set
    pub index: usize,
    pub title: CleanedTitle<'a>,
    /// `None` for titles whose list field is empty
    pub value: Option<&'a str>,
}

/// A record set fanned out over one list field.
#[derive(Debug, Clone)]
pub struct ExpandedView<'a> {
    pub field: ListField,
    pub rows: Vec<ExpandedRow<'a>>,
}

impl<'a> ExpandedView<'a> {
    pub fn values(&self) -> impl Iterator<Item = Option<&'a str>> + '_ {
        self.rows.iter().map(|r| r.value)
    }

    /// Group rows back by title, giving each title's list in original order.
    pub fn collapse(&self) -> Vec<Vec<&'a str>> {
        let titles = self.rows.last().map_or(0, |r| r.index + 1);
        let mut lists = vec![Vec::new(); titles];
        for row in &self.rows {
            if let Some(value) = row.value {
                lists[row.index].push(value);
            }
        }
        lists
    }
}

// ── Prepared catalog ────────────────────────────────────────────────────────

/// The cleaned record set plus the type-conditioned duration subsets.
#[derive(Debug, Clone)]
pub struct PreparedCatalog<'a> {
    titles: Vec<CleanedTitle<'a>>,
    movie_minutes: Vec<u32>,
    season_counts: Vec<u32>,
    unparsed_dates: usize,
    dropped_durations: usize,
}

impl<'a> PreparedCatalog<'a> {
    pub fn prepare(records: &'a [TitleRecord], policy: DurationPolicy) -> Result<Self> {
        let mut titles = Vec::with_capacity(records.len());
        let mut unparsed_dates = 0;

        for record in records {
            let added = dates::parse_added_date(record.date_added.as_deref());
            if added.is_none() && record.date_added.is_some() {
                unparsed_dates += 1;
            }
            let (year_added, month_added) = dates::year_and_month(added);
            titles.push(CleanedTitle {
                record,
                added,
                year_added,
                month_added,
            });
        }

        let mut movie_minutes = Vec::new();
        let mut season_counts = Vec::new();
        let mut dropped_durations = 0;

        for (i, record) in records.iter().enumerate() {
            let (parsed, target) = match record.content_type {
                // an absent runtime is a gap in the histogram, not a bad value
                ContentType::Movie if record.duration.is_none() => {
                    debug!(row = i + 1, title = %record.describe(), "movie without duration");
                    continue;
                }
                ContentType::Movie => (
                    duration::parse_movie_minutes(record.duration.as_deref()),
                    &mut movie_minutes,
                ),
                ContentType::TvShow => (
                    duration::parse_season_count(record.duration.as_deref()),
                    &mut season_counts,
                ),
                ContentType::Other(_) => continue,
            };

            match parsed {
                Ok(value) => target.push(value),
                Err(source) => {
                    handle_bad_duration(policy, i + 1, record, source)?;
                    dropped_durations += 1;
                }
            }
        }

        info!(
            titles = titles.len(),
            movies = movie_minutes.len(),
            tv_shows = season_counts.len(),
            unparsed_dates,
            dropped_durations,
            "prepared catalog"
        );

        Ok(Self {
            titles,
            movie_minutes,
            season_counts,
            unparsed_dates,
            dropped_durations,
        })
    }

    pub fn titles(&self) -> &[CleanedTitle<'a>] {
        &self.titles
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Minutes of every movie whose duration parsed, in record order.
    pub fn movie_minutes(&self) -> &[u32] {
        &self.movie_minutes
    }

    /// Season counts of every TV show whose duration parsed, in record order.
    pub fn season_counts(&self) -> &[u32] {
        &self.season_counts
    }

    /// Non-empty "date added" values that matched no known layout.
    pub fn unparsed_dates(&self) -> usize {
        self.unparsed_dates
    }

    pub fn dropped_durations(&self) -> usize {
        self.dropped_durations
    }

    /// Fan the record set out over `field`: one row per list value, or a
    /// single row with no value when the field is empty.
    pub fn expand(&self, field: ListField) -> ExpandedView<'a> {
        let mut rows = Vec::with_capacity(self.titles.len());
        for (index, title) in self.titles.iter().enumerate() {
            let values = split_list(field.raw(title.record));
            if values.is_empty() {
                rows.push(ExpandedRow {
                    index,
                    title: *title,
                    value: None,
                });
            } else {
                rows.extend(values.into_iter().map(|value| ExpandedRow {
                    index,
                    title: *title,
                    value: Some(value),
                }));
            }
        }
        ExpandedView { field, rows }
    }
}

fn handle_bad_duration(
    policy: DurationPolicy,
    row: usize,
    record: &TitleRecord,
    source: ParseError,
) -> Result<()> {
    match policy {
        DurationPolicy::Abort => Err(CatalogError::Duration { row, source }),
        DurationPolicy::DropAndWarn => {
            warn!(row, title = %record.describe(), error = %source, "dropping duration");
            Ok(())
        }
    }
}
