//! The eleven chart intents, in the order they are produced.
//!
//! An intent is everything a renderer needs: what kind of chart, which
//! prepared series, the title and the axis labels. Colours and layout are
//! left to the renderer.

use serde::Serialize;
use tracing::debug;

use crate::aggregation::{self, Frequency};
use crate::config::PipelineConfig;
use crate::preparer::{ListField, PreparedCatalog};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Pie,
    HorizontalBar,
    HistogramDensity,
    VerticalBar,
    Line,
    GroupedCountBar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartId {
    ContentTypes,
    TopGenres,
    MovieDurations,
    TvSeasons,
    AddedPerYear,
    TopCountries,
    AddedPerMonth,
    AverageLag,
    RatingDistribution,
    TopDirectors,
    AddedPerYearByType,
}

impl ChartId {
    /// Production order.
    pub const ALL: [ChartId; 11] = [
        ChartId::ContentTypes,
        ChartId::TopGenres,
        ChartId::MovieDurations,
        ChartId::TvSeasons,
        ChartId::AddedPerYear,
        ChartId::TopCountries,
        ChartId::AddedPerMonth,
        ChartId::AverageLag,
        ChartId::RatingDistribution,
        ChartId::TopDirectors,
        ChartId::AddedPerYearByType,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ChartId::ContentTypes => "content_types",
            ChartId::TopGenres => "top_genres",
            ChartId::MovieDurations => "movie_durations",
            ChartId::TvSeasons => "tv_seasons",
            ChartId::AddedPerYear => "added_per_year",
            ChartId::TopCountries => "top_countries",
            ChartId::AddedPerMonth => "added_per_month",
            ChartId::AverageLag => "average_lag",
            ChartId::RatingDistribution => "rating_distribution",
            ChartId::TopDirectors => "top_directors",
            ChartId::AddedPerYearByType => "added_per_year_by_type",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataPoint {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledSeries {
    pub name: String,
    pub points: Vec<DataPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartData {
    /// One or more labelled series sharing the same categories
    Series { series: Vec<LabeledSeries> },
    /// Raw observations; bucketing and smoothing are up to the renderer
    Samples { values: Vec<f64>, bins: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartIntent {
    pub id: ChartId,
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub data: ChartData,
    /// Visible x range; data outside it is still part of the series
    pub display_range: Option<(f64, f64)>,
}

impl ChartIntent {
    /// The first series, for single-series charts.
    pub fn series(&self) -> Option<&LabeledSeries> {
        match &self.data {
            ChartData::Series { series } => series.first(),
            ChartData::Samples { .. } => None,
        }
    }

    pub fn samples(&self) -> Option<&[f64]> {
        match &self.data {
            ChartData::Samples { values, .. } => Some(values),
            ChartData::Series { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub source: Option<String>,
    pub total_titles: usize,
    pub unparsed_dates: usize,
    pub dropped_durations: usize,
    pub charts: Vec<ChartIntent>,
}

impl Report {
    pub fn chart(&self, id: ChartId) -> Option<&ChartIntent> {
        self.charts.iter().find(|c| c.id == id)
    }
}

// ── Building ────────────────────────────────────────────────────────────────

pub fn build_report(
    catalog: &PreparedCatalog<'_>,
    config: &PipelineConfig,
    source: Option<String>,
) -> Report {
    let charts: Vec<ChartIntent> = ChartId::ALL
        .iter()
        .map(|&id| {
            let intent = build_chart(id, catalog, config);
            debug!(chart = id.as_str(), kind = ?intent.kind, "built chart");
            intent
        })
        .collect();

    Report {
        source,
        total_titles: catalog.len(),
        unparsed_dates: catalog.unparsed_dates(),
        dropped_durations: catalog.dropped_durations(),
        charts,
    }
}

fn build_chart(id: ChartId, catalog: &PreparedCatalog<'_>, config: &PipelineConfig) -> ChartIntent {
    let titles = catalog.titles();
    let n = config.top_n;

    match id {
        ChartId::ContentTypes => intent(
            id,
            ChartKind::Pie,
            "Distribution of Content Types",
            ("", ""),
            single("count", frequencies(&aggregation::type_counts(titles))),
        ),
        ChartId::TopGenres => {
            let view = catalog.expand(ListField::Genres);
            intent(
                id,
                ChartKind::HorizontalBar,
                &format!("Top {n} Most Common Genres"),
                ("Number of Titles", "Genre"),
                single("count", frequencies(&aggregation::top_list_values(&view, n))),
            )
        }
        ChartId::MovieDurations => intent(
            id,
            ChartKind::HistogramDensity,
            "Movie Duration Distribution",
            ("Duration (Minutes)", "Count"),
            ChartData::Samples {
                values: catalog.movie_minutes().iter().map(|&m| f64::from(m)).collect(),
                bins: config.histogram_bins,
            },
        ),
        ChartId::TvSeasons => {
            let (lo, hi) = config.season_display_range;
            let points = aggregation::season_distribution(catalog.season_counts())
                .into_iter()
                .map(|s| point(s.seasons.to_string(), s.count as f64))
                .collect();
            ChartIntent {
                display_range: Some((f64::from(lo) - 0.5, f64::from(hi) + 0.5)),
                ..intent(
                    id,
                    ChartKind::VerticalBar,
                    "Distribution of TV Show Seasons",
                    ("Seasons", "Number of TV Shows"),
                    single("count", points),
                )
            }
        }
        ChartId::AddedPerYear => {
            let points = aggregation::counts_by_year(titles, config.min_year_added)
                .into_iter()
                .map(|y| point(y.year.to_string(), y.count as f64))
                .collect();
            intent(
                id,
                ChartKind::Line,
                "Content Added Over Time",
                ("Year Added", "Number of Titles"),
                single("count", points),
            )
        }
        ChartId::TopCountries => {
            let view = catalog.expand(ListField::Countries);
            intent(
                id,
                ChartKind::HorizontalBar,
                &format!("Top {n} Producing Countries"),
                ("Number of Titles", "Country"),
                single("count", frequencies(&aggregation::top_list_values(&view, n))),
            )
        }
        ChartId::AddedPerMonth => {
            let points = aggregation::monthly_counts(titles)
                .into_iter()
                .map(|m| point(m.month.name().to_string(), m.count as f64))
                .collect();
            intent(
                id,
                ChartKind::GroupedCountBar,
                "Content Added by Month (Seasonality)",
                ("Month Added", "Number of Titles"),
                single("count", points),
            )
        }
        ChartId::AverageLag => {
            let points = aggregation::mean_lag_by_year(titles, config.min_lag_year)
                .into_iter()
                .map(|y| point(y.year.to_string(), y.mean))
                .collect();
            intent(
                id,
                ChartKind::Line,
                "Average Lag Time (Years from Release to Catalog)",
                ("Year Added", "Average Lag (Years)"),
                single("mean_lag", points),
            )
        }
        ChartId::RatingDistribution => intent(
            id,
            ChartKind::GroupedCountBar,
            "Distribution of Maturity Ratings",
            ("Rating", "Number of Titles"),
            single("count", frequencies(&aggregation::rating_counts(titles))),
        ),
        ChartId::TopDirectors => {
            let view = catalog.expand(ListField::Directors);
            intent(
                id,
                ChartKind::HorizontalBar,
                &format!("Top {n} Directors"),
                ("Number of Titles", "Director"),
                single("count", frequencies(&aggregation::top_list_values(&view, n))),
            )
        }
        ChartId::AddedPerYearByType => {
            let series = aggregation::counts_by_year_and_type(titles, config.min_year_added)
                .into_iter()
                .map(|t| LabeledSeries {
                    name: t.content_type,
                    points: t
                        .years
                        .into_iter()
                        .map(|y| point(y.year.to_string(), y.count as f64))
                        .collect(),
                })
                .collect();
            intent(
                id,
                ChartKind::GroupedCountBar,
                "Content Added Over Time by Type",
                ("Year Added", "Number of Titles"),
                ChartData::Series { series },
            )
        }
    }
}

fn intent(
    id: ChartId,
    kind: ChartKind,
    title: &str,
    (x_label, y_label): (&str, &str),
    data: ChartData,
) -> ChartIntent {
    ChartIntent {
        id,
        kind,
        title: title.to_string(),
        x_label: x_label.to_string(),
        y_label: y_label.to_string(),
        data,
        display_range: None,
    }
}

fn single(name: &str, points: Vec<DataPoint>) -> ChartData {
    ChartData::Series {
        series: vec![LabeledSeries {
            name: name.to_string(),
            points,
        }],
    }
}

fn point(label: String, value: f64) -> DataPoint {
    DataPoint { label, value }
}

fn frequencies(freqs: &[Frequency]) -> Vec<DataPoint> {
    freqs
        .iter()
        .map(|f| point(f.value.clone(), f.count as f64))
        .collect()
}
