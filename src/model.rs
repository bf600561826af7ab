use std::fmt;
use std::path::{Path, PathBuf};

use polars::prelude::*;
use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::error::{CatalogError, Result};
use crate::preparer::PreparedCatalog;
use crate::schema::{content_type, title};

// ── Records ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContentType {
    Movie,
    TvShow,
    /// Any other label, kept verbatim so type counts still cover every record.
    Other(String),
}

impl ContentType {
    pub fn from_label(label: &str) -> Self {
        match label {
            content_type::MOVIE => ContentType::Movie,
            content_type::TV_SHOW => ContentType::TvShow,
            other => ContentType::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ContentType::Movie => content_type::MOVIE,
            ContentType::TvShow => content_type::TV_SHOW,
            ContentType::Other(label) => label,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One catalog title as read from the input file. Empty fields are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleRecord {
    pub show_id: Option<String>,
    pub title: Option<String>,
    pub content_type: ContentType,
    pub listed_in: Option<String>,
    pub country: Option<String>,
    pub director: Option<String>,
    pub duration: Option<String>,
    pub date_added: Option<String>,
    pub release_year: Option<i32>,
    pub rating: Option<String>,
}

impl TitleRecord {
    /// A record of the given type with every other field absent.
    pub fn new(content_type: ContentType) -> Self {
        Self {
            show_id: None,
            title: None,
            content_type,
            listed_in: None,
            country: None,
            director: None,
            duration: None,
            date_added: None,
            release_year: None,
            rating: None,
        }
    }

    /// Short identification for diagnostics.
    pub fn describe(&self) -> String {
        match (&self.show_id, &self.title) {
            (Some(id), Some(t)) => format!("{id} ({t})"),
            (Some(id), None) => id.clone(),
            (None, Some(t)) => t.clone(),
            (None, None) => "<untitled>".to_string(),
        }
    }
}

// ── Model ───────────────────────────────────────────────────────────────────

/// The raw catalog: every title of one input file, in file order.
#[derive(Debug)]
pub struct CatalogModel {
    source: Option<PathBuf>,
    records: Vec<TitleRecord>,
}

impl CatalogModel {
    /// Load a catalog CSV.
    ///
    /// Required columns: type, listed_in, country, director, duration,
    /// date_added, release_year, rating. `show_id` and `title` are kept when
    /// present. All other columns are ignored.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = read_csv_as_strings(path)?;
        info!(
            path = %path.display(),
            rows = raw.height(),
            columns = raw.width(),
            "loaded catalog file"
        );

        let mut model = Self::from_frame(raw)?;
        model.source = Some(path.to_path_buf());
        Ok(model)
    }

    /// Build the model from an all-string DataFrame.
    pub fn from_frame(raw: DataFrame) -> Result<Self> {
        require_columns(&raw, &title::REQUIRED)?;
        let df = strip_whitespace(raw, &title::REQUIRED)?;
        let records = extract_records(&df)?;
        debug!(records = records.len(), "extracted title records");
        Ok(Self {
            source: None,
            records,
        })
    }

    pub fn from_records(records: Vec<TitleRecord>) -> Self {
        Self {
            source: None,
            records,
        }
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn records(&self) -> &[TitleRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Run the Dataset Preparer over the loaded titles.
    pub fn prepare(&self, config: &PipelineConfig) -> Result<PreparedCatalog<'_>> {
        PreparedCatalog::prepare(&self.records, config.duration_policy)
    }
}

// ── Private helpers ─────────────────────────────────────────────────────────

/// Read a CSV file with all columns as String dtype.
/// Trims whitespace from column names.
fn read_csv_as_strings(path: &Path) -> Result<DataFrame> {
    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0)) // all columns as String
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    let trimmed: Vec<String> = df
        .get_column_names_str()
        .iter()
        .map(|c| c.trim().to_string())
        .collect();
    df.set_column_names(trimmed.as_slice())?;

    Ok(df)
}

fn require_columns(df: &DataFrame, required: &[&str]) -> Result<()> {
    for &col_name in required {
        if df.column(col_name).is_err() {
            return Err(CatalogError::MissingColumn(col_name.to_string()));
        }
    }
    Ok(())
}

/// Strip surrounding whitespace from the given string columns.
fn strip_whitespace(df: DataFrame, columns: &[&str]) -> Result<DataFrame> {
    let exprs: Vec<Expr> = columns
        .iter()
        .map(|&c| col(c).str().strip_chars(lit(" \t\r\n")))
        .collect();
    Ok(df.lazy().with_columns(exprs).collect()?)
}

fn string_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let values = df
        .column(name)?
        .str()?
        .into_iter()
        .map(|v| v.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string))
        .collect();
    Ok(values)
}

fn optional_string_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    if df.column(name).is_ok() {
        string_values(df, name)
    } else {
        Ok(vec![None; df.height()])
    }
}

fn extract_records(df: &DataFrame) -> Result<Vec<TitleRecord>> {
    let show_ids = optional_string_values(df, title::SHOW_ID)?;
    let titles = optional_string_values(df, title::TITLE)?;
    let types = string_values(df, title::TYPE)?;
    let listed_in = string_values(df, title::LISTED_IN)?;
    let countries = string_values(df, title::COUNTRY)?;
    let directors = string_values(df, title::DIRECTOR)?;
    let durations = string_values(df, title::DURATION)?;
    let dates_added = string_values(df, title::DATE_ADDED)?;
    let release_years = string_values(df, title::RELEASE_YEAR)?;
    let ratings = string_values(df, title::RATING)?;

    let mut records = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let row = i + 1;
        let kind = types[i].as_deref().ok_or_else(|| {
            CatalogError::InvalidData(format!("row {row}: missing value in column '{}'", title::TYPE))
        })?;

        let release_year = match release_years[i].as_deref() {
            Some(text) => Some(text.parse::<i32>().map_err(|_| {
                CatalogError::InvalidData(format!(
                    "row {row}: '{}' is not an integer ({text:?})",
                    title::RELEASE_YEAR
                ))
            })?),
            None => None,
        };

        records.push(TitleRecord {
            show_id: show_ids[i].clone(),
            title: titles[i].clone(),
            content_type: ContentType::from_label(kind),
            listed_in: listed_in[i].clone(),
            country: countries[i].clone(),
            director: directors[i].clone(),
            duration: durations[i].clone(),
            date_added: dates_added[i].clone(),
            release_year,
            rating: ratings[i].clone(),
        });
    }
    Ok(records)
}
