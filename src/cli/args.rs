//! Command-line argument definitions.

use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

use super::OutputFormat;
use crate::config::{ChartStyle, PipelineConfig};
use crate::duration::DurationPolicy;

/// Export file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// The full report as pretty-printed JSON
    Json,
    /// Self-contained HTML page with one SVG chart per intent
    Html,
    /// A directory with one CSV table per chart
    Csv,
}

impl ExportFormat {
    /// Infer export format from the output path. Paths without a known
    /// extension are treated as CSV directories.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase());
        match ext.as_deref() {
            Some("json") => ExportFormat::Json,
            Some("html") | Some("htm") => ExportFormat::Html,
            _ => ExportFormat::Csv,
        }
    }
}

/// Policy for durations that fail to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BadDuration {
    /// Stop with an error naming the row
    Abort,
    /// Skip the value and log a warning
    Drop,
}

impl From<BadDuration> for DurationPolicy {
    fn from(value: BadDuration) -> Self {
        match value {
            BadDuration::Abort => DurationPolicy::Abort,
            BadDuration::Drop => DurationPolicy::DropAndWarn,
        }
    }
}

/// Prepare chart series from a streaming catalog CSV.
#[derive(Parser, Debug)]
#[command(name = "catalog-insight")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Catalog CSV file
    #[arg(
        short = 'i',
        long = "input",
        value_name = "FILE",
        default_value = "netflix_titles.csv"
    )]
    pub input: PathBuf,

    /// Output format for stdout
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Export the report to a file (or directory for CSV)
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Export format (inferred from the output path if not specified)
    #[arg(long = "export-format", value_enum, value_name = "FORMAT")]
    pub export_format: Option<ExportFormat>,

    /// What to do with a duration that does not parse
    #[arg(long = "on-bad-duration", value_enum, default_value = "abort")]
    pub on_bad_duration: BadDuration,

    /// Entries kept in top-N charts
    #[arg(long = "top-n", default_value = "10")]
    pub top_n: usize,

    /// Buckets in the movie duration histogram
    #[arg(long = "bins", default_value = "30")]
    pub bins: usize,

    /// Figure width in pixels (HTML export)
    #[arg(long = "width", default_value = "1200")]
    pub width: u32,

    /// Figure height in pixels (HTML export)
    #[arg(long = "height", default_value = "800")]
    pub height: u32,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            top_n: self.top_n,
            histogram_bins: self.bins,
            duration_policy: self.on_bad_duration.into(),
            ..PipelineConfig::default()
        }
    }

    pub fn chart_style(&self) -> ChartStyle {
        ChartStyle {
            width_px: self.width,
            height_px: self.height,
            ..ChartStyle::default()
        }
    }

    /// Export target and format, if an export was requested.
    pub fn export_target(&self) -> Option<(&Path, ExportFormat)> {
        let path = self.output.as_deref()?;
        let format = self
            .export_format
            .unwrap_or_else(|| ExportFormat::from_path(path));
        Some((path, format))
    }
}
