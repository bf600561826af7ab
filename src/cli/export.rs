//! Export functionality for reports.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use polars::prelude::*;
use tracing::debug;

use super::ExportFormat;
use crate::config::ChartStyle;
use crate::error::Result;
use crate::report::{ChartData, ChartIntent, Report};
use crate::schema::report_table;
use crate::visualization;

/// Exports reports to various file formats.
pub struct Exporter;

impl Exporter {
    /// Export a report. Returns the number of files written.
    pub fn export<P: AsRef<Path>>(
        path: P,
        format: ExportFormat,
        report: &Report,
        style: &ChartStyle,
    ) -> Result<usize> {
        let path = path.as_ref();
        match format {
            ExportFormat::Json => Self::export_json(path, report).map(|_| 1),
            ExportFormat::Html => Self::export_html(path, report, style).map(|_| 1),
            ExportFormat::Csv => Self::export_csv(path, report),
        }
    }

    /// Export the full report as pretty-printed JSON.
    fn export_json(path: &Path, report: &Report) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, report)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Export the rendered charts as one HTML page.
    fn export_html(path: &Path, report: &Report, style: &ChartStyle) -> Result<()> {
        let html = visualization::generate_report_html(report, style)?;
        fs::write(path, html)?;
        Ok(())
    }

    /// Export one CSV table per chart into the directory at `path`.
    fn export_csv(dir: &Path, report: &Report) -> Result<usize> {
        fs::create_dir_all(dir)?;
        for (i, chart) in report.charts.iter().enumerate() {
            let path = Self::table_path(dir, i, chart);
            let mut df = Self::chart_frame(chart)?;
            let mut file = File::create(&path)?;
            CsvWriter::new(&mut file)
                .include_header(true)
                .finish(&mut df)?;
            debug!(path = %path.display(), rows = df.height(), "wrote chart table");
        }
        Ok(report.charts.len())
    }

    /// `<dir>/NN_<chart id>.csv`, numbered in report order from 01.
    pub fn table_path(dir: &Path, index: usize, chart: &ChartIntent) -> PathBuf {
        dir.join(format!("{:02}_{}.csv", index + 1, chart.id.as_str()))
    }

    /// The chart's data as a DataFrame: `series, label, value` for labelled
    /// series, a single `sample` column for raw samples.
    pub fn chart_frame(chart: &ChartIntent) -> Result<DataFrame> {
        let df = match &chart.data {
            ChartData::Samples { values, .. } => df!(report_table::SAMPLE => values.as_slice())?,
            ChartData::Series { series } => {
                let mut names: Vec<&str> = Vec::new();
                let mut labels: Vec<&str> = Vec::new();
                let mut values: Vec<f64> = Vec::new();
                for s in series {
                    for p in &s.points {
                        names.push(s.name.as_str());
                        labels.push(p.label.as_str());
                        values.push(p.value);
                    }
                }
                df!(
                    report_table::SERIES => names,
                    report_table::LABEL => labels,
                    report_table::VALUE => values,
                )?
            }
        };
        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{ChartId, ChartKind, DataPoint, LabeledSeries};
    use tempfile::tempdir;

    fn report() -> Report {
        let series = |name: &str, points: &[(&str, f64)]| LabeledSeries {
            name: name.to_string(),
            points: points
                .iter()
                .map(|(l, v)| DataPoint {
                    label: l.to_string(),
                    value: *v,
                })
                .collect(),
        };
        Report {
            source: None,
            total_titles: 3,
            unparsed_dates: 0,
            dropped_durations: 0,
            charts: vec![
                ChartIntent {
                    id: ChartId::AddedPerYearByType,
                    kind: ChartKind::GroupedCountBar,
                    title: "Content Added Over Time by Type".to_string(),
                    x_label: "Year Added".to_string(),
                    y_label: "Number of Titles".to_string(),
                    data: ChartData::Series {
                        series: vec![
                            series("Movie", &[("2019", 2.0), ("2020", 0.0)]),
                            series("TV Show", &[("2019", 0.0), ("2020", 1.0)]),
                        ],
                    },
                    display_range: None,
                },
                ChartIntent {
                    id: ChartId::MovieDurations,
                    kind: ChartKind::HistogramDensity,
                    title: "Movie Duration Distribution".to_string(),
                    x_label: "Duration (Minutes)".to_string(),
                    y_label: "Count".to_string(),
                    data: ChartData::Samples {
                        values: vec![90.0, 104.0],
                        bins: 30,
                    },
                    display_range: None,
                },
            ],
        }
    }

    #[test]
    fn test_chart_frame_shapes() {
        let report = report();
        let grouped = Exporter::chart_frame(&report.charts[0]).unwrap();
        assert_eq!(grouped.height(), 4);
        assert_eq!(
            grouped.get_column_names_str(),
            vec!["series", "label", "value"]
        );

        let samples = Exporter::chart_frame(&report.charts[1]).unwrap();
        assert_eq!(samples.height(), 2);
        assert_eq!(samples.get_column_names_str(), vec!["sample"]);
    }

    #[test]
    fn test_export_csv_directory() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("tables");
        let report = report();

        let written =
            Exporter::export(&out, ExportFormat::Csv, &report, &ChartStyle::default()).unwrap();
        assert_eq!(written, 2);

        let first = fs::read_to_string(out.join("01_added_per_year_by_type.csv")).unwrap();
        let mut lines = first.lines();
        assert_eq!(lines.next(), Some("series,label,value"));
        assert!(lines.next().is_some_and(|l| l.starts_with("Movie,2019,2")));
        assert!(out.join("02_movie_durations.csv").exists());
    }

    #[test]
    fn test_export_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.json");
        Exporter::export(&path, ExportFormat::Json, &report(), &ChartStyle::default()).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["charts"][0]["id"], "added_per_year_by_type");
        assert_eq!(value["charts"][0]["data"]["series"][1]["name"], "TV Show");
    }

    #[test]
    fn test_export_html() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.html");
        Exporter::export(&path, ExportFormat::Html, &report(), &ChartStyle::default()).unwrap();

        let html = fs::read_to_string(&path).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert_eq!(html.matches("<svg").count(), 2);
    }
}
