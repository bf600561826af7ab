//! Output formatting for reports.
//!
//! The table format prints one table per chart with its prepared series,
//! for reading the numbers without a renderer. JSON prints the whole report.

use std::io::Write;

use clap::ValueEnum;

use crate::error::Result;
use crate::report::{ChartData, ChartIntent, Report};

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed tables (default)
    Table,
    /// Pretty-printed JSON
    Json,
}

/// Formats reports for output.
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    /// Create a new formatter with the specified format.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Format a report and write it to the given writer.
    pub fn write<W: Write>(&self, report: &Report, writer: &mut W) -> Result<()> {
        match self.format {
            OutputFormat::Table => self.write_table(report, writer),
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *writer, report)?;
                writeln!(writer)?;
                Ok(())
            }
        }
    }

    fn write_table<W: Write>(&self, report: &Report, writer: &mut W) -> Result<()> {
        match &report.source {
            Some(source) => writeln!(writer, "{} titles from {}", report.total_titles, source)?,
            None => writeln!(writer, "{} titles", report.total_titles)?,
        }
        writeln!(
            writer,
            "unparsed dates: {}, dropped durations: {}",
            report.unparsed_dates, report.dropped_durations
        )?;

        for (i, chart) in report.charts.iter().enumerate() {
            writeln!(writer)?;
            writeln!(
                writer,
                "[{:>2}] {} ({})",
                i + 1,
                chart.title,
                chart.id.as_str()
            )?;
            Self::write_chart(chart, writer)?;
        }
        Ok(())
    }

    fn write_chart<W: Write>(chart: &ChartIntent, writer: &mut W) -> Result<()> {
        use comfy_table::{Cell, Table};

        let mut table = Table::new();
        match &chart.data {
            ChartData::Samples { values, bins } => {
                table.set_header(vec!["statistic", "value"]);
                table.add_row(vec![Cell::new("values"), Cell::new(values.len())]);
                if !values.is_empty() {
                    let n = values.len() as f64;
                    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
                    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                    let mean = values.iter().sum::<f64>() / n;
                    table.add_row(vec![Cell::new("min"), Cell::new(format_value(min))]);
                    table.add_row(vec![Cell::new("max"), Cell::new(format_value(max))]);
                    table.add_row(vec![Cell::new("mean"), Cell::new(format!("{mean:.1}"))]);
                }
                table.add_row(vec![Cell::new("bins"), Cell::new(bins)]);
            }
            ChartData::Series { series } => {
                // one column per dimension; the series name only matters when
                // the intent groups several series
                let multi = series.len() > 1;
                if multi {
                    table.set_header(vec!["series", "label", "value"]);
                } else {
                    table.set_header(vec!["label", "value"]);
                }

                for s in series {
                    for p in &s.points {
                        let mut row = Vec::with_capacity(3);
                        if multi {
                            row.push(Cell::new(&s.name));
                        }
                        row.push(Cell::new(&p.label));
                        row.push(Cell::new(format_value(p.value)));
                        table.add_row(row);
                    }
                }
            }
        }

        writeln!(writer, "{table}")?;
        Ok(())
    }
}

fn format_value(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{:.0}", v)
    } else {
        format!("{:.2}", v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{ChartId, ChartKind, DataPoint, LabeledSeries};

    fn report() -> Report {
        Report {
            source: Some("titles.csv".to_string()),
            total_titles: 3,
            unparsed_dates: 0,
            dropped_durations: 1,
            charts: vec![
                ChartIntent {
                    id: ChartId::ContentTypes,
                    kind: ChartKind::Pie,
                    title: "Distribution of Content Types".to_string(),
                    x_label: String::new(),
                    y_label: String::new(),
                    data: ChartData::Series {
                        series: vec![LabeledSeries {
                            name: "count".to_string(),
                            points: vec![
                                DataPoint {
                                    label: "Movie".to_string(),
                                    value: 2.0,
                                },
                                DataPoint {
                                    label: "TV Show".to_string(),
                                    value: 1.0,
                                },
                            ],
                        }],
                    },
                    display_range: None,
                },
                ChartIntent {
                    id: ChartId::MovieDurations,
                    kind: ChartKind::HistogramDensity,
                    title: "Movie Duration Distribution".to_string(),
                    x_label: String::new(),
                    y_label: String::new(),
                    data: ChartData::Samples {
                        values: vec![90.0, 100.0],
                        bins: 30,
                    },
                    display_range: None,
                },
            ],
        }
    }

    #[test]
    fn test_table_output() {
        let mut out = Vec::new();
        OutputFormatter::new(OutputFormat::Table)
            .write(&report(), &mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("3 titles from titles.csv"));
        assert!(text.contains("[ 1] Distribution of Content Types (content_types)"));

        let row = |label: &str| {
            text.lines()
                .find(|l| l.contains(label))
                .map(|l| l.split('|').map(str::trim).filter(|c| !c.is_empty()).collect::<Vec<_>>())
                .unwrap()
        };
        assert_eq!(row("label"), vec!["label", "value"]);
        assert_eq!(row("Movie"), vec!["Movie", "2"]);
        assert_eq!(row("TV Show"), vec!["TV Show", "1"]);
        assert_eq!(row("mean"), vec!["mean", "95.0"]);
        assert_eq!(row("bins"), vec!["bins", "30"]);
    }

    #[test]
    fn test_table_output_multi_series() {
        let mut report = report();
        report.charts[0].data = ChartData::Series {
            series: vec![
                LabeledSeries {
                    name: "Movie".to_string(),
                    points: vec![DataPoint {
                        label: "2019".to_string(),
                        value: 2.0,
                    }],
                },
                LabeledSeries {
                    name: "TV Show".to_string(),
                    points: vec![DataPoint {
                        label: "2019".to_string(),
                        value: 0.0,
                    }],
                },
            ],
        };

        let mut out = Vec::new();
        OutputFormatter::new(OutputFormat::Table)
            .write(&report, &mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("series"));
        assert!(text.lines().any(|l| l.contains("TV Show") && l.contains("2019") && l.contains('0')));
    }

    #[test]
    fn test_json_output() {
        let mut out = Vec::new();
        OutputFormatter::new(OutputFormat::Json)
            .write(&report(), &mut out)
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["dropped_durations"], 1);
        assert_eq!(value["charts"][1]["data"]["values"][1], 100.0);
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(4.0), "4");
        assert_eq!(format_value(-1.5), "-1.50");
    }
}
