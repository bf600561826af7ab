use std::fs;
use std::path::{Path, PathBuf};

use catalog_insight::cli::{ExportFormat, Exporter, OutputFormat, OutputFormatter};
use catalog_insight::report::ChartData;
use catalog_insight::{
    build_report, CatalogError, CatalogModel, ChartId, ChartStyle, DurationPolicy,
    PipelineConfig, Report,
};
use tempfile::tempdir;

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/titles.csv")
}

fn drop_config() -> PipelineConfig {
    PipelineConfig {
        duration_policy: DurationPolicy::DropAndWarn,
        ..PipelineConfig::default()
    }
}

fn report() -> Report {
    let config = PipelineConfig::default();
    let model = CatalogModel::load(fixture()).unwrap();
    let prepared = model.prepare(&config).unwrap();
    build_report(&prepared, &config, Some("titles.csv".to_string()))
}

/// `(label, value)` pairs of a single-series chart.
fn points(report: &Report, id: ChartId) -> Vec<(String, f64)> {
    report
        .chart(id)
        .and_then(|c| c.series())
        .unwrap()
        .points
        .iter()
        .map(|p| (p.label.clone(), p.value))
        .collect()
}

#[test]
fn test_load_fixture() {
    let model = CatalogModel::load(fixture()).unwrap();
    assert_eq!(model.len(), 7);
    assert_eq!(model.source(), Some(fixture().as_path()));

    let records = model.records();
    assert_eq!(records[1].listed_in.as_deref(), Some("International TV Shows, TV Dramas, TV Mysteries"));
    assert_eq!(records[2].date_added.as_deref(), Some("August 4, 2017"));
    assert_eq!(records[5].date_added, None);
    assert_eq!(records[6].duration, None);
}

#[test]
fn test_default_run_skips_movie_without_duration() {
    let model = CatalogModel::load(fixture()).unwrap();
    let prepared = model.prepare(&PipelineConfig::default()).unwrap();

    assert_eq!(prepared.len(), 7);
    assert_eq!(prepared.dropped_durations(), 0);
    assert_eq!(prepared.movie_minutes(), &[90, 91, 125]);
    assert_eq!(prepared.season_counts(), &[2, 1, 2]);
    assert_eq!(prepared.unparsed_dates(), 0);
}

fn malformed_durations() -> (tempfile::TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("malformed.csv");
    fs::write(
        &path,
        "type,title,director,country,date_added,release_year,rating,duration,listed_in\n\
         Movie,A,,,\"May 1, 2020\",2019,PG,90 min,Dramas\n\
         Movie,B,,,\"May 2, 2020\",2019,PG,ninety min,Dramas\n\
         TV Show,C,,,\"May 3, 2020\",2019,TV-MA,2 Seasons,Dramas\n",
    )
    .unwrap();
    (dir, path)
}

#[test]
fn test_malformed_duration_aborts_by_default() {
    let (_dir, path) = malformed_durations();
    let model = CatalogModel::load(&path).unwrap();
    let err = model.prepare(&PipelineConfig::default()).unwrap_err();
    assert!(matches!(err, CatalogError::Duration { row: 2, .. }), "{err}");
}

#[test]
fn test_malformed_duration_dropped_on_request() {
    let (_dir, path) = malformed_durations();
    let model = CatalogModel::load(&path).unwrap();
    let prepared = model.prepare(&drop_config()).unwrap();

    assert_eq!(prepared.len(), 3);
    assert_eq!(prepared.dropped_durations(), 1);
    assert_eq!(prepared.movie_minutes(), &[90]);
    assert_eq!(prepared.season_counts(), &[2]);
}

#[test]
fn test_report_has_every_chart_in_order() {
    let report = report();
    let ids: Vec<ChartId> = report.charts.iter().map(|c| c.id).collect();
    assert_eq!(ids, ChartId::ALL.to_vec());
    assert_eq!(report.total_titles, 7);
    assert_eq!(report.dropped_durations, 0);
}

#[test]
fn test_type_counts_cover_every_title() {
    let report = report();
    let types = points(&report, ChartId::ContentTypes);
    assert_eq!(
        types,
        vec![("Movie".to_string(), 4.0), ("TV Show".to_string(), 3.0)]
    );
    let total: f64 = types.iter().map(|(_, v)| v).sum();
    assert_eq!(total as usize, report.total_titles);
}

#[test]
fn test_list_fields_are_expanded() {
    let report = report();

    let genres = points(&report, ChartId::TopGenres);
    assert_eq!(genres[0], ("International TV Shows".to_string(), 3.0));
    assert_eq!(genres[1], ("Dramas".to_string(), 2.0));

    let countries = points(&report, ChartId::TopCountries);
    assert_eq!(countries[0], ("United States".to_string(), 3.0));
    assert_eq!(countries[1], ("France".to_string(), 2.0));

    // missing directors are not counted; ties keep first-seen order
    let directors = points(&report, ChartId::TopDirectors);
    let names: Vec<&str> = directors.iter().map(|(l, _)| l.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Kirsten Johnson",
            "Julien Leclercq",
            "Robert Cullen",
            "Jose Luis Ucha",
            "Haile Gerima"
        ]
    );
}

#[test]
fn test_date_derived_charts() {
    let report = report();

    let per_year = points(&report, ChartId::AddedPerYear);
    assert_eq!(
        per_year,
        vec![
            ("2017".to_string(), 1.0),
            ("2019".to_string(), 2.0),
            ("2021".to_string(), 3.0)
        ]
    );

    let months = points(&report, ChartId::AddedPerMonth);
    assert_eq!(months.len(), 12);
    assert_eq!(months[0].0, "January");
    assert_eq!(months[2], ("March".to_string(), 2.0));
    assert_eq!(months[8], ("September".to_string(), 3.0));
    // the title without a date is not counted
    assert_eq!(months.iter().map(|(_, v)| v).sum::<f64>(), 6.0);

    let lag = points(&report, ChartId::AverageLag);
    assert_eq!(lag[0], ("2017".to_string(), -4.0));
    assert_eq!(lag[1], ("2019".to_string(), 13.5));
    assert!((lag[2].1 - 1.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_added_per_year_by_type_is_zero_filled() {
    let report = report();
    let chart = report.chart(ChartId::AddedPerYearByType).unwrap();
    let ChartData::Series { series } = &chart.data else {
        panic!("expected series data");
    };

    assert_eq!(series.len(), 2);
    assert_eq!(series[0].name, "Movie");
    let movie: Vec<f64> = series[0].points.iter().map(|p| p.value).collect();
    let tv: Vec<f64> = series[1].points.iter().map(|p| p.value).collect();
    assert_eq!(movie, vec![0.0, 2.0, 2.0]);
    assert_eq!(tv, vec![1.0, 0.0, 1.0]);
}

#[test]
fn test_duration_charts() {
    let report = report();

    let movies = report.chart(ChartId::MovieDurations).unwrap();
    assert_eq!(movies.samples(), Some(&[90.0, 91.0, 125.0][..]));

    let seasons = points(&report, ChartId::TvSeasons);
    assert_eq!(
        seasons,
        vec![("1".to_string(), 1.0), ("2".to_string(), 2.0)]
    );
    assert_eq!(
        report.chart(ChartId::TvSeasons).unwrap().display_range,
        Some((-0.5, 10.5))
    );

    let ratings = points(&report, ChartId::RatingDistribution);
    assert_eq!(ratings[0], ("TV-MA".to_string(), 4.0));
    assert_eq!(ratings.len(), 4);
}

#[test]
fn test_missing_column_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("no_rating.csv");
    fs::write(
        &path,
        "type,title,director,country,date_added,release_year,duration,listed_in\n\
         Movie,A,,,\"May 1, 2020\",2019,90 min,Dramas\n",
    )
    .unwrap();

    let err = CatalogModel::load(&path).unwrap_err();
    assert!(matches!(err, CatalogError::MissingColumn(ref c) if c == "rating"), "{err}");
}

#[test]
fn test_non_integer_release_year_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad_year.csv");
    fs::write(
        &path,
        "type,title,director,country,date_added,release_year,rating,duration,listed_in\n\
         Movie,A,,,\"May 1, 2020\",twenty,PG,90 min,Dramas\n",
    )
    .unwrap();

    let err = CatalogModel::load(&path).unwrap_err();
    assert!(matches!(err, CatalogError::InvalidData(_)), "{err}");
}

#[test]
fn test_export_every_format() {
    let report = report();
    let style = ChartStyle::default();
    let dir = tempdir().unwrap();

    let json = dir.path().join("report.json");
    Exporter::export(&json, ExportFormat::Json, &report, &style).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json).unwrap()).unwrap();
    assert_eq!(value["total_titles"], 7);
    assert_eq!(value["charts"].as_array().map(Vec::len), Some(11));

    let html = dir.path().join("report.html");
    Exporter::export(&html, ExportFormat::Html, &report, &style).unwrap();
    let page = fs::read_to_string(&html).unwrap();
    assert_eq!(page.matches("<figure").count(), 11);

    let tables = dir.path().join("tables");
    let written = Exporter::export(&tables, ExportFormat::Csv, &report, &style).unwrap();
    assert_eq!(written, 11);
    assert_eq!(fs::read_dir(&tables).unwrap().count(), 11);
    assert!(tables.join("01_content_types.csv").exists());
    assert!(tables.join("11_added_per_year_by_type.csv").exists());
}

#[test]
fn test_table_output_lists_every_chart() {
    let report = report();
    let mut buf = Vec::new();
    OutputFormatter::new(OutputFormat::Table)
        .write(&report, &mut buf)
        .unwrap();

    let text = String::from_utf8(buf).unwrap();
    for id in ChartId::ALL {
        assert!(text.contains(id.as_str()), "missing {}", id.as_str());
    }

    let cells = |line: &str| -> Vec<String> {
        line.split('|')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect()
    };
    let rows: Vec<Vec<String>> = text
        .lines()
        .filter(|l| l.starts_with('|'))
        .map(cells)
        .collect();
    assert!(rows.contains(&vec!["Movie".to_string(), "4".to_string()]));
    assert!(rows.contains(&vec!["series".to_string(), "label".to_string(), "value".to_string()]));
    assert!(rows.contains(&vec!["TV Show".to_string(), "2017".to_string(), "1".to_string()]));
}
