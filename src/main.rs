use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use catalog_insight::cli::{Args, Exporter, OutputFormatter};
use catalog_insight::{build_report, CatalogModel};

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout stays clean for the report
    let filter = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(io::stderr)
        .init();

    let config = args.pipeline_config();
    let model = CatalogModel::load(&args.input)
        .with_context(|| format!("Failed to load catalog: {}", args.input.display()))?;
    let prepared = model
        .prepare(&config)
        .context("Failed to prepare catalog")?;
    let report = build_report(&prepared, &config, Some(args.input.display().to_string()));
    info!(charts = report.charts.len(), "report ready");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    OutputFormatter::new(args.format).write(&report, &mut out)?;
    out.flush()?;

    if let Some((path, format)) = args.export_target() {
        let written = Exporter::export(path, format, &report, &args.chart_style())
            .with_context(|| format!("Failed to export report to {}", path.display()))?;
        eprintln!(
            "Exported {} chart(s) to {} ({} file(s))",
            report.charts.len(),
            path.display(),
            written
        );
    }

    Ok(())
}
