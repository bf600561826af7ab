//! Command-line interface module.
//!
//! This module handles:
//! - Argument parsing via clap
//! - Report formatting for stdout (table, JSON)
//! - Export to files (JSON, HTML, one CSV table per chart)

mod args;
mod export;
mod output;

pub use args::{Args, BadDuration, ExportFormat};
pub use export::Exporter;
pub use output::{OutputFormat, OutputFormatter};
