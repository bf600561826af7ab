//! Dataset preparation for streaming-catalog exploratory analysis.
//!
//! Loads a catalog CSV, normalizes dates and durations, expands list fields
//! and derives the series behind a fixed set of charts.

pub mod aggregation;
pub mod cli;
pub mod config;
pub mod dates;
pub mod duration;
pub mod error;
pub mod histogram;
pub mod model;
pub mod preparer;
pub mod report;
pub mod schema;
pub mod visualization;

pub use config::{ChartStyle, PipelineConfig};
pub use duration::DurationPolicy;
pub use error::{CatalogError, Result};
pub use model::{CatalogModel, ContentType, TitleRecord};
pub use preparer::{ListField, PreparedCatalog};
pub use report::{build_report, ChartId, ChartIntent, Report};
