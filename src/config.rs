use crate::duration::DurationPolicy;

/// Thresholds and cutoffs applied while building the report.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Entries kept by top-N frequency tables
    pub top_n: usize,
    /// First year included in the per-year series
    pub min_year_added: i32,
    /// First year included in the average-lag series
    pub min_lag_year: i32,
    /// Equal-width buckets for the movie duration histogram
    pub histogram_bins: usize,
    /// Season numbers shown on the season chart axis (inclusive)
    pub season_display_range: (u32, u32),
    /// Handling of durations that do not parse
    pub duration_policy: DurationPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            min_year_added: 2008,
            min_lag_year: 2010,
            histogram_bins: 30,
            season_display_range: (0, 10),
            duration_policy: DurationPolicy::default(),
        }
    }
}

/// Presentation defaults for the chart renderer. Has no effect on data.
#[derive(Debug, Clone)]
pub struct ChartStyle {
    /// Figure width in pixels
    pub width_px: u32,
    /// Figure height in pixels
    pub height_px: u32,
    pub font_size: u32,
    /// Draw value grid lines behind the plot
    pub grid: bool,
    /// Highlight colour (bars, lines, pie slice)
    pub accent: String,
    /// Second pie slice and dark ramps
    pub dark: String,
    /// Histogram fill
    pub neutral: String,
    /// Lag line and text
    pub ink: String,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width_px: 1200,
            height_px: 800,
            font_size: 12,
            grid: true,
            accent: "#e50914".to_string(),
            dark: "#221f1f".to_string(),
            neutral: "#696969".to_string(),
            ink: "#000000".to_string(),
        }
    }
}
