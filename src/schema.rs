/// Column-name constants for catalog-insight.
/// Single source of truth for the input header and the exported tables.

// ── Title columns (input) ───────────────────────────────────────────────────
pub mod title {
    pub const SHOW_ID: &str = "show_id";
    pub const TITLE: &str = "title";
    pub const TYPE: &str = "type";
    pub const LISTED_IN: &str = "listed_in";
    pub const COUNTRY: &str = "country";
    pub const DIRECTOR: &str = "director";
    pub const DURATION: &str = "duration";
    pub const DATE_ADDED: &str = "date_added";
    pub const RELEASE_YEAR: &str = "release_year";
    pub const RATING: &str = "rating";

    pub const REQUIRED: [&str; 8] = [
        TYPE,
        LISTED_IN,
        COUNTRY,
        DIRECTOR,
        DURATION,
        DATE_ADDED,
        RELEASE_YEAR,
        RATING,
    ];
}

// ── Content type values ─────────────────────────────────────────────────────
pub mod content_type {
    pub const MOVIE: &str = "Movie";
    pub const TV_SHOW: &str = "TV Show";
}

// ── List-field delimiter ────────────────────────────────────────────────────
pub mod list {
    pub const DELIMITER: &str = ", ";
}

// ── Exported report tables ──────────────────────────────────────────────────
pub mod report_table {
    pub const SERIES: &str = "series";
    pub const LABEL: &str = "label";
    pub const VALUE: &str = "value";
    pub const SAMPLE: &str = "sample";
}
