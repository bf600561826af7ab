//! Type-conditioned duration parsing.
//!
//! A movie's duration is `"<minutes> min"`, a TV show's is
//! `"<count> Season"` / `"<count> Seasons"`. Neither is coerced: malformed
//! text is a [`ParseError`] and the caller applies its [`DurationPolicy`].

use std::fmt;

use thiserror::Error;

const MINUTE_UNIT: &str = "min";
const SEASON_UNITS: [&str; 2] = ["Season", "Seasons"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing {expected} duration")]
    Missing { expected: DurationKind },

    #[error("invalid {expected} duration {input:?}: {reason}")]
    Malformed {
        expected: DurationKind,
        input: String,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationKind {
    Minutes,
    Seasons,
}

impl fmt::Display for DurationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DurationKind::Minutes => f.write_str("movie"),
            DurationKind::Seasons => f.write_str("season"),
        }
    }
}

/// What to do with a record whose duration does not parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DurationPolicy {
    /// Fail the whole run on the first malformed duration.
    #[default]
    Abort,
    /// Skip the value, log a warning and keep going.
    DropAndWarn,
}

/// Parse a movie duration such as `"90 min"` into minutes.
pub fn parse_movie_minutes(raw: Option<&str>) -> Result<u32, ParseError> {
    let kind = DurationKind::Minutes;
    let text = non_empty(raw).ok_or(ParseError::Missing { expected: kind })?;

    let number = text
        .strip_suffix(MINUTE_UNIT)
        .and_then(|rest| rest.strip_suffix(' '))
        .ok_or_else(|| malformed(kind, text, "expected \"<integer> min\""))?;

    parse_count(kind, text, number)
}

/// Parse a TV show duration such as `"3 Seasons"` into a season count.
///
/// Only the token before the first space is numeric; a bare integer is
/// accepted, any other unit is not.
pub fn parse_season_count(raw: Option<&str>) -> Result<u32, ParseError> {
    let kind = DurationKind::Seasons;
    let text = non_empty(raw).ok_or(ParseError::Missing { expected: kind })?;

    let (number, unit) = match text.split_once(' ') {
        Some((number, unit)) => (number, Some(unit.trim())),
        None => (text, None),
    };

    if let Some(unit) = unit {
        if !SEASON_UNITS.contains(&unit) {
            return Err(malformed(kind, text, "expected \"<integer> Season(s)\""));
        }
    }

    parse_count(kind, text, number)
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_count(kind: DurationKind, input: &str, number: &str) -> Result<u32, ParseError> {
    if number.is_empty() {
        return Err(malformed(kind, input, "missing number"));
    }
    number
        .parse::<u32>()
        .map_err(|_| malformed(kind, input, "not a non-negative integer"))
}

fn malformed(expected: DurationKind, input: &str, reason: &'static str) -> ParseError {
    ParseError::Malformed {
        expected,
        input: input.to_string(),
        reason,
    }
}
