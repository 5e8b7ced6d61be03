use crate::core::types::FieldValue;
use crate::error::{ChartError, ChartResult};

/// Bare numeric strings above this value are read as seconds.
pub const SECONDS_HEURISTIC_THRESHOLD: f64 = 1000.0;

/// Parses a duration cell into minutes.
///
/// Returns `Ok(None)` when the cell is missing (`null`, empty, `"null"`,
/// `"undefined"`), and an error when the cell is present but not a duration.
/// Parsed values are never negative.
///
/// Numbers are taken as minutes. Strings containing `:` are `H:M:S` or `M:S`
/// with non-numeric segments counted as zero. Plain numeric strings above
/// [`SECONDS_HEURISTIC_THRESHOLD`] are taken as seconds.
pub fn try_parse_minutes(raw: &FieldValue) -> ChartResult<Option<f64>> {
    if raw.is_missing() {
        return Ok(None);
    }

    match raw {
        FieldValue::Number(value) => {
            if value.is_finite() {
                Ok(Some(value.max(0.0)))
            } else {
                Err(ChartError::InvalidDuration(value.to_string()))
            }
        }
        FieldValue::Text(text) => parse_minutes_str(text.trim()).map(Some),
        FieldValue::Bool(flag) => Err(ChartError::InvalidDuration(flag.to_string())),
        FieldValue::List(items) => Err(ChartError::InvalidDuration(items.join(","))),
        FieldValue::Null => Ok(None),
    }
}

fn parse_minutes_str(text: &str) -> ChartResult<f64> {
    if text.contains(':') {
        let segments: Vec<f64> = text.split(':').map(clock_segment).collect();
        let minutes = match segments.as_slice() {
            [hours, minutes, seconds] => hours * 60.0 + minutes + seconds / 60.0,
            [minutes, seconds] => minutes + seconds / 60.0,
            _ => return Err(ChartError::InvalidDuration(text.to_owned())),
        };
        return Ok(minutes.max(0.0));
    }

    let value: f64 = text
        .parse()
        .map_err(|_| ChartError::InvalidDuration(text.to_owned()))?;
    if !value.is_finite() {
        return Err(ChartError::InvalidDuration(text.to_owned()));
    }
    let minutes = if value > SECONDS_HEURISTIC_THRESHOLD {
        value / 60.0
    } else {
        value
    };
    Ok(minutes.max(0.0))
}

fn clock_segment(segment: &str) -> f64 {
    segment
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Total conversion of a duration cell into minutes.
///
/// Missing and unparseable input yields `0.0`; the result is always finite
/// and non-negative.
#[must_use]
pub fn to_minutes(raw: &FieldValue) -> f64 {
    try_parse_minutes(raw).ok().flatten().unwrap_or(0.0)
}

/// Duration in minutes, or `None` when the cell is missing or unparseable.
///
/// Aggregates use this form so unknown durations are excluded rather than
/// averaged in as zero.
#[must_use]
pub fn duration_value(raw: Option<&FieldValue>) -> Option<f64> {
    raw.and_then(|value| try_parse_minutes(value).ok().flatten())
}
