//! Derivation of form field values from a usage interval.

use chrono::{DateTime, FixedOffset};

use crate::config::FormFieldIds;

/// Exploded calendar and clock components of a timestamp, zero-padded the
/// way the form endpoint expects them (`09`, not `9`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampParts {
    pub year: String,
    pub month: String,
    pub day: String,
    pub hour: String,
    pub minute: String,
}

impl TimestampParts {
    /// Extracts the components of a timestamp.
    #[must_use]
    pub fn from_datetime(ts: &DateTime<FixedOffset>) -> Self {
        Self {
            year: ts.format("%Y").to_string(),
            month: ts.format("%m").to_string(),
            day: ts.format("%d").to_string(),
            hour: ts.format("%H").to_string(),
            minute: ts.format("%M").to_string(),
        }
    }
}

/// Elapsed time between two timestamps in fractional hours.
///
/// Signed and unrounded: 6 hours 27 minutes yields exactly 6.45.
#[must_use]
pub fn usage_hours(start: &DateTime<FixedOffset>, end: &DateTime<FixedOffset>) -> f64 {
    (*end - *start).num_milliseconds() as f64 / 3_600_000.0
}

/// Builds the form body for one submission as `(field_id, value)` pairs.
///
/// Semantic names are mapped to the configured opaque identifiers; the
/// duration pair is emitted only when the form has a duration field.
#[must_use]
pub fn build_form(
    fields: &FormFieldIds,
    display_name: &str,
    start: &DateTime<FixedOffset>,
    end: &DateTime<FixedOffset>,
) -> Vec<(String, String)> {
    let start_parts = TimestampParts::from_datetime(start);
    let end_parts = TimestampParts::from_datetime(end);

    let mut pairs = vec![(fields.name.clone(), display_name.to_owned())];

    if let Some(duration_id) = &fields.usage_duration {
        pairs.push((duration_id.clone(), usage_hours(start, end).to_string()));
    }

    pairs.extend([
        (fields.start_time_hour.clone(), start_parts.hour),
        (fields.start_time_minute.clone(), start_parts.minute),
        (fields.start_date_year.clone(), start_parts.year),
        (fields.start_date_month.clone(), start_parts.month),
        (fields.start_date_day.clone(), start_parts.day),
        (fields.end_time_hour.clone(), end_parts.hour),
        (fields.end_time_minute.clone(), end_parts.minute),
        (fields.end_date_year.clone(), end_parts.year),
        (fields.end_date_month.clone(), end_parts.month),
        (fields.end_date_day.clone(), end_parts.day),
    ]);

    pairs
}
