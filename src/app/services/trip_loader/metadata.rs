//! Default and merged trip metadata

use std::path::Path;

use chrono::NaiveDate;
use regex::Regex;

use crate::constants::{EMPTY_TRIP_NAME, FILENAME_DATE_PATTERN, TRIP_DATE_FORMAT};
use crate::models::{LoadRequest, TripMetadata, TripRecord};

/// First `YYYY-MM-DD` in a file name that is a real calendar date
pub fn date_from_file_name(name: &str) -> Option<NaiveDate> {
    let pattern = Regex::new(FILENAME_DATE_PATTERN).ok()?;
    pattern
        .find_iter(name)
        .find_map(|m| NaiveDate::parse_from_str(m.as_str(), TRIP_DATE_FORMAT).ok())
}

/// Trip name used when the caller gives none: the input's file name
pub fn default_trip_name(file_name_hint: Option<&str>) -> String {
    file_name_hint
        .map(|hint| {
            Path::new(hint)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| hint.to_string())
        })
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| EMPTY_TRIP_NAME.to_string())
}

/// Trip date used when the caller gives none
pub fn default_trip_date(file_name_hint: Option<&str>, today: NaiveDate) -> NaiveDate {
    file_name_hint.and_then(date_from_file_name).unwrap_or(today)
}

/// Metadata for a trip created by this load
pub fn new_trip_metadata(request: &LoadRequest, today: NaiveDate) -> TripMetadata {
    let hint = request.input.file_name_hint();
    TripMetadata {
        name: non_empty(request.trip_name.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| default_trip_name(hint.as_deref())),
        date: request
            .trip_date
            .unwrap_or_else(|| default_trip_date(hint.as_deref(), today)),
        vessel_name: non_empty(request.vessel_name.as_deref()).map(str::to_string),
    }
}

/// Metadata for a reloaded trip: overrides win, stored values are kept otherwise
pub fn merge_trip_metadata(
    request: &LoadRequest,
    stored: &TripRecord,
    today: NaiveDate,
) -> TripMetadata {
    let hint = request.input.file_name_hint();
    let name = non_empty(request.trip_name.as_deref())
        .or_else(|| non_empty(stored.name.as_deref()))
        .map(str::to_string)
        .unwrap_or_else(|| default_trip_name(hint.as_deref()));
    let date = request
        .trip_date
        .or(stored.date)
        .unwrap_or_else(|| default_trip_date(hint.as_deref(), today));
    let vessel_name = non_empty(request.vessel_name.as_deref())
        .or_else(|| non_empty(stored.vessel_name.as_deref()))
        .map(str::to_string);

    TripMetadata {
        name,
        date,
        vessel_name,
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
