//! Tests for default and merged trip metadata

use chrono::NaiveDate;

use super::{EMAIL, LOG_FILE, request};
use crate::app::services::trip_loader::metadata::{
    date_from_file_name, default_trip_name, merge_trip_metadata, new_trip_metadata,
};
use crate::models::{InputSource, LoadRequest, TripRecord};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn stored() -> TripRecord {
    TripRecord {
        id: 3,
        user_id: 1,
        name: Some("Stored name".to_string()),
        date: Some(date(2015, 6, 1)),
        vessel_name: Some("Stored vessel".to_string()),
        load_time: None,
        load_file: None,
    }
}

#[test]
fn test_date_from_file_name() {
    assert_eq!(date_from_file_name(LOG_FILE), Some(date(2016, 7, 2)));
    assert_eq!(
        date_from_file_name("/logs/2016-13-45_then_2016-08-01.nmea"),
        Some(date(2016, 8, 1))
    );
    assert_eq!(date_from_file_name("harbour.nmea"), None);
}

#[test]
fn test_default_trip_name() {
    assert_eq!(default_trip_name(Some("/var/log/boat/trip.nmea")), "trip.nmea");
    assert_eq!(default_trip_name(Some(LOG_FILE)), LOG_FILE);
    assert_eq!(default_trip_name(None), "[empty]");
}

#[test]
fn test_new_trip_defaults_from_file_name() {
    let metadata = new_trip_metadata(&request(), date(2020, 1, 1));

    assert_eq!(metadata.name, LOG_FILE);
    assert_eq!(metadata.date, date(2016, 7, 2));
    assert_eq!(metadata.vessel_name, None);
}

#[test]
fn test_new_trip_from_stdin_uses_today() {
    let request = LoadRequest::new(InputSource::Stdin, EMAIL);
    let metadata = new_trip_metadata(&request, date(2020, 1, 1));

    assert_eq!(metadata.name, "[empty]");
    assert_eq!(metadata.date, date(2020, 1, 1));
}

#[test]
fn test_new_trip_overrides_win() {
    let request = request()
        .with_trip_name("Harbour run")
        .with_trip_date(date(2017, 5, 4))
        .with_vessel_name("Aurora");
    let metadata = new_trip_metadata(&request, date(2020, 1, 1));

    assert_eq!(metadata.name, "Harbour run");
    assert_eq!(metadata.date, date(2017, 5, 4));
    assert_eq!(metadata.vessel_name.as_deref(), Some("Aurora"));
}

#[test]
fn test_empty_overrides_count_as_omitted() {
    let request = request().with_trip_name("").with_vessel_name("  ");
    let metadata = new_trip_metadata(&request, date(2020, 1, 1));

    assert_eq!(metadata.name, LOG_FILE);
    assert_eq!(metadata.vessel_name, None);
}

#[test]
fn test_merge_keeps_stored_values() {
    let request = request().with_trip_name("").reloading(3);
    let metadata = merge_trip_metadata(&request, &stored(), date(2020, 1, 1));

    assert_eq!(metadata.name, "Stored name");
    assert_eq!(metadata.date, date(2015, 6, 1));
    assert_eq!(metadata.vessel_name.as_deref(), Some("Stored vessel"));
}

#[test]
fn test_merge_overrides_win() {
    let request = request()
        .with_trip_name("New name")
        .with_trip_date(date(2018, 2, 3))
        .with_vessel_name("New vessel")
        .reloading(3);
    let metadata = merge_trip_metadata(&request, &stored(), date(2020, 1, 1));

    assert_eq!(metadata.name, "New name");
    assert_eq!(metadata.date, date(2018, 2, 3));
    assert_eq!(metadata.vessel_name.as_deref(), Some("New vessel"));
}

#[test]
fn test_merge_fills_gaps_with_defaults() {
    let mut record = stored();
    record.name = None;
    record.date = None;
    record.vessel_name = None;

    let metadata = merge_trip_metadata(&request().reloading(3), &record, date(2020, 1, 1));

    assert_eq!(metadata.name, LOG_FILE);
    assert_eq!(metadata.date, date(2016, 7, 2));
    assert_eq!(metadata.vessel_name, None);
}
