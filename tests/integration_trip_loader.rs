//! Integration tests for loading NMEA logs into an on-disk trip database
//!
//! These tests drive the public library API end to end: a SQLite file in a
//! temporary directory, log files on disk (plain and gzip), and the
//! configured display range routines.

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use flate2::Compression;
use flate2::write::GzEncoder;
use nmea_trip_loader::config::{DatabaseConfig, DisplayRangeConfig};
use nmea_trip_loader::{
    BufferedContext, Error, InputSource, LoadRequest, SqlRoutines, TripLoader, TripStore,
};
use rusqlite::Connection;
use tempfile::TempDir;

const EMAIL: &str = "skipper@example.com";

const HARBOUR_LOG: &str = "\
$GPGLL,6009.500,N,02456.100,E,123500,A*4F
$IIDBT,,f,3.5,M,,
$IIMWV,045,R,10.8,K,A
$IIVHW,,T,,M,4.9,N,9.1,K
$IIVTG,180.0,T,180.0,M,5.1,N,,,A
$GPGLL,,,,,123502,V
$IIDBT,,f,3.7,M,,
$GPGLL,6009.400,S,02456.000,W,123504,A
$IIDBT,,f,12.1,F,,
$GPRMC,123504,A,6009.400,N,02456.000,E,5.1,180.0,020716,,
";

fn open_store(dir: &Path) -> TripStore {
    let config = DatabaseConfig {
        path: dir.join("trips.sqlite"),
        busy_timeout_ms: 200,
    };
    let mut store = TripStore::open(&config).unwrap();
    store.add_user(EMAIL).unwrap();
    store
}

fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
        row.get(0)
    })
    .unwrap()
}

/// Test a full load from a gzip file with a display range routine
///
/// Purpose: Validate file opening, decompression, parsing, persistence and ranges together
/// Benefit: Ensures the pieces agree on row shapes and commit boundaries
#[test]
fn test_load_gzip_file_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("harbour-2016-07-02.nmea.gz");
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(HARBOUR_LOG.as_bytes()).unwrap();
    std::fs::write(&log_path, encoder.finish().unwrap()).unwrap();

    let mut store = open_store(temp_dir.path());
    let routines = SqlRoutines::from_config(&DisplayRangeConfig {
        routines: vec!["UPDATE position SET display_range = 1 WHERE trip_id = ?1".to_string()],
    });
    let mut loader = TripLoader::new(&mut store, routines);
    let mut ctx = BufferedContext::new();

    let request =
        LoadRequest::new(InputSource::File(log_path.clone()), EMAIL).with_vessel_name("Aurora");
    let summary = loader.load(&request, &mut ctx).unwrap();

    assert_eq!(summary.stats.positions, 2);
    assert_eq!(summary.stats.depths, 2);
    assert_eq!(summary.stats.ignored_lines, 1);
    assert_eq!(summary.stats.unsupported_units, 1);
    assert!(ctx.get_log_msgs().ends_with("Done."));

    let conn = loader.store().connection();
    let (date, vessel): (String, String) = conn
        .query_row("SELECT trip_date, vessel_name FROM trip", [], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
        .unwrap();
    assert_eq!(date, "2016-07-02");
    assert_eq!(vessel, "Aurora");

    let (lat, lon): (f64, f64) = conn
        .query_row(
            "SELECT latitude, longitude FROM position ORDER BY id DESC LIMIT 1",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert!((lat + 60.156667).abs() < 1e-4);
    assert!((lon + 24.933333).abs() < 1e-4);

    // 10.8 km/h apparent wind at 45 degrees
    let (speed, angle, true_wind): (f64, i32, bool) = conn
        .query_row("SELECT speed, angle, true_apparent FROM wind", [], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
        })
        .unwrap();
    assert!((speed - 3.0).abs() < 1e-9);
    assert_eq!(angle, 45);
    assert!(!true_wind);

    let ranged: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM position WHERE display_range = 1",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(ranged, 2);
}

/// Test that a reload replaces data and survives reopening the database
///
/// Purpose: Validate full-replace reload semantics against a persisted file
/// Benefit: Catches stale rows left behind by the cascade or duplicate inserts
#[test]
fn test_reload_after_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let trip_id = {
        let mut store = open_store(temp_dir.path());
        let mut loader = TripLoader::new(&mut store, SqlRoutines::default());
        loader
            .load_from_reader(
                &LoadRequest::new(InputSource::Stdin, EMAIL).with_trip_name("Harbour"),
                HARBOUR_LOG.as_bytes(),
                &mut BufferedContext::new(),
            )
            .unwrap()
            .trip_id
    };

    let mut store = open_store(temp_dir.path());
    let mut loader = TripLoader::new(&mut store, SqlRoutines::default());
    let shorter = "$GPGLL,6009.500,N,02456.100,E,123500,A\n$IIDBT,,f,3.5,M,,\n";
    loader
        .load_from_reader(
            &LoadRequest::new(InputSource::Stdin, EMAIL).reloading(trip_id),
            shorter.as_bytes(),
            &mut BufferedContext::new(),
        )
        .unwrap();

    let conn = loader.store().connection();
    assert_eq!(count(conn, "trip"), 1);
    assert_eq!(count(conn, "position"), 1);
    assert_eq!(count(conn, "depth"), 1);
    assert_eq!(count(conn, "wind"), 0);
    assert_eq!(count(conn, "water_speed"), 0);
    assert_eq!(count(conn, "ground_speed_course"), 0);

    let (name, load_file): (String, String) = conn
        .query_row("SELECT trip_name, load_file FROM trip", [], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
        .unwrap();
    assert_eq!(name, "Harbour");
    assert_eq!(load_file, "stdin");
}

/// Test that a second writer waits for and then gives up on a held load
///
/// Purpose: Validate that load transactions hold the database write lock
/// Benefit: Ensures two reloads of one trip cannot interleave
#[test]
fn test_concurrent_writer_is_blocked() {
    let temp_dir = TempDir::new().unwrap();
    let mut first = open_store(temp_dir.path());
    let path = first.path().unwrap().to_path_buf();
    let mut second = TripStore::open_path(&path, Duration::from_millis(50)).unwrap();

    let held = first.begin().unwrap();
    assert!(matches!(second.begin(), Err(Error::Database(_))));

    held.rollback().unwrap();
    assert!(second.begin().is_ok());
}

/// Test that a failing line leaves an existing database untouched
///
/// Purpose: Validate whole-load atomicity with line-numbered errors
/// Benefit: Ensures partial logs never produce half-written trips
#[test]
fn test_fatal_line_rolls_back_everything() {
    let temp_dir = TempDir::new().unwrap();
    let mut store = open_store(temp_dir.path());
    let mut loader = TripLoader::new(&mut store, SqlRoutines::default());
    let mut ctx = BufferedContext::new();
    let corrupt = format!("{}$IIVTG,180.0,T,180.0,M,5.1,K,,,A\n", HARBOUR_LOG);

    let err = loader
        .load_from_reader(
            &LoadRequest::new(InputSource::Stdin, EMAIL),
            corrupt.as_bytes(),
            &mut ctx,
        )
        .unwrap_err();

    assert_eq!(err.line(), Some(11));
    assert!(ctx.get_error_msgs().contains("Failure on line 11 of the input file"));
    let conn = loader.store().connection();
    assert_eq!(count(conn, "trip"), 0);
    assert_eq!(count(conn, "position"), 0);
}
