//! Fixtures for trip loader testing
//!
//! Loads run against an in-memory store with one registered user. Display
//! range collaborators either record their calls or fail on demand.
//! `CancelAfter` requests cancellation partway through a stream.

use std::cell::RefCell;
use std::io::Write;

use flate2::Compression;
use flate2::write::GzEncoder;
use rusqlite::Connection;

use crate::app::services::trip_loader::{BufferedContext, LoadContext};
use crate::app::services::trip_store::{DisplayRanges, TripStore};
use crate::models::{InputSource, LoadRequest, TripId};
use crate::{Error, Result};

mod metadata_tests;

pub const EMAIL: &str = "skipper@example.com";
pub const LOG_FILE: &str = "log-2016-07-02.nmea";

pub fn store() -> TripStore {
    let mut store = TripStore::in_memory().unwrap();
    store.add_user(EMAIL).unwrap();
    store
}

pub fn request() -> LoadRequest {
    LoadRequest::new(InputSource::File(LOG_FILE.into()), EMAIL)
}

/// Two fixes around a dropout, one measurement before the first fix
pub fn sample_nmea() -> String {
    [
        "$IIDBT,,f,2.0,M,,",
        "$GPGLL,6009.500,N,02456.100,E,123500,A*4F",
        "$IIDBT,,f,3.5,M,,",
        "$IIMWV,45,T,12,N,A",
        "$IIVHW,,T,,M,5.2,N,9.6,K",
        "$IIVTG,226.95,T,226.95,M,5.80,N,,,D*69",
        "$GPGLL,,,,,123505,V",
        "$IIDBT,,f,3.6,M,,",
        "$GPGLL,6009.600,N,02456.200,E,123510,A",
        "$IIDBT,,f,11.5,F,,",
    ]
    .join("\r\n")
}

pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

pub fn count_rows(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
        row.get(0)
    })
    .unwrap()
}

/// Row counts of every trip-scoped table, in a fixed order
pub fn table_counts(conn: &Connection) -> Vec<i64> {
    [
        "trip",
        "position",
        "depth",
        "wind",
        "water_speed",
        "ground_speed_course",
    ]
    .iter()
    .map(|table| count_rows(conn, table))
    .collect()
}

/// Records every trip it is asked to recompute
#[derive(Debug, Default)]
pub struct RecordingRanges {
    pub calls: RefCell<Vec<TripId>>,
}

impl DisplayRanges for RecordingRanges {
    fn recompute(&self, _conn: &Connection, trip_id: TripId) -> Result<()> {
        self.calls.borrow_mut().push(trip_id);
        Ok(())
    }
}

/// Always fails, standing in for a broken routine
pub struct FailingRanges;

impl DisplayRanges for FailingRanges {
    fn recompute(&self, _conn: &Connection, _trip_id: TripId) -> Result<()> {
        Err(Error::configuration("display range routine failed"))
    }
}

/// Buffers messages and reports cancellation once `after` lines were read
pub struct CancelAfter {
    pub inner: BufferedContext,
    after: usize,
    lines_read: usize,
}

impl CancelAfter {
    pub fn new(after: usize) -> Self {
        Self {
            inner: BufferedContext::new(),
            after,
            lines_read: 0,
        }
    }
}

impl LoadContext for CancelAfter {
    fn log(&mut self, message: &str) {
        self.inner.log(message);
    }

    fn log_err(&mut self, message: &str) {
        self.inner.log_err(message);
    }

    fn progress(&mut self, lines_read: usize) {
        self.lines_read = lines_read;
    }

    fn is_cancelled(&self) -> bool {
        self.lines_read >= self.after
    }
}
