//! Test fixtures for trip store testing
//!
//! All tests run against an in-memory SQLite database with the full schema.

use chrono::NaiveDate;
use rusqlite::{Connection, params};

use crate::app::services::trip_store::TripStore;
use crate::models::{PositionId, TripId, TripMetadata};


/// Fresh in-memory store with one registered user
pub fn store_with_user(email: &str) -> TripStore {
    let mut store = TripStore::in_memory().unwrap();
    store.add_user(email).unwrap();
    store
}

pub fn metadata(name: &str) -> TripMetadata {
    TripMetadata {
        name: name.to_string(),
        date: NaiveDate::from_ymd_opt(2016, 7, 2).unwrap(),
        vessel_name: Some("Aurora".to_string()),
    }
}

pub fn count_rows(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
        row.get(0)
    })
    .unwrap()
}

/// Insert a position with one row in every measurement table
pub fn insert_full_position(conn: &Connection, trip_id: TripId) -> PositionId {
    conn.execute(
        "INSERT INTO position (pos_time_utc, trip_id, latitude, longitude) \
         VALUES ('2016-07-02 12:35:00+00:00', ?1, 60.1583, 24.935)",
        params![trip_id],
    )
    .unwrap();
    let position_id = conn.last_insert_rowid();
    conn.execute(
        "INSERT INTO depth (position_id, depth) VALUES (?1, 3.5)",
        params![position_id],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO wind (position_id, speed, angle, true_apparent) VALUES (?1, 6.0, 45, 1)",
        params![position_id],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO water_speed (position_id, speed) VALUES (?1, 5.2)",
        params![position_id],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO ground_speed_course (position_id, speed, course) VALUES (?1, 5.8, 226.95)",
        params![position_id],
    )
    .unwrap();
    position_id
}
