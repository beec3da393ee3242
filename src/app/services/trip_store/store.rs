//! Connection handling and scoped load transactions
//!
//! A load runs inside a [`StoreTransaction`] started with `BEGIN IMMEDIATE`,
//! which takes the database write lock up front. Two reloads of the same trip
//! therefore never interleave: the second one waits (up to the busy timeout)
//! until the first commits or rolls back. Dropping a transaction without
//! committing rolls it back.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, Transaction, TransactionBehavior, params};
use tracing::{debug, info};

use super::schema::ensure_schema;
use crate::app::services::sentence_parser::sink::RecordSink;
use crate::config::DatabaseConfig;
use crate::models::{
    NewDepth, NewGroundSpeedCourse, NewPosition, NewWaterSpeed, NewWind, PositionId,
    TripId, TripMetadata, TripRecord, UserId,
};
use crate::{Error, Result};

/// Owner of the SQLite connection
#[derive(Debug)]
pub struct TripStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl TripStore {
    /// Open the configured database, creating it and its schema if needed
    pub fn open(config: &DatabaseConfig) -> Result<Self> {
        Self::open_path(&config.path, Duration::from_millis(config.busy_timeout_ms))
    }

    /// Open a database file with the given busy timeout
    pub fn open_path(path: &Path, busy_timeout: Duration) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::io(
                    format!("Failed to create database directory {}", parent.display()),
                    e,
                )
            })?;
        }

        info!("Opening trip database: {}", path.display());
        let conn = Connection::open(path)?;
        conn.busy_timeout(busy_timeout)?;
        Self::init(conn, Some(path.to_path_buf()))
    }

    /// Create an in-memory database (for testing)
    pub fn in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?, None)
    }

    fn init(mut conn: Connection, path: Option<PathBuf>) -> Result<Self> {
        // Measurement rows go away with their position only when enforced
        conn.pragma_update(None, "foreign_keys", true)?;
        ensure_schema(&mut conn)?;
        Ok(Self { conn, path })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Start a write transaction holding the database write lock
    pub fn begin(&mut self) -> Result<StoreTransaction<'_>> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        Ok(StoreTransaction { tx })
    }

    /// Register a user; returns the existing id if the email is known
    pub fn add_user(&mut self, email: &str) -> Result<UserId> {
        let tx = self.begin()?;
        tx.tx.execute(
            "INSERT OR IGNORE INTO users (user_email) VALUES (?1)",
            params![email],
        )?;
        let id = tx
            .find_user_id(email)?
            .ok_or_else(|| Error::unknown_user(email))?;
        tx.commit()?;
        Ok(id)
    }

    /// Look up a user id by email outside of a load
    pub fn find_user_id(&self, email: &str) -> Result<Option<UserId>> {
        find_user_id(&self.conn, email)
    }
}

/// Scoped write transaction; rolls back on drop unless committed
pub struct StoreTransaction<'conn> {
    tx: Transaction<'conn>,
}

impl StoreTransaction<'_> {
    /// Underlying connection, for collaborators that issue their own SQL
    pub fn connection(&self) -> &Connection {
        &self.tx
    }

    pub fn find_user_id(&self, email: &str) -> Result<Option<UserId>> {
        find_user_id(&self.tx, email)
    }

    /// Read a trip row inside the write lock
    pub fn lock_trip(&self, trip_id: TripId) -> Result<Option<TripRecord>> {
        let record = self
            .tx
            .query_row(
                "SELECT id, user_id, trip_name, trip_date, vessel_name, load_time, load_file \
                 FROM trip WHERE id = ?1",
                params![trip_id],
                |row| {
                    Ok(TripRecord {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        name: row.get(2)?,
                        date: row.get::<_, Option<NaiveDate>>(3)?,
                        vessel_name: row.get(4)?,
                        load_time: row.get::<_, Option<DateTime<Utc>>>(5)?,
                        load_file: row.get(6)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    /// Insert a new trip, stamping load metadata
    pub fn insert_trip(
        &self,
        user_id: UserId,
        metadata: &TripMetadata,
        load_file: &str,
    ) -> Result<TripId> {
        self.tx.execute(
            "INSERT INTO trip (user_id, trip_name, trip_date, vessel_name, load_time, load_file) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user_id,
                metadata.name,
                metadata.date,
                metadata.vessel_name,
                Utc::now(),
                load_file
            ],
        )?;
        let trip_id = self.tx.last_insert_rowid();
        debug!("Inserted trip {}", trip_id);
        Ok(trip_id)
    }

    /// Overwrite trip metadata and stamp load metadata
    pub fn update_trip(
        &self,
        trip_id: TripId,
        metadata: &TripMetadata,
        load_file: &str,
    ) -> Result<()> {
        let updated = self.tx.execute(
            "UPDATE trip SET trip_name = ?1, trip_date = ?2, vessel_name = ?3, \
             load_time = ?4, load_file = ?5 WHERE id = ?6",
            params![
                metadata.name,
                metadata.date,
                metadata.vessel_name,
                Utc::now(),
                load_file,
                trip_id
            ],
        )?;
        if updated == 0 {
            return Err(Error::trip_not_found(trip_id));
        }
        Ok(())
    }

    /// Delete every position of a trip; measurements cascade
    pub fn delete_positions(&self, trip_id: TripId) -> Result<usize> {
        let deleted = self
            .tx
            .execute("DELETE FROM position WHERE trip_id = ?1", params![trip_id])?;
        debug!("Deleted {} positions of trip {}", deleted, trip_id);
        Ok(deleted)
    }

    pub fn commit(self) -> Result<()> {
        self.tx.commit()?;
        Ok(())
    }

    pub fn rollback(self) -> Result<()> {
        self.tx.rollback()?;
        Ok(())
    }
}

impl RecordSink for StoreTransaction<'_> {
    fn insert_position(&mut self, position: &NewPosition) -> Result<PositionId> {
        let mut stmt = self.tx.prepare_cached(
            "INSERT INTO position (pos_time_utc, trip_id, latitude, longitude) \
             VALUES (?1, ?2, ?3, ?4)",
        )?;
        stmt.execute(params![
            position.time_utc,
            position.trip_id,
            position.latitude,
            position.longitude
        ])?;
        Ok(self.tx.last_insert_rowid())
    }

    fn insert_depth(&mut self, depth: &NewDepth) -> Result<()> {
        self.tx
            .prepare_cached("INSERT INTO depth (position_id, depth) VALUES (?1, ?2)")?
            .execute(params![depth.position_id, depth.depth])?;
        Ok(())
    }

    fn insert_wind(&mut self, wind: &NewWind) -> Result<()> {
        self.tx
            .prepare_cached(
                "INSERT INTO wind (position_id, speed, angle, true_apparent) \
                 VALUES (?1, ?2, ?3, ?4)",
            )?
            .execute(params![
                wind.position_id,
                wind.speed,
                wind.angle,
                wind.true_wind
            ])?;
        Ok(())
    }

    fn insert_water_speed(&mut self, speed: &NewWaterSpeed) -> Result<()> {
        self.tx
            .prepare_cached("INSERT INTO water_speed (position_id, speed) VALUES (?1, ?2)")?
            .execute(params![speed.position_id, speed.speed])?;
        Ok(())
    }

    fn insert_ground_speed_course(&mut self, value: &NewGroundSpeedCourse) -> Result<()> {
        self.tx
            .prepare_cached(
                "INSERT INTO ground_speed_course (position_id, speed, course) \
                 VALUES (?1, ?2, ?3)",
            )?
            .execute(params![value.position_id, value.speed, value.course])?;
        Ok(())
    }
}

fn find_user_id(conn: &Connection, email: &str) -> Result<Option<UserId>> {
    let id = conn
        .query_row(
            "SELECT id FROM users WHERE user_email = ?1",
            params![email],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}
