//! Versioned schema migrations
//!
//! Migrations are applied in order inside one transaction each and recorded
//! in `schema_migrations`, so opening an existing database only applies what
//! is missing.

use rusqlite::{Connection, params};
use tracing::{debug, info};

use crate::Result;

/// Ordered migrations; versions must be strictly increasing
pub const MIGRATIONS: &[(i64, &str)] = &[
    (
        1,
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_email TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS trip (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id),
            trip_name TEXT,
            trip_date TEXT,
            vessel_name TEXT,
            load_time TEXT,
            load_file TEXT
        );

        CREATE TABLE IF NOT EXISTS position (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            trip_id INTEGER NOT NULL REFERENCES trip(id) ON DELETE CASCADE,
            pos_time_utc TEXT NOT NULL,
            latitude REAL NOT NULL,
            longitude REAL NOT NULL,
            erroneous INTEGER NOT NULL DEFAULT 0
        );
        CREATE INDEX IF NOT EXISTS position_trip_id ON position(trip_id);

        CREATE TABLE IF NOT EXISTS depth (
            position_id INTEGER NOT NULL REFERENCES position(id) ON DELETE CASCADE,
            depth REAL NOT NULL
        );
        CREATE INDEX IF NOT EXISTS depth_position_id ON depth(position_id);

        CREATE TABLE IF NOT EXISTS wind (
            position_id INTEGER NOT NULL REFERENCES position(id) ON DELETE CASCADE,
            speed REAL NOT NULL,
            angle INTEGER NOT NULL,
            true_apparent INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS wind_position_id ON wind(position_id);

        CREATE TABLE IF NOT EXISTS water_speed (
            position_id INTEGER NOT NULL REFERENCES position(id) ON DELETE CASCADE,
            speed REAL NOT NULL
        );
        CREATE INDEX IF NOT EXISTS water_speed_position_id ON water_speed(position_id);

        CREATE TABLE IF NOT EXISTS ground_speed_course (
            position_id INTEGER NOT NULL REFERENCES position(id) ON DELETE CASCADE,
            speed REAL NOT NULL,
            course REAL NOT NULL
        );
        CREATE INDEX IF NOT EXISTS ground_speed_course_position_id
            ON ground_speed_course(position_id);
        "#,
    ),
    (
        2,
        r#"
        -- Filled in by the display range routines after each load
        ALTER TABLE position ADD COLUMN display_range INTEGER;
        ALTER TABLE depth ADD COLUMN display_range INTEGER;
        "#,
    ),
];

/// Bring the schema up to the latest migration
pub fn ensure_schema(conn: &mut Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (version INTEGER PRIMARY KEY, applied_at INTEGER NOT NULL)",
        [],
    )?;
    let current = current_version(conn)?;

    for &(version, sql) in MIGRATIONS {
        if version <= current {
            continue;
        }
        debug!("Applying schema migration {}", version);
        let tx = conn.transaction()?;
        tx.execute_batch(sql)?;
        tx.execute(
            "INSERT INTO schema_migrations(version, applied_at) VALUES (?1, strftime('%s','now'))",
            params![version],
        )?;
        tx.commit()?;
        info!("Schema migrated to version {}", version);
    }

    Ok(())
}

/// Highest applied migration, 0 for a fresh database
pub fn current_version(conn: &Connection) -> Result<i64> {
    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Latest migration version known to this build
pub fn latest_version() -> i64 {
    MIGRATIONS.last().map(|(version, _)| *version).unwrap_or(0)
}
