//! Post-load display range recomputation
//!
//! Display ranges are computed by database routines this crate does not own.
//! After a trip's data is committed the loader hands the trip id to a
//! [`DisplayRanges`] implementation once; its result is not inspected.

use rusqlite::{Connection, params};
use tracing::debug;

use crate::Result;
use crate::config::DisplayRangeConfig;
use crate::models::TripId;

/// Collaborator that recomputes derived display ranges for a trip
pub trait DisplayRanges {
    fn recompute(&self, conn: &Connection, trip_id: TripId) -> Result<()>;
}

impl<T: DisplayRanges + ?Sized> DisplayRanges for &T {
    fn recompute(&self, conn: &Connection, trip_id: TripId) -> Result<()> {
        (**self).recompute(conn, trip_id)
    }
}

/// Runs a configured list of SQL statements with the trip id bound to `?1`
///
/// Statements without parameters run as-is. An empty list does nothing.
#[derive(Debug, Clone, Default)]
pub struct SqlRoutines {
    statements: Vec<String>,
}

impl SqlRoutines {
    pub fn new(statements: Vec<String>) -> Self {
        Self { statements }
    }

    pub fn from_config(config: &DisplayRangeConfig) -> Self {
        Self::new(config.routines.clone())
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn statements(&self) -> &[String] {
        &self.statements
    }
}

impl DisplayRanges for SqlRoutines {
    fn recompute(&self, conn: &Connection, trip_id: TripId) -> Result<()> {
        for sql in &self.statements {
            debug!("Running display range routine for trip {}: {}", trip_id, sql);
            let mut stmt = conn.prepare(sql)?;
            let mut rows = if stmt.parameter_count() == 0 {
                stmt.query([])?
            } else {
                stmt.query(params![trip_id])?
            };
            // Routines may return rows; step through them and discard the values
            while rows.next()?.is_some() {}
        }
        Ok(())
    }
}
