//! The trip load state machine
//!
//! A load moves through `Start -> TripResolved -> DataLoaded -> RangesComputed
//! -> Done`, or ends in `Failed`. Trip resolution and all position and
//! measurement writes share one transaction; nothing from them is visible
//! unless the stream yields at least one valid fix. Display ranges run in a
//! second transaction after the data commit, so a failing routine leaves the
//! data committed without ranges. A context that reports cancellation stops
//! the stream between lines and the data transaction rolls back.

use std::io::BufRead;
use std::time::{Duration, Instant};

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{debug, error, info};

use super::context::LoadContext;
use super::metadata::{merge_trip_metadata, new_trip_metadata};
use super::source::{lossy_lines, open_source};
use crate::app::services::sentence_parser::{LoadStats, TripContext, ingest_lines};
use crate::app::services::trip_store::{DisplayRanges, TripStore};
use crate::models::{LoadRequest, TripId};
use crate::{Error, Result};

/// Where a load currently is, or where it stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoadPhase {
    Start,
    TripResolved,
    DataLoaded,
    RangesComputed,
    Done,
    Failed,
}

/// Result of a successful load
#[derive(Debug, Clone, Serialize)]
pub struct LoadSummary {
    pub trip_id: TripId,
    pub source_name: String,
    /// Set when an existing trip was replaced
    pub reloaded: bool,
    pub stats: LoadStats,
    pub elapsed: Duration,
}

/// Loads NMEA streams into trips of one store
pub struct TripLoader<'s, R: DisplayRanges> {
    store: &'s mut TripStore,
    ranges: R,
    phase: LoadPhase,
}

impl<'s, R: DisplayRanges> TripLoader<'s, R> {
    pub fn new(store: &'s mut TripStore, ranges: R) -> Self {
        Self {
            store,
            ranges,
            phase: LoadPhase::Start,
        }
    }

    /// Phase reached by the most recent load
    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn store(&self) -> &TripStore {
        self.store
    }

    /// Open the request's input and load it
    pub fn load(
        &mut self,
        request: &LoadRequest,
        ctx: &mut dyn LoadContext,
    ) -> Result<LoadSummary> {
        match open_source(&request.input) {
            Ok(reader) => self.load_from_reader(request, reader, ctx),
            Err(e) => {
                self.enter(LoadPhase::Start);
                Err(self.fail(e, ctx))
            }
        }
    }

    /// Load from an already opened reader; `request.input` only names it
    pub fn load_from_reader<B: BufRead>(
        &mut self,
        request: &LoadRequest,
        reader: B,
        ctx: &mut dyn LoadContext,
    ) -> Result<LoadSummary> {
        let start_time = Instant::now();
        self.enter(LoadPhase::Start);

        match self.run(request, reader, ctx, Local::now().date_naive()) {
            Ok(mut summary) => {
                ctx.finish();
                self.enter(LoadPhase::Done);
                ctx.log("Done.");
                summary.elapsed = start_time.elapsed();
                info!(
                    "Loaded trip {}: {} positions, {} measurements in {:.2}s",
                    summary.trip_id,
                    summary.stats.valid_positions(),
                    summary.stats.measurements(),
                    summary.elapsed.as_secs_f64()
                );
                Ok(summary)
            }
            Err(e) => Err(self.fail(e, ctx)),
        }
    }

    fn run<B: BufRead>(
        &mut self,
        request: &LoadRequest,
        reader: B,
        ctx: &mut dyn LoadContext,
        today: NaiveDate,
    ) -> Result<LoadSummary> {
        let source_name = request.input.printable_name();
        let mut tx = self.store.begin()?;

        let user_id = tx
            .find_user_id(&request.user_email)?
            .ok_or_else(|| Error::unknown_user(&request.user_email))?;

        let (trip_id, metadata) = match request.trip_id {
            Some(trip_id) => {
                ctx.log(&format!("Updating trip information (id {})", trip_id));
                let stored = tx
                    .lock_trip(trip_id)?
                    .ok_or_else(|| Error::trip_not_found(trip_id))?;
                let metadata = merge_trip_metadata(request, &stored, today);
                tx.update_trip(trip_id, &metadata, &source_name)?;
                tx.delete_positions(trip_id)?;
                (trip_id, metadata)
            }
            None => {
                let metadata = new_trip_metadata(request, today);
                let trip_id = tx.insert_trip(user_id, &metadata, &source_name)?;
                (trip_id, metadata)
            }
        };
        debug!("Resolved trip {} as {:?}", trip_id, metadata);
        enter(&mut self.phase, LoadPhase::TripResolved);

        ctx.log(&format!("Loading data from {} ...", source_name));
        let trip = TripContext::new(trip_id, metadata.date);
        let stats = ingest_lines(&mut tx, &trip, lossy_lines(reader), |lines_read| {
            ctx.progress(lines_read);
            if ctx.is_cancelled() {
                return Err(Error::Interrupted);
            }
            Ok(())
        })?;

        if stats.valid_positions() == 0 {
            return Err(Error::EmptyTrip);
        }
        tx.commit()?;
        enter(&mut self.phase, LoadPhase::DataLoaded);

        ctx.log("Loaded. Now performing display range modifications ...");
        let tx = self.store.begin()?;
        self.ranges.recompute(tx.connection(), trip_id)?;
        tx.commit()?;
        enter(&mut self.phase, LoadPhase::RangesComputed);

        Ok(LoadSummary {
            trip_id,
            source_name,
            reloaded: request.trip_id.is_some(),
            stats,
            elapsed: Duration::ZERO,
        })
    }

    fn enter(&mut self, phase: LoadPhase) {
        enter(&mut self.phase, phase);
    }

    fn fail(&mut self, e: Error, ctx: &mut dyn LoadContext) -> Error {
        let reached = self.phase;
        self.enter(LoadPhase::Failed);
        ctx.finish();
        error!("Load failed after {:?}: {}", reached, e);
        ctx.log_err(&format!("Loading data failed: {}", e));
        e
    }
}

// Callable while a transaction still borrows `self.store`
fn enter(current: &mut LoadPhase, next: LoadPhase) {
    debug!("Load phase {:?} -> {:?}", current, next);
    *current = next;
}
