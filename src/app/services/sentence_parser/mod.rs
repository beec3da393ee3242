//! NMEA sentence parser for marine trip logs
//!
//! This module turns a stream of raw NMEA 0183 lines into typed rows. Fixes
//! become positions; depth, wind, water speed and ground speed/course
//! sentences become measurements attached to the most recently written fix.
//!
//! ## Architecture
//!
//! The parser is organized into logical components:
//! - [`coordinates`] - ddmm.mmm to signed decimal degree conversion
//! - [`sentence`] - Line splitting, tag recognition and field helpers
//! - [`sink`] - The insert-only persistence seam the writers write through
//! - [`writers`] - One writer per recognized sentence type
//! - [`dispatcher`] - Tag routing and the current position context
//! - [`stats`] - Per-load outcome counters
//!
//! ## Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use nmea_trip_loader::app::services::sentence_parser::{TripContext, ingest_lines};
//! use nmea_trip_loader::app::services::sentence_parser::sink::RecordSink;
//!
//! # fn example(sink: &mut impl RecordSink) -> nmea_trip_loader::Result<()> {
//! let trip = TripContext::new(1, NaiveDate::from_ymd_opt(2016, 7, 2).unwrap());
//! let lines = vec![Ok("$GPGLL,4807.038,N,01131.000,E,123519,A".to_string())];
//! let stats = ingest_lines(sink, &trip, lines, |_| Ok(()))?;
//!
//! println!("{} positions from {} lines", stats.positions, stats.lines_read);
//! # Ok(())
//! # }
//! ```

pub mod coordinates;
pub mod dispatcher;
pub mod sentence;
pub mod sink;
pub mod stats;
pub mod writers;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use dispatcher::{Dispatch, dispatch_line, ingest_lines};
pub use sentence::{Sentence, SentenceKind};
pub use sink::RecordSink;
pub use stats::LoadStats;
pub use writers::{RecordOutcome, SkipReason, TripContext};
