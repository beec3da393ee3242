//! Per-load statistics for sentence ingestion
//!
//! Counts what each line turned into so a load can be summarized and the
//! zero-valid-fixes rule can be checked.

use serde::Serialize;

use super::sentence::SentenceKind;
use super::writers::{RecordOutcome, SkipReason};

/// Counters for one pass over an input stream
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    /// Lines read from the input
    pub lines_read: usize,

    /// Rows inserted per kind
    pub positions: usize,
    pub depths: usize,
    pub winds: usize,
    pub water_speeds: usize,
    pub ground_speed_courses: usize,

    /// Fix sentences without coordinates
    pub fix_dropouts: usize,

    /// Measurements discarded because no fix had been written yet
    pub measurements_before_fix: usize,

    /// Measurements with empty or too few fields
    pub incomplete_measurements: usize,

    /// Depths in a unit other than meters
    pub unsupported_units: usize,

    /// Lines with an unrecognized tag, including blank lines
    pub ignored_lines: usize,
}

impl LoadStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one line outcome
    pub fn record(&mut self, outcome: &RecordOutcome) {
        match outcome {
            RecordOutcome::Inserted(kind) => match kind {
                SentenceKind::Position => self.positions += 1,
                SentenceKind::Depth => self.depths += 1,
                SentenceKind::Wind => self.winds += 1,
                SentenceKind::WaterSpeed => self.water_speeds += 1,
                SentenceKind::GroundSpeedCourse => self.ground_speed_courses += 1,
            },
            RecordOutcome::Skipped(_, reason) => match reason {
                SkipReason::NoFix => self.fix_dropouts += 1,
                SkipReason::NoCurrentPosition => self.measurements_before_fix += 1,
                SkipReason::TooFewFields | SkipReason::MissingValues => {
                    self.incomplete_measurements += 1
                }
                SkipReason::UnsupportedUnit => self.unsupported_units += 1,
            },
            RecordOutcome::Ignored => self.ignored_lines += 1,
        }
    }

    /// Number of valid fixes written
    pub fn valid_positions(&self) -> usize {
        self.positions
    }

    /// Number of measurement rows written
    pub fn measurements(&self) -> usize {
        self.depths + self.winds + self.water_speeds + self.ground_speed_courses
    }

    /// Total rows written across all tables
    pub fn rows_inserted(&self) -> usize {
        self.positions + self.measurements()
    }

    /// Total recognized sentences that produced no row
    pub fn skipped(&self) -> usize {
        self.fix_dropouts
            + self.measurements_before_fix
            + self.incomplete_measurements
            + self.unsupported_units
    }
}
