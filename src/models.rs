//! Core data structures and types for trip loading.
//!
//! Defines the identifiers, the typed rows written by the record writers,
//! the stored trip record, and the caller-supplied load request.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Database id of a user
pub type UserId = i64;

/// Database id of a trip
pub type TripId = i64;

/// Database id of a position; the join key for all measurement rows
pub type PositionId = i64;

/// A valid GPS fix ready to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewPosition {
    pub trip_id: TripId,
    pub time_utc: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
}

/// Depth below transducer in meters
#[derive(Debug, Clone, PartialEq)]
pub struct NewDepth {
    pub position_id: PositionId,
    pub depth: f64,
}

/// Wind measurement; speed is in m/s after unit conversion
#[derive(Debug, Clone, PartialEq)]
pub struct NewWind {
    pub position_id: PositionId,
    pub speed: f64,
    pub angle: i32,
    /// True wind when set, apparent wind otherwise
    pub true_wind: bool,
}

/// Speed through water in knots
#[derive(Debug, Clone, PartialEq)]
pub struct NewWaterSpeed {
    pub position_id: PositionId,
    pub speed: f64,
}

/// Speed (knots) and course (degrees) over ground
#[derive(Debug, Clone, PartialEq)]
pub struct NewGroundSpeedCourse {
    pub position_id: PositionId,
    pub speed: f64,
    pub course: f64,
}

/// Trip row as stored
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    pub id: TripId,
    pub user_id: UserId,
    pub name: Option<String>,
    pub date: Option<NaiveDate>,
    pub vessel_name: Option<String>,
    pub load_time: Option<DateTime<Utc>>,
    pub load_file: Option<String>,
}

/// Resolved trip metadata written on create or reload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripMetadata {
    pub name: String,
    pub date: NaiveDate,
    pub vessel_name: Option<String>,
}

/// Where sentences are read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    /// Interpret a command-line input argument; "-" denotes standard input
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            InputSource::Stdin
        } else {
            InputSource::File(PathBuf::from(arg))
        }
    }

    /// Name recorded as the trip's load file
    pub fn printable_name(&self) -> String {
        match self {
            InputSource::Stdin => "stdin".to_string(),
            InputSource::File(path) => path.to_string_lossy().into_owned(),
        }
    }

    /// Raw name used for deriving default trip name and date
    pub fn file_name_hint(&self) -> Option<String> {
        match self {
            InputSource::Stdin => None,
            InputSource::File(path) => Some(path.to_string_lossy().into_owned()),
        }
    }
}

/// Caller-supplied parameters for one load
#[derive(Debug, Clone)]
pub struct LoadRequest {
    pub input: InputSource,
    pub user_email: String,
    pub trip_name: Option<String>,
    pub trip_date: Option<NaiveDate>,
    pub vessel_name: Option<String>,
    /// Present for a reload of an existing trip
    pub trip_id: Option<TripId>,
}

impl LoadRequest {
    /// Create a request for a new trip with no metadata overrides
    pub fn new(input: InputSource, user_email: impl Into<String>) -> Self {
        Self {
            input,
            user_email: user_email.into(),
            trip_name: None,
            trip_date: None,
            vessel_name: None,
            trip_id: None,
        }
    }

    pub fn with_trip_name(mut self, name: impl Into<String>) -> Self {
        self.trip_name = Some(name.into());
        self
    }

    pub fn with_trip_date(mut self, date: NaiveDate) -> Self {
        self.trip_date = Some(date);
        self
    }

    pub fn with_vessel_name(mut self, vessel: impl Into<String>) -> Self {
        self.vessel_name = Some(vessel.into());
        self
    }

    /// Turn the request into a reload of an existing trip
    pub fn reloading(mut self, trip_id: TripId) -> Self {
        self.trip_id = Some(trip_id);
        self
    }
}
