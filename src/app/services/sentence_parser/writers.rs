//! Record writers, one per recognized sentence type
//!
//! Each writer validates its own fields and either performs exactly one
//! insert through the [`RecordSink`] or reports why it skipped. Skips are
//! ordinary outcomes; only corrupt input and the strict speed units on water
//! speed and ground speed/course sentences are errors, and those abort the
//! whole load.
//!
//! Field layout (tag is field 0):
//! - `$GPGLL,lat,N|S,lon,E|W,hhmmss[.ss],status`
//! - `$IIDBT,feet,f,meters,M,fathoms,F`
//! - `$IIMWV,angle,T|R,speed,N|K|M,status`
//! - `$IIVHW,true_hdg,T,mag_hdg,M,knots,N,kmh,K`
//! - `$IIVTG,course,T,mag_course,M,knots,N,kmh,K`

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use super::coordinates;
use super::sentence::{Sentence, SentenceKind, parse_number};
use super::sink::RecordSink;
use crate::constants::{min_fields, units};
use crate::models::{
    NewDepth, NewGroundSpeedCourse, NewPosition, NewWaterSpeed, NewWind, PositionId, TripId,
};
use crate::{Error, Result};

/// Trip-level values every fix needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripContext {
    pub trip_id: TripId,
    /// Nominal trip date; fixes only carry a time of day
    pub trip_date: NaiveDate,
}

impl TripContext {
    pub fn new(trip_id: TripId, trip_date: NaiveDate) -> Self {
        Self { trip_id, trip_date }
    }
}

/// Why a recognized sentence produced no row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SkipReason {
    /// Fix sentence without coordinates (no GPS lock)
    NoFix,
    /// Measurement seen before any fix was written
    NoCurrentPosition,
    /// Sentence shorter than its minimum field count
    TooFewFields,
    /// Optional measurement fields were empty
    MissingValues,
    /// Depth in a unit other than meters
    UnsupportedUnit,
}

/// Result of processing one line
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecordOutcome {
    /// A row of this kind was inserted
    Inserted(SentenceKind),
    /// A recognized sentence was dropped without error
    Skipped(SentenceKind, SkipReason),
    /// Unrecognized tag or blank line
    Ignored,
}

/// Write a fix sentence as a position
///
/// Returns the new position id, or `None` when the sentence carries no fix.
pub fn write_position<S: RecordSink + ?Sized>(
    sink: &mut S,
    trip: &TripContext,
    sentence: &Sentence<'_>,
) -> Result<Option<PositionId>> {
    if sentence.len() < min_fields::POSITION {
        debug!("Fix sentence with {} fields, no fix", sentence.len());
        return Ok(None);
    }

    // Empty coordinates are expected until the receiver has a lock
    if sentence.is_blank(1) || sentence.is_blank(3) {
        return Ok(None);
    }

    let latitude = coordinates::latitude(sentence.field(1), sentence.field(2))
        .map_err(|e| Error::invalid_position(e.to_string()))?;
    let longitude = coordinates::longitude(sentence.field(3), sentence.field(4))
        .map_err(|e| Error::invalid_position(e.to_string()))?;
    let time_utc = fix_timestamp(trip.trip_date, sentence.field(5))?;

    let position_id = sink.insert_position(&NewPosition {
        trip_id: trip.trip_id,
        time_utc,
        latitude,
        longitude,
    })?;
    Ok(Some(position_id))
}

/// Combine the trip date with the HHMMSS prefix of a fix time field
pub fn fix_timestamp(date: NaiveDate, time_field: &str) -> Result<DateTime<Utc>> {
    let hhmmss = time_field
        .get(..6)
        .filter(|s| s.bytes().all(|b| b.is_ascii_digit()))
        .ok_or_else(|| {
            Error::invalid_position(format!("invalid fix time '{}'", time_field))
        })?;

    // All six bytes are ASCII digits, so these parses cannot fail
    let part = |range: std::ops::Range<usize>| hhmmss[range].parse::<u32>().unwrap_or(0);
    let (hour, minute, second) = (part(0..2), part(2..4), part(4..6));
    let time = if second == 60 {
        // Leap second; chrono represents it as :59 plus 1000 ms
        NaiveTime::from_hms_milli_opt(hour, minute, 59, 1_000)
    } else {
        NaiveTime::from_hms_opt(hour, minute, second)
    }
    .ok_or_else(|| Error::invalid_position(format!("fix time '{}' out of range", time_field)))?;

    Ok(date.and_time(time).and_utc())
}

/// Write a depth-below-transducer sentence; only meters are stored
pub fn write_depth<S: RecordSink + ?Sized>(
    sink: &mut S,
    current: Option<PositionId>,
    sentence: &Sentence<'_>,
) -> Result<RecordOutcome> {
    let kind = SentenceKind::Depth;
    let position_id = match precondition(kind, current, sentence, min_fields::DEPTH) {
        Ok(id) => id,
        Err(skip) => return Ok(skip),
    };

    if sentence.is_blank(3) || sentence.is_blank(4) {
        return Ok(RecordOutcome::Skipped(kind, SkipReason::MissingValues));
    }

    let depth = sentence.number(3, "depth")?;
    let unit = sentence.field(4);
    if unit != units::METERS {
        debug!("Discarding depth {} in unsupported unit '{}'", depth, unit);
        return Ok(RecordOutcome::Skipped(kind, SkipReason::UnsupportedUnit));
    }

    sink.insert_depth(&NewDepth { position_id, depth })?;
    Ok(RecordOutcome::Inserted(kind))
}

/// Write a wind speed and angle sentence
///
/// Knots and km/h are converted; any other unit is taken as m/s.
pub fn write_wind<S: RecordSink + ?Sized>(
    sink: &mut S,
    current: Option<PositionId>,
    sentence: &Sentence<'_>,
) -> Result<RecordOutcome> {
    let kind = SentenceKind::Wind;
    let position_id = match precondition(kind, current, sentence, min_fields::WIND) {
        Ok(id) => id,
        Err(skip) => return Ok(skip),
    };

    if sentence.is_blank(1) || sentence.is_blank(3) {
        return Ok(RecordOutcome::Skipped(kind, SkipReason::MissingValues));
    }

    let angle = wind_angle(sentence.field(1))?;
    let true_wind = sentence.field(2) == units::TRUE_REFERENCE;
    let raw_speed = sentence.number(3, "wind speed")?;
    let speed = match sentence.field(4) {
        units::KNOTS => raw_speed / units::KNOTS_DIVISOR,
        units::KILOMETERS_PER_HOUR => raw_speed / units::KMH_DIVISOR,
        _ => raw_speed,
    };

    sink.insert_wind(&NewWind {
        position_id,
        speed,
        angle,
        true_wind,
    })?;
    Ok(RecordOutcome::Inserted(kind))
}

/// Wind angles are stored as whole degrees; fractional input is truncated
/// and values outside the `i32` range are rejected
fn wind_angle(value: &str) -> Result<i32> {
    if let Ok(angle) = value.parse::<i32>() {
        return Ok(angle);
    }
    let angle = parse_number("wind angle", value)?.trunc();
    if !(i32::MIN as f64..=i32::MAX as f64).contains(&angle) {
        return Err(Error::invalid_field("wind angle", value));
    }
    Ok(angle as i32)
}

/// Write a water speed sentence; the speed must be in knots
pub fn write_water_speed<S: RecordSink + ?Sized>(
    sink: &mut S,
    current: Option<PositionId>,
    sentence: &Sentence<'_>,
) -> Result<RecordOutcome> {
    let kind = SentenceKind::WaterSpeed;
    let position_id = match precondition(kind, current, sentence, min_fields::WATER_SPEED) {
        Ok(id) => id,
        Err(skip) => return Ok(skip),
    };

    require_knots(kind, sentence.field(6))?;
    let speed = sentence.number(5, "water speed")?;

    sink.insert_water_speed(&NewWaterSpeed { position_id, speed })?;
    Ok(RecordOutcome::Inserted(kind))
}

/// Write a course and speed over ground sentence; the speed must be in knots
pub fn write_ground_speed_course<S: RecordSink + ?Sized>(
    sink: &mut S,
    current: Option<PositionId>,
    sentence: &Sentence<'_>,
) -> Result<RecordOutcome> {
    let kind = SentenceKind::GroundSpeedCourse;
    let position_id = match precondition(kind, current, sentence, min_fields::GROUND_SPEED_COURSE)
    {
        Ok(id) => id,
        Err(skip) => return Ok(skip),
    };

    if sentence.is_blank(1) || sentence.is_blank(5) {
        return Ok(RecordOutcome::Skipped(kind, SkipReason::MissingValues));
    }

    require_knots(kind, sentence.field(6))?;
    let course = sentence.number(1, "course over ground")?;
    let speed = sentence.number(5, "speed over ground")?;

    sink.insert_ground_speed_course(&NewGroundSpeedCourse {
        position_id,
        speed,
        course,
    })?;
    Ok(RecordOutcome::Inserted(kind))
}

/// Shared measurement precondition: a fix exists and the sentence is long enough
fn precondition(
    kind: SentenceKind,
    current: Option<PositionId>,
    sentence: &Sentence<'_>,
    min_len: usize,
) -> std::result::Result<PositionId, RecordOutcome> {
    let Some(position_id) = current else {
        return Err(RecordOutcome::Skipped(kind, SkipReason::NoCurrentPosition));
    };
    if sentence.len() < min_len {
        return Err(RecordOutcome::Skipped(kind, SkipReason::TooFewFields));
    }
    Ok(position_id)
}

fn require_knots(kind: SentenceKind, unit: &str) -> Result<()> {
    if unit != units::KNOTS {
        warn!("Rejecting {} sentence with speed unit '{}'", kind.label(), unit);
        return Err(Error::unit(kind.label(), unit));
    }
    Ok(())
}
