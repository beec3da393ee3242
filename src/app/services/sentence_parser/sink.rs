//! Insert-only persistence seam for the record writers

use crate::Result;
use crate::models::{
    NewDepth, NewGroundSpeedCourse, NewPosition, NewWaterSpeed, NewWind, PositionId,
};

/// Destination for parsed rows
///
/// Implemented by the store's load transaction. Every call is exactly one
/// insert; nothing is ever updated through this trait.
pub trait RecordSink {
    /// Insert a fix and return its generated id
    fn insert_position(&mut self, position: &NewPosition) -> Result<PositionId>;

    fn insert_depth(&mut self, depth: &NewDepth) -> Result<()>;

    fn insert_wind(&mut self, wind: &NewWind) -> Result<()>;

    fn insert_water_speed(&mut self, speed: &NewWaterSpeed) -> Result<()>;

    fn insert_ground_speed_course(&mut self, value: &NewGroundSpeedCourse) -> Result<()>;
}
