//! Test utilities and mock infrastructure for sentence parser testing
//!
//! Provides an in-memory record sink and fixtures shared by the test modules.

use chrono::NaiveDate;

use crate::Result;
use crate::app::services::sentence_parser::sink::RecordSink;
use crate::app::services::sentence_parser::writers::TripContext;
use crate::models::{
    NewDepth, NewGroundSpeedCourse, NewPosition, NewWaterSpeed, NewWind, PositionId,
};

// Test modules
mod coordinates_tests;

/// Record sink that keeps every row in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    pub positions: Vec<(PositionId, NewPosition)>,
    pub depths: Vec<NewDepth>,
    pub winds: Vec<NewWind>,
    pub water_speeds: Vec<NewWaterSpeed>,
    pub ground_speed_courses: Vec<NewGroundSpeedCourse>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn measurement_count(&self) -> usize {
        self.depths.len()
            + self.winds.len()
            + self.water_speeds.len()
            + self.ground_speed_courses.len()
    }
}

impl RecordSink for MemorySink {
    fn insert_position(&mut self, position: &NewPosition) -> Result<PositionId> {
        let id = self.positions.len() as PositionId + 1;
        self.positions.push((id, position.clone()));
        Ok(id)
    }

    fn insert_depth(&mut self, depth: &NewDepth) -> Result<()> {
        self.depths.push(depth.clone());
        Ok(())
    }

    fn insert_wind(&mut self, wind: &NewWind) -> Result<()> {
        self.winds.push(wind.clone());
        Ok(())
    }

    fn insert_water_speed(&mut self, speed: &NewWaterSpeed) -> Result<()> {
        self.water_speeds.push(speed.clone());
        Ok(())
    }

    fn insert_ground_speed_course(&mut self, value: &NewGroundSpeedCourse) -> Result<()> {
        self.ground_speed_courses.push(value.clone());
        Ok(())
    }
}

/// Trip context used across tests
pub fn test_trip() -> TripContext {
    TripContext::new(7, NaiveDate::from_ymd_opt(2016, 7, 2).unwrap())
}

/// A short log with a dropout, measurements before and after fixes, and noise
pub fn sample_log() -> Vec<&'static str> {
    vec![
        "$IIDBT,,f,2.0,M,,",
        "$GPGLL,,,,,123400,V",
        "$GPGLL,6009.500,N,02456.100,E,123500,A*4F",
        "$IIDBT,,f,3.5,M,,",
        "$IIMWV,45,T,12,N,A",
        "$IIVHW,,T,,M,5.2,N,9.6,K",
        "$IIVTG,226.95,T,226.95,M,5.80,N,,,D*69",
        "$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6A",
        "",
        "$GPGLL,6009.600,N,02456.200,E,123510,A",
        "$IIDBT,,f,11.5,F,,",
        "$IIMWV,,R,,N,A",
    ]
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-4,
        "expected {}, got {}",
        expected,
        actual
    );
}
