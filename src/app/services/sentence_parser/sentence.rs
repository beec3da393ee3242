//! Sentence splitting and field access
//!
//! A sentence is one input line: a tag followed by comma-separated fields.
//! Field indices follow the NMEA convention, so the tag is field 0.

use crate::constants::{
    CHECKSUM_DELIMITER, FIELD_SEPARATOR, TAG_DEPTH, TAG_GROUND_SPEED_COURSE, TAG_POSITION,
    TAG_WATER_SPEED, TAG_WIND,
};
use crate::{Error, Result};
use serde::Serialize;

/// The recognized sentence types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SentenceKind {
    Position,
    Depth,
    Wind,
    WaterSpeed,
    GroundSpeedCourse,
}

impl SentenceKind {
    /// Recognize a sentence tag; unknown tags yield `None`
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            TAG_POSITION => Some(SentenceKind::Position),
            TAG_DEPTH => Some(SentenceKind::Depth),
            TAG_WIND => Some(SentenceKind::Wind),
            TAG_WATER_SPEED => Some(SentenceKind::WaterSpeed),
            TAG_GROUND_SPEED_COURSE => Some(SentenceKind::GroundSpeedCourse),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            SentenceKind::Position => TAG_POSITION,
            SentenceKind::Depth => TAG_DEPTH,
            SentenceKind::Wind => TAG_WIND,
            SentenceKind::WaterSpeed => TAG_WATER_SPEED,
            SentenceKind::GroundSpeedCourse => TAG_GROUND_SPEED_COURSE,
        }
    }

    /// Human-readable name used in error messages
    pub fn label(&self) -> &'static str {
        match self {
            SentenceKind::Position => "position",
            SentenceKind::Depth => "depth",
            SentenceKind::Wind => "wind",
            SentenceKind::WaterSpeed => "water speed",
            SentenceKind::GroundSpeedCourse => "ground speed/course",
        }
    }
}

/// One split input line
#[derive(Debug, Clone, PartialEq)]
pub struct Sentence<'a> {
    fields: Vec<&'a str>,
}

impl<'a> Sentence<'a> {
    /// Split a raw line into fields
    ///
    /// Line terminators and any `*hh` checksum suffix are dropped first; the
    /// checksum is not verified.
    pub fn split(line: &'a str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        let body = match line.find(CHECKSUM_DELIMITER) {
            Some(index) => &line[..index],
            None => line,
        };

        let fields = body.split(FIELD_SEPARATOR).map(str::trim).collect();
        Self { fields }
    }

    pub fn tag(&self) -> &'a str {
        self.fields.first().copied().unwrap_or("")
    }

    pub fn kind(&self) -> Option<SentenceKind> {
        SentenceKind::from_tag(self.tag())
    }

    /// Number of fields including the tag
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tag().is_empty() && self.fields.len() <= 1
    }

    /// Field at `index`; missing fields read as empty
    pub fn field(&self, index: usize) -> &'a str {
        self.fields.get(index).copied().unwrap_or("")
    }

    pub fn is_blank(&self, index: usize) -> bool {
        self.field(index).is_empty()
    }

    /// Parse a required numeric field
    pub fn number(&self, index: usize, name: &'static str) -> Result<f64> {
        parse_number(name, self.field(index))
    }
}

/// Parse a numeric field value, rejecting non-finite numbers
pub fn parse_number(name: &'static str, value: &str) -> Result<f64> {
    match value.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(number),
        _ => Err(Error::invalid_field(name, value)),
    }
}
