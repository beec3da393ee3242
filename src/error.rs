//! Error handling for trip loading operations.
//!
//! Every fatal condition of a load is a variant here. Recoverable conditions
//! (GPS dropouts, missing measurement fields, unsupported depth units) never
//! reach this type; they are reported as skip outcomes by the record writers.

use crate::models::TripId;
use thiserror::Error;

/// Result type alias for the trip loader
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal errors that abort a load and roll back its transaction
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Coordinate string could not be converted to decimal degrees
    #[error("Invalid coordinate '{raw}': {reason}")]
    Format { raw: String, reason: String },

    /// Fix sentence carried non-empty but corrupt position data
    #[error("Invalid position data: {message}")]
    InvalidPosition { message: String },

    /// Numeric measurement field could not be parsed
    #[error("Invalid value '{value}' for {field}")]
    InvalidField { field: &'static str, value: String },

    /// Speed unit other than knots on a sentence that requires knots
    #[error("Unknown speed unit '{unit}' in {sentence} sentence")]
    Unit { sentence: &'static str, unit: String },

    /// No user registered with the given email address
    #[error("Unknown user e-mail address: {email}")]
    UnknownUser { email: String },

    /// Reload requested for a trip that does not exist
    #[error("Trip with id {trip_id} not found")]
    TripNotFound { trip_id: TripId },

    /// Input stream ended without a single valid fix
    #[error("No valid data rows found")]
    EmptyTrip,

    /// Cancellation was requested before the data commit
    #[error("Load interrupted by user")]
    Interrupted,

    /// Failure raised while processing a specific input line
    #[error("Failure on line {line} of the input file: {source}")]
    AtLine {
        line: usize,
        #[source]
        source: Box<Error>,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a coordinate format error
    pub fn format(raw: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Format {
            raw: raw.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid position error
    pub fn invalid_position(message: impl Into<String>) -> Self {
        Self::InvalidPosition {
            message: message.into(),
        }
    }

    /// Create an invalid numeric field error
    pub fn invalid_field(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            value: value.into(),
        }
    }

    /// Create a speed unit error
    pub fn unit(sentence: &'static str, unit: impl Into<String>) -> Self {
        Self::Unit {
            sentence,
            unit: unit.into(),
        }
    }

    /// Create an unknown user error
    pub fn unknown_user(email: impl Into<String>) -> Self {
        Self::UnknownUser {
            email: email.into(),
        }
    }

    /// Create a trip not found error
    pub fn trip_not_found(trip_id: TripId) -> Self {
        Self::TripNotFound { trip_id }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Annotate an error with the 1-based input line it was raised on
    pub fn at_line(self, line: usize) -> Self {
        match self {
            // Keep the innermost line number
            Self::AtLine { .. } => self,
            other => Self::AtLine {
                line,
                source: Box::new(other),
            },
        }
    }

    /// Line number the error was raised on, if any
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::AtLine { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// The error with any line annotation removed
    pub fn root(&self) -> &Error {
        match self {
            Self::AtLine { source, .. } => source.root(),
            other => other,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}
