//! Application constants for the NMEA trip loader
//!
//! This module contains the recognized sentence tags, unit codes, field
//! positions, and default values used throughout the loader.

// =============================================================================
// Sentence Tags
// =============================================================================

/// Geographic position, latitude/longitude and time
pub const TAG_POSITION: &str = "$GPGLL";

/// Depth below transducer
pub const TAG_DEPTH: &str = "$IIDBT";

/// Wind speed and angle
pub const TAG_WIND: &str = "$IIMWV";

/// Water speed and heading
pub const TAG_WATER_SPEED: &str = "$IIVHW";

/// Course and speed over ground
pub const TAG_GROUND_SPEED_COURSE: &str = "$IIVTG";

/// Field separator within a sentence
pub const FIELD_SEPARATOR: char = ',';

/// Start of the trailing checksum; everything after it is dropped unverified
pub const CHECKSUM_DELIMITER: char = '*';

// =============================================================================
// Minimum Field Counts (tag included)
// =============================================================================

pub mod min_fields {
    pub const POSITION: usize = 6;
    pub const DEPTH: usize = 5;
    pub const WIND: usize = 5;
    pub const WATER_SPEED: usize = 9;
    pub const GROUND_SPEED_COURSE: usize = 7;
}

// =============================================================================
// Units and Hemispheres
// =============================================================================

pub mod units {
    /// Meters, the only depth unit stored
    pub const METERS: &str = "M";

    /// Knots
    pub const KNOTS: &str = "N";

    /// Kilometers per hour
    pub const KILOMETERS_PER_HOUR: &str = "K";

    /// Wind reference code for true wind; anything else is apparent
    pub const TRUE_REFERENCE: &str = "T";

    /// Divisor turning knots into the stored wind speed
    pub const KNOTS_DIVISOR: f64 = 2.0;

    /// Divisor turning km/h into m/s
    pub const KMH_DIVISOR: f64 = 3.6;
}

pub mod hemispheres {
    pub const SOUTH: &str = "S";
    pub const WEST: &str = "W";

    /// Degree digits in a ddmm.mmm latitude
    pub const LATITUDE_DEGREE_DIGITS: usize = 2;

    /// Degree digits in a dddmm.mmm longitude
    pub const LONGITUDE_DEGREE_DIGITS: usize = 3;
}

// =============================================================================
// Trip Defaults
// =============================================================================

/// Trip name used when neither a name nor an input file name is available
pub const EMPTY_TRIP_NAME: &str = "[empty]";

/// Pattern for extracting a trip date from an input file name
pub const FILENAME_DATE_PATTERN: &str = r"([0-9]{4}-[0-9]{2}-[0-9]{2})";

/// Date format used for trip dates
pub const TRIP_DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Application Defaults
// =============================================================================

/// Application directory name under the platform config/data directories
pub const APP_DIR_NAME: &str = "nmea-loader";

/// Default database file name
pub const DEFAULT_DATABASE_FILE: &str = "trips.sqlite";

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Default SQLite busy timeout
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the database path
pub const ENV_DATABASE: &str = "NMEA_LOADER_DATABASE";

/// Environment variable overriding the log level
pub const ENV_LOG_LEVEL: &str = "NMEA_LOADER_LOG";

/// Lines between spinner refreshes on the console
pub const PROGRESS_UPDATE_INTERVAL: usize = 500;

/// Gzip magic bytes used for content sniffing
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
