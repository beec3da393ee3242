//! Coordinate conversion for NMEA position fields
//!
//! NMEA encodes latitude as `ddmm.mmm` and longitude as `dddmm.mmm`, with the
//! hemisphere in a separate field. The degree width differs per axis, so the
//! caller always states how many leading characters are degrees.

use crate::constants::hemispheres::{
    LATITUDE_DEGREE_DIGITS, LONGITUDE_DEGREE_DIGITS, SOUTH, WEST,
};
use crate::{Error, Result};

/// Convert a degrees-minutes string into signed decimal degrees
///
/// The first `degree_digits` characters are whole degrees, the remainder is
/// minutes. The result is negated when `hemisphere` equals
/// `negative_hemisphere`.
pub fn convert(
    raw: &str,
    hemisphere: &str,
    negative_hemisphere: &str,
    degree_digits: usize,
) -> Result<f64> {
    if raw.len() < degree_digits {
        return Err(Error::format(
            raw,
            format!("expected at least {} degree digits", degree_digits),
        ));
    }

    let (degree_part, minute_part) = match (raw.get(..degree_digits), raw.get(degree_digits..)) {
        (Some(degrees), Some(minutes)) => (degrees, minutes),
        _ => return Err(Error::format(raw, "not an ASCII coordinate")),
    };

    let degrees: f64 = degree_part
        .parse()
        .map_err(|_| Error::format(raw, format!("invalid degrees '{}'", degree_part)))?;
    let minutes: f64 = minute_part
        .parse()
        .map_err(|_| Error::format(raw, format!("invalid minutes '{}'", minute_part)))?;

    let mut value = degrees + minutes / 60.0;
    if !value.is_finite() {
        return Err(Error::format(raw, "coordinate is not a finite number"));
    }
    if hemisphere == negative_hemisphere {
        value = -value;
    }
    Ok(value)
}

/// Convert a `ddmm.mmm` latitude; south is negative
pub fn latitude(raw: &str, hemisphere: &str) -> Result<f64> {
    convert(raw, hemisphere, SOUTH, LATITUDE_DEGREE_DIGITS)
}

/// Convert a `dddmm.mmm` longitude; west is negative
pub fn longitude(raw: &str, hemisphere: &str) -> Result<f64> {
    convert(raw, hemisphere, WEST, LONGITUDE_DEGREE_DIGITS)
}
