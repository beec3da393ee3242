//! Tests for degrees-minutes coordinate conversion

use super::assert_close;
use crate::Error;
use crate::app::services::sentence_parser::coordinates::{convert, latitude, longitude};

#[test]
fn test_latitude_north() {
    let value = latitude("4807.038", "N").unwrap();
    assert_close(value, 48.0 + 7.038 / 60.0);
    assert_close(value, 48.1173);
}

#[test]
fn test_longitude_east_is_unsigned() {
    let value = longitude("01131.000", "E").unwrap();
    assert_close(value, 11.0 + 31.0 / 60.0);
    assert!(value > 0.0);
}

#[test]
fn test_negative_hemispheres() {
    assert_close(latitude("3351.200", "S").unwrap(), -(33.0 + 51.2 / 60.0));
    assert_close(longitude("15112.600", "W").unwrap(), -(151.0 + 12.6 / 60.0));
}

#[test]
fn test_sign_depends_only_on_configured_hemisphere() {
    // "S" is not negative when the configured negative hemisphere is "W"
    assert_close(convert("1230.000", "S", "W", 2).unwrap(), 12.5);
    assert_close(convert("1230.000", "X", "X", 2).unwrap(), -12.5);
}

#[test]
fn test_degree_width_changes_result() {
    let two = convert("01131.000", "E", "W", 2).unwrap();
    let three = convert("01131.000", "E", "W", 3).unwrap();
    assert_close(two, 1.0 + 131.0 / 60.0);
    assert_close(three, 11.0 + 31.0 / 60.0);
}

#[test]
fn test_too_short_is_format_error() {
    let err = convert("4", "N", "S", 2).unwrap_err();
    assert!(matches!(err, Error::Format { .. }));

    let err = longitude("01", "E").unwrap_err();
    assert!(matches!(err, Error::Format { .. }));
}

#[test]
fn test_non_numeric_is_format_error() {
    assert!(matches!(
        latitude("ab07.038", "N").unwrap_err(),
        Error::Format { .. }
    ));
    assert!(matches!(
        latitude("48xx.038", "N").unwrap_err(),
        Error::Format { .. }
    ));
    // Degrees only, no minutes
    assert!(matches!(
        latitude("48", "N").unwrap_err(),
        Error::Format { .. }
    ));
}

#[test]
fn test_conversion_is_deterministic() {
    let first = latitude("6009.500", "N").unwrap();
    let second = latitude("6009.500", "N").unwrap();
    assert_eq!(first.to_bits(), second.to_bits());
}
