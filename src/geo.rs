// Coordinate ranges and the distance metric behind nearest-neighbour search.

use crate::error::{GlacierError, Result};

pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;
pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Checks that a latitude is within [-90, +90].
pub fn validate_latitude(lat: f64) -> Result<()> {
    if (MIN_LATITUDE..=MAX_LATITUDE).contains(&lat) {
        Ok(())
    } else {
        Err(GlacierError::invalid_value(
            "latitude",
            format!("must be between {MIN_LATITUDE} and {MAX_LATITUDE}, got {lat}"),
        ))
    }
}

/// Checks that a longitude is within [-180, +180].
pub fn validate_longitude(lon: f64) -> Result<()> {
    if (MIN_LONGITUDE..=MAX_LONGITUDE).contains(&lon) {
        Ok(())
    } else {
        Err(GlacierError::invalid_value(
            "longitude",
            format!("must be between {MIN_LONGITUDE} and {MAX_LONGITUDE}, got {lon}"),
        ))
    }
}

/// Great-circle distance in kilometres between two coordinate pairs.
///
/// Both pairs are range-checked before use. The trig terms take the angles
/// exactly as passed, with no degree conversion: the result is a ranking
/// metric for nearest-neighbour search, not a map distance.
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Result<f64> {
    validate_latitude(lat1)?;
    validate_longitude(lon1)?;
    validate_latitude(lat2)?;
    validate_longitude(lon2)?;

    let inner = ((lat2 - lat1) / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * ((lon2 - lon1) / 2.0).sin().powi(2);

    Ok(2.0 * EARTH_RADIUS_KM * inner.sqrt().asin())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== validation tests ====================

    #[test]
    fn test_boundary_coordinates_are_accepted() {
        assert!(validate_latitude(MIN_LATITUDE).is_ok());
        assert!(validate_latitude(MAX_LATITUDE).is_ok());
        assert!(validate_longitude(MIN_LONGITUDE).is_ok());
        assert!(validate_longitude(MAX_LONGITUDE).is_ok());
        assert!(validate_latitude(0.0).is_ok());
    }

    #[test]
    fn test_out_of_range_coordinates_are_rejected() {
        for lat in [-90.001, 90.001, 180.0, f64::NAN] {
            match validate_latitude(lat) {
                Err(GlacierError::InvalidValue { field, .. }) => assert_eq!(field, "latitude"),
                other => panic!("latitude {lat} gave {other:?}"),
            }
        }
        for lon in [-180.5, 180.5, 999.0] {
            match validate_longitude(lon) {
                Err(GlacierError::InvalidValue { field, .. }) => assert_eq!(field, "longitude"),
                other => panic!("longitude {lon} gave {other:?}"),
            }
        }
    }

    #[test]
    fn test_distance_validates_every_argument() {
        assert!(distance_km(91.0, 0.0, 0.0, 0.0).is_err());
        assert!(distance_km(0.0, 181.0, 0.0, 0.0).is_err());
        assert!(distance_km(0.0, 0.0, -91.0, 0.0).is_err());
        assert!(distance_km(0.0, 0.0, 0.0, -181.0).is_err());
    }

    // ==================== distance tests ====================

    #[test]
    fn test_distance_to_self_is_zero() {
        let d = distance_km(46.8, 10.7, 46.8, 10.7).unwrap();
        assert!(d.abs() < 1e-9);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = distance_km(10.0, 20.0, 11.0, 21.0).unwrap();
        let b = distance_km(11.0, 21.0, 10.0, 20.0).unwrap();
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn test_on_the_equator_the_metric_is_radius_times_the_gap() {
        // With lat1 = lat2 = 0 the inner term collapses to sin²(Δlon / 2),
        // so the metric is exactly R·Δlon for small gaps.
        let d = distance_km(0.0, 0.0, 0.0, 1.0).unwrap();
        assert!((d - EARTH_RADIUS_KM).abs() < 1e-6);

        let d = distance_km(0.0, 0.0, 0.0, 2.0).unwrap();
        assert!((d - 2.0 * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn test_nearby_points_rank_by_gap() {
        let near = distance_km(0.0, 0.0, 0.0, 0.5).unwrap();
        let mid = distance_km(0.0, 0.0, 0.0, 1.0).unwrap();
        let far = distance_km(0.0, 0.0, 0.0, 2.0).unwrap();
        assert!(near < mid && mid < far);
    }
}
