//! Kilometer to degree conversion.
//!
//! Flat-Earth small-angle approximation: one degree of latitude is taken as
//! 111 km everywhere, one degree of longitude as 111 km scaled by the cosine
//! of the reference latitude.

/// Kilometers per degree of latitude.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Convert a distance in kilometers to degrees of latitude.
pub fn km_to_lat_degrees(km: f64) -> f64 {
    km / KM_PER_DEGREE
}

/// Convert a distance in kilometers to degrees of longitude at `at_lat_degrees`.
///
/// The result grows without bound towards the poles. The latitude is not
/// validated here; callers check it against the grid coverage first.
pub fn km_to_lon_degrees(km: f64, at_lat_degrees: f64) -> f64 {
    km / (KM_PER_DEGREE * at_lat_degrees.to_radians().cos())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::assert_approx_eq;

    #[test]
    fn test_lat_degrees_is_location_independent() {
        assert_approx_eq!(km_to_lat_degrees(111.0), 1.0, 1e-12);
        assert_approx_eq!(km_to_lat_degrees(25.0), 0.225_225_225, 1e-9);
    }

    #[test]
    fn test_lon_degrees_equals_lat_degrees_at_equator() {
        assert_eq!(km_to_lon_degrees(25.0, 0.0), km_to_lat_degrees(25.0));
    }

    #[test]
    fn test_lon_degrees_grows_towards_poles() {
        let mut previous = km_to_lon_degrees(25.0, 0.0);
        for lat in [10.0, 30.0, 55.0, 70.0, 85.0, 89.9] {
            let north = km_to_lon_degrees(25.0, lat);
            let south = km_to_lon_degrees(25.0, -lat);
            assert!(north > previous, "{} at {} not above {}", north, lat, previous);
            assert_approx_eq!(north, south, 1e-9);
            previous = north;
        }
    }

    #[test]
    fn test_lon_degrees_at_sixty_is_double() {
        assert_approx_eq!(km_to_lon_degrees(111.0, 60.0), 2.0, 1e-9);
    }
}
