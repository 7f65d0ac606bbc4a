use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters, used by the haversine formula.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

#[derive(Debug, Display, Error, PartialEq)]
pub enum GeoError {
    #[display(fmt = "invalid coordinate: lat={}, lon={}", latitude, longitude)]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    #[display(fmt = "geofence radius must be positive, got {}", radius_m)]
    InvalidRadius { radius_m: f64 },
}

/// A validated (latitude, longitude) pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Rejects out-of-range or non-finite degrees.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        let lat_ok = latitude.is_finite() && (-90.0..=90.0).contains(&latitude);
        let lon_ok = longitude.is_finite() && (-180.0..=180.0).contains(&longitude);

        if lat_ok && lon_ok {
            Ok(Self {
                latitude,
                longitude,
            })
        } else {
            Err(GeoError::InvalidCoordinate {
                latitude,
                longitude,
            })
        }
    }
}

/// Great-circle distance between two points in meters (haversine).
pub fn distance_m(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn distance_to_self_is_zero() {
        let dhaka = coord(23.8103, 90.4125);
        assert_eq!(distance_m(dhaka, dhaka), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = coord(23.8103, 90.4125);
        let b = coord(22.3569, 91.7832);
        assert!((distance_m(a, b) - distance_m(b, a)).abs() < 1e-6);
    }

    #[test]
    fn one_degree_diagonal_is_about_157_km() {
        let origin = coord(0.0, 0.0);
        let off = coord(1.0, 1.0);
        let d = distance_m(origin, off);
        assert!((d - 157_000.0).abs() < 1_000.0, "got {d}");
    }

    #[test]
    fn rejects_out_of_range_latitude() {
        assert!(matches!(
            Coordinate::new(90.1, 0.0),
            Err(GeoError::InvalidCoordinate { .. })
        ));
        assert!(matches!(
            Coordinate::new(-91.0, 0.0),
            Err(GeoError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn rejects_out_of_range_longitude() {
        assert!(Coordinate::new(0.0, 180.5).is_err());
        assert!(Coordinate::new(0.0, -181.0).is_err());
    }

    #[test]
    fn rejects_non_finite_values() {
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn boundary_coordinates_are_accepted() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
    }
}
