//! # Spherical geometry primitives
//!
//! Positions on a **spherical Earth** and their unit-vector representation.
//!
//! ## Conventions
//!
//! - Latitude in degrees, `[-90, +90]`, north positive.
//! - Longitude in degrees, `(-180, +180]`, east positive.
//! - Unit vectors are expressed in an Earth-fixed frame where `x` points to (0°, 0°),
//!   `y` to (0°, 90°E) and `z` to the north pole:
//!
//! ```text
//! x = cos(lat)·cos(lon)
//! y = cos(lat)·sin(lon)
//! z = sin(lat)
//! ```
//!
//! Distances along the surface use the haversine formula, which stays well conditioned for
//! nearly identical and nearly antipodal points.
use std::fmt;

use nalgebra::Vector3;

use crate::{
    constants::{Degree, Kilometer, EARTH_RADIUS_KM},
    starfix_errors::StarfixError,
};

/// Normalize an angle into `[0, 360)`.
pub fn normalize_degrees(angle: Degree) -> Degree {
    let a = angle.rem_euclid(360.0);
    // rem_euclid may round tiny negative inputs up to exactly 360
    if a >= 360.0 {
        0.0
    } else {
        a
    }
}

/// Normalize a longitude into `(-180, +180]`.
pub fn normalize_longitude(lon: Degree) -> Degree {
    let l = normalize_degrees(lon);
    if l > 180.0 {
        l - 360.0
    } else {
        l
    }
}

/// A point on the Earth's surface.
///
/// The value is validated on construction: latitude must lie in `[-90, +90]`, the
/// longitude is wrapped into `(-180, +180]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPosition {
    lat: Degree,
    lon: Degree,
}

impl GeoPosition {
    /// Create a new position.
    ///
    /// Arguments
    /// -----------------
    /// * `lat`: latitude in degrees, must lie in `[-90, +90]`.
    /// * `lon`: longitude in degrees, any finite value (wrapped into `(-180, +180]`).
    ///
    /// Return
    /// ----------
    /// * The position, [`StarfixError::InvalidLatitude`] when the latitude is out of range or
    ///   NaN, [`StarfixError::InvalidRequest`] when the longitude is not finite.
    pub fn new(lat: Degree, lon: Degree) -> Result<Self, StarfixError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(StarfixError::InvalidLatitude(lat));
        }
        if !lon.is_finite() {
            return Err(StarfixError::InvalidRequest(format!(
                "longitude must be finite, got {lon}"
            )));
        }
        Ok(GeoPosition {
            lat,
            lon: normalize_longitude(lon),
        })
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> Degree {
        self.lat
    }

    /// Longitude in degrees.
    pub fn lon(&self) -> Degree {
        self.lon
    }

    /// Unit vector of this position, see [`to_vector`].
    pub fn to_vector(&self) -> Vector3<f64> {
        to_vector(self)
    }

    /// Great-circle distance to `other` in kilometers, see [`great_circle_distance`].
    pub fn distance_to(&self, other: &GeoPosition) -> Kilometer {
        great_circle_distance(self, other)
    }
}

impl fmt::Display for GeoPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lat_dir = if self.lat >= 0.0 { 'N' } else { 'S' };
        let lon_dir = if self.lon >= 0.0 { 'E' } else { 'W' };
        write!(
            f,
            "{:.4}°{}, {:.4}°{}",
            self.lat.abs(),
            lat_dir,
            self.lon.abs(),
            lon_dir
        )
    }
}

/// Convert a geographic position into a unit vector on the sphere.
pub fn to_vector(pos: &GeoPosition) -> Vector3<f64> {
    let (sin_lat, cos_lat) = pos.lat.to_radians().sin_cos();
    let (sin_lon, cos_lon) = pos.lon.to_radians().sin_cos();
    Vector3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat)
}

/// Convert an arbitrary (non-zero) vector into the geographic position it points to.
///
/// The vector is normalized first, so any positive scaling of a unit vector maps to the
/// same position.
///
/// Return
/// ----------
/// * The position, or [`StarfixError::ZeroVector`] if the vector has no direction
///   (zero or non-finite magnitude).
pub fn to_position(vec: &Vector3<f64>) -> Result<GeoPosition, StarfixError> {
    let magnitude = vec.norm();
    if magnitude == 0.0 || !magnitude.is_finite() {
        return Err(StarfixError::ZeroVector);
    }
    let u = vec / magnitude;

    let lat = u.z.atan2(u.x.hypot(u.y)).to_degrees();
    let lon = u.y.atan2(u.x).to_degrees();

    Ok(GeoPosition {
        lat: lat.clamp(-90.0, 90.0),
        lon: normalize_longitude(lon),
    })
}

/// Normalize a vector to unit length. A zero vector is returned unchanged.
pub fn normalize(vec: &Vector3<f64>) -> Vector3<f64> {
    let magnitude = vec.norm();
    if magnitude == 0.0 {
        *vec
    } else {
        vec / magnitude
    }
}

/// Great-circle distance between two positions in kilometers (haversine formula).
pub fn great_circle_distance(a: &GeoPosition, b: &GeoPosition) -> Kilometer {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Average a set of positions on the sphere.
///
/// Each position is converted into its unit vector, the arithmetic mean of the vectors is
/// normalized and converted back. The result does not depend on the input order (up to
/// floating-point rounding).
///
/// Return
/// ----------
/// * The mean position, [`StarfixError::EmptyPositionSet`] for an empty slice, or
///   [`StarfixError::ZeroVector`] when the vectors cancel out (e.g. two antipodal points).
pub fn mean_position(positions: &[GeoPosition]) -> Result<GeoPosition, StarfixError> {
    if positions.is_empty() {
        return Err(StarfixError::EmptyPositionSet);
    }
    let sum = positions
        .iter()
        .map(to_vector)
        .fold(Vector3::zeros(), |acc, v| acc + v);
    let mean = sum / positions.len() as f64;
    to_position(&normalize(&mean))
}

#[cfg(test)]
mod geometry_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn pos(lat: f64, lon: f64) -> GeoPosition {
        GeoPosition::new(lat, lon).unwrap()
    }

    #[test]
    fn test_normalize_longitude() {
        assert_eq!(normalize_longitude(-180.0), 180.0);
        assert_eq!(normalize_longitude(180.0), 180.0);
        assert_eq!(normalize_longitude(190.0), -170.0);
        assert_eq!(normalize_longitude(-62.5), -62.5);
        assert_eq!(normalize_longitude(-420.0), -60.0);
        assert_eq!(normalize_degrees(-1e-18), 0.0);
        assert_eq!(normalize_degrees(720.5), 0.5);
    }

    #[test]
    fn test_new_rejects_invalid_latitude() {
        assert_eq!(
            GeoPosition::new(91.0, 0.0),
            Err(StarfixError::InvalidLatitude(91.0))
        );
        assert!(GeoPosition::new(f64::NAN, 0.0).is_err());
        assert!(GeoPosition::new(10.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_vector_round_trip() {
        for lat in (-85..=85).step_by(17) {
            for lon in (-175..=180).step_by(25) {
                let p = pos(lat as f64 + 0.123, lon as f64 - 0.456);
                let back = to_position(&to_vector(&p)).unwrap();
                assert_abs_diff_eq!(back.lat(), p.lat(), epsilon = 1e-9);
                assert_abs_diff_eq!(back.lon(), p.lon(), epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_vector_is_unit() {
        let v = to_vector(&pos(-33.9, 151.2));
        assert_abs_diff_eq!(v.norm(), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_to_position_scaled_and_zero() {
        let p = to_position(&Vector3::new(0.0, 5.0, 0.0)).unwrap();
        assert_abs_diff_eq!(p.lat(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.lon(), 90.0, epsilon = 1e-12);

        let p = to_position(&Vector3::new(-1.0, 0.0, 0.0)).unwrap();
        assert_eq!(p.lon(), 180.0);

        assert_eq!(
            to_position(&Vector3::zeros()),
            Err(StarfixError::ZeroVector)
        );
    }

    #[test]
    fn test_normalize_vector() {
        let v = normalize(&Vector3::new(3.0, 0.0, 4.0));
        assert_abs_diff_eq!(v, Vector3::new(0.6, 0.0, 0.8), epsilon = 1e-15);
        assert_eq!(normalize(&Vector3::zeros()), Vector3::zeros());
    }

    #[test]
    fn test_great_circle_distance() {
        // a quarter of the equator
        let d = great_circle_distance(&pos(0.0, 0.0), &pos(0.0, 90.0));
        assert_abs_diff_eq!(d, EARTH_RADIUS_KM * std::f64::consts::FRAC_PI_2, epsilon = 1e-9);

        // antipodes
        let d = great_circle_distance(&pos(10.0, 20.0), &pos(-10.0, -160.0));
        assert_abs_diff_eq!(d, EARTH_RADIUS_KM * std::f64::consts::PI, epsilon = 1e-3);

        assert_eq!(great_circle_distance(&pos(25.0, 50.0), &pos(25.0, 50.0)), 0.0);
    }

    #[test]
    fn test_distance_symmetry() {
        let points = [
            pos(25.0, 50.0),
            pos(-16.7, -62.9),
            pos(89.0, 179.0),
            pos(-45.0, -179.5),
            pos(0.0, 0.0),
        ];
        for a in &points {
            for b in &points {
                assert_eq!(great_circle_distance(a, b), great_circle_distance(b, a));
            }
        }
    }

    #[test]
    fn test_mean_position() {
        let m = mean_position(&[pos(10.0, 0.0), pos(-10.0, 0.0)]).unwrap();
        assert_abs_diff_eq!(m.lat(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m.lon(), 0.0, epsilon = 1e-12);

        // straddling the antimeridian
        let m = mean_position(&[pos(0.0, 179.0), pos(0.0, -179.0)]).unwrap();
        assert_abs_diff_eq!(m.lon(), 180.0, epsilon = 1e-9);

        assert_eq!(mean_position(&[]), Err(StarfixError::EmptyPositionSet));
    }

    #[test]
    fn test_display() {
        assert_eq!(pos(-16.8875, -28.3491).to_string(), "16.8875°S, 28.3491°W");
        assert_eq!(pos(25.0, 50.0).to_string(), "25.0000°N, 50.0000°E");
    }
}
