//! # Circle-of-position intersection
//!
//! Two sights define two small circles on the sphere. Their intersection holds (at most) two
//! candidate observer positions.
//!
//! ## Method
//!
//! With `v1`, `v2` the unit vectors of the circle centres and `r1`, `r2` their angular radii:
//!
//! ```text
//! d  = atan2(|v1 × v2|, v1 · v2)                            separation of the centres
//! a  = acos((cos r1 − cos r2 · cos d) / (sin r2 · sin d))   angle at centre 2, in the
//!                                                           triangle (centre 1, centre 2, fix)
//! n  = (v1 × v2) / |v1 × v2|                                normal of the plane of the centres
//! t  = (v1 − cos d · v2) / |…|                              tangent at v2 pointing to v1
//! p± = cos r2 · v2 + sin r2 · (cos a · t ± sin a · n)
//! ```
//!
//! `p+` is always returned first. Both candidates lie exactly at `r1` from the first centre
//! and `r2` from the second.
//!
//! ## Degenerate configurations
//!
//! Every configuration without a finite set of intersections is reported as an error:
//!
//! - `d > r1 + r2` → [`StarfixError::NoIntersection`]
//! - `d < |r1 − r2|` → [`StarfixError::CircleContained`]
//! - centres identical or antipodal (within `eps`) → [`StarfixError::DegenerateCircles`]
use std::f64::consts::PI;

use crate::{
    constants::{Kilometer, Radian, EARTH_RADIUS_KM},
    geometry::{normalize, to_position, to_vector, GeoPosition},
    sight::Sight,
    starfix_errors::StarfixError,
};

/// A circle of position: all points at `radius` kilometers from `center`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleOfPosition {
    pub center: GeoPosition,
    pub radius: Kilometer,
}

impl CircleOfPosition {
    pub fn new(center: GeoPosition, radius: Kilometer) -> Self {
        CircleOfPosition { center, radius }
    }

    /// Intersect with another circle, see [`circle_intersection`].
    pub fn intersect(
        &self,
        other: &CircleOfPosition,
        eps: Radian,
    ) -> Result<[GeoPosition; 2], StarfixError> {
        circle_intersection(&self.center, self.radius, &other.center, other.radius, eps)
    }
}

impl From<&Sight> for CircleOfPosition {
    fn from(sight: &Sight) -> Self {
        CircleOfPosition::new(sight.gp(), sight.distance_from_gp())
    }
}

/// Intersection points of two circles of position.
///
/// Arguments
/// -----------------
/// * `gp1`, `dist1`: centre and radius (km along the surface) of the first circle.
/// * `gp2`, `dist2`: centre and radius of the second circle.
/// * `eps`: angular tolerance (radians) for identical or antipodal centres.
///
/// Return
/// ----------
/// * The two candidate positions (identical when the circles are tangent), or a geometry
///   error when the configuration has no finite intersection.
pub fn circle_intersection(
    gp1: &GeoPosition,
    dist1: Kilometer,
    gp2: &GeoPosition,
    dist2: Kilometer,
    eps: Radian,
) -> Result<[GeoPosition; 2], StarfixError> {
    let v1 = to_vector(gp1);
    let v2 = to_vector(gp2);

    let r1 = dist1 / EARTH_RADIUS_KM;
    let r2 = dist2 / EARTH_RADIUS_KM;
    if !r1.is_finite() || !r2.is_finite() {
        return Err(StarfixError::DegenerateCircles);
    }

    // atan2 keeps the separation exact near 0 and π, where acos(v1·v2) loses ~1e-8 rad
    let cross = v1.cross(&v2);
    let cos_d = v1.dot(&v2).clamp(-1.0, 1.0);
    let d = cross.norm().atan2(v1.dot(&v2));

    if d > r1 + r2 {
        return Err(StarfixError::NoIntersection {
            separation_km: d * EARTH_RADIUS_KM,
            radius1_km: dist1,
            radius2_km: dist2,
        });
    }
    if d < (r1 - r2).abs() {
        return Err(StarfixError::CircleContained {
            separation_km: d * EARTH_RADIUS_KM,
            radius1_km: dist1,
            radius2_km: dist2,
        });
    }
    if d < eps || PI - d < eps || r2.sin().abs() < eps {
        return Err(StarfixError::DegenerateCircles);
    }

    let cos_a = ((r1.cos() - r2.cos() * cos_d) / (r2.sin() * d.sin())).clamp(-1.0, 1.0);
    let (sin_a, cos_a) = cos_a.acos().sin_cos();

    let n = normalize(&cross);
    let t = normalize(&(v1 - cos_d * v2));
    let (sin_r2, cos_r2) = r2.sin_cos();

    let toward = cos_a * t;
    let across = sin_a * n;
    let p1 = normalize(&(cos_r2 * v2 + sin_r2 * (toward + across)));
    let p2 = normalize(&(cos_r2 * v2 + sin_r2 * (toward - across)));

    Ok([to_position(&p1)?, to_position(&p2)?])
}
