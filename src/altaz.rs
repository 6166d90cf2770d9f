//! Computed altitude and azimuth of a body seen from an assumed position.
//!
//! This is the forward problem of sight reduction: given the body's declination, its local
//! hour angle and the observer's latitude, find where it stands in the sky. It is used to
//! plan sights (which bodies are above the horizon) and to build exact synthetic sights.
use crate::{constants::Degree, geometry::normalize_degrees};

/// Altitude and azimuth of a body.
///
/// Arguments
/// -----------------
/// * `dec`: declination of the body in degrees.
/// * `lha`: local hour angle of the body in degrees (see [`crate::time::local_hour_angle`]).
/// * `observer_lat`: latitude of the observer in degrees.
///
/// Return
/// ----------
/// * `(altitude, azimuth)` in degrees. Altitude is in `[-90, 90]`, azimuth is measured from
///   true north through east in `[0, 360)`. At the geographic poles or at the zenith the
///   azimuth is undefined and `0.0` is returned.
///
/// Details
/// ----------
/// ```text
/// sin Hc = sin φ · sin δ + cos φ · cos δ · cos LHA
/// cos Z  = (sin δ − sin φ · sin Hc) / (cos φ · cos Hc)
/// Zn     = 360° − Z   if sin LHA > 0 (body west of the meridian)
/// ```
pub fn altitude_azimuth(dec: Degree, lha: Degree, observer_lat: Degree) -> (Degree, Degree) {
    let (sin_dec, cos_dec) = dec.to_radians().sin_cos();
    let (sin_lat, cos_lat) = observer_lat.to_radians().sin_cos();
    let lha_rad = lha.to_radians();

    let sin_alt = (sin_lat * sin_dec + cos_lat * cos_dec * lha_rad.cos()).clamp(-1.0, 1.0);
    let alt_rad = sin_alt.atan2((1.0 - sin_alt * sin_alt).sqrt());

    let denom = cos_lat * alt_rad.cos();
    if denom.abs() < 1e-12 {
        return (alt_rad.to_degrees(), 0.0);
    }

    let cos_az = ((sin_dec - sin_lat * sin_alt) / denom).clamp(-1.0, 1.0);
    let mut azimuth = cos_az.acos().to_degrees();
    if lha_rad.sin() > 0.0 {
        azimuth = 360.0 - azimuth;
    }

    (alt_rad.to_degrees(), normalize_degrees(azimuth))
}
