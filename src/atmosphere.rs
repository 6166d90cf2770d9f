//! Atmospheric and geometric corrections applied to a raw sextant altitude.
//!
//! Both corrections are returned in **degrees** and must be *subtracted* from the observed
//! altitude to obtain the true altitude.
use crate::constants::{
    Celsius, Degree, KiloPascal, Meter, ARCMIN_PER_DEG, REFERENCE_PRESSURE_KPA,
    REFERENCE_TEMPERATURE_K, ZERO_CELSIUS_K,
};

/// Atmospheric refraction for an observed altitude (Bennett's empirical formula).
///
/// Arguments
/// -----------------
/// * `altitude`: observed altitude in degrees.
/// * `temperature`: air temperature in °C.
/// * `pressure`: atmospheric pressure in kPa.
///
/// Return
/// ----------
/// * The refraction in degrees, `0.0` outside the open interval `(0, 90)`.
///
/// Details
/// ----------
/// ```text
/// R  = 1 / tan(h + 7.31 / (h + 4.4))        (arcminutes, h in degrees)
/// R' = R · (P / 101) · (283 / (T + 273.15))
/// ```
pub fn refraction(altitude: Degree, temperature: Celsius, pressure: KiloPascal) -> Degree {
    if altitude <= 0.0 || altitude >= 90.0 {
        return 0.0;
    }

    let h = altitude;
    let r_arcmin = 1.0 / (h + 7.31 / (h + 4.4)).to_radians().tan();

    let temp_kelvin = temperature + ZERO_CELSIUS_K;
    let r_arcmin =
        r_arcmin * (pressure / REFERENCE_PRESSURE_KPA) * (REFERENCE_TEMPERATURE_K / temp_kelvin);

    r_arcmin / ARCMIN_PER_DEG
}

/// Dip of the sea horizon for an eye height above sea level.
///
/// `1.76·√h` arcminutes for `h` in meters, `0.0` when the observer is at or below sea level.
pub fn horizon_dip(height: Meter) -> Degree {
    if height <= 0.0 {
        return 0.0;
    }
    1.76 * height.sqrt() / ARCMIN_PER_DEG
}
