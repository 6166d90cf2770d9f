#![allow(dead_code)]

use hifitime::Epoch;
use starfix::altaz::altitude_azimuth;
use starfix::catalog::StarRecord;
use starfix::fix_params::FixParams;
use starfix::geometry::{great_circle_distance, GeoPosition};
use starfix::observation::Observation;
use starfix::sight::Sight;
use starfix::time::{greenwich_hour_angle, local_hour_angle};

/// Parameters that leave the observed altitude untouched.
pub fn uncorrected() -> FixParams {
    FixParams::builder()
        .apply_refraction(false)
        .apply_dip(false)
        .build()
        .unwrap()
}

pub fn position(lat: f64, lon: f64) -> GeoPosition {
    GeoPosition::new(lat, lon).unwrap()
}

/// Altitude of a body seen from `observer` at `time`.
pub fn true_altitude(ra: f64, dec: f64, observer: &GeoPosition, time: &Epoch) -> f64 {
    let lha = local_hour_angle(greenwich_hour_angle(ra, time), observer.lon());
    altitude_azimuth(dec, lha, observer.lat()).0
}

/// An exact, uncorrected sight of `star` taken from `observer`.
pub fn synthetic_sight(star: &StarRecord, observer: &GeoPosition, time: Epoch) -> Sight {
    let altitude = true_altitude(star.ra, star.dec, observer, &time);
    let obs = Observation::new(star.ra, star.dec, altitude, time)
        .unwrap()
        .named(star.name.as_str());
    Sight::with_params(obs, &uncorrected()).unwrap()
}

pub fn assert_position_close(actual: &GeoPosition, expected: &GeoPosition, max_km: f64) {
    let distance = great_circle_distance(actual, expected);
    assert!(
        distance <= max_km,
        "{actual} is {distance:.6} km away from {expected} (max {max_km} km)"
    );
}
