//! # Sight: a corrected observation
//!
//! A [`Sight`] is built from an [`Observation`] and owns everything the fix combiner needs:
//!
//! 1. the **corrected altitude** (observed altitude minus refraction and dip),
//! 2. the **Greenwich hour angle** of the body at the observation time,
//! 3. the body's **geographic position** (GP), the point of the Earth where it stands at the
//!    zenith: latitude = declination, longitude = −GHA,
//! 4. the **distance from the GP**, the radius of the circle of position:
//!
//! ```text
//! distance = radians(90° − corrected altitude) · R⊕
//! ```
//!
//! Every circle of position is treated as an exact small circle on a spherical Earth.
use std::fmt;

use crate::{
    atmosphere::{horizon_dip, refraction},
    constants::{Degree, Kilometer, EARTH_RADIUS_KM},
    fix_params::FixParams,
    geometry::{normalize_longitude, GeoPosition},
    observation::Observation,
    starfix_errors::StarfixError,
    time::{format_time, greenwich_hour_angle},
};

#[derive(Debug, Clone, PartialEq)]
pub struct Sight {
    observation: Observation,
    corrected_altitude: Degree,
    gha: Degree,
    gp: GeoPosition,
}

impl Sight {
    /// Reduce an observation with the default corrections (refraction and dip).
    pub fn new(observation: Observation) -> Result<Self, StarfixError> {
        Self::with_params(observation, &FixParams::default())
    }

    /// Reduce an observation.
    ///
    /// Arguments
    /// -----------------
    /// * `observation`: the validated raw reading.
    /// * `params`: selects which corrections are applied.
    ///
    /// Return
    /// ----------
    /// * The sight. The GP latitude comes from a validated declination, so the only possible
    ///   error is a [`StarfixError::InvalidLatitude`] that cannot occur for a valid observation.
    pub fn with_params(observation: Observation, params: &FixParams) -> Result<Self, StarfixError> {
        let conditions = observation.conditions();
        let mut corrected_altitude = observation.altitude();

        if params.apply_refraction {
            corrected_altitude -= refraction(
                observation.altitude(),
                conditions.temperature,
                conditions.pressure,
            );
        }
        if params.apply_dip && conditions.observer_height > 0.0 {
            corrected_altitude -= horizon_dip(conditions.observer_height);
        }

        let gha = greenwich_hour_angle(observation.ra(), observation.time());
        let gp = GeoPosition::new(observation.dec(), normalize_longitude(-gha))?;

        Ok(Sight {
            observation,
            corrected_altitude,
            gha,
            gp,
        })
    }

    /// The raw observation this sight was reduced from.
    pub fn observation(&self) -> &Observation {
        &self.observation
    }

    /// Altitude after refraction and dip, in degrees.
    pub fn corrected_altitude(&self) -> Degree {
        self.corrected_altitude
    }

    /// Greenwich hour angle of the body at the observation time, `[0, 360)`.
    pub fn gha(&self) -> Degree {
        self.gha
    }

    /// Geographic position of the body.
    pub fn gp(&self) -> GeoPosition {
        self.gp
    }

    /// Radius of the circle of position, in kilometers along the surface.
    pub fn distance_from_gp(&self) -> Kilometer {
        (90.0 - self.corrected_altitude).to_radians() * EARTH_RADIUS_KM
    }
}

impl fmt::Display for Sight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Sight(RA={:.2}°, Dec={:.2}°, Alt={:.2}°, Time={})",
            self.observation.ra(),
            self.observation.dec(),
            self.corrected_altitude,
            format_time(self.observation.time())
        )
    }
}
