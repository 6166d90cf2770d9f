//! # Star observations
//!
//! An [`Observation`] is the raw input of the engine: which body was measured (its equatorial
//! coordinates), the sextant altitude, when, and under which conditions.
//!
//! Observations are validated once at construction and are immutable afterwards:
//!
//! - right ascension must be finite and is wrapped into `[0, 360)`,
//! - declination must lie in `[-90, +90]`,
//! - the observed altitude must lie in the **open** interval `(0, 90)`,
//! - the observer height must be non-negative, the temperature above absolute zero and the
//!   pressure non-negative.
//!
//! ## Example
//!
//! ```rust
//! use starfix::observation::{Observation, ObservingConditions};
//! use starfix::time::parse_time;
//!
//! let time = parse_time("2024-05-05T22:00:00")?;
//! let conditions = ObservingConditions {
//!     observer_height: 10.0,
//!     ..ObservingConditions::default()
//! };
//! let sirius = Observation::with_conditions(101.2875, -16.7161, 55.5, time, conditions)?
//!     .named("Sirius");
//! assert_eq!(sirius.name(), Some("Sirius"));
//! # Ok::<(), starfix::starfix_errors::StarfixError>(())
//! ```
use hifitime::Epoch;

use crate::{
    constants::{
        Celsius, Degree, KiloPascal, Meter, DEFAULT_PRESSURE_KPA, DEFAULT_TEMPERATURE_C,
        ZERO_CELSIUS_K,
    },
    geometry::normalize_degrees,
    starfix_errors::StarfixError,
};

/// Conditions at the time of a sight.
///
/// Defaults: sea level, 10 °C, 101 kPa.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservingConditions {
    /// Eye height above sea level in meters.
    pub observer_height: Meter,
    /// Air temperature in °C.
    pub temperature: Celsius,
    /// Atmospheric pressure in kPa.
    pub pressure: KiloPascal,
}

impl Default for ObservingConditions {
    fn default() -> Self {
        ObservingConditions {
            observer_height: 0.0,
            temperature: DEFAULT_TEMPERATURE_C,
            pressure: DEFAULT_PRESSURE_KPA,
        }
    }
}

impl ObservingConditions {
    fn validate(&self) -> Result<(), StarfixError> {
        if !self.observer_height.is_finite() || self.observer_height < 0.0 {
            return Err(StarfixError::InvalidObserverHeight(self.observer_height));
        }
        if !self.temperature.is_finite() || self.temperature <= -ZERO_CELSIUS_K {
            return Err(StarfixError::InvalidConditions(format!(
                "temperature must be above absolute zero, got {} °C",
                self.temperature
            )));
        }
        if !self.pressure.is_finite() || self.pressure < 0.0 {
            return Err(StarfixError::InvalidConditions(format!(
                "pressure must be non-negative, got {} kPa",
                self.pressure
            )));
        }
        Ok(())
    }
}

/// A single star reading: the body's equatorial coordinates, its observed altitude and
/// the time and conditions of the sight.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    name: Option<String>,
    ra: Degree,
    dec: Degree,
    altitude: Degree,
    time: Epoch,
    conditions: ObservingConditions,
}

impl Observation {
    /// Create an observation made at sea level under default conditions.
    ///
    /// See [`Observation::with_conditions`] for the validation rules.
    pub fn new(ra: Degree, dec: Degree, altitude: Degree, time: Epoch) -> Result<Self, StarfixError> {
        Self::with_conditions(ra, dec, altitude, time, ObservingConditions::default())
    }

    /// Create an observation.
    ///
    /// Arguments
    /// -----------------
    /// * `ra`: right ascension of the body in degrees (any finite value, wrapped into `[0, 360)`).
    /// * `dec`: declination of the body in degrees, `[-90, +90]`.
    /// * `altitude`: observed altitude in degrees, strictly between 0 and 90.
    /// * `time`: observation time.
    /// * `conditions`: observer height, temperature and pressure.
    ///
    /// Return
    /// ----------
    /// * The observation or a validation error naming the offending field and value:
    ///   [`StarfixError::InvalidDeclination`], [`StarfixError::InvalidAltitude`],
    ///   [`StarfixError::InvalidObserverHeight`], [`StarfixError::InvalidConditions`], or
    ///   [`StarfixError::InvalidRequest`] for a non-finite right ascension.
    pub fn with_conditions(
        ra: Degree,
        dec: Degree,
        altitude: Degree,
        time: Epoch,
        conditions: ObservingConditions,
    ) -> Result<Self, StarfixError> {
        if !ra.is_finite() {
            return Err(StarfixError::InvalidRequest(format!(
                "right ascension must be finite, got {ra}"
            )));
        }
        if !(-90.0..=90.0).contains(&dec) {
            return Err(StarfixError::InvalidDeclination(dec));
        }
        if !(altitude > 0.0 && altitude < 90.0) {
            return Err(StarfixError::InvalidAltitude(altitude));
        }
        conditions.validate()?;

        Ok(Observation {
            name: None,
            ra: normalize_degrees(ra),
            dec,
            altitude,
            time,
            conditions,
        })
    }

    /// Attach the name of the observed body (used for reporting only).
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Right ascension in degrees, `[0, 360)`.
    pub fn ra(&self) -> Degree {
        self.ra
    }

    /// Declination in degrees.
    pub fn dec(&self) -> Degree {
        self.dec
    }

    /// Observed (uncorrected) altitude in degrees.
    pub fn altitude(&self) -> Degree {
        self.altitude
    }

    pub fn time(&self) -> &Epoch {
        &self.time
    }

    pub fn conditions(&self) -> &ObservingConditions {
        &self.conditions
    }
}

#[cfg(test)]
mod observation_test {
    use super::*;
    use crate::time::parse_time;

    fn epoch() -> Epoch {
        parse_time("2024-05-05T22:00:00").unwrap()
    }

    #[test]
    fn test_valid_observation() {
        let obs = Observation::new(461.2875, -16.7161, 55.5, epoch()).unwrap();
        assert!((obs.ra() - 101.2875).abs() < 1e-9);
        assert_eq!(obs.dec(), -16.7161);
        assert_eq!(obs.altitude(), 55.5);
        assert_eq!(obs.conditions(), &ObservingConditions::default());
        assert_eq!(obs.name(), None);

        let obs = Observation::new(-10.0, 0.0, 10.0, epoch()).unwrap();
        assert_eq!(obs.ra(), 350.0);
    }

    #[test]
    fn test_invalid_declination() {
        assert_eq!(
            Observation::new(101.0, 95.0, 40.0, epoch()),
            Err(StarfixError::InvalidDeclination(95.0))
        );
        assert_eq!(
            Observation::new(101.0, -90.5, 40.0, epoch()),
            Err(StarfixError::InvalidDeclination(-90.5))
        );
        assert!(Observation::new(101.0, 90.0, 40.0, epoch()).is_ok());
    }

    #[test]
    fn test_invalid_altitude() {
        assert_eq!(
            Observation::new(101.0, 10.0, 0.0, epoch()),
            Err(StarfixError::InvalidAltitude(0.0))
        );
        assert_eq!(
            Observation::new(101.0, 10.0, 90.0, epoch()),
            Err(StarfixError::InvalidAltitude(90.0))
        );
        assert!(Observation::new(101.0, 10.0, f64::NAN, epoch()).is_err());
        assert!(Observation::new(101.0, 10.0, 89.99, epoch()).is_ok());
    }

    #[test]
    fn test_invalid_conditions() {
        let conditions = ObservingConditions {
            observer_height: -2.0,
            ..Default::default()
        };
        assert_eq!(
            Observation::with_conditions(101.0, 10.0, 40.0, epoch(), conditions),
            Err(StarfixError::InvalidObserverHeight(-2.0))
        );

        let conditions = ObservingConditions {
            temperature: -300.0,
            ..Default::default()
        };
        let err = Observation::with_conditions(101.0, 10.0, 40.0, epoch(), conditions)
            .unwrap_err();
        assert_eq!(err.kind(), crate::starfix_errors::ErrorKind::Validation);
    }

    #[test]
    fn test_named() {
        let obs = Observation::new(95.9879, -52.6957, 40.2, epoch())
            .unwrap()
            .named("Canopus");
        assert_eq!(obs.name(), Some("Canopus"));
    }
}
