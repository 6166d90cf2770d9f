//! # Position fix parameters
//!
//! [`FixParams`] centralizes the tunable knobs of the sight-reduction pipeline:
//!
//! - which altitude corrections are applied when an [`Observation`](crate::observation::Observation)
//!   becomes a [`Sight`](crate::sight::Sight),
//! - the observing conditions assumed when a request leaves them out,
//! - the tolerance used to reject degenerate circle-of-position pairs.
//!
//! ## Example
//!
//! ```rust
//! use starfix::fix_params::FixParams;
//!
//! let params = FixParams::builder()
//!     .apply_dip(false)
//!     .default_temperature(25.0)
//!     .build()
//!     .unwrap();
//! assert!(params.apply_refraction);
//! assert!(!params.apply_dip);
//! ```
use std::cmp::Ordering::{Equal, Greater};

use crate::{
    constants::{
        Celsius, KiloPascal, Meter, Radian, DEFAULT_PRESSURE_KPA, DEFAULT_TEMPERATURE_C, EPS,
        ZERO_CELSIUS_K,
    },
    observation::ObservingConditions,
    starfix_errors::StarfixError,
};

/// Configuration of the sight-reduction pipeline.
///
/// Defaults
/// -----------------
/// * `apply_refraction`: true
/// * `apply_dip`: true
/// * `default_temperature`: 10 °C
/// * `default_pressure`: 101 kPa
/// * `default_observer_height`: 0 m
/// * `degenerate_eps`: 1e-10 rad
#[derive(Debug, Clone, PartialEq)]
pub struct FixParams {
    /// Subtract atmospheric refraction from the observed altitude.
    pub apply_refraction: bool,
    /// Subtract the dip of the horizon (only when the observer height is positive).
    pub apply_dip: bool,
    /// Temperature used when an observation does not provide one.
    pub default_temperature: Celsius,
    /// Pressure used when an observation does not provide one.
    pub default_pressure: KiloPascal,
    /// Observer height used when an observation does not provide one.
    pub default_observer_height: Meter,
    /// Angular separation (radians) below which two circle centres are considered
    /// identical, or antipodal when within this distance of π.
    pub degenerate_eps: Radian,
}

impl Default for FixParams {
    fn default() -> Self {
        FixParams {
            apply_refraction: true,
            apply_dip: true,
            default_temperature: DEFAULT_TEMPERATURE_C,
            default_pressure: DEFAULT_PRESSURE_KPA,
            default_observer_height: 0.0,
            degenerate_eps: EPS,
        }
    }
}

impl FixParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a [`FixParamsBuilder`] initialized with the default values.
    pub fn builder() -> FixParamsBuilder {
        FixParamsBuilder::new()
    }

    /// Observing conditions filled from the defaults, overridden by any value supplied.
    pub fn conditions(
        &self,
        observer_height: Option<Meter>,
        temperature: Option<Celsius>,
        pressure: Option<KiloPascal>,
    ) -> ObservingConditions {
        ObservingConditions {
            observer_height: observer_height.unwrap_or(self.default_observer_height),
            temperature: temperature.unwrap_or(self.default_temperature),
            pressure: pressure.unwrap_or(self.default_pressure),
        }
    }
}

/// Builder for [`FixParams`], with validation.
#[derive(Debug, Clone, Default)]
pub struct FixParamsBuilder {
    params: FixParams,
}

impl FixParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: FixParams::default(),
        }
    }

    pub fn apply_refraction(mut self, v: bool) -> Self {
        self.params.apply_refraction = v;
        self
    }
    pub fn apply_dip(mut self, v: bool) -> Self {
        self.params.apply_dip = v;
        self
    }
    pub fn default_temperature(mut self, v: Celsius) -> Self {
        self.params.default_temperature = v;
        self
    }
    pub fn default_pressure(mut self, v: KiloPascal) -> Self {
        self.params.default_pressure = v;
        self
    }
    pub fn default_observer_height(mut self, v: Meter) -> Self {
        self.params.default_observer_height = v;
        self
    }
    pub fn degenerate_eps(mut self, v: Radian) -> Self {
        self.params.degenerate_eps = v;
        self
    }

    /// Return true iff x > 0.0 and comparable (i.e., not NaN).
    #[inline]
    fn gt0(x: f64) -> bool {
        x.partial_cmp(&0.0) == Some(Greater)
    }

    /// Return true iff x >= 0.0 and comparable (i.e., not NaN).
    #[inline]
    fn ge0(x: f64) -> bool {
        matches!(x.partial_cmp(&0.0), Some(Greater) | Some(Equal))
    }

    /// Finalize the builder.
    ///
    /// Validation rules
    /// -----------------
    /// * `default_pressure > 0.0`
    /// * `default_temperature > -273.15`
    /// * `default_observer_height >= 0.0` and finite
    /// * `0.0 < degenerate_eps < 0.1`
    ///
    /// Returns
    /// -----------------
    /// * `Ok(FixParams)` or [`StarfixError::InvalidFixParameter`] naming the failed rule.
    pub fn build(self) -> Result<FixParams, StarfixError> {
        let p = &self.params;

        if !Self::gt0(p.default_pressure) || !p.default_pressure.is_finite() {
            return Err(StarfixError::InvalidFixParameter(
                "default_pressure must be positive".into(),
            ));
        }
        if !Self::gt0(p.default_temperature + ZERO_CELSIUS_K) || !p.default_temperature.is_finite()
        {
            return Err(StarfixError::InvalidFixParameter(
                "default_temperature must be above absolute zero".into(),
            ));
        }
        if !Self::ge0(p.default_observer_height) || !p.default_observer_height.is_finite() {
            return Err(StarfixError::InvalidFixParameter(
                "default_observer_height must be non-negative".into(),
            ));
        }
        if !Self::gt0(p.degenerate_eps) || p.degenerate_eps >= 0.1 {
            return Err(StarfixError::InvalidFixParameter(
                "degenerate_eps must be in (0, 0.1) radians".into(),
            ));
        }

        Ok(self.params)
    }
}
