//! # Constants and type definitions for starfix
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **unit type
//! aliases** used throughout the `starfix` library.
//!
//! ## Overview
//!
//! - Geophysical constants (spherical Earth model)
//! - Unit conversions (arcminutes ↔ degrees)
//! - Sidereal time coefficients of the simplified GMST model
//! - Default atmospheric conditions applied when an observation omits them
//!
//! The whole engine works on a **spherical Earth** of radius [`EARTH_RADIUS_KM`]. The equatorial
//! and polar radii are kept for reference only and are not applied by the trigonometric model.

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// Mean Earth radius in kilometers (spherical approximation used everywhere)
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Earth equatorial radius in kilometers (WGS84), not used by the spherical model
pub const EARTH_EQUATORIAL_RADIUS_KM: f64 = 6378.137;

/// Earth polar radius in kilometers (WGS84), not used by the spherical model
pub const EARTH_POLAR_RADIUS_KM: f64 = 6356.752;

/// MJD epoch of J2000.0 (2000-01-01 12:00:00 UTC for the simplified sidereal model)
pub const T2000: f64 = 51544.5;

/// Arcminutes per degree
pub const ARCMIN_PER_DEG: f64 = 60.0;

/// Numerical epsilon used to detect degenerate circle configurations (radians)
pub const EPS: Radian = 1e-10;

// -------------------------------------------------------------------------------------------------
// Sidereal time
// -------------------------------------------------------------------------------------------------

/// GMST at J2000.0 in degrees
pub const GMST_J2000_DEG: f64 = 280.46061837;

/// Sidereal rotation in degrees per day since J2000.0
pub const GMST_RATE_DEG_PER_DAY: f64 = 360.98564736629;

/// Earth rotation in degrees per hour of the day
pub const DEG_PER_HOUR: f64 = 15.0;

// -------------------------------------------------------------------------------------------------
// Default observing conditions
// -------------------------------------------------------------------------------------------------

/// Air temperature assumed when none is supplied (°C)
pub const DEFAULT_TEMPERATURE_C: f64 = 10.0;

/// Atmospheric pressure assumed when none is supplied (kPa)
pub const DEFAULT_PRESSURE_KPA: f64 = 101.0;

/// Reference pressure of the refraction model (kPa)
pub const REFERENCE_PRESSURE_KPA: f64 = 101.0;

/// Reference temperature of the refraction model (K)
pub const REFERENCE_TEMPERATURE_K: f64 = 283.0;

/// 0 °C in kelvin
pub const ZERO_CELSIUS_K: f64 = 273.15;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Distance in meters
pub type Meter = f64;
/// Temperature in degrees Celsius
pub type Celsius = f64;
/// Pressure in kilopascals
pub type KiloPascal = f64;
/// Modified Julian Date (days)
pub type MJD = f64;
