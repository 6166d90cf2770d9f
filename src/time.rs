use hifitime::Epoch;
use std::str::FromStr;

use crate::{
    constants::{
        Degree, DEG_PER_HOUR, GMST_J2000_DEG, GMST_RATE_DEG_PER_DAY, MJD, T2000,
    },
    geometry::normalize_degrees,
    starfix_errors::StarfixError,
};

/// Parse an observation time in the format YYYY-MM-ddTHH:mm:ss
///
/// Argument
/// --------
/// * `date`: an ISO 8601 date; times without an explicit time scale are read as UTC
///
/// Return
/// ------
/// * the corresponding epoch, or [`StarfixError::InvalidTime`] when the string cannot be parsed
pub fn parse_time(date: &str) -> Result<Epoch, StarfixError> {
    Epoch::from_str(date.trim()).map_err(|e| StarfixError::InvalidTime(format!("{date}: {e}")))
}

/// Format an epoch as YYYY-MM-ddTHH:mm:ss (UTC, whole seconds)
pub fn format_time(epoch: &Epoch) -> String {
    let (y, m, d, h, min, s, _) = epoch.to_gregorian_utc();
    format!("{y:04}-{m:02}-{d:02}T{h:02}:{min:02}:{s:02}")
}

/// Current system time, used when a request carries no observation time
pub fn now() -> Result<Epoch, StarfixError> {
    Epoch::now().map_err(|e| StarfixError::InvalidTime(format!("system clock: {e}")))
}

/// Days elapsed since 2000-01-01T12:00:00 UTC
///
/// The difference is taken between UTC modified julian dates, so leap seconds do not
/// stretch the civil day.
pub fn days_since_j2000(epoch: &Epoch) -> MJD {
    epoch.to_mjd_utc_days() - T2000
}

/// Hours elapsed since 0h UTC on the day of `epoch`
fn hours_of_day(epoch: &Epoch) -> f64 {
    let (_, _, _, h, min, s, ns) = epoch.to_gregorian_utc();
    h as f64 + min as f64 / 60.0 + (s as f64 + ns as f64 * 1e-9) / 3600.0
}

/// Compute the Greenwich Mean Sidereal Time (GMST) in degrees
/// with the simplified linear model used for field navigation.
///
/// # Arguments
/// * `epoch` - observation time
///
/// # Returns
/// * GMST angle in degrees, normalized to the interval [0, 360).
///
/// # Details
/// ```text
/// GMST = 280.46061837 + 360.98564736629 · days_since_J2000 + 15 · hours_of_day
/// ```
/// The time-of-day rotation is added on top of the linear term, which itself already
/// advances with the fraction of the day. Fixes computed by this crate and the reference
/// fixtures both depend on this exact expression; it is not an IAU sidereal time.
pub fn gmst_degrees(epoch: &Epoch) -> Degree {
    let gmst = GMST_J2000_DEG
        + GMST_RATE_DEG_PER_DAY * days_since_j2000(epoch)
        + hours_of_day(epoch) * DEG_PER_HOUR;
    normalize_degrees(gmst)
}

/// Greenwich Hour Angle of a body from its right ascension
///
/// Arguments
/// ---------
/// * `ra`: right ascension in degrees
/// * `epoch`: observation time
///
/// Return
/// ------
/// * GHA in degrees, in [0, 360)
pub fn greenwich_hour_angle(ra: Degree, epoch: &Epoch) -> Degree {
    normalize_degrees(gmst_degrees(epoch) - ra)
}

/// Local Hour Angle from the GHA and the observer longitude (east positive), in [0, 360)
pub fn local_hour_angle(gha: Degree, observer_lon: Degree) -> Degree {
    normalize_degrees(gha + observer_lon)
}
