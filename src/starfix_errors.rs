use thiserror::Error;

use crate::constants::{Degree, Kilometer, Meter};

/// Broad family of a [`StarfixError`].
///
/// Callers that only need to know *why* a fix failed (bad input, impossible geometry,
/// unknown body, or an I/O problem in a collaborator) can match on this instead of
/// the individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Geometry,
    Lookup,
    Io,
}

#[derive(Error, Debug)]
pub enum StarfixError {
    #[error("Declination must be between -90 and +90 degrees, got {0}")]
    InvalidDeclination(Degree),

    #[error("Altitude must be strictly between 0 and 90 degrees, got {0}")]
    InvalidAltitude(Degree),

    #[error("Observer height must be a non-negative number of meters, got {0}")]
    InvalidObserverHeight(Meter),

    #[error("Invalid observing conditions: {0}")]
    InvalidConditions(String),

    #[error("Latitude must be between -90 and +90 degrees, got {0}")]
    InvalidLatitude(Degree),

    #[error("A sight collection requires at least 2 sights, got {0}")]
    NotEnoughSights(usize),

    #[error("Invalid observation time: {0}")]
    InvalidTime(String),

    #[error("Invalid fix parameter: {0}")]
    InvalidFixParameter(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(
        "No intersection found: circles don't meet (separation {separation_km:.1} km, radii {radius1_km:.1} km and {radius2_km:.1} km)"
    )]
    NoIntersection {
        separation_km: Kilometer,
        radius1_km: Kilometer,
        radius2_km: Kilometer,
    },

    #[error(
        "No intersection found: one circle lies inside the other (separation {separation_km:.1} km, radii {radius1_km:.1} km and {radius2_km:.1} km)"
    )]
    CircleContained {
        separation_km: Kilometer,
        radius1_km: Kilometer,
        radius2_km: Kilometer,
    },

    #[error("Circles of position share the same or antipodal centres")]
    DegenerateCircles,

    #[error("Zero vector cannot be converted to a geographic position")]
    ZeroVector,

    #[error("No valid intersections found among {0} sight pairs")]
    NoValidIntersection(usize),

    #[error("Cannot average an empty set of positions")]
    EmptyPositionSet,

    #[error("Celestial body not found: {0}")]
    BodyNotFound(String),

    #[error("Unable to read star catalog: {0}")]
    CatalogError(#[from] csv::Error),

    #[error("Star detection failed: {0}")]
    DetectorError(String),
}

impl StarfixError {
    /// Classify the error into its [`ErrorKind`] family.
    pub fn kind(&self) -> ErrorKind {
        use StarfixError::*;
        match self {
            InvalidDeclination(_)
            | InvalidAltitude(_)
            | InvalidObserverHeight(_)
            | InvalidConditions(_)
            | InvalidLatitude(_)
            | NotEnoughSights(_)
            | InvalidTime(_)
            | InvalidFixParameter(_)
            | InvalidRequest(_) => ErrorKind::Validation,

            NoIntersection { .. }
            | CircleContained { .. }
            | DegenerateCircles
            | ZeroVector
            | NoValidIntersection(_)
            | EmptyPositionSet => ErrorKind::Geometry,

            BodyNotFound(_) => ErrorKind::Lookup,

            CatalogError(_) | DetectorError(_) => ErrorKind::Io,
        }
    }
}

impl PartialEq for StarfixError {
    fn eq(&self, other: &Self) -> bool {
        use StarfixError::*;
        match (self, other) {
            (InvalidDeclination(a), InvalidDeclination(b)) => a == b,
            (InvalidAltitude(a), InvalidAltitude(b)) => a == b,
            (InvalidObserverHeight(a), InvalidObserverHeight(b)) => a == b,
            (InvalidConditions(a), InvalidConditions(b)) => a == b,
            (InvalidLatitude(a), InvalidLatitude(b)) => a == b,
            (NotEnoughSights(a), NotEnoughSights(b)) => a == b,
            (InvalidTime(a), InvalidTime(b)) => a == b,
            (InvalidFixParameter(a), InvalidFixParameter(b)) => a == b,
            (InvalidRequest(a), InvalidRequest(b)) => a == b,
            (
                NoIntersection {
                    separation_km: s1,
                    radius1_km: a1,
                    radius2_km: b1,
                },
                NoIntersection {
                    separation_km: s2,
                    radius1_km: a2,
                    radius2_km: b2,
                },
            ) => s1 == s2 && a1 == a2 && b1 == b2,
            (
                CircleContained {
                    separation_km: s1,
                    radius1_km: a1,
                    radius2_km: b1,
                },
                CircleContained {
                    separation_km: s2,
                    radius1_km: a2,
                    radius2_km: b2,
                },
            ) => s1 == s2 && a1 == a2 && b1 == b2,
            (NoValidIntersection(a), NoValidIntersection(b)) => a == b,
            (BodyNotFound(a), BodyNotFound(b)) => a == b,
            (DetectorError(a), DetectorError(b)) => a == b,

            // csv errors are not comparable: same variant is enough
            (CatalogError(_), CatalogError(_)) => true,

            (DegenerateCircles, DegenerateCircles) => true,
            (ZeroVector, ZeroVector) => true,
            (EmptyPositionSet, EmptyPositionSet) => true,

            _ => false,
        }
    }
}
