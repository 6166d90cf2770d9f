//! # Star detection boundary
//!
//! Plate solving (recognizing a star pattern in a photograph) is delegated to an external
//! solver. This module only defines what the rest of the crate expects from one:
//!
//! - a [`StarDetector`] takes an image path and returns a [`Detection`],
//! - a [`Detection`] lists the identified [`DetectedBody`]s with their catalog coordinates.
//!
//! Pixel positions are carried for display but never used by the fix. Altitudes cannot be
//! read from a photograph, so [`Detection::readings`] pairs identified bodies with
//! altitudes measured by the user.
use std::collections::HashMap;

use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use crate::{constants::Degree, service::Reading, starfix_errors::StarfixError};

/// Hipparcos identifiers of the bright navigation stars.
const HIP_NAMES: [(u32, &str); 17] = [
    (32349, "Sirius"),
    (30438, "Canopus"),
    (69673, "Arcturus"),
    (91262, "Vega"),
    (24608, "Capella"),
    (24436, "Rigel"),
    (37279, "Procyon"),
    (27989, "Betelgeuse"),
    (97649, "Altair"),
    (21421, "Aldebaran"),
    (80763, "Antares"),
    (65474, "Spica"),
    (37826, "Pollux"),
    (113368, "Fomalhaut"),
    (102098, "Deneb"),
    (11767, "Polaris"),
    (49669, "Regulus"),
];

/// Common name of a bright star from its Hipparcos number.
pub fn hip_to_name(hip_id: u32) -> Option<&'static str> {
    HIP_NAMES
        .iter()
        .find(|(id, _)| *id == hip_id)
        .map(|(_, name)| *name)
}

/// A body identified in an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedBody {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub hip_id: Option<u32>,
    #[serde(default)]
    pub ra: Option<Degree>,
    #[serde(default)]
    pub dec: Option<Degree>,
    #[serde(default)]
    pub magnitude: Option<f64>,
    /// (x, y) position in the image, in pixels.
    #[serde(default)]
    pub pixel: Option<(f64, f64)>,
}

impl DetectedBody {
    /// The explicit name, or the common name of the Hipparcos star.
    pub fn common_name(&self) -> Option<String> {
        self.name
            .clone()
            .or_else(|| self.hip_id.and_then(hip_to_name).map(str::to_string))
    }
}

/// Result of a plate solve.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Detection {
    /// A star pattern was recognized.
    pub matched: bool,
    /// Pattern-match confidence in `[0, 1]`.
    pub confidence: f64,
    pub bodies: Vec<DetectedBody>,
}

impl Detection {
    /// Build one explicit reading per identified body the user measured.
    ///
    /// Bodies without a name, without coordinates, or without an entry in `altitudes`
    /// (matched case-insensitively) are ignored. Each reading carries `time` when given;
    /// observing conditions are left to the caller.
    pub fn readings(&self, altitudes: &HashMap<String, Degree>, time: Option<&str>) -> Vec<Reading> {
        self.bodies
            .iter()
            .filter_map(|body| {
                let name = body.common_name()?;
                let (ra, dec) = (body.ra?, body.dec?);
                let altitude = altitudes
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(&name))
                    .map(|(_, alt)| *alt)?;
                Some(Reading {
                    time: time.map(str::to_string),
                    ..Reading::explicit(ra, dec, altitude).with_name(name)
                })
            })
            .collect()
    }
}

/// Plate solver interface.
pub trait StarDetector {
    fn detect(&self, image: &Utf8Path) -> Result<Detection, StarfixError>;
}

/// A detector that always returns the same detection.
///
/// Stands in for a real solver when none is available.
#[derive(Debug, Clone, Default)]
pub struct StaticDetector {
    detection: Detection,
}

impl StaticDetector {
    pub fn new(detection: Detection) -> Self {
        StaticDetector { detection }
    }

    /// Sirius and Canopus, as a solver would report them in a southern winter sky.
    pub fn sirius_canopus() -> Self {
        StaticDetector::new(Detection {
            matched: true,
            confidence: 0.95,
            bodies: vec![
                DetectedBody {
                    name: Some("Sirius".into()),
                    hip_id: Some(32349),
                    ra: Some(101.2875),
                    dec: Some(-16.7161),
                    magnitude: Some(-1.46),
                    pixel: Some((512.0, 384.0)),
                },
                DetectedBody {
                    name: Some("Canopus".into()),
                    hip_id: Some(30438),
                    ra: Some(95.9879),
                    dec: Some(-52.6957),
                    magnitude: Some(-0.74),
                    pixel: Some((256.0, 512.0)),
                },
            ],
        })
    }
}

impl StarDetector for StaticDetector {
    fn detect(&self, _image: &Utf8Path) -> Result<Detection, StarfixError> {
        Ok(self.detection.clone())
    }
}
