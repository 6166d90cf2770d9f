//! # Navigation service
//!
//! Request/response layer on top of the fix engine, meant to sit behind a mobile bridge or
//! a JSON API.
//!
//! A [`FixRequest`] lists star [`Reading`]s. A reading either carries the body's coordinates
//! or only its name, in which case the coordinates come from the service's [`BodyLookup`].
//! Missing values are filled in this order:
//!
//! - time: reading time, then request time, then the current time,
//! - observer height, temperature and pressure: reading value, then [`FixParams`] defaults
//!   (0 m, 10 °C, 101 kPa).
//!
//! Readings that cannot become a sight (unknown body, missing coordinates or altitude,
//! invalid value) are
//! dropped with a warning and reported in [`FixResponse::skipped`]. The fix needs at least
//! two surviving sights.
//!
//! Every outcome, including failures, is a [`FixResponse`]: callers never see a partial
//! position.
//!
//! ## JSON
//!
//! ```rust
//! use starfix::catalog::StarCatalog;
//! use starfix::service::NavigationService;
//!
//! let service = NavigationService::new(StarCatalog::navigation_stars()?);
//! let response = service.calculate_position_json(
//!     r#"{
//!         "readings": [
//!             {"name": "Sirius", "altitude": 55.5},
//!             {"name": "Canopus", "altitude": 40.2}
//!         ],
//!         "time": "2024-05-05T22:00:00",
//!         "estimated_position": {"lat": 25.0, "lon": 50.0}
//!     }"#,
//! );
//! assert!(response.contains("\"success\": true"));
//! # Ok::<(), starfix::starfix_errors::StarfixError>(())
//! ```
use std::collections::HashMap;

use camino::Utf8Path;
use hifitime::Epoch;
use serde::{Deserialize, Serialize};

use crate::{
    catalog::BodyLookup,
    constants::{Celsius, Degree, KiloPascal, Meter},
    detection::{DetectedBody, StarDetector},
    fix_params::FixParams,
    geometry::GeoPosition,
    observation::Observation,
    sight::Sight,
    sight_collection::{FixResult, SightCollection},
    starfix_errors::StarfixError,
    time::{format_time, now, parse_time},
};

/// Dead-reckoning position supplied with a request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimatedPosition {
    #[serde(alias = "latitude")]
    pub lat: Degree,
    #[serde(alias = "longitude")]
    pub lon: Degree,
}

/// One star reading of a request.
///
/// Every field is optional on the wire so that one incomplete entry does not reject the
/// whole request. A reading with `ra` and `dec` carries its own coordinates; otherwise they
/// are looked up by `name`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Reading {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ra: Option<Degree>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dec: Option<Degree>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<Degree>,
    /// Observation time (ISO 8601, UTC), overrides the request time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observer_height: Option<Meter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<Celsius>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<KiloPascal>,
}

impl Reading {
    /// A catalog reading.
    pub fn named(name: impl Into<String>, altitude: Degree) -> Self {
        Reading {
            name: Some(name.into()),
            altitude: Some(altitude),
            ..Default::default()
        }
    }

    /// A reading with the body's coordinates.
    pub fn explicit(ra: Degree, dec: Degree, altitude: Degree) -> Self {
        Reading {
            ra: Some(ra),
            dec: Some(dec),
            altitude: Some(altitude),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Fill the conditions this reading leaves unset.
    pub fn with_conditions(
        mut self,
        height: Option<Meter>,
        temp: Option<Celsius>,
        press: Option<KiloPascal>,
    ) -> Self {
        self.observer_height = self.observer_height.or(height);
        self.temperature = self.temperature.or(temp);
        self.pressure = self.pressure.or(press);
        self
    }

    /// Right ascension and declination, from the reading or from `lookup` by name.
    fn coordinates<L: BodyLookup>(&self, lookup: &L) -> Result<(Degree, Degree), StarfixError> {
        match (self.ra, self.dec, &self.name) {
            (Some(ra), Some(dec), _) => Ok((ra, dec)),
            (_, _, Some(name)) => lookup.lookup(name),
            _ => Err(StarfixError::InvalidRequest(
                "incomplete reading: needs ra and dec, or a name".into(),
            )),
        }
    }
}

/// A position fix request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FixRequest {
    #[serde(default, alias = "observations", alias = "stars")]
    pub readings: Vec<Reading>,
    /// Default observation time (ISO 8601, UTC).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_position: Option<EstimatedPosition>,
}

/// A reading that entered the fix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsedSight {
    pub star: String,
    pub ra: Degree,
    pub dec: Degree,
    pub altitude: Degree,
}

/// A reading that was dropped, and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedReading {
    /// Position of the reading in the request.
    pub index: usize,
    pub name: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatedPosition {
    pub latitude: Degree,
    pub longitude: Degree,
    /// e.g. `"14.8208°S, 27.0240°W"`
    pub position_string: String,
    pub number_of_sights: usize,
    pub observation_times: Vec<String>,
    pub intersections_used: usize,
    pub pairs_skipped: usize,
    /// No estimated position was given: each intersection kept its first candidate.
    pub ambiguous: bool,
}

impl From<&FixResult> for CalculatedPosition {
    fn from(fix: &FixResult) -> Self {
        CalculatedPosition {
            latitude: fix.position.lat(),
            longitude: fix.position.lon(),
            position_string: fix.position.to_string(),
            number_of_sights: fix.sight_count,
            observation_times: fix.observation_times.iter().map(format_time).collect(),
            intersections_used: fix.intersections_used,
            pairs_skipped: fix.pairs_skipped,
            ambiguous: fix.ambiguous,
        }
    }
}

/// Outcome of a fix request. `calculated_position` is set if and only if `success` is true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixResponse {
    pub success: bool,
    pub message: String,
    pub calculated_position: Option<CalculatedPosition>,
    pub used_sights: Vec<UsedSight>,
    pub skipped: Vec<SkippedReading>,
}

impl FixResponse {
    fn failure(message: impl Into<String>) -> Self {
        FixResponse {
            success: false,
            message: message.into(),
            calculated_position: None,
            used_sights: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

/// A fix request where the bodies are identified in a photograph.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageRequest {
    pub image_path: String,
    /// Measured altitude per body name.
    #[serde(default)]
    pub altitudes: HashMap<String, Degree>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub estimated_position: Option<EstimatedPosition>,
    #[serde(default)]
    pub observer_height: Option<Meter>,
    #[serde(default)]
    pub temperature: Option<Celsius>,
    #[serde(default)]
    pub pressure: Option<KiloPascal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageResponse {
    #[serde(flatten)]
    pub fix: FixResponse,
    pub detected_stars: Vec<DetectedBody>,
}

/// Entry point of the request/response layer.
#[derive(Debug, Clone)]
pub struct NavigationService<L: BodyLookup> {
    lookup: L,
    params: FixParams,
}

impl<L: BodyLookup> NavigationService<L> {
    /// A service with the default [`FixParams`].
    pub fn new(lookup: L) -> Self {
        Self::with_params(lookup, FixParams::default())
    }

    pub fn with_params(lookup: L, params: FixParams) -> Self {
        NavigationService { lookup, params }
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    pub fn params(&self) -> &FixParams {
        &self.params
    }

    /// Reduce one reading into a sight.
    fn reduce(&self, reading: &Reading, default_time: &Epoch) -> Result<(Sight, UsedSight), StarfixError> {
        let label = reading.name().unwrap_or("reading");
        let altitude = reading
            .altitude
            .ok_or_else(|| StarfixError::InvalidRequest(format!("missing altitude for {label}")))?;
        let (ra, dec) = reading.coordinates(&self.lookup)?;
        let time = match &reading.time {
            Some(t) => parse_time(t)?,
            None => *default_time,
        };
        let name = reading.name.clone();
        let (height, temp, press) = (
            reading.observer_height,
            reading.temperature,
            reading.pressure,
        );

        let conditions = self.params.conditions(height, temp, press);
        let mut observation = Observation::with_conditions(ra, dec, altitude, time, conditions)?;
        if let Some(name) = &name {
            observation = observation.named(name.as_str());
        }
        let sight = Sight::with_params(observation, &self.params)?;

        let used = UsedSight {
            star: name.unwrap_or_else(|| "Unknown".to_string()),
            ra,
            dec,
            altitude,
        };
        Ok((sight, used))
    }

    /// Run a fix request.
    pub fn calculate_position(&self, request: &FixRequest) -> FixResponse {
        if request.readings.len() < 2 {
            return FixResponse::failure("Need at least 2 star observations");
        }

        let default_time = match request.time.as_deref().map(parse_time).unwrap_or_else(now) {
            Ok(t) => t,
            Err(err) => return FixResponse::failure(err.to_string()),
        };

        let estimate = match request
            .estimated_position
            .map(|p| GeoPosition::new(p.lat, p.lon))
            .transpose()
        {
            Ok(e) => e,
            Err(err) => return FixResponse::failure(format!("Invalid estimated position: {err}")),
        };

        let mut response = FixResponse::failure("");
        let mut sights = Vec::with_capacity(request.readings.len());

        for (index, reading) in request.readings.iter().enumerate() {
            match self.reduce(reading, &default_time) {
                Ok((sight, used)) => {
                    sights.push(sight);
                    response.used_sights.push(used);
                }
                Err(err) => {
                    tracing::warn!(index, name = reading.name(), "skipping reading: {err}");
                    response.skipped.push(SkippedReading {
                        index,
                        name: reading.name().map(str::to_string),
                        reason: err.to_string(),
                    });
                }
            }
        }

        if sights.len() < 2 {
            response.message = format!("Not enough valid sights (need 2+, got {})", sights.len());
            return response;
        }

        let fix = SightCollection::with_params(sights, &self.params)
            .and_then(|collection| collection.fix(estimate.as_ref()));

        match fix {
            Ok(fix) => {
                response.success = true;
                response.message = "Position calculated successfully".to_string();
                response.calculated_position = Some(CalculatedPosition::from(&fix));
            }
            Err(err) => {
                response.message = format!("Error calculating position: {err}");
            }
        }
        response
    }

    /// Detect the bodies in an image, then run the fix on those the user measured.
    pub fn process_image<D: StarDetector>(&self, detector: &D, request: &ImageRequest) -> ImageResponse {
        let detection = match detector.detect(Utf8Path::new(&request.image_path)) {
            Ok(detection) if detection.matched => detection,
            Ok(_) => {
                return ImageResponse {
                    fix: FixResponse::failure("No star pattern match found"),
                    detected_stars: Vec::new(),
                }
            }
            Err(err) => {
                return ImageResponse {
                    fix: FixResponse::failure(format!("Failed to detect stars in image: {err}")),
                    detected_stars: Vec::new(),
                }
            }
        };

        let readings = detection
            .readings(&request.altitudes, request.time.as_deref())
            .into_iter()
            .map(|r| r.with_conditions(request.observer_height, request.temperature, request.pressure))
            .collect();

        let fix_request = FixRequest {
            readings,
            time: request.time.clone(),
            estimated_position: request.estimated_position,
        };

        ImageResponse {
            fix: self.calculate_position(&fix_request),
            detected_stars: detection.bodies,
        }
    }

    /// JSON in, JSON out. Malformed JSON becomes a failure response.
    pub fn calculate_position_json(&self, json: &str) -> String {
        let response = match serde_json::from_str::<FixRequest>(json) {
            Ok(request) => self.calculate_position(&request),
            Err(err) => FixResponse::failure(format!("Invalid request: {err}")),
        };
        to_json(&response)
    }
}

/// Pretty JSON of a response.
pub fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|err| {
        serde_json::json!({ "success": false, "message": err.to_string() }).to_string()
    })
}

#[cfg(test)]
mod service_test {
    use super::*;
    use crate::{
        catalog::StarCatalog, detection::StaticDetector, geometry::great_circle_distance,
        unit_test_global::NAVIGATION_CATALOG,
    };
    use approx::assert_abs_diff_eq;

    fn service() -> NavigationService<&'static StarCatalog> {
        NavigationService::new(&*NAVIGATION_CATALOG)
    }

    fn sirius_canopus(estimate: Option<EstimatedPosition>) -> FixRequest {
        FixRequest {
            readings: vec![
                Reading::named("Sirius", 55.5).with_conditions(Some(10.0), None, None),
                Reading::named("Canopus", 40.2).with_conditions(Some(10.0), None, None),
            ],
            time: Some("2024-05-05T22:00:00".into()),
            estimated_position: estimate,
        }
    }

    #[test]
    fn test_named_fix() {
        let response = service().calculate_position(&sirius_canopus(Some(EstimatedPosition {
            lat: 25.0,
            lon: 50.0,
        })));
        assert!(response.success, "{}", response.message);
        assert_eq!(response.message, "Position calculated successfully");
        assert_eq!(response.used_sights.len(), 2);
        assert_eq!(response.used_sights[0].star, "Sirius");
        assert_eq!(response.used_sights[0].ra, 101.2875);

        let pos = response.calculated_position.unwrap();
        assert_eq!(pos.number_of_sights, 2);
        assert_eq!(pos.observation_times, vec!["2024-05-05T22:00:00"; 2]);
        assert!(!pos.ambiguous);
        assert_abs_diff_eq!(pos.latitude, -14.8208, epsilon = 0.05);
        assert_abs_diff_eq!(pos.longitude, -27.0240, epsilon = 0.05);
    }

    #[test]
    fn test_fix_without_estimate_is_ambiguous() {
        let response = service().calculate_position(&sirius_canopus(None));
        assert!(response.success);
        assert!(response.calculated_position.unwrap().ambiguous);
    }

    #[test]
    fn test_unknown_star_is_skipped() {
        let mut request = sirius_canopus(None);
        request.readings.push(Reading::named("Nibiru", 30.0));
        let response = service().calculate_position(&request);

        assert!(response.success);
        assert_eq!(response.used_sights.len(), 2);
        assert_eq!(response.skipped.len(), 1);
        assert_eq!(response.skipped[0].index, 2);
        assert_eq!(response.skipped[0].name.as_deref(), Some("Nibiru"));
        assert_eq!(response.skipped[0].reason, "Celestial body not found: Nibiru");
    }

    #[test]
    fn test_not_enough_readings() {
        let request = FixRequest {
            readings: vec![Reading::named("Sirius", 55.5)],
            time: Some("2024-05-05T22:00:00".into()),
            estimated_position: None,
        };
        let response = service().calculate_position(&request);
        assert!(!response.success);
        assert_eq!(response.message, "Need at least 2 star observations");
        assert!(response.calculated_position.is_none());
    }

    #[test]
    fn test_not_enough_valid_sights() {
        let request = FixRequest {
            readings: vec![
                Reading::named("Sirius", 55.5),
                Reading::named("Canopus", 95.0),
                Reading::named("Nibiru", 30.0),
            ],
            time: Some("2024-05-05T22:00:00".into()),
            estimated_position: None,
        };
        let response = service().calculate_position(&request);
        assert!(!response.success);
        assert_eq!(response.message, "Not enough valid sights (need 2+, got 1)");
        assert_eq!(response.skipped.len(), 2);
        assert!(response.calculated_position.is_none());
    }

    #[test]
    fn test_invalid_request_time() {
        let mut request = sirius_canopus(None);
        request.time = Some("yesterday".into());
        let response = service().calculate_position(&request);
        assert!(!response.success);
        assert!(response.message.starts_with("Invalid observation time"));
    }

    #[test]
    fn test_geometry_failure_is_reported() {
        let request = FixRequest {
            readings: vec![Reading::named("Sirius", 89.5), Reading::named("Vega", 89.5)],
            time: Some("2024-01-15T02:00:00".into()),
            estimated_position: None,
        };
        let response = service().calculate_position(&request);
        assert!(!response.success);
        assert!(response.message.starts_with("Error calculating position: No intersection found"));
        assert!(response.calculated_position.is_none());
    }

    #[test]
    fn test_explicit_readings_with_their_own_time() {
        let json = r#"{
            "stars": [
                {"name": "Sirius", "ra": 101.2875, "dec": -16.7161, "altitude": 55.5,
                 "time": "2024-05-05T22:00:00", "observer_height": 10.0},
                {"ra": 95.9879, "dec": -52.6957, "altitude": 40.2,
                 "time": "2024-05-05T22:00:00", "observer_height": 10.0}
            ],
            "estimated_position": {"latitude": 25.0, "longitude": 50.0}
        }"#;
        let request: FixRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.readings[1].name(), None);
        assert_eq!(request.readings[1].ra, Some(95.9879));

        let response = service().calculate_position(&request);
        assert!(response.success, "{}", response.message);
        assert_eq!(response.used_sights[1].star, "Unknown");

        let named = service().calculate_position(&sirius_canopus(Some(EstimatedPosition {
            lat: 25.0,
            lon: 50.0,
        })));
        let (a, b) = (
            response.calculated_position.unwrap(),
            named.calculated_position.unwrap(),
        );
        let a = GeoPosition::new(a.latitude, a.longitude).unwrap();
        let b = GeoPosition::new(b.latitude, b.longitude).unwrap();
        assert!(great_circle_distance(&a, &b) < 1e-6);
    }

    #[test]
    fn test_incomplete_reading_is_skipped() {
        let mut request = sirius_canopus(None);
        request.readings.push(Reading {
            ra: Some(10.0),
            dec: Some(10.0),
            ..Default::default()
        });
        request.readings.push(Reading {
            altitude: Some(30.0),
            ..Default::default()
        });
        let response = service().calculate_position(&request);

        assert!(response.success, "{}", response.message);
        assert_eq!(response.used_sights.len(), 2);
        let skipped: Vec<usize> = response.skipped.iter().map(|s| s.index).collect();
        assert_eq!(skipped, vec![2, 3]);
        assert_eq!(
            response.skipped[0].reason,
            "Invalid request: missing altitude for reading"
        );
        assert_eq!(
            response.skipped[1].reason,
            "Invalid request: incomplete reading: needs ra and dec, or a name"
        );
    }

    #[test]
    fn test_explicit_coordinates_win_over_name() {
        let request = FixRequest {
            readings: vec![
                Reading::explicit(101.2875, -16.7161, 55.5)
                    .with_name("Not In Catalog")
                    .with_conditions(Some(10.0), None, None),
                Reading::named("Canopus", 40.2).with_conditions(Some(10.0), None, None),
            ],
            time: Some("2024-05-05T22:00:00".into()),
            estimated_position: None,
        };
        let response = service().calculate_position(&request);
        assert!(response.success, "{}", response.message);
        assert_eq!(response.used_sights[0].star, "Not In Catalog");
        assert!(response.skipped.is_empty());
    }

    #[test]
    fn test_json_round_trip() {
        let json = r#"{"observations": [{"name": "Sirius", "altitude": 55.5}, {"name": "Canopus", "altitude": 40.2}],
                       "time": "2024-05-05T22:00:00"}"#;
        let out = service().calculate_position_json(json);
        let response: FixResponse = serde_json::from_str(&out).unwrap();
        assert!(response.success);
        assert_eq!(response.calculated_position.unwrap().number_of_sights, 2);

        let out = service().calculate_position_json("{not json");
        let response: FixResponse = serde_json::from_str(&out).unwrap();
        assert!(!response.success);
        assert!(response.message.starts_with("Invalid request"));
    }

    #[test]
    fn test_process_image() {
        let request = ImageRequest {
            image_path: "night_sky.jpg".into(),
            altitudes: HashMap::from([("Sirius".to_string(), 55.5), ("Canopus".to_string(), 40.2)]),
            time: Some("2024-05-05T22:00:00".into()),
            estimated_position: Some(EstimatedPosition { lat: 25.0, lon: 50.0 }),
            observer_height: Some(10.0),
            ..Default::default()
        };
        let response = service().process_image(&StaticDetector::sirius_canopus(), &request);
        assert!(response.fix.success, "{}", response.fix.message);
        assert_eq!(response.detected_stars.len(), 2);

        let pos = response.fix.calculated_position.unwrap();
        assert_abs_diff_eq!(pos.latitude, -14.8208, epsilon = 0.05);
        assert_abs_diff_eq!(pos.longitude, -27.0240, epsilon = 0.05);
    }

    #[test]
    fn test_process_image_without_match() {
        let request = ImageRequest {
            image_path: "clouds.jpg".into(),
            ..Default::default()
        };
        let response = service().process_image(&StaticDetector::default(), &request);
        assert!(!response.fix.success);
        assert_eq!(response.fix.message, "No star pattern match found");
    }
}
