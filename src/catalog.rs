//! # Star catalog
//!
//! Name → equatorial coordinates lookup for the bodies a navigator can shoot.
//!
//! The service only depends on the [`BodyLookup`] trait, so any source of coordinates can
//! be plugged in. [`StarCatalog`] is the CSV-backed implementation; the 18 classic
//! navigation stars it ships with are available through [`StarCatalog::navigation_stars`].
//!
//! CSV layout (one header line):
//!
//! ```text
//! name,arabic,ra,dec,magnitude,constellation
//! Sirius,الشعرى اليمانية,101.2875,-16.7161,-1.46,Canis Major
//! ```
use std::io;

use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use crate::{constants::Degree, starfix_errors::StarfixError};

const NAVIGATION_STARS_CSV: &str = include_str!("../data/navigation_stars.csv");

/// Source of equatorial coordinates for named bodies.
pub trait BodyLookup {
    /// Right ascension and declination (degrees) of `name`, or `None` when unknown.
    fn coordinates(&self, name: &str) -> Option<(Degree, Degree)>;

    /// Same as [`BodyLookup::coordinates`] with a [`StarfixError::BodyNotFound`] on a miss.
    fn lookup(&self, name: &str) -> Result<(Degree, Degree), StarfixError> {
        self.coordinates(name)
            .ok_or_else(|| StarfixError::BodyNotFound(name.to_string()))
    }
}

impl<T: BodyLookup + ?Sized> BodyLookup for &T {
    fn coordinates(&self, name: &str) -> Option<(Degree, Degree)> {
        (**self).coordinates(name)
    }
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarRecord {
    pub name: String,
    pub arabic: String,
    /// Right ascension in degrees.
    pub ra: Degree,
    /// Declination in degrees.
    pub dec: Degree,
    /// Apparent visual magnitude (lower is brighter).
    pub magnitude: f64,
    pub constellation: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StarCatalog {
    stars: Vec<StarRecord>,
}

impl StarCatalog {
    pub fn new(stars: Vec<StarRecord>) -> Self {
        StarCatalog { stars }
    }

    /// The bundled navigation stars.
    pub fn navigation_stars() -> Result<Self, StarfixError> {
        Self::from_reader(NAVIGATION_STARS_CSV.as_bytes())
    }

    /// Read a catalog from any CSV source.
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, StarfixError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let stars = csv_reader
            .deserialize::<StarRecord>()
            .collect::<Result<Vec<_>, _>>()?;
        Ok(StarCatalog { stars })
    }

    /// Read a catalog from a CSV file.
    pub fn from_path(path: &Utf8Path) -> Result<Self, StarfixError> {
        let mut csv_reader = csv::Reader::from_path(path)?;
        let stars = csv_reader
            .deserialize::<StarRecord>()
            .collect::<Result<Vec<_>, _>>()?;
        Ok(StarCatalog { stars })
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StarRecord> {
        self.stars.iter()
    }

    /// Case-insensitive lookup by English name.
    pub fn get(&self, name: &str) -> Option<&StarRecord> {
        let name = name.trim();
        self.stars
            .iter()
            .find(|star| star.name.eq_ignore_ascii_case(name))
    }

    /// Exact lookup by Arabic name.
    pub fn get_by_arabic(&self, arabic: &str) -> Option<&StarRecord> {
        let arabic = arabic.trim();
        self.stars.iter().find(|star| star.arabic == arabic)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Stars with a magnitude up to `max_magnitude`, brightest first.
    pub fn list_navigation_stars(&self, max_magnitude: f64) -> Vec<&StarRecord> {
        let mut stars: Vec<&StarRecord> = self
            .stars
            .iter()
            .filter(|star| star.magnitude <= max_magnitude)
            .collect();
        stars.sort_by(|a, b| a.magnitude.total_cmp(&b.magnitude));
        stars
    }

    /// Stars inside a right ascension / declination box, bounds included.
    ///
    /// The box does not wrap: `ra_min` must not exceed `ra_max`.
    pub fn stars_in_region(
        &self,
        ra_min: Degree,
        ra_max: Degree,
        dec_min: Degree,
        dec_max: Degree,
    ) -> Vec<&StarRecord> {
        self.stars
            .iter()
            .filter(|star| {
                (ra_min..=ra_max).contains(&star.ra) && (dec_min..=dec_max).contains(&star.dec)
            })
            .collect()
    }
}

impl BodyLookup for StarCatalog {
    fn coordinates(&self, name: &str) -> Option<(Degree, Degree)> {
        self.get(name).map(|star| (star.ra, star.dec))
    }
}
