//! # Position fix from a set of sights
//!
//! A [`SightCollection`] holds two or more [`Sight`]s and combines their circles of position
//! into a single [`FixResult`].
//!
//! ## Two sights
//!
//! The two circles are intersected. When an estimated position is available, the candidate
//! closest to it is kept (ties go to the second candidate). Without an estimate the first
//! candidate is returned and the result is flagged `ambiguous`. Any intersection failure is
//! returned as is.
//!
//! ## Three or more sights
//!
//! Every unordered pair `(i, j)` with `i < j` is intersected, in insertion order. Pairs whose
//! circles do not meet, are contained, or are degenerate are skipped with a warning. The
//! chosen candidate of every remaining pair contributes one unit vector, and the fix is the
//! normalized mean of those vectors. When no pair succeeds the fix fails with
//! [`StarfixError::NoValidIntersection`].
use hifitime::Epoch;
use itertools::Itertools;

use crate::{
    fix_params::FixParams,
    geometry::{great_circle_distance, mean_position, GeoPosition},
    intersection::CircleOfPosition,
    sight::Sight,
    starfix_errors::StarfixError,
};

/// Outcome of a position fix.
#[derive(Debug, Clone, PartialEq)]
pub struct FixResult {
    /// Estimated observer position.
    pub position: GeoPosition,
    /// Number of sights in the collection.
    pub sight_count: usize,
    /// Observation time of every sight, in insertion order.
    pub observation_times: Vec<Epoch>,
    /// Number of pairwise intersections averaged into `position`.
    pub intersections_used: usize,
    /// Number of sight pairs dropped because their circles have no usable intersection.
    pub pairs_skipped: usize,
    /// No estimated position was supplied, so each pair kept its first candidate.
    pub ambiguous: bool,
}

/// The intersection of one sight pair.
#[derive(Debug, Clone, PartialEq)]
pub struct PairFix {
    /// Index of the first sight of the pair.
    pub first: usize,
    /// Index of the second sight (always greater than `first`).
    pub second: usize,
    /// Both intersection points, in the order returned by the intersection.
    pub candidates: [GeoPosition; 2],
    /// The candidate retained for the fix.
    pub chosen: GeoPosition,
}

/// An ordered set of at least two sights.
#[derive(Debug, Clone, PartialEq)]
pub struct SightCollection {
    sights: Vec<Sight>,
    degenerate_eps: f64,
}

impl SightCollection {
    /// Build a collection with the default degeneracy tolerance.
    ///
    /// Return
    /// ----------
    /// * [`StarfixError::NotEnoughSights`] when fewer than two sights are given.
    pub fn new(sights: Vec<Sight>) -> Result<Self, StarfixError> {
        Self::with_params(sights, &FixParams::default())
    }

    pub fn with_params(sights: Vec<Sight>, params: &FixParams) -> Result<Self, StarfixError> {
        if sights.len() < 2 {
            return Err(StarfixError::NotEnoughSights(sights.len()));
        }
        Ok(SightCollection {
            sights,
            degenerate_eps: params.degenerate_eps,
        })
    }

    pub fn sights(&self) -> &[Sight] {
        &self.sights
    }

    pub fn len(&self) -> usize {
        self.sights.len()
    }

    /// Always false: a collection holds at least two sights.
    pub fn is_empty(&self) -> bool {
        self.sights.is_empty()
    }

    /// Observation times in insertion order.
    pub fn observation_times(&self) -> Vec<Epoch> {
        self.sights.iter().map(|s| *s.observation().time()).collect()
    }

    /// Intersect the circles of sights `i` and `j`.
    fn intersect_pair(
        &self,
        i: usize,
        j: usize,
        estimate: Option<&GeoPosition>,
    ) -> Result<PairFix, StarfixError> {
        let c1 = CircleOfPosition::from(&self.sights[i]);
        let c2 = CircleOfPosition::from(&self.sights[j]);
        let candidates = c1.intersect(&c2, self.degenerate_eps)?;

        Ok(PairFix {
            first: i,
            second: j,
            candidates,
            chosen: choose_candidate(&candidates, estimate),
        })
    }

    /// Intersect every unordered pair of sights.
    ///
    /// Pairs without a usable intersection are logged and left out, so the returned vector
    /// may be shorter than `n·(n−1)/2`.
    pub fn pairwise_intersections(&self, estimate: Option<&GeoPosition>) -> Vec<PairFix> {
        (0..self.sights.len())
            .tuple_combinations()
            .filter_map(|(i, j)| match self.intersect_pair(i, j, estimate) {
                Ok(pair) => Some(pair),
                Err(err) => {
                    tracing::warn!(first = i, second = j, "skipping sight pair: {err}");
                    None
                }
            })
            .collect()
    }

    /// Compute the position fix.
    ///
    /// Arguments
    /// -----------------
    /// * `estimate`: optional dead-reckoning position used to pick between the two
    ///   candidates of every intersection.
    ///
    /// Return
    /// ----------
    /// * The [`FixResult`], or a geometry error: the intersection error of a two-sight
    ///   collection, [`StarfixError::NoValidIntersection`] when no pair of a larger collection
    ///   intersects.
    pub fn fix(&self, estimate: Option<&GeoPosition>) -> Result<FixResult, StarfixError> {
        let n = self.sights.len();
        let total_pairs = n * (n - 1) / 2;

        let (position, used) = if n == 2 {
            (self.intersect_pair(0, 1, estimate)?.chosen, 1)
        } else {
            let pairs = self.pairwise_intersections(estimate);
            if pairs.is_empty() {
                return Err(StarfixError::NoValidIntersection(total_pairs));
            }
            let chosen: Vec<GeoPosition> = pairs.iter().map(|p| p.chosen).collect();
            (mean_position(&chosen)?, chosen.len())
        };

        tracing::debug!(
            sights = n,
            intersections = used,
            "position fix at {position}"
        );

        Ok(FixResult {
            position,
            sight_count: n,
            observation_times: self.observation_times(),
            intersections_used: used,
            pairs_skipped: total_pairs - used,
            ambiguous: estimate.is_none(),
        })
    }
}

/// Keep the candidate closest to the estimate, or the first one without an estimate.
fn choose_candidate(candidates: &[GeoPosition; 2], estimate: Option<&GeoPosition>) -> GeoPosition {
    match estimate {
        Some(est) => {
            let d1 = great_circle_distance(&candidates[0], est);
            let d2 = great_circle_distance(&candidates[1], est);
            if d1 < d2 {
                candidates[0]
            } else {
                candidates[1]
            }
        }
        None => candidates[0],
    }
}
