//! Abundance indices and their VPA counterparts.
//!
//! An index is an observed yearly series that should track one
//! VPA-derived quantity up to `I = q · X^b`. [`IndexKind`] names which
//! quantity; [`match_index`] pairs observations with the VPA values of the
//! same years.
use crate::{
    errors::{AssessmentError, AssessmentResult},
    vpa::VpaOutput,
};
use serde::{Deserialize, Serialize};

/// VPA quantity an index tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    /// Stock numbers at age 0 (recruitment surveys).
    Age0Abundance,
    /// Stock numbers at age 1.
    Age1Abundance,
    /// Total spawning stock biomass.
    SpawningBiomass,
}

impl IndexKind {
    /// The index's VPA counterpart in `year`.
    ///
    /// # Errors
    /// - Out-of-range errors when the year or the tracked age is outside the
    ///   VPA output.
    pub fn vpa_value(self, output: &VpaOutput, year: i32) -> AssessmentResult<f64> {
        match self {
            IndexKind::Age0Abundance => Ok(output.stock_numbers.get(year, 0)?),
            IndexKind::Age1Abundance => Ok(output.stock_numbers.get(year, 1)?),
            IndexKind::SpawningBiomass => output.ssb_at(year),
        }
    }

    /// Whether `b` is fixed to one for this kind.
    pub fn is_linear(self) -> bool {
        matches!(self, IndexKind::SpawningBiomass)
    }
}

/// An observed index series.
///
/// Invariants
/// ----------
/// - At least one observation; `observations[i]` belongs to
///   `start_year + i`.
/// - Missing observations are `NaN`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbundanceIndex {
    name: String,
    kind: IndexKind,
    start_year: i32,
    observations: Vec<f64>,
}

impl AbundanceIndex {
    /// # Errors
    /// - [`AssessmentError::InvalidIndex`] for an empty name or series.
    pub fn new(
        name: impl Into<String>, kind: IndexKind, start_year: i32, observations: Vec<f64>,
    ) -> AssessmentResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(AssessmentError::InvalidIndex { name, reason: "name must not be empty" });
        }
        if observations.is_empty() {
            return Err(AssessmentError::InvalidIndex { name, reason: "no observations" });
        }
        Ok(Self { name, kind, start_year, observations })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> IndexKind {
        self.kind
    }

    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    pub fn end_year(&self) -> i32 {
        self.start_year + self.observations.len() as i32 - 1
    }

    pub fn observations(&self) -> &[f64] {
        &self.observations
    }

    /// Observation in `year`, `None` outside the series.
    pub fn get(&self, year: i32) -> Option<f64> {
        if year < self.start_year {
            return None;
        }
        self.observations.get((year - self.start_year) as usize).copied()
    }

    /// `(year, observation)` pairs inside the inclusive window.
    pub fn window(&self, start: i32, end: i32) -> Vec<(i32, f64)> {
        (start.max(self.start_year)..=end.min(self.end_year()))
            .filter_map(|year| self.get(year).map(|obs| (year, obs)))
            .collect()
    }

    /// Number of finite, strictly positive observations inside the window.
    pub fn positive_count(&self, start: i32, end: i32) -> usize {
        self.window(start, end).iter().filter(|(_, obs)| obs.is_finite() && *obs > 0.0).count()
    }

    /// Fresh index ending at `end_year`, `None` if nothing would remain.
    pub fn truncate(&self, end_year: i32) -> Option<AbundanceIndex> {
        if end_year < self.start_year {
            return None;
        }
        let keep = ((end_year - self.start_year + 1) as usize).min(self.observations.len());
        Some(AbundanceIndex {
            name: self.name.clone(),
            kind: self.kind,
            start_year: self.start_year,
            observations: self.observations[..keep].to_vec(),
        })
    }
}

/// Observations paired with the VPA values of the same years.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedSeries {
    pub name: String,
    pub kind: IndexKind,
    pub years: Vec<i32>,
    pub observed: Vec<f64>,
    pub expected: Vec<f64>,
}

/// Pair an index with its VPA counterpart over the tuning window.
///
/// Only years present in both the index and the window are kept; missing
/// observations stay as `NaN` and are skipped by the estimator.
///
/// # Errors
/// - Out-of-range errors when the window reaches outside the VPA output.
pub fn match_index(
    index: &AbundanceIndex, output: &VpaOutput, window: (i32, i32),
) -> AssessmentResult<MatchedSeries> {
    let pairs = index.window(window.0, window.1);
    let mut years = Vec::with_capacity(pairs.len());
    let mut observed = Vec::with_capacity(pairs.len());
    let mut expected = Vec::with_capacity(pairs.len());
    for (year, obs) in pairs {
        expected.push(index.kind.vpa_value(output, year)?);
        years.push(year);
        observed.push(obs);
    }
    Ok(MatchedSeries { name: index.name.clone(), kind: index.kind, years, observed, expected })
}
