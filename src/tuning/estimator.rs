//! Index parameter estimation for `I = q · X^b`.
//!
//! Purpose
//! -------
//! Fit catchability `q` and the nonlinearity exponent `b` of one index
//! against its VPA counterpart by least squares in log space.
//!
//! Key behaviors
//! -------------
//! - `b = Cov[ln X, ln I] / Var[ln X]`, fixed to `1` for spawning-biomass
//!   indices.
//! - `q = exp(mean(ln I − b ln X))`.
//! - Pairs with a non-positive or non-finite value on either side are
//!   skipped before any statistic is taken.
//!
//! Invariants & assumptions
//! ------------------------
//! - At least two valid pairs are required; fewer is an
//!   [`AssessmentError::InsufficientData`].
//! - A constant `ln X` leaves `b` unidentified; `b = 1` is used instead and
//!   a warning is logged.
//!
//! Conventions
//! -----------
//! - Covariance and variance are the sample (n − 1) statistics from
//!   `statrs`; the ratio is the same as with population statistics.
use crate::{
    errors::{AssessmentError, AssessmentResult},
    tuning::index::{IndexKind, MatchedSeries},
};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Variance of `ln X` below which `b` is treated as unidentified.
const MIN_LOG_VARIANCE: f64 = 1e-12;

/// Catchability and nonlinearity of one index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexParameters {
    pub q: f64,
    pub b: f64,
}

impl IndexParameters {
    /// Predicted index value `q · X^b`.
    pub fn predict(&self, expected: f64) -> f64 {
        self.q * expected.powf(self.b)
    }
}

/// Log-transformed valid pairs of one series.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LogPairs {
    pub ln_expected: Vec<f64>,
    pub ln_observed: Vec<f64>,
    pub skipped: usize,
}

impl LogPairs {
    /// Keep the pairs where both sides are finite and strictly positive.
    pub fn from_series(observed: &[f64], expected: &[f64]) -> Self {
        let mut pairs = LogPairs::default();
        for (&obs, &exp) in observed.iter().zip(expected) {
            if is_log_admissible(obs) && is_log_admissible(exp) {
                pairs.ln_observed.push(obs.ln());
                pairs.ln_expected.push(exp.ln());
            } else {
                pairs.skipped += 1;
            }
        }
        pairs
    }

    pub fn len(&self) -> usize {
        self.ln_expected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ln_expected.is_empty()
    }
}

/// Whether `value` can enter a log-space fit.
pub fn is_log_admissible(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Estimate `b` from valid log pairs.
///
/// # Errors
/// - [`AssessmentError::InsufficientData`] with fewer than two pairs.
pub fn estimate_b(pairs: &LogPairs) -> AssessmentResult<f64> {
    require_pairs(pairs)?;
    let variance = pairs.ln_expected.iter().variance();
    if !variance.is_finite() || variance < MIN_LOG_VARIANCE {
        warn!("Variance of ln X is {variance:.3e}; nonlinearity b is unidentified, using b = 1");
        return Ok(1.0);
    }
    let covariance = pairs.ln_expected.iter().covariance(pairs.ln_observed.iter());
    Ok(covariance / variance)
}

/// Estimate `q` from valid log pairs for a given `b`.
///
/// # Errors
/// - [`AssessmentError::InsufficientData`] with fewer than two pairs.
pub fn estimate_q(pairs: &LogPairs, b: f64) -> AssessmentResult<f64> {
    require_pairs(pairs)?;
    let ln_q = pairs
        .ln_observed
        .iter()
        .zip(&pairs.ln_expected)
        .map(|(ln_i, ln_x)| ln_i - b * ln_x)
        .collect::<Vec<f64>>()
        .mean();
    Ok(ln_q.exp())
}

/// Estimate `{q, b}` for observed values against expected VPA values.
///
/// # Errors
/// - [`AssessmentError::InsufficientData`] with fewer than two valid pairs.
pub fn estimate_parameters(
    observed: &[f64], expected: &[f64], kind: IndexKind,
) -> AssessmentResult<IndexParameters> {
    let pairs = LogPairs::from_series(observed, expected);
    if pairs.skipped > 0 {
        debug!("Skipped {} non-positive or missing index pair(s) in log space", pairs.skipped);
    }
    let b = if kind.is_linear() { 1.0 } else { estimate_b(&pairs)? };
    let q = estimate_q(&pairs, b)?;
    Ok(IndexParameters { q, b })
}

/// Estimate `{q, b}` for a matched series.
///
/// # Errors
/// - [`AssessmentError::InsufficientData`] with fewer than two valid pairs.
pub fn estimate_for_series(series: &MatchedSeries) -> AssessmentResult<IndexParameters> {
    estimate_parameters(&series.observed, &series.expected, series.kind)
}

fn require_pairs(pairs: &LogPairs) -> AssessmentResult<()> {
    if pairs.len() < 2 {
        return Err(AssessmentError::InsufficientData {
            what: "valid index/VPA pairs",
            required: 2,
            found: pairs.len(),
        });
    }
    Ok(())
}
