//! Ridge objective for terminal-F tuning.
//!
//! `total = (1 − λ) · RSS + λ · penalty`, where
//!
//! - `RSS = Σ_index Σ_year (ln I − ln q − b ln X)²` over valid pairs, and
//! - `penalty = Σ_age (F_terminal,age − F̄_recent,age)²`.
//!
//! Both components are non-negative. With `λ = 0` the total is the
//! residual sum alone; with `λ = 1` it is the penalty alone.
use crate::{
    errors::{AssessmentError, AssessmentResult},
    tuning::{
        estimator::{IndexParameters, is_log_admissible},
        index::MatchedSeries,
    },
};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Components of one objective evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveValue {
    pub residual_sum_of_squares: f64,
    pub penalty: f64,
    pub total: f64,
    pub lambda: f64,
}

/// Log residuals of one index against its fitted VPA counterpart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexResidual {
    pub name: String,
    pub parameters: IndexParameters,
    /// `(year, ln I − ln q − b ln X)` for every valid pair.
    pub residuals: Vec<(i32, f64)>,
    /// Pairs left out for non-positive or missing values.
    pub skipped: usize,
}

impl IndexResidual {
    pub fn sum_of_squares(&self) -> f64 {
        self.residuals.iter().map(|(_, r)| r * r).sum()
    }
}

/// Check that a ridge weight lies in `[0, 1]`.
///
/// # Errors
/// - [`AssessmentError::InvalidConfig`] otherwise (NaN included).
pub fn validate_lambda(lambda: f64) -> AssessmentResult<f64> {
    if !(0.0..=1.0).contains(&lambda) {
        return Err(AssessmentError::InvalidConfig {
            field: "lambda",
            value: lambda,
            reason: "ridge weight must lie in [0, 1]",
        });
    }
    Ok(lambda)
}

/// Log residuals of one matched series under fitted parameters.
pub fn index_residuals(series: &MatchedSeries, parameters: IndexParameters) -> IndexResidual {
    let ln_q = parameters.q.ln();
    let mut residuals = Vec::with_capacity(series.years.len());
    let mut skipped = 0;
    for ((&year, &obs), &exp) in series.years.iter().zip(&series.observed).zip(&series.expected) {
        if is_log_admissible(obs) && is_log_admissible(exp) {
            residuals.push((year, obs.ln() - ln_q - parameters.b * exp.ln()));
        } else {
            skipped += 1;
        }
    }
    IndexResidual { name: series.name.clone(), parameters, residuals, skipped }
}

/// Squared distance between terminal F and the recent-average F.
///
/// # Errors
/// - [`AssessmentError::ShapeMismatch`] when the vectors differ in length.
pub fn ridge_penalty(terminal_f: &Array1<f64>, recent_f: &Array1<f64>) -> AssessmentResult<f64> {
    if terminal_f.len() != recent_f.len() {
        return Err(AssessmentError::ShapeMismatch {
            what: "recent-average F",
            expected: terminal_f.len(),
            found: recent_f.len(),
        });
    }
    Ok(terminal_f.iter().zip(recent_f).map(|(t, r)| (t - r).powi(2)).sum())
}

/// Evaluate the ridge objective.
///
/// Parameters
/// ----------
/// - `series`, `parameters`: matched indices and their fitted `{q, b}`,
///   position by position.
/// - `terminal_f`: candidate terminal F at age.
/// - `recent_f`: mean F at age over the recent pre-terminal years.
/// - `lambda`: ridge weight in `[0, 1]`.
///
/// # Errors
/// - [`AssessmentError::InvalidConfig`] for λ outside `[0, 1]`.
/// - [`AssessmentError::ShapeMismatch`] when `series` and `parameters`, or
///   `terminal_f` and `recent_f`, differ in length.
pub fn ridge_objective(
    series: &[MatchedSeries], parameters: &[IndexParameters], terminal_f: &Array1<f64>,
    recent_f: &Array1<f64>, lambda: f64,
) -> AssessmentResult<ObjectiveValue> {
    let lambda = validate_lambda(lambda)?;
    if series.len() != parameters.len() {
        return Err(AssessmentError::ShapeMismatch {
            what: "index parameters",
            expected: series.len(),
            found: parameters.len(),
        });
    }
    let residual_sum_of_squares: f64 = series
        .iter()
        .zip(parameters)
        .map(|(s, p)| index_residuals(s, *p).sum_of_squares())
        .sum();
    let penalty = ridge_penalty(terminal_f, recent_f)?;
    let total = if lambda == 0.0 {
        residual_sum_of_squares
    } else if lambda == 1.0 {
        penalty
    } else {
        (1.0 - lambda) * residual_sum_of_squares + lambda * penalty
    };
    Ok(ObjectiveValue { residual_sum_of_squares, penalty, total, lambda })
}
