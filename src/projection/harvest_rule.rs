//! Harvest control rule: SSB → fishing mortality scaling.
//!
//! Below the closure threshold fishing stops; between closure and the limit
//! reference point F rises linearly from zero; at or above the limit the
//! rule's full target applies. The target is expressed as a multiple of
//! current F at age, so the selectivity pattern is preserved.
use crate::errors::{AssessmentError, AssessmentResult};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Piecewise-linear harvest control rule.
///
/// Fields
/// ------
/// - `closure_ssb`: SSB (tonnes) below which F is zero.
/// - `limit_ssb`: SSB (tonnes) at and above which the full target applies.
/// - `target_multiplier`: full target F as a multiple of current F.
/// - `beta`: adjustment coefficient applied to the resulting catch.
///
/// Invariants
/// ----------
/// - `0 <= closure_ssb < limit_ssb`, all values finite.
/// - `target_multiplier > 0`, `beta > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HarvestRule {
    pub closure_ssb: f64,
    pub limit_ssb: f64,
    #[serde(default = "default_multiplier")]
    pub target_multiplier: f64,
    #[serde(default = "default_beta")]
    pub beta: f64,
}

fn default_multiplier() -> f64 {
    1.0
}

fn default_beta() -> f64 {
    0.8
}

impl HarvestRule {
    /// # Errors
    /// - [`AssessmentError::InvalidConfig`] when an invariant is violated.
    pub fn new(
        closure_ssb: f64, limit_ssb: f64, target_multiplier: f64, beta: f64,
    ) -> AssessmentResult<Self> {
        let rule = Self { closure_ssb, limit_ssb, target_multiplier, beta };
        rule.validate()?;
        Ok(rule)
    }

    pub fn validate(&self) -> AssessmentResult<()> {
        let invalid =
            |field, value, reason| Err(AssessmentError::InvalidConfig { field, value, reason });
        if !self.closure_ssb.is_finite() || self.closure_ssb < 0.0 {
            return invalid("closure_ssb", self.closure_ssb, "must be finite and >= 0");
        }
        if !self.limit_ssb.is_finite() || self.limit_ssb <= self.closure_ssb {
            return invalid("limit_ssb", self.limit_ssb, "must be finite and above closure_ssb");
        }
        if !self.target_multiplier.is_finite() || self.target_multiplier <= 0.0 {
            return invalid("target_multiplier", self.target_multiplier, "must be finite and > 0");
        }
        if !self.beta.is_finite() || self.beta <= 0.0 {
            return invalid("beta", self.beta, "must be finite and > 0");
        }
        Ok(())
    }

    /// Fraction of the full target applied at `ssb`, in `[0, 1]`.
    pub fn f_factor(&self, ssb: f64) -> f64 {
        if ssb < self.closure_ssb {
            0.0
        } else if ssb < self.limit_ssb {
            (ssb - self.closure_ssb) / (self.limit_ssb - self.closure_ssb)
        } else {
            1.0
        }
    }

    /// F at age prescribed at `ssb` given current F at age.
    pub fn target_f(&self, ssb: f64, f_current: &Array1<f64>) -> Array1<f64> {
        f_current * (self.target_multiplier * self.f_factor(ssb))
    }
}
