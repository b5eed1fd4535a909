//! Natural mortality (M) as configuration.
//!
//! M is never estimated here. It is either one rate for every age or one
//! rate per age, aligned with the age columns of the catch matrix.
use crate::errors::{AssessmentError, AssessmentResult};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Instantaneous natural mortality rate by age.
///
/// Variants
/// --------
/// - `Constant(m)`: the same rate at every age.
/// - `AtAge(values)`: `values[j]` applies to the `j`-th age column
///   (youngest first).
///
/// Serialized as `{ constant = 0.4 }` or `{ at_age = [0.5, 0.4, 0.4] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NaturalMortality {
    Constant(f64),
    AtAge(Vec<f64>),
}

impl NaturalMortality {
    /// Check that every rate is finite and non-negative.
    pub fn validate(&self) -> AssessmentResult<()> {
        let bad = match self {
            NaturalMortality::Constant(m) => (!m.is_finite() || *m < 0.0).then_some(*m),
            NaturalMortality::AtAge(values) => {
                if values.is_empty() {
                    return Err(AssessmentError::InvalidConfig {
                        field: "natural_mortality",
                        value: 0.0,
                        reason: "at-age mortality needs at least one value",
                    });
                }
                values.iter().copied().find(|m| !m.is_finite() || *m < 0.0)
            }
        };
        match bad {
            Some(value) => Err(AssessmentError::InvalidConfig {
                field: "natural_mortality",
                value,
                reason: "must be finite and non-negative",
            }),
            None => Ok(()),
        }
    }

    /// Rates for `age_count` consecutive age columns.
    ///
    /// # Errors
    /// - [`AssessmentError::InvalidConfig`] for negative or non-finite rates.
    /// - [`AssessmentError::ShapeMismatch`] when an at-age vector does not
    ///   have one value per age column.
    pub fn for_ages(&self, age_count: usize) -> AssessmentResult<Array1<f64>> {
        self.validate()?;
        match self {
            NaturalMortality::Constant(m) => Ok(Array1::from_elem(age_count, *m)),
            NaturalMortality::AtAge(values) if values.len() == age_count => {
                Ok(Array1::from_vec(values.clone()))
            }
            NaturalMortality::AtAge(values) => Err(AssessmentError::ShapeMismatch {
                what: "natural mortality at age",
                expected: age_count,
                found: values.len(),
            }),
        }
    }
}

impl Default for NaturalMortality {
    fn default() -> Self {
        NaturalMortality::Constant(0.4)
    }
}
