//! Adapter that exposes a user `Objective` as an `argmin` problem.
//!
//! Objectives are minimized as-is; the adapter only forwards the call and
//! refuses non-finite values so the simplex ordering stays well defined.
use crate::optimization::{
    errors::OptError,
    simplex::{
        traits::Objective,
        types::{Cost, Theta},
    },
};
use argmin::core::{CostFunction, Error};

/// Bridges a user [`Objective`] to `argmin`'s `CostFunction`.
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: Objective> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<'a, F: Objective> ArgMinAdapter<'a, F> {
    /// Construct a new adapter over a user objective and its data.
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data }
    }
}

impl<'a, F: Objective> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate the objective at `x`.
    ///
    /// # Errors
    /// - Propagates any `OptError` from the user's `value`.
    /// - Returns `NonFiniteCost` if the value is `NaN` or infinite.
    fn cost(&self, x: &Self::Param) -> Result<Self::Output, Error> {
        let output = self.f.value(x, self.data)?;
        if !output.is_finite() {
            return Err((OptError::NonFiniteCost { value: output }).into());
        }
        Ok(output)
    }
}
