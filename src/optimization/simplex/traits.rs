//! Public API surface for derivative-free minimization.
//!
//! - [`Objective`]: trait users implement for the function being minimized.
//! - [`NelderMeadOptions`]: iteration budget, tolerance, simplex geometry.
//! - [`SimplexOutcome`]: normalized result returned by `minimize`.
//!
//! Convention: objectives are *minimized*. An objective that wants to steer
//! the search away from an infeasible region returns a large finite value
//! rather than an error; errors abort the whole run.
use crate::optimization::{
    errors::OptResult,
    simplex::{
        types::{
            Cost, DEFAULT_CONTRACTION, DEFAULT_EXPANSION, DEFAULT_INITIAL_STEP,
            DEFAULT_MAX_ITERATIONS, DEFAULT_REFLECTION, DEFAULT_SHRINK, DEFAULT_TOLERANCE,
            FnEvalMap, Theta,
        },
        validation::{
            validate_optimum, validate_value, verify_coefficients, verify_initial_step,
            verify_max_iter, verify_tolerance,
        },
    },
};
use argmin::core::{TerminationReason, TerminationStatus};
use serde::{Deserialize, Serialize};

/// User-implemented objective interface.
///
/// - `type Data`: per-problem data carried into `value`/`check`.
///
/// Required:
/// - `value(&Theta, &Data) -> OptResult<Cost>`: evaluate the objective.
///
/// Optional:
/// - `check(&Theta, &Data) -> OptResult<()>`: validation hook called once on
///   the starting point before the simplex is built.
pub trait Objective {
    type Data;

    fn value(&self, x: &Theta, data: &Self::Data) -> OptResult<Cost>;

    fn check(&self, _x: &Theta, _data: &Self::Data) -> OptResult<()> {
        Ok(())
    }
}

/// Nelder–Mead configuration.
///
/// Fields:
/// - `max_iterations`: hard cap on simplex iterations.
/// - `tolerance`: convergence threshold on the best-to-worst range of the
///   vertex costs; argmin's deviation test is scaled so that a converged
///   simplex satisfies it.
/// - `initial_step`: perturbation added to each coordinate of the start to
///   build the initial simplex.
/// - `reflection` (α), `expansion` (β), `contraction` (γ), `shrink` (δ):
///   classical simplex coefficients.
/// - `verbose`: attach argmin's terminal observer (behind `obs_slog`).
///
/// Default: `1000` iterations, tolerance `1e-8`, step `0.1`,
/// `(α, β, γ, δ) = (1.0, 2.0, 0.5, 0.5)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NelderMeadOptions {
    pub max_iterations: usize,
    pub tolerance: f64,
    pub initial_step: f64,
    pub reflection: f64,
    pub expansion: f64,
    pub contraction: f64,
    pub shrink: f64,
    pub verbose: bool,
}

impl NelderMeadOptions {
    /// Options with the given budget and tolerance and classical coefficients.
    ///
    /// # Errors
    /// - [`OptError::InvalidMaxIter`](crate::optimization::errors::OptError::InvalidMaxIter)
    ///   if `max_iterations == 0`.
    /// - [`OptError::InvalidTolerance`](crate::optimization::errors::OptError::InvalidTolerance)
    ///   if `tolerance` is not finite and positive.
    pub fn new(max_iterations: usize, tolerance: f64) -> OptResult<Self> {
        let opts = Self { max_iterations, tolerance, ..Self::default() };
        opts.validate()?;
        Ok(opts)
    }

    /// Replace the initial simplex step.
    pub fn with_initial_step(mut self, step: f64) -> OptResult<Self> {
        verify_initial_step(step)?;
        self.initial_step = step;
        Ok(self)
    }

    /// Replace the reflection, expansion, contraction, and shrink coefficients.
    pub fn with_coefficients(
        mut self, reflection: f64, expansion: f64, contraction: f64, shrink: f64,
    ) -> OptResult<Self> {
        verify_coefficients(reflection, expansion, contraction, shrink)?;
        self.reflection = reflection;
        self.expansion = expansion;
        self.contraction = contraction;
        self.shrink = shrink;
        Ok(self)
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Re-check every field; used after deserialization.
    pub fn validate(&self) -> OptResult<()> {
        verify_max_iter(self.max_iterations)?;
        verify_tolerance(self.tolerance)?;
        verify_initial_step(self.initial_step)?;
        verify_coefficients(self.reflection, self.expansion, self.contraction, self.shrink)
    }
}

impl Default for NelderMeadOptions {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
            initial_step: DEFAULT_INITIAL_STEP,
            reflection: DEFAULT_REFLECTION,
            expansion: DEFAULT_EXPANSION,
            contraction: DEFAULT_CONTRACTION,
            shrink: DEFAULT_SHRINK,
            verbose: false,
        }
    }
}

/// Canonical result returned by `minimize`.
///
/// - `optimum`: best point found.
/// - `value`: objective value at `optimum`.
/// - `converged`: `true` only when the simplex met the tolerance; a run that
///   exhausted its budget still returns its best point with `false`.
/// - `status`: human-readable termination status.
/// - `iterations`: simplex iterations performed.
/// - `fn_evals`: function-evaluation counters reported by argmin.
#[derive(Debug, Clone, PartialEq)]
pub struct SimplexOutcome {
    pub optimum: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
}

impl SimplexOutcome {
    /// Build a validated [`SimplexOutcome`] from raw solver state.
    ///
    /// # Errors
    /// - Propagates validation errors for `optimum` or `value`.
    pub fn new(
        optimum: Option<Theta>, value: f64, termination: &TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap,
    ) -> OptResult<Self> {
        let optimum = validate_optimum(optimum)?;
        validate_value(value)?;
        let converged = matches!(
            termination,
            TerminationStatus::Terminated(TerminationReason::SolverConverged)
                | TerminationStatus::Terminated(TerminationReason::TargetCostReached)
        );
        let status = match termination {
            TerminationStatus::NotTerminated => "Not terminated".to_string(),
            other => format!("{other:?}"),
        };
        Ok(Self { optimum, value, converged, status, iterations: iterations as usize, fn_evals })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptError;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Construction and validation of `NelderMeadOptions`.
    // - Mapping of argmin termination states into `SimplexOutcome`.
    //
    // They intentionally DO NOT cover:
    // - Running the solver (see `api`).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Defaults carry the classical coefficients and validate.
    fn defaults_are_classical_and_valid() {
        let opts = NelderMeadOptions::default();
        assert_eq!(opts.reflection, 1.0);
        assert_eq!(opts.expansion, 2.0);
        assert_eq!(opts.contraction, 0.5);
        assert_eq!(opts.shrink, 0.5);
        assert!(opts.validate().is_ok());
    }

    #[test]
    // Purpose
    // -------
    // `new` rejects a zero budget and a non-positive tolerance.
    fn new_rejects_invalid_budget_and_tolerance() {
        assert!(matches!(NelderMeadOptions::new(0, 1e-6), Err(OptError::InvalidMaxIter { .. })));
        assert!(matches!(NelderMeadOptions::new(10, 0.0), Err(OptError::InvalidTolerance { .. })));
    }

    #[test]
    // Purpose
    // -------
    // A run that hit its iteration cap is reported as not converged but
    // still carries its best point.
    fn max_iters_is_not_convergence() {
        let status = TerminationStatus::Terminated(TerminationReason::MaxItersReached);
        let outcome =
            SimplexOutcome::new(Some(array![1.0, 2.0]), 0.5, &status, 10, FnEvalMap::new())
                .expect("valid outcome");
        assert!(!outcome.converged);
        assert_eq!(outcome.optimum, array![1.0, 2.0]);
        assert_eq!(outcome.iterations, 10);

        let status = TerminationStatus::Terminated(TerminationReason::SolverConverged);
        let outcome = SimplexOutcome::new(Some(array![1.0]), 0.0, &status, 3, FnEvalMap::new())
            .expect("valid outcome");
        assert!(outcome.converged);
    }
}
