//! High-level entry points for derivative-free minimization.
//!
//! [`minimize`] takes an [`Objective`] implementation plus its data;
//! [`minimize_fn`] wraps a plain closure for one-off problems and tests.
use crate::optimization::{
    errors::OptResult,
    simplex::{
        adapter::ArgMinAdapter,
        builders::build_nelder_mead,
        run::run_nelder_mead,
        traits::{NelderMeadOptions, Objective, SimplexOutcome},
        types::{Cost, Theta},
        validation::validate_start,
    },
};

/// Minimize an objective with the Nelder–Mead simplex method.
///
/// # Behavior
/// - Validates the start (non-empty, finite) and calls `f.check(x0, data)`.
/// - Builds the initial simplex around `x0` and configures the solver.
/// - Runs until the simplex spread falls below `opts.tolerance` or the
///   budget is exhausted; either way the best vertex is returned.
///
/// # Errors
/// - Invalid starts, invalid options, and errors raised by the objective.
///
/// # Example
/// ```no_run
/// use ndarray::array;
/// use stock_assessment::optimization::simplex::{minimize_fn, NelderMeadOptions, Theta};
///
/// let opts = NelderMeadOptions::new(200, 1e-10)?;
/// let bowl = |x: &Theta| (x[0] - 3.0).powi(2) + (x[1] - 2.0).powi(2);
/// let out = minimize_fn(bowl, array![0.0, 0.0], &opts)?;
/// println!("optimum = {:?}", out.optimum);
/// # Ok::<(), stock_assessment::optimization::errors::OptError>(())
/// ```
pub fn minimize<F: Objective>(
    f: &F, x0: Theta, data: &F::Data, opts: &NelderMeadOptions,
) -> OptResult<SimplexOutcome> {
    opts.validate()?;
    validate_start(&x0)?;
    f.check(&x0, data)?;
    let solver = build_nelder_mead(&x0, opts)?;
    let problem = ArgMinAdapter::new(f, data);
    run_nelder_mead(opts, problem, solver)
}

/// Closure-backed [`Objective`] used by [`minimize_fn`].
pub struct FnObjective<G>(pub G);

impl<G> Objective for FnObjective<G>
where
    G: Fn(&Theta) -> f64,
{
    type Data = ();

    fn value(&self, x: &Theta, _data: &()) -> OptResult<Cost> {
        Ok((self.0)(x))
    }
}

/// Minimize a plain closure `g(x)` with the Nelder–Mead simplex method.
pub fn minimize_fn<G>(g: G, x0: Theta, opts: &NelderMeadOptions) -> OptResult<SimplexOutcome>
where
    G: Fn(&Theta) -> f64,
{
    minimize(&FnObjective(g), x0, &(), opts)
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
    // - Convergence on a separable quadratic and on Rosenbrock's valley.
    // - Budget exhaustion returning the best point instead of an error.
    // - Rejection of invalid starts before any evaluation.
    // -------------------------------------------------------------------------

    fn rosenbrock(x: &Theta) -> f64 {
        (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0] * x[0]).powi(2)
    }

    #[test]
    // Purpose
    // -------
    // The global minimum of (x1 − 3)² + (x2 − 2)² is found within 0.1 in at
    // most 200 iterations.
    //
    // Given
    // -----
    // - Start at the origin, default coefficients.
    //
    // Expect
    // ------
    // - |x1 − 3| < 0.1 and |x2 − 2| < 0.1, iterations ≤ 200.
    fn quadratic_minimum_within_two_hundred_iterations() {
        // Arrange
        let opts = NelderMeadOptions::new(200, 1e-10).expect("valid options");

        // Act
        let out = minimize_fn(
            |x| (x[0] - 3.0).powi(2) + (x[1] - 2.0).powi(2),
            array![0.0, 0.0],
            &opts,
        )
        .expect("minimization should run");

        // Assert
        assert!(out.iterations <= 200);
        assert!((out.optimum[0] - 3.0).abs() < 0.1, "x1 = {}", out.optimum[0]);
        assert!((out.optimum[1] - 2.0).abs() < 0.1, "x2 = {}", out.optimum[1]);
    }

    #[test]
    // Purpose
    // -------
    // Rosenbrock's function is driven below 0.1 within 1000 iterations.
    fn rosenbrock_within_one_thousand_iterations() {
        // Arrange
        let opts = NelderMeadOptions::new(1000, 1e-12).expect("valid options");

        // Act
        let out = minimize_fn(rosenbrock, array![-1.2, 1.0], &opts).expect("should run");

        // Assert
        assert!(out.iterations <= 1000);
        assert!(out.value < 0.1, "f = {}", out.value);
        assert!((rosenbrock(&out.optimum) - out.value).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // A tiny budget ends the run early; the best point so far is returned
    // with `converged = false` rather than an error.
    fn exhausted_budget_returns_best_point() {
        let opts = NelderMeadOptions::new(3, 1e-14).expect("valid options");
        let out = minimize_fn(rosenbrock, array![-1.2, 1.0], &opts).expect("should run");
        assert!(!out.converged);
        assert!(out.value <= rosenbrock(&array![-1.2, 1.0]));
    }

    #[test]
    // Purpose
    // -------
    // Empty and non-finite starts are rejected up front.
    fn invalid_starts_are_rejected() {
        let opts = NelderMeadOptions::default();
        assert_eq!(minimize_fn(|_| 0.0, Theta::zeros(0), &opts).unwrap_err(), OptError::EmptyStart);
        assert!(matches!(
            minimize_fn(|_| 0.0, array![f64::NAN], &opts),
            Err(OptError::InvalidStart { index: 0, .. })
        ));
    }
}
