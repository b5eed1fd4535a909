//! Execution helper that runs argmin's simplex solver on an objective and
//! returns a crate-friendly [`SimplexOutcome`].
use crate::optimization::{
    errors::OptResult,
    simplex::{
        adapter::ArgMinAdapter,
        traits::{NelderMeadOptions, Objective, SimplexOutcome},
        types::SimplexSolver,
    },
};
use argmin::core::{Executor, State};
#[cfg(feature = "obs_slog")]
use argmin::core::observers::ObserverMode;
use log::{debug, warn};

/// Run a configured simplex solver against an adapted objective.
///
/// Wires up:
/// - the user objective via [`ArgMinAdapter`],
/// - the solver from
///   [`build_nelder_mead`](crate::optimization::simplex::builders::build_nelder_mead)
///   (which already carries the initial simplex),
/// - the iteration budget `opts.max_iterations`,
/// - optional observers (behind the `obs_slog` feature),
///
/// then executes and converts the final state into a [`SimplexOutcome`].
///
/// A run that exhausts its budget is not an error: a warning is logged and
/// the best vertex is returned with `converged = false`.
///
/// # Errors
/// - Propagates argmin runtime errors (including errors returned by the
///   objective) via the crate's `From<argmin::core::Error>` conversion.
/// - Propagates validation errors when constructing [`SimplexOutcome`].
pub fn run_nelder_mead<'a, F>(
    opts: &NelderMeadOptions, problem: ArgMinAdapter<'a, F>, solver: SimplexSolver,
) -> OptResult<SimplexOutcome>
where
    F: Objective,
{
    let mut optimizer = Executor::new(problem, solver);
    optimizer = optimizer.configure(|state| state.max_iters(opts.max_iterations as u64));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, ObserverMode::Always);
    }

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    let outcome = SimplexOutcome::new(
        result.take_best_param(),
        result.get_best_cost(),
        &termination,
        iterations,
        function_counts,
    )?;

    if outcome.converged {
        debug!(
            "Nelder-Mead converged after {} iterations, best value {:.6e}",
            outcome.iterations, outcome.value
        );
    } else {
        warn!(
            "Nelder-Mead stopped without converging ({}) after {} iterations; \
             returning best point with value {:.6e}",
            outcome.status, outcome.iterations, outcome.value
        );
    }
    Ok(outcome)
}
