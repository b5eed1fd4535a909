//! simplex::builders — Nelder–Mead solver construction helpers.
//!
//! Purpose
//! -------
//! Build the initial simplex around a starting point and wire crate-level
//! [`NelderMeadOptions`] into argmin's solver, so higher-level code can
//! request a configured solver without touching argmin-specific types.
//!
//! Conventions
//! -----------
//! - The initial simplex has `n + 1` vertices: the start itself plus one
//!   vertex per coordinate, offset by `opts.initial_step` along that axis.
//! - argmin names the coefficients differently from the classical
//!   presentation: reflection → `alpha`, expansion → `gamma`,
//!   contraction → `rho`, shrink → `sigma`.
//! - argmin stops on the population standard deviation of the vertex costs.
//!   For `k` values the best-to-worst range is at most `sqrt(2k)` times that
//!   deviation, so the tolerance handed to argmin is scaled down by this
//!   factor and a converged run has a cost range below `opts.tolerance`.
//! - The builders do **not** set the iteration budget; the runner does.
//! - Invalid settings surface as [`OptError`](crate::optimization::errors::OptError)
//!   values via the crate's `From<argmin::core::Error>` conversion.
use crate::optimization::{
    errors::OptResult,
    simplex::{
        traits::NelderMeadOptions,
        types::{SimplexSolver, Theta},
    },
};

/// Build the `n + 1` vertices of the initial simplex around `x0`.
///
/// Vertex `0` is `x0`; vertex `i + 1` is `x0` with coordinate `i` increased
/// by `step`.
pub fn initial_simplex(x0: &Theta, step: f64) -> Vec<Theta> {
    let mut vertices = Vec::with_capacity(x0.len() + 1);
    vertices.push(x0.clone());
    for i in 0..x0.len() {
        let mut vertex = x0.clone();
        vertex[i] += step;
        vertices.push(vertex);
    }
    vertices
}

/// Standard-deviation threshold that bounds the range of `vertices` costs
/// by `tolerance`.
pub fn sd_tolerance(tolerance: f64, vertices: usize) -> f64 {
    tolerance / (2.0 * vertices as f64).sqrt()
}

/// build_nelder_mead — construct argmin's simplex solver around `x0`.
///
/// Parameters
/// ----------
/// - `x0`: starting point (assumed validated).
/// - `opts`: step, coefficients, and convergence tolerance.
///
/// Errors
/// ------
/// - `OptError` (via `From<argmin::core::Error>`) when argmin rejects a
///   coefficient or the tolerance.
pub fn build_nelder_mead(x0: &Theta, opts: &NelderMeadOptions) -> OptResult<SimplexSolver> {
    let simplex = initial_simplex(x0, opts.initial_step);
    let sd_tol = sd_tolerance(opts.tolerance, simplex.len());
    let solver = SimplexSolver::new(simplex)
        .with_alpha(opts.reflection)?
        .with_gamma(opts.expansion)?
        .with_rho(opts.contraction)?
        .with_sigma(opts.shrink)?
        .with_sd_tolerance(sd_tol)?;
    Ok(solver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // The simplex has n + 1 vertices, each off the start along one axis.
    fn initial_simplex_perturbs_each_axis_once() {
        let x0 = array![0.2, 0.4, 0.6];
        let simplex = initial_simplex(&x0, 0.05);
        assert_eq!(simplex.len(), 4);
        assert_eq!(simplex[0], x0);
        for (i, vertex) in simplex.iter().skip(1).enumerate() {
            let diff = vertex - &x0;
            for (j, d) in diff.iter().enumerate() {
                let expected = if i == j { 0.05 } else { 0.0 };
                assert!((d - expected).abs() < 1e-15);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Costs whose deviation is below the scaled threshold have a range below
    // the tolerance, and the bound is tight.
    //
    // Given
    // -----
    // - Four costs: the extremes `0` and `tol`, the rest at the midpoint,
    //   which maximizes range for a given deviation.
    // - A spread-out set of four costs.
    //
    // Expect
    // ------
    // - The extreme set's deviation equals the threshold exactly.
    // - range <= sqrt(2k) · sd for the spread-out set.
    fn sd_threshold_bounds_cost_range() {
        let population_sd = |v: &[f64]| {
            let mean = v.iter().sum::<f64>() / v.len() as f64;
            (v.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / v.len() as f64).sqrt()
        };
        let tol = 1e-3;
        let extreme = [0.0, tol, tol / 2.0, tol / 2.0];
        assert!((population_sd(&extreme) - sd_tolerance(tol, 4)).abs() < 1e-15);

        let spread = [1.0, 1.4, 2.5, 3.0];
        let range = 3.0 - 1.0;
        assert!(range <= population_sd(&spread) * 8.0_f64.sqrt());
        assert!(sd_tolerance(tol, 4) < tol);
    }

    #[test]
    // Purpose
    // -------
    // Default options build a solver.
    fn build_succeeds_with_defaults() {
        let solver = build_nelder_mead(&array![1.0, 1.0], &NelderMeadOptions::default());
        assert!(solver.is_ok());
    }
}
