//! simplex::types — shared numeric aliases and solver wiring.
//!
//! Purpose
//! -------
//! Centralize the numeric types and the argmin solver alias used by the
//! Nelder–Mead layer, so the rest of the optimization code stays agnostic to
//! `ndarray` and argmin generics.
//!
//! Conventions
//! -----------
//! - Points in the search space are `Array1<f64>` ([`Theta`]).
//! - Objective values are plain `f64` ([`Cost`]) and are always minimized.
//! - [`SimplexSolver`] is argmin's simplex solver specialized to these types.
use argmin::solver::neldermead::NelderMead;
use ndarray::Array1;
use std::collections::HashMap;

/// Point in the search space (e.g. a terminal-F vector).
pub type Theta = Array1<f64>;

/// Scalar objective value; lower is better.
pub type Cost = f64;

/// Function-evaluation counters as reported by the solver.
///
/// Maps counter names (e.g., `"cost_count"`) to counts.
pub type FnEvalMap = HashMap<String, u64>;

/// Nelder–Mead simplex solver specialized to this crate's numeric types.
pub type SimplexSolver = NelderMead<Theta, Cost>;

/// Default iteration budget.
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

/// Default convergence tolerance on the spread of simplex values.
pub const DEFAULT_TOLERANCE: f64 = 1e-8;

/// Default per-coordinate perturbation used to build the initial simplex.
pub const DEFAULT_INITIAL_STEP: f64 = 0.1;

/// Classical reflection coefficient (α).
pub const DEFAULT_REFLECTION: f64 = 1.0;

/// Classical expansion coefficient (β).
pub const DEFAULT_EXPANSION: f64 = 2.0;

/// Classical contraction coefficient (γ).
pub const DEFAULT_CONTRACTION: f64 = 0.5;

/// Classical shrink coefficient (δ).
pub const DEFAULT_SHRINK: f64 = 0.5;
