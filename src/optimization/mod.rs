//! optimization — simplex minimizer and unified error surface.
//!
//! Purpose
//! -------
//! Provide a cohesive optimization layer for model tuning: an argmin-backed
//! Nelder–Mead minimizer and a single error/result surface. Callers
//! implement an objective, choose a budget and tolerance, and obtain the
//! best point and diagnostics without touching backend solver details.
//!
//! Key behaviors
//! -------------
//! - Expose a high-level API for **minimizing** an objective `f(x)`
//!   (`simplex`), including configuration of the simplex geometry and
//!   stopping criteria.
//! - Normalize configuration issues, numerical failures, and backend solver
//!   errors into a single enum (`errors::OptError`) with a common result
//!   alias (`OptResult<T>`).
//!
//! Invariants & assumptions
//! ------------------------
//! - Objectives return finite values; infeasible regions are expressed as
//!   large finite penalties by the objective itself.
//! - Running out of iterations is not a failure: the best point is returned
//!   and flagged as not converged.
//!
//! Conventions
//! -----------
//! - Points are `ndarray::Array1<f64>` (`Theta`).
//! - Public entrypoints that can fail return `OptResult<T>`; callers never
//!   see raw argmin errors.
//! - Progress and warnings go through the `log` facade; with the `obs_slog`
//!   feature and `verbose = true`, argmin's slog observer is attached too.
//!
//! Downstream usage
//! ----------------
//! - The tuning layer implements `Objective` for its ridge objective and
//!   calls `minimize`.
//! - Front-ends import the curated surface via `optimization::prelude::*`.

pub mod errors;
pub mod simplex;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use stock_assessment::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::simplex::prelude::*;
}
