//! simplex — argmin-powered Nelder–Mead minimizer.
//!
//! Purpose
//! -------
//! Provide a derivative-free minimizer for small, noisy, or piecewise
//! objectives such as the terminal-F search of a tuned VPA. Callers
//! implement [`Objective`] (or pass a closure to [`minimize_fn`]) and call
//! [`minimize`] with a starting point and [`NelderMeadOptions`].
//!
//! Key behaviors
//! -------------
//! - Build the initial simplex from the start by perturbing each coordinate
//!   by a fixed step ([`builders`]).
//! - Translate classical coefficients (reflection α, expansion β,
//!   contraction γ, shrink δ) into argmin's solver configuration.
//! - Run under an iteration budget; non-convergence is a logged warning and
//!   the best vertex is always returned ([`run`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - Objectives are minimized as returned; there is no sign convention.
//! - Objective values must be finite. Objectives that need to reject a
//!   region return a large finite penalty instead of an error.
//! - Options are validated before the solver is built.
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover option validation, simplex geometry,
//!   the adapter, and convergence on quadratic and Rosenbrock problems.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::{FnObjective, minimize, minimize_fn};
pub use self::traits::{NelderMeadOptions, Objective, SimplexOutcome};
pub use self::types::{Cost, FnEvalMap, Theta};

pub mod prelude {
    pub use super::api::{minimize, minimize_fn};
    pub use super::traits::{NelderMeadOptions, Objective, SimplexOutcome};
    pub use super::types::{Cost, Theta};
}
