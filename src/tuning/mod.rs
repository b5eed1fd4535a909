//! tuning — terminal-F estimation against abundance indices.
//!
//! Purpose
//! -------
//! Choose the terminal fishing mortality the backward VPA cannot observe
//! by matching VPA-implied abundance to independent survey indices, with a
//! ridge penalty against implausible jumps from recent F.
//!
//! Key behaviors
//! -------------
//! - [`index`]: [`AbundanceIndex`], the quantity each index tracks, and
//!   pairing with VPA values.
//! - [`estimator`]: `{q, b}` of `I = q · X^b` by log-space least squares.
//! - [`objective`]: the ridge objective and per-index residuals.
//! - [`orchestrator`]: the explicit objective struct, the initial guess,
//!   and [`tune_vpa`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Index parameters are re-estimated on every objective evaluation and
//!   never persisted across evaluations.
//! - Non-positive or missing values never enter log space; they are
//!   skipped.
//!
//! Testing notes
//! -------------
//! - Unit tests use a synthetic stock simulated forward from known F, so
//!   the true terminal F fits noise-free indices exactly.

pub mod estimator;
pub mod index;
pub mod objective;
pub mod orchestrator;

pub use self::estimator::{IndexParameters, estimate_b, estimate_parameters, estimate_q};
pub use self::index::{AbundanceIndex, IndexKind, MatchedSeries};
pub use self::objective::{IndexResidual, ObjectiveValue, ridge_objective};
pub use self::orchestrator::{
    OBJECTIVE_SENTINEL, RidgeObjective, TuningData, TuningOptions, TuningResult,
    initial_terminal_f, tune_vpa,
};
