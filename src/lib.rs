//! stock_assessment — age-structured fish stock assessment engine.
//!
//! Purpose
//! -------
//! Estimate the historical and current size of an exploited fish population
//! from catch-at-age records and survey indices, then recommend a catch
//! limit. The crate covers backward reconstruction (VPA), terminal-F tuning
//! against abundance indices (ridge/tuning VPA), retrospective bias
//! diagnostics (Mohn's ρ), forward projection, and the harvest control rule.
//!
//! Key behaviors
//! -------------
//! - [`matrix`]: immutable, unit-tagged `(year × age)` containers.
//! - [`vpa`]: Pope's approximation, plus-group resolution, and the backward
//!   cohort recursion.
//! - [`tuning`]: index parameter estimation, the ridge objective, and the
//!   terminal-F search.
//! - [`optimization`]: argmin-backed Nelder–Mead minimizer.
//! - [`retrospective`]: peeled re-runs, Mohn's ρ, and the λ grid search.
//! - [`projection`]: forward projection and the harvest control rule.
//! - [`assessment`]: the single entry point producing a catch
//!   recommendation.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every step is a pure function of its inputs; there is no I/O and no
//!   shared mutable state.
//! - Inputs are pre-validated for internal consistency by the ingestion
//!   layer; this crate still rejects mis-shaped inputs with shape errors.
//!
//! Conventions
//! -----------
//! - Stock numbers are carried in thousands of fish, weights in grams,
//!   biomass in tonnes, rates (F, M, maturity) as dimensionless.
//! - Years are `i32` calendar years, ages are `u32` with the oldest age
//!   acting as the plus group.
//! - Degenerate numeric conditions are clamped or skipped with a `log`
//!   warning; the crate never installs a logger.
//!
//! Downstream usage
//! ----------------
//! - Application code builds input matrices and indices, loads an
//!   [`assessment::AssessmentConfig`] (optionally from TOML), and calls
//!   [`assessment::run_assessment`].
//! - Individual steps are public for diagnostics and testing.
//!
//! Testing notes
//! -------------
//! - Each module carries unit tests; `tests/` holds the end-to-end pipeline
//!   test on synthetic data.

pub mod assessment;
pub mod errors;
pub mod matrix;
pub mod optimization;
pub mod projection;
pub mod retrospective;
pub mod tuning;
pub mod vpa;

#[cfg(test)]
pub(crate) mod test_support;
