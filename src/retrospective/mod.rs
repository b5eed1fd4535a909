//! retrospective — peeled re-runs, Mohn's ρ, and λ selection.
//!
//! Purpose
//! -------
//! Diagnose retrospective bias of the tuned VPA by re-estimating it on data
//! that ends progressively earlier, and use that bias to choose the ridge
//! weight λ.
//!
//! Key behaviors
//! -------------
//! - [`peels`]: [`run_retrospective`] truncates every series by `peel`
//!   years for `peel` in `0..=max_peel`, skipping peels that would leave
//!   fewer than `min_years` years, and re-runs the tuning VPA.
//! - [`mohn`]: [`calculate_mohns_rho`] compares each peel's terminal-year
//!   SSB, recruitment, and mean F against the full-data run.
//! - [`lambda`]: [`optimize_lambda`] repeats the analysis for every λ in a
//!   grid and keeps the one with the smallest overall |ρ|.
//!
//! Invariants & assumptions
//! ------------------------
//! - Peels and λ candidates are independent and evaluated in parallel with
//!   rayon; results are returned in deterministic (peel, grid) order.
//! - Mohn's ρ failures never affect already computed VPA results.

pub mod lambda;
pub mod mohn;
pub mod peels;

pub use self::lambda::{LambdaCandidate, LambdaSearch, optimize_lambda};
pub use self::mohn::{MohnsRho, calculate_mohns_rho};
pub use self::peels::{
    DEFAULT_LAMBDA_GRID, RetrospectiveOptions, RetrospectiveResult, run_retrospective,
};
