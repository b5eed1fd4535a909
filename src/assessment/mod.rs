//! assessment — the single entry point of the engine.
//!
//! Purpose
//! -------
//! Run the whole pipeline (tuned VPA, retrospective diagnostic or λ
//! selection, projection, harvest rule) from one configuration record and
//! return the recommended catch with its supporting figures.
//!
//! Key behaviors
//! -------------
//! - [`config`]: [`AssessmentConfig`], loadable from TOML with per-section
//!   defaults; only the harvest rule is mandatory.
//! - [`run`]: [`run_assessment`] and the [`AssessmentReport`] it returns.
//!
//! Downstream usage
//! ----------------
//! - The surrounding application renders and persists the report; nothing
//!   here performs I/O.

pub mod config;
pub mod run;

pub use self::config::{AssessmentConfig, DEFAULT_CURRENT_F_YEARS, LambdaSelection};
pub use self::run::{AssessmentInputs, AssessmentReport, run_assessment};
