//! projection — forward projection and the harvest control rule.
//!
//! Purpose
//! -------
//! Turn the assessed terminal-year state into a catch recommendation.
//!
//! Key behaviors
//! -------------
//! - [`forward`]: [`project`] steps the population forward under an assumed
//!   F at age with mean recruitment and Baranov catch.
//! - [`harvest_rule`]: [`HarvestRule`] maps SSB to a fraction of the target
//!   F (zero below closure, linear up to the limit, full above it).
//! - [`advice`]: [`advise`] chains a status-quo projection, the rule, and a
//!   target-F projection into the recommended catch.
//!
//! Conventions
//! -----------
//! - Projected series start the year after the terminal year; biomass and
//!   catch are in tonnes.

pub mod advice;
pub mod forward;
pub mod harvest_rule;

pub use self::advice::{CatchAdvice, advise};
pub use self::forward::{Projection, ProjectionOptions, baranov_catch, project, survive};
pub use self::harvest_rule::HarvestRule;
