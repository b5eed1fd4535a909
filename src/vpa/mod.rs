//! vpa — virtual population analysis.
//!
//! Purpose
//! -------
//! Reconstruct historical stock numbers and fishing mortality at age from
//! catch at age, given the stock numbers (or F) of the most recent year.
//!
//! Key behaviors
//! -------------
//! - [`pope`]: forward catch, F inversion with a configurable ceiling, and
//!   abundance from catch.
//! - [`plus_group`]: the named plus-group split used in non-terminal years.
//! - [`backward`]: input validation ([`StockData`]), the backward recursion
//!   ([`backward_vpa`]), and terminal stock from terminal F.
//! - [`result`]: [`VpaOutput`] and its SSB, recruitment, and F summaries.
//! - [`mortality`]: natural mortality as configuration.
//!
//! Downstream usage
//! ----------------
//! - Tuning calls [`terminal_stock_from_f`] then [`backward_vpa`] once per
//!   objective evaluation.
//! - Projection starts from the terminal year of a [`VpaOutput`].

pub mod backward;
pub mod mortality;
pub mod plus_group;
pub mod pope;
pub mod result;

pub use self::backward::{
    StockData, VpaOptions, backward_vpa, biomass_tonnes_factor, terminal_stock_from_f,
};
pub use self::mortality::NaturalMortality;
pub use self::plus_group::{PlusGroupSplit, resolve_plus_group};
pub use self::pope::{
    DEFAULT_F_CEILING, FInversion, abundance_from_catch, fishing_mortality_from_catch, pope_catch,
};
pub use self::result::VpaOutput;
