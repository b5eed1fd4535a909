//! Catch advice: harvest rule applied to the projected stock.
//!
//! The advice year is the first year after the assessment's terminal year.
//! The stock is first projected under current F (status quo) to obtain the
//! advice-year SSB; the harvest rule turns that SSB into a target F; the
//! stock is projected again under the target F, and the advice-year catch
//! in tonnes, scaled by β, is the recommended catch.
use crate::{
    errors::AssessmentResult,
    projection::{
        forward::{Projection, ProjectionOptions, project},
        harvest_rule::HarvestRule,
    },
    vpa::{NaturalMortality, StockData, VpaOutput},
};
use log::info;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Recommended catch with the figures that justify it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchAdvice {
    pub year: i32,
    /// Advice-year SSB (tonnes) under current F.
    pub ssb: f64,
    pub f_factor: f64,
    pub f_current: Array1<f64>,
    pub target_f: Array1<f64>,
    /// Advice-year catch (tonnes) under the target F, before β.
    pub catch_tonnes: f64,
    pub recommended_catch: f64,
    pub status_quo: Projection,
    pub projection: Projection,
}

/// Apply `rule` to the stock projected from `output`.
///
/// # Errors
/// - Invalid rule or projection options.
/// - Shape errors when `f_current` does not match the age range.
pub fn advise(
    output: &VpaOutput, stock: &StockData, mortality: &NaturalMortality, f_current: &Array1<f64>,
    rule: &HarvestRule, opts: &ProjectionOptions,
) -> AssessmentResult<CatchAdvice> {
    rule.validate()?;
    let status_quo = project(output, stock, mortality, f_current, opts)?;
    let year = status_quo.first_year();
    let ssb = status_quo.spawning_biomass[0];
    let f_factor = rule.f_factor(ssb);
    let target_f = rule.target_f(ssb, f_current);

    let projection = project(output, stock, mortality, &target_f, opts)?;
    let catch_tonnes = projection.catch_biomass[0];
    let recommended_catch = catch_tonnes * rule.beta;
    info!(
        "Advice for {year}: SSB {ssb:.1} t, F factor {f_factor:.3}, catch {recommended_catch:.1} t"
    );
    Ok(CatchAdvice {
        year,
        ssb,
        f_factor,
        f_current: f_current.clone(),
        target_f,
        catch_tonnes,
        recommended_catch,
        status_quo,
        projection,
    })
}
