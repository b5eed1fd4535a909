//! Forward projection from the terminal year of a VPA.
//!
//! Purpose
//! -------
//! Project stock numbers, catch, and SSB for a number of years past the
//! terminal year under an assumed F at age.
//!
//! Key behaviors
//! -------------
//! - The first projected year comes from the terminal year's stock and its
//!   estimated F; later years use the assumed F.
//! - Survival: `N_{a+1,y+1} = N_{a,y} e^{−(F+M)}`; the plus group adds its
//!   own survivors to those of the second-oldest age.
//! - Recruitment is the historical mean of the VPA's recruitment series,
//!   plus an optional residual per projected year.
//! - Catch at age follows Baranov: `C = F/(F+M) (1 − e^{−(F+M)}) N`.
//! - Weight and maturity of projected years are the mean of the last
//!   `bio_years` assessed years.
//!
//! Conventions
//! -----------
//! - Stock and catch numbers stay in the catch matrix's count unit; catch
//!   biomass and SSB are in tonnes.
use crate::{
    errors::{AssessmentError, AssessmentResult},
    matrix::AgeYearMatrix,
    vpa::{NaturalMortality, StockData, VpaOutput},
};
use log::warn;
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

/// Projection configuration.
///
/// - `horizon`: number of projected years (at least one).
/// - `bio_years`: assessed years averaged for weight and maturity.
/// - `recruitment_residuals`: added to mean recruitment in projected year
///   `i` (missing entries count as zero).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionOptions {
    pub horizon: usize,
    pub bio_years: usize,
    pub recruitment_residuals: Vec<f64>,
}

impl ProjectionOptions {
    /// # Errors
    /// - [`AssessmentError::InvalidConfig`] for a zero horizon or zero
    ///   `bio_years`.
    pub fn new(horizon: usize, bio_years: usize) -> AssessmentResult<Self> {
        let opts = Self { horizon, bio_years, recruitment_residuals: Vec::new() };
        opts.validate()?;
        Ok(opts)
    }

    pub fn with_recruitment_residuals(mut self, residuals: Vec<f64>) -> AssessmentResult<Self> {
        self.recruitment_residuals = residuals;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> AssessmentResult<()> {
        if self.horizon == 0 {
            return Err(AssessmentError::InvalidConfig {
                field: "horizon",
                value: 0.0,
                reason: "must project at least one year",
            });
        }
        if self.bio_years == 0 {
            return Err(AssessmentError::InvalidConfig {
                field: "bio_years",
                value: 0.0,
                reason: "must average at least one year",
            });
        }
        if let Some(bad) = self.recruitment_residuals.iter().find(|r| !r.is_finite()) {
            return Err(AssessmentError::InvalidConfig {
                field: "recruitment_residuals",
                value: *bad,
                reason: "must be finite",
            });
        }
        Ok(())
    }
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        Self { horizon: 5, bio_years: 3, recruitment_residuals: Vec::new() }
    }
}

/// Projected population.
///
/// All per-year series start in the year after the VPA's terminal year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub stock_numbers: AgeYearMatrix,
    pub catch_numbers: AgeYearMatrix,
    /// Catch in tonnes per projected year.
    pub catch_biomass: Array1<f64>,
    /// SSB in tonnes per projected year.
    pub spawning_biomass: Array1<f64>,
    /// F at age applied in every projected year.
    pub fishing_mortality: Array1<f64>,
}

impl Projection {
    pub fn first_year(&self) -> i32 {
        self.stock_numbers.start_year()
    }

    pub fn ssb_at(&self, year: i32) -> AssessmentResult<f64> {
        let i = self.stock_numbers.year_index(year)?;
        Ok(self.spawning_biomass[i])
    }

    pub fn catch_at(&self, year: i32) -> AssessmentResult<f64> {
        let i = self.stock_numbers.year_index(year)?;
        Ok(self.catch_biomass[i])
    }
}

/// Baranov catch equation.
pub fn baranov_catch(stock: f64, f: f64, m: f64) -> f64 {
    let z = f + m;
    if z <= 0.0 {
        return 0.0;
    }
    f / z * -(-z).exp_m1() * stock
}

/// Stock numbers one year later; `recruits` enter at the youngest age.
pub fn survive(
    stock: ArrayView1<f64>, f: ArrayView1<f64>, m: ArrayView1<f64>, recruits: f64,
) -> Array1<f64> {
    let p = stock.len() - 1;
    let survivors = |a: usize| stock[a] * (-(f[a] + m[a])).exp();
    Array1::from_shape_fn(p + 1, |a| match a {
        0 => recruits,
        a if a == p => survivors(p - 1) + survivors(p),
        a => survivors(a - 1),
    })
}

/// Age-0 recruitment of each projected year: the historical mean plus the
/// year's residual (missing residuals count as 0), floored at 0 with a
/// warning. Only the `horizon` reported years are evaluated.
fn projected_recruitment(
    mean_recruitment: f64, residuals: &[f64], horizon: usize, terminal_year: i32,
) -> Vec<f64> {
    (0..horizon)
        .map(|i| {
            let r = mean_recruitment + residuals.get(i).copied().unwrap_or(0.0);
            if r < 0.0 {
                let year = terminal_year + 1 + i as i32;
                warn!("Projected recruitment {r:.3} in {year} is negative; set to 0");
                0.0
            } else {
                r
            }
        })
        .collect()
}

/// Project the population `opts.horizon` years under `future_f`.
///
/// # Errors
/// - [`AssessmentError::ShapeMismatch`] when `future_f` does not have one
///   value per age.
/// - [`AssessmentError::InvalidConfig`] for negative or non-finite F, and
///   invalid options.
/// - Unit errors when weights are not a mass.
pub fn project(
    output: &VpaOutput, stock: &StockData, mortality: &NaturalMortality, future_f: &Array1<f64>,
    opts: &ProjectionOptions,
) -> AssessmentResult<Projection> {
    opts.validate()?;
    let age_range = output.age_range();
    let ages = output.stock_numbers.age_count();
    if future_f.len() != ages {
        return Err(AssessmentError::ShapeMismatch {
            what: "projected F",
            expected: ages,
            found: future_f.len(),
        });
    }
    if let Some(bad) = future_f.iter().find(|f| !f.is_finite() || **f < 0.0) {
        return Err(AssessmentError::InvalidConfig {
            field: "projected F",
            value: *bad,
            reason: "must be finite and >= 0",
        });
    }
    let m = mortality.for_ages(ages)?;
    let terminal = output.terminal_year();
    let bio_start = terminal - opts.bio_years.min(output.stock_numbers.year_count()) as i32 + 1;
    let weight = stock.weight().mean_over_years(bio_start, terminal)?;
    let maturity = stock.maturity().mean_over_years(bio_start, terminal)?;
    let tonnes = stock.tonnes_factor()?;
    let recruitment = output.recruitment_series();
    let mean_recruitment = recruitment.sum() / recruitment.len() as f64;

    let recruits_by_year = projected_recruitment(
        mean_recruitment,
        &opts.recruitment_residuals,
        opts.horizon,
        terminal,
    );

    let mut stock_rows: Vec<Array1<f64>> = Vec::with_capacity(opts.horizon);
    let mut catch_rows = Vec::with_capacity(opts.horizon);
    let mut catch_biomass = Vec::with_capacity(opts.horizon);
    let mut spawning_biomass = Vec::with_capacity(opts.horizon);

    let terminal_f = output.terminal_f();
    for &recruits in &recruits_by_year {
        // The first projected year survives the terminal year under its own F.
        let current = match stock_rows.last() {
            None => survive(output.terminal_stock().view(), terminal_f.view(), m.view(), recruits),
            Some(previous) => survive(previous.view(), future_f.view(), m.view(), recruits),
        };
        let catch = Array1::from_shape_fn(ages, |a| baranov_catch(current[a], future_f[a], m[a]));
        catch_biomass.push((&catch * &weight).sum() * tonnes);
        spawning_biomass.push((&current * &weight * &maturity).sum() * tonnes);
        stock_rows.push(current);
        catch_rows.push(catch);
    }

    let years = (terminal + 1, terminal + opts.horizon as i32);
    let count_unit = output.stock_numbers.unit();
    Ok(Projection {
        stock_numbers: AgeYearMatrix::from_year_rows(count_unit, years, age_range, &stock_rows)?,
        catch_numbers: AgeYearMatrix::from_year_rows(count_unit, years, age_range, &catch_rows)?,
        catch_biomass: Array1::from_vec(catch_biomass),
        spawning_biomass: Array1::from_vec(spawning_biomass),
        fishing_mortality: future_f.clone(),
    })
}
