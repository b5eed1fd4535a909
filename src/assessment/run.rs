//! The assessment pipeline: inputs and configuration in, catch advice out.
//!
//! Key behaviors
//! -------------
//! - λ is either fixed, with an optional retrospective diagnostic, or chosen
//!   by [`optimize_lambda`]. When automatic selection finds no viable
//!   candidate the run falls back to `tuning.lambda` with a warning.
//! - A failing retrospective diagnostic never aborts the assessment; the
//!   report then carries no Mohn's ρ.
//! - The final tuned VPA feeds current F (mean of the last
//!   `current_f_years` years) into [`advise`].
use crate::{
    assessment::config::{AssessmentConfig, LambdaSelection},
    errors::{AssessmentError, AssessmentResult},
    matrix::{AgeYearMatrix, Unit},
    projection::{CatchAdvice, advise},
    retrospective::{
        LambdaSearch, MohnsRho, calculate_mohns_rho, optimize_lambda, run_retrospective,
    },
    tuning::{AbundanceIndex, ObjectiveValue, TuningData, TuningOptions, tune_vpa},
    vpa::{StockData, VpaOutput},
};
use log::{info, warn};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Observed data of one assessment.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentInputs {
    pub stock: StockData,
    pub indices: Vec<AbundanceIndex>,
}

impl AssessmentInputs {
    /// # Errors
    /// - Validation errors of [`StockData::new`].
    pub fn new(
        catch: AgeYearMatrix, weight: AgeYearMatrix, maturity: AgeYearMatrix,
        indices: Vec<AbundanceIndex>,
    ) -> AssessmentResult<Self> {
        Ok(Self { stock: StockData::new(catch, weight, maturity)?, indices })
    }
}

/// Recommended catch and the figures behind it.
///
/// - `terminal_ssb`: SSB (tonnes) in the terminal assessed year.
/// - `projected_ssb`: advice-year SSB (tonnes) under current F.
/// - `lambda_search`: the grid search, when λ was selected automatically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentReport {
    pub recommended_catch: f64,
    pub unit: Unit,
    pub lambda: f64,
    pub terminal_year: i32,
    pub advice_year: i32,
    pub terminal_ssb: f64,
    pub projected_ssb: f64,
    pub f_current: Array1<f64>,
    pub target_f: Array1<f64>,
    pub terminal_f: Array1<f64>,
    pub objective: ObjectiveValue,
    pub mohns_rho: Option<MohnsRho>,
    pub lambda_search: Option<LambdaSearch>,
    pub converged: bool,
    pub vpa: VpaOutput,
    pub advice: CatchAdvice,
}

impl AssessmentReport {
    /// Recommended catch as display text, e.g. `"12.3 thousand tonnes"`.
    pub fn formatted_catch(&self) -> String {
        self.unit.format_value(self.recommended_catch)
    }
}

/// Run the full assessment.
///
/// # Errors
/// - Invalid configuration or inputs.
/// - Tuning failures of the final run (e.g. insufficient index coverage).
/// - Projection and harvest-rule errors.
pub fn run_assessment(
    inputs: AssessmentInputs, config: &AssessmentConfig,
) -> AssessmentResult<AssessmentReport> {
    config.validate()?;
    let data = TuningData::new(
        inputs.stock,
        config.natural_mortality.clone(),
        inputs.indices,
        config.tuning.tuning_window,
    )?;
    info!(
        "Assessing {}-{} with {} index series",
        data.stock().start_year(),
        data.stock().end_year(),
        data.indices().len()
    );

    let (lambda, mohns_rho, lambda_search) = select_lambda(&data, config)?;
    let tuning = TuningOptions { lambda, ..config.tuning.clone() };
    let tuned = tune_vpa(&data, &tuning)?;
    if !tuned.converged {
        warn!("Final tuning did not converge after {} iterations", tuned.iterations);
    }
    let output = tuned.output();
    let f_current = output.current_f(config.current_f_years)?;
    let advice = advise(
        output,
        data.stock(),
        data.mortality(),
        &f_current,
        &config.harvest_rule,
        &config.projection,
    )?;

    let terminal_year = output.terminal_year();
    Ok(AssessmentReport {
        recommended_catch: advice.recommended_catch,
        unit: Unit::Tonne,
        lambda,
        terminal_year,
        advice_year: advice.year,
        terminal_ssb: output.ssb_at(terminal_year)?,
        projected_ssb: advice.ssb,
        f_current,
        target_f: advice.target_f.clone(),
        terminal_f: tuned.terminal_f.clone(),
        objective: tuned.objective(),
        mohns_rho,
        lambda_search,
        converged: tuned.converged,
        vpa: output.clone(),
        advice,
    })
}

fn select_lambda(
    data: &TuningData, config: &AssessmentConfig,
) -> AssessmentResult<(f64, Option<MohnsRho>, Option<LambdaSearch>)> {
    match config.lambda {
        LambdaSelection::Fixed(lambda) => {
            let rho = if config.run_retrospective {
                let tuning = TuningOptions { lambda, ..config.tuning.clone() };
                retrospective_rho(data, &tuning, config)
            } else {
                None
            };
            Ok((lambda, rho, None))
        }
        LambdaSelection::Auto => {
            match optimize_lambda(data, &config.tuning, &config.retrospective) {
                Ok(search) => Ok((search.best.lambda, Some(search.best.rho), Some(search))),
                Err(err @ AssessmentError::NoViableCandidate { .. }) => {
                    warn!(
                        "Automatic λ selection failed ({err}); using λ = {}",
                        config.tuning.lambda
                    );
                    Ok((config.tuning.lambda, None, None))
                }
                Err(err) => Err(err),
            }
        }
    }
}

fn retrospective_rho(
    data: &TuningData, tuning: &TuningOptions, config: &AssessmentConfig,
) -> Option<MohnsRho> {
    match run_retrospective(data, tuning, &config.retrospective)
        .and_then(|results| calculate_mohns_rho(&results))
    {
        Ok(rho) => Some(rho),
        Err(err) => {
            warn!("Retrospective diagnostic skipped: {err}");
            None
        }
    }
}
