//! Ridge-weight selection by retrospective bias.
use crate::{
    errors::{AssessmentError, AssessmentResult},
    retrospective::{
        mohn::{MohnsRho, calculate_mohns_rho},
        peels::{RetrospectiveOptions, run_retrospective},
    },
    tuning::{TuningData, TuningOptions},
};
use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Mohn's ρ of one candidate λ.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LambdaCandidate {
    pub lambda: f64,
    pub rho: MohnsRho,
}

/// Outcome of the λ grid search.
///
/// - `best`: the candidate with the smallest overall |ρ| (first in grid
///   order on ties).
/// - `candidates`: every successful candidate, in grid order.
/// - `failed`: grid values whose retrospective analysis failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LambdaSearch {
    pub best: LambdaCandidate,
    pub candidates: Vec<LambdaCandidate>,
    pub failed: Vec<f64>,
}

/// Run the full retrospective analysis for every λ in the grid and pick the
/// one with the smallest overall Mohn's ρ.
///
/// Candidates are evaluated in parallel. A failing candidate is logged and
/// left out.
///
/// # Errors
/// - Invalid options.
/// - [`AssessmentError::NoViableCandidate`] when every candidate fails.
pub fn optimize_lambda(
    data: &TuningData, tuning: &TuningOptions, opts: &RetrospectiveOptions,
) -> AssessmentResult<LambdaSearch> {
    opts.validate()?;
    tuning.validate()?;
    let outcomes: Vec<(f64, AssessmentResult<MohnsRho>)> = opts
        .lambda_grid
        .par_iter()
        .map(|&lambda| {
            let candidate = TuningOptions { lambda, ..tuning.clone() };
            let rho = run_retrospective(data, &candidate, opts)
                .and_then(|results| calculate_mohns_rho(&results));
            (lambda, rho)
        })
        .collect();

    let mut candidates = Vec::with_capacity(outcomes.len());
    let mut failed = Vec::new();
    for (lambda, outcome) in outcomes {
        match outcome {
            Ok(rho) => candidates.push(LambdaCandidate { lambda, rho }),
            Err(err) => {
                warn!("Retrospective analysis failed for λ = {lambda}: {err}");
                failed.push(lambda);
            }
        }
    }

    let best = candidates
        .iter()
        .copied()
        .min_by(|a, b| a.rho.overall.abs().total_cmp(&b.rho.overall.abs()))
        .ok_or(AssessmentError::NoViableCandidate { what: "ridge weight λ" })?;
    info!("Selected λ = {} with overall Mohn's rho {:.4}", best.lambda, best.rho.overall);
    Ok(LambdaSearch { best, candidates, failed })
}
