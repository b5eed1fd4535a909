//! Tuning VPA: estimate terminal F by fitting abundance indices.
//!
//! Purpose
//! -------
//! Wire the backward VPA, the index parameter estimator, and the ridge
//! objective into one terminal-F search driven by Nelder–Mead.
//!
//! Key behaviors
//! -------------
//! - [`RidgeObjective`] is an explicit [`Objective`]: its evaluation is a
//!   pure function of the candidate terminal F and [`TuningData`]:
//!   terminal F → terminal stock (Pope inverted) → backward VPA → matched
//!   index series → `{q, b}` per index → ridge objective.
//! - Any failure inside an evaluation yields [`OBJECTIVE_SENTINEL`] so the
//!   simplex can route around infeasible regions (non-positive F, indices
//!   without valid pairs).
//! - [`tune_vpa`] checks index coverage, seeds the search with
//!   [`initial_terminal_f`], minimizes, and re-runs the VPA once at the
//!   optimum.
//!
//! Invariants & assumptions
//! ------------------------
//! - The recent-average F used by the penalty is recomputed from each
//!   candidate's own VPA run.
//! - The tuning window lies inside the stock data's year range; it is
//!   clipped at construction.
//!
//! Downstream usage
//! ----------------
//! - The retrospective analysis builds truncated [`TuningData`] with
//!   [`TuningData::truncate`] and calls [`tune_vpa`] per peel.
use crate::{
    errors::{AssessmentError, AssessmentResult},
    matrix::MatrixError,
    optimization::{
        errors::OptResult,
        simplex::{Cost, NelderMeadOptions, Objective, Theta, minimize},
    },
    tuning::{
        estimator::{IndexParameters, estimate_for_series},
        index::{AbundanceIndex, MatchedSeries, match_index},
        objective::{
            IndexResidual, ObjectiveValue, index_residuals, ridge_objective, validate_lambda,
        },
    },
    vpa::{NaturalMortality, StockData, VpaOptions, VpaOutput, backward_vpa, terminal_stock_from_f},
};
use log::{debug, info, warn};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Objective value returned for candidates that cannot be evaluated.
pub const OBJECTIVE_SENTINEL: f64 = 1e10;

/// Number of completed pre-terminal years averaged for recent F.
pub const DEFAULT_RECENT_YEARS: usize = 3;

/// Constant F used to seed the initial VPA.
pub const DEFAULT_SEED_F: f64 = 0.3;

/// Tuning configuration.
///
/// - `lambda`: ridge weight in `[0, 1]`.
/// - `recent_years`: pre-terminal years averaged for the penalty target and
///   the initial guess.
/// - `seed_f`: constant F of the seed VPA behind the initial guess.
/// - `tuning_window`: inclusive years whose index observations are fitted;
///   `None` uses every year of the stock data.
/// - `vpa`, `simplex`: options passed through to the VPA and optimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningOptions {
    pub lambda: f64,
    pub recent_years: usize,
    pub seed_f: f64,
    pub tuning_window: Option<(i32, i32)>,
    pub vpa: VpaOptions,
    pub simplex: NelderMeadOptions,
}

impl TuningOptions {
    /// Default options with the given ridge weight.
    ///
    /// # Errors
    /// - [`AssessmentError::InvalidConfig`] for λ outside `[0, 1]`.
    pub fn new(lambda: f64) -> AssessmentResult<Self> {
        let opts = Self { lambda, ..Self::default() };
        opts.validate()?;
        Ok(opts)
    }

    pub fn with_window(mut self, start: i32, end: i32) -> AssessmentResult<Self> {
        self.tuning_window = Some((start, end));
        self.validate()?;
        Ok(self)
    }

    pub fn with_simplex(mut self, simplex: NelderMeadOptions) -> AssessmentResult<Self> {
        self.simplex = simplex;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> AssessmentResult<()> {
        validate_lambda(self.lambda)?;
        if self.recent_years == 0 {
            return Err(AssessmentError::InvalidConfig {
                field: "recent_years",
                value: 0.0,
                reason: "must be at least 1",
            });
        }
        if !self.seed_f.is_finite() || self.seed_f <= 0.0 {
            return Err(AssessmentError::InvalidConfig {
                field: "seed_f",
                value: self.seed_f,
                reason: "must be finite and > 0",
            });
        }
        if let Some((start, end)) = self.tuning_window {
            if start > end {
                return Err(MatrixError::InvalidRange {
                    what: "tuning window",
                    start: start as i64,
                    end: end as i64,
                }
                .into());
            }
        }
        self.vpa.validate()?;
        self.simplex.validate()?;
        Ok(())
    }
}

impl Default for TuningOptions {
    fn default() -> Self {
        Self {
            lambda: 0.0,
            recent_years: DEFAULT_RECENT_YEARS,
            seed_f: DEFAULT_SEED_F,
            tuning_window: None,
            vpa: VpaOptions::default(),
            simplex: NelderMeadOptions::default(),
        }
    }
}

/// Everything an objective evaluation reads: stock inputs, natural
/// mortality, indices, and the resolved tuning window.
#[derive(Debug, Clone, PartialEq)]
pub struct TuningData {
    stock: StockData,
    mortality: NaturalMortality,
    indices: Vec<AbundanceIndex>,
    window: (i32, i32),
}

impl TuningData {
    /// Bundle tuning inputs and clip the window to the stock data.
    ///
    /// # Errors
    /// - [`AssessmentError::InsufficientData`] without indices, or when the
    ///   clipped window is empty.
    /// - Configuration errors from `mortality`.
    pub fn new(
        stock: StockData, mortality: NaturalMortality, indices: Vec<AbundanceIndex>,
        window: Option<(i32, i32)>,
    ) -> AssessmentResult<Self> {
        mortality.for_ages(stock.age_count())?;
        if indices.is_empty() {
            return Err(AssessmentError::InsufficientData {
                what: "abundance indices",
                required: 1,
                found: 0,
            });
        }
        let (start, end) = window.unwrap_or((stock.start_year(), stock.end_year()));
        let window = (start.max(stock.start_year()), end.min(stock.end_year()));
        if window.0 > window.1 {
            return Err(AssessmentError::InsufficientData {
                what: "years in tuning window",
                required: 1,
                found: 0,
            });
        }
        Ok(Self { stock, mortality, indices, window })
    }

    pub fn stock(&self) -> &StockData {
        &self.stock
    }

    pub fn mortality(&self) -> &NaturalMortality {
        &self.mortality
    }

    pub fn indices(&self) -> &[AbundanceIndex] {
        &self.indices
    }

    pub fn window(&self) -> (i32, i32) {
        self.window
    }

    /// Fresh tuning data with every series ending at `end_year`.
    ///
    /// Indices that start after `end_year` are dropped.
    pub fn truncate(&self, end_year: i32) -> AssessmentResult<TuningData> {
        let stock = self.stock.truncate(end_year)?;
        let indices = self.indices.iter().filter_map(|idx| idx.truncate(end_year)).collect();
        TuningData::new(stock, self.mortality.clone(), indices, Some(self.window))
    }

    /// Require at least two positive observations per index in the window.
    ///
    /// # Errors
    /// - [`AssessmentError::InsufficientData`] for the first index short of
    ///   coverage.
    pub fn check_coverage(&self) -> AssessmentResult<()> {
        for index in &self.indices {
            let found = index.positive_count(self.window.0, self.window.1);
            if found < 2 {
                warn!(
                    "Index '{}' has {found} positive observation(s) in {}-{}",
                    index.name(),
                    self.window.0,
                    self.window.1
                );
                return Err(AssessmentError::InsufficientData {
                    what: "positive index observations in tuning window",
                    required: 2,
                    found,
                });
            }
        }
        Ok(())
    }
}

/// Full record of one objective evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub objective: ObjectiveValue,
    pub output: VpaOutput,
    pub recent_f: Array1<f64>,
    pub series: Vec<MatchedSeries>,
    pub parameters: Vec<IndexParameters>,
}

impl Evaluation {
    /// Per-index log residuals under the fitted parameters.
    pub fn residuals(&self) -> Vec<IndexResidual> {
        self.series.iter().zip(&self.parameters).map(|(s, p)| index_residuals(s, *p)).collect()
    }
}

/// Ridge objective over terminal F.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RidgeObjective {
    pub lambda: f64,
    pub recent_years: usize,
    pub vpa: VpaOptions,
}

impl RidgeObjective {
    pub fn from_options(opts: &TuningOptions) -> Self {
        Self { lambda: opts.lambda, recent_years: opts.recent_years, vpa: opts.vpa }
    }

    /// Evaluate a candidate terminal F.
    ///
    /// # Errors
    /// - Invalid terminal F, VPA failures, and indices with fewer than two
    ///   valid pairs.
    pub fn evaluate(
        &self, terminal_f: &Array1<f64>, data: &TuningData,
    ) -> AssessmentResult<Evaluation> {
        let terminal_stock = terminal_stock_from_f(&data.stock, &data.mortality, terminal_f)?;
        let output = backward_vpa(&data.stock, &data.mortality, &terminal_stock, &self.vpa)?;
        let recent_f = output.recent_mean_f(self.recent_years)?;
        let series = data
            .indices
            .iter()
            .map(|index| match_index(index, &output, data.window))
            .collect::<AssessmentResult<Vec<_>>>()?;
        let parameters =
            series.iter().map(estimate_for_series).collect::<AssessmentResult<Vec<_>>>()?;
        let objective = ridge_objective(&series, &parameters, terminal_f, &recent_f, self.lambda)?;
        Ok(Evaluation { objective, output, recent_f, series, parameters })
    }
}

impl Objective for RidgeObjective {
    type Data = TuningData;

    fn value(&self, x: &Theta, data: &TuningData) -> OptResult<Cost> {
        match self.evaluate(x, data) {
            Ok(eval) if eval.objective.total.is_finite() => Ok(eval.objective.total),
            Ok(eval) => {
                debug!("Non-finite objective {} at {x}; using sentinel", eval.objective.total);
                Ok(OBJECTIVE_SENTINEL)
            }
            Err(err) => {
                debug!("Objective evaluation failed at {x}: {err}; using sentinel");
                Ok(OBJECTIVE_SENTINEL)
            }
        }
    }
}

/// Outcome of a tuned VPA.
#[derive(Debug, Clone, PartialEq)]
pub struct TuningResult {
    pub terminal_f: Array1<f64>,
    pub evaluation: Evaluation,
    pub converged: bool,
    pub iterations: usize,
}

impl TuningResult {
    pub fn output(&self) -> &VpaOutput {
        &self.evaluation.output
    }

    pub fn objective(&self) -> ObjectiveValue {
        self.evaluation.objective
    }
}

/// Starting terminal F for the search.
///
/// Runs a seed VPA with `seed_f` at every age in the terminal year and
/// returns its mean F over the recent pre-terminal years. Ages whose mean is
/// not strictly positive (no catch) fall back to `seed_f`. With a single
/// year of data the seed itself is returned.
///
/// # Errors
/// - VPA failures of the seed run.
pub fn initial_terminal_f(
    data: &TuningData, opts: &TuningOptions,
) -> AssessmentResult<Array1<f64>> {
    let seed = Array1::from_elem(data.stock.age_count(), opts.seed_f);
    if data.stock.year_count() < 2 {
        return Ok(seed);
    }
    let terminal_stock = terminal_stock_from_f(&data.stock, &data.mortality, &seed)?;
    let output = backward_vpa(&data.stock, &data.mortality, &terminal_stock, &opts.vpa)?;
    let recent = output.recent_mean_f(opts.recent_years)?;
    let replaced = recent.iter().filter(|f| !(f.is_finite() && **f > 0.0)).count();
    if replaced > 0 {
        warn!("{replaced} age(s) without recent fishing; initial F set to {}", opts.seed_f);
    }
    Ok(recent.mapv(|f| if f.is_finite() && f > 0.0 { f } else { opts.seed_f }))
}

/// Estimate terminal F by minimizing the ridge objective.
///
/// # Errors
/// - [`AssessmentError::InsufficientData`] when an index lacks coverage in
///   the tuning window.
/// - Invalid options, optimizer failures, and a failed final evaluation at
///   the optimum.
pub fn tune_vpa(data: &TuningData, opts: &TuningOptions) -> AssessmentResult<TuningResult> {
    opts.validate()?;
    data.check_coverage()?;
    let x0 = initial_terminal_f(data, opts)?;
    let objective = RidgeObjective::from_options(opts);
    let outcome = minimize(&objective, x0, data, &opts.simplex)?;
    let evaluation = objective.evaluate(&outcome.optimum, data)?;
    info!(
        "Tuned VPA {}-{} (λ = {}): objective {:.6e} after {} iterations",
        data.stock.start_year(),
        data.stock.end_year(),
        opts.lambda,
        evaluation.objective.total,
        outcome.iterations
    );
    Ok(TuningResult {
        terminal_f: outcome.optimum,
        evaluation,
        converged: outcome.converged,
        iterations: outcome.iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{START_YEAR, synthetic_stock};
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The evaluation pipeline at the true terminal F of a synthetic stock.
    // - The sentinel for infeasible candidates.
    // - Coverage checks, the initial guess, and a full tuning run.
    // -------------------------------------------------------------------------

    fn tuning_data(years: usize) -> (TuningData, crate::test_support::SyntheticStock) {
        let syn = synthetic_stock(years);
        let data =
            TuningData::new(syn.stock.clone(), syn.mortality.clone(), syn.indices.clone(), None)
                .unwrap();
        (data, syn)
    }

    #[test]
    // Purpose
    // -------
    // At the true terminal F, noise-free indices fit with zero residuals.
    //
    // Given
    // -----
    // - A 12-year synthetic stock and its exact indices; λ = 0.
    //
    // Expect
    // ------
    // - RSS ≈ 0, fitted b of the age-0 index ≈ 0.8, and the VPA reproduces
    //   the simulated stock numbers.
    fn true_terminal_f_fits_exactly() {
        // Arrange
        let (data, syn) = tuning_data(12);
        let objective = RidgeObjective::from_options(&TuningOptions::default());

        // Act
        let eval = objective.evaluate(&syn.terminal_f(), &data).unwrap();

        // Assert
        assert!(eval.objective.residual_sum_of_squares < 1e-12);
        assert_eq!(eval.objective.total, eval.objective.residual_sum_of_squares);
        assert_relative_eq!(eval.parameters[0].b, 0.8, max_relative = 1e-6);
        assert_relative_eq!(eval.parameters[2].q, 0.5, max_relative = 1e-6);
        assert_relative_eq!(
            eval.output.stock_numbers.get(START_YEAR, 2).unwrap(),
            syn.true_stock[0][2],
            max_relative = 1e-9
        );
        assert_eq!(eval.residuals().len(), 3);
    }

    #[test]
    // Purpose
    // -------
    // Candidates with non-positive F evaluate to the sentinel instead of
    // failing the search.
    fn infeasible_candidates_return_sentinel() {
        let (data, _) = tuning_data(8);
        let objective = RidgeObjective::from_options(&TuningOptions::default());

        let bad = objective.value(&array![0.2, -0.1, 0.3, 0.3, 0.3], &data).unwrap();
        let short = objective.value(&array![0.2, 0.3], &data).unwrap();

        assert_eq!(bad, OBJECTIVE_SENTINEL);
        assert_eq!(short, OBJECTIVE_SENTINEL);
    }

    #[test]
    // Purpose
    // -------
    // The penalty compares terminal F with the candidate's own recent F.
    fn penalty_uses_candidate_recent_f() {
        let (data, syn) = tuning_data(10);
        let objective = RidgeObjective::from_options(&TuningOptions::new(1.0).unwrap());

        let eval = objective.evaluate(&syn.terminal_f(), &data).unwrap();

        let expected: f64 = syn
            .terminal_f()
            .iter()
            .zip(eval.recent_f.iter())
            .map(|(t, r)| (t - r).powi(2))
            .sum();
        assert_relative_eq!(eval.objective.total, expected, max_relative = 1e-12);
        // Recent F at the truth is the mean of the three pre-terminal years.
        let f_scale = |y: usize| 0.8 + 0.04 * y as f64;
        let mean_scale = (f_scale(6) + f_scale(7) + f_scale(8)) / 3.0;
        assert_relative_eq!(eval.recent_f[1], 0.3 * mean_scale, max_relative = 1e-9);
    }

    #[test]
    // Purpose
    // -------
    // The initial guess averages the seed VPA's pre-terminal F.
    fn initial_guess_is_positive_and_sized() {
        let (data, _) = tuning_data(10);
        let x0 = initial_terminal_f(&data, &TuningOptions::default()).unwrap();
        assert_eq!(x0.len(), 5);
        assert!(x0.iter().all(|f| f.is_finite() && *f > 0.0));
    }

    #[test]
    // Purpose
    // -------
    // An index with fewer than two positive observations in the window is
    // rejected before optimizing.
    fn coverage_is_checked_before_optimizing() {
        let syn = synthetic_stock(8);
        let sparse = AbundanceIndex::new(
            "sparse",
            crate::tuning::index::IndexKind::Age0Abundance,
            START_YEAR,
            vec![f64::NAN, 3.0, 0.0, f64::NAN],
        )
        .unwrap();
        let data = TuningData::new(syn.stock, syn.mortality, vec![sparse], None).unwrap();

        let err = tune_vpa(&data, &TuningOptions::default()).unwrap_err();

        assert!(matches!(err, AssessmentError::InsufficientData { required: 2, found: 1, .. }));
    }

    #[test]
    // Purpose
    // -------
    // Windows are clipped to the data; truncation shortens every series.
    fn window_clipping_and_truncation() {
        let syn = synthetic_stock(10);
        let data =
            TuningData::new(syn.stock, syn.mortality, syn.indices, Some((1990, 2005))).unwrap();
        assert_eq!(data.window(), (2000, 2005));

        let cut = data.truncate(2003).unwrap();
        assert_eq!(cut.stock().end_year(), 2003);
        assert_eq!(cut.window(), (2000, 2003));
        assert!(cut.indices().iter().all(|idx| idx.end_year() == 2003));
    }

    #[test]
    // Purpose
    // -------
    // A full tuning run improves on its starting point and returns a VPA
    // with positive stock numbers and non-negative F.
    fn tuning_improves_on_initial_guess() {
        // Arrange
        let (data, _) = tuning_data(12);
        let opts = TuningOptions::new(0.3).unwrap();
        let x0 = initial_terminal_f(&data, &opts).unwrap();
        let start = RidgeObjective::from_options(&opts).value(&x0, &data).unwrap();

        // Act
        let tuned = tune_vpa(&data, &opts).expect("tuning should run");

        // Assert
        assert!(tuned.objective().total <= start);
        assert!(tuned.objective().total < OBJECTIVE_SENTINEL);
        assert_eq!(tuned.terminal_f.len(), 5);
        assert!(tuned.output().stock_numbers.data().iter().all(|n| *n > 0.0));
        assert!(tuned.output().fishing_mortality.data().iter().all(|f| *f >= 0.0));
        assert!(tuned.iterations <= opts.simplex.max_iterations);
    }
}
