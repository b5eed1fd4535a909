//! Peeled re-runs of the tuning VPA.
use crate::{
    errors::{AssessmentError, AssessmentResult},
    matrix::AgeYearMatrix,
    tuning::{
        TuningData, TuningOptions, TuningResult, objective::validate_lambda, tune_vpa,
    },
};
use log::{debug, info};
use ndarray::Array1;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Default λ grid searched by `optimize_lambda`.
pub const DEFAULT_LAMBDA_GRID: [f64; 7] = [0.0, 0.15, 0.30, 0.45, 0.60, 0.75, 0.90];

/// Retrospective configuration.
///
/// - `max_peel`: deepest peel; peels `0..=max_peel` are run.
/// - `min_years`: a peel is skipped once fewer years than this would remain.
/// - `lambda_grid`: candidate ridge weights for the λ search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrospectiveOptions {
    pub max_peel: usize,
    pub min_years: usize,
    pub lambda_grid: Vec<f64>,
}

impl RetrospectiveOptions {
    /// # Errors
    /// - [`AssessmentError::InvalidConfig`] for `min_years < 2`, an empty
    ///   grid, or a grid value outside `[0, 1]`.
    pub fn new(max_peel: usize, min_years: usize) -> AssessmentResult<Self> {
        let opts = Self { max_peel, min_years, ..Self::default() };
        opts.validate()?;
        Ok(opts)
    }

    pub fn with_lambda_grid(mut self, grid: Vec<f64>) -> AssessmentResult<Self> {
        self.lambda_grid = grid;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> AssessmentResult<()> {
        if self.min_years < 2 {
            return Err(AssessmentError::InvalidConfig {
                field: "min_years",
                value: self.min_years as f64,
                reason: "a peel needs at least two years",
            });
        }
        if self.lambda_grid.is_empty() {
            return Err(AssessmentError::InvalidConfig {
                field: "lambda_grid",
                value: 0.0,
                reason: "grid must not be empty",
            });
        }
        for &lambda in &self.lambda_grid {
            validate_lambda(lambda)?;
        }
        Ok(())
    }
}

impl Default for RetrospectiveOptions {
    fn default() -> Self {
        Self { max_peel: 5, min_years: 5, lambda_grid: DEFAULT_LAMBDA_GRID.to_vec() }
    }
}

/// Estimates of one peel.
///
/// Series run from `start_year` to `end_year`, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrospectiveResult {
    pub peel: usize,
    pub start_year: i32,
    pub end_year: i32,
    pub spawning_biomass: Array1<f64>,
    pub recruitment: Array1<f64>,
    pub mean_f: Array1<f64>,
    pub f_at_age: AgeYearMatrix,
}

impl RetrospectiveResult {
    pub fn from_tuning(peel: usize, tuned: &TuningResult) -> Self {
        let output = tuned.output();
        let (start_year, end_year) = output.year_range();
        Self {
            peel,
            start_year,
            end_year,
            spawning_biomass: output.ssb_series(),
            recruitment: output.recruitment_series(),
            mean_f: output.mean_f_series(),
            f_at_age: output.fishing_mortality.clone(),
        }
    }

    fn offset(&self, year: i32) -> Option<usize> {
        (self.start_year..=self.end_year).contains(&year).then(|| (year - self.start_year) as usize)
    }

    pub fn spawning_biomass_at(&self, year: i32) -> Option<f64> {
        self.offset(year).map(|i| self.spawning_biomass[i])
    }

    pub fn recruitment_at(&self, year: i32) -> Option<f64> {
        self.offset(year).map(|i| self.recruitment[i])
    }

    pub fn mean_f_at(&self, year: i32) -> Option<f64> {
        self.offset(year).map(|i| self.mean_f[i])
    }
}

/// Peel depths that leave at least `min_years` years.
pub fn admissible_peels(year_count: usize, opts: &RetrospectiveOptions) -> Vec<usize> {
    (0..=opts.max_peel).filter(|peel| year_count.saturating_sub(*peel) >= opts.min_years).collect()
}

/// Re-run the tuning VPA on data ending `peel` years early, for every
/// admissible peel.
///
/// Peels are independent and run in parallel; results come back ordered by
/// peel depth.
///
/// # Errors
/// - [`AssessmentError::InsufficientData`] when not even the full data has
///   `min_years` years.
/// - The first failing peel's error.
pub fn run_retrospective(
    data: &TuningData, tuning: &TuningOptions, opts: &RetrospectiveOptions,
) -> AssessmentResult<Vec<RetrospectiveResult>> {
    opts.validate()?;
    tuning.validate()?;
    let year_count = data.stock().year_count();
    let peels = admissible_peels(year_count, opts);
    if peels.is_empty() {
        return Err(AssessmentError::InsufficientData {
            what: "years for a retrospective run",
            required: opts.min_years,
            found: year_count,
        });
    }
    if peels.len() <= opts.max_peel {
        debug!(
            "Skipping peels {}..={}: fewer than {} years would remain",
            peels.len(),
            opts.max_peel,
            opts.min_years
        );
    }

    let results = peels
        .par_iter()
        .map(|&peel| run_peel(data, tuning, peel))
        .collect::<AssessmentResult<Vec<_>>>()?;
    info!("Retrospective analysis (λ = {}): {} peel(s)", tuning.lambda, results.len());
    Ok(results)
}

fn run_peel(
    data: &TuningData, tuning: &TuningOptions, peel: usize,
) -> AssessmentResult<RetrospectiveResult> {
    let tuned = if peel == 0 {
        tune_vpa(data, tuning)?
    } else {
        let peeled = data.truncate(data.stock().end_year() - peel as i32)?;
        tune_vpa(&peeled, tuning)?
    };
    Ok(RetrospectiveResult::from_tuning(peel, &tuned))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{optimization::simplex::NelderMeadOptions, test_support::synthetic_stock};

    fn quick_tuning(lambda: f64) -> TuningOptions {
        TuningOptions::new(lambda)
            .unwrap()
            .with_simplex(NelderMeadOptions::new(300, 1e-8).unwrap())
            .unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Peels that would leave fewer than `min_years` years are skipped.
    fn admissible_peels_respect_min_years() {
        let opts = RetrospectiveOptions::new(5, 5).unwrap();
        assert_eq!(admissible_peels(12, &opts), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(admissible_peels(7, &opts), vec![0, 1, 2]);
        assert!(admissible_peels(4, &opts).is_empty());
    }

    #[test]
    // Purpose
    // -------
    // Each peel ends one year earlier than the previous one and results are
    // ordered by peel depth.
    //
    // Given
    // -----
    // - A 10-year synthetic stock, max_peel = 3, min_years = 5.
    //
    // Expect
    // ------
    // - Four results with end years 2009, 2008, 2007, 2006 and series of
    //   matching length.
    fn peels_end_progressively_earlier() {
        // Arrange
        let syn = synthetic_stock(10);
        let data = TuningData::new(syn.stock, syn.mortality, syn.indices, None).unwrap();
        let opts = RetrospectiveOptions::new(3, 5).unwrap();

        // Act
        let results = run_retrospective(&data, &quick_tuning(0.3), &opts).unwrap();

        // Assert
        assert_eq!(results.iter().map(|r| r.peel).collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        let end_years: Vec<i32> = results.iter().map(|r| r.end_year).collect();
        assert_eq!(end_years, vec![2009, 2008, 2007, 2006]);
        for r in &results {
            let len = (r.end_year - r.start_year + 1) as usize;
            assert_eq!(r.spawning_biomass.len(), len);
            assert_eq!(r.recruitment.len(), len);
            assert_eq!(r.f_at_age.year_count(), len);
            assert!(r.spawning_biomass_at(r.end_year).is_some());
            assert!(r.mean_f_at(r.end_year + 1).is_none());
        }
    }

    #[test]
    // Purpose
    // -------
    // Data shorter than `min_years` cannot support any peel.
    fn too_short_for_any_peel() {
        let syn = synthetic_stock(4);
        let data = TuningData::new(syn.stock, syn.mortality, syn.indices, None).unwrap();
        let err = run_retrospective(&data, &quick_tuning(0.0), &RetrospectiveOptions::default())
            .unwrap_err();
        assert!(err.is_insufficient_data());
    }

    #[test]
    // Purpose
    // -------
    // Grid values outside [0, 1] and tiny `min_years` are rejected.
    fn options_validation() {
        assert!(RetrospectiveOptions::new(3, 1).is_err());
        assert!(RetrospectiveOptions::default().with_lambda_grid(vec![0.2, 1.2]).is_err());
        assert!(RetrospectiveOptions::default().with_lambda_grid(vec![]).is_err());
    }
}
