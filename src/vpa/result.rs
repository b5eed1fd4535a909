//! VPA output and the summary series read from it.
use crate::{
    errors::{AssessmentError, AssessmentResult},
    matrix::{AgeRange, AgeYearMatrix, YearRange},
};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Output of one backward VPA run.
///
/// Fields
/// ------
/// - `stock_numbers`: N at age, in the catch matrix's count unit.
/// - `fishing_mortality`: F at age (dimensionless).
/// - `spawning_biomass`: SSB at age in tonnes.
/// - `recruitment`: youngest-age stock numbers as a single-age matrix.
/// - `clamped_cells`: cells whose F hit the ceiling.
/// - `even_splits`: plus-group years split evenly for lack of catch.
///
/// All matrices share the catch matrix's year range; all but `recruitment`
/// share its age range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VpaOutput {
    pub stock_numbers: AgeYearMatrix,
    pub fishing_mortality: AgeYearMatrix,
    pub spawning_biomass: AgeYearMatrix,
    pub recruitment: AgeYearMatrix,
    pub clamped_cells: usize,
    pub even_splits: usize,
}

impl VpaOutput {
    pub fn year_range(&self) -> YearRange {
        self.stock_numbers.year_range()
    }

    pub fn age_range(&self) -> AgeRange {
        self.stock_numbers.age_range()
    }

    pub fn terminal_year(&self) -> i32 {
        self.stock_numbers.end_year()
    }

    /// Total SSB (tonnes) per year, oldest first.
    pub fn ssb_series(&self) -> Array1<f64> {
        self.spawning_biomass.year_totals()
    }

    /// Total SSB (tonnes) in `year`.
    pub fn ssb_at(&self, year: i32) -> AssessmentResult<f64> {
        Ok(self.spawning_biomass.row(year)?.sum())
    }

    /// Recruitment per year, oldest first.
    pub fn recruitment_series(&self) -> Array1<f64> {
        self.recruitment.data().column(0).to_owned()
    }

    pub fn recruitment_at(&self, year: i32) -> AssessmentResult<f64> {
        Ok(self.recruitment.get(year, self.recruitment.min_age())?)
    }

    /// Unweighted mean F over all ages, per year.
    pub fn mean_f_series(&self) -> Array1<f64> {
        self.fishing_mortality.year_means()
    }

    pub fn mean_f_at(&self, year: i32) -> AssessmentResult<f64> {
        let row = self.fishing_mortality.row(year)?;
        Ok(row.sum() / row.len() as f64)
    }

    /// F at age in the terminal year.
    pub fn terminal_f(&self) -> Array1<f64> {
        let last = self.fishing_mortality.year_count() - 1;
        self.fishing_mortality.data().row(last).to_owned()
    }

    /// Stock numbers at age in the terminal year.
    pub fn terminal_stock(&self) -> Array1<f64> {
        let last = self.stock_numbers.year_count() - 1;
        self.stock_numbers.data().row(last).to_owned()
    }

    /// Mean F at age over up to `years` completed years before the terminal
    /// year.
    ///
    /// The window is clipped to the available history.
    ///
    /// # Errors
    /// - [`AssessmentError::InsufficientData`] when `years == 0` or the
    ///   output has no year before the terminal year.
    pub fn recent_mean_f(&self, years: usize) -> AssessmentResult<Array1<f64>> {
        let available = self.fishing_mortality.year_count() - 1;
        if years == 0 || available == 0 {
            return Err(AssessmentError::InsufficientData {
                what: "pre-terminal years for recent F",
                required: 1,
                found: available.min(years),
            });
        }
        let end = self.terminal_year() - 1;
        let start = end - years.min(available) as i32 + 1;
        Ok(self.fishing_mortality.mean_over_years(start, end)?)
    }

    /// Mean F at age over the last `years` years, terminal year included.
    ///
    /// # Errors
    /// - [`AssessmentError::InsufficientData`] when `years == 0`.
    pub fn current_f(&self, years: usize) -> AssessmentResult<Array1<f64>> {
        if years == 0 {
            return Err(AssessmentError::InsufficientData {
                what: "years for current F",
                required: 1,
                found: 0,
            });
        }
        let available = self.fishing_mortality.year_count();
        let end = self.terminal_year();
        let start = end - years.min(available) as i32 + 1;
        Ok(self.fishing_mortality.mean_over_years(start, end)?)
    }
}
