//! Backward VPA: reconstruct stock numbers and F from catch-at-age.
//!
//! Purpose
//! -------
//! Given catch, weight and maturity at age, natural mortality, and the stock
//! numbers of the terminal (most recent) year, walk the cohorts backwards in
//! time with Pope's approximation.
//!
//! Key behaviors
//! -------------
//! - Terminal year: N is given, F is recovered by inverting the catch
//!   equation (clamped to `VpaOptions::f_ceiling` when it cannot be).
//! - Non-terminal years: the two oldest ages come from
//!   [`resolve_plus_group`]; every younger age from the cohort step
//!   `N_{a,y} = N_{a+1,y+1} e^{M} + C_{a,y} e^{M/2}`. The plus group's F is
//!   set equal to the second-oldest age's F.
//! - Each year is computed into its own fresh arrays from the year after it;
//!   the output matrices are assembled only once every year is done.
//! - SSB at age (tonnes) and recruitment (youngest age) are derived from the
//!   finished stock numbers.
//!
//! Invariants & assumptions
//! ------------------------
//! - Catch, weight, and maturity share one year × age domain with at least
//!   two ages. This is checked once, in [`StockData::new`].
//! - Catch is a count, weight a mass, maturity a ratio in `[0, 1]`.
//! - Terminal stock numbers are finite and non-negative, one per age.
//!
//! Conventions
//! -----------
//! - Stock numbers are reported in the catch matrix's count unit.
//! - Clamped cells and even plus-group splits are counted on the output and
//!   reported once per run with `log::warn!`.
use crate::{
    errors::{AssessmentError, AssessmentResult},
    matrix::{AgeYearMatrix, Quantity, Unit},
    vpa::{
        mortality::NaturalMortality,
        plus_group::resolve_plus_group,
        pope::{
            DEFAULT_F_CEILING, abundance_from_catch, cohort_back_step,
            fishing_mortality_from_catch,
        },
        result::VpaOutput,
    },
};
use log::warn;
use ndarray::{Array1, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

/// VPA configuration.
///
/// - `f_ceiling`: value F is clamped to when the catch equation has no
///   finite inverse (catch at or above the implied stock). Default `10.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VpaOptions {
    pub f_ceiling: f64,
}

impl VpaOptions {
    /// # Errors
    /// - [`AssessmentError::InvalidConfig`] unless `f_ceiling` is finite and
    ///   strictly positive.
    pub fn new(f_ceiling: f64) -> AssessmentResult<Self> {
        let opts = Self { f_ceiling };
        opts.validate()?;
        Ok(opts)
    }

    pub fn validate(&self) -> AssessmentResult<()> {
        if !self.f_ceiling.is_finite() || self.f_ceiling <= 0.0 {
            return Err(AssessmentError::InvalidConfig {
                field: "f_ceiling",
                value: self.f_ceiling,
                reason: "must be finite and > 0",
            });
        }
        Ok(())
    }
}

impl Default for VpaOptions {
    fn default() -> Self {
        Self { f_ceiling: DEFAULT_F_CEILING }
    }
}

/// Static inputs of the VPA: catch, weight, and maturity at age.
///
/// Invariants
/// ----------
/// - All three matrices share one year × age domain with at least two ages.
/// - Catch is a non-negative count, weight a non-negative mass, maturity a
///   ratio in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct StockData {
    catch: AgeYearMatrix,
    weight: AgeYearMatrix,
    maturity: AgeYearMatrix,
}

impl StockData {
    /// Validate and bundle the three input matrices.
    ///
    /// # Errors
    /// - [`AssessmentError::WrongQuantity`] when a matrix carries a unit of
    ///   the wrong quantity.
    /// - [`AssessmentError::DomainMismatch`] when weight or maturity do not
    ///   cover the catch matrix's domain exactly.
    /// - [`AssessmentError::TooFewAges`] with fewer than two ages.
    /// - [`AssessmentError::InvalidData`] for negative or non-finite cells,
    ///   or maturity above one.
    pub fn new(
        catch: AgeYearMatrix, weight: AgeYearMatrix, maturity: AgeYearMatrix,
    ) -> AssessmentResult<Self> {
        expect_quantity("catch at age", &catch, Quantity::Count)?;
        expect_quantity("weight at age", &weight, Quantity::Mass)?;
        expect_quantity("maturity at age", &maturity, Quantity::Ratio)?;
        for (what, other) in [("weight at age", &weight), ("maturity at age", &maturity)] {
            if !catch.same_domain(other) {
                return Err(AssessmentError::DomainMismatch {
                    what,
                    expected: domain(&catch),
                    found: domain(other),
                });
            }
        }
        if catch.age_count() < 2 {
            return Err(AssessmentError::TooFewAges { found: catch.age_count() });
        }
        check_cells("catch", &catch, |v| v >= 0.0)?;
        check_cells("weight", &weight, |v| v >= 0.0)?;
        check_cells("maturity", &maturity, |v| (0.0..=1.0).contains(&v))?;
        Ok(Self { catch, weight, maturity })
    }

    pub fn catch(&self) -> &AgeYearMatrix {
        &self.catch
    }

    pub fn weight(&self) -> &AgeYearMatrix {
        &self.weight
    }

    pub fn maturity(&self) -> &AgeYearMatrix {
        &self.maturity
    }

    pub fn start_year(&self) -> i32 {
        self.catch.start_year()
    }

    pub fn end_year(&self) -> i32 {
        self.catch.end_year()
    }

    pub fn year_count(&self) -> usize {
        self.catch.year_count()
    }

    pub fn age_count(&self) -> usize {
        self.catch.age_count()
    }

    /// Fresh copy of the inputs ending at `end_year`.
    ///
    /// # Errors
    /// - Propagates out-of-range years from [`AgeYearMatrix::slice_years`].
    pub fn truncate(&self, end_year: i32) -> AssessmentResult<StockData> {
        let start = self.start_year();
        Ok(StockData {
            catch: self.catch.slice_years(start, end_year)?,
            weight: self.weight.slice_years(start, end_year)?,
            maturity: self.maturity.slice_years(start, end_year)?,
        })
    }

    /// Factor turning `stock count × weight` into tonnes.
    pub fn tonnes_factor(&self) -> AssessmentResult<f64> {
        biomass_tonnes_factor(self.catch.unit(), self.weight.unit())
    }
}

/// Factor turning `count (in count_unit) × weight (in weight_unit)` into
/// tonnes.
///
/// # Errors
/// - [`AssessmentError::Matrix`] when the units are not a count and a mass.
pub fn biomass_tonnes_factor(count_unit: Unit, weight_unit: Unit) -> AssessmentResult<f64> {
    Ok(count_unit.factor_to(Unit::Fish)? * weight_unit.factor_to(Unit::Tonne)?)
}

/// Terminal stock numbers implied by a terminal F vector.
///
/// Applies `N = C e^{M/2} / (1 − e^{−F})` age by age to the terminal
/// year's catch.
///
/// # Errors
/// - [`AssessmentError::ShapeMismatch`] when `terminal_f` does not have one
///   value per age.
/// - [`AssessmentError::InvalidTerminalF`] for non-finite or non-positive F.
pub fn terminal_stock_from_f(
    data: &StockData, mortality: &NaturalMortality, terminal_f: &Array1<f64>,
) -> AssessmentResult<Array1<f64>> {
    let catch = data.catch();
    if terminal_f.len() != catch.age_count() {
        return Err(AssessmentError::ShapeMismatch {
            what: "terminal F",
            expected: catch.age_count(),
            found: terminal_f.len(),
        });
    }
    let m = mortality.for_ages(catch.age_count())?;
    let terminal_catch = catch.row(catch.end_year())?;
    let mut stock = Array1::zeros(terminal_f.len());
    for (j, &f) in terminal_f.iter().enumerate() {
        if !f.is_finite() || f <= 0.0 {
            let age = catch.min_age() + j as u32;
            return Err(AssessmentError::InvalidTerminalF { age, value: f });
        }
        stock[j] = abundance_from_catch(terminal_catch[j], f, m[j]);
    }
    Ok(stock)
}

/// Run the backward VPA from a terminal stock-number vector.
///
/// Parameters
/// ----------
/// - `data`: validated catch, weight, maturity.
/// - `mortality`: natural mortality by age.
/// - `terminal_stock`: stock numbers at age in the terminal year, in the
///   catch matrix's count unit.
/// - `opts`: F ceiling.
///
/// Returns
/// -------
/// [`VpaOutput`] with stock numbers, F, SSB at age, and recruitment.
///
/// # Errors
/// - [`AssessmentError::ShapeMismatch`] when `terminal_stock` has the wrong
///   length.
/// - [`AssessmentError::InvalidTerminalStock`] for negative or non-finite
///   terminal stock numbers.
/// - Configuration errors from `mortality` and `opts`.
pub fn backward_vpa(
    data: &StockData, mortality: &NaturalMortality, terminal_stock: &Array1<f64>,
    opts: &VpaOptions,
) -> AssessmentResult<VpaOutput> {
    opts.validate()?;
    let catch = data.catch();
    let ages = catch.age_count();
    validate_terminal_stock(terminal_stock, ages, catch.min_age())?;
    let m = mortality.for_ages(ages)?;
    let catch_data = catch.data();
    let years = catch.year_count();

    let mut tally = Tally::default();
    let mut stock_rows: Vec<Array1<f64>> = Vec::with_capacity(years);
    let mut f_rows: Vec<Array1<f64>> = Vec::with_capacity(years);

    let terminal_f = invert_row(
        terminal_stock.view(),
        catch_data.row(years - 1),
        m.view(),
        opts.f_ceiling,
        &mut tally,
    );
    stock_rows.push(terminal_stock.clone());
    f_rows.push(terminal_f);

    let mut next_stock = terminal_stock.clone();
    for y in (0..years - 1).rev() {
        let (stock, f) =
            year_back(next_stock.view(), catch_data.row(y), m.view(), opts.f_ceiling, &mut tally);
        stock_rows.push(stock.clone());
        f_rows.push(f);
        next_stock = stock;
    }
    stock_rows.reverse();
    f_rows.reverse();

    if tally.clamped > 0 {
        warn!(
            "VPA {}-{}: {} cell(s) with catch at or above the implied stock; F clamped to {}",
            catch.start_year(),
            catch.end_year(),
            tally.clamped,
            opts.f_ceiling
        );
    }
    if tally.even_splits > 0 {
        warn!(
            "VPA {}-{}: {} year(s) with zero catch in both oldest ages; plus group split evenly",
            catch.start_year(),
            catch.end_year(),
            tally.even_splits
        );
    }

    let (year_range, age_range) = (catch.year_range(), catch.age_range());
    let stock_numbers =
        AgeYearMatrix::from_year_rows(catch.unit(), year_range, age_range, &stock_rows)?;
    let fishing_mortality =
        AgeYearMatrix::from_year_rows(Unit::Dimensionless, year_range, age_range, &f_rows)?;

    let tonnes = data.tonnes_factor()?;
    let ssb = &stock_numbers.data() * &data.weight().data() * &data.maturity().data() * tonnes;
    let spawning_biomass = AgeYearMatrix::new(Unit::Tonne, year_range, age_range, ssb)?;

    let youngest = stock_numbers.data().column(0).to_owned().insert_axis(Axis(1));
    let recruitment = AgeYearMatrix::new(
        catch.unit(),
        year_range,
        (catch.min_age(), catch.min_age()),
        youngest,
    )?;

    Ok(VpaOutput {
        stock_numbers,
        fishing_mortality,
        spawning_biomass,
        recruitment,
        clamped_cells: tally.clamped,
        even_splits: tally.even_splits,
    })
}

#[derive(Debug, Default)]
struct Tally {
    clamped: usize,
    even_splits: usize,
}

/// One non-terminal year from the year after it.
fn year_back(
    next: ArrayView1<f64>, catch: ArrayView1<f64>, m: ArrayView1<f64>, f_ceiling: f64,
    tally: &mut Tally,
) -> (Array1<f64>, Array1<f64>) {
    let p = catch.len() - 1;
    let split = resolve_plus_group(next[p], catch[p], catch[p - 1], m[p], m[p - 1]);
    if split.even_split {
        tally.even_splits += 1;
    }
    let stock = Array1::from_shape_fn(p + 1, |a| {
        if a == p {
            split.plus
        } else if a + 1 == p {
            split.second_oldest
        } else {
            cohort_back_step(next[a + 1], catch[a], m[a])
        }
    });
    let mut f = invert_row(stock.view(), catch, m, f_ceiling, tally);
    f[p] = f[p - 1];
    (stock, f)
}

fn invert_row(
    stock: ArrayView1<f64>, catch: ArrayView1<f64>, m: ArrayView1<f64>, f_ceiling: f64,
    tally: &mut Tally,
) -> Array1<f64> {
    Array1::from_shape_fn(stock.len(), |a| {
        let inv = fishing_mortality_from_catch(catch[a], stock[a], m[a], f_ceiling);
        if inv.is_clamped() {
            tally.clamped += 1;
        }
        inv.value()
    })
}

fn validate_terminal_stock(
    terminal: &Array1<f64>, ages: usize, min_age: u32,
) -> AssessmentResult<()> {
    if terminal.len() != ages {
        return Err(AssessmentError::ShapeMismatch {
            what: "terminal stock numbers",
            expected: ages,
            found: terminal.len(),
        });
    }
    match terminal.iter().position(|v| !v.is_finite() || *v < 0.0) {
        Some(j) => Err(AssessmentError::InvalidTerminalStock {
            age: min_age + j as u32,
            value: terminal[j],
        }),
        None => Ok(()),
    }
}

fn expect_quantity(
    what: &'static str, matrix: &AgeYearMatrix, expected: Quantity,
) -> AssessmentResult<()> {
    if matrix.unit().quantity() != expected {
        return Err(AssessmentError::WrongQuantity { what, expected, found: matrix.unit() });
    }
    Ok(())
}

fn check_cells<P>(what: &'static str, matrix: &AgeYearMatrix, admissible: P) -> AssessmentResult<()>
where
    P: Fn(f64) -> bool,
{
    for (year, row) in matrix.years().zip(matrix.data().rows()) {
        for (age, &value) in matrix.ages().zip(row.iter()) {
            if !value.is_finite() || !admissible(value) {
                return Err(AssessmentError::InvalidData { what, year, age, value });
            }
        }
    }
    Ok(())
}

fn domain(matrix: &AgeYearMatrix) -> (i32, i32, u32, u32) {
    (matrix.start_year(), matrix.end_year(), matrix.min_age(), matrix.max_age())
}
