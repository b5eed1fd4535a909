//! Immutable, unit-tagged (year × age) matrices.
//!
//! Purpose
//! -------
//! Provide the container every assessment step reads from and writes to:
//! catch-at-age, weight-at-age, maturity-at-age, and every derived quantity
//! (stock numbers, fishing mortality, spawning biomass).
//!
//! Key behaviors
//! -------------
//! - [`AgeYearMatrix::new`] validates the data shape against the declared
//!   contiguous year and age ranges.
//! - Lookups are by calendar year and age, never by raw index; anything
//!   outside the declared domain is reported with the valid bounds.
//! - Values can be read in any unit compatible with the matrix's own unit.
//!
//! Invariants & assumptions
//! ------------------------
//! - `data.nrows() == end_year - start_year + 1` and
//!   `data.ncols() == max_age - min_age + 1`.
//! - No method mutates a matrix in place. Derived matrices (`map`,
//!   `slice_years`, `convert_to`) are always fresh values.
//!
//! Conventions
//! -----------
//! - Rows are years (oldest first), columns are ages (youngest first).
//! - The oldest age column is treated by the VPA as the plus group; this
//!   module attaches no meaning to it.
use crate::matrix::{
    errors::{MatrixError, MatrixResult},
    units::Unit,
};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, s};
use serde::{Deserialize, Serialize};

/// Inclusive `[start, end]` calendar-year range.
pub type YearRange = (i32, i32);

/// Inclusive `[min, max]` age range.
pub type AgeRange = (u32, u32);

/// `AgeYearMatrix` — rectangular data over a contiguous year × age domain.
///
/// Fields
/// ------
/// - `unit`: physical unit of every cell.
/// - `years`: inclusive calendar-year range (rows).
/// - `ages`: inclusive age range (columns).
/// - `data`: `years × ages` values.
///
/// Invariants
/// ----------
/// - `years.0 <= years.1`, `ages.0 <= ages.1`.
/// - `data` has exactly one row per year and one column per age.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeYearMatrix {
    unit: Unit,
    years: YearRange,
    ages: AgeRange,
    data: Array2<f64>,
}

impl AgeYearMatrix {
    /// Construct a matrix and validate its shape.
    ///
    /// # Errors
    /// - [`MatrixError::InvalidRange`] when a range is inverted.
    /// - [`MatrixError::ShapeMismatch`] when `data` is not
    ///   `year_count × age_count`.
    pub fn new(
        unit: Unit, years: YearRange, ages: AgeRange, data: Array2<f64>,
    ) -> MatrixResult<Self> {
        let (year_count, age_count) = validate_ranges(years, ages)?;
        if data.dim() != (year_count, age_count) {
            return Err(MatrixError::ShapeMismatch {
                expected: (year_count, age_count),
                found: data.dim(),
            });
        }
        Ok(Self { unit, years, ages, data })
    }

    /// Construct a matrix from nested rows (one `Vec` per year).
    ///
    /// This is the shape tables arrive in from spreadsheet ingestion, so the
    /// row lengths are checked individually before the data is packed.
    ///
    /// # Errors
    /// - [`MatrixError::ShapeMismatch`] when the number of rows is wrong.
    /// - [`MatrixError::RaggedRow`] for the first row with the wrong length.
    pub fn from_rows(
        unit: Unit, years: YearRange, ages: AgeRange, rows: Vec<Vec<f64>>,
    ) -> MatrixResult<Self> {
        let (year_count, age_count) = validate_ranges(years, ages)?;
        if rows.len() != year_count {
            let found_cols = rows.first().map_or(0, Vec::len);
            return Err(MatrixError::ShapeMismatch {
                expected: (year_count, age_count),
                found: (rows.len(), found_cols),
            });
        }
        if let Some((row, bad)) = rows.iter().enumerate().find(|(_, r)| r.len() != age_count) {
            return Err(MatrixError::RaggedRow { row, expected: age_count, found: bad.len() });
        }
        let flat: Vec<f64> = rows.into_iter().flatten().collect();
        let data = Array2::from_shape_vec((year_count, age_count), flat).map_err(|_| {
            MatrixError::ShapeMismatch {
                expected: (year_count, age_count),
                found: (year_count, age_count),
            }
        })?;
        Ok(Self { unit, years, ages, data })
    }

    /// Build a matrix by evaluating `f(year, age)` over the whole domain.
    pub fn from_fn<F>(unit: Unit, years: YearRange, ages: AgeRange, mut f: F) -> MatrixResult<Self>
    where
        F: FnMut(i32, u32) -> f64,
    {
        let (year_count, age_count) = validate_ranges(years, ages)?;
        let data = Array2::from_shape_fn((year_count, age_count), |(i, j)| {
            f(years.0 + i as i32, ages.0 + j as u32)
        });
        Ok(Self { unit, years, ages, data })
    }

    /// Assemble a matrix from per-year rows that were computed independently.
    ///
    /// `rows[i]` holds the ages of year `years.0 + i`.
    pub fn from_year_rows(
        unit: Unit, years: YearRange, ages: AgeRange, rows: &[Array1<f64>],
    ) -> MatrixResult<Self> {
        let (year_count, age_count) = validate_ranges(years, ages)?;
        if rows.len() != year_count {
            return Err(MatrixError::ShapeMismatch {
                expected: (year_count, age_count),
                found: (rows.len(), rows.first().map_or(0, Array1::len)),
            });
        }
        if let Some((row, bad)) = rows.iter().enumerate().find(|(_, r)| r.len() != age_count) {
            return Err(MatrixError::RaggedRow { row, expected: age_count, found: bad.len() });
        }
        let data = Array2::from_shape_fn((year_count, age_count), |(i, j)| rows[i][j]);
        Ok(Self { unit, years, ages, data })
    }

    // ---- Accessors ----

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn year_range(&self) -> YearRange {
        self.years
    }

    pub fn age_range(&self) -> AgeRange {
        self.ages
    }

    pub fn start_year(&self) -> i32 {
        self.years.0
    }

    pub fn end_year(&self) -> i32 {
        self.years.1
    }

    pub fn min_age(&self) -> u32 {
        self.ages.0
    }

    pub fn max_age(&self) -> u32 {
        self.ages.1
    }

    pub fn year_count(&self) -> usize {
        self.data.nrows()
    }

    pub fn age_count(&self) -> usize {
        self.data.ncols()
    }

    /// Read-only view of the raw `years × ages` data.
    pub fn data(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    /// Calendar years covered, oldest first.
    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.years.0..=self.years.1
    }

    /// Ages covered, youngest first.
    pub fn ages(&self) -> impl Iterator<Item = u32> {
        self.ages.0..=self.ages.1
    }

    /// Whether `other` spans exactly the same years and ages.
    pub fn same_domain(&self, other: &AgeYearMatrix) -> bool {
        self.years == other.years && self.ages == other.ages
    }

    // ---- Lookup ----

    /// Row index of `year`.
    ///
    /// # Errors
    /// - [`MatrixError::YearOutOfRange`] with the valid bounds.
    pub fn year_index(&self, year: i32) -> MatrixResult<usize> {
        if year < self.years.0 || year > self.years.1 {
            return Err(MatrixError::YearOutOfRange {
                year,
                start: self.years.0,
                end: self.years.1,
            });
        }
        Ok((year - self.years.0) as usize)
    }

    /// Column index of `age`.
    ///
    /// # Errors
    /// - [`MatrixError::AgeOutOfRange`] with the valid bounds.
    pub fn age_index(&self, age: u32) -> MatrixResult<usize> {
        if age < self.ages.0 || age > self.ages.1 {
            return Err(MatrixError::AgeOutOfRange { age, min: self.ages.0, max: self.ages.1 });
        }
        Ok((age - self.ages.0) as usize)
    }

    /// Value at `(year, age)` in the matrix's own unit.
    pub fn get(&self, year: i32, age: u32) -> MatrixResult<f64> {
        let i = self.year_index(year)?;
        let j = self.age_index(age)?;
        Ok(self.data[[i, j]])
    }

    /// Value at `(year, age)` converted into `unit`.
    ///
    /// # Errors
    /// - Range errors as for [`get`](Self::get).
    /// - [`MatrixError::IncompatibleUnits`] when `unit` measures a different
    ///   quantity.
    pub fn get_in(&self, year: i32, age: u32, unit: Unit) -> MatrixResult<f64> {
        let value = self.get(year, age)?;
        self.unit.convert(value, unit)
    }

    /// Human-readable rendering of the value at `(year, age)`.
    pub fn get_formatted(&self, year: i32, age: u32) -> MatrixResult<String> {
        Ok(self.unit.format_value(self.get(year, age)?))
    }

    /// All ages of `year`.
    pub fn row(&self, year: i32) -> MatrixResult<ArrayView1<'_, f64>> {
        let i = self.year_index(year)?;
        Ok(self.data.row(i))
    }

    /// All years of `age`.
    pub fn column(&self, age: u32) -> MatrixResult<ArrayView1<'_, f64>> {
        let j = self.age_index(age)?;
        Ok(self.data.column(j))
    }

    /// Sum over ages for every year.
    pub fn year_totals(&self) -> Array1<f64> {
        self.data.sum_axis(Axis(1))
    }

    /// Mean over ages for every year.
    pub fn year_means(&self) -> Array1<f64> {
        self.data.mean_axis(Axis(1)).unwrap_or_else(|| Array1::zeros(self.year_count()))
    }

    /// Per-age mean over the inclusive year window `[start, end]`.
    pub fn mean_over_years(&self, start: i32, end: i32) -> MatrixResult<Array1<f64>> {
        let window = self.slice_years(start, end)?;
        Ok(window.data.mean_axis(Axis(0)).unwrap_or_else(|| Array1::zeros(self.age_count())))
    }

    // ---- Derivation ----

    /// Fresh matrix restricted to the inclusive year window `[start, end]`.
    ///
    /// # Errors
    /// - [`MatrixError::InvalidRange`] when `start > end`.
    /// - [`MatrixError::YearOutOfRange`] when either bound is outside the
    ///   matrix.
    pub fn slice_years(&self, start: i32, end: i32) -> MatrixResult<AgeYearMatrix> {
        if start > end {
            return Err(MatrixError::InvalidRange {
                what: "year",
                start: start as i64,
                end: end as i64,
            });
        }
        let i0 = self.year_index(start)?;
        let i1 = self.year_index(end)?;
        Ok(AgeYearMatrix {
            unit: self.unit,
            years: (start, end),
            ages: self.ages,
            data: self.data.slice(s![i0..=i1, ..]).to_owned(),
        })
    }

    /// Fresh matrix with `f` applied cell-wise; the unit is replaced by `unit`.
    pub fn map<F>(&self, unit: Unit, f: F) -> AgeYearMatrix
    where
        F: Fn(f64) -> f64,
    {
        AgeYearMatrix { unit, years: self.years, ages: self.ages, data: self.data.mapv(f) }
    }

    /// Fresh matrix with every value converted into `unit`.
    pub fn convert_to(&self, unit: Unit) -> MatrixResult<AgeYearMatrix> {
        let factor = self.unit.factor_to(unit)?;
        Ok(self.map(unit, |v| v * factor))
    }
}

fn validate_ranges(years: YearRange, ages: AgeRange) -> MatrixResult<(usize, usize)> {
    if years.0 > years.1 {
        return Err(MatrixError::InvalidRange {
            what: "year",
            start: years.0 as i64,
            end: years.1 as i64,
        });
    }
    if ages.0 > ages.1 {
        return Err(MatrixError::InvalidRange {
            what: "age",
            start: ages.0 as i64,
            end: ages.1 as i64,
        });
    }
    Ok(((years.1 - years.0 + 1) as usize, (ages.1 - ages.0 + 1) as usize))
}
