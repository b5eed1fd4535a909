//! matrix — unit-tagged (year × age) containers.
//!
//! Purpose
//! -------
//! Provide the immutable data foundation for every assessment step: the
//! [`AgeYearMatrix`] container, the closed [`Unit`] enumeration with its
//! conversion table, and the [`MatrixError`] surface for shape, range, and
//! unit failures.
//!
//! Key behaviors
//! -------------
//! - Shape is validated once at construction against declared contiguous
//!   year and age ranges.
//! - Lookups are by `(year, age)` and fail with the valid bounds stated.
//! - Units are parsed (and rejected) at construction time, converted on
//!   read via an explicit factor table.
//!
//! Downstream usage
//! ----------------
//! - The ingestion layer builds catch, weight, and maturity matrices with
//!   [`AgeYearMatrix::from_rows`] or [`AgeYearMatrix::new`].
//! - The VPA assembles its output matrices from per-year rows via
//!   [`AgeYearMatrix::from_year_rows`].
//! - The retrospective analysis truncates inputs with
//!   [`AgeYearMatrix::slice_years`].

pub mod age_year;
pub mod errors;
pub mod units;

pub use self::age_year::{AgeRange, AgeYearMatrix, YearRange};
pub use self::errors::{MatrixError, MatrixResult};
pub use self::units::{Quantity, Unit};
