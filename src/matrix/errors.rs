//! Errors raised by age-year matrix construction, lookup, and unit handling.
//!
//! Conventions
//! -----------
//! - Years are calendar years (`i32`), ages are whole years (`u32`).
//! - Out-of-range errors always carry the offending coordinate together with
//!   the valid inclusive bounds so the message is actionable on its own.
//! - Shapes are reported as `(rows, cols)` = `(years, ages)`.
use crate::matrix::units::Unit;

/// Result alias for matrix operations.
pub type MatrixResult<T> = Result<T, MatrixError>;

/// Error type for [`AgeYearMatrix`](crate::matrix::AgeYearMatrix) and
/// [`Unit`] handling.
#[derive(Debug, Clone, PartialEq)]
pub enum MatrixError {
    // ---- Construction ----
    /// Data dimensions disagree with the declared year/age ranges.
    ShapeMismatch { expected: (usize, usize), found: (usize, usize) },

    /// A nested-vector row has the wrong number of ages.
    RaggedRow { row: usize, expected: usize, found: usize },

    /// A declared range is inverted (`start > end`).
    InvalidRange { what: &'static str, start: i64, end: i64 },

    // ---- Lookup ----
    /// Requested year lies outside `[start, end]`.
    YearOutOfRange { year: i32, start: i32, end: i32 },

    /// Requested age lies outside `[min, max]`.
    AgeOutOfRange { age: u32, min: u32, max: u32 },

    // ---- Units ----
    /// The two units measure different quantities.
    IncompatibleUnits { from: Unit, to: Unit },

    /// A unit label could not be recognized.
    UnknownUnit { label: String },
}

impl std::error::Error for MatrixError {}

impl std::fmt::Display for MatrixError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatrixError::ShapeMismatch { expected, found } => {
                write!(
                    f,
                    "Shape mismatch: declared ranges need {} years x {} ages, data is {} x {}",
                    expected.0, expected.1, found.0, found.1
                )
            }
            MatrixError::RaggedRow { row, expected, found } => {
                write!(f, "Row {row} has {found} ages, expected {expected}")
            }
            MatrixError::InvalidRange { what, start, end } => {
                write!(f, "Invalid {what} range [{start}, {end}]: start must not exceed end")
            }
            MatrixError::YearOutOfRange { year, start, end } => {
                write!(f, "Year {year} is out of range: valid years are [{start}, {end}]")
            }
            MatrixError::AgeOutOfRange { age, min, max } => {
                write!(f, "Age {age} is out of range: valid ages are [{min}, {max}]")
            }
            MatrixError::IncompatibleUnits { from, to } => {
                write!(f, "Cannot convert from '{from}' to '{to}': different quantities")
            }
            MatrixError::UnknownUnit { label } => {
                write!(f, "Unknown unit label '{label}'")
            }
        }
    }
}
