//! errors — the assessment-level error surface.
//!
//! Purpose
//! -------
//! Provide one error enum, [`AssessmentError`], for everything above the
//! matrix and optimizer layers: VPA reconstruction, index tuning,
//! retrospective diagnostics, projection, and configuration.
//!
//! Key behaviors
//! -------------
//! - Group failures into the kinds callers act on: shape errors (always
//!   fatal), out-of-range lookups, insufficient data (fatal for the specific
//!   diagnostic only), invalid terminal states, and invalid configuration.
//! - Wrap [`MatrixError`] and [`OptError`] via `From`, so `?` works across
//!   layers.
//!
//! Conventions
//! -----------
//! - Degenerate numeric conditions (catch exceeding the implied stock,
//!   non-positive values in log space) are **not** errors anywhere in this
//!   crate; they are clamped or skipped with a logged warning.
//! - Messages are phrased in domain terms and embed the offending values.
use crate::{
    matrix::{MatrixError, Quantity, Unit},
    optimization::errors::OptError,
};

/// Result alias for assessment operations.
pub type AssessmentResult<T> = Result<T, AssessmentError>;

/// Unified error type for the assessment pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum AssessmentError {
    // ---- Wrapped layers ----
    /// Matrix construction, lookup, or unit failure.
    Matrix(MatrixError),

    /// Optimizer configuration or backend failure.
    Optimization(OptError),

    // ---- Shape ----
    /// A vector has the wrong length (e.g. the terminal stock vector).
    ShapeMismatch { what: &'static str, expected: usize, found: usize },

    /// Two matrices that must share a year/age domain do not.
    DomainMismatch {
        what: &'static str,
        expected: (i32, i32, u32, u32),
        found: (i32, i32, u32, u32),
    },

    /// The VPA needs at least two age classes (plus group and one below).
    TooFewAges { found: usize },

    /// A matrix carries a unit of the wrong quantity.
    WrongQuantity { what: &'static str, expected: Quantity, found: Unit },

    /// An input cell holds a value the model cannot use (negative or NaN).
    InvalidData { what: &'static str, year: i32, age: u32, value: f64 },

    // ---- Terminal state ----
    /// Terminal stock numbers must be finite and non-negative.
    InvalidTerminalStock { age: u32, value: f64 },

    /// Terminal fishing mortality must be finite and strictly positive.
    InvalidTerminalF { age: u32, value: f64 },

    // ---- Data sufficiency ----
    /// Too few valid observations or runs for the requested computation.
    InsufficientData { what: &'static str, required: usize, found: usize },

    /// An abundance index is malformed.
    InvalidIndex { name: String, reason: &'static str },

    // ---- Configuration ----
    /// A numeric setting is outside its admissible range.
    InvalidConfig { field: &'static str, value: f64, reason: &'static str },

    /// A configuration document could not be parsed.
    ConfigParse { text: String },

    /// Every candidate of a search failed.
    NoViableCandidate { what: &'static str },
}

impl AssessmentError {
    /// Whether this error is a shape error (always fatal).
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            AssessmentError::ShapeMismatch { .. }
                | AssessmentError::DomainMismatch { .. }
                | AssessmentError::TooFewAges { .. }
                | AssessmentError::Matrix(MatrixError::ShapeMismatch { .. })
                | AssessmentError::Matrix(MatrixError::RaggedRow { .. })
        )
    }

    /// Whether this error reports insufficient data.
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, AssessmentError::InsufficientData { .. })
    }

    /// Whether this error is an out-of-range lookup.
    pub fn is_out_of_range(&self) -> bool {
        matches!(
            self,
            AssessmentError::Matrix(MatrixError::YearOutOfRange { .. })
                | AssessmentError::Matrix(MatrixError::AgeOutOfRange { .. })
        )
    }
}

impl std::error::Error for AssessmentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssessmentError::Matrix(err) => Some(err),
            AssessmentError::Optimization(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for AssessmentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Wrapped layers ----
            AssessmentError::Matrix(err) => write!(f, "Matrix error: {err}"),
            AssessmentError::Optimization(err) => write!(f, "Optimization error: {err}"),

            // ---- Shape ----
            AssessmentError::ShapeMismatch { what, expected, found } => {
                write!(f, "Shape mismatch for {what}: expected length {expected}, found {found}")
            }
            AssessmentError::DomainMismatch { what, expected, found } => {
                write!(
                    f,
                    "Domain mismatch for {what}: expected years [{}, {}] x ages [{}, {}], \
                     found years [{}, {}] x ages [{}, {}]",
                    expected.0, expected.1, expected.2, expected.3, found.0, found.1, found.2,
                    found.3
                )
            }
            AssessmentError::TooFewAges { found } => {
                write!(f, "At least two age classes are required, found {found}")
            }
            AssessmentError::WrongQuantity { what, expected, found } => {
                write!(f, "{what} must be measured as {expected:?}, found unit '{found}'")
            }
            AssessmentError::InvalidData { what, year, age, value } => {
                write!(f, "Invalid {what} at year {year}, age {age}: {value}")
            }

            // ---- Terminal state ----
            AssessmentError::InvalidTerminalStock { age, value } => {
                write!(
                    f,
                    "Invalid terminal stock number at age {age}: {value}, must be finite and >= 0"
                )
            }
            AssessmentError::InvalidTerminalF { age, value } => {
                write!(f, "Invalid terminal F at age {age}: {value}, must be finite and > 0")
            }

            // ---- Data sufficiency ----
            AssessmentError::InsufficientData { what, required, found } => {
                write!(f, "Insufficient data for {what}: need at least {required}, found {found}")
            }
            AssessmentError::InvalidIndex { name, reason } => {
                write!(f, "Invalid abundance index '{name}': {reason}")
            }

            // ---- Configuration ----
            AssessmentError::InvalidConfig { field, value, reason } => {
                write!(f, "Invalid configuration value for {field}: {value}: {reason}")
            }
            AssessmentError::ConfigParse { text } => {
                write!(f, "Could not parse configuration: {text}")
            }
            AssessmentError::NoViableCandidate { what } => {
                write!(f, "No viable candidate for {what}: every evaluation failed")
            }
        }
    }
}

impl From<MatrixError> for AssessmentError {
    fn from(err: MatrixError) -> Self {
        AssessmentError::Matrix(err)
    }
}

impl From<OptError> for AssessmentError {
    fn from(err: OptError) -> Self {
        AssessmentError::Optimization(err)
    }
}
