//! Error surface of the optimization layer.
//!
//! Option and start-point checks produce dedicated variants; anything argmin
//! raises is folded into [`OptError::Solver`] with its kind preserved.
use argmin::core::{ArgminError, Error};

/// Crate-wide result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- NelderMeadOptions ----
    /// Simplex spread tolerance needs to be positive and finite.
    InvalidTolerance {
        tol: f64,
        reason: &'static str,
    },
    /// Maximum iterations needs to be positive.
    InvalidMaxIter {
        max_iter: usize,
        reason: &'static str,
    },
    /// Initial simplex step needs to be positive and finite.
    InvalidInitialStep {
        step: f64,
        reason: &'static str,
    },
    /// Reflection/expansion/contraction/shrink coefficient out of range.
    InvalidCoefficient {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    // ---- Starting point ----
    /// The starting point has no coordinates.
    EmptyStart,

    /// Starting coordinates need to be finite.
    InvalidStart {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    // ---- Cost function ----
    /// Cost function returned a non-finite value.
    NonFiniteCost {
        value: f64,
    },

    // ---- Optimizer outcome ----
    /// Optimum coordinates must be finite.
    InvalidOptimum {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    /// The solver finished without a best point.
    MissingOptimum,

    // ---- Argmin ----
    /// Error raised inside argmin, tagged with its kind.
    Solver {
        kind: SolverErrorKind,
        text: String,
    },
}

/// Kind of an argmin-side failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverErrorKind {
    InvalidParameter,
    NotImplemented,
    NotInitialized,
    ConditionViolated,
    CheckpointNotFound,
    PotentialBug,
    Impossible,
    /// Any other boxed error, including kinds added to argmin later.
    Other,
}

impl SolverErrorKind {
    fn label(self) -> &'static str {
        match self {
            SolverErrorKind::InvalidParameter => "invalid solver parameter",
            SolverErrorKind::NotImplemented => "solver feature not implemented",
            SolverErrorKind::NotInitialized => "solver not initialized",
            SolverErrorKind::ConditionViolated => "solver condition violated",
            SolverErrorKind::CheckpointNotFound => "solver checkpoint not found",
            SolverErrorKind::PotentialBug => "potential solver bug",
            SolverErrorKind::Impossible => "impossible solver state",
            SolverErrorKind::Other => "solver error",
        }
    }
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- NelderMeadOptions ----
            OptError::InvalidTolerance { tol, reason } => {
                write!(f, "Invalid simplex tolerance {tol}: {reason}")
            }
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            OptError::InvalidInitialStep { step, reason } => {
                write!(f, "Invalid initial simplex step {step}: {reason}")
            }
            OptError::InvalidCoefficient { name, value, reason } => {
                write!(f, "Invalid {name} coefficient {value}: {reason}")
            }

            // ---- Starting point ----
            OptError::EmptyStart => {
                write!(f, "Starting point must have at least one coordinate")
            }
            OptError::InvalidStart { index, value, reason } => {
                write!(f, "Invalid starting coordinate at index {index}: {value}: {reason}")
            }

            // ---- Cost function ----
            OptError::NonFiniteCost { value } => {
                write!(f, "Non-finite cost value: {value}")
            }

            // ---- Optimizer outcome ----
            OptError::InvalidOptimum { index, value, reason } => {
                write!(f, "Invalid optimum coordinate at index {index}: {value}: {reason}")
            }
            OptError::MissingOptimum => {
                write!(f, "Missing optimum: solver returned no best point")
            }

            // ---- Argmin ----
            OptError::Solver { kind, text } => write!(f, "{}: {text}", kind.label()),
        }
    }
}

impl From<Error> for OptError {
    fn from(original_err: Error) -> Self {
        // Errors raised by our own cost adapter travel through argmin boxed;
        // unwrap those first so callers see the original variant.
        let original_err = match original_err.downcast::<OptError>() {
            Ok(opt_err) => return opt_err,
            Err(err) => err,
        };
        let (kind, text) = match original_err.downcast::<ArgminError>() {
            Ok(ArgminError::InvalidParameter { text }) => (SolverErrorKind::InvalidParameter, text),
            Ok(ArgminError::NotImplemented { text }) => (SolverErrorKind::NotImplemented, text),
            Ok(ArgminError::NotInitialized { text }) => (SolverErrorKind::NotInitialized, text),
            Ok(ArgminError::ConditionViolated { text }) => {
                (SolverErrorKind::ConditionViolated, text)
            }
            Ok(ArgminError::CheckpointNotFound { text }) => {
                (SolverErrorKind::CheckpointNotFound, text)
            }
            Ok(ArgminError::PotentialBug { text }) => (SolverErrorKind::PotentialBug, text),
            Ok(ArgminError::ImpossibleError { text }) => (SolverErrorKind::Impossible, text),
            Ok(other) => (SolverErrorKind::Other, other.to_string()),
            Err(err) => (SolverErrorKind::Other, err.to_string()),
        };
        OptError::Solver { kind, text }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // An `OptError` boxed into an argmin `Error` comes back out unchanged.
    fn opt_error_survives_argmin_round_trip() {
        let boxed: Error = OptError::NonFiniteCost { value: f64::INFINITY }.into();
        let back = OptError::from(boxed);
        assert_eq!(back, OptError::NonFiniteCost { value: f64::INFINITY });
    }

    #[test]
    // Purpose
    // -------
    // Argmin's own error kinds keep their kind tag.
    fn argmin_errors_map_to_wrappers() {
        let boxed: Error = ArgminError::InvalidParameter { text: "rho".to_string() }.into();
        assert_eq!(
            OptError::from(boxed),
            OptError::Solver { kind: SolverErrorKind::InvalidParameter, text: "rho".to_string() }
        );
    }

    #[test]
    // Purpose
    // -------
    // Messages carry their payload.
    fn display_embeds_payload() {
        let err = OptError::InvalidCoefficient { name: "expansion", value: 0.5, reason: "x" };
        let msg = err.to_string();
        assert!(msg.contains("expansion"));
        assert!(msg.contains("0.5"));
    }
}
