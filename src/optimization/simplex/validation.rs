//! Validation helpers for simplex optimization.
//!
//! - **Option checks**: [`verify_tolerance`], [`verify_max_iter`],
//!   [`verify_initial_step`], [`verify_coefficients`] reject settings argmin
//!   would refuse later, with our own error variants.
//! - **Starting point**: [`validate_start`] requires a non-empty, finite
//!   vector.
//! - **Outcome**: [`validate_optimum`] and [`validate_value`] check what the
//!   solver hands back.
use crate::optimization::{
    errors::{OptError, OptResult},
    simplex::types::Theta,
};

/// Validate the simplex spread tolerance: finite and strictly positive.
pub fn verify_tolerance(tol: f64) -> OptResult<()> {
    if !tol.is_finite() {
        return Err(OptError::InvalidTolerance { tol, reason: "Tolerance must be finite." });
    }
    if tol <= 0.0 {
        return Err(OptError::InvalidTolerance { tol, reason: "Tolerance must be positive." });
    }
    Ok(())
}

/// Validate the iteration budget: strictly positive.
pub fn verify_max_iter(max_iter: usize) -> OptResult<()> {
    if max_iter == 0 {
        return Err(OptError::InvalidMaxIter {
            max_iter,
            reason: "Maximum iterations must be greater than zero.",
        });
    }
    Ok(())
}

/// Validate the initial simplex step: finite and strictly positive.
pub fn verify_initial_step(step: f64) -> OptResult<()> {
    if !step.is_finite() || step <= 0.0 {
        return Err(OptError::InvalidInitialStep {
            step,
            reason: "Initial step must be finite and positive.",
        });
    }
    Ok(())
}

/// Validate the four simplex coefficients.
///
/// # Rules
/// - reflection `α > 0`
/// - expansion `β > 1`
/// - contraction `0 < γ <= 0.5`
/// - shrink `0 < δ <= 1`
///
/// All must be finite.
pub fn verify_coefficients(
    reflection: f64, expansion: f64, contraction: f64, shrink: f64,
) -> OptResult<()> {
    let checks: [(&'static str, f64, bool, &'static str); 4] = [
        ("reflection", reflection, reflection > 0.0, "Reflection must be positive."),
        ("expansion", expansion, expansion > 1.0, "Expansion must be greater than one."),
        (
            "contraction",
            contraction,
            contraction > 0.0 && contraction <= 0.5,
            "Contraction must lie in (0, 0.5].",
        ),
        ("shrink", shrink, shrink > 0.0 && shrink <= 1.0, "Shrink must lie in (0, 1]."),
    ];
    for (name, value, ok, reason) in checks {
        if !value.is_finite() || !ok {
            return Err(OptError::InvalidCoefficient { name, value, reason });
        }
    }
    Ok(())
}

/// Validate a starting point: at least one coordinate, all finite.
pub fn validate_start(x0: &Theta) -> OptResult<()> {
    if x0.is_empty() {
        return Err(OptError::EmptyStart);
    }
    for (index, &value) in x0.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidStart {
                index,
                value,
                reason: "Starting coordinates must be finite.",
            });
        }
    }
    Ok(())
}

/// Validate and unwrap the best point reported by the solver.
///
/// # Errors
/// - [`OptError::MissingOptimum`] if no point was provided.
/// - [`OptError::InvalidOptimum`] if any coordinate is non-finite.
pub fn validate_optimum(optimum: Option<Theta>) -> OptResult<Theta> {
    let optimum = optimum.ok_or(OptError::MissingOptimum)?;
    for (index, &value) in optimum.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidOptimum {
                index,
                value,
                reason: "Optimum coordinates must be finite.",
            });
        }
    }
    Ok(optimum)
}

/// Validate that an objective value is finite.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // The classical coefficients pass; each out-of-range value is named.
    fn coefficients_are_checked_individually() {
        assert!(verify_coefficients(1.0, 2.0, 0.5, 0.5).is_ok());
        for (args, expected) in [
            ((0.0, 2.0, 0.5, 0.5), "reflection"),
            ((1.0, 1.0, 0.5, 0.5), "expansion"),
            ((1.0, 2.0, 0.7, 0.5), "contraction"),
            ((1.0, 2.0, 0.5, f64::NAN), "shrink"),
        ] {
            match verify_coefficients(args.0, args.1, args.2, args.3) {
                Err(OptError::InvalidCoefficient { name, .. }) => assert_eq!(name, expected),
                other => panic!("expected InvalidCoefficient({expected}), got {other:?}"),
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Empty or non-finite starts are rejected with the offending index.
    fn start_must_be_non_empty_and_finite() {
        assert_eq!(validate_start(&Theta::zeros(0)), Err(OptError::EmptyStart));
        match validate_start(&array![0.1, f64::INFINITY]) {
            Err(OptError::InvalidStart { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected InvalidStart, got {other:?}"),
        }
        assert!(validate_start(&array![0.1, 0.2]).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Tolerance, budget, and step checks reject zero and non-finite values.
    fn scalar_settings_reject_degenerate_values() {
        assert!(verify_tolerance(0.0).is_err());
        assert!(verify_tolerance(f64::NAN).is_err());
        assert!(verify_max_iter(0).is_err());
        assert!(verify_initial_step(-0.1).is_err());
        assert!(verify_tolerance(1e-8).is_ok());
        assert!(verify_max_iter(10).is_ok());
        assert!(verify_initial_step(0.05).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // A missing optimum and a non-finite optimum are distinct errors.
    fn optimum_checks() {
        assert_eq!(validate_optimum(None), Err(OptError::MissingOptimum));
        assert!(matches!(
            validate_optimum(Some(array![f64::NAN])),
            Err(OptError::InvalidOptimum { index: 0, .. })
        ));
        assert_eq!(validate_optimum(Some(array![1.0])).unwrap(), array![1.0]);
    }
}
