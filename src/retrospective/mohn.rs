//! Mohn's ρ: retrospective bias of peeled estimates.
//!
//! For each peel `p ≥ 1` ending in year `Y_p`, the relative difference
//! `(peeled(Y_p) − reference(Y_p)) / reference(Y_p)` is taken against the
//! full-data (peel 0) run, for SSB, recruitment, and mean F. Each quantity's
//! ρ is the mean over peels; the overall score is the mean of the three
//! absolute values.
use crate::{
    errors::{AssessmentError, AssessmentResult},
    retrospective::peels::RetrospectiveResult,
};
use log::warn;
use serde::{Deserialize, Serialize};

/// Retrospective bias summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MohnsRho {
    pub spawning_biomass: f64,
    pub recruitment: f64,
    pub mean_f: f64,
    pub overall: f64,
    /// Number of peels (excluding the reference) that contributed.
    pub peels: usize,
}

/// Compute Mohn's ρ from a set of retrospective results.
///
/// # Errors
/// - [`AssessmentError::InsufficientData`] with fewer than two results,
///   without a peel-0 reference, or when a quantity has no usable
///   reference value in any peel's end year.
pub fn calculate_mohns_rho(results: &[RetrospectiveResult]) -> AssessmentResult<MohnsRho> {
    if results.len() < 2 {
        return Err(AssessmentError::InsufficientData {
            what: "retrospective results",
            required: 2,
            found: results.len(),
        });
    }
    let reference = results.iter().find(|r| r.peel == 0).ok_or(
        AssessmentError::InsufficientData { what: "reference run (peel 0)", required: 1, found: 0 },
    )?;

    let mut ssb = Vec::new();
    let mut rec = Vec::new();
    let mut f = Vec::new();
    for peeled in results.iter().filter(|r| r.peel > 0) {
        let year = peeled.end_year;
        let ssb_pair = (peeled.spawning_biomass_at(year), reference.spawning_biomass_at(year));
        let rec_pair = (peeled.recruitment_at(year), reference.recruitment_at(year));
        let f_pair = (peeled.mean_f_at(year), reference.mean_f_at(year));
        push_relative(&mut ssb, "SSB", year, ssb_pair);
        push_relative(&mut rec, "recruitment", year, rec_pair);
        push_relative(&mut f, "mean F", year, f_pair);
    }

    let spawning_biomass = mean_or_insufficient(&ssb)?;
    let recruitment = mean_or_insufficient(&rec)?;
    let mean_f = mean_or_insufficient(&f)?;
    Ok(MohnsRho {
        spawning_biomass,
        recruitment,
        mean_f,
        overall: (spawning_biomass.abs() + recruitment.abs() + mean_f.abs()) / 3.0,
        peels: results.iter().filter(|r| r.peel > 0).count(),
    })
}

fn push_relative(
    into: &mut Vec<f64>, quantity: &str, year: i32, (peeled, reference): (Option<f64>, Option<f64>),
) {
    match (peeled, reference) {
        (Some(p), Some(r)) if r.is_finite() && r != 0.0 && p.is_finite() => into.push((p - r) / r),
        _ => warn!("No usable {quantity} comparison in {year}; peel left out of Mohn's rho"),
    }
}

fn mean_or_insufficient(values: &[f64]) -> AssessmentResult<f64> {
    if values.is_empty() {
        return Err(AssessmentError::InsufficientData {
            what: "peels with a usable relative difference",
            required: 1,
            found: 0,
        });
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{AgeYearMatrix, Unit};
    use approx::assert_relative_eq;
    use ndarray::Array1;

    fn result(
        peel: usize, end_year: i32, ssb_end: f64, rec_end: f64, f_end: f64,
    ) -> RetrospectiveResult {
        let years = (end_year - 2000 + 1) as usize;
        let series = |base: f64, last: f64| {
            let mut s = Array1::from_elem(years, base);
            s[years - 1] = last;
            s
        };
        RetrospectiveResult {
            peel,
            start_year: 2000,
            end_year,
            spawning_biomass: series(100.0, ssb_end),
            recruitment: series(50.0, rec_end),
            mean_f: series(0.5, f_end),
            f_at_age: AgeYearMatrix::from_fn(Unit::Dimensionless, (2000, end_year), (0, 2), |_, _| {
                0.5
            })
            .unwrap(),
        }
    }

    #[test]
    // Purpose
    // -------
    // Relative differences are taken at each peel's end year and averaged.
    //
    // Given
    // -----
    // - Reference constant at SSB 100, recruitment 50, mean F 0.5.
    // - Peel 1 ends 2008 at (110, 45, 0.55); peel 2 ends 2007 at (120, 50, 0.5).
    //
    // Expect
    // ------
    // - ρ_SSB = 0.15, ρ_R = −0.05, ρ_F = 0.05, overall = 0.25 / 3.
    fn averages_relative_differences() {
        // Arrange
        let results = vec![
            result(1, 2008, 110.0, 45.0, 0.55),
            result(0, 2009, 100.0, 50.0, 0.5),
            result(2, 2007, 120.0, 50.0, 0.5),
        ];

        // Act
        let rho = calculate_mohns_rho(&results).unwrap();

        // Assert
        assert_relative_eq!(rho.spawning_biomass, 0.15, epsilon = 1e-12);
        assert_relative_eq!(rho.recruitment, -0.05, epsilon = 1e-12);
        assert_relative_eq!(rho.mean_f, 0.05, epsilon = 1e-12);
        assert_relative_eq!(rho.overall, 0.25 / 3.0, epsilon = 1e-12);
        assert_eq!(rho.peels, 2);
    }

    #[test]
    // Purpose
    // -------
    // Fewer than two results, or no peel-0 reference, is insufficient data.
    fn requires_two_results_and_a_reference() {
        let single = calculate_mohns_rho(&[result(0, 2009, 1.0, 1.0, 1.0)]);
        assert!(matches!(
            single,
            Err(AssessmentError::InsufficientData { required: 2, found: 1, .. })
        ));
        assert!(calculate_mohns_rho(&[]).unwrap_err().is_insufficient_data());

        let no_reference = calculate_mohns_rho(&[
            result(1, 2008, 1.0, 1.0, 1.0),
            result(2, 2007, 1.0, 1.0, 1.0),
        ]);
        assert!(matches!(
            no_reference,
            Err(AssessmentError::InsufficientData { what: "reference run (peel 0)", .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Identical peels have zero bias.
    fn identical_runs_have_zero_rho() {
        let results = vec![result(0, 2009, 100.0, 50.0, 0.5), result(1, 2008, 100.0, 50.0, 0.5)];
        let rho = calculate_mohns_rho(&results).unwrap();
        assert_eq!(rho.overall, 0.0);
    }
}
