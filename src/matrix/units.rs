//! Physical units for age-year matrices.
//!
//! - [`Unit`] is a closed set of the units assessment tables are recorded in.
//! - [`Quantity`] groups units that can be converted into one another.
//!
//! Notes
//! -----
//! - Conversion factors are expressed relative to a base unit per quantity
//!   (single fish, grams, unitless ratio). A conversion between quantities is
//!   rejected with [`MatrixError::IncompatibleUnits`].
//! - Labels are parsed once, at construction time, via [`FromStr`]; an
//!   unrecognized label never survives into a matrix.
use crate::matrix::errors::{MatrixError, MatrixResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Physical dimension of a [`Unit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quantity {
    /// Numbers of individuals.
    Count,
    /// Mass.
    Mass,
    /// Unitless ratios (maturity proportions, mortality rates).
    Ratio,
}

/// Unit tag carried by every [`AgeYearMatrix`](crate::matrix::AgeYearMatrix).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    /// Individual fish.
    Fish,
    /// Thousands of fish (the usual catch-at-age unit).
    ThousandFish,
    /// Millions of fish.
    MillionFish,
    /// Grams (the usual weight-at-age unit).
    Gram,
    /// Kilograms.
    Kilogram,
    /// Metric tonnes.
    Tonne,
    /// Thousands of metric tonnes.
    ThousandTonne,
    /// Unitless values.
    Dimensionless,
}

impl Unit {
    /// Quantity class of the unit.
    pub fn quantity(self) -> Quantity {
        match self {
            Unit::Fish | Unit::ThousandFish | Unit::MillionFish => Quantity::Count,
            Unit::Gram | Unit::Kilogram | Unit::Tonne | Unit::ThousandTonne => Quantity::Mass,
            Unit::Dimensionless => Quantity::Ratio,
        }
    }

    /// Size of one unit expressed in the base unit of its quantity
    /// (fish for counts, grams for mass).
    pub fn base_factor(self) -> f64 {
        match self {
            Unit::Fish => 1.0,
            Unit::ThousandFish => 1e3,
            Unit::MillionFish => 1e6,
            Unit::Gram => 1.0,
            Unit::Kilogram => 1e3,
            Unit::Tonne => 1e6,
            Unit::ThousandTonne => 1e9,
            Unit::Dimensionless => 1.0,
        }
    }

    /// Multiplicative factor turning a value in `self` into a value in `to`.
    ///
    /// # Errors
    /// - [`MatrixError::IncompatibleUnits`] when the two units measure
    ///   different quantities.
    pub fn factor_to(self, to: Unit) -> MatrixResult<f64> {
        if self.quantity() != to.quantity() {
            return Err(MatrixError::IncompatibleUnits { from: self, to });
        }
        Ok(self.base_factor() / to.base_factor())
    }

    /// Convert a single value from `self` into `to`.
    pub fn convert(self, value: f64, to: Unit) -> MatrixResult<f64> {
        Ok(value * self.factor_to(to)?)
    }

    /// Canonical English label, also accepted by [`FromStr`].
    pub fn label(self) -> &'static str {
        match self {
            Unit::Fish => "fish",
            Unit::ThousandFish => "thousand fish",
            Unit::MillionFish => "million fish",
            Unit::Gram => "g",
            Unit::Kilogram => "kg",
            Unit::Tonne => "tonnes",
            Unit::ThousandTonne => "thousand tonnes",
            Unit::Dimensionless => "dimensionless",
        }
    }

    /// Render `value` (expressed in `self`) as a human-readable string.
    ///
    /// Large values are promoted to the next unit up: tonnes switch to
    /// thousand tonnes at `>= 1000`, thousands of fish switch to millions at
    /// `>= 1000`, grams switch to kilograms at `>= 1000`.
    pub fn format_value(self, value: f64) -> String {
        match self {
            Unit::Tonne if value.abs() >= 1000.0 => {
                format!("{:.1} thousand tonnes", value / 1000.0)
            }
            Unit::Tonne => format!("{value:.1} tonnes"),
            Unit::ThousandTonne => format!("{value:.1} thousand tonnes"),
            Unit::ThousandFish if value.abs() >= 1000.0 => {
                format!("{:.1} million fish", value / 1000.0)
            }
            Unit::ThousandFish => format!("{value:.1} thousand fish"),
            Unit::MillionFish => format!("{value:.1} million fish"),
            Unit::Fish => format!("{value:.0} fish"),
            Unit::Gram if value.abs() >= 1000.0 => format!("{:.2} kg", value / 1000.0),
            Unit::Gram => format!("{value:.1} g"),
            Unit::Kilogram => format!("{value:.2} kg"),
            Unit::Dimensionless => format!("{value:.3}"),
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Unit {
    type Err = MatrixError;

    /// Parse a unit label as it appears in assessment spreadsheets.
    ///
    /// Accepts the canonical English labels, common abbreviations, and the
    /// Japanese labels used by survey agencies ("尾", "千尾", "百万尾",
    /// "グラム", "キログラム", "トン", "千トン"). Matching is
    /// case-insensitive and ignores surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        let unit = match normalized.as_str() {
            "fish" | "individuals" | "尾" => Unit::Fish,
            "thousand fish" | "thousands" | "1000 fish" | "千尾" => Unit::ThousandFish,
            "million fish" | "millions" | "百万尾" => Unit::MillionFish,
            "g" | "gram" | "grams" | "グラム" => Unit::Gram,
            "kg" | "kilogram" | "kilograms" | "キログラム" => Unit::Kilogram,
            "t" | "tonne" | "tonnes" | "ton" | "tons" | "トン" => Unit::Tonne,
            "thousand tonnes" | "kt" | "千トン" => Unit::ThousandTonne,
            "dimensionless" | "ratio" | "proportion" | "-" | "" => Unit::Dimensionless,
            _ => return Err(MatrixError::UnknownUnit { label: s.to_string() }),
        };
        Ok(unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The conversion table between units of the same quantity.
    // - Rejection of cross-quantity conversions and unknown labels.
    // - Formatting thresholds for promoted units.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Thousands of fish convert to millions by a factor of 1/1000 and back.
    fn thousand_fish_to_million_fish_and_back() {
        let millions = Unit::ThousandFish.convert(2500.0, Unit::MillionFish).unwrap();
        assert_relative_eq!(millions, 2.5);
        let thousands = Unit::MillionFish.convert(millions, Unit::ThousandFish).unwrap();
        assert_relative_eq!(thousands, 2500.0);
    }

    #[test]
    // Purpose
    // -------
    // Tonnes and thousand tonnes, grams and tonnes share the mass table.
    fn mass_conversions_follow_table() {
        assert_relative_eq!(Unit::Tonne.convert(1500.0, Unit::ThousandTonne).unwrap(), 1.5);
        assert_relative_eq!(Unit::Gram.convert(2.0e6, Unit::Tonne).unwrap(), 2.0);
        assert_relative_eq!(Unit::Kilogram.convert(3.0, Unit::Gram).unwrap(), 3000.0);
    }

    #[test]
    // Purpose
    // -------
    // Converting a count into a mass is refused.
    fn cross_quantity_conversion_is_rejected() {
        let err = Unit::ThousandFish.convert(1.0, Unit::Tonne).unwrap_err();
        assert_eq!(
            err,
            MatrixError::IncompatibleUnits { from: Unit::ThousandFish, to: Unit::Tonne }
        );
    }

    #[test]
    // Purpose
    // -------
    // Spreadsheet labels (English and Japanese) parse to the same unit;
    // an unknown label fails at parse time.
    fn labels_parse_and_unknown_labels_fail() {
        assert_eq!("千尾".parse::<Unit>().unwrap(), Unit::ThousandFish);
        assert_eq!(" Tonnes ".parse::<Unit>().unwrap(), Unit::Tonne);
        assert_eq!("トン".parse::<Unit>().unwrap(), Unit::Tonne);
        assert_eq!("千トン".parse::<Unit>().unwrap(), Unit::ThousandTonne);
        match "bushels".parse::<Unit>() {
            Err(MatrixError::UnknownUnit { label }) => assert_eq!(label, "bushels"),
            other => panic!("expected UnknownUnit, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Formatting switches to the larger unit exactly at 1000.
    fn formatting_switches_at_one_thousand() {
        assert_eq!(Unit::Tonne.format_value(999.94), "999.9 tonnes");
        assert_eq!(Unit::Tonne.format_value(1000.0), "1.0 thousand tonnes");
        assert_eq!(Unit::Tonne.format_value(12345.0), "12.3 thousand tonnes");
        assert_eq!(Unit::ThousandFish.format_value(999.0), "999.0 thousand fish");
        assert_eq!(Unit::ThousandFish.format_value(2500.0), "2.5 million fish");
        assert_eq!(Unit::Gram.format_value(1250.0), "1.25 kg");
        assert_eq!(Unit::Dimensionless.format_value(0.5), "0.500");
    }
}
