//! Assessment configuration.
//!
//! One serde-deserializable record gathers every knob of the pipeline. It is
//! usually read from TOML:
//!
//! ```toml
//! natural_mortality = { constant = 0.4 }
//! lambda = "auto"
//!
//! [harvest_rule]
//! closure_ssb = 2000.0
//! limit_ssb = 6000.0
//! beta = 0.8
//!
//! [retrospective]
//! max_peel = 5
//! ```
//!
//! Every section except `harvest_rule` has defaults.
use crate::{
    errors::{AssessmentError, AssessmentResult},
    projection::{HarvestRule, ProjectionOptions},
    retrospective::RetrospectiveOptions,
    tuning::{TuningOptions, objective::validate_lambda},
    vpa::NaturalMortality,
};
use serde::{Deserialize, Serialize};

/// Recent years (terminal year included) averaged for current F.
pub const DEFAULT_CURRENT_F_YEARS: usize = 3;

/// How the ridge weight is chosen.
///
/// Serialized as `lambda = "auto"` or `lambda = { fixed = 0.3 }`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LambdaSelection {
    /// Use this λ as given.
    Fixed(f64),
    /// Pick the λ of the retrospective grid with the smallest Mohn's ρ.
    #[default]
    Auto,
}

/// Pipeline configuration.
///
/// - `lambda` overrides `tuning.lambda`.
/// - `run_retrospective` only matters for a fixed λ; automatic selection
///   always runs the retrospective analysis.
/// - `current_f_years`: years, ending at the terminal year, averaged for
///   the F the harvest rule scales.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentConfig {
    #[serde(default)]
    pub natural_mortality: NaturalMortality,
    #[serde(default)]
    pub lambda: LambdaSelection,
    #[serde(default)]
    pub tuning: TuningOptions,
    #[serde(default)]
    pub retrospective: RetrospectiveOptions,
    #[serde(default = "default_run_retrospective")]
    pub run_retrospective: bool,
    #[serde(default)]
    pub projection: ProjectionOptions,
    pub harvest_rule: HarvestRule,
    #[serde(default = "default_current_f_years")]
    pub current_f_years: usize,
}

fn default_run_retrospective() -> bool {
    true
}

fn default_current_f_years() -> usize {
    DEFAULT_CURRENT_F_YEARS
}

impl AssessmentConfig {
    /// Defaults everywhere except the harvest rule.
    ///
    /// # Errors
    /// - Invalid harvest rule.
    pub fn new(harvest_rule: HarvestRule) -> AssessmentResult<Self> {
        let config = Self {
            natural_mortality: NaturalMortality::default(),
            lambda: LambdaSelection::default(),
            tuning: TuningOptions::default(),
            retrospective: RetrospectiveOptions::default(),
            run_retrospective: default_run_retrospective(),
            projection: ProjectionOptions::default(),
            harvest_rule,
            current_f_years: DEFAULT_CURRENT_F_YEARS,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a TOML document.
    ///
    /// # Errors
    /// - [`AssessmentError::ConfigParse`] for malformed TOML or missing
    ///   required fields.
    /// - Validation errors of any section.
    pub fn from_toml_str(text: &str) -> AssessmentResult<Self> {
        let config: AssessmentConfig = toml::from_str(text)
            .map_err(|err| AssessmentError::ConfigParse { text: err.to_string() })?;
        config.validate()?;
        Ok(config)
    }

    /// Render the configuration as TOML.
    ///
    /// # Errors
    /// - [`AssessmentError::ConfigParse`] if serialization fails.
    pub fn to_toml_string(&self) -> AssessmentResult<String> {
        toml::to_string_pretty(self)
            .map_err(|err| AssessmentError::ConfigParse { text: err.to_string() })
    }

    pub fn with_lambda(mut self, lambda: LambdaSelection) -> AssessmentResult<Self> {
        self.lambda = lambda;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> AssessmentResult<()> {
        self.natural_mortality.validate()?;
        if let LambdaSelection::Fixed(lambda) = self.lambda {
            validate_lambda(lambda)?;
        }
        self.tuning.validate()?;
        self.retrospective.validate()?;
        self.projection.validate()?;
        self.harvest_rule.validate()?;
        if self.current_f_years == 0 {
            return Err(AssessmentError::InvalidConfig {
                field: "current_f_years",
                value: 0.0,
                reason: "must average at least one year",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const FULL: &str = r#"
natural_mortality = { at_age = [0.5, 0.4, 0.4, 0.3, 0.3] }
lambda = { fixed = 0.45 }
run_retrospective = false
current_f_years = 2

[tuning]
recent_years = 4
tuning_window = [2003, 2010]

[tuning.simplex]
max_iterations = 800

[retrospective]
max_peel = 3
lambda_grid = [0.0, 0.5]

[projection]
horizon = 3

[harvest_rule]
closure_ssb = 1000.0
limit_ssb = 4000.0
target_multiplier = 0.9
"#;

    #[test]
    // Purpose
    // -------
    // Every section is read from TOML; omitted fields keep their defaults.
    //
    // Given
    // -----
    // - A document setting a subset of fields in each section.
    //
    // Expect
    // ------
    // - Set fields carry the given values; β, bio_years, and min_years keep
    //   their defaults.
    fn parses_full_document() {
        // Act
        let config = AssessmentConfig::from_toml_str(FULL).unwrap();

        // Assert
        assert_eq!(
            config.natural_mortality,
            NaturalMortality::AtAge(vec![0.5, 0.4, 0.4, 0.3, 0.3])
        );
        assert_eq!(config.lambda, LambdaSelection::Fixed(0.45));
        assert!(!config.run_retrospective);
        assert_eq!(config.current_f_years, 2);
        assert_eq!(config.tuning.recent_years, 4);
        assert_eq!(config.tuning.tuning_window, Some((2003, 2010)));
        assert_eq!(config.tuning.simplex.max_iterations, 800);
        assert_eq!(config.retrospective.max_peel, 3);
        assert_eq!(config.retrospective.min_years, RetrospectiveOptions::default().min_years);
        assert_eq!(config.retrospective.lambda_grid, vec![0.0, 0.5]);
        assert_eq!(config.projection.horizon, 3);
        assert_eq!(config.projection.bio_years, ProjectionOptions::default().bio_years);
        assert_relative_eq!(config.harvest_rule.target_multiplier, 0.9);
        assert_relative_eq!(config.harvest_rule.beta, 0.8);
    }

    #[test]
    // Purpose
    // -------
    // A minimal document only needs the harvest rule.
    fn minimal_document_uses_defaults() {
        let text = "[harvest_rule]\nclosure_ssb = 0.0\nlimit_ssb = 500.0\n";

        let config = AssessmentConfig::from_toml_str(text).unwrap();

        assert_eq!(config.lambda, LambdaSelection::Auto);
        assert_eq!(config.natural_mortality, NaturalMortality::Constant(0.4));
        assert!(config.run_retrospective);
        assert_eq!(config.current_f_years, DEFAULT_CURRENT_F_YEARS);
        assert_eq!(config.tuning, TuningOptions::default());
    }

    #[test]
    // Purpose
    // -------
    // Malformed documents are parse errors; well-formed but invalid values
    // are configuration errors.
    fn rejects_bad_documents() {
        let missing_rule = AssessmentConfig::from_toml_str("lambda = \"auto\"\n");
        assert!(matches!(missing_rule, Err(AssessmentError::ConfigParse { .. })));

        let bad_lambda = AssessmentConfig::from_toml_str(
            "lambda = { fixed = 1.5 }\n[harvest_rule]\nclosure_ssb = 0.0\nlimit_ssb = 1.0\n",
        );
        assert!(matches!(bad_lambda, Err(AssessmentError::InvalidConfig { .. })));

        let inverted_rule = AssessmentConfig::from_toml_str(
            "[harvest_rule]\nclosure_ssb = 10.0\nlimit_ssb = 1.0\n",
        );
        assert!(matches!(
            inverted_rule,
            Err(AssessmentError::InvalidConfig { field: "limit_ssb", .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // A configuration written to TOML reads back unchanged.
    fn toml_output_reads_back() {
        let config = AssessmentConfig::from_toml_str(FULL).unwrap();

        let text = config.to_toml_string().unwrap();

        assert_eq!(AssessmentConfig::from_toml_str(&text).unwrap(), config);
    }
}
