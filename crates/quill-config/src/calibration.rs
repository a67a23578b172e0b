//! Calibration run settings.

use log::debug;
use serde::{Deserialize, Serialize};

use quill_math::optimization::{EndCriteria, OptimizationMethod};

use crate::error::{ConfigResult, Validate, ValidationError};
use crate::optimizer::{EndCriteriaConfig, OptimizerConfig};
use crate::solver::SolverSettings;

/// Complete settings of a calibration run.
///
/// # Example
///
/// ```rust
/// use quill_config::{CalibrationConfig, Validate};
///
/// let config = CalibrationConfig::from_toml_str(
///     r#"
///     name = "VASICEK.BONDS"
///
///     [optimizer]
///     method = "simplex"
///     lambda = 0.005
///
///     [end_criteria]
///     max_iterations = 5000
///     "#,
/// )
/// .unwrap();
///
/// assert!(config.is_valid());
/// let method = config.build_method();
/// assert_eq!(method.name(), "Simplex");
/// assert_eq!(method.end_criteria().max_iterations, 5000);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Configuration name.
    pub name: String,

    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Minimizer.
    #[serde(default)]
    pub optimizer: OptimizerConfig,

    /// Termination settings of the minimizer.
    #[serde(default)]
    pub end_criteria: EndCriteriaConfig,

    /// Finite-difference step used for gradients of the calibration objective.
    #[serde(default = "default_finite_difference_epsilon")]
    pub finite_difference_epsilon: f64,

    /// Root finder used by one-dimensional sub-problems.
    #[serde(default)]
    pub solver: SolverSettings,

    /// Whether this configuration is read-only.
    #[serde(default)]
    pub read_only: bool,
}

fn default_finite_difference_epsilon() -> f64 {
    1e-6
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self::new("DEFAULT")
    }
}

impl CalibrationConfig {
    /// Creates a configuration with default settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            optimizer: OptimizerConfig::default(),
            end_criteria: EndCriteriaConfig::default(),
            finite_difference_epsilon: default_finite_difference_epsilon(),
            solver: SolverSettings::default(),
            read_only: false,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the minimizer.
    #[must_use]
    pub fn with_optimizer(mut self, optimizer: OptimizerConfig) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// Sets the termination settings.
    #[must_use]
    pub fn with_end_criteria(mut self, end_criteria: EndCriteriaConfig) -> Self {
        self.end_criteria = end_criteria;
        self
    }

    /// Sets the finite-difference step.
    #[must_use]
    pub fn with_finite_difference_epsilon(mut self, epsilon: f64) -> Self {
        self.finite_difference_epsilon = epsilon;
        self
    }

    /// Sets the root finder.
    #[must_use]
    pub fn with_solver(mut self, solver: SolverSettings) -> Self {
        self.solver = solver;
        self
    }

    /// Marks the configuration as read-only.
    #[must_use]
    pub fn as_read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Nelder-Mead simplex with default settings.
    pub fn simplex() -> Self {
        Self::new("SIMPLEX")
            .with_description("Nelder-Mead simplex, default termination")
            .as_read_only()
    }

    /// Steepest descent with default settings.
    pub fn steepest_descent() -> Self {
        Self::new("STEEPEST_DESCENT")
            .with_description("Steepest descent with backtracking line search")
            .with_optimizer(OptimizerConfig::SteepestDescent)
            .as_read_only()
    }

    /// Small simplex with tight tolerances and a large iteration budget.
    pub fn high_precision() -> Self {
        Self::new("SIMPLEX.HIGH_PRECISION")
            .with_description("Nelder-Mead simplex, tight termination")
            .with_optimizer(OptimizerConfig::simplex(0.005))
            .with_end_criteria(
                EndCriteriaConfig::default()
                    .with_max_iterations(10_000)
                    .with_max_stationary_state_iterations(500)
                    .with_tolerance(1e-12),
            )
            .with_finite_difference_epsilon(1e-8)
            .with_solver(SolverSettings::default().with_accuracy(1e-14))
            .as_read_only()
    }

    /// Termination criteria of the minimizer.
    pub fn end_criteria(&self) -> EndCriteria {
        self.end_criteria.to_end_criteria()
    }

    /// Instantiates the configured minimizer.
    pub fn build_method(&self) -> Box<dyn OptimizationMethod> {
        self.optimizer.build(self.end_criteria())
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate_or_error()?;
        debug!("loaded calibration config {} from JSON", config.name);
        Ok(config)
    }

    /// Parses and validates a TOML configuration.
    pub fn from_toml_str(toml: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(toml)?;
        config.validate_or_error()?;
        debug!("loaded calibration config {} from TOML", config.name);
        Ok(config)
    }

    /// Serializes to pretty-printed JSON.
    pub fn to_json_string(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Serializes to TOML.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string(self)?)
    }
}

impl Validate for CalibrationConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(ValidationError::with_rule(
                "name",
                "Name must not be empty",
                "required",
            ));
        }

        if !(self.finite_difference_epsilon.is_finite() && self.finite_difference_epsilon > 0.0) {
            errors.push(ValidationError::with_rule(
                "finite_difference_epsilon",
                format!(
                    "Finite-difference step must be positive and finite, got {}",
                    self.finite_difference_epsilon
                ),
                "positive",
            ));
        }

        errors.extend(
            self.optimizer
                .validate()
                .into_iter()
                .map(|e| e.nested("optimizer")),
        );
        errors.extend(
            self.end_criteria
                .validate()
                .into_iter()
                .map(|e| e.nested("end_criteria")),
        );
        errors.extend(self.solver.validate().into_iter().map(|e| e.nested("solver")));

        errors
    }
}
