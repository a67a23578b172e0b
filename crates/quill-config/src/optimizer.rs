//! Optimizer and termination settings.

use serde::{Deserialize, Serialize};

use quill_math::optimization::{EndCriteria, OptimizationMethod, Simplex, SteepestDescent};

use crate::error::{Validate, ValidationError};

// =============================================================================
// END CRITERIA
// =============================================================================

/// Termination settings of an optimization run.
///
/// Every field is optional in serialized form and falls back to the same
/// value as [`EndCriteria::default`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EndCriteriaConfig {
    /// Maximum number of iterations.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Number of consecutive stationary iterations tolerated.
    #[serde(default = "default_max_stationary_state_iterations")]
    pub max_stationary_state_iterations: usize,

    /// Tolerance on the movement of the iterates.
    #[serde(default = "default_epsilon")]
    pub root_epsilon: f64,

    /// Tolerance on the objective.
    #[serde(default = "default_epsilon")]
    pub function_epsilon: f64,

    /// Tolerance on the gradient norm.
    #[serde(default = "default_epsilon")]
    pub gradient_norm_epsilon: f64,
}

fn default_max_iterations() -> usize {
    1000
}

fn default_max_stationary_state_iterations() -> usize {
    100
}

fn default_epsilon() -> f64 {
    1e-8
}

impl Default for EndCriteriaConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            max_stationary_state_iterations: default_max_stationary_state_iterations(),
            root_epsilon: default_epsilon(),
            function_epsilon: default_epsilon(),
            gradient_norm_epsilon: default_epsilon(),
        }
    }
}

impl EndCriteriaConfig {
    /// Sets the iteration budget.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the stationary-state budget.
    #[must_use]
    pub fn with_max_stationary_state_iterations(mut self, iterations: usize) -> Self {
        self.max_stationary_state_iterations = iterations;
        self
    }

    /// Sets the same tolerance on iterates, objective and gradient.
    #[must_use]
    pub fn with_tolerance(mut self, epsilon: f64) -> Self {
        self.root_epsilon = epsilon;
        self.function_epsilon = epsilon;
        self.gradient_norm_epsilon = epsilon;
        self
    }

    /// Builds the end criteria, in general (signed objective) mode.
    pub fn to_end_criteria(&self) -> EndCriteria {
        EndCriteria::new(
            self.max_iterations,
            self.max_stationary_state_iterations,
            self.root_epsilon,
            self.function_epsilon,
            self.gradient_norm_epsilon,
        )
    }
}

impl From<EndCriteriaConfig> for EndCriteria {
    fn from(config: EndCriteriaConfig) -> Self {
        config.to_end_criteria()
    }
}

impl From<EndCriteria> for EndCriteriaConfig {
    fn from(criteria: EndCriteria) -> Self {
        Self {
            max_iterations: criteria.max_iterations,
            max_stationary_state_iterations: criteria.max_stationary_state_iterations,
            root_epsilon: criteria.root_epsilon,
            function_epsilon: criteria.function_epsilon,
            gradient_norm_epsilon: criteria.gradient_norm_epsilon,
        }
    }
}

impl Validate for EndCriteriaConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.max_iterations == 0 {
            errors.push(ValidationError::with_rule(
                "max_iterations",
                "Iteration budget must be at least 1",
                "min_value",
            ));
        }

        if self.max_stationary_state_iterations == 0 {
            errors.push(ValidationError::with_rule(
                "max_stationary_state_iterations",
                "Stationary-state budget must be at least 1",
                "min_value",
            ));
        }

        let tolerances = [
            ("root_epsilon", self.root_epsilon),
            ("function_epsilon", self.function_epsilon),
            ("gradient_norm_epsilon", self.gradient_norm_epsilon),
        ];
        for (field, value) in tolerances {
            if !(value.is_finite() && value > 0.0) {
                errors.push(ValidationError::with_rule(
                    field,
                    format!("Tolerance must be positive and finite, got {value}"),
                    "positive",
                ));
            }
        }

        errors
    }
}

// =============================================================================
// OPTIMIZATION METHOD
// =============================================================================

/// Choice of multidimensional minimizer.
///
/// Serialized with a `method` tag:
///
/// ```toml
/// [optimizer]
/// method = "simplex"
/// lambda = 0.05
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum OptimizerConfig {
    /// Nelder-Mead downhill simplex.
    Simplex {
        /// Characteristic length of the initial simplex.
        #[serde(default = "default_lambda")]
        lambda: f64,
    },
    /// Gradient descent with backtracking line search.
    SteepestDescent,
}

fn default_lambda() -> f64 {
    0.1
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self::Simplex {
            lambda: default_lambda(),
        }
    }
}

impl OptimizerConfig {
    /// Simplex with the given initial size.
    pub fn simplex(lambda: f64) -> Self {
        Self::Simplex { lambda }
    }

    /// Name of the configured method.
    pub fn method_name(&self) -> &'static str {
        match self {
            Self::Simplex { .. } => "Simplex",
            Self::SteepestDescent => "SteepestDescent",
        }
    }

    /// Instantiates the method with the given termination settings.
    pub fn build(&self, end_criteria: EndCriteria) -> Box<dyn OptimizationMethod> {
        match *self {
            Self::Simplex { lambda } => Box::new(Simplex::new(lambda, end_criteria)),
            Self::SteepestDescent => Box::new(SteepestDescent::new(end_criteria)),
        }
    }
}

impl Validate for OptimizerConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if let Self::Simplex { lambda } = *self {
            if !(lambda.is_finite() && lambda > 0.0) {
                errors.push(ValidationError::with_rule(
                    "lambda",
                    format!("Simplex size must be positive and finite, got {lambda}"),
                    "positive",
                ));
            }
        }

        errors
    }
}
