//! Termination criteria shared by the optimizers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why an optimizer stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndCriteriaType {
    /// The optimizer has not stopped.
    None,
    /// The iteration budget was exhausted.
    MaxIterations,
    /// The iterates stopped moving.
    StationaryPoint,
    /// The objective stopped changing.
    StationaryFunctionValue,
    /// A non-negative objective fell below the function tolerance.
    StationaryFunctionAccuracy,
    /// The gradient vanished.
    ZeroGradientNorm,
    /// The optimizer stopped for a reason it could not classify.
    Unknown,
}

impl EndCriteriaType {
    /// Returns true if the optimizer stopped because it converged.
    #[must_use]
    pub fn is_success(self) -> bool {
        matches!(
            self,
            Self::StationaryPoint
                | Self::StationaryFunctionValue
                | Self::StationaryFunctionAccuracy
                | Self::ZeroGradientNorm
        )
    }
}

impl fmt::Display for EndCriteriaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "None",
            Self::MaxIterations => "MaxIterations",
            Self::StationaryPoint => "StationaryPoint",
            Self::StationaryFunctionValue => "StationaryFunctionValue",
            Self::StationaryFunctionAccuracy => "StationaryFunctionAccuracy",
            Self::ZeroGradientNorm => "ZeroGradientNorm",
            Self::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

/// Termination criteria for an optimization run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EndCriteria {
    /// Maximum number of iterations.
    pub max_iterations: usize,
    /// Number of consecutive stationary iterations tolerated.
    pub max_stationary_state_iterations: usize,
    /// Tolerance on the movement of the iterates.
    pub root_epsilon: f64,
    /// Tolerance on the objective.
    pub function_epsilon: f64,
    /// Tolerance on the gradient norm.
    pub gradient_norm_epsilon: f64,
    /// Whether the objective is known to be non-negative.
    ///
    /// When set, reaching an objective below `function_epsilon` stops the
    /// run: no smaller value can exist.
    pub positive_optimization: bool,
}

impl Default for EndCriteria {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            max_stationary_state_iterations: 100,
            root_epsilon: 1e-8,
            function_epsilon: 1e-8,
            gradient_norm_epsilon: 1e-8,
            positive_optimization: false,
        }
    }
}

impl EndCriteria {
    /// Creates end criteria in general (signed objective) mode.
    #[must_use]
    pub fn new(
        max_iterations: usize,
        max_stationary_state_iterations: usize,
        root_epsilon: f64,
        function_epsilon: f64,
        gradient_norm_epsilon: f64,
    ) -> Self {
        Self {
            max_iterations,
            max_stationary_state_iterations,
            root_epsilon,
            function_epsilon,
            gradient_norm_epsilon,
            positive_optimization: false,
        }
    }

    /// Sets the maximum number of iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Switches to non-negative objective mode.
    pub fn set_positive_optimization(&mut self) {
        self.positive_optimization = true;
    }

    /// Stops once `iteration` reaches the budget.
    #[must_use]
    pub fn check_max_iterations(&self, iteration: usize) -> Option<EndCriteriaType> {
        (iteration >= self.max_iterations).then_some(EndCriteriaType::MaxIterations)
    }

    /// Stops once the iterates moved less than `root_epsilon` for more than
    /// `max_stationary_state_iterations` consecutive iterations.
    pub fn check_stationary_point(
        &self,
        x_old: &[f64],
        x_new: &[f64],
        stationary_iterations: &mut usize,
    ) -> Option<EndCriteriaType> {
        let distance = x_old
            .iter()
            .zip(x_new)
            .map(|(a, b)| (b - a) * (b - a))
            .sum::<f64>()
            .sqrt();
        self.check_stationary(
            distance < self.root_epsilon,
            stationary_iterations,
            EndCriteriaType::StationaryPoint,
        )
    }

    /// Stops once the objective changed less than `function_epsilon` for
    /// more than `max_stationary_state_iterations` consecutive iterations.
    pub fn check_stationary_function_value(
        &self,
        f_old: f64,
        f_new: f64,
        stationary_iterations: &mut usize,
    ) -> Option<EndCriteriaType> {
        self.check_stationary(
            (f_new - f_old).abs() < self.function_epsilon,
            stationary_iterations,
            EndCriteriaType::StationaryFunctionValue,
        )
    }

    /// In positive mode, stops once the objective is below `function_epsilon`.
    #[must_use]
    pub fn check_stationary_function_accuracy(&self, f: f64) -> Option<EndCriteriaType> {
        (self.positive_optimization && f < self.function_epsilon)
            .then_some(EndCriteriaType::StationaryFunctionAccuracy)
    }

    /// Stops once the gradient norm is below `gradient_norm_epsilon`.
    #[must_use]
    pub fn check_zero_gradient_norm(&self, gradient_norm: f64) -> Option<EndCriteriaType> {
        (gradient_norm < self.gradient_norm_epsilon).then_some(EndCriteriaType::ZeroGradientNorm)
    }

    fn check_stationary(
        &self,
        stationary: bool,
        stationary_iterations: &mut usize,
        kind: EndCriteriaType,
    ) -> Option<EndCriteriaType> {
        if !stationary {
            *stationary_iterations = 0;
            return None;
        }
        *stationary_iterations += 1;
        (*stationary_iterations > self.max_stationary_state_iterations).then_some(kind)
    }
}
