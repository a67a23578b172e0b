//! Root-finder settings.

use std::fmt;

use serde::{Deserialize, Serialize};

use quill_math::solvers::{
    Bisection, Brent, FalsePosition, Newton, NewtonSafe, ObjectiveFunction, Ridder, Secant,
    Solver1D, SolverConfig, SolverResult, DEFAULT_MAX_EVALUATIONS,
};
use quill_math::MathResult;

use crate::error::{Validate, ValidationError};

/// One-dimensional root-finding algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverKind {
    /// Interval halving.
    Bisection,
    /// Brent's method.
    #[default]
    Brent,
    /// Regula falsi.
    FalsePosition,
    /// Newton-Raphson. Needs a derivative.
    Newton,
    /// Newton-Raphson with bisection fallback. Needs a derivative.
    NewtonSafe,
    /// Ridder's method.
    Ridder,
    /// Secant method.
    Secant,
}

impl SolverKind {
    /// All available algorithms.
    pub const ALL: [SolverKind; 7] = [
        Self::Bisection,
        Self::Brent,
        Self::FalsePosition,
        Self::Newton,
        Self::NewtonSafe,
        Self::Ridder,
        Self::Secant,
    ];

    /// Returns true if the algorithm needs the derivative of the objective.
    pub fn requires_derivative(self) -> bool {
        matches!(self, Self::Newton | Self::NewtonSafe)
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bisection => "Bisection",
            Self::Brent => "Brent",
            Self::FalsePosition => "FalsePosition",
            Self::Newton => "Newton",
            Self::NewtonSafe => "NewtonSafe",
            Self::Ridder => "Ridder",
            Self::Secant => "Secant",
        };
        f.write_str(name)
    }
}

/// Settings for a one-dimensional root finder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverSettings {
    /// Algorithm.
    #[serde(default)]
    pub kind: SolverKind,

    /// Target accuracy on the root.
    #[serde(default = "default_accuracy")]
    pub accuracy: f64,

    /// Function evaluation budget.
    #[serde(default = "default_max_evaluations")]
    pub max_evaluations: usize,

    /// Enforced lower bound on the abscissa.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower_bound: Option<f64>,

    /// Enforced upper bound on the abscissa.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper_bound: Option<f64>,
}

fn default_accuracy() -> f64 {
    1e-10
}

fn default_max_evaluations() -> usize {
    DEFAULT_MAX_EVALUATIONS
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            kind: SolverKind::default(),
            accuracy: default_accuracy(),
            max_evaluations: default_max_evaluations(),
            lower_bound: None,
            upper_bound: None,
        }
    }
}

impl SolverSettings {
    /// Default settings for the given algorithm.
    pub fn new(kind: SolverKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Sets the target accuracy.
    #[must_use]
    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = accuracy;
        self
    }

    /// Sets the evaluation budget.
    #[must_use]
    pub fn with_max_evaluations(mut self, max_evaluations: usize) -> Self {
        self.max_evaluations = max_evaluations;
        self
    }

    /// Enforces bounds on every abscissa tried.
    #[must_use]
    pub fn with_bounds(mut self, lower: Option<f64>, upper: Option<f64>) -> Self {
        self.lower_bound = lower;
        self.upper_bound = upper;
        self
    }

    /// Builds the configuration shared by the solvers.
    pub fn solver_config(&self) -> SolverConfig {
        SolverConfig {
            max_evaluations: self.max_evaluations,
            lower_bound: self.lower_bound,
            upper_bound: self.upper_bound,
        }
    }

    /// Finds a root near `guess` with the configured algorithm.
    pub fn solve<F>(&self, f: F, guess: f64, step: f64) -> MathResult<SolverResult>
    where
        F: ObjectiveFunction,
    {
        let config = self.solver_config();
        match self.kind {
            SolverKind::Bisection => Bisection::new(config).solve(f, self.accuracy, guess, step),
            SolverKind::Brent => Brent::new(config).solve(f, self.accuracy, guess, step),
            SolverKind::FalsePosition => {
                FalsePosition::new(config).solve(f, self.accuracy, guess, step)
            }
            SolverKind::Newton => Newton::new(config).solve(f, self.accuracy, guess, step),
            SolverKind::NewtonSafe => NewtonSafe::new(config).solve(f, self.accuracy, guess, step),
            SolverKind::Ridder => Ridder::new(config).solve(f, self.accuracy, guess, step),
            SolverKind::Secant => Secant::new(config).solve(f, self.accuracy, guess, step),
        }
    }

    /// Finds a root inside `[x_min, x_max]` with the configured algorithm.
    pub fn solve_in<F>(&self, f: F, guess: f64, x_min: f64, x_max: f64) -> MathResult<SolverResult>
    where
        F: ObjectiveFunction,
    {
        let config = self.solver_config();
        let accuracy = self.accuracy;
        match self.kind {
            SolverKind::Bisection => Bisection::new(config).solve_in(f, accuracy, guess, x_min, x_max),
            SolverKind::Brent => Brent::new(config).solve_in(f, accuracy, guess, x_min, x_max),
            SolverKind::FalsePosition => {
                FalsePosition::new(config).solve_in(f, accuracy, guess, x_min, x_max)
            }
            SolverKind::Newton => Newton::new(config).solve_in(f, accuracy, guess, x_min, x_max),
            SolverKind::NewtonSafe => {
                NewtonSafe::new(config).solve_in(f, accuracy, guess, x_min, x_max)
            }
            SolverKind::Ridder => Ridder::new(config).solve_in(f, accuracy, guess, x_min, x_max),
            SolverKind::Secant => Secant::new(config).solve_in(f, accuracy, guess, x_min, x_max),
        }
    }
}

impl Validate for SolverSettings {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if !(self.accuracy.is_finite() && self.accuracy > 0.0) {
            errors.push(ValidationError::with_rule(
                "accuracy",
                format!("Accuracy must be positive and finite, got {}", self.accuracy),
                "positive",
            ));
        }

        // Bracketing alone spends two evaluations.
        if self.max_evaluations < 2 {
            errors.push(ValidationError::with_rule(
                "max_evaluations",
                "Evaluation budget must be at least 2",
                "min_value",
            ));
        }

        if let (Some(lower), Some(upper)) = (self.lower_bound, self.upper_bound) {
            if lower >= upper {
                errors.push(ValidationError::with_rule(
                    "lower_bound",
                    format!("Lower bound {lower} must be below upper bound {upper}"),
                    "ordering",
                ));
            }
        }

        errors
    }
}
