//! Error types for mathematical operations.

use thiserror::Error;

/// A specialized Result type for mathematical operations.
pub type MathResult<T> = Result<T, MathError>;

/// Errors that can occur during root finding and optimization.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// A solver used up its evaluation budget without converging.
    #[error("{solver}: maximum number of function evaluations ({max_evaluations}) exceeded")]
    MaxEvaluationsExceeded {
        /// Name of the solver.
        solver: &'static str,
        /// Configured evaluation limit.
        max_evaluations: usize,
    },

    /// The bracketing search could not find a sign change.
    #[error(
        "Unable to bracket root in {max_evaluations} function evaluations \
         (last bracket attempt: f[{x_min:.6}, {x_max:.6}] -> [{fx_min:.2e}, {fx_max:.2e}])"
    )]
    BracketNotFound {
        /// Configured evaluation limit.
        max_evaluations: usize,
        /// Lower end of the last bracket tried.
        x_min: f64,
        /// Upper end of the last bracket tried.
        x_max: f64,
        /// Function value at `x_min`.
        fx_min: f64,
        /// Function value at `x_max`.
        fx_max: f64,
    },

    /// The supplied interval does not bracket a root.
    #[error("Invalid bracket: f({a}) = {fa:.2e} and f({b}) = {fb:.2e} have same sign")]
    InvalidBracket {
        /// Lower bound of bracket.
        a: f64,
        /// Upper bound of bracket.
        b: f64,
        /// Function value at a.
        fa: f64,
        /// Function value at b.
        fb: f64,
    },

    /// The supplied interval is empty or reversed.
    #[error("Invalid range: x_min ({x_min}) >= x_max ({x_max})")]
    InvalidRange {
        /// Lower end.
        x_min: f64,
        /// Upper end.
        x_max: f64,
    },

    /// The guess does not lie strictly inside the bracket.
    #[error("Guess ({guess}) not strictly bracketed by [{x_min}, {x_max}]")]
    GuessNotBracketed {
        /// Initial guess.
        guess: f64,
        /// Lower end.
        x_min: f64,
        /// Upper end.
        x_max: f64,
    },

    /// A bracket end lies beyond an enforced solver bound.
    #[error("{side} end of bracket ({value}) violates enforced bound ({bound})")]
    OutOfBounds {
        /// Which end ("lower" or "upper").
        side: &'static str,
        /// The offending bracket end.
        value: f64,
        /// The enforced bound.
        bound: f64,
    },

    /// A derivative-based solver was given an objective without derivative.
    #[error("{solver} requires the derivative of the objective function")]
    DerivativeRequired {
        /// Name of the solver.
        solver: &'static str,
    },

    /// A Newton step left the bracket.
    #[error("{solver}: jumped out of brackets [{x_min}, {x_max}] to {root}")]
    JumpedOutOfBracket {
        /// Name of the solver.
        solver: &'static str,
        /// The iterate outside the bracket.
        root: f64,
        /// Lower end.
        x_min: f64,
        /// Upper end.
        x_max: f64,
    },

    /// A constrained step could not be shrunk into the admissible region.
    #[error("Can't update parameter vector: no admissible step after {attempts} halvings")]
    ConstraintUpdateFailed {
        /// Number of halvings attempted.
        attempts: usize,
    },

    /// Two vectors that must share a length do not.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// The cost function failed to produce a value.
    #[error("Function evaluation failed: {reason}")]
    FunctionEvaluation {
        /// Description of the failure.
        reason: String,
    },

    /// Invalid input parameter.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },
}

impl MathError {
    /// Creates a max-evaluations error for the named solver.
    #[must_use]
    pub fn max_evaluations_exceeded(solver: &'static str, max_evaluations: usize) -> Self {
        Self::MaxEvaluationsExceeded {
            solver,
            max_evaluations,
        }
    }

    /// Creates a function evaluation error.
    #[must_use]
    pub fn function_evaluation(reason: impl Into<String>) -> Self {
        Self::FunctionEvaluation {
            reason: reason.into(),
        }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}
