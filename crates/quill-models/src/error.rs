//! Error types for model operations.

use quill_math::MathError;
use thiserror::Error;

/// A specialized Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors that can occur while parameterising or calibrating a model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Fewer values were supplied than the model has parameters.
    #[error("Parameter array too small: expected {expected} values, got {actual}")]
    ParameterArrayTooSmall {
        /// Total arity of the model.
        expected: usize,
        /// Length of the supplied vector.
        actual: usize,
    },

    /// More values were supplied than the model has parameters.
    #[error("Parameter array too big: expected {expected} values, got {actual}")]
    ParameterArrayTooBig {
        /// Total arity of the model.
        expected: usize,
        /// Length of the supplied vector.
        actual: usize,
    },

    /// A parameter was addressed past its arity.
    #[error("Index {index} out of range for parameter '{name}' of size {size}")]
    IndexOutOfRange {
        /// Parameter name.
        name: String,
        /// Requested index.
        index: usize,
        /// Parameter arity.
        size: usize,
    },

    /// A parameter, helper or model input is invalid.
    #[error("Invalid parameter: {reason}")]
    InvalidParameter {
        /// Description of what's invalid.
        reason: String,
    },

    /// Numerical error raised by a solver or optimizer.
    #[error("Math error: {0}")]
    Math(#[from] MathError),
}

impl ModelError {
    /// Creates an invalid parameter error.
    #[must_use]
    pub fn invalid_parameter(reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            reason: reason.into(),
        }
    }
}

/// Model errors raised inside a cost function surface as evaluation errors.
impl From<ModelError> for MathError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Math(inner) => inner,
            other => MathError::function_evaluation(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ModelError::ParameterArrayTooSmall {
            expected: 4,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "Parameter array too small: expected 4 values, got 3"
        );

        let err = ModelError::invalid_parameter("negative volatility");
        assert!(err.to_string().contains("negative volatility"));
    }

    #[test]
    fn test_conversion_to_math_error() {
        let err: MathError = ModelError::ParameterArrayTooBig {
            expected: 2,
            actual: 3,
        }
        .into();
        assert!(matches!(err, MathError::FunctionEvaluation { .. }));

        // Wrapped math errors are unwrapped, not re-wrapped.
        let inner = MathError::ConstraintUpdateFailed { attempts: 200 };
        let err: MathError = ModelError::Math(inner.clone()).into();
        assert_eq!(err, inner);
    }
}
