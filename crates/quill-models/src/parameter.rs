//! Named parameter groups owned by a model.
//!
//! A model's calibratable state is an ordered list of [`Parameter`]s. Each
//! group has a fixed arity, a shape ([`ParameterKind`]) that turns its
//! scalars into a function of time, and a [`Constraint`] that applies to its
//! own slice of the model's flattened parameter vector.

use serde::{Deserialize, Serialize};

use quill_math::optimization::Constraint;

use crate::error::{ModelError, ModelResult};

/// Shape of a parameter group as a function of time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterKind {
    /// One scalar, constant in time.
    Constant,
    /// No scalars. Evaluates to zero and is never calibrated.
    Null,
    /// One scalar per interval delimited by `times`.
    PiecewiseConstant {
        /// Strictly increasing interval ends.
        times: Vec<f64>,
    },
}

/// A named group of model parameters.
///
/// Scalars are only mutated through [`set_param`](Self::set_param), and
/// the arity never changes after construction.
#[derive(Debug, Clone)]
pub struct Parameter {
    name: String,
    kind: ParameterKind,
    values: Vec<f64>,
    constraint: Constraint,
}

impl Parameter {
    /// Creates a constant parameter.
    pub fn constant(name: impl Into<String>, value: f64, constraint: Constraint) -> Self {
        Self {
            name: name.into(),
            kind: ParameterKind::Constant,
            values: vec![value],
            constraint,
        }
    }

    /// Creates a parameter with no scalars, evaluating to zero.
    pub fn null(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParameterKind::Null,
            values: Vec::new(),
            constraint: Constraint::NoConstraint,
        }
    }

    /// Creates a piecewise-constant parameter.
    ///
    /// `values` must hold one more element than `times`, and `times` must
    /// be strictly increasing.
    pub fn piecewise_constant(
        name: impl Into<String>,
        times: Vec<f64>,
        values: Vec<f64>,
        constraint: Constraint,
    ) -> ModelResult<Self> {
        let name = name.into();
        if values.len() != times.len() + 1 {
            return Err(ModelError::invalid_parameter(format!(
                "'{name}' needs {} values for {} interval ends, got {}",
                times.len() + 1,
                times.len(),
                values.len()
            )));
        }
        if times.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ModelError::invalid_parameter(format!(
                "'{name}' interval ends must be strictly increasing"
            )));
        }
        Ok(Self {
            name,
            kind: ParameterKind::PiecewiseConstant { times },
            values,
            constraint,
        })
    }

    /// Returns the parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the parameter shape.
    pub fn kind(&self) -> &ParameterKind {
        &self.kind
    }

    /// Returns the number of scalars.
    pub fn size(&self) -> usize {
        self.values.len()
    }

    /// Returns the scalars.
    pub fn params(&self) -> &[f64] {
        &self.values
    }

    /// Returns the constraint on this group's scalars.
    pub fn constraint(&self) -> &Constraint {
        &self.constraint
    }

    /// Sets the scalar at `index`.
    pub fn set_param(&mut self, index: usize, value: f64) -> ModelResult<()> {
        let size = self.values.len();
        let slot = self
            .values
            .get_mut(index)
            .ok_or_else(|| ModelError::IndexOutOfRange {
                name: self.name.clone(),
                index,
                size,
            })?;
        *slot = value;
        Ok(())
    }

    /// Evaluates the parameter at time `t`.
    pub fn value(&self, t: f64) -> f64 {
        match &self.kind {
            ParameterKind::Null => 0.0,
            ParameterKind::Constant => self.values[0],
            ParameterKind::PiecewiseConstant { times } => {
                let interval = times.iter().position(|&end| t < end).unwrap_or(times.len());
                self.values[interval]
            }
        }
    }

    /// Returns true if the current scalars satisfy the group's constraint.
    pub fn is_admissible(&self) -> bool {
        self.constraint.test(&self.values)
    }
}
