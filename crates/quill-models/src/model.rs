//! Calibratable models.
//!
//! A model exposes its parameter groups through [`CalibratedModel`]; the
//! trait supplies flattening ([`params`](CalibratedModel::params) and
//! [`set_params`](CalibratedModel::set_params)), the derived constraint and
//! [`calibrate`](CalibratedModel::calibrate) on top of them.

use log::{info, warn};

use quill_math::optimization::{
    Constraint, ConstraintBlock, EndCriteriaType, OptimizationMethod, OptimizationResult, Problem,
};

use crate::calibration::{CalibrationFunction, DEFAULT_CALIBRATION_EPSILON};
use crate::context::EvaluationContext;
use crate::error::{ModelError, ModelResult};
use crate::parameter::Parameter;

/// A market instrument a model is calibrated against.
///
/// The error is recomputed from the model's current state on every call.
pub trait CalibrationHelper<M: ?Sized> {
    /// Signed pricing error of `model` against the market quote.
    fn calibration_error(&self, model: &M, context: &EvaluationContext) -> ModelResult<f64>;
}

/// A model whose state is a fixed list of parameter groups.
pub trait CalibratedModel {
    /// Returns the parameter groups, in flattening order.
    fn arguments(&self) -> &[Parameter];

    /// Returns the parameter groups for mutation.
    ///
    /// Implementations must not change the number or arity of the groups.
    fn arguments_mut(&mut self) -> &mut [Parameter];

    /// Hook run after every successful [`set_params`](Self::set_params).
    fn update(&mut self) {}

    /// Total number of scalars across all groups.
    fn total_arity(&self) -> usize {
        self.arguments().iter().map(Parameter::size).sum()
    }

    /// Flattens all scalars, group order then index order.
    fn params(&self) -> Vec<f64> {
        self.arguments()
            .iter()
            .flat_map(|argument| argument.params().iter().copied())
            .collect()
    }

    /// Assigns every scalar from a flat vector and runs [`update`](Self::update).
    ///
    /// The length is checked before anything is assigned, so a failed call
    /// leaves the model untouched.
    fn set_params(&mut self, params: &[f64]) -> ModelResult<()> {
        let expected = self.total_arity();
        if params.len() < expected {
            return Err(ModelError::ParameterArrayTooSmall {
                expected,
                actual: params.len(),
            });
        }
        if params.len() > expected {
            return Err(ModelError::ParameterArrayTooBig {
                expected,
                actual: params.len(),
            });
        }

        let mut offset = 0;
        for argument in self.arguments_mut() {
            let size = argument.size();
            for (index, &value) in params[offset..offset + size].iter().enumerate() {
                argument.set_param(index, value)?;
            }
            offset += size;
        }
        self.update();
        Ok(())
    }

    /// The model constraint: each group's constraint on its own slice.
    fn constraint(&self) -> Constraint {
        Constraint::Blocks(
            self.arguments()
                .iter()
                .map(|argument| ConstraintBlock::new(argument.size(), argument.constraint().clone()))
                .collect(),
        )
    }

    /// Calibrates the model to `helpers`.
    ///
    /// The optimizer starts from the current parameters, in positive mode,
    /// under the model constraint intersected with `additional_constraint`
    /// (ignored when `None` or [`Constraint::Null`]). The best point found is
    /// committed to the model even when the iteration budget runs out; the
    /// returned result reports why the run stopped.
    fn calibrate(
        &mut self,
        helpers: &[Box<dyn CalibrationHelper<Self>>],
        method: &mut dyn OptimizationMethod,
        additional_constraint: Option<Constraint>,
        context: &EvaluationContext,
    ) -> ModelResult<OptimizationResult>
    where
        Self: Sized,
    {
        self.calibrate_with_epsilon(
            helpers,
            method,
            additional_constraint,
            context,
            DEFAULT_CALIBRATION_EPSILON,
        )
    }

    /// [`calibrate`](Self::calibrate) with an explicit finite-difference step
    /// for gradient-based methods.
    fn calibrate_with_epsilon(
        &mut self,
        helpers: &[Box<dyn CalibrationHelper<Self>>],
        method: &mut dyn OptimizationMethod,
        additional_constraint: Option<Constraint>,
        context: &EvaluationContext,
        finite_difference_epsilon: f64,
    ) -> ModelResult<OptimizationResult>
    where
        Self: Sized,
    {
        let constraint = match additional_constraint {
            Some(extra) if !extra.is_null() => Constraint::composite(self.constraint(), extra),
            _ => self.constraint(),
        };

        info!(
            "Calibrating {} parameters to {} helpers with {}",
            self.total_arity(),
            helpers.len(),
            method.name()
        );

        method.set_initial_value(self.params());
        method.end_criteria_mut().set_positive_optimization();

        let result = {
            let mut function = CalibrationFunction::new(self, helpers, context)
                .with_finite_difference_epsilon(finite_difference_epsilon);
            let mut problem = Problem::new(&mut function, &constraint);
            method.minimize(&mut problem)?
        };

        self.set_params(&result.parameters)?;

        if result.end_criteria == EndCriteriaType::MaxIterations {
            warn!(
                "Calibration stopped after {} iterations without converging, error = {}",
                result.iterations, result.value
            );
        } else {
            info!(
                "Calibration finished on {} after {} iterations, error = {}",
                result.end_criteria, result.iterations, result.value
            );
        }
        Ok(result)
    }
}
