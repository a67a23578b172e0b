//! Calibration objective.

use quill_math::optimization::CostFunction;
use quill_math::MathResult;

use crate::context::EvaluationContext;
use crate::model::{CalibratedModel, CalibrationHelper};

/// Default finite-difference step of a [`CalibrationFunction`].
pub const DEFAULT_CALIBRATION_EPSILON: f64 = 1e-6;

/// Root of the summed squared calibration errors, as a cost function of the
/// model parameters.
///
/// Every evaluation first pushes the trial point into the model with
/// [`CalibratedModel::set_params`], then re-queries every helper. The model
/// is borrowed mutably for the lifetime of the function, so nothing else can
/// observe or evaluate it concurrently. The sum is not normalised by the
/// number of helpers.
pub struct CalibrationFunction<'a, M: CalibratedModel> {
    model: &'a mut M,
    helpers: &'a [Box<dyn CalibrationHelper<M>>],
    context: &'a EvaluationContext,
    finite_difference_epsilon: f64,
}

impl<'a, M: CalibratedModel> CalibrationFunction<'a, M> {
    /// Creates the objective of `model` against `helpers`.
    pub fn new(
        model: &'a mut M,
        helpers: &'a [Box<dyn CalibrationHelper<M>>],
        context: &'a EvaluationContext,
    ) -> Self {
        Self {
            model,
            helpers,
            context,
            finite_difference_epsilon: DEFAULT_CALIBRATION_EPSILON,
        }
    }

    /// Sets the finite-difference step.
    #[must_use]
    pub fn with_finite_difference_epsilon(mut self, epsilon: f64) -> Self {
        self.finite_difference_epsilon = epsilon;
        self
    }

    /// Returns the model in its current state.
    pub fn model(&self) -> &M {
        &*self.model
    }
}

impl<M: CalibratedModel> CostFunction for CalibrationFunction<'_, M> {
    fn value(&mut self, x: &[f64]) -> MathResult<f64> {
        self.model.set_params(x)?;

        let mut sum = 0.0;
        for helper in self.helpers {
            let diff = helper.calibration_error(&*self.model, self.context)?;
            sum += diff * diff;
        }
        Ok(sum.sqrt())
    }

    fn finite_difference_epsilon(&self) -> f64 {
        self.finite_difference_epsilon
    }
}
