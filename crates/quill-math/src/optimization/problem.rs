//! Cost functions and the optimization problem handed to a method.

use crate::error::{MathError, MathResult};
use crate::optimization::Constraint;

/// Default step for central-difference gradients.
pub const DEFAULT_FINITE_DIFFERENCE_EPSILON: f64 = 1e-8;

/// A scalar objective over a parameter vector.
///
/// Evaluation takes `&mut self`: implementations may mutate state as a
/// side effect (a calibration cost function pushes every trial point into
/// its model), so evaluations are serialized by construction.
pub trait CostFunction {
    /// Evaluates the objective at `x`.
    fn value(&mut self, x: &[f64]) -> MathResult<f64>;

    /// Step used for finite-difference gradients.
    fn finite_difference_epsilon(&self) -> f64 {
        DEFAULT_FINITE_DIFFERENCE_EPSILON
    }
}

impl<F> CostFunction for F
where
    F: FnMut(&[f64]) -> f64,
{
    fn value(&mut self, x: &[f64]) -> MathResult<f64> {
        Ok(self(x))
    }
}

/// A cost function together with its admissible region.
///
/// Counts evaluations and records the best point an optimizer reports.
pub struct Problem<'a> {
    cost_function: &'a mut dyn CostFunction,
    constraint: &'a Constraint,
    current_value: Vec<f64>,
    function_value: f64,
    function_evaluations: usize,
    gradient_evaluations: usize,
}

impl<'a> Problem<'a> {
    /// Creates a problem over `cost_function` restricted by `constraint`.
    pub fn new(cost_function: &'a mut dyn CostFunction, constraint: &'a Constraint) -> Self {
        Self {
            cost_function,
            constraint,
            current_value: Vec::new(),
            function_value: f64::NAN,
            function_evaluations: 0,
            gradient_evaluations: 0,
        }
    }

    /// Returns the admissible region.
    pub fn constraint(&self) -> &'a Constraint {
        self.constraint
    }

    /// Evaluates the cost function, counting the call.
    pub fn value(&mut self, x: &[f64]) -> MathResult<f64> {
        self.function_evaluations += 1;
        self.cost_function.value(x)
    }

    /// Central-difference gradient of the cost function at `x`.
    pub fn gradient(&mut self, x: &[f64]) -> MathResult<Vec<f64>> {
        self.gradient_evaluations += 1;
        let eps = self.cost_function.finite_difference_epsilon();
        if eps <= 0.0 {
            return Err(MathError::invalid_input(format!(
                "finite difference epsilon must be positive, got {eps}"
            )));
        }

        let mut point = x.to_vec();
        let mut gradient = Vec::with_capacity(x.len());
        for i in 0..x.len() {
            point[i] = x[i] + eps;
            let f_plus = self.value(&point)?;
            point[i] = x[i] - eps;
            let f_minus = self.value(&point)?;
            point[i] = x[i];
            gradient.push((f_plus - f_minus) / (2.0 * eps));
        }
        Ok(gradient)
    }

    /// Best point reported so far.
    pub fn current_value(&self) -> &[f64] {
        &self.current_value
    }

    /// Records the best point.
    pub fn set_current_value(&mut self, x: Vec<f64>) {
        self.current_value = x;
    }

    /// Objective at the best point.
    pub fn function_value(&self) -> f64 {
        self.function_value
    }

    /// Records the objective at the best point.
    pub fn set_function_value(&mut self, value: f64) {
        self.function_value = value;
    }

    /// Number of cost function evaluations, gradients included.
    pub fn function_evaluations(&self) -> usize {
        self.function_evaluations
    }

    /// Number of gradient evaluations.
    pub fn gradient_evaluations(&self) -> usize {
        self.gradient_evaluations
    }
}
