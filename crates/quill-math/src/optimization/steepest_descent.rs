//! Steepest descent with a backtracking line search.

use log::{debug, trace};

use crate::error::{MathError, MathResult};
use crate::optimization::{
    EndCriteria, EndCriteriaType, OptimizationMethod, OptimizationResult, Problem,
};

/// Sufficient-decrease constant of the Armijo condition.
const ARMIJO: f64 = 0.5;

/// Smallest line-search step tried before the iterate is declared stationary.
const MIN_STEP: f64 = 1e-15;

/// Steepest descent minimizer.
///
/// Moves against the central-difference gradient. The step starts at one
/// and is halved until the Armijo condition holds; every trial step is
/// first projected into the admissible region with
/// [`Constraint::update`](crate::optimization::Constraint::update).
#[derive(Debug, Clone, Default)]
pub struct SteepestDescent {
    end_criteria: EndCriteria,
    initial_value: Vec<f64>,
}

impl SteepestDescent {
    /// Creates a steepest descent minimizer.
    #[must_use]
    pub fn new(end_criteria: EndCriteria) -> Self {
        Self {
            end_criteria,
            initial_value: Vec::new(),
        }
    }
}

impl OptimizationMethod for SteepestDescent {
    fn name(&self) -> &'static str {
        "SteepestDescent"
    }

    fn initial_value(&self) -> &[f64] {
        &self.initial_value
    }

    fn set_initial_value(&mut self, initial_value: Vec<f64>) {
        self.initial_value = initial_value;
    }

    fn end_criteria(&self) -> &EndCriteria {
        &self.end_criteria
    }

    fn end_criteria_mut(&mut self) -> &mut EndCriteria {
        &mut self.end_criteria
    }

    fn minimize(&mut self, problem: &mut Problem<'_>) -> MathResult<OptimizationResult> {
        let constraint = problem.constraint();
        let criteria = self.end_criteria;

        let mut x = self.initial_value.clone();
        if !constraint.test(&x) {
            return Err(MathError::invalid_input(
                "initial point violates the constraint",
            ));
        }
        let mut f = problem.value(&x)?;

        let mut iteration = 0;
        let mut stationary_point_iterations = 0;
        let mut stationary_value_iterations = 0;

        let end = 'outer: loop {
            if let Some(end) = criteria
                .check_stationary_function_accuracy(f)
                .or_else(|| criteria.check_max_iterations(iteration))
            {
                break end;
            }

            let gradient = problem.gradient(&x)?;
            let norm_sq: f64 = gradient.iter().map(|g| g * g).sum();
            if let Some(end) = criteria.check_zero_gradient_norm(norm_sq.sqrt()) {
                break end;
            }
            let direction: Vec<f64> = gradient.iter().map(|g| -g).collect();

            let mut step = 1.0;
            let (x_new, f_new) = loop {
                let mut trial = x.clone();
                let taken = constraint.update(&mut trial, &direction, step)?;
                let value = problem.value(&trial)?;
                if value < f - ARMIJO * taken * norm_sq {
                    break (trial, value);
                }
                step = taken * 0.5;
                if step < MIN_STEP {
                    break 'outer EndCriteriaType::StationaryPoint;
                }
            };

            iteration += 1;
            trace!("SteepestDescent: iteration {iteration}, f = {f_new}");

            let point_end =
                criteria.check_stationary_point(&x, &x_new, &mut stationary_point_iterations);
            let value_end = criteria.check_stationary_function_value(
                f,
                f_new,
                &mut stationary_value_iterations,
            );
            x = x_new;
            f = f_new;
            if let Some(end) = point_end.or(value_end) {
                break end;
            }
        };

        debug!("SteepestDescent: stopped on {end} after {iteration} iterations, f = {f}");
        problem.set_current_value(x.clone());
        problem.set_function_value(f);
        Ok(OptimizationResult {
            parameters: x,
            value: f,
            iterations: iteration,
            function_evaluations: problem.function_evaluations(),
            end_criteria: end,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::Constraint;
    use approx::assert_relative_eq;

    #[test]
    fn test_quadratic() {
        // Minimize (x-2)^2 + (y-3)^2
        let mut f = |x: &[f64]| (x[0] - 2.0).powi(2) + (x[1] - 3.0).powi(2);
        let constraint = Constraint::NoConstraint;
        let mut problem = Problem::new(&mut f, &constraint);

        let mut method = SteepestDescent::default();
        method.set_initial_value(vec![0.0, 0.0]);
        let result = method.minimize(&mut problem).unwrap();

        assert!(result.converged());
        assert_relative_eq!(result.parameters[0], 2.0, epsilon = 1e-5);
        assert_relative_eq!(result.parameters[1], 3.0, epsilon = 1e-5);
        assert!(problem.gradient_evaluations() > 0);
    }

    #[test]
    fn test_positive_mode() {
        let mut f = |x: &[f64]| (x[0] - 2.0).powi(2) + (x[1] - 3.0).powi(2);
        let constraint = Constraint::NoConstraint;
        let mut problem = Problem::new(&mut f, &constraint);

        let mut method = SteepestDescent::default();
        method.end_criteria_mut().set_positive_optimization();
        method.set_initial_value(vec![0.0, 0.0]);
        let result = method.minimize(&mut problem).unwrap();

        assert_eq!(result.end_criteria, EndCriteriaType::StationaryFunctionAccuracy);
        assert!(result.value < 1e-8);
    }

    #[test]
    fn test_steps_are_projected() {
        // Unconstrained minimum at -1, admissible region x > 0.
        let mut f = |x: &[f64]| (x[0] + 1.0).powi(2);
        let constraint = Constraint::Positive;
        let mut problem = Problem::new(&mut f, &constraint);

        let mut method = SteepestDescent::new(EndCriteria::default().with_max_iterations(50));
        method.set_initial_value(vec![1.0]);
        let result = method.minimize(&mut problem).unwrap();

        assert_eq!(result.end_criteria, EndCriteriaType::MaxIterations);
        assert!(result.parameters[0] > 0.0);
        assert!(result.parameters[0] < 1e-6);
    }

    #[test]
    fn test_already_at_minimum() {
        let mut f = |x: &[f64]| x[0] * x[0];
        let constraint = Constraint::NoConstraint;
        let mut problem = Problem::new(&mut f, &constraint);

        let mut method = SteepestDescent::default();
        method.set_initial_value(vec![0.0]);
        let result = method.minimize(&mut problem).unwrap();

        assert_eq!(result.end_criteria, EndCriteriaType::ZeroGradientNorm);
        assert_eq!(result.iterations, 0);
    }
}
