//! Multidimensional optimization.
//!
//! An optimization run combines:
//!
//! - a [`CostFunction`] evaluated over a flat parameter vector,
//! - a [`Constraint`] describing the admissible region,
//! - a [`Problem`] tying the two together and counting evaluations,
//! - an [`OptimizationMethod`] that iterates, evaluates and checks its
//!   [`EndCriteria`] until one of them fires.
//!
//! Two methods are provided: [`Simplex`] (Nelder-Mead, gradient-free) and
//! [`SteepestDescent`] (finite-difference gradient with a projected line
//! search).

mod constraint;
mod end_criteria;
mod problem;
mod simplex;
mod steepest_descent;

pub use constraint::{Constraint, ConstraintBlock, ConstraintPredicate, MAX_UPDATE_HALVINGS};
pub use end_criteria::{EndCriteria, EndCriteriaType};
pub use problem::{CostFunction, Problem, DEFAULT_FINITE_DIFFERENCE_EPSILON};
pub use simplex::Simplex;
pub use steepest_descent::SteepestDescent;

use crate::error::MathResult;

/// Result of an optimization run.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationResult {
    /// Best parameters found.
    pub parameters: Vec<f64>,
    /// Objective at `parameters`.
    pub value: f64,
    /// Number of iterations used.
    pub iterations: usize,
    /// Number of cost function evaluations used.
    pub function_evaluations: usize,
    /// Criterion that stopped the run.
    pub end_criteria: EndCriteriaType,
}

impl OptimizationResult {
    /// Returns true if the run stopped on a convergence criterion.
    #[must_use]
    pub fn converged(&self) -> bool {
        self.end_criteria.is_success()
    }
}

/// A stateful minimizer.
///
/// A method owns its starting point and its end criteria, both of which a
/// caller may adjust before calling [`minimize`](Self::minimize). The trait
/// is object safe so methods can be chosen at runtime.
pub trait OptimizationMethod {
    /// Returns the name of the method, used in diagnostics.
    fn name(&self) -> &'static str;

    /// Returns the starting point.
    fn initial_value(&self) -> &[f64];

    /// Sets the starting point.
    fn set_initial_value(&mut self, initial_value: Vec<f64>);

    /// Returns the end criteria.
    fn end_criteria(&self) -> &EndCriteria;

    /// Returns the end criteria for adjustment.
    fn end_criteria_mut(&mut self) -> &mut EndCriteria;

    /// Minimizes the problem from the starting point.
    ///
    /// Exhausting the iteration budget is not an error: it is reported as
    /// [`EndCriteriaType::MaxIterations`] in the result. Errors raised by the
    /// cost function or the constraint propagate.
    fn minimize(&mut self, problem: &mut Problem<'_>) -> MathResult<OptimizationResult>;
}
