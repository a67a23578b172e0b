//! False position (regula falsi) root-finding algorithm.

use log::{debug, trace};

use crate::error::{MathError, MathResult};
use crate::solvers::{Bracket, ObjectiveFunction, Solver1D, SolverConfig, SolverResult};

/// False position root-finding algorithm.
///
/// Interpolates linearly between the two bracket ends instead of bisecting,
/// then replaces the end whose function value has the same sign as the new
/// estimate. The bracket always contains a sign change.
///
/// Convergence is declared when the replaced end moved by less than the
/// requested accuracy, or when the function vanishes at the estimate.
///
/// # Degenerate input
///
/// The interpolation divides by `fl - fh` without guarding against a
/// vanishing difference. Inputs whose bracket values are (numerically)
/// equal produce non-finite estimates rather than an error.
///
/// # Example
///
/// ```rust
/// use quill_math::solvers::{FalsePosition, Solver1D};
///
/// let solver = FalsePosition::default();
/// let result = solver.solve_in(|x: f64| x * x - 2.0, 1e-8, 1.0, 0.0, 2.0).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FalsePosition {
    config: SolverConfig,
}

impl FalsePosition {
    /// Creates a false position solver with the given configuration.
    #[must_use]
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }
}

impl Solver1D for FalsePosition {
    fn name(&self) -> &'static str {
        "FalsePosition"
    }

    fn config(&self) -> &SolverConfig {
        &self.config
    }

    fn solve_bracketed<F>(
        &self,
        f: &mut F,
        accuracy: f64,
        bracket: Bracket,
    ) -> MathResult<SolverResult>
    where
        F: ObjectiveFunction,
    {
        let Bracket {
            x_min,
            x_max,
            fx_min,
            fx_max,
            mut evaluations,
            ..
        } = bracket;

        // Orient the bracket so that fl < 0 < fh.
        let (mut xl, mut fl, mut xh, mut fh) = if fx_min < 0.0 {
            (x_min, fx_min, x_max, fx_max)
        } else {
            (x_max, fx_max, x_min, fx_min)
        };

        let mut dx = xh - xl;
        while evaluations <= self.config.max_evaluations {
            let root = xl + dx * fl / (fl - fh);
            let froot = f.value(root);
            evaluations += 1;

            let del;
            if froot < 0.0 {
                del = xl - root;
                xl = root;
                fl = froot;
            } else {
                del = xh - root;
                xh = root;
                fh = froot;
            }
            dx = xh - xl;
            trace!("FalsePosition: x = {root}, f(x) = {froot:e}, del = {del:e}");

            if del.abs() < accuracy || froot == 0.0 {
                debug!("FalsePosition: converged to {root} in {evaluations} evaluations");
                return Ok(SolverResult { root, evaluations });
            }
        }

        Err(MathError::max_evaluations_exceeded(
            self.name(),
            self.config.max_evaluations,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::SQRT_2;

    #[test]
    fn test_sqrt_2_on_unit_bracket() {
        let f = |x: f64| x * x - 2.0;

        let result = FalsePosition::default()
            .solve_in(f, 1e-6, 1.0, 0.0, 2.0)
            .unwrap();

        assert!((result.root - SQRT_2).abs() < 1e-6);
        assert!(result.evaluations <= 100);
    }

    #[test]
    fn test_reversed_signs() {
        // Decreasing function: f(x_min) > 0 and f(x_max) < 0.
        let f = |x: f64| 2.0 - x * x;

        let result = FalsePosition::default()
            .solve_in(f, 1e-10, 1.0, 0.0, 2.0)
            .unwrap();

        assert_relative_eq!(result.root, SQRT_2, epsilon = 1e-8);
    }

    #[test]
    fn test_max_evaluations_exceeded() {
        let f = |x: f64| x * x - 2.0;
        let solver = FalsePosition::new(SolverConfig::new(1));

        let result = solver.solve_in(f, 1e-6, 1.0, 0.0, 2.0);

        assert_eq!(
            result,
            Err(MathError::MaxEvaluationsExceeded {
                solver: "FalsePosition",
                max_evaluations: 1,
            })
        );
    }

    #[test]
    fn test_slow_convergence_runs_out_of_budget() {
        // Strong curvature keeps one end pinned and the other crawling.
        let f = |x: f64| x.powi(10) - 1.0;
        let solver = FalsePosition::new(SolverConfig::new(5));

        let result = solver.solve_in(f, 1e-10, 0.5, 0.0, 1.5);

        assert!(matches!(
            result,
            Err(MathError::MaxEvaluationsExceeded {
                max_evaluations: 5,
                ..
            })
        ));
    }

    #[test]
    fn test_exact_root_on_first_step() {
        // A linear function is interpolated exactly.
        let f = |x: f64| 3.0 * x - 1.5;

        let result = FalsePosition::default()
            .solve_in(f, 1e-12, 0.2, 0.0, 2.0)
            .unwrap();

        assert_relative_eq!(result.root, 0.5, epsilon = 1e-14);
        assert_eq!(result.evaluations, 3);
    }

    #[test]
    fn test_degenerate_bracket_is_not_guarded() {
        // Equal bracket values with opposite sign conventions cannot occur,
        // but a bracket whose values cancel in floating point must not be
        // turned into an error: the estimate is simply non-finite.
        let solver = FalsePosition::default();
        let bracket = Bracket {
            x_min: 0.0,
            x_max: 1.0,
            fx_min: -0.0,
            fx_max: 0.0,
            root: 0.5,
            evaluations: 2,
        };
        let mut evaluated = Vec::new();
        let mut f = |x: f64| {
            evaluated.push(x);
            x - 0.5
        };

        let _ = solver.solve_bracketed(&mut f, 1e-10, bracket);

        assert!(evaluated.first().is_some_and(|x| x.is_nan()));
    }
}
