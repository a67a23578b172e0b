//! Bisection root-finding algorithm.

use log::debug;

use crate::error::{MathError, MathResult};
use crate::solvers::{Bracket, ObjectiveFunction, Solver1D, SolverConfig, SolverResult};

/// Bisection root-finding algorithm.
///
/// A simple and reliable bracketing method that works by repeatedly
/// halving the interval and keeping the half containing the sign change.
///
/// # Example
///
/// ```rust
/// use quill_math::solvers::{Bisection, Solver1D};
///
/// // Find root of x^2 - 2 (i.e., sqrt(2))
/// let f = |x: f64| x * x - 2.0;
///
/// let result = Bisection::default().solve_in(f, 1e-12, 1.5, 1.0, 2.0).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Bisection {
    config: SolverConfig,
}

impl Bisection {
    /// Creates a bisection solver with the given configuration.
    #[must_use]
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }
}

impl Solver1D for Bisection {
    fn name(&self) -> &'static str {
        "Bisection"
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
        let mut evaluations = bracket.evaluations;

        // Orient the search so that f > 0 lies at root + dx.
        let (mut root, mut dx) = if bracket.fx_min < 0.0 {
            (bracket.x_min, bracket.x_max - bracket.x_min)
        } else {
            (bracket.x_max, bracket.x_min - bracket.x_max)
        };

        while evaluations <= self.config.max_evaluations {
            dx /= 2.0;
            let x_mid = root + dx;
            let f_mid = f.value(x_mid);
            evaluations += 1;

            if f_mid <= 0.0 {
                root = x_mid;
            }
            if dx.abs() < accuracy || f_mid == 0.0 {
                debug!("Bisection: converged to {root} in {evaluations} evaluations");
                return Ok(SolverResult { root, evaluations });
            }
        }

        Err(MathError::max_evaluations_exceeded(
            self.name(),
            self.config.max_evaluations,
        ))
    }
}
