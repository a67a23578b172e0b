//! Newton-Raphson root-finding algorithm.

use log::debug;

use crate::error::{MathError, MathResult};
use crate::solvers::{Bracket, ObjectiveFunction, Solver1D, SolverConfig, SolverResult};

/// Newton-Raphson root-finding algorithm.
///
/// Uses the iteration:
/// `x_{n+1} = x_n - f(x_n) / f'(x_n)`
///
/// This method has quadratic convergence near the root but requires the
/// derivative of the function. The bracket is only used as a safety net:
/// an iterate that leaves it fails the solve with
/// [`MathError::JumpedOutOfBracket`]. Use [`NewtonSafe`](super::NewtonSafe)
/// for a variant that falls back to bisection instead.
///
/// # Example
///
/// ```rust
/// use quill_math::solvers::{Newton, Solver1D, WithDerivative};
///
/// // Find root of x^2 - 2 (i.e., sqrt(2))
/// let f = WithDerivative::new(|x: f64| x * x - 2.0, |x: f64| 2.0 * x);
///
/// let result = Newton::default().solve_in(f, 1e-12, 1.5, 1.0, 2.0).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Newton {
    config: SolverConfig,
}

impl Newton {
    /// Creates a Newton solver with the given configuration.
    #[must_use]
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }
}

impl Solver1D for Newton {
    fn name(&self) -> &'static str {
        "Newton"
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
        let mut root = bracket.root;

        let mut froot = f.value(root);
        let mut dfroot = f
            .derivative(root)
            .ok_or(MathError::DerivativeRequired { solver: self.name() })?;
        evaluations += 1;

        while evaluations <= self.config.max_evaluations {
            let dx = froot / dfroot;
            root -= dx;

            if (bracket.x_min - root) * (root - bracket.x_max) < 0.0 {
                return Err(MathError::JumpedOutOfBracket {
                    solver: self.name(),
                    root,
                    x_min: bracket.x_min,
                    x_max: bracket.x_max,
                });
            }
            if dx.abs() < accuracy {
                debug!("Newton: converged to {root} in {evaluations} evaluations");
                return Ok(SolverResult { root, evaluations });
            }

            froot = f.value(root);
            dfroot = f
                .derivative(root)
                .ok_or(MathError::DerivativeRequired { solver: self.name() })?;
            evaluations += 1;
        }

        Err(MathError::max_evaluations_exceeded(
            self.name(),
            self.config.max_evaluations,
        ))
    }
}
