//! Secant root-finding algorithm.

use log::debug;

use crate::error::{MathError, MathResult};
use crate::solvers::{Bracket, ObjectiveFunction, Solver1D, SolverConfig, SolverResult};

/// Secant root-finding algorithm.
///
/// Starts from the bracket end with the smaller `|f|` and extrapolates
/// through the last two iterates. Unlike false position the bracket is not
/// maintained, so iterates may leave it.
///
/// Convergence rate is superlinear (order ~1.618, the golden ratio).
///
/// # Example
///
/// ```rust
/// use quill_math::solvers::{Secant, Solver1D};
///
/// // Find root of x^2 - 2 (i.e., sqrt(2))
/// let f = |x: f64| x * x - 2.0;
///
/// let result = Secant::default().solve_in(f, 1e-12, 1.5, 1.0, 2.0).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Secant {
    config: SolverConfig,
}

impl Secant {
    /// Creates a secant solver with the given configuration.
    #[must_use]
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }
}

impl Solver1D for Secant {
    fn name(&self) -> &'static str {
        "Secant"
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

        // Pick the bracket end with the smaller |f| as the most recent iterate.
        let (mut root, mut froot, mut xl, mut fl) = if bracket.fx_min.abs() < bracket.fx_max.abs()
        {
            (bracket.x_min, bracket.fx_min, bracket.x_max, bracket.fx_max)
        } else {
            (bracket.x_max, bracket.fx_max, bracket.x_min, bracket.fx_min)
        };

        while evaluations <= self.config.max_evaluations {
            let dx = (xl - root) * froot / (froot - fl);
            xl = root;
            fl = froot;
            root += dx;
            froot = f.value(root);
            evaluations += 1;

            if dx.abs() < accuracy || froot == 0.0 {
                debug!("Secant: converged to {root} in {evaluations} evaluations");
                return Ok(SolverResult { root, evaluations });
            }
        }

        Err(MathError::max_evaluations_exceeded(
            self.name(),
            self.config.max_evaluations,
        ))
    }
}
