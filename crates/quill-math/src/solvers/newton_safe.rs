//! Safeguarded Newton-Raphson root-finding algorithm.

use log::debug;

use crate::error::{MathError, MathResult};
use crate::solvers::{Bracket, ObjectiveFunction, Solver1D, SolverConfig, SolverResult};

/// Newton-Raphson with a bisection fallback.
///
/// Takes a Newton step whenever it stays inside the current bracket and
/// shrinks fast enough, and a bisection step otherwise. The bracket is kept
/// around the sign change after every evaluation, so the method cannot
/// diverge.
#[derive(Debug, Clone, Copy, Default)]
pub struct NewtonSafe {
    config: SolverConfig,
}

impl NewtonSafe {
    /// Creates a safeguarded Newton solver with the given configuration.
    #[must_use]
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }
}

impl Solver1D for NewtonSafe {
    fn name(&self) -> &'static str {
        "NewtonSafe"
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

        // Orient the search so that f(xl) < 0.
        let (mut xl, mut xh) = if bracket.fx_min < 0.0 {
            (bracket.x_min, bracket.x_max)
        } else {
            (bracket.x_max, bracket.x_min)
        };

        let mut dx_old = bracket.x_max - bracket.x_min;
        let mut dx = dx_old;

        let mut froot = f.value(root);
        let mut dfroot = f
            .derivative(root)
            .ok_or(MathError::DerivativeRequired { solver: self.name() })?;
        evaluations += 1;

        while evaluations <= self.config.max_evaluations {
            let out_of_range = ((root - xh) * dfroot - froot) * ((root - xl) * dfroot - froot) > 0.0;
            let too_slow = (2.0 * froot).abs() > (dx_old * dfroot).abs();
            if out_of_range || too_slow {
                dx_old = dx;
                dx = (xh - xl) / 2.0;
                root = xl + dx;
            } else {
                dx_old = dx;
                dx = froot / dfroot;
                root -= dx;
            }

            if dx.abs() < accuracy {
                debug!("NewtonSafe: converged to {root} in {evaluations} evaluations");
                return Ok(SolverResult { root, evaluations });
            }

            froot = f.value(root);
            dfroot = f
                .derivative(root)
                .ok_or(MathError::DerivativeRequired { solver: self.name() })?;
            evaluations += 1;

            if froot < 0.0 {
                xl = root;
            } else {
                xh = root;
            }
        }

        Err(MathError::max_evaluations_exceeded(
            self.name(),
            self.config.max_evaluations,
        ))
    }
}
