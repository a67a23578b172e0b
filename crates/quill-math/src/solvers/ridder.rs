//! Ridder's root-finding algorithm.

use log::debug;

use crate::error::{MathError, MathResult};
use crate::solvers::{sign, Bracket, ObjectiveFunction, Solver1D, SolverConfig, SolverResult};

/// Ridder's root-finding algorithm.
///
/// Evaluates the midpoint of the bracket, fits an exponential through the
/// three points and takes the root of the fitted function as the next
/// estimate. The bracket is re-established around the sign change after
/// every step.
///
/// The requested accuracy is tightened by a factor of 100: the stopping test
/// on successive estimates is otherwise looser than the accuracy promised.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ridder {
    config: SolverConfig,
}

impl Ridder {
    /// Creates a Ridder solver with the given configuration.
    #[must_use]
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }
}

impl Solver1D for Ridder {
    fn name(&self) -> &'static str {
        "Ridder"
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
            mut x_min,
            mut x_max,
            mut fx_min,
            mut fx_max,
            mut evaluations,
            ..
        } = bracket;

        let accuracy = accuracy / 100.0;
        let mut root = f64::MIN;

        while evaluations <= self.config.max_evaluations {
            let x_mid = 0.5 * (x_min + x_max);
            let fx_mid = f.value(x_mid);
            evaluations += 1;

            let s = (fx_mid * fx_mid - fx_min * fx_max).sqrt();
            if s == 0.0 {
                return Ok(SolverResult { root, evaluations });
            }

            let direction = if fx_min >= fx_max { 1.0 } else { -1.0 };
            let next_root = x_mid + (x_mid - x_min) * (direction * fx_mid / s);
            if (next_root - root).abs() <= accuracy {
                debug!("Ridder: converged to {root} in {evaluations} evaluations");
                return Ok(SolverResult { root, evaluations });
            }

            root = next_root;
            let froot = f.value(root);
            evaluations += 1;
            if froot == 0.0 {
                return Ok(SolverResult { root, evaluations });
            }

            // Keep the sign change inside the bracket.
            if sign(fx_mid, froot) != fx_mid {
                x_min = x_mid;
                fx_min = fx_mid;
                x_max = root;
                fx_max = froot;
            } else if sign(fx_min, froot) != fx_min {
                x_max = root;
                fx_max = froot;
            } else {
                x_min = root;
                fx_min = froot;
            }

            if (x_max - x_min).abs() <= accuracy {
                debug!("Ridder: bracket collapsed at {root} after {evaluations} evaluations");
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

    #[test]
    fn test_exponential() {
        let f = |x: f64| x.exp() - 10.0;

        let result = Ridder::default().solve_in(f, 1e-10, 2.0, 0.0, 5.0).unwrap();

        assert_relative_eq!(result.root, 10.0_f64.ln(), epsilon = 1e-10);
    }

    #[test]
    fn test_decreasing_function() {
        let f = |x: f64| 0.5 - x.tanh();

        let result = Ridder::default().solve_in(f, 1e-10, 0.2, -1.0, 3.0).unwrap();

        assert_relative_eq!(result.root, 0.5_f64.atanh(), epsilon = 1e-10);
    }

    #[test]
    fn test_max_evaluations() {
        let f = |x: f64| x.exp() - 10.0;

        let result = Ridder::new(SolverConfig::new(3)).solve_in(f, 1e-10, 2.0, 0.0, 5.0);

        assert!(matches!(
            result,
            Err(MathError::MaxEvaluationsExceeded { solver: "Ridder", .. })
        ));
    }
}
