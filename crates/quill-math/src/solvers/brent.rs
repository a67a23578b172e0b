//! Brent's root-finding algorithm.

use log::debug;

use crate::error::{MathError, MathResult};
use crate::solvers::{sign, Bracket, ObjectiveFunction, Solver1D, SolverConfig, SolverResult};

/// Brent's root-finding algorithm.
///
/// Combines the reliability of bisection with the speed of the secant method
/// and inverse quadratic interpolation. This is generally the best choice
/// when a derivative is not available.
///
/// # Example
///
/// ```rust
/// use quill_math::solvers::{Brent, Solver1D};
///
/// // Find root of x^3 - x - 2
/// let f = |x: f64| x * x * x - x - 2.0;
///
/// let result = Brent::default().solve_in(f, 1e-12, 1.5, 1.0, 2.0).unwrap();
/// assert!(f(result.root).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Brent {
    config: SolverConfig,
}

impl Brent {
    /// Creates a Brent solver with the given configuration.
    #[must_use]
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }
}

impl Solver1D for Brent {
    fn name(&self) -> &'static str {
        "Brent"
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

        let mut root = x_max;
        let mut froot = fx_max;
        let mut d = 0.0;
        let mut e = 0.0;

        while evaluations <= self.config.max_evaluations {
            if (froot > 0.0 && fx_max > 0.0) || (froot < 0.0 && fx_max < 0.0) {
                // Rename so that root and x_max bracket the root.
                x_max = x_min;
                fx_max = fx_min;
                d = root - x_min;
                e = d;
            }
            if fx_max.abs() < froot.abs() {
                x_min = root;
                root = x_max;
                x_max = x_min;
                fx_min = froot;
                froot = fx_max;
                fx_max = fx_min;
            }

            let x_acc1 = 2.0 * f64::EPSILON * root.abs() + 0.5 * accuracy;
            let x_mid = (x_max - root) / 2.0;
            if x_mid.abs() <= x_acc1 || froot == 0.0 {
                debug!("Brent: converged to {root} in {evaluations} evaluations");
                return Ok(SolverResult { root, evaluations });
            }

            if e.abs() >= x_acc1 && fx_min.abs() > froot.abs() {
                // Attempt inverse quadratic interpolation.
                let s = froot / fx_min;
                let mut p;
                let mut q;
                if x_min == x_max {
                    p = 2.0 * x_mid * s;
                    q = 1.0 - s;
                } else {
                    q = fx_min / fx_max;
                    let r = froot / fx_max;
                    p = s * (2.0 * x_mid * q * (q - r) - (root - x_min) * (r - 1.0));
                    q = (q - 1.0) * (r - 1.0) * (s - 1.0);
                }
                if p > 0.0 {
                    q = -q;
                }
                p = p.abs();

                let min1 = 3.0 * x_mid * q - (x_acc1 * q).abs();
                let min2 = (e * q).abs();
                if 2.0 * p < min1.min(min2) {
                    e = d;
                    d = p / q;
                } else {
                    d = x_mid;
                    e = d;
                }
            } else {
                // Bounds decreasing too slowly, use bisection.
                d = x_mid;
                e = d;
            }

            x_min = root;
            fx_min = froot;
            if d.abs() > x_acc1 {
                root += d;
            } else {
                root += sign(x_acc1, x_mid);
            }
            froot = f.value(root);
            evaluations += 1;
        }

        Err(MathError::max_evaluations_exceeded(
            self.name(),
            self.config.max_evaluations,
        ))
    }
}
