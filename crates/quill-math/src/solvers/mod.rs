//! One-dimensional root-finding algorithms.
//!
//! Every solver implements [`Solver1D`], which supplies the shared part of
//! the contract:
//!
//! - [`Solver1D::solve`] searches for a bracket around an initial guess by
//!   geometric expansion, then hands over to the strategy;
//! - [`Solver1D::solve_in`] validates a caller-supplied bracket, then hands
//!   over to the strategy;
//! - every function evaluation is counted against
//!   [`SolverConfig::max_evaluations`] and exhausting the budget fails with
//!   [`MathError::MaxEvaluationsExceeded`].
//!
//! The strategies themselves only implement [`Solver1D::solve_bracketed`]:
//!
//! | Solver | Convergence | Requires |
//! |--------|-------------|----------|
//! | [`Bisection`] | Linear | Bracket |
//! | [`FalsePosition`] | Linear to superlinear | Bracket |
//! | [`Ridder`] | Quadratic | Bracket |
//! | [`Brent`] | Superlinear | Bracket |
//! | [`Secant`] | Superlinear, may leave the bracket | Bracket |
//! | [`Newton`] | Quadratic, fails if it leaves the bracket | Bracket + derivative |
//! | [`NewtonSafe`] | Quadratic with bisection fallback | Bracket + derivative |
//!
//! # Example
//!
//! ```rust
//! use quill_math::solvers::{Brent, Solver1D};
//!
//! let solver = Brent::default();
//! let result = solver.solve(|x: f64| x * x - 2.0, 1e-12, 1.0, 0.5).unwrap();
//! assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-10);
//! ```

mod bisection;
mod brent;
mod false_position;
mod newton;
mod newton_safe;
mod ridder;
mod secant;

pub use bisection::Bisection;
pub use brent::Brent;
pub use false_position::FalsePosition;
pub use newton::Newton;
pub use newton_safe::NewtonSafe;
pub use ridder::Ridder;
pub use secant::Secant;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{MathError, MathResult};

/// Default maximum number of function evaluations.
pub const DEFAULT_MAX_EVALUATIONS: usize = 100;

/// Expansion factor used while searching for a bracket.
pub const BRACKET_GROWTH_FACTOR: f64 = 1.6;

/// Configuration shared by all one-dimensional solvers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Maximum number of function evaluations.
    pub max_evaluations: usize,
    /// Enforced lower bound on the abscissa, if any.
    pub lower_bound: Option<f64>,
    /// Enforced upper bound on the abscissa, if any.
    pub upper_bound: Option<f64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_evaluations: DEFAULT_MAX_EVALUATIONS,
            lower_bound: None,
            upper_bound: None,
        }
    }
}

impl SolverConfig {
    /// Creates a configuration with the given evaluation budget and no bounds.
    #[must_use]
    pub fn new(max_evaluations: usize) -> Self {
        Self {
            max_evaluations,
            ..Self::default()
        }
    }

    /// Sets the maximum number of function evaluations.
    #[must_use]
    pub fn with_max_evaluations(mut self, max_evaluations: usize) -> Self {
        self.max_evaluations = max_evaluations;
        self
    }

    /// Enforces a lower bound on every abscissa the solver tries.
    #[must_use]
    pub fn with_lower_bound(mut self, lower_bound: f64) -> Self {
        self.lower_bound = Some(lower_bound);
        self
    }

    /// Enforces an upper bound on every abscissa the solver tries.
    #[must_use]
    pub fn with_upper_bound(mut self, upper_bound: f64) -> Self {
        self.upper_bound = Some(upper_bound);
        self
    }

    /// Clamps `x` to the enforced bounds.
    #[must_use]
    pub fn enforce_bounds(&self, x: f64) -> f64 {
        let x = match self.lower_bound {
            Some(lower) if x < lower => lower,
            _ => x,
        };
        match self.upper_bound {
            Some(upper) if x > upper => upper,
            _ => x,
        }
    }
}

/// Result of a root-finding run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverResult {
    /// The root found.
    pub root: f64,
    /// Number of function evaluations used, bracketing included.
    pub evaluations: usize,
}

/// Bracket state handed to a strategy.
///
/// On entry `fx_min` and `fx_max` have opposite signs and `evaluations`
/// already counts the evaluations spent establishing them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    /// Lower end of the bracket.
    pub x_min: f64,
    /// Upper end of the bracket.
    pub x_max: f64,
    /// Function value at `x_min`.
    pub fx_min: f64,
    /// Function value at `x_max`.
    pub fx_max: f64,
    /// Current root estimate.
    pub root: f64,
    /// Function evaluations spent so far.
    pub evaluations: usize,
}

/// A function whose root is sought, optionally with its derivative.
///
/// Any `FnMut(f64) -> f64` closure is an objective without derivative;
/// wrap a pair of closures in [`WithDerivative`] to supply one.
pub trait ObjectiveFunction {
    /// Evaluates the function.
    fn value(&mut self, x: f64) -> f64;

    /// Evaluates the derivative, if the objective provides one.
    fn derivative(&mut self, _x: f64) -> Option<f64> {
        None
    }
}

impl<F> ObjectiveFunction for F
where
    F: FnMut(f64) -> f64,
{
    fn value(&mut self, x: f64) -> f64 {
        self(x)
    }
}

/// An objective function paired with its analytic derivative.
#[derive(Debug, Clone, Copy)]
pub struct WithDerivative<F, D> {
    f: F,
    df: D,
}

impl<F, D> WithDerivative<F, D>
where
    F: FnMut(f64) -> f64,
    D: FnMut(f64) -> f64,
{
    /// Pairs `f` with its derivative `df`.
    pub fn new(f: F, df: D) -> Self {
        Self { f, df }
    }
}

impl<F, D> ObjectiveFunction for WithDerivative<F, D>
where
    F: FnMut(f64) -> f64,
    D: FnMut(f64) -> f64,
{
    fn value(&mut self, x: f64) -> f64 {
        (self.f)(x)
    }

    fn derivative(&mut self, x: f64) -> Option<f64> {
        Some((self.df)(x))
    }
}

/// Contract shared by the one-dimensional solvers.
pub trait Solver1D {
    /// Returns the name of the solver, used in diagnostics.
    fn name(&self) -> &'static str;

    /// Returns the solver configuration.
    fn config(&self) -> &SolverConfig;

    /// Runs the strategy on an established bracket.
    ///
    /// `accuracy` has already been floored at machine epsilon.
    fn solve_bracketed<F>(
        &self,
        f: &mut F,
        accuracy: f64,
        bracket: Bracket,
    ) -> MathResult<SolverResult>
    where
        F: ObjectiveFunction;

    /// Finds a root starting from `guess`, searching for a bracket first.
    ///
    /// The search evaluates `f` at `guess` and at `guess ± step`, then keeps
    /// expanding the side with the smaller `|f|` by a factor of 1.6 until a
    /// sign change is found or the evaluation budget runs out.
    fn solve<F>(&self, mut f: F, accuracy: f64, guess: f64, step: f64) -> MathResult<SolverResult>
    where
        F: ObjectiveFunction,
    {
        let config = self.config();
        let accuracy = accuracy.max(f64::EPSILON);

        let mut fx_max = f.value(guess);
        if fx_max == 0.0 {
            return Ok(SolverResult {
                root: guess,
                evaluations: 1,
            });
        }

        let mut x_min;
        let mut fx_min;
        let mut x_max;
        if fx_max > 0.0 {
            x_min = config.enforce_bounds(guess - step);
            fx_min = f.value(x_min);
            x_max = guess;
        } else {
            x_min = guess;
            fx_min = fx_max;
            x_max = config.enforce_bounds(guess + step);
            fx_max = f.value(x_max);
        }

        let mut evaluations = 2;
        while evaluations <= config.max_evaluations {
            if fx_min * fx_max <= 0.0 {
                if fx_min == 0.0 {
                    return Ok(SolverResult {
                        root: x_min,
                        evaluations,
                    });
                }
                if fx_max == 0.0 {
                    return Ok(SolverResult {
                        root: x_max,
                        evaluations,
                    });
                }
                debug!(
                    "{}: bracketed root in [{x_min}, {x_max}] after {evaluations} evaluations",
                    self.name()
                );
                let bracket = Bracket {
                    x_min,
                    x_max,
                    fx_min,
                    fx_max,
                    root: (x_min + x_max) / 2.0,
                    evaluations,
                };
                return self.solve_bracketed(&mut f, accuracy, bracket);
            }

            if fx_min.abs() < fx_max.abs() {
                x_min = config.enforce_bounds(x_min + BRACKET_GROWTH_FACTOR * (x_min - x_max));
                fx_min = f.value(x_min);
            } else {
                x_max = config.enforce_bounds(x_max + BRACKET_GROWTH_FACTOR * (x_max - x_min));
                fx_max = f.value(x_max);
            }
            evaluations += 1;
        }

        Err(MathError::BracketNotFound {
            max_evaluations: config.max_evaluations,
            x_min,
            x_max,
            fx_min,
            fx_max,
        })
    }

    /// Finds a root inside `[x_min, x_max]`, starting from `guess`.
    ///
    /// The function values at the two ends must have opposite signs unless
    /// one of them is exactly zero, in which case that end is returned.
    fn solve_in<F>(
        &self,
        mut f: F,
        accuracy: f64,
        guess: f64,
        x_min: f64,
        x_max: f64,
    ) -> MathResult<SolverResult>
    where
        F: ObjectiveFunction,
    {
        let config = self.config();
        let accuracy = accuracy.max(f64::EPSILON);

        if x_min >= x_max {
            return Err(MathError::InvalidRange { x_min, x_max });
        }
        if let Some(bound) = config.lower_bound {
            if x_min < bound {
                return Err(MathError::OutOfBounds {
                    side: "lower",
                    value: x_min,
                    bound,
                });
            }
        }
        if let Some(bound) = config.upper_bound {
            if x_max > bound {
                return Err(MathError::OutOfBounds {
                    side: "upper",
                    value: x_max,
                    bound,
                });
            }
        }

        let fx_min = f.value(x_min);
        if fx_min == 0.0 {
            return Ok(SolverResult {
                root: x_min,
                evaluations: 1,
            });
        }
        let fx_max = f.value(x_max);
        if fx_max == 0.0 {
            return Ok(SolverResult {
                root: x_max,
                evaluations: 2,
            });
        }

        if fx_min * fx_max > 0.0 {
            return Err(MathError::InvalidBracket {
                a: x_min,
                b: x_max,
                fa: fx_min,
                fb: fx_max,
            });
        }
        if guess <= x_min || guess >= x_max {
            return Err(MathError::GuessNotBracketed {
                guess,
                x_min,
                x_max,
            });
        }

        let bracket = Bracket {
            x_min,
            x_max,
            fx_min,
            fx_max,
            root: guess,
            evaluations: 2,
        };
        self.solve_bracketed(&mut f, accuracy, bracket)
    }
}

/// Transfers the sign of `b` to the magnitude of `a`.
pub(crate) fn sign(a: f64, b: f64) -> f64 {
    if b >= 0.0 {
        a.abs()
    } else {
        -a.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use std::f64::consts::SQRT_2;

    #[test]
    fn test_solver_config() {
        let config = SolverConfig::default()
            .with_max_evaluations(50)
            .with_lower_bound(0.0)
            .with_upper_bound(1.0);

        assert_eq!(config.max_evaluations, 50);
        assert_relative_eq!(config.enforce_bounds(-0.5), 0.0);
        assert_relative_eq!(config.enforce_bounds(1.5), 1.0);
        assert_relative_eq!(config.enforce_bounds(0.25), 0.25);
    }

    #[test]
    fn test_all_solvers_find_sqrt_2() {
        let accuracy = 1e-10;
        let f = |x: f64| x * x - 2.0;

        let roots = [
            Bisection::default().solve(f, accuracy, 1.0, 0.1).unwrap().root,
            Brent::default().solve(f, accuracy, 1.0, 0.1).unwrap().root,
            FalsePosition::default().solve(f, accuracy, 1.0, 0.1).unwrap().root,
            Ridder::default().solve(f, accuracy, 1.0, 0.1).unwrap().root,
            Secant::default().solve(f, accuracy, 1.0, 0.1).unwrap().root,
            Newton::default()
                .solve(WithDerivative::new(f, |x: f64| 2.0 * x), accuracy, 1.0, 0.1)
                .unwrap()
                .root,
            NewtonSafe::default()
                .solve(WithDerivative::new(f, |x: f64| 2.0 * x), accuracy, 1.0, 0.1)
                .unwrap()
                .root,
        ];

        for root in roots {
            assert_relative_eq!(root, SQRT_2, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_bracket_search_expands_downwards() {
        // Root far below the guess: the lower end must be pushed out repeatedly.
        let result = Brent::default()
            .solve(|x: f64| x + 10.0, 1e-12, 5.0, 0.5)
            .unwrap();

        assert_relative_eq!(result.root, -10.0, epsilon = 1e-10);
        assert!(result.evaluations > 3);
    }

    #[test]
    fn test_bracket_search_respects_bounds() {
        // No root above zero: with a lower bound of zero the search cannot succeed.
        let solver = Brent::new(SolverConfig::new(30).with_lower_bound(0.0));
        let result = solver.solve(|x: f64| x + 1.0, 1e-12, 2.0, 0.5);

        assert!(matches!(
            result,
            Err(MathError::BracketNotFound {
                max_evaluations: 30,
                ..
            })
        ));
    }

    #[test]
    fn test_guess_is_root() {
        let result = Bisection::default()
            .solve(|x: f64| x - 3.0, 1e-12, 3.0, 1.0)
            .unwrap();

        assert_relative_eq!(result.root, 3.0);
        assert_eq!(result.evaluations, 1);
    }

    #[test]
    fn test_solve_in_rejects_invalid_range() {
        let result = Brent::default().solve_in(|x: f64| x, 1e-10, 0.0, 1.0, -1.0);
        assert!(matches!(result, Err(MathError::InvalidRange { .. })));
    }

    #[test]
    fn test_solve_in_rejects_unbracketed_root() {
        let result = Brent::default().solve_in(|x: f64| x * x - 2.0, 1e-10, 2.5, 2.0, 3.0);
        assert!(matches!(result, Err(MathError::InvalidBracket { .. })));
    }

    #[test]
    fn test_solve_in_rejects_guess_outside() {
        let result = Brent::default().solve_in(|x: f64| x * x - 2.0, 1e-10, 5.0, 1.0, 2.0);
        assert!(matches!(result, Err(MathError::GuessNotBracketed { .. })));
    }

    #[test]
    fn test_solve_in_rejects_range_beyond_enforced_bound() {
        let solver = Bisection::new(SolverConfig::default().with_upper_bound(1.5));
        let result = solver.solve_in(|x: f64| x * x - 2.0, 1e-10, 1.2, 1.0, 2.0);
        assert!(matches!(
            result,
            Err(MathError::OutOfBounds { side: "upper", .. })
        ));
    }

    #[test]
    fn test_solve_in_returns_endpoint_root() {
        let result = Ridder::default()
            .solve_in(|x: f64| x - 1.0, 1e-10, 0.5, 0.0, 1.0)
            .unwrap();

        assert_relative_eq!(result.root, 1.0);
        assert_eq!(result.evaluations, 2);
    }

    #[test]
    fn test_sign() {
        assert_relative_eq!(sign(3.0, -1.0), -3.0);
        assert_relative_eq!(sign(-3.0, 2.0), 3.0);
        assert_relative_eq!(sign(-3.0, 0.0), 3.0);
    }

    proptest! {
        #[test]
        fn prop_bracketing_solvers_find_linear_roots(
            slope in 0.1f64..10.0,
            target in -50.0f64..50.0,
        ) {
            let f = |x: f64| slope * (x - target);
            let accuracy = 1e-9;

            let brent = Brent::default().solve(f, accuracy, 0.0, 1.0).unwrap();
            let bisection = Bisection::default().solve(f, accuracy, 0.0, 1.0).unwrap();
            let ridder = Ridder::default().solve(f, accuracy, 0.0, 1.0).unwrap();

            prop_assert!((brent.root - target).abs() < 1e-6);
            prop_assert!((bisection.root - target).abs() < 1e-6);
            prop_assert!((ridder.root - target).abs() < 1e-6);
        }
    }
}
