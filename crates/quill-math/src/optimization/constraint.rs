//! Admissibility constraints over parameter vectors.

use std::fmt;
use std::sync::Arc;

use crate::error::{MathError, MathResult};

/// Number of step halvings [`Constraint::update`] tries before giving up.
pub const MAX_UPDATE_HALVINGS: usize = 200;

/// Predicate used by [`Constraint::Custom`].
pub type ConstraintPredicate = Arc<dyn Fn(&[f64]) -> bool + Send + Sync>;

/// A restriction on which parameter vectors an optimizer may visit.
///
/// Constraints are evaluated recursively. `Composite` is the only
/// combinator: it accepts a point iff both members accept it.
#[derive(Clone, Default)]
pub enum Constraint {
    /// No constraint was supplied. Accepts everything.
    #[default]
    Null,
    /// Explicitly unconstrained. Accepts everything.
    NoConstraint,
    /// Every component must be strictly positive.
    Positive,
    /// Every component must lie in `[low, high]`.
    Boundary {
        /// Inclusive lower bound.
        low: f64,
        /// Inclusive upper bound.
        high: f64,
    },
    /// An arbitrary predicate on the whole vector.
    Custom(ConstraintPredicate),
    /// Consecutive slices of the vector, each tested by its own constraint.
    ///
    /// The vector length must equal the sum of the block sizes.
    Blocks(Vec<ConstraintBlock>),
    /// Intersection of two constraints.
    Composite(Box<Constraint>, Box<Constraint>),
}

/// One slice of a [`Constraint::Blocks`] constraint.
#[derive(Debug, Clone)]
pub struct ConstraintBlock {
    /// Number of consecutive components covered.
    pub size: usize,
    /// Constraint applied to those components.
    pub constraint: Constraint,
}

impl ConstraintBlock {
    /// Creates a block covering `size` components.
    #[must_use]
    pub fn new(size: usize, constraint: Constraint) -> Self {
        Self { size, constraint }
    }
}

impl Constraint {
    /// Creates a boundary constraint.
    #[must_use]
    pub fn boundary(low: f64, high: f64) -> Self {
        Self::Boundary { low, high }
    }

    /// Creates a constraint from a predicate.
    pub fn custom<F>(predicate: F) -> Self
    where
        F: Fn(&[f64]) -> bool + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(predicate))
    }

    /// Intersects two constraints.
    #[must_use]
    pub fn composite(left: Constraint, right: Constraint) -> Self {
        Self::Composite(Box::new(left), Box::new(right))
    }

    /// Returns true for the "no constraint supplied" sentinel.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Tests whether `params` is admissible.
    #[must_use]
    pub fn test(&self, params: &[f64]) -> bool {
        match self {
            Self::Null | Self::NoConstraint => true,
            Self::Positive => params.iter().all(|&p| p > 0.0),
            Self::Boundary { low, high } => params.iter().all(|&p| p >= *low && p <= *high),
            Self::Custom(predicate) => predicate(params),
            Self::Blocks(blocks) => {
                let total: usize = blocks.iter().map(|b| b.size).sum();
                if total != params.len() {
                    return false;
                }
                let mut offset = 0;
                blocks.iter().all(|block| {
                    let slice = &params[offset..offset + block.size];
                    offset += block.size;
                    block.constraint.test(slice)
                })
            }
            Self::Composite(left, right) => left.test(params) && right.test(params),
        }
    }

    /// Moves `params` by `beta * direction`, halving `beta` until the result
    /// is admissible.
    ///
    /// Returns the step actually taken. `params` is left unchanged on error.
    pub fn update(&self, params: &mut [f64], direction: &[f64], beta: f64) -> MathResult<f64> {
        if params.len() != direction.len() {
            return Err(MathError::DimensionMismatch {
                expected: params.len(),
                actual: direction.len(),
            });
        }

        let mut step = beta;
        let mut trial: Vec<f64> = shifted(params, direction, step);
        let mut halvings = 0;
        while !self.test(&trial) {
            if halvings >= MAX_UPDATE_HALVINGS {
                return Err(MathError::ConstraintUpdateFailed { attempts: halvings });
            }
            step *= 0.5;
            halvings += 1;
            trial = shifted(params, direction, step);
        }

        params.copy_from_slice(&trial);
        Ok(step)
    }
}

fn shifted(params: &[f64], direction: &[f64], step: f64) -> Vec<f64> {
    params
        .iter()
        .zip(direction)
        .map(|(p, d)| p + step * d)
        .collect()
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::NoConstraint => f.write_str("NoConstraint"),
            Self::Positive => f.write_str("Positive"),
            Self::Boundary { low, high } => f
                .debug_struct("Boundary")
                .field("low", low)
                .field("high", high)
                .finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
            Self::Blocks(blocks) => f.debug_tuple("Blocks").field(blocks).finish(),
            Self::Composite(left, right) => {
                f.debug_tuple("Composite").field(left).field(right).finish()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_null_and_no_constraint_accept_everything() {
        assert!(Constraint::Null.is_null());
        assert!(!Constraint::NoConstraint.is_null());
        assert!(Constraint::Null.test(&[-1e300, f64::INFINITY]));
        assert!(Constraint::NoConstraint.test(&[-1.0]));
        assert!(Constraint::default().is_null());
    }

    #[test]
    fn test_positive_and_boundary() {
        assert!(Constraint::Positive.test(&[0.1, 2.0]));
        assert!(!Constraint::Positive.test(&[0.1, 0.0]));

        let boundary = Constraint::boundary(-1.0, 1.0);
        assert!(boundary.test(&[-1.0, 0.0, 1.0]));
        assert!(!boundary.test(&[1.5]));
    }

    #[test]
    fn test_composite_truth_table() {
        // A: x > 0, B: x < 1
        let a = Constraint::Positive;
        let b = Constraint::custom(|x| x.iter().all(|&v| v < 1.0));
        let both = Constraint::composite(a.clone(), b.clone());

        // Accepted by neither is impossible for this pair; use a pair that allows it.
        let c = Constraint::boundary(5.0, 6.0);
        let d = Constraint::boundary(10.0, 11.0);
        let disjoint = Constraint::composite(c.clone(), d.clone());
        assert!(!c.test(&[0.0]) && !d.test(&[0.0]));
        assert!(!disjoint.test(&[0.0]));

        // Accepted by exactly one.
        assert!(a.test(&[2.0]) && !b.test(&[2.0]));
        assert!(!both.test(&[2.0]));
        assert!(!a.test(&[-2.0]) && b.test(&[-2.0]));
        assert!(!both.test(&[-2.0]));

        // Accepted by both.
        assert!(a.test(&[0.5]) && b.test(&[0.5]));
        assert!(both.test(&[0.5]));
    }

    #[test]
    fn test_blocks_apply_to_slices() {
        let constraint = Constraint::Blocks(vec![
            ConstraintBlock::new(1, Constraint::Positive),
            ConstraintBlock::new(2, Constraint::boundary(0.0, 1.0)),
        ]);

        assert!(constraint.test(&[3.0, 0.2, 0.8]));
        assert!(!constraint.test(&[-3.0, 0.2, 0.8]));
        assert!(!constraint.test(&[3.0, 0.2, 1.8]));
        // Wrong length is never admissible.
        assert!(!constraint.test(&[3.0, 0.2]));
        assert!(!constraint.test(&[3.0, 0.2, 0.8, 0.1]));
    }

    #[test]
    fn test_update_takes_full_step_when_admissible() {
        let mut params = vec![1.0, 1.0];
        let step = Constraint::Positive
            .update(&mut params, &[-0.5, 0.5], 1.0)
            .unwrap();

        assert_relative_eq!(step, 1.0);
        assert_relative_eq!(params[0], 0.5);
        assert_relative_eq!(params[1], 1.5);
    }

    #[test]
    fn test_update_halves_until_admissible() {
        let mut params = vec![1.0];
        let step = Constraint::Positive.update(&mut params, &[-1.0], 4.0).unwrap();

        // 4 -> 2 -> 1 -> 0.5 is the first step keeping the point positive.
        assert_relative_eq!(step, 0.5);
        assert_relative_eq!(params[0], 0.5);
    }

    #[test]
    fn test_update_fails_from_inadmissible_point() {
        let mut params = vec![-1.0];
        let result = Constraint::Positive.update(&mut params, &[-1.0], 1.0);

        assert_eq!(
            result,
            Err(MathError::ConstraintUpdateFailed {
                attempts: MAX_UPDATE_HALVINGS
            })
        );
        assert_relative_eq!(params[0], -1.0);
    }

    proptest! {
        #[test]
        fn prop_composite_is_intersection(
            x in -10.0f64..10.0,
            low_a in -10.0f64..0.0,
            high_a in 0.0f64..10.0,
            low_b in -10.0f64..0.0,
            high_b in 0.0f64..10.0,
        ) {
            let a = Constraint::boundary(low_a, high_a);
            let b = Constraint::boundary(low_b, high_b);
            let composite = Constraint::composite(a.clone(), b.clone());

            prop_assert_eq!(composite.test(&[x]), a.test(&[x]) && b.test(&[x]));
        }
    }
}
