//! # Quill Math
//!
//! Numerical core of the Quill calibration library.
//!
//! This crate provides:
//!
//! - **Solvers**: One-dimensional bracketing root finders sharing a common
//!   contract (Bisection, Brent, False Position, Newton, Safe Newton,
//!   Ridder, Secant)
//! - **Optimization**: Constraints, cost functions, end criteria and
//!   multidimensional minimizers (Nelder-Mead simplex, steepest descent)
//!
//! ## Design Philosophy
//!
//! - **Shared contracts**: every solver brackets, counts evaluations and
//!   fails the same way; every optimizer iterates, evaluates and checks its
//!   end criteria the same way
//! - **Reproducibility**: classical formulations are kept as they are,
//!   including their known numerical hazards

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::float_cmp)]
#![allow(clippy::unreadable_literal)]

pub mod error;
pub mod optimization;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::optimization::{
        Constraint, ConstraintBlock, CostFunction, EndCriteria, EndCriteriaType,
        OptimizationMethod, OptimizationResult, Problem, Simplex, SteepestDescent,
    };
    pub use crate::solvers::{
        Bisection, Brent, FalsePosition, Newton, NewtonSafe, ObjectiveFunction, Ridder, Secant,
        Solver1D, SolverConfig, SolverResult, WithDerivative,
    };
}

pub use error::{MathError, MathResult};
