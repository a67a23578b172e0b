//! Quill Configuration Layer
//!
//! Configuration management for the Quill calibration library: which
//! minimizer to run, when it should stop, how gradients are approximated and
//! which root finder one-dimensional sub-problems use.
//!
//! # Features
//!
//! - **Optimizer selection**: Nelder-Mead simplex or steepest descent
//! - **Termination**: iteration budgets and tolerances
//! - **Root finders**: algorithm, accuracy, evaluation budget and bounds
//! - **Loading**: JSON and TOML, validated on load
//! - **Registry**: named configurations with read-only standard entries
//!
//! # Example
//!
//! ```rust
//! use quill_config::{CalibrationConfig, ConfigRegistry};
//!
//! let registry = ConfigRegistry::new();
//! let config = registry.get("SIMPLEX.HIGH_PRECISION").unwrap();
//!
//! let method = config.build_method();
//! assert_eq!(method.name(), "Simplex");
//!
//! let json = config.to_json_string().unwrap();
//! assert_eq!(CalibrationConfig::from_json_str(&json).unwrap(), config);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod calibration;
pub mod error;
pub mod optimizer;
pub mod registry;
pub mod solver;

pub use calibration::CalibrationConfig;
pub use error::{ConfigError, ConfigResult, Validate, ValidationError};
pub use optimizer::{EndCriteriaConfig, OptimizerConfig};
pub use registry::ConfigRegistry;
pub use solver::{SolverKind, SolverSettings};
