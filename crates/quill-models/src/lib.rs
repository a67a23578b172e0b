//! # Quill Models
//!
//! Parameterised models and their calibration for the Quill library.
//!
//! This crate provides:
//!
//! - **Parameters**: named, constrained groups of scalars ([`Parameter`])
//! - **Models**: the [`CalibratedModel`] capability, which flattens a model's
//!   parameters into a single vector and calibrates them to market helpers
//! - **Calibration**: the root-sum-of-squares [`CalibrationFunction`] handed
//!   to a `quill-math` optimizer
//! - **Short-rate models**: [`short_rate::Vasicek`] with zero-coupon bond and
//!   bond option helpers
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use quill_math::optimization::{EndCriteria, Simplex};
//! use quill_models::prelude::*;
//! use quill_models::short_rate::{DiscountBondHelper, ShortRateModel, Vasicek};
//!
//! let context = EvaluationContext::new(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
//! let target = Vasicek::new(0.1, 0.05, 0.01, 0.03);
//!
//! let helpers: Vec<Box<dyn CalibrationHelper<Vasicek>>> = [2025, 2027, 2029, 2034]
//!     .into_iter()
//!     .map(|year| {
//!         let maturity = NaiveDate::from_ymd_opt(year, 1, 2).unwrap();
//!         let price = target.discount(context.year_fraction(maturity));
//!         Box::new(DiscountBondHelper::new(maturity, price)) as Box<dyn CalibrationHelper<Vasicek>>
//!     })
//!     .collect();
//!
//! let mut model = Vasicek::new(0.15, 0.04, 0.01, 0.02);
//! let mut method = Simplex::new(0.01, EndCriteria::default());
//! let result = model.calibrate(&helpers, &mut method, None, &context).unwrap();
//!
//! assert!(result.value < 1e-3);
//! ```

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
#![allow(clippy::float_cmp)]

pub mod calibration;
pub mod context;
pub mod error;
pub mod model;
pub mod parameter;
pub mod short_rate;

pub use calibration::{CalibrationFunction, DEFAULT_CALIBRATION_EPSILON};
pub use context::EvaluationContext;
pub use error::{ModelError, ModelResult};
pub use model::{CalibratedModel, CalibrationHelper};
pub use parameter::{Parameter, ParameterKind};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::calibration::CalibrationFunction;
    pub use crate::context::EvaluationContext;
    pub use crate::error::{ModelError, ModelResult};
    pub use crate::model::{CalibratedModel, CalibrationHelper};
    pub use crate::parameter::{Parameter, ParameterKind};
    pub use crate::short_rate::{OptionKind, ShortRateModel};
}
