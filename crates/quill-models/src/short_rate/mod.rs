//! One-factor short-rate models.
//!
//! Short-rate models price zero-coupon bonds and options on them in closed
//! form, which makes them cheap to calibrate: every helper evaluation is a
//! handful of exponentials.
//!
//! Available models:
//! - [`Vasicek`]: mean-reverting Gaussian short rate
//!
//! Available helpers:
//! - [`DiscountBondHelper`]: zero-coupon bond price
//! - [`BondOptionHelper`]: European option on a zero-coupon bond

mod helpers;
mod vasicek;

pub use helpers::{BondOptionHelper, DiscountBondHelper};
pub use vasicek::Vasicek;

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::{ModelError, ModelResult};
use crate::model::CalibratedModel;

/// Call or put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptionKind {
    /// Right to buy.
    Call,
    /// Right to sell.
    Put,
}

/// A calibratable one-factor short-rate model.
pub trait ShortRateModel: CalibratedModel {
    /// Price at time `now` of a zero-coupon bond maturing at `maturity`,
    /// given the short rate `rate` at `now`.
    fn discount_bond(&self, now: f64, maturity: f64, rate: f64) -> f64;

    /// Price today of a zero-coupon bond maturing at `t`.
    fn discount(&self, t: f64) -> f64;

    /// Price today of a European option expiring at `maturity` on a
    /// zero-coupon bond maturing at `bond_maturity`.
    fn discount_bond_option(
        &self,
        kind: OptionKind,
        strike: f64,
        maturity: f64,
        bond_maturity: f64,
    ) -> ModelResult<f64>;
}

/// Undiscounted Black price of an option on `forward` with total standard
/// deviation `std_dev`.
pub(crate) fn black_formula(
    kind: OptionKind,
    strike: f64,
    forward: f64,
    std_dev: f64,
) -> ModelResult<f64> {
    if strike <= 0.0 || forward <= 0.0 {
        return Err(ModelError::invalid_parameter(format!(
            "Black formula needs positive strike and forward, got {strike} and {forward}"
        )));
    }
    if std_dev < 0.0 {
        return Err(ModelError::invalid_parameter(format!(
            "negative standard deviation {std_dev}"
        )));
    }
    if std_dev == 0.0 {
        return Ok(match kind {
            OptionKind::Call => (forward - strike).max(0.0),
            OptionKind::Put => (strike - forward).max(0.0),
        });
    }

    let normal = Normal::new(0.0, 1.0).map_err(|e| ModelError::invalid_parameter(e.to_string()))?;
    let d1 = (forward / strike).ln() / std_dev + 0.5 * std_dev;
    let d2 = d1 - std_dev;
    Ok(match kind {
        OptionKind::Call => forward * normal.cdf(d1) - strike * normal.cdf(d2),
        OptionKind::Put => strike * normal.cdf(-d2) - forward * normal.cdf(-d1),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_black_formula_parity() {
        let (strike, forward, std_dev) = (0.95, 0.97, 0.02);
        let call = black_formula(OptionKind::Call, strike, forward, std_dev).unwrap();
        let put = black_formula(OptionKind::Put, strike, forward, std_dev).unwrap();

        assert_relative_eq!(call - put, forward - strike, epsilon = 1e-12);
    }

    #[test]
    fn test_black_formula_zero_volatility() {
        assert_relative_eq!(
            black_formula(OptionKind::Call, 0.9, 0.95, 0.0).unwrap(),
            0.05,
            epsilon = 1e-15
        );
        assert_relative_eq!(black_formula(OptionKind::Put, 0.9, 0.95, 0.0).unwrap(), 0.0);
    }

    #[test]
    fn test_black_formula_rejects_bad_inputs() {
        assert!(black_formula(OptionKind::Call, 0.0, 0.95, 0.1).is_err());
        assert!(black_formula(OptionKind::Call, 0.9, 0.95, -0.1).is_err());
    }
}
