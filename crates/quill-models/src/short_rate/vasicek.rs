//! Vasicek one-factor short rate model.
//!
//! The Vasicek model is defined by:
//!
//! ```text
//! dr = a(b - r)dt + σ*dW
//! ```
//!
//! Where:
//! - `a` = mean reversion speed
//! - `b` = long-run mean of the short rate
//! - `σ` = volatility
//! - `r0` = short rate today
//!
//! Zero-coupon bonds are affine in the short rate,
//! `P(t,T) = A(t,T) * exp(-B(t,T) * r(t))`, and options on them have a
//! Black-type closed form.

use quill_math::optimization::Constraint;

use super::{black_formula, OptionKind, ShortRateModel};
use crate::error::ModelResult;
use crate::model::CalibratedModel;
use crate::parameter::Parameter;

const A: usize = 0;
const B: usize = 1;
const SIGMA: usize = 2;
const R0: usize = 3;

/// Vasicek short rate model.
///
/// Four constant parameter groups, flattened in the order `a`, `b`,
/// `sigma`, `r0`. `a` and `sigma` must stay strictly positive.
///
/// # Example
///
/// ```rust
/// use quill_models::short_rate::{ShortRateModel, Vasicek};
///
/// let model = Vasicek::new(0.1, 0.05, 0.01, 0.03);
/// let five_year = model.discount(5.0);
/// assert!(five_year > 0.0 && five_year < 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct Vasicek {
    arguments: Vec<Parameter>,
}

impl Vasicek {
    /// Creates a Vasicek model.
    ///
    /// # Arguments
    ///
    /// * `a` - Mean reversion speed
    /// * `b` - Long-run mean of the short rate
    /// * `sigma` - Short rate volatility
    /// * `r0` - Short rate today
    #[must_use]
    pub fn new(a: f64, b: f64, sigma: f64, r0: f64) -> Self {
        Self {
            arguments: vec![
                Parameter::constant("a", a, Constraint::Positive),
                Parameter::constant("b", b, Constraint::NoConstraint),
                Parameter::constant("sigma", sigma, Constraint::Positive),
                Parameter::constant("r0", r0, Constraint::NoConstraint),
            ],
        }
    }

    /// Mean reversion speed.
    pub fn a(&self) -> f64 {
        self.arguments[A].value(0.0)
    }

    /// Long-run mean.
    pub fn b(&self) -> f64 {
        self.arguments[B].value(0.0)
    }

    /// Volatility.
    pub fn sigma(&self) -> f64 {
        self.arguments[SIGMA].value(0.0)
    }

    /// Short rate today.
    pub fn r0(&self) -> f64 {
        self.arguments[R0].value(0.0)
    }

    /// B(t,T) = (1 - exp(-a*(T-t))) / a
    fn b_factor(&self, t: f64, maturity: f64) -> f64 {
        let a = self.a();
        let tau = maturity - t;
        if a < f64::EPSILON.sqrt() {
            tau
        } else {
            (1.0 - (-a * tau).exp()) / a
        }
    }

    /// A(t,T) = exp((b - σ²/(2a²)) * (B - (T-t)) - σ² B² / (4a))
    fn a_factor(&self, t: f64, maturity: f64) -> f64 {
        let a = self.a();
        let sigma2 = self.sigma() * self.sigma();
        let tau = maturity - t;
        let bt = self.b_factor(t, maturity);
        if a < f64::EPSILON.sqrt() {
            // Zero mean reversion: Gaussian random walk.
            return (sigma2 * tau * tau * tau / 6.0).exp();
        }
        ((self.b() - 0.5 * sigma2 / (a * a)) * (bt - tau) - 0.25 * sigma2 * bt * bt / a).exp()
    }
}

impl CalibratedModel for Vasicek {
    fn arguments(&self) -> &[Parameter] {
        &self.arguments
    }

    fn arguments_mut(&mut self) -> &mut [Parameter] {
        &mut self.arguments
    }
}

impl ShortRateModel for Vasicek {
    fn discount_bond(&self, now: f64, maturity: f64, rate: f64) -> f64 {
        self.a_factor(now, maturity) * (-self.b_factor(now, maturity) * rate).exp()
    }

    fn discount(&self, t: f64) -> f64 {
        self.discount_bond(0.0, t, self.r0())
    }

    fn discount_bond_option(
        &self,
        kind: OptionKind,
        strike: f64,
        maturity: f64,
        bond_maturity: f64,
    ) -> ModelResult<f64> {
        let a = self.a();
        let v = if maturity.abs() < f64::EPSILON {
            0.0
        } else if a < f64::EPSILON.sqrt() {
            self.sigma() * self.b_factor(maturity, bond_maturity) * maturity.sqrt()
        } else {
            self.sigma()
                * self.b_factor(maturity, bond_maturity)
                * (0.5 * (1.0 - (-2.0 * a * maturity).exp()) / a).sqrt()
        };
        let forward = self.discount(bond_maturity);
        let adjusted_strike = self.discount(maturity) * strike;
        black_formula(kind, adjusted_strike, forward, v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn model() -> Vasicek {
        Vasicek::new(0.1, 0.05, 0.01, 0.03)
    }

    #[test]
    fn test_accessors_follow_flattening_order() {
        let mut m = model();
        assert_eq!(m.params(), vec![0.1, 0.05, 0.01, 0.03]);

        m.set_params(&[0.2, 0.04, 0.02, 0.01]).unwrap();
        assert_relative_eq!(m.a(), 0.2);
        assert_relative_eq!(m.b(), 0.04);
        assert_relative_eq!(m.sigma(), 0.02);
        assert_relative_eq!(m.r0(), 0.01);
    }

    #[test]
    fn test_constraint() {
        let m = model();
        let constraint = m.constraint();

        assert!(constraint.test(&m.params()));
        assert!(constraint.test(&[0.1, -0.05, 0.01, -0.01]));
        assert!(!constraint.test(&[-0.1, 0.05, 0.01, 0.03]));
        assert!(!constraint.test(&[0.1, 0.05, 0.0, 0.03]));
    }

    #[test]
    fn test_discount_bond() {
        let m = model();

        assert_relative_eq!(m.discount(0.0), 1.0, epsilon = 1e-15);
        let mut previous = 1.0;
        for t in 1..=30 {
            let df = m.discount(f64::from(t));
            assert!(df < previous);
            previous = df;
        }
    }

    #[test]
    fn test_deterministic_limit() {
        // With no volatility and r0 = b the short rate stays at b.
        let m = Vasicek::new(0.3, 0.04, 1e-12, 0.04);

        assert_relative_eq!(m.discount(10.0), (-0.4f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_option_put_call_parity() {
        let m = model();
        let (strike, expiry, bond_maturity) = (0.9, 2.0, 5.0);

        let call = m
            .discount_bond_option(OptionKind::Call, strike, expiry, bond_maturity)
            .unwrap();
        let put = m
            .discount_bond_option(OptionKind::Put, strike, expiry, bond_maturity)
            .unwrap();

        let parity = m.discount(bond_maturity) - strike * m.discount(expiry);
        assert_relative_eq!(call - put, parity, epsilon = 1e-12);
        assert!(call > 0.0 && put > 0.0);
    }

    #[test]
    fn test_option_at_expiry_is_intrinsic() {
        let m = model();
        let call = m
            .discount_bond_option(OptionKind::Call, 0.8, 0.0, 5.0)
            .unwrap();

        assert_relative_eq!(call, m.discount(5.0) - 0.8, epsilon = 1e-12);
    }

    #[test]
    fn test_option_value_increases_with_volatility() {
        let low = Vasicek::new(0.1, 0.05, 0.005, 0.03)
            .discount_bond_option(OptionKind::Call, 0.85, 1.0, 5.0)
            .unwrap();
        let high = Vasicek::new(0.1, 0.05, 0.02, 0.03)
            .discount_bond_option(OptionKind::Call, 0.85, 1.0, 5.0)
            .unwrap();

        assert!(high > low);
    }
}
