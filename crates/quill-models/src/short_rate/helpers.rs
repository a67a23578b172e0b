//! Calibration helpers for short-rate models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{OptionKind, ShortRateModel};
use crate::context::EvaluationContext;
use crate::error::{ModelError, ModelResult};
use crate::model::CalibrationHelper;

fn time_to(context: &EvaluationContext, date: NaiveDate, what: &str) -> ModelResult<f64> {
    let t = context.year_fraction(date);
    if t < 0.0 {
        return Err(ModelError::invalid_parameter(format!(
            "{what} {date} is before the evaluation date {}",
            context.evaluation_date()
        )));
    }
    Ok(t)
}

/// A quoted zero-coupon bond price.
///
/// The calibration error is the model price minus the market price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountBondHelper {
    /// Bond maturity.
    pub maturity: NaiveDate,
    /// Quoted price per unit notional.
    pub market_price: f64,
}

impl DiscountBondHelper {
    /// Creates a helper for a bond maturing on `maturity`.
    #[must_use]
    pub fn new(maturity: NaiveDate, market_price: f64) -> Self {
        Self {
            maturity,
            market_price,
        }
    }

    /// Model price of the bond.
    pub fn model_price<M: ShortRateModel + ?Sized>(
        &self,
        model: &M,
        context: &EvaluationContext,
    ) -> ModelResult<f64> {
        let t = time_to(context, self.maturity, "maturity")?;
        Ok(model.discount(t))
    }
}

impl<M: ShortRateModel> CalibrationHelper<M> for DiscountBondHelper {
    fn calibration_error(&self, model: &M, context: &EvaluationContext) -> ModelResult<f64> {
        Ok(self.model_price(model, context)? - self.market_price)
    }
}

/// A quoted European option on a zero-coupon bond.
///
/// The calibration error is relative: `(model - market) / market`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondOptionHelper {
    kind: OptionKind,
    strike: f64,
    expiry: NaiveDate,
    bond_maturity: NaiveDate,
    market_price: f64,
}

impl BondOptionHelper {
    /// Creates a bond option helper.
    ///
    /// The market price must be positive and the bond must not mature before
    /// the option expires.
    pub fn new(
        kind: OptionKind,
        strike: f64,
        expiry: NaiveDate,
        bond_maturity: NaiveDate,
        market_price: f64,
    ) -> ModelResult<Self> {
        if market_price <= 0.0 {
            return Err(ModelError::invalid_parameter(format!(
                "bond option market price must be positive, got {market_price}"
            )));
        }
        if bond_maturity < expiry {
            return Err(ModelError::invalid_parameter(format!(
                "bond maturity {bond_maturity} is before option expiry {expiry}"
            )));
        }
        Ok(Self {
            kind,
            strike,
            expiry,
            bond_maturity,
            market_price,
        })
    }

    /// Returns the quoted price.
    pub fn market_price(&self) -> f64 {
        self.market_price
    }

    /// Model price of the option.
    pub fn model_price<M: ShortRateModel + ?Sized>(
        &self,
        model: &M,
        context: &EvaluationContext,
    ) -> ModelResult<f64> {
        let expiry = time_to(context, self.expiry, "expiry")?;
        let bond_maturity = time_to(context, self.bond_maturity, "bond maturity")?;
        model.discount_bond_option(self.kind, self.strike, expiry, bond_maturity)
    }
}

impl<M: ShortRateModel> CalibrationHelper<M> for BondOptionHelper {
    fn calibration_error(&self, model: &M, context: &EvaluationContext) -> ModelResult<f64> {
        let price = self.model_price(model, context)?;
        Ok((price - self.market_price) / self.market_price)
    }
}
