//! Evaluation context passed explicitly to pricing and calibration.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The date against which models and helpers are evaluated.
///
/// Times are Act/365 Fixed year fractions from the evaluation date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EvaluationContext {
    evaluation_date: NaiveDate,
}

impl EvaluationContext {
    /// Creates a context for `evaluation_date`.
    #[must_use]
    pub fn new(evaluation_date: NaiveDate) -> Self {
        Self { evaluation_date }
    }

    /// Returns the evaluation date.
    #[must_use]
    pub fn evaluation_date(&self) -> NaiveDate {
        self.evaluation_date
    }

    /// Act/365F year fraction from the evaluation date to `date`.
    ///
    /// Negative for dates before the evaluation date.
    #[must_use]
    pub fn year_fraction(&self, date: NaiveDate) -> f64 {
        (date - self.evaluation_date).num_days() as f64 / 365.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_year_fraction() {
        let ctx = EvaluationContext::new(date(2024, 1, 15));

        assert_relative_eq!(ctx.year_fraction(date(2024, 1, 15)), 0.0);
        assert_relative_eq!(ctx.year_fraction(date(2025, 1, 14)), 365.0 / 365.0);
        assert_relative_eq!(ctx.year_fraction(date(2023, 1, 15)), -1.0);
    }

    #[test]
    fn test_serde_round_trip() {
        let ctx = EvaluationContext::new(date(2024, 6, 28));
        let json = serde_json::to_string(&ctx).unwrap();
        let back: EvaluationContext = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ctx);
    }
}
