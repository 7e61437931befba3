use rust_decimal::Decimal;

use crate::config::GstConfig;
use crate::decimal::{Money, Rate};

/// engine for converting commissionable value into expected commission
pub struct ExpectedCommissionCalculator {
    pub config: GstConfig,
}

impl ExpectedCommissionCalculator {
    pub fn new(config: GstConfig) -> Self {
        Self { config }
    }

    /// expected commission on a commissionable value.
    ///
    /// when the value is GST-inclusive the commission base is the value
    /// itself; otherwise the quoted figure has GST on top and the base is
    /// value / (1 + gst_rate). the result is rounded to the cent once, after
    /// applying the rate. non-positive value or rate yields zero so the
    /// calculator can run against half-typed wizard input.
    pub fn calc(&self, commissionable_value: Money, rate: Rate, gst_inclusive: bool) -> Money {
        self.calc_with_breakdown(commissionable_value, rate, gst_inclusive)
            .amount
    }

    /// same calculation with the base and GST treatment retained
    pub fn calc_with_breakdown(
        &self,
        commissionable_value: Money,
        rate: Rate,
        gst_inclusive: bool,
    ) -> ExpectedCommission {
        if !commissionable_value.is_positive() || rate.as_decimal() <= Decimal::ZERO {
            return ExpectedCommission {
                base: Money::ZERO,
                rate,
                gst_inclusive,
                amount: Money::ZERO,
            };
        }

        // keep the base unrounded until the rate is applied
        let base = if gst_inclusive {
            commissionable_value.as_decimal()
        } else {
            commissionable_value.as_decimal() / self.config.gst_divisor()
        };

        ExpectedCommission {
            base: Money::from_decimal(base),
            rate,
            gst_inclusive,
            amount: Money::from_decimal(base * rate.as_decimal()),
        }
    }
}

/// expected commission calculation result
#[derive(Debug, Clone, PartialEq)]
pub struct ExpectedCommission {
    /// commission base after GST treatment, rounded for display
    pub base: Money,
    pub rate: Rate,
    pub gst_inclusive: bool,
    pub amount: Money,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn money(s: &str) -> Money {
        Money::from_str_exact(s).unwrap()
    }

    fn calculator() -> ExpectedCommissionCalculator {
        ExpectedCommissionCalculator::new(GstConfig::australia())
    }

    #[test]
    fn test_gst_inclusive_uses_value_directly() {
        let result = calculator().calc(money("10000.00"), Rate::from_decimal(dec!(0.15)), true);
        assert_eq!(result, money("1500.00"));
    }

    #[test]
    fn test_gst_exclusive_strips_gst_before_rate() {
        // 9200 / 1.10 * 0.15 = 1254.5454... -> 1254.55
        let result = calculator().calc(money("9200.00"), Rate::from_decimal(dec!(0.15)), false);
        assert_eq!(result, money("1254.55"));
    }

    #[test]
    fn test_single_final_rounding() {
        let breakdown =
            calculator().calc_with_breakdown(money("9200.00"), Rate::from_decimal(dec!(0.15)), false);
        // base rounds to 8363.64 for display, but the commission comes off
        // the unrounded base: 8363.64 * 0.15 = 1254.546 would round to 1254.55
        // too, yet 101.00 / 1.10 * 0.11 distinguishes the two paths
        assert_eq!(breakdown.base, money("8363.64"));
        assert_eq!(breakdown.amount, money("1254.55"));

        let fine = calculator().calc(money("101.00"), Rate::from_decimal(dec!(0.11)), false);
        // 101 / 1.10 = 91.8181..., * 0.11 = 10.1000 -> 10.10
        assert_eq!(fine, money("10.10"));
    }

    #[test]
    fn test_zero_for_non_positive_inputs() {
        let calc = calculator();
        assert_eq!(calc.calc(Money::ZERO, Rate::from_decimal(dec!(0.15)), true), Money::ZERO);
        assert_eq!(
            calc.calc(money("-500.00"), Rate::from_decimal(dec!(0.15)), true),
            Money::ZERO
        );
        assert_eq!(calc.calc(money("1000.00"), Rate::ZERO, true), Money::ZERO);
        assert_eq!(
            calc.calc(money("1000.00"), Rate::from_decimal(dec!(-0.1)), true),
            Money::ZERO
        );
    }

    #[test]
    fn test_other_jurisdiction_rate() {
        let calc = ExpectedCommissionCalculator::new(GstConfig::new(Rate::from_decimal(dec!(0.15))));
        // 1150 / 1.15 = 1000, * 0.10 = 100
        let result = calc.calc(money("1150.00"), Rate::from_decimal(dec!(0.10)), false);
        assert_eq!(result, money("100.00"));
    }
}
