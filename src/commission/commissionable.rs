use crate::decimal::Money;

/// calculator for the commission-eligible base of a course value
pub struct CommissionableValueCalculator;

impl CommissionableValueCalculator {
    /// total course value minus non-commissionable fees, floored at zero.
    /// absent fees count as zero; fees exceeding the total clamp silently so
    /// live wizard input is never blocked by a transient negative.
    pub fn calc(
        total: Money,
        materials: Option<Money>,
        admin: Option<Money>,
        other: Option<Money>,
    ) -> Money {
        Self::calc_with_breakdown(total, materials, admin, other).commissionable_value
    }

    /// same calculation with the intermediate figures retained
    pub fn calc_with_breakdown(
        total: Money,
        materials: Option<Money>,
        admin: Option<Money>,
        other: Option<Money>,
    ) -> CommissionableValue {
        let fee = |f: Option<Money>| f.unwrap_or(Money::ZERO).max(Money::ZERO);
        let total_fees = fee(materials) + fee(admin) + fee(other);
        let commissionable_value = (total.max(Money::ZERO) - total_fees).max(Money::ZERO);

        CommissionableValue {
            total,
            total_fees,
            commissionable_value,
            clamped: total - total_fees < Money::ZERO,
        }
    }
}

/// commissionable value calculation result
#[derive(Debug, Clone, PartialEq)]
pub struct CommissionableValue {
    pub total: Money,
    pub total_fees: Money,
    pub commissionable_value: Money,
    pub clamped: bool,
}
