use crate::decimal::Money;
use crate::installment::Installment;

/// engine for proportional commission recognition as installments are paid
pub struct EarnedCommissionCalculator;

impl EarnedCommissionCalculator {
    /// earned commission = paid / total * expected, rounded to the cent and
    /// clamped to [0, expected]. a zero total yields zero rather than a
    /// division error, and overpayment never earns beyond the expected figure.
    pub fn calc(paid_amount_sum: Money, total_amount: Money, expected_commission: Money) -> Money {
        if total_amount.is_zero()
            || !paid_amount_sum.is_positive()
            || !expected_commission.is_positive()
        {
            return Money::ZERO;
        }

        let ratio = paid_amount_sum.as_decimal() / total_amount.as_decimal();
        Money::from_decimal(ratio * expected_commission.as_decimal())
            .clamp(Money::ZERO, expected_commission)
    }
}

/// sum of paid amounts over installments that contribute to earned
/// commission: paid or partial status, commission-generating only
pub fn paid_amount_sum(installments: &[Installment]) -> Money {
    installments
        .iter()
        .filter(|i| i.status.contributes_to_earned() && i.generates_commission)
        .filter_map(|i| i.paid_amount)
        .fold(Money::ZERO, |acc, amount| acc + amount)
}
