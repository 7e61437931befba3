pub mod request;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::commission::{CommissionableValueCalculator, ExpectedCommissionCalculator};
use crate::config::EngineConfig;
use crate::decimal::Money;
use crate::errors::{EngineError, Result};
use crate::schedule::{AmountAllocator, DueDateScheduler};
use crate::types::InstallmentStatus;

pub use request::PreviewRequest;

/// a draft installment row, discarded unless the user confirms the plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallmentPreview {
    pub installment_number: u32,
    pub amount: Money,
    pub is_initial_payment: bool,
    pub generates_commission: bool,
    pub student_due_date: Option<NaiveDate>,
    pub college_due_date: Option<NaiveDate>,
    pub status: InstallmentStatus,
    pub paid_date: Option<NaiveDate>,
    pub paid_amount: Option<Money>,
}

/// display summary accompanying a preview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewSummary {
    pub total_course_value: Money,
    pub commissionable_value: Money,
    pub expected_commission: Money,
    pub initial_payment_amount: Money,
    /// regular installments plus one when an initial payment exists
    pub total_installment_count: u32,
    /// per-installment amount before the final slot absorbs the remainder
    pub base_installment_amount: Money,
}

/// full preview response for the wizard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewResponse {
    pub installments: Vec<InstallmentPreview>,
    pub summary: PreviewSummary,
}

/// orchestrates the calculators and schedulers into a complete draft
/// schedule. pure: no I/O, no persistence, safe from any number of callers.
pub struct InstallmentPreviewBuilder<'a> {
    config: &'a EngineConfig,
}

impl<'a> InstallmentPreviewBuilder<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    pub fn build(&self, request: &PreviewRequest) -> Result<PreviewResponse> {
        let errors = request.validate(self.config);
        if !errors.is_empty() {
            return Err(EngineError::StructuralValidation { errors });
        }

        let commissionable_value = CommissionableValueCalculator::calc(
            request.total_course_value,
            Some(request.materials_cost),
            Some(request.admin_fees),
            Some(request.other_fees),
        );

        let expected_commission = ExpectedCommissionCalculator::new(self.config.gst.clone()).calc(
            commissionable_value,
            request.reconciled_rate(),
            request.gst_inclusive,
        );

        // business rule, distinct from the structural checks above: a deposit
        // larger than the commission-eligible base cannot be scheduled
        let remaining = commissionable_value - request.initial_payment_amount;
        if remaining.is_negative() {
            return Err(EngineError::InitialPaymentExceedsCommissionable {
                initial_payment: request.initial_payment_amount,
                commissionable_value,
            });
        }

        let mut installments = Vec::with_capacity(request.number_of_installments as usize + 1);

        if request.initial_payment_amount.is_positive() {
            installments.push(self.initial_payment_preview(request));
        }

        let amounts = AmountAllocator::allocate(remaining, request.number_of_installments)?;
        let college_dates = match request.first_college_due_date {
            Some(first) => DueDateScheduler::college_due_dates(
                first,
                request.number_of_installments,
                request.payment_frequency,
            )?,
            // only reachable for custom frequency, which needs no first date
            None => vec![None; request.number_of_installments as usize],
        };

        for (i, (amount, college_due_date)) in amounts.iter().zip(college_dates).enumerate() {
            let student_due_date = college_due_date
                .map(|d| DueDateScheduler::student_due_date(d, request.student_lead_time_days));

            installments.push(InstallmentPreview {
                installment_number: i as u32 + 1,
                amount: *amount,
                is_initial_payment: false,
                generates_commission: true,
                student_due_date,
                college_due_date,
                status: InstallmentStatus::Draft,
                paid_date: None,
                paid_amount: None,
            });
        }

        let has_initial = request.initial_payment_amount.is_positive();
        let summary = PreviewSummary {
            total_course_value: request.total_course_value,
            commissionable_value,
            expected_commission,
            initial_payment_amount: request.initial_payment_amount,
            total_installment_count: request.number_of_installments + u32::from(has_initial),
            base_installment_amount: amounts.first().copied().unwrap_or(Money::ZERO),
        };

        Ok(PreviewResponse {
            installments,
            summary,
        })
    }

    /// installment #0: the deposit is due to student and college on the same
    /// day, so the lead time offset does not apply
    fn initial_payment_preview(&self, request: &PreviewRequest) -> InstallmentPreview {
        let due_date = request.initial_payment_due_date;
        let (status, paid_date, paid_amount) = if request.initial_payment_paid {
            (InstallmentStatus::Paid, due_date, Some(request.initial_payment_amount))
        } else {
            (InstallmentStatus::Draft, None, None)
        };

        InstallmentPreview {
            installment_number: 0,
            amount: request.initial_payment_amount,
            is_initial_payment: true,
            generates_commission: true,
            student_due_date: due_date,
            college_due_date: due_date,
            status,
            paid_date,
            paid_amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::types::PaymentFrequency;
    use rust_decimal_macros::dec;

    fn money(s: &str) -> Money {
        Money::from_str_exact(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request() -> PreviewRequest {
        PreviewRequest {
            initial_payment_amount: money("1000.00"),
            initial_payment_due_date: Some(date(2025, 1, 10)),
            initial_payment_paid: true,
            number_of_installments: 3,
            payment_frequency: PaymentFrequency::Monthly,
            first_college_due_date: Some(date(2025, 1, 31)),
            student_lead_time_days: 7,
            materials_cost: money("500.00"),
            admin_fees: money("300.00"),
            other_fees: Money::ZERO,
            gst_inclusive: true,
            total_course_value: money("10000.00"),
            commission_rate: dec!(0.15),
        }
    }

    fn build(request: &PreviewRequest) -> PreviewResponse {
        let config = EngineConfig::default();
        InstallmentPreviewBuilder::new(&config).build(request).unwrap()
    }

    #[test]
    fn test_full_preview_reconciles() {
        let response = build(&request());

        // 10000 - 800 fees = 9200 commissionable, minus 1000 deposit = 8200
        assert_eq!(response.summary.commissionable_value, money("9200.00"));
        assert_eq!(response.summary.expected_commission, money("1380.00"));
        assert_eq!(response.summary.total_installment_count, 4);
        assert_eq!(response.installments.len(), 4);

        let regular_sum = response
            .installments
            .iter()
            .filter(|i| !i.is_initial_payment)
            .fold(Money::ZERO, |acc, i| acc + i.amount);
        assert_eq!(regular_sum, money("8200.00"));
    }

    #[test]
    fn test_remainder_on_final_installment() {
        let mut req = request();
        req.initial_payment_amount = money("1200.00");
        let response = build(&req);

        // remaining 8000 over 3: 2666.66, 2666.66, 2666.68
        let regular: Vec<Money> = response
            .installments
            .iter()
            .filter(|i| !i.is_initial_payment)
            .map(|i| i.amount)
            .collect();
        assert_eq!(regular, vec![money("2666.66"), money("2666.66"), money("2666.68")]);
        assert_eq!(response.summary.base_installment_amount, money("2666.66"));
    }

    #[test]
    fn test_initial_payment_row() {
        let response = build(&request());
        let initial = &response.installments[0];

        assert_eq!(initial.installment_number, 0);
        assert!(initial.is_initial_payment);
        assert!(initial.generates_commission);
        // deposit is due to both timelines on the same day
        assert_eq!(initial.student_due_date, Some(date(2025, 1, 10)));
        assert_eq!(initial.college_due_date, Some(date(2025, 1, 10)));
        assert_eq!(initial.status, InstallmentStatus::Paid);
        assert_eq!(initial.paid_amount, Some(money("1000.00")));
        assert_eq!(initial.paid_date, Some(date(2025, 1, 10)));
    }

    #[test]
    fn test_unpaid_initial_payment_is_draft() {
        let mut req = request();
        req.initial_payment_paid = false;
        let response = build(&req);
        let initial = &response.installments[0];

        assert_eq!(initial.status, InstallmentStatus::Draft);
        assert_eq!(initial.paid_amount, None);
        assert_eq!(initial.paid_date, None);
    }

    #[test]
    fn test_no_initial_payment_omits_row_zero() {
        let mut req = request();
        req.initial_payment_amount = Money::ZERO;
        req.initial_payment_due_date = None;
        let response = build(&req);

        assert_eq!(response.installments.len(), 3);
        assert_eq!(response.installments[0].installment_number, 1);
        assert_eq!(response.summary.total_installment_count, 3);
    }

    #[test]
    fn test_dual_timeline_dates() {
        let response = build(&request());
        let regular: Vec<&InstallmentPreview> = response
            .installments
            .iter()
            .filter(|i| !i.is_initial_payment)
            .collect();

        assert_eq!(regular[0].college_due_date, Some(date(2025, 1, 31)));
        assert_eq!(regular[0].student_due_date, Some(date(2025, 1, 24)));
        assert_eq!(regular[1].college_due_date, Some(date(2025, 2, 28)));
        assert_eq!(regular[1].student_due_date, Some(date(2025, 2, 21)));
        assert_eq!(regular[2].college_due_date, Some(date(2025, 3, 31)));
    }

    #[test]
    fn test_custom_frequency_placeholder_dates() {
        let mut req = request();
        req.payment_frequency = PaymentFrequency::Custom;
        req.first_college_due_date = None;
        let response = build(&req);

        for inst in response.installments.iter().filter(|i| !i.is_initial_payment) {
            assert_eq!(inst.college_due_date, None);
            assert_eq!(inst.student_due_date, None);
            assert_eq!(inst.status, InstallmentStatus::Draft);
        }
    }

    #[test]
    fn test_initial_payment_exceeding_commissionable_is_domain_error() {
        let mut req = request();
        req.initial_payment_amount = money("10000.00");
        let config = EngineConfig::default();
        let err = InstallmentPreviewBuilder::new(&config).build(&req).unwrap_err();

        assert!(matches!(err, EngineError::InitialPaymentExceedsCommissionable { .. }));
        assert_eq!(err.kind(), ErrorKind::DomainValidation);
    }

    #[test]
    fn test_structural_errors_reported_before_calculation() {
        let mut req = request();
        req.total_course_value = Money::ZERO;
        req.number_of_installments = 0;
        let config = EngineConfig::default();
        let err = InstallmentPreviewBuilder::new(&config).build(&req).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::StructuralValidation);
        assert_eq!(err.field_errors().len(), 2);
    }

    #[test]
    fn test_gst_exclusive_expected_commission() {
        let mut req = request();
        req.gst_inclusive = false;
        let response = build(&req);
        // 9200 / 1.10 * 0.15 = 1254.55
        assert_eq!(response.summary.expected_commission, money("1254.55"));
    }

    #[test]
    fn test_initial_payment_equal_to_commissionable_allowed() {
        let mut req = request();
        req.initial_payment_amount = money("9200.00");
        let response = build(&req);

        for inst in response.installments.iter().filter(|i| !i.is_initial_payment) {
            assert_eq!(inst.amount, Money::ZERO);
        }
    }
}
