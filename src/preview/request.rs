use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::decimal::{Money, Rate};
use crate::errors::FieldError;
use crate::types::PaymentFrequency;

/// wizard-facing request for a schedule preview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewRequest {
    pub initial_payment_amount: Money,
    /// required when an initial payment amount is present
    pub initial_payment_due_date: Option<NaiveDate>,
    #[serde(default)]
    pub initial_payment_paid: bool,
    pub number_of_installments: u32,
    pub payment_frequency: PaymentFrequency,
    /// required unless the frequency is custom
    pub first_college_due_date: Option<NaiveDate>,
    pub student_lead_time_days: u32,
    pub materials_cost: Money,
    pub admin_fees: Money,
    pub other_fees: Money,
    pub gst_inclusive: bool,
    pub total_course_value: Money,
    /// accepted in 0-1 or 0-100 form, reconciled via [`Rate::from_stored`]
    pub commission_rate: Decimal,
}

impl PreviewRequest {
    /// commission rate reconciled to a decimal fraction
    pub fn reconciled_rate(&self) -> Rate {
        Rate::from_stored(self.commission_rate)
    }

    /// structural validation: every violation is collected so the wizard can
    /// render all problems at once rather than one per round trip
    pub fn validate(&self, config: &EngineConfig) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if !self.total_course_value.is_positive() {
            errors.push(FieldError::new("total_course_value", "must be greater than zero"));
        }

        if self.commission_rate < Decimal::ZERO || self.commission_rate > Decimal::from(100) {
            errors.push(FieldError::new("commission_rate", "must be between 0 and 1 (or 0 and 100)"));
        }

        if self.number_of_installments == 0 {
            errors.push(FieldError::new("number_of_installments", "must be at least 1"));
        } else if self.number_of_installments > config.limits.max_installments {
            errors.push(FieldError::new(
                "number_of_installments",
                format!("must not exceed {}", config.limits.max_installments),
            ));
        }

        if self.student_lead_time_days > config.limits.max_lead_time_days {
            errors.push(FieldError::new(
                "student_lead_time_days",
                format!("must not exceed {}", config.limits.max_lead_time_days),
            ));
        }

        for (field, value) in [
            ("initial_payment_amount", self.initial_payment_amount),
            ("materials_cost", self.materials_cost),
            ("admin_fees", self.admin_fees),
            ("other_fees", self.other_fees),
        ] {
            if value.is_negative() {
                errors.push(FieldError::new(field, "must not be negative"));
            }
        }

        if self.initial_payment_amount.is_positive() && self.initial_payment_due_date.is_none() {
            errors.push(FieldError::new(
                "initial_payment_due_date",
                "required when an initial payment is present",
            ));
        }

        if self.payment_frequency != PaymentFrequency::Custom && self.first_college_due_date.is_none()
        {
            errors.push(FieldError::new(
                "first_college_due_date",
                "required unless the payment frequency is custom",
            ));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn money(s: &str) -> Money {
        Money::from_str_exact(s).unwrap()
    }

    fn valid_request() -> PreviewRequest {
        PreviewRequest {
            initial_payment_amount: money("1000.00"),
            initial_payment_due_date: NaiveDate::from_ymd_opt(2025, 1, 10),
            initial_payment_paid: true,
            number_of_installments: 4,
            payment_frequency: PaymentFrequency::Monthly,
            first_college_due_date: NaiveDate::from_ymd_opt(2025, 2, 15),
            student_lead_time_days: 7,
            materials_cost: money("300.00"),
            admin_fees: money("200.00"),
            other_fees: Money::ZERO,
            gst_inclusive: true,
            total_course_value: money("10000.00"),
            commission_rate: dec!(0.15),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(valid_request().validate(&EngineConfig::default()).is_empty());
    }

    #[test]
    fn test_all_errors_collected() {
        let mut request = valid_request();
        request.total_course_value = Money::ZERO;
        request.commission_rate = dec!(150);
        request.number_of_installments = 0;
        request.initial_payment_due_date = None;

        let errors = request.validate(&EngineConfig::default());
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "total_course_value",
                "commission_rate",
                "number_of_installments",
                "initial_payment_due_date",
            ]
        );
    }

    #[test]
    fn test_installment_cap() {
        let mut request = valid_request();
        request.number_of_installments = 61;
        let errors = request.validate(&EngineConfig::default());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "number_of_installments");
    }

    #[test]
    fn test_custom_frequency_allows_missing_first_date() {
        let mut request = valid_request();
        request.payment_frequency = PaymentFrequency::Custom;
        request.first_college_due_date = None;
        assert!(request.validate(&EngineConfig::default()).is_empty());
    }

    #[test]
    fn test_monthly_requires_first_date() {
        let mut request = valid_request();
        request.first_college_due_date = None;
        let errors = request.validate(&EngineConfig::default());
        assert_eq!(errors[0].field, "first_college_due_date");
    }

    #[test]
    fn test_no_initial_payment_skips_due_date_requirement() {
        let mut request = valid_request();
        request.initial_payment_amount = Money::ZERO;
        request.initial_payment_due_date = None;
        assert!(request.validate(&EngineConfig::default()).is_empty());
    }

    #[test]
    fn test_percentage_form_rate_accepted() {
        let mut request = valid_request();
        request.commission_rate = dec!(15);
        assert!(request.validate(&EngineConfig::default()).is_empty());
        assert_eq!(request.reconciled_rate(), Rate::from_percentage(15));
    }

    #[test]
    fn test_request_deserializes_from_wizard_json() {
        let json = r#"{
            "initial_payment_amount": "1000.00",
            "initial_payment_due_date": "2025-01-10",
            "initial_payment_paid": false,
            "number_of_installments": 3,
            "payment_frequency": "monthly",
            "first_college_due_date": "2025-02-15",
            "student_lead_time_days": 7,
            "materials_cost": "0",
            "admin_fees": "0",
            "other_fees": "0",
            "gst_inclusive": true,
            "total_course_value": "10000.00",
            "commission_rate": "0.15"
        }"#;
        let request: PreviewRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.payment_frequency, PaymentFrequency::Monthly);
        assert_eq!(request.total_course_value, money("10000.00"));
    }
}
