use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{Money, Rate};
use crate::preview::{PreviewRequest, PreviewSummary};
use crate::types::{PaymentFrequency, PlanId};

/// a persisted payment plan: the financial inputs, the timeline
/// configuration, and the three derived fields the recalculation engine
/// keeps consistent with them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentPlan {
    pub id: PlanId,
    pub currency: String,

    // financial inputs
    pub total_course_value: Money,
    pub commission_rate: Rate,
    pub gst_inclusive: bool,
    pub materials_cost: Money,
    pub admin_fees: Money,
    pub other_fees: Money,

    // initial payment
    pub initial_payment_amount: Money,
    pub initial_payment_due_date: Option<NaiveDate>,
    pub initial_payment_paid: bool,

    // timeline configuration
    pub number_of_installments: u32,
    pub payment_frequency: PaymentFrequency,
    pub first_college_due_date: Option<NaiveDate>,
    pub student_lead_time_days: u32,

    // derived, recalculated on every financial or payment mutation
    pub commissionable_value: Money,
    pub expected_commission: Money,
    pub earned_commission: Money,

    pub created_at: DateTime<Utc>,
    pub recalculated_at: DateTime<Utc>,
}

impl PaymentPlan {
    /// build a plan from a validated preview request and its computed summary
    pub fn from_request(
        request: &PreviewRequest,
        summary: &PreviewSummary,
        currency: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            currency,
            total_course_value: request.total_course_value,
            commission_rate: request.reconciled_rate(),
            gst_inclusive: request.gst_inclusive,
            materials_cost: request.materials_cost,
            admin_fees: request.admin_fees,
            other_fees: request.other_fees,
            initial_payment_amount: request.initial_payment_amount,
            initial_payment_due_date: request.initial_payment_due_date,
            initial_payment_paid: request.initial_payment_paid,
            number_of_installments: request.number_of_installments,
            payment_frequency: request.payment_frequency,
            first_college_due_date: request.first_college_due_date,
            student_lead_time_days: request.student_lead_time_days,
            commissionable_value: summary.commissionable_value,
            expected_commission: summary.expected_commission,
            earned_commission: Money::ZERO,
            created_at: now,
            recalculated_at: now,
        }
    }

    /// apply a financial patch; derived fields are stale until the
    /// recalculation engine runs against the mutated plan
    pub fn apply_patch(&mut self, patch: &PlanFinancialPatch) {
        if let Some(total) = patch.total_course_value {
            self.total_course_value = total;
        }
        if let Some(materials) = patch.materials_cost {
            self.materials_cost = materials;
        }
        if let Some(admin) = patch.admin_fees {
            self.admin_fees = admin;
        }
        if let Some(other) = patch.other_fees {
            self.other_fees = other;
        }
        if let Some(rate) = patch.commission_rate {
            self.commission_rate = Rate::from_stored(rate);
        }
        if let Some(gst_inclusive) = patch.gst_inclusive {
            self.gst_inclusive = gst_inclusive;
        }
    }
}

/// partial update of a plan's financial inputs; unset fields keep their
/// current values. the rate is accepted in either stored form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanFinancialPatch {
    pub total_course_value: Option<Money>,
    pub materials_cost: Option<Money>,
    pub admin_fees: Option<Money>,
    pub other_fees: Option<Money>,
    pub commission_rate: Option<Decimal>,
    pub gst_inclusive: Option<bool>,
}

impl PlanFinancialPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
