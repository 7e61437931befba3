use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::errors::{EngineError, Result};
use crate::lifecycle;
use crate::preview::InstallmentPreview;
use crate::types::{InstallmentId, InstallmentStatus, PlanId};

/// a single installment row on a payment plan's dual timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    pub id: InstallmentId,
    pub plan_id: PlanId,
    /// 0 = initial payment, 1..N = regular installments
    pub installment_number: u32,
    pub amount: Money,
    pub is_initial_payment: bool,
    pub generates_commission: bool,
    /// when the student must pay the agency; None until entered for custom schedules
    pub student_due_date: Option<NaiveDate>,
    /// when the agency must pay the college
    pub college_due_date: Option<NaiveDate>,
    pub status: InstallmentStatus,
    pub paid_date: Option<NaiveDate>,
    pub paid_amount: Option<Money>,
    pub payment_notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Installment {
    /// materialize a confirmed preview row against a plan
    pub fn from_preview(plan_id: PlanId, preview: &InstallmentPreview, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            plan_id,
            installment_number: preview.installment_number,
            amount: preview.amount,
            is_initial_payment: preview.is_initial_payment,
            generates_commission: preview.generates_commission,
            student_due_date: preview.student_due_date,
            college_due_date: preview.college_due_date,
            status: preview.status,
            paid_date: preview.paid_date,
            paid_amount: preview.paid_amount,
            payment_notes: None,
            created_at: now,
        }
    }

    /// amount paid so far
    pub fn paid_to_date(&self) -> Money {
        self.paid_amount.unwrap_or(Money::ZERO)
    }

    /// unpaid balance, never negative
    pub fn outstanding(&self) -> Money {
        (self.amount - self.paid_to_date()).max(Money::ZERO)
    }

    /// confirm a draft installment into the live schedule
    pub fn activate(&mut self) -> Result<()> {
        lifecycle::transition(self, InstallmentStatus::Pending)?;
        Ok(())
    }

    /// record a payment, accumulating onto any prior partial amount. lands on
    /// paid when the running total covers the installment, partial otherwise.
    pub fn record_payment(
        &mut self,
        amount: Money,
        paid_date: NaiveDate,
        notes: Option<String>,
    ) -> Result<InstallmentStatus> {
        if !amount.is_positive() {
            return Err(EngineError::InvalidPaymentAmount { amount });
        }

        let new_total = self.paid_to_date() + amount;
        let target = if new_total >= self.amount {
            InstallmentStatus::Paid
        } else {
            InstallmentStatus::Partial
        };

        let prior = (self.paid_amount, self.paid_date);
        self.paid_amount = Some(new_total);
        self.paid_date = Some(paid_date);

        if let Err(err) = lifecycle::transition(self, target) {
            (self.paid_amount, self.paid_date) = prior;
            return Err(err);
        }

        if notes.is_some() {
            self.payment_notes = notes;
        }
        Ok(target)
    }

    /// reverse a completed payment, clearing the paid fields and returning
    /// the installment to pending. only a paid installment can be reversed.
    pub fn revert_payment(&mut self) -> Result<Money> {
        if self.status != InstallmentStatus::Paid {
            return Err(EngineError::InvalidTransition {
                from: self.status,
                to: InstallmentStatus::Pending,
            });
        }

        let reversed = self.paid_to_date();
        self.paid_amount = None;
        self.paid_date = None;
        lifecycle::transition(self, InstallmentStatus::Pending)?;
        Ok(reversed)
    }

    /// flag a pending or partial installment past its college due date
    pub fn mark_overdue(&mut self) -> Result<()> {
        lifecycle::transition(self, InstallmentStatus::Overdue)?;
        Ok(())
    }

    /// withdraw the installment from the schedule
    pub fn cancel(&mut self) -> Result<()> {
        lifecycle::transition(self, InstallmentStatus::Cancelled)?;
        Ok(())
    }
}
