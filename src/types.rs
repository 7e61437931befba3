use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// unique identifier for a payment plan
pub type PlanId = Uuid;

/// unique identifier for an installment
pub type InstallmentId = Uuid;

/// cadence of the regular installment schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentFrequency {
    /// one calendar month between college due dates
    Monthly,
    /// three calendar months between college due dates
    Quarterly,
    /// due dates entered manually downstream, scheduler emits placeholders
    Custom,
}

impl PaymentFrequency {
    /// months added per schedule step, none for custom
    pub fn months_per_step(&self) -> Option<u32> {
        match self {
            PaymentFrequency::Monthly => Some(1),
            PaymentFrequency::Quarterly => Some(3),
            PaymentFrequency::Custom => None,
        }
    }
}

/// installment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallmentStatus {
    /// created in a preview or unconfirmed plan
    Draft,
    /// confirmed and awaiting payment
    Pending,
    /// paid in part, balance still owing
    Partial,
    /// paid in full
    Paid,
    /// past the college due date without full payment
    Overdue,
    /// withdrawn from the schedule
    Cancelled,
}

impl InstallmentStatus {
    /// terminal states accept no further transitions except payment reversal out of paid
    pub fn is_terminal(&self) -> bool {
        matches!(self, InstallmentStatus::Paid | InstallmentStatus::Cancelled)
    }

    /// whether paid_amount in this status counts toward earned commission
    pub fn contributes_to_earned(&self) -> bool {
        matches!(self, InstallmentStatus::Paid | InstallmentStatus::Partial)
    }
}
