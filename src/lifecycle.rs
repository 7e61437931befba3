//! installment status state machine.
//!
//! transitions are an explicit table rather than ad-hoc checks so the
//! paid-field invariants hold on every path:
//!
//! ```text
//! draft   -> pending | cancelled
//! pending -> partial | paid | overdue | cancelled
//! partial -> paid | overdue | cancelled
//! overdue -> partial | paid | cancelled
//! paid    -> pending          (payment reversal only)
//! cancelled : terminal
//! ```

use chrono::NaiveDate;

use crate::decimal::Money;
use crate::errors::{EngineError, Result};
use crate::installment::Installment;
use crate::types::InstallmentStatus;

/// whether the status machine permits this edge
pub fn can_transition(from: InstallmentStatus, to: InstallmentStatus) -> bool {
    use InstallmentStatus::*;
    match (from, to) {
        (Draft, Pending) | (Draft, Cancelled) => true,
        (Pending, Partial) | (Pending, Paid) | (Pending, Overdue) | (Pending, Cancelled) => true,
        (Partial, Paid) | (Partial, Overdue) | (Partial, Cancelled) => true,
        (Overdue, Partial) | (Overdue, Paid) | (Overdue, Cancelled) => true,
        (Paid, Pending) => true,
        _ => false,
    }
}

/// validate the paid-field invariant for a status.
///
/// paid requires a positive paid_amount and a paid_date; partial requires a
/// paid_amount strictly below the installment amount alongside a paid_date;
/// draft and pending require both fields cleared. overdue keeps a partial
/// payment history if one exists, and cancelled preserves whatever was
/// recorded at cancellation time.
pub fn check_paid_fields(
    status: InstallmentStatus,
    amount: Money,
    paid_amount: Option<Money>,
    paid_date: Option<NaiveDate>,
) -> Result<()> {
    let fail = |message: &str| {
        Err(EngineError::PaidFieldsInvalid {
            status,
            message: message.to_string(),
        })
    };

    match status {
        InstallmentStatus::Paid => match (paid_amount, paid_date) {
            (Some(paid), Some(_)) if paid.is_positive() => Ok(()),
            (Some(_), Some(_)) => fail("paid_amount must be positive"),
            _ => fail("paid_amount and paid_date must both be set"),
        },
        InstallmentStatus::Partial => match (paid_amount, paid_date) {
            (Some(paid), Some(_)) if paid.is_positive() && paid < amount => Ok(()),
            (Some(paid), Some(_)) if paid >= amount => {
                fail("paid_amount must be below the installment amount")
            }
            (Some(_), Some(_)) => fail("paid_amount must be positive"),
            _ => fail("paid_amount and paid_date must both be set"),
        },
        InstallmentStatus::Draft | InstallmentStatus::Pending => {
            if paid_amount.is_some() || paid_date.is_some() {
                fail("paid fields must be cleared")
            } else {
                Ok(())
            }
        }
        InstallmentStatus::Overdue => match (paid_amount, paid_date) {
            (None, None) => Ok(()),
            (Some(paid), Some(_)) if paid.is_positive() && paid < amount => Ok(()),
            _ => fail("overdue keeps either no payment or a valid partial payment"),
        },
        InstallmentStatus::Cancelled => Ok(()),
    }
}

/// move an installment to a new status, enforcing both the transition table
/// and the target status's paid-field invariant. a same-status call
/// revalidates the fields without consulting the table, which is how a
/// partial installment absorbs further partial payments.
pub fn transition(installment: &mut Installment, to: InstallmentStatus) -> Result<InstallmentStatus> {
    let from = installment.status;

    if from != to && !can_transition(from, to) {
        return Err(EngineError::InvalidTransition { from, to });
    }

    check_paid_fields(to, installment.amount, installment.paid_amount, installment.paid_date)?;

    installment.status = to;
    Ok(from)
}
