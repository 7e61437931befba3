use rust_decimal::Decimal;

use crate::decimal::Money;
use crate::errors::{EngineError, Result};

/// splits a remaining balance across installments with exact reconciliation
pub struct AmountAllocator;

impl AmountAllocator {
    /// allocate `remaining` over `count` slots: every slot gets the balance
    /// floored to the cent, and the final slot absorbs the leftover cents, so
    /// the slots always sum to `remaining` exactly.
    ///
    /// count must be positive and remaining non-negative; a negative balance
    /// is a precondition violation the orchestrator reports, never silently
    /// absorbed here.
    pub fn allocate(remaining: Money, count: u32) -> Result<Vec<Money>> {
        if count == 0 {
            return Err(EngineError::ZeroAllocationCount);
        }
        if remaining.is_negative() {
            return Err(EngineError::NegativeAllocation { remaining });
        }

        let base = Money::floor_to_cent(remaining.as_decimal() / Decimal::from(count));
        let remainder = remaining - base * Decimal::from(count);

        let mut amounts = vec![base; count as usize];
        if let Some(last) = amounts.last_mut() {
            *last += remainder;
        }

        Ok(amounts)
    }
}
