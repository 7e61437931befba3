use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{InstallmentId, InstallmentStatus, PlanId};

/// all events emitted by plan mutations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // plan lifecycle events
    PlanCreated {
        plan_id: PlanId,
        total_course_value: Money,
        commissionable_value: Money,
        expected_commission: Money,
        installment_count: u32,
        timestamp: DateTime<Utc>,
    },
    PlanFinancialsUpdated {
        plan_id: PlanId,
        total_course_value: Money,
        commissionable_value: Money,
        expected_commission: Money,
        timestamp: DateTime<Utc>,
    },
    PlanRecalculated {
        plan_id: PlanId,
        commissionable_value: Money,
        expected_commission: Money,
        earned_commission: Money,
        timestamp: DateTime<Utc>,
    },
    PlanDeleted {
        plan_id: PlanId,
        installment_count: u32,
        timestamp: DateTime<Utc>,
    },

    // installment payment events
    PaymentRecorded {
        plan_id: PlanId,
        installment_id: InstallmentId,
        installment_number: u32,
        amount: Money,
        paid_to_date: Money,
        new_status: InstallmentStatus,
        timestamp: DateTime<Utc>,
    },
    PaymentReverted {
        plan_id: PlanId,
        installment_id: InstallmentId,
        installment_number: u32,
        reversed_amount: Money,
        timestamp: DateTime<Utc>,
    },

    // installment status events
    InstallmentStatusChanged {
        plan_id: PlanId,
        installment_id: InstallmentId,
        installment_number: u32,
        old_status: InstallmentStatus,
        new_status: InstallmentStatus,
        timestamp: DateTime<Utc>,
    },
    InstallmentOverdue {
        plan_id: PlanId,
        installment_id: InstallmentId,
        installment_number: u32,
        college_due_date: NaiveDate,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_event_store_take_drains() {
        let mut store = EventStore::new();
        store.emit(Event::PlanDeleted {
            plan_id: Uuid::new_v4(),
            installment_count: 3,
            timestamp: Utc::now(),
        });
        assert_eq!(store.events().len(), 1);

        let taken = store.take_events();
        assert_eq!(taken.len(), 1);
        assert!(store.events().is_empty());
    }
}
