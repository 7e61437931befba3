use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::commission::{
    paid_amount_sum, CommissionableValueCalculator, EarnedCommissionCalculator,
    ExpectedCommissionCalculator,
};
use crate::config::EngineConfig;
use crate::decimal::Money;
use crate::errors::{EngineError, Result};
use crate::events::{Event, EventStore};
use crate::installment::Installment;
use crate::plan::{PaymentPlan, PlanFinancialPatch};
use crate::preview::{InstallmentPreviewBuilder, PreviewRequest};
use crate::types::{InstallmentStatus, PlanId};

/// result of recomputing a plan's derived fields
#[derive(Debug, Clone, PartialEq)]
pub struct RecalculationOutcome {
    pub commissionable_value: Money,
    pub expected_commission: Money,
    pub earned_commission: Money,
    pub paid_amount_sum: Money,
    /// whether any derived field differs from what the plan stored
    pub changed: bool,
}

impl RecalculationOutcome {
    fn apply_to(&self, plan: &mut PaymentPlan, now: DateTime<Utc>) {
        plan.commissionable_value = self.commissionable_value;
        plan.expected_commission = self.expected_commission;
        plan.earned_commission = self.earned_commission;
        plan.recalculated_at = now;
    }
}

/// pure recomputation of a plan's derived fields from its inputs and
/// installments, using the same calculators as the preview builder so the
/// stateless and persisted paths can never disagree
pub struct RecalculationEngine {
    config: EngineConfig,
}

impl RecalculationEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn recalculate(
        &self,
        plan: &PaymentPlan,
        installments: &[Installment],
    ) -> Result<RecalculationOutcome> {
        // a stored rate outside [0, 1] means the plan row itself is corrupt;
        // committing derived fields off it would bake the corruption in
        if !plan.commission_rate.is_valid_fraction() {
            return Err(EngineError::MalformedRate {
                rate: plan.commission_rate.as_decimal(),
            });
        }

        let commissionable_value = CommissionableValueCalculator::calc(
            plan.total_course_value,
            Some(plan.materials_cost),
            Some(plan.admin_fees),
            Some(plan.other_fees),
        );

        let expected_commission = ExpectedCommissionCalculator::new(self.config.gst.clone()).calc(
            commissionable_value,
            plan.commission_rate,
            plan.gst_inclusive,
        );

        let paid_sum = paid_amount_sum(installments);
        let earned_commission =
            EarnedCommissionCalculator::calc(paid_sum, plan.total_course_value, expected_commission);

        let changed = commissionable_value != plan.commissionable_value
            || expected_commission != plan.expected_commission
            || earned_commission != plan.earned_commission;

        Ok(RecalculationOutcome {
            commissionable_value,
            expected_commission,
            earned_commission,
            paid_amount_sum: paid_sum,
            changed,
        })
    }
}

/// seam for the datastore holding plans and their installments. `load` hands
/// back an owned copy; `commit` replaces the stored row wholesale, so a
/// failed operation between the two leaves the store untouched.
pub trait PlanStore {
    fn load(&self, id: PlanId) -> Result<(PaymentPlan, Vec<Installment>)>;
    fn commit(&mut self, plan: PaymentPlan, installments: Vec<Installment>) -> Result<()>;
    fn remove(&mut self, id: PlanId) -> Result<(PaymentPlan, Vec<Installment>)>;
}

/// reference in-memory store
#[derive(Debug, Default)]
pub struct InMemoryPlanStore {
    plans: HashMap<PlanId, (PaymentPlan, Vec<Installment>)>,
}

impl InMemoryPlanStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

impl PlanStore for InMemoryPlanStore {
    fn load(&self, id: PlanId) -> Result<(PaymentPlan, Vec<Installment>)> {
        self.plans
            .get(&id)
            .cloned()
            .ok_or(EngineError::PlanNotFound { id })
    }

    fn commit(&mut self, plan: PaymentPlan, installments: Vec<Installment>) -> Result<()> {
        self.plans.insert(plan.id, (plan, installments));
        Ok(())
    }

    fn remove(&mut self, id: PlanId) -> Result<(PaymentPlan, Vec<Installment>)> {
        self.plans
            .remove(&id)
            .ok_or(EngineError::PlanNotFound { id })
    }
}

/// application-layer counterpart of the preview builder: every mutation of a
/// plan or its installments runs through load -> mutate -> recalculate ->
/// commit, so derived fields are never observable stale relative to their
/// inputs, and an error at any stage leaves the store as it was
pub struct PlanService<S: PlanStore> {
    store: S,
    config: EngineConfig,
    engine: RecalculationEngine,
    pub events: EventStore,
}

impl PlanService<InMemoryPlanStore> {
    pub fn in_memory(config: EngineConfig) -> Self {
        Self::new(InMemoryPlanStore::new(), config)
    }
}

impl<S: PlanStore> PlanService<S> {
    pub fn new(store: S, config: EngineConfig) -> Self {
        let engine = RecalculationEngine::new(config.clone());
        Self {
            store,
            config,
            engine,
            events: EventStore::new(),
        }
    }

    /// the confirm step of the wizard flow: build the preview, persist the
    /// plan and its installment rows, and derive the initial earned figure
    /// (a pre-paid deposit contributes immediately)
    pub fn create_plan(
        &mut self,
        request: &PreviewRequest,
        time_provider: &SafeTimeProvider,
    ) -> Result<PlanId> {
        let preview = InstallmentPreviewBuilder::new(&self.config).build(request)?;
        let now = time_provider.now();

        let mut plan = PaymentPlan::from_request(
            request,
            &preview.summary,
            self.config.default_currency.clone(),
            now,
        );
        let installments: Vec<Installment> = preview
            .installments
            .iter()
            .map(|p| Installment::from_preview(plan.id, p, now))
            .collect();

        let outcome = self.engine.recalculate(&plan, &installments)?;
        outcome.apply_to(&mut plan, now);

        let plan_id = plan.id;
        let installment_count = installments.len() as u32;
        let event = Event::PlanCreated {
            plan_id,
            total_course_value: plan.total_course_value,
            commissionable_value: plan.commissionable_value,
            expected_commission: plan.expected_commission,
            installment_count,
            timestamp: now,
        };
        self.store.commit(plan, installments)?;
        self.events.emit(event);

        info!(%plan_id, installment_count, "payment plan created");
        Ok(plan_id)
    }

    /// edit the plan's financial inputs and recompute all derived fields
    pub fn update_financials(
        &mut self,
        id: PlanId,
        patch: &PlanFinancialPatch,
        time_provider: &SafeTimeProvider,
    ) -> Result<RecalculationOutcome> {
        let (mut plan, installments) = self.store.load(id)?;
        plan.apply_patch(patch);
        let total_course_value = plan.total_course_value;

        let outcome = self.recalculate_and_commit(plan, installments, time_provider)?;
        self.events.emit(Event::PlanFinancialsUpdated {
            plan_id: id,
            total_course_value,
            commissionable_value: outcome.commissionable_value,
            expected_commission: outcome.expected_commission,
            timestamp: time_provider.now(),
        });
        Ok(outcome)
    }

    /// confirm every draft installment into the live schedule
    pub fn activate_installments(
        &mut self,
        id: PlanId,
        time_provider: &SafeTimeProvider,
    ) -> Result<u32> {
        let (plan, mut installments) = self.store.load(id)?;
        let now = time_provider.now();

        let mut activated = 0;
        for inst in installments
            .iter_mut()
            .filter(|i| i.status == InstallmentStatus::Draft)
        {
            inst.activate()?;
            self.events.emit(Event::InstallmentStatusChanged {
                plan_id: id,
                installment_id: inst.id,
                installment_number: inst.installment_number,
                old_status: InstallmentStatus::Draft,
                new_status: InstallmentStatus::Pending,
                timestamp: now,
            });
            activated += 1;
        }

        self.recalculate_and_commit(plan, installments, time_provider)?;
        Ok(activated)
    }

    /// record a payment against one installment and re-derive earned
    /// commission in the same commit
    pub fn record_payment(
        &mut self,
        id: PlanId,
        installment_number: u32,
        amount: Money,
        paid_date: NaiveDate,
        notes: Option<String>,
        time_provider: &SafeTimeProvider,
    ) -> Result<RecalculationOutcome> {
        let (plan, mut installments) = self.store.load(id)?;
        let inst = find_installment(&mut installments, id, installment_number)?;

        let old_status = inst.status;
        let new_status = inst.record_payment(amount, paid_date, notes)?;
        let event = Event::PaymentRecorded {
            plan_id: id,
            installment_id: inst.id,
            installment_number,
            amount,
            paid_to_date: inst.paid_to_date(),
            new_status,
            timestamp: time_provider.now(),
        };

        let outcome = self.recalculate_and_commit(plan, installments, time_provider)?;
        self.events.emit(event);

        info!(
            plan_id = %id,
            installment_number,
            %amount,
            ?old_status,
            ?new_status,
            "payment recorded"
        );
        Ok(outcome)
    }

    /// reverse a completed payment, clearing the paid fields and shrinking
    /// earned commission accordingly
    pub fn revert_payment(
        &mut self,
        id: PlanId,
        installment_number: u32,
        time_provider: &SafeTimeProvider,
    ) -> Result<RecalculationOutcome> {
        let (plan, mut installments) = self.store.load(id)?;
        let inst = find_installment(&mut installments, id, installment_number)?;

        let reversed = inst.revert_payment()?;
        let event = Event::PaymentReverted {
            plan_id: id,
            installment_id: inst.id,
            installment_number,
            reversed_amount: reversed,
            timestamp: time_provider.now(),
        };

        let outcome = self.recalculate_and_commit(plan, installments, time_provider)?;
        self.events.emit(event);
        Ok(outcome)
    }

    /// withdraw an installment from the schedule
    pub fn cancel_installment(
        &mut self,
        id: PlanId,
        installment_number: u32,
        time_provider: &SafeTimeProvider,
    ) -> Result<RecalculationOutcome> {
        let (plan, mut installments) = self.store.load(id)?;
        let inst = find_installment(&mut installments, id, installment_number)?;

        let old_status = inst.status;
        inst.cancel()?;
        let event = Event::InstallmentStatusChanged {
            plan_id: id,
            installment_id: inst.id,
            installment_number,
            old_status,
            new_status: InstallmentStatus::Cancelled,
            timestamp: time_provider.now(),
        };

        let outcome = self.recalculate_and_commit(plan, installments, time_provider)?;
        self.events.emit(event);
        Ok(outcome)
    }

    /// sweep pending and partial installments whose college due date has
    /// passed, returning how many were flagged
    pub fn mark_overdue_installments(
        &mut self,
        id: PlanId,
        time_provider: &SafeTimeProvider,
    ) -> Result<u32> {
        let (plan, mut installments) = self.store.load(id)?;
        let now = time_provider.now();
        let today = now.date_naive();

        let mut flagged = 0;
        for inst in installments.iter_mut() {
            let past_due = matches!(
                inst.status,
                InstallmentStatus::Pending | InstallmentStatus::Partial
            ) && inst.college_due_date.is_some_and(|d| d < today);
            if !past_due {
                continue;
            }

            inst.mark_overdue()?;
            self.events.emit(Event::InstallmentOverdue {
                plan_id: id,
                installment_id: inst.id,
                installment_number: inst.installment_number,
                // checked above
                college_due_date: inst.college_due_date.unwrap_or(today),
                timestamp: now,
            });
            flagged += 1;
        }

        self.recalculate_and_commit(plan, installments, time_provider)?;
        Ok(flagged)
    }

    /// delete a plan and, with it, every installment that references it
    pub fn delete_plan(&mut self, id: PlanId, time_provider: &SafeTimeProvider) -> Result<()> {
        let (plan, installments) = self.store.remove(id)?;
        self.events.emit(Event::PlanDeleted {
            plan_id: plan.id,
            installment_count: installments.len() as u32,
            timestamp: time_provider.now(),
        });
        info!(plan_id = %id, "payment plan deleted");
        Ok(())
    }

    /// serializable snapshot for dashboard consumers
    pub fn plan_view(&self, id: PlanId) -> Result<PlanView> {
        let (plan, installments) = self.store.load(id)?;
        Ok(PlanView::from_parts(&plan, &installments))
    }

    fn recalculate_and_commit(
        &mut self,
        mut plan: PaymentPlan,
        installments: Vec<Installment>,
        time_provider: &SafeTimeProvider,
    ) -> Result<RecalculationOutcome> {
        let outcome = self.engine.recalculate(&plan, &installments)?;
        let now = time_provider.now();
        let plan_id = plan.id;

        if outcome.changed {
            outcome.apply_to(&mut plan, now);
        }
        self.store.commit(plan, installments)?;

        if outcome.changed {
            self.events.emit(Event::PlanRecalculated {
                plan_id,
                commissionable_value: outcome.commissionable_value,
                expected_commission: outcome.expected_commission,
                earned_commission: outcome.earned_commission,
                timestamp: now,
            });
        }
        Ok(outcome)
    }
}

fn find_installment<'a>(
    installments: &'a mut [Installment],
    plan_id: PlanId,
    number: u32,
) -> Result<&'a mut Installment> {
    installments
        .iter_mut()
        .find(|i| i.installment_number == number)
        .ok_or(EngineError::InstallmentNotFound { plan_id, number })
}

/// serializable view of one installment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallmentView {
    pub installment_number: u32,
    pub amount: Money,
    pub is_initial_payment: bool,
    pub status: InstallmentStatus,
    pub student_due_date: Option<NaiveDate>,
    pub college_due_date: Option<NaiveDate>,
    pub paid_amount: Option<Money>,
    pub paid_date: Option<NaiveDate>,
    pub outstanding: Money,
}

/// serializable view of a plan and its schedule for dashboard widgets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanView {
    pub id: PlanId,
    pub currency: String,
    pub total_course_value: Money,
    pub commissionable_value: Money,
    pub expected_commission: Money,
    pub earned_commission: Money,
    pub paid_to_date: Money,
    pub remaining_balance: Money,
    pub installment_count: u32,
    pub paid_count: u32,
    pub overdue_count: u32,
    pub recalculated_at: DateTime<Utc>,
    pub installments: Vec<InstallmentView>,
}

impl PlanView {
    pub fn from_parts(plan: &PaymentPlan, installments: &[Installment]) -> Self {
        let paid_to_date = installments
            .iter()
            .filter(|i| i.status.contributes_to_earned())
            .fold(Money::ZERO, |acc, i| acc + i.paid_to_date());
        let remaining_balance = installments
            .iter()
            .filter(|i| i.status != InstallmentStatus::Cancelled)
            .fold(Money::ZERO, |acc, i| acc + i.outstanding());

        Self {
            id: plan.id,
            currency: plan.currency.clone(),
            total_course_value: plan.total_course_value,
            commissionable_value: plan.commissionable_value,
            expected_commission: plan.expected_commission,
            earned_commission: plan.earned_commission,
            paid_to_date,
            remaining_balance,
            installment_count: installments.len() as u32,
            paid_count: installments
                .iter()
                .filter(|i| i.status == InstallmentStatus::Paid)
                .count() as u32,
            overdue_count: installments
                .iter()
                .filter(|i| i.status == InstallmentStatus::Overdue)
                .count() as u32,
            recalculated_at: plan.recalculated_at,
            installments: installments
                .iter()
                .map(|i| InstallmentView {
                    installment_number: i.installment_number,
                    amount: i.amount,
                    is_initial_payment: i.is_initial_payment,
                    status: i.status,
                    student_due_date: i.student_due_date,
                    college_due_date: i.college_due_date,
                    paid_amount: i.paid_amount,
                    paid_date: i.paid_date,
                    outstanding: i.outstanding(),
                })
                .collect(),
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
