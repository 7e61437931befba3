pub mod commission;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod installment;
pub mod lifecycle;
pub mod plan;
pub mod preview;
pub mod recalc;
pub mod schedule;
pub mod types;

// re-export key types
pub use commission::{
    CommissionableValueCalculator, EarnedCommissionCalculator, ExpectedCommissionCalculator,
};
pub use config::{EngineConfig, GstConfig, ScheduleLimits};
pub use decimal::{Money, Rate};
pub use errors::{EngineError, ErrorKind, FieldError, Result};
pub use events::{Event, EventStore};
pub use installment::Installment;
pub use plan::{PaymentPlan, PlanFinancialPatch};
pub use preview::{
    InstallmentPreview, InstallmentPreviewBuilder, PreviewRequest, PreviewResponse, PreviewSummary,
};
pub use recalc::{
    InMemoryPlanStore, InstallmentView, PlanService, PlanStore, PlanView, RecalculationEngine,
    RecalculationOutcome,
};
pub use schedule::{AmountAllocator, DueDateScheduler};
pub use types::{InstallmentId, InstallmentStatus, PaymentFrequency, PlanId};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
