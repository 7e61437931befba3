use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::decimal::Money;
use crate::types::InstallmentStatus;

/// a single per-field validation failure, shaped for wizard UIs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid request: {} field error(s)", .errors.len())]
    StructuralValidation {
        errors: Vec<FieldError>,
    },

    #[error("initial payment {initial_payment} exceeds commissionable value {commissionable_value}")]
    InitialPaymentExceedsCommissionable {
        initial_payment: Money,
        commissionable_value: Money,
    },

    #[error("invalid status transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: InstallmentStatus,
        to: InstallmentStatus,
    },

    #[error("paid fields inconsistent for status {status:?}: {message}")]
    PaidFieldsInvalid {
        status: InstallmentStatus,
        message: String,
    },

    #[error("invalid payment amount: {amount}")]
    InvalidPaymentAmount {
        amount: Money,
    },

    #[error("allocation count must be positive")]
    ZeroAllocationCount,

    #[error("cannot allocate negative remaining balance: {remaining}")]
    NegativeAllocation {
        remaining: Money,
    },

    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },

    #[error("plan not found: {id}")]
    PlanNotFound {
        id: Uuid,
    },

    #[error("installment not found: plan {plan_id}, number {number}")]
    InstallmentNotFound {
        plan_id: Uuid,
        number: u32,
    },

    #[error("stored commission rate is malformed: {rate}")]
    MalformedRate {
        rate: Decimal,
    },
}

/// error classification per the engine's contract: structural problems are
/// reported per field before calculation, domain problems are business-rule
/// rejections of valid input, consistency failures abort persisted writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    StructuralValidation,
    DomainValidation,
    ConsistencyFailure,
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::StructuralValidation { .. } => ErrorKind::StructuralValidation,
            EngineError::InitialPaymentExceedsCommissionable { .. }
            | EngineError::InvalidTransition { .. }
            | EngineError::PaidFieldsInvalid { .. }
            | EngineError::InvalidPaymentAmount { .. }
            | EngineError::PlanNotFound { .. }
            | EngineError::InstallmentNotFound { .. } => ErrorKind::DomainValidation,
            EngineError::ZeroAllocationCount
            | EngineError::NegativeAllocation { .. }
            | EngineError::InvalidDate { .. }
            | EngineError::MalformedRate { .. } => ErrorKind::ConsistencyFailure,
        }
    }

    /// the per-field detail for structural failures, empty otherwise
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            EngineError::StructuralValidation { errors } => errors,
            _ => &[],
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
