use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::Rate;
use rust_decimal::Decimal;

/// GST treatment for the jurisdiction the agency operates in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GstConfig {
    /// GST rate as a decimal fraction (e.g., 0.10 for 10%)
    pub rate: Rate,
}

impl GstConfig {
    pub fn new(rate: Rate) -> Self {
        Self { rate }
    }

    /// Australian GST, 10%
    pub fn australia() -> Self {
        Self {
            rate: Rate::from_decimal(dec!(0.10)),
        }
    }

    /// divisor that strips GST from an inclusive amount
    pub fn gst_divisor(&self) -> Decimal {
        Decimal::ONE + self.rate.as_decimal()
    }
}

/// bounds on schedule generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleLimits {
    /// maximum number of regular installments per plan
    pub max_installments: u32,
    /// maximum student lead time in calendar days
    pub max_lead_time_days: u32,
}

impl Default for ScheduleLimits {
    fn default() -> Self {
        Self {
            max_installments: 60,
            max_lead_time_days: 365,
        }
    }
}

/// engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub gst: GstConfig,
    pub limits: ScheduleLimits,
    pub default_currency: String,
}

impl EngineConfig {
    /// Australian agency defaults: 10% GST, AUD
    pub fn australia() -> Self {
        Self {
            gst: GstConfig::australia(),
            limits: ScheduleLimits::default(),
            default_currency: "AUD".to_string(),
        }
    }

    /// configuration for an arbitrary jurisdiction
    pub fn with_gst_rate(gst_rate: Rate, currency: impl Into<String>) -> Self {
        Self {
            gst: GstConfig::new(gst_rate),
            limits: ScheduleLimits::default(),
            default_currency: currency.into(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::australia()
    }
}
