pub mod commissionable;
pub mod earned;
pub mod expected;

pub use commissionable::{CommissionableValue, CommissionableValueCalculator};
pub use earned::{paid_amount_sum, EarnedCommissionCalculator};
pub use expected::{ExpectedCommission, ExpectedCommissionCalculator};
