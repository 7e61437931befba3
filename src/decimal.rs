use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Sub, SubAssign};
use std::str::FromStr;

/// Money type with 2 decimal places, rounded half-up to the cent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Money(Decimal);

fn round_cents(d: Decimal) -> Decimal {
    d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);
    pub const CENT: Money = Money(Decimal::from_parts(1, 0, 0, false, 2));

    /// create from decimal, rounding half-up to cents
    pub fn from_decimal(d: Decimal) -> Self {
        Money(round_cents(d))
    }

    /// create from string with exact parsing
    pub fn from_str_exact(s: &str) -> Result<Self, rust_decimal::Error> {
        Ok(Money(round_cents(Decimal::from_str(s)?)))
    }

    /// create from whole currency units
    pub fn from_major(amount: i64) -> Self {
        Money(Decimal::from(amount))
    }

    /// create from cents
    pub fn from_minor(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

    /// floor a raw decimal to the cent, discarding sub-cent precision
    pub fn floor_to_cent(d: Decimal) -> Self {
        Money(d.round_dp_with_strategy(2, RoundingStrategy::ToNegativeInfinity))
    }

    /// get underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// check if zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// check if strictly positive
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// check if negative
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// absolute value
    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// minimum of two values
    pub fn min(self, other: Self) -> Self {
        Money(self.0.min(other.0))
    }

    /// maximum of two values
    pub fn max(self, other: Self) -> Self {
        Money(self.0.max(other.0))
    }

    /// clamp into an inclusive range
    pub fn clamp(self, low: Self, high: Self) -> Self {
        self.max(low).min(high)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::from_str_exact(s)
    }
}

impl From<Decimal> for Money {
    fn from(d: Decimal) -> Self {
        Money::from_decimal(d)
    }
}

impl From<i32> for Money {
    fn from(i: i32) -> Self {
        Money::from_major(i as i64)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Money) {
        self.0 -= other.0;
    }
}

impl Mul<Decimal> for Money {
    type Output = Money;

    fn mul(self, other: Decimal) -> Money {
        Money(round_cents(self.0 * other))
    }
}

impl Div<Decimal> for Money {
    type Output = Money;

    fn div(self, other: Decimal) -> Money {
        Money(round_cents(self.0 / other))
    }
}

/// rate type for commission rates and ratios, stored as a decimal fraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Rate(Decimal);

impl Rate {
    pub const ZERO: Rate = Rate(Decimal::ZERO);
    pub const ONE: Rate = Rate(Decimal::ONE);

    /// create from decimal fraction (e.g., 0.15 for 15%)
    pub fn from_decimal(d: Decimal) -> Self {
        Rate(d)
    }

    /// create from percentage (e.g., 15 for 15%)
    pub fn from_percentage(p: u32) -> Self {
        Rate(Decimal::from(p) / Decimal::from(100))
    }

    /// reconcile a stored rate that may be in 0-1 or 0-100 form.
    /// values above 1 are treated as percentages.
    pub fn from_stored(d: Decimal) -> Self {
        if d > Decimal::ONE {
            Rate(d / Decimal::from(100))
        } else {
            Rate(d)
        }
    }

    /// get as decimal fraction
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// get as percentage
    pub fn as_percentage(&self) -> Decimal {
        self.0 * Decimal::from(100)
    }

    /// check if within the valid commission range [0, 1]
    pub fn is_valid_fraction(&self) -> bool {
        self.0 >= Decimal::ZERO && self.0 <= Decimal::ONE
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage())
    }
}

impl From<Decimal> for Rate {
    fn from(d: Decimal) -> Self {
        Rate::from_decimal(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_rounds_half_up() {
        assert_eq!(Money::from_decimal(dec!(1.005)), Money::from_str_exact("1.01").unwrap());
        assert_eq!(Money::from_decimal(dec!(1.004)), Money::from_str_exact("1.00").unwrap());
        assert_eq!(Money::from_decimal(dec!(1254.5454)), Money::from_str_exact("1254.55").unwrap());
    }

    #[test]
    fn test_floor_to_cent() {
        assert_eq!(Money::floor_to_cent(dec!(333.3333)), Money::from_str_exact("333.33").unwrap());
        assert_eq!(Money::floor_to_cent(dec!(333.3399)), Money::from_str_exact("333.33").unwrap());
        assert_eq!(Money::floor_to_cent(dec!(333.33)), Money::from_str_exact("333.33").unwrap());
    }

    #[test]
    fn test_from_minor() {
        assert_eq!(Money::from_minor(100_00), Money::from_major(100));
        assert_eq!(Money::from_minor(1), Money::CENT);
    }

    #[test]
    fn test_sign_checks() {
        assert!(!Money::ZERO.is_positive());
        assert!(!Money::ZERO.is_negative());
        assert!(Money::from_major(1).is_positive());
        assert!((Money::ZERO - Money::from_major(1)).is_negative());
    }

    #[test]
    fn test_rate_from_stored_reconciles_forms() {
        assert_eq!(Rate::from_stored(dec!(0.15)), Rate::from_percentage(15));
        assert_eq!(Rate::from_stored(dec!(15)), Rate::from_percentage(15));
        assert_eq!(Rate::from_stored(dec!(1)), Rate::ONE);
        assert_eq!(Rate::from_stored(dec!(100)), Rate::ONE);
    }

    #[test]
    fn test_rate_validity() {
        assert!(Rate::from_decimal(dec!(0.5)).is_valid_fraction());
        assert!(Rate::ZERO.is_valid_fraction());
        assert!(!Rate::from_decimal(dec!(-0.1)).is_valid_fraction());
        assert!(!Rate::from_decimal(dec!(1.5)).is_valid_fraction());
    }
}
