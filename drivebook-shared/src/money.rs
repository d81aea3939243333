use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// Decimal currency amount.
///
/// Arithmetic is exact; only [`Money::rounded`] and the `Display` impl round,
/// and they round to two fraction digits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn from_whole(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply by a unit count, saturating at `Decimal::MAX`
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.checked_mul(Decimal::from(quantity)).unwrap_or(Decimal::MAX))
    }

    /// Multiply by a factor such as `0.8`, saturating at `Decimal::MAX`
    pub fn scale(self, factor: Decimal) -> Self {
        Self(self.0.checked_mul(factor).unwrap_or(Decimal::MAX))
    }

    /// Amount rounded for display (half away from zero, 2 digits)
    pub fn rounded(&self) -> Decimal {
        self.0.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    pub fn format_with(&self, symbol: &str) -> String {
        format!("{}{:.2}", symbol, self.rounded())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with("$"))
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.checked_add(rhs.0).unwrap_or(Decimal::MAX))
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Invalid currency amount: {0}")]
    Invalid(String),
}

/// Parses display strings such as `$60`, `$60.00` or `60`
impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('$').unwrap_or(trimmed);
        Decimal::from_str(digits)
            .map(Money)
            .map_err(|_| MoneyError::Invalid(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_rounds_to_cents() {
        assert_eq!(Money::from_whole(60).to_string(), "$60.00");

        let third = Money::new(Decimal::from(100) / Decimal::from(3));
        assert_eq!(third.to_string(), "$33.33");
        // Underlying amount keeps full precision
        assert_ne!(third.amount(), third.rounded());
    }

    #[test]
    fn test_parse_display_strings() {
        assert_eq!("$60".parse::<Money>().unwrap(), Money::from_whole(60));
        assert_eq!("$65.50".parse::<Money>().unwrap(), Money::new(Decimal::new(6550, 2)));
        assert_eq!(" 75 ".parse::<Money>().unwrap(), Money::from_whole(75));
        assert!("sixty".parse::<Money>().is_err());
    }

    #[test]
    fn test_arithmetic() {
        let base = Money::from_whole(60);
        assert_eq!(base.times(5), Money::from_whole(300));
        assert_eq!(
            Money::from_whole(345).scale(Decimal::new(8, 1)),
            Money::from_whole(276)
        );

        let total: Money = [Money::from_whole(45), Money::from_whole(30)].iter().sum();
        assert_eq!(total, Money::from_whole(75));
        assert_eq!(Money::from_whole(345) - Money::from_whole(276), Money::from_whole(69));
    }

    #[test]
    fn test_times_saturates() {
        let huge = Money::new(Decimal::MAX);
        assert_eq!(huge.times(2).amount(), Decimal::MAX);
    }
}
