use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use anyhow::{Result, bail};
use serde::Deserialize;

/// Energy price in the feed's units. Wholesale prices can go negative, so only
/// finiteness is enforced.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Deserialize)]
#[serde(try_from = "f64")]
pub struct Price(f64);

impl Price {
    pub const ZERO: Price = Price(0.0);

    pub fn new(value: f64) -> Result<Self> {
        if !value.is_finite() {
            bail!("price must be finite, got {value}");
        }

        Ok(Price(value))
    }

    #[cfg(test)]
    pub fn as_f64(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{:.4}", self.0)
    }
}

impl TryFrom<f64> for Price {
    type Error = anyhow::Error;

    fn try_from(value: f64) -> Result<Self> {
        Price::new(value)
    }
}

impl Add for Price {
    type Output = Price;

    fn add(self, rhs: Price) -> Price {
        Price(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Price>>(iter: I) -> Price {
        iter.fold(Price::ZERO, Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_finite_values() {
        assert!(Price::new(f64::NAN).is_err());
        assert!(Price::new(f64::INFINITY).is_err());
        assert!(serde_json::from_str::<Price>("1e999").is_err());
    }

    #[test]
    fn accepts_negative_prices() {
        let price = Price::new(-0.0125).unwrap();

        assert_eq!(price.as_f64(), -0.0125);
        assert_eq!(price.to_string(), "-0.0125");
    }

    #[test]
    fn sums_in_iteration_order() {
        let total: Price = [5.0, 4.0, 3.0]
            .into_iter()
            .map(|value| Price::new(value).unwrap())
            .sum();

        assert_eq!(total, Price::new(12.0).unwrap());
    }
}
