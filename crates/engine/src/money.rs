//! Cost, value and profit arithmetic.
//!
//! All amounts are plain [`Decimal`] quantities: there is no currency, and no
//! rounding happens here. Rounding is a display concern.

use std::str::FromStr;

use rust_decimal::{Decimal, prelude::FromPrimitive};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// Cost of one ml of the current batch: `entry_cost / stock_before`.
///
/// Returns zero when there is no stock left to spread the cost over.
///
/// ```rust
/// use engine::money::cost_per_unit;
/// use rust_decimal::Decimal;
///
/// let per_ml = cost_per_unit(Decimal::new(12500, 2), Decimal::new(500, 0));
/// assert_eq!(per_ml, Decimal::new(25, 2));
/// assert_eq!(cost_per_unit(Decimal::TEN, Decimal::ZERO), Decimal::ZERO);
/// ```
#[must_use]
pub fn cost_per_unit(entry_cost: Decimal, stock_before: Decimal) -> Decimal {
    if stock_before.is_zero() {
        return Decimal::ZERO;
    }
    entry_cost / stock_before
}

/// Share of `entry_cost` carried by `quantity` out of `stock_before`.
///
/// Multiplies before dividing to keep precision. Selling the whole stock
/// charges the whole entry cost, so a batch is always fully amortized.
#[must_use]
pub fn batch_cost(entry_cost: Decimal, stock_before: Decimal, quantity: Decimal) -> Decimal {
    if stock_before.is_zero() {
        return Decimal::ZERO;
    }
    if quantity >= stock_before {
        return entry_cost;
    }
    entry_cost * quantity / stock_before
}

/// Value of `quantity` items (or ml) at `unit_cost` each.
#[must_use]
pub fn stock_value(quantity: Decimal, unit_cost: Decimal) -> Decimal {
    quantity * unit_cost
}

/// Profit of a sale. Negative values are losses, not errors.
#[must_use]
pub fn profit(sale_price: Decimal, total_cost: Decimal) -> Decimal {
    sale_price - total_cost
}

/// Cost breakdown of one sale, frozen at the moment it happened.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleCosts {
    pub cost_per_ml: Decimal,
    pub essence_cost: Decimal,
    pub container_cost: Decimal,
    pub overhead_cost: Decimal,
}

impl SaleCosts {
    /// Derives the costs of selling `quantity` ml from a batch worth
    /// `entry_cost` with `stock_before` ml on hand.
    #[must_use]
    pub fn compute(
        entry_cost: Decimal,
        stock_before: Decimal,
        quantity: Decimal,
        container_cost: Decimal,
        overhead_cost: Decimal,
    ) -> Self {
        Self {
            cost_per_ml: cost_per_unit(entry_cost, stock_before),
            essence_cost: batch_cost(entry_cost, stock_before, quantity),
            container_cost,
            overhead_cost,
        }
    }

    #[must_use]
    pub fn total(&self) -> Decimal {
        self.essence_cost + self.container_cost + self.overhead_cost
    }

    #[must_use]
    pub fn profit(&self, sale_price: Decimal) -> Decimal {
        profit(sale_price, self.total())
    }
}

/// Parses a user supplied decimal amount.
///
/// Accepts `.` or `,` as decimal separator and surrounding whitespace.
///
/// ```rust
/// use engine::money::parse_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_amount("12,50").unwrap(), Decimal::new(1250, 2));
/// assert!(parse_amount("abc").is_err());
/// ```
pub fn parse_amount(input: &str) -> ResultEngine<Decimal> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidInput("empty amount".to_string()));
    }
    Decimal::from_str(&trimmed.replace(',', "."))
        .map_err(|_| EngineError::InvalidInput(format!("invalid amount: {trimmed}")))
}

/// Converts a float coming from a caller into a decimal, rejecting NaN and
/// infinities.
pub fn amount_from_f64(value: f64, label: &str) -> ResultEngine<Decimal> {
    if !value.is_finite() {
        return Err(EngineError::InvalidInput(format!(
            "{label} must be a finite number"
        )));
    }
    Decimal::from_f64(value)
        .ok_or_else(|| EngineError::InvalidInput(format!("{label} is out of range")))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn batch_cost_spreads_entry_cost_over_current_stock() {
        assert_eq!(batch_cost(dec!(125), dec!(500), dec!(200)), dec!(50));
        assert_eq!(batch_cost(dec!(75), dec!(300), dec!(100)), dec!(25));
    }

    #[test]
    fn batch_cost_charges_everything_left_when_stock_runs_out() {
        let remaining = dec!(100) - batch_cost(dec!(100), dec!(300), dec!(100));
        assert_eq!(batch_cost(remaining, dec!(200), dec!(200)), remaining);
    }

    #[test]
    fn zero_stock_costs_nothing() {
        assert_eq!(batch_cost(dec!(40), Decimal::ZERO, dec!(5)), Decimal::ZERO);
        assert_eq!(cost_per_unit(dec!(40), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn sale_costs_total_and_profit() {
        let costs = SaleCosts::compute(dec!(125), dec!(500), dec!(20), dec!(5), dec!(2.50));
        assert_eq!(costs.cost_per_ml, dec!(0.25));
        assert_eq!(costs.essence_cost, dec!(5));
        assert_eq!(costs.total(), dec!(12.50));
        assert_eq!(costs.profit(dec!(10)), dec!(-2.50));
    }

    #[test]
    fn parse_amount_accepts_dot_or_comma() {
        assert_eq!(parse_amount("10").unwrap(), dec!(10));
        assert_eq!(parse_amount(" 0,25 ").unwrap(), dec!(0.25));
        assert_eq!(parse_amount("-3.5").unwrap(), dec!(-3.5));
        assert!(parse_amount("").is_err());
        assert!(parse_amount("NaN").is_err());
    }

    #[test]
    fn amount_from_f64_rejects_non_finite() {
        assert_eq!(amount_from_f64(0.25, "cost").unwrap(), dec!(0.25));
        assert!(amount_from_f64(f64::NAN, "cost").is_err());
        assert!(amount_from_f64(f64::INFINITY, "cost").is_err());
    }
}
