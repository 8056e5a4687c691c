//! Order pricing.
//!
//! amount = subtotal + floor(subtotal * fee_rate)

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::errors::OrderError;
use crate::domain::shared::Money;

/// Fee rate applied when none is configured.
pub const DEFAULT_FEE_RATE: Decimal = dec!(0.02);

/// Breakdown of a priced order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderQuote {
    /// Sum of `offerPrice * quantity` over all lines.
    pub subtotal: Money,
    /// Floored service fee.
    pub fee: Money,
    /// Amount charged: subtotal plus fee.
    pub amount: Money,
}

/// Service-fee policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingPolicy {
    fee_rate: Decimal,
}

impl PricingPolicy {
    /// Create a policy with the given fee rate.
    #[must_use]
    pub const fn new(fee_rate: Decimal) -> Self {
        Self { fee_rate }
    }

    /// Configured fee rate.
    #[must_use]
    pub const fn fee_rate(&self) -> Decimal {
        self.fee_rate
    }

    /// Price a set of line totals.
    ///
    /// The fee is floored to whole currency units; the subtotal is not
    /// rounded.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::AmountOutOfRange`] if any sum overflows.
    pub fn quote<I>(&self, line_totals: I) -> Result<OrderQuote, OrderError>
    where
        I: IntoIterator<Item = Money>,
    {
        let subtotal = Money::checked_sum(line_totals).ok_or(OrderError::AmountOutOfRange)?;
        let fee = subtotal
            .checked_mul(self.fee_rate)
            .ok_or(OrderError::AmountOutOfRange)?
            .floor();
        let amount = subtotal
            .checked_add(fee)
            .ok_or(OrderError::AmountOutOfRange)?;

        Ok(OrderQuote {
            subtotal,
            fee,
            amount,
        })
    }
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_FEE_RATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn two_units_at_default_rate() {
        let quote = PricingPolicy::default()
            .quote([Money::from_units(200)])
            .unwrap();
        assert_eq!(quote.subtotal, Money::from_units(200));
        assert_eq!(quote.fee, Money::from_units(4));
        assert_eq!(quote.amount, Money::from_units(204));
    }

    #[test]
    fn fee_is_floored() {
        // 49.99 * 0.02 = 0.9998 -> 0
        let quote = PricingPolicy::default()
            .quote([Money::new(dec!(49.99))])
            .unwrap();
        assert_eq!(quote.fee, Money::ZERO);
        assert_eq!(quote.amount, Money::new(dec!(49.99)));
    }

    #[test]
    fn subtotal_keeps_cents() {
        let quote = PricingPolicy::default()
            .quote([Money::new(dec!(59.97)), Money::new(dec!(5.01))])
            .unwrap();
        assert_eq!(quote.subtotal, Money::new(dec!(64.98)));
        assert_eq!(quote.fee, Money::from_units(1));
        assert_eq!(quote.amount, Money::new(dec!(65.98)));
    }

    #[test]
    fn zero_rate_adds_nothing() {
        let quote = PricingPolicy::new(Decimal::ZERO)
            .quote([Money::from_units(1_000)])
            .unwrap();
        assert_eq!(quote.amount, Money::from_units(1_000));
    }

    #[test]
    fn custom_rate() {
        let quote = PricingPolicy::new(dec!(0.1))
            .quote([Money::new(dec!(99.5))])
            .unwrap();
        assert_eq!(quote.fee, Money::from_units(9));
    }

    #[test]
    fn overflowing_subtotal_is_rejected() {
        let max = Money::new(Decimal::MAX);
        assert_eq!(
            PricingPolicy::default().quote([max, max]),
            Err(OrderError::AmountOutOfRange)
        );
    }

    #[test]
    fn overflowing_fee_is_rejected() {
        // subtotal fits, but subtotal + fee does not
        assert_eq!(
            PricingPolicy::new(Decimal::ONE).quote([Money::new(Decimal::MAX)]),
            Err(OrderError::AmountOutOfRange)
        );
    }

    proptest! {
        #[test]
        fn amount_is_subtotal_plus_floored_fee(cents in 0i64..10_000_000, qty in 1u32..50) {
            let price = Money::new(Decimal::new(cents, 2));
            let line = price.checked_times(qty).unwrap();
            let quote = PricingPolicy::default().quote([line]).unwrap();

            prop_assert_eq!(Some(quote.amount), quote.subtotal.checked_add(quote.fee));
            prop_assert!(quote.fee.amount().fract().is_zero());
            prop_assert!(quote.fee.amount() <= quote.subtotal.amount() * DEFAULT_FEE_RATE);
            prop_assert!(quote.amount >= quote.subtotal);
        }
    }
}
