//! Order pricing configuration.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::ordering::PricingPolicy;
use crate::domain::ordering::pricing::DEFAULT_FEE_RATE;

/// Order pricing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Fee rate applied to the subtotal before flooring.
    #[serde(default = "default_fee_rate")]
    pub fee_rate: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            fee_rate: default_fee_rate(),
        }
    }
}

impl PricingConfig {
    /// Pricing policy for the configured rate.
    #[must_use]
    pub const fn policy(&self) -> PricingPolicy {
        PricingPolicy::new(self.fee_rate)
    }
}

const fn default_fee_rate() -> Decimal {
    DEFAULT_FEE_RATE
}
