use anyhow::Result;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::env;

use crate::market::PricingRule;

/// Per-run market policy, passed into the coordinator at construction.
/// The pricing rule is fixed for the whole simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    pub pricing_rule: PricingRule,
    /// Absolute tolerance for the pay-as-clear turnover conservation check.
    pub turnover_tolerance: Decimal,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            pricing_rule: PricingRule::PayAsClear,
            turnover_tolerance: Decimal::new(1, 3), // 0.001
        }
    }
}

impl MarketConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let pricing_rule = match env::var("AUCTION_PRICING_RULE")
            .unwrap_or_else(|_| "pay_as_clear".to_string())
            .to_lowercase()
            .as_str()
        {
            "pac" | "pay_as_clear" => PricingRule::PayAsClear,
            "pab" | "pay_as_bid" => PricingRule::PayAsBid,
            other => anyhow::bail!("unknown AUCTION_PRICING_RULE: {other}"),
        };

        let turnover_tolerance = env::var("AUCTION_TURNOVER_TOLERANCE")
            .map(|raw| raw.parse::<Decimal>())
            .unwrap_or(Ok(Decimal::new(1, 3)))?;

        Ok(Self {
            pricing_rule,
            turnover_tolerance,
        })
    }
}
