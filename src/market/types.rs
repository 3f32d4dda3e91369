use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Pricing rule applied when decomposing the executed volume into trades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingRule {
    /// Every executed trade settles at the single uniform clearing price.
    PayAsClear,
    /// Every executed trade settles at the buyer's own bid price.
    PayAsBid,
}

/// Willingness to buy up to `quantity` at a price of at most `price`.
/// Prices are signed; negative pricing is a legal grid state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bid {
    pub price: Decimal,
    pub quantity: Decimal,
    pub participant: Uuid,
}

/// Willingness to sell up to `quantity` at a price of at least `price`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub price: Decimal,
    pub quantity: Decimal,
    pub participant: Uuid,
}

/// One breakpoint on the merged cumulative demand/supply curve.
///
/// `bid_price`/`buyer` are `None` once the demand curve is exhausted at this
/// quantity level; symmetrically for `offer_price`/`seller`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub cumulative_quantity: Decimal,
    pub bid_price: Option<Decimal>,
    pub offer_price: Option<Decimal>,
    pub buyer: Option<Uuid>,
    pub seller: Option<Uuid>,
}

/// Where the curves cross. Both fields present, or both absent when no
/// trade occurs this interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClearingResult {
    pub quantity: Option<Decimal>,
    pub price: Option<Decimal>,
}

impl ClearingResult {
    pub const NO_TRADE: Self = Self {
        quantity: None,
        price: None,
    };

    pub fn is_cleared(&self) -> bool {
        self.quantity.is_some()
    }
}

/// A single executed trade. Created fresh each interval by the settlement
/// engine and immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub seller: Uuid,
    pub buyer: Uuid,
    pub quantity: Decimal,
    pub payment: Decimal,
}

/// Per-interval settlement result handed back to the driver. Participants
/// read their own signed net quantity (positive bought, negative sold) to
/// update their physical state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementSummary {
    pub interval: u64,
    pub cleared_at: DateTime<Utc>,
    pub clearing_quantity: Option<Decimal>,
    pub clearing_price: Option<Decimal>,
    pub total_turnover: Option<Decimal>,
    pub trades: Vec<Trade>,
    pub net_by_participant: HashMap<Uuid, Decimal>,
}
