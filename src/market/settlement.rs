//! Trade decomposition under the two pricing rules.

use rust_decimal::Decimal;
use tracing::debug;

use super::types::{ClearingResult, CurvePoint, PricingRule, Trade};
use crate::error::{MarketError, Result};

/// Decomposition of the executed volume into individual trades.
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub clearing: ClearingResult,
    /// `None` whenever the clearing quantity is `None`.
    pub total_turnover: Option<Decimal>,
    pub trades: Vec<Trade>,
}

impl Settlement {
    fn no_trade(clearing: ClearingResult) -> Self {
        Self {
            clearing,
            total_turnover: None,
            trades: Vec::new(),
        }
    }
}

/// Walk the executed portion of the (unfiltered) curve and pair buyers with
/// sellers. The walk and quantity decomposition are identical for both
/// rules; only the per-trade payment differs:
///
/// * pay-as-clear: `quantity * clearing_price` for every trade, and the
///   total payment must reconcile with `clearing_quantity * clearing_price`
///   within `tolerance` — a violation is a fault in curve construction and
///   aborts the interval;
/// * pay-as-bid: `quantity * bid_price` (the buyer's own bid), with no
///   cross-trade uniformity and no conservation identity against the
///   clearing turnover.
///
/// Breakpoints with an absent side sit beyond the counter side's
/// availability and never produce a trade.
pub fn settle(
    curve: &[CurvePoint],
    clearing: ClearingResult,
    rule: PricingRule,
    tolerance: Decimal,
) -> Result<Settlement> {
    let (Some(clearing_quantity), Some(clearing_price)) = (clearing.quantity, clearing.price)
    else {
        return Ok(Settlement::no_trade(clearing));
    };

    let mut trades = Vec::new();
    let mut total_turnover = Decimal::ZERO;
    let mut previous_quantity = Decimal::ZERO;

    for point in curve {
        if point.cumulative_quantity > clearing_quantity {
            break;
        }
        // Breakpoints missing a side are curve extremes beyond the counter
        // side's availability, not executable segments.
        let (Some(bid_price), Some(_), Some(buyer), Some(seller)) = (
            point.bid_price,
            point.offer_price,
            point.buyer,
            point.seller,
        ) else {
            continue;
        };

        let quantity = point.cumulative_quantity - previous_quantity;
        if quantity.is_zero() {
            continue;
        }

        let unit_price = match rule {
            PricingRule::PayAsClear => clearing_price,
            PricingRule::PayAsBid => bid_price,
        };
        let payment = quantity * unit_price;

        debug!(%seller, %buyer, %quantity, %payment, "🤝 trade paired");
        trades.push(Trade {
            seller,
            buyer,
            quantity,
            payment,
        });

        total_turnover += payment;
        previous_quantity = point.cumulative_quantity;
    }

    if rule == PricingRule::PayAsClear {
        let expected = clearing_quantity * clearing_price;
        if (total_turnover - expected).abs() > tolerance {
            return Err(MarketError::TurnoverMismatch {
                expected,
                actual: total_turnover,
            });
        }
    }

    Ok(Settlement {
        clearing,
        total_turnover: Some(total_turnover),
        trades,
    })
}
