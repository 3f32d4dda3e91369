//! Clearing resolution on the merged curve.

use rust_decimal::Decimal;
use tracing::debug;

use super::types::{ClearingResult, CurvePoint};

/// Determine whether the market fully clears, partially clears, or fails to
/// clear.
///
/// Breakpoints missing either price carry no information about where supply
/// and demand cross (they are curve ends, not intersections) and are
/// discarded first. Absence of a deal is a valid outcome, never an error.
///
/// The partial-execution clearing price is the highest winning bid's own
/// price, not a midpoint or the marginal offer. This buyer-favoring
/// convention is deliberate and load-bearing for downstream settlement.
pub fn resolve_clearing(curve: &[CurvePoint]) -> ClearingResult {
    let crossing: Vec<(Decimal, Decimal, Decimal)> = curve
        .iter()
        .filter_map(|point| match (point.bid_price, point.offer_price) {
            (Some(bid), Some(offer)) => Some((point.cumulative_quantity, bid, offer)),
            _ => None,
        })
        .collect();

    let Some(&(last_quantity, last_bid, _)) = crossing.last() else {
        debug!("no breakpoint carries both sides, nothing executed");
        return ClearingResult::NO_TRADE;
    };

    match crossing.iter().position(|&(_, bid, offer)| bid < offer) {
        // Every bid outprices the offer next to it on the curve: the whole
        // merged curve executes, priced at the last (lowest) winning bid.
        None => {
            debug!(clearing_quantity = %last_quantity, "fully executed");
            ClearingResult {
                quantity: Some(last_quantity),
                price: Some(last_bid),
            }
        }
        // Already under water at the first breakpoint. The bid/offer spread
        // only narrows along the merged curve, so no later point crosses
        // either.
        Some(0) => {
            debug!("nothing executed");
            ClearingResult::NO_TRADE
        }
        // The curves cross between breakpoints: clear at the point just
        // before the sign flips.
        Some(flip) => {
            let (quantity, bid, _) = crossing[flip - 1];
            debug!(clearing_quantity = %quantity, clearing_price = %bid, "partially executed");
            ClearingResult {
                quantity: Some(quantity),
                price: Some(bid),
            }
        }
    }
}
