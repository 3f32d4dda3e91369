//! Interval-local order book for the double auction.

use rust_decimal::Decimal;
use tracing::info;

use super::types::{Bid, Offer};
use crate::error::{MarketError, Result};

/// Holds the bids and offers submitted during one interval. Append-only
/// while collecting; frozen and discarded once the interval clears. Owns no
/// cross-interval state.
///
/// Entries are kept in submission order. That order, not arrival wall-clock
/// time, is the deterministic tie-break for equal prices: the curve builder
/// sorts with a stable sort, which preserves it.
#[derive(Debug, Default)]
pub struct OrderBook {
    bids: Vec<Bid>,
    offers: Vec<Offer>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a bid to the book. Non-positive quantities never enter the book.
    pub fn insert_bid(&mut self, bid: Bid) -> Result<()> {
        if bid.quantity <= Decimal::ZERO {
            return Err(MarketError::InvalidQuantity(bid.quantity));
        }
        self.bids.push(bid);
        Ok(())
    }

    /// Add an offer to the book. Non-positive quantities never enter the book.
    pub fn insert_offer(&mut self, offer: Offer) -> Result<()> {
        if offer.quantity <= Decimal::ZERO {
            return Err(MarketError::InvalidQuantity(offer.quantity));
        }
        self.offers.push(offer);
        Ok(())
    }

    /// Bids in submission order.
    pub fn bids(&self) -> Vec<Bid> {
        self.bids.clone()
    }

    /// Offers in submission order.
    pub fn offers(&self) -> Vec<Offer> {
        self.offers.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.offers.is_empty()
    }

    /// Total demand and total supply currently on the book.
    pub fn demand_supply_totals(&self) -> (Decimal, Decimal) {
        let total_demand: Decimal = self.bids.iter().map(|bid| bid.quantity).sum();
        let total_supply: Decimal = self.offers.iter().map(|offer| offer.quantity).sum();

        if total_demand >= total_supply {
            info!(%total_demand, %total_supply, "more demand than supply");
        } else {
            info!(%total_demand, %total_supply, "more supply than demand");
        }

        (total_demand, total_supply)
    }

    /// Drop all interval-local state. Unexecuted quantity is discarded, not
    /// rolled forward into the next interval.
    pub fn clear(&mut self) {
        self.bids.clear();
        self.offers.clear();
    }
}
