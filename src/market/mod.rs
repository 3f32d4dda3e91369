pub mod clearing;
pub mod curve;
pub mod order_book;
pub mod settlement;
pub mod types;

pub use order_book::OrderBook;
pub use types::{
    Bid, ClearingResult, CurvePoint, Offer, PricingRule, SettlementSummary, Trade,
};

use std::collections::HashMap;
use std::fmt;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::MarketConfig;
use crate::error::{MarketError, Result};

/// Phase of the per-interval clearing protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Collecting,
    Clearing,
    Settled,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Collecting => write!(f, "collecting"),
            Phase::Clearing => write!(f, "clearing"),
            Phase::Settled => write!(f, "settled"),
        }
    }
}

/// Orchestrates one clearing cycle per interval: collects bids and offers,
/// freezes the book, runs curve construction, clearing resolution and
/// settlement in order, and publishes the per-participant net traded
/// quantity.
///
/// The engine is single-threaded and synchronous: an interval is fully
/// collected, cleared, and settled before the next begins. The pricing rule
/// is fixed in [`MarketConfig`] for the whole run and cannot switch between
/// intervals.
pub struct IntervalCoordinator {
    config: MarketConfig,
    book: OrderBook,
    phase: Phase,
    interval: u64,
}

impl IntervalCoordinator {
    pub fn new(config: MarketConfig) -> Self {
        info!(pricing_rule = ?config.pricing_rule, "interval coordinator created");
        Self {
            config,
            book: OrderBook::new(),
            phase: Phase::Collecting,
            interval: 0,
        }
    }

    /// Intervals settled so far.
    pub fn interval(&self) -> u64 {
        self.interval
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn pricing_rule(&self) -> PricingRule {
        self.config.pricing_rule
    }

    /// Submit a bid for the current interval. Only legal while collecting.
    pub fn submit_bid(&mut self, price: Decimal, quantity: Decimal, participant: Uuid) -> Result<()> {
        self.ensure_collecting()?;
        self.book.insert_bid(Bid {
            price,
            quantity,
            participant,
        })
    }

    /// Submit an offer for the current interval. Only legal while collecting.
    pub fn submit_offer(
        &mut self,
        price: Decimal,
        quantity: Decimal,
        participant: Uuid,
    ) -> Result<()> {
        self.ensure_collecting()?;
        self.book.insert_offer(Offer {
            price,
            quantity,
            participant,
        })
    }

    fn ensure_collecting(&self) -> Result<()> {
        if self.phase != Phase::Collecting {
            return Err(MarketError::PhaseViolation {
                phase: self.phase.to_string(),
            });
        }
        Ok(())
    }

    /// Freeze the order book and run one full clearing cycle.
    ///
    /// Returns the settlement summary for the interval; participants read
    /// their signed net quantity from `net_by_participant` (positive bought,
    /// negative sold). A book where the curves never cross yields a summary
    /// with `None` fields — that is a valid outcome, not an error.
    ///
    /// All interval-local state is discarded afterwards; unexecuted quantity
    /// never rolls forward. If settlement surfaces an internal consistency
    /// fault the coordinator stays out of the collecting phase: the interval
    /// is unrecoverable and can only be redone by a fresh coordinator.
    pub fn advance_interval(&mut self) -> Result<SettlementSummary> {
        self.ensure_collecting()?;
        self.phase = Phase::Clearing;
        self.interval += 1;
        debug!(interval = self.interval, "order book frozen");

        let (total_demand, total_supply) = self.book.demand_supply_totals();

        let bids = self.book.bids();
        let offers = self.book.offers();
        let curve = curve::build_curve(&bids, &offers);
        let clearing = clearing::resolve_clearing(&curve);
        let settlement = settlement::settle(
            &curve,
            clearing,
            self.config.pricing_rule,
            self.config.turnover_tolerance,
        )?;
        self.phase = Phase::Settled;

        let mut net_by_participant: HashMap<Uuid, Decimal> = HashMap::new();
        for trade in &settlement.trades {
            *net_by_participant.entry(trade.buyer).or_default() += trade.quantity;
            *net_by_participant.entry(trade.seller).or_default() -= trade.quantity;
        }

        let summary = SettlementSummary {
            interval: self.interval,
            cleared_at: Utc::now(),
            clearing_quantity: settlement.clearing.quantity,
            clearing_price: settlement.clearing.price,
            total_turnover: settlement.total_turnover,
            trades: settlement.trades,
            net_by_participant,
        };

        match (summary.clearing_quantity, summary.clearing_price) {
            (Some(quantity), Some(price)) => info!(
                interval = summary.interval,
                clearing_quantity = %quantity,
                clearing_price = %price,
                trades = summary.trades.len(),
                %total_demand,
                %total_supply,
                "🏆 interval cleared"
            ),
            _ => info!(
                interval = summary.interval,
                %total_demand,
                %total_supply,
                "interval closed with no executable volume"
            ),
        }

        self.book.clear();
        self.phase = Phase::Collecting;

        Ok(summary)
    }
}
