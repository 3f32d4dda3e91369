pub mod config;
pub mod error;
pub mod market;

pub use config::MarketConfig;
pub use error::{MarketError, Result};
pub use market::{
    Bid, ClearingResult, CurvePoint, IntervalCoordinator, Offer, OrderBook, Phase, PricingRule,
    SettlementSummary, Trade,
};
