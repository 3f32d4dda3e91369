use rust_decimal::Decimal;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MarketError>;

#[derive(Debug, Error)]
pub enum MarketError {
    /// Rejected at submission time; the entry never reaches the order book.
    #[error("quantity must be strictly positive, got {0}")]
    InvalidQuantity(Decimal),

    /// Protocol misuse: the call arrived outside the `Collecting` phase.
    /// Engine state is left untouched.
    #[error("submissions are only accepted while collecting (current phase: {phase})")]
    PhaseViolation { phase: String },

    /// Pay-as-clear turnover conservation broken beyond tolerance. This
    /// indicates a fault in curve construction, not a legitimate market
    /// state; the interval cannot be settled.
    #[error("pay-as-clear turnover mismatch: decomposed {actual}, expected {expected}")]
    TurnoverMismatch { expected: Decimal, actual: Decimal },
}
