//! Domain events for stop-loss process management.
//!
//! Inbound events drive the process manager; outbound messages are either a
//! directed command (`SellPosition`) or a broadcast notification
//! (`TriggerValueRaised`).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::value_objects::PriceDirection;
use crate::domain::shared::{CorrelationId, Symbol, Timestamp};

/// Event: a position was opened and tracking starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionAcquired {
    /// Acquisition price.
    pub price: Decimal,
    /// Instrument symbol.
    pub symbol: Symbol,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}

/// Event: a new market tick for the tracked instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceChanged {
    /// Observed price.
    pub price: Decimal,
    /// Instrument symbol.
    pub symbol: Symbol,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}

/// Delayed re-check: should the position be sold now?
///
/// Scheduled by a price tick and redelivered by the timer service after the
/// sell-check delay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayedSellCheck {
    /// Price observed by the scheduling tick.
    pub price: Decimal,
    /// Instrument symbol.
    pub symbol: Symbol,
    /// Direction of the scheduling tick, carried as context.
    pub direction: PriceDirection,
    /// Links this check to its scheduling tick and sibling trigger check.
    pub correlation_id: CorrelationId,
}

/// Delayed re-check: should the protective trigger be raised now?
///
/// Scheduled by a price tick and redelivered by the timer service after the
/// trigger-check delay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayedTriggerCheck {
    /// Price observed by the scheduling tick.
    pub price: Decimal,
    /// Instrument symbol.
    pub symbol: Symbol,
    /// Direction of the scheduling tick, carried as context.
    pub direction: PriceDirection,
    /// Links this check to its scheduling tick and sibling sell check.
    pub correlation_id: CorrelationId,
}

/// Directed command: execute a sale of the tracked position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellPosition {
    /// Price carried by the confirming check.
    pub price: Decimal,
    /// Instrument symbol.
    pub symbol: Symbol,
}

/// Broadcast notification: the protective trigger price moved up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerValueRaised {
    /// The new stop-loss trigger price.
    pub trigger_value: Decimal,
}

/// All inbound events the process manager reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StopLossEvent {
    /// A position was opened.
    PositionAcquired(PositionAcquired),
    /// A new market tick arrived.
    PriceChanged(PriceChanged),
    /// A scheduled sell check came due.
    SellCheck(DelayedSellCheck),
    /// A scheduled trigger check came due.
    TriggerCheck(DelayedTriggerCheck),
}

impl StopLossEvent {
    /// Get the symbol this event concerns.
    #[must_use]
    pub fn symbol(&self) -> &Symbol {
        match self {
            Self::PositionAcquired(e) => &e.symbol,
            Self::PriceChanged(e) => &e.symbol,
            Self::SellCheck(e) => &e.symbol,
            Self::TriggerCheck(e) => &e.symbol,
        }
    }

    /// Get the price carried by this event.
    #[must_use]
    pub const fn price(&self) -> Decimal {
        match self {
            Self::PositionAcquired(e) => e.price,
            Self::PriceChanged(e) => e.price,
            Self::SellCheck(e) => e.price,
            Self::TriggerCheck(e) => e.price,
        }
    }

    /// Get the event type name.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::PositionAcquired(_) => "POSITION_ACQUIRED",
            Self::PriceChanged(_) => "PRICE_CHANGED",
            Self::SellCheck(_) => "SELL_CHECK",
            Self::TriggerCheck(_) => "TRIGGER_CHECK",
        }
    }
}
