//! Price Direction and Process State Value Objects

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of the most recent price movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceDirection {
    /// Price is unchanged.
    Even,
    /// Price moved up.
    Up,
    /// Price moved down.
    Down,
}

impl PriceDirection {
    /// Compute the movement direction from the previous price to the incoming one.
    #[must_use]
    pub fn between(previous: Decimal, incoming: Decimal) -> Self {
        if incoming > previous {
            Self::Up
        } else if incoming < previous {
            Self::Down
        } else {
            Self::Even
        }
    }
}

impl fmt::Display for PriceDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Even => "EVEN",
            Self::Up => "UP",
            Self::Down => "DOWN",
        };
        write!(f, "{s}")
    }
}

/// Process-manager lifecycle state.
///
/// `Even`/`Up`/`Down` record the last observed price direction; `Completed`
/// is terminal and absorbing once a sell has been issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StopLossState {
    /// No movement observed yet, or the last tick was flat.
    Even,
    /// Last tick moved up.
    Up,
    /// Last tick moved down.
    Down,
    /// A sell has been issued; all further events are no-ops.
    Completed,
}

impl StopLossState {
    /// Check if the terminal state has been reached.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl From<PriceDirection> for StopLossState {
    fn from(direction: PriceDirection) -> Self {
        match direction {
            PriceDirection::Even => Self::Even,
            PriceDirection::Up => Self::Up,
            PriceDirection::Down => Self::Down,
        }
    }
}

impl fmt::Display for StopLossState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Even => "EVEN",
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Completed => "COMPLETED",
        };
        write!(f, "{s}")
    }
}
