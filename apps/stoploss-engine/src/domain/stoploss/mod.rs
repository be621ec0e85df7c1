//! Stop-Loss Bounded Context
//!
//! Trailing stop-loss process management: reacts to price ticks for one held
//! position, debounces movements through delayed re-confirmation checks, and
//! decides between selling the position and ratcheting the protective trigger
//! price upward.

pub mod events;
pub mod process_manager;
pub mod value_objects;

pub use events::{
    DelayedSellCheck, DelayedTriggerCheck, PositionAcquired, PriceChanged, SellPosition,
    StopLossEvent, TriggerValueRaised,
};
pub use process_manager::{Effect, StopLossProcessManager};
pub use value_objects::{EvidenceSet, PriceDirection, StopLossState};
