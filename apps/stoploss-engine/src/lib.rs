// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Stoploss Engine - Rust Core Library
//!
//! Trailing stop-loss process manager: reacts to market price events for a
//! held position, debounces movements through delayed re-confirmation, and
//! either sells the position or ratchets its protective trigger price upward.
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Core business logic (value objects, events, the process manager)
//!   - `stoploss`: State machine, evidence-based debounce, decision logic
//!   - `shared`: `Symbol`, `Timestamp`, `CorrelationId` value objects
//!
//! - **Application**: Ports and orchestration
//!   - `ports`: `MessageBusPort` (publish/send) and `DelayedDeliveryPort` (timer)
//!   - `services`: `StopLossService` — per-symbol registry, effect execution
//!
//! - **Infrastructure**: Adapters (implementations)
//!   - `bus`: In-process channel-backed message bus
//!   - `scheduler`: Tokio-based delayed event redelivery
//!   - `feed`: JSON-lines market feed boundary

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

/// Engine configuration.
pub mod config;

// =============================================================================
// Re-exports
// =============================================================================

// Domain re-exports
pub use domain::shared::{CorrelationId, Symbol, Timestamp};
pub use domain::stoploss::{
    DelayedSellCheck, DelayedTriggerCheck, Effect, PositionAcquired, PriceChanged, PriceDirection,
    SellPosition, StopLossEvent, StopLossProcessManager, StopLossState, TriggerValueRaised,
};

// Application re-exports
pub use application::ports::{
    BusError, DelayedDeliveryPort, MessageBusPort, NoOpDelayedDelivery, NoOpMessageBus,
    ScheduleError,
};
pub use application::services::{StopLossService, StopLossServiceError};

// Infrastructure re-exports
pub use config::StopLossConfig;
pub use infrastructure::bus::{BusConfig, ChannelMessageBus};
pub use infrastructure::scheduler::TokioDelayScheduler;
