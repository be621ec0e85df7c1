//! Domain Layer
//!
//! The innermost layer containing business logic with zero infrastructure dependencies.
//! This layer defines:
//!
//! - **Value Objects**: Immutable domain types with equality by value
//! - **Domain Events**: Inbound events and outbound commands/notifications
//! - **Domain Services**: The stop-loss process manager itself
//!
//! # Bounded Contexts
//!
//! - [`stoploss`]: Trailing stop-loss process management

pub mod shared;
pub mod stoploss;
