//! Message Bus Port (Driven Port)
//!
//! Outbound interface to the message bus: `publish` broadcasts a notification
//! to any number of passive observers, `send` delivers a command to exactly
//! one handler expected to act on it.

use async_trait::async_trait;

use crate::domain::stoploss::{SellPosition, TriggerValueRaised};

/// Bus delivery error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BusError {
    /// Connection error.
    #[error("bus connection error: {message}")]
    ConnectionError {
        /// Error details.
        message: String,
    },

    /// Broadcast publishing failed.
    #[error("publish failed: {message}")]
    PublishFailed {
        /// Error details.
        message: String,
    },

    /// Directed send failed (no handler available).
    #[error("send failed: {message}")]
    SendFailed {
        /// Error details.
        message: String,
    },
}

/// Port for the outbound message bus.
#[async_trait]
pub trait MessageBusPort: Send + Sync {
    /// Broadcast a trigger-raised notification; no reply is expected and
    /// absent subscribers are not an error.
    async fn publish(&self, notification: TriggerValueRaised) -> Result<(), BusError>;

    /// Send the sell command to its designated execution handler.
    async fn send(&self, command: SellPosition) -> Result<(), BusError>;
}

/// No-op bus for testing.
#[derive(Debug, Clone, Default)]
pub struct NoOpMessageBus;

#[async_trait]
impl MessageBusPort for NoOpMessageBus {
    async fn publish(&self, _notification: TriggerValueRaised) -> Result<(), BusError> {
        Ok(())
    }

    async fn send(&self, _command: SellPosition) -> Result<(), BusError> {
        Ok(())
    }
}
