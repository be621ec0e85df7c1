//! In-Process Message Bus
//!
//! Implements the bus contract on tokio channels: a broadcast channel fans
//! notifications out to any number of subscribers, while an mpsc channel
//! carries the directed sell command to its single execution handler.

use async_trait::async_trait;
use tokio::sync::{broadcast, mpsc};

use crate::application::ports::{BusError, MessageBusPort};
use crate::domain::stoploss::{SellPosition, TriggerValueRaised};

/// Configuration for bus channel capacities.
#[derive(Debug, Clone, Copy)]
pub struct BusConfig {
    /// Capacity of the notification broadcast channel.
    pub notifications_capacity: usize,
    /// Capacity of the command channel.
    pub commands_capacity: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            notifications_capacity: 1_024,
            commands_capacity: 256,
        }
    }
}

/// Channel-backed message bus.
///
/// `publish` never fails on missing subscribers; `send` fails once the command
/// handler has gone away, since a directed command needs someone to act on it.
#[derive(Debug)]
pub struct ChannelMessageBus {
    notifications_tx: broadcast::Sender<TriggerValueRaised>,
    commands_tx: mpsc::Sender<SellPosition>,
}

impl ChannelMessageBus {
    /// Create a bus, returning it together with the receiver end of the
    /// command channel for the execution handler.
    #[must_use]
    pub fn new(config: BusConfig) -> (Self, mpsc::Receiver<SellPosition>) {
        let (notifications_tx, _) = broadcast::channel(config.notifications_capacity);
        let (commands_tx, commands_rx) = mpsc::channel(config.commands_capacity);
        (
            Self {
                notifications_tx,
                commands_tx,
            },
            commands_rx,
        )
    }

    /// Subscribe to trigger-raised notifications.
    #[must_use]
    pub fn notifications_rx(&self) -> broadcast::Receiver<TriggerValueRaised> {
        self.notifications_tx.subscribe()
    }
}

#[async_trait]
impl MessageBusPort for ChannelMessageBus {
    async fn publish(&self, notification: TriggerValueRaised) -> Result<(), BusError> {
        // A broadcast with no subscribers is not a failure.
        let _ = self.notifications_tx.send(notification);
        Ok(())
    }

    async fn send(&self, command: SellPosition) -> Result<(), BusError> {
        self.commands_tx
            .send(command)
            .await
            .map_err(|e| BusError::SendFailed {
                message: format!("command handler unavailable: {e}"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::Symbol;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn publish_reaches_all_subscribers() {
        let (bus, _commands_rx) = ChannelMessageBus::new(BusConfig::default());
        let mut first = bus.notifications_rx();
        let mut second = bus.notifications_rx();

        bus.publish(TriggerValueRaised {
            trigger_value: dec!(0.91),
        })
        .await
        .unwrap();

        assert_eq!(first.recv().await.unwrap().trigger_value, dec!(0.91));
        assert_eq!(second.recv().await.unwrap().trigger_value, dec!(0.91));
    }

    #[tokio::test]
    async fn publish_without_subscribers_succeeds() {
        let (bus, _commands_rx) = ChannelMessageBus::new(BusConfig::default());

        let result = bus
            .publish(TriggerValueRaised {
                trigger_value: dec!(0.91),
            })
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn send_delivers_to_command_handler() {
        let (bus, mut commands_rx) = ChannelMessageBus::new(BusConfig::default());

        bus.send(SellPosition {
            price: dec!(0.89),
            symbol: Symbol::new("ABC"),
        })
        .await
        .unwrap();

        let command = commands_rx.recv().await.unwrap();
        assert_eq!(command.price, dec!(0.89));
        assert_eq!(command.symbol, Symbol::new("ABC"));
    }

    #[tokio::test]
    async fn send_without_handler_fails() {
        let (bus, commands_rx) = ChannelMessageBus::new(BusConfig::default());
        drop(commands_rx);

        let result = bus
            .send(SellPosition {
                price: dec!(0.89),
                symbol: Symbol::new("ABC"),
            })
            .await;
        assert!(matches!(result, Err(BusError::SendFailed { .. })));
    }
}
