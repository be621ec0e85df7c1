//! Tokio Delayed Delivery Adapter
//!
//! Implements the timer contract with a spawned task per scheduled event:
//! sleep for the delay, then redeliver the event on the engine's inbound
//! channel. Nothing blocks, and there is no cancellation; late deliveries
//! after a position retires are absorbed upstream.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::application::ports::{DelayedDeliveryPort, ScheduleError};
use crate::domain::stoploss::StopLossEvent;

/// Scheduler that redelivers events through an mpsc sender after a delay.
#[derive(Debug, Clone)]
pub struct TokioDelayScheduler {
    delivery_tx: mpsc::Sender<StopLossEvent>,
}

impl TokioDelayScheduler {
    /// Create a scheduler delivering into the given channel.
    #[must_use]
    pub const fn new(delivery_tx: mpsc::Sender<StopLossEvent>) -> Self {
        Self { delivery_tx }
    }
}

#[async_trait]
impl DelayedDeliveryPort for TokioDelayScheduler {
    async fn schedule(&self, event: StopLossEvent, delay: Duration) -> Result<(), ScheduleError> {
        if self.delivery_tx.is_closed() {
            return Err(ScheduleError::DeliveryClosed);
        }

        let delivery_tx = self.delivery_tx.clone();
        // Anchor the deadline at schedule time, not at the task's first poll.
        let sleep = tokio::time::sleep(delay);
        tokio::spawn(async move {
            sleep.await;
            if delivery_tx.send(event).await.is_err() {
                // Engine shut down before expiry; the event dies with it.
                tracing::debug!("Delayed event dropped, delivery channel closed");
            }
        });
        Ok(())
    }
}
