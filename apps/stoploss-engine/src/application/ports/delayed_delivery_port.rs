//! Delayed Delivery Port (Driven Port)
//!
//! Interface to the timer service: given an event and a delay, redeliver the
//! event as an ordinary inbound message once the delay elapses. The process
//! manager never sleeps; all waiting happens through this port.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::stoploss::StopLossEvent;

/// Scheduling error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ScheduleError {
    /// The delivery channel is closed; the event can never be redelivered.
    #[error("delayed delivery channel closed")]
    DeliveryClosed,
}

/// Port for scheduling delayed event redelivery.
///
/// There is no cancellation: once scheduled, an event is delivered at expiry
/// and late deliveries are absorbed by the receiving state machine.
#[async_trait]
pub trait DelayedDeliveryPort: Send + Sync {
    /// Schedule `event` for redelivery after `delay`.
    async fn schedule(&self, event: StopLossEvent, delay: Duration) -> Result<(), ScheduleError>;
}

/// No-op scheduler for testing; scheduled events are dropped.
#[derive(Debug, Clone, Default)]
pub struct NoOpDelayedDelivery;

#[async_trait]
impl DelayedDeliveryPort for NoOpDelayedDelivery {
    async fn schedule(&self, _event: StopLossEvent, _delay: Duration) -> Result<(), ScheduleError> {
        Ok(())
    }
}
