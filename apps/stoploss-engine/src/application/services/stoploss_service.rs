//! Stop-Loss Service
//!
//! Hosts one process manager per tracked symbol. Creates an instance when a
//! position is acquired, routes subsequent events to it, maps the returned
//! effects onto the bus and timer ports, and retires the instance once it
//! completes.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::application::ports::{
    BusError, DelayedDeliveryPort, MessageBusPort, ScheduleError,
};
use crate::config::StopLossConfig;
use crate::domain::shared::Symbol;
use crate::domain::stoploss::{
    Effect, PositionAcquired, StopLossEvent, StopLossProcessManager,
};

/// Stop-loss service errors.
#[derive(Debug, Error)]
pub enum StopLossServiceError {
    /// Outbound bus delivery failed.
    #[error(transparent)]
    Bus(#[from] BusError),

    /// Scheduling a delayed re-check failed.
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

/// Per-symbol registry of stop-loss process managers.
pub struct StopLossService<B, D>
where
    B: MessageBusPort,
    D: DelayedDeliveryPort,
{
    bus: Arc<B>,
    scheduler: Arc<D>,
    config: StopLossConfig,
    managers: HashMap<Symbol, StopLossProcessManager>,
}

impl<B, D> StopLossService<B, D>
where
    B: MessageBusPort,
    D: DelayedDeliveryPort,
{
    /// Create a new service with default configuration.
    pub fn new(bus: Arc<B>, scheduler: Arc<D>) -> Self {
        Self::with_config(bus, scheduler, StopLossConfig::default())
    }

    /// Create with custom configuration.
    pub fn with_config(bus: Arc<B>, scheduler: Arc<D>, config: StopLossConfig) -> Self {
        Self {
            bus,
            scheduler,
            config,
            managers: HashMap::new(),
        }
    }

    /// Handle one inbound event.
    ///
    /// Events for symbols that are not tracked (including late checks for a
    /// retired position) are absorbed silently.
    pub async fn handle(&mut self, event: StopLossEvent) -> Result<(), StopLossServiceError> {
        match event {
            StopLossEvent::PositionAcquired(e) => {
                self.acquire(&e);
                Ok(())
            }
            StopLossEvent::PriceChanged(e) => {
                let effects = match self.managers.get_mut(&e.symbol) {
                    Some(manager) => manager.on_price_changed(&e),
                    None => {
                        tracing::debug!(symbol = %e.symbol, "Price tick for untracked symbol, ignoring");
                        return Ok(());
                    }
                };
                self.apply_effects(effects).await
            }
            StopLossEvent::SellCheck(check) => {
                let symbol = check.symbol.clone();
                let effects = match self.managers.get_mut(&symbol) {
                    Some(manager) => manager.on_sell_check(&check),
                    None => {
                        tracing::debug!(symbol = %symbol, "Sell check for untracked symbol, ignoring");
                        return Ok(());
                    }
                };
                self.apply_effects(effects).await?;
                self.retire_if_completed(&symbol);
                Ok(())
            }
            StopLossEvent::TriggerCheck(check) => {
                let effects = match self.managers.get_mut(&check.symbol) {
                    Some(manager) => manager.on_trigger_check(&check),
                    None => {
                        tracing::debug!(symbol = %check.symbol, "Trigger check for untracked symbol, ignoring");
                        return Ok(());
                    }
                };
                self.apply_effects(effects).await
            }
        }
    }

    /// Start tracking a freshly acquired position.
    ///
    /// A second acquisition for an already-tracked symbol is a logged no-op;
    /// one instance owns one position lifecycle.
    fn acquire(&mut self, event: &PositionAcquired) {
        if self.managers.contains_key(&event.symbol) {
            tracing::warn!(
                symbol = %event.symbol,
                "Position already tracked, ignoring duplicate acquisition"
            );
            return;
        }

        let manager = StopLossProcessManager::new(event, self.config.stop_loss_ratio);
        tracing::info!(
            symbol = %event.symbol,
            price = %event.price,
            stop_loss = %manager.stop_loss_price(),
            "Tracking started"
        );
        self.managers.insert(event.symbol.clone(), manager);
    }

    /// Map domain effects onto the outbound ports.
    async fn apply_effects(&self, effects: Vec<Effect>) -> Result<(), StopLossServiceError> {
        for effect in effects {
            match effect {
                Effect::ScheduleSellCheck(check) => {
                    self.scheduler
                        .schedule(
                            StopLossEvent::SellCheck(check),
                            self.config.sell_check_delay(),
                        )
                        .await?;
                }
                Effect::ScheduleTriggerCheck(check) => {
                    self.scheduler
                        .schedule(
                            StopLossEvent::TriggerCheck(check),
                            self.config.trigger_check_delay(),
                        )
                        .await?;
                }
                Effect::SendSell(command) => {
                    tracing::info!(
                        symbol = %command.symbol,
                        price = %command.price,
                        "Stop loss confirmed, selling position"
                    );
                    self.bus.send(command).await?;
                }
                Effect::PublishTriggerRaised(notification) => {
                    tracing::info!(
                        trigger_value = %notification.trigger_value,
                        "Trigger price raised"
                    );
                    self.bus.publish(notification).await?;
                }
            }
        }
        Ok(())
    }

    /// Drop a manager that reached its terminal state.
    fn retire_if_completed(&mut self, symbol: &Symbol) {
        let completed = self
            .managers
            .get(symbol)
            .is_some_and(StopLossProcessManager::is_completed);
        if completed {
            self.managers.remove(symbol);
            tracing::info!(symbol = %symbol, "Position sold, tracking retired");
        }
    }

    /// Number of positions currently tracked.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.managers.len()
    }

    /// Check whether a symbol is currently tracked.
    #[must_use]
    pub fn is_tracking(&self, symbol: &Symbol) -> bool {
        self.managers.contains_key(symbol)
    }

    /// Get the current trigger price for a tracked symbol.
    #[must_use]
    pub fn stop_loss_price(&self, symbol: &Symbol) -> Option<rust_decimal::Decimal> {
        self.managers.get(symbol).map(StopLossProcessManager::stop_loss_price)
    }
}
