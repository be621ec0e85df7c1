//! Stop-Loss Process Manager Domain Service

use rust_decimal::Decimal;

use super::events::{
    DelayedSellCheck, DelayedTriggerCheck, PositionAcquired, PriceChanged, SellPosition,
    TriggerValueRaised,
};
use super::value_objects::{EvidenceSet, PriceDirection, StopLossState};
use crate::domain::shared::{CorrelationId, Symbol};

/// Side effect requested by a process-manager handler.
///
/// Handlers are pure: they mutate only the manager's own state and return the
/// messages to schedule, send, or publish. The application layer maps these
/// onto the bus and timer ports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Schedule a delayed sell re-check.
    ScheduleSellCheck(DelayedSellCheck),
    /// Schedule a delayed trigger re-check.
    ScheduleTriggerCheck(DelayedTriggerCheck),
    /// Send the sell command to the execution handler.
    SendSell(SellPosition),
    /// Broadcast that the trigger price moved up.
    PublishTriggerRaised(TriggerValueRaised),
}

/// Process manager for one tracked position.
///
/// Reacts to price ticks by scheduling delayed re-checks rather than acting
/// immediately; a check only fires when every price observed since it was
/// scheduled corroborates the decision. Once a sell is issued the manager is
/// `Completed` and absorbs all further events.
#[derive(Debug, Clone)]
pub struct StopLossProcessManager {
    symbol: Symbol,
    acquisition_price: Decimal,
    stop_loss_price: Decimal,
    initial_delta: Decimal,
    current_price: Decimal,
    state: StopLossState,
    pending_sell_evidence: EvidenceSet,
    pending_trigger_evidence: EvidenceSet,
}

impl StopLossProcessManager {
    /// Start tracking a freshly acquired position.
    ///
    /// The trigger starts at `price * stop_loss_ratio`; the gap between the
    /// acquisition price and the trigger is fixed here and preserved by every
    /// later raise.
    #[must_use]
    pub fn new(event: &PositionAcquired, stop_loss_ratio: Decimal) -> Self {
        let stop_loss_price = event.price * stop_loss_ratio;
        Self {
            symbol: event.symbol.clone(),
            acquisition_price: event.price,
            stop_loss_price,
            initial_delta: event.price - stop_loss_price,
            current_price: event.price,
            state: StopLossState::Even,
            pending_sell_evidence: EvidenceSet::new(),
            pending_trigger_evidence: EvidenceSet::new(),
        }
    }

    /// Handle a market tick.
    ///
    /// Records the tick as pending evidence for both decisions and requests
    /// two independent delayed re-checks sharing one correlation id. Never
    /// acts on the tick directly.
    pub fn on_price_changed(&mut self, event: &PriceChanged) -> Vec<Effect> {
        if self.state.is_completed() {
            return Vec::new();
        }

        // Direction is derived from the previous stored price, before overwriting.
        let direction = PriceDirection::between(self.current_price, event.price);
        self.current_price = event.price;
        self.state = StopLossState::from(direction);

        self.pending_sell_evidence.push(event.price);
        self.pending_trigger_evidence.push(event.price);

        let correlation_id = CorrelationId::generate();
        vec![
            Effect::ScheduleSellCheck(DelayedSellCheck {
                price: event.price,
                symbol: event.symbol.clone(),
                direction,
                correlation_id: correlation_id.clone(),
            }),
            Effect::ScheduleTriggerCheck(DelayedTriggerCheck {
                price: event.price,
                symbol: event.symbol.clone(),
                direction,
                correlation_id,
            }),
        ]
    }

    /// Handle a delayed sell re-check.
    ///
    /// Sells only when every price observed since the check was scheduled sits
    /// strictly below the trigger (vacuously when none intervened). The state
    /// guard makes the sell a once-only action.
    pub fn on_sell_check(&mut self, check: &DelayedSellCheck) -> Vec<Effect> {
        if self.state.is_completed() {
            return Vec::new();
        }

        let mut effects = Vec::new();
        if self.pending_sell_evidence.all_below(self.stop_loss_price) {
            effects.push(Effect::SendSell(SellPosition {
                price: check.price,
                symbol: self.symbol.clone(),
            }));
            self.state = StopLossState::Completed;
        }
        self.pending_sell_evidence.remove(check.price);
        effects
    }

    /// Handle a delayed trigger re-check.
    ///
    /// Raises the trigger to `price - initial_delta` when every price observed
    /// since the check was scheduled held at or above the check's price. The
    /// trigger only ever moves up.
    pub fn on_trigger_check(&mut self, check: &DelayedTriggerCheck) -> Vec<Effect> {
        if self.state.is_completed() {
            return Vec::new();
        }

        let mut effects = Vec::new();
        if self.pending_trigger_evidence.all_at_or_above(check.price) {
            let candidate = check.price - self.initial_delta;
            if candidate > self.stop_loss_price {
                self.stop_loss_price = candidate;
                effects.push(Effect::PublishTriggerRaised(TriggerValueRaised {
                    trigger_value: candidate,
                }));
            }
        }
        self.pending_trigger_evidence.remove(check.price);
        effects
    }

    /// Get the tracked symbol.
    #[must_use]
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Get the acquisition price.
    #[must_use]
    pub const fn acquisition_price(&self) -> Decimal {
        self.acquisition_price
    }

    /// Get the current trigger price.
    #[must_use]
    pub const fn stop_loss_price(&self) -> Decimal {
        self.stop_loss_price
    }

    /// Get the fixed protective gap.
    #[must_use]
    pub const fn initial_delta(&self) -> Decimal {
        self.initial_delta
    }

    /// Get the last observed price.
    #[must_use]
    pub const fn current_price(&self) -> Decimal {
        self.current_price
    }

    /// Get the lifecycle state.
    #[must_use]
    pub const fn state(&self) -> StopLossState {
        self.state
    }

    /// Check if the terminal state has been reached.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.state.is_completed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::Timestamp;
    use rust_decimal_macros::dec;

    fn acquire(price: Decimal) -> StopLossProcessManager {
        let event = PositionAcquired {
            price,
            symbol: Symbol::new("ABC"),
            occurred_at: Timestamp::now(),
        };
        StopLossProcessManager::new(&event, dec!(0.9))
    }

    fn tick(manager: &mut StopLossProcessManager, price: Decimal) -> Vec<Effect> {
        manager.on_price_changed(&PriceChanged {
            price,
            symbol: Symbol::new("ABC"),
            occurred_at: Timestamp::now(),
        })
    }

    /// Pull the scheduled checks out of a tick's effects.
    fn scheduled_checks(effects: &[Effect]) -> (DelayedSellCheck, DelayedTriggerCheck) {
        let sell = effects
            .iter()
            .find_map(|e| match e {
                Effect::ScheduleSellCheck(c) => Some(c.clone()),
                _ => None,
            })
            .unwrap();
        let trigger = effects
            .iter()
            .find_map(|e| match e {
                Effect::ScheduleTriggerCheck(c) => Some(c.clone()),
                _ => None,
            })
            .unwrap();
        (sell, trigger)
    }

    #[test]
    fn acquisition_initializes_trigger_and_delta() {
        let manager = acquire(dec!(1));

        assert_eq!(manager.stop_loss_price(), dec!(0.9));
        assert_eq!(manager.initial_delta(), dec!(0.1));
        assert_eq!(manager.current_price(), dec!(1));
        assert_eq!(manager.state(), StopLossState::Even);
    }

    #[test]
    fn price_change_schedules_both_checks_and_no_action() {
        let mut manager = acquire(dec!(1));
        let effects = tick(&mut manager, dec!(0.89));

        assert_eq!(effects.len(), 2);
        let (sell, trigger) = scheduled_checks(&effects);
        assert_eq!(sell.price, dec!(0.89));
        assert_eq!(trigger.price, dec!(0.89));
        assert_eq!(sell.direction, PriceDirection::Down);
        assert_eq!(sell.correlation_id, trigger.correlation_id);
    }

    #[test]
    fn direction_tracks_previous_price_not_incoming() {
        let mut manager = acquire(dec!(1));

        let effects = tick(&mut manager, dec!(1.01));
        let (sell, _) = scheduled_checks(&effects);
        assert_eq!(sell.direction, PriceDirection::Up);
        assert_eq!(manager.state(), StopLossState::Up);

        let effects = tick(&mut manager, dec!(0.95));
        let (sell, _) = scheduled_checks(&effects);
        assert_eq!(sell.direction, PriceDirection::Down);
        assert_eq!(manager.state(), StopLossState::Down);

        let effects = tick(&mut manager, dec!(0.95));
        let (sell, _) = scheduled_checks(&effects);
        assert_eq!(sell.direction, PriceDirection::Even);
        assert_eq!(manager.state(), StopLossState::Even);
    }

    #[test]
    fn sustained_low_price_sells() {
        let mut manager = acquire(dec!(1));
        let effects = tick(&mut manager, dec!(0.89));
        let (sell_check, _) = scheduled_checks(&effects);

        let effects = manager.on_sell_check(&sell_check);
        assert_eq!(
            effects,
            vec![Effect::SendSell(SellPosition {
                price: dec!(0.89),
                symbol: Symbol::new("ABC"),
            })]
        );
        assert_eq!(manager.state(), StopLossState::Completed);
    }

    #[test]
    fn sells_at_most_once() {
        let mut manager = acquire(dec!(1));
        let first = tick(&mut manager, dec!(0.89));
        let second = tick(&mut manager, dec!(0.88));
        let (first_check, _) = scheduled_checks(&first);
        let (second_check, _) = scheduled_checks(&second);

        let effects = manager.on_sell_check(&first_check);
        assert_eq!(effects.len(), 1);

        // Completed absorbs the second check.
        let effects = manager.on_sell_check(&second_check);
        assert!(effects.is_empty());
        assert_eq!(manager.state(), StopLossState::Completed);
    }

    #[test]
    fn interrupted_low_price_does_not_sell() {
        let mut manager = acquire(dec!(1));
        let first = tick(&mut manager, dec!(0.89));
        tick(&mut manager, dec!(0.90));
        let (first_check, _) = scheduled_checks(&first);

        // 0.90 is not below the 0.9 trigger, so the excursion was not sustained.
        let effects = manager.on_sell_check(&first_check);
        assert!(effects.is_empty());
        assert_ne!(manager.state(), StopLossState::Completed);
    }

    #[test]
    fn sell_check_pops_its_own_evidence() {
        let mut manager = acquire(dec!(1));
        let first = tick(&mut manager, dec!(0.89));
        let second = tick(&mut manager, dec!(0.90));
        let (first_check, _) = scheduled_checks(&first);
        let (second_check, _) = scheduled_checks(&second);

        assert!(manager.on_sell_check(&first_check).is_empty());

        // The 0.89 entry is gone; only 0.90 remains and it is not below the
        // trigger, so the second check does not fire either.
        assert!(manager.on_sell_check(&second_check).is_empty());
    }

    #[test]
    fn sustained_high_price_raises_trigger() {
        let mut manager = acquire(dec!(1));
        let effects = tick(&mut manager, dec!(1.01));
        let (sell_check, trigger_check) = scheduled_checks(&effects);

        assert!(manager.on_sell_check(&sell_check).is_empty());

        let effects = manager.on_trigger_check(&trigger_check);
        assert_eq!(
            effects,
            vec![Effect::PublishTriggerRaised(TriggerValueRaised {
                trigger_value: dec!(0.91),
            })]
        );
        assert_eq!(manager.stop_loss_price(), dec!(0.91));
    }

    #[test]
    fn raise_preserves_protective_gap() {
        let mut manager = acquire(dec!(1));
        let effects = tick(&mut manager, dec!(1.05));
        let (_, trigger_check) = scheduled_checks(&effects);

        manager.on_trigger_check(&trigger_check);
        assert_eq!(
            manager.stop_loss_price(),
            dec!(1.05) - manager.initial_delta()
        );
    }

    #[test]
    fn interrupted_high_price_keeps_trigger() {
        let mut manager = acquire(dec!(1));
        let first = tick(&mut manager, dec!(1.01));
        tick(&mut manager, dec!(0.99));
        let (sell_check, trigger_check) = scheduled_checks(&first);

        assert!(manager.on_sell_check(&sell_check).is_empty());

        // 0.99 fell back under 1.01, so the rise was not sustained.
        let effects = manager.on_trigger_check(&trigger_check);
        assert!(effects.is_empty());
        assert_eq!(manager.stop_loss_price(), dec!(0.9));
    }

    #[test]
    fn trigger_never_moves_down() {
        let mut manager = acquire(dec!(1));

        // Raise to 0.91 first.
        let effects = tick(&mut manager, dec!(1.01));
        let (_, trigger_check) = scheduled_checks(&effects);
        manager.on_trigger_check(&trigger_check);
        assert_eq!(manager.stop_loss_price(), dec!(0.91));

        // A later check at a lower price must not lower the trigger, even
        // though its evidence condition holds.
        let effects = tick(&mut manager, dec!(0.95));
        let (_, trigger_check) = scheduled_checks(&effects);
        let effects = manager.on_trigger_check(&trigger_check);
        assert!(effects.is_empty());
        assert_eq!(manager.stop_loss_price(), dec!(0.91));
    }

    #[test]
    fn completed_absorbs_everything() {
        let mut manager = acquire(dec!(1));
        let effects = tick(&mut manager, dec!(0.89));
        let (sell_check, trigger_check) = scheduled_checks(&effects);

        manager.on_sell_check(&sell_check);
        assert!(manager.is_completed());

        let stop_before = manager.stop_loss_price();
        assert!(tick(&mut manager, dec!(1.50)).is_empty());
        assert!(manager.on_trigger_check(&trigger_check).is_empty());
        assert_eq!(manager.stop_loss_price(), stop_before);
        assert_eq!(manager.current_price(), dec!(0.89));
    }

    #[test]
    fn vacuous_sell_check_fires_when_under_trigger() {
        // A check delivered after its evidence drained evaluates vacuously.
        let mut manager = acquire(dec!(1));
        let effects = tick(&mut manager, dec!(0.89));
        let (sell_check, _) = scheduled_checks(&effects);

        manager.pending_sell_evidence.remove(dec!(0.89));
        let effects = manager.on_sell_check(&sell_check);
        assert_eq!(effects.len(), 1);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn price_strategy() -> impl Strategy<Value = Decimal> {
            // Prices between 0.01 and 5.00 in cents.
            (1i64..=500).prop_map(|cents| Decimal::new(cents, 2))
        }

        proptest! {
            /// The trigger never decreases and at most one sell is ever
            /// issued, under any interleaving of ticks and prompt checks.
            #[test]
            fn trigger_monotone_and_single_sell(prices in proptest::collection::vec(price_strategy(), 1..20)) {
                let mut manager = acquire(dec!(1));
                let mut sells = 0;
                let mut last_stop = manager.stop_loss_price();

                for price in prices {
                    let effects = tick(&mut manager, price);
                    if effects.is_empty() {
                        continue;
                    }
                    let (sell_check, trigger_check) = scheduled_checks(&effects);

                    for effect in manager.on_sell_check(&sell_check) {
                        if matches!(effect, Effect::SendSell(_)) {
                            sells += 1;
                        }
                    }
                    manager.on_trigger_check(&trigger_check);

                    prop_assert!(manager.stop_loss_price() >= last_stop);
                    last_stop = manager.stop_loss_price();
                }

                prop_assert!(sells <= 1);
                if sells == 1 {
                    prop_assert!(manager.is_completed());
                }
            }
        }
    }
}
