//! Engine configuration.

use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Configuration for the stop-loss process manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopLossConfig {
    /// Fraction of the acquisition price the initial trigger is placed at.
    #[serde(default = "default_stop_loss_ratio")]
    pub stop_loss_ratio: Decimal,
    /// Delay before a sell re-check is delivered, in milliseconds.
    #[serde(default = "default_sell_check_delay_ms")]
    pub sell_check_delay_ms: u64,
    /// Delay before a trigger re-check is delivered, in milliseconds.
    ///
    /// Longer than the sell delay so a sell decision reacts faster than a
    /// trigger raise.
    #[serde(default = "default_trigger_check_delay_ms")]
    pub trigger_check_delay_ms: u64,
}

impl Default for StopLossConfig {
    fn default() -> Self {
        Self {
            stop_loss_ratio: default_stop_loss_ratio(),
            sell_check_delay_ms: default_sell_check_delay_ms(),
            trigger_check_delay_ms: default_trigger_check_delay_ms(),
        }
    }
}

impl StopLossConfig {
    /// Load configuration from environment variables, falling back to defaults.
    ///
    /// - `STOPLOSS_RATIO`
    /// - `STOPLOSS_SELL_CHECK_DELAY_MS`
    /// - `STOPLOSS_TRIGGER_CHECK_DELAY_MS`
    #[must_use]
    pub fn from_env() -> Self {
        let stop_loss_ratio = std::env::var("STOPLOSS_RATIO")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_stop_loss_ratio);

        let sell_check_delay_ms = std::env::var("STOPLOSS_SELL_CHECK_DELAY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_sell_check_delay_ms);

        let trigger_check_delay_ms = std::env::var("STOPLOSS_TRIGGER_CHECK_DELAY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_trigger_check_delay_ms);

        Self {
            stop_loss_ratio,
            sell_check_delay_ms,
            trigger_check_delay_ms,
        }
    }

    /// Delay before a sell re-check is delivered.
    #[must_use]
    pub const fn sell_check_delay(&self) -> Duration {
        Duration::from_millis(self.sell_check_delay_ms)
    }

    /// Delay before a trigger re-check is delivered.
    #[must_use]
    pub const fn trigger_check_delay(&self) -> Duration {
        Duration::from_millis(self.trigger_check_delay_ms)
    }
}

fn default_stop_loss_ratio() -> Decimal {
    Decimal::new(9, 1) // 0.9
}

const fn default_sell_check_delay_ms() -> u64 {
    15_000
}

const fn default_trigger_check_delay_ms() -> u64 {
    20_000
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn config_defaults() {
        let config = StopLossConfig::default();
        assert_eq!(config.stop_loss_ratio, dec!(0.9));
        assert_eq!(config.sell_check_delay_ms, 15_000);
        assert_eq!(config.trigger_check_delay_ms, 20_000);
    }

    #[test]
    fn config_delay_accessors() {
        let config = StopLossConfig {
            stop_loss_ratio: dec!(0.9),
            sell_check_delay_ms: 15,
            trigger_check_delay_ms: 20,
        };
        assert_eq!(config.sell_check_delay(), Duration::from_millis(15));
        assert_eq!(config.trigger_check_delay(), Duration::from_millis(20));
    }

    #[test]
    fn config_serde_fills_missing_fields() {
        let config: StopLossConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, StopLossConfig::default());

        let config: StopLossConfig =
            serde_json::from_str(r#"{"sell_check_delay_ms": 5000}"#).unwrap();
        assert_eq!(config.sell_check_delay_ms, 5000);
        assert_eq!(config.trigger_check_delay_ms, 20_000);
    }
}
