//! Stoploss Engine Binary
//!
//! Runs the trailing stop-loss process manager against a JSON-lines market
//! feed on stdin.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin stoploss-engine < ticks.jsonl
//! ```
//!
//! # Environment Variables
//!
//! - `STOPLOSS_RATIO`: Initial trigger as a fraction of the acquisition price (default: 0.9)
//! - `STOPLOSS_SELL_CHECK_DELAY_MS`: Sell re-check delay (default: 15000)
//! - `STOPLOSS_TRIGGER_CHECK_DELAY_MS`: Trigger re-check delay (default: 20000)
//! - `RUST_LOG`: Log level (default: info)

use std::sync::Arc;

use tokio::signal;
use tokio::sync::mpsc;

use stoploss_engine::config::StopLossConfig;
use stoploss_engine::infrastructure::bus::{BusConfig, ChannelMessageBus};
use stoploss_engine::infrastructure::feed::run_stdin_feed;
use stoploss_engine::infrastructure::scheduler::TokioDelayScheduler;
use stoploss_engine::{StopLossEvent, StopLossService};

/// Inbound event channel capacity (feed + delayed redeliveries).
const EVENTS_CAPACITY: usize = 1_024;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    tracing::info!("Starting Stoploss Engine");

    let config = StopLossConfig::from_env();
    tracing::info!(
        stop_loss_ratio = %config.stop_loss_ratio,
        sell_check_delay_ms = config.sell_check_delay_ms,
        trigger_check_delay_ms = config.trigger_check_delay_ms,
        "Configuration loaded"
    );

    let (events_tx, mut events_rx) = mpsc::channel::<StopLossEvent>(EVENTS_CAPACITY);
    let (bus, mut commands_rx) = ChannelMessageBus::new(BusConfig::default());
    let bus = Arc::new(bus);
    let scheduler = Arc::new(TokioDelayScheduler::new(events_tx.clone()));

    let mut notifications_rx = bus.notifications_rx();
    let mut service = StopLossService::with_config(Arc::clone(&bus), scheduler, config);

    // Execution handler: the single receiver of directed sell commands.
    tokio::spawn(async move {
        while let Some(command) = commands_rx.recv().await {
            tracing::info!(
                symbol = %command.symbol,
                price = %command.price,
                "SellPosition command received by execution handler"
            );
        }
    });

    // Passive observer of trigger-raised broadcasts.
    tokio::spawn(async move {
        while let Ok(notification) = notifications_rx.recv().await {
            tracing::info!(
                trigger_value = %notification.trigger_value,
                "TriggerValueRaised observed"
            );
        }
    });

    // Market feed on stdin.
    tokio::spawn(run_stdin_feed(events_tx));

    tracing::info!("Stoploss engine ready");

    loop {
        tokio::select! {
            event = events_rx.recv() => {
                let Some(event) = event else {
                    tracing::info!("Event channel closed, stopping");
                    break;
                };
                if let Err(e) = service.handle(event).await {
                    tracing::warn!(error = %e, "Failed to process event");
                }
            }
            _ = signal::ctrl_c() => {
                tracing::info!("Shutdown signal received");
                break;
            }
        }
    }

    tracing::info!(
        active_positions = service.active_count(),
        "Stoploss engine stopped"
    );
    Ok(())
}

/// Initialize the tracing subscriber with environment filter.
///
/// Uses a static directive string that is a compile-time constant guaranteed to parse.
#[allow(clippy::expect_used)]
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                "stoploss_engine=info"
                    .parse()
                    .expect("static directive 'stoploss_engine=info' is valid"),
            ),
        )
        .init();
}
