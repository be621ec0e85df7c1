//! Market Feed Adapter
//!
//! Inbound boundary for the binary: a JSON-lines feed of acquisition and
//! price-tick messages, one object per line:
//!
//! ```json
//! {"type":"POSITION_ACQUIRED","price":"1","symbol":"ABC"}
//! {"type":"PRICE_CHANGED","price":"0.89","symbol":"ABC"}
//! ```
//!
//! Upstream filtering is assumed; prices and symbols are accepted as-is.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::sync::mpsc;

use crate::domain::shared::{Symbol, Timestamp};
use crate::domain::stoploss::{PositionAcquired, PriceChanged, StopLossEvent};

/// Wire message accepted from the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedMessage {
    /// A position was opened.
    PositionAcquired {
        /// Acquisition price.
        price: Decimal,
        /// Instrument symbol.
        symbol: Symbol,
    },
    /// A new market tick.
    PriceChanged {
        /// Observed price.
        price: Decimal,
        /// Instrument symbol.
        symbol: Symbol,
    },
}

impl FeedMessage {
    /// Convert into the inbound domain event, stamping arrival time.
    #[must_use]
    pub fn into_event(self) -> StopLossEvent {
        match self {
            Self::PositionAcquired { price, symbol } => {
                StopLossEvent::PositionAcquired(PositionAcquired {
                    price,
                    symbol,
                    occurred_at: Timestamp::now(),
                })
            }
            Self::PriceChanged { price, symbol } => StopLossEvent::PriceChanged(PriceChanged {
                price,
                symbol,
                occurred_at: Timestamp::now(),
            }),
        }
    }
}

/// Parse one feed line.
///
/// # Errors
///
/// Returns the serde error for lines that are not valid feed messages.
pub fn parse_line(line: &str) -> Result<FeedMessage, serde_json::Error> {
    serde_json::from_str(line)
}

/// Pump feed lines from a reader into the engine's inbound channel.
///
/// Malformed lines are logged and skipped; the pump ends on EOF or once the
/// engine side of the channel closes.
pub async fn run_feed<R>(reader: R, events_tx: mpsc::Sender<StopLossEvent>)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines: Lines<R> = reader.lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match parse_line(line) {
                    Ok(message) => {
                        if events_tx.send(message.into_event()).await.is_err() {
                            tracing::debug!("Engine stopped, closing feed");
                            return;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Skipping malformed feed line");
                    }
                }
            }
            Ok(None) => {
                tracing::info!("Feed reached EOF");
                return;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Feed read error, stopping");
                return;
            }
        }
    }
}

/// Pump stdin into the engine's inbound channel.
pub async fn run_stdin_feed(events_tx: mpsc::Sender<StopLossEvent>) {
    run_feed(BufReader::new(tokio::io::stdin()), events_tx).await;
}
