//! Application Services

mod stoploss_service;

pub use stoploss_service::{StopLossService, StopLossServiceError};
