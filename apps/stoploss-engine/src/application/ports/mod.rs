//! Application Ports (Driven)
//!
//! Ports define interfaces for interacting with external systems.
//! Both ports here are driven (outbound): the message bus the engine talks
//! through and the timer service it schedules re-checks with.

mod delayed_delivery_port;
mod message_bus_port;

pub use delayed_delivery_port::{DelayedDeliveryPort, NoOpDelayedDelivery, ScheduleError};
pub use message_bus_port::{BusError, MessageBusPort, NoOpMessageBus};
