//! Application Layer
//!
//! Ports (interfaces to the outside world) and the service that orchestrates
//! the domain process managers against them.

pub mod ports;
pub mod services;
