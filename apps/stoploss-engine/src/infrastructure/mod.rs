//! Infrastructure Layer
//!
//! Adapters implementing the application ports and the inbound feed boundary.

pub mod bus;
pub mod feed;
pub mod scheduler;
