//! Stop-Loss Value Objects

mod direction;
mod evidence;

pub use direction::{PriceDirection, StopLossState};
pub use evidence::EvidenceSet;
