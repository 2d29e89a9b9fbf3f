// Copyright (c) 2026 Swirl Foundation

//! One round of the collaborative transaction protocol.

mod alice;
mod client;
mod params;
mod phase;

pub use alice::OutputRequest;
pub use client::{RoundClient, RoundOutcome};
pub use params::{PhaseDeadlines, RoundParameters};
pub use phase::{EndState, Phase, PhaseError};
