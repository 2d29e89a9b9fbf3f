// Copyright (c) 2026 Swirl Foundation

//! Coordinator-supplied round parameters.

use crate::{
    amount::{Amount, FeeRate, Weight},
    transaction::{INPUT_WEIGHT, OUTPUT_WEIGHT},
};
use std::time::Duration;
use swl_crypto_credentials::IssuerParams;
use swl_crypto_ownership::RoundBinding;
use tokio::time::Instant;

/// Absolute deadline for each phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseDeadlines {
    /// End of input registration.
    pub input_registration: Instant,

    /// End of connection confirmation.
    pub connection_confirmation: Instant,

    /// End of output registration.
    pub output_registration: Instant,

    /// End of transaction signing.
    pub transaction_signing: Instant,
}

impl PhaseDeadlines {
    /// Deadlines at equal `window` spacing from `start`.
    pub fn staggered(start: Instant, window: Duration) -> Self {
        Self {
            input_registration: start + window,
            connection_confirmation: start + 2 * window,
            output_registration: start + 3 * window,
            transaction_signing: start + 4 * window,
        }
    }
}

/// Everything the coordinator fixes for a round's lifetime.
///
/// Fetched out of band before the round starts; immutable thereafter.
#[derive(Clone, Debug)]
pub struct RoundParameters {
    /// Round identifier.
    pub round_id: [u8; 32],

    /// Identity of the coordinator running the round.
    pub coordinator_id: String,

    /// Issuer parameters for amount credentials.
    pub amount_issuer: IssuerParams,

    /// Issuer parameters for weight credentials.
    pub weight_issuer: IssuerParams,

    /// The round's fee rate.
    pub fee_rate: FeeRate,

    /// Allowed deviation of the assembled transaction's fee from the fee
    /// rate over its weight.
    pub fee_tolerance: Amount,

    /// Allowed output denominations; empty means unrestricted.
    pub allowed_denominations: Vec<Amount>,

    /// Minimum number of inputs in the assembled transaction, across all
    /// participants. An anonymity floor, enforced before signing.
    pub min_input_count: usize,

    /// Maximum number of inputs one client may register.
    pub max_input_count: usize,

    /// Weight each registered input is entitled to spend on outputs,
    /// including its own weight.
    pub per_alice_weight_budget: Weight,

    /// Per-phase deadlines.
    pub deadlines: PhaseDeadlines,
}

impl RoundParameters {
    /// The binding context ownership proofs are scoped to.
    pub fn binding(&self) -> RoundBinding {
        RoundBinding::new(self.coordinator_id.clone(), self.round_id)
    }

    /// The fee share one input owes.
    pub fn input_fee(&self) -> Amount {
        self.fee_rate.fee_for(INPUT_WEIGHT)
    }

    /// The fee share one output owes.
    pub fn output_fee(&self) -> Amount {
        self.fee_rate.fee_for(OUTPUT_WEIGHT)
    }

    /// A coin's value after its input fee share, the value its initial
    /// amount credential commits to. `None` when fees exceed the coin.
    pub fn effective_value(&self, amount: Amount) -> Option<Amount> {
        amount.checked_sub(self.input_fee())
    }

    /// Whether `amount` is an allowed output denomination.
    pub fn denomination_allowed(&self, amount: Amount) -> bool {
        self.allowed_denominations.is_empty() || self.allowed_denominations.contains(&amount)
    }
}
