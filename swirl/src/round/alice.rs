// Copyright (c) 2026 Swirl Foundation

//! Per-coin and per-output round records.
//!
//! These are arena records: owned by the round client for exactly one round
//! and dropped with it, which is what keeps proofs and credentials from ever
//! crossing a round boundary.

use crate::{
    amount::Amount,
    coin::{Coin, ScriptPubkey},
};
use swl_crypto_credentials::ClientSession;
use swl_crypto_ownership::OwnershipProof;

/// One registered input and its credential state.
pub(crate) struct Alice {
    /// The registered coin.
    pub coin: Coin,

    /// Id assigned by the coordinator at registration.
    pub alice_id: u64,

    /// The round-bound proof the coin was registered with. Kept so signing
    /// can re-check the proof/coin pairing.
    pub ownership_proof: OwnershipProof,

    /// Amount credential session.
    pub amount: ClientSession,

    /// Weight credential session.
    pub weight: ClientSession,
}

/// One output this client registered.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Bob {
    /// The registered destination script.
    pub script_pubkey: ScriptPubkey,

    /// The registered amount.
    pub amount: Amount,
}

/// An output the wallet wants out of the round.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OutputRequest {
    /// Destination script.
    pub script_pubkey: ScriptPubkey,

    /// Output value. Fee shares are accounted separately; this is the value
    /// the output will actually carry.
    pub amount: Amount,
}
