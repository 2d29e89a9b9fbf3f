// Copyright (c) 2026 Swirl Foundation

//! The client-visible coordinator contract.
//!
//! Transport is out of scope; an application wires this trait to HTTP, RPC
//! or an in-process test coordinator. Errors split cleanly into policy
//! rejections (never retried) and transport failures (retried with backoff
//! up to the phase deadline).

use crate::{
    amount::Amount,
    coin::{OutPoint, ScriptPubkey},
    transaction::{InputWitness, UnsignedTransaction},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use swl_crypto_credentials::{CredentialRequest, CredentialResponse};
use swl_crypto_ownership::OwnershipProof;
use thiserror::Error;

/// Why a coordinator declined a registration.
#[derive(Clone, Copy, Debug, Deserialize, Error, Eq, Hash, PartialEq, Serialize)]
pub enum RejectionReason {
    /// The coin is banned by this coordinator.
    #[error("coin is banned")]
    CoinBanned,

    /// The coin is unknown or already spent.
    #[error("coin is unknown or spent")]
    UnknownCoin,

    /// The round has reached its input capacity.
    #[error("round is full")]
    RoundFull,

    /// The operation does not fit the round's current phase.
    #[error("operation out of phase")]
    WrongPhase,

    /// No registration with the given alice id.
    #[error("unknown alice id")]
    UnknownAlice,

    /// The ownership proof failed verification.
    #[error("invalid ownership proof")]
    InvalidOwnershipProof,

    /// The credential request failed verification.
    #[error("invalid credential request")]
    InvalidCredentialRequest,

    /// The output amount is not an allowed denomination.
    #[error("disallowed output denomination")]
    DisallowedDenomination,

    /// The submitted witness failed verification.
    #[error("invalid witness")]
    InvalidWitness,
}

/// An error from a coordinator call.
#[derive(Clone, Debug, Deserialize, Error, Eq, PartialEq, Serialize)]
pub enum CoordinatorError {
    /// The coordinator declined the operation. Never retried.
    #[error("rejected: {0}")]
    Rejected(RejectionReason),

    /// The call failed in transit. Retried with backoff.
    #[error("transport failure: {0}")]
    Transport(String),
}

/// A successful input registration.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct InputRegistrationResponse {
    /// The alice id echoed on subsequent calls for this input.
    pub alice_id: u64,

    /// Initial amount credentials.
    pub amount_credentials: CredentialResponse,

    /// Initial weight credentials.
    pub weight_credentials: CredentialResponse,
}

/// A successful connection confirmation.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ConnectionConfirmationResponse {
    /// Reissued amount credentials.
    pub amount_credentials: CredentialResponse,

    /// Reissued weight credentials.
    pub weight_credentials: CredentialResponse,
}

/// A successful output registration.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct OutputRegistrationResponse {
    /// Change credentials for the presented amount.
    pub amount_credentials: CredentialResponse,

    /// Change credentials for the presented weight.
    pub weight_credentials: CredentialResponse,
}

/// The coordinator's five round operations.
#[async_trait]
pub trait Coordinator: Send + Sync {
    /// Register `outpoint` with a round-bound ownership proof and the
    /// initial credential requests for its value and weight budget.
    async fn register_input(
        &self,
        round_id: [u8; 32],
        outpoint: OutPoint,
        ownership_proof: OwnershipProof,
        amount_request: CredentialRequest,
        weight_request: CredentialRequest,
    ) -> Result<InputRegistrationResponse, CoordinatorError>;

    /// Prove continued liveness by reissuing credentials at zero delta.
    async fn confirm_connection(
        &self,
        round_id: [u8; 32],
        alice_id: u64,
        amount_request: CredentialRequest,
        weight_request: CredentialRequest,
    ) -> Result<ConnectionConfirmationResponse, CoordinatorError>;

    /// Register an output backed by presented amount and weight credentials.
    async fn register_output(
        &self,
        round_id: [u8; 32],
        script_pubkey: ScriptPubkey,
        amount: Amount,
        amount_presentation: CredentialRequest,
        weight_presentation: CredentialRequest,
    ) -> Result<OutputRegistrationResponse, CoordinatorError>;

    /// The assembled transaction, or `None` while the round is still
    /// collecting registrations.
    async fn get_unsigned_transaction(
        &self,
        round_id: [u8; 32],
    ) -> Result<Option<UnsignedTransaction>, CoordinatorError>;

    /// Submit the witness for one input.
    async fn submit_signature(
        &self,
        round_id: [u8; 32],
        witness: InputWitness,
    ) -> Result<(), CoordinatorError>;
}
