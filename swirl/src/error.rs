// Copyright (c) 2026 Swirl Foundation

//! Round-level errors.

use crate::{
    amount::Amount,
    coin::{OutPoint, ScriptPubkey},
    coordinator::RejectionReason,
    keychain::KeyChainError,
    round::PhaseError,
};
use thiserror::Error;

/// Why an assembled transaction was refused before signing.
///
/// Every variant is security relevant: a coordinator producing such a
/// transaction is either broken or attacking the round.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ValidationFailure {
    /// A registered coin does not appear exactly once as an input.
    #[error("registered input {0} missing or duplicated")]
    InputMismatch(OutPoint),

    /// A registered output does not appear exactly once with its registered
    /// script and amount.
    #[error("registered output to {script} of {amount} missing or duplicated")]
    OutputMismatch {
        /// The registered destination script.
        script: ScriptPubkey,
        /// The registered amount.
        amount: Amount,
    },

    /// The transaction carries fewer inputs than the round's declared
    /// minimum, shrinking the anonymity set below what was agreed.
    #[error("transaction has {actual} inputs, round minimum is {required}")]
    TooFewInputs {
        /// The round's declared minimum input count.
        required: usize,
        /// Inputs actually present.
        actual: usize,
    },

    /// Output values exceed input values.
    #[error("transaction outputs exceed inputs")]
    NegativeFee,

    /// The implicit fee falls outside the round's declared tolerance.
    #[error("fee {actual} outside tolerance {tolerance} of expected {expected}")]
    FeeOutOfTolerance {
        /// Fee expected from the round's fee rate over the weight.
        expected: Amount,
        /// The transaction's implicit fee.
        actual: Amount,
        /// The round's declared tolerance.
        tolerance: Amount,
    },

    /// An output this client never registered pays a script its key chain
    /// controls, shrinking the client's effective anonymity set.
    #[error("unregistered output pays a script this wallet controls")]
    UnexpectedOwnOutput,
}

/// An error that aborts a round.
#[derive(Debug, Error)]
pub enum RoundError {
    /// Key chain failure; surfaced to the wallet layer.
    #[error("key chain: {0}")]
    KeyChain(#[from] KeyChainError),

    /// Credential protocol failure. Never retried.
    #[error("credential protocol: {0}")]
    Credential(#[from] swl_crypto_credentials::Error),

    /// The coordinator declined an operation.
    #[error("coordinator rejected {operation}: {reason}")]
    Rejected {
        /// The operation that was declined.
        operation: &'static str,
        /// The coordinator's stated reason.
        reason: RejectionReason,
    },

    /// The phase deadline passed before the work completed.
    #[error("deadline passed during {0}")]
    DeadlinePassed(&'static str),

    /// The round was cancelled from outside.
    #[error("round cancelled")]
    Cancelled,

    /// Internal phase bookkeeping error.
    #[error("phase: {0}")]
    Phase(#[from] PhaseError),

    /// Every selected coin was ineligible or rejected.
    #[error("no inputs registered")]
    NoInputsRegistered,

    /// A requested output amount is not an allowed denomination.
    #[error("output amount {0} is not an allowed denomination")]
    DisallowedDenomination(Amount),

    /// No single registration holds enough credential value for an output.
    #[error("no registered input can fund an output of {0}")]
    CannotFundOutput(Amount),

    /// The round's weight budget cannot cover an input's own weight.
    #[error("per-alice weight budget {budget} below input weight {input}")]
    WeightBudgetExceeded {
        /// The round's per-alice budget.
        budget: crate::amount::Weight,
        /// The weight of one input.
        input: crate::amount::Weight,
    },

    /// The assembled transaction failed local validation. Never signed.
    #[error("transaction validation: {0}")]
    TransactionValidation(#[from] ValidationFailure),
}

impl RoundError {
    /// Whether this error is security relevant rather than ordinary round
    /// churn. Callers log these distinctly.
    pub fn is_security_relevant(&self) -> bool {
        matches!(
            self,
            RoundError::Credential(_)
                | RoundError::TransactionValidation(_)
                | RoundError::KeyChain(
                    KeyChainError::ProofMismatch
                        | KeyChainError::AmountMismatch { .. }
                        | KeyChainError::ValueImbalance { .. }
                )
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_security_relevance_split() {
        assert!(RoundError::TransactionValidation(ValidationFailure::NegativeFee)
            .is_security_relevant());
        assert!(RoundError::Credential(swl_crypto_credentials::Error::ValueNotConserved)
            .is_security_relevant());
        assert!(RoundError::KeyChain(KeyChainError::ProofMismatch).is_security_relevant());
        assert!(RoundError::KeyChain(KeyChainError::AmountMismatch {
            claimed: Amount::from_sats(150_000),
            actual: Amount::from_sats(100_000),
        })
        .is_security_relevant());

        assert!(!RoundError::Cancelled.is_security_relevant());
        assert!(!RoundError::DeadlinePassed("register_input").is_security_relevant());
        assert!(!RoundError::Rejected {
            operation: "register_input",
            reason: crate::coordinator::RejectionReason::RoundFull,
        }
        .is_security_relevant());
    }
}
