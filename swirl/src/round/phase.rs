// Copyright (c) 2026 Swirl Foundation

//! The round phase lattice.
//!
//! Phases are an explicit tagged value and advance through a checked
//! transition function, so the monotonicity invariant is enforced in one
//! place instead of scattered flags.

use core::fmt;
use thiserror::Error;

/// How a round ended.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum EndState {
    /// The coordinator collected enough signatures and will broadcast.
    Success,

    /// Some phase failed; all round-scoped proofs and credentials are
    /// discarded.
    Aborted,
}

/// One round's phase.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Phase {
    /// Registering coins with ownership proofs.
    InputRegistration,

    /// Keep-alive credential reissuance.
    ConnectionConfirmation,

    /// Registering outputs against presented credentials.
    OutputRegistration,

    /// Validating and signing the assembled transaction.
    TransactionSigning,

    /// Terminal.
    Ended(EndState),
}

impl Phase {
    /// Position in the phase order; both terminal states share the last
    /// position.
    fn order(&self) -> u8 {
        match self {
            Phase::InputRegistration => 0,
            Phase::ConnectionConfirmation => 1,
            Phase::OutputRegistration => 2,
            Phase::TransactionSigning => 3,
            Phase::Ended(_) => 4,
        }
    }

    /// Whether the round is over.
    pub fn is_ended(&self) -> bool {
        matches!(self, Phase::Ended(_))
    }

    /// Advance to `next`, refusing anything non-monotonic.
    ///
    /// `Ended(Aborted)` is reachable from any live phase; `Ended(Success)`
    /// only from `TransactionSigning`; everything else must be the immediate
    /// successor. A terminal phase never transitions again.
    pub fn advance_to(self, next: Phase) -> Result<Phase, PhaseError> {
        let valid = match (self, next) {
            (Phase::Ended(_), _) => false,
            (_, Phase::Ended(EndState::Aborted)) => true,
            (Phase::TransactionSigning, Phase::Ended(EndState::Success)) => true,
            (_, Phase::Ended(EndState::Success)) => false,
            (from, to) => to.order() == from.order() + 1,
        };

        if valid {
            Ok(next)
        } else {
            Err(PhaseError::Invalid {
                from: self,
                to: next,
            })
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::InputRegistration => "input_registration",
            Phase::ConnectionConfirmation => "connection_confirmation",
            Phase::OutputRegistration => "output_registration",
            Phase::TransactionSigning => "transaction_signing",
            Phase::Ended(EndState::Success) => "ended_success",
            Phase::Ended(EndState::Aborted) => "ended_aborted",
        };
        f.write_str(name)
    }
}

/// A refused phase transition.
#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
pub enum PhaseError {
    /// Transition from `{from}` to `{to}` is not allowed.
    #[error("invalid phase transition from {from} to {to}")]
    Invalid {
        /// The current phase.
        from: Phase,
        /// The refused target phase.
        to: Phase,
    },
}
