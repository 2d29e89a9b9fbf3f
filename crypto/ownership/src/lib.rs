// Copyright (c) 2026 Swirl Foundation

//! Round-bound ownership proofs.
//!
//! To register a coin for a coinjoin round a client must show it controls the
//! coin's destination script. The proof here is a Schnorr proof of knowledge
//! of the spend key, with the round's identity ([`RoundBinding`]) folded into
//! the Fiat-Shamir challenge: a proof produced for one round fails
//! verification under every other round's binding, so observing a proof never
//! links a coin across rounds.

mod binding;
mod domain_separators;
mod error;
mod proof;

pub use binding::RoundBinding;
pub use error::Error;
pub use proof::OwnershipProof;
