// Copyright (c) 2026 Swirl Foundation

//! Client-side core of the Swirl collaborative transaction protocol.
//!
//! Multiple independent wallets jointly build one transaction so that
//! individual inputs cannot be linked to individual outputs, while a
//! semi-trusted coordinator sequences the round and blindly issues
//! credentials for input amount and transaction-weight budget. This crate
//! is the client: it proves coin ownership bound to one round
//! (`swl-crypto-ownership`), conserves value and weight through anonymous
//! credentials (`swl-crypto-credentials`), and drives the round state
//! machine against a [`coordinator::Coordinator`].
//!
//! The coordinator is trusted for liveness, never for privacy or funds: the
//! client validates the assembled transaction before any witness is
//! produced, and a coordinator that drops an output, skims fees or pays the
//! wallet back outside its registrations gets no signature.

pub mod amount;
mod backoff;
pub mod ban;
pub mod coin;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod keychain;
pub mod round;
pub mod transaction;

pub use amount::{Amount, FeeRate, Weight};
pub use ban::BanList;
pub use coin::{Coin, CoinSource, OutPoint, ScriptPubkey};
pub use config::ClientConfig;
pub use error::{RoundError, ValidationFailure};
pub use keychain::{InMemoryKeyChain, KeyChain, KeyChainError};
pub use round::{OutputRequest, PhaseDeadlines, RoundClient, RoundOutcome, RoundParameters};
pub use transaction::{InputWitness, UnsignedTransaction};
