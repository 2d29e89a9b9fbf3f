// Copyright (c) 2026 Swirl Foundation

//! Spend key material and plain Schnorr signatures over Ristretto.
//!
//! A swirl destination is a single Ristretto keypair. [`SpendPrivate`] stays
//! inside the wallet process; [`SpendPublic`] is what destination scripts
//! commit to. [`Signature`] is the witness scheme for spending: a Schnorr
//! signature with a domain-separated Fiat-Shamir challenge.

mod error;
mod signature;
mod spend;

pub use curve25519_dalek::{
    ristretto::{CompressedRistretto, RistrettoPoint},
    scalar::Scalar,
};
pub use error::Error;
pub use signature::Signature;
pub use spend::{SpendPrivate, SpendPublic};
