// Copyright (c) 2026 Swirl Foundation

//! Keyed-verification anonymous credentials for value and weight accounting.
//!
//! The scheme is an algebraic MAC over Ristretto in the CMZ family. Each
//! credential commits to a single `u64` value with a Pedersen commitment
//! `Ma = v * Gg + r * Gh`; the issuer's MAC `(t, V)` over `Ma` authorizes the
//! credential without the issuer ever learning `v`. Presentation randomizes
//! the credential so the issuer cannot link it back to issuance, reveals a
//! single-use serial number `S = r * Gs` for double-spend detection, and
//! proves (in one Schnorr-style proof over the whole request) knowledge of
//! all openings plus the balance equation
//!
//! ```text
//! sum(presented values) + delta = sum(requested values)
//! ```
//!
//! where `delta` is the request's public value change. Requested values carry
//! an aggregated Bulletproof range proof, which keeps the balance equation
//! meaningful over the 64-bit value domain.
//!
//! Issuer keys are generated fresh per round, so no credential survives the
//! round that issued it.

mod credential;
mod domain_separators;
mod error;
mod generators;
mod issuer;
mod proofs;
mod range;
mod request;
mod session;

pub use credential::{Credential, Presentation};
pub use error::Error;
pub use issuer::{Issuer, IssuerParams, IssuerSecret};
pub use proofs::{IssuanceProof, RequestProof};
pub use request::{CredentialRequest, CredentialResponse, IssuedCredential, CREDENTIAL_SET_SIZE};
pub use session::ClientSession;
