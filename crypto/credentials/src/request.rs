// Copyright (c) 2026 Swirl Foundation

//! Wire types for credential issuance.

use crate::{
    credential::Presentation,
    proofs::{IssuanceProof, RequestProof},
};
use bulletproofs_og::RangeProof;
use curve25519_dalek::{ristretto::CompressedRistretto, scalar::Scalar};
use serde::{Deserialize, Serialize};

/// Every request asks for exactly this many credentials, padding with
/// zero-valued ones, so request shape leaks nothing about the split.
pub const CREDENTIAL_SET_SIZE: usize = 2;

/// A client's credential request.
///
/// One message covers all three protocol uses: initial issuance (no
/// presentations, positive delta), reissuance (zero delta) and presentation
/// for output registration (negative delta).
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct CredentialRequest {
    /// Credentials being presented (spent).
    pub presentations: Vec<Presentation>,

    /// Attribute commitments for the requested credentials.
    pub requested: Vec<CompressedRistretto>,

    /// Public value change: positive credits value into the request,
    /// negative withdraws it.
    pub delta: i64,

    /// Aggregated 64-bit range proof over the requested values.
    pub range_proof: RangeProof,

    /// Knowledge-and-balance proof over the whole request.
    pub proof: RequestProof,
}

/// The issuer's answer to a valid request.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct CredentialResponse {
    /// One issued credential per requested commitment, index-aligned.
    pub issued: Vec<IssuedCredential>,
}

/// A single issued MAC plus its proof of correct issuance.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct IssuedCredential {
    /// MAC nonce scalar.
    pub t: Scalar,

    /// MAC tag point `V`.
    pub mac: CompressedRistretto,

    /// Proof the MAC used the published issuer parameters.
    pub proof: IssuanceProof,
}
