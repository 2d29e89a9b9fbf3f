// Copyright (c) 2026 Swirl Foundation

//! Errors which can occur when requesting, issuing or presenting
//! credentials.

use displaydoc::Display;
use serde::{Deserialize, Serialize};

/// An error which can occur in the credential protocol.
#[derive(Clone, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Error {
    /// Invalid curve point
    InvalidCurvePoint,

    /// Wrong number of requested credentials, provided `{0}`, required `{1}`
    WrongRequestSize(usize, usize),

    /// Too many presented credentials, provided `{0}`, limit `{1}`
    TooManyPresentations(usize, usize),

    /// Wrong number of issued credentials, provided `{0}`, required `{1}`
    WrongResponseSize(usize, usize),

    /// The request proof was not able to be validated
    InvalidRequestProof,

    /// The issuance proof was not able to be validated
    InvalidIssuanceProof,

    /// The range proof was not able to be validated
    InvalidRangeProof,

    /// Range proof generation failed
    RangeProofGeneration,

    /// Serial number already seen
    SerialNumberReused,

    /// Value not conserved
    ValueNotConserved,

    /// Insufficient credential value, requested `{0}`, held `{1}`
    InsufficientValue(u64, u64),

    /// Value too large for a balance delta
    ValueOverflow,

    /// A request is already pending
    RequestPending,

    /// No request is pending
    NoPendingRequest,

    /// No credentials are held
    NothingHeld,

    /// Initial credentials were already issued
    AlreadyIssued,
}

impl std::error::Error for Error {}
