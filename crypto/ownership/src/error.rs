// Copyright (c) 2026 Swirl Foundation

//! Errors which can occur when verifying ownership proofs.

use displaydoc::Display;
use serde::{Deserialize, Serialize};

/// An error which can occur when verifying an ownership proof.
#[derive(Clone, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Error {
    /// Invalid curve point
    InvalidCurvePoint,

    /// The proof was not able to be validated
    InvalidProof,
}

impl std::error::Error for Error {}
